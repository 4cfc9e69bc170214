//! Index hand-off types
//!
//! Index structures themselves live outside this crate; keys only need to
//! hand them an ordered list of values to search on.

mod search_key;

pub use search_key::SearchKey;
