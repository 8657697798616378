//! Pure state codec
//!
//! No I/O here. Everything is a function from values to values:
//! - `flatten`: nested state <-> flat path map
//! - `query`: flat path map <-> query string
//! - `revive`: put types back on decoded string leaves

pub mod flatten;
pub mod query;
pub mod revive;

pub use flatten::{
    DEFAULT_DELIMITER, FlatMap, flatten, flatten_with, unflatten, unflatten_with,
};
pub use query::{
    decode_component, decode_form_component, encode_component, encode_form_component,
    from_query_string,
    to_query_string, value_to_string,
};
pub use revive::coerce_like;
