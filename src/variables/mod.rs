//! Variables module for the requester
//!
//! This module provides lookup of values inside JSON trees: path expression
//! evaluation, stringification, placeholder substitution and extraction of
//! named values from responses.

pub mod capture;
pub mod path;
pub mod substitution;
pub mod value;

pub use capture::extract_values;
pub use path::{lookup, resolve, PathExpr, PathSegment};
pub use substitution::{
    replace_placeholders, search_placeholders, PatternError, PlaceholderResolver,
    DEFAULT_PLACEHOLDER_PATTERN,
};
pub use value::{is_absent, value_to_string};
