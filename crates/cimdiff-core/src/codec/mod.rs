//! Codecs between records and their text forms
//!
//! - [`value`]: single property values to and from change-entry transport form
//! - [`cson`]: whole records to and from JSON objects and JSON Lines streams

pub mod cson;
pub mod value;

pub use value::{decode, encode};
