//! Value-to-document conversion
//!
//! This module contains the conversion engine, the `ToJson` capability
//! trait, and its implementations for the standard mapping table.

pub mod engine;
pub mod traits;

pub use engine::{
    to_document, to_document_with_limit, Converter, Field, ToJson, DEFAULT_MAX_DEPTH,
};

pub use crate::error::{ConversionError, ConversionResult};
