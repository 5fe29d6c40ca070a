//! jsondom — immutable JSON document trees for Rust values
//!
//! Three layers, leaves first: an arena-backed document model with
//! serialization and structural equality, a depth-first visitor protocol
//! over it, and validators plus a conversion engine built on top. Values
//! become trees through the [`ToJson`] capability trait; trees become text
//! through `serialize`/`serialize_pretty`. There is no parser — text flows
//! out, never back in.

pub mod conversion;
pub mod document;
pub mod error;
pub mod formatter;
pub mod validation;
pub mod visitor;

// Re-export commonly used types
pub use conversion::{
    to_document, to_document_with_limit, Converter, Field, ToJson, DEFAULT_MAX_DEPTH,
};
pub use document::{JsonDocument, JsonNumber, NodeId, NodeKind, NodeRef, NodeValue};
pub use error::{ConversionError, ConversionResult, DocumentError, DocumentResult};
pub use validation::{validate, ArrayTypeValidator, ObjectKeyValidator};
pub use visitor::{walk, JsonVisitor};

/// Convert a value and render the compact serialization of the result.
pub fn to_json_text<T: ToJson + ?Sized>(value: &T) -> ConversionResult<String> {
    let mut conv = Converter::new();
    let root = value.to_json(&mut conv)?;
    let doc = conv.finish(root);
    Ok(doc.serialize(root))
}

/// Convert a value and render the pretty serialization of the result.
pub fn to_json_text_pretty<T: ToJson + ?Sized>(
    value: &T,
    indent: usize,
) -> ConversionResult<String> {
    let mut conv = Converter::new();
    let root = value.to_json(&mut conv)?;
    let doc = conv.finish(root);
    Ok(doc.serialize_pretty(root, indent))
}
