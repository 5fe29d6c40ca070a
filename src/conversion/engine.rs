//! Core conversion engine for turning Rust values into document trees
//!
//! A [`Converter`] is created fresh for every top-level conversion call and
//! carries the call's entire mutable state: the document being built, the
//! set of shared-pointer identities currently in flight (cycle detection),
//! and the recursion depth. Nothing is shared across calls, so conversions
//! on independent threads cannot interfere with each other.

use std::collections::HashSet;

use crate::document::{JsonDocument, JsonNumber, NodeId, NodeValue};
use crate::error::{ConversionError, ConversionResult};

/// Default cap on conversion recursion depth.
pub const DEFAULT_MAX_DEPTH: usize = 1000;

/// Capability contract for values that convert into document trees.
///
/// An implementation describes its value through the [`Converter`] builder
/// surface: scalars map directly, collections go through
/// [`Converter::sequence`] / [`Converter::map_entries`], unit enum variants
/// through [`Converter::symbol`], and record types declare their fields in
/// order through [`Converter::record`].
pub trait ToJson {
    fn to_json(&self, conv: &mut Converter) -> ConversionResult<NodeId>;
}

/// One field descriptor of a record conversion: the field's own name, an
/// optional external rename, an exclusion flag, and the value.
pub struct Field<'a> {
    name: &'static str,
    rename: Option<&'static str>,
    excluded: bool,
    value: &'a dyn ToJson,
}

impl<'a> Field<'a> {
    pub fn new(name: &'static str, value: &'a dyn ToJson) -> Self {
        Self {
            name,
            rename: None,
            excluded: false,
            value,
        }
    }

    /// Use `name` as the external key instead of the field's own name. A
    /// blank rename falls back to the field name.
    pub fn rename(mut self, name: &'static str) -> Self {
        self.rename = Some(name);
        self
    }

    /// Drop this field from the converted object entirely.
    pub fn exclude(mut self) -> Self {
        self.excluded = true;
        self
    }

    fn effective_key(&self) -> &'static str {
        match self.rename {
            Some(name) if !name.trim().is_empty() => name,
            _ => self.name,
        }
    }
}

/// Builder state for one conversion call.
pub struct Converter {
    doc: JsonDocument,
    active: HashSet<usize>,
    depth: usize,
    max_depth: usize,
}

impl Default for Converter {
    fn default() -> Self {
        Self::new()
    }
}

impl Converter {
    pub fn new() -> Self {
        Self::with_max_depth(DEFAULT_MAX_DEPTH)
    }

    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            doc: JsonDocument::new(),
            active: HashSet::new(),
            depth: 0,
            max_depth,
        }
    }

    /// Finish the call: designate `root` and hand the document over.
    pub fn finish(self, root: NodeId) -> JsonDocument {
        let mut doc = self.doc;
        doc.set_root(root);
        doc
    }

    fn guarded<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> ConversionResult<T>,
    ) -> ConversionResult<T> {
        if self.depth >= self.max_depth {
            return Err(ConversionError::RecursionLimit {
                limit: self.max_depth,
            });
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    pub fn null(&mut self) -> ConversionResult<NodeId> {
        Ok(self.doc.null())
    }

    pub fn boolean(&mut self, value: bool) -> ConversionResult<NodeId> {
        Ok(self.doc.boolean(value))
    }

    pub fn number(&mut self, value: impl Into<JsonNumber>) -> ConversionResult<NodeId> {
        Ok(self.doc.number(value))
    }

    /// Convert a float, rejecting NaN and infinities.
    pub fn float(&mut self, value: f64) -> ConversionResult<NodeId> {
        Ok(self.doc.number_f64(value)?)
    }

    pub fn string(&mut self, value: &str) -> ConversionResult<NodeId> {
        Ok(self.doc.string(value))
    }

    /// Convert an enumerated constant: a String holding its symbolic name
    /// verbatim.
    pub fn symbol(&mut self, name: &str) -> ConversionResult<NodeId> {
        self.string(name)
    }

    /// Convert an ordered sequence into an Array, elements in order.
    pub fn sequence<'a, I>(&mut self, elements: I) -> ConversionResult<NodeId>
    where
        I: IntoIterator<Item = &'a dyn ToJson>,
    {
        self.guarded(|conv| {
            let mut ids = Vec::new();
            for element in elements {
                ids.push(element.to_json(conv)?);
            }
            Ok(conv.doc.array(ids))
        })
    }

    /// Convert keyed entries into an Object, in iteration order.
    ///
    /// Every key must convert to a String node; anything else fails with
    /// [`ConversionError::InvalidKeyType`] naming the offending kind.
    pub fn map_entries<'a, I>(&mut self, entries: I) -> ConversionResult<NodeId>
    where
        I: IntoIterator<Item = (&'a dyn ToJson, &'a dyn ToJson)>,
    {
        self.guarded(|conv| {
            let mut properties = Vec::new();
            for (key, value) in entries {
                let key_id = key.to_json(conv)?;
                let key_text = match conv.doc.value(key_id) {
                    NodeValue::String(text) => text.clone(),
                    other => return Err(ConversionError::invalid_key(other.kind().name())),
                };
                let value_id = value.to_json(conv)?;
                properties.push(conv.doc.property(key_text, value_id));
            }
            Ok(conv.doc.object(properties)?)
        })
    }

    /// Convert a record into an Object, one property per non-excluded field
    /// in declaration order.
    ///
    /// A record exposing no fields at all fails with
    /// [`ConversionError::UnsupportedType`] naming `type_name`; a record
    /// whose fields are all excluded converts to an empty Object.
    pub fn record(&mut self, type_name: &str, fields: &[Field<'_>]) -> ConversionResult<NodeId> {
        if fields.is_empty() {
            return Err(ConversionError::unsupported(type_name));
        }
        self.guarded(|conv| {
            let mut properties = Vec::new();
            for field in fields.iter().filter(|field| !field.excluded) {
                let value_id = field.value.to_json(conv)?;
                properties.push(conv.doc.property(field.effective_key(), value_id));
            }
            Ok(conv.doc.object(properties)?)
        })
    }

    /// Run `f` with `identity` marked in flight.
    ///
    /// Fails with [`ConversionError::CircularReference`] if `identity` is
    /// already in flight on the current recursive path; the mark is removed
    /// on every exit path, so sibling references to one allocation (a
    /// diamond) convert independently. The shared-pointer implementations
    /// route through this; custom smart pointers should too.
    pub fn tracked(
        &mut self,
        identity: usize,
        type_name: &'static str,
        f: impl FnOnce(&mut Self) -> ConversionResult<NodeId>,
    ) -> ConversionResult<NodeId> {
        if !self.active.insert(identity) {
            return Err(ConversionError::CircularReference { type_name });
        }
        let result = f(self);
        self.active.remove(&identity);
        result
    }
}

/// Convert `value` into a freshly owned document whose root is set.
///
/// Fails rather than returning a partial tree; the source is only read,
/// never mutated, and the result shares nothing with it.
pub fn to_document<T: ToJson + ?Sized>(value: &T) -> ConversionResult<JsonDocument> {
    to_document_with_limit(value, DEFAULT_MAX_DEPTH)
}

/// [`to_document`] with an explicit recursion cap.
pub fn to_document_with_limit<T: ToJson + ?Sized>(
    value: &T,
    max_depth: usize,
) -> ConversionResult<JsonDocument> {
    let mut conv = Converter::with_max_depth(max_depth);
    let root = value.to_json(&mut conv)?;
    Ok(conv.finish(root))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    struct Person {
        name: String,
        age: u32,
        password: String,
    }

    impl ToJson for Person {
        fn to_json(&self, conv: &mut Converter) -> ConversionResult<NodeId> {
            conv.record(
                "Person",
                &[
                    Field::new("name", &self.name),
                    Field::new("age", &self.age),
                    Field::new("password", &self.password).exclude(),
                ],
            )
        }
    }

    fn alice() -> Person {
        Person {
            name: "Alice".to_string(),
            age: 30,
            password: "secret".to_string(),
        }
    }

    #[test]
    fn test_record_fields_in_declaration_order() {
        let doc = to_document(&alice()).unwrap();
        let root = doc.root().unwrap();
        assert_eq!(root.serialize(), r#"{"name": "Alice", "age": 30}"#);
    }

    #[test]
    fn test_excluded_field_is_dropped() {
        let doc = to_document(&alice()).unwrap();
        assert!(doc.root().unwrap().get("password").is_none());
    }

    #[test]
    fn test_rename_overrides_field_name() {
        struct Ticket {
            id: u64,
        }
        impl ToJson for Ticket {
            fn to_json(&self, conv: &mut Converter) -> ConversionResult<NodeId> {
                conv.record("Ticket", &[Field::new("id", &self.id).rename("ticket_id")])
            }
        }

        let doc = to_document(&Ticket { id: 7 }).unwrap();
        assert_eq!(doc.root().unwrap().serialize(), r#"{"ticket_id": 7}"#);
    }

    #[test]
    fn test_blank_rename_falls_back_to_field_name() {
        struct Ticket {
            id: u64,
        }
        impl ToJson for Ticket {
            fn to_json(&self, conv: &mut Converter) -> ConversionResult<NodeId> {
                conv.record("Ticket", &[Field::new("id", &self.id).rename("  ")])
            }
        }

        let doc = to_document(&Ticket { id: 7 }).unwrap();
        assert_eq!(doc.root().unwrap().serialize(), r#"{"id": 7}"#);
    }

    #[test]
    fn test_record_without_fields_is_unsupported() {
        struct Opaque;
        impl ToJson for Opaque {
            fn to_json(&self, conv: &mut Converter) -> ConversionResult<NodeId> {
                conv.record("Opaque", &[])
            }
        }

        assert_matches!(
            to_document(&Opaque),
            Err(ConversionError::UnsupportedType { type_name }) if type_name == "Opaque"
        );
    }

    #[test]
    fn test_all_excluded_fields_yield_empty_object() {
        struct Hidden {
            secret: String,
        }
        impl ToJson for Hidden {
            fn to_json(&self, conv: &mut Converter) -> ConversionResult<NodeId> {
                conv.record("Hidden", &[Field::new("secret", &self.secret).exclude()])
            }
        }

        let doc = to_document(&Hidden {
            secret: "x".to_string(),
        })
        .unwrap();
        assert_eq!(doc.root().unwrap().serialize(), "{}");
    }

    #[test]
    fn test_duplicate_serial_names_fail_at_construction() {
        struct Clash {
            a: u32,
            b: u32,
        }
        impl ToJson for Clash {
            fn to_json(&self, conv: &mut Converter) -> ConversionResult<NodeId> {
                conv.record(
                    "Clash",
                    &[
                        Field::new("a", &self.a).rename("x"),
                        Field::new("b", &self.b).rename("x"),
                    ],
                )
            }
        }

        assert_matches!(
            to_document(&Clash { a: 1, b: 2 }),
            Err(ConversionError::Document(_))
        );
    }

    #[test]
    fn test_symbol_renders_name_verbatim() {
        enum Status {
            Active,
        }
        impl ToJson for Status {
            fn to_json(&self, conv: &mut Converter) -> ConversionResult<NodeId> {
                match self {
                    Status::Active => conv.symbol("Active"),
                }
            }
        }

        let doc = to_document(&Status::Active).unwrap();
        assert_eq!(doc.root().unwrap().serialize(), "\"Active\"");
    }

    #[test]
    fn test_tracked_detects_reentry_and_cleans_up() {
        let mut conv = Converter::new();
        let result = conv.tracked(0xbeef, "Outer", |conv| {
            conv.tracked(0xbeef, "Inner", |conv| conv.null())
        });
        assert_matches!(
            result,
            Err(ConversionError::CircularReference { type_name: "Inner" })
        );

        // The identity was removed on the error path, so it can be tracked
        // again afterwards.
        let ok = conv.tracked(0xbeef, "Outer", |conv| conv.null());
        assert!(ok.is_ok());
    }

    #[test]
    fn test_recursion_limit() {
        let mut value = serde_json::json!(1);
        for _ in 0..16 {
            value = serde_json::json!([value]);
        }

        assert_matches!(
            to_document_with_limit(&value, 8),
            Err(ConversionError::RecursionLimit { limit: 8 })
        );
        assert!(to_document_with_limit(&value, 64).is_ok());
    }
}
