//! The immutable JSON document tree
//!
//! Nodes live in an arena owned by [`JsonDocument`]; a [`NodeId`] is a cheap
//! handle into it. Each non-root node keeps a non-owning backlink to its
//! structural parent, used only to answer depth queries — ownership rests
//! solely with the arena. Trees are immutable once built: the edit
//! operations produce new nodes rather than mutating.

pub mod edit;
pub mod number;

use std::fmt;

use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

use crate::error::{DocumentError, DocumentResult};
use crate::formatter;

pub use number::JsonNumber;

/// Identity of one node within its [`JsonDocument`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// The closed set of node kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Null,
    Boolean,
    Number,
    String,
    Array,
    Object,
    Property,
}

impl NodeKind {
    /// Kind name as used in validator diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            NodeKind::Null => "Null",
            NodeKind::Boolean => "Boolean",
            NodeKind::Number => "Number",
            NodeKind::String => "String",
            NodeKind::Array => "Array",
            NodeKind::Object => "Object",
            NodeKind::Property => "Property",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Payload of one node. Composite variants hold child ids in structural
/// order: array index order, object property insertion order.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeValue {
    Null,
    Boolean(bool),
    Number(JsonNumber),
    String(String),
    Array(Vec<NodeId>),
    Object(Vec<NodeId>),
    Property { key: String, value: NodeId },
}

impl NodeValue {
    pub fn kind(&self) -> NodeKind {
        match self {
            NodeValue::Null => NodeKind::Null,
            NodeValue::Boolean(_) => NodeKind::Boolean,
            NodeValue::Number(_) => NodeKind::Number,
            NodeValue::String(_) => NodeKind::String,
            NodeValue::Array(_) => NodeKind::Array,
            NodeValue::Object(_) => NodeKind::Object,
            NodeValue::Property { .. } => NodeKind::Property,
        }
    }
}

#[derive(Debug, Clone)]
struct NodeRecord {
    parent: Option<NodeId>,
    value: NodeValue,
}

/// Arena holding one or more document trees.
///
/// Nodes are created through the builder methods and wired into composites
/// exactly once; a node not yet placed in a container is a root. The checked
/// [`object`](JsonDocument::object) constructor enforces the key invariants
/// at construction time, which makes it the source of truth for trees built
/// here. [`object_unchecked`](JsonDocument::object_unchecked) skips those
/// checks and exists to ingest externally shaped structures that the
/// traversal validators then diagnose.
#[derive(Debug, Clone, Default)]
pub struct JsonDocument {
    nodes: Vec<NodeRecord>,
    root: Option<NodeId>,
}

impl JsonDocument {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, value: NodeValue) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(NodeRecord {
            parent: None,
            value,
        });
        id
    }

    fn record(&self, id: NodeId) -> &NodeRecord {
        &self.nodes[id.index()]
    }

    /// Wire `child` under `parent`.
    ///
    /// Panics if `child` is already placed in a container: a node is owned
    /// exactly once.
    fn attach(&mut self, child: NodeId, parent: NodeId) {
        let record = &mut self.nodes[child.index()];
        assert!(
            record.parent.is_none(),
            "node {:?} already has a parent; build a fresh node (deep_copy) instead",
            child
        );
        record.parent = Some(parent);
    }

    pub fn null(&mut self) -> NodeId {
        self.push(NodeValue::Null)
    }

    pub fn boolean(&mut self, value: bool) -> NodeId {
        self.push(NodeValue::Boolean(value))
    }

    pub fn number(&mut self, value: impl Into<JsonNumber>) -> NodeId {
        self.push(NodeValue::Number(value.into()))
    }

    /// Build a Number node from a float. Fails with
    /// [`DocumentError::NonFiniteNumber`] for NaN and infinities.
    pub fn number_f64(&mut self, value: f64) -> DocumentResult<NodeId> {
        let number = JsonNumber::from_f64(value)?;
        Ok(self.push(NodeValue::Number(number)))
    }

    pub fn string(&mut self, value: impl Into<String>) -> NodeId {
        self.push(NodeValue::String(value.into()))
    }

    /// Build an Array node owning `elements` in order.
    ///
    /// Panics if any element already has a parent.
    pub fn array(&mut self, elements: Vec<NodeId>) -> NodeId {
        let id = self.push(NodeValue::Array(elements.clone()));
        for element in elements {
            self.attach(element, id);
        }
        id
    }

    /// Build a Property node owning `value`.
    ///
    /// Panics if `value` already has a parent. Key validity is the enclosing
    /// object's concern.
    pub fn property(&mut self, key: impl Into<String>, value: NodeId) -> NodeId {
        let id = self.push(NodeValue::Property {
            key: key.into(),
            value,
        });
        self.attach(value, id);
        id
    }

    /// Build an Object node owning `properties` in insertion order.
    ///
    /// Fails with [`DocumentError::KeyUniqueness`] if any key is blank or
    /// occurs more than once; on failure nothing is attached. Panics if an
    /// entry is not a Property node or already has a parent.
    pub fn object(&mut self, properties: Vec<NodeId>) -> DocumentResult<NodeId> {
        for property in &properties {
            let key = self.property_key_of(*property);
            if key.trim().is_empty() {
                return Err(DocumentError::blank_key());
            }
        }
        for (index, property) in properties.iter().enumerate() {
            let key = self.property_key_of(*property);
            let duplicated = properties[..index]
                .iter()
                .any(|earlier| self.property_key_of(*earlier) == key);
            if duplicated {
                return Err(DocumentError::duplicate_key(key));
            }
        }
        Ok(self.object_unchecked(properties))
    }

    /// Build an Object node without key checks.
    ///
    /// Ingestion path for untrusted or externally constructed shapes; run
    /// the traversal validators over the result instead. Panics if an entry
    /// is not a Property node or already has a parent.
    pub fn object_unchecked(&mut self, properties: Vec<NodeId>) -> NodeId {
        for property in &properties {
            self.property_key_of(*property);
        }
        let id = self.push(NodeValue::Object(properties.clone()));
        for property in properties {
            self.attach(property, id);
        }
        id
    }

    fn property_key_of(&self, id: NodeId) -> &str {
        match &self.record(id).value {
            NodeValue::Property { key, .. } => key,
            other => panic!(
                "object entries must be Property nodes, got {}",
                other.kind()
            ),
        }
    }

    pub fn value(&self, id: NodeId) -> &NodeValue {
        &self.record(id).value
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.record(id).parent
    }

    /// Ancestor hops from `id` to its tree root, via the owner backlinks.
    pub fn depth(&self, id: NodeId) -> usize {
        let mut depth = 0;
        let mut current = id;
        while let Some(parent) = self.record(current).parent {
            current = parent;
            depth += 1;
        }
        depth
    }

    pub fn node(&self, id: NodeId) -> NodeRef<'_> {
        assert!(id.index() < self.nodes.len(), "unknown node id {:?}", id);
        NodeRef { doc: self, id }
    }

    /// The designated root, set by the conversion engine (or by hand).
    pub fn root(&self) -> Option<NodeRef<'_>> {
        self.root.map(|id| self.node(id))
    }

    pub fn set_root(&mut self, id: NodeId) {
        assert!(id.index() < self.nodes.len(), "unknown node id {:?}", id);
        self.root = Some(id);
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Copy the subtree at `id` into fresh nodes.
    ///
    /// The copy is structurally equal to the original and identity-distinct
    /// at every position; its root is unattached.
    pub fn deep_copy(&mut self, id: NodeId) -> NodeId {
        let value = self.record(id).value.clone();
        match value {
            NodeValue::Null => self.null(),
            NodeValue::Boolean(b) => self.boolean(b),
            NodeValue::Number(n) => self.number(n),
            NodeValue::String(s) => self.string(s),
            NodeValue::Array(children) => {
                let copies = children.iter().map(|c| self.deep_copy(*c)).collect();
                self.array(copies)
            }
            NodeValue::Object(properties) => {
                let copies = properties.iter().map(|p| self.deep_copy(*p)).collect();
                // Keys were accepted when the original was built (or came in
                // through the unchecked path); copying preserves that status.
                self.object_unchecked(copies)
            }
            NodeValue::Property { key, value } => {
                let value_copy = self.deep_copy(value);
                self.property(key, value_copy)
            }
        }
    }

    /// Compact serialization of the subtree at `id`.
    pub fn serialize(&self, id: NodeId) -> String {
        formatter::serialize(self.node(id))
    }

    /// Multi-line serialization of the subtree at `id`.
    pub fn serialize_pretty(&self, id: NodeId, indent: usize) -> String {
        formatter::serialize_pretty(self.node(id), indent)
    }
}

/// Cheap read handle to one node: the document plus the node's id.
///
/// Equality is structural (same kind at every position, equal payloads and
/// children, numbers by canonical text); use [`NodeRef::same_node`] for
/// identity.
#[derive(Debug, Clone, Copy)]
pub struct NodeRef<'a> {
    doc: &'a JsonDocument,
    id: NodeId,
}

impl<'a> NodeRef<'a> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn document(&self) -> &'a JsonDocument {
        self.doc
    }

    pub fn value(&self) -> &'a NodeValue {
        self.doc.value(self.id)
    }

    pub fn kind(&self) -> NodeKind {
        self.value().kind()
    }

    pub fn parent(&self) -> Option<NodeRef<'a>> {
        self.doc.parent(self.id).map(|id| self.doc.node(id))
    }

    /// Ancestor hops to the tree root.
    pub fn depth(&self) -> usize {
        self.doc.depth(self.id)
    }

    pub fn is_null(&self) -> bool {
        matches!(self.value(), NodeValue::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self.value() {
            NodeValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<&'a JsonNumber> {
        match self.value() {
            NodeValue::Number(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&'a str> {
        match self.value() {
            NodeValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Children in structural order: array elements, object properties, or
    /// a property's single value. Leaves have none.
    pub fn children(&self) -> Vec<NodeRef<'a>> {
        match self.value() {
            NodeValue::Array(ids) | NodeValue::Object(ids) => {
                ids.iter().map(|id| self.doc.node(*id)).collect()
            }
            NodeValue::Property { value, .. } => vec![self.doc.node(*value)],
            _ => Vec::new(),
        }
    }

    /// Element or property count of a composite; 0 for leaves.
    pub fn len(&self) -> usize {
        match self.value() {
            NodeValue::Array(ids) | NodeValue::Object(ids) => ids.len(),
            NodeValue::Property { .. } => 1,
            _ => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn property_key(&self) -> Option<&'a str> {
        match self.value() {
            NodeValue::Property { key, .. } => Some(key),
            _ => None,
        }
    }

    pub fn property_value(&self) -> Option<NodeRef<'a>> {
        match self.value() {
            NodeValue::Property { value, .. } => Some(self.doc.node(*value)),
            _ => None,
        }
    }

    /// Key/value pairs of an Object, in insertion order.
    pub fn properties(&self) -> Vec<(&'a str, NodeRef<'a>)> {
        match self.value() {
            NodeValue::Object(ids) => ids
                .iter()
                .filter_map(|id| {
                    let property = self.doc.node(*id);
                    Some((property.property_key()?, property.property_value()?))
                })
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Value of the property named `key`, if this is an Object holding one.
    pub fn get(&self, key: &str) -> Option<NodeRef<'a>> {
        self.properties()
            .into_iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v)
    }

    /// Element at `index`, if this is an Array holding one.
    pub fn array_get(&self, index: usize) -> Option<NodeRef<'a>> {
        match self.value() {
            NodeValue::Array(ids) => ids.get(index).map(|id| self.doc.node(*id)),
            _ => None,
        }
    }

    /// Whether this Array holds an element structurally equal to `element`.
    pub fn array_contains(&self, element: NodeRef<'_>) -> bool {
        match self.value() {
            NodeValue::Array(ids) => ids.iter().any(|id| self.doc.node(*id) == element),
            _ => false,
        }
    }

    /// Identity comparison: same document, same node id.
    pub fn same_node(&self, other: NodeRef<'_>) -> bool {
        std::ptr::eq(self.doc, other.doc) && self.id == other.id
    }

    pub fn serialize(&self) -> String {
        formatter::serialize(*self)
    }

    pub fn serialize_pretty(&self, indent: usize) -> String {
        formatter::serialize_pretty(*self, indent)
    }
}

impl PartialEq for NodeRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        match (self.value(), other.value()) {
            (NodeValue::Null, NodeValue::Null) => true,
            (NodeValue::Boolean(a), NodeValue::Boolean(b)) => a == b,
            (NodeValue::Number(a), NodeValue::Number(b)) => a == b,
            (NodeValue::String(a), NodeValue::String(b)) => a == b,
            (NodeValue::Array(a), NodeValue::Array(b)) => {
                a.len() == b.len()
                    && a.iter()
                        .zip(b)
                        .all(|(x, y)| self.doc.node(*x) == other.doc.node(*y))
            }
            (NodeValue::Object(a), NodeValue::Object(b)) => {
                a.len() == b.len()
                    && a.iter()
                        .zip(b)
                        .all(|(x, y)| self.doc.node(*x) == other.doc.node(*y))
            }
            (
                NodeValue::Property { key: ka, value: va },
                NodeValue::Property { key: kb, value: vb },
            ) => ka == kb && self.doc.node(*va) == other.doc.node(*vb),
            _ => false,
        }
    }
}

impl Eq for NodeRef<'_> {}

/// Serde interop: a node serializes as the JSON value it models, so
/// converted trees can be handed to any serde serializer. A bare Property
/// renders as a single-entry map.
impl Serialize for NodeRef<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.value() {
            NodeValue::Null => serializer.serialize_unit(),
            NodeValue::Boolean(b) => serializer.serialize_bool(*b),
            NodeValue::Number(n) => n.serialize(serializer),
            NodeValue::String(s) => serializer.serialize_str(s),
            NodeValue::Array(ids) => {
                let mut seq = serializer.serialize_seq(Some(ids.len()))?;
                for id in ids {
                    seq.serialize_element(&self.doc.node(*id))?;
                }
                seq.end()
            }
            NodeValue::Object(ids) => {
                let mut map = serializer.serialize_map(Some(ids.len()))?;
                for (key, value) in self.properties() {
                    map.serialize_entry(key, &value)?;
                }
                map.end()
            }
            NodeValue::Property { key, value } => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry(key, &self.doc.node(*value))?;
                map.end()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn sample_object(doc: &mut JsonDocument) -> NodeId {
        let name = doc.string("Alice");
        let name_prop = doc.property("name", name);
        let age = doc.number(30);
        let age_prop = doc.property("age", age);
        doc.object(vec![name_prop, age_prop]).unwrap()
    }

    #[test]
    fn test_object_rejects_duplicate_keys() {
        let mut doc = JsonDocument::new();
        let a = doc.string("a");
        let pa = doc.property("key", a);
        let b = doc.string("b");
        let pb = doc.property("key", b);

        assert_matches!(
            doc.object(vec![pa, pb]),
            Err(DocumentError::KeyUniqueness { .. })
        );
    }

    #[test]
    fn test_object_rejects_blank_keys() {
        let mut doc = JsonDocument::new();
        let value = doc.null();
        let empty = doc.property("", value);
        assert_matches!(
            doc.object(vec![empty]),
            Err(DocumentError::KeyUniqueness { .. })
        );

        let value = doc.null();
        let blank = doc.property("   ", value);
        assert_matches!(
            doc.object(vec![blank]),
            Err(DocumentError::KeyUniqueness { .. })
        );
    }

    #[test]
    fn test_object_unchecked_accepts_anything() {
        let mut doc = JsonDocument::new();
        let a = doc.string("a");
        let pa = doc.property("key", a);
        let b = doc.string("b");
        let pb = doc.property("key", b);
        let object = doc.object_unchecked(vec![pa, pb]);

        assert_eq!(doc.node(object).len(), 2);
    }

    #[test]
    #[should_panic(expected = "already has a parent")]
    fn test_attaching_twice_panics() {
        let mut doc = JsonDocument::new();
        let shared = doc.number(1);
        let _first = doc.array(vec![shared]);
        let _second = doc.array(vec![shared]);
    }

    #[test]
    #[should_panic(expected = "must be Property nodes")]
    fn test_object_rejects_non_property_entries() {
        let mut doc = JsonDocument::new();
        let stray = doc.number(1);
        let _ = doc.object_unchecked(vec![stray]);
    }

    #[test]
    fn test_depth_follows_owner_chain() {
        let mut doc = JsonDocument::new();
        let leaf = doc.number(1);
        let array = doc.array(vec![leaf]);
        let prop = doc.property("values", array);
        let object = doc.object(vec![prop]).unwrap();

        assert_eq!(doc.depth(object), 0);
        assert_eq!(doc.depth(prop), 1);
        assert_eq!(doc.depth(array), 2);
        assert_eq!(doc.depth(leaf), 3);
        assert_eq!(doc.node(leaf).parent().unwrap().id(), array);
    }

    #[test]
    fn test_deep_copy_is_structurally_equal_and_identity_distinct() {
        let mut doc = JsonDocument::new();
        let original = sample_object(&mut doc);
        let copy = doc.deep_copy(original);

        assert_eq!(doc.node(original), doc.node(copy));
        assert!(!doc.node(original).same_node(doc.node(copy)));
        assert_ne!(original, copy);

        // Child identities are fresh too.
        let original_child = doc.node(original).children()[0].id();
        let copy_child = doc.node(copy).children()[0].id();
        assert_ne!(original_child, copy_child);
    }

    #[test]
    fn test_structural_equality_across_documents() {
        let mut left = JsonDocument::new();
        let mut right = JsonDocument::new();
        let l = sample_object(&mut left);
        let r = sample_object(&mut right);

        assert_eq!(left.node(l), right.node(r));
        assert!(!left.node(l).same_node(right.node(r)));
    }

    #[test]
    fn test_number_nodes_compare_canonically() {
        let mut doc = JsonDocument::new();
        let int = doc.number(5);
        let float = doc.number_f64(5.0).unwrap();
        let half = doc.number_f64(5.5).unwrap();

        assert_eq!(doc.node(int), doc.node(float));
        assert_ne!(doc.node(int), doc.node(half));
    }

    #[test]
    fn test_object_get_and_typed_accessors() {
        let mut doc = JsonDocument::new();
        let object = sample_object(&mut doc);
        let node = doc.node(object);

        assert_eq!(node.get("name").unwrap().as_str(), Some("Alice"));
        assert_eq!(
            node.get("age").unwrap().as_number().unwrap(),
            &JsonNumber::from(30)
        );
        assert!(node.get("missing").is_none());
        assert!(node.get("name").unwrap().as_bool().is_none());
    }

    #[test]
    fn test_array_accessors() {
        let mut doc = JsonDocument::new();
        let a = doc.string("a");
        let one = doc.number(1);
        let array = doc.array(vec![a, one]);
        let node = doc.node(array);

        assert_eq!(node.len(), 2);
        assert_eq!(node.array_get(0).unwrap().as_str(), Some("a"));
        assert!(node.array_get(2).is_none());

        let mut other = JsonDocument::new();
        let probe = other.string("a");
        assert!(node.array_contains(other.node(probe)));
        let probe = other.string("b");
        assert!(!node.array_contains(other.node(probe)));
    }

    #[test]
    fn test_root_designation() {
        let mut doc = JsonDocument::new();
        assert!(doc.root().is_none());
        let id = sample_object(&mut doc);
        doc.set_root(id);
        assert!(doc.root().unwrap().same_node(doc.node(id)));
    }

    #[test]
    fn test_serde_interop_matches_model() {
        let mut doc = JsonDocument::new();
        let object = sample_object(&mut doc);
        let json = serde_json::to_string(&doc.node(object)).unwrap();
        assert_eq!(json, r#"{"name":"Alice","age":30}"#);
    }
}
