//! Persistent edits over composite nodes
//!
//! Every operation builds a new container node and leaves the source
//! subtree untouched. Retained children are copied into the new container
//! rather than shared: the arena keeps exactly one parent per node, and the
//! parent backlink must stay accurate for depth queries.

use crate::document::{JsonDocument, NodeId, NodeRef, NodeValue};

impl JsonDocument {
    fn array_children(&self, id: NodeId) -> Vec<NodeId> {
        match self.value(id) {
            NodeValue::Array(children) => children.clone(),
            other => panic!("expected an Array node, got {}", other.kind()),
        }
    }

    fn object_properties(&self, id: NodeId) -> Vec<NodeId> {
        match self.value(id) {
            NodeValue::Object(properties) => properties.clone(),
            other => panic!("expected an Object node, got {}", other.kind()),
        }
    }

    /// New Array keeping only the elements `predicate` accepts.
    pub fn array_filter(
        &mut self,
        id: NodeId,
        mut predicate: impl FnMut(NodeRef<'_>) -> bool,
    ) -> NodeId {
        let mut kept = Vec::new();
        for child in self.array_children(id) {
            if predicate(self.node(child)) {
                kept.push(child);
            }
        }
        let copies = kept.into_iter().map(|c| self.deep_copy(c)).collect();
        self.array(copies)
    }

    /// New Array whose elements are produced by `transform`.
    ///
    /// The transform receives the document and each source element id and
    /// must return a freshly built (unattached) node; returning a node that
    /// already sits in a container panics.
    pub fn array_map(
        &mut self,
        id: NodeId,
        mut transform: impl FnMut(&mut JsonDocument, NodeId) -> NodeId,
    ) -> NodeId {
        let children = self.array_children(id);
        let mapped = children
            .into_iter()
            .map(|child| transform(self, child))
            .collect();
        self.array(mapped)
    }

    /// New Array holding `left`'s elements followed by `right`'s.
    pub fn array_merge(&mut self, left: NodeId, right: NodeId) -> NodeId {
        let mut elements = self.array_children(left);
        elements.extend(self.array_children(right));
        let copies = elements.into_iter().map(|c| self.deep_copy(c)).collect();
        self.array(copies)
    }

    /// New Array with `element` inserted at `index`.
    ///
    /// Panics if `index > len` or if `element` already has a parent.
    pub fn array_insert(&mut self, id: NodeId, index: usize, element: NodeId) -> NodeId {
        let children = self.array_children(id);
        assert!(
            index <= children.len(),
            "insert index {} out of bounds for array of length {}",
            index,
            children.len()
        );
        let mut elements: Vec<NodeId> =
            children.into_iter().map(|c| self.deep_copy(c)).collect();
        elements.insert(index, element);
        self.array(elements)
    }

    /// New Array with the element at `index` removed.
    ///
    /// Panics if `index >= len`.
    pub fn array_remove(&mut self, id: NodeId, index: usize) -> NodeId {
        let children = self.array_children(id);
        assert!(
            index < children.len(),
            "remove index {} out of bounds for array of length {}",
            index,
            children.len()
        );
        let elements = children
            .into_iter()
            .enumerate()
            .filter(|(i, _)| *i != index)
            .map(|(_, c)| self.deep_copy(c))
            .collect();
        self.array(elements)
    }

    /// New Object keeping only the properties `predicate` accepts.
    ///
    /// The key set shrinks, so key validity is preserved from the source;
    /// the rebuild goes through the unchecked constructor.
    pub fn object_filter(
        &mut self,
        id: NodeId,
        mut predicate: impl FnMut(&str, NodeRef<'_>) -> bool,
    ) -> NodeId {
        let mut kept = Vec::new();
        for property in self.object_properties(id) {
            let node = self.node(property);
            let keep = match (node.property_key(), node.property_value()) {
                (Some(key), Some(value)) => predicate(key, value),
                _ => false,
            };
            if keep {
                kept.push(property);
            }
        }
        let copies = kept.into_iter().map(|p| self.deep_copy(p)).collect();
        self.object_unchecked(copies)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn number_array(doc: &mut JsonDocument, values: &[i64]) -> NodeId {
        let elements = values.iter().map(|v| doc.number(*v)).collect();
        doc.array(elements)
    }

    #[test]
    fn test_filter_keeps_matching_elements() {
        let mut doc = JsonDocument::new();
        let array = number_array(&mut doc, &[1, 2, 3, 4]);
        let filtered = doc.array_filter(array, |n| {
            n.as_number().map_or(false, |v| v == &2.into() || v == &4.into())
        });

        assert_eq!(doc.serialize(filtered), "[2, 4]");
        assert_eq!(doc.serialize(array), "[1, 2, 3, 4]", "source unchanged");
        assert_ne!(array, filtered);
    }

    #[test]
    fn test_map_builds_new_elements() {
        let mut doc = JsonDocument::new();
        let array = number_array(&mut doc, &[1, 2]);
        let mapped = doc.array_map(array, |doc, child| {
            let text = doc.serialize(child);
            doc.string(text)
        });

        assert_eq!(doc.serialize(mapped), r#"["1", "2"]"#);
        assert_eq!(doc.serialize(array), "[1, 2]");
    }

    #[test]
    fn test_merge_concatenates() {
        let mut doc = JsonDocument::new();
        let left = number_array(&mut doc, &[1]);
        let right = number_array(&mut doc, &[2, 3]);
        let merged = doc.array_merge(left, right);

        assert_eq!(doc.serialize(merged), "[1, 2, 3]");
        assert_eq!(doc.serialize(left), "[1]");
        assert_eq!(doc.serialize(right), "[2, 3]");
    }

    #[test]
    fn test_insert_at_bounds() {
        let mut doc = JsonDocument::new();
        let array = number_array(&mut doc, &[1]);
        let head = doc.boolean(true);
        let with_head = doc.array_insert(array, 0, head);
        assert_eq!(doc.serialize(with_head), "[true, 1]");

        let tail = doc.number(42);
        let with_tail = doc.array_insert(array, 1, tail);
        assert_eq!(doc.serialize(with_tail), "[1, 42]");
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn test_insert_past_end_panics() {
        let mut doc = JsonDocument::new();
        let array = number_array(&mut doc, &[1]);
        let element = doc.null();
        let _ = doc.array_insert(array, 2, element);
    }

    #[test]
    fn test_remove_at_index() {
        let mut doc = JsonDocument::new();
        let a = doc.string("a");
        let one = doc.number(1);
        let flag = doc.boolean(true);
        let array = doc.array(vec![a, one, flag]);
        let removed = doc.array_remove(array, 1);

        assert_eq!(doc.serialize(removed), r#"["a", true]"#);
        assert_eq!(doc.serialize(array), r#"["a", 1, true]"#);
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn test_remove_past_end_panics() {
        let mut doc = JsonDocument::new();
        let array = number_array(&mut doc, &[1]);
        let _ = doc.array_remove(array, 1);
    }

    #[test]
    fn test_object_filter_by_key() {
        let mut doc = JsonDocument::new();
        let name = doc.string("Eng");
        let name_prop = doc.property("name", name);
        let head = doc.string("Alice");
        let head_prop = doc.property("head", head);
        let object = doc.object(vec![name_prop, head_prop]).unwrap();

        let filtered = doc.object_filter(object, |key, _| key == "name");
        assert_eq!(doc.serialize(filtered), r#"{"name": "Eng"}"#);
        assert_eq!(
            doc.serialize(object),
            r#"{"name": "Eng", "head": "Alice"}"#
        );
    }

    #[test]
    #[should_panic(expected = "expected an Array node")]
    fn test_array_edit_on_non_array_panics() {
        let mut doc = JsonDocument::new();
        let scalar = doc.number(1);
        let _ = doc.array_remove(scalar, 0);
    }
}
