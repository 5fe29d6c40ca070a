//! Depth-first traversal protocol over document trees
//!
//! A visitor gets one pre-hook (`visit_*`, returning whether to descend)
//! and one post-hook (`end_visit_*`) per node kind. [`walk`] drives the
//! traversal: pre-order, children in structural order, and the post-hook
//! fires whether or not the pre-hook declined descent. Leaf kinds have no
//! children, so their descend flag has no effect, but both hooks still run.
//!
//! Visitors accumulate results in their own state. That state is not
//! cleared between runs; reusing an instance across trees requires an
//! explicit reset, which the bundled validators perform at the start of
//! every `validate` call.

use crate::document::{NodeKind, NodeRef};

/// Traversal hooks, one pre/post pair per node kind. Defaults descend
/// everywhere and do nothing, so implementations override only the kinds
/// they care about.
pub trait JsonVisitor {
    fn visit_null(&mut self, _node: NodeRef<'_>) -> bool {
        true
    }
    fn end_visit_null(&mut self, _node: NodeRef<'_>) {}

    fn visit_boolean(&mut self, _node: NodeRef<'_>) -> bool {
        true
    }
    fn end_visit_boolean(&mut self, _node: NodeRef<'_>) {}

    fn visit_number(&mut self, _node: NodeRef<'_>) -> bool {
        true
    }
    fn end_visit_number(&mut self, _node: NodeRef<'_>) {}

    fn visit_string(&mut self, _node: NodeRef<'_>) -> bool {
        true
    }
    fn end_visit_string(&mut self, _node: NodeRef<'_>) {}

    fn visit_array(&mut self, _node: NodeRef<'_>) -> bool {
        true
    }
    fn end_visit_array(&mut self, _node: NodeRef<'_>) {}

    fn visit_object(&mut self, _node: NodeRef<'_>) -> bool {
        true
    }
    fn end_visit_object(&mut self, _node: NodeRef<'_>) {}

    fn visit_property(&mut self, _node: NodeRef<'_>) -> bool {
        true
    }
    fn end_visit_property(&mut self, _node: NodeRef<'_>) {}
}

/// Drive `visitor` over the subtree at `node`, depth-first pre-order.
pub fn walk<V: JsonVisitor + ?Sized>(node: NodeRef<'_>, visitor: &mut V) {
    match node.kind() {
        NodeKind::Null => {
            visitor.visit_null(node);
            visitor.end_visit_null(node);
        }
        NodeKind::Boolean => {
            visitor.visit_boolean(node);
            visitor.end_visit_boolean(node);
        }
        NodeKind::Number => {
            visitor.visit_number(node);
            visitor.end_visit_number(node);
        }
        NodeKind::String => {
            visitor.visit_string(node);
            visitor.end_visit_string(node);
        }
        NodeKind::Array => {
            if visitor.visit_array(node) {
                for child in node.children() {
                    walk(child, visitor);
                }
            }
            visitor.end_visit_array(node);
        }
        NodeKind::Object => {
            if visitor.visit_object(node) {
                for child in node.children() {
                    walk(child, visitor);
                }
            }
            visitor.end_visit_object(node);
        }
        NodeKind::Property => {
            if visitor.visit_property(node) {
                for child in node.children() {
                    walk(child, visitor);
                }
            }
            visitor.end_visit_property(node);
        }
    }
}
