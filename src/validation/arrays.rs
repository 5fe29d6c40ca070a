//! Array homogeneity checking
//!
//! An array is homogeneous when its non-null elements all share one node
//! kind. Null elements are ignored. Each offending array yields exactly one
//! finding naming the first element's kind and the kind of the first
//! element that differs from it; later mismatches in the same array are not
//! reported separately. Descent always continues, so nested arrays are
//! checked independently.

use crate::document::{NodeKind, NodeRef};
use crate::visitor::{walk, JsonVisitor};

#[derive(Debug, Default)]
pub struct ArrayTypeValidator {
    errors: Vec<String>,
}

impl ArrayTypeValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Findings of the last `validate` run.
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Clear prior findings, walk the subtree at `root`, return findings.
    pub fn validate(&mut self, root: NodeRef<'_>) -> &[String] {
        self.errors.clear();
        walk(root, self);
        &self.errors
    }
}

impl JsonVisitor for ArrayTypeValidator {
    fn visit_array(&mut self, node: NodeRef<'_>) -> bool {
        let kinds: Vec<NodeKind> = node
            .children()
            .into_iter()
            .map(|child| child.kind())
            .filter(|kind| *kind != NodeKind::Null)
            .collect();

        if let Some(first) = kinds.first() {
            if let Some(differing) = kinds.iter().find(|kind| *kind != first) {
                self.errors.push(format!(
                    "Array contains mixed types: {} and {}",
                    first, differing
                ));
            }
        }

        true
    }
}
