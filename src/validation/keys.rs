//! Object key checking
//!
//! Scans every Object node for blank and duplicate keys among its immediate
//! properties, reporting each finding with the object's depth (ancestor
//! hops to the tree root via the owner backlinks). Descent always
//! continues, so one traversal covers every nesting level.
//!
//! Trees built through the checked constructors cannot carry duplicates;
//! this validator is the diagnostic channel for trees ingested through
//! `object_unchecked` from untrusted or externally constructed sources.

use crate::document::NodeRef;
use crate::visitor::{walk, JsonVisitor};

#[derive(Debug, Default)]
pub struct ObjectKeyValidator {
    errors: Vec<String>,
}

impl ObjectKeyValidator {
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

impl JsonVisitor for ObjectKeyValidator {
    fn visit_object(&mut self, node: NodeRef<'_>) -> bool {
        let depth = node.depth();
        let keys: Vec<&str> = node.properties().into_iter().map(|(k, _)| k).collect();

        // One message per blank key occurrence.
        for key in &keys {
            if key.trim().is_empty() {
                self.errors
                    .push(format!("Object contains empty key at depth {}", depth));
            }
        }

        // One message per key that occurs more than once, in order of first
        // occurrence.
        let mut seen: Vec<&str> = Vec::new();
        for key in &keys {
            if !seen.contains(key) {
                seen.push(key);
            }
        }
        for key in seen {
            if keys.iter().filter(|k| **k == key).count() > 1 {
                self.errors.push(format!(
                    "Duplicate key '{}' in object at depth {}",
                    key, depth
                ));
            }
        }

        true
    }
}
