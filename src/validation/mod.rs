//! Structural validators built on the visitor protocol
//!
//! Validators collect advisory findings as text; they never fail a
//! traversal themselves. The caller decides what a non-empty finding list
//! means. Each validator clears its findings at the start of `validate`,
//! so one instance can be reused across trees.

pub mod arrays;
pub mod keys;

pub use arrays::ArrayTypeValidator;
pub use keys::ObjectKeyValidator;

use crate::document::NodeRef;

/// Run both validators over `root` as two independent traversals and
/// collect their findings, key findings first.
pub fn validate(root: NodeRef<'_>) -> Vec<String> {
    let mut findings = Vec::new();
    let mut keys = ObjectKeyValidator::new();
    findings.extend_from_slice(keys.validate(root));
    let mut arrays = ArrayTypeValidator::new();
    findings.extend_from_slice(arrays.validate(root));
    findings
}
