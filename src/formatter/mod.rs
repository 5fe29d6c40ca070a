//! Text rendering for document trees
//!
//! Two forms over the same content: a compact single-line form and a
//! multi-line pretty form. Both are deterministic functions of the tree.

use std::fmt::Write;

use crate::document::{NodeRef, NodeValue};

/// Compact form: `[]`/`{}` for empty containers, elements joined by `", "`,
/// properties rendered as `"key": value` in insertion order.
pub fn serialize(node: NodeRef<'_>) -> String {
    let mut out = String::new();
    write_compact(node, &mut out);
    out
}

/// Multi-line form. Container entries sit on their own lines indented two
/// spaces past `indent`, with the closing bracket back at `indent`; a
/// single-element array keeps its element on one line; scalars only emit
/// `indent` leading spaces before their compact form.
pub fn serialize_pretty(node: NodeRef<'_>, indent: usize) -> String {
    let mut out = String::new();
    write_pretty(node, indent, &mut out);
    out
}

fn write_compact(node: NodeRef<'_>, out: &mut String) {
    match node.value() {
        NodeValue::Null => out.push_str("null"),
        NodeValue::Boolean(value) => {
            let _ = write!(out, "{}", value);
        }
        NodeValue::Number(value) => {
            let _ = write!(out, "{}", value);
        }
        NodeValue::String(value) => write_quoted(value, out),
        NodeValue::Array(_) => {
            let elements = node.children();
            if elements.is_empty() {
                out.push_str("[]");
                return;
            }
            out.push('[');
            for (i, element) in elements.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_compact(*element, out);
            }
            out.push(']');
        }
        NodeValue::Object(_) => {
            let properties = node.children();
            if properties.is_empty() {
                out.push_str("{}");
                return;
            }
            out.push('{');
            for (i, property) in properties.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_compact(*property, out);
            }
            out.push('}');
        }
        NodeValue::Property { key, .. } => {
            write_quoted(key, out);
            out.push_str(": ");
            if let Some(value) = node.property_value() {
                write_compact(value, out);
            }
        }
    }
}

fn write_pretty(node: NodeRef<'_>, indent: usize, out: &mut String) {
    match node.value() {
        NodeValue::Null
        | NodeValue::Boolean(_)
        | NodeValue::Number(_)
        | NodeValue::String(_) => {
            push_spaces(indent, out);
            write_compact(node, out);
        }
        NodeValue::Array(_) => {
            let elements = node.children();
            if elements.is_empty() {
                out.push_str("[]");
                return;
            }
            out.push_str("[\n");
            if elements.len() == 1 {
                write_pretty(elements[0], indent, out);
            } else {
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        out.push_str(",\n");
                    }
                    push_spaces(indent + 2, out);
                    write_pretty(*element, indent + 2, out);
                }
            }
            out.push('\n');
            push_spaces(indent, out);
            out.push(']');
        }
        NodeValue::Object(_) => {
            let properties = node.children();
            if properties.is_empty() {
                out.push_str("{}");
                return;
            }
            out.push_str("{\n");
            for (i, property) in properties.iter().enumerate() {
                if i > 0 {
                    out.push_str(",\n");
                }
                push_spaces(indent + 2, out);
                write_pretty(*property, indent + 2, out);
            }
            out.push('\n');
            push_spaces(indent, out);
            out.push('}');
        }
        NodeValue::Property { key, .. } => {
            push_spaces(indent, out);
            write_quoted(key, out);
            out.push_str(": ");
            if let Some(value) = node.property_value() {
                write_pretty(value, indent, out);
            }
        }
    }
}

/// Quote and escape text. Only `\\ \" \n \r \t \b \f` are escaped; every
/// other character passes through verbatim.
fn write_quoted(text: &str, out: &mut String) {
    out.push('"');
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{0008}' => out.push_str("\\b"),
            '\u{000C}' => out.push_str("\\f"),
            other => out.push(other),
        }
    }
    out.push('"');
}

fn push_spaces(count: usize, out: &mut String) {
    for _ in 0..count {
        out.push(' ');
    }
}
