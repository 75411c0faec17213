//! Output serialization and example pretty printing.
//!
//! Method groups are written as a TypeScript module exporting `meta`, or as
//! plain JSON or YAML. Example values have their own printer so property
//! descriptions survive as `//` comments.

use crate::example::{ExampleObject, ExampleValue};
use crate::meta_builder::MethodGroup;
use anyhow::{Context, Result};
use log::debug;
use std::fs;
use std::path::Path;

const INDENT: &str = "  ";

/// Serializes method groups as a TypeScript module:
/// `/* eslint-disable */` followed by `export const meta = [...];`.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn serialize_ts(groups: &[MethodGroup]) -> Result<String> {
    debug!("Serializing {} method groups to a TypeScript module", groups.len());
    let json = serde_json::to_string_pretty(groups).context("Failed to serialize doc meta to JSON")?;
    Ok(format!("/* eslint-disable */\nexport const meta = {};\n", json))
}

/// Serializes method groups to pretty-printed JSON.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn serialize_json(groups: &[MethodGroup]) -> Result<String> {
    debug!("Serializing {} method groups to JSON", groups.len());
    serde_json::to_string_pretty(groups).context("Failed to serialize doc meta to JSON")
}

/// Serializes method groups to YAML.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn serialize_yaml(groups: &[MethodGroup]) -> Result<String> {
    debug!("Serializing {} method groups to YAML", groups.len());
    serde_yaml::to_string(groups).context("Failed to serialize doc meta to YAML")
}

/// Pretty prints an example value with two-space indentation.
///
/// Entry comments are written as `//` lines above their key. Keys that are
/// valid identifiers are written bare, others quoted. Arrays that hold only
/// primitives stay on one line, e.g. `["", 0]`.
pub fn render_example(value: &ExampleValue) -> String {
    let mut out = String::new();
    write_value(&mut out, value, 0);
    out
}

/// Single-line form: strings unquoted, everything else as compact JSON.
pub fn render_compact(value: &ExampleValue) -> String {
    match value {
        ExampleValue::String(s) => s.clone(),
        other => other.to_json().to_string(),
    }
}

fn write_value(out: &mut String, value: &ExampleValue, depth: usize) {
    match value {
        ExampleValue::Object(object) => write_object(out, object, depth),
        ExampleValue::Array(items) if items.is_empty() => out.push_str("[]"),
        ExampleValue::Array(items) if items.iter().all(is_scalar) => {
            let items: Vec<String> = items.iter().map(|item| item.to_json().to_string()).collect();
            out.push_str(&format!("[{}]", items.join(", ")));
        }
        ExampleValue::Array(items) => {
            out.push_str("[\n");
            for (i, item) in items.iter().enumerate() {
                push_indent(out, depth + 1);
                write_value(out, item, depth + 1);
                if i + 1 < items.len() {
                    out.push(',');
                }
                out.push('\n');
            }
            push_indent(out, depth);
            out.push(']');
        }
        scalar => out.push_str(&scalar.to_json().to_string()),
    }
}

fn write_object(out: &mut String, object: &ExampleObject, depth: usize) {
    if object.is_empty() {
        out.push_str("{}");
        return;
    }
    out.push_str("{\n");
    let entries = object.entries();
    for (i, entry) in entries.iter().enumerate() {
        if let Some(comment) = &entry.comment {
            for line in comment.lines() {
                push_indent(out, depth + 1);
                out.push_str(format!("// {}", line).trim_end());
                out.push('\n');
            }
        }
        push_indent(out, depth + 1);
        if is_identifier(&entry.key) {
            out.push_str(&entry.key);
        } else {
            out.push_str(&serde_json::Value::String(entry.key.clone()).to_string());
        }
        out.push_str(": ");
        write_value(out, &entry.value, depth + 1);
        if i + 1 < entries.len() {
            out.push(',');
        }
        out.push('\n');
    }
    push_indent(out, depth);
    out.push('}');
}

fn is_identifier(key: &str) -> bool {
    let mut chars = key.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

fn is_scalar(value: &ExampleValue) -> bool {
    !matches!(value, ExampleValue::Object(_) | ExampleValue::Array(_))
}

fn push_indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str(INDENT);
    }
}

/// Writes string content to a file.
///
/// Creates the file if it doesn't exist, or overwrites it if it does.
/// Missing parent directories are created.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written to.
pub fn write_to_file(content: &str, path: &Path) -> Result<()> {
    debug!("Writing content to file: {}", path.display());

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    fs::write(path, content).with_context(|| format!("Failed to write to file: {}", path.display()))?;

    debug!("Successfully wrote {} bytes to {}", content.len(), path.display());
    Ok(())
}
