//! Example value synthesis from schema nodes.
//!
//! Every representable schema node becomes a placeholder value: `false`,
//! `0` and `""` in [`Mode::Default`], the schema type name in
//! [`Mode::Origin`]. Objects keep declaration order and carry property
//! descriptions as entry comments. Unrepresentable nodes are skipped.

use crate::schema_generator::{SchemaItems, SchemaNode, SchemaType};
use serde_json::{Map, Value};

/// Placeholder style for primitive values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// `false`, `0`, `""`
    Default,
    /// The type name as a string, e.g. `"number"`
    Origin,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExampleValue {
    Boolean(bool),
    Number(i64),
    String(String),
    Object(ExampleObject),
    Array(Vec<ExampleValue>),
}

impl ExampleValue {
    pub fn as_object(&self) -> Option<&ExampleObject> {
        match self {
            ExampleValue::Object(object) => Some(object),
            _ => None,
        }
    }

    /// Plain JSON form, comments dropped.
    pub fn to_json(&self) -> Value {
        match self {
            ExampleValue::Boolean(b) => Value::Bool(*b),
            ExampleValue::Number(n) => Value::from(*n),
            ExampleValue::String(s) => Value::String(s.clone()),
            ExampleValue::Object(object) => object.to_json(),
            ExampleValue::Array(items) => Value::Array(items.iter().map(ExampleValue::to_json).collect()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExampleEntry {
    pub key: String,
    pub value: ExampleValue,
    pub comment: Option<String>,
}

/// Ordered object container; entries keep insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExampleObject {
    entries: Vec<ExampleEntry>,
}

impl ExampleObject {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `key`, replacing an earlier value in place.
    pub fn insert(&mut self, key: impl Into<String>, value: ExampleValue, comment: Option<String>) {
        let key = key.into();
        match self.entries.iter_mut().find(|e| e.key == key) {
            Some(entry) => {
                entry.value = value;
                entry.comment = comment;
            }
            None => self.entries.push(ExampleEntry { key, value, comment }),
        }
    }

    pub fn get(&self, key: &str) -> Option<&ExampleValue> {
        self.entries.iter().find(|e| e.key == key).map(|e| &e.value)
    }

    pub fn entries(&self) -> &[ExampleEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn to_json(&self) -> Value {
        let map: Map<String, Value> = self
            .entries
            .iter()
            .map(|e| (e.key.clone(), e.value.to_json()))
            .collect();
        Value::Object(map)
    }
}

pub struct ExampleSynthesizer {
    mode: Mode,
}

impl ExampleSynthesizer {
    pub fn new(mode: Mode) -> Self {
        Self { mode }
    }

    /// Synthesizes `schema` and writes it into `container` under `key`.
    ///
    /// `camel` is inherited from the ancestors; a node tagged
    /// `toCamelCase` turns it on for itself and everything below.
    pub fn synthesize_into(&self, schema: &SchemaNode, container: &mut ExampleObject, key: &str, camel: bool) {
        let camel = camel || schema.is_camel_case();
        if let Some(value) = self.value(schema, camel) {
            let key = if camel { snake_to_camel(key) } else { key.to_string() };
            container.insert(key, value, schema.description.clone());
        }
    }

    /// Value synthesized for `schema` on its own, if representable.
    pub fn synthesize(&self, schema: &SchemaNode, camel: bool) -> Option<ExampleValue> {
        let mut root = ExampleObject::new();
        self.synthesize_into(schema, &mut root, "value", camel);
        root.entries.pop().map(|entry| entry.value)
    }

    fn value(&self, schema: &SchemaNode, camel: bool) -> Option<ExampleValue> {
        let camel = camel || schema.is_camel_case();
        match schema.schema_type? {
            SchemaType::Object => {
                let mut object = ExampleObject::new();
                for (name, property) in schema.properties.iter().flatten() {
                    self.synthesize_into(property, &mut object, name, camel);
                }
                Some(ExampleValue::Object(object))
            }
            SchemaType::Array => {
                let items = match &schema.items {
                    Some(SchemaItems::Tuple(items)) => {
                        items.iter().filter_map(|item| self.value(item, camel)).collect()
                    }
                    // An array of nothing representable is left out entirely.
                    Some(SchemaItems::Single(item)) => vec![self.value(item, camel)?],
                    None => return None,
                };
                Some(ExampleValue::Array(items))
            }
            primitive @ (SchemaType::Boolean | SchemaType::Number | SchemaType::Integer | SchemaType::String) => {
                Some(self.primitive(primitive))
            }
            SchemaType::Null | SchemaType::Unknown => None,
        }
    }

    fn primitive(&self, schema_type: SchemaType) -> ExampleValue {
        match (self.mode, schema_type) {
            (Mode::Default, SchemaType::Boolean) => ExampleValue::Boolean(false),
            (Mode::Default, SchemaType::String) => ExampleValue::String(String::new()),
            (Mode::Default, _) => ExampleValue::Number(0),
            (Mode::Origin, SchemaType::Boolean) => ExampleValue::String("boolean".to_string()),
            (Mode::Origin, SchemaType::Integer) => ExampleValue::String("integer".to_string()),
            (Mode::Origin, SchemaType::String) => ExampleValue::String("string".to_string()),
            (Mode::Origin, _) => ExampleValue::String("number".to_string()),
        }
    }
}

/// `user_id` -> `userId`
pub fn snake_to_camel(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut chars = key.chars().peekable();
    while let Some(c) = chars.next() {
        match chars.peek() {
            Some(&next) if c == '_' && (next.is_alphanumeric() || next == '_') => {
                out.extend(next.to_uppercase());
                chars.next();
            }
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn schema(value: Value) -> SchemaNode {
        serde_json::from_value(value).unwrap()
    }

    fn synthesize(mode: Mode, value: Value) -> Value {
        ExampleSynthesizer::new(mode)
            .synthesize(&schema(value), false)
            .unwrap()
            .to_json()
    }

    #[test]
    fn test_tuple_items() {
        let tuple = json!({"type": "array", "items": [{"type": "string"}, {"type": "number"}]});
        assert_eq!(synthesize(Mode::Default, tuple.clone()), json!(["", 0]));
        assert_eq!(synthesize(Mode::Origin, tuple), json!(["string", "number"]));
    }

    #[test]
    fn test_object_in_both_modes() {
        let object = json!({
            "type": "object",
            "properties": {
                "id": {"type": "number"},
                "tags": {"type": "array", "items": {"type": "string"}}
            }
        });
        assert_eq!(synthesize(Mode::Default, object.clone()), json!({"id": 0, "tags": [""]}));
        assert_eq!(synthesize(Mode::Origin, object), json!({"id": "number", "tags": ["string"]}));
    }

    #[test]
    fn test_property_order_is_kept() {
        let value = ExampleSynthesizer::new(Mode::Default)
            .synthesize(
                &schema(json!({
                    "type": "object",
                    "properties": {"zeta": {"type": "boolean"}, "alpha": {"type": "string"}}
                })),
                false,
            )
            .unwrap();
        let keys: Vec<&str> = value.as_object().unwrap().entries().iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, vec!["zeta", "alpha"]);
    }

    #[test]
    fn test_arrays_of_objects_and_nested_arrays() {
        let value = synthesize(
            Mode::Default,
            json!({
                "type": "object",
                "properties": {
                    "users": {"type": "array", "items": {"type": "object", "properties": {"name": {"type": "string"}}}},
                    "matrix": {"type": "array", "items": {"type": "array", "items": {"type": "number"}}},
                    "pairs": {"type": "array", "items": [{"type": "object", "properties": {"ok": {"type": "boolean"}}}, {}]}
                }
            }),
        );
        assert_eq!(
            value,
            json!({"users": [{"name": ""}], "matrix": [[0]], "pairs": [{"ok": false}]})
        );
    }

    #[test]
    fn test_camel_case_propagates() {
        let value = synthesize(
            Mode::Default,
            json!({
                "type": "object",
                "properties": {
                    "user_id": {"type": "number", "id": "toCamelCase"},
                    "raw_value": {"type": "string"},
                    "profile_data": {
                        "type": "object",
                        "id": "toCamelCase",
                        "properties": {
                            "first_name": {"type": "string"},
                            "home_address": {"type": "object", "properties": {"zip_code": {"type": "string"}}}
                        }
                    }
                }
            }),
        );
        assert_eq!(
            value,
            json!({
                "userId": 0,
                "raw_value": "",
                "profileData": {"firstName": "", "homeAddress": {"zipCode": ""}}
            })
        );
    }

    #[test]
    fn test_descriptions_become_comments() {
        let value = ExampleSynthesizer::new(Mode::Default)
            .synthesize(
                &schema(json!({
                    "type": "object",
                    "properties": {"id": {"type": "number", "description": "user id"}}
                })),
                false,
            )
            .unwrap();
        let entry = &value.as_object().unwrap().entries()[0];
        assert_eq!(entry.comment.as_deref(), Some("user id"));
    }

    #[test]
    fn test_unrepresentable_nodes_are_skipped() {
        let synthesizer = ExampleSynthesizer::new(Mode::Default);
        assert_eq!(synthesizer.synthesize(&SchemaNode::default(), false), None);
        assert_eq!(
            synthesize(
                Mode::Default,
                json!({"type": "object", "properties": {"callback": {}, "n": {"type": "null"}, "ok": {"type": "boolean"}}})
            ),
            json!({"ok": false})
        );
    }

    #[test]
    fn test_arrays_without_representable_items_are_skipped() {
        let synthesizer = ExampleSynthesizer::new(Mode::Default);
        assert_eq!(synthesizer.synthesize(&schema(json!({"type": "array"})), false), None);
        assert_eq!(
            synthesize(
                Mode::Default,
                json!({
                    "type": "object",
                    "properties": {
                        "cbs": {"type": "array", "items": {}},
                        "untyped": {"type": "array"},
                        "grid": {"type": "array", "items": {"type": "array", "items": {}}},
                        "ok": {"type": "boolean"}
                    }
                })
            ),
            json!({"ok": false})
        );
    }

    #[test]
    fn test_snake_to_camel() {
        assert_eq!(snake_to_camel("user_id"), "userId");
        assert_eq!(snake_to_camel("a_b_c"), "aBC");
        assert_eq!(snake_to_camel("already"), "already");
        assert_eq!(snake_to_camel("trailing_"), "trailing_");
        assert_eq!(snake_to_camel("item_2"), "item2");
    }
}
