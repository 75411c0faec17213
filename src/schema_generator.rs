use crate::ast::{
    Comment, DeclarationKind, EnumDecl, Keyword, Literal, Member, PropertySignature, TypeExpr,
    TypeOperator, TypeParam,
};
use crate::namespace::SyntheticNamespace;
use indexmap::IndexMap;
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// `id` of a schema node whose example keys are written in camelCase.
pub const CAMEL_CASE_ID: &str = "toCamelCase";

/// JSON schema `type` keyword
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
    Boolean,
    Number,
    Integer,
    String,
    Object,
    Array,
    Null,
    #[serde(other)]
    Unknown,
}

impl SchemaType {
    pub fn is_primitive(self) -> bool {
        matches!(
            self,
            SchemaType::Boolean | SchemaType::Number | SchemaType::Integer | SchemaType::String
        )
    }
}

/// Schema of a value, inlined all the way down.
///
/// A node without `type` could not be represented and is skipped by the
/// example synthesizer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaNode {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<SchemaType>,
    /// Object properties in declaration order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<IndexMap<String, SchemaNode>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<SchemaItems>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,
    #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

/// `items` of an array schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SchemaItems {
    /// Positional item schemas of a tuple
    Tuple(Vec<SchemaNode>),
    /// Item schema of a homogeneous array
    Single(Box<SchemaNode>),
}

impl SchemaNode {
    pub fn of_type(schema_type: SchemaType) -> Self {
        Self {
            schema_type: Some(schema_type),
            ..Self::default()
        }
    }

    pub fn object() -> Self {
        Self {
            schema_type: Some(SchemaType::Object),
            properties: Some(IndexMap::new()),
            ..Self::default()
        }
    }

    pub fn array(items: SchemaItems) -> Self {
        Self {
            schema_type: Some(SchemaType::Array),
            items: Some(items),
            ..Self::default()
        }
    }

    pub fn property(&self, name: &str) -> Option<&SchemaNode> {
        self.properties.as_ref()?.get(name)
    }

    pub fn is_camel_case(&self) -> bool {
        self.id.as_deref() == Some(CAMEL_CASE_ID)
    }

    fn is_object(&self) -> bool {
        self.schema_type == Some(SchemaType::Object)
    }

    /// Adds the properties and required names of `other`. A property this
    /// node already has keeps its position and takes the schema of `other`.
    fn merge_object(&mut self, other: SchemaNode) {
        let properties = self.properties.get_or_insert_with(IndexMap::new);
        for (name, node) in other.properties.unwrap_or_default() {
            properties.insert(name, node);
        }
        if let Some(other_required) = other.required {
            let required = self.required.get_or_insert_with(Vec::new);
            for name in other_required {
                if !required.contains(&name) {
                    required.push(name);
                }
            }
        }
    }
}

/// Nesting limit for instantiations of one generic declaration whose type
/// arguments keep growing, as in `interface L<T> { next: L<L<T>> }`.
const MAX_INSTANTIATION_DEPTH: usize = 8;

/// `Name<Arg, ...>` of one expansion, telling `Wrap<Wrap<number>>` apart
/// from `Wrap<number>`.
fn instantiation_key(name: &str, args: &[TypeExpr]) -> String {
    if args.is_empty() {
        return name.to_string();
    }
    let args: Vec<String> = args.iter().map(ToString::to_string).collect();
    format!("{}<{}>", name, args.join(", "))
}

/// Schema generator - converts declarations of a [`SyntheticNamespace`]
/// into inline schemas
pub struct SchemaGenerator<'n> {
    namespace: &'n SyntheticNamespace,
    /// Declarations currently being expanded with their instantiation keys,
    /// to cut recursive types
    stack: Vec<(String, String)>,
}

impl<'n> SchemaGenerator<'n> {
    pub fn new(namespace: &'n SyntheticNamespace) -> Self {
        Self {
            namespace,
            stack: Vec::new(),
        }
    }

    /// Schema of the declaration `name`, or `None` if the namespace has no
    /// such declaration.
    pub fn generate(&mut self, name: &str) -> Option<SchemaNode> {
        debug!("Generating schema for {}.{}", self.namespace.name, name);
        let namespace = self.namespace;
        let declaration = namespace.get(name)?;
        Some(self.declaration_schema(name, &declaration.kind, &declaration.type_params, &[]))
    }

    fn declaration_schema(
        &mut self,
        name: &str,
        kind: &DeclarationKind,
        params: &[TypeParam],
        args: &[TypeExpr],
    ) -> SchemaNode {
        let key = instantiation_key(name, args);
        let depth = self.stack.iter().filter(|(n, _)| n == name).count();
        if depth >= MAX_INSTANTIATION_DEPTH || self.stack.iter().any(|(_, k)| *k == key) {
            debug!("Recursive reference to {}, emitting an empty object", key);
            return SchemaNode::object();
        }
        self.stack.push((name.to_string(), key));

        let schema = match kind {
            DeclarationKind::Interface(interface) => {
                let mut node = SchemaNode::object();
                for base in &interface.extends {
                    let base = self.type_schema(&substitute(base, params, args));
                    if base.is_object() {
                        node.merge_object(base);
                    }
                }
                let own = self.properties_schema(
                    interface.members.iter().filter_map(|m| match m {
                        Member::Property(p) => Some(p),
                        _ => None,
                    }),
                    params,
                    args,
                );
                node.merge_object(own);
                node
            }
            DeclarationKind::TypeAlias(ty) => self.type_schema(&substitute(ty, params, args)),
            DeclarationKind::Class(class) => self.properties_schema(class.properties.iter(), params, args),
            DeclarationKind::Enum(decl) => enum_schema(decl),
        };

        self.stack.pop();
        schema
    }

    fn properties_schema<'p>(
        &mut self,
        properties: impl Iterator<Item = &'p PropertySignature>,
        params: &[TypeParam],
        args: &[TypeExpr],
    ) -> SchemaNode {
        let mut node = SchemaNode::object();
        let mut map = IndexMap::new();
        let mut required = Vec::new();
        for property in properties {
            let ty = property
                .ty
                .as_ref()
                .map(|ty| substitute(ty, params, args))
                .unwrap_or(TypeExpr::Keyword(Keyword::Any));
            let mut schema = self.type_schema(&ty);
            if let Some(description) = jsdoc_description(&property.comments) {
                schema.description = Some(description);
            }
            if property.camel_case {
                schema.id = Some(CAMEL_CASE_ID.to_string());
            }
            if !property.optional {
                required.push(property.name.clone());
            }
            map.insert(property.name.clone(), schema);
        }
        node.properties = Some(map);
        if !required.is_empty() {
            node.required = Some(required);
        }
        node
    }

    fn type_schema(&mut self, ty: &TypeExpr) -> SchemaNode {
        match ty {
            TypeExpr::Keyword(keyword) => match keyword {
                Keyword::String => SchemaNode::of_type(SchemaType::String),
                Keyword::Number | Keyword::BigInt => SchemaNode::of_type(SchemaType::Number),
                Keyword::Boolean => SchemaNode::of_type(SchemaType::Boolean),
                Keyword::Object => SchemaNode::object(),
                Keyword::Any
                | Keyword::Unknown
                | Keyword::Never
                | Keyword::Void
                | Keyword::Undefined
                | Keyword::Null
                | Keyword::Symbol
                | Keyword::This => SchemaNode::default(),
            },
            TypeExpr::Literal(literal) => literal_schema(literal),
            TypeExpr::TemplateLiteral(_) => SchemaNode::of_type(SchemaType::String),
            TypeExpr::Reference { name, args } => match name.last() {
                Some(last) => self.named_schema(last, args),
                None => SchemaNode::default(),
            },
            TypeExpr::Import { qualifier, args, .. } => match qualifier.last() {
                Some(last) => self.named_schema(last, args),
                None => SchemaNode::default(),
            },
            TypeExpr::Object(members) => self.properties_schema(
                members.iter().filter_map(|m| match m {
                    Member::Property(p) => Some(p),
                    _ => None,
                }),
                &[],
                &[],
            ),
            TypeExpr::Array(inner) => {
                let items = self.type_schema(inner);
                SchemaNode::array(SchemaItems::Single(Box::new(items)))
            }
            TypeExpr::Tuple(elements) => {
                let items = elements
                    .iter()
                    .map(|element| {
                        let mut item = self.type_schema(&element.ty);
                        if element.camel_case {
                            item.id = Some(CAMEL_CASE_ID.to_string());
                        }
                        item
                    })
                    .collect();
                SchemaNode::array(SchemaItems::Tuple(items))
            }
            TypeExpr::Union(types) => self.union_schema(types),
            TypeExpr::Intersection(types) => {
                let schemas: Vec<SchemaNode> = types.iter().map(|t| self.type_schema(t)).collect();
                if !schemas.is_empty() && schemas.iter().all(SchemaNode::is_object) {
                    let mut merged = SchemaNode::object();
                    for schema in schemas {
                        merged.merge_object(schema);
                    }
                    merged
                } else {
                    SchemaNode::default()
                }
            }
            TypeExpr::Operator { op, ty } => match op {
                TypeOperator::Readonly => self.type_schema(ty),
                TypeOperator::Keyof => SchemaNode::of_type(SchemaType::String),
                TypeOperator::Unique => SchemaNode::default(),
            },
            TypeExpr::IndexedAccess { object, index } => {
                let object = self.type_schema(object);
                match &**index {
                    TypeExpr::Literal(Literal::String(key)) => object.property(key).cloned().unwrap_or_default(),
                    TypeExpr::Keyword(Keyword::Number) => match object.items {
                        Some(SchemaItems::Single(item)) => *item,
                        _ => SchemaNode::default(),
                    },
                    _ => SchemaNode::default(),
                }
            }
            TypeExpr::Mapped { constraint, value, .. } => {
                let keys = string_literals(constraint);
                let mut node = SchemaNode::object();
                if let Some(value) = value {
                    let value = self.type_schema(value);
                    node.properties = Some(keys.iter().map(|k| (k.clone(), value.clone())).collect());
                }
                node
            }
            TypeExpr::Awaited(inner) => self.awaited_schema(inner),
            TypeExpr::Query(_)
            | TypeExpr::Function { .. }
            | TypeExpr::Conditional { .. }
            | TypeExpr::Infer(_) => SchemaNode::default(),
        }
    }

    /// Unwraps nested `Promise<T>` before generating the schema.
    fn awaited_schema(&mut self, ty: &TypeExpr) -> SchemaNode {
        if let TypeExpr::Reference { name, args } = ty {
            let is_promise = matches!(name.last().map(String::as_str), Some("Promise" | "PromiseLike"));
            if is_promise && args.len() == 1 && self.namespace.get(&name.join(".")).is_none() {
                return self.awaited_schema(&args[0]);
            }
        }
        self.type_schema(ty)
    }

    fn union_schema(&mut self, types: &[TypeExpr]) -> SchemaNode {
        let members: Vec<&TypeExpr> = types
            .iter()
            .filter(|t| !matches!(t, TypeExpr::Keyword(Keyword::Null | Keyword::Undefined | Keyword::Void)))
            .collect();
        if let [single] = members.as_slice() {
            return self.type_schema(single);
        }
        let schemas: Vec<SchemaNode> = members.iter().map(|t| self.type_schema(t)).collect();
        let Some(first) = schemas.first().and_then(|s| s.schema_type) else {
            return SchemaNode::default();
        };
        if !first.is_primitive() || schemas.iter().any(|s| s.schema_type != Some(first)) {
            return SchemaNode::default();
        }

        let mut node = SchemaNode::of_type(first);
        if schemas.iter().all(|s| s.enum_values.is_some()) {
            let mut values: Vec<Value> = Vec::new();
            for value in schemas.into_iter().flat_map(|s| s.enum_values.unwrap_or_default()) {
                if !values.contains(&value) {
                    values.push(value);
                }
            }
            // `true | false` is just boolean.
            if first != SchemaType::Boolean || values.len() < 2 {
                node.enum_values = Some(values);
            }
        }
        node
    }

    fn named_schema(&mut self, name: &str, args: &[TypeExpr]) -> SchemaNode {
        let namespace = self.namespace;
        if let Some(declaration) = namespace.get(name) {
            return self.declaration_schema(name, &declaration.kind, &declaration.type_params, args);
        }

        let arg = |i: usize| args.get(i).cloned().unwrap_or(TypeExpr::Keyword(Keyword::Any));
        match name {
            "Array" | "ReadonlyArray" | "Set" | "ReadonlySet" => {
                let items = self.type_schema(&arg(0));
                SchemaNode::array(SchemaItems::Single(Box::new(items)))
            }
            "Date" | "String" => SchemaNode::of_type(SchemaType::String),
            "Number" => SchemaNode::of_type(SchemaType::Number),
            "Boolean" => SchemaNode::of_type(SchemaType::Boolean),
            "Awaited" => self.awaited_schema(&arg(0)),
            "Readonly" => self.type_schema(&arg(0)),
            "Record" => {
                let keys = string_literals(&arg(0));
                let value = self.type_schema(&arg(1));
                let mut node = SchemaNode::object();
                node.properties = Some(keys.iter().map(|k| (k.clone(), value.clone())).collect());
                if !keys.is_empty() {
                    node.required = Some(keys);
                }
                node
            }
            "Partial" => {
                let mut node = self.type_schema(&arg(0));
                node.required = None;
                node
            }
            "Required" => {
                let mut node = self.type_schema(&arg(0));
                if let Some(properties) = &node.properties {
                    node.required = Some(properties.keys().cloned().collect());
                }
                node
            }
            "Pick" | "Omit" => {
                let keys = string_literals(&arg(1));
                let keep = |key: &String| keys.contains(key) == (name == "Pick");
                let mut node = self.type_schema(&arg(0));
                if let Some(properties) = &mut node.properties {
                    properties.retain(|key, _| keep(key));
                }
                if let Some(required) = &mut node.required {
                    required.retain(|key| keep(key));
                }
                node
            }
            _ => {
                debug!("No schema for type {}", name);
                SchemaNode::default()
            }
        }
    }
}

/// Replaces references to `params` with the matching `args`, falling back
/// to the parameter default and then to `any`.
fn substitute(ty: &TypeExpr, params: &[TypeParam], args: &[TypeExpr]) -> TypeExpr {
    let mut ty = ty.clone();
    if !params.is_empty() {
        replace_params(&mut ty, params, args);
    }
    ty
}

fn replace_params(ty: &mut TypeExpr, params: &[TypeParam], args: &[TypeExpr]) {
    if let TypeExpr::Reference { name, args: ref_args } = ty {
        if name.len() == 1 && ref_args.is_empty() {
            if let Some(index) = params.iter().position(|p| p.name == name[0]) {
                *ty = args
                    .get(index)
                    .cloned()
                    .or_else(|| params[index].default.clone())
                    .unwrap_or(TypeExpr::Keyword(Keyword::Any));
                return;
            }
        }
    }
    ty.for_each_child_mut(&mut |child| replace_params(child, params, args));
}

fn literal_schema(literal: &Literal) -> SchemaNode {
    let (schema_type, value) = match literal {
        Literal::String(s) => (SchemaType::String, Value::String(s.clone())),
        Literal::Number(n) => match number_value(n) {
            Some(value) => (SchemaType::Number, value),
            None => return SchemaNode::of_type(SchemaType::Number),
        },
        Literal::Boolean(b) => (SchemaType::Boolean, Value::Bool(*b)),
    };
    SchemaNode {
        schema_type: Some(schema_type),
        enum_values: Some(vec![value]),
        ..SchemaNode::default()
    }
}

fn number_value(text: &str) -> Option<Value> {
    let text = text.replace('_', "");
    if let Ok(n) = text.parse::<i64>() {
        return Some(Value::from(n));
    }
    let hex = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X"));
    if let Some(n) = hex.and_then(|h| i64::from_str_radix(h, 16).ok()) {
        return Some(Value::from(n));
    }
    text.parse::<f64>().ok().and_then(serde_json::Number::from_f64).map(Value::Number)
}

/// Enums with only numeric (or implicit) members are numbers, with only
/// string members strings.
fn enum_schema(decl: &EnumDecl) -> SchemaNode {
    let mut values = Vec::new();
    let mut next = 0i64;
    for member in &decl.members {
        match &member.value {
            Some(Literal::String(s)) => values.push(Value::String(s.clone())),
            Some(Literal::Number(n)) => {
                let value = number_value(n).unwrap_or(Value::Null);
                next = value.as_i64().map_or(next, |v| v + 1);
                values.push(value);
            }
            Some(Literal::Boolean(b)) => values.push(Value::Bool(*b)),
            None => {
                values.push(Value::from(next));
                next += 1;
            }
        }
    }
    let schema_type = if values.iter().all(Value::is_number) {
        Some(SchemaType::Number)
    } else if values.iter().all(Value::is_string) {
        Some(SchemaType::String)
    } else {
        None
    };
    SchemaNode {
        schema_type,
        enum_values: Some(values),
        ..SchemaNode::default()
    }
}

/// String literal members of a literal or union of literals.
fn string_literals(ty: &TypeExpr) -> Vec<String> {
    match ty {
        TypeExpr::Literal(Literal::String(s)) => vec![s.clone()],
        TypeExpr::Union(types) => types.iter().flat_map(string_literals).collect(),
        _ => Vec::new(),
    }
}

/// Text of the last JSDoc comment without its `@tag` lines.
fn jsdoc_description(comments: &[Comment]) -> Option<String> {
    let comment = comments.iter().rev().find(|c| c.is_jsdoc())?;
    let text = comment.inner_text();
    let description = text
        .lines()
        .filter(|line| !line.trim_start().starts_with('@'))
        .collect::<Vec<_>>()
        .join("\n");
    let description = description.trim();
    (!description.is_empty()).then(|| description.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::AstParser;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::path::Path;

    fn namespace(source: &str) -> SyntheticNamespace {
        let parsed = AstParser::parse_source(Path::new("ns.ts"), source).unwrap();
        SyntheticNamespace {
            name: "Test".to_string(),
            declarations: parsed.module.declarations,
        }
    }

    fn schema_json(source: &str, name: &str) -> Value {
        let namespace = namespace(source);
        let schema = SchemaGenerator::new(&namespace).generate(name).unwrap();
        serde_json::to_value(schema).unwrap()
    }

    #[test]
    fn test_interface_schema() {
        let schema = schema_json(
            r#"
            interface User {
              /**
               * user id
               * @minimum 1
               */
              id: number
              name?: string
              tags: string[]
              profile: { age: number }
              greet(): void
            }
            "#,
            "User",
        );
        assert_eq!(
            schema,
            json!({
                "type": "object",
                "properties": {
                    "id": {"type": "number", "description": "user id"},
                    "name": {"type": "string"},
                    "tags": {"type": "array", "items": {"type": "string"}},
                    "profile": {
                        "type": "object",
                        "properties": {"age": {"type": "number"}},
                        "required": ["age"]
                    }
                },
                "required": ["id", "tags", "profile"]
            })
        );
    }

    #[test]
    fn test_generics_and_extends() {
        let schema = schema_json(
            r#"
            interface Base { id: number }
            interface Page<T> extends Base { items: T[]; total: number }
            interface Item { label: string }
            type ItemPage = Page<Item>;
            "#,
            "ItemPage",
        );
        let keys: Vec<&String> = schema["properties"].as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["id", "items", "total"]);
        assert_eq!(
            schema["properties"]["items"]["items"],
            json!({"type": "object", "properties": {"label": {"type": "string"}}, "required": ["label"]})
        );
        assert_eq!(schema["required"], json!(["id", "items", "total"]));
    }

    #[test]
    fn test_inherited_properties_come_first() {
        let schema = schema_json(
            r#"
            interface Base { base_a: string; base_b: number; shared: string }
            interface Child extends Base { own: boolean; shared: number }
            "#,
            "Child",
        );
        let keys: Vec<&String> = schema["properties"].as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["base_a", "base_b", "shared", "own"]);
        assert_eq!(schema["properties"]["shared"], json!({"type": "number"}));
        assert_eq!(schema["required"], json!(["base_a", "base_b", "shared", "own"]));
    }

    #[test]
    fn test_utility_types() {
        let source = r#"
            interface User { id: number; name: string; email: string }
            type Patch = Partial<Pick<User, 'name' | 'email'>>;
            type Public = Omit<User, 'email'>;
            type Flags = Record<'a' | 'b', boolean>;
        "#;
        let patch = schema_json(source, "Patch");
        assert_eq!(
            patch,
            json!({"type": "object", "properties": {"name": {"type": "string"}, "email": {"type": "string"}}})
        );
        let public = schema_json(source, "Public");
        assert_eq!(public["required"], json!(["id", "name"]));
        let flags = schema_json(source, "Flags");
        assert_eq!(flags["properties"]["b"], json!({"type": "boolean"}));
    }

    #[test]
    fn test_unions() {
        let source = r#"
            type MaybeName = string | null | undefined;
            type Status = 'on' | 'off';
            type Mixed = number | string;
            type Flag = true | false;
        "#;
        assert_eq!(schema_json(source, "MaybeName"), json!({"type": "string"}));
        assert_eq!(schema_json(source, "Status"), json!({"type": "string", "enum": ["on", "off"]}));
        assert_eq!(schema_json(source, "Mixed"), json!({}));
        assert_eq!(schema_json(source, "Flag"), json!({"type": "boolean"}));
    }

    #[test]
    fn test_enums() {
        let source = r#"
            enum Level { Low, Mid = 5, High }
            enum Color { Red = 'red', Blue = 'blue' }
        "#;
        assert_eq!(schema_json(source, "Level"), json!({"type": "number", "enum": [0, 5, 6]}));
        assert_eq!(schema_json(source, "Color"), json!({"type": "string", "enum": ["red", "blue"]}));
    }

    #[test]
    fn test_recursive_types_terminate() {
        let schema = schema_json("interface Tree { children: Tree[] }", "Tree");
        assert_eq!(
            schema["properties"]["children"]["items"],
            json!({"type": "object", "properties": {}})
        );
    }

    #[test]
    fn test_nested_instantiations_of_one_generic() {
        let source = r#"
            interface Wrap<T> { data: T }
            type Nested = Wrap<Wrap<number>>;
            interface Chain<T> { value: T; next: Chain<Chain<T>> }
            type Endless = Chain<string>;
        "#;
        let nested = schema_json(source, "Nested");
        assert_eq!(
            nested["properties"]["data"],
            json!({
                "type": "object",
                "properties": {"data": {"type": "number"}},
                "required": ["data"]
            })
        );

        let endless = schema_json(source, "Endless");
        assert_eq!(endless["properties"]["value"], json!({"type": "string"}));
        assert_eq!(endless["properties"]["next"]["properties"]["value"]["type"], json!("object"));
    }

    #[test]
    fn test_awaited_tuple_and_camel_case() {
        let mut namespace = namespace(
            r#"
            interface Result { count: number }
            interface Holder { value: Result }
            "#,
        );
        let params = PropertySignature::new(
            "params",
            TypeExpr::Tuple(vec![
                crate::ast::TupleElement {
                    name: None,
                    ty: TypeExpr::Keyword(Keyword::Number),
                    optional: false,
                    rest: false,
                    camel_case: true,
                },
                crate::ast::TupleElement {
                    name: None,
                    ty: TypeExpr::Keyword(Keyword::Any),
                    optional: true,
                    rest: false,
                    camel_case: false,
                },
            ]),
        );
        let ret = PropertySignature::new(
            "return",
            TypeExpr::Awaited(Box::new(TypeExpr::generic("Promise", vec![TypeExpr::reference("Result")]))),
        );
        namespace.declarations.push(crate::ast::Declaration::new(
            "$get",
            DeclarationKind::Interface(crate::ast::InterfaceDecl {
                extends: Vec::new(),
                members: vec![Member::Property(params), Member::Property(ret)],
            }),
        ));

        let schema = serde_json::to_value(SchemaGenerator::new(&namespace).generate("$get").unwrap()).unwrap();
        assert_eq!(
            schema["properties"]["params"],
            json!({"type": "array", "items": [{"type": "number", "id": "toCamelCase"}, {}]})
        );
        assert_eq!(
            schema["properties"]["return"],
            json!({"type": "object", "properties": {"count": {"type": "number"}}, "required": ["count"]})
        );
    }

    #[test]
    fn test_schema_deserializes_from_json() {
        let node: SchemaNode = serde_json::from_value(json!({
            "type": "array",
            "items": [{"type": "string"}, {"type": "number"}]
        }))
        .unwrap();
        assert!(matches!(node.items, Some(SchemaItems::Tuple(ref items)) if items.len() == 2));
    }
}
