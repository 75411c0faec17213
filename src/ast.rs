//! Declaration-level syntax tree for TypeScript sources.
//!
//! Only the parts of the language needed to name, locate and describe type
//! declarations are modelled: interfaces, type aliases, classes (properties and
//! method signatures), enums, import/export bindings and the full type
//! expression grammar. Statements and expression bodies are skipped by the
//! parser and never reach this tree.

use std::fmt;

/// Index of a file inside a [`crate::project::Project`].
pub type FileId = usize;

/// Identity of a declaration: the file it lives in and its position there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeclId {
    pub file: FileId,
    pub index: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentKind {
    Line,
    Block,
}

/// A comment as written in the source, delimiters included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub kind: CommentKind,
    pub text: String,
}

impl Comment {
    pub fn line(body: &str) -> Self {
        Self {
            kind: CommentKind::Line,
            text: format!("//{}", body),
        }
    }

    pub fn block(text: impl Into<String>) -> Self {
        Self {
            kind: CommentKind::Block,
            text: text.into(),
        }
    }

    /// `/** ... */` comments (but not the empty `/**/`).
    pub fn is_jsdoc(&self) -> bool {
        self.kind == CommentKind::Block && self.text.starts_with("/**") && !self.text.starts_with("/**/")
    }

    /// Text between the delimiters with the leading ` * ` gutter removed from
    /// every line. Line comments return their body.
    pub fn inner_text(&self) -> String {
        match self.kind {
            CommentKind::Line => self.text.trim_start_matches("//").trim().to_string(),
            CommentKind::Block => {
                let body = self
                    .text
                    .trim_start_matches("/**")
                    .trim_start_matches("/*")
                    .trim_end_matches("*/");
                let lines: Vec<&str> = body
                    .lines()
                    .map(|line| {
                        let line = line.trim_start();
                        let line = line.strip_prefix('*').unwrap_or(line);
                        line.strip_prefix(' ').unwrap_or(line).trim_end()
                    })
                    .collect();
                lines.join("\n").trim().to_string()
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    Any,
    Unknown,
    Never,
    Void,
    Undefined,
    Null,
    String,
    Number,
    BigInt,
    Boolean,
    Symbol,
    Object,
    This,
}

impl Keyword {
    pub fn from_word(word: &str) -> Option<Self> {
        Some(match word {
            "any" => Keyword::Any,
            "unknown" => Keyword::Unknown,
            "never" => Keyword::Never,
            "void" => Keyword::Void,
            "undefined" => Keyword::Undefined,
            "null" => Keyword::Null,
            "string" => Keyword::String,
            "number" => Keyword::Number,
            "bigint" => Keyword::BigInt,
            "boolean" => Keyword::Boolean,
            "symbol" => Keyword::Symbol,
            "object" => Keyword::Object,
            "this" => Keyword::This,
            _ => return None,
        })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Keyword::Any => "any",
            Keyword::Unknown => "unknown",
            Keyword::Never => "never",
            Keyword::Void => "void",
            Keyword::Undefined => "undefined",
            Keyword::Null => "null",
            Keyword::String => "string",
            Keyword::Number => "number",
            Keyword::BigInt => "bigint",
            Keyword::Boolean => "boolean",
            Keyword::Symbol => "symbol",
            Keyword::Object => "object",
            Keyword::This => "this",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    String(String),
    /// Kept as written so `0x10` and `1e3` survive unchanged.
    Number(String),
    Boolean(bool),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeOperator {
    Keyof,
    Readonly,
    Unique,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeParam {
    pub name: String,
    pub constraint: Option<TypeExpr>,
    pub default: Option<TypeExpr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TupleElement {
    pub name: Option<String>,
    pub ty: TypeExpr,
    pub optional: bool,
    pub rest: bool,
    /// The element was written as `CamelCase<T>` and `ty` is the unwrapped `T`
    pub camel_case: bool,
}

/// A function or method parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    /// Identifier, or the source text of a destructuring pattern.
    pub name: String,
    pub ty: Option<TypeExpr>,
    /// Set only by a `?` token.
    pub optional: bool,
    pub rest: bool,
    pub has_initializer: bool,
    pub comments: Vec<Comment>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Signature {
    pub type_params: Vec<TypeParam>,
    pub params: Vec<Parameter>,
    pub ret: Option<TypeExpr>,
}

/// Type syntax.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeExpr {
    Keyword(Keyword),
    Literal(Literal),
    /// `Name`, `Ns.Name`, `Name<Args>`.
    Reference { name: Vec<String>, args: Vec<TypeExpr> },
    /// `import("./module").Qualifier<Args>`.
    Import {
        module: String,
        qualifier: Vec<String>,
        args: Vec<TypeExpr>,
    },
    /// `typeof a.b`.
    Query(Vec<String>),
    Object(Vec<Member>),
    Array(Box<TypeExpr>),
    Tuple(Vec<TupleElement>),
    Union(Vec<TypeExpr>),
    Intersection(Vec<TypeExpr>),
    Function {
        signature: Box<Signature>,
        constructor: bool,
    },
    Operator { op: TypeOperator, ty: Box<TypeExpr> },
    IndexedAccess { object: Box<TypeExpr>, index: Box<TypeExpr> },
    Conditional {
        check: Box<TypeExpr>,
        extends: Box<TypeExpr>,
        then: Box<TypeExpr>,
        otherwise: Box<TypeExpr>,
    },
    Infer(String),
    Mapped {
        param: String,
        constraint: Box<TypeExpr>,
        value: Option<Box<TypeExpr>>,
        optional: bool,
    },
    /// Raw source of a template literal type, backticks included.
    TemplateLiteral(String),
    /// Promise-unwrapping wrapper, `Awaited<T>`.
    Awaited(Box<TypeExpr>),
}

impl TypeExpr {
    pub fn keyword(keyword: Keyword) -> Self {
        TypeExpr::Keyword(keyword)
    }

    pub fn reference(name: &str) -> Self {
        TypeExpr::Reference {
            name: name.split('.').map(str::to_string).collect(),
            args: Vec::new(),
        }
    }

    pub fn generic(name: &str, args: Vec<TypeExpr>) -> Self {
        TypeExpr::Reference {
            name: name.split('.').map(str::to_string).collect(),
            args,
        }
    }

    /// Calls `f` on every immediate child type expression, including the types
    /// of members and signatures nested in this node.
    pub fn for_each_child<'a>(&'a self, f: &mut dyn FnMut(&'a TypeExpr)) {
        match self {
            TypeExpr::Keyword(_)
            | TypeExpr::Literal(_)
            | TypeExpr::Query(_)
            | TypeExpr::Infer(_)
            | TypeExpr::TemplateLiteral(_) => {}
            TypeExpr::Reference { args, .. } | TypeExpr::Import { args, .. } => {
                args.iter().for_each(|arg| f(arg));
            }
            TypeExpr::Object(members) => members.iter().for_each(|m| m.for_each_type(f)),
            TypeExpr::Array(inner) | TypeExpr::Awaited(inner) => f(inner),
            TypeExpr::Operator { ty, .. } => f(ty),
            TypeExpr::Tuple(elements) => elements.iter().for_each(|e| f(&e.ty)),
            TypeExpr::Union(types) | TypeExpr::Intersection(types) => {
                types.iter().for_each(|t| f(t));
            }
            TypeExpr::Function { signature, .. } => signature.for_each_type(f),
            TypeExpr::IndexedAccess { object, index } => {
                f(object);
                f(index);
            }
            TypeExpr::Conditional {
                check,
                extends,
                then,
                otherwise,
            } => {
                f(check);
                f(extends);
                f(then);
                f(otherwise);
            }
            TypeExpr::Mapped {
                constraint, value, ..
            } => {
                f(constraint);
                if let Some(value) = value {
                    f(value);
                }
            }
        }
    }

    pub fn for_each_child_mut(&mut self, f: &mut dyn FnMut(&mut TypeExpr)) {
        match self {
            TypeExpr::Keyword(_)
            | TypeExpr::Literal(_)
            | TypeExpr::Query(_)
            | TypeExpr::Infer(_)
            | TypeExpr::TemplateLiteral(_) => {}
            TypeExpr::Reference { args, .. } | TypeExpr::Import { args, .. } => {
                args.iter_mut().for_each(|arg| f(arg));
            }
            TypeExpr::Object(members) => members.iter_mut().for_each(|m| m.for_each_type_mut(f)),
            TypeExpr::Array(inner) | TypeExpr::Awaited(inner) => f(inner),
            TypeExpr::Operator { ty, .. } => f(ty),
            TypeExpr::Tuple(elements) => elements.iter_mut().for_each(|e| f(&mut e.ty)),
            TypeExpr::Union(types) | TypeExpr::Intersection(types) => {
                types.iter_mut().for_each(|t| f(t));
            }
            TypeExpr::Function { signature, .. } => signature.for_each_type_mut(f),
            TypeExpr::IndexedAccess { object, index } => {
                f(object);
                f(index);
            }
            TypeExpr::Conditional {
                check,
                extends,
                then,
                otherwise,
            } => {
                f(check);
                f(extends);
                f(then);
                f(otherwise);
            }
            TypeExpr::Mapped {
                constraint, value, ..
            } => {
                f(constraint);
                if let Some(value) = value {
                    f(value);
                }
            }
        }
    }

    /// Pre-order walk over this node and all of its descendants.
    pub fn walk<'a>(&'a self, f: &mut dyn FnMut(&'a TypeExpr)) {
        f(self);
        self.for_each_child(&mut |child| child.walk(&mut *f));
    }
}

impl Signature {
    pub fn for_each_type<'a>(&'a self, f: &mut dyn FnMut(&'a TypeExpr)) {
        for param in &self.type_params {
            param.for_each_type(f);
        }
        for param in &self.params {
            if let Some(ty) = &param.ty {
                f(ty);
            }
        }
        if let Some(ret) = &self.ret {
            f(ret);
        }
    }

    pub fn for_each_type_mut(&mut self, f: &mut dyn FnMut(&mut TypeExpr)) {
        for param in &mut self.type_params {
            if let Some(constraint) = &mut param.constraint {
                f(constraint);
            }
            if let Some(default) = &mut param.default {
                f(default);
            }
        }
        for param in &mut self.params {
            if let Some(ty) = &mut param.ty {
                f(ty);
            }
        }
        if let Some(ret) = &mut self.ret {
            f(ret);
        }
    }
}

impl TypeParam {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            constraint: None,
            default: None,
        }
    }

    pub fn for_each_type<'a>(&'a self, f: &mut dyn FnMut(&'a TypeExpr)) {
        if let Some(constraint) = &self.constraint {
            f(constraint);
        }
        if let Some(default) = &self.default {
            f(default);
        }
    }
}

/// A property of an interface, object type or class.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertySignature {
    pub name: String,
    pub ty: Option<TypeExpr>,
    pub optional: bool,
    pub readonly: bool,
    pub comments: Vec<Comment>,
    /// Keys of this property's example are rendered in camelCase.
    pub camel_case: bool,
}

impl PropertySignature {
    pub fn new(name: &str, ty: TypeExpr) -> Self {
        Self {
            name: name.to_string(),
            ty: Some(ty),
            optional: false,
            readonly: false,
            comments: Vec::new(),
            camel_case: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Member {
    Property(PropertySignature),
    Method {
        name: String,
        optional: bool,
        signature: Signature,
    },
    Index {
        key_name: String,
        key: TypeExpr,
        value: TypeExpr,
    },
    Call(Signature),
    Construct(Signature),
}

impl Member {
    pub fn for_each_type<'a>(&'a self, f: &mut dyn FnMut(&'a TypeExpr)) {
        match self {
            Member::Property(property) => {
                if let Some(ty) = &property.ty {
                    f(ty);
                }
            }
            Member::Method { signature, .. } | Member::Call(signature) | Member::Construct(signature) => {
                signature.for_each_type(f)
            }
            Member::Index { key, value, .. } => {
                f(key);
                f(value);
            }
        }
    }

    pub fn for_each_type_mut(&mut self, f: &mut dyn FnMut(&mut TypeExpr)) {
        match self {
            Member::Property(property) => {
                if let Some(ty) = &mut property.ty {
                    f(ty);
                }
            }
            Member::Method { signature, .. } | Member::Call(signature) | Member::Construct(signature) => {
                signature.for_each_type_mut(f)
            }
            Member::Index { key, value, .. } => {
                f(key);
                f(value);
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Decorator {
    /// Dotted path of the decorator expression, without call arguments.
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Method {
    pub name: String,
    pub docs: Vec<Comment>,
    pub decorators: Vec<Decorator>,
    pub signature: Signature,
    pub is_static: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InterfaceDecl {
    pub extends: Vec<TypeExpr>,
    pub members: Vec<Member>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassDecl {
    pub extends: Option<TypeExpr>,
    pub implements: Vec<TypeExpr>,
    /// Instance properties; static ones are dropped by the parser.
    pub properties: Vec<PropertySignature>,
    pub methods: Vec<Method>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumMember {
    pub name: String,
    pub value: Option<Literal>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumDecl {
    pub is_const: bool,
    pub members: Vec<EnumMember>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DeclarationKind {
    Interface(InterfaceDecl),
    TypeAlias(TypeExpr),
    Class(ClassDecl),
    Enum(EnumDecl),
}

/// Discriminant of [`DeclarationKind`], in name-lookup priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclKind {
    Interface,
    TypeAlias,
    Class,
    Enum,
}

impl DeclKind {
    /// Order in which kinds are tried when one name matches several.
    pub const LOOKUP_ORDER: [DeclKind; 4] = [
        DeclKind::Interface,
        DeclKind::TypeAlias,
        DeclKind::Class,
        DeclKind::Enum,
    ];
}

#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    pub name: Option<String>,
    pub kind: DeclarationKind,
    pub type_params: Vec<TypeParam>,
    /// JSDoc blocks immediately preceding the declaration.
    pub docs: Vec<Comment>,
    pub exported: bool,
    pub default_export: bool,
}

impl Declaration {
    pub fn new(name: &str, kind: DeclarationKind) -> Self {
        Self {
            name: Some(name.to_string()),
            kind,
            type_params: Vec::new(),
            docs: Vec::new(),
            exported: false,
            default_export: false,
        }
    }

    pub fn kind_tag(&self) -> DeclKind {
        match self.kind {
            DeclarationKind::Interface(_) => DeclKind::Interface,
            DeclarationKind::TypeAlias(_) => DeclKind::TypeAlias,
            DeclarationKind::Class(_) => DeclKind::Class,
            DeclarationKind::Enum(_) => DeclKind::Enum,
        }
    }

    pub fn is_named(&self, name: &str) -> bool {
        self.name.as_deref() == Some(name)
    }

    pub fn as_class(&self) -> Option<&ClassDecl> {
        match &self.kind {
            DeclarationKind::Class(class) => Some(class),
            _ => None,
        }
    }

    /// Calls `f` on every top-level type expression of this declaration:
    /// type-parameter bounds, heritage clauses, member and signature types.
    pub fn for_each_type<'a>(&'a self, f: &mut dyn FnMut(&'a TypeExpr)) {
        for param in &self.type_params {
            param.for_each_type(f);
        }
        match &self.kind {
            DeclarationKind::Interface(interface) => {
                interface.extends.iter().for_each(|t| f(t));
                interface.members.iter().for_each(|m| m.for_each_type(f));
            }
            DeclarationKind::TypeAlias(ty) => f(ty),
            DeclarationKind::Class(class) => {
                if let Some(extends) = &class.extends {
                    f(extends);
                }
                class.implements.iter().for_each(|t| f(t));
                for property in &class.properties {
                    if let Some(ty) = &property.ty {
                        f(ty);
                    }
                }
                class.methods.iter().for_each(|m| m.signature.for_each_type(f));
            }
            DeclarationKind::Enum(_) => {}
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportedName {
    Named(String),
    Default,
    Namespace,
}

/// A local identifier bound by an `import` declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportBinding {
    pub local: String,
    pub imported: ImportedName,
    pub specifier: String,
}

impl ImportBinding {
    /// Name to look up in the target module, `None` for namespace imports.
    pub fn export_name(&self) -> Option<&str> {
        match &self.imported {
            ImportedName::Named(name) => Some(name),
            ImportedName::Default => Some("default"),
            ImportedName::Namespace => None,
        }
    }
}

/// `export { local as exported }`, optionally `from "specifier"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportBinding {
    pub exported: String,
    pub local: String,
    pub specifier: Option<String>,
}

/// Everything the parser keeps from one source file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Module {
    pub declarations: Vec<Declaration>,
    pub imports: Vec<ImportBinding>,
    pub exports: Vec<ExportBinding>,
    /// Specifiers of `export * from "..."`.
    pub star_exports: Vec<String>,
    /// `export default Name;`
    pub default_export: Option<String>,
    /// Whether the file has any import or export (otherwise it is a script
    /// whose declarations are global).
    pub is_module: bool,
}

impl Module {
    /// Every module specifier this file depends on: imports, re-exports and
    /// `import("...")` type references.
    pub fn module_specifiers(&self) -> Vec<String> {
        let mut specifiers: Vec<String> = Vec::new();
        let mut push = |s: &str| {
            if !specifiers.iter().any(|known| known == s) {
                specifiers.push(s.to_string());
            }
        };
        for import in &self.imports {
            push(&import.specifier);
        }
        for export in &self.exports {
            if let Some(specifier) = &export.specifier {
                push(specifier);
            }
        }
        for specifier in &self.star_exports {
            push(specifier);
        }
        for declaration in &self.declarations {
            declaration.for_each_type(&mut |ty| {
                ty.walk(&mut |node| {
                    if let TypeExpr::Import { module, .. } = node {
                        push(module);
                    }
                })
            });
        }
        specifiers
    }
}

fn write_list<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T], sep: &str) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(sep)?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

fn write_type_args(f: &mut fmt::Formatter<'_>, args: &[TypeExpr]) -> fmt::Result {
    if !args.is_empty() {
        f.write_str("<")?;
        write_list(f, args, ", ")?;
        f.write_str(">")?;
    }
    Ok(())
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::String(s) => write!(f, "{:?}", s),
            Literal::Number(n) => f.write_str(n),
            Literal::Boolean(b) => write!(f, "{}", b),
        }
    }
}

impl fmt::Display for TypeParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if let Some(constraint) = &self.constraint {
            write!(f, " extends {}", constraint)?;
        }
        if let Some(default) = &self.default {
            write!(f, " = {}", default)?;
        }
        Ok(())
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.rest {
            f.write_str("...")?;
        }
        f.write_str(&self.name)?;
        if self.optional {
            f.write_str("?")?;
        }
        if let Some(ty) = &self.ty {
            write!(f, ": {}", ty)?;
        }
        Ok(())
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.type_params.is_empty() {
            f.write_str("<")?;
            write_list(f, &self.type_params, ", ")?;
            f.write_str(">")?;
        }
        f.write_str("(")?;
        write_list(f, &self.params, ", ")?;
        f.write_str(")")
    }
}

impl fmt::Display for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Member::Property(property) => {
                if property.readonly {
                    f.write_str("readonly ")?;
                }
                f.write_str(&property.name)?;
                if property.optional {
                    f.write_str("?")?;
                }
                match &property.ty {
                    Some(ty) => write!(f, ": {}", ty),
                    None => Ok(()),
                }
            }
            Member::Method {
                name,
                optional,
                signature,
            } => {
                write!(f, "{}{}{}", name, if *optional { "?" } else { "" }, signature)?;
                match &signature.ret {
                    Some(ret) => write!(f, ": {}", ret),
                    None => Ok(()),
                }
            }
            Member::Index {
                key_name,
                key,
                value,
            } => write!(f, "[{}: {}]: {}", key_name, key, value),
            Member::Call(signature) | Member::Construct(signature) => {
                if matches!(self, Member::Construct(_)) {
                    f.write_str("new ")?;
                }
                write!(f, "{}", signature)?;
                match &signature.ret {
                    Some(ret) => write!(f, ": {}", ret),
                    None => Ok(()),
                }
            }
        }
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeExpr::Keyword(keyword) => f.write_str(keyword.as_str()),
            TypeExpr::Literal(literal) => write!(f, "{}", literal),
            TypeExpr::Reference { name, args } => {
                f.write_str(&name.join("."))?;
                write_type_args(f, args)
            }
            TypeExpr::Import {
                module,
                qualifier,
                args,
            } => {
                write!(f, "import({:?})", module)?;
                if !qualifier.is_empty() {
                    write!(f, ".{}", qualifier.join("."))?;
                }
                write_type_args(f, args)
            }
            TypeExpr::Query(name) => write!(f, "typeof {}", name.join(".")),
            TypeExpr::Object(members) => {
                if members.is_empty() {
                    return f.write_str("{}");
                }
                f.write_str("{ ")?;
                write_list(f, members, "; ")?;
                f.write_str(" }")
            }
            TypeExpr::Array(inner) => match inner.as_ref() {
                TypeExpr::Union(_) | TypeExpr::Intersection(_) | TypeExpr::Function { .. } => {
                    write!(f, "({})[]", inner)
                }
                _ => write!(f, "{}[]", inner),
            },
            TypeExpr::Tuple(elements) => {
                f.write_str("[")?;
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    if element.rest {
                        f.write_str("...")?;
                    }
                    if let Some(name) = &element.name {
                        write!(f, "{}{}: ", name, if element.optional { "?" } else { "" })?;
                        write!(f, "{}", element.ty)?;
                    } else {
                        write!(f, "{}{}", element.ty, if element.optional { "?" } else { "" })?;
                    }
                }
                f.write_str("]")
            }
            TypeExpr::Union(types) => write_list(f, types, " | "),
            TypeExpr::Intersection(types) => write_list(f, types, " & "),
            TypeExpr::Function {
                signature,
                constructor,
            } => {
                if *constructor {
                    f.write_str("new ")?;
                }
                write!(f, "{} => ", signature)?;
                match &signature.ret {
                    Some(ret) => write!(f, "{}", ret),
                    None => f.write_str("void"),
                }
            }
            TypeExpr::Operator { op, ty } => {
                let word = match op {
                    TypeOperator::Keyof => "keyof",
                    TypeOperator::Readonly => "readonly",
                    TypeOperator::Unique => "unique",
                };
                write!(f, "{} {}", word, ty)
            }
            TypeExpr::IndexedAccess { object, index } => write!(f, "{}[{}]", object, index),
            TypeExpr::Conditional {
                check,
                extends,
                then,
                otherwise,
            } => write!(f, "{} extends {} ? {} : {}", check, extends, then, otherwise),
            TypeExpr::Infer(name) => write!(f, "infer {}", name),
            TypeExpr::Mapped {
                param,
                constraint,
                value,
                optional,
            } => {
                write!(f, "{{ [{} in {}]{}", param, constraint, if *optional { "?" } else { "" })?;
                match value {
                    Some(value) => write!(f, ": {} }}", value),
                    None => f.write_str(" }"),
                }
            }
            TypeExpr::TemplateLiteral(raw) => f.write_str(raw),
            TypeExpr::Awaited(inner) => write!(f, "Awaited<{}>", inner),
        }
    }
}
