//! Lowering of the swc syntax tree into the declaration-level [`ast`](crate::ast).
//!
//! Only declarations, import/export bindings and type syntax survive. Function
//! bodies, variable statements and expressions are dropped. Comments come from
//! the leading-comment table the swc lexer fills while parsing.

use crate::ast::{
    ClassDecl, Comment, CommentKind, Declaration, DeclarationKind, Decorator, EnumDecl, EnumMember, ExportBinding,
    ImportBinding, ImportedName, InterfaceDecl, Keyword, Literal, Member, Method, Module, Parameter, PropertySignature,
    Signature, TupleElement, TypeExpr, TypeOperator, TypeParam,
};
use deno_ast::swc::ast as swc_ast;
use deno_ast::swc::common::comments::{Comment as SwcComment, CommentKind as SwcCommentKind, Comments};
use deno_ast::swc::common::{BytePos, Spanned};

/// Converts one parsed swc module into a [`Module`].
pub struct Lowerer<'a> {
    text: &'a str,
    start: BytePos,
    comments: &'a dyn Comments,
}

impl<'a> Lowerer<'a> {
    /// `text` is the source of the file that starts at `start` in its source
    /// map.
    pub fn new(text: &'a str, start: BytePos, comments: &'a dyn Comments) -> Self {
        Self { text, start, comments }
    }

    pub fn module(&self, module: &swc_ast::Module) -> Module {
        let mut out = Module::default();
        self.items(&module.body, &mut out);
        out
    }

    fn items(&self, items: &[swc_ast::ModuleItem], out: &mut Module) {
        for item in items {
            match item {
                swc_ast::ModuleItem::ModuleDecl(decl) => {
                    out.is_module = true;
                    self.module_decl(decl, out);
                }
                swc_ast::ModuleItem::Stmt(swc_ast::Stmt::Decl(decl)) => self.statement_decl(decl, out),
                swc_ast::ModuleItem::Stmt(_) => {}
            }
        }
    }

    fn statement_decl(&self, decl: &swc_ast::Decl, out: &mut Module) {
        if let swc_ast::Decl::TsModule(module) = decl {
            // Declarations inside `declare global` are ambient, keep them.
            if module.global {
                if let Some(swc_ast::TsNamespaceBody::TsModuleBlock(block)) = &module.body {
                    let was_module = out.is_module;
                    self.items(&block.body, out);
                    out.is_module = was_module;
                }
            }
            return;
        }
        if let Some(declaration) = self.declaration(decl, &[]) {
            out.declarations.push(declaration);
        }
    }

    fn module_decl(&self, decl: &swc_ast::ModuleDecl, out: &mut Module) {
        match decl {
            swc_ast::ModuleDecl::Import(import) => {
                let specifier = str_value(&import.src);
                for binding in &import.specifiers {
                    let (local, imported) = match binding {
                        swc_ast::ImportSpecifier::Named(named) => {
                            let imported = named
                                .imported
                                .as_ref()
                                .map_or_else(|| named.local.sym.to_string(), export_name);
                            let imported = if imported == "default" {
                                ImportedName::Default
                            } else {
                                ImportedName::Named(imported)
                            };
                            (named.local.sym.to_string(), imported)
                        }
                        swc_ast::ImportSpecifier::Default(default) => {
                            (default.local.sym.to_string(), ImportedName::Default)
                        }
                        swc_ast::ImportSpecifier::Namespace(namespace) => {
                            (namespace.local.sym.to_string(), ImportedName::Namespace)
                        }
                    };
                    out.imports.push(ImportBinding {
                        local,
                        imported,
                        specifier: specifier.clone(),
                    });
                }
            }
            swc_ast::ModuleDecl::ExportDecl(export) => {
                if let Some(mut declaration) = self.declaration(&export.decl, &[export.span.lo]) {
                    declaration.exported = true;
                    out.declarations.push(declaration);
                }
            }
            swc_ast::ModuleDecl::ExportNamed(named) => {
                let specifier = named.src.as_deref().map(str_value);
                for binding in &named.specifiers {
                    // `export * as ns from "..."` introduces no type names.
                    let swc_ast::ExportSpecifier::Named(binding) = binding else {
                        continue;
                    };
                    let local = export_name(&binding.orig);
                    let exported = binding.exported.as_ref().map_or_else(|| local.clone(), export_name);
                    if specifier.is_none() && exported == "default" {
                        out.default_export = Some(local.clone());
                    }
                    out.exports.push(ExportBinding {
                        exported,
                        local,
                        specifier: specifier.clone(),
                    });
                }
            }
            swc_ast::ModuleDecl::ExportDefaultDecl(export) => {
                let positions = [export.span.lo];
                let declaration = match &export.decl {
                    swc_ast::DefaultDecl::Class(class) => Some(self.class_declaration(
                        class.ident.as_ref().map(|ident| ident.sym.to_string()),
                        &class.class,
                        &positions,
                    )),
                    swc_ast::DefaultDecl::TsInterfaceDecl(interface) => {
                        Some(self.interface_declaration(interface, &positions))
                    }
                    swc_ast::DefaultDecl::Fn(_) => None,
                };
                if let Some(mut declaration) = declaration {
                    declaration.exported = true;
                    declaration.default_export = true;
                    out.declarations.push(declaration);
                }
            }
            swc_ast::ModuleDecl::ExportDefaultExpr(export) => {
                if let swc_ast::Expr::Ident(ident) = &*export.expr {
                    out.default_export = Some(ident.sym.to_string());
                }
            }
            swc_ast::ModuleDecl::ExportAll(all) => out.star_exports.push(str_value(&all.src)),
            // `import a = require()`, `export = x`, `export as namespace X`
            _ => {}
        }
    }

    /// Interface, type alias, class or enum; `positions` are extra source
    /// positions (such as an `export` keyword) whose comments document it.
    fn declaration(&self, decl: &swc_ast::Decl, positions: &[BytePos]) -> Option<Declaration> {
        match decl {
            swc_ast::Decl::Class(class) => Some(self.class_declaration(
                Some(class.ident.sym.to_string()),
                &class.class,
                positions,
            )),
            swc_ast::Decl::TsInterface(interface) => Some(self.interface_declaration(interface, positions)),
            swc_ast::Decl::TsTypeAlias(alias) => {
                let mut declaration = Declaration::new(&alias.id.sym, DeclarationKind::TypeAlias(self.ty(&alias.type_ann)));
                declaration.type_params = self.type_params(alias.type_params.as_deref());
                declaration.docs = self.docs(positions, &[alias.span.lo]);
                Some(declaration)
            }
            swc_ast::Decl::TsEnum(decl) => {
                let members = decl
                    .members
                    .iter()
                    .map(|member| EnumMember {
                        name: match &member.id {
                            swc_ast::TsEnumMemberId::Ident(ident) => ident.sym.to_string(),
                            swc_ast::TsEnumMemberId::Str(s) => str_value(s),
                        },
                        value: member.init.as_deref().and_then(|init| self.enum_value(init)),
                    })
                    .collect();
                let mut declaration = Declaration::new(
                    &decl.id.sym,
                    DeclarationKind::Enum(EnumDecl {
                        is_const: decl.is_const,
                        members,
                    }),
                );
                declaration.docs = self.docs(positions, &[decl.span.lo]);
                Some(declaration)
            }
            _ => None,
        }
    }

    fn interface_declaration(&self, interface: &swc_ast::TsInterfaceDecl, positions: &[BytePos]) -> Declaration {
        let extends = interface
            .extends
            .iter()
            .filter_map(|base| {
                Some(TypeExpr::Reference {
                    name: dotted_name(&base.expr)?,
                    args: self.type_args(base.type_args.as_deref()),
                })
            })
            .collect();
        let mut declaration = Declaration::new(
            &interface.id.sym,
            DeclarationKind::Interface(InterfaceDecl {
                extends,
                members: self.members(&interface.body.body),
            }),
        );
        declaration.type_params = self.type_params(interface.type_params.as_deref());
        declaration.docs = self.docs(positions, &[interface.span.lo]);
        declaration
    }

    fn class_declaration(&self, name: Option<String>, class: &swc_ast::Class, positions: &[BytePos]) -> Declaration {
        let mut own: Vec<BytePos> = class.decorators.iter().map(|d| d.span.lo).collect();
        own.push(class.span.lo);

        let extends = class.super_class.as_deref().and_then(|base| {
            // A mixin call such as `extends Mixin(Base)` has no type name.
            Some(TypeExpr::Reference {
                name: dotted_name(base)?,
                args: self.type_args(class.super_type_params.as_deref()),
            })
        });
        let implements = class
            .implements
            .iter()
            .filter_map(|clause| {
                Some(TypeExpr::Reference {
                    name: dotted_name(&clause.expr)?,
                    args: self.type_args(clause.type_args.as_deref()),
                })
            })
            .collect();

        let mut properties = Vec::new();
        let mut methods = Vec::new();
        for member in &class.body {
            match member {
                swc_ast::ClassMember::Method(method) if matches!(method.kind, swc_ast::MethodKind::Method) => {
                    let Some(name) = self.prop_name(&method.key) else {
                        continue;
                    };
                    let function = &method.function;
                    let mut at: Vec<BytePos> = function.decorators.iter().map(|d| d.span.lo).collect();
                    at.push(method.span.lo);
                    methods.push(Method {
                        name,
                        docs: self.docs(&at, &[]),
                        decorators: function.decorators.iter().map(decorator).collect(),
                        signature: Signature {
                            type_params: self.type_params(function.type_params.as_deref()),
                            params: function.params.iter().filter_map(|p| self.param(p)).collect(),
                            ret: function.return_type.as_deref().map(|ann| self.ty(&ann.type_ann)),
                        },
                        is_static: method.is_static,
                    });
                }
                swc_ast::ClassMember::ClassProp(prop) if !prop.is_static => {
                    let Some(name) = self.prop_name(&prop.key) else {
                        continue;
                    };
                    let mut at: Vec<BytePos> = prop.decorators.iter().map(|d| d.span.lo).collect();
                    at.push(prop.span.lo);
                    properties.push(PropertySignature {
                        name,
                        ty: prop.type_ann.as_deref().map(|ann| self.ty(&ann.type_ann)),
                        optional: prop.is_optional,
                        readonly: prop.readonly,
                        comments: self.comments_at(&at),
                        camel_case: false,
                    });
                }
                _ => {}
            }
        }

        Declaration {
            name,
            kind: DeclarationKind::Class(ClassDecl {
                extends,
                implements,
                properties,
                methods,
            }),
            type_params: self.type_params(class.type_params.as_deref()),
            docs: self.docs(positions, &own),
            exported: false,
            default_export: false,
        }
    }

    fn enum_value(&self, init: &swc_ast::Expr) -> Option<Literal> {
        match init {
            swc_ast::Expr::Lit(swc_ast::Lit::Str(s)) => Some(Literal::String(str_value(s))),
            swc_ast::Expr::Lit(swc_ast::Lit::Num(n)) => Some(Literal::Number(self.text(n.span.lo, n.span.hi).to_string())),
            swc_ast::Expr::Unary(unary) if matches!(unary.op, swc_ast::UnaryOp::Minus) => match &*unary.arg {
                swc_ast::Expr::Lit(swc_ast::Lit::Num(n)) => {
                    Some(Literal::Number(format!("-{}", self.text(n.span.lo, n.span.hi))))
                }
                _ => None,
            },
            _ => None,
        }
    }

    // ---- members and signatures ----------------------------------------

    fn members(&self, elements: &[swc_ast::TsTypeElement]) -> Vec<Member> {
        elements.iter().filter_map(|element| self.member(element)).collect()
    }

    fn member(&self, element: &swc_ast::TsTypeElement) -> Option<Member> {
        use swc_ast::TsTypeElement as E;
        Some(match element {
            E::TsCallSignatureDecl(call) => Member::Call(self.signature(
                call.type_params.as_deref(),
                &call.params,
                call.type_ann.as_deref(),
            )),
            E::TsConstructSignatureDecl(construct) => Member::Construct(self.signature(
                construct.type_params.as_deref(),
                &construct.params,
                construct.type_ann.as_deref(),
            )),
            E::TsPropertySignature(property) => Member::Property(PropertySignature {
                name: self.key_name(&property.key, property.computed)?,
                ty: property.type_ann.as_deref().map(|ann| self.ty(&ann.type_ann)),
                optional: property.optional,
                readonly: property.readonly,
                comments: self.comments_at(&[property.span.lo]),
                camel_case: false,
            }),
            E::TsGetterSignature(getter) => Member::Property(PropertySignature {
                name: self.key_name(&getter.key, getter.computed)?,
                ty: getter.type_ann.as_deref().map(|ann| self.ty(&ann.type_ann)),
                optional: false,
                readonly: true,
                comments: self.comments_at(&[getter.span.lo]),
                camel_case: false,
            }),
            E::TsSetterSignature(setter) => Member::Method {
                name: self.key_name(&setter.key, setter.computed)?,
                optional: false,
                signature: Signature {
                    type_params: Vec::new(),
                    params: self.fn_params(std::slice::from_ref(&setter.param)),
                    ret: None,
                },
            },
            E::TsMethodSignature(method) => Member::Method {
                name: self.key_name(&method.key, method.computed)?,
                optional: method.optional,
                signature: self.signature(method.type_params.as_deref(), &method.params, method.type_ann.as_deref()),
            },
            E::TsIndexSignature(index) => {
                let key = index.params.first().map(|param| self.fn_params(std::slice::from_ref(param)));
                let key = key.and_then(|mut params| params.pop());
                Member::Index {
                    key_name: key.as_ref().map(|p| p.name.clone()).unwrap_or_default(),
                    key: key
                        .and_then(|p| p.ty)
                        .unwrap_or(TypeExpr::Keyword(Keyword::String)),
                    value: index
                        .type_ann
                        .as_deref()
                        .map_or(TypeExpr::Keyword(Keyword::Any), |ann| self.ty(&ann.type_ann)),
                }
            }
        })
    }

    fn signature(
        &self,
        type_params: Option<&swc_ast::TsTypeParamDecl>,
        params: &[swc_ast::TsFnParam],
        ret: Option<&swc_ast::TsTypeAnn>,
    ) -> Signature {
        Signature {
            type_params: self.type_params(type_params),
            params: self.fn_params(params),
            ret: ret.map(|ann| self.ty(&ann.type_ann)),
        }
    }

    fn fn_params(&self, params: &[swc_ast::TsFnParam]) -> Vec<Parameter> {
        params
            .iter()
            .map(|param| match param {
                swc_ast::TsFnParam::Ident(ident) => self.binding(ident),
                swc_ast::TsFnParam::Array(array) => {
                    self.destructured(array.span.lo, array.span.hi, array.type_ann.as_deref())
                }
                swc_ast::TsFnParam::Rest(rest) => self.rest(rest),
                swc_ast::TsFnParam::Object(object) => {
                    self.destructured(object.span.lo, object.span.hi, object.type_ann.as_deref())
                }
            })
            .filter(|param| param.name != "this")
            .collect()
    }

    /// A method parameter with its leading comments, `None` for `this`.
    fn param(&self, param: &swc_ast::Param) -> Option<Parameter> {
        let mut lowered = self.pattern(&param.pat);
        if lowered.name == "this" {
            return None;
        }
        let mut at: Vec<BytePos> = param.decorators.iter().map(|d| d.span.lo).collect();
        at.push(param.span.lo);
        at.push(param.pat.span().lo);
        lowered.comments = self.comments_at(&at);
        Some(lowered)
    }

    fn pattern(&self, pat: &swc_ast::Pat) -> Parameter {
        match pat {
            swc_ast::Pat::Ident(ident) => self.binding(ident),
            swc_ast::Pat::Assign(assign) => {
                let mut param = self.pattern(&assign.left);
                param.has_initializer = true;
                param
            }
            swc_ast::Pat::Rest(rest) => self.rest(rest),
            swc_ast::Pat::Object(object) => self.destructured(object.span.lo, object.span.hi, object.type_ann.as_deref()),
            swc_ast::Pat::Array(array) => self.destructured(array.span.lo, array.span.hi, array.type_ann.as_deref()),
            other => {
                let span = other.span();
                self.destructured(span.lo, span.hi, None)
            }
        }
    }

    fn binding(&self, ident: &swc_ast::BindingIdent) -> Parameter {
        Parameter {
            name: ident.id.sym.to_string(),
            ty: ident.type_ann.as_deref().map(|ann| self.ty(&ann.type_ann)),
            optional: ident.id.optional,
            rest: false,
            has_initializer: false,
            comments: Vec::new(),
        }
    }

    fn rest(&self, rest: &swc_ast::RestPat) -> Parameter {
        let mut param = self.pattern(&rest.arg);
        param.rest = true;
        if let Some(ann) = rest.type_ann.as_deref() {
            param.ty = Some(self.ty(&ann.type_ann));
        }
        param
    }

    /// Destructuring pattern, named by its source text.
    fn destructured(&self, lo: BytePos, hi: BytePos, ann: Option<&swc_ast::TsTypeAnn>) -> Parameter {
        let end = ann.map_or(hi, |ann| ann.span.lo);
        Parameter {
            name: self.text(lo, end).trim().trim_end_matches('?').trim_end().to_string(),
            ty: ann.map(|ann| self.ty(&ann.type_ann)),
            optional: false,
            rest: false,
            has_initializer: false,
            comments: Vec::new(),
        }
    }

    fn type_params(&self, decl: Option<&swc_ast::TsTypeParamDecl>) -> Vec<TypeParam> {
        decl.map(|decl| decl.params.iter().map(|param| self.type_param(param)).collect())
            .unwrap_or_default()
    }

    fn type_param(&self, param: &swc_ast::TsTypeParam) -> TypeParam {
        TypeParam {
            name: param.name.sym.to_string(),
            constraint: param.constraint.as_deref().map(|ty| self.ty(ty)),
            default: param.default.as_deref().map(|ty| self.ty(ty)),
        }
    }

    fn type_args(&self, args: Option<&swc_ast::TsTypeParamInstantiation>) -> Vec<TypeExpr> {
        args.map(|args| args.params.iter().map(|ty| self.ty(ty)).collect())
            .unwrap_or_default()
    }

    // ---- types ---------------------------------------------------------

    pub fn ty(&self, ty: &swc_ast::TsType) -> TypeExpr {
        use swc_ast::TsType as T;
        match ty {
            T::TsKeywordType(keyword) => TypeExpr::Keyword(keyword_of(keyword.kind)),
            T::TsThisType(_) => TypeExpr::Keyword(Keyword::This),
            T::TsFnOrConstructorType(swc_ast::TsFnOrConstructorType::TsFnType(function)) => TypeExpr::Function {
                signature: Box::new(Signature {
                    type_params: self.type_params(function.type_params.as_deref()),
                    params: self.fn_params(&function.params),
                    ret: Some(self.ty(&function.type_ann.type_ann)),
                }),
                constructor: false,
            },
            T::TsFnOrConstructorType(swc_ast::TsFnOrConstructorType::TsConstructorType(constructor)) => {
                TypeExpr::Function {
                    signature: Box::new(Signature {
                        type_params: self.type_params(constructor.type_params.as_deref()),
                        params: self.fn_params(&constructor.params),
                        ret: Some(self.ty(&constructor.type_ann.type_ann)),
                    }),
                    constructor: true,
                }
            }
            T::TsTypeRef(reference) => TypeExpr::Reference {
                name: entity_name(&reference.type_name),
                args: self.type_args(reference.type_params.as_deref()),
            },
            T::TsTypeQuery(query) => match &query.expr_name {
                swc_ast::TsTypeQueryExpr::TsEntityName(name) => TypeExpr::Query(entity_name(name)),
                swc_ast::TsTypeQueryExpr::Import(import) => self.import_type(import),
            },
            T::TsTypeLit(literal) => TypeExpr::Object(self.members(&literal.members)),
            T::TsArrayType(array) => TypeExpr::Array(Box::new(self.ty(&array.elem_type))),
            T::TsTupleType(tuple) => TypeExpr::Tuple(tuple.elem_types.iter().map(|e| self.tuple_element(e)).collect()),
            T::TsOptionalType(optional) => self.ty(&optional.type_ann),
            T::TsRestType(rest) => self.ty(&rest.type_ann),
            T::TsUnionOrIntersectionType(swc_ast::TsUnionOrIntersectionType::TsUnionType(union)) => {
                TypeExpr::Union(union.types.iter().map(|ty| self.ty(ty)).collect())
            }
            T::TsUnionOrIntersectionType(swc_ast::TsUnionOrIntersectionType::TsIntersectionType(intersection)) => {
                TypeExpr::Intersection(intersection.types.iter().map(|ty| self.ty(ty)).collect())
            }
            T::TsConditionalType(conditional) => TypeExpr::Conditional {
                check: Box::new(self.ty(&conditional.check_type)),
                extends: Box::new(self.ty(&conditional.extends_type)),
                then: Box::new(self.ty(&conditional.true_type)),
                otherwise: Box::new(self.ty(&conditional.false_type)),
            },
            T::TsInferType(infer) => TypeExpr::Infer(infer.type_param.name.sym.to_string()),
            T::TsParenthesizedType(inner) => self.ty(&inner.type_ann),
            T::TsTypeOperator(operator) => TypeExpr::Operator {
                op: match operator.op {
                    swc_ast::TsTypeOperatorOp::KeyOf => TypeOperator::Keyof,
                    swc_ast::TsTypeOperatorOp::Unique => TypeOperator::Unique,
                    swc_ast::TsTypeOperatorOp::ReadOnly => TypeOperator::Readonly,
                },
                ty: Box::new(self.ty(&operator.type_ann)),
            },
            T::TsIndexedAccessType(access) => TypeExpr::IndexedAccess {
                object: Box::new(self.ty(&access.obj_type)),
                index: Box::new(self.ty(&access.index_type)),
            },
            T::TsMappedType(mapped) => TypeExpr::Mapped {
                param: mapped.type_param.name.sym.to_string(),
                constraint: Box::new(
                    mapped
                        .type_param
                        .constraint
                        .as_deref()
                        .map_or(TypeExpr::Keyword(Keyword::Any), |ty| self.ty(ty)),
                ),
                value: mapped.type_ann.as_deref().map(|ty| Box::new(self.ty(ty))),
                optional: matches!(
                    mapped.optional,
                    Some(swc_ast::TruePlusMinus::True | swc_ast::TruePlusMinus::Plus)
                ),
            },
            T::TsLitType(literal) => match &literal.lit {
                // The literal type span includes a leading `-`.
                swc_ast::TsLit::Number(_) | swc_ast::TsLit::BigInt(_) => TypeExpr::Literal(Literal::Number(
                    self.text(literal.span.lo, literal.span.hi).replace(char::is_whitespace, ""),
                )),
                swc_ast::TsLit::Str(s) => TypeExpr::Literal(Literal::String(str_value(s))),
                swc_ast::TsLit::Bool(b) => TypeExpr::Literal(Literal::Boolean(b.value)),
                swc_ast::TsLit::Tpl(_) => {
                    TypeExpr::TemplateLiteral(self.text(literal.span.lo, literal.span.hi).to_string())
                }
            },
            // Type predicates reduce to what the function actually returns.
            T::TsTypePredicate(predicate) => TypeExpr::Keyword(if predicate.asserts {
                Keyword::Void
            } else {
                Keyword::Boolean
            }),
            T::TsImportType(import) => self.import_type(import),
        }
    }

    fn import_type(&self, import: &swc_ast::TsImportType) -> TypeExpr {
        TypeExpr::Import {
            module: str_value(&import.arg),
            qualifier: import.qualifier.as_ref().map(entity_name).unwrap_or_default(),
            args: self.type_args(import.type_args.as_deref()),
        }
    }

    fn tuple_element(&self, element: &swc_ast::TsTupleElement) -> TupleElement {
        let mut name = None;
        let mut optional = false;
        let mut rest = false;
        match &element.label {
            Some(swc_ast::Pat::Ident(ident)) => {
                name = Some(ident.id.sym.to_string());
                optional = ident.id.optional;
            }
            Some(swc_ast::Pat::Rest(label)) => {
                rest = true;
                if let swc_ast::Pat::Ident(ident) = &*label.arg {
                    name = Some(ident.id.sym.to_string());
                }
            }
            _ => {}
        }
        let ty = match &*element.ty {
            swc_ast::TsType::TsOptionalType(inner) => {
                optional = true;
                self.ty(&inner.type_ann)
            }
            swc_ast::TsType::TsRestType(inner) => {
                rest = true;
                self.ty(&inner.type_ann)
            }
            other => self.ty(other),
        };
        TupleElement {
            name,
            ty,
            optional,
            rest,
            camel_case: false,
        }
    }

    // ---- names, comments and source text -------------------------------

    fn prop_name(&self, key: &swc_ast::PropName) -> Option<String> {
        Some(match key {
            swc_ast::PropName::Ident(ident) => ident.sym.to_string(),
            swc_ast::PropName::Str(s) => str_value(s),
            swc_ast::PropName::Num(n) => self.text(n.span.lo, n.span.hi).to_string(),
            swc_ast::PropName::Computed(computed) => self.text(computed.span.lo, computed.span.hi).to_string(),
            swc_ast::PropName::BigInt(b) => self.text(b.span.lo, b.span.hi).to_string(),
        })
    }

    fn key_name(&self, key: &swc_ast::Expr, computed: bool) -> Option<String> {
        if computed {
            let span = key.span();
            return Some(format!("[{}]", self.text(span.lo, span.hi)));
        }
        match key {
            swc_ast::Expr::Ident(ident) => Some(ident.sym.to_string()),
            swc_ast::Expr::Lit(swc_ast::Lit::Str(s)) => Some(str_value(s)),
            swc_ast::Expr::Lit(swc_ast::Lit::Num(n)) => Some(self.text(n.span.lo, n.span.hi).to_string()),
            _ => None,
        }
    }

    fn text(&self, lo: BytePos, hi: BytePos) -> &'a str {
        let lo = lo.0.saturating_sub(self.start.0) as usize;
        let hi = hi.0.saturating_sub(self.start.0) as usize;
        self.text.get(lo..hi).unwrap_or_default()
    }

    /// Leading comments of every position, in source order.
    fn comments_at(&self, positions: &[BytePos]) -> Vec<Comment> {
        let mut positions = positions.to_vec();
        positions.sort();
        positions.dedup();
        positions
            .into_iter()
            .flat_map(|pos| self.comments.get_leading(pos).unwrap_or_default())
            .map(|comment| lower_comment(&comment))
            .collect()
    }

    fn docs(&self, outer: &[BytePos], own: &[BytePos]) -> Vec<Comment> {
        let positions: Vec<BytePos> = outer.iter().chain(own).copied().collect();
        self.comments_at(&positions)
            .into_iter()
            .filter(Comment::is_jsdoc)
            .collect()
    }
}

fn lower_comment(comment: &SwcComment) -> Comment {
    match comment.kind {
        SwcCommentKind::Line => Comment::line(&comment.text),
        SwcCommentKind::Block => Comment {
            kind: CommentKind::Block,
            text: format!("/*{}*/", comment.text),
        },
    }
}

fn keyword_of(kind: swc_ast::TsKeywordTypeKind) -> Keyword {
    use swc_ast::TsKeywordTypeKind as K;
    match kind {
        K::TsAnyKeyword | K::TsIntrinsicKeyword => Keyword::Any,
        K::TsUnknownKeyword => Keyword::Unknown,
        K::TsNumberKeyword => Keyword::Number,
        K::TsObjectKeyword => Keyword::Object,
        K::TsBooleanKeyword => Keyword::Boolean,
        K::TsBigIntKeyword => Keyword::BigInt,
        K::TsStringKeyword => Keyword::String,
        K::TsSymbolKeyword => Keyword::Symbol,
        K::TsVoidKeyword => Keyword::Void,
        K::TsUndefinedKeyword => Keyword::Undefined,
        K::TsNullKeyword => Keyword::Null,
        K::TsNeverKeyword => Keyword::Never,
    }
}

fn decorator(decorator: &swc_ast::Decorator) -> Decorator {
    let expr = match &*decorator.expr {
        swc_ast::Expr::Call(call) => match &call.callee {
            swc_ast::Callee::Expr(callee) => &**callee,
            _ => return Decorator { name: String::new() },
        },
        other => other,
    };
    Decorator {
        name: dotted_name(expr).map(|path| path.join(".")).unwrap_or_default(),
    }
}

/// `a.b.C` of an identifier or member chain.
fn dotted_name(expr: &swc_ast::Expr) -> Option<Vec<String>> {
    match expr {
        swc_ast::Expr::Ident(ident) => Some(vec![ident.sym.to_string()]),
        swc_ast::Expr::Member(member) => {
            let swc_ast::MemberProp::Ident(prop) = &member.prop else {
                return None;
            };
            let mut path = dotted_name(&member.obj)?;
            path.push(prop.sym.to_string());
            Some(path)
        }
        _ => None,
    }
}

fn entity_name(name: &swc_ast::TsEntityName) -> Vec<String> {
    match name {
        swc_ast::TsEntityName::Ident(ident) => vec![ident.sym.to_string()],
        swc_ast::TsEntityName::TsQualifiedName(qualified) => {
            let mut path = entity_name(&qualified.left);
            path.push(qualified.right.sym.to_string());
            path
        }
    }
}

fn export_name(name: &swc_ast::ModuleExportName) -> String {
    match name {
        swc_ast::ModuleExportName::Ident(ident) => ident.sym.to_string(),
        swc_ast::ModuleExportName::Str(s) => str_value(s),
    }
}

fn str_value(s: &swc_ast::Str) -> String {
    String::from_utf8_lossy(s.value.as_bytes()).to_string()
}

#[cfg(test)]
mod tests {
    use crate::ast::*;
    use crate::parser::AstParser;
    use std::path::Path;

    fn parse(source: &str) -> Module {
        AstParser::parse_source(Path::new("test.ts"), source).unwrap().module
    }

    fn parse_type(source: &str) -> TypeExpr {
        let module = parse(&format!("type T = {};", source));
        match module.declarations.into_iter().next().map(|d| d.kind) {
            Some(DeclarationKind::TypeAlias(ty)) => ty,
            other => panic!("expected type alias, got {:?}", other),
        }
    }

    fn find<'m>(module: &'m Module, name: &str) -> &'m Declaration {
        module
            .declarations
            .iter()
            .find(|d| d.is_named(name))
            .unwrap_or_else(|| panic!("missing declaration {}", name))
    }

    #[test]
    fn test_interface_members_and_comments() {
        let module = parse(
            r#"
            interface IFavItems {
              //收藏ID
              id: number
              /**
               * 封面
               */
              cover?: string;
              tags: string[],
              get(key: string): void
              [key: string]: unknown
            }
            "#,
        );
        let decl = find(&module, "IFavItems");
        let DeclarationKind::Interface(interface) = &decl.kind else {
            panic!("expected interface");
        };
        assert_eq!(interface.members.len(), 5);
        let Member::Property(id) = &interface.members[0] else {
            panic!("expected property");
        };
        assert_eq!(id.comments[0].text, "//收藏ID");
        assert_eq!(id.ty, Some(TypeExpr::Keyword(Keyword::Number)));
        let Member::Property(cover) = &interface.members[1] else {
            panic!("expected property");
        };
        assert!(cover.optional);
        assert!(cover.comments[0].is_jsdoc());
        assert_eq!(cover.comments[0].inner_text(), "封面");
        assert!(matches!(interface.members[3], Member::Method { .. }));
        assert!(matches!(
            &interface.members[4],
            Member::Index { key_name, .. } if key_name == "key"
        ));
        assert!(!module.is_module);
    }

    #[test]
    fn test_class_with_decorated_documented_methods() {
        let module = parse(
            r#"
            import { Get } from '@nestjs/common';

            /**
             * @tsDoc
             * 用户相关controller
             */
            @Controller({ path: 'users', version: '1' })
            export class UserController extends Base<User> implements IController {
              private readonly cache = new Map<string, number>()
              static instances = 0
              label: string = `user-${1}`
              #secret = /[{]/
              handler = (value: number) => value * 2

              constructor(private readonly service: UserService) {
                super();
              }

              /**
               * @tsDoc
               * 获取用户信息
               */
              @Get(':id')
              async getUserInfo(
                //用户id
                uid: number,
                isVip?: boolean,
                { page }: Paging = {},
              ): Promise<IFavItems> {
                if (uid > 0) { return this.service.find(uid) }
                return {} as any
              }

              get total(): number { return 1 }
              private helper<T>(this: UserController, value: T): T { return value }
            }
            "#,
        );
        assert!(module.is_module);
        let decl = find(&module, "UserController");
        assert!(decl.exported);
        assert_eq!(decl.docs.len(), 1);
        let class = decl.as_class().unwrap();
        assert_eq!(class.extends.as_ref().unwrap().to_string(), "Base<User>");
        assert_eq!(class.implements.len(), 1);
        let names: Vec<&str> = class.properties.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["cache", "label", "handler"]);

        assert_eq!(class.methods.len(), 2);
        let method = &class.methods[0];
        assert_eq!(method.name, "getUserInfo");
        assert_eq!(method.decorators[0].name, "Get");
        assert_eq!(method.docs.len(), 1);
        assert_eq!(method.signature.params.len(), 3);
        assert_eq!(method.signature.params[0].comments[0].text, "//用户id");
        assert!(method.signature.params[1].optional);
        assert_eq!(method.signature.params[2].name, "{ page }");
        assert!(method.signature.params[2].has_initializer);
        assert_eq!(method.signature.ret.as_ref().unwrap().to_string(), "Promise<IFavItems>");

        let helper = &class.methods[1];
        assert_eq!(helper.signature.type_params[0].name, "T");
        assert_eq!(helper.signature.params.len(), 1);
    }

    #[test]
    fn test_decorator_names_are_dotted_paths() {
        let module = parse(
            r#"
            export class Api {
              /** @tsDoc */
              @Http.Post<Body>('create')
              @Auth
              create(@Body() body: Body): void {}
            }
            "#,
        );
        let class = find(&module, "Api").as_class().unwrap();
        let names: Vec<&str> = class.methods[0].decorators.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["Http.Post", "Auth"]);
        assert_eq!(class.methods[0].docs.len(), 1);
        assert!(class.methods[0].signature.params[0].comments.is_empty());
    }

    #[test]
    fn test_imports_and_exports() {
        let module = parse(
            r#"
            import Default, { A, B as C, type D } from "./a";
            import * as models from './models';
            import type { E } from './e';
            import './side-effect';
            export { F as G } from './f';
            export * from './all';
            export { C };
            export default Default;
            "#,
        );
        let locals: Vec<&str> = module.imports.iter().map(|i| i.local.as_str()).collect();
        assert_eq!(locals, vec!["Default", "A", "C", "D", "models", "E"]);
        assert_eq!(module.imports[0].imported, ImportedName::Default);
        assert_eq!(module.imports[2].imported, ImportedName::Named("B".to_string()));
        assert_eq!(module.imports[4].imported, ImportedName::Namespace);
        assert_eq!(module.exports[0].local, "F");
        assert_eq!(module.exports[0].exported, "G");
        assert_eq!(module.exports[0].specifier.as_deref(), Some("./f"));
        assert_eq!(module.star_exports, vec!["./all".to_string()]);
        assert_eq!(module.default_export.as_deref(), Some("Default"));
    }

    #[test]
    fn test_skips_functions_and_statements() {
        let module = parse(
            r#"
            const regex = /[{]/;
            function helper(a: number) {
              const inner = { x: 1 };
              return inner
            }
            let value = helper(1)
              .toString()
            namespace Legacy { export interface Hidden {} }
            declare global { interface Window { app: string } }
            export type Id = string | number;
            enum Color { Red, Green = 'g', Blue = -1, Computed = 1 << 2 }
            "#,
        );
        assert!(module.declarations.iter().all(|d| !d.is_named("Hidden")));
        assert!(module.declarations.iter().any(|d| d.is_named("Window")));
        let id = find(&module, "Id");
        assert!(id.exported);
        let color = find(&module, "Color");
        let DeclarationKind::Enum(color) = &color.kind else {
            panic!("expected enum");
        };
        assert_eq!(color.members.len(), 4);
        assert_eq!(color.members[1].value, Some(Literal::String("g".to_string())));
        assert_eq!(color.members[2].value, Some(Literal::Number("-1".to_string())));
        assert_eq!(color.members[3].value, None);
    }

    #[test]
    fn test_type_shapes() {
        assert_eq!(parse_type("A | B & C[]").to_string(), "A | B & C[]");
        assert!(matches!(parse_type("(A | B)[]"), TypeExpr::Array(_)));
        assert!(matches!(
            parse_type("T extends Promise<infer U> ? U : T"),
            TypeExpr::Conditional { .. }
        ));
        assert!(matches!(
            parse_type("(a: number, b?: string) => void"),
            TypeExpr::Function { constructor: false, .. }
        ));
        assert!(matches!(
            parse_type("{ [K in keyof T]?: T[K] }"),
            TypeExpr::Mapped { optional: true, .. }
        ));
        assert!(matches!(parse_type("keyof typeof value"), TypeExpr::Operator { .. }));
        assert_eq!(
            parse_type("[id: number, name?: string, ...rest: boolean[]]").to_string(),
            "[id: number, name?: string, ...rest: boolean[]]"
        );
        assert_eq!(parse_type("[number, string?]").to_string(), "[number, string?]");
        assert_eq!(parse_type("-1 | 'a' | true").to_string(), "-1 | \"a\" | true");
    }

    #[test]
    fn test_import_type_reference() {
        let ty = parse_type("import('./models/user').User<string>[]");
        let TypeExpr::Array(inner) = ty else {
            panic!("expected array");
        };
        assert_eq!(
            *inner,
            TypeExpr::Import {
                module: "./models/user".to_string(),
                qualifier: vec!["User".to_string()],
                args: vec![TypeExpr::Keyword(Keyword::String)],
            }
        );
    }

    #[test]
    fn test_unnamed_default_class() {
        let module = parse("export default class { id: number }");
        assert_eq!(module.declarations.len(), 1);
        assert_eq!(module.declarations[0].name, None);
        assert!(module.declarations[0].default_export);
    }

    #[test]
    fn test_declaration_files_parse() {
        let parsed = AstParser::parse_source(
            Path::new("lib.d.ts"),
            "declare function now(): Date;\ninterface Date { getTime(): number }\n",
        )
        .unwrap();
        assert_eq!(parsed.module.declarations.len(), 1);
        assert!(!parsed.module.is_module);
    }
}
