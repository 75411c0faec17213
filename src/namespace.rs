//! Synthetic namespace: the declarations one annotated class contributes to
//! schema extraction.
//!
//! For every annotated method the namespace holds an interface `$<method>`
//! with its parameter tuple and unwrapped return type, an interface
//! `$methods` indexing them, and the closure of every declaration those
//! types reference.

use crate::ast::{
    Comment, CommentKind, DeclId, DeclKind, Declaration, DeclarationKind, InterfaceDecl, Keyword,
    Member, Method, PropertySignature, TupleElement, TypeExpr,
};
use crate::error::Result;
use crate::project::SourceModel;
use crate::type_resolver::{collect_type_deps, Root};
use log::debug;

/// Name of the interface mapping method names to their `$<method>` shapes.
pub const METHODS_INTERFACE: &str = "$methods";

/// Generic wrapper marking a property whose example keys are camelCased.
pub const CAMEL_CASE_MARKER: &str = "CamelCase";

/// In-memory module of rewritten and copied declarations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SyntheticNamespace {
    /// Name of the class the namespace was built for.
    pub name: String,
    pub declarations: Vec<Declaration>,
}

impl SyntheticNamespace {
    /// Finds a declaration by name, interface first, then type alias, class
    /// and enum.
    pub fn get(&self, name: &str) -> Option<&Declaration> {
        DeclKind::LOOKUP_ORDER.iter().find_map(|kind| {
            self.declarations
                .iter()
                .find(|d| d.is_named(name) && d.kind_tag() == *kind)
        })
    }

    pub fn method_interface_name(method: &str) -> String {
        format!("${}", method)
    }
}

/// Builds a [`SyntheticNamespace`] per annotated class.
pub struct NamespaceBuilder<'m, M: ?Sized> {
    model: &'m M,
}

impl<'m, M: SourceModel + ?Sized> NamespaceBuilder<'m, M> {
    pub fn new(model: &'m M) -> Self {
        Self { model }
    }

    /// Builds the namespace of class `class` restricted to the methods at
    /// `methods` (indices into the class's method list).
    ///
    /// # Errors
    ///
    /// Propagates closure resolution errors.
    pub fn build(&self, class: DeclId, methods: &[usize]) -> Result<SyntheticNamespace> {
        let declaration = self.model.declaration(class);
        let name = declaration.name.clone().unwrap_or_default();
        let Some(class_decl) = declaration.as_class() else {
            return Ok(SyntheticNamespace {
                name,
                declarations: Vec::new(),
            });
        };
        let class_scope: Vec<String> = declaration.type_params.iter().map(|p| p.name.clone()).collect();
        let methods: Vec<&Method> = methods.iter().filter_map(|&i| class_decl.methods.get(i)).collect();

        let mut namespace = SyntheticNamespace {
            name,
            declarations: Vec::new(),
        };
        for method in &methods {
            namespace.declarations.push(method_interface(method));
        }
        namespace.declarations.push(methods_interface(&methods));

        // Return types first, then every parameter type.
        let method_scope = |method: &Method| {
            let mut scope = class_scope.clone();
            scope.extend(method.signature.type_params.iter().map(|p| p.name.clone()));
            scope
        };
        let mut roots: Vec<Option<Root<'_>>> = methods
            .iter()
            .map(|method| {
                method.signature.ret.as_ref().map(|ty| Root::Type {
                    file: class.file,
                    ty,
                    scope: method_scope(method),
                })
            })
            .collect();
        for method in &methods {
            for param in &method.signature.params {
                roots.push(param.ty.as_ref().map(|ty| Root::Type {
                    file: class.file,
                    ty,
                    scope: method_scope(method),
                }));
            }
        }

        let closure = collect_type_deps(&roots, self.model)?;
        debug!(
            "Namespace {}: {} methods, {} dependencies",
            namespace.name,
            methods.len(),
            closure.len()
        );
        for id in closure {
            namespace.declarations.push(emit(self.model.declaration(id)));
        }
        Ok(namespace)
    }
}

/// `interface $<method> { params: [..]; return: Awaited<..> }`
fn method_interface(method: &Method) -> Declaration {
    let elements = method
        .signature
        .params
        .iter()
        .map(|param| TupleElement {
            name: None,
            ty: param.ty.clone().unwrap_or(TypeExpr::Keyword(Keyword::Any)),
            optional: param.optional,
            rest: false,
            camel_case: false,
        })
        .collect();
    let ret = method
        .signature
        .ret
        .clone()
        .unwrap_or_else(|| TypeExpr::Object(Vec::new()));

    let members = vec![
        PropertySignature::new("params", TypeExpr::Tuple(elements)),
        PropertySignature::new("return", TypeExpr::Awaited(Box::new(ret))),
    ];
    interface(
        &SyntheticNamespace::method_interface_name(&method.name),
        members.iter().map(normalize_property).collect(),
    )
}

fn methods_interface(methods: &[&Method]) -> Declaration {
    let members = methods
        .iter()
        .map(|method| {
            PropertySignature::new(
                &method.name,
                TypeExpr::reference(&SyntheticNamespace::method_interface_name(&method.name)),
            )
        })
        .collect();
    interface(METHODS_INTERFACE, members)
}

fn interface(name: &str, properties: Vec<PropertySignature>) -> Declaration {
    let mut declaration = Declaration::new(
        name,
        DeclarationKind::Interface(InterfaceDecl {
            extends: Vec::new(),
            members: properties.into_iter().map(Member::Property).collect(),
        }),
    );
    declaration.exported = true;
    declaration
}

/// Interfaces and object type aliases are rebuilt from their properties;
/// everything else is copied as is.
fn emit(declaration: &Declaration) -> Declaration {
    let (extends, members) = match &declaration.kind {
        DeclarationKind::Interface(interface) => (interface.extends.clone(), &interface.members),
        DeclarationKind::TypeAlias(TypeExpr::Object(members)) => (Vec::new(), members),
        _ => return declaration.clone(),
    };
    let members = members
        .iter()
        .filter_map(|member| match member {
            Member::Property(property) => Some(Member::Property(normalize_property(property))),
            _ => None,
        })
        .collect();
    Declaration {
        name: declaration.name.clone(),
        kind: DeclarationKind::Interface(InterfaceDecl { extends, members }),
        type_params: declaration.type_params.clone(),
        docs: declaration.docs.clone(),
        exported: true,
        default_export: false,
    }
}

/// Keeps the first leading comment in block form and applies the camelCase
/// marker rewrite to the property type.
fn normalize_property(property: &PropertySignature) -> PropertySignature {
    let mut property = property.clone();
    property.comments = property.comments.first().map(block_comment).into_iter().collect();
    if let Some(ty) = &mut property.ty {
        if rewrite_type(ty) {
            property.camel_case = true;
        }
    }
    property
}

fn block_comment(comment: &Comment) -> Comment {
    match comment.kind {
        CommentKind::Line => Comment::block(format!(
            "/**\n * {}\n */",
            comment.text.strip_prefix("//").unwrap_or(&comment.text)
        )),
        CommentKind::Block => comment.clone(),
    }
}

/// Unwraps every `CamelCase<T>` in `ty`, returning whether one was found.
/// Properties of nested object types are normalized on their own.
fn rewrite_type(ty: &mut TypeExpr) -> bool {
    if let TypeExpr::Reference { name, args } = ty {
        if name.len() == 1 && name[0] == CAMEL_CASE_MARKER && args.len() == 1 {
            *ty = args.remove(0);
            rewrite_type(ty);
            return true;
        }
    }
    // Each tuple element carries its own marker.
    if let TypeExpr::Tuple(elements) = ty {
        for element in elements.iter_mut() {
            element.camel_case |= rewrite_type(&mut element.ty);
        }
        return false;
    }
    if let TypeExpr::Object(members) = ty {
        for member in members.iter_mut() {
            match member {
                Member::Property(property) => *property = normalize_property(property),
                other => other.for_each_type_mut(&mut |t| {
                    rewrite_type(t);
                }),
            }
        }
        return false;
    }
    let mut found = false;
    ty.for_each_child_mut(&mut |child| found |= rewrite_type(child));
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::AstParser;
    use crate::project::Project;
    use pretty_assertions::assert_eq;
    use std::path::Path;

    fn project(files: &[(&str, &str)]) -> Project {
        let mut project = Project::new("/p");
        for (path, source) in files {
            project.add_parsed(AstParser::parse_source(Path::new(path), source).unwrap(), true);
        }
        project
    }

    fn properties(declaration: &Declaration) -> Vec<&PropertySignature> {
        let DeclarationKind::Interface(interface) = &declaration.kind else {
            panic!("{:?} is not an interface", declaration.name);
        };
        interface
            .members
            .iter()
            .filter_map(|m| match m {
                Member::Property(p) => Some(p),
                _ => None,
            })
            .collect()
    }

    const CONTROLLER: &str = r#"
        import { Profile } from './profile';

        type CamelCase<T> = T;

        /** @tsDoc */
        export class UserController {
          /** @tsDoc */
          async getUser(id: number, active?: boolean): Promise<User> { return null as any }

          /** @tsDoc */
          update(body: CamelCase<Profile>, raw) {}

          helper(): Internal { return null as any }
        }

        interface User {
          //user id
          id: number
          role: Role
          settings: {
            // theme name
            theme: string
            nested: CamelCase<{ dark_mode: boolean }>
          }
          greet(): void
        }

        enum Role { Admin = 'admin' }

        interface Internal {}
    "#;

    fn namespace() -> SyntheticNamespace {
        let project = project(&[
            ("/p/controller.ts", CONTROLLER),
            ("/p/profile.ts", "export type Profile = { first_name: string }"),
        ]);
        let class = project
            .file(0)
            .module
            .declarations
            .iter()
            .position(|d| d.is_named("UserController"))
            .unwrap();
        NamespaceBuilder::new(&project)
            .build(DeclId { file: 0, index: class }, &[0, 1])
            .unwrap()
    }

    #[test]
    fn test_method_interfaces() {
        let namespace = namespace();
        assert_eq!(namespace.name, "UserController");

        let get_user = properties(namespace.get("$getUser").unwrap());
        assert_eq!(get_user[0].ty.as_ref().unwrap().to_string(), "[number, boolean?]");
        assert_eq!(get_user[1].ty.as_ref().unwrap().to_string(), "Awaited<Promise<User>>");

        let update = properties(namespace.get("$update").unwrap());
        assert_eq!(update[0].ty.as_ref().unwrap().to_string(), "[Profile, any]");
        assert!(!update[0].camel_case);
        let Some(TypeExpr::Tuple(elements)) = &update[0].ty else {
            panic!("params should be a tuple");
        };
        let flags: Vec<bool> = elements.iter().map(|e| e.camel_case).collect();
        assert_eq!(flags, vec![true, false]);
        assert_eq!(update[1].ty.as_ref().unwrap().to_string(), "Awaited<{}>");

        let methods = properties(namespace.get(METHODS_INTERFACE).unwrap());
        let names: Vec<&str> = methods.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["getUser", "update"]);
        assert!(namespace.get("$helper").is_none());
    }

    #[test]
    fn test_closure_is_emitted_in_order() {
        let namespace = namespace();
        let names: Vec<&str> = namespace
            .declarations
            .iter()
            .filter_map(|d| d.name.as_deref())
            .collect();
        assert_eq!(
            names,
            vec!["$getUser", "$update", "$methods", "User", "Role", "CamelCase", "Profile"]
        );
        // Object type aliases become interfaces; enums are copied.
        assert_eq!(namespace.get("Profile").unwrap().kind_tag(), DeclKind::Interface);
        assert_eq!(namespace.get("Role").unwrap().kind_tag(), DeclKind::Enum);
        assert_eq!(namespace.get("CamelCase").unwrap().kind_tag(), DeclKind::TypeAlias);
    }

    #[test]
    fn test_properties_are_normalized() {
        let namespace = namespace();
        let user = properties(namespace.get("User").unwrap());
        // Methods are dropped.
        assert_eq!(user.len(), 3);
        assert_eq!(user[0].comments, vec![Comment::block("/**\n * user id\n */")]);

        let Some(TypeExpr::Object(settings)) = &user[2].ty else {
            panic!("settings should stay an object type");
        };
        let Member::Property(theme) = &settings[0] else {
            panic!("expected property");
        };
        assert_eq!(theme.comments, vec![Comment::block("/**\n *  theme name\n */")]);
        let Member::Property(nested) = &settings[1] else {
            panic!("expected property");
        };
        assert!(nested.camel_case);
        assert!(!user[2].camel_case);
        assert_eq!(nested.ty.as_ref().unwrap().to_string(), "{ dark_mode: boolean }");
    }
}
