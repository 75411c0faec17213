//! Closure resolver: from root type expressions to the ordered set of named
//! declarations needed to describe them.
//!
//! Traversal is depth-first and pre-order. A declaration is inserted into the
//! closure before its own members are walked, so reference cycles terminate
//! on the membership check.

use crate::ast::{
    DeclId, DeclarationKind, FileId, ImportBinding, ImportedName, Member, Signature, TypeExpr,
    TypeParam,
};
use crate::error::{Error, Result};
use crate::project::{is_standard_library, Site, SourceModel};
use indexmap::IndexSet;
use log::debug;

/// A starting point of a closure.
#[derive(Debug, Clone)]
pub enum Root<'a> {
    /// A type expression written in `file`. `scope` holds the type
    /// parameters visible at that position, which shadow declarations.
    Type {
        file: FileId,
        ty: &'a TypeExpr,
        scope: Vec<String>,
    },
    /// A declaration added as is.
    Declaration(DeclId),
}

impl<'a> Root<'a> {
    pub fn ty(file: FileId, ty: &'a TypeExpr) -> Self {
        Root::Type {
            file,
            ty,
            scope: Vec::new(),
        }
    }
}

/// Computes the closure of `roots`. `None` roots are skipped.
///
/// # Errors
///
/// - [`Error::MissingDeclarationName`] if an unnamed declaration is reached
/// - [`Error::UnresolvedModule`] if an import or `import("...")` type names a
///   module that is not part of the model
/// - [`Error::UnresolvedDeclaration`] if the module has no matching interface,
///   type alias, class or enum
pub fn collect_type_deps<M: SourceModel + ?Sized>(roots: &[Option<Root<'_>>], model: &M) -> Result<Vec<DeclId>> {
    let mut resolver = ClosureResolver::new(model);
    for root in roots.iter().flatten() {
        match root {
            Root::Declaration(id) => resolver.add_dep(*id)?,
            Root::Type { file, ty, scope } => {
                let mut scope = scope.clone();
                resolver.query_in_tree(*file, ty, &mut scope)?;
            }
        }
    }
    debug!("Closure has {} declarations", resolver.deps.len());
    Ok(resolver.deps.into_iter().collect())
}

struct ClosureResolver<'m, M: ?Sized> {
    model: &'m M,
    deps: IndexSet<DeclId>,
}

impl<'m, M: SourceModel + ?Sized> ClosureResolver<'m, M> {
    fn new(model: &'m M) -> Self {
        Self {
            model,
            deps: IndexSet::new(),
        }
    }

    fn add_dep(&mut self, id: DeclId) -> Result<()> {
        if self.deps.contains(&id) {
            return Ok(());
        }
        let model = self.model;
        let path = model.file_path(id.file);
        if is_standard_library(path) {
            debug!("Skipping standard library declaration in {}", path.display());
            return Ok(());
        }
        let declaration = model.declaration(id);
        let Some(name) = &declaration.name else {
            return Err(Error::MissingDeclarationName {
                file: path.to_path_buf(),
            });
        };
        debug!("Adding dependency {} from {}", name, path.display());
        self.deps.insert(id);

        let file = id.file;
        let mut scope: Vec<String> = declaration.type_params.iter().map(|p| p.name.clone()).collect();
        self.visit_type_params(file, &declaration.type_params, &mut scope)?;
        match &declaration.kind {
            DeclarationKind::Interface(interface) => {
                for ty in &interface.extends {
                    self.query_in_tree(file, ty, &mut scope)?;
                }
                for member in &interface.members {
                    self.visit_member(file, member, &mut scope)?;
                }
            }
            DeclarationKind::TypeAlias(ty) => self.query_in_tree(file, ty, &mut scope)?,
            DeclarationKind::Class(class) => {
                for ty in class.extends.iter().chain(&class.implements) {
                    self.query_in_tree(file, ty, &mut scope)?;
                }
                for property in &class.properties {
                    if let Some(ty) = &property.ty {
                        self.query_in_tree(file, ty, &mut scope)?;
                    }
                }
                for method in &class.methods {
                    self.visit_signature(file, &method.signature, &mut scope)?;
                }
            }
            DeclarationKind::Enum(_) => {}
        }
        Ok(())
    }

    fn visit_type_params(&mut self, file: FileId, params: &[TypeParam], scope: &mut Vec<String>) -> Result<()> {
        for param in params {
            for ty in param.constraint.iter().chain(&param.default) {
                self.query_in_tree(file, ty, scope)?;
            }
        }
        Ok(())
    }

    fn visit_signature(&mut self, file: FileId, signature: &Signature, scope: &mut Vec<String>) -> Result<()> {
        let depth = scope.len();
        scope.extend(signature.type_params.iter().map(|p| p.name.clone()));
        self.visit_type_params(file, &signature.type_params, scope)?;
        for ty in signature.params.iter().filter_map(|p| p.ty.as_ref()).chain(&signature.ret) {
            self.query_in_tree(file, ty, scope)?;
        }
        scope.truncate(depth);
        Ok(())
    }

    fn visit_member(&mut self, file: FileId, member: &Member, scope: &mut Vec<String>) -> Result<()> {
        match member {
            Member::Property(property) => match &property.ty {
                Some(ty) => self.query_in_tree(file, ty, scope),
                None => Ok(()),
            },
            Member::Method { signature, .. } | Member::Call(signature) | Member::Construct(signature) => {
                self.visit_signature(file, signature, scope)
            }
            Member::Index { key, value, .. } => {
                self.query_in_tree(file, key, scope)?;
                self.query_in_tree(file, value, scope)
            }
        }
    }

    fn query_in_tree(&mut self, file: FileId, ty: &TypeExpr, scope: &mut Vec<String>) -> Result<()> {
        match ty {
            TypeExpr::Keyword(_) | TypeExpr::Literal(_) | TypeExpr::Infer(_) | TypeExpr::TemplateLiteral(_) => Ok(()),
            TypeExpr::Reference { name, args } => {
                self.find_identifier(file, name, scope)?;
                for arg in args {
                    self.query_in_tree(file, arg, scope)?;
                }
                Ok(())
            }
            TypeExpr::Import {
                module,
                qualifier,
                args,
            } => {
                self.find_import_type(file, module, qualifier)?;
                for arg in args {
                    self.query_in_tree(file, arg, scope)?;
                }
                Ok(())
            }
            TypeExpr::Query(name) => self.find_identifier(file, name, scope),
            TypeExpr::Object(members) => {
                for member in members {
                    self.visit_member(file, member, scope)?;
                }
                Ok(())
            }
            TypeExpr::Function { signature, .. } => self.visit_signature(file, signature, scope),
            TypeExpr::Mapped {
                param,
                constraint,
                value,
                ..
            } => {
                self.query_in_tree(file, constraint, scope)?;
                scope.push(param.clone());
                if let Some(value) = value {
                    self.query_in_tree(file, value, scope)?;
                }
                scope.pop();
                Ok(())
            }
            TypeExpr::Conditional {
                check,
                extends,
                then,
                otherwise,
            } => {
                self.query_in_tree(file, check, scope)?;
                let depth = scope.len();
                // `infer X` binds X for the true branch only.
                extends.walk(&mut |node| {
                    if let TypeExpr::Infer(name) = node {
                        scope.push(name.clone());
                    }
                });
                self.query_in_tree(file, extends, scope)?;
                self.query_in_tree(file, then, scope)?;
                scope.truncate(depth);
                self.query_in_tree(file, otherwise, scope)
            }
            TypeExpr::Array(_)
            | TypeExpr::Awaited(_)
            | TypeExpr::Tuple(_)
            | TypeExpr::Union(_)
            | TypeExpr::Intersection(_)
            | TypeExpr::Operator { .. }
            | TypeExpr::IndexedAccess { .. } => {
                let mut children = Vec::new();
                ty.for_each_child(&mut |child| children.push(child));
                for child in children {
                    self.query_in_tree(file, child, scope)?;
                }
                Ok(())
            }
        }
    }

    fn find_identifier(&mut self, file: FileId, name: &[String], scope: &[String]) -> Result<()> {
        let Some(first) = name.first() else {
            return Ok(());
        };
        if scope.contains(first) {
            return Ok(());
        }

        let model = self.model;
        let sites = model.resolve_identifier(file, first);
        if sites.is_empty() {
            debug!("Ignoring unresolved identifier {}", name.join("."));
        }
        for site in sites {
            match site {
                Site::Declaration(id) => self.add_dep(id)?,
                Site::Import { file: from, binding } if binding.imported == ImportedName::Namespace => {
                    let Some(member) = name.get(1) else {
                        continue;
                    };
                    let found = model
                        .resolve_module(from, &binding.specifier)
                        .and_then(|target| model.lookup_declaration(target, member));
                    match found {
                        Some(id) => self.add_dep(id)?,
                        None => debug!("Ignoring {} in namespace import {}", member, binding.specifier),
                    }
                }
                Site::Import { file: from, binding } => self.find_import_binding(from, binding)?,
            }
        }
        Ok(())
    }

    /// Resolves a named or default import to the declaration it binds.
    fn find_import_binding(&mut self, from: FileId, binding: &ImportBinding) -> Result<()> {
        let model = self.model;
        let target = model
            .resolve_module(from, &binding.specifier)
            .ok_or_else(|| Error::UnresolvedModule {
                specifier: binding.specifier.clone(),
                from: model.file_path(from).to_path_buf(),
            })?;
        let name = binding.export_name().unwrap_or(&binding.local);
        let id = model
            .lookup_declaration(target, name)
            .ok_or_else(|| Error::UnresolvedDeclaration {
                name: name.to_string(),
                file: model.file_path(target).to_path_buf(),
            })?;
        self.add_dep(id)
    }

    /// Resolves `import("module").Qualifier`.
    fn find_import_type(&mut self, file: FileId, module: &str, qualifier: &[String]) -> Result<()> {
        let model = self.model;
        let target = model
            .resolve_module(file, module)
            .or_else(|| model.find_file_containing(containment_fragment(module)))
            .ok_or_else(|| Error::UnresolvedModule {
                specifier: module.to_string(),
                from: model.file_path(file).to_path_buf(),
            })?;
        let name = qualifier.join(".");
        let id = model
            .lookup_declaration(target, &name)
            .ok_or_else(|| Error::UnresolvedDeclaration {
                name: name.clone(),
                file: model.file_path(target).to_path_buf(),
            })?;
        self.add_dep(id)
    }
}

/// `../models/user.ts` → `models/user`.
fn containment_fragment(specifier: &str) -> &str {
    let mut fragment = specifier;
    loop {
        if let Some(rest) = fragment.strip_prefix("./") {
            fragment = rest;
        } else if let Some(rest) = fragment.strip_prefix("../") {
            fragment = rest;
        } else {
            break;
        }
    }
    for extension in [".d.ts", ".tsx", ".ts", ".js"] {
        if let Some(stem) = fragment.strip_suffix(extension) {
            return stem;
        }
    }
    fragment
}
