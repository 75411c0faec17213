//! The loaded set of TypeScript files and the symbol queries the closure
//! resolver runs against them.

use crate::ast::{DeclId, DeclKind, Declaration, FileId, ImportBinding};
use crate::config::ModuleResolution;
use crate::parser::{AstParser, ParsedFile};
use log::{debug, warn};
use serde::Deserialize;
use std::collections::{HashMap, HashSet, VecDeque};
use std::ffi::OsString;
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Path fragments of files that belong to the base type library.
/// Declarations from these files never enter a closure.
pub const STANDARD_LIBRARY_PATHS: [&str; 2] = ["typescript/lib", "@types/node"];

/// Extensions tried, in order, after a specifier that names no file directly.
const SOURCE_EXTENSIONS: [&str; 3] = [".ts", ".tsx", ".d.ts"];

/// Whether `path` points into the base type library.
pub fn is_standard_library(path: &Path) -> bool {
    let path = slash_path(path);
    STANDARD_LIBRARY_PATHS.iter().any(|fragment| path.contains(fragment))
}

/// Where an identifier is declared, as seen from one file.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Site<'a> {
    /// An interface, type alias, class or enum.
    Declaration(DeclId),
    /// A local alias bound by an `import` in `file`.
    Import {
        file: FileId,
        binding: &'a ImportBinding,
    },
}

/// Query surface over a set of parsed files.
///
/// The closure resolver only talks to this trait, so it can run over a
/// [`Project`] loaded from disk or any other provider of declarations.
pub trait SourceModel {
    fn declaration(&self, id: DeclId) -> &Declaration;

    fn file_path(&self, file: FileId) -> &Path;

    /// Every declaration site `name` refers to inside `file`.
    fn resolve_identifier(&self, file: FileId, name: &str) -> Vec<Site<'_>>;

    /// The file a module specifier written in `from` refers to.
    fn resolve_module(&self, from: FileId, specifier: &str) -> Option<FileId>;

    /// First file whose path contains `fragment`.
    fn find_file_containing(&self, fragment: &str) -> Option<FileId>;

    /// Looks up an exported or local name in `file`: interface first, then
    /// type alias, class and enum, then re-exports. `default` names the
    /// default export.
    fn lookup_declaration(&self, file: FileId, name: &str) -> Option<DeclId>;
}

/// A parsed file inside a [`Project`].
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: PathBuf,
    pub module: crate::ast::Module,
    /// Matched by the configured scan globs, as opposed to loaded because
    /// another file depends on it.
    pub scanned: bool,
}

/// `types`/`typings` entry of a package manifest.
#[derive(Debug, Deserialize)]
struct PackageManifest {
    types: Option<String>,
    typings: Option<String>,
}

/// All files of a generation run.
#[derive(Debug, Default)]
pub struct Project {
    root: PathBuf,
    resolution: ModuleResolution,
    files: Vec<SourceFile>,
    by_path: HashMap<PathBuf, FileId>,
}

impl Project {
    /// Creates an empty project. Bare module specifiers resolve against
    /// `root` and `root/node_modules`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: normalize_path(&root.into()),
            resolution: ModuleResolution::default(),
            files: Vec::new(),
            by_path: HashMap::new(),
        }
    }

    /// Resolves bare specifiers through `baseUrl` and `paths` before
    /// falling back to the root and `node_modules`.
    pub fn with_module_resolution(mut self, resolution: ModuleResolution) -> Self {
        self.resolution = ModuleResolution {
            base_url: resolution.base_url.map(|url| normalize_path(&url)),
            paths: resolution.paths,
        };
        self
    }

    /// Parses `files`, then every file they depend on.
    ///
    /// Files that fail to parse are skipped with a warning.
    pub fn load(root: impl Into<PathBuf>, files: &[PathBuf]) -> Self {
        Self::new(root).load_files(files)
    }

    /// [`Project::load`] for a project already carrying its module
    /// resolution settings.
    pub fn load_files(mut self, files: &[PathBuf]) -> Self {
        for parsed in AstParser::parse_files(files).into_iter().flatten() {
            self.add_parsed(parsed, true);
        }
        self.load_dependencies();
        self
    }

    /// Adds a parsed file and returns its id. Adding a path twice keeps the
    /// first module.
    pub fn add_parsed(&mut self, parsed: ParsedFile, scanned: bool) -> FileId {
        let path = normalize_path(&parsed.path);
        if let Some(&id) = self.by_path.get(&path) {
            self.files[id].scanned |= scanned;
            return id;
        }
        let id = self.files.len();
        self.by_path.insert(path.clone(), id);
        self.files.push(SourceFile {
            path,
            module: parsed.module,
            scanned,
        });
        id
    }

    /// Follows module specifiers of every loaded file and parses the targets
    /// until no new file is reachable.
    pub fn load_dependencies(&mut self) {
        let mut queue: VecDeque<FileId> = (0..self.files.len()).collect();
        let mut failed: HashSet<PathBuf> = HashSet::new();

        while let Some(file) = queue.pop_front() {
            for specifier in self.files[file].module.module_specifiers() {
                let candidates = self.module_candidates(file, &specifier);
                let Some(target) = candidates
                    .into_iter()
                    .find(|c| self.by_path.contains_key(c) || c.is_file())
                else {
                    debug!(
                        "Module {} from {} not found on disk",
                        specifier,
                        self.files[file].path.display()
                    );
                    continue;
                };
                if self.by_path.contains_key(&target) || failed.contains(&target) {
                    continue;
                }
                match AstParser::parse_file(&target) {
                    Ok(parsed) => {
                        debug!("Loaded dependency {}", target.display());
                        queue.push_back(self.add_parsed(parsed, false));
                    }
                    Err(e) => {
                        warn!("Skipping dependency {}: {}", target.display(), e);
                        failed.insert(target);
                    }
                }
            }
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn files(&self) -> &[SourceFile] {
        &self.files
    }

    pub fn file(&self, id: FileId) -> &SourceFile {
        &self.files[id]
    }

    /// Ids of the files matched by the scan globs.
    pub fn scanned_files(&self) -> impl Iterator<Item = FileId> + '_ {
        self.files
            .iter()
            .enumerate()
            .filter(|(_, f)| f.scanned)
            .map(|(id, _)| id)
    }

    /// Paths a specifier may refer to, most specific first.
    fn module_candidates(&self, from: FileId, specifier: &str) -> Vec<PathBuf> {
        let mut candidates = Vec::new();
        if specifier.starts_with("./") || specifier.starts_with("../") || specifier == "." || specifier == ".." {
            let dir = self.files[from].path.parent().unwrap_or(Path::new(""));
            push_file_candidates(&mut candidates, &normalize_path(&dir.join(specifier)));
            return candidates;
        }
        if Path::new(specifier).is_absolute() {
            push_file_candidates(&mut candidates, &normalize_path(Path::new(specifier)));
            return candidates;
        }

        if let Some(base_url) = &self.resolution.base_url {
            for substitution in self.resolution.substitutions(specifier) {
                push_file_candidates(&mut candidates, &normalize_path(&base_url.join(substitution)));
            }
            push_file_candidates(&mut candidates, &normalize_path(&base_url.join(specifier)));
        }
        push_file_candidates(&mut candidates, &normalize_path(&self.root.join(specifier)));

        let package = self.root.join("node_modules").join(specifier);
        if let Some(types) = read_manifest_types(&package.join("package.json")) {
            candidates.push(normalize_path(&package.join(types)));
        }
        candidates.push(with_suffix(&package, ".d.ts"));
        candidates.push(package.join("index.d.ts"));
        candidates.push(package.join("index.ts"));
        candidates.push(
            self.root
                .join("node_modules")
                .join("@types")
                .join(specifier)
                .join("index.d.ts"),
        );
        candidates.into_iter().map(|c| normalize_path(&c)).collect()
    }

    fn local_declaration(&self, file: FileId, name: &str) -> Option<DeclId> {
        let declarations = &self.files[file].module.declarations;
        DeclKind::LOOKUP_ORDER.iter().find_map(|kind| {
            declarations
                .iter()
                .position(|d| d.is_named(name) && d.kind_tag() == *kind)
                .map(|index| DeclId { file, index })
        })
    }

    /// A local declaration, or the declaration an import binding of that
    /// name points at.
    fn lookup_local(&self, file: FileId, name: &str, visited: &mut HashSet<(FileId, String)>) -> Option<DeclId> {
        if let Some(id) = self.local_declaration(file, name) {
            return Some(id);
        }
        let binding = self.files[file].module.imports.iter().find(|b| b.local == name)?;
        let target = self.resolve_module(file, &binding.specifier)?;
        self.lookup_in(target, binding.export_name()?, visited)
    }

    fn lookup_in(&self, file: FileId, name: &str, visited: &mut HashSet<(FileId, String)>) -> Option<DeclId> {
        if !visited.insert((file, name.to_string())) {
            return None;
        }
        let module = &self.files[file].module;

        if name == "default" {
            if let Some(index) = module.declarations.iter().position(|d| d.default_export) {
                return Some(DeclId { file, index });
            }
            if let Some(local) = &module.default_export {
                return self.lookup_local(file, local, visited);
            }
        } else if let Some(id) = self.local_declaration(file, name) {
            return Some(id);
        }

        for export in module.exports.iter().filter(|e| e.exported == name) {
            let found = match &export.specifier {
                Some(specifier) => self
                    .resolve_module(file, specifier)
                    .and_then(|target| self.lookup_in(target, &export.local, visited)),
                None => self.lookup_local(file, &export.local, visited),
            };
            if found.is_some() {
                return found;
            }
        }

        if name == "default" {
            return None;
        }
        module.star_exports.iter().find_map(|specifier| {
            let target = self.resolve_module(file, specifier)?;
            self.lookup_in(target, name, visited)
        })
    }
}

impl SourceModel for Project {
    fn declaration(&self, id: DeclId) -> &Declaration {
        &self.files[id.file].module.declarations[id.index]
    }

    fn file_path(&self, file: FileId) -> &Path {
        &self.files[file].path
    }

    fn resolve_identifier(&self, file: FileId, name: &str) -> Vec<Site<'_>> {
        let module = &self.files[file].module;
        let mut sites: Vec<Site<'_>> = module
            .declarations
            .iter()
            .enumerate()
            .filter(|(_, d)| d.is_named(name))
            .map(|(index, _)| Site::Declaration(DeclId { file, index }))
            .collect();
        sites.extend(
            module
                .imports
                .iter()
                .filter(|b| b.local == name)
                .map(|binding| Site::Import { file, binding }),
        );
        if !sites.is_empty() {
            return sites;
        }

        // Declarations of script files are global.
        for (id, source) in self.files.iter().enumerate() {
            if id == file || source.module.is_module {
                continue;
            }
            sites.extend(
                source
                    .module
                    .declarations
                    .iter()
                    .enumerate()
                    .filter(|(_, d)| d.is_named(name))
                    .map(|(index, _)| Site::Declaration(DeclId { file: id, index })),
            );
        }
        sites
    }

    fn resolve_module(&self, from: FileId, specifier: &str) -> Option<FileId> {
        self.module_candidates(from, specifier)
            .iter()
            .find_map(|candidate| self.by_path.get(candidate).copied())
    }

    fn find_file_containing(&self, fragment: &str) -> Option<FileId> {
        self.files
            .iter()
            .position(|f| slash_path(&f.path).contains(fragment))
    }

    fn lookup_declaration(&self, file: FileId, name: &str) -> Option<DeclId> {
        self.lookup_in(file, name, &mut HashSet::new())
    }
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut os: OsString = path.as_os_str().to_owned();
    os.push(suffix);
    PathBuf::from(os)
}

fn push_file_candidates(candidates: &mut Vec<PathBuf>, base: &Path) {
    // `./user.js` in ESM-style imports names `./user.ts`.
    if let Some(ext @ ("js" | "jsx" | "mjs")) = base.extension().and_then(|e| e.to_str()) {
        let stem = base.with_extension("");
        let mapped = if ext == "jsx" { ".tsx" } else { ".ts" };
        candidates.push(with_suffix(&stem, mapped));
        candidates.push(with_suffix(&stem, ".d.ts"));
    }
    candidates.push(base.to_path_buf());
    for extension in SOURCE_EXTENSIONS {
        candidates.push(with_suffix(base, extension));
    }
    for extension in SOURCE_EXTENSIONS {
        candidates.push(base.join(format!("index{}", extension)));
    }
}

fn read_manifest_types(manifest: &Path) -> Option<String> {
    let content = fs::read_to_string(manifest).ok()?;
    let manifest: PackageManifest = serde_json::from_str(&content)
        .inspect_err(|e| debug!("Ignoring {}: {}", manifest.display(), e))
        .ok()?;
    manifest.types.or(manifest.typings)
}

/// Resolves `.` and `..` components without touching the file system.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() {
                    normalized.push("..");
                }
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

fn slash_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}
