//! TypeScript source parsing.
//!
//! [`AstParser`] hands the source to the swc TypeScript parser (through
//! `deno_ast`) and lowers the resulting tree into an
//! [`ast::Module`](crate::ast::Module) with [`lower::Lowerer`].

pub mod lower;

use crate::ast::Module;
use crate::error::{Error, Result};
use deno_ast::swc::ast::EsVersion;
use deno_ast::swc::common::comments::SingleThreadedComments;
use deno_ast::swc::common::sync::Lrc;
use deno_ast::swc::common::{FileName, SourceMap, Spanned};
use deno_ast::swc::parser::{self as swc_parser, Syntax, TsSyntax};
use log::{debug, warn};
use std::fs;
use std::path::{Path, PathBuf};

/// Parser for TypeScript source files.
///
/// # Example
///
/// ```no_run
/// use tsdoc_meta::parser::AstParser;
/// use std::path::Path;
///
/// let parsed = AstParser::parse_file(Path::new("src/controller.ts")).unwrap();
/// println!("Parsed {} declarations", parsed.module.declarations.len());
/// ```
pub struct AstParser;

/// A successfully parsed TypeScript file.
#[derive(Debug, Clone)]
pub struct ParsedFile {
    /// Path to the source file
    pub path: PathBuf,
    /// Declarations, imports and exports of the file
    pub module: Module,
}

impl AstParser {
    /// Parses TypeScript source text.
    ///
    /// `path` is only used for error reporting and is stored in the result.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] with a `line:column` position when swc reports
    /// a syntax error it cannot recover from.
    pub fn parse_source(path: &Path, source: &str) -> Result<ParsedFile> {
        let source_map: Lrc<SourceMap> = Default::default();
        let file = source_map.new_source_file(FileName::Real(path.to_path_buf()).into(), source.to_string());
        let text = &file.src[..];
        let comments = SingleThreadedComments::default();
        let mut recovered = Vec::new();

        let parsed = swc_parser::parse_file_as_module(
            &file,
            syntax_for(path),
            EsVersion::EsNext,
            Some(&comments),
            &mut recovered,
        );
        let module = parsed.map_err(|err| {
            let offset = err.span().lo.0.saturating_sub(file.start_pos.0) as usize;
            let (line, column) = line_column(text, offset);
            Error::Parse {
                file: path.to_path_buf(),
                message: format!("{}:{}: {}", line, column, err.kind().msg()),
            }
        })?;
        for err in recovered {
            debug!("Recovered from a syntax error in {}: {}", path.display(), err.kind().msg());
        }

        Ok(ParsedFile {
            path: path.to_path_buf(),
            module: lower::Lowerer::new(text, file.start_pos, &comments).module(&module),
        })
    }

    /// Parses a single TypeScript source file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the file to parse
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - The file contains a syntax error
    pub fn parse_file(path: &Path) -> Result<ParsedFile> {
        debug!("Parsing file: {}", path.display());
        let content = fs::read_to_string(path)?;
        let parsed = Self::parse_source(path, &content)?;
        debug!(
            "Parsed {}: {} declarations, {} imports",
            path.display(),
            parsed.module.declarations.len(),
            parsed.module.imports.len()
        );
        Ok(parsed)
    }

    /// Parses multiple files, continuing even if some fail.
    ///
    /// Failures are logged as warnings and returned in place, so the caller
    /// can build a project from whatever parsed.
    pub fn parse_files(paths: &[PathBuf]) -> Vec<Result<ParsedFile>> {
        debug!("Parsing {} files", paths.len());

        let results: Vec<Result<ParsedFile>> = paths
            .iter()
            .map(|path| {
                Self::parse_file(path).inspect_err(|e| warn!("Failed to parse {}: {}", path.display(), e))
            })
            .collect();

        let success_count = results.iter().filter(|r| r.is_ok()).count();
        debug!(
            "Parsing complete: {} succeeded, {} failed",
            success_count,
            results.len() - success_count
        );

        results
    }
}

/// TypeScript syntax with decorators, JSX for `.tsx` and ambient rules for
/// `.d.ts` files.
fn syntax_for(path: &Path) -> Syntax {
    let name = path.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
    Syntax::Typescript(TsSyntax {
        tsx: name.ends_with(".tsx"),
        decorators: true,
        dts: name.ends_with(".d.ts"),
        ..Default::default()
    })
}

/// 1-based line and column of a byte offset.
fn line_column(source: &str, offset: usize) -> (usize, usize) {
    let prefix = &source[..offset.min(source.len())];
    let line = prefix.matches('\n').count() + 1;
    let column = prefix.rfind('\n').map_or(prefix.chars().count(), |i| prefix[i + 1..].chars().count()) + 1;
    (line, column)
}
