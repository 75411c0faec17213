//! Generator configuration.
//!
//! The configuration file is YAML (JSON works too, being valid YAML) with
//! camelCase keys:
//!
//! ```yaml
//! scanDir:
//!   - "src/**/*.controller.ts"
//! outFilePath: docs/doc-meta.ts
//! tsConfigFilePath: tsconfig.json
//! jsDocTag: tsDoc
//! ```
//!
//! Relative paths are resolved against the directory of the configuration
//! file.
//!
//! `compilerOptions.baseUrl` and `compilerOptions.paths` of the referenced
//! TypeScript configuration drive bare module specifier resolution; see
//! [`ModuleResolution`].

use crate::error::{Error, Result};
use indexmap::IndexMap;
use log::debug;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_SCAN_GLOB: &str = "**/*.ts";
pub const DEFAULT_OUT_FILE: &str = "doc-meta.ts";
pub const DEFAULT_JS_DOC_TAG: &str = "tsDoc";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct RawConfig {
    #[serde(default)]
    scan_dir: Option<Vec<String>>,
    #[serde(default)]
    out_file_path: Option<PathBuf>,
    #[serde(default)]
    ts_config_file_path: Option<PathBuf>,
    #[serde(default)]
    js_doc_tag: Option<String>,
}

/// The parts of `tsconfig.json` module resolution depends on.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTsConfig {
    #[serde(default)]
    compiler_options: RawCompilerOptions,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCompilerOptions {
    #[serde(default)]
    base_url: Option<String>,
    #[serde(default)]
    paths: Option<IndexMap<String, Vec<String>>>,
}

/// `baseUrl` and `paths` of a TypeScript configuration, made absolute.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModuleResolution {
    /// Directory non-relative specifiers and `paths` targets resolve
    /// against. Defaults to the configuration directory when only `paths`
    /// is set.
    pub base_url: Option<PathBuf>,
    /// Pattern to substitution list, in declaration order. A pattern holds
    /// at most one `*`.
    pub paths: IndexMap<String, Vec<String>>,
}

impl ModuleResolution {
    /// Reads `compilerOptions` from the TypeScript configuration at `path`.
    /// A missing file yields the default resolution.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when the file exists but is not valid JSON5.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            debug!("No TypeScript configuration at {}", path.display());
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("cannot read {}: {}", path.display(), e)))?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        Self::from_str(&content, base_dir)
            .map_err(|e| Error::Config(format!("failed to parse {}: {}", path.display(), e)))
    }

    /// Parses TypeScript configuration text. Comments and trailing commas
    /// are accepted.
    pub fn from_str(content: &str, base_dir: &Path) -> std::result::Result<Self, json5::Error> {
        let raw: RawTsConfig = json5::from_str(content)?;
        let paths = raw.compiler_options.paths.unwrap_or_default();
        let mut base_url = raw.compiler_options.base_url.map(|url| base_dir.join(url));
        if base_url.is_none() && !paths.is_empty() {
            base_url = Some(base_dir.to_path_buf());
        }
        Ok(Self { base_url, paths })
    }

    /// `paths` substitutions matching `specifier`, to be joined onto
    /// [`Self::base_url`]. Patterns with the longest literal
    /// prefix come first; an exact pattern beats any wildcard.
    pub fn substitutions(&self, specifier: &str) -> Vec<String> {
        let mut matches: Vec<(usize, Vec<String>)> = Vec::new();
        for (pattern, targets) in &self.paths {
            match pattern.split_once('*') {
                None if pattern == specifier => {
                    matches.push((usize::MAX, targets.clone()));
                }
                None => {}
                Some((prefix, suffix)) => {
                    if specifier.len() >= prefix.len() + suffix.len()
                        && specifier.starts_with(prefix)
                        && specifier.ends_with(suffix)
                    {
                        let captured = &specifier[prefix.len()..specifier.len() - suffix.len()];
                        let substituted = targets.iter().map(|t| t.replacen('*', captured, 1)).collect();
                        matches.push((prefix.len(), substituted));
                    }
                }
            }
        }
        matches.sort_by(|a, b| b.0.cmp(&a.0));
        matches.into_iter().flat_map(|(_, targets)| targets).collect()
    }
}

/// Loaded configuration with defaults applied and paths made absolute
#[derive(Debug, Clone, PartialEq)]
pub struct DocConfig {
    /// Glob patterns relative to the project root
    pub scan_dir: Vec<String>,
    pub out_file_path: PathBuf,
    pub ts_config_file_path: PathBuf,
    /// Marker tag without the `@`
    pub js_doc_tag: String,
}

impl DocConfig {
    /// Reads and validates the configuration file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid
    /// configuration.
    pub fn load(path: &Path) -> Result<Self> {
        debug!("Loading configuration from {}", path.display());
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("cannot read {}: {}", path.display(), e)))?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        Self::from_str(&content, base_dir)
    }

    /// Parses configuration text, resolving relative paths against
    /// `base_dir`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for malformed content, an empty scan list or
    /// a missing `tsConfigFilePath`.
    pub fn from_str(content: &str, base_dir: &Path) -> Result<Self> {
        let raw: RawConfig = serde_yaml::from_str(content).map_err(|e| Error::Config(e.to_string()))?;

        let ts_config_file_path = raw
            .ts_config_file_path
            .ok_or_else(|| Error::Config("not specified tsConfigFilePath".to_string()))?;
        let scan_dir = raw.scan_dir.unwrap_or_else(|| vec![DEFAULT_SCAN_GLOB.to_string()]);
        if scan_dir.is_empty() {
            return Err(Error::Config("scanDir must list at least one glob".to_string()));
        }
        let js_doc_tag = raw
            .js_doc_tag
            .map(|tag| tag.trim_start_matches('@').to_string())
            .unwrap_or_else(|| DEFAULT_JS_DOC_TAG.to_string());
        if js_doc_tag.is_empty() {
            return Err(Error::Config("jsDocTag must not be empty".to_string()));
        }

        let config = Self {
            scan_dir,
            out_file_path: base_dir.join(raw.out_file_path.unwrap_or_else(|| PathBuf::from(DEFAULT_OUT_FILE))),
            ts_config_file_path: base_dir.join(ts_config_file_path),
            js_doc_tag,
        };
        debug!("Configuration: {:?}", config);
        Ok(config)
    }

    /// Directory holding the TypeScript project configuration.
    pub fn project_root(&self) -> PathBuf {
        self.ts_config_file_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Module resolution settings of the referenced TypeScript configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when the TypeScript configuration exists
    /// but cannot be parsed.
    pub fn module_resolution(&self) -> Result<ModuleResolution> {
        ModuleResolution::load(&self.ts_config_file_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = DocConfig::from_str("tsConfigFilePath: app/tsconfig.json\n", Path::new("/work")).unwrap();
        assert_eq!(
            config,
            DocConfig {
                scan_dir: vec!["**/*.ts".to_string()],
                out_file_path: PathBuf::from("/work/doc-meta.ts"),
                ts_config_file_path: PathBuf::from("/work/app/tsconfig.json"),
                js_doc_tag: "tsDoc".to_string(),
            }
        );
        assert_eq!(config.project_root(), PathBuf::from("/work/app"));
    }

    #[test]
    fn test_json_config_and_absolute_paths() {
        let config = DocConfig::from_str(
            r#"{"scanDir": ["src/**/*.controller.ts"], "outFilePath": "/out/meta.json", "tsConfigFilePath": "tsconfig.json", "jsDocTag": "@api"}"#,
            Path::new("/work"),
        )
        .unwrap();
        assert_eq!(config.scan_dir, vec!["src/**/*.controller.ts".to_string()]);
        assert_eq!(config.out_file_path, PathBuf::from("/out/meta.json"));
        assert_eq!(config.js_doc_tag, "api");
        assert_eq!(config.project_root(), PathBuf::from("/work"));
    }

    #[test]
    fn test_missing_ts_config_is_an_error() {
        let err = DocConfig::from_str("scanDir: ['**/*.ts']\n", Path::new("/work")).unwrap_err();
        assert_eq!(err.to_string(), "invalid configuration: not specified tsConfigFilePath");
    }

    #[test]
    fn test_invalid_configs() {
        assert!(DocConfig::from_str("tsConfigFilePath: a\nunknownKey: 1\n", Path::new("/")).is_err());
        assert!(DocConfig::from_str("tsConfigFilePath: a\nscanDir: []\n", Path::new("/")).is_err());
        assert!(DocConfig::from_str("- not a map\n", Path::new("/")).is_err());
    }

    #[test]
    fn test_load_resolves_against_config_directory() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("tsdoc.yaml");
        fs::write(&path, "tsConfigFilePath: tsconfig.json\noutFilePath: gen/meta.ts\n").unwrap();

        let config = DocConfig::load(&path).unwrap();
        assert_eq!(config.out_file_path, temp_dir.path().join("gen/meta.ts"));
        assert_eq!(config.project_root(), temp_dir.path());

        let missing = DocConfig::load(&temp_dir.path().join("missing.yaml")).unwrap_err();
        assert!(matches!(missing, Error::Config(_)));
    }

    #[test]
    fn test_ts_config_paths_default_base_url_to_config_dir() {
        let resolution = ModuleResolution::from_str(
            r#"{
              // path aliases
              "compilerOptions": { "paths": { "@/*": ["src/*"] }, },
            }"#,
            Path::new("/work/app"),
        )
        .unwrap();
        assert_eq!(resolution.base_url, Some(PathBuf::from("/work/app")));
        assert_eq!(resolution.substitutions("@/models/user"), vec!["src/models/user".to_string()]);
        assert!(resolution.substitutions("lodash").is_empty());
    }

    #[test]
    fn test_ts_config_base_url_and_pattern_priority() {
        let resolution = ModuleResolution::from_str(
            r#"{"compilerOptions": {"baseUrl": "./lib", "paths": {
                "*": ["vendor/*"],
                "@app/*": ["app/*", "shared/*"],
                "config": ["settings/index.ts"]
            }}}"#,
            Path::new("/work"),
        )
        .unwrap();
        assert_eq!(resolution.base_url, Some(PathBuf::from("/work/lib")));
        assert_eq!(
            resolution.substitutions("@app/user"),
            vec!["app/user".to_string(), "shared/user".to_string(), "vendor/@app/user".to_string()]
        );
        assert_eq!(
            resolution.substitutions("config"),
            vec!["settings/index.ts".to_string(), "vendor/config".to_string()]
        );
    }

    #[test]
    fn test_module_resolution_from_files() {
        let temp_dir = TempDir::new().unwrap();
        let config = DocConfig::from_str("tsConfigFilePath: tsconfig.json\n", temp_dir.path()).unwrap();
        assert_eq!(config.module_resolution().unwrap(), ModuleResolution::default());

        fs::write(temp_dir.path().join("tsconfig.json"), r#"{"compilerOptions": {"baseUrl": "src"}}"#).unwrap();
        let resolution = config.module_resolution().unwrap();
        assert_eq!(resolution.base_url, Some(temp_dir.path().join("src")));
        assert!(resolution.paths.is_empty());

        fs::write(temp_dir.path().join("tsconfig.json"), "{ compilerOptions: ").unwrap();
        assert!(matches!(config.module_resolution(), Err(Error::Config(_))));
    }
}
