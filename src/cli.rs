use crate::config::DocConfig;
use crate::meta_builder::MethodGroup;
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::{debug, info, warn};
use std::path::{Path, PathBuf};

/// TypeScript doc-meta generator - Extracts parameter, return type and comment
/// metadata from annotated service methods
#[derive(Parser, Debug)]
#[command(name = "tsdoc-meta")]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Path to the generator configuration file (YAML or JSON)
    #[arg(short = 'c', long = "config-path", value_name = "CONFIG")]
    pub config_path: PathBuf,

    /// Output format (defaults to the output file extension, else ts)
    #[arg(short = 'f', long = "format", value_enum)]
    pub output_format: Option<OutputFormat>,

    /// Output file path (overrides outFilePath of the configuration)
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output_path: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

/// Output format options
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    /// TypeScript module exporting `meta`
    Ts,
    /// JSON format
    Json,
    /// YAML format
    Yaml,
}

impl OutputFormat {
    /// Format implied by a file extension.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => OutputFormat::Json,
            Some("yaml" | "yml") => OutputFormat::Yaml,
            _ => OutputFormat::Ts,
        }
    }
}

/// Parse command line arguments
pub fn parse_args() -> Result<CliArgs> {
    let args = CliArgs::parse();
    parse_args_from_parsed(args)
}

/// Validate and log already-parsed arguments
pub fn parse_args_from_parsed(args: CliArgs) -> Result<CliArgs> {
    debug!("Parsed arguments: {:?}", args);

    if !args.config_path.exists() {
        anyhow::bail!("Config file does not exist: {}", args.config_path.display());
    }
    if !args.config_path.is_file() {
        anyhow::bail!("Config path is not a file: {}", args.config_path.display());
    }

    info!("Config file: {}", args.config_path.display());
    if let Some(ref output) = args.output_path {
        info!("Output file: {}", output.display());
    }
    if let Some(ref format) = args.output_format {
        info!("Output format: {:?}", format);
    }

    Ok(args)
}

/// Runs the generation pipeline for `config` and returns the method groups.
///
/// # Errors
///
/// Fails when no file matches the scan globs, when no annotated method is
/// found, or when a type referenced by an annotated method cannot be
/// resolved.
pub fn generate(config: &DocConfig) -> Result<Vec<MethodGroup>> {
    use crate::detector::AnnotationDetector;
    use crate::meta_builder::MetaBuilder;
    use crate::project::Project;
    use crate::scanner::FileScanner;

    let root = config.project_root();

    // Step 1: Scan the project for files matching the globs
    info!("Scanning {} for {:?}...", root.display(), config.scan_dir);
    let scanner = FileScanner::new(root.clone(), config.scan_dir.clone());
    let scan_result = scanner.scan()?;
    info!("Found {} TypeScript files", scan_result.ts_files.len());
    for warning in &scan_result.warnings {
        warn!("{}", warning);
    }
    if scan_result.ts_files.is_empty() {
        anyhow::bail!("No TypeScript files matched {:?} under {}", config.scan_dir, root.display());
    }

    // Step 2: Parse scanned files and everything they import
    info!("Parsing TypeScript files...");
    let resolution = config.module_resolution()?;
    if let Some(base_url) = &resolution.base_url {
        debug!("Resolving bare specifiers against {} ({} path patterns)", base_url.display(), resolution.paths.len());
    }
    let project = Project::new(&root)
        .with_module_resolution(resolution)
        .load_files(&scan_result.ts_files);
    info!(
        "Loaded {} files ({} scanned)",
        project.files().len(),
        project.scanned_files().count()
    );

    // Step 3: Find classes and methods carrying the marker
    info!("Detecting @{} annotations...", config.js_doc_tag);
    let detector = AnnotationDetector::new(config.js_doc_tag.clone());
    let classes = detector.detect(&project)?;
    info!("Found {} annotated classes", classes.len());

    // Step 4: Build metadata per class
    info!("Building method metadata...");
    let mut builder = MetaBuilder::new(&project, &detector);
    for class in &classes {
        let name = project.file(class.id.file).module.declarations[class.id.index]
            .name
            .clone()
            .unwrap_or_default();
        debug!("Adding class {} with {} methods", name, class.methods.len());
        builder
            .add_class(class)
            .with_context(|| format!("Failed to build metadata for class {}", name))?;
    }
    Ok(builder.build())
}

/// Main workflow: load the configuration, generate and write the output
pub fn run(args: CliArgs) -> Result<()> {
    use crate::serializer::{serialize_json, serialize_ts, serialize_yaml, write_to_file};

    info!("Starting doc meta generation...");
    let config = DocConfig::load(&args.config_path)
        .with_context(|| format!("Failed to load config {}", args.config_path.display()))?;

    let groups = generate(&config)?;

    let output_path = args.output_path.clone().unwrap_or_else(|| config.out_file_path.clone());
    let format = args
        .output_format
        .unwrap_or_else(|| OutputFormat::from_path(&output_path));

    // Step 5: Serialize to requested format
    info!("Serializing to {:?} format...", format);
    let content = match format {
        OutputFormat::Ts => serialize_ts(&groups)?,
        OutputFormat::Json => serialize_json(&groups)?,
        OutputFormat::Yaml => serialize_yaml(&groups)?,
    };

    // Step 6: Write the artifact
    info!("Writing output to: {}", output_path.display());
    write_to_file(&content, &output_path)?;

    info!("Generation complete!");
    info!("Summary:");
    info!("  - Classes: {}", groups.len());
    info!(
        "  - Methods: {}",
        groups.iter().map(|g| g.methods.len()).sum::<usize>()
    );
    info!("  - Output: {}", output_path.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cli_flags() {
        let args = CliArgs::try_parse_from(["tsdoc-meta", "-c", "tsdoc.yaml", "-f", "json", "-o", "out.json", "-v"]).unwrap();
        assert_eq!(args.config_path, PathBuf::from("tsdoc.yaml"));
        assert_eq!(args.output_format, Some(OutputFormat::Json));
        assert_eq!(args.output_path, Some(PathBuf::from("out.json")));
        assert!(args.verbose);

        let args = CliArgs::try_parse_from(["tsdoc-meta", "--config-path", "c.yaml"]).unwrap();
        assert_eq!(args.output_format, None);
        assert!(!args.verbose);
    }

    #[test]
    fn test_config_path_is_required() {
        assert!(CliArgs::try_parse_from(["tsdoc-meta"]).is_err());
        assert!(CliArgs::try_parse_from(["tsdoc-meta", "-c", "c.yaml", "-f", "xml"]).is_err());
    }

    #[test]
    fn test_missing_config_file_is_rejected() {
        let args = CliArgs::try_parse_from(["tsdoc-meta", "-c", "/definitely/missing/tsdoc.yaml"]).unwrap();
        assert!(parse_args_from_parsed(args).is_err());
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(OutputFormat::from_path(Path::new("meta.json")), OutputFormat::Json);
        assert_eq!(OutputFormat::from_path(Path::new("meta.yml")), OutputFormat::Yaml);
        assert_eq!(OutputFormat::from_path(Path::new("meta.yaml")), OutputFormat::Yaml);
        assert_eq!(OutputFormat::from_path(Path::new("doc-meta.ts")), OutputFormat::Ts);
        assert_eq!(OutputFormat::from_path(Path::new("meta")), OutputFormat::Ts);
    }
}
