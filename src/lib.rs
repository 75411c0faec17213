//! tsdoc-meta - Documentation metadata from annotated TypeScript service methods.
//!
//! Classes whose JSDoc carries a marker tag (`@tsDoc` by default) are
//! inspected method by method. For every marked method the library resolves
//! the declarations its parameter and return types depend on, builds a
//! schema of them and synthesizes example payloads, producing one
//! [`meta_builder::MethodGroup`] per class.
//!
//! # Architecture
//!
//! 1. [`scanner`] - Finds TypeScript files matching the configured globs
//! 2. [`parser`] - Parses files into the declaration-level [`ast`]
//! 3. [`project`] - Holds parsed files and resolves modules and names
//! 4. [`detector`] - Finds marked classes and methods
//! 5. [`type_resolver`] - Computes the declaration closure of method types
//! 6. [`namespace`] - Builds the synthetic namespace of one class
//! 7. [`schema_generator`] - Extracts schemas from the namespace
//! 8. [`example`] - Synthesizes example values from schemas
//! 9. [`meta_builder`] - Assembles method records
//! 10. [`serializer`] - Writes the result as TypeScript, JSON or YAML
//!
//! # Example Usage
//!
//! ```no_run
//! use tsdoc_meta::{
//!     detector::AnnotationDetector,
//!     meta_builder::MetaBuilder,
//!     project::Project,
//!     scanner::FileScanner,
//!     serializer::serialize_ts,
//! };
//! use std::path::PathBuf;
//!
//! let root = PathBuf::from("./my-app");
//! let scan = FileScanner::new(root.clone(), vec!["src/**/*.ts".to_string()]).scan().unwrap();
//! let project = Project::load(&root, &scan.ts_files);
//!
//! let detector = AnnotationDetector::new("tsDoc");
//! let mut builder = MetaBuilder::new(&project, &detector);
//! for class in detector.detect(&project).unwrap() {
//!     builder.add_class(&class).unwrap();
//! }
//! println!("{}", serialize_ts(&builder.build()).unwrap());
//! ```
//!
//! # Command-Line Interface
//!
//! For command-line usage, see the [`cli`] module.

pub mod ast;
pub mod cli;
pub mod config;
pub mod detector;
pub mod error;
pub mod example;
pub mod meta_builder;
pub mod namespace;
pub mod parser;
pub mod project;
pub mod scanner;
pub mod schema_generator;
pub mod serializer;
pub mod type_resolver;
