use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the library. Every variant is fatal to a generation run.
#[derive(Debug, Error)]
pub enum Error {
    /// A declaration reached by the closure resolver has no name, e.g.
    /// `export default class {}`.
    #[error("declaration in {} has no name", file.display())]
    MissingDeclarationName { file: PathBuf },

    #[error("cannot resolve module `{specifier}` imported from {}", from.display())]
    UnresolvedModule { specifier: String, from: PathBuf },

    #[error("no interface, type alias, class or enum named `{name}` in {}", file.display())]
    UnresolvedDeclaration { name: String, file: PathBuf },

    #[error("no class documented with @{tag} has a method documented with @{tag}")]
    NoAnnotatedMethods { tag: String },

    #[error("parse error in {}: {message}", file.display())]
    Parse { file: PathBuf, message: String },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(format!("JSON: {}", err))
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error::Serialization(format!("YAML: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_offending_item() {
        let err = Error::UnresolvedModule {
            specifier: "./missing".to_string(),
            from: PathBuf::from("src/a.ts"),
        };
        assert_eq!(
            err.to_string(),
            "cannot resolve module `./missing` imported from src/a.ts"
        );

        let err = Error::UnresolvedDeclaration {
            name: "User".to_string(),
            file: PathBuf::from("src/models.ts"),
        };
        assert!(err.to_string().contains("`User`"));
        assert!(err.to_string().contains("src/models.ts"));

        let err = Error::NoAnnotatedMethods {
            tag: "tsDoc".to_string(),
        };
        assert!(err.to_string().contains("@tsDoc"));
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
