use crate::ast::{Comment, DeclId};
use crate::error::{Error, Result};
use crate::project::Project;
use log::debug;

/// A class documented with the marker tag together with the indices of its
/// marked methods.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotatedClass {
    pub id: DeclId,
    pub methods: Vec<usize>,
}

/// Finds classes and methods whose first JSDoc block carries `@<tag>`.
///
/// Only files picked up by the scanner are searched; declarations loaded on
/// demand to resolve imports never contribute classes.
pub struct AnnotationDetector {
    tag: String,
}

impl AnnotationDetector {
    pub fn new(tag: impl Into<String>) -> Self {
        Self { tag: tag.into() }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Detects annotated classes in scanned files, in file then declaration
    /// order. A class only counts when at least one of its methods is marked
    /// too; of several methods sharing a name the first one is kept.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoAnnotatedMethods`] when nothing is found.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use tsdoc_meta::detector::AnnotationDetector;
    /// use tsdoc_meta::project::Project;
    /// use std::path::PathBuf;
    ///
    /// let project = Project::load("./app", &[PathBuf::from("./app/src/user.controller.ts")]);
    /// let classes = AnnotationDetector::new("tsDoc").detect(&project).unwrap();
    /// println!("Found {} annotated class(es)", classes.len());
    /// ```
    pub fn detect(&self, project: &Project) -> Result<Vec<AnnotatedClass>> {
        let mut classes = Vec::new();

        for file in project.scanned_files() {
            for (index, declaration) in project.file(file).module.declarations.iter().enumerate() {
                let Some(class) = declaration.as_class() else {
                    continue;
                };
                if !self.is_annotated(&declaration.docs) {
                    continue;
                }

                let mut names: Vec<&str> = Vec::new();
                let mut methods = Vec::new();
                for (i, method) in class.methods.iter().enumerate() {
                    if self.is_annotated(&method.docs) && !names.contains(&method.name.as_str()) {
                        names.push(&method.name);
                        methods.push(i);
                    }
                }
                debug!(
                    "Class {:?} in {}: {} annotated methods",
                    declaration.name,
                    project.file(file).path.display(),
                    methods.len()
                );
                if !methods.is_empty() {
                    classes.push(AnnotatedClass {
                        id: DeclId { file, index },
                        methods,
                    });
                }
            }
        }

        if classes.is_empty() {
            return Err(Error::NoAnnotatedMethods { tag: self.tag.clone() });
        }
        Ok(classes)
    }

    /// Whether the first JSDoc block in `docs` mentions the marker tag.
    pub fn is_annotated(&self, docs: &[Comment]) -> bool {
        docs.iter()
            .find(|c| c.is_jsdoc())
            .is_some_and(|c| self.find_tag(&c.text).is_some())
    }

    /// Inner text of every JSDoc block with the marker tag removed. Blocks
    /// left empty are dropped.
    pub fn strip_tag(&self, docs: &[Comment]) -> Vec<String> {
        docs.iter()
            .filter(|c| c.is_jsdoc())
            .filter_map(|comment| {
                let text = comment
                    .inner_text()
                    .lines()
                    .map(|line| self.remove_tag(line))
                    .filter(|line| !line.trim().is_empty())
                    .collect::<Vec<_>>()
                    .join("\n");
                let text = text.trim();
                (!text.is_empty()).then(|| text.to_string())
            })
            .collect()
    }

    fn remove_tag(&self, line: &str) -> String {
        let mut line = line.to_string();
        while let Some(start) = self.find_tag(&line) {
            line.replace_range(start..start + self.tag.len() + 1, "");
        }
        line.trim_end().to_string()
    }

    /// Byte offset of `@<tag>` not followed by an identifier character.
    fn find_tag(&self, text: &str) -> Option<usize> {
        let marker = format!("@{}", self.tag);
        let mut from = 0;
        while let Some(pos) = text[from..].find(&marker) {
            let start = from + pos;
            let end = start + marker.len();
            let boundary = text[end..]
                .chars()
                .next()
                .map_or(true, |c| !(c.is_alphanumeric() || c == '_' || c == '$'));
            if boundary {
                return Some(start);
            }
            from = end;
        }
        None
    }
}
