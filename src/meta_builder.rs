//! Assembly of per-class method metadata.
//!
//! For every annotated class the builder creates the synthetic namespace,
//! extracts the `$methods` schema and turns it into example values: the
//! default-mode example of each return type and the origin-mode example of
//! each parameter.

use crate::ast::Method;
use crate::detector::{AnnotatedClass, AnnotationDetector};
use crate::error::Result;
use crate::example::{ExampleSynthesizer, Mode};
use crate::namespace::{NamespaceBuilder, METHODS_INTERFACE};
use crate::project::SourceModel;
use crate::schema_generator::{SchemaGenerator, SchemaItems, SchemaNode};
use crate::serializer::{render_compact, render_example};
use log::debug;
use serde::{Deserialize, Serialize};

/// Methods of one annotated class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodGroup {
    pub class_name: String,
    pub class_comments: Vec<String>,
    pub methods: Vec<MethodRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodRecord {
    pub name: String,
    pub method_comments: Vec<String>,
    pub decorators: Vec<DecoratorRecord>,
    pub params: Vec<ParamRecord>,
    /// Pretty-printed default example of the awaited return type, prefixed
    /// with a newline
    pub return_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecoratorRecord {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamRecord {
    pub name: String,
    /// Leading comments as written, delimiters included
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<Vec<String>>,
    pub required: bool,
    #[serde(rename = "type")]
    pub param_type: String,
}

/// Builder collecting [`MethodGroup`]s, one per annotated class.
pub struct MetaBuilder<'m, M: ?Sized> {
    model: &'m M,
    detector: &'m AnnotationDetector,
    groups: Vec<MethodGroup>,
}

impl<'m, M: SourceModel + ?Sized> MetaBuilder<'m, M> {
    pub fn new(model: &'m M, detector: &'m AnnotationDetector) -> Self {
        Self {
            model,
            detector,
            groups: Vec::new(),
        }
    }

    /// Adds the group of `class`.
    ///
    /// # Errors
    ///
    /// Propagates closure resolution errors of the method types.
    pub fn add_class(&mut self, class: &AnnotatedClass) -> Result<()> {
        let declaration = self.model.declaration(class.id);
        let Some(class_decl) = declaration.as_class() else {
            return Ok(());
        };
        let class_name = declaration.name.clone().unwrap_or_default();
        debug!("Building metadata for class {}", class_name);

        let namespace = NamespaceBuilder::new(self.model).build(class.id, &class.methods)?;
        let schema = SchemaGenerator::new(&namespace)
            .generate(METHODS_INTERFACE)
            .unwrap_or_default();

        let methods = class
            .methods
            .iter()
            .filter_map(|&i| class_decl.methods.get(i))
            .map(|method| self.method_record(method, schema.property(&method.name)))
            .collect();
        let class_comments = self.detector.strip_tag(&declaration.docs);

        self.groups.push(MethodGroup {
            class_name,
            class_comments,
            methods,
        });
        Ok(())
    }

    fn method_record(&self, method: &Method, schema: Option<&SchemaNode>) -> MethodRecord {
        // Each tuple item carries the camelCase marker of its own parameter.
        let items: &[SchemaNode] = match schema.and_then(|s| s.property("params")).and_then(|p| p.items.as_ref()) {
            Some(SchemaItems::Tuple(items)) => items,
            _ => &[],
        };

        let origin = ExampleSynthesizer::new(Mode::Origin);
        let params = method
            .signature
            .params
            .iter()
            .enumerate()
            .map(|(i, param)| {
                let param_type = items
                    .get(i)
                    .and_then(|item| origin.synthesize(item, false))
                    .map(|value| render_compact(&value))
                    .unwrap_or_else(|| param.ty.as_ref().map_or_else(|| "any".to_string(), |ty| ty.to_string()));
                ParamRecord {
                    name: param.name.clone(),
                    comments: (!param.comments.is_empty())
                        .then(|| param.comments.iter().map(|c| c.text.clone()).collect()),
                    required: !param.optional,
                    param_type,
                }
            })
            .collect();

        let return_example = schema
            .and_then(|s| s.property("return"))
            .and_then(|ret| ExampleSynthesizer::new(Mode::Default).synthesize(ret, false))
            .map_or_else(|| "{}".to_string(), |value| render_example(&value));

        MethodRecord {
            name: method.name.clone(),
            method_comments: self.detector.strip_tag(&method.docs),
            decorators: method
                .decorators
                .iter()
                .map(|d| DecoratorRecord { name: d.name.clone() })
                .collect(),
            params,
            return_type: format!("\n{}", return_example),
        }
    }

    pub fn build(self) -> Vec<MethodGroup> {
        self.groups
    }
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

    fn groups(project: &Project) -> Vec<MethodGroup> {
        let detector = AnnotationDetector::new("tsDoc");
        let classes = detector.detect(project).unwrap();
        let mut builder = MetaBuilder::new(project, &detector);
        for class in &classes {
            builder.add_class(class).unwrap();
        }
        builder.build()
    }

    #[test]
    fn test_params_and_awaited_return() {
        let project = project(&[(
            "/p/counter.ts",
            r#"
            /** @tsDoc */
            export class Counter {
              /** @tsDoc */
              async count(id: number, active?: boolean): Promise<{count: number}> {
                return { count: 0 }
              }
            }
            "#,
        )]);
        let groups = groups(&project);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].class_name, "Counter");
        assert!(groups[0].class_comments.is_empty());

        let method = &groups[0].methods[0];
        assert_eq!(method.name, "count");
        assert_eq!(
            method.params,
            vec![
                ParamRecord {
                    name: "id".to_string(),
                    comments: None,
                    required: true,
                    param_type: "number".to_string(),
                },
                ParamRecord {
                    name: "active".to_string(),
                    comments: None,
                    required: false,
                    param_type: "boolean".to_string(),
                },
            ]
        );
        assert_eq!(method.return_type, "\n{\n  count: 0\n}");
    }

    #[test]
    fn test_comments_decorators_and_camel_case() {
        let project = project(&[
            (
                "/p/user.controller.ts",
                r#"
                import { Profile } from './profile';

                type CamelCase<T> = T;

                /**
                 * User endpoints
                 * @tsDoc
                 */
                @Controller('users')
                export class UserController {
                  /**
                   * Updates a profile
                   * @tsDoc
                   */
                  @Http.Post('update')
                  update(
                    //user id
                    id: number,
                    body: CamelCase<Profile>,
                    callback: unknown,
                  ): Promise<User> {
                    return null as any
                  }

                  /** @tsDoc */
                  ping(): void {}
                }

                interface User {
                  //user id
                  id: number
                  role: Role
                }

                enum Role { Admin = 'admin' }
                "#,
            ),
            ("/p/profile.ts", "export interface Profile { first_name: string; home_page?: string }"),
        ]);
        let groups = groups(&project);
        let group = &groups[0];
        assert_eq!(group.class_comments, vec!["User endpoints".to_string()]);

        let update = &group.methods[0];
        assert_eq!(update.method_comments, vec!["Updates a profile".to_string()]);
        assert_eq!(
            update.decorators,
            vec![DecoratorRecord {
                name: "Http.Post".to_string()
            }]
        );
        assert_eq!(update.params[0].comments, Some(vec!["//user id".to_string()]));
        assert_eq!(update.params[1].param_type, r#"{"firstName":"string","homePage":"string"}"#);
        assert_eq!(update.params[2].param_type, "unknown");
        assert_eq!(update.return_type, "\n{\n  // user id\n  id: 0,\n  role: \"\"\n}");

        let ping = &group.methods[1];
        assert!(ping.params.is_empty());
        assert_eq!(ping.return_type, "\n{}");
    }

    #[test]
    fn test_camel_case_applies_per_parameter() {
        let project = project(&[(
            "/p/profile.controller.ts",
            r#"
            type CamelCase<T> = T;
            interface Profile { first_name: string }
            interface Raw { snake_key: number }

            /** @tsDoc */
            export class ProfileController {
              /** @tsDoc */
              update(body: CamelCase<Profile>, raw: Raw): void {}
            }
            "#,
        )]);
        let update = &groups(&project)[0].methods[0];
        assert_eq!(update.params[0].param_type, r#"{"firstName":"string"}"#);
        assert_eq!(update.params[1].param_type, r#"{"snake_key":"number"}"#);
    }

    #[test]
    fn test_arrays_of_functions_are_left_out() {
        let project = project(&[(
            "/p/hooks.controller.ts",
            r#"
            interface R { cbs: Array<() => void>; ok: boolean }

            /** @tsDoc */
            export class Hooks {
              /** @tsDoc */
              list(): R { return null as any }
            }
            "#,
        )]);
        assert_eq!(groups(&project)[0].methods[0].return_type, "\n{\n  ok: false\n}");
    }

    #[test]
    fn test_nested_generic_return() {
        let project = project(&[(
            "/p/wrap.controller.ts",
            r#"
            interface Wrap<T> { data: T }

            /** @tsDoc */
            export class Wrapped {
              /** @tsDoc */
              get(): Wrap<Wrap<number>> { return null as any }
            }
            "#,
        )]);
        assert_eq!(
            groups(&project)[0].methods[0].return_type,
            "\n{\n  data: {\n    data: 0\n  }\n}"
        );
    }

    #[test]
    fn test_method_group_serializes_camel_case_keys() {
        let group = MethodGroup {
            class_name: "A".to_string(),
            class_comments: Vec::new(),
            methods: vec![MethodRecord {
                name: "run".to_string(),
                method_comments: Vec::new(),
                decorators: Vec::new(),
                params: Vec::new(),
                return_type: "\n{}".to_string(),
            }],
        };
        let value = serde_json::to_value(&group).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "className": "A",
                "classComments": [],
                "methods": [{
                    "name": "run",
                    "methodComments": [],
                    "decorators": [],
                    "params": [],
                    "returnType": "\n{}"
                }]
            })
        );
    }
}
