// Declarative parameter schemas: one structure drives both the catalog's
// inputSchema rendering and argument validation, so the two cannot drift.

use serde_json::{json, Map, Value};
use std::fmt;

/// The kind of value a parameter accepts.
#[derive(Debug, Clone)]
pub enum FieldKind {
    String,
    Number,
    Boolean,
    /// A string restricted to the given literals.
    Enum(&'static [&'static str]),
    /// An array whose items all have the given kind.
    Array(Box<FieldKind>),
    /// A nested object with its own schema.
    Object(Schema),
}

#[derive(Debug, Clone)]
struct FieldSpec {
    name: &'static str,
    kind: FieldKind,
    description: &'static str,
    required: bool,
}

/// An ordered set of parameter specs for one tool.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    fields: Vec<FieldSpec>,
}

impl Schema {
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Add a required field.
    pub fn required(mut self, name: &'static str, kind: FieldKind, description: &'static str) -> Self {
        self.fields.push(FieldSpec {
            name,
            kind,
            description,
            required: true,
        });
        self
    }

    /// Add an optional field.
    pub fn optional(mut self, name: &'static str, kind: FieldKind, description: &'static str) -> Self {
        self.fields.push(FieldSpec {
            name,
            kind,
            description,
            required: false,
        });
        self
    }

    /// Render the JSON Schema object advertised in the tool catalog.
    pub fn input_schema(&self) -> Value {
        let mut properties = Map::new();
        let mut required = Vec::new();

        for field in &self.fields {
            let mut rendered = render_kind(&field.kind);
            if !field.description.is_empty() {
                if let Some(object) = rendered.as_object_mut() {
                    object.insert("description".to_string(), json!(field.description));
                }
            }
            properties.insert(field.name.to_string(), rendered);
            if field.required {
                required.push(field.name);
            }
        }

        json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }

    /// Validate arguments structurally: required fields present, every
    /// supplied field of the declared kind. Unknown fields are ignored and
    /// `null` counts as absent. All problems are reported, not just the first.
    pub fn validate(&self, arguments: &Value) -> Result<(), ValidationError> {
        let mut problems = Vec::new();
        self.check_object(arguments, "", &mut problems);
        if problems.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { problems })
        }
    }

    fn check_object(&self, value: &Value, path: &str, problems: &mut Vec<String>) {
        let object = match value.as_object() {
            Some(object) => object,
            None => {
                problems.push(problem(path, "expected an object"));
                return;
            }
        };

        for field in &self.fields {
            let field_path = join_path(path, field.name);
            match object.get(field.name) {
                None | Some(Value::Null) => {
                    if field.required {
                        problems.push(problem(&field_path, "missing required field"));
                    }
                }
                Some(supplied) => check_kind(&field.kind, supplied, &field_path, problems),
            }
        }
    }
}

fn check_kind(kind: &FieldKind, value: &Value, path: &str, problems: &mut Vec<String>) {
    match kind {
        FieldKind::String => {
            if !value.is_string() {
                problems.push(problem(path, "expected a string"));
            }
        }
        FieldKind::Number => {
            if !value.is_number() {
                problems.push(problem(path, "expected a number"));
            }
        }
        FieldKind::Boolean => {
            if !value.is_boolean() {
                problems.push(problem(path, "expected a boolean"));
            }
        }
        FieldKind::Enum(allowed) => match value.as_str() {
            Some(supplied) if allowed.contains(&supplied) => {}
            _ => problems.push(problem(
                path,
                &format!("expected one of: {}", allowed.join(", ")),
            )),
        },
        FieldKind::Array(items) => match value.as_array() {
            Some(supplied) => {
                for (index, item) in supplied.iter().enumerate() {
                    check_kind(items, item, &format!("{}[{}]", path, index), problems);
                }
            }
            None => problems.push(problem(path, "expected an array")),
        },
        FieldKind::Object(schema) => schema.check_object(value, path, problems),
    }
}

fn render_kind(kind: &FieldKind) -> Value {
    match kind {
        FieldKind::String => json!({"type": "string"}),
        FieldKind::Number => json!({"type": "number"}),
        FieldKind::Boolean => json!({"type": "boolean"}),
        FieldKind::Enum(allowed) => json!({"type": "string", "enum": allowed}),
        FieldKind::Array(items) => json!({"type": "array", "items": render_kind(items)}),
        FieldKind::Object(schema) => schema.input_schema(),
    }
}

fn join_path(path: &str, name: &str) -> String {
    if path.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", path, name)
    }
}

fn problem(path: &str, message: &str) -> String {
    if path.is_empty() {
        message.to_string()
    } else {
        format!("{}: {}", path, message)
    }
}

/// Structural validation failure listing every offending field.
#[derive(Debug, Clone)]
pub struct ValidationError {
    problems: Vec<String>,
}

impl ValidationError {
    pub fn new(problems: Vec<String>) -> Self {
        Self { problems }
    }

    pub fn problems(&self) -> &[String] {
        &self.problems
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid arguments: {}", self.problems.join("; "))
    }
}

impl std::error::Error for ValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_schema() -> Schema {
        Schema::new()
            .required("owner", FieldKind::String, "Repository owner")
            .required("repo", FieldKind::String, "Repository name")
            .optional("per_page", FieldKind::Number, "Results per page")
            .optional(
                "state",
                FieldKind::Enum(&["open", "closed", "all"]),
                "Filter state",
            )
    }

    #[test]
    fn test_valid_arguments_pass() {
        let schema = sample_schema();
        let args = json!({"owner": "acme", "repo": "widgets", "per_page": 10, "state": "open"});
        assert!(schema.validate(&args).is_ok());
    }

    #[test]
    fn test_missing_required_fields_all_reported() {
        let schema = sample_schema();
        let err = schema.validate(&json!({})).unwrap_err();
        assert_eq!(err.problems().len(), 2);
        assert!(err.to_string().contains("owner: missing required field"));
        assert!(err.to_string().contains("repo: missing required field"));
    }

    #[test]
    fn test_null_counts_as_absent() {
        let schema = sample_schema();
        let err = schema
            .validate(&json!({"owner": null, "repo": "widgets"}))
            .unwrap_err();
        assert_eq!(err.problems(), ["owner: missing required field"]);

        // Null on an optional field is fine.
        let args = json!({"owner": "acme", "repo": "widgets", "per_page": null});
        assert!(schema.validate(&args).is_ok());
    }

    #[test]
    fn test_wrong_kind_rejected() {
        let schema = sample_schema();
        let err = schema
            .validate(&json!({"owner": 7, "repo": "widgets", "per_page": "ten"}))
            .unwrap_err();
        assert!(err.to_string().contains("owner: expected a string"));
        assert!(err.to_string().contains("per_page: expected a number"));
    }

    #[test]
    fn test_enum_literal_enforced() {
        let schema = sample_schema();
        let err = schema
            .validate(&json!({"owner": "acme", "repo": "widgets", "state": "reopened"}))
            .unwrap_err();
        assert!(err
            .to_string()
            .contains("state: expected one of: open, closed, all"));
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let schema = sample_schema();
        let args = json!({"owner": "acme", "repo": "widgets", "surprise": true});
        assert!(schema.validate(&args).is_ok());
    }

    #[test]
    fn test_nested_array_of_objects() {
        let schema = Schema::new().required(
            "files",
            FieldKind::Array(Box::new(FieldKind::Object(
                Schema::new()
                    .required("path", FieldKind::String, "File path")
                    .required("content", FieldKind::String, "File content"),
            ))),
            "Files to push",
        );

        let ok = json!({"files": [{"path": "a.txt", "content": "a"}]});
        assert!(schema.validate(&ok).is_ok());

        let err = schema
            .validate(&json!({"files": [{"path": "a.txt"}, {"path": 3, "content": "b"}]}))
            .unwrap_err();
        assert!(err
            .to_string()
            .contains("files[0].content: missing required field"));
        assert!(err.to_string().contains("files[1].path: expected a string"));

        let err = schema.validate(&json!({"files": "a.txt"})).unwrap_err();
        assert!(err.to_string().contains("files: expected an array"));
    }

    #[test]
    fn test_input_schema_rendering() {
        let schema = sample_schema();
        let rendered = schema.input_schema();
        assert_eq!(rendered["type"], "object");
        assert_eq!(rendered["required"], json!(["owner", "repo"]));
        assert_eq!(
            rendered["properties"]["owner"],
            json!({"type": "string", "description": "Repository owner"})
        );
        assert_eq!(
            rendered["properties"]["state"],
            json!({
                "type": "string",
                "enum": ["open", "closed", "all"],
                "description": "Filter state"
            })
        );
    }
}
