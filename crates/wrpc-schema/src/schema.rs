//! Declarative schema definitions and the validation walk.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::issue::Issue;

/// A declarative schema for a procedure input.
///
/// Schemas are plain data: serializable, cloneable, and buildable with the
/// constructor methods below. Validation never panics, whatever the input.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Schema {
    /// Any JSON string.
    String,
    /// Any JSON number.
    Number,
    /// A JSON number with no fractional part.
    Integer,
    /// A JSON boolean.
    Boolean,
    /// Accepts any value unchanged.
    Any,
    /// A JSON array whose elements all match `items`.
    Array { items: Box<Schema> },
    /// A JSON object with declared properties.
    ///
    /// When `required` is absent every declared property is required;
    /// otherwise only the listed ones are. Undeclared properties are accepted
    /// and passed through untouched.
    Object {
        properties: BTreeMap<String, Schema>,
        #[serde(skip_serializing_if = "Option::is_none")]
        required: Option<Vec<String>>,
    },
}

impl Schema {
    /// Create a string schema.
    pub fn string() -> Self {
        Self::String
    }

    /// Create a number schema.
    pub fn number() -> Self {
        Self::Number
    }

    /// Create an integer schema.
    pub fn integer() -> Self {
        Self::Integer
    }

    /// Create a boolean schema.
    pub fn boolean() -> Self {
        Self::Boolean
    }

    /// Create a schema that accepts any value.
    pub fn any() -> Self {
        Self::Any
    }

    /// Create an array schema.
    pub fn array(items: Schema) -> Self {
        Self::Array {
            items: Box::new(items),
        }
    }

    /// Create an object schema; every declared property is required.
    pub fn object<K, I>(properties: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Schema)>,
    {
        Self::Object {
            properties: properties
                .into_iter()
                .map(|(k, v)| (k.into(), v))
                .collect(),
            required: None,
        }
    }

    /// Restrict which properties of an object schema are required.
    ///
    /// No effect on non-object schemas.
    pub fn with_required(mut self, names: Vec<String>) -> Self {
        if let Self::Object { required, .. } = &mut self {
            *required = Some(names);
        }
        self
    }

    /// Validate `raw` against this schema.
    ///
    /// Returns the accepted value on success, or every issue found, in
    /// document order. This engine performs no coercion; the accepted value is
    /// the input as given.
    pub fn validate(&self, raw: &Value) -> Result<Value, Vec<Issue>> {
        let mut issues = Vec::new();
        let mut path = Vec::new();
        self.check(raw, &mut path, &mut issues);
        if issues.is_empty() {
            Ok(raw.clone())
        } else {
            Err(issues)
        }
    }

    fn check(&self, value: &Value, path: &mut Vec<String>, issues: &mut Vec<Issue>) {
        match self {
            Schema::Any => {}
            Schema::String => {
                if !value.is_string() {
                    issues.push(Issue::invalid_type(path.clone(), "string", type_name(value)));
                }
            }
            Schema::Number => {
                if !value.is_number() {
                    issues.push(Issue::invalid_type(path.clone(), "number", type_name(value)));
                }
            }
            Schema::Integer => {
                if value.as_i64().is_none() && value.as_u64().is_none() {
                    issues.push(Issue::invalid_type(
                        path.clone(),
                        "integer",
                        type_name(value),
                    ));
                }
            }
            Schema::Boolean => {
                if !value.is_boolean() {
                    issues.push(Issue::invalid_type(
                        path.clone(),
                        "boolean",
                        type_name(value),
                    ));
                }
            }
            Schema::Array { items } => match value.as_array() {
                Some(elements) => {
                    for (index, element) in elements.iter().enumerate() {
                        path.push(index.to_string());
                        items.check(element, path, issues);
                        path.pop();
                    }
                }
                None => {
                    issues.push(Issue::invalid_type(path.clone(), "array", type_name(value)));
                }
            },
            Schema::Object {
                properties,
                required,
            } => match value.as_object() {
                Some(fields) => {
                    for (name, property) in properties {
                        match fields.get(name) {
                            Some(field) => {
                                path.push(name.clone());
                                property.check(field, path, issues);
                                path.pop();
                            }
                            None if is_required(required, name) => {
                                issues.push(Issue::missing_field(path.clone(), name));
                            }
                            None => {}
                        }
                    }
                }
                None => {
                    issues.push(Issue::invalid_type(
                        path.clone(),
                        "object",
                        type_name(value),
                    ));
                }
            },
        }
    }
}

fn is_required(required: &Option<Vec<String>>, name: &str) -> bool {
    match required {
        Some(names) => names.iter().any(|n| n == name),
        None => true,
    }
}

/// Wire-facing name of a JSON value's type.
fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
