//! Response contracts
//!
//! A contract declares the shape a structured model response must have and
//! turns a raw JSON value into a typed domain value, or into the list of
//! violations that prevented it.

use std::fmt;
use std::marker::PhantomData;

use jsonschema::JSONSchema;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// One contract violation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// JSON pointer of the offending value ("/" for the document root)
    pub path: String,
    /// Expected vs. actual
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Contract construction errors
#[derive(Debug, thiserror::Error)]
pub enum ContractError {
    #[error("Contract '{contract}' schema could not be generated: {message}")]
    Schema { contract: String, message: String },

    #[error("Contract '{contract}' schema does not compile: {message}")]
    Compile { contract: String, message: String },
}

/// Validator for one domain payload
pub trait ResponseContract: Send + Sync {
    type Output: Send;

    /// Contract name used in diagnostics
    fn name(&self) -> &str;

    /// JSON Schema the response must satisfy
    fn schema(&self) -> &JsonValue;

    /// Validate `raw` and convert it to the typed value
    fn validate(&self, raw: &JsonValue) -> Result<Self::Output, Vec<Violation>>;
}

/// Contract derived from a Rust type's `JsonSchema` implementation
pub struct JsonSchemaContract<T> {
    name: String,
    schema: JsonValue,
    compiled: JSONSchema,
    _output: PhantomData<fn() -> T>,
}

impl<T> fmt::Debug for JsonSchemaContract<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonSchemaContract")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl<T> JsonSchemaContract<T>
where
    T: JsonSchema + DeserializeOwned,
{
    /// Generate and compile the schema for `T`
    pub fn new(name: impl Into<String>) -> Result<Self, ContractError> {
        let name = name.into();
        let root = schemars::schema_for!(T);
        let schema = serde_json::to_value(&root).map_err(|e| ContractError::Schema {
            contract: name.clone(),
            message: e.to_string(),
        })?;
        let compiled = JSONSchema::compile(&schema).map_err(|e| ContractError::Compile {
            contract: name.clone(),
            message: e.to_string(),
        })?;

        Ok(Self {
            name,
            schema,
            compiled,
            _output: PhantomData,
        })
    }

    /// Schema rendered for inclusion in a prompt
    pub fn schema_text(&self) -> String {
        serde_json::to_string_pretty(&self.schema).unwrap_or_else(|_| self.schema.to_string())
    }
}

impl<T> ResponseContract for JsonSchemaContract<T>
where
    T: JsonSchema + DeserializeOwned + Send,
{
    type Output = T;

    fn name(&self) -> &str {
        &self.name
    }

    fn schema(&self) -> &JsonValue {
        &self.schema
    }

    fn validate(&self, raw: &JsonValue) -> Result<T, Vec<Violation>> {
        if let Err(errors) = self.compiled.validate(raw) {
            let violations: Vec<Violation> = errors
                .map(|e| Violation {
                    path: pointer_or_root(e.instance_path.to_string()),
                    message: e.to_string(),
                })
                .collect();
            return Err(violations);
        }

        // The schema accepted the value, so this only fails on constraints
        // JSON Schema cannot express.
        serde_json::from_value(raw.clone()).map_err(|e| {
            vec![Violation {
                path: "/".to_string(),
                message: e.to_string(),
            }]
        })
    }
}

fn pointer_or_root(pointer: String) -> String {
    if pointer.is_empty() {
        "/".to_string()
    } else {
        pointer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, PartialEq, Deserialize, JsonSchema)]
    #[serde(rename_all = "camelCase")]
    struct Sample {
        is_valid: bool,
        items: Vec<Item>,
    }

    #[derive(Debug, PartialEq, Deserialize, JsonSchema)]
    struct Item {
        name: String,
        #[schemars(range(min = 1))]
        order: u32,
    }

    fn contract() -> JsonSchemaContract<Sample> {
        JsonSchemaContract::new("sample").expect("schema compiles")
    }

    #[test]
    fn test_conformant_value_is_typed() {
        let value = json!({"isValid": true, "items": [{"name": "a", "order": 1}]});
        let sample = contract().validate(&value).unwrap();
        assert_eq!(
            sample,
            Sample {
                is_valid: true,
                items: vec![Item {
                    name: "a".to_string(),
                    order: 1
                }],
            }
        );
    }

    #[test]
    fn test_missing_required_field() {
        let value = json!({"items": []});
        let violations = contract().validate(&value).unwrap_err();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].path, "/");
        assert!(violations[0].message.contains("isValid"));
    }

    #[test]
    fn test_wrong_type_reports_path() {
        let value = json!({"isValid": "yes", "items": [{"name": "a", "order": "first"}]});
        let violations = contract().validate(&value).unwrap_err();
        let paths: Vec<&str> = violations.iter().map(|v| v.path.as_str()).collect();
        assert!(paths.contains(&"/isValid"));
        assert!(paths.contains(&"/items/0/order"));
    }

    #[test]
    fn test_range_constraint() {
        let value = json!({"isValid": true, "items": [{"name": "a", "order": 0}]});
        let violations = contract().validate(&value).unwrap_err();
        assert_eq!(violations[0].path, "/items/0/order");
    }

    #[test]
    fn test_schema_text_mentions_fields() {
        let text = contract().schema_text();
        assert!(text.contains("isValid"));
        assert!(text.contains("items"));
    }
}
