//! # WRPC Input Schemas
//!
//! Declarative schemas for procedure inputs, plus the structured issue list
//! produced when a raw input does not match its schema.
//!
//! A [`Schema`] describes the expected shape of a procedure's input. Validating
//! a raw [`serde_json::Value`] against it either returns the accepted value or
//! an ordered list of [`Issue`]s, each carrying a machine-readable code, the
//! offending field path, and a human-readable message.
//!
//! ```rust
//! use wrpc_schema::Schema;
//! use serde_json::json;
//!
//! let schema = Schema::object([("name", Schema::string())]);
//!
//! assert!(schema.validate(&json!({"name": "John"})).is_ok());
//!
//! let issues = schema.validate(&json!({"name": 1})).unwrap_err();
//! assert_eq!(issues[0].path, vec!["name"]);
//! ```

pub mod issue;
pub mod schema;

pub use issue::{Issue, IssueCode, SchemaViolation};
pub use schema::Schema;
