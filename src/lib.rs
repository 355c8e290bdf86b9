//! OpenAPI Type Schema - OpenAPI schemas from Rust type declarations.
//!
//! This library translates Rust types into OpenAPI Schema Objects, honouring
//! serde attributes (renames, skips, flatten, `rename_all`), a caller-supplied
//! naming strategy and an `x-ms-visibility` annotation. It also imports generic
//! JSON Schema documents and converts arbitrary JSON values into the OpenAPI
//! Any value model.
//!
//! # Architecture
//!
//! 1. [`scanner`] - Recursively scans project directories for Rust files
//! 2. [`parser`] - Parses Rust source files into syntax trees
//! 3. [`type_resolver`] - Builds the descriptor table and classifies types
//! 4. [`schema_generator`] - Translates type references into [`Schema`]s
//! 5. [`json_schema`] - Imports JSON Schema documents
//! 6. [`any_value`] - Converts JSON tokens into [`AnyValue`]s
//! 7. [`serializer`] - Serializes schemas to YAML or JSON
//!
//! # Example Usage
//!
//! ```no_run
//! use openapi_type_schema::{
//!     naming::NamingConvention,
//!     parser::AstParser,
//!     scanner::FileScanner,
//!     serializer::serialize_yaml,
//!     SchemaGenerator, TypeInfo, TypeResolver,
//! };
//! use std::path::PathBuf;
//!
//! let scan_result = FileScanner::new(PathBuf::from("./my-project")).scan().unwrap();
//! let parsed_files: Vec<_> = AstParser::parse_files(&scan_result.rust_files)
//!     .into_iter()
//!     .filter_map(Result::ok)
//!     .collect();
//!
//! let type_resolver = TypeResolver::new(&parsed_files);
//! let naming = NamingConvention::CamelCase.strategy();
//! let generator = SchemaGenerator::new(&type_resolver, &*naming);
//!
//! let schema = generator
//!     .generate_root_schema(&TypeInfo::parse("Vec<Order>").unwrap())
//!     .unwrap();
//! println!("{}", serialize_yaml(&schema).unwrap());
//! ```
//!
//! Types can also be registered without any source files:
//!
//! ```
//! use openapi_type_schema::{
//!     descriptor::{FieldDef, StructDef, TypeDefinition},
//!     naming::camel_case,
//!     translate, TypeInfo, TypeResolver,
//! };
//!
//! let person = StructDef::new("Person")
//!     .field(FieldDef::new("Name", TypeInfo::new("String")))
//!     .field(FieldDef::new("Age", TypeInfo::option(TypeInfo::new("i32"))));
//! let type_resolver = TypeResolver::from_definitions([TypeDefinition::from(person)]);
//!
//! let schema = translate(&TypeInfo::new("Person"), &type_resolver, &camel_case, None).unwrap();
//! let properties = schema.properties.unwrap();
//! assert!(properties["age"].nullable);
//! assert_eq!(properties["name"].schema_type.as_deref(), Some("string"));
//! ```

pub mod any_value;
pub mod cli;
pub mod descriptor;
pub mod error;
pub mod json_schema;
pub mod naming;
pub mod parser;
pub mod scanner;
pub mod schema;
pub mod schema_generator;
pub mod serializer;
pub mod type_resolver;

pub use any_value::{to_any, AnyValue, JsonToken};
pub use descriptor::{TypeInfo, Visibility};
pub use error::{Error, Result};
pub use json_schema::{import_json_schema, JsonSchema};
pub use schema::Schema;
pub use schema_generator::{translate, SchemaGenerator};
pub use type_resolver::TypeResolver;
