//! Import of generic JSON Schema documents into OpenAPI schemas.
//!
//! [`JsonSchema`] deserializes the common JSON Schema vocabulary (drafts 4
//! through 2020-12 where they agree). [`import_json_schema`] copies it field by
//! field into a [`Schema`]; it does not apply naming strategies or visibility
//! annotations.

use crate::any_value::json_to_any;
use crate::error::{Error, Result};
use crate::schema::Schema;
use indexmap::IndexMap;
use log::{debug, warn};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// A parsed JSON Schema document
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonSchema {
    #[serde(rename = "type")]
    pub schema_type: Option<OneOrMany<String>>,
    pub format: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub default: Option<serde_json::Value>,
    #[serde(rename = "enum")]
    pub enum_values: Option<Vec<serde_json::Value>>,
    #[serde(default)]
    pub properties: IndexMap<String, JsonSchema>,
    #[serde(default)]
    pub required: Vec<String>,
    pub items: Option<OneOrMany<JsonSchema>>,
    pub any_of: Option<Vec<JsonSchema>>,
    pub additional_properties: Option<AdditionalProperties>,
    pub maximum: Option<f64>,
    pub exclusive_maximum: Option<Exclusivity>,
    pub minimum: Option<f64>,
    pub exclusive_minimum: Option<Exclusivity>,
    pub max_items: Option<u64>,
    pub min_items: Option<u64>,
    pub max_length: Option<u64>,
    pub min_length: Option<u64>,
    pub pattern: Option<String>,
    pub read_only: Option<bool>,
    /// OpenAPI 3.0 dialect
    pub nullable: Option<bool>,
}

/// A keyword that takes either one value or a list
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(Box<T>),
    Many(Vec<T>),
}

/// `additionalProperties`: a boolean switch or a value schema
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum AdditionalProperties {
    Allowed(bool),
    Schema(Box<JsonSchema>),
}

/// `exclusiveMaximum`/`exclusiveMinimum`: a draft-4 flag or a draft-6+ bound
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Exclusivity {
    Flag(bool),
    Bound(f64),
}

impl JsonSchema {
    /// Parses a JSON Schema document from JSON text.
    pub fn from_json_str(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| Error::ParseError {
            file: PathBuf::from("<json-schema>"),
            message: e.to_string(),
        })
    }

    /// Reads and parses a JSON Schema document from a file.
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Reading JSON Schema from {}", path.display());
        let text = fs::read_to_string(path)?;
        serde_json::from_str(&text).map_err(|e| Error::ParseError {
            file: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}

/// Imports a JSON Schema document as an OpenAPI schema.
///
/// Returns `Ok(None)` for `None`.
///
/// # Errors
///
/// Returns [`Error::UnhandledType`] if a `default` or `enum` value has no
/// Any representation.
pub fn import_json_schema(schema: Option<&JsonSchema>) -> Result<Option<Schema>> {
    schema.map(import).transpose()
}

fn import(source: &JsonSchema) -> Result<Schema> {
    let mut schema = Schema {
        format: source.format.clone(),
        title: source.title.clone(),
        description: source.description.clone(),
        nullable: source.nullable.unwrap_or(false),
        read_only: source.read_only.unwrap_or(false),
        maximum: source.maximum,
        minimum: source.minimum,
        max_items: source.max_items,
        min_items: source.min_items,
        max_length: source.max_length,
        min_length: source.min_length,
        pattern: source.pattern.clone(),
        ..Schema::default()
    };

    match &source.schema_type {
        Some(OneOrMany::One(schema_type)) => {
            schema.schema_type = Some(schema_type.to_lowercase());
        }
        Some(OneOrMany::Many(types)) => {
            let mut remaining = Vec::new();
            for schema_type in types.iter().map(|t| t.to_lowercase()) {
                if schema_type == "null" {
                    schema.nullable = true;
                } else {
                    remaining.push(schema_type);
                }
            }
            if remaining.len() > 1 {
                warn!("Type list {:?} narrowed to its first entry", remaining);
            }
            schema.schema_type = remaining.into_iter().next();
        }
        None => {}
    }

    match source.exclusive_maximum {
        Some(Exclusivity::Flag(flag)) => schema.exclusive_maximum = Some(flag),
        Some(Exclusivity::Bound(bound)) => {
            schema.maximum = Some(bound);
            schema.exclusive_maximum = Some(true);
        }
        None => {}
    }
    match source.exclusive_minimum {
        Some(Exclusivity::Flag(flag)) => schema.exclusive_minimum = Some(flag),
        Some(Exclusivity::Bound(bound)) => {
            schema.minimum = Some(bound);
            schema.exclusive_minimum = Some(true);
        }
        None => {}
    }

    schema.default = source.default.as_ref().map(json_to_any).transpose()?;
    schema.enum_values = source
        .enum_values
        .as_ref()
        .map(|values| values.iter().map(json_to_any).collect::<Result<Vec<_>>>())
        .transpose()?;

    let mut any_of = Vec::new();
    match &source.items {
        Some(OneOrMany::One(item)) => schema.items = Some(Box::new(import(item)?)),
        Some(OneOrMany::Many(alternatives)) => {
            for alternative in alternatives {
                any_of.push(import(alternative)?);
            }
        }
        None => {}
    }
    // Item alternatives come first, then the document's own anyOf entries
    for alternative in source.any_of.iter().flatten() {
        any_of.push(import(alternative)?);
    }
    if !any_of.is_empty() {
        schema.any_of = Some(any_of);
    }

    if !source.properties.is_empty() {
        let mut properties = IndexMap::with_capacity(source.properties.len());
        for (name, property) in &source.properties {
            properties.insert(name.clone(), import(property)?);
        }
        schema.properties = Some(properties);
    }
    if !source.required.is_empty() {
        schema.required = Some(source.required.clone());
    }

    match &source.additional_properties {
        Some(AdditionalProperties::Schema(values)) => {
            schema.additional_properties = Some(Box::new(import(values)?));
        }
        Some(AdditionalProperties::Allowed(allowed)) => {
            debug!("Dropping boolean additionalProperties: {}", allowed);
        }
        None => {}
    }

    Ok(schema)
}
