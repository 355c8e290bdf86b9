//! Output of generated schemas as YAML or JSON.

use anyhow::{Context, Result};
use log::debug;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Serializes `value` as YAML.
///
/// # Example
///
/// ```
/// use openapi_type_schema::schema::Schema;
/// use openapi_type_schema::serializer::serialize_yaml;
///
/// let yaml = serialize_yaml(&Schema::typed("string", Some("uuid"))).unwrap();
/// assert_eq!(yaml, "type: string\nformat: uuid\n");
/// ```
pub fn serialize_yaml<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    debug!("Serializing to YAML");
    serde_yaml::to_string(value).context("Failed to serialize schema to YAML")
}

/// Serializes `value` as pretty-printed JSON.
pub fn serialize_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    debug!("Serializing to JSON");
    serde_json::to_string_pretty(value).context("Failed to serialize schema to JSON")
}

/// Writes `content` to `path`, creating parent directories as needed.
pub fn write_to_file(content: &str, path: &Path) -> Result<()> {
    debug!("Writing content to file: {}", path.display());

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    fs::write(path, content)
        .with_context(|| format!("Failed to write to file: {}", path.display()))?;

    debug!("Wrote {} bytes to {}", content.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::any_value::AnyValue;
    use crate::schema::{Schema, VISIBILITY_EXTENSION};
    use indexmap::IndexMap;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn create_test_schemas() -> IndexMap<String, Schema> {
        let mut customer = Schema::object();
        let properties = customer.properties.as_mut().unwrap();
        properties.insert("name".to_string(), Schema::typed("string", None));
        properties.insert(
            "age".to_string(),
            Schema {
                nullable: true,
                ..Schema::typed("integer", Some("int32"))
            },
        );
        customer.required = Some(vec!["name".to_string()]);
        customer.extensions.insert(
            VISIBILITY_EXTENSION.to_string(),
            AnyValue::String("advanced".to_string()),
        );

        let mut schemas = IndexMap::new();
        schemas.insert("Customer".to_string(), customer);
        schemas
    }

    #[test]
    fn test_serialize_yaml() {
        let yaml = serialize_yaml(&create_test_schemas()).unwrap();

        let expected = "\
Customer:
  type: object
  properties:
    name:
      type: string
    age:
      type: integer
      format: int32
      nullable: true
  required:
  - name
  x-ms-visibility: advanced
";
        assert_eq!(yaml, expected);
    }

    #[test]
    fn test_serialize_json_is_pretty() {
        let json = serialize_json(&create_test_schemas()).unwrap();

        assert!(json.contains('\n'));
        assert!(json.contains("  \"Customer\": {"));
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["Customer"]["properties"]["age"]["format"], "int32");
        assert_eq!(value["Customer"]["x-ms-visibility"], "advanced");
    }

    #[test]
    fn test_write_to_file_creates_directories() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("out/nested/schemas.yaml");

        write_to_file("Customer: {}\n", &path).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "Customer: {}\n");
    }

    #[test]
    fn test_write_to_file_overwrites_existing() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("schemas.json");

        write_to_file("first", &path).unwrap();
        write_to_file("second", &path).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "second");
    }
}
