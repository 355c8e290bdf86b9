use crate::any_value::AnyValue;
use crate::descriptor::{EnumDef, FieldDef, StructDef, TypeInfo, Visibility};
use crate::error::{Error, Result};
use crate::naming::{NamingConvention, NamingStrategy};
use crate::schema::{Schema, VISIBILITY_EXTENSION};
use crate::type_resolver::{TypeResolver, TypeShape};
use indexmap::IndexMap;
use log::{debug, warn};
use std::collections::HashMap;

/// Schema generator - converts type references to OpenAPI schemas.
///
/// Holds only shared borrows, so one generator can serve many threads.
pub struct SchemaGenerator<'a> {
    /// Type resolver for looking up type definitions
    type_resolver: &'a TypeResolver,
    /// Naming strategy for property and enum member names
    naming: &'a NamingStrategy,
}

/// Translates `type_info` into a schema.
///
/// Shorthand for [`SchemaGenerator::generate_schema`].
pub fn translate(
    type_info: &TypeInfo,
    type_resolver: &TypeResolver,
    naming: &NamingStrategy,
    visibility: Option<Visibility>,
) -> Result<Schema> {
    SchemaGenerator::new(type_resolver, naming).generate_schema(type_info, visibility)
}

impl<'a> SchemaGenerator<'a> {
    /// Create a new SchemaGenerator over a TypeResolver
    pub fn new(type_resolver: &'a TypeResolver, naming: &'a NamingStrategy) -> Self {
        debug!("Initializing SchemaGenerator");
        Self {
            type_resolver,
            naming,
        }
    }

    /// Generate a schema for a type, stamping `visibility` on the root.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidArgument`] if a collection or `Option` lacks type arguments
    /// - [`Error::CyclicSchema`] if a type is reached again while it is being expanded
    pub fn generate_schema(
        &self,
        type_info: &TypeInfo,
        visibility: Option<Visibility>,
    ) -> Result<Schema> {
        let mut expanding = Vec::new();
        self.translate(type_info, visibility, &mut expanding)
    }

    /// Generate a schema using the root type's own visibility annotation
    pub fn generate_root_schema(&self, type_info: &TypeInfo) -> Result<Schema> {
        let visibility = self
            .type_resolver
            .find_definition(&type_info.name)
            .and_then(|def| def.visibility());
        self.generate_schema(type_info, visibility)
    }

    /// Generate schemas for several types, keyed by their type expression
    pub fn generate_schemas(&self, types: &[TypeInfo]) -> Result<IndexMap<String, Schema>> {
        let mut schemas = IndexMap::new();
        for type_info in types {
            let schema = self.generate_root_schema(type_info)?;
            schemas.insert(type_info.to_string(), schema);
        }
        Ok(schemas)
    }

    fn translate(
        &self,
        type_info: &TypeInfo,
        visibility: Option<Visibility>,
        expanding: &mut Vec<String>,
    ) -> Result<Schema> {
        debug!("Generating schema for type: {}", type_info);

        match self.type_resolver.classify(type_info)? {
            TypeShape::Nullable(inner) => {
                let mut schema = self.translate(inner, visibility, expanding)?;
                schema.nullable = true;
                Ok(schema)
            }
            TypeShape::Primitive(primitive) => {
                let (schema_type, format) = primitive.type_and_format();
                Ok(seed(schema_type, format, visibility))
            }
            TypeShape::Enum(enum_def) => Ok(self.enum_schema(enum_def, visibility)),
            TypeShape::Dictionary { value } => {
                let mut schema = seed("object", None, visibility);
                let value_schema = self.translate(value, None, expanding)?;
                schema.additional_properties = Some(Box::new(value_schema));
                Ok(schema)
            }
            TypeShape::List { element } => {
                let mut schema = seed("object", None, visibility);
                let items_schema = self.translate(element, None, expanding)?;
                schema.schema_type = Some("array".to_string());
                schema.items = Some(Box::new(items_schema));
                Ok(schema)
            }
            TypeShape::Newtype { definition, inner } => {
                debug!("Unwrapping newtype {} to {}", definition.name, inner);
                enter(type_info, expanding)?;
                let result = self.translate(&inner, visibility, expanding);
                expanding.pop();
                result
            }
            TypeShape::Object {
                definition,
                bindings,
            } => {
                enter(type_info, expanding)?;
                let schema = seed("object", None, visibility);
                let result = self.object_schema(schema, definition, &bindings, expanding);
                expanding.pop();
                result
            }
            TypeShape::Unknown => {
                warn!("Unknown type: {}, using empty object", type_info);
                let mut schema = seed("object", None, visibility);
                schema.properties = Some(IndexMap::new());
                Ok(schema)
            }
        }
    }

    /// Numeric schema of the underlying representation, or a string enum
    fn enum_schema(&self, enum_def: &EnumDef, visibility: Option<Visibility>) -> Schema {
        let (schema_type, format) = enum_def.repr.type_and_format();
        let mut schema = seed(schema_type, format, visibility);

        if enum_def.string_enum && !enum_def.flags {
            debug!("Generating string enum schema for: {}", enum_def.name);
            let members = enum_def
                .variants
                .iter()
                .map(|variant| {
                    AnyValue::String(self.serialized_name(
                        &variant.name,
                        variant.rename.as_deref(),
                        enum_def.rename_all,
                    ))
                })
                .collect();
            schema.enum_values = Some(members);
            schema.schema_type = Some("string".to_string());
            schema.format = None;
        }

        schema
    }

    /// Fill properties and required names from a struct's fields
    fn object_schema(
        &self,
        mut schema: Schema,
        definition: &StructDef,
        bindings: &HashMap<String, TypeInfo>,
        expanding: &mut Vec<String>,
    ) -> Result<Schema> {
        debug!("Generating struct schema for: {}", definition.name);

        let mut properties = IndexMap::new();
        let mut required = Vec::new();

        for field in &definition.fields {
            // Skip fields marked with #[serde(skip)]
            if field.serde_attrs.skip {
                continue;
            }

            let field_type = field.type_info.substitute(bindings);

            if field.serde_attrs.flatten {
                let flattened = self.translate(&field_type, None, expanding)?;
                let optional = field_type.is_option || field.serde_attrs.default;
                let required = if optional { None } else { Some(&mut required) };
                self.merge_flattened(&mut schema, &mut properties, required, flattened, field);
                continue;
            }

            let name = self.serialized_name(
                &field.name,
                field.serde_attrs.rename.as_deref(),
                definition.rename_all,
            );
            let property = self.translate(&field_type, field.visibility, expanding)?;

            if !field_type.is_option && !field.serde_attrs.default {
                required.push(name.clone());
            }
            properties.insert(name, property);
        }

        schema.properties = Some(properties);
        schema.required = if required.is_empty() {
            None
        } else {
            Some(required)
        };
        Ok(schema)
    }

    fn merge_flattened(
        &self,
        schema: &mut Schema,
        properties: &mut IndexMap<String, Schema>,
        required: Option<&mut Vec<String>>,
        flattened: Schema,
        field: &FieldDef,
    ) {
        if let Some(flat_properties) = flattened.properties {
            properties.extend(flat_properties);
            // An optional flattened field makes none of its properties required
            if let Some(required) = required {
                required.extend(flattened.required.unwrap_or_default());
            }
        } else if let Some(values) = flattened.additional_properties {
            schema.additional_properties = Some(values);
        } else {
            warn!(
                "Flattened field {} of type {} has no properties to merge",
                field.name, field.type_info
            );
        }
    }

    /// Explicit rename wins, then the container's `rename_all`, then the naming strategy
    fn serialized_name(
        &self,
        name: &str,
        rename: Option<&str>,
        rename_all: Option<NamingConvention>,
    ) -> String {
        match (rename, rename_all) {
            (Some(rename), _) => rename.to_string(),
            (None, Some(convention)) => convention.apply(name),
            (None, None) => (self.naming)(name),
        }
    }
}

/// Marks a named type as being expanded, failing if it already is
fn enter(type_info: &TypeInfo, expanding: &mut Vec<String>) -> Result<()> {
    let key = type_info.to_string();
    if expanding.contains(&key) {
        return Err(Error::CyclicSchema { type_name: key });
    }
    expanding.push(key);
    Ok(())
}

/// Base schema with an optional visibility stamp
fn seed(schema_type: &str, format: Option<&str>, visibility: Option<Visibility>) -> Schema {
    let mut schema = Schema::typed(schema_type, format);
    if let Some(visibility) = visibility {
        schema.extensions.insert(
            VISIBILITY_EXTENSION.to_string(),
            AnyValue::String(visibility.to_string()),
        );
    }
    schema
}
