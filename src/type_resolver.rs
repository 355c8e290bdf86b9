use crate::descriptor::{
    EnumDef, FieldDef, PrimitiveType, SerdeAttributes, StructDef, TypeDefinition, TypeInfo,
    VariantDef, Visibility,
};
use crate::error::{Error, Result};
use crate::naming::NamingConvention;
use crate::parser::ParsedFile;
use log::{debug, warn};
use std::collections::HashMap;

/// Type resolver - a lookup table of type definitions.
///
/// The table is built once, from parsed source files or from definitions
/// registered directly, and is never mutated while schemas are generated.
#[derive(Debug, Default)]
pub struct TypeResolver {
    definitions: HashMap<String, TypeDefinition>,
}

/// The facet a type reference resolves to
#[derive(Debug)]
pub enum TypeShape<'a> {
    /// `Option<T>`, carrying `T`
    Nullable(&'a TypeInfo),
    Primitive(PrimitiveType),
    Enum(&'a EnumDef),
    /// Map-like collection, carrying the value type
    Dictionary { value: &'a TypeInfo },
    /// Sequence-like collection, carrying the element type
    List { element: &'a TypeInfo },
    /// A newtype or `#[serde(transparent)]` struct, carrying the wrapped
    /// type with the struct's generic parameters substituted
    Newtype {
        definition: &'a StructDef,
        inner: TypeInfo,
    },
    /// A struct with named fields and its generic parameter bindings
    Object {
        definition: &'a StructDef,
        bindings: HashMap<String, TypeInfo>,
    },
    /// A type with no known definition
    Unknown,
}

const DICTIONARY_TYPES: &[&str] = &["HashMap", "BTreeMap", "IndexMap", "Map"];
const LIST_TYPES: &[&str] = &[
    "Vec",
    "VecDeque",
    "LinkedList",
    "HashSet",
    "BTreeSet",
    "IndexSet",
    "BinaryHeap",
];

/// Container-level attributes of a struct or enum
#[derive(Debug, Default)]
struct ContainerAttributes {
    derives: Vec<String>,
    repr: Option<PrimitiveType>,
    rename_all: Option<NamingConvention>,
    transparent: bool,
    visibility: Option<Visibility>,
    flags: bool,
    string_enum: bool,
}

impl TypeResolver {
    /// Create a new TypeResolver from parsed files
    pub fn new(parsed_files: &[ParsedFile]) -> Self {
        debug!("Initializing TypeResolver with {} files", parsed_files.len());
        let mut resolver = Self::default();
        for parsed_file in parsed_files {
            resolver.collect_items(&parsed_file.syntax_tree.items);
        }
        debug!("Indexed {} type definitions", resolver.definitions.len());
        resolver
    }

    /// Create a TypeResolver from definitions built elsewhere
    pub fn from_definitions<I>(definitions: I) -> Self
    where
        I: IntoIterator<Item = TypeDefinition>,
    {
        let mut resolver = Self::default();
        for definition in definitions {
            resolver.register(definition);
        }
        resolver
    }

    /// Adds a definition; the first definition of a name wins.
    pub fn register(&mut self, definition: impl Into<TypeDefinition>) {
        let definition = definition.into();
        let name = definition.name().to_string();
        if self.definitions.contains_key(&name) {
            warn!("Duplicate definition of type {}, keeping the first", name);
            return;
        }
        self.definitions.insert(name, definition);
    }

    /// Find a type definition by name
    pub fn find_definition(&self, name: &str) -> Option<&TypeDefinition> {
        self.definitions.get(name)
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Classifies a type reference into exactly one shape.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] when a wrapper or collection is
    /// missing the type arguments its shape needs.
    pub fn classify<'a>(&'a self, type_info: &'a TypeInfo) -> Result<TypeShape<'a>> {
        if type_info.is_option {
            let inner = type_info.generic_args.first().ok_or_else(|| {
                Error::InvalidArgument(format!("`{}` has no inner type", type_info))
            })?;
            return Ok(TypeShape::Nullable(inner));
        }

        if type_info.is_array {
            let element = type_info.generic_args.first().ok_or_else(|| {
                Error::InvalidArgument(format!("`{}` has no element type", type_info))
            })?;
            return Ok(TypeShape::List { element });
        }

        let name = type_info.name.as_str();
        match self.definitions.get(name) {
            Some(TypeDefinition::Enum(enum_def)) => return Ok(TypeShape::Enum(enum_def)),
            Some(TypeDefinition::Struct(struct_def)) => {
                let bindings = generic_bindings(struct_def, type_info);
                if let Some(inner) = &struct_def.newtype {
                    if inner.name == struct_def.name {
                        return Err(Error::InvalidArgument(format!(
                            "newtype `{}` wraps itself",
                            struct_def.name
                        )));
                    }
                    return Ok(TypeShape::Newtype {
                        definition: struct_def,
                        inner: inner.substitute(&bindings),
                    });
                }
                return Ok(TypeShape::Object {
                    definition: struct_def,
                    bindings,
                });
            }
            None => {}
        }

        if let Some(primitive) = PrimitiveType::from_name(name) {
            return Ok(TypeShape::Primitive(primitive));
        }

        if DICTIONARY_TYPES.contains(&name) {
            return match type_info.generic_args.as_slice() {
                [_, value, ..] => Ok(TypeShape::Dictionary { value }),
                _ => Err(Error::InvalidArgument(format!(
                    "dictionary `{}` needs key and value type arguments",
                    type_info
                ))),
            };
        }

        if LIST_TYPES.contains(&name) {
            let element = type_info.generic_args.first().ok_or_else(|| {
                Error::InvalidArgument(format!("collection `{}` has no element type", type_info))
            })?;
            return Ok(TypeShape::List { element });
        }

        Ok(TypeShape::Unknown)
    }

    /// Collect struct and enum definitions, descending into inline modules
    fn collect_items(&mut self, items: &[syn::Item]) {
        for item in items {
            match item {
                syn::Item::Struct(item_struct) => {
                    let definition = Self::parse_struct_definition(item_struct);
                    self.register(definition);
                }
                syn::Item::Enum(item_enum) => {
                    let definition = Self::parse_enum_definition(item_enum);
                    self.register(definition);
                }
                syn::Item::Mod(item_mod) => {
                    if let Some((_, nested)) = &item_mod.content {
                        self.collect_items(nested);
                    }
                }
                _ => {}
            }
        }
    }

    /// Parse a struct definition
    fn parse_struct_definition(item_struct: &syn::ItemStruct) -> StructDef {
        let struct_name = item_struct.ident.to_string();
        debug!("Parsing struct definition: {}", struct_name);

        let container = Self::parse_container_attributes(&item_struct.attrs);
        let mut def = StructDef::new(struct_name);
        def.generics = item_struct
            .generics
            .type_params()
            .map(|param| param.ident.to_string())
            .collect();
        def.rename_all = container.rename_all;
        def.visibility = container.visibility;

        match &item_struct.fields {
            syn::Fields::Named(named_fields) => {
                def.fields = named_fields.named.iter().filter_map(Self::parse_field).collect();
                if container.transparent {
                    def.newtype = def.fields.first().map(|f| f.type_info.clone());
                }
            }
            syn::Fields::Unnamed(unnamed) if unnamed.unnamed.len() == 1 => {
                def.newtype = Some(TypeInfo::from_syn(&unnamed.unnamed[0].ty));
            }
            _ => {}
        }

        debug!("Parsed {} fields", def.fields.len());
        def
    }

    /// Parse an enum definition
    fn parse_enum_definition(item_enum: &syn::ItemEnum) -> EnumDef {
        let enum_name = item_enum.ident.to_string();
        debug!("Parsing enum definition: {}", enum_name);

        let container = Self::parse_container_attributes(&item_enum.attrs);
        let has_derive = |name: &str| container.derives.iter().any(|d| d == name);
        let serializes_names = has_derive("Serialize") || has_derive("Deserialize");
        let serializes_repr = has_derive("Serialize_repr") || has_derive("Deserialize_repr");

        let mut variants = Vec::new();
        for variant in &item_enum.variants {
            if !matches!(variant.fields, syn::Fields::Unit) {
                warn!(
                    "Variant {}::{} carries data and is described by name only",
                    enum_name, variant.ident
                );
            }
            let serde_attrs = Self::parse_serde_attributes(&variant.attrs);
            if serde_attrs.skip {
                continue;
            }
            variants.push(VariantDef {
                name: variant.ident.to_string(),
                rename: serde_attrs.rename,
            });
        }

        debug!("Parsed {} variants", variants.len());

        let mut def = EnumDef::new(enum_name, Vec::<String>::new());
        def.variants = variants;
        def.repr = container.repr.unwrap_or(PrimitiveType::I32);
        def.string_enum = container.string_enum || (serializes_names && !serializes_repr);
        def.flags = container.flags;
        def.rename_all = container.rename_all;
        def.visibility = container.visibility;
        def
    }

    /// Parse a single named field
    fn parse_field(field: &syn::Field) -> Option<FieldDef> {
        let field_name = field.ident.as_ref()?.to_string();
        debug!("Parsing field: {}", field_name);

        Some(FieldDef {
            name: field_name,
            type_info: TypeInfo::from_syn(&field.ty),
            serde_attrs: Self::parse_serde_attributes(&field.attrs),
            visibility: Self::parse_visibility(&field.attrs),
        })
    }

    /// Parse Serde attributes from field or variant attributes
    fn parse_serde_attributes(attrs: &[syn::Attribute]) -> SerdeAttributes {
        let mut serde_attrs = SerdeAttributes::default();

        for attr in attrs.iter().filter(|a| a.path().is_ident("serde")) {
            let result = attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("rename") {
                    if meta.input.peek(syn::Token![=]) {
                        let value: syn::LitStr = meta.value()?.parse()?;
                        serde_attrs.rename = Some(value.value());
                    } else {
                        // rename(serialize = "..", deserialize = "..")
                        meta.parse_nested_meta(|nested| {
                            if nested.path.is_ident("serialize") {
                                let value: syn::LitStr = nested.value()?.parse()?;
                                serde_attrs.rename = Some(value.value());
                                Ok(())
                            } else {
                                skip_meta_value(&nested)
                            }
                        })?;
                    }
                } else if meta.path.is_ident("skip") || meta.path.is_ident("skip_serializing") {
                    serde_attrs.skip = true;
                } else if meta.path.is_ident("flatten") {
                    serde_attrs.flatten = true;
                } else if meta.path.is_ident("default") {
                    serde_attrs.default = true;
                    skip_meta_value(&meta)?;
                } else {
                    skip_meta_value(&meta)?;
                }
                Ok(())
            });

            if let Err(e) = result {
                warn!("Ignoring malformed serde attribute: {}", e);
            }
        }

        if serde_attrs.rename.is_some() {
            debug!("Found serde rename: {:?}", serde_attrs.rename);
        }
        serde_attrs
    }

    /// Parse `#[schema(visibility = "..")]`
    fn parse_visibility(attrs: &[syn::Attribute]) -> Option<Visibility> {
        let mut visibility = None;
        for attr in attrs.iter().filter(|a| a.path().is_ident("schema")) {
            let result = attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("visibility") {
                    let value: syn::LitStr = meta.value()?.parse()?;
                    match value.value().parse::<Visibility>() {
                        Ok(parsed) => visibility = Some(parsed),
                        Err(e) => warn!("{}", e),
                    }
                } else {
                    skip_meta_value(&meta)?;
                }
                Ok(())
            });
            if let Err(e) = result {
                warn!("Ignoring malformed schema attribute: {}", e);
            }
        }
        visibility
    }

    /// Parse derives, repr, and container-level serde/schema attributes
    fn parse_container_attributes(attrs: &[syn::Attribute]) -> ContainerAttributes {
        let mut container = ContainerAttributes {
            visibility: Self::parse_visibility(attrs),
            ..ContainerAttributes::default()
        };

        for attr in attrs {
            let path = attr.path();
            let result = if path.is_ident("derive") {
                attr.parse_nested_meta(|meta| {
                    if let Some(segment) = meta.path.segments.last() {
                        container.derives.push(segment.ident.to_string());
                    }
                    Ok(())
                })
            } else if path.is_ident("repr") {
                attr.parse_nested_meta(|meta| {
                    if let Some(ident) = meta.path.get_ident() {
                        if let Some(primitive) = PrimitiveType::from_name(&ident.to_string()) {
                            container.repr = Some(primitive);
                        }
                    }
                    skip_meta_value(&meta)
                })
            } else if path.is_ident("serde") {
                attr.parse_nested_meta(|meta| {
                    if meta.path.is_ident("rename_all") {
                        let value: syn::LitStr = meta.value()?.parse()?;
                        container.rename_all = NamingConvention::from_serde(&value.value());
                        if container.rename_all.is_none() {
                            warn!("Unsupported rename_all value: {}", value.value());
                        }
                    } else if meta.path.is_ident("transparent") {
                        container.transparent = true;
                    } else {
                        skip_meta_value(&meta)?;
                    }
                    Ok(())
                })
            } else if path.is_ident("schema") {
                attr.parse_nested_meta(|meta| {
                    if meta.path.is_ident("flags") {
                        container.flags = true;
                    } else if meta.path.is_ident("string_enum") {
                        container.string_enum = true;
                    } else {
                        skip_meta_value(&meta)?;
                    }
                    Ok(())
                })
            } else {
                Ok(())
            };

            if let Err(e) = result {
                warn!("Ignoring malformed attribute: {}", e);
            }
        }

        container
    }
}

/// Pairs a struct's generic parameters with the arguments it is used with
fn generic_bindings(struct_def: &StructDef, type_info: &TypeInfo) -> HashMap<String, TypeInfo> {
    if struct_def.generics.len() != type_info.generic_args.len() {
        debug!(
            "Type {} declares {} generic parameters but is used with {}",
            struct_def.name,
            struct_def.generics.len(),
            type_info.generic_args.len()
        );
    }
    struct_def
        .generics
        .iter()
        .cloned()
        .zip(type_info.generic_args.iter().cloned())
        .collect()
}

/// Consume the value of an attribute entry we do not interpret
fn skip_meta_value(meta: &syn::meta::ParseNestedMeta) -> syn::Result<()> {
    if meta.input.peek(syn::Token![=]) {
        let _: syn::Expr = meta.value()?.parse()?;
    } else if meta.input.peek(syn::token::Paren) {
        meta.parse_nested_meta(|nested| skip_meta_value(&nested))?;
    }
    Ok(())
}
