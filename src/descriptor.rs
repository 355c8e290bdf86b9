//! Type descriptions consumed by the schema translator.
//!
//! A [`TypeInfo`] is a reference to a type as it is written (`Option<Vec<User>>`),
//! while [`StructDef`] and [`EnumDef`] describe the definitions those references
//! resolve to. Definitions are either read from Rust source by the
//! [`type_resolver`](crate::type_resolver) or registered directly.

use crate::error::{Error, Result};
use crate::naming::NamingConvention;
use clap::ValueEnum;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Type information for a single type reference.
///
/// Smart pointers and references (`Box<T>`, `Arc<T>`, `Rc<T>`, `Cow<T>`, `&T`)
/// serialize as their pointee and are stripped while building a `TypeInfo`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeInfo {
    /// The base type name (e.g., "String", "User", "HashMap")
    pub name: String,
    /// Generic type arguments; the element type for arrays and slices
    pub generic_args: Vec<TypeInfo>,
    /// Whether this type is `Option<T>`
    pub is_option: bool,
    /// Whether this type is a fixed array `[T; N]` or a slice `[T]`
    pub is_array: bool,
}

impl TypeInfo {
    /// Create a new TypeInfo for a simple type
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            generic_args: Vec::new(),
            is_option: false,
            is_array: false,
        }
    }

    /// Create a TypeInfo for a generic type such as `HashMap<String, User>`
    pub fn generic(name: impl Into<String>, generic_args: Vec<TypeInfo>) -> Self {
        Self {
            name: name.into(),
            generic_args,
            is_option: false,
            is_array: false,
        }
    }

    /// Create a TypeInfo for an `Option<T>` type
    pub fn option(inner: TypeInfo) -> Self {
        Self {
            name: "Option".to_string(),
            generic_args: vec![inner],
            is_option: true,
            is_array: false,
        }
    }

    /// Create a TypeInfo for a `Vec<T>` type
    pub fn vec(inner: TypeInfo) -> Self {
        Self::generic("Vec", vec![inner])
    }

    /// Create a TypeInfo for a `[T]` or `[T; N]` type
    pub fn array(element: TypeInfo) -> Self {
        Self {
            name: "Array".to_string(),
            generic_args: vec![element],
            is_option: false,
            is_array: true,
        }
    }

    /// Parses a type expression such as `Option<Vec<User>>`.
    pub fn parse(source: &str) -> Result<Self> {
        let ty: syn::Type = syn::parse_str(source).map_err(|e| {
            Error::InvalidArgument(format!("not a type expression `{}`: {}", source, e))
        })?;
        Ok(Self::from_syn(&ty))
    }

    /// Extract TypeInfo from a syn::Type
    pub fn from_syn(ty: &syn::Type) -> Self {
        match ty {
            syn::Type::Path(type_path) => Self::from_path(&type_path.path),
            syn::Type::Reference(reference) => Self::from_syn(&reference.elem),
            syn::Type::Paren(paren) => Self::from_syn(&paren.elem),
            syn::Type::Group(group) => Self::from_syn(&group.elem),
            syn::Type::Array(array) => Self::array(Self::from_syn(&array.elem)),
            syn::Type::Slice(slice) => Self::array(Self::from_syn(&slice.elem)),
            syn::Type::Tuple(tuple) if tuple.elems.is_empty() => Self::new("()"),
            _ => Self::new("Unknown"),
        }
    }

    fn from_path(path: &syn::Path) -> Self {
        let Some(segment) = path.segments.last() else {
            return Self::new("Unknown");
        };
        let type_name = segment.ident.to_string();

        let mut generic_args = Vec::new();
        if let syn::PathArguments::AngleBracketed(args) = &segment.arguments {
            for arg in &args.args {
                if let syn::GenericArgument::Type(inner_ty) = arg {
                    generic_args.push(Self::from_syn(inner_ty));
                }
            }
        }

        if matches!(type_name.as_str(), "Box" | "Arc" | "Rc" | "Cow") && !generic_args.is_empty() {
            return generic_args.remove(0);
        }

        let is_option = type_name == "Option";
        Self {
            name: type_name,
            generic_args,
            is_option,
            is_array: false,
        }
    }

    /// Replaces generic parameters with their bound arguments.
    pub fn substitute(&self, bindings: &HashMap<String, TypeInfo>) -> TypeInfo {
        if self.generic_args.is_empty() && !self.is_array && !self.is_option {
            if let Some(bound) = bindings.get(&self.name) {
                return bound.clone();
            }
        }
        TypeInfo {
            name: self.name.clone(),
            generic_args: self
                .generic_args
                .iter()
                .map(|arg| arg.substitute(bindings))
                .collect(),
            is_option: self.is_option,
            is_array: self.is_array,
        }
    }
}

impl fmt::Display for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_array {
            return match self.generic_args.first() {
                Some(element) => write!(f, "[{}]", element),
                None => write!(f, "[_]"),
            };
        }
        write!(f, "{}", self.name)?;
        if !self.generic_args.is_empty() {
            let args: Vec<String> = self.generic_args.iter().map(ToString::to_string).collect();
            write!(f, "<{}>", args.join(", "))?;
        }
        Ok(())
    }
}

/// Primitive and well-known scalar types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    String,
    Char,
    I8,
    I16,
    I32,
    I64,
    I128,
    Isize,
    U8,
    U16,
    U32,
    U64,
    U128,
    Usize,
    F32,
    F64,
    Decimal,
    Bool,
    Uuid,
    DateTime,
    Date,
    Duration,
    Url,
    Bytes,
    Json,
}

impl PrimitiveType {
    /// Parse a primitive type name
    pub fn from_name(type_name: &str) -> Option<Self> {
        let primitive = match type_name {
            "String" | "str" => Self::String,
            "char" => Self::Char,
            "i8" => Self::I8,
            "i16" => Self::I16,
            "i32" => Self::I32,
            "i64" => Self::I64,
            "i128" => Self::I128,
            "isize" => Self::Isize,
            "u8" => Self::U8,
            "u16" => Self::U16,
            "u32" => Self::U32,
            "u64" => Self::U64,
            "u128" => Self::U128,
            "usize" => Self::Usize,
            "f32" => Self::F32,
            "f64" => Self::F64,
            "Decimal" => Self::Decimal,
            "bool" => Self::Bool,
            "Uuid" => Self::Uuid,
            "DateTime" | "NaiveDateTime" | "OffsetDateTime" | "SystemTime" => Self::DateTime,
            "NaiveDate" | "Date" => Self::Date,
            "Duration" | "TimeDelta" => Self::Duration,
            "Url" | "Uri" => Self::Url,
            "Bytes" | "ByteBuf" => Self::Bytes,
            "Value" => Self::Json,
            _ => return None,
        };
        Some(primitive)
    }

    /// The JSON-Schema `type` and `format` pair for this primitive
    pub fn type_and_format(self) -> (&'static str, Option<&'static str>) {
        match self {
            Self::String | Self::Char => ("string", None),
            Self::I8 | Self::I16 | Self::I32 | Self::U8 | Self::U16 | Self::U32 => {
                ("integer", Some("int32"))
            }
            Self::I64 | Self::I128 | Self::Isize | Self::U64 | Self::U128 | Self::Usize => {
                ("integer", Some("int64"))
            }
            Self::F32 => ("number", Some("float")),
            Self::F64 | Self::Decimal => ("number", Some("double")),
            Self::Bool => ("boolean", None),
            Self::Uuid => ("string", Some("uuid")),
            Self::DateTime => ("string", Some("date-time")),
            Self::Date => ("string", Some("date")),
            Self::Duration => ("string", Some("duration")),
            Self::Url => ("string", Some("uri")),
            Self::Bytes => ("string", Some("binary")),
            Self::Json => ("object", None),
        }
    }
}

/// Visibility of a schema element in generated documentation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum Visibility {
    Important,
    Advanced,
    Internal,
}

impl Visibility {
    pub fn as_str(self) -> &'static str {
        match self {
            Visibility::Important => "important",
            Visibility::Advanced => "advanced",
            Visibility::Internal => "internal",
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Visibility {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.to_ascii_lowercase().as_str() {
            "important" => Ok(Visibility::Important),
            "advanced" => Ok(Visibility::Advanced),
            "internal" => Ok(Visibility::Internal),
            other => Err(Error::InvalidArgument(format!(
                "unknown visibility `{}`",
                other
            ))),
        }
    }
}

/// Serde attributes for a field
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SerdeAttributes {
    /// Renamed field name
    pub rename: Option<String>,
    /// Whether the field is left out of serialized output
    pub skip: bool,
    /// Whether to flatten this field
    pub flatten: bool,
    /// Whether a missing value falls back to `Default`
    pub default: bool,
}

/// Field definition in a struct
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDef {
    /// Field name
    pub name: String,
    /// Type information for the field
    pub type_info: TypeInfo,
    /// Serde attributes applied to this field
    pub serde_attrs: SerdeAttributes,
    /// `#[schema(visibility = "..")]` on this field
    pub visibility: Option<Visibility>,
}

impl FieldDef {
    pub fn new(name: impl Into<String>, type_info: TypeInfo) -> Self {
        Self {
            name: name.into(),
            type_info,
            serde_attrs: SerdeAttributes::default(),
            visibility: None,
        }
    }

    pub fn rename(mut self, name: impl Into<String>) -> Self {
        self.serde_attrs.rename = Some(name.into());
        self
    }

    pub fn skip(mut self) -> Self {
        self.serde_attrs.skip = true;
        self
    }

    pub fn flatten(mut self) -> Self {
        self.serde_attrs.flatten = true;
        self
    }

    pub fn with_default(mut self) -> Self {
        self.serde_attrs.default = true;
        self
    }

    pub fn visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = Some(visibility);
        self
    }
}

/// Struct definition with fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructDef {
    pub name: String,
    /// Generic type parameter names, in declaration order
    pub generics: Vec<String>,
    /// The fields of the struct, in declaration order
    pub fields: Vec<FieldDef>,
    /// Inner type of a newtype or `#[serde(transparent)]` struct
    pub newtype: Option<TypeInfo>,
    /// `#[serde(rename_all = "..")]` on the struct
    pub rename_all: Option<NamingConvention>,
    /// `#[schema(visibility = "..")]` on the struct
    pub visibility: Option<Visibility>,
}

impl StructDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            generics: Vec::new(),
            fields: Vec::new(),
            newtype: None,
            rename_all: None,
            visibility: None,
        }
    }

    /// Creates a struct that serializes as `inner`
    pub fn newtype(name: impl Into<String>, inner: TypeInfo) -> Self {
        Self {
            newtype: Some(inner),
            ..Self::new(name)
        }
    }

    pub fn generic(mut self, param: impl Into<String>) -> Self {
        self.generics.push(param.into());
        self
    }

    pub fn field(mut self, field: FieldDef) -> Self {
        self.fields.push(field);
        self
    }

    pub fn rename_all(mut self, convention: NamingConvention) -> Self {
        self.rename_all = Some(convention);
        self
    }
}

/// A single enum member
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantDef {
    pub name: String,
    /// `#[serde(rename = "..")]` on the variant
    pub rename: Option<String>,
}

/// Enum definition with variants
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumDef {
    pub name: String,
    /// The variants of the enum, in declaration order
    pub variants: Vec<VariantDef>,
    /// Underlying numeric representation
    pub repr: PrimitiveType,
    /// Whether the enum serializes as its member names
    pub string_enum: bool,
    /// Whether the enum is a bit-flags set
    pub flags: bool,
    /// `#[serde(rename_all = "..")]` on the enum
    pub rename_all: Option<NamingConvention>,
    /// `#[schema(visibility = "..")]` on the enum
    pub visibility: Option<Visibility>,
}

impl EnumDef {
    /// Creates a numeric (`i32`) enum with the given members
    pub fn new<I, S>(name: impl Into<String>, variants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            variants: variants
                .into_iter()
                .map(|v| VariantDef {
                    name: v.into(),
                    rename: None,
                })
                .collect(),
            repr: PrimitiveType::I32,
            string_enum: false,
            flags: false,
            rename_all: None,
            visibility: None,
        }
    }

    pub fn string_enum(mut self) -> Self {
        self.string_enum = true;
        self
    }

    pub fn flags(mut self) -> Self {
        self.flags = true;
        self
    }

    pub fn repr(mut self, repr: PrimitiveType) -> Self {
        self.repr = repr;
        self
    }
}

/// A named type definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeDefinition {
    Struct(StructDef),
    Enum(EnumDef),
}

impl TypeDefinition {
    pub fn name(&self) -> &str {
        match self {
            TypeDefinition::Struct(def) => &def.name,
            TypeDefinition::Enum(def) => &def.name,
        }
    }

    pub fn visibility(&self) -> Option<Visibility> {
        match self {
            TypeDefinition::Struct(def) => def.visibility,
            TypeDefinition::Enum(def) => def.visibility,
        }
    }
}

impl From<StructDef> for TypeDefinition {
    fn from(def: StructDef) -> Self {
        TypeDefinition::Struct(def)
    }
}

impl From<EnumDef> for TypeDefinition {
    fn from(def: EnumDef) -> Self {
        TypeDefinition::Enum(def)
    }
}
