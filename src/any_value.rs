//! Conversion of parsed JSON values into the OpenAPI "Any" value model.
//!
//! [`JsonToken`] is the parsed input: null, array, ordered object, or a scalar
//! whose concrete runtime kind is kept in [`ScalarValue`]. [`to_any`] maps a
//! token onto the closed set of [`AnyValue`] variants and fails loudly on
//! scalar kinds that have no variant, so nothing is silently dropped from a
//! generated document.

use crate::error::{Error, Result};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use chrono::{DateTime, FixedOffset, NaiveDate, TimeDelta};
use indexmap::IndexMap;
use log::debug;
use serde::{Serialize, Serializer};
use url::Url;
use uuid::Uuid;

/// A literal value embedded in a schema (defaults, enum members, extensions)
#[derive(Debug, Clone, PartialEq)]
pub enum AnyValue {
    Null,
    Boolean(bool),
    String(String),
    Byte(u8),
    Integer(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Date(NaiveDate),
    DateTime(DateTime<FixedOffset>),
    Binary(Vec<u8>),
    Array(Vec<AnyValue>),
    Object(IndexMap<String, AnyValue>),
}

impl Serialize for AnyValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            AnyValue::Null => serializer.serialize_unit(),
            AnyValue::Boolean(value) => serializer.serialize_bool(*value),
            AnyValue::String(value) => serializer.serialize_str(value),
            AnyValue::Byte(value) => serializer.serialize_u8(*value),
            AnyValue::Integer(value) => serializer.serialize_i32(*value),
            AnyValue::Long(value) => serializer.serialize_i64(*value),
            AnyValue::Float(value) => serializer.serialize_f32(*value),
            AnyValue::Double(value) => serializer.serialize_f64(*value),
            AnyValue::Date(value) => {
                serializer.serialize_str(&value.format("%Y-%m-%d").to_string())
            }
            AnyValue::DateTime(value) => serializer.serialize_str(&value.to_rfc3339()),
            AnyValue::Binary(value) => serializer.serialize_str(&BASE64.encode(value)),
            AnyValue::Array(items) => serializer.collect_seq(items),
            AnyValue::Object(entries) => serializer.collect_map(entries),
        }
    }
}

/// A decimal number stored as `mantissa * 10^-scale`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decimal {
    pub mantissa: i128,
    pub scale: u32,
}

impl Decimal {
    pub fn new(mantissa: i128, scale: u32) -> Self {
        Self { mantissa, scale }
    }

    /// Nearest `f64`; precision beyond 53 bits is lost
    pub fn to_f64(self) -> f64 {
        self.mantissa as f64 / 10f64.powi(self.scale as i32)
    }
}

/// The concrete runtime kind of a scalar JSON token
#[derive(Debug, Clone, PartialEq)]
pub enum ScalarValue {
    Boolean(bool),
    String(String),
    Byte(u8),
    Int32(i32),
    Int64(i64),
    Float32(f32),
    Float64(f64),
    Decimal(Decimal),
    Date(NaiveDate),
    DateTime(DateTime<FixedOffset>),
    Bytes(Vec<u8>),
    Guid(Uuid),
    Uri(Url),
    TimeSpan(TimeDelta),
    /// An integer outside the `i64` range, kept as its decimal text
    BigInteger(String),
    /// Unparsed JSON text
    Raw(String),
    Undefined,
}

impl ScalarValue {
    /// Name of the runtime kind, used in error reports
    pub fn kind_name(&self) -> &'static str {
        match self {
            ScalarValue::Boolean(_) => "Boolean",
            ScalarValue::String(_) => "String",
            ScalarValue::Byte(_) => "Byte",
            ScalarValue::Int32(_) => "Int32",
            ScalarValue::Int64(_) => "Int64",
            ScalarValue::Float32(_) => "Float32",
            ScalarValue::Float64(_) => "Float64",
            ScalarValue::Decimal(_) => "Decimal",
            ScalarValue::Date(_) => "Date",
            ScalarValue::DateTime(_) => "DateTime",
            ScalarValue::Bytes(_) => "Bytes",
            ScalarValue::Guid(_) => "Guid",
            ScalarValue::Uri(_) => "Uri",
            ScalarValue::TimeSpan(_) => "TimeSpan",
            ScalarValue::BigInteger(_) => "BigInteger",
            ScalarValue::Raw(_) => "Raw",
            ScalarValue::Undefined => "Undefined",
        }
    }
}

/// A parsed JSON value
#[derive(Debug, Clone, PartialEq)]
pub enum JsonToken {
    Null,
    Array(Vec<JsonToken>),
    /// Entries in document order; a repeated key keeps its last value
    Object(Vec<(String, JsonToken)>),
    Scalar(ScalarValue),
}

impl From<ScalarValue> for JsonToken {
    fn from(value: ScalarValue) -> Self {
        JsonToken::Scalar(value)
    }
}

impl From<&serde_json::Value> for JsonToken {
    fn from(value: &serde_json::Value) -> Self {
        use serde_json::Value;

        match value {
            Value::Null => JsonToken::Null,
            Value::Bool(b) => ScalarValue::Boolean(*b).into(),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    ScalarValue::Int64(i).into()
                } else if n.is_u64() {
                    ScalarValue::BigInteger(n.to_string()).into()
                } else {
                    ScalarValue::Float64(n.as_f64().unwrap_or(f64::NAN)).into()
                }
            }
            Value::String(s) => ScalarValue::String(s.clone()).into(),
            Value::Array(items) => JsonToken::Array(items.iter().map(JsonToken::from).collect()),
            Value::Object(map) => JsonToken::Object(
                map.iter()
                    .map(|(key, value)| (key.clone(), JsonToken::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<serde_json::Value> for JsonToken {
    fn from(value: serde_json::Value) -> Self {
        JsonToken::from(&value)
    }
}

/// Converts a parsed JSON token into an [`AnyValue`].
///
/// # Errors
///
/// Returns [`Error::UnhandledType`] naming the kind when a scalar has no
/// matching `AnyValue` variant.
pub fn to_any(token: &JsonToken) -> Result<AnyValue> {
    match token {
        JsonToken::Null => Ok(AnyValue::Null),
        JsonToken::Array(items) => items
            .iter()
            .map(to_any)
            .collect::<Result<Vec<_>>>()
            .map(AnyValue::Array),
        JsonToken::Object(entries) => {
            let mut object = IndexMap::with_capacity(entries.len());
            for (key, value) in entries {
                object.insert(key.clone(), to_any(value)?);
            }
            Ok(AnyValue::Object(object))
        }
        JsonToken::Scalar(scalar) => scalar_to_any(scalar),
    }
}

/// Converts a `serde_json::Value` into an [`AnyValue`]
pub fn json_to_any(value: &serde_json::Value) -> Result<AnyValue> {
    to_any(&JsonToken::from(value))
}

fn scalar_to_any(scalar: &ScalarValue) -> Result<AnyValue> {
    let value = match scalar {
        ScalarValue::Boolean(b) => AnyValue::Boolean(*b),
        ScalarValue::String(s) => AnyValue::String(s.clone()),
        ScalarValue::Byte(b) => AnyValue::Byte(*b),
        ScalarValue::Int32(i) => AnyValue::Integer(*i),
        ScalarValue::Int64(i) => AnyValue::Long(*i),
        ScalarValue::Float32(f) => AnyValue::Float(*f),
        ScalarValue::Float64(f) => AnyValue::Double(*f),
        ScalarValue::Decimal(d) => AnyValue::Double(d.to_f64()),
        ScalarValue::Date(d) => AnyValue::Date(*d),
        ScalarValue::DateTime(dt) => AnyValue::DateTime(*dt),
        ScalarValue::Bytes(bytes) => AnyValue::Binary(bytes.clone()),
        ScalarValue::Guid(guid) => AnyValue::String(guid.hyphenated().to_string()),
        ScalarValue::Uri(uri) => AnyValue::String(uri.to_string()),
        ScalarValue::TimeSpan(span) => AnyValue::String(format_time_span(*span)),
        ScalarValue::BigInteger(_) | ScalarValue::Raw(_) | ScalarValue::Undefined => {
            debug!("No Any variant for scalar kind {}", scalar.kind_name());
            return Err(Error::UnhandledType(scalar.kind_name().to_string()));
        }
    };
    Ok(value)
}

/// Formats a time span as `[-][d.]hh:mm:ss[.fffffff]`
fn format_time_span(span: TimeDelta) -> String {
    let negative = span < TimeDelta::zero();
    let span = span.abs();

    let total_seconds = span.num_seconds();
    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3_600;
    let minutes = (total_seconds % 3_600) / 60;
    let seconds = total_seconds % 60;
    // 100ns ticks
    let fraction = span.subsec_nanos() / 100;

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    if days > 0 {
        out.push_str(&format!("{}.", days));
    }
    out.push_str(&format!("{:02}:{:02}:{:02}", hours, minutes, seconds));
    if fraction > 0 {
        out.push_str(&format!(".{:07}", fraction));
    }
    out
}
