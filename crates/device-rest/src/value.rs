use bytes::Bytes;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use crate::error::{Error, ErrorKind, Result};

/// All supported value types of a device resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueType {
    /// An opaque byte sequence paired with a media type.
    Binary,
    /// A `JSON` object.
    Object,
    /// A [`bool`] value.
    Bool,
    /// A characters sequence.
    String,
    /// An [`i8`] value.
    Int8,
    /// An [`i16`] value.
    Int16,
    /// An [`i32`] value.
    Int32,
    /// An [`i64`] value.
    Int64,
    /// An [`u8`] value.
    Uint8,
    /// An [`u16`] value.
    Uint16,
    /// An [`u32`] value.
    Uint32,
    /// An [`u64`] value.
    Uint64,
    /// A [`f32`] value.
    Float32,
    /// A [`f64`] value.
    Float64,
}

impl ValueType {
    /// All value types.
    pub const ALL: [Self; 14] = [
        Self::Binary,
        Self::Object,
        Self::Bool,
        Self::String,
        Self::Int8,
        Self::Int16,
        Self::Int32,
        Self::Int64,
        Self::Uint8,
        Self::Uint16,
        Self::Uint32,
        Self::Uint64,
        Self::Float32,
        Self::Float64,
    ];

    /// Returns the name associated with a [`ValueType`].
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Binary => "Binary",
            Self::Object => "Object",
            Self::Bool => "Bool",
            Self::String => "String",
            Self::Int8 => "Int8",
            Self::Int16 => "Int16",
            Self::Int32 => "Int32",
            Self::Int64 => "Int64",
            Self::Uint8 => "Uint8",
            Self::Uint16 => "Uint16",
            Self::Uint32 => "Uint32",
            Self::Uint64 => "Uint64",
            Self::Float32 => "Float32",
            Self::Float64 => "Float64",
        }
    }

    /// Checks whether readings of this type travel as raw bytes rather
    /// than text.
    #[must_use]
    pub const fn is_raw(self) -> bool {
        matches!(self, Self::Binary | Self::Object)
    }
}

impl std::fmt::Display for ValueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.name().fmt(f)
    }
}

impl std::str::FromStr for ValueType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|value_type| value_type.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                Error::new(
                    ErrorKind::UnsupportedType,
                    format!("unsupported value type: {s}"),
                )
            })
    }
}

/// A typed payload.
///
/// Each variant carries the native representation of the
/// [`ValueType`] with the same name.
#[derive(Debug, Clone, PartialEq)]
pub enum TypedValue {
    /// An opaque byte sequence.
    Binary(Bytes),
    /// A `JSON` object.
    Object(Map<String, Value>),
    /// A [`bool`] value.
    Bool(bool),
    /// A characters sequence.
    String(String),
    /// An [`i8`] value.
    Int8(i8),
    /// An [`i16`] value.
    Int16(i16),
    /// An [`i32`] value.
    Int32(i32),
    /// An [`i64`] value.
    Int64(i64),
    /// An [`u8`] value.
    Uint8(u8),
    /// An [`u16`] value.
    Uint16(u16),
    /// An [`u32`] value.
    Uint32(u32),
    /// An [`u64`] value.
    Uint64(u64),
    /// A [`f32`] value.
    Float32(f32),
    /// A [`f64`] value.
    Float64(f64),
}

impl std::fmt::Display for TypedValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Binary(v) => write!(f, "{:?}", v.as_ref()),
            Self::Object(v) => write!(f, "{}", Value::Object(v.clone())),
            Self::Bool(v) => v.fmt(f),
            Self::String(v) => v.fmt(f),
            Self::Int8(v) => v.fmt(f),
            Self::Int16(v) => v.fmt(f),
            Self::Int32(v) => v.fmt(f),
            Self::Int64(v) => v.fmt(f),
            Self::Uint8(v) => v.fmt(f),
            Self::Uint16(v) => v.fmt(f),
            Self::Uint32(v) => v.fmt(f),
            Self::Uint64(v) => v.fmt(f),
            Self::Float32(v) => v.fmt(f),
            Self::Float64(v) => v.fmt(f),
        }
    }
}

impl TypedValue {
    /// Returns the [`ValueType`] associated with a [`TypedValue`].
    #[must_use]
    pub const fn value_type(&self) -> ValueType {
        match self {
            Self::Binary(_) => ValueType::Binary,
            Self::Object(_) => ValueType::Object,
            Self::Bool(_) => ValueType::Bool,
            Self::String(_) => ValueType::String,
            Self::Int8(_) => ValueType::Int8,
            Self::Int16(_) => ValueType::Int16,
            Self::Int32(_) => ValueType::Int32,
            Self::Int64(_) => ValueType::Int64,
            Self::Uint8(_) => ValueType::Uint8,
            Self::Uint16(_) => ValueType::Uint16,
            Self::Uint32(_) => ValueType::Uint32,
            Self::Uint64(_) => ValueType::Uint64,
            Self::Float32(_) => ValueType::Float32,
            Self::Float64(_) => ValueType::Float64,
        }
    }

    /// Converts a [`TypedValue`] into its `JSON` representation.
    ///
    /// Returns [`None`] for non-finite floats, which have no `JSON`
    /// representation.
    #[must_use]
    pub fn to_json(&self) -> Option<Value> {
        Some(match self {
            Self::Binary(v) => Value::Array(v.iter().map(|b| Value::from(*b)).collect()),
            Self::Object(v) => Value::Object(v.clone()),
            Self::Bool(v) => Value::Bool(*v),
            Self::String(v) => Value::String(v.clone()),
            Self::Int8(v) => Value::from(*v),
            Self::Int16(v) => Value::from(*v),
            Self::Int32(v) => Value::from(*v),
            Self::Int64(v) => Value::from(*v),
            Self::Uint8(v) => Value::from(*v),
            Self::Uint16(v) => Value::from(*v),
            Self::Uint32(v) => Value::from(*v),
            Self::Uint64(v) => Value::from(*v),
            Self::Float32(v) => Value::Number(Number::from_f64(f64::from(*v))?),
            Self::Float64(v) => Value::Number(Number::from_f64(*v)?),
        })
    }
}

/// A raw reading, as it arrives from the wire.
#[derive(Debug, Clone, PartialEq)]
pub enum Reading {
    /// Text data.
    Text(String),
    /// Raw bytes.
    Bytes(Bytes),
}

impl Reading {
    /// Creates a [`Reading`] from a body according to the given
    /// [`ValueType`].
    ///
    /// The body is kept as raw bytes for [`ValueType::Binary`] and
    /// [`ValueType::Object`], otherwise it is decoded as `UTF-8` text.
    ///
    /// # Errors
    ///
    /// Returns an error when a text body is not valid `UTF-8`.
    pub fn from_body(body: Bytes, value_type: ValueType) -> Result<Self> {
        if value_type.is_raw() {
            return Ok(Self::Bytes(body));
        }

        String::from_utf8(body.into())
            .map(Self::Text)
            .map_err(|e| Error::new(ErrorKind::CastError, format!("body is not UTF-8 text: {e}")))
    }
}

impl From<&str> for Reading {
    fn from(text: &str) -> Self {
        Self::Text(text.into())
    }
}

impl From<String> for Reading {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<Bytes> for Reading {
    fn from(bytes: Bytes) -> Self {
        Self::Bytes(bytes)
    }
}

impl From<Vec<u8>> for Reading {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Bytes(bytes.into())
    }
}

impl From<&'static [u8]> for Reading {
    fn from(bytes: &'static [u8]) -> Self {
        Self::Bytes(Bytes::from_static(bytes))
    }
}
