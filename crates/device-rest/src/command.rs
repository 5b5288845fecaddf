use std::time::{SystemTime, UNIX_EPOCH};

use hashbrown::DefaultHashBuilder;

use indexmap::IndexMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::macros::map;
use crate::value::{TypedValue, ValueType};

/// Attribute holding the raw `URL` query appended to outbound requests.
pub const URL_RAW_QUERY: &str = "urlRawQuery";

fn now_nanos() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_nanos()).unwrap_or(i64::MAX))
        .unwrap_or_default()
}

/// A named, typed, and timestamped reading or actuation parameter.
///
/// A [`CommandValue`] can only be created by the coercion engine, so its
/// payload always matches the declared [`ValueType`].
#[derive(Debug, Clone, PartialEq)]
pub struct CommandValue {
    resource_name: String,
    value: TypedValue,
    origin: i64,
}

impl CommandValue {
    pub(crate) fn new(resource_name: impl Into<String>, value: TypedValue) -> Self {
        Self {
            resource_name: resource_name.into(),
            value,
            origin: now_nanos(),
        }
    }

    /// Returns the name of the device resource.
    #[must_use]
    pub fn resource_name(&self) -> &str {
        &self.resource_name
    }

    /// Returns the [`ValueType`] of the payload.
    #[must_use]
    pub const fn value_type(&self) -> ValueType {
        self.value.value_type()
    }

    /// Returns an immutable reference to the [`TypedValue`].
    #[must_use]
    pub const fn value(&self) -> &TypedValue {
        &self.value
    }

    /// Returns the creation timestamp in nanoseconds since the Unix epoch.
    #[must_use]
    pub const fn origin(&self) -> i64 {
        self.origin
    }

    /// Consumes a [`CommandValue`] returning its [`TypedValue`].
    #[must_use]
    pub fn into_value(self) -> TypedValue {
        self.value
    }
}

map! {
  /// A map that associates each request attribute name with its
  /// `JSON` value.
  #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
  pub struct Attributes(IndexMap<String, Value, DefaultHashBuilder>);
}

/// A single unit of work of a batched read or write call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandRequest {
    /// Name of the targeted device resource.
    pub resource_name: String,
    /// Request attributes.
    #[serde(default)]
    pub attributes: Attributes,
}

impl CommandRequest {
    /// Creates a [`CommandRequest`] for the given device resource.
    #[must_use]
    pub fn new(resource_name: impl Into<String>) -> Self {
        Self {
            resource_name: resource_name.into(),
            attributes: Attributes::new(),
        }
    }

    /// Sets the raw `URL` query appended verbatim to the request `URI`.
    #[must_use]
    pub fn raw_query(mut self, raw_query: impl Into<String>) -> Self {
        self.attributes
            .add(URL_RAW_QUERY.into(), Value::String(raw_query.into()));
        self
    }

    /// Returns the raw `URL` query attribute.
    ///
    /// If [`None`], the attribute is absent or it is not a string.
    #[must_use]
    pub fn url_raw_query(&self) -> Option<&str> {
        self.attributes.get(URL_RAW_QUERY).and_then(Value::as_str)
    }
}

/// Values produced asynchronously by a device.
#[derive(Debug, Clone, PartialEq)]
pub struct AsyncValues {
    /// Name of the device which produced the values.
    pub device_name: String,
    /// Produced values.
    pub command_values: Vec<CommandValue>,
}

impl AsyncValues {
    /// Creates [`AsyncValues`].
    #[must_use]
    pub fn new(device_name: impl Into<String>, command_values: Vec<CommandValue>) -> Self {
        Self {
            device_name: device_name.into(),
            command_values,
        }
    }
}
