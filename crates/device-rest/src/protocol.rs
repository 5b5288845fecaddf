use hashbrown::DefaultHashBuilder;

use indexmap::IndexMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, ErrorKind, Result};
use crate::macros::map;

/// Name of the protocol block describing how to reach an end device.
pub const END_DEVICE_PARAMS: &str = "EndDevice_Params";
/// End device host.
pub const ED_IP: &str = "ED_IP";
/// End device port.
pub const ED_PORT: &str = "ED_PORT";
/// End device path prefix.
pub const ED_URI_PREFIX: &str = "ED_URI_Prefix";

map! {
  /// A map that associates each protocol property name with its value.
  #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
  pub struct ProtocolProperties(IndexMap<String, Value, DefaultHashBuilder>);
}

map! {
  /// A map that associates each protocol block name with its
  /// [`ProtocolProperties`].
  #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
  pub struct Protocols(IndexMap<String, ProtocolProperties, DefaultHashBuilder>);
}

fn slash_end(s: &str) -> &str {
    s.strip_suffix('/').unwrap_or(s)
}

fn slash_start(s: &str) -> &str {
    s.strip_prefix('/').unwrap_or(s)
}

fn slash_start_end(s: &str) -> &str {
    slash_start(slash_end(s))
}

const fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn string_property(properties: &ProtocolProperties, key: &str) -> Result<String> {
    match properties.get(key) {
        Some(Value::String(value)) => Ok(value.clone()),
        Some(value) => Err(Error::new(
            ErrorKind::WrongParameterType,
            format!(
                "`{key}` in `{END_DEVICE_PARAMS}` must be a string, found `{}`",
                json_type(value)
            ),
        )),
        None => Err(Error::new(
            ErrorKind::MissingParameter,
            format!("`{key}` not found in `{END_DEVICE_PARAMS}`"),
        )),
    }
}

/// Parameters needed to reach an end device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtocolParameters {
    /// End device host.
    pub host: String,
    /// End device port.
    pub port: String,
    /// End device path prefix. It may be empty.
    pub path: String,
}

impl ProtocolParameters {
    /// Creates [`ProtocolParameters`].
    #[must_use]
    pub fn new(host: impl Into<String>, port: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: port.into(),
            path: path.into(),
        }
    }

    /// Builds the `URI` of a device resource.
    ///
    /// The `URI` has the form `http://{host}:{port}/{path/}{resource}?{query}`.
    /// The path segment is omitted when the path is empty, while the raw
    /// query is appended verbatim.
    #[must_use]
    pub fn uri(&self, resource_name: &str, raw_query: Option<&str>) -> String {
        let path = slash_start_end(&self.path);
        let raw_query = raw_query.unwrap_or_default();
        if path.is_empty() {
            format!(
                "http://{}:{}/{resource_name}?{raw_query}",
                self.host, self.port
            )
        } else {
            format!(
                "http://{}:{}/{path}/{resource_name}?{raw_query}",
                self.host, self.port
            )
        }
    }
}

/// Resolves [`ProtocolParameters`] from the [`Protocols`] of a device.
///
/// This function has no side effects, hence it can be used to validate a
/// device when it is registered.
///
/// # Errors
///
/// - The `EndDevice_Params` block is missing
/// - A parameter is missing
/// - A parameter is not a string
pub fn resolve(protocols: &Protocols) -> Result<ProtocolParameters> {
    let Some(properties) = protocols.get(END_DEVICE_PARAMS) else {
        return Err(Error::new(
            ErrorKind::ProtocolNotConfigured,
            format!("`{END_DEVICE_PARAMS}` protocol properties are not defined"),
        ));
    };

    Ok(ProtocolParameters {
        host: string_property(properties, ED_IP)?,
        port: string_property(properties, ED_PORT)?,
        path: string_property(properties, ED_URI_PREFIX)?,
    })
}
