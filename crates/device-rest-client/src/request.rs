use std::time::Duration;

use device_rest::coercion::{CONTENT_TYPE_TEXT, coerce};
use device_rest::command::{CommandRequest, CommandValue};
use device_rest::device::DeviceResource;
use device_rest::error::{Error, ErrorKind, Result};
use device_rest::protocol::ProtocolParameters;
use device_rest::value::{Reading, ValueType};

use reqwest::header::{CONNECTION, CONTENT_TYPE};

use tracing::debug;

/// Content type of `JSON` bodies sent to an end device.
pub const CONTENT_TYPE_JSON_UTF8: &str = "application/json; charset=UTF-8";
/// Content type of text bodies sent to an end device.
pub const CONTENT_TYPE_TEXT_UTF8: &str = "text/plain; charset=UTF-8";

/// The kind of `REST` request sent to an end device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestKind {
    /// `GET` request.
    Get,
    /// `PUT` request.
    Put,
}

impl std::fmt::Display for RestKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Get => "GET",
            Self::Put => "PUT",
        }
        .fmt(f)
    }
}

#[derive(Debug, PartialEq)]
pub(crate) struct Body {
    pub(crate) content_type: &'static str,
    pub(crate) data: String,
}

impl Body {
    fn json(data: String) -> Self {
        Self {
            content_type: CONTENT_TYPE_JSON_UTF8,
            data,
        }
    }

    fn text(data: String) -> Self {
        Self {
            content_type: CONTENT_TYPE_TEXT_UTF8,
            data,
        }
    }
}

fn invalid_payload(resource: &DeviceResource, cause: Error) -> Error {
    Error::with_cause(
        ErrorKind::InvalidPayload,
        format!("invalid value for resource `{}`", resource.name),
        cause,
    )
}

fn transport_error(kind: RestKind, uri: &str, e: &reqwest::Error) -> Error {
    Error::new(
        ErrorKind::TransportError,
        format!("{kind} {uri} failed: {e}"),
    )
}

// Builds the body sent to write a value into a resource.
fn payload(resource: &DeviceResource, value: &CommandValue) -> Result<Body> {
    match resource.value_type {
        ValueType::Object => {
            let json = value.value().to_json().ok_or_else(|| {
                Error::new(
                    ErrorKind::InvalidPayload,
                    format!(
                        "value `{}` for resource `{}` has no JSON representation",
                        value.value(),
                        resource.name
                    ),
                )
            })?;
            let data =
                serde_json::to_string(&json).map_err(|e| invalid_payload(resource, e.into()))?;
            Ok(Body::json(data))
        }
        ValueType::Binary => Err(Error::new(
            ErrorKind::UnsupportedType,
            format!(
                "resource `{}` of type {} cannot be written",
                resource.name, resource.value_type
            ),
        )),
        value_type => {
            let data = value.value().to_string();
            coerce(
                resource,
                Reading::Text(data.clone()),
                value_type,
                CONTENT_TYPE_TEXT,
            )
            .map_err(|e| invalid_payload(resource, e))?;
            Ok(Body::text(data))
        }
    }
}

/// A request to an end device resource.
#[derive(Debug, PartialEq)]
pub(crate) struct Request {
    pub(crate) kind: RestKind,
    pub(crate) uri: String,
    pub(crate) body: Option<Body>,
}

impl Request {
    pub(crate) fn read(parameters: &ProtocolParameters, request: &CommandRequest) -> Self {
        Self {
            kind: RestKind::Get,
            uri: parameters.uri(&request.resource_name, request.url_raw_query()),
            body: None,
        }
    }

    pub(crate) fn write(
        parameters: &ProtocolParameters,
        request: &CommandRequest,
        resource: &DeviceResource,
        value: &CommandValue,
    ) -> Result<Self> {
        Ok(Self {
            kind: RestKind::Put,
            uri: parameters.uri(&request.resource_name, request.url_raw_query()),
            body: Some(payload(resource, value)?),
        })
    }

    // Every request uses its own client and closes the connection
    // afterwards, so no connection is shared across requests.
    pub(crate) async fn send(self, timeout: Option<Duration>) -> Result<reqwest::Response> {
        let Self { kind, uri, body } = self;

        debug!("Sending {kind} {uri}");

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| transport_error(kind, &uri, &e))?;

        let request_builder = match kind {
            RestKind::Get => client.get(&uri),
            RestKind::Put => client.put(&uri),
        };

        let request_builder = match body {
            Some(Body { content_type, data }) => {
                request_builder.header(CONTENT_TYPE, content_type).body(data)
            }
            None => request_builder,
        };

        let response = request_builder
            .header(CONNECTION, "close")
            .send()
            .await
            .map_err(|e| transport_error(kind, &uri, &e))?;

        let status = response.status();
        if status.as_u16() > 299 {
            return Err(Error::new(
                ErrorKind::UpstreamError {
                    status: status.as_u16(),
                },
                format!("{kind} {uri} returned {status}"),
            ));
        }

        Ok(response)
    }
}
