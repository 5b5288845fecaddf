use std::time::Duration;

use device_rest::coercion::coerce;
use device_rest::command::{CommandRequest, CommandValue};
use device_rest::device::{DeviceResource, Resources};
use device_rest::error::{Error, ErrorKind, Result};
use device_rest::protocol::{Protocols, resolve};
use device_rest::value::Reading;

use reqwest::header::CONTENT_TYPE;

use tracing::{debug, info};

use crate::request::Request;

fn resource<'a>(
    device_name: &str,
    resources: &'a Resources,
    request: &CommandRequest,
) -> Result<&'a DeviceResource> {
    resources.get(&request.resource_name).ok_or_else(|| {
        Error::new(
            ErrorKind::ResourceNotFound,
            format!(
                "resource `{}` not found for device `{device_name}`",
                request.resource_name
            ),
        )
    })
}

fn invalid_response(resource: &DeviceResource, cause: Error) -> Error {
    Error::with_cause(
        ErrorKind::InvalidResponseData,
        format!("invalid response data for resource `{}`", resource.name),
        cause,
    )
}

/// A client which reads from and writes to end device resources.
///
/// Requests of a batch are sent sequentially, in order, and the batch is
/// aborted at the first failure.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Client {
    timeout: Option<Duration>,
}

impl Client {
    /// Creates a [`Client`] without a request timeout.
    #[must_use]
    pub const fn new() -> Self {
        Self { timeout: None }
    }

    /// Sets the timeout of each request.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Reads the requested resources of an end device.
    ///
    /// Each response body is converted into a [`CommandValue`] of the type
    /// declared by its resource. Values are returned in request order.
    ///
    /// # Errors
    ///
    /// - The end device protocol parameters cannot be resolved
    /// - A requested resource is not defined
    /// - A request fails or the end device answers with an error status
    /// - A response body does not match the resource type
    pub async fn read(
        &self,
        device_name: &str,
        protocols: &Protocols,
        resources: &Resources,
        requests: &[CommandRequest],
    ) -> Result<Vec<CommandValue>> {
        let parameters = resolve(protocols)?;

        let mut values = Vec::with_capacity(requests.len());
        for request in requests {
            let resource = resource(device_name, resources, request)?;

            let response = Request::read(&parameters, request)
                .send(self.timeout)
                .await?;

            let content_type = response
                .headers()
                .get(CONTENT_TYPE)
                .and_then(|value| value.to_str().ok())
                .unwrap_or_default()
                .to_owned();

            let body = response.bytes().await.map_err(|e| {
                Error::new(
                    ErrorKind::TransportError,
                    format!("cannot read the response body of `{}`: {e}", resource.name),
                )
            })?;

            debug!(
                "Read {} bytes from `{}` of device `{device_name}`",
                body.len(),
                resource.name
            );

            let reading = Reading::from_body(body, resource.value_type)
                .map_err(|e| invalid_response(resource, e))?;
            let value = coerce(resource, reading, resource.value_type, &content_type)
                .map_err(|e| invalid_response(resource, e))?;

            values.push(value);
        }

        Ok(values)
    }

    /// Writes values into the requested resources of an end device.
    ///
    /// The value at index `i` is written into the resource of the request
    /// at index `i`.
    ///
    /// # Errors
    ///
    /// - The end device protocol parameters cannot be resolved
    /// - A requested resource is not defined
    /// - A request has no value or a value does not fit its resource
    /// - A resource is binary, which cannot be written
    /// - A request fails or the end device answers with an error status
    pub async fn write(
        &self,
        device_name: &str,
        protocols: &Protocols,
        resources: &Resources,
        requests: &[CommandRequest],
        values: &[CommandValue],
    ) -> Result<()> {
        let parameters = resolve(protocols)?;

        for (index, request) in requests.iter().enumerate() {
            let resource = resource(device_name, resources, request)?;

            let value = values.get(index).ok_or_else(|| {
                Error::new(
                    ErrorKind::InvalidPayload,
                    format!("no value provided for resource `{}`", resource.name),
                )
            })?;

            Request::write(&parameters, request, resource, value)?
                .send(self.timeout)
                .await?;

            info!(
                "Wrote `{}` into `{}` of device `{device_name}`",
                value.value(),
                resource.name
            );
        }

        Ok(())
    }
}
