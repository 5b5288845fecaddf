use std::sync::Arc;

use axum::Router;
use axum::body::Bytes;
use axum::extract::{DefaultBodyLimit, Path, State};
use axum::http::{HeaderMap, StatusCode, header::CONTENT_TYPE};
use axum::response::{IntoResponse, Response};
use axum::routing::post;

use device_rest::coercion::{check_media_type, coerce};
use device_rest::command::AsyncValues;
use device_rest::error::{Error, ErrorKind};
use device_rest::registry::DeviceRegistry;
use device_rest::value::Reading;

use tracing::{debug, warn};

use crate::sink::AsyncValuesSink;

/// Route which receives readings pushed by end devices.
pub const RESOURCE_ROUTE: &str = "/resource/{device_name}/{resource_name}";

/// A response describing why a pushed reading has been ignored.
///
/// The status code is derived from the [`ErrorKind`] and the body is the
/// error description as plain text.
#[derive(Debug)]
pub struct ErrorResponse(Error);

impl ErrorResponse {
    /// Returns the [`Error`] carried by the response.
    #[must_use]
    pub const fn error(&self) -> &Error {
        &self.0
    }
}

impl From<Error> for ErrorResponse {
    fn from(error: Error) -> Self {
        Self(error)
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.kind().status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, self.0.description().to_owned()).into_response()
    }
}

#[derive(Clone)]
struct IngestionState {
    registry: Arc<dyn DeviceRegistry>,
    sink: AsyncValuesSink,
}

/// Builds the router which ingests readings pushed by end devices.
///
/// Devices and resources are looked up in `registry`, while every accepted
/// reading is handed off to `sink`.
///
/// Request bodies are read whole, without any size limit.
pub fn router(registry: Arc<dyn DeviceRegistry>, sink: AsyncValuesSink) -> Router {
    Router::new()
        .route(RESOURCE_ROUTE, post(ingest))
        .layer(DefaultBodyLimit::disable())
        .with_state(IngestionState { registry, sink })
}

async fn ingest(
    State(state): State<IngestionState>,
    Path((device_name, resource_name)): Path<(String, String)>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(), ErrorResponse> {
    debug!("Received POST for device `{device_name}` and resource `{resource_name}`");

    let result = process(&state, device_name, &resource_name, &headers, body).await;
    if let Err(e) = &result {
        warn!("Incoming reading for `{resource_name}` ignored: {e}");
    }
    result.map_err(ErrorResponse::from)
}

async fn process(
    state: &IngestionState,
    device_name: String,
    resource_name: &str,
    headers: &HeaderMap,
    body: Bytes,
) -> Result<(), Error> {
    if state.registry.device(&device_name).is_none() {
        return Err(Error::new(
            ErrorKind::DeviceNotFound,
            format!("Device '{device_name}' not found"),
        ));
    }

    let Some(resource) = state.registry.device_resource(&device_name, resource_name) else {
        return Err(Error::new(
            ErrorKind::ResourceNotFound,
            format!("Resource '{resource_name}' not found"),
        ));
    };

    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    if !resource.media_type.is_empty() {
        check_media_type(&resource.media_type, content_type)?;
    }

    if body.is_empty() {
        return Err(Error::new(ErrorKind::EmptyBody, "no request body provided"));
    }

    let reading = Reading::from_body(body, resource.value_type)?;
    let value = coerce(&resource, reading, resource.value_type, content_type)?;

    debug!("Incoming reading received for device `{device_name}` and resource `{resource_name}`");

    state
        .sink
        .send(AsyncValues::new(device_name, vec![value]))
        .await
}
