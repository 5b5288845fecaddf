//! `device-rest-server` ingests readings pushed by `HTTP`/`REST` end
//! devices.
//!
//! An end device sends a reading with a `POST` request to
//! `/resource/{device_name}/{resource_name}`, placed under a configurable
//! base path. The reading is converted into a command value of the type
//! declared by the resource and then handed off to an asynchronous sink
//! consumed by the hosting runtime.
//!
//! Failures are reported with a plain text body and a status code derived
//! from the error kind.

#![deny(unsafe_code)]
#![deny(missing_docs)]

/// The ingestion route and its handler.
pub mod handler;
/// The server running the ingestion route.
pub mod server;
/// The sink where ingested values are handed off.
pub mod sink;

pub use server::{GracefulShutdownServer, Server};
pub use sink::{AsyncValuesReceiver, AsyncValuesSink, channel};
