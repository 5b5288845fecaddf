//! `device-rest-client` sends commands to `HTTP`/`REST` end devices.
//!
//! Reads are `GET` requests whose response bodies are converted into
//! command values of the type declared by each device resource. Writes are
//! `PUT` requests carrying either a `JSON` object or the text of a scalar
//! value.
//!
//! The address of an end device is resolved from its protocol parameters
//! at every command, so a device can be reconfigured at any time.

#![deny(unsafe_code)]
#![deny(missing_docs)]

/// The client which reads from and writes to end devices.
pub mod client;
/// Requests sent to end devices.
pub mod request;

pub use client::Client;
