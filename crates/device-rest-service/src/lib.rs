//! `device-rest-service` hosts a device service which bridges typed
//! command values and `HTTP`/`REST` end devices.
//!
//! The [`driver::RestDriver`] forwards read and write commands to end
//! devices, ingests the readings they push, and validates the devices
//! registered at runtime. The service is configured through a `TOML` file.

#![deny(unsafe_code)]
#![deny(missing_docs)]

/// Service configuration.
pub mod config;
/// The driver connecting the device service runtime to end devices.
pub mod driver;
