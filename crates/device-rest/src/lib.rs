//! `device-rest` is the core library of a device service which bridges a
//! strongly-typed command value model and generic `HTTP`/`REST` end
//! devices.
//!
//! An end device exchanges untyped data: text for scalar values, raw bytes
//! for binary payloads and `JSON` objects. This crate turns that data into
//! [`command::CommandValue`]s, checking that each value fits the
//! [`value::ValueType`] declared by its [`device::DeviceResource`] and, for
//! binary and object values, that the content type matches the expected
//! media type.
//!
//! It also resolves the protocol parameters (host, port, and path) an end
//! device declares, which are used to build the `URI` of each device
//! resource.
//!
//! The device registry is owned by the hosting runtime and it is accessed
//! through the [`registry::DeviceRegistry`] trait. An in-memory
//! implementation is provided as well.

#![deny(unsafe_code)]
#![deny(missing_docs)]

/// Command values, command requests, and asynchronous values.
pub mod command;
/// Conversion of raw readings into command values.
pub mod coercion;
/// Devices and their resources.
pub mod device;
/// Error management.
pub mod error;
/// End device protocol parameters.
pub mod protocol;
/// Device registry.
pub mod registry;
/// Value types and typed payloads.
pub mod value;

mod macros;
