use std::net::SocketAddr;
use std::sync::Arc;

use device_rest::command::{CommandRequest, CommandValue};
use device_rest::device::{AdminState, Device};
use device_rest::error::{Error, ErrorKind, Result};
use device_rest::protocol::resolve;
use device_rest::registry::{DeviceRegistry, MemoryRegistry};

use device_rest_client::Client;

use device_rest_server::{AsyncValuesSink, Server};

use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use tracing::{debug, info, warn};

use crate::config::ServiceConfig;

// A running ingestion server.
struct RunningServer {
    address: SocketAddr,
    shutdown: oneshot::Sender<()>,
    handle: JoinHandle<Result<()>>,
}

/// A driver bridging a device service runtime and `REST` end devices.
///
/// Reads and writes are forwarded to end devices through a [`Client`],
/// while readings pushed by end devices are ingested by a [`Server`]
/// started at initialization.
pub struct RestDriver {
    config: ServiceConfig,
    client: Client,
    registry: Arc<MemoryRegistry>,
    server: Option<RunningServer>,
}

impl RestDriver {
    /// Creates a [`RestDriver`] which manages the devices of `registry`.
    #[must_use]
    pub const fn new(config: ServiceConfig, client: Client, registry: Arc<MemoryRegistry>) -> Self {
        Self {
            config,
            client,
            registry,
            server: None,
        }
    }

    /// Returns the device registry.
    #[must_use]
    pub const fn registry(&self) -> &Arc<MemoryRegistry> {
        &self.registry
    }

    /// Returns the address of the ingestion server.
    ///
    /// If [`None`], the driver has not been initialized.
    #[must_use]
    pub fn address(&self) -> Option<SocketAddr> {
        self.server.as_ref().map(|server| server.address)
    }

    /// Starts the server which ingests readings, handing them off to `sink`.
    ///
    /// # Errors
    ///
    /// - The driver is already initialized
    /// - The server address cannot be bound
    pub async fn initialize(&mut self, sink: AsyncValuesSink) -> Result<()> {
        if self.server.is_some() {
            return Err(Error::new(
                ErrorKind::Server,
                "the driver is already initialized",
            ));
        }

        let sink = match self.config.enqueue_timeout() {
            Some(timeout) => sink.timeout(timeout),
            None => sink,
        };

        let registry: Arc<dyn DeviceRegistry> = self.registry.clone();
        let server = Server::new(registry, sink)
            .address(self.config.host)
            .port(self.config.port)
            .api_base(self.config.api_base.as_str());

        let listener = server.bind().await?;
        let address = listener.local_addr()?;

        let (shutdown, signal) = oneshot::channel();
        let server = server.with_graceful_shutdown(async move {
            // A dropped sender stops the server as well.
            let _ = signal.await;
        });
        let handle = tokio::spawn(server.serve(listener));

        info!("Driver initialized, ingesting readings on {address}");

        self.server = Some(RunningServer {
            address,
            shutdown,
            handle,
        });

        Ok(())
    }

    fn device(&self, device_name: &str) -> Result<Device> {
        self.registry.device(device_name).ok_or_else(|| {
            Error::new(
                ErrorKind::DeviceNotFound,
                format!("device `{device_name}` not found"),
            )
        })
    }

    // Commands only reach unlocked devices.
    fn unlocked_device(&self, device_name: &str) -> Result<Device> {
        let device = self.device(device_name)?;
        if device.admin_state == AdminState::Locked {
            return Err(Error::new(
                ErrorKind::DeviceLocked,
                format!("device `{device_name}` is locked"),
            ));
        }
        Ok(device)
    }

    /// Reads the requested resources of a device.
    ///
    /// # Errors
    ///
    /// - The device does not exist or it is locked
    /// - Any of the failures of [`Client::read`]
    pub async fn handle_read_commands(
        &self,
        device_name: &str,
        requests: &[CommandRequest],
    ) -> Result<Vec<CommandValue>> {
        let device = self.unlocked_device(device_name)?;

        debug!(
            "Reading {} resources of device `{device_name}`",
            requests.len()
        );

        self.client
            .read(device_name, &device.protocols, &device.resources, requests)
            .await
    }

    /// Writes values into the requested resources of a device.
    ///
    /// # Errors
    ///
    /// - The device does not exist or it is locked
    /// - Any of the failures of [`Client::write`]
    pub async fn handle_write_commands(
        &self,
        device_name: &str,
        requests: &[CommandRequest],
        values: &[CommandValue],
    ) -> Result<()> {
        let device = self.unlocked_device(device_name)?;

        debug!(
            "Writing {} resources of device `{device_name}`",
            requests.len()
        );

        self.client
            .write(
                device_name,
                &device.protocols,
                &device.resources,
                requests,
                values,
            )
            .await
    }

    /// Registers a new device.
    ///
    /// The device protocol parameters are validated without contacting the
    /// end device.
    ///
    /// # Errors
    ///
    /// Returns an error if the protocol parameters are not valid.
    pub fn add_device(&self, device: Device) -> Result<()> {
        resolve(&device.protocols)?;

        info!("Device `{}` added", device.name);
        self.registry.add(device);

        Ok(())
    }

    /// Replaces an already registered device.
    ///
    /// # Errors
    ///
    /// - The device does not exist
    /// - The protocol parameters are not valid
    pub fn update_device(&self, device: Device) -> Result<()> {
        self.device(&device.name)?;
        resolve(&device.protocols)?;

        info!("Device `{}` updated", device.name);
        self.registry.add(device);

        Ok(())
    }

    /// Removes a device.
    ///
    /// # Errors
    ///
    /// Returns an error if the device does not exist.
    pub fn remove_device(&self, device_name: &str) -> Result<()> {
        self.registry.remove(device_name).ok_or_else(|| {
            Error::new(
                ErrorKind::DeviceNotFound,
                format!("device `{device_name}` not found"),
            )
        })?;

        info!("Device `{device_name}` removed");

        Ok(())
    }

    /// Stops the ingestion server.
    ///
    /// Pending requests are completed first, unless `force` is set, in which
    /// case the server is aborted immediately.
    ///
    /// # Errors
    ///
    /// Returns an error if the server failed while running.
    pub async fn stop(&mut self, force: bool) -> Result<()> {
        let Some(server) = self.server.take() else {
            debug!("The driver is not running");
            return Ok(());
        };

        if force {
            warn!("Aborting the ingestion server");
            server.handle.abort();
            return match server.handle.await {
                Ok(result) => result,
                Err(e) if e.is_cancelled() => Ok(()),
                Err(e) => Err(Error::new(ErrorKind::Server, e.to_string())),
            };
        }

        // The server may have already stopped, so a closed channel is fine.
        let _ = server.shutdown.send(());

        server
            .handle
            .await
            .map_err(|e| Error::new(ErrorKind::Server, e.to_string()))?
    }
}

#[cfg(test)]
mod tests {
    use std::net::{Ipv4Addr, SocketAddr};
    use std::sync::Arc;
    use std::time::Duration;

    use axum::Router;
    use axum::http::StatusCode;
    use axum::routing::get;

    use device_rest::coercion::coerce;
    use device_rest::command::CommandRequest;
    use device_rest::device::{AdminState, Device, DeviceResource};
    use device_rest::error::ErrorKind;
    use device_rest::protocol::{
        ED_IP, ED_PORT, ED_URI_PREFIX, END_DEVICE_PARAMS, ProtocolProperties, Protocols,
    };
    use device_rest::registry::{DeviceRegistry, MemoryRegistry};
    use device_rest::value::{TypedValue, ValueType};

    use device_rest_client::Client;

    use device_rest_server::channel;

    use serde_json::Value;

    use tokio::net::TcpListener;

    use crate::config::ServiceConfig;

    use super::RestDriver;

    fn protocols(host: &str, port: &str) -> Protocols {
        Protocols::new().insert(
            END_DEVICE_PARAMS.into(),
            ProtocolProperties::new()
                .insert(ED_IP.into(), Value::from(host))
                .insert(ED_PORT.into(), Value::from(port))
                .insert(ED_URI_PREFIX.into(), Value::from("")),
        )
    }

    fn thermostat(address: SocketAddr) -> Device {
        Device::new("thermostat")
            .protocols(protocols(
                &address.ip().to_string(),
                &address.port().to_string(),
            ))
            .resource(DeviceResource::new("temperature", ValueType::Float64))
            .resource(DeviceResource::new("setpoint", ValueType::Int16))
    }

    fn driver() -> RestDriver {
        let config = ServiceConfig {
            host: Ipv4Addr::LOCALHOST,
            port: 0,
            ..ServiceConfig::default()
        };
        RestDriver::new(config, Client::new(), Arc::new(MemoryRegistry::new()))
    }

    async fn end_device() -> SocketAddr {
        let router = Router::new()
            .route("/temperature", get(|| async { "19.75" }))
            .route("/setpoint", axum::routing::put(|| async { StatusCode::NO_CONTENT }));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, router).await.unwrap() });

        address
    }

    #[test]
    fn device_callbacks() {
        let driver = driver();
        let address = SocketAddr::from((Ipv4Addr::LOCALHOST, 8080));

        // Devices without a valid protocol block are rejected.
        assert_eq!(
            driver
                .add_device(Device::new("thermostat"))
                .unwrap_err()
                .kind(),
            ErrorKind::ProtocolNotConfigured
        );
        assert!(driver.registry().is_empty());

        driver.add_device(thermostat(address)).unwrap();
        assert_eq!(driver.registry().names(), vec!["thermostat"]);

        let updated = thermostat(address).resource(DeviceResource::new("mode", ValueType::String));
        driver.update_device(updated.clone()).unwrap();
        assert_eq!(driver.registry().device("thermostat"), Some(updated.clone()));

        // An invalid update keeps the registered device.
        assert_eq!(
            driver
                .update_device(Device::new("thermostat"))
                .unwrap_err()
                .kind(),
            ErrorKind::ProtocolNotConfigured
        );
        assert_eq!(driver.registry().device("thermostat"), Some(updated));

        assert_eq!(
            driver.update_device(Device::new("camera")).unwrap_err().kind(),
            ErrorKind::DeviceNotFound
        );

        driver.remove_device("thermostat").unwrap();
        assert_eq!(
            driver.remove_device("thermostat").unwrap_err().kind(),
            ErrorKind::DeviceNotFound
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn read_and_write_commands() {
        let address = end_device().await;
        let driver = driver();
        driver.add_device(thermostat(address)).unwrap();

        let values = driver
            .handle_read_commands("thermostat", &[CommandRequest::new("temperature")])
            .await
            .unwrap();
        assert_eq!(values[0].value(), &TypedValue::Float64(19.75));

        let setpoint = DeviceResource::new("setpoint", ValueType::Int16);
        let value = coerce(&setpoint, "-5".into(), ValueType::Int16, "text/plain").unwrap();
        driver
            .handle_write_commands("thermostat", &[CommandRequest::new("setpoint")], &[value])
            .await
            .unwrap();

        let error = driver
            .handle_read_commands("camera", &[CommandRequest::new("temperature")])
            .await
            .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::DeviceNotFound);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn locked_device_rejects_commands() {
        let address = end_device().await;
        let driver = driver();
        driver
            .add_device(thermostat(address).admin_state(AdminState::Locked))
            .unwrap();

        let error = driver
            .handle_read_commands("thermostat", &[CommandRequest::new("temperature")])
            .await
            .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::DeviceLocked);

        let setpoint = DeviceResource::new("setpoint", ValueType::Int16);
        let value = coerce(&setpoint, "3".into(), ValueType::Int16, "text/plain").unwrap();
        let error = driver
            .handle_write_commands("thermostat", &[CommandRequest::new("setpoint")], &[value])
            .await
            .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::DeviceLocked);

        // Unlocking the device lets commands through again.
        driver.update_device(thermostat(address)).unwrap();
        let values = driver
            .handle_read_commands("thermostat", &[CommandRequest::new("temperature")])
            .await
            .unwrap();
        assert_eq!(values[0].value(), &TypedValue::Float64(19.75));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn ingest_pushed_readings() {
        let mut driver = driver();
        driver
            .add_device(thermostat(SocketAddr::from((Ipv4Addr::LOCALHOST, 8080))))
            .unwrap();

        let (sink, mut receiver) = channel(4);
        driver.initialize(sink.clone()).await.unwrap();
        assert_eq!(
            driver.initialize(sink).await.unwrap_err().kind(),
            ErrorKind::Server
        );

        let address = driver.address().unwrap();
        let status = reqwest::Client::new()
            .post(format!(
                "http://{address}/api/v2/resource/thermostat/temperature"
            ))
            .header(reqwest::header::CONTENT_TYPE, "text/plain")
            .body("456.123")
            .send()
            .await
            .unwrap()
            .status();
        assert_eq!(status, reqwest::StatusCode::OK);

        let values = tokio::time::timeout(Duration::from_secs(5), receiver.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(values.device_name, "thermostat");
        assert_eq!(
            values.command_values[0].value(),
            &TypedValue::Float64(456.123)
        );

        driver.stop(false).await.unwrap();
        assert_eq!(driver.address(), None);

        // Stopping twice is harmless.
        driver.stop(false).await.unwrap();
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn force_stop() {
        let mut driver = driver();
        let (sink, _receiver) = channel(1);

        driver.initialize(sink).await.unwrap();
        driver.stop(true).await.unwrap();
        assert_eq!(driver.address(), None);
    }
}
