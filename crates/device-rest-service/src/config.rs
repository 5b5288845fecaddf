use std::net::Ipv4Addr;
use std::path::Path;
use std::time::Duration;

use device_rest::device::{AdminState, Device, DeviceResource};
use device_rest::error::{Error, ErrorKind, Result};
use device_rest::protocol::Protocols;

use device_rest_client::Client;

use device_rest_server::server::{DEFAULT_API_BASE, DEFAULT_SERVER_PORT};

use serde::{Deserialize, Serialize};

use tracing::info;

fn configuration_error(description: impl Into<std::borrow::Cow<'static, str>>) -> Error {
    Error::new(ErrorKind::Configuration, description)
}

/// Device service configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Inbound service settings.
    #[serde(default)]
    pub service: ServiceConfig,
    /// Outbound client settings.
    #[serde(default)]
    pub client: ClientConfig,
    /// Devices registered at startup.
    #[serde(default)]
    pub devices: Vec<DeviceConfig>,
}

/// Settings of the server which ingests pushed readings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Server address.
    #[serde(default = "default_host")]
    pub host: Ipv4Addr,
    /// Server port.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Base path of the ingestion route.
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Capacity of the async values queue.
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
    /// Maximum time, in milliseconds, a reading waits for queue capacity.
    ///
    /// If [`None`], a reading waits until the queue has room.
    #[serde(default)]
    pub enqueue_timeout_ms: Option<u64>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            api_base: default_api_base(),
            queue_capacity: default_queue_capacity(),
            enqueue_timeout_ms: None,
        }
    }
}

impl ServiceConfig {
    /// Returns the enqueue timeout.
    #[must_use]
    pub fn enqueue_timeout(&self) -> Option<Duration> {
        self.enqueue_timeout_ms.map(Duration::from_millis)
    }
}

const fn default_host() -> Ipv4Addr {
    Ipv4Addr::UNSPECIFIED
}

const fn default_port() -> u16 {
    DEFAULT_SERVER_PORT
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.into()
}

const fn default_queue_capacity() -> usize {
    16
}

/// Settings of the client which sends commands to end devices.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Timeout, in milliseconds, of each request sent to an end device.
    ///
    /// If [`None`], only the transport default applies.
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

impl ClientConfig {
    /// Builds the [`Client`] described by this configuration.
    #[must_use]
    pub fn client(&self) -> Client {
        match self.timeout_ms {
            Some(timeout) => Client::new().timeout(Duration::from_millis(timeout)),
            None => Client::new(),
        }
    }
}

/// A device declared in the configuration file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceConfig {
    /// Device name.
    pub name: String,
    /// Device administrative state.
    #[serde(default)]
    pub admin_state: AdminState,
    /// Device protocol properties.
    #[serde(default)]
    pub protocols: Protocols,
    /// Device resources.
    #[serde(default)]
    pub resources: Vec<DeviceResource>,
}

impl From<DeviceConfig> for Device {
    fn from(config: DeviceConfig) -> Self {
        Self {
            name: config.name,
            protocols: config.protocols,
            resources: config.resources.into_iter().collect(),
            admin_state: config.admin_state,
        }
    }
}

impl Config {
    /// Parses and validates a `TOML` configuration.
    ///
    /// # Errors
    ///
    /// Returns a [`ErrorKind::Configuration`] error when the text is not a
    /// valid configuration.
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)
            .map_err(|e| configuration_error(format!("invalid configuration: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads the configuration from a file.
    ///
    /// A missing file results in the default configuration.
    ///
    /// # Errors
    ///
    /// Returns a [`ErrorKind::Configuration`] error when the file cannot be
    /// read or it is not a valid configuration.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!(
                "Configuration file {} not found, using defaults",
                path.display()
            );
            return Ok(Self::default());
        }

        let text = std::fs::read_to_string(path).map_err(|e| {
            configuration_error(format!("cannot read {}: {e}", path.display()))
        })?;
        let config = Self::from_toml(&text)?;

        info!("Loaded configuration from {}", path.display());

        Ok(config)
    }

    /// Returns the [`Device`]s declared in the configuration.
    pub fn devices(&self) -> impl Iterator<Item = Device> + '_ {
        self.devices.iter().cloned().map(Device::from)
    }

    fn validate(&self) -> Result<()> {
        if self.service.queue_capacity == 0 {
            return Err(configuration_error(
                "`queue_capacity` must be greater than zero",
            ));
        }

        for (index, device) in self.devices.iter().enumerate() {
            if device.name.is_empty() {
                return Err(configuration_error(format!(
                    "device at position {index} has an empty name"
                )));
            }

            if self.devices[..index]
                .iter()
                .any(|other| other.name == device.name)
            {
                return Err(configuration_error(format!(
                    "device `{}` is declared more than once",
                    device.name
                )));
            }

            for (position, resource) in device.resources.iter().enumerate() {
                if device.resources[..position]
                    .iter()
                    .any(|other| other.name == resource.name)
                {
                    return Err(configuration_error(format!(
                        "resource `{}` of device `{}` is declared more than once",
                        resource.name, device.name
                    )));
                }
            }
        }

        Ok(())
    }
}
