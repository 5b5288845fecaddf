use hashbrown::DefaultHashBuilder;

use indexmap::IndexMap;

use serde::{Deserialize, Serialize};

use crate::macros::map;
use crate::protocol::Protocols;
use crate::value::ValueType;

/// A device resource.
///
/// It describes a single reading or actuation point of a device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceResource {
    /// Resource name.
    pub name: String,
    /// Resource value type.
    pub value_type: ValueType,
    /// Expected media type.
    ///
    /// An empty media type means that no media type is declared.
    #[serde(default)]
    #[serde(skip_serializing_if = "String::is_empty")]
    pub media_type: String,
    /// Resource description.
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl DeviceResource {
    /// Creates a [`DeviceResource`] without a media type.
    #[must_use]
    pub fn new(name: impl Into<String>, value_type: ValueType) -> Self {
        Self {
            name: name.into(),
            value_type,
            media_type: String::new(),
            description: None,
        }
    }

    /// Sets the expected media type.
    #[must_use]
    pub fn media_type(mut self, media_type: impl Into<String>) -> Self {
        self.media_type = media_type.into();
        self
    }

    /// Sets a resource description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

map! {
  /// A map that associates each resource name with its
  /// corresponding [`DeviceResource`].
  #[derive(Debug, Clone, PartialEq)]
  pub struct Resources(IndexMap<String, DeviceResource, DefaultHashBuilder>);
}

impl Resources {
    /// Adds a [`DeviceResource`] using its name as key.
    #[must_use]
    #[inline]
    pub fn resource(self, resource: DeviceResource) -> Self {
        self.insert(resource.name.clone(), resource)
    }
}

impl FromIterator<DeviceResource> for Resources {
    fn from_iter<I: IntoIterator<Item = DeviceResource>>(iter: I) -> Self {
        iter.into_iter()
            .map(|resource| (resource.name.clone(), resource))
            .collect()
    }
}

/// Device administrative state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AdminState {
    /// The device accepts commands.
    #[default]
    Unlocked,
    /// The device is administratively locked.
    Locked,
}

/// A device known to the registry.
#[derive(Debug, Clone, PartialEq)]
pub struct Device {
    /// Device name.
    pub name: String,
    /// Device protocol properties.
    pub protocols: Protocols,
    /// Device resources.
    pub resources: Resources,
    /// Device administrative state.
    pub admin_state: AdminState,
}

impl Device {
    /// Creates an unlocked [`Device`] without protocols and resources.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            protocols: Protocols::new(),
            resources: Resources::new(),
            admin_state: AdminState::Unlocked,
        }
    }

    /// Sets the device [`Protocols`].
    #[must_use]
    pub fn protocols(mut self, protocols: Protocols) -> Self {
        self.protocols = protocols;
        self
    }

    /// Adds a [`DeviceResource`].
    #[must_use]
    pub fn resource(mut self, resource: DeviceResource) -> Self {
        self.resources = self.resources.resource(resource);
        self
    }

    /// Sets the [`AdminState`].
    #[must_use]
    pub const fn admin_state(mut self, admin_state: AdminState) -> Self {
        self.admin_state = admin_state;
        self
    }
}
