//! Resource snapshots returned by the Swift and RedDwarf APIs.
//!
//! Every snapshot is an immutable value assembled through its builder.
//! Builders start with every field at its zero value, never validate and
//! never fail; `build` copies the staged values and leaves the builder usable.

use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Storage account usage.
///
/// See <http://docs.openstack.org/api/openstack-object-storage/1.0/content/retrieve-account-metadata.html>
#[derive(Builder, Clone, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[builder(build_fn(skip))]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// Number of containers in the account. Unsigned: Swift never reports a
    /// negative count, and a negative header is rejected when read.
    container_count: u32,
    /// Total bytes stored in the account. Unsigned for the same reason.
    bytes_used: u64,
}

impl Account {
    pub fn builder() -> AccountBuilder {
        AccountBuilder::default()
    }

    pub fn to_builder(&self) -> AccountBuilder {
        let mut builder = Self::builder();
        builder.from_account(self);
        builder
    }

    /// The number of containers in object storage for the account
    pub fn container_count(&self) -> u32 {
        self.container_count
    }

    /// The total bytes stored in object storage for the account
    pub fn bytes_used(&self) -> u64 {
        self.bytes_used
    }
}

impl AccountBuilder {
    pub fn build(&self) -> Account {
        Account {
            container_count: self.container_count.unwrap_or_default(),
            bytes_used: self.bytes_used.unwrap_or_default(),
        }
    }

    pub fn from_account(&mut self, from: &Account) -> &mut Self {
        self.container_count(from.container_count())
            .bytes_used(from.bytes_used())
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{containerCount={}, bytesUsed={}}}",
            self.container_count, self.bytes_used
        )
    }
}

/// Container usage, as listed by `GET /?format=json` or read from a `HEAD`.
#[derive(Builder, Clone, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[builder(build_fn(skip))]
pub struct Container {
    #[builder(setter(into))]
    name: String,
    #[serde(rename = "count")]
    object_count: u64,
    #[serde(rename = "bytes")]
    bytes_used: u64,
}

impl Container {
    pub fn builder() -> ContainerBuilder {
        ContainerBuilder::default()
    }

    pub fn to_builder(&self) -> ContainerBuilder {
        let mut builder = Self::builder();
        builder.from_container(self);
        builder
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn object_count(&self) -> u64 {
        self.object_count
    }

    pub fn bytes_used(&self) -> u64 {
        self.bytes_used
    }
}

impl ContainerBuilder {
    pub fn build(&self) -> Container {
        Container {
            name: self.name.clone().unwrap_or_default(),
            object_count: self.object_count.unwrap_or_default(),
            bytes_used: self.bytes_used.unwrap_or_default(),
        }
    }

    pub fn from_container(&mut self, from: &Container) -> &mut Self {
        self.name(from.name())
            .object_count(from.object_count())
            .bytes_used(from.bytes_used())
    }
}

impl fmt::Display for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{name={}, objectCount={}, bytesUsed={}}}",
            self.name, self.object_count, self.bytes_used
        )
    }
}

/// Database flavor offered by RedDwarf.
#[derive(Builder, Clone, Debug, Default, Eq, Hash, PartialEq)]
#[builder(build_fn(skip))]
pub struct Flavor {
    #[builder(setter(into))]
    id: String,
    #[builder(setter(into))]
    name: String,
    /// Memory in MB.
    ram: u32,
}

impl Flavor {
    pub fn builder() -> FlavorBuilder {
        FlavorBuilder::default()
    }

    pub fn to_builder(&self) -> FlavorBuilder {
        let mut builder = Self::builder();
        builder.from_flavor(self);
        builder
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ram(&self) -> u32 {
        self.ram
    }
}

impl FlavorBuilder {
    pub fn build(&self) -> Flavor {
        Flavor {
            id: self.id.clone().unwrap_or_default(),
            name: self.name.clone().unwrap_or_default(),
            ram: self.ram.unwrap_or_default(),
        }
    }

    pub fn from_flavor(&mut self, from: &Flavor) -> &mut Self {
        self.id(from.id()).name(from.name()).ram(from.ram())
    }
}

impl fmt::Display for Flavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{id={}, name={}, ram={}}}", self.id, self.name, self.ram)
    }
}

/// Lifecycle status of a database instance.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum InstanceStatus {
    Active,
    Build,
    Reboot,
    Resize,
    Shutdown,
    Blocked,
    Error,
    #[default]
    #[serde(other)]
    Unrecognized,
}

impl From<&str> for InstanceStatus {
    fn from(value: &str) -> Self {
        match value.to_ascii_uppercase().as_str() {
            "ACTIVE" => Self::Active,
            "BUILD" => Self::Build,
            "REBOOT" => Self::Reboot,
            "RESIZE" => Self::Resize,
            "SHUTDOWN" => Self::Shutdown,
            "BLOCKED" => Self::Blocked,
            "ERROR" => Self::Error,
            _ => Self::Unrecognized,
        }
    }
}

impl fmt::Display for InstanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            Self::Active => "ACTIVE",
            Self::Build => "BUILD",
            Self::Reboot => "REBOOT",
            Self::Resize => "RESIZE",
            Self::Shutdown => "SHUTDOWN",
            Self::Blocked => "BLOCKED",
            Self::Error => "ERROR",
            Self::Unrecognized => "UNRECOGNIZED",
        };
        f.write_str(value)
    }
}

/// Database instance managed by RedDwarf.
#[derive(Builder, Clone, Debug, Default, Eq, Hash, PartialEq)]
#[builder(build_fn(skip))]
pub struct Instance {
    #[builder(setter(into))]
    id: String,
    #[builder(setter(into))]
    name: String,
    status: InstanceStatus,
    #[builder(setter(into))]
    flavor_id: String,
    /// Volume size in GB.
    volume_size: u32,
    #[builder(setter(strip_option, into))]
    hostname: Option<String>,
}

impl Instance {
    pub fn builder() -> InstanceBuilder {
        InstanceBuilder::default()
    }

    pub fn to_builder(&self) -> InstanceBuilder {
        let mut builder = Self::builder();
        builder.from_instance(self);
        builder
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn status(&self) -> InstanceStatus {
        self.status
    }

    pub fn flavor_id(&self) -> &str {
        &self.flavor_id
    }

    pub fn volume_size(&self) -> u32 {
        self.volume_size
    }

    pub fn hostname(&self) -> Option<&str> {
        self.hostname.as_deref()
    }
}

impl InstanceBuilder {
    pub fn build(&self) -> Instance {
        Instance {
            id: self.id.clone().unwrap_or_default(),
            name: self.name.clone().unwrap_or_default(),
            status: self.status.unwrap_or_default(),
            flavor_id: self.flavor_id.clone().unwrap_or_default(),
            volume_size: self.volume_size.unwrap_or_default(),
            hostname: self.hostname.clone().unwrap_or_default(),
        }
    }

    pub fn from_instance(&mut self, from: &Instance) -> &mut Self {
        self.id(from.id())
            .name(from.name())
            .status(from.status())
            .flavor_id(from.flavor_id())
            .volume_size(from.volume_size());
        // An unset hostname must not stay behind from an earlier staging.
        self.hostname = Some(from.hostname.clone());
        self
    }
}

impl fmt::Display for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{id={}, name={}, status={}, flavorId={}, volumeSize={}",
            self.id, self.name, self.status, self.flavor_id, self.volume_size
        )?;
        if let Some(hostname) = &self.hostname {
            write!(f, ", hostname={}", hostname)?;
        }
        f.write_str("}")
    }
}

/// Error response body.
///
/// OpenStack services either answer with a flat `{"message": ..}` object or
/// wrap it in a fault name such as `{"itemNotFound": {"message": .., "code": 404}}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorResponse {
    pub message: Option<String>,
}

impl ErrorResponse {
    /// Extract the message from either error body shape
    pub fn from_body(body: &serde_json::Value) -> Option<Self> {
        let flat: Option<Self> = serde_json::from_value(body.clone()).ok();
        if let Some(found) = flat.filter(|e| e.message.is_some()) {
            return Some(found);
        }

        body.as_object()?
            .values()
            .filter(|v| v.is_object())
            .find_map(|v| serde_json::from_value::<Self>(v.clone()).ok())
            .filter(|e| e.message.is_some())
    }
}
