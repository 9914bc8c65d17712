use crate::{
    apis::{id_string, path_segment},
    client::OpenStackClient,
    error::{OpenStackError, OpenStackResult},
    models::{Instance, InstanceStatus},
};
use log::{debug, info};
use reqwest::{Method, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Instance as it appears on the wire
#[derive(Debug, Deserialize)]
struct InstanceWire {
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    status: Option<String>,
    flavor: Option<FlavorRef>,
    volume: Option<Volume>,
    hostname: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FlavorRef {
    id: Value,
}

#[derive(Debug, Deserialize, Serialize)]
struct Volume {
    size: u32,
}

#[derive(Deserialize)]
struct InstanceList {
    instances: Vec<InstanceWire>,
}

#[derive(Deserialize)]
struct InstanceEnvelope {
    instance: InstanceWire,
}

#[derive(Debug, Serialize)]
struct InstanceCreate<'a> {
    instance: InstanceCreateBody<'a>,
}

#[derive(Debug, Serialize)]
struct InstanceCreateBody<'a> {
    #[serde(rename = "flavorRef")]
    flavor_ref: &'a str,
    volume: Volume,
    name: &'a str,
}

impl From<InstanceWire> for Instance {
    fn from(wire: InstanceWire) -> Self {
        let mut builder = Instance::builder();
        builder
            .id(wire.id)
            .name(wire.name)
            .status(wire.status.as_deref().map(InstanceStatus::from).unwrap_or_default());

        if let Some(flavor) = wire.flavor {
            builder.flavor_id(id_string(flavor.id));
        }
        if let Some(volume) = wire.volume {
            builder.volume_size(volume.size);
        }
        if let Some(hostname) = wire.hostname {
            builder.hostname(hostname);
        }

        builder.build()
    }
}

/// RedDwarf database instance operations
pub struct InstanceApi<'a> {
    client: &'a OpenStackClient,
}

impl<'a> InstanceApi<'a> {
    pub fn new(client: &'a OpenStackClient) -> Self {
        Self { client }
    }

    /// List database instances
    pub async fn list(&self) -> OpenStackResult<Vec<Instance>> {
        info!("Listing instances");
        let req = self.client.request(Method::GET, "instances").await?;
        let list: InstanceList = self.client.execute(req).await?;
        Ok(list.instances.into_iter().map(Instance::from).collect())
    }

    /// Get an instance, or `None` if it does not exist
    pub async fn get(&self, id: &str) -> OpenStackResult<Option<Instance>> {
        let path = instance_path(id)?;
        info!("Getting instance: {}", id);
        let req = self.client.request(Method::GET, &path).await?;
        let envelope: Option<InstanceEnvelope> = self.client.execute_optional(req).await?;
        Ok(envelope.map(|e| Instance::from(e.instance)))
    }

    /// Create a database instance
    ///
    /// # Arguments
    /// * `flavor_ref` - Flavor id or href
    /// * `volume_size` - Volume size in GB
    /// * `name` - Instance name
    pub async fn create(
        &self,
        flavor_ref: &str,
        volume_size: u32,
        name: &str,
    ) -> OpenStackResult<Instance> {
        if name.is_empty() {
            return Err(OpenStackError::invalid_param("instance name must not be empty"));
        }

        info!("Creating instance {} with flavor {}", name, flavor_ref);
        let body = InstanceCreate {
            instance: InstanceCreateBody {
                flavor_ref,
                volume: Volume { size: volume_size },
                name,
            },
        };
        debug!("Request body: {:?}", body);

        let req = self.client.request(Method::POST, "instances").await?.json(&body);
        let envelope: InstanceEnvelope = self.client.execute(req).await?;
        Ok(Instance::from(envelope.instance))
    }

    /// Delete an instance
    ///
    /// Returns `true` if deletion was accepted, `false` if the instance did not exist
    pub async fn delete(&self, id: &str) -> OpenStackResult<bool> {
        let path = instance_path(id)?;
        info!("Deleting instance: {}", id);
        let req = self.client.request(Method::DELETE, &path).await?;
        let status = self
            .client
            .execute_status(req, &[StatusCode::NOT_FOUND])
            .await?;
        Ok(status.is_success())
    }
}

fn instance_path(id: &str) -> OpenStackResult<String> {
    Ok(format!("instances/{}", path_segment("instance", id)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_wire_conversion() {
        let wire: InstanceWire = serde_json::from_value(json!({
            "id": "44b277eb",
            "name": "json_rack_instance",
            "status": "BUILD",
            "flavor": {"id": 1, "links": []},
            "volume": {"size": 2},
            "hostname": "e09ad9a3f73309469cf1f43d11e79549caf9acf2.rackspaceclouddb.com"
        }))
        .unwrap();

        let instance = Instance::from(wire);
        assert_eq!(instance.id(), "44b277eb");
        assert_eq!(instance.status(), InstanceStatus::Build);
        assert_eq!(instance.flavor_id(), "1");
        assert_eq!(instance.volume_size(), 2);
        assert!(instance.hostname().is_some());
    }

    #[test]
    fn test_wire_conversion_sparse() {
        let wire: InstanceWire = serde_json::from_value(json!({
            "id": "abc",
            "flavor": {"id": "3"}
        }))
        .unwrap();

        let instance = Instance::from(wire);
        assert_eq!(instance.name(), "");
        assert_eq!(instance.status(), InstanceStatus::Unrecognized);
        assert_eq!(instance.flavor_id(), "3");
        assert_eq!(instance.volume_size(), 0);
        assert_eq!(instance.hostname(), None);
    }

    #[test]
    fn test_create_body() {
        let body = InstanceCreate {
            instance: InstanceCreateBody {
                flavor_ref: "1",
                volume: Volume { size: 5 },
                name: "db",
            },
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({"instance": {"flavorRef": "1", "volume": {"size": 5}, "name": "db"}})
        );
    }
}
