use crate::{
    apis::{id_string, path_segment},
    client::OpenStackClient,
    error::OpenStackResult,
    models::Flavor,
};
use log::{debug, info};
use reqwest::Method;
use serde::Deserialize;
use serde_json::Value;

/// Flavor as it appears on the wire
#[derive(Debug, Deserialize)]
struct FlavorWire {
    id: Value,
    #[serde(default)]
    name: String,
    #[serde(default)]
    ram: u32,
}

#[derive(Deserialize)]
struct FlavorList {
    flavors: Vec<FlavorWire>,
}

#[derive(Deserialize)]
struct FlavorEnvelope {
    flavor: FlavorWire,
}

impl From<FlavorWire> for Flavor {
    fn from(wire: FlavorWire) -> Self {
        Flavor::builder()
            .id(id_string(wire.id))
            .name(wire.name)
            .ram(wire.ram)
            .build()
    }
}

/// RedDwarf flavor operations
pub struct FlavorApi<'a> {
    client: &'a OpenStackClient,
}

impl<'a> FlavorApi<'a> {
    pub fn new(client: &'a OpenStackClient) -> Self {
        Self { client }
    }

    /// List available database flavors
    pub async fn list(&self) -> OpenStackResult<Vec<Flavor>> {
        info!("Listing flavors");
        let req = self.client.request(Method::GET, "flavors").await?;
        let list: FlavorList = self.client.execute(req).await?;
        debug!("{} flavors", list.flavors.len());
        Ok(list.flavors.into_iter().map(Flavor::from).collect())
    }

    /// Get a flavor, or `None` if it does not exist
    ///
    /// # Arguments
    /// * `id` - Flavor id
    pub async fn get(&self, id: &str) -> OpenStackResult<Option<Flavor>> {
        let path = format!("flavors/{}", path_segment("flavor", id)?);
        info!("Getting flavor: {}", id);
        let req = self.client.request(Method::GET, &path).await?;
        let envelope: Option<FlavorEnvelope> = self.client.execute_optional(req).await?;
        Ok(envelope.map(|e| Flavor::from(e.flavor)))
    }
}
