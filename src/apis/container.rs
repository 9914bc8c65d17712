use crate::{
    apis::{numeric_header, path_segment},
    client::OpenStackClient,
    error::{OpenStackError, OpenStackResult},
    models::Container,
};
use log::{debug, info};
use reqwest::{Method, StatusCode};

pub const CONTAINER_OBJECT_COUNT: &str = "X-Container-Object-Count";
pub const CONTAINER_BYTES_USED: &str = "X-Container-Bytes-Used";

/// Swift container operations
pub struct ContainerApi<'a> {
    client: &'a OpenStackClient,
}

impl<'a> ContainerApi<'a> {
    pub fn new(client: &'a OpenStackClient) -> Self {
        Self { client }
    }

    /// List containers in the account
    pub async fn list(&self) -> OpenStackResult<Vec<Container>> {
        info!("Listing containers");
        let req = self
            .client
            .request(Method::GET, "")
            .await?
            .query(&[("format", "json")]);

        // An empty account answers 204 with no body.
        let body = self.client.execute_text(req).await?;
        if body.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&body)?)
    }

    /// Get container usage, or `None` if the container does not exist
    ///
    /// # Arguments
    /// * `name` - Container name
    pub async fn get(&self, name: &str) -> OpenStackResult<Option<Container>> {
        let path = container_path(name)?;
        info!("Getting container: {}", name);
        let req = self.client.request(Method::HEAD, &path).await?;

        let headers = match self.client.execute_headers(req).await {
            Ok(headers) => headers,
            Err(OpenStackError::NotFound(_)) => return Ok(None),
            Err(e) => return Err(e),
        };

        let container = Container::builder()
            .name(name)
            .object_count(numeric_header(&headers, CONTAINER_OBJECT_COUNT)?)
            .bytes_used(numeric_header(&headers, CONTAINER_BYTES_USED)?)
            .build();
        debug!("Container: {}", container);
        Ok(Some(container))
    }

    /// Create a container
    ///
    /// Returns `true` if the container was created, `false` if it already existed
    pub async fn create(&self, name: &str) -> OpenStackResult<bool> {
        let path = container_path(name)?;
        info!("Creating container: {}", name);
        let req = self.client.request(Method::PUT, &path).await?;
        let status = self.client.execute_status(req, &[]).await?;
        Ok(status == StatusCode::CREATED)
    }

    /// Delete a container if it holds no objects
    ///
    /// Returns `true` if deleted, `false` if it did not exist or was not empty
    pub async fn delete_if_empty(&self, name: &str) -> OpenStackResult<bool> {
        let path = container_path(name)?;
        info!("Deleting container: {}", name);
        let req = self.client.request(Method::DELETE, &path).await?;
        let status = self
            .client
            .execute_status(req, &[StatusCode::NOT_FOUND, StatusCode::CONFLICT])
            .await?;
        debug!("Delete {} answered {}", name, status);
        Ok(status.is_success())
    }
}

fn container_path(name: &str) -> OpenStackResult<String> {
    path_segment("container", name)
}
