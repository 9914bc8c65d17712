use crate::{
    apis::{AccountApi, ContainerApi, FlavorApi, InstanceApi},
    auth::{Authentication, KeystoneAuth},
    config::ApiConfig,
    error::{OpenStackError, OpenStackResult},
    models::ErrorResponse,
};
use log::{debug, info};
use reqwest::header::HeaderMap;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use std::sync::Arc;
use url::Url;

/// Client bound to one OpenStack service endpoint
#[derive(Clone)]
pub struct OpenStackClient {
    client: Client,
    base_url: Url,
    auth: Arc<dyn Authentication>,
}

impl OpenStackClient {
    /// Create a new client for a known service endpoint
    pub fn new(
        endpoint: impl AsRef<str>,
        auth: impl Authentication + 'static,
    ) -> OpenStackResult<Self> {
        Self::with_client(default_http_client()?, endpoint, auth)
    }

    /// Create a new client with custom reqwest client
    pub fn with_client(
        client: Client,
        endpoint: impl AsRef<str>,
        auth: impl Authentication + 'static,
    ) -> OpenStackResult<Self> {
        Ok(Self {
            client,
            base_url: base_url(endpoint.as_ref())?,
            auth: Arc::new(auth),
        })
    }

    /// Authenticate against Keystone and bind to the endpoint the service catalog
    /// lists for the configured service type and region
    pub async fn connect(config: &ApiConfig) -> OpenStackResult<Self> {
        let client = default_http_client()?;
        let auth = KeystoneAuth::new(client.clone(), config)?;
        let access = auth.access().await?;

        let service_type = config.service_type();
        let endpoint = access.endpoint(service_type, config.region())?.to_string();
        info!(
            "Connected {} to {} endpoint {}",
            config.provider.id, service_type, endpoint
        );

        Self::with_client(client, endpoint, auth)
    }

    /// Get the base URL
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Get Swift Account API
    pub fn accounts(&self) -> AccountApi<'_> {
        AccountApi::new(self)
    }

    /// Get Swift Container API
    pub fn containers(&self) -> ContainerApi<'_> {
        ContainerApi::new(self)
    }

    /// Get RedDwarf Flavor API
    pub fn flavors(&self) -> FlavorApi<'_> {
        FlavorApi::new(self)
    }

    /// Get RedDwarf Instance API
    pub fn instances(&self) -> InstanceApi<'_> {
        InstanceApi::new(self)
    }

    /// Build a request to the given path, relative to the endpoint, with authentication
    pub async fn request(
        &self,
        method: reqwest::Method,
        path: &str,
    ) -> OpenStackResult<RequestBuilder> {
        let url = self.base_url.join(path.trim_start_matches('/'))?;
        debug!("HTTP {} {}", method, url);
        let mut request = self.client.request(method, url);

        let mut headers = HeaderMap::new();
        self.auth.apply_auth(&mut headers).await?;
        request = request.headers(headers);

        Ok(request)
    }

    /// Execute a request and deserialize the JSON body
    pub async fn execute<T>(&self, request: RequestBuilder) -> OpenStackResult<T>
    where
        T: for<'de> Deserialize<'de>,
    {
        let response = request.send().await?;
        self.handle_response(response).await
    }

    /// Execute a request, treating 404 as absence
    pub async fn execute_optional<T>(&self, request: RequestBuilder) -> OpenStackResult<Option<T>>
    where
        T: for<'de> Deserialize<'de>,
    {
        let response = request.send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        self.handle_response(response).await.map(Some)
    }

    /// Execute a request and return the body as text
    pub async fn execute_text(&self, request: RequestBuilder) -> OpenStackResult<String> {
        let response = request.send().await?;

        if response.status().is_success() {
            Ok(response.text().await?)
        } else {
            Err(error_from_response(response).await)
        }
    }

    /// Execute a request and return the response headers
    pub async fn execute_headers(&self, request: RequestBuilder) -> OpenStackResult<HeaderMap> {
        let response = request.send().await?;
        let status = response.status();

        if status.is_success() {
            Ok(response.headers().clone())
        } else {
            Err(error_from_response(response).await)
        }
    }

    /// Execute a request and return its status; `accepted` lists non-2xx codes that are not errors
    pub async fn execute_status(
        &self,
        request: RequestBuilder,
        accepted: &[StatusCode],
    ) -> OpenStackResult<StatusCode> {
        let response = request.send().await?;
        let status = response.status();

        if status.is_success() || accepted.contains(&status) {
            Ok(status)
        } else {
            Err(error_from_response(response).await)
        }
    }

    /// Handle response and deserialize JSON
    async fn handle_response<T>(&self, response: Response) -> OpenStackResult<T>
    where
        T: for<'de> Deserialize<'de>,
    {
        if response.status().is_success() {
            let json = response.json::<T>().await?;
            Ok(json)
        } else {
            Err(error_from_response(response).await)
        }
    }
}

fn default_http_client() -> OpenStackResult<Client> {
    let client = Client::builder()
        .user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ))
        .build()?;
    Ok(client)
}

/// Parse an endpoint so that relative joins extend its path instead of replacing the last segment
pub(crate) fn base_url(endpoint: &str) -> OpenStackResult<Url> {
    let mut url = Url::parse(endpoint)?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// Turn an unsuccessful response into the matching error
pub(crate) async fn error_from_response(response: Response) -> OpenStackError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();

    let error_message = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|json| ErrorResponse::from_body(&json))
        .and_then(|error| error.message)
        .or_else(|| {
            let text = body.trim();
            (!text.is_empty()).then(|| text.to_string())
        })
        .unwrap_or_else(|| format!("HTTP {}", status));

    debug!("HTTP {} error: {}", status, error_message);

    match status {
        StatusCode::UNAUTHORIZED => OpenStackError::auth_error(error_message),
        StatusCode::FORBIDDEN => OpenStackError::PermissionDenied(error_message),
        StatusCode::NOT_FOUND => OpenStackError::NotFound(error_message),
        StatusCode::BAD_REQUEST => OpenStackError::invalid_param(error_message),
        _ => OpenStackError::api_error(status.as_u16(), error_message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::NoAuth;

    #[test]
    fn test_base_url_keeps_path() {
        let url = base_url("http://swift:8080/v1/AUTH_demo").unwrap();
        assert_eq!(url.as_str(), "http://swift:8080/v1/AUTH_demo/");
        assert_eq!(
            url.join("photos").unwrap().as_str(),
            "http://swift:8080/v1/AUTH_demo/photos"
        );

        let already = base_url("http://keystone:5000/v2.0/").unwrap();
        assert_eq!(already.join("tokens").unwrap().as_str(), "http://keystone:5000/v2.0/tokens");
    }

    #[test]
    fn test_invalid_endpoint() {
        assert!(matches!(
            OpenStackClient::new("not a url", NoAuth),
            Err(OpenStackError::Url(_))
        ));
    }
}
