use crate::config::ApiSettings;
use crate::error::AppError;
use access_core::Component;
use reqwest::{Client, Method, RequestBuilder, Response, Url};
use serde_json::Value;
use std::time::Duration;

/// Client for the remote accounts REST API.
///
/// The API is the real authorization boundary; this client forwards the
/// caller's access token as a bearer token on every request.
pub struct AccountsClient {
    client: Client,
    base_url: Url,
}

impl AccountsClient {
    pub fn new(settings: ApiSettings) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build HTTP client: {}", e))?;

        let base_url = Url::parse(&settings.base_url)
            .map_err(|e| anyhow::anyhow!("Invalid accounts API base URL: {}", e))?;
        if base_url.cannot_be_a_base() {
            anyhow::bail!("Accounts API base URL cannot carry a path: {}", base_url);
        }

        Ok(Self { client, base_url })
    }

    /// List the records behind a unit.
    pub async fn list(
        &self,
        component: Component,
        access_token: Option<&str>,
    ) -> Result<Value, AppError> {
        let request = self.request(Method::GET, self.url(component, None)?, access_token);
        read_json(send(request).await?).await
    }

    pub async fn create(
        &self,
        component: Component,
        body: &Value,
        access_token: Option<&str>,
    ) -> Result<Value, AppError> {
        let request = self
            .request(Method::POST, self.url(component, None)?, access_token)
            .json(body);
        read_json(send(request).await?).await
    }

    pub async fn update(
        &self,
        component: Component,
        id: &str,
        body: &Value,
        access_token: Option<&str>,
    ) -> Result<Value, AppError> {
        let url = self.url(component, Some(id))?;
        let request = self.request(Method::PUT, url, access_token).json(body);
        read_json(send(request).await?).await
    }

    pub async fn delete(
        &self,
        component: Component,
        id: &str,
        access_token: Option<&str>,
    ) -> Result<(), AppError> {
        let url = self.url(component, Some(id))?;
        send(self.request(Method::DELETE, url, access_token)).await?;
        Ok(())
    }

    /// Collection URL for a unit, or the URL of one record in it. The record
    /// id always lands in a single path segment, percent-encoded as needed.
    fn url(&self, component: Component, id: Option<&str>) -> Result<Url, AppError> {
        if let Some(id) = id {
            let dots = id.to_ascii_lowercase().replace("%2e", ".");
            if matches!(dots.as_str(), "" | "." | "..") {
                return Err(AppError::NotFound(anyhow::anyhow!(
                    "Invalid record id: {:?}",
                    id
                )));
            }
        }

        let mut url = self.base_url.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                AppError::Internal(anyhow::anyhow!(
                    "Accounts API base URL cannot carry a path: {}",
                    self.base_url
                ))
            })?;
            segments
                .pop_if_empty()
                .extend(component.api_path().split('/').filter(|s| !s.is_empty()));
            if let Some(id) = id {
                segments.push(id);
            }
        }

        Ok(url)
    }

    fn request(&self, method: Method, url: Url, access_token: Option<&str>) -> RequestBuilder {
        let request = self.client.request(method, url);
        match access_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

async fn send(request: RequestBuilder) -> Result<Response, AppError> {
    let response = request.send().await.map_err(|e| {
        tracing::error!("Failed to reach accounts API: {}", e);
        AppError::from(e)
    })?;

    let status = response.status();
    if !status.is_success() {
        tracing::warn!(
            status = status.as_u16(),
            url = %response.url(),
            "Accounts API returned an error"
        );
        return Err(AppError::BadGateway(format!(
            "Accounts API responded with {}",
            status
        )));
    }

    Ok(response)
}

/// Empty bodies read as `null`.
async fn read_json(response: Response) -> Result<Value, AppError> {
    let bytes = response.bytes().await?;
    if bytes.is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_slice(&bytes)
        .map_err(|e| AppError::BadGateway(format!("Invalid JSON from accounts API: {}", e)))
}
