//! HTTP client for the EHQ v2 API.

use std::time::Duration;

use serde::de::DeserializeOwned;

use crate::types::{ApiError, ApiResult, AuthRequest, AuthResponse, ProjectsResponse};

/// Timeout applied to every upstream request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for one EHQ site. Holds the bearer token after [`EhqClient::authenticate`].
#[derive(Debug, Clone)]
pub struct EhqClient {
    base_url: String,
    http: reqwest::Client,
    token: Option<String>,
}

impl EhqClient {
    /// Create a client for the given site root. A trailing slash is ignored.
    pub fn new(base_url: &str) -> ApiResult<Self> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> ApiResult<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
            token: None,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Exchange login/password for a bearer token and keep it for later calls.
    pub async fn authenticate(&mut self, login: &str, password: &str) -> ApiResult<()> {
        let url = format!("{}/api/v2/tokens", self.base_url);
        tracing::debug!("Authenticating against {url} as {login}");

        let response = self
            .http
            .post(&url)
            .json(&AuthRequest::new(login, password))
            .send()
            .await?;

        let auth: AuthResponse = read_json(response).await?;
        self.token = Some(auth.data.attributes.token);

        tracing::info!("Authenticated with EHQ API at {}", self.base_url);
        Ok(())
    }

    /// List filterable projects, optionally narrowed by a search term.
    pub async fn projects(&self, search: Option<&str>) -> ApiResult<ProjectsResponse> {
        let token = self.token.as_deref().ok_or(ApiError::NotAuthenticated)?;
        let url = format!("{}/api/v2/projects", self.base_url);

        let mut request = self
            .http
            .get(&url)
            .bearer_auth(token)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .query(&[("filterable", "true")]);

        if let Some(term) = search.filter(|s| !s.is_empty()) {
            request = request.query(&[("filters[search]", term)]);
        }

        let projects: ProjectsResponse = read_json(request.send().await?).await?;
        tracing::debug!("Fetched {} projects", projects.data.len());
        Ok(projects)
    }
}

async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> ApiResult<T> {
    let status = response.status();
    let body = response.bytes().await?;

    if !status.is_success() {
        return Err(ApiError::Status {
            status: status.as_u16(),
            body: String::from_utf8_lossy(&body).into_owned(),
        });
    }

    serde_json::from_slice(&body).map_err(|e| ApiError::Decode(e.to_string()))
}
