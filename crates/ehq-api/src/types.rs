//! JSON:API payloads exchanged with the EHQ v2 API.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Body of `POST /api/v2/tokens`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthRequest {
    pub data: AuthData,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthData {
    pub attributes: AuthAttributes,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct AuthAttributes {
    pub login: String,
    pub password: String,
}

impl std::fmt::Debug for AuthAttributes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthAttributes")
            .field("login", &self.login)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl AuthRequest {
    pub fn new(login: &str, password: &str) -> Self {
        Self {
            data: AuthData {
                attributes: AuthAttributes {
                    login: login.to_string(),
                    password: password.to_string(),
                },
            },
        }
    }
}

/// Successful response of `POST /api/v2/tokens`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub data: AuthResponseData,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponseData {
    pub attributes: AuthResponseAttributes,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponseAttributes {
    pub token: String,
}

/// JSON:API list of projects returned by `GET /api/v2/projects`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectsResponse {
    #[serde(default)]
    pub data: Vec<Project>,
}

/// A single project resource object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub attributes: Map<String, Value>,
}

/// `null` attributes read as an empty object.
fn null_as_empty<'de, D>(deserializer: D) -> Result<Map<String, Value>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<Map<String, Value>>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Errors that can occur while talking to the EHQ API.
#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error("client not authenticated - call authenticate() first")]
    NotAuthenticated,

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("request failed with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to decode response: {0}")]
    Decode(String),
}

/// Convenience result type.
pub type ApiResult<T> = Result<T, ApiError>;
