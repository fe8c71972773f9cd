use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::ClientError;

/// A toggle response from the service: the caller's new voted state and the
/// project's new tally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ToggleReply {
    pub voted: bool,
    pub count: u64,
}

/// A tally response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TallyReply {
    pub project_id: String,
    pub count: u64,
}

/// The two vote service operations the client drives.
#[async_trait]
pub trait VoteTransport: Send + Sync {
    /// POST /vote for one (project, user) pair.
    async fn toggle(&self, project: &str, user: &str) -> Result<ToggleReply, ClientError>;

    /// GET /vote/{projectId}.
    async fn tally(&self, project: &str) -> Result<TallyReply, ClientError>;
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ToggleRequest<'a> {
    project_id: &'a str,
    user_id: &'a str,
}

/// Error body shape shared by all service errors.
#[derive(Deserialize)]
struct ErrorReply {
    error: String,
}

/// reqwest-backed transport speaking the service's JSON wire contract.
#[derive(Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    /// Create a new transport against `base_url` (scheme and host, no
    /// trailing slash required).
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn decode<T>(resp: reqwest::Response) -> Result<T, ClientError>
    where
        T: serde::de::DeserializeOwned,
    {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp.json().await?);
        }

        let message = resp
            .json::<ErrorReply>()
            .await
            .map(|reply| reply.error)
            .unwrap_or_else(|_| {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string()
            });

        Err(ClientError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl VoteTransport for HttpTransport {
    async fn toggle(&self, project: &str, user: &str) -> Result<ToggleReply, ClientError> {
        let url = format!("{}/vote", self.base_url);
        let body = ToggleRequest {
            project_id: project,
            user_id: user,
        };

        let resp = self.http.post(&url).json(&body).send().await?;
        Self::decode(resp).await
    }

    async fn tally(&self, project: &str) -> Result<TallyReply, ClientError> {
        let url = format!("{}/vote/{}", self.base_url, project);
        let resp = self.http.get(&url).send().await?;
        Self::decode(resp).await
    }
}
