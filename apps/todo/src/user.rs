//! Remote user lookup.
//!
//! The reducer only sees the [`UserDirectory`] trait; the binary wires in
//! [`HttpUserDirectory`], tests wire in a mock server or a stub.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a user lookup failed
///
/// Clone so it can sit in state next to the value it replaces.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserFetchError {
    /// The request never produced a response
    #[error("User request failed: {0}")]
    RequestFailed(String),

    /// The server answered with a non-success status
    #[error("User service returned {status}")]
    UnexpectedStatus {
        /// HTTP status code
        status: u16,
    },

    /// The body was not a user record
    #[error("Failed to decode user record: {0}")]
    DecodeFailed(String),
}

/// Source of user display names
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Display name of user `id`
    ///
    /// # Errors
    ///
    /// Returns a [`UserFetchError`] if the user could not be read.
    async fn fetch_user_name(&self, id: u64) -> Result<String, UserFetchError>;
}

/// Wire shape of `GET /users/{id}`; extra fields are ignored
#[derive(Debug, Deserialize)]
struct UserRecord {
    name: String,
}

/// [`UserDirectory`] over plain HTTP
#[derive(Clone, Debug)]
pub struct HttpUserDirectory {
    client: Client,
    base_url: String,
}

impl HttpUserDirectory {
    /// Creates a directory rooted at `base_url` (no trailing slash needed)
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Base URL requests are sent to
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl UserDirectory for HttpUserDirectory {
    #[tracing::instrument(skip(self), fields(base_url = %self.base_url))]
    async fn fetch_user_name(&self, id: u64) -> Result<String, UserFetchError> {
        let response = self
            .client
            .get(format!("{}/users/{id}", self.base_url))
            .send()
            .await
            .map_err(|e| UserFetchError::RequestFailed(e.to_string()))?;

        match response.status() {
            StatusCode::OK => {
                let record = response.json::<UserRecord>().await.map_err(|e| {
                    if e.is_decode() {
                        UserFetchError::DecodeFailed(e.to_string())
                    } else {
                        UserFetchError::RequestFailed(e.to_string())
                    }
                })?;
                Ok(record.name)
            },
            status => Err(UserFetchError::UnexpectedStatus {
                status: status.as_u16(),
            }),
        }
    }
}
