use reqwest::StatusCode;
use reqwest_middleware::ClientBuilder;
use reqwest_tracing::TracingMiddleware;

use crate::api::{UserId, UserSummary};

#[derive(Debug, thiserror::Error)]
pub enum UserDirectoryError {
    #[error("User {0} not found")]
    NotFound(UserId),

    #[error("Other error {0}")]
    Other(String),
}

/// Resolves user ids to their minimal profile. The user service owns the
/// records; this side only reads them.
#[async_trait::async_trait]
pub trait UserDirectory: Send + Sync {
    async fn resolve_user(&self, user_id: UserId) -> Result<UserSummary, UserDirectoryError>;
}

pub struct HttpUserDirectory {
    user_directory_url: String,
}

impl HttpUserDirectory {
    pub fn new(user_directory_url: String) -> Self {
        Self { user_directory_url }
    }
}

#[async_trait::async_trait]
impl UserDirectory for HttpUserDirectory {
    async fn resolve_user(&self, user_id: UserId) -> Result<UserSummary, UserDirectoryError> {
        let reqwest_client = reqwest::Client::builder()
            .build()
            .map_err(|e| UserDirectoryError::Other(format!("Failed to build reqwest client: {}", e)))?;
        let client = ClientBuilder::new(reqwest_client)
            // Insert the tracing middleware
            .with(TracingMiddleware::default())
            .build();

        let response = client
            .get(format!("{}/api/user/{}", self.user_directory_url, user_id))
            .send()
            .await
            .map_err(|e| UserDirectoryError::Other(format!("Failed to get user by id: {}", e)))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(UserDirectoryError::NotFound(user_id));
        }
        if !response.status().is_success() {
            return Err(UserDirectoryError::Other(format!(
                "User directory returned {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| UserDirectoryError::Other(format!("Failed to parse user: {}", e)))
    }
}
