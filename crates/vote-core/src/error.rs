use thiserror::Error;

/// Core errors for the vote store.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("DynamoDB SDK error: {0}")]
    DynamoSdk(Box<dyn std::error::Error + Send + Sync>),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_dynamo::Error),

    #[error("Toggle conflict on {0}")]
    Conflict(String),
}
