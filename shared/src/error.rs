//! Error types for the debt management table.

use aws_sdk_dynamodb::error::SdkError;
use lambda_http::http::StatusCode;
use thiserror::Error;

/// Result type alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur while composing keys, encoding records, or talking
/// to the table.
#[derive(Error, Debug)]
pub enum StoreError {
    /// An identifier was empty or contained the key separator, which would
    /// corrupt composite-key parsing on read.
    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),

    #[error("{kind} '{id}' not found")]
    NotFound { kind: &'static str, id: String },

    /// The resolved record belongs to a different owner. The message stays
    /// constant so the response never reveals who that owner is.
    #[error("access denied")]
    Forbidden,

    /// The table returned data violating the schema contract.
    #[error("malformed record: {0}")]
    MalformedRecord(String),

    #[error("{kind} '{id}' already exists")]
    AlreadyExists { kind: &'static str, id: String },

    #[error("AWS SDK error: {0}")]
    AwsSdk(String),
}

impl StoreError {
    /// HTTP status the error surfaces as.
    pub fn status_code(&self) -> StatusCode {
        match self {
            StoreError::InvalidIdentifier(_) => StatusCode::BAD_REQUEST,
            StoreError::NotFound { .. } => StatusCode::NOT_FOUND,
            StoreError::Forbidden => StatusCode::FORBIDDEN,
            StoreError::AlreadyExists { .. } => StatusCode::CONFLICT,
            StoreError::MalformedRecord(_) | StoreError::AwsSdk(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// True for faults that are the service's problem rather than the
    /// caller's; these get logged at error level before responding.
    pub fn is_server_fault(&self) -> bool {
        matches!(
            self,
            StoreError::MalformedRecord(_) | StoreError::AwsSdk(_)
        )
    }
}

impl<E, R> From<SdkError<E, R>> for StoreError
where
    E: std::fmt::Debug,
    R: std::fmt::Debug,
{
    fn from(err: SdkError<E, R>) -> Self {
        StoreError::AwsSdk(format!("{err:?}"))
    }
}
