use crate::api::SalesApiError;

#[derive(Debug, thiserror::Error)]
pub enum SalesError {
    #[error(transparent)]
    Api(#[from] SalesApiError),

    /// A newer request superseded this one; its result was discarded.
    #[error("Sales request superseded by a newer request")]
    Cancelled,

    #[error("Invalid sales configuration: {0}")]
    InvalidConfig(String),
}

impl SalesError {
    /// HTTP status for remote failures, shown alongside the message.
    pub fn status(&self) -> Option<u16> {
        match self {
            SalesError::Api(SalesApiError::ApiError { status, .. }) => Some(*status),
            _ => None,
        }
    }
}
