use uuid::Uuid;

/// Failures surfaced by the inventory and scan services.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("store error: {0}")]
    Store(#[from] anyhow::Error),

    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: Uuid },

    #[error("invalid input: {0}")]
    Invalid(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;
