use r2d2::Error as PoolError;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use thiserror::Error;
use tokio::task::JoinError;

#[derive(Error, Debug)]
pub enum TrainingError {
    #[error("Missing or invalid caller identity")]
    Unauthenticated,
    #[error("Forbidden: {0}")]
    Forbidden(&'static str),
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Database error")]
    DatabaseError(DieselError),
    /// A stored row that cannot be decoded.
    #[error("Corrupt stored data: {0}")]
    CorruptData(String),
    #[error("Connection pool error")]
    PoolError(PoolError),
    #[error("Background task failed: {0}")]
    TaskFailed(String),
}

pub type Result<T> = std::result::Result<T, TrainingError>;

impl TrainingError {
    pub fn not_owner() -> Self {
        TrainingError::Forbidden("only the training owner can do this")
    }
}

impl From<DieselError> for TrainingError {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
                TrainingError::Conflict(info.message().to_string())
            }
            other => TrainingError::DatabaseError(other),
        }
    }
}

impl From<PoolError> for TrainingError {
    fn from(err: PoolError) -> Self {
        TrainingError::PoolError(err)
    }
}

impl From<JoinError> for TrainingError {
    fn from(err: JoinError) -> Self {
        TrainingError::TaskFailed(err.to_string())
    }
}

impl From<validator::ValidationErrors> for TrainingError {
    fn from(err: validator::ValidationErrors) -> Self {
        TrainingError::InvalidRequest(err.to_string())
    }
}
