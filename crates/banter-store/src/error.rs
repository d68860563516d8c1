use thiserror::Error;

/// Failures at the persistence seam.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A cursor or record id did not resolve to an existing record.
    #[error("record not found")]
    NotFound,

    /// A uniqueness constraint rejected the write, e.g. a concurrent
    /// duplicate account creation.
    #[error("record already exists")]
    Conflict,

    /// The backing store failed or the write could not be confirmed.
    #[error("persistence failure: {0}")]
    Persistence(String),
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(e, _)
                if e.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                StoreError::Conflict
            }
            rusqlite::Error::QueryReturnedNoRows => StoreError::NotFound,
            _ => StoreError::Persistence(err.to_string()),
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::Persistence(err.to_string())
    }
}
