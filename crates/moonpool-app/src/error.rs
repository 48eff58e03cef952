use thiserror::Error;

/// Application-level errors (HTTP layer)
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    DatabaseError(#[from] moonpool_db::error::DbError),

    #[error(transparent)]
    RfcError(#[from] moonpool_rfc::error::RfcError),

    #[error(transparent)]
    CoreError(#[from] moonpool_core::error::CoreError),
}

pub type AppResult<T> = std::result::Result<T, AppError>;
