use catalog_core::error::CoreError;

/// Error returned by repository operations that enforce domain rules inside a
/// transaction (ownership checks, reparent validation) as well as hitting the
/// database.
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}
