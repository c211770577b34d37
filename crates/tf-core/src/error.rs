/// Alias for `Result<T, CoreError>`.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur when loading story content.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// The project JSON could not be parsed.
    #[error("invalid project file: {0}")]
    InvalidProject(#[from] serde_json::Error),
}
