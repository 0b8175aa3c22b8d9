#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("RequestBuilderError: {0}")]
    RequestBuilderError(String),
    #[error("ClientError: {0}")]
    ClientError(#[from] crate::llms::api::error::ClientError),
    #[error("ResponseContentEmpty: response had no content")]
    ResponseContentEmpty,
}

impl GenerationError {
    /// True when the underlying failure is the API's rate or quota ceiling.
    pub fn is_throttle(&self) -> bool {
        match self {
            GenerationError::ClientError(e) => e.is_throttle(),
            _ => false,
        }
    }
}
