//! Scene error types.

/// Errors surfaced by scene construction and the per-frame loop.
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    /// The render backend failed to upload a resource or draw a frame.
    #[error("render backend failed: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// A body name matched none of the eight planets.
    #[error("unknown body `{0}`")]
    UnknownBody(String),
}

impl SceneError {
    pub fn backend<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        SceneError::Backend(Box::new(err))
    }

    /// The backend error, if it is of type `E`.
    pub fn backend_error<E>(&self) -> Option<&E>
    where
        E: std::error::Error + 'static,
    {
        match self {
            SceneError::Backend(source) => source.downcast_ref::<E>(),
            SceneError::UnknownBody(_) => None,
        }
    }
}
