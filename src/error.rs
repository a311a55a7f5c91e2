use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    /// Spawn, expiry or timer parameters that can never be valid.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// The scene renderer refused to register, release or update a drawable.
    #[error("scene renderer unavailable: {0}")]
    RendererUnavailable(String),
}

impl Error {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub fn renderer_unavailable(message: impl Into<String>) -> Self {
        Self::RendererUnavailable(message.into())
    }
}
