/// Convenience result type used across the boot animation engine.
pub type BootResult<T> = Result<T, BootError>;

/// Top-level error taxonomy used by engine APIs.
///
/// Compositor death is deliberately absent: it never unwinds through these types and is handled
/// by [`crate::session::compositor::AbortOnDeath`].
#[derive(thiserror::Error, Debug)]
pub enum BootError {
    /// Invalid manifest, geometry or caller-provided data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Malformed archive bytes or a missing archive entry.
    #[error("archive error: {0}")]
    Archive(String),

    /// Image bytes could not be decoded into a pixel buffer.
    #[error("decode error: {0}")]
    Decode(String),

    /// A log or input device failed with something other than would-block.
    #[error("device error: {0}")]
    Device(String),

    /// Surface or context failure. Fatal to the current run.
    #[error("surface error: {0}")]
    Surface(String),

    /// Configuration could not be loaded or parsed.
    #[error("config error: {0}")]
    Config(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl BootError {
    /// Build a [`BootError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`BootError::Archive`] value.
    pub fn archive(msg: impl Into<String>) -> Self {
        Self::Archive(msg.into())
    }

    /// Build a [`BootError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`BootError::Device`] value.
    pub fn device(msg: impl Into<String>) -> Self {
        Self::Device(msg.into())
    }

    /// Build a [`BootError::Surface`] value.
    pub fn surface(msg: impl Into<String>) -> Self {
        Self::Surface(msg.into())
    }

    /// Build a [`BootError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Return `true` for errors that end the current run rather than a single source or frame.
    pub fn is_fatal_to_run(&self) -> bool {
        matches!(self, Self::Surface(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
