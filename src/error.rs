use std::path::PathBuf;

pub type ScanimateResult<T> = Result<T, ScanimateError>;

#[derive(thiserror::Error, Debug)]
pub enum ScanimateError {
    #[error("{}: io error at '{}': {}", .stage, .path.display(), .source)]
    Io {
        stage: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}: image error at '{}': {}", .stage, .path.display(), .source)]
    Image {
        stage: &'static str,
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ScanimateError {
    pub fn io(stage: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            stage,
            path: path.into(),
            source,
        }
    }

    pub fn image(stage: &'static str, path: impl Into<PathBuf>, source: image::ImageError) -> Self {
        Self::Image {
            stage,
            path: path.into(),
            source,
        }
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}
