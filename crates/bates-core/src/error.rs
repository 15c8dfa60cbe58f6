use thiserror::Error;

#[derive(Error, Debug)]
pub enum PreviewError {
    #[error("Unsupported input: {0}")]
    UnsupportedInput(String),

    #[error("Archive contains no supported documents")]
    EmptyArchive,

    #[error("Could not decode input: {0}")]
    DecodeFailure(String),

    #[error("Page {page} failed to render: {message}")]
    RenderFailure { page: usize, message: String },

    #[error("No stamped output is available for indexing")]
    MissingUpstreamArtifact,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<image::ImageError> for PreviewError {
    fn from(err: image::ImageError) -> Self {
        PreviewError::DecodeFailure(format!("image: {err}"))
    }
}

impl From<zip::result::ZipError> for PreviewError {
    fn from(err: zip::result::ZipError) -> Self {
        PreviewError::DecodeFailure(format!("archive: {err}"))
    }
}

impl From<lopdf::Error> for PreviewError {
    fn from(err: lopdf::Error) -> Self {
        PreviewError::DecodeFailure(format!("pdf: {err}"))
    }
}

impl From<toml::de::Error> for PreviewError {
    fn from(err: toml::de::Error) -> Self {
        PreviewError::InvalidConfig(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PreviewError>;
