use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    /// The container could not hand out a drawing surface
    #[error("initialization failed: {0}")]
    Initialization(String),

    #[error("failed to encode frame: {0}")]
    Image(#[from] image::ImageError),

    #[error("graphics device unavailable: {0}")]
    Device(String),
}

pub type Result<T> = std::result::Result<T, RenderError>;
