use std::path::PathBuf;

/// Errors surfaced by loading, configuration and CLI input parsing.
///
/// Measurement itself never fails: missing dimensions or a zero display width
/// simply skip the computation.
#[derive(Debug, thiserror::Error)]
pub enum MeasureError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("not an image file: {}", .0.display())]
    NotAnImage(PathBuf),

    #[error("invalid point {0:?}, expected X,Y")]
    InvalidPoint(String),

    #[error("image has zero width or height")]
    ZeroDimensions,

    #[error("background task failed: {0}")]
    Task(String),
}

pub type MeasureResult<T> = Result<T, MeasureError>;
