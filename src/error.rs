/// Errors surfaced by configuration parsing and the export helpers.
///
/// The samplers themselves are total and never return these.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("unknown resolution `{0}`")]
    UnknownResolution(String),
    #[error("unknown color scheme `{0}`")]
    UnknownScheme(String),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("encode error: {0}")]
    Encode(#[from] bincode::error::EncodeError),
    #[error("decode error: {0}")]
    Decode(#[from] bincode::error::DecodeError),
    #[error("raster is empty ({width}x{height})")]
    EmptyRaster { width: u32, height: u32 },
    #[error("raster buffer holds {actual} bytes, expected {expected}")]
    BufferSize { expected: usize, actual: usize },
}

pub type EngineResult<T> = Result<T, EngineError>;
