use thiserror::Error;

pub type ChartResult<T> = Result<T, ChartError>;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("invalid viewport size: width={width}, height={height}")]
    InvalidViewport { width: u32, height: u32 },

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("unknown series `{0}`; register it with `add_series` first")]
    UnknownSeries(String),

    #[error("unknown theme `{name}`; available: {available}")]
    UnknownTheme { name: String, available: String },

    #[error("no compatible video encoder found (tried: {})", tried.join(", "))]
    NoVideoEncoder { tried: Vec<String> },

    #[error("renderer `{0}` does not produce a raster canvas")]
    NoRasterCanvas(&'static str),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image encoding error: {0}")]
    Image(#[from] image::ImageError),
}
