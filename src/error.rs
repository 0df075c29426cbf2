use std::path::PathBuf;


#[derive(thiserror::Error, Debug)]
pub enum HeatmapError {
    #[error("Request to {url} failed")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Payload is not a topography table: {0}")]
    Format(String),

    #[error("Samples do not form a grid: {0}")]
    InvalidGrid(String),

    #[error("I/O on {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl HeatmapError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        HeatmapError::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<serde_json::Error> for HeatmapError {
    fn from(e: serde_json::Error) -> Self {
        HeatmapError::Format(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, HeatmapError>;
