use thiserror::Error;

#[derive(Debug, Error)]
pub enum BoardError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid config {path}: {source}")]
    Config {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("unknown lane: {0} (expected to-do, in-progress or done)")]
    UnknownLane(String),

    #[error("could not determine {0} directory")]
    NoDataDir(&'static str),
}

pub type Result<T> = std::result::Result<T, BoardError>;
