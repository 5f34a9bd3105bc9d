use thiserror::Error;

#[derive(Error, Debug)]
pub enum GameError {
    #[error("tile width must be a positive, finite number")]
    InvalidTileWidth,
    #[error("malformed momento: {0}")]
    MalformedMomento(#[from] serde_json::Error),
    #[error("momento format version {0} is not supported")]
    UnsupportedMomentoVersion(u32),
}

pub type Result<T> = std::result::Result<T, GameError>;
