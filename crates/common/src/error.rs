use faststr::FastStr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    MsgError(FastStr),
    #[error("Reqwest error: {0}")]
    ReqwestError(#[from] reqwest::Error),
    #[error("Unexpected response status: {0}")]
    Status(u16),
    #[error("Failed to decode response body: {0}")]
    Decode(FastStr),
    #[error("Invalid url: {0}")]
    InvalidUrl(FastStr),
    #[error("Invalid scale: {0}")]
    InvalidScale(f64),
    #[error("Invalid config: {0}")]
    InvalidConfig(FastStr),
}

pub type Result<T> = std::result::Result<T, Error>;
