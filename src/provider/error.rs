#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to read client registry: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed client registry: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("client {0:?} registered twice")]
    DuplicateClient(String),
}
