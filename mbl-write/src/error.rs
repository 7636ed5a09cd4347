use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Substitution {index} has an empty search string")]
    EmptySubstitution { index: usize },
    #[error("Failed to write output \"{path}\"")]
    FailedToWriteOutput {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to create output directory \"{path}\"")]
    FailedToCreateDirectory {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to read generator outputs")]
    Json(#[from] serde_json::Error),
    #[error("I/O error")]
    IoError(#[from] std::io::Error),
}
