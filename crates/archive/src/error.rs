use thiserror::Error;
use timeline::TimelineError;

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error(transparent)]
    Timeline(#[from] TimelineError),

    #[error("invalid configuration: {0}")]
    Config(#[source] serde_json::Error),
}
