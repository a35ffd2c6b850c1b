use thiserror::Error;

/// Refusals and load failures of the timeline model.
///
/// Navigation refusals (`EmptyLevel`, `UnknownChild`, `UnknownLevel`,
/// `NothingDisplayed`) are expected during normal use: the operation leaves
/// all state untouched and callers usually just log them.
#[derive(Debug, Error)]
pub enum TimelineError {
    #[error("current level has no items")]
    EmptyLevel,

    #[error("displayed node has no child `{id}`")]
    UnknownChild { id: String },

    #[error("breadcrumb level {index} is deeper than current depth {depth}")]
    UnknownLevel { index: usize, depth: usize },

    #[error("no node is displayed")]
    NothingDisplayed,

    #[error("displayed node has no event #{index}")]
    UnknownEvent { index: usize },

    #[error("invalid dataset: {0}")]
    InvalidDataset(String),

    #[error("dataset parse error: {0}")]
    Parse(#[from] serde_json::Error),
}
