/// Result alias that carries the custom [`LeafError`] type.
pub type Result<T> = std::result::Result<T, LeafError>;

/// Common error type for the core crate.
#[derive(Debug, thiserror::Error)]
pub enum LeafError {
    /// The layout snapshot was empty, inconsistent or contained duplicate
    /// panel ids.
    #[error("invalid layout: {0}")]
    InvalidLayout(String),
    /// An event matched none of the configured categories. The category set
    /// is missing its catch-all entry.
    #[error("event #{index} matched no category; the category set needs a catch-all")]
    UnclassifiedEvent { index: usize },
    /// The rounding pass produced a state that should be impossible.
    #[error("allocation invariant violated: {0}")]
    AllocationInvariant(String),
    /// More categories need a panel than the layout has panels.
    #[error("{categories} categories need at least one panel but only {panels} are available")]
    OverAllocation { categories: usize, panels: usize },
    /// The allocation was computed for a different layout.
    #[error("allocation covers {allocated} panels but the layout has {layout}")]
    LayoutSizeMismatch { allocated: usize, layout: usize },
    /// Configuration values that could not be applied.
    #[error("invalid configuration: {0}")]
    Config(String),
    /// Free-form message for conditions outside the taxonomy above.
    #[error("{0}")]
    Message(String),
    /// Wrapper around standard IO errors.
    #[error("{0}")]
    Io(#[from] std::io::Error),
    /// Wrapper around JSON decoding errors.
    #[error("{0}")]
    Json(#[from] serde_json::Error),
}

impl LeafError {
    /// Creates a new error that simply wraps the provided message.
    pub fn msg<T: Into<String>>(msg: T) -> Self {
        Self::Message(msg.into())
    }

    /// Whether the caller can reasonably carry on, for example by merging
    /// categories or dropping the batch.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::OverAllocation { .. })
    }
}

impl From<&str> for LeafError {
    fn from(value: &str) -> Self {
        Self::msg(value)
    }
}

impl From<String> for LeafError {
    fn from(value: String) -> Self {
        Self::Message(value)
    }
}
