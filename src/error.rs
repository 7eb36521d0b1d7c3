use thiserror::Error;

/// Errors surfaced by the network, the label encoder and the IDX reader.
///
/// None of these are retried internally: gradient descent has no retry
/// semantics, so every failure aborts the current operation.
#[derive(Debug, Error)]
pub enum Error {
    #[error("shape mismatch in {op}: expected {expected}, found {found}")]
    ShapeMismatch {
        op: &'static str,
        expected: String,
        found: String,
    },

    #[error("empty input: {0}")]
    EmptyInput(&'static str),

    #[error("invalid architecture: {0}")]
    InvalidArchitecture(String),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("label {label} at index {index} is out of range for {n_classes} classes")]
    LabelOutOfRange {
        index: usize,
        label: usize,
        n_classes: usize,
    },

    #[error("cost became non-finite ({cost}) at iteration {iteration}")]
    NonFiniteCost { iteration: usize, cost: f64 },

    #[error("malformed IDX data: {0}")]
    Idx(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn shape(op: &'static str, expected: impl Into<String>, found: impl Into<String>) -> Error {
        Error::ShapeMismatch {
            op,
            expected: expected.into(),
            found: found.into(),
        }
    }
}
