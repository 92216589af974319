use thiserror::Error;

/// Errors raised by matrix algebra, layer propagation, training and the
/// persistence helpers.
#[derive(Error, Debug)]
pub enum Error {
    #[error("{op}: incompatible dimensions {left:?} and {right:?}")]
    DimensionMismatch {
        op: &'static str,
        left: (usize, usize),
        right: (usize, usize),
    },

    #[error("layer has not been forward propagated yet")]
    NotPropagated,

    #[error("no loss function configured; call `use_loss` before `fit`")]
    NoLossConfigured,

    #[error("matrix row {row} has {found} columns, expected {expected}")]
    RaggedRows {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("matrix must have at least one row and one column")]
    EmptyMatrix,

    #[error("got {inputs} training inputs but {labels} labels")]
    SampleCountMismatch { inputs: usize, labels: usize },

    #[error("training set is empty")]
    EmptyTrainingSet,

    #[error("invalid topology: {0}")]
    Topology(String),

    #[error("training worker panicked")]
    WorkerPanicked,

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Image(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, Error>;
