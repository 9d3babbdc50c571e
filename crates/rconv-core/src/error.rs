//! Error types for the convolution layer
//!
//! Provides error handling for grid storage, layer stages and matrix I/O

/// rconv-core errors
#[derive(thiserror::Error, Debug)]
pub enum ConvError {
    /// Checked access outside of `0..size`
    #[error("index ({row}, {col}) out of bounds for {size}x{size} grid")]
    OutOfBounds { row: usize, col: usize, size: usize },

    /// Bounded grid requested beyond its fixed capacity
    #[error("grid size {requested} exceeds bounded capacity {capacity}")]
    CapacityExceeded { requested: usize, capacity: usize },

    /// Stage inputs whose shapes cannot produce a valid output
    #[error("invalid dimensions in {stage}: {detail}")]
    InvalidDimensions { stage: &'static str, detail: String },

    /// Kernels of a single run disagree on their size
    #[error("kernel #{index} has size {actual}, expected {expected}")]
    KernelSizeMismatch { index: usize, expected: usize, actual: usize },

    /// Pipeline invoked without any kernel
    #[error("no kernels given")]
    NoKernels,

    /// Malformed size-prefixed matrix text
    #[error("malformed matrix (token {token}): {reason}")]
    MatrixFormat { token: usize, reason: String },

    /// File I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ConvError {
    pub(crate) fn invalid(stage: &'static str, detail: impl Into<String>) -> Self {
        Self::InvalidDimensions { stage, detail: detail.into() }
    }
}

/// Result type for rconv-core operations
pub type ConvResult<T> = Result<T, ConvError>;
