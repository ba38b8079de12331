/// Errors from bitmap data access and copy operations.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum BitmapError {
    /// A pixel coordinate, raw byte extent or color index is out of range.
    #[error("{what} out of range: {index} (limit {limit})")]
    IndexOutOfRange {
        what: &'static str,
        index: usize,
        limit: usize,
    },

    /// The operation is not valid for the current state of the bitmap data
    /// (indexed-only call on non-indexed data, disposed data, etc.).
    #[error("invalid state: {0}")]
    InvalidState(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A quantizer or ditherer did not honor its session contract.
    #[error("external contract violation: {0}")]
    ExternalContractViolation(String),

    #[error("dimensions too large: {width}x{height}")]
    DimensionsTooLarge { width: usize, height: usize },

    #[error("limit exceeded: {0}")]
    LimitExceeded(String),

    #[error("buffer too small: need {needed} bytes, got {actual}")]
    BufferTooSmall { needed: usize, actual: usize },
}

impl BitmapError {
    pub(crate) fn out_of_range(what: &'static str, index: usize, limit: usize) -> Self {
        BitmapError::IndexOutOfRange { what, index, limit }
    }

    pub(crate) fn disposed() -> Self {
        BitmapError::InvalidState("bitmap data has been disposed".into())
    }
}
