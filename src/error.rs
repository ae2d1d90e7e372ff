//! Error type shared by both detection pipelines.

/// Errors reported by the Hough pipelines.
///
/// Every variant except [`HoughError::AllocationFailed`] and
/// [`HoughError::ThreadPool`] is produced by parameter validation, which runs
/// before any histogram is allocated. An image without features is not an
/// error: the pipelines return an empty `Vec` instead.
#[derive(Debug, thiserror::Error)]
pub enum HoughError {
    /// A numeric parameter is outside its admissible range.
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter {
        name: &'static str,
        reason: String,
    },

    /// Pixel coordinates of the image do not fit in 16 bits.
    #[error("image of {width}x{height} exceeds the 16-bit coordinate limit")]
    ImageTooLarge { width: u32, height: u32 },

    /// Edge mask and gradient planes have different dimensions.
    #[error("edge mask is {mask:?} but gradient planes are {dx:?} and {dy:?}")]
    DimensionMismatch {
        mask: (u32, u32),
        dx: (u32, u32),
        dy: (u32, u32),
    },

    /// The accumulator implied by the input could not be allocated.
    #[error("failed to allocate an accumulator of {cells} cells")]
    AllocationFailed { cells: usize },

    /// A dedicated worker pool could not be created.
    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl HoughError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

/// Result alias used across the crate.
pub type HoughResult<T> = Result<T, HoughError>;

/// Allocates a zero-filled histogram, reusing `buf`'s storage when possible.
///
/// Stale counts from a previous call are always overwritten.
pub(crate) fn zeroed_cells<T: Default>(buf: &mut Vec<T>, cells: usize) -> HoughResult<()> {
    buf.clear();
    buf.try_reserve_exact(cells)
        .map_err(|_| HoughError::AllocationFailed { cells })?;
    buf.resize_with(cells, T::default);
    Ok(())
}
