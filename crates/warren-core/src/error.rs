//! Error types for raw memory views.

use bytemuck::PodCastError;

/// Errors from reinterpreting a [`View`](crate::View) as another element type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ViewError {
    /// The byte length of the view is not a multiple of the target element size.
    #[error("cannot reinterpret {bytes} bytes as elements of size {element_size}")]
    SizeMismatch {
        /// Length of the source view in bytes.
        bytes: usize,
        /// Size of one target element in bytes.
        element_size: usize,
    },
    /// The view's base address does not satisfy the target alignment.
    #[error("view is not aligned to {required} bytes")]
    Misaligned {
        /// Alignment required by the target element type.
        required: usize,
    },
}

impl ViewError {
    pub(crate) fn from_cast<U>(err: PodCastError, bytes: usize) -> Self {
        match err {
            PodCastError::TargetAlignmentGreaterAndInputNotAligned
            | PodCastError::AlignmentMismatch => Self::Misaligned {
                required: std::mem::align_of::<U>(),
            },
            PodCastError::OutputSliceWouldHaveSlop | PodCastError::SizeMismatch => {
                Self::SizeMismatch {
                    bytes,
                    element_size: std::mem::size_of::<U>(),
                }
            }
        }
    }
}
