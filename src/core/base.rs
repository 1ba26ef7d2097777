use nalgebra::RealField;
use thiserror::Error;

/// Upper bound on the dimensionality of a problem accepted by the
/// [driver](crate::driver).
///
/// All internal buffers are allocated with the exact dimension of the problem,
/// so this is a contract for callers rather than a storage limit.
pub const MAX_DIM: usize = 250;

/// The base trait for [`Function`](super::function::Function).
pub trait Problem {
    /// Type of the scalar, usually f32 or f64.
    type Field: RealField + Copy;

    /// Returns the number of variables of the problem.
    fn dim(&self) -> usize;
}

/// Error caused by invalid dimensionality of a problem or a point.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum DimensionError {
    /// The dimension is not in the range `[1, MAX_DIM]`.
    #[error("dimension {dim} is outside of the supported range [1, {MAX_DIM}]")]
    OutOfRange {
        /// The offending dimension.
        dim: usize,
    },
    /// The number of values in a point does not match the dimensionality
    /// ([`Problem::dim`]) of the problem.
    #[error("point has {actual} variables, but the problem has {expected}")]
    Mismatch {
        /// Dimension of the problem.
        expected: usize,
        /// Length of the point.
        actual: usize,
    },
}

/// Checks that the dimension is in the supported range `[1, MAX_DIM]`.
pub fn check_dim(dim: usize) -> Result<(), DimensionError> {
    if (1..=MAX_DIM).contains(&dim) {
        Ok(())
    } else {
        Err(DimensionError::OutOfRange { dim })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dimension_bounds() {
        assert_eq!(check_dim(0), Err(DimensionError::OutOfRange { dim: 0 }));
        assert_eq!(check_dim(1), Ok(()));
        assert_eq!(check_dim(MAX_DIM), Ok(()));
        assert_eq!(
            check_dim(MAX_DIM + 1),
            Err(DimensionError::OutOfRange { dim: MAX_DIM + 1 })
        );
    }
}
