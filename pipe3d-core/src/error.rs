//! Errors reported by the transform pipeline
use std::fmt;

/// Failure modes of the checked pipeline operations.
///
/// Plain matrix algebra stays total; only the homogeneous divide and the
/// checked inverse report errors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransformError {
    /// The homogeneous `w` of a transformed point was exactly zero, so the
    /// point lies on the plane at infinity for the projection.
    DegenerateProjection { w: f32 },
    /// The matrix determinant was too close to zero to invert.
    SingularMatrix { determinant: f32 },
}

impl fmt::Display for TransformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DegenerateProjection { w } => {
                write!(f, "degenerate projection: homogeneous w = {w}")
            }
            Self::SingularMatrix { determinant } => {
                write!(f, "singular matrix: determinant = {determinant}")
            }
        }
    }
}

impl std::error::Error for TransformError {}
