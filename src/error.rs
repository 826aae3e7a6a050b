//! Error types for cloth construction and simulation.

use core::fmt;

use crate::topology::ClothPrefab;

/// Errors that can occur while building or advancing a cloth.
///
/// None of these are recoverable inside the simulation: the owner decides
/// whether to rebuild or [`reset`](crate::ClothSimulation::reset).
#[derive(Debug, Clone, PartialEq)]
pub enum ClothError {
    /// The requested prefab has no topology builder.
    UnimplementedPrefab(ClothPrefab),
    /// Grid dimensions must be at least 2x2.
    InvalidGridDimensions { width: usize, height: usize },
    /// A configuration value is out of range.
    InvalidConfig(&'static str),
    /// Time delta must be finite and non-negative.
    InvalidTimeStep,
    /// The sub-step loop exceeded its iteration cap.
    NumericalInstability { iterations: usize },
    /// A particle position became NaN or infinite.
    NonFiniteState { particle: usize },
    /// A triangle collapsed to zero area.
    DegenerateTriangle { triangle: usize },
}

impl fmt::Display for ClothError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClothError::UnimplementedPrefab(prefab) => {
                write!(f, "cloth prefab {:?} is not implemented", prefab)
            }
            ClothError::InvalidGridDimensions { width, height } => {
                write!(f, "grid must be at least 2x2 (got {}x{})", width, height)
            }
            ClothError::InvalidConfig(reason) => write!(f, "invalid cloth config: {}", reason),
            ClothError::InvalidTimeStep => write!(f, "time delta must be finite and non-negative"),
            ClothError::NumericalInstability { iterations } => {
                write!(f, "integrator exceeded {} sub-steps; spring/damping/time-step combination is unstable", iterations)
            }
            ClothError::NonFiniteState { particle } => {
                write!(f, "particle {} has a non-finite position", particle)
            }
            ClothError::DegenerateTriangle { triangle } => {
                write!(f, "triangle {} has zero area", triangle)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ClothError {}
