//! Error types for contiguity computation.

use std::fmt;

/// Errors that can occur while building contiguity weights.
///
/// These cover precondition violations only. Numerically degenerate inputs
/// (coincident point sites, zero-extent collections) produce defensible
/// empty output instead of an error.
#[derive(Debug, Clone)]
pub enum ContiguityError {
    /// Contiguity order must be at least 1.
    InvalidOrder(usize),

    /// The precision threshold must be non-negative.
    NegativeThreshold(f64),

    /// The geometry collection layout is inconsistent
    /// (mismatched array lengths, part offsets out of range).
    MalformedGeometry(String),

    /// A neighbor index refers past the end of the collection.
    IndexOutOfRange { index: usize, len: usize },
}

impl fmt::Display for ContiguityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContiguityError::InvalidOrder(order) => {
                write!(f, "invalid contiguity order: need at least 1, got {}", order)
            }
            ContiguityError::NegativeThreshold(t) => {
                write!(f, "negative precision threshold: {}", t)
            }
            ContiguityError::MalformedGeometry(msg) => {
                write!(f, "malformed geometry collection: {}", msg)
            }
            ContiguityError::IndexOutOfRange { index, len } => {
                write!(
                    f,
                    "neighbor index {} out of range for {} geometries",
                    index, len
                )
            }
        }
    }
}

impl std::error::Error for ContiguityError {}
