//! Error types for algebra, kinematics and dynamics operations.

use thiserror::Error;

/// Result type alias for fallible conformal operations.
pub type Result<T> = core::result::Result<T, Error>;

/// Errors that can occur while building or evaluating a system.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// A finger, foot or joint id outside the configured count.
    #[error("invalid {kind} id {index} (have {count})")]
    InvalidIndex {
        kind: &'static str,
        index: usize,
        count: usize,
    },

    /// A configuration vector of the wrong length.
    #[error("invalid number of DOF: expected {expected}, got {actual}")]
    DofMismatch { expected: usize, actual: usize },

    /// Inverse, normalization or logarithm of a zero element.
    #[error("element has zero norm")]
    ZeroNorm,

    /// Kinematics requested before `finalize()`.
    #[error("kinematic chain is not finalized")]
    ChainNotFinalized,

    /// Joint or fixed motor added after `finalize()`.
    #[error("kinematic chain is already finalized")]
    ChainFinalized,

    /// System used before `finalize()`.
    #[error("system is not finalized")]
    SystemNotFinalized,

    /// Malformed link/joint graph.
    #[error("invalid topology: {0}")]
    Topology(String),

    /// Joint limits with the lower bound above the upper bound.
    #[error("invalid limits for joint {0:?}")]
    InvalidLimits(String),

    /// Unknown link, joint or chain name.
    #[error("no {kind} named {name:?}")]
    NotFound { kind: &'static str, name: String },

    /// The mass matrix is not positive definite.
    #[error("mass matrix is singular")]
    Singular,
}

impl Error {
    /// Create a topology error.
    #[must_use]
    pub fn topology(details: impl Into<String>) -> Self {
        Self::Topology(details.into())
    }

    /// Create a not-found error.
    #[must_use]
    pub fn not_found(kind: &'static str, name: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            name: name.into(),
        }
    }

    /// Fail unless `actual` matches the expected DOF.
    pub fn check_dof(expected: usize, actual: usize) -> Result<()> {
        if expected == actual {
            Ok(())
        } else {
            Err(Self::DofMismatch { expected, actual })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidIndex {
            kind: "finger",
            index: 5,
            count: 4,
        };
        assert!(format!("{err}").contains("finger"));

        let err = Error::DofMismatch {
            expected: 3,
            actual: 2,
        };
        assert!(format!("{err}").contains("DOF"));

        let err = Error::topology("two roots");
        assert!(format!("{err}").contains("two roots"));

        let err = Error::not_found("link", "base");
        assert!(format!("{err}").contains("\"base\""));
    }

    #[test]
    fn test_check_dof() {
        assert!(Error::check_dof(3, 3).is_ok());
        assert_eq!(
            Error::check_dof(3, 2),
            Err(Error::DofMismatch {
                expected: 3,
                actual: 2
            })
        );
    }
}
