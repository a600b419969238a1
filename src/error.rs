//! Error types.
//!
//! [`DistributionError`] is raised by the special functions and the
//! distribution library; [`EvalError`] is what [`evaluate`](crate::evaluate)
//! hands back to a caller and wraps the former.

use thiserror::Error;

use crate::params::Domain;

/// Failure of a special-function or distribution routine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DistributionError {
    /// Parameters violate distribution constraints.
    #[error("invalid distribution parameters: {0}")]
    InvalidParameters(String),

    /// An iterative routine exhausted its iteration budget.
    #[error("{routine} did not converge within {iterations} iterations")]
    NonConvergence {
        routine: &'static str,
        iterations: usize,
    },

    /// A closed-form result overflowed or was otherwise not finite.
    #[error("result is not a finite number ({value})")]
    NonFiniteResult { value: f64 },
}

/// Failure of a single conversion request.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    /// The requested id is not in the catalog.
    #[error("unknown conversion: {id}")]
    UnknownConversion { id: String },

    /// The number of supplied values differs from the number of parameters.
    #[error("{id} expects {expected} value(s), got {actual}")]
    ArityMismatch {
        id: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A value lies outside its parameter's domain.
    #[error("invalid {parameter}: {value}; {parameter} must be {domain}")]
    DomainViolation {
        parameter: &'static str,
        index: usize,
        value: f64,
        domain: Domain,
    },

    /// The computation itself failed after the inputs were accepted.
    #[error("{id}: {source}")]
    NumericalNonConvergence {
        id: &'static str,
        #[source]
        source: DistributionError,
    },
}

impl EvalError {
    /// Position of the offending input, for errors tied to one value.
    pub fn parameter_index(&self) -> Option<usize> {
        match self {
            EvalError::DomainViolation { index, .. } => Some(*index),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_violation_message_names_parameter() {
        let err = EvalError::DomainViolation {
            parameter: "Sample Size",
            index: 1,
            value: 1.0,
            domain: Domain::SampleSize,
        };
        let msg = err.to_string();
        assert!(msg.starts_with("invalid Sample Size: 1;"), "{msg}");
        assert!(msg.contains("integer greater than or equal to two"), "{msg}");
        assert_eq!(err.parameter_index(), Some(1));
    }

    #[test]
    fn test_non_convergence_keeps_source() {
        use std::error::Error as _;
        let err = EvalError::NumericalNonConvergence {
            id: "chi2_to_p",
            source: DistributionError::NonConvergence {
                routine: "incomplete gamma series",
                iterations: 10_000,
            },
        };
        assert!(err.source().is_some());
        assert_eq!(
            err.to_string(),
            "chi2_to_p: incomplete gamma series did not converge within 10000 iterations"
        );
        assert_eq!(err.parameter_index(), None);
    }
}
