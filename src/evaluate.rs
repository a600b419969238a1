//! Request dispatch: listing, parameter lookup and evaluation.
//!
//! All three entry points read the static [`CONVERSIONS`] table and hold
//! no state, so they may be called from any thread.

use serde::Serialize;

use crate::catalog::{conversion, ConversionSpec, CONVERSIONS};
use crate::error::{DistributionError, EvalError};
use crate::params::ParameterSpec;

/// Result of [`evaluate`].
pub type EvaluationResult = Result<f64, EvalError>;

/// `(id, display_name)` of every conversion, in catalog order.
///
/// # Examples
/// ```
/// let first = u_metacalc::list_conversions().next().unwrap();
/// assert_eq!(first, ("variance_to_sd", "Variance → Standard Deviation"));
/// ```
pub fn list_conversions() -> impl Iterator<Item = (&'static str, &'static str)> {
    CONVERSIONS.iter().map(|c| (c.id, c.display_name))
}

/// Ordered input descriptors of conversion `id`.
pub fn parameters_for(id: &str) -> Result<&'static [ParameterSpec], EvalError> {
    lookup(id).map(|c| c.parameters)
}

/// Runs conversion `id` on `inputs`.
///
/// Checks, in order: the id exists, the number of inputs matches, and
/// each input lies in its parameter's domain (the first failure is
/// reported). Only then is the formula computed. A failure inside the
/// distribution code, or a non-finite result, is returned as
/// [`EvalError::NumericalNonConvergence`].
///
/// The same request always yields the same result.
///
/// # Examples
/// ```
/// use u_metacalc::{evaluate, EvalError};
///
/// let r = evaluate("t_to_correlation", &[3.0, 16.0]).unwrap();
/// assert!((r - 0.6).abs() < 1e-12);
///
/// let err = evaluate("correlation_to_zr", &[1.0]).unwrap_err();
/// assert!(matches!(err, EvalError::DomainViolation { index: 0, .. }));
/// ```
pub fn evaluate(id: &str, inputs: &[f64]) -> EvaluationResult {
    let spec = lookup(id)?;

    if inputs.len() != spec.arity() {
        return Err(EvalError::ArityMismatch {
            id: spec.id,
            expected: spec.arity(),
            actual: inputs.len(),
        });
    }

    for (index, (param, &value)) in spec.parameters.iter().zip(inputs).enumerate() {
        param.check(index, value)?;
    }

    let value = (spec.compute)(inputs).map_err(|source| EvalError::NumericalNonConvergence {
        id: spec.id,
        source,
    })?;

    if value.is_finite() {
        Ok(value)
    } else {
        Err(EvalError::NumericalNonConvergence {
            id: spec.id,
            source: DistributionError::NonFiniteResult { value },
        })
    }
}

fn lookup(id: &str) -> Result<&'static ConversionSpec, EvalError> {
    conversion(id).ok_or_else(|| EvalError::UnknownConversion { id: id.to_string() })
}

/// Serializable view of a catalog entry.
#[derive(Debug, Clone, Serialize)]
pub struct ConversionSummary {
    pub id: &'static str,
    pub display_name: &'static str,
    pub output_label: &'static str,
    pub parameters: &'static [ParameterSpec],
}

impl From<&ConversionSpec> for ConversionSummary {
    fn from(spec: &ConversionSpec) -> Self {
        Self {
            id: spec.id,
            display_name: spec.display_name,
            output_label: spec.output_label,
            parameters: spec.parameters,
        }
    }
}

/// Summaries of the whole catalog, in catalog order.
pub fn summaries() -> Vec<ConversionSummary> {
    CONVERSIONS.iter().map(ConversionSummary::from).collect()
}
