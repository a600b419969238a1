//! Parameter metadata shared with presentation layers.
//!
//! A conversion declares its inputs as an ordered slice of
//! [`ParameterSpec`]s. A front end renders one labeled field per entry;
//! the evaluator checks every value against its [`Domain`] before the
//! formula runs. Both types serialize with serde so the contract can be
//! handed to a non-Rust UI as JSON.

use std::fmt;

use serde::Serialize;

use crate::error::EvalError;

/// Admissible values for one input.
///
/// Every domain rejects NaN and ±∞.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    /// x > 0
    PositiveReal,
    /// Integer ≥ 1
    PositiveInteger,
    /// 0 < p < 1
    Probability,
    /// −1 < r < 1
    Correlation,
    /// x ≥ 0
    NonNegativeReal,
    /// Any finite value
    Real,
    /// df > 0, fractional values allowed
    DegreesOfFreedom,
    /// Integer ≥ 2
    SampleSize,
    /// x ≥ 1
    AtLeastOne,
}

impl Domain {
    /// Whether `value` belongs to the domain.
    ///
    /// # Examples
    /// ```
    /// use u_metacalc::params::Domain;
    /// assert!(Domain::Correlation.contains(0.99));
    /// assert!(!Domain::Correlation.contains(1.0));
    /// assert!(!Domain::SampleSize.contains(2.5));
    /// assert!(!Domain::Real.contains(f64::NAN));
    /// ```
    pub fn contains(self, value: f64) -> bool {
        if !value.is_finite() {
            return false;
        }
        match self {
            Domain::PositiveReal | Domain::DegreesOfFreedom => value > 0.0,
            Domain::PositiveInteger => value >= 1.0 && value.fract() == 0.0,
            Domain::Probability => value > 0.0 && value < 1.0,
            Domain::Correlation => value > -1.0 && value < 1.0,
            Domain::NonNegativeReal => value >= 0.0,
            Domain::Real => true,
            Domain::SampleSize => value >= 2.0 && value.fract() == 0.0,
            Domain::AtLeastOne => value >= 1.0,
        }
    }

    /// Requirement phrased for an error message ("must be ...").
    pub fn requirement(self) -> &'static str {
        match self {
            Domain::PositiveReal => "a real number greater than zero",
            Domain::PositiveInteger => "an integer greater than or equal to one",
            Domain::Probability => "a real number strictly between zero and one",
            Domain::Correlation => "a real number strictly between negative one and one",
            Domain::NonNegativeReal => "a real number greater than or equal to zero",
            Domain::Real => "a finite real number",
            Domain::DegreesOfFreedom => "a real number of degrees of freedom greater than zero",
            Domain::SampleSize => "an integer greater than or equal to two",
            Domain::AtLeastOne => "a real number greater than or equal to one",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.requirement())
    }
}

/// One input slot of a conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ParameterSpec {
    /// Field label, e.g. "Sample Size".
    pub label: &'static str,
    pub domain: Domain,
}

impl ParameterSpec {
    pub const fn new(label: &'static str, domain: Domain) -> Self {
        Self { label, domain }
    }

    /// Checks `value`, reporting the parameter at position `index` on failure.
    pub fn check(&self, index: usize, value: f64) -> Result<f64, EvalError> {
        if self.domain.contains(value) {
            Ok(value)
        } else {
            Err(EvalError::DomainViolation {
                parameter: self.label,
                index,
                value,
                domain: self.domain,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probability_is_open_interval() {
        assert!(!Domain::Probability.contains(0.0));
        assert!(!Domain::Probability.contains(1.0));
        assert!(Domain::Probability.contains(1e-300));
        assert!(Domain::Probability.contains(0.999_999));
    }

    #[test]
    fn test_correlation_is_open_interval() {
        assert!(!Domain::Correlation.contains(-1.0));
        assert!(!Domain::Correlation.contains(1.0));
        assert!(Domain::Correlation.contains(0.0));
        assert!(Domain::Correlation.contains(-0.999));
    }

    #[test]
    fn test_integer_domains() {
        assert!(Domain::PositiveInteger.contains(1.0));
        assert!(!Domain::PositiveInteger.contains(0.0));
        assert!(!Domain::PositiveInteger.contains(1.5));
        assert!(Domain::SampleSize.contains(2.0));
        assert!(!Domain::SampleSize.contains(1.0));
        assert!(!Domain::SampleSize.contains(10.5));
    }

    #[test]
    fn test_degrees_of_freedom_rejects_zero() {
        assert!(!Domain::DegreesOfFreedom.contains(0.0));
        assert!(!Domain::DegreesOfFreedom.contains(-3.0));
        assert!(Domain::DegreesOfFreedom.contains(17.3));
    }

    #[test]
    fn test_lower_bounds() {
        assert!(Domain::NonNegativeReal.contains(0.0));
        assert!(!Domain::NonNegativeReal.contains(-1e-12));
        assert!(!Domain::PositiveReal.contains(0.0));
        assert!(Domain::AtLeastOne.contains(1.0));
        assert!(!Domain::AtLeastOne.contains(0.999));
    }

    #[test]
    fn test_non_finite_rejected_everywhere() {
        let all = [
            Domain::PositiveReal,
            Domain::PositiveInteger,
            Domain::Probability,
            Domain::Correlation,
            Domain::NonNegativeReal,
            Domain::Real,
            Domain::DegreesOfFreedom,
            Domain::SampleSize,
            Domain::AtLeastOne,
        ];
        for domain in all {
            for v in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
                assert!(!domain.contains(v), "{domain:?} accepted {v}");
            }
        }
    }

    #[test]
    fn test_check_reports_parameter() {
        let spec = ParameterSpec::new("Correlation (r)", Domain::Correlation);
        assert_eq!(spec.check(0, 0.3), Ok(0.3));
        match spec.check(2, 1.0) {
            Err(EvalError::DomainViolation {
                parameter, index, ..
            }) => {
                assert_eq!(parameter, "Correlation (r)");
                assert_eq!(index, 2);
            }
            other => panic!("expected DomainViolation, got {other:?}"),
        }
    }

    #[test]
    fn test_serializes_for_ui() {
        let spec = ParameterSpec::new("Degrees of Freedom", Domain::DegreesOfFreedom);
        let json = serde_json::to_string(&spec).unwrap();
        assert_eq!(
            json,
            r#"{"label":"Degrees of Freedom","domain":"degrees_of_freedom"}"#
        );
    }
}
