//! The conversion registry.
//!
//! [`CONVERSIONS`] is a static table, built at compile time, of every
//! conversion the calculator offers. The table order is the order shown
//! to users.
//!
//! Each entry pairs its parameter list with a `compute` routine. The
//! routine receives values that [`evaluate`](crate::evaluate) has already
//! counted and checked against the parameter domains, so it only maps
//! them onto a formula from [`convert`](crate::convert).

use std::fmt;

use serde::Serialize;

use crate::convert;
use crate::distributions::Tail;
use crate::error::DistributionError;
use crate::params::{Domain, ParameterSpec};

/// Formula signature: validated inputs in parameter order → raw result.
pub type ComputeFn = fn(&[f64]) -> Result<f64, DistributionError>;

/// One catalog entry.
#[derive(Clone, Copy, Serialize)]
pub struct ConversionSpec {
    /// Stable identifier, e.g. `"t_to_correlation"`.
    pub id: &'static str,
    /// Menu text, e.g. "t-Statistic → Correlation".
    pub display_name: &'static str,
    /// Label of the produced quantity.
    pub output_label: &'static str,
    /// Inputs in the order `compute` expects them.
    pub parameters: &'static [ParameterSpec],
    /// Callers must pass exactly `parameters.len()` in-domain values.
    #[serde(skip)]
    pub compute: ComputeFn,
}

impl ConversionSpec {
    pub fn arity(&self) -> usize {
        self.parameters.len()
    }
}

impl fmt::Debug for ConversionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionSpec")
            .field("id", &self.id)
            .field("display_name", &self.display_name)
            .field("output_label", &self.output_label)
            .field("parameters", &self.parameters)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Shared parameter descriptors
// ============================================================================

const SAMPLE_SIZE: ParameterSpec = ParameterSpec::new("Sample Size", Domain::SampleSize);
const N_EXPERIMENT: ParameterSpec =
    ParameterSpec::new("Experiment Sample Size", Domain::SampleSize);
const N_CONTROL: ParameterSpec = ParameterSpec::new("Control Sample Size", Domain::SampleSize);
const DF: ParameterSpec = ParameterSpec::new("Degrees of Freedom", Domain::DegreesOfFreedom);
const DF2: ParameterSpec = ParameterSpec::new(
    "Residual Degrees of Freedom (DF2)",
    Domain::DegreesOfFreedom,
);
const Z_SCORE: ParameterSpec = ParameterSpec::new("Z-score", Domain::Real);
const T_STAT: ParameterSpec = ParameterSpec::new("t-Statistic [DF]", Domain::Real);
const CHI2_1DF: ParameterSpec = ParameterSpec::new("χ2 [1 df]", Domain::NonNegativeReal);
const CORRELATION: ParameterSpec = ParameterSpec::new("Correlation (r)", Domain::Correlation);
const HEDGES_G: ParameterSpec = ParameterSpec::new("Hedges' g", Domain::Real);
const COHENS_D: ParameterSpec = ParameterSpec::new("Cohen's d", Domain::Real);
const ONE_TAILED_P: ParameterSpec =
    ParameterSpec::new("One-tailed Probability", Domain::Probability);
const TWO_TAILED_P: ParameterSpec =
    ParameterSpec::new("Two-tailed Probability", Domain::Probability);

const R_OUT: &str = "Correlation (r)";

// ============================================================================
// Registry
// ============================================================================

/// Every conversion, in display order.
pub static CONVERSIONS: &[ConversionSpec] = &[
    ConversionSpec {
        id: "variance_to_sd",
        display_name: "Variance → Standard Deviation",
        output_label: "Standard Deviation",
        parameters: &[ParameterSpec::new("Variance", Domain::NonNegativeReal)],
        compute: |v| Ok(convert::variance_to_sd(v[0])),
    },
    ConversionSpec {
        id: "se_to_sd",
        display_name: "Standard Error → Standard Deviation",
        output_label: "Standard Deviation",
        parameters: &[
            ParameterSpec::new("Standard Error", Domain::NonNegativeReal),
            SAMPLE_SIZE,
        ],
        compute: |v| Ok(convert::se_to_sd(v[0], v[1])),
    },
    ConversionSpec {
        id: "variate_to_zscore",
        display_name: "Z-score (Standard Normal Deviate)",
        output_label: "Z-score",
        parameters: &[
            ParameterSpec::new("Variate", Domain::Real),
            ParameterSpec::new("Mean", Domain::Real),
            ParameterSpec::new("Standard Deviation", Domain::PositiveReal),
        ],
        compute: |v| Ok(convert::variate_to_zscore(v[0], v[1], v[2])),
    },
    ConversionSpec {
        id: "zscore_to_correlation",
        display_name: "Z-score → Correlation",
        output_label: R_OUT,
        parameters: &[Z_SCORE, SAMPLE_SIZE],
        compute: |v| Ok(convert::zscore_to_correlation(v[0], v[1])),
    },
    ConversionSpec {
        id: "zscore_to_one_tailed_p",
        display_name: "Z-score → One-tailed Probability",
        output_label: "One-tailed Probability (p)",
        parameters: &[Z_SCORE],
        compute: |v| convert::zscore_to_p(v[0], Tail::One),
    },
    ConversionSpec {
        id: "zscore_to_two_tailed_p",
        display_name: "Z-score → Two-tailed Probability",
        output_label: "Two-tailed Probability (p)",
        parameters: &[Z_SCORE],
        compute: |v| convert::zscore_to_p(v[0], Tail::Two),
    },
    ConversionSpec {
        id: "one_tailed_p_to_zscore",
        display_name: "One-tailed Probability → Z-score",
        output_label: "Z-score",
        parameters: &[ONE_TAILED_P],
        compute: |v| convert::p_to_zscore(v[0], Tail::One),
    },
    ConversionSpec {
        id: "two_tailed_p_to_zscore",
        display_name: "Two-tailed Probability → Z-score",
        output_label: "Z-score",
        parameters: &[TWO_TAILED_P],
        compute: |v| convert::p_to_zscore(v[0], Tail::Two),
    },
    ConversionSpec {
        id: "chi2_to_correlation",
        display_name: "χ2 → Correlation (Equal Expectation)",
        output_label: R_OUT,
        parameters: &[CHI2_1DF, SAMPLE_SIZE],
        compute: |v| Ok(convert::chi2_to_correlation(v[0], v[1])),
    },
    ConversionSpec {
        id: "chi2_unequal_to_correlation",
        display_name: "χ2 → Correlation (Unequal Expectation)",
        output_label: R_OUT,
        parameters: &[
            CHI2_1DF,
            SAMPLE_SIZE,
            ParameterSpec::new("Ratio of Expectations (k)", Domain::AtLeastOne),
        ],
        compute: |v| Ok(convert::chi2_unequal_to_correlation(v[0], v[1], v[2])),
    },
    ConversionSpec {
        id: "chi2_to_p",
        display_name: "χ2 → Probability",
        output_label: "Probability (p)",
        parameters: &[
            ParameterSpec::new("χ2 [DF]", Domain::NonNegativeReal),
            ParameterSpec::new("Degrees of Freedom", Domain::PositiveInteger),
        ],
        compute: |v| convert::chi2_to_p(v[0], v[1]),
    },
    ConversionSpec {
        id: "f_to_correlation",
        display_name: "F Statistic → Correlation",
        output_label: R_OUT,
        parameters: &[
            ParameterSpec::new("F Statistic [1, DF2]", Domain::NonNegativeReal),
            DF2,
        ],
        compute: |v| Ok(convert::f_to_correlation(v[0], v[1])),
    },
    ConversionSpec {
        id: "f_to_p",
        display_name: "F Statistic → Probability",
        output_label: "Probability (p)",
        parameters: &[
            ParameterSpec::new("F Statistic [DF1, DF2]", Domain::NonNegativeReal),
            ParameterSpec::new("Degrees of Freedom (DF1)", Domain::PositiveInteger),
            DF2,
        ],
        compute: |v| convert::f_to_p(v[0], v[1], v[2]),
    },
    ConversionSpec {
        id: "t_to_correlation",
        display_name: "t-Statistic → Correlation",
        output_label: R_OUT,
        parameters: &[T_STAT, DF],
        compute: |v| Ok(convert::t_to_correlation(v[0], v[1])),
    },
    ConversionSpec {
        id: "t_to_one_tailed_p",
        display_name: "t-Statistic → One-tailed Probability",
        output_label: "One-tailed Probability (p)",
        parameters: &[T_STAT, DF],
        compute: |v| convert::t_to_p(v[0], v[1], Tail::One),
    },
    ConversionSpec {
        id: "t_to_two_tailed_p",
        display_name: "t-Statistic → Two-tailed Probability",
        output_label: "Two-tailed Probability (p)",
        parameters: &[T_STAT, DF],
        compute: |v| convert::t_to_p(v[0], v[1], Tail::Two),
    },
    ConversionSpec {
        id: "zr_to_correlation",
        display_name: "Z-transform → Correlation",
        output_label: R_OUT,
        parameters: &[ParameterSpec::new("Z-transform", Domain::Real)],
        compute: |v| Ok(convert::zr_to_correlation(v[0])),
    },
    ConversionSpec {
        id: "correlation_to_zr",
        display_name: "Correlation → Z-transform",
        output_label: "Z-transform",
        parameters: &[CORRELATION],
        compute: |v| Ok(convert::correlation_to_zr(v[0])),
    },
    ConversionSpec {
        id: "hedges_g_to_correlation",
        display_name: "Hedges' g → Correlation",
        output_label: R_OUT,
        parameters: &[HEDGES_G, DF, N_EXPERIMENT, N_CONTROL],
        compute: |v| Ok(convert::hedges_g_to_correlation(v[0], v[1], v[2], v[3])),
    },
    ConversionSpec {
        id: "correlation_to_hedges_g",
        display_name: "Correlation → Hedges' g",
        output_label: "Hedges' g",
        parameters: &[CORRELATION, DF, N_EXPERIMENT, N_CONTROL],
        compute: |v| Ok(convert::correlation_to_hedges_g(v[0], v[1], v[2], v[3])),
    },
    ConversionSpec {
        id: "hedges_g_to_hedges_d",
        display_name: "Hedges' g → Hedges' d",
        output_label: "Hedges' d",
        parameters: &[HEDGES_G, N_EXPERIMENT, N_CONTROL],
        compute: |v| Ok(convert::hedges_g_to_hedges_d(v[0], v[1], v[2])),
    },
    ConversionSpec {
        id: "t_to_hedges_g",
        display_name: "t-Statistic → Hedges' g",
        output_label: "Hedges' g",
        parameters: &[
            ParameterSpec::new("t-Statistic", Domain::Real),
            N_EXPERIMENT,
            N_CONTROL,
        ],
        compute: |v| Ok(convert::t_to_hedges_g(v[0], v[1], v[2])),
    },
    ConversionSpec {
        id: "hedges_g_to_cohens_d",
        display_name: "Hedges' g → Cohen's d",
        output_label: "Cohen's d",
        parameters: &[HEDGES_G, DF, N_EXPERIMENT, N_CONTROL],
        compute: |v| Ok(convert::hedges_g_to_cohens_d(v[0], v[1], v[2], v[3])),
    },
    ConversionSpec {
        id: "t_to_cohens_d",
        display_name: "t-Statistic → Cohen's d",
        output_label: "Cohen's d",
        parameters: &[
            ParameterSpec::new("t-Statistic", Domain::Real),
            DF,
            N_EXPERIMENT,
            N_CONTROL,
        ],
        compute: |v| Ok(convert::t_to_cohens_d(v[0], v[1], v[2], v[3])),
    },
    ConversionSpec {
        id: "correlation_to_cohens_d",
        display_name: "Correlation → Cohen's d",
        output_label: "Cohen's d",
        parameters: &[CORRELATION],
        compute: |v| Ok(convert::correlation_to_cohens_d(v[0])),
    },
    ConversionSpec {
        id: "f_to_cohens_d",
        display_name: "F Statistic → Cohen's d",
        output_label: "Cohen's d",
        parameters: &[
            ParameterSpec::new("F Statistic [1, DF]", Domain::NonNegativeReal),
            DF,
            N_EXPERIMENT,
            N_CONTROL,
        ],
        compute: |v| Ok(convert::f_to_cohens_d(v[0], v[1], v[2], v[3])),
    },
    ConversionSpec {
        id: "cohens_d_to_correlation",
        display_name: "Cohen's d → Correlation",
        output_label: R_OUT,
        parameters: &[COHENS_D, N_EXPERIMENT, N_CONTROL],
        compute: |v| Ok(convert::cohens_d_to_correlation(v[0], v[1], v[2])),
    },
    ConversionSpec {
        id: "cohens_d_to_hedges_g",
        display_name: "Cohen's d → Hedges' g",
        output_label: "Hedges' g",
        parameters: &[COHENS_D, DF, N_EXPERIMENT, N_CONTROL],
        compute: |v| Ok(convert::cohens_d_to_hedges_g(v[0], v[1], v[2], v[3])),
    },
    ConversionSpec {
        id: "one_tailed_p_to_t",
        display_name: "One-tailed Probability → t-Statistic",
        output_label: "t-Statistic",
        parameters: &[ONE_TAILED_P, DF],
        compute: |v| convert::p_to_t(v[0], v[1], Tail::One),
    },
    ConversionSpec {
        id: "two_tailed_p_to_t",
        display_name: "Two-tailed Probability → t-Statistic",
        output_label: "t-Statistic",
        parameters: &[TWO_TAILED_P, DF],
        compute: |v| convert::p_to_t(v[0], v[1], Tail::Two),
    },
];

/// Looks up a catalog entry by id.
///
/// # Examples
/// ```
/// use u_metacalc::catalog::conversion;
/// let spec = conversion("t_to_correlation").unwrap();
/// assert_eq!(spec.display_name, "t-Statistic → Correlation");
/// assert_eq!(spec.arity(), 2);
/// assert!(conversion("nope").is_none());
/// ```
pub fn conversion(id: &str) -> Option<&'static ConversionSpec> {
    CONVERSIONS.iter().find(|c| c.id == id)
}
