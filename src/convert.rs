//! Conversion formulas between reported statistics and effect sizes.
//!
//! Plain functions over `f64`, one per conversion. They assume their
//! arguments are already inside the documented domains; the catalog and
//! [`evaluate`](crate::evaluate) enforce that before calling them.
//!
//! Naming: `n_e` / `n_c` are the experimental and control group sizes,
//! `df` the degrees of freedom attached to the reported statistic.
//!
//! References: Rosenthal (1994), "Parametric measures of effect size",
//! in *The Handbook of Research Synthesis*; Hedges & Olkin (1985),
//! *Statistical Methods for Meta-Analysis*.

use crate::distributions::{ChiSquared, FisherF, StandardNormal, StudentT, Tail};
use crate::error::DistributionError;

// ============================================================================
// Descriptive statistics
// ============================================================================

/// σ = √σ².
pub fn variance_to_sd(variance: f64) -> f64 {
    variance.sqrt()
}

/// σ = SE·√n.
pub fn se_to_sd(se: f64, n: f64) -> f64 {
    se * n.sqrt()
}

/// Standard normal deviate Z = (X − mean)/σ.
pub fn variate_to_zscore(variate: f64, mean: f64, sd: f64) -> f64 {
    (variate - mean) / sd
}

// ============================================================================
// Normal deviates and probabilities
// ============================================================================

/// r = Z/√n.
pub fn zscore_to_correlation(z: f64, n: f64) -> f64 {
    z / n.sqrt()
}

/// Upper-tail probability of a Z-score.
///
/// # Examples
/// ```
/// use u_metacalc::convert::zscore_to_p;
/// use u_metacalc::distributions::Tail;
/// let p = zscore_to_p(1.96, Tail::One).unwrap();
/// assert!((p - 0.025).abs() < 1e-4);
/// ```
pub fn zscore_to_p(z: f64, tail: Tail) -> Result<f64, DistributionError> {
    tail.probability(z, |v| StandardNormal.sf(v))
}

/// Z-score whose tail probability is `p`. Two-tailed results are ≥ 0.
pub fn p_to_zscore(p: f64, tail: Tail) -> Result<f64, DistributionError> {
    tail.critical_value(p, |q| StandardNormal.inverse_sf(q))
}

// ============================================================================
// Chi-squared, F and t statistics
// ============================================================================

/// r = √(χ²/n) for a 1-df χ² with equal expected frequencies.
pub fn chi2_to_correlation(chi2: f64, n: f64) -> f64 {
    (chi2 / n).sqrt()
}

/// r = √(χ²/(k·n)), `k` the ratio of the larger to the smaller expectation.
pub fn chi2_unequal_to_correlation(chi2: f64, n: f64, k: f64) -> f64 {
    (chi2 / (k * n)).sqrt()
}

/// Upper-tail probability of a χ² statistic.
pub fn chi2_to_p(chi2: f64, df: f64) -> Result<f64, DistributionError> {
    ChiSquared::new(df)?.sf(chi2)
}

/// r = √(F/(F + DF₂)) for an F with one numerator degree of freedom.
pub fn f_to_correlation(f: f64, df2: f64) -> f64 {
    (f / (f + df2)).sqrt()
}

/// Upper-tail probability of an F statistic.
///
/// # Examples
/// ```
/// use u_metacalc::convert::f_to_p;
/// let p = f_to_p(4.9646, 1.0, 10.0).unwrap();
/// assert!((p - 0.05).abs() < 1e-5);
/// ```
pub fn f_to_p(f: f64, df1: f64, df2: f64) -> Result<f64, DistributionError> {
    FisherF::new(df1, df2)?.sf(f)
}

/// r = √(t²/(t² + DF)), evaluated as |t|/hypot(t, √DF) so that t² never
/// overflows.
pub fn t_to_correlation(t: f64, df: f64) -> f64 {
    t.abs() / t.hypot(df.sqrt())
}

/// Tail probability of a t statistic.
pub fn t_to_p(t: f64, df: f64, tail: Tail) -> Result<f64, DistributionError> {
    let dist = StudentT::new(df)?;
    tail.probability(t, |v| dist.sf(v))
}

/// t statistic whose tail probability is `p`. Two-tailed results are ≥ 0.
pub fn p_to_t(p: f64, df: f64, tail: Tail) -> Result<f64, DistributionError> {
    let dist = StudentT::new(df)?;
    tail.critical_value(p, |q| dist.inverse_sf(q))
}

// ============================================================================
// Fisher's Z-transform
// ============================================================================

/// r = tanh(Zᵣ).
pub fn zr_to_correlation(zr: f64) -> f64 {
    zr.tanh()
}

/// Zᵣ = atanh(r) = ½·ln((1+r)/(1−r)). Requires |r| < 1.
pub fn correlation_to_zr(r: f64) -> f64 {
    r.atanh()
}

// ============================================================================
// Standardized mean differences
// ============================================================================

/// Hedges' g → r = √(g²·nₑn𝚌 / (g²·nₑn𝚌 + (nₑ+n𝚌)·DF)).
pub fn hedges_g_to_correlation(g: f64, df: f64, n_e: f64, n_c: f64) -> f64 {
    // Divided through by nₑn𝚌: r = |g| / hypot(g, k).
    let k = ((n_e + n_c) / n_e * (df / n_c)).sqrt();
    g.abs() / g.hypot(k)
}

/// r → Hedges' g.
pub fn correlation_to_hedges_g(r: f64, df: f64, n_e: f64, n_c: f64) -> f64 {
    (r / (1.0 - r * r).sqrt()) * ((n_e + n_c) * df / (n_e * n_c)).sqrt()
}

/// Hedges' g → Hedges' d, applying the small-sample bias correction
/// `1 − 3/(4(nₑ+n𝚌−2) − 1)`.
///
/// # Examples
/// ```
/// use u_metacalc::convert::hedges_g_to_hedges_d;
/// let d = hedges_g_to_hedges_d(1.0, 10.0, 10.0);
/// assert!((d - (1.0 - 3.0 / 71.0)).abs() < 1e-15);
/// ```
pub fn hedges_g_to_hedges_d(g: f64, n_e: f64, n_c: f64) -> f64 {
    g * (1.0 - 3.0 / (4.0 * (n_e + n_c - 2.0) - 1.0))
}

/// t → Hedges' g.
pub fn t_to_hedges_g(t: f64, n_e: f64, n_c: f64) -> f64 {
    t * (n_e + n_c).sqrt() / (n_e * n_c).sqrt()
}

/// Hedges' g → Cohen's d.
pub fn hedges_g_to_cohens_d(g: f64, df: f64, n_e: f64, n_c: f64) -> f64 {
    g * ((n_e + n_c) / df).sqrt()
}

/// t → Cohen's d.
pub fn t_to_cohens_d(t: f64, df: f64, n_e: f64, n_c: f64) -> f64 {
    t * (n_e + n_c) / (df.sqrt() * (n_e * n_c).sqrt())
}

/// r → Cohen's d = 2r/√(1−r²).
pub fn correlation_to_cohens_d(r: f64) -> f64 {
    2.0 * r / (1.0 - r * r).sqrt()
}

/// F (one numerator df) → Cohen's d.
pub fn f_to_cohens_d(f: f64, df2: f64, n_e: f64, n_c: f64) -> f64 {
    f.sqrt() * (n_e + n_c) / (df2.sqrt() * (n_e * n_c).sqrt())
}

/// Cohen's d → r = d/√(d² + (nₑ+n𝚌)²/(nₑn𝚌)). Keeps the sign of d.
pub fn cohens_d_to_correlation(d: f64, n_e: f64, n_c: f64) -> f64 {
    let c = (n_e + n_c) / n_e.sqrt() / n_c.sqrt();
    d / d.hypot(c)
}

/// Cohen's d → Hedges' g.
pub fn cohens_d_to_hedges_g(d: f64, df: f64, n_e: f64, n_c: f64) -> f64 {
    d / ((n_e + n_c) / df).sqrt()
}
