//! Probability distributions for test statistics.
//!
//! The four continuous families needed to turn a reported statistic into
//! a probability and back.
//!
//! # Supported Distributions
//!
//! | Distribution | Parameters | Upper tail (survival) |
//! |---|---|---|
//! | [`StandardNormal`] | none | ½·erfc(z/√2) |
//! | [`StudentT`] | df | ½·I_x(df/2, ½), x = df/(df+t²), t ≥ 0 |
//! | [`FisherF`] | df1, df2 | I_x(df2/2, df1/2), x = df2/(df2+df1·F) |
//! | [`ChiSquared`] | df | Q(df/2, x/2) |
//!
//! Every family exposes `cdf` (lower tail), `sf` (upper tail, computed
//! directly rather than as `1 − cdf`) and `inverse_sf`. [`Tail`] layers
//! the one-/two-tailed convention on top of `sf`/`inverse_sf`: the
//! positive tail is always the tail of interest, and two-tailed critical
//! values are always the non-negative root.

use crate::error::DistributionError;
use crate::special::{self, incomplete_beta_split};

/// 1/√(2π)
const FRAC_1_SQRT_2PI: f64 = 0.398_942_280_401_432_7;

/// Halley refinement steps allowed for the normal quantile.
const MAX_REFINE: usize = 50;

/// Bisection steps allowed when inverting a survival function.
const MAX_BISECT: usize = 400;

/// Doublings allowed while bracketing a root; 2^1000 is still finite.
const MAX_BRACKET: usize = 1000;

fn check_probability(p: f64) -> Result<(), DistributionError> {
    if p.is_nan() || p <= 0.0 || p >= 1.0 {
        return Err(DistributionError::InvalidParameters(format!(
            "probability must lie in (0, 1), got {p}"
        )));
    }
    Ok(())
}

fn check_df(name: &str, df: f64) -> Result<(), DistributionError> {
    if !df.is_finite() || df <= 0.0 {
        return Err(DistributionError::InvalidParameters(format!(
            "{name} must be finite and > 0, got {df}"
        )));
    }
    Ok(())
}

fn check_variate(x: f64) -> Result<(), DistributionError> {
    if x.is_nan() {
        return Err(DistributionError::InvalidParameters(
            "variate is NaN".to_string(),
        ));
    }
    Ok(())
}

// ============================================================================
// Tail Convention
// ============================================================================

/// Which tail(s) of a distribution a probability refers to.
///
/// The positive tail is always the tail of interest. Callers that need
/// the negative tail negate the statistic or take `1 − p` themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tail {
    /// Area above the statistic.
    One,
    /// Area beyond `|statistic|` in both directions.
    Two,
}

impl Tail {
    /// Tail probability of `x` given the distribution's survival function.
    ///
    /// - `One`: `sf(x)`
    /// - `Two`: `min(1, 2·sf(|x|))`
    ///
    /// # Examples
    /// ```
    /// use u_metacalc::distributions::{StandardNormal, Tail};
    /// let p = Tail::Two.probability(-1.96, |z| StandardNormal.sf(z)).unwrap();
    /// assert!((p - 0.05).abs() < 1e-3);
    /// ```
    pub fn probability<F>(self, x: f64, sf: F) -> Result<f64, DistributionError>
    where
        F: Fn(f64) -> Result<f64, DistributionError>,
    {
        match self {
            Tail::One => sf(x),
            Tail::Two => Ok((2.0 * sf(x.abs())?).min(1.0)),
        }
    }

    /// Critical value whose tail probability is `p`.
    ///
    /// - `One`: `inverse_sf(p)`
    /// - `Two`: `inverse_sf(p/2)`, reported as the non-negative root
    ///
    /// # Examples
    /// ```
    /// use u_metacalc::distributions::{StandardNormal, Tail};
    /// let z = Tail::Two.critical_value(0.05, |p| StandardNormal.inverse_sf(p)).unwrap();
    /// assert!((z - 1.959964).abs() < 1e-6);
    /// ```
    pub fn critical_value<F>(self, p: f64, inverse_sf: F) -> Result<f64, DistributionError>
    where
        F: Fn(f64) -> Result<f64, DistributionError>,
    {
        check_probability(p)?;
        match self {
            Tail::One => inverse_sf(p),
            Tail::Two => Ok(inverse_sf(p / 2.0)?.abs()),
        }
    }
}

// ============================================================================
// Standard Normal Distribution
// ============================================================================

/// Standard normal distribution N(0, 1).
///
/// # Accuracy
/// `cdf`/`sf` inherit the precision of [`special::erfc`], which keeps
/// relative accuracy well below 1e-10 out to |z| = 8 and beyond.
/// `quantile` refines a rational starting point (Acklam) with Halley
/// steps against that CDF, so `cdf(quantile(p)) == p` to ~1e-15.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StandardNormal;

impl StandardNormal {
    /// PDF φ(z) = (1/√(2π)) exp(-z²/2).
    pub fn pdf(&self, z: f64) -> f64 {
        FRAC_1_SQRT_2PI * (-0.5 * z * z).exp()
    }

    /// Φ(z) = P(Z ≤ z).
    ///
    /// # Examples
    /// ```
    /// use u_metacalc::distributions::StandardNormal;
    /// assert!((StandardNormal.cdf(0.0).unwrap() - 0.5).abs() < 1e-15);
    /// assert!((StandardNormal.cdf(1.96).unwrap() - 0.9750021048517795).abs() < 1e-12);
    /// ```
    pub fn cdf(&self, z: f64) -> Result<f64, DistributionError> {
        check_variate(z)?;
        Ok(0.5 * special::erfc(-z * std::f64::consts::FRAC_1_SQRT_2)?)
    }

    /// Upper tail 1 − Φ(z) = P(Z > z).
    pub fn sf(&self, z: f64) -> Result<f64, DistributionError> {
        self.cdf(-z)
    }

    /// Φ⁻¹(p): the z with `Φ(z) = p`.
    ///
    /// # Errors
    /// `InvalidParameters` unless `0 < p < 1`.
    ///
    /// # Examples
    /// ```
    /// use u_metacalc::distributions::StandardNormal;
    /// assert!(StandardNormal.quantile(0.5).unwrap().abs() < 1e-15);
    /// assert!((StandardNormal.quantile(0.975).unwrap() - 1.959963984540054).abs() < 1e-12);
    /// ```
    pub fn quantile(&self, p: f64) -> Result<f64, DistributionError> {
        check_probability(p)?;
        if p > 0.5 {
            // 1 − p is exact for p ≥ 0.5
            Ok(-self.lower_quantile(1.0 - p)?)
        } else {
            self.lower_quantile(p)
        }
    }

    /// The z with upper-tail area `p`, i.e. `−Φ⁻¹(p)`.
    pub fn inverse_sf(&self, p: f64) -> Result<f64, DistributionError> {
        Ok(-self.quantile(p)?)
    }

    /// Φ⁻¹(p) for `0 < p ≤ 0.5`, where the CDF keeps relative precision.
    fn lower_quantile(&self, p: f64) -> Result<f64, DistributionError> {
        if p == 0.5 {
            return Ok(0.0);
        }
        let mut z = acklam_initial(p);
        for _ in 0..MAX_REFINE {
            let err = self.cdf(z)? - p;
            if err == 0.0 {
                return Ok(z);
            }
            // Halley step: u = (Φ(z) − p)/φ(z)
            let u = err / self.pdf(z);
            let step = u / (1.0 + 0.5 * z * u);
            z -= step;
            if step.abs() <= 1e-12 * z.abs().max(1.0) {
                return Ok(z);
            }
        }
        Err(DistributionError::NonConvergence {
            routine: "normal quantile refinement",
            iterations: MAX_REFINE,
        })
    }
}

/// Acklam's rational approximation of Φ⁻¹(p) for `0 < p ≤ 0.5`.
///
/// Relative error about 1.15 × 10⁻⁹; used only as a starting point.
fn acklam_initial(p: f64) -> f64 {
    #[allow(clippy::excessive_precision)]
    const A: [f64; 6] = [
        -3.969683028665376e+01,
        2.209460984245205e+02,
        -2.759285104469687e+02,
        1.383577518672690e+02,
        -3.066479806614716e+01,
        2.506628277459239e+00,
    ];
    #[allow(clippy::excessive_precision)]
    const B: [f64; 5] = [
        -5.447609879822406e+01,
        1.615858368580409e+02,
        -1.556989798598866e+02,
        6.680131188771972e+01,
        -1.328068155288572e+01,
    ];
    #[allow(clippy::excessive_precision)]
    const C: [f64; 6] = [
        -7.784894002430293e-03,
        -3.223964580411365e-01,
        -2.400758277161838e+00,
        -2.549732539343734e+00,
        4.374664141464968e+00,
        2.938163982698783e+00,
    ];
    #[allow(clippy::excessive_precision)]
    const D: [f64; 4] = [
        7.784695709041462e-03,
        3.224671290700398e-01,
        2.445134137142996e+00,
        3.754408661907416e+00,
    ];
    const P_LOW: f64 = 0.02425;

    if p < P_LOW {
        let q = (-2.0 * p.ln()).sqrt();
        (((((C[0] * q + C[1]) * q + C[2]) * q + C[3]) * q + C[4]) * q + C[5])
            / ((((D[0] * q + D[1]) * q + D[2]) * q + D[3]) * q + 1.0)
    } else {
        let q = p - 0.5;
        let r = q * q;
        (((((A[0] * r + A[1]) * r + A[2]) * r + A[3]) * r + A[4]) * r + A[5]) * q
            / (((((B[0] * r + B[1]) * r + B[2]) * r + B[3]) * r + B[4]) * r + 1.0)
    }
}

// ============================================================================
// Student's t-Distribution
// ============================================================================

/// Student's t-distribution with `df` degrees of freedom.
///
/// # Algorithm
/// With `x = df/(df+t²)`, the upper tail for `t ≥ 0` is
/// `I_x(df/2, 1/2) / 2`; the lower tail follows by symmetry.
/// Non-integer `df` is accepted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StudentT {
    df: f64,
}

impl StudentT {
    /// Creates a t-distribution.
    ///
    /// # Errors
    /// Returns `Err` unless `df` is finite and positive.
    pub fn new(df: f64) -> Result<Self, DistributionError> {
        check_df("df", df)?;
        Ok(Self { df })
    }

    pub fn df(&self) -> f64 {
        self.df
    }

    /// P(T ≤ t).
    ///
    /// # Examples
    /// ```
    /// use u_metacalc::distributions::StudentT;
    /// let t = StudentT::new(10.0).unwrap();
    /// assert!((t.cdf(0.0).unwrap() - 0.5).abs() < 1e-15);
    /// assert!((t.cdf(-2.228138851986).unwrap() - 0.025).abs() < 1e-9);
    /// ```
    pub fn cdf(&self, t: f64) -> Result<f64, DistributionError> {
        self.sf(-t)
    }

    /// P(T > t).
    pub fn sf(&self, t: f64) -> Result<f64, DistributionError> {
        check_variate(t)?;
        if t == 0.0 {
            return Ok(0.5);
        }
        if t.is_infinite() {
            return Ok(if t > 0.0 { 0.0 } else { 1.0 });
        }
        // x = df/(df+t²) and y = t²/(df+t²), scaled so that t² never overflows.
        let half_df = self.df / 2.0;
        let root_df = self.df.sqrt();
        let h = t.hypot(root_df);
        let x = (root_df / h).powi(2);
        let upper = if x < f64::MIN_POSITIVE {
            special::incomplete_beta_from_ln(2.0 * (root_df.ln() - h.ln()), half_df, 0.5)
        } else {
            incomplete_beta_split(x, (t / h).powi(2), half_df, 0.5)?
        };
        let half = 0.5 * upper;
        Ok(if t > 0.0 { half } else { 1.0 - half })
    }

    /// Quantile function: the t with `P(T ≤ t) = p`.
    ///
    /// # Examples
    /// ```
    /// use u_metacalc::distributions::StudentT;
    /// let t = StudentT::new(10.0).unwrap();
    /// assert!((t.quantile(0.975).unwrap() - 2.228138851986).abs() < 1e-8);
    /// ```
    pub fn quantile(&self, p: f64) -> Result<f64, DistributionError> {
        Ok(-self.inverse_sf(p)?)
    }

    /// The t with upper-tail area `p`.
    pub fn inverse_sf(&self, p: f64) -> Result<f64, DistributionError> {
        check_probability(p)?;
        if p == 0.5 {
            return Ok(0.0);
        }
        if p > 0.5 {
            return Ok(-self.inverse_sf(1.0 - p)?);
        }
        invert_survival(p, "t quantile bisection", |t| self.sf(t))
    }

    /// PDF f(t) = Γ((df+1)/2) / (√(df·π) · Γ(df/2)) · (1 + t²/df)^(−(df+1)/2).
    pub fn pdf(&self, t: f64) -> f64 {
        let half_df = self.df / 2.0;
        let log_pdf = special::ln_gamma_ratio(half_df, 0.5)
            - 0.5 * (self.df * std::f64::consts::PI).ln()
            - (half_df + 0.5) * (t * t / self.df).ln_1p();
        log_pdf.exp()
    }
}

// ============================================================================
// F-Distribution
// ============================================================================

/// Fisher–Snedecor F-distribution with `(df1, df2)` degrees of freedom.
///
/// # Algorithm
/// With `x = df2/(df2 + df1·F)`, the upper tail is `I_x(df2/2, df1/2)`
/// and the lower tail is `I_{1−x}(df1/2, df2/2)`; both ratios are formed
/// directly so neither tail is computed by subtraction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FisherF {
    df1: f64,
    df2: f64,
}

impl FisherF {
    /// Creates an F-distribution.
    ///
    /// # Errors
    /// Returns `Err` unless both degrees of freedom are finite and positive.
    pub fn new(df1: f64, df2: f64) -> Result<Self, DistributionError> {
        check_df("df1", df1)?;
        check_df("df2", df2)?;
        Ok(Self { df1, df2 })
    }

    pub fn df1(&self) -> f64 {
        self.df1
    }

    pub fn df2(&self) -> f64 {
        self.df2
    }

    /// P(X ≤ f).
    ///
    /// # Examples
    /// ```
    /// use u_metacalc::distributions::FisherF;
    /// let f = FisherF::new(5.0, 10.0).unwrap();
    /// assert_eq!(f.cdf(0.0).unwrap(), 0.0);
    /// ```
    pub fn cdf(&self, f: f64) -> Result<f64, DistributionError> {
        check_variate(f)?;
        if f <= 0.0 {
            return Ok(0.0);
        }
        if f.is_infinite() {
            return Ok(1.0);
        }
        let (x, y) = self.split(f);
        if let Some((lower, _)) = self.extreme_tails(f, x, y) {
            return Ok(lower);
        }
        incomplete_beta_split(y, x, self.df1 / 2.0, self.df2 / 2.0)
    }

    /// P(X > f).
    pub fn sf(&self, f: f64) -> Result<f64, DistributionError> {
        check_variate(f)?;
        if f <= 0.0 {
            return Ok(1.0);
        }
        if f.is_infinite() {
            return Ok(0.0);
        }
        let (x, y) = self.split(f);
        if let Some((_, upper)) = self.extreme_tails(f, x, y) {
            return Ok(upper);
        }
        incomplete_beta_split(x, y, self.df2 / 2.0, self.df1 / 2.0)
    }

    /// Returns `(df2/(df2+df1·f), df1·f/(df2+df1·f))`, formed from the
    /// ratio `df1·f/df2` so that neither product overflows.
    fn split(&self, f: f64) -> (f64, f64) {
        let scaled = self.df1 / self.df2 * f;
        (1.0 / (1.0 + scaled), 1.0 / (1.0 + 1.0 / scaled))
    }

    /// `(cdf, sf)` when one of the ratios from [`Self::split`] underflowed.
    ///
    /// The underflowed ratio is then `(df1·f/df2)^∓1` to within rounding,
    /// so its logarithm is still available.
    fn extreme_tails(&self, f: f64, x: f64, y: f64) -> Option<(f64, f64)> {
        let ln_scaled = self.df1.ln() - self.df2.ln() + f.ln();
        if x < f64::MIN_POSITIVE {
            let upper =
                special::incomplete_beta_from_ln(-ln_scaled, self.df2 / 2.0, self.df1 / 2.0);
            Some((1.0 - upper, upper))
        } else if y < f64::MIN_POSITIVE {
            let lower = special::incomplete_beta_from_ln(ln_scaled, self.df1 / 2.0, self.df2 / 2.0);
            Some((lower, 1.0 - lower))
        } else {
            None
        }
    }

    /// Quantile function: the f with `P(X ≤ f) = p`.
    ///
    /// # Algorithm
    /// Solves for the upper-tail area `1 − p` with [`Self::inverse_sf`]:
    /// the bound is doubled from 2 until it brackets the root, then
    /// bisected. Forming `1 − p` rounds away the upper tail when `p` is
    /// within a few ulps of 1; call `inverse_sf` with the tail area there.
    pub fn quantile(&self, p: f64) -> Result<f64, DistributionError> {
        check_probability(p)?;
        self.inverse_sf(1.0 - p)
    }

    /// Critical value: the f with upper-tail area `p`.
    ///
    /// # Examples
    /// ```
    /// use u_metacalc::distributions::FisherF;
    /// let f = FisherF::new(1.0, 10.0).unwrap();
    /// // tabulated F(0.05; 1, 10) = 4.9646
    /// assert!((f.inverse_sf(0.05).unwrap() - 4.9646).abs() < 1e-3);
    /// ```
    pub fn inverse_sf(&self, p: f64) -> Result<f64, DistributionError> {
        check_probability(p)?;
        invert_survival(p, "F quantile bisection", |f| self.sf(f))
    }
}

// ============================================================================
// Chi-Squared Distribution
// ============================================================================

/// Chi-squared distribution with `df` degrees of freedom.
///
/// # Algorithm
/// `F(x; k) = P(k/2, x/2)`, upper tail `Q(k/2, x/2)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChiSquared {
    df: f64,
}

impl ChiSquared {
    /// Creates a chi-squared distribution.
    ///
    /// # Errors
    /// Returns `Err` unless `df` is finite and positive.
    pub fn new(df: f64) -> Result<Self, DistributionError> {
        check_df("df", df)?;
        Ok(Self { df })
    }

    pub fn df(&self) -> f64 {
        self.df
    }

    /// P(X ≤ x).
    ///
    /// # Examples
    /// ```
    /// use u_metacalc::distributions::ChiSquared;
    /// let chi2 = ChiSquared::new(1.0).unwrap();
    /// assert_eq!(chi2.cdf(0.0).unwrap(), 0.0);
    /// assert!((chi2.cdf(3.841458820694124).unwrap() - 0.95).abs() < 1e-10);
    /// ```
    pub fn cdf(&self, x: f64) -> Result<f64, DistributionError> {
        check_variate(x)?;
        special::regularized_lower_gamma(self.df / 2.0, x / 2.0)
    }

    /// P(X > x).
    pub fn sf(&self, x: f64) -> Result<f64, DistributionError> {
        check_variate(x)?;
        special::regularized_upper_gamma(self.df / 2.0, x / 2.0)
    }

    /// Quantile function: the x with `P(X ≤ x) = p`.
    ///
    /// Goes through `inverse_sf(1 − p)`, so for `p` within a few ulps of 1
    /// pass the upper-tail area to [`Self::inverse_sf`] instead.
    pub fn quantile(&self, p: f64) -> Result<f64, DistributionError> {
        check_probability(p)?;
        self.inverse_sf(1.0 - p)
    }

    /// Critical value: the x with upper-tail area `p`.
    pub fn inverse_sf(&self, p: f64) -> Result<f64, DistributionError> {
        check_probability(p)?;
        invert_survival(p, "chi-squared quantile bisection", |x| self.sf(x))
    }
}

// ============================================================================
// Root Finding
// ============================================================================

/// Solves `sf(x) = p` for a survival function decreasing on `[0, ∞)`.
///
/// Doubles an upper bound until it brackets the root, then bisects to a
/// relative width of 1e-14. A root beyond the bracketing range, or a
/// survival value that is not a number, is `NonConvergence`.
fn invert_survival<F>(p: f64, routine: &'static str, sf: F) -> Result<f64, DistributionError>
where
    F: Fn(f64) -> Result<f64, DistributionError>,
{
    let mut lo = 0.0_f64;
    let mut hi = 2.0_f64;
    let mut expansions = 0;
    loop {
        let tail = sf(hi)?;
        if tail.is_nan() {
            return Err(DistributionError::NonConvergence {
                routine,
                iterations: expansions,
            });
        }
        if tail <= p {
            break;
        }
        lo = hi;
        hi *= 2.0;
        expansions += 1;
        if expansions > MAX_BRACKET || !hi.is_finite() {
            return Err(DistributionError::NonConvergence {
                routine,
                iterations: expansions,
            });
        }
    }

    for _ in 0..MAX_BISECT {
        let mid = 0.5 * (lo + hi);
        if hi - lo <= 1e-14 * mid.max(1e-14) {
            return Ok(mid);
        }
        if sf(mid)? > p {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    Err(DistributionError::NonConvergence {
        routine,
        iterations: MAX_BISECT,
    })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // --- Tail ---

    #[test]
    fn test_tail_two_uses_absolute_value() {
        let n = StandardNormal;
        let pos = Tail::Two.probability(1.5, |z| n.sf(z)).unwrap();
        let neg = Tail::Two.probability(-1.5, |z| n.sf(z)).unwrap();
        assert_eq!(pos, neg);
    }

    #[test]
    fn test_tail_two_capped_at_one() {
        let p = Tail::Two.probability(0.0, |z| StandardNormal.sf(z)).unwrap();
        assert_eq!(p, 1.0);
    }

    #[test]
    fn test_tail_critical_value_positive_root() {
        for &p in &[0.001, 0.05, 0.5, 0.9, 0.999] {
            let z = Tail::Two
                .critical_value(p, |q| StandardNormal.inverse_sf(q))
                .unwrap();
            assert!(z >= 0.0, "two-tailed critical value for p={p} is {z}");
        }
        let one = Tail::One
            .critical_value(0.975, |q| StandardNormal.inverse_sf(q))
            .unwrap();
        assert!((one + 1.959963984540054).abs() < 1e-10);
    }

    #[test]
    fn test_tail_critical_value_rejects_bad_p() {
        assert!(Tail::Two
            .critical_value(0.0, |q| StandardNormal.inverse_sf(q))
            .is_err());
        assert!(Tail::One
            .critical_value(1.0, |q| StandardNormal.inverse_sf(q))
            .is_err());
    }

    // --- StandardNormal ---

    #[test]
    fn test_normal_cdf_known_values() {
        let n = StandardNormal;
        assert!((n.cdf(1.0).unwrap() - 0.8413447460685429).abs() < 1e-13);
        assert!((n.cdf(-2.0).unwrap() - 0.022750131948179195).abs() < 1e-14);
        assert!((n.sf(1.96).unwrap() - 0.024997895148220435).abs() < 1e-13);
        assert!((n.sf(-1.96).unwrap() - 0.9750021048517795).abs() < 1e-13);
    }

    #[test]
    fn test_normal_far_tail() {
        // 1 − Φ(8) = 6.220960574271785e-16
        let p = StandardNormal.sf(8.0).unwrap();
        assert!((p / 6.220960574271785e-16 - 1.0).abs() < 1e-10, "sf(8) = {p}");
    }

    #[test]
    fn test_normal_cdf_symmetry() {
        for &z in &[0.5, 1.0, 2.5, 4.0, 7.0] {
            let n = StandardNormal;
            assert!((n.cdf(z).unwrap() + n.cdf(-z).unwrap() - 1.0).abs() < 1e-15);
        }
    }

    #[test]
    fn test_normal_extremes() {
        let n = StandardNormal;
        assert_eq!(n.cdf(f64::INFINITY).unwrap(), 1.0);
        assert_eq!(n.cdf(f64::NEG_INFINITY).unwrap(), 0.0);
        assert!(n.cdf(f64::NAN).is_err());
    }

    #[test]
    fn test_normal_pdf_at_zero() {
        assert!((StandardNormal.pdf(0.0) - 0.3989422804014327).abs() < 1e-15);
    }

    #[test]
    fn test_normal_quantile_known_values() {
        let n = StandardNormal;
        assert!((n.quantile(0.95).unwrap() - 1.6448536269514722).abs() < 1e-12);
        assert!((n.quantile(0.025).unwrap() + 1.959963984540054).abs() < 1e-12);
        assert!((n.quantile(1e-10).unwrap() + 6.361340902404056).abs() < 1e-9);
    }

    #[test]
    fn test_normal_quantile_invalid() {
        let n = StandardNormal;
        assert!(n.quantile(0.0).is_err());
        assert!(n.quantile(1.0).is_err());
        assert!(n.quantile(-0.1).is_err());
        assert!(n.quantile(f64::NAN).is_err());
    }

    #[test]
    fn test_acklam_initial_close() {
        for &p in &[1e-8, 0.01, 0.02425, 0.1, 0.3, 0.5] {
            let z0 = acklam_initial(p);
            let z = StandardNormal.quantile(p).unwrap();
            assert!((z0 - z).abs() < 1e-7 * z.abs().max(1.0), "p={p}: {z0} vs {z}");
        }
    }

    // --- StudentT ---

    #[test]
    fn test_t_known_values() {
        let t = StudentT::new(10.0).unwrap();
        // t = 2, df = 10: one-tailed 0.036694, two-tailed 0.073388
        assert!((t.sf(2.0).unwrap() - 0.03669401738).abs() < 1e-9);
        let two = Tail::Two.probability(-2.0, |v| t.sf(v)).unwrap();
        assert!((two - 0.07338803477).abs() < 1e-9);
    }

    #[test]
    fn test_t_df_one_is_cauchy() {
        // Cauchy: P(T > t) = 1/2 − atan(t)/π
        let t = StudentT::new(1.0).unwrap();
        for &x in &[0.5_f64, 1.0, 3.0, 50.0] {
            let expected = 0.5 - x.atan() / std::f64::consts::PI;
            assert!((t.sf(x).unwrap() - expected).abs() < 1e-12, "x={x}");
        }
    }

    #[test]
    fn test_t_approaches_normal() {
        let t = StudentT::new(1e6).unwrap();
        let diff = t.sf(1.96).unwrap() - StandardNormal.sf(1.96).unwrap();
        assert!(diff.abs() < 1e-6);
    }

    #[test]
    fn test_t_fractional_df() {
        let t = StudentT::new(7.5).unwrap();
        let p = t.sf(2.0).unwrap();
        let lo = StudentT::new(7.0).unwrap().sf(2.0).unwrap();
        let hi = StudentT::new(8.0).unwrap().sf(2.0).unwrap();
        assert!(hi < p && p < lo);
    }

    #[test]
    fn test_t_quantile_tabulated() {
        // Two-tailed 5% critical values
        for &(df, crit) in &[(1.0, 12.706204736), (5.0, 2.570581836), (30.0, 2.042272456)] {
            let t = StudentT::new(df).unwrap();
            let v = t.inverse_sf(0.025).unwrap();
            assert!((v - crit).abs() < 1e-7, "df={df}: {v} vs {crit}");
        }
    }

    #[test]
    fn test_t_quantile_median_and_symmetry() {
        let t = StudentT::new(4.0).unwrap();
        assert_eq!(t.quantile(0.5).unwrap(), 0.0);
        let lo = t.quantile(0.1).unwrap();
        let hi = t.quantile(0.9).unwrap();
        assert!((lo + hi).abs() < 1e-12);
    }

    #[test]
    fn test_t_invalid() {
        assert!(StudentT::new(0.0).is_err());
        assert!(StudentT::new(-1.0).is_err());
        assert!(StudentT::new(f64::INFINITY).is_err());
        let t = StudentT::new(3.0).unwrap();
        assert!(t.sf(f64::NAN).is_err());
        assert!(t.inverse_sf(0.0).is_err());
    }

    #[test]
    fn test_t_pdf_integrates_to_cdf_slope() {
        let t = StudentT::new(6.0).unwrap();
        let h = 1e-5;
        let slope = (t.cdf(1.0 + h).unwrap() - t.cdf(1.0 - h).unwrap()) / (2.0 * h);
        assert!((slope - t.pdf(1.0)).abs() < 1e-8);
    }

    #[test]
    fn test_t_huge_df_tail() {
        // Φ(−2) = 0.0227501319481792...; df = 1e10 is still 1.3e-12 above it.
        let t = StudentT::new(1e10).unwrap();
        assert!((t.sf(2.0).unwrap() - 0.02275013196167695).abs() < 1e-12);
        let t = StudentT::new(1e15).unwrap();
        assert!((t.sf(2.0).unwrap() - 0.022750131948179342).abs() < 1e-12);
        assert!((t.cdf(-2.0).unwrap() - StandardNormal.cdf(-2.0).unwrap()).abs() < 1e-12);
    }

    #[test]
    fn test_t_pdf_huge_df() {
        let t = StudentT::new(1e12).unwrap();
        assert!((t.pdf(0.0) / FRAC_1_SQRT_2PI - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_t_extreme_statistic() {
        let t = StudentT::new(18.0).unwrap();
        assert_eq!(t.sf(1e200).unwrap(), 0.0);
        assert_eq!(t.cdf(-1e200).unwrap(), 0.0);
        assert_eq!(t.sf(-1e200).unwrap(), 1.0);

        // Near-zero df keeps a heavy tail even where df/(df+t²) underflows.
        let t = StudentT::new(1e-3).unwrap();
        let v = t.sf(1e200).unwrap();
        assert!((v / 0.3141732124861151 - 1.0).abs() < 1e-12, "{v}");
    }

    #[test]
    fn test_t_quantile_beyond_f64_range() {
        // With df = 1e-3 the 2.5% critical value is far above f64::MAX.
        let t = StudentT::new(1e-3).unwrap();
        assert!(matches!(
            t.inverse_sf(0.025),
            Err(DistributionError::NonConvergence { .. })
        ));
    }

    #[test]
    fn test_invert_survival_rejects_nan() {
        let result = invert_survival(0.1, "nan survival", |_| Ok(f64::NAN));
        assert_eq!(
            result,
            Err(DistributionError::NonConvergence {
                routine: "nan survival",
                iterations: 0
            })
        );
    }

    // --- FisherF ---

    #[test]
    fn test_f_zero_and_negative() {
        let f = FisherF::new(5.0, 10.0).unwrap();
        assert_eq!(f.cdf(0.0).unwrap(), 0.0);
        assert_eq!(f.cdf(-1.0).unwrap(), 0.0);
        assert_eq!(f.sf(0.0).unwrap(), 1.0);
    }

    #[test]
    fn test_f_matches_t_squared() {
        // F(1, df) = t(df)²
        let f = FisherF::new(1.0, 12.0).unwrap();
        let t = StudentT::new(12.0).unwrap();
        for &x in &[0.5_f64, 1.0, 2.2, 4.0] {
            let via_f = f.sf(x * x).unwrap();
            let via_t = Tail::Two.probability(x, |v| t.sf(v)).unwrap();
            assert!((via_f - via_t).abs() < 1e-12, "x={x}: {via_f} vs {via_t}");
        }
    }

    #[test]
    fn test_f_tabulated_critical_value() {
        // F(0.05; 3, 20) = 3.098391
        let f = FisherF::new(3.0, 20.0).unwrap();
        assert!((f.sf(3.098391212).unwrap() - 0.05).abs() < 1e-8);
        assert!((f.inverse_sf(0.05).unwrap() - 3.098391212).abs() < 1e-6);
    }

    #[test]
    fn test_f_cdf_plus_sf() {
        let f = FisherF::new(4.0, 9.0).unwrap();
        for &x in &[0.1, 1.0, 3.0, 20.0] {
            assert!((f.cdf(x).unwrap() + f.sf(x).unwrap() - 1.0).abs() < 1e-14);
        }
    }

    #[test]
    fn test_f_quantile_roundtrip() {
        for &(df1, df2) in &[(5.0, 10.0), (10.0, 10.0), (3.0, 20.0)] {
            let f = FisherF::new(df1, df2).unwrap();
            for &p in &[0.05, 0.1, 0.5, 0.9, 0.95] {
                let x = f.quantile(p).unwrap();
                let p_back = f.cdf(x).unwrap();
                assert!(
                    (p_back - p).abs() < 1e-10,
                    "F roundtrip: p={p}, df1={df1}, df2={df2}, x={x}, p_back={p_back}"
                );
            }
        }
    }

    #[test]
    fn test_f_extreme_statistic() {
        // df1·f overflows; the tail is x^a/(a·B(a, b)) with x = 1/(1 + 1e309).
        let f = FisherF::new(1.0, 1e-3).unwrap();
        let v = f.sf(1e306).unwrap();
        assert!((v / 0.7001629865484621 - 1.0).abs() < 1e-12, "{v}");
        assert!((f.cdf(1e306).unwrap() + v - 1.0).abs() < 1e-12);

        let f = FisherF::new(4.0, 10.0).unwrap();
        assert_eq!(f.sf(f64::MAX).unwrap(), 0.0);
        assert_eq!(f.cdf(1e-320).unwrap(), 0.0);
    }

    #[test]
    fn test_f_invalid() {
        assert!(FisherF::new(-1.0, 5.0).is_err());
        assert!(FisherF::new(5.0, 0.0).is_err());
    }

    // --- ChiSquared ---

    #[test]
    fn test_chi2_exponential_special_case() {
        // Chi2(2): CDF(x) = 1 - exp(-x/2)
        let chi2 = ChiSquared::new(2.0).unwrap();
        for &x in &[1.0, 2.0, 5.0, 10.0] {
            let expected = 1.0 - (-x / 2.0_f64).exp();
            assert!((chi2.cdf(x).unwrap() - expected).abs() < 1e-13);
        }
    }

    #[test]
    fn test_chi2_tabulated_critical_values() {
        for &(df, crit) in &[(1.0, 3.841458821), (2.0, 5.991464547), (10.0, 18.30703805)] {
            let chi2 = ChiSquared::new(df).unwrap();
            assert!((chi2.sf(crit).unwrap() - 0.05).abs() < 1e-9, "df={df}");
            assert!((chi2.inverse_sf(0.05).unwrap() - crit).abs() < 1e-6, "df={df}");
        }
    }

    #[test]
    fn test_chi2_one_df_matches_normal() {
        // χ²(1) = Z², so P(χ² > z²) = 2·(1 − Φ(z))
        let chi2 = ChiSquared::new(1.0).unwrap();
        let z: f64 = 2.5;
        let two = Tail::Two.probability(z, |v| StandardNormal.sf(v)).unwrap();
        assert!((chi2.sf(z * z).unwrap() - two).abs() < 1e-14);
    }

    #[test]
    fn test_chi2_negative_variate() {
        let chi2 = ChiSquared::new(3.0).unwrap();
        assert_eq!(chi2.cdf(-1.0).unwrap(), 0.0);
        assert_eq!(chi2.sf(-1.0).unwrap(), 1.0);
    }

    #[test]
    fn test_chi2_invalid() {
        assert!(ChiSquared::new(0.0).is_err());
        assert!(ChiSquared::new(f64::NAN).is_err());
    }
}
