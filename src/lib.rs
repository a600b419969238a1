//! # u-metacalc
//!
//! Statistical conversions for meta-analysis.
//!
//! Turns the statistics a study reports (t, F, χ², Z, p-values, variances)
//! into effect sizes (correlation, Hedges' g, Cohen's d, Fisher's Z) and
//! back. Every conversion is a pure function of its inputs; the crate has
//! no state and performs no I/O.
//!
//! ## Modules
//!
//! - [`special`]: ln Γ, regularized incomplete beta and gamma, erfc
//! - [`distributions`]: standard normal, Student's t, F and χ²
//! - [`convert`]: the conversion formulas as typed functions
//! - [`params`]: input domains and labels for front ends
//! - [`catalog`]: the static registry of conversions
//! - [`evaluate`]: lookup, validation and dispatch by id
//! - [`error`]: error types
//!
//! ## Usage
//!
//! ```
//! use u_metacalc::{evaluate, parameters_for};
//!
//! let labels: Vec<_> = parameters_for("t_to_two_tailed_p")
//!     .unwrap()
//!     .iter()
//!     .map(|p| p.label)
//!     .collect();
//! assert_eq!(labels, ["t-Statistic [DF]", "Degrees of Freedom"]);
//!
//! let p = evaluate("t_to_two_tailed_p", &[2.0, 10.0]).unwrap();
//! assert!((p - 0.073388).abs() < 1e-6);
//! ```
//!
//! ## Design Philosophy
//!
//! - **Accurate tails**: upper-tail probabilities are computed directly,
//!   never as `1 − cdf`, so p-values far below machine epsilon survive
//! - **Validated inputs**: domains are checked before any formula runs
//! - **Property-based testing**: inverse pairs and monotonicity verified via proptest

pub mod catalog;
pub mod convert;
pub mod distributions;
pub mod error;
pub mod evaluate;
pub mod params;
pub mod special;

pub use catalog::{conversion, ConversionSpec};
pub use error::{DistributionError, EvalError};
pub use evaluate::{evaluate, list_conversions, parameters_for, summaries, ConversionSummary};
pub use params::{Domain, ParameterSpec};
