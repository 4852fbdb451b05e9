//! Envelope-based integration planning
//!
//! For an evaluation point (r, t) the integrand is truncated at a cutoff
//! wavenumber k₀ where the envelope has decayed to a relative level δ, and the
//! range [k_min, k₀] is split into enough subintervals to put `N_p` quadrature
//! samples in every period of the sin(kr) oscillation:
//!
//! ```text
//! k₀ = (2ω₀/c) √( 16π⁴c² e^{-2ω₀t} / (δ² r² t²) + 1 )
//! N  = (ω₀ r N_p)/(c π) · √( 16π⁴c² / (δ² r² t²) + 1 )
//! ```
//!
//! Points at r = 0 or t ≤ 0 short-circuit to a zero result instead of
//! dividing by r·t.

use crate::error::{Result, WaveError};
use crate::params::PhysicalParameters;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Default lower integration bound standing in for k → 0⁺
pub const DEFAULT_LOWER_BOUND: f64 = 1e-4;

/// Default cap on the number of subintervals of a single integral
pub const DEFAULT_MAX_SUBINTERVALS: usize = 100_000_000;

/// Accuracy and cost controls for the estimator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tolerances {
    /// Relative truncation tolerance δ in (0, 1)
    pub relative_error: f64,
    /// Quadrature samples per oscillation period N_p (> 0)
    pub samples_per_period: f64,
    /// Lower integration bound k_min (> 0)
    #[serde(default = "default_lower_bound")]
    pub lower_bound: f64,
    /// Largest subinterval count accepted for one integral
    #[serde(default = "default_max_subintervals")]
    pub max_subintervals: usize,
    /// How N is derived
    #[serde(default)]
    pub subinterval_policy: SubintervalPolicy,
}

/// Formula used for the subinterval count
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubintervalPolicy {
    /// N = (ω₀ r N_p)/(c π) · √(16π⁴c²/(δ² r² t²) + 1)
    #[default]
    Literal,
    /// N = k₀ r N_p / (2π): N_p samples per sin(kr) period up to k₀
    FromCutoff,
}

impl SubintervalPolicy {
    /// Display name
    pub fn name(self) -> &'static str {
        match self {
            SubintervalPolicy::Literal => "literal",
            SubintervalPolicy::FromCutoff => "from_cutoff",
        }
    }
}

fn default_lower_bound() -> f64 {
    DEFAULT_LOWER_BOUND
}

fn default_max_subintervals() -> usize {
    DEFAULT_MAX_SUBINTERVALS
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            relative_error: 1e-2,
            samples_per_period: 10.0,
            lower_bound: DEFAULT_LOWER_BOUND,
            max_subintervals: DEFAULT_MAX_SUBINTERVALS,
            subinterval_policy: SubintervalPolicy::Literal,
        }
    }
}

impl Tolerances {
    /// Tolerances with the given δ and N_p, other fields at their defaults.
    pub fn new(relative_error: f64, samples_per_period: f64) -> Self {
        Self {
            relative_error,
            samples_per_period,
            ..Self::default()
        }
    }

    /// Sets the lower integration bound.
    pub fn lower_bound(mut self, v: f64) -> Self {
        self.lower_bound = v;
        self
    }

    /// Sets the subinterval cap.
    pub fn max_subintervals(mut self, v: usize) -> Self {
        self.max_subintervals = v;
        self
    }

    /// Sets the subinterval formula.
    pub fn subinterval_policy(mut self, v: SubintervalPolicy) -> Self {
        self.subinterval_policy = v;
        self
    }

    /// Reject out-of-range values without clamping.
    pub fn validate(&self) -> Result<()> {
        let delta = self.relative_error;
        if !(delta.is_finite() && delta > 0.0 && delta < 1.0) {
            return Err(WaveError::InvalidTolerance {
                name: "relative_error",
                value: delta,
                expected: "must be in (0, 1)",
            });
        }
        let n_p = self.samples_per_period;
        if !(n_p.is_finite() && n_p > 0.0) {
            return Err(WaveError::InvalidTolerance {
                name: "samples_per_period",
                value: n_p,
                expected: "must be finite and > 0",
            });
        }
        let k_min = self.lower_bound;
        if !(k_min.is_finite() && k_min > 0.0) {
            return Err(WaveError::InvalidTolerance {
                name: "lower_bound",
                value: k_min,
                expected: "must be finite and > 0",
            });
        }
        if self.max_subintervals == 0 {
            return Err(WaveError::InvalidTolerance {
                name: "max_subintervals",
                value: 0.0,
                expected: "must be >= 1",
            });
        }
        Ok(())
    }
}

/// Cutoff wavenumber k₀ beyond which the envelope is below δ.
///
/// Raw formula: infinite for r·t = 0. Use [`plan`] for guarded evaluation.
pub fn cutoff_wavenumber(r: f64, t: f64, delta: f64, params: &PhysicalParameters) -> f64 {
    let c = params.wave_speed;
    let w0 = params.damping_frequency;
    let pi4 = PI.powi(4);
    let ratio = 16.0 * pi4 * c * c / (delta * delta * r * r * t * t);
    params.critical_wavenumber() * (ratio * (-2.0 * w0 * t).exp() + 1.0).sqrt()
}

/// Fractional subinterval count before rounding.
///
/// Raw formula: undefined for r·t = 0. Use [`plan`] for guarded evaluation.
pub fn subinterval_estimate(
    r: f64,
    t: f64,
    delta: f64,
    samples_per_period: f64,
    params: &PhysicalParameters,
) -> f64 {
    let c = params.wave_speed;
    let w0 = params.damping_frequency;
    let pi4 = PI.powi(4);
    let ratio = 16.0 * pi4 * c * c / (delta * delta * r * r * t * t);
    w0 * r * samples_per_period / (c * PI) * (ratio + 1.0).sqrt()
}

/// Subintervals putting `samples_per_period` samples in each period 2π/r
/// of sin(kr) up to `cutoff`.
///
/// Equals [`subinterval_estimate`] with the e^{-2ω₀t} factor of k₀ kept.
pub fn subinterval_estimate_from_cutoff(r: f64, cutoff: f64, samples_per_period: f64) -> f64 {
    cutoff * r * samples_per_period / (2.0 * PI)
}

/// Why an evaluation point is zero without integrating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZeroReason {
    /// t < 0
    BeforeSource,
    /// t = 0
    AtSourceTime,
    /// r = 0
    AtOrigin,
    /// k₀ ≤ k_min
    EmptyRange,
}

/// Integration range and subdivision for one evaluation point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntegrationPlan {
    /// k_min
    pub lower_bound: f64,
    /// k₀
    pub upper_bound: f64,
    /// N ≥ 1
    pub subintervals: usize,
}

impl IntegrationPlan {
    /// Width of one subinterval
    pub fn step(&self) -> f64 {
        (self.upper_bound - self.lower_bound) / self.subintervals as f64
    }
}

/// Result of planning one evaluation point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PlanOutcome {
    /// Integrate over the plan's range
    Integrate(IntegrationPlan),
    /// The value is zero by definition
    Zero(ZeroReason),
}

impl PlanOutcome {
    /// The integration plan, if any
    pub fn plan(&self) -> Option<&IntegrationPlan> {
        match self {
            PlanOutcome::Integrate(plan) => Some(plan),
            PlanOutcome::Zero(_) => None,
        }
    }

    /// True when no integration is needed
    pub fn is_zero(&self) -> bool {
        matches!(self, PlanOutcome::Zero(_))
    }
}

/// Plan the integral for the evaluation point (r, t).
///
/// # Errors
///
/// - `InvalidParameter` / `InvalidTolerance` for out-of-range inputs
/// - `InvalidGrid` if r or t is not finite
/// - `SubintervalLimit` if the estimate is non-finite or above
///   `tolerances.max_subintervals`
///
/// # Example
///
/// ```rust
/// use math_audio_viscous_wave::{PhysicalParameters, Tolerances, PlanOutcome, ZeroReason, plan};
///
/// let params = PhysicalParameters::new(1.0, 1.0).unwrap();
/// let tol = Tolerances::new(1e-2, 10.0);
///
/// assert_eq!(plan(0.0, 1.0, &tol, &params).unwrap(), PlanOutcome::Zero(ZeroReason::AtOrigin));
///
/// let outcome = plan(1.0, 1.0, &tol, &params).unwrap();
/// assert!(outcome.plan().unwrap().subintervals >= 1);
/// ```
pub fn plan(
    r: f64,
    t: f64,
    tolerances: &Tolerances,
    params: &PhysicalParameters,
) -> Result<PlanOutcome> {
    params.validate()?;
    tolerances.validate()?;
    if !r.is_finite() || !t.is_finite() {
        return Err(WaveError::InvalidGrid {
            axis: if r.is_finite() { "time" } else { "radius" },
            reason: format!("non-finite evaluation point (r={r}, t={t})"),
        });
    }

    if t < 0.0 {
        return Ok(PlanOutcome::Zero(ZeroReason::BeforeSource));
    }
    if t == 0.0 {
        return Ok(PlanOutcome::Zero(ZeroReason::AtSourceTime));
    }
    let r = r.abs();
    if r == 0.0 {
        return Ok(PlanOutcome::Zero(ZeroReason::AtOrigin));
    }

    let delta = tolerances.relative_error;
    let k0 = cutoff_wavenumber(r, t, delta, params);
    if !k0.is_finite() {
        return Err(WaveError::SubintervalLimit {
            r,
            t,
            requested: f64::INFINITY,
            limit: tolerances.max_subintervals,
        });
    }
    if k0 <= tolerances.lower_bound {
        return Ok(PlanOutcome::Zero(ZeroReason::EmptyRange));
    }

    let n_p = tolerances.samples_per_period;
    let n = match tolerances.subinterval_policy {
        SubintervalPolicy::Literal => subinterval_estimate(r, t, delta, n_p, params),
        SubintervalPolicy::FromCutoff => subinterval_estimate_from_cutoff(r, k0, n_p),
    };
    if !n.is_finite() || n > tolerances.max_subintervals as f64 {
        return Err(WaveError::SubintervalLimit {
            r,
            t,
            requested: n,
            limit: tolerances.max_subintervals,
        });
    }

    Ok(PlanOutcome::Integrate(IntegrationPlan {
        lower_bound: tolerances.lower_bound,
        upper_bound: k0,
        subintervals: (n.ceil() as usize).max(1),
    }))
}
