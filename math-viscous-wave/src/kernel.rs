//! Integrand of the radial inverse Fourier transform
//!
//! The fundamental solution is
//!
//! ```text
//! F(r, t) = ∫₀^∞ f(k; r, t) dk,   f = k²/(2π²) · sinc(kr) · T(k, t)
//! ```
//!
//! where `T(k, t)` is the temporal response of a single Fourier mode with
//! damping rate `a = c²k²/(2ω₀)`:
//!
//! - **Propagating** (`k < 2ω₀/c`): `T = e^{-at} sin(Ωt)/Ω`, `Ω = √(c²k² − a²)`
//! - **Evanescent** (`k > 2ω₀/c`): `T = (e^{-λ₋t} − e^{-λ₊t}) / (2Ω')`,
//!   `Ω' = √(a² − c²k²)`, `λ± = a ± Ω'`
//!
//! At the critical wavenumber itself the integrand is defined as zero.

use crate::params::PhysicalParameters;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

const INV_TWO_PI_SQ: f64 = 1.0 / (2.0 * PI * PI);

/// Unnormalized sinc, sin(x)/x with sinc(0) = 1
#[inline]
pub fn sinc(x: f64) -> f64 {
    if x == 0.0 { 1.0 } else { x.sin() / x }
}

/// Which side of the critical wavenumber a mode lies on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Regime {
    /// k < 2ω₀/c, damped oscillation
    Propagating,
    /// k == 2ω₀/c exactly
    Critical,
    /// k > 2ω₀/c, overdamped
    Evanescent,
}

/// Classify a (positive) wavenumber.
#[inline]
pub fn regime(k: f64, params: &PhysicalParameters) -> Regime {
    let k_crit = params.critical_wavenumber();
    if k < k_crit {
        Regime::Propagating
    } else if k > k_crit {
        Regime::Evanescent
    } else {
        Regime::Critical
    }
}

/// Temporal behaviour of one Fourier mode.
#[derive(Debug, Clone, Copy)]
enum Mode {
    Oscillatory {
        rate: f64,
        omega: f64,
    },
    Overdamped {
        /// λ₋ = a − Ω', computed as c²k²/(a + Ω')
        slow: f64,
        /// λ₊ = a + Ω'
        fast: f64,
        /// Ω'
        gap: f64,
    },
}

#[inline]
fn mode(k: f64, params: &PhysicalParameters) -> Option<Mode> {
    let a = params.damping_rate(k);
    let ck = params.wave_speed * k;
    match regime(k, params) {
        // the discriminants may round to zero or below next to k_crit
        Regime::Propagating => Some(Mode::Oscillatory {
            rate: a,
            omega: ((ck - a) * (ck + a)).max(0.0).sqrt(),
        }),
        Regime::Evanescent => {
            let gap = ((a - ck) * (a + ck)).max(0.0).sqrt();
            Some(Mode::Overdamped {
                slow: ck * ck / (a + gap),
                fast: a + gap,
                gap,
            })
        }
        Regime::Critical => None,
    }
}

/// (1 − e^{−2Ω't}) / (2Ω'), with its limit t at Ω' = 0
#[inline]
fn overdamped_spread(gap: f64, t: f64) -> f64 {
    if gap > 0.0 {
        -(-2.0 * gap * t).exp_m1() / (2.0 * gap)
    } else {
        t
    }
}

impl Mode {
    /// T(k, t)
    #[inline]
    fn response(self, t: f64) -> f64 {
        match self {
            Mode::Oscillatory { rate, omega } => (-rate * t).exp() * t * sinc(omega * t),
            Mode::Overdamped { slow, gap, .. } => (-slow * t).exp() * overdamped_spread(gap, t),
        }
    }

    /// ∂T/∂t
    #[inline]
    fn response_rate(self, t: f64) -> f64 {
        match self {
            Mode::Oscillatory { rate, omega } => {
                (-rate * t).exp() * ((omega * t).cos() - rate * t * sinc(omega * t))
            }
            Mode::Overdamped { slow, fast, gap } => {
                (-slow * t).exp() * (1.0 - fast * overdamped_spread(gap, t))
            }
        }
    }

    /// Bound on |T(k, t)|
    #[inline]
    fn amplitude(self, t: f64) -> f64 {
        match self {
            Mode::Oscillatory { rate, omega } => (-rate * t).exp() * t.min(omega.recip()),
            Mode::Overdamped { slow, gap, .. } => {
                (-slow * t).exp() * t.min((2.0 * gap).recip())
            }
        }
    }
}

/// k²/(2π²) · sinc(kr)
#[inline]
fn spatial_factor(k: f64, r: f64) -> f64 {
    k * k * INV_TWO_PI_SQ * sinc(k * r)
}

/// Bound on |k²/(2π²) · sinc(kr)|, i.e. min(k², k/r)/(2π²)
#[inline]
fn spatial_amplitude(k: f64, r: f64) -> f64 {
    let amp = if r * k <= 1.0 { k * k } else { k / r };
    amp * INV_TWO_PI_SQ
}

/// Integrand f(k; r, t) of the fundamental solution.
///
/// Returns 0 for t < 0 (causality), for k ≤ 0 and at the critical
/// wavenumber. Negative radii are folded onto |r|.
///
/// # Example
///
/// ```rust
/// use math_audio_viscous_wave::{PhysicalParameters, fundamental_integrand};
///
/// let params = PhysicalParameters::new(1.0, 1.0).unwrap();
/// assert_eq!(fundamental_integrand(0.5, 1.0, -1.0, &params), 0.0);
/// assert_eq!(
///     fundamental_integrand(0.5, -2.0, 1.0, &params),
///     fundamental_integrand(0.5, 2.0, 1.0, &params),
/// );
/// ```
#[inline]
pub fn fundamental_integrand(k: f64, r: f64, t: f64, params: &PhysicalParameters) -> f64 {
    if t < 0.0 || k <= 0.0 {
        return 0.0;
    }
    match mode(k, params) {
        Some(m) => spatial_factor(k, r.abs()) * m.response(t),
        None => 0.0,
    }
}

/// Integrand of ∂F/∂t, the source-normalized acoustic pressure.
///
/// Same guards as [`fundamental_integrand`]. Multiply the integral by
/// [`PhysicalParameters::pressure_scale`] to get a pressure.
#[inline]
pub fn pressure_integrand(k: f64, r: f64, t: f64, params: &PhysicalParameters) -> f64 {
    if t < 0.0 || k <= 0.0 {
        return 0.0;
    }
    match mode(k, params) {
        Some(m) => spatial_factor(k, r.abs()) * m.response_rate(t),
        None => 0.0,
    }
}

/// Envelope ε(k; r, t) ≥ |f(k; r, t)| with the oscillating factors dropped.
///
/// sin(kr) is replaced by its amplitude (giving min(k², k/r)) and the
/// temporal factor by its magnitude bound.
#[inline]
pub fn envelope(k: f64, r: f64, t: f64, params: &PhysicalParameters) -> f64 {
    if t < 0.0 || k <= 0.0 {
        return 0.0;
    }
    match mode(k, params) {
        Some(m) => spatial_amplitude(k, r.abs()) * m.amplitude(t),
        None => 0.0,
    }
}

/// Quantity integrated over wavenumber
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kernel {
    /// Fundamental solution F(r, t)
    #[default]
    Fundamental,
    /// Pressure p = (β c² E₀ / C_p) ∂F/∂t
    Pressure,
}

impl Kernel {
    /// Evaluate the selected integrand.
    #[inline]
    pub fn integrand(self, k: f64, r: f64, t: f64, params: &PhysicalParameters) -> f64 {
        match self {
            Kernel::Fundamental => fundamental_integrand(k, r, t, params),
            Kernel::Pressure => pressure_integrand(k, r, t, params),
        }
    }

    /// Factor applied to the integral
    pub fn scale(self, params: &PhysicalParameters) -> f64 {
        match self {
            Kernel::Fundamental => 1.0,
            Kernel::Pressure => params.pressure_scale(),
        }
    }

    /// Display name
    pub fn name(self) -> &'static str {
        match self {
            Kernel::Fundamental => "fundamental",
            Kernel::Pressure => "pressure",
        }
    }
}
