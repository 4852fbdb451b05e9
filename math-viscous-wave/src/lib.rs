//! Fundamental solution of the viscous acoustic wave equation
//!
//! This crate evaluates the response of a viscous (Stokes-damped) acoustic
//! medium to an instantaneous point source,
//!
//! ```text
//! ∂²F/∂t² − c²∇²F − (c²/ω₀) ∇²∂F/∂t = δ(x) δ(t)
//! ```
//!
//! as the radial inverse Fourier integral F(r, t) = ∫₀^∞ f(k; r, t) dk. The
//! integrand oscillates, is singular-looking at k → 0 and changes form at the
//! critical wavenumber 2ω₀/c; the integral is truncated where an envelope
//! bound has decayed and evaluated with a composite Simpson rule. It is used
//! to model the acoustic signal of particle energy deposits in liquid xenon.
//!
//! # Features
//!
//! - **Integrand**: propagating/evanescent kernel, envelope and pressure kernel
//! - **Planning**: cutoff wavenumber and subinterval count from (δ, N_p)
//! - **Quadrature**: three-point composite rule, cancellable
//! - **Sampling**: radius and time × radius grids, parallel with rayon
//! - **Configuration**: JSON sweep files and JSON output
//!
//! # Example
//!
//! ```rust
//! use math_audio_viscous_wave::{FieldSampler, PhysicalParameters, Tolerances, linspace};
//!
//! let params = PhysicalParameters::new(1.0, 1.0).unwrap();
//! let sampler = FieldSampler::new(params, Tolerances::new(0.05, 4.0)).unwrap();
//!
//! let radii = linspace(0.25, 2.0, 8);
//! let profile = sampler.sample_radial(&radii, 1.0, None).unwrap();
//! assert_eq!(profile.len(), 8);
//! assert!(profile.iter().all(|v| v.is_finite()));
//! ```

pub mod cancel;
pub mod config;
pub mod error;
pub mod kernel;
pub mod output;
pub mod parallel;
pub mod params;
pub mod plan;
pub mod quadrature;
pub mod sampler;

pub use cancel::CancellationToken;
pub use config::{MetadataConfig, SweepConfig, TimeConfig, default_config};
pub use error::{Result, WaveError};
pub use kernel::{Kernel, Regime, envelope, fundamental_integrand, pressure_integrand, regime};
pub use output::{FieldResult, create_output_json, print_sweep_summary, sweep_summary_text};
pub use params::{PhysicalParameters, SourceTerms};
pub use plan::{
    IntegrationPlan, PlanOutcome, SubintervalPolicy, Tolerances, ZeroReason, cutoff_wavenumber,
    plan, subinterval_estimate, subinterval_estimate_from_cutoff,
};
pub use quadrature::{
    QuadratureRule, integrate, integrate_cancellable, simpson_independent, simpson_shared,
};
pub use sampler::{
    AxisGrid, FieldSampler, PointValue, Progress, ProgressFn, SweepSummary, linspace,
};

/// Library version
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
