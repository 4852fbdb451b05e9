//! Field sampler: F(r, t) on radius and time grids
//!
//! Every grid point is planned with [`crate::plan::plan`] and integrated with
//! [`crate::quadrature`]. Points are independent, so sweeps are mapped over
//! rayon workers when the `parallel` feature is enabled; each result lands at
//! its pre-assigned index.
//!
//! ## Layout
//!
//! - radius sweep: `Array1` of length `radii.len()`
//! - time × radius sweep: `Array2` of shape `(times.len(), radii.len())`,
//!   time-major rows, radius-minor columns

use crate::cancel::CancellationToken;
use crate::error::{Result, WaveError};
use crate::kernel::Kernel;
use crate::parallel::parallel_try_map_indexed;
use crate::params::PhysicalParameters;
use crate::plan::{PlanOutcome, Tolerances, plan};
use crate::quadrature::{QuadratureRule, integrate_cancellable};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

/// `n` evenly spaced values from `min` to `max` inclusive
///
/// `n == 1` gives `[min]`, `n == 0` an empty vector.
pub fn linspace(min: f64, max: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![min],
        _ => {
            let step = (max - min) / (n - 1) as f64;
            (0..n)
                .map(|i| if i == n - 1 { max } else { min + i as f64 * step })
                .collect()
        }
    }
}

/// Evenly spaced axis of a sampling grid
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisGrid {
    /// First value
    pub min: f64,
    /// Last value
    pub max: f64,
    /// Number of values (≥ 1)
    pub points: usize,
}

impl AxisGrid {
    /// Create an axis
    pub fn new(min: f64, max: f64, points: usize) -> Self {
        Self { min, max, points }
    }

    /// Check the bounds are finite and ordered and `points >= 1`
    pub fn validate(&self, axis: &'static str) -> Result<()> {
        if self.points == 0 {
            return Err(WaveError::InvalidGrid {
                axis,
                reason: "needs at least one point".to_string(),
            });
        }
        if !self.min.is_finite() || !self.max.is_finite() {
            return Err(WaveError::InvalidGrid {
                axis,
                reason: format!("non-finite bounds [{}, {}]", self.min, self.max),
            });
        }
        if self.min > self.max {
            return Err(WaveError::InvalidGrid {
                axis,
                reason: format!("min {} > max {}", self.min, self.max),
            });
        }
        Ok(())
    }

    /// Grid values
    pub fn values(&self) -> Vec<f64> {
        linspace(self.min, self.max, self.points)
    }
}

/// Sweep progress passed to the callback after each grid point
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    /// Grid points finished so far
    pub completed: usize,
    /// Grid points in the sweep
    pub total: usize,
}

impl Progress {
    /// Completed fraction in [0, 1]
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            self.completed as f64 / self.total as f64
        }
    }
}

/// Progress callback; may be called from several worker threads.
pub type ProgressFn<'a> = dyn Fn(Progress) + Sync + 'a;

/// Value at one evaluation point together with how it was obtained
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointValue {
    /// Integrated (and scaled) value
    pub value: f64,
    /// Plan used, or the reason the value is zero
    pub outcome: PlanOutcome,
}

/// Plan statistics of a sweep, computed without integrating
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepSummary {
    /// Number of grid points
    pub points: usize,
    /// Points evaluating to zero without integration
    pub degenerate_points: usize,
    /// Smallest and largest radius
    pub radius_range: Option<(f64, f64)>,
    /// Smallest and largest time
    pub time_range: Option<(f64, f64)>,
    /// Smallest and largest cutoff wavenumber k₀
    pub cutoff_range: Option<(f64, f64)>,
    /// Largest subinterval count of a single point
    pub max_subintervals: usize,
    /// Subintervals over the whole sweep
    pub total_subintervals: u64,
    /// Integrand evaluations over the whole sweep
    pub total_evaluations: u64,
}

fn range_of(values: &[f64]) -> Option<(f64, f64)> {
    values.iter().fold(None, |acc, &v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

/// Drives planning and quadrature over grids of evaluation points.
///
/// # Example
///
/// ```rust
/// use math_audio_viscous_wave::{FieldSampler, PhysicalParameters, Tolerances, linspace};
///
/// let params = PhysicalParameters::new(1.0, 1.0).unwrap();
/// let sampler = FieldSampler::new(params, Tolerances::new(0.05, 4.0)).unwrap();
///
/// let radii = linspace(0.0, 2.0, 5);
/// let times = linspace(0.0, 1.0, 3);
/// let field = sampler.sample_field(&times, &radii, None).unwrap();
/// assert_eq!(field.dim(), (3, 5));
/// // r = 0 and t = 0 are defined as zero
/// assert_eq!(field[[0, 2]], 0.0);
/// assert_eq!(field[[1, 0]], 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct FieldSampler {
    params: PhysicalParameters,
    tolerances: Tolerances,
    kernel: Kernel,
    rule: QuadratureRule,
    parallel: bool,
    token: CancellationToken,
}

impl FieldSampler {
    /// Sampler with the default kernel and rule, parallel when available.
    pub fn new(params: PhysicalParameters, tolerances: Tolerances) -> Result<Self> {
        params.validate()?;
        tolerances.validate()?;
        Ok(Self {
            params,
            tolerances,
            kernel: Kernel::default(),
            rule: QuadratureRule::default(),
            parallel: true,
            token: CancellationToken::new(),
        })
    }

    /// Sets the integrated quantity.
    pub fn kernel(mut self, kernel: Kernel) -> Self {
        self.kernel = kernel;
        self
    }

    /// Sets the quadrature evaluation order.
    pub fn rule(mut self, rule: QuadratureRule) -> Self {
        self.rule = rule;
        self
    }

    /// Enables/disables parallel sweeps.
    pub fn parallel(mut self, enabled: bool) -> Self {
        self.parallel = enabled;
        self
    }

    /// Sets the token polled between grid points and subinterval blocks.
    pub fn cancellation(mut self, token: CancellationToken) -> Self {
        self.token = token;
        self
    }

    /// Physical parameters in use
    pub fn params(&self) -> &PhysicalParameters {
        &self.params
    }

    /// Tolerances in use
    pub fn tolerances(&self) -> &Tolerances {
        &self.tolerances
    }

    /// Evaluate a single point.
    pub fn evaluate(&self, r: f64, t: f64) -> Result<PointValue> {
        let outcome = plan(r, t, &self.tolerances, &self.params)?;
        let value = match outcome {
            PlanOutcome::Zero(_) => 0.0,
            PlanOutcome::Integrate(p) => {
                let params = self.params;
                let kernel = self.kernel;
                let r = r.abs();
                let integral = integrate_cancellable(
                    |k| kernel.integrand(k, r, t, &params),
                    p.lower_bound,
                    p.upper_bound,
                    p.subintervals,
                    self.rule,
                    &self.token,
                )?;
                integral * kernel.scale(&params)
            }
        };
        Ok(PointValue { value, outcome })
    }

    /// F(r, t) for every radius at a fixed time.
    pub fn sample_radial(
        &self,
        radii: &[f64],
        t: f64,
        progress: Option<&ProgressFn<'_>>,
    ) -> Result<Array1<f64>> {
        let values = self.sweep(radii.len(), progress, |i| {
            self.evaluate(radii[i], t).map(|v| v.value)
        })?;
        Ok(Array1::from_vec(values))
    }

    /// F(r, t) on the time × radius grid, shape `(times.len(), radii.len())`.
    pub fn sample_field(
        &self,
        times: &[f64],
        radii: &[f64],
        progress: Option<&ProgressFn<'_>>,
    ) -> Result<Array2<f64>> {
        let n_r = radii.len();
        let values = self.sweep(times.len() * n_r, progress, |i| {
            self.evaluate(radii[i % n_r], times[i / n_r]).map(|v| v.value)
        })?;
        Array2::from_shape_vec((times.len(), n_r), values).map_err(|e| WaveError::InvalidGrid {
            axis: "time",
            reason: e.to_string(),
        })
    }

    /// Plan every grid point and collect statistics, without integrating.
    ///
    /// Fails with the same errors the sweep itself would hit while planning.
    pub fn summarize(&self, times: &[f64], radii: &[f64]) -> Result<SweepSummary> {
        let mut summary = SweepSummary {
            points: times.len() * radii.len(),
            degenerate_points: 0,
            radius_range: range_of(radii),
            time_range: range_of(times),
            cutoff_range: None,
            max_subintervals: 0,
            total_subintervals: 0,
            total_evaluations: 0,
        };
        let mut cutoffs = Vec::new();
        for &t in times {
            for &r in radii {
                match plan(r, t, &self.tolerances, &self.params)? {
                    PlanOutcome::Zero(_) => summary.degenerate_points += 1,
                    PlanOutcome::Integrate(p) => {
                        cutoffs.push(p.upper_bound);
                        summary.max_subintervals = summary.max_subintervals.max(p.subintervals);
                        summary.total_subintervals += p.subintervals as u64;
                        summary.total_evaluations += self.rule.evaluations(p.subintervals) as u64;
                    }
                }
            }
        }
        summary.cutoff_range = range_of(&cutoffs);
        Ok(summary)
    }

    fn sweep<F>(
        &self,
        total: usize,
        progress: Option<&ProgressFn<'_>>,
        eval: F,
    ) -> Result<Vec<f64>>
    where
        F: Fn(usize) -> Result<f64> + Sync + Send,
    {
        let start = Instant::now();
        let completed = AtomicUsize::new(0);
        log::info!(
            "Sampling {} points ({} kernel, {} rule, {})",
            total,
            self.kernel.name(),
            self.rule.name(),
            if self.parallel { "parallel" } else { "sequential" }
        );

        let run_one = |i: usize| -> Result<f64> {
            if self.token.is_cancelled() {
                return Err(WaveError::Cancelled {
                    completed: completed.load(Ordering::Relaxed),
                    total,
                });
            }
            let value = eval(i)?;
            let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
            if let Some(callback) = progress {
                callback(Progress {
                    completed: done,
                    total,
                });
            }
            Ok(value)
        };

        let values = if self.parallel {
            parallel_try_map_indexed(total, run_one)
        } else {
            (0..total).map(run_one).collect()
        };

        match &values {
            Ok(_) => log::info!(
                "Sampled {} points in {:.3}s",
                total,
                start.elapsed().as_secs_f64()
            ),
            Err(e) => log::warn!("Sweep stopped: {}", e),
        }
        values
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::sync::Mutex;

    fn sampler() -> FieldSampler {
        let params = PhysicalParameters::new(1.0, 1.0).unwrap();
        FieldSampler::new(params, Tolerances::new(0.05, 4.0)).unwrap()
    }

    #[test]
    fn test_linspace() {
        assert!(linspace(0.0, 1.0, 0).is_empty());
        assert_eq!(linspace(2.0, 5.0, 1), vec![2.0]);
        let v = linspace(0.0, 1.0, 5);
        assert_eq!(v, vec![0.0, 0.25, 0.5, 0.75, 1.0]);
        assert_eq!(*linspace(0.1, 0.7, 7).last().unwrap(), 0.7);
    }

    #[test]
    fn test_axis_validation() {
        assert!(AxisGrid::new(0.0, 1.0, 3).validate("radius").is_ok());
        assert!(AxisGrid::new(0.0, 1.0, 0).validate("radius").is_err());
        assert!(AxisGrid::new(2.0, 1.0, 3).validate("time").is_err());
        let err = AxisGrid::new(0.0, f64::NAN, 3).validate("time").unwrap_err();
        assert!(err.to_string().starts_with("invalid time grid"));
    }

    #[test]
    fn test_grid_shapes() {
        let s = sampler();
        let radii = linspace(0.0, 1.0, 4);
        let times = linspace(0.0, 1.0, 3);
        assert_eq!(s.sample_radial(&radii, 0.5, None).unwrap().len(), 4);
        assert_eq!(s.sample_field(&times, &radii, None).unwrap().dim(), (3, 4));
        assert_eq!(s.sample_field(&[], &radii, None).unwrap().dim(), (0, 4));
        assert_eq!(s.sample_field(&times, &[], None).unwrap().dim(), (3, 0));
    }

    #[test]
    fn test_boundary_points_are_zero() {
        let s = sampler();
        let radii = linspace(0.0, 1.0, 3);
        let times = linspace(-0.5, 1.0, 4);
        let field = s.sample_field(&times, &radii, None).unwrap();
        for j in 0..radii.len() {
            // t = -0.5 and t = 0
            assert_eq!(field[[0, j]], 0.0);
            assert_eq!(field[[1, j]], 0.0);
        }
        for i in 0..times.len() {
            assert_eq!(field[[i, 0]], 0.0);
        }
        assert!(field[[3, 2]].is_finite());
    }

    #[test]
    fn test_field_is_time_major() {
        let s = sampler().parallel(false);
        let radii = [0.5, 1.0];
        let times = [0.5, 1.5];
        let field = s.sample_field(&times, &radii, None).unwrap();
        for (i, &t) in times.iter().enumerate() {
            for (j, &r) in radii.iter().enumerate() {
                assert_eq!(field[[i, j]], s.evaluate(r, t).unwrap().value);
            }
        }
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let radii = linspace(0.1, 2.0, 6);
        let times = linspace(0.2, 1.0, 3);
        let seq = sampler().parallel(false).sample_field(&times, &radii, None).unwrap();
        let par = sampler().parallel(true).sample_field(&times, &radii, None).unwrap();
        assert_eq!(seq, par);
    }

    #[test]
    fn test_negative_radius_matches_positive() {
        let s = sampler();
        let a = s.evaluate(-0.7, 0.9).unwrap();
        let b = s.evaluate(0.7, 0.9).unwrap();
        assert_eq!(a.value, b.value);
        assert_eq!(a.outcome, b.outcome);
    }

    #[test]
    fn test_progress_reports_every_point() {
        let s = sampler();
        let seen = Mutex::new(Vec::new());
        let callback = |p: Progress| seen.lock().unwrap().push(p);
        let radii = linspace(0.0, 1.0, 5);
        s.sample_radial(&radii, 0.5, Some(&callback)).unwrap();

        let mut seen = seen.into_inner().unwrap();
        seen.sort_by_key(|p| p.completed);
        assert_eq!(seen.len(), 5);
        assert!(seen.iter().all(|p| p.total == 5));
        assert_eq!(seen.last().unwrap().completed, 5);
        assert_relative_eq!(seen.last().unwrap().fraction(), 1.0);
    }

    #[test]
    fn test_cancelled_sweep() {
        let token = CancellationToken::new();
        token.cancel();
        let s = sampler().cancellation(token);
        let err = s
            .sample_radial(&linspace(0.1, 1.0, 10), 0.5, None)
            .unwrap_err();
        assert!(err.is_cancelled());
    }

    #[test]
    fn test_summary() {
        let s = sampler();
        let radii = linspace(0.0, 1.0, 3);
        let times = linspace(0.0, 1.0, 3);
        let summary = s.summarize(&times, &radii).unwrap();
        assert_eq!(summary.points, 9);
        // t = 0 row and r = 0 column: 3 + 3 - 1
        assert_eq!(summary.degenerate_points, 5);
        assert_eq!(summary.radius_range, Some((0.0, 1.0)));
        let (k_lo, k_hi) = summary.cutoff_range.unwrap();
        assert!(k_lo <= k_hi);
        assert!(k_lo >= s.params().critical_wavenumber());
        assert!(summary.total_subintervals >= 4);
        assert_eq!(summary.total_evaluations, summary.total_subintervals * 2 + 4);
    }

    #[test]
    fn test_pressure_kernel_scaled() {
        use crate::params::SourceTerms;
        let source = SourceTerms {
            thermal_expansion: 2.0,
            deposited_energy: 1.0,
            specific_heat: 1.0,
            density: 1.0,
            temperature: 1.0,
            source_width: 1.0,
        };
        let params = PhysicalParameters::new(1.0, 1.0)
            .unwrap()
            .with_source(source)
            .unwrap();
        let tol = Tolerances::new(0.05, 4.0);
        let plain = FieldSampler::new(PhysicalParameters::new(1.0, 1.0).unwrap(), tol)
            .unwrap()
            .kernel(Kernel::Pressure);
        let scaled = FieldSampler::new(params, tol).unwrap().kernel(Kernel::Pressure);
        let a = plain.evaluate(1.0, 0.8).unwrap().value;
        let b = scaled.evaluate(1.0, 0.8).unwrap().value;
        assert_relative_eq!(b, 2.0 * a, max_relative = 1e-12);
    }
}
