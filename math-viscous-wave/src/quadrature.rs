//! Composite three-point quadrature
//!
//! [a, b] is split into `n` equal subintervals of width Δx and Simpson's rule
//! Δx/6 · (g(x) + 4 g(x + Δx/2) + g(x + Δx)) is applied on each one. Two
//! equivalent evaluation orders are provided:
//!
//! - [`QuadratureRule::Independent`] evaluates both endpoints of every
//!   subinterval (3n evaluations)
//! - [`QuadratureRule::Shared`] reuses interior endpoints, i.e. textbook
//!   composite Simpson with weights 1-4-2-4-…-4-1 (2n + 1 evaluations)
//!
//! The subinterval count is always supplied by the caller; nothing here is
//! adaptive.

use crate::cancel::CancellationToken;
use crate::error::{Result, WaveError};
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Subintervals integrated between two polls of the cancellation token
pub const CANCEL_CHECK_STRIDE: usize = 1 << 16;

/// Order in which the three-point rule is evaluated
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuadratureRule {
    /// Every subinterval evaluated on its own
    Independent,
    /// Endpoints shared between neighbouring subintervals
    #[default]
    Shared,
}

impl QuadratureRule {
    /// Integrand evaluations needed for `n` subintervals
    pub fn evaluations(self, n: usize) -> usize {
        if n == 0 {
            return 0;
        }
        match self {
            QuadratureRule::Independent => 3 * n,
            QuadratureRule::Shared => 2 * n + 1,
        }
    }

    /// Display name
    pub fn name(self) -> &'static str {
        match self {
            QuadratureRule::Independent => "independent",
            QuadratureRule::Shared => "shared",
        }
    }
}

#[inline]
fn node(a: f64, b: f64, dx: f64, i: usize, n: usize) -> f64 {
    if i == n { b } else { a + i as f64 * dx }
}

/// Σ over subintervals `range` of g(xᵢ) + 4 g(mᵢ) + g(xᵢ₊₁), without Δx/6.
///
/// With the shared rule the block endpoints carry weight 1, so consecutive
/// blocks add up to the weight 2 of an interior node.
fn block_sum<F>(g: &F, a: f64, b: f64, n: usize, range: Range<usize>, rule: QuadratureRule) -> f64
where
    F: Fn(f64) -> f64,
{
    let dx = (b - a) / n as f64;
    let half = 0.5 * dx;
    match rule {
        QuadratureRule::Independent => {
            let mut sum = 0.0;
            for i in range {
                let x = node(a, b, dx, i, n);
                sum += g(x) + 4.0 * g(x + half) + g(node(a, b, dx, i + 1, n));
            }
            sum
        }
        QuadratureRule::Shared => {
            let (start, end) = (range.start, range.end);
            if start >= end {
                return 0.0;
            }
            let mut mids = 0.0;
            for i in start..end {
                mids += g(node(a, b, dx, i, n) + half);
            }
            let mut inner = 0.0;
            for i in start + 1..end {
                inner += g(node(a, b, dx, i, n));
            }
            g(node(a, b, dx, start, n)) + g(node(a, b, dx, end, n)) + 4.0 * mids + 2.0 * inner
        }
    }
}

/// Integrate `g` over [a, b] with `n` subintervals.
///
/// Returns 0 when `n == 0` or `a == b`.
///
/// # Example
///
/// ```rust
/// use math_audio_viscous_wave::{QuadratureRule, integrate};
///
/// let value = integrate(|x| x * x, 0.0, 3.0, 4, QuadratureRule::Shared);
/// assert!((value - 9.0).abs() < 1e-12);
/// ```
pub fn integrate<F>(g: F, a: f64, b: f64, n: usize, rule: QuadratureRule) -> f64
where
    F: Fn(f64) -> f64,
{
    if n == 0 || a == b {
        return 0.0;
    }
    let dx = (b - a) / n as f64;
    block_sum(&g, a, b, n, 0..n, rule) * dx / 6.0
}

/// Simpson's rule applied independently on each subinterval (3n evaluations).
pub fn simpson_independent<F>(g: F, a: f64, b: f64, n: usize) -> f64
where
    F: Fn(f64) -> f64,
{
    integrate(g, a, b, n, QuadratureRule::Independent)
}

/// Composite Simpson with shared endpoints (2n + 1 evaluations).
pub fn simpson_shared<F>(g: F, a: f64, b: f64, n: usize) -> f64
where
    F: Fn(f64) -> f64,
{
    integrate(g, a, b, n, QuadratureRule::Shared)
}

/// [`integrate`] that polls `token` every [`CANCEL_CHECK_STRIDE`] subintervals.
///
/// # Errors
///
/// `WaveError::Cancelled` with the number of subintervals already summed.
pub fn integrate_cancellable<F>(
    g: F,
    a: f64,
    b: f64,
    n: usize,
    rule: QuadratureRule,
    token: &CancellationToken,
) -> Result<f64>
where
    F: Fn(f64) -> f64,
{
    if n == 0 || a == b {
        return Ok(0.0);
    }
    let dx = (b - a) / n as f64;
    let mut sum = 0.0;
    let mut start = 0;
    while start < n {
        if token.is_cancelled() {
            return Err(WaveError::Cancelled {
                completed: start,
                total: n,
            });
        }
        let end = (start + CANCEL_CHECK_STRIDE).min(n);
        sum += block_sum(&g, a, b, n, start..end, rule);
        start = end;
    }
    Ok(sum * dx / 6.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::cell::Cell;
    use std::f64::consts::PI;

    #[test]
    fn test_cubic_is_exact() {
        // ∫₀² (x³ − 2x + 1) dx = 2
        let g = |x: f64| x * x * x - 2.0 * x + 1.0;
        for n in [1, 2, 7, 50] {
            assert_relative_eq!(simpson_independent(g, 0.0, 2.0, n), 2.0, epsilon = 1e-12);
            assert_relative_eq!(simpson_shared(g, 0.0, 2.0, n), 2.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_degenerate_inputs() {
        assert_eq!(simpson_shared(|x| x, 0.0, 1.0, 0), 0.0);
        assert_eq!(simpson_independent(|x| x, 0.0, 1.0, 0), 0.0);
        assert_eq!(simpson_shared(|_| 1.0, 2.0, 2.0, 10), 0.0);
    }

    #[test]
    fn test_reversed_bounds_flip_sign() {
        let forward = simpson_shared(f64::exp, 0.0, 1.0, 16);
        let backward = simpson_shared(f64::exp, 1.0, 0.0, 16);
        assert_relative_eq!(forward, -backward, epsilon = 1e-14);
    }

    #[test]
    fn test_rules_agree() {
        let g = |x: f64| (3.0 * x).sin() * (-x).exp();
        for n in [1, 3, 100, 1001] {
            let a = simpson_independent(g, 0.1, 4.0, n);
            let b = simpson_shared(g, 0.1, 4.0, n);
            assert_relative_eq!(a, b, epsilon = 1e-13);
        }
    }

    #[test]
    fn test_fourth_order_convergence() {
        let exact = 2.0;
        let e1 = (simpson_shared(f64::sin, 0.0, PI, 8) - exact).abs();
        let e2 = (simpson_shared(f64::sin, 0.0, PI, 16) - exact).abs();
        let ratio = e1 / e2;
        assert!((14.0..18.0).contains(&ratio), "ratio = {ratio}");
    }

    #[test]
    fn test_evaluation_counts() {
        for (rule, n) in [
            (QuadratureRule::Independent, 10),
            (QuadratureRule::Shared, 10),
            (QuadratureRule::Shared, 1),
        ] {
            let calls = Cell::new(0usize);
            integrate(
                |x| {
                    calls.set(calls.get() + 1);
                    x
                },
                0.0,
                1.0,
                n,
                rule,
            );
            assert_eq!(calls.get(), rule.evaluations(n));
        }
        assert_eq!(QuadratureRule::Independent.evaluations(0), 0);
    }

    #[test]
    fn test_cancellable_matches_plain() {
        let n = 3 * CANCEL_CHECK_STRIDE + 17;
        let g = |x: f64| (x * 0.01).cos();
        let token = CancellationToken::new();
        for rule in [QuadratureRule::Independent, QuadratureRule::Shared] {
            let plain = integrate(g, 0.0, 50.0, n, rule);
            let blocked = integrate_cancellable(g, 0.0, 50.0, n, rule, &token).unwrap();
            assert_relative_eq!(plain, blocked, max_relative = 1e-12);
        }
    }

    #[test]
    fn test_cancelled_before_start() {
        let token = CancellationToken::new();
        token.cancel();
        let err =
            integrate_cancellable(|x| x, 0.0, 1.0, 10, QuadratureRule::Shared, &token).unwrap_err();
        match err {
            WaveError::Cancelled { completed, total } => {
                assert_eq!(completed, 0);
                assert_eq!(total, 10);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_cancelled_mid_integral() {
        let token = CancellationToken::new();
        let n = 4 * CANCEL_CHECK_STRIDE;
        let calls = Cell::new(0usize);
        let err = integrate_cancellable(
            |x| {
                calls.set(calls.get() + 1);
                if calls.get() == 10 {
                    token.cancel();
                }
                x
            },
            0.0,
            1.0,
            n,
            QuadratureRule::Independent,
            &token,
        )
        .unwrap_err();
        match err {
            WaveError::Cancelled { completed, .. } => assert_eq!(completed, CANCEL_CHECK_STRIDE),
            other => panic!("unexpected error: {other}"),
        }
    }
}
