//! Gamma-Poisson rate estimation.
//!
//! Arrival rates observed once per epoch are modelled as Poisson draws with an
//! unknown rate λ, and λ carries a `Gamma(α, β)` prior in **rate**
//! parameterization:
//!
//! `f(λ) = β^α / Γ(α) * λ^(α-1) * e^(-βλ)`  (scale θ = 1/β)
//!
//! Conjugate update over a window of observations:
//! `α_post = α₀ + Σ obs`, `β_post = β₀ + n`.
//!
//! The posterior is always recomputed from the retained window, so evidence
//! that slides out of the window is forgotten.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};
use thiserror::Error;

const LOG_SQRT_2PI: f64 = 0.918_938_533_204_672_8; // 0.5 * ln(2*pi)
const LANCZOS_G: f64 = 7.0;
#[allow(clippy::excessive_precision)]
const LANCZOS_COEFFS: [f64; 9] = [
    0.999_999_999_999_809_93,
    676.520_368_121_885_1,
    -1_259.139_216_722_402_8,
    771.323_428_777_653_1,
    -176.615_029_162_140_59,
    12.507_343_278_686_905,
    -0.138_571_095_265_720_12,
    9.984_369_578_019_571_6e-6,
    1.505_632_735_149_311_6e-7,
];

/// Natural log of |Γ(z)| (Lanczos, with reflection below 0.5).
pub fn log_gamma(z: f64) -> f64 {
    if z.is_nan() || z == f64::NEG_INFINITY {
        return f64::NAN;
    }
    if z == f64::INFINITY {
        return f64::INFINITY;
    }
    if z < 0.5 {
        let sin_pi = (PI * z).sin();
        if sin_pi == 0.0 {
            return f64::NAN;
        }
        return PI.ln() - sin_pi.abs().ln() - log_gamma(1.0 - z);
    }

    let z_minus = z - 1.0;
    let mut x = LANCZOS_COEFFS[0];
    for (i, coeff) in LANCZOS_COEFFS.iter().enumerate().skip(1) {
        x += coeff / (z_minus + i as f64);
    }
    let t = z_minus + LANCZOS_G + 0.5;
    LOG_SQRT_2PI + (z_minus + 0.5) * t.ln() - t + x.ln()
}

/// Gamma density at `x` with shape `alpha` and rate `beta`.
///
/// Zero for `x < 0`. At `x = 0` the density is `+inf` for `alpha < 1`,
/// `beta` for `alpha == 1`, and `0` for `alpha > 1`. NaN for non-positive
/// parameters.
pub fn gamma_pdf(x: f64, alpha: f64, beta: f64) -> f64 {
    if x.is_nan() || alpha.is_nan() || beta.is_nan() || alpha <= 0.0 || beta <= 0.0 {
        return f64::NAN;
    }
    if x < 0.0 {
        return 0.0;
    }
    if x == 0.0 {
        return if alpha < 1.0 {
            f64::INFINITY
        } else if alpha == 1.0 {
            beta
        } else {
            0.0
        };
    }
    (alpha * beta.ln() - log_gamma(alpha) + (alpha - 1.0) * x.ln() - beta * x).exp()
}

/// Prior hyperparameters that cannot produce a proper Gamma.
#[derive(Debug, Error)]
pub enum PriorError {
    #[error("prior shape alpha must be finite and > 0, got {0}")]
    Shape(f64),
    #[error("prior rate beta must be finite and > 0, got {0}")]
    Rate(f64),
}

/// Gamma parameters (shape α, rate β).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GammaParams {
    pub alpha: f64,
    pub beta: f64,
}

impl GammaParams {
    pub fn new(alpha: f64, beta: f64) -> Self {
        Self { alpha, beta }
    }

    /// Reject hyperparameters that are not strictly positive and finite.
    pub fn validate(&self) -> Result<(), PriorError> {
        if !self.alpha.is_finite() || self.alpha <= 0.0 {
            return Err(PriorError::Shape(self.alpha));
        }
        if !self.beta.is_finite() || self.beta <= 0.0 {
            return Err(PriorError::Rate(self.beta));
        }
        Ok(())
    }

    /// E[λ] = α/β.
    pub fn mean(&self) -> f64 {
        self.alpha / self.beta
    }

    /// Var[λ] = α/β².
    pub fn variance(&self) -> f64 {
        self.alpha / (self.beta * self.beta)
    }

    pub fn pdf(&self, x: f64) -> f64 {
        gamma_pdf(x, self.alpha, self.beta)
    }

    /// Conjugate update from per-epoch Poisson counts.
    pub fn posterior<'a, I>(&self, observations: I) -> Self
    where
        I: IntoIterator<Item = &'a u32>,
    {
        let (sum, count) = observations
            .into_iter()
            .fold((0u64, 0u64), |(s, n), &obs| (s + obs as u64, n + 1));
        Self {
            alpha: self.alpha + sum as f64,
            beta: self.beta + count as f64,
        }
    }
}

impl Default for GammaParams {
    fn default() -> Self {
        use crate::constants::bayes::{ALPHA_PRIOR, BETA_PRIOR};
        Self::new(ALPHA_PRIOR, BETA_PRIOR)
    }
}

/// `points` evenly spaced values from `start` to `end` inclusive.
pub fn linspace(start: f64, end: f64, points: usize) -> Vec<f64> {
    match points {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (points - 1) as f64;
            (0..points)
                .map(|i| {
                    if i == points - 1 {
                        end
                    } else {
                        start + step * i as f64
                    }
                })
                .collect()
        }
    }
}

/// Sampled density of a Gamma over `[0, x_max]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DensityCurve {
    pub x_vals: Vec<f64>,
    pub y_vals: Vec<f64>,
}

impl DensityCurve {
    pub fn sample(params: &GammaParams, x_max: f64, points: usize) -> Self {
        let x_vals = linspace(0.0, x_max, points);
        let y_vals = x_vals.iter().map(|&x| params.pdf(x)).collect();
        Self { x_vals, y_vals }
    }

    /// Trapezoidal area under the sampled curve (non-finite samples skipped).
    pub fn area(&self) -> f64 {
        self.x_vals
            .windows(2)
            .zip(self.y_vals.windows(2))
            .filter(|(_, y)| y[0].is_finite() && y[1].is_finite())
            .map(|(x, y)| (x[1] - x[0]) * (y[0] + y[1]) / 2.0)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_gamma_integers() {
        // Γ(n) = (n-1)!
        assert!(log_gamma(1.0).abs() < 1e-12);
        assert!(log_gamma(2.0).abs() < 1e-12);
        assert!((log_gamma(5.0) - 24f64.ln()).abs() < 1e-10);
        assert!((log_gamma(10.0) - 362_880f64.ln()).abs() < 1e-9);
    }

    #[test]
    fn test_log_gamma_half() {
        // Γ(1/2) = sqrt(pi)
        assert!((log_gamma(0.5) - PI.sqrt().ln()).abs() < 1e-10);
    }

    #[test]
    fn test_pdf_shape_two_rate_one() {
        // Gamma(2, 1): f(x) = x e^-x
        let p = GammaParams::new(2.0, 1.0);
        assert!((p.pdf(1.0) - (-1f64).exp()).abs() < 1e-12);
        assert!((p.pdf(3.0) - 3.0 * (-3f64).exp()).abs() < 1e-12);
        assert_eq!(p.pdf(0.0), 0.0);
        assert_eq!(p.pdf(-1.0), 0.0);
    }

    #[test]
    fn test_pdf_at_zero_boundaries() {
        assert_eq!(gamma_pdf(0.0, 1.0, 3.0), 3.0);
        assert_eq!(gamma_pdf(0.0, 0.5, 1.0), f64::INFINITY);
        assert!(gamma_pdf(1.0, 0.0, 1.0).is_nan());
        assert!(gamma_pdf(1.0, 1.0, -1.0).is_nan());
    }

    #[test]
    fn test_posterior_is_prior_plus_counts() {
        let prior = GammaParams::new(2.0, 1.0);
        let window = [1u32, 2, 3, 2, 2];
        let post = prior.posterior(&window);
        assert_eq!(post.alpha, 12.0);
        assert_eq!(post.beta, 6.0);
        assert_eq!(prior.posterior(&window), post);
    }

    #[test]
    fn test_empty_window_returns_prior() {
        let prior = GammaParams::new(2.0, 1.0);
        let post = prior.posterior(std::iter::empty::<&u32>());
        assert_eq!(post, prior);
    }

    #[test]
    fn test_validate_rejects_non_positive() {
        assert!(GammaParams::new(2.0, 1.0).validate().is_ok());
        assert!(matches!(
            GammaParams::new(0.0, 1.0).validate(),
            Err(PriorError::Shape(_))
        ));
        assert!(matches!(
            GammaParams::new(1.0, -2.0).validate(),
            Err(PriorError::Rate(_))
        ));
        assert!(matches!(
            GammaParams::new(f64::INFINITY, 1.0).validate(),
            Err(PriorError::Shape(_))
        ));
    }

    #[test]
    fn test_linspace_endpoints() {
        let xs = linspace(0.0, 10.0, 200);
        assert_eq!(xs.len(), 200);
        assert_eq!(xs[0], 0.0);
        assert_eq!(xs[199], 10.0);
        assert!((xs[1] - 10.0 / 199.0).abs() < 1e-15);
        assert_eq!(linspace(0.0, 10.0, 1), vec![0.0]);
        assert!(linspace(0.0, 10.0, 0).is_empty());
    }

    #[test]
    fn test_curve_integrates_to_about_one() {
        let curve = DensityCurve::sample(&GammaParams::new(2.0, 1.0), 10.0, 200);
        // Mass beyond x = 10 is 11 e^-10 ≈ 5e-4.
        assert!((curve.area() - 1.0).abs() < 2e-3, "area = {}", curve.area());

        let curve = DensityCurve::sample(&GammaParams::new(202.0, 101.0), 10.0, 200);
        assert!((curve.area() - 1.0).abs() < 1e-2, "area = {}", curve.area());
    }

    #[test]
    fn test_moments() {
        let p = GammaParams::new(4.0, 2.0);
        assert_eq!(p.mean(), 2.0);
        assert_eq!(p.variance(), 1.0);
        let post = p.posterior(&[2u32, 2, 2, 2]);
        assert_eq!(post.mean(), 2.0);
        assert!(post.variance() < p.variance());
    }
}
