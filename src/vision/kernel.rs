//! Gaussian convolution kernels
//!
//! Builds the normalized 1-D kernel used by the separable local-mean filter.

use std::ops::Index;
use thiserror::Error;

/// Smallest kernel that still has a neighbourhood on both sides of the center
pub const MIN_KERNEL_SIZE: usize = 3;

/// Rejected kernel parameters
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum KernelError {
    #[error("kernel size must be odd, got {0}")]
    EvenSize(usize),
    #[error("kernel size must be at least 3, got {0}")]
    TooSmall(usize),
    #[error("sigma must be positive, got {0}")]
    NonPositiveSigma(f64),
}

/// Normalized, symmetric 1-D Gaussian kernel
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel {
    weights: Vec<f64>,
}

impl Kernel {
    /// Build a kernel with `sigma = (size - 1) / 6`
    pub fn with_default_sigma(size: usize) -> Result<Self, KernelError> {
        gaussian_kernel(size, default_sigma(size))
    }

    /// Number of taps
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// Never true: validated kernels have at least three taps
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Number of taps on each side of the center
    pub fn half_size(&self) -> usize {
        self.weights.len() / 2
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }
}

impl Index<usize> for Kernel {
    type Output = f64;

    fn index(&self, index: usize) -> &f64 {
        &self.weights[index]
    }
}

/// Sigma used when the caller does not supply one
pub fn default_sigma(size: usize) -> f64 {
    (size as f64 - 1.0) / 6.0
}

/// Check kernel parameters without building anything
pub fn validate(size: usize, sigma: f64) -> Result<(), KernelError> {
    if size < MIN_KERNEL_SIZE {
        return Err(KernelError::TooSmall(size));
    }
    if size % 2 == 0 {
        return Err(KernelError::EvenSize(size));
    }
    if !(sigma.is_finite() && sigma > 0.0) {
        return Err(KernelError::NonPositiveSigma(sigma));
    }
    Ok(())
}

/// Compute a normalized Gaussian kernel of `size` taps
///
/// Tap `i` is `exp(-x² / 2σ²)` with `x = i - size / 2`, scaled so that all taps
/// sum to one.
pub fn gaussian_kernel(size: usize, sigma: f64) -> Result<Kernel, KernelError> {
    validate(size, sigma)?;

    let two_sigma2 = 2.0 * sigma * sigma;
    let center = (size / 2) as i64;

    let mut weights: Vec<f64> = (0..size as i64)
        .map(|idx| {
            let x = (idx - center) as f64;
            (-x * x / two_sigma2).exp()
        })
        .collect();

    let scale = 1.0 / weights.iter().sum::<f64>();
    for w in weights.iter_mut() {
        *w *= scale;
    }

    Ok(Kernel { weights })
}
