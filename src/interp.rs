//! Interpolation kernels.
//!
//! Both kernels work on small windows and expect all sample
//! instants to be distinct: coincident instants lead to a division by zero.
use crate::constants::TRIGONOMETRIC_ANGULAR_RATE_RAD_S;

use num_traits::Zero;
use std::ops::{Add, Mul};

/// Weighted sum of the window samples
fn weighted_sum<T, F>(times: &[f64], values: &[T], basis: F) -> T
where
    T: Copy + Zero + Mul<f64, Output = T> + Add<Output = T>,
    F: Fn(usize, usize) -> f64,
{
    let mut res = T::zero();
    for (i, y_i) in values.iter().enumerate().take(times.len()) {
        let mut l_i = 1.0_f64;
        for j in 0..times.len() {
            if i != j {
                l_i *= basis(i, j);
            }
        }
        res = res + *y_i * l_i;
    }
    res
}

/// Trigonometric interpolation of near periodic samples (orbital states),
/// using [TRIGONOMETRIC_ANGULAR_RATE_RAD_S] as basis rate.
/// `times` and `t` are expressed in seconds, on any common origin.
pub fn trigonometric<T>(times: &[f64], values: &[T], t: f64) -> T
where
    T: Copy + Zero + Mul<f64, Output = T> + Add<Output = T>,
{
    let w = TRIGONOMETRIC_ANGULAR_RATE_RAD_S;
    weighted_sum(times, values, |i, j| {
        (w * (t - times[j]) / 2.0).sin() / (w * (times[i] - times[j]) / 2.0).sin()
    })
}

/// Lagrange polynomial interpolation.
/// `times` and `t` are expressed in seconds, on any common origin.
pub fn lagrange<T>(times: &[f64], values: &[T], t: f64) -> T
where
    T: Copy + Zero + Mul<f64, Output = T> + Add<Output = T>,
{
    weighted_sum(times, values, |i, j| (t - times[j]) / (times[i] - times[j]))
}
