//! Standard normal density and distribution functions used by the pricing
//! formulas. The CDF is the Abramowitz-Stegun 7.1.26 rational approximation
//! of erf (five-term polynomial, absolute error below 1.5e-7), evaluated on
//! |x| with the sign folded back in afterwards so that cdf(x) + cdf(-x)
//! cancels to 1 up to float rounding. Put-call parity depends on that
//! cancellation holding much tighter than the raw approximation error.

use std::f64::consts::{PI, SQRT_2};

const A1: f64 = 0.254829592;
const A2: f64 = -0.284496736;
const A3: f64 = 1.421413741;
const A4: f64 = -1.453152027;
const A5: f64 = 1.061405429;
const P: f64 = 0.3275911;

/// Standard normal probability density.
#[inline]
pub fn pdf(x: f64) -> f64 {
    (-0.5 * x * x).exp() / (2.0 * PI).sqrt()
}

/// Standard normal cumulative distribution.
#[inline]
pub fn cdf(x: f64) -> f64 {
    let sign = if x < 0.0 { -1.0 } else { 1.0 };
    let z = x.abs() / SQRT_2;

    let t = 1.0 / (1.0 + P * z);
    let poly = ((((A5 * t + A4) * t + A3) * t + A2) * t + A1) * t;
    let erf = 1.0 - poly * (-z * z).exp();

    0.5 * (1.0 + sign * erf)
}
