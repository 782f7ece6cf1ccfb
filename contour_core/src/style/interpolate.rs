// Copyright 2026 the Contour Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Blending between style values, and the easing curve used by transitions.

use alloc::string::String;
use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

/// A style value type that can be blended between two instances.
///
/// Discrete types (enums, strings) "interpolate" by snapping: they keep the
/// first value until `t` reaches 1.
pub trait Interpolate: Sized {
    /// Returns the value a fraction `t` of the way from `a` to `b`.
    #[must_use]
    fn interpolate(a: &Self, b: &Self, t: f64) -> Self;
}

impl Interpolate for f64 {
    fn interpolate(a: &Self, b: &Self, t: f64) -> Self {
        a * (1.0 - t) + b * t
    }
}

impl Interpolate for f32 {
    #[expect(
        clippy::cast_possible_truncation,
        reason = "style values are single precision"
    )]
    fn interpolate(a: &Self, b: &Self, t: f64) -> Self {
        f64::interpolate(&f64::from(*a), &f64::from(*b), t) as Self
    }
}

impl<const N: usize> Interpolate for [f32; N] {
    fn interpolate(a: &Self, b: &Self, t: f64) -> Self {
        core::array::from_fn(|i| f32::interpolate(&a[i], &b[i], t))
    }
}

/// Element-wise when both sides have the same length, otherwise discrete.
impl Interpolate for Vec<f32> {
    fn interpolate(a: &Self, b: &Self, t: f64) -> Self {
        if a.len() != b.len() {
            return if t < 1.0 { a.clone() } else { b.clone() };
        }
        a.iter()
            .zip(b)
            .map(|(a, b)| f32::interpolate(a, b, t))
            .collect()
    }
}

/// Implements [`Interpolate`] for discrete types by snapping at `t == 1`.
macro_rules! discrete_interpolate {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::style::interpolate::Interpolate for $ty {
                fn interpolate(a: &Self, b: &Self, t: f64) -> Self {
                    if t < 1.0 { a.clone() } else { b.clone() }
                }
            }
        )+
    };
}

pub(crate) use discrete_interpolate;

discrete_interpolate!(bool, String);

/// Cubic Bézier easing curve with end points fixed at (0, 0) and (1, 1).
///
/// This is the classic WebKit `UnitBezier`: `solve(x)` finds the curve
/// parameter for `x` with a few Newton iterations, falling back to bisection,
/// then samples `y` at that parameter.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UnitBezier {
    cx: f64,
    bx: f64,
    ax: f64,
    cy: f64,
    by: f64,
    ay: f64,
}

impl UnitBezier {
    /// The ease curve applied to style transitions.
    pub const EASE: Self = Self::new(0.0, 0.0, 0.25, 1.0);

    /// Creates a curve from its two inner control points.
    #[must_use]
    pub const fn new(p1x: f64, p1y: f64, p2x: f64, p2y: f64) -> Self {
        let cx = 3.0 * p1x;
        let bx = 3.0 * (p2x - p1x) - cx;
        let cy = 3.0 * p1y;
        let by = 3.0 * (p2y - p1y) - cy;
        Self {
            cx,
            bx,
            ax: 1.0 - cx - bx,
            cy,
            by,
            ay: 1.0 - cy - by,
        }
    }

    /// Returns the eased value for progress `x` in `0.0..=1.0`.
    #[must_use]
    pub fn solve(&self, x: f64, epsilon: f64) -> f64 {
        self.sample_y(self.solve_x(x, epsilon))
    }

    fn sample_x(&self, t: f64) -> f64 {
        ((self.ax * t + self.bx) * t + self.cx) * t
    }

    fn sample_y(&self, t: f64) -> f64 {
        ((self.ay * t + self.by) * t + self.cy) * t
    }

    fn sample_derivative_x(&self, t: f64) -> f64 {
        (3.0 * self.ax * t + 2.0 * self.bx) * t + self.cx
    }

    fn solve_x(&self, x: f64, epsilon: f64) -> f64 {
        let mut t = x;
        for _ in 0..8 {
            let error = self.sample_x(t) - x;
            if error.abs() < epsilon {
                return t;
            }
            let derivative = self.sample_derivative_x(t);
            if derivative.abs() < 1e-6 {
                break;
            }
            t -= error / derivative;
        }

        let (mut lo, mut hi) = (0.0, 1.0);
        t = x;
        if t < lo {
            return lo;
        }
        if t > hi {
            return hi;
        }
        for _ in 0..64 {
            if lo >= hi {
                break;
            }
            let sampled = self.sample_x(t);
            if (sampled - x).abs() < epsilon {
                return t;
            }
            if x > sampled {
                lo = t;
            } else {
                hi = t;
            }
            t = (hi - lo) * 0.5 + lo;
        }
        t
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn numbers_blend_linearly() {
        assert_eq!(f32::interpolate(&0.0, &10.0, 0.25), 2.5);
        assert_eq!(<[f32; 2]>::interpolate(&[0.0, 4.0], &[2.0, 8.0], 0.5), [1.0, 6.0]);
    }

    #[test]
    fn vectors_of_unequal_length_snap() {
        let a = vec![1.0_f32, 2.0];
        let b = vec![3.0_f32];
        assert_eq!(Vec::interpolate(&a, &b, 0.5), a);
        assert_eq!(Vec::interpolate(&a, &b, 1.0), b);
        assert_eq!(Vec::interpolate(&a, &vec![3.0, 4.0], 0.5), vec![2.0, 3.0]);
    }

    #[test]
    fn strings_snap_at_the_end() {
        let a = String::from("a");
        let b = String::from("b");
        assert_eq!(String::interpolate(&a, &b, 0.99), "a");
        assert_eq!(String::interpolate(&a, &b, 1.0), "b");
    }

    #[test]
    fn ease_hits_end_points_and_is_monotonic() {
        let ease = UnitBezier::EASE;
        assert!(ease.solve(0.0, 1e-6).abs() < 1e-6);
        assert!((ease.solve(1.0, 1e-6) - 1.0).abs() < 1e-6);
        let mut last = 0.0;
        for i in 1..=10 {
            let y = ease.solve(f64::from(i) / 10.0, 1e-6);
            assert!(y >= last, "ease must not decrease");
            last = y;
        }
        // Ease-out: ahead of linear in the middle.
        assert!(ease.solve(0.5, 1e-6) > 0.5);
    }
}
