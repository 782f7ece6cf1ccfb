// Copyright 2026 the Contour Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Piecewise curves over a scalar input.
//!
//! A [`Curve`] is a set of `(input, value)` stops plus an interpolation base.
//! Zoom curves key their stops by zoom level; exponential per-feature
//! functions key them by a numeric feature property. Both evaluate the same
//! way:
//!
//! - the stop with the largest input `<= x` is the *lower* stop, and the stop
//!   with the smallest input `>= x` is the *upper* stop;
//! - between two distinct stops the value is interpolated, linearly when the
//!   base is 1 and exponentially otherwise;
//! - outside the stop range the nearest stop's value is used;
//! - with no stops at all there is no value.
//!
//! Stops need not be sorted; evaluation is a single linear scan.

use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

use super::interpolate::Interpolate;

/// A piecewise curve over a scalar input.
#[derive(Clone, Debug, PartialEq)]
pub struct Curve<T> {
    stops: Vec<(f32, T)>,
    base: f32,
}

/// A curve whose input is the zoom level.
pub type ZoomCurve<T> = Curve<T>;

impl<T> Curve<T> {
    /// Creates a linearly interpolated curve.
    #[must_use]
    pub fn linear(stops: Vec<(f32, T)>) -> Self {
        Self { stops, base: 1.0 }
    }

    /// Creates an exponentially interpolated curve.
    ///
    /// A base of 1 is linear; larger bases bunch the change towards the upper
    /// stop.
    ///
    /// # Panics
    ///
    /// Panics if `base` is not positive.
    #[must_use]
    pub fn exponential(base: f32, stops: Vec<(f32, T)>) -> Self {
        assert!(base > 0.0, "curve base must be positive, got {base}");
        Self { stops, base }
    }

    /// The interpolation base.
    #[must_use]
    pub fn base(&self) -> f32 {
        self.base
    }

    /// The stops, in the order they were given.
    #[must_use]
    pub fn stops(&self) -> &[(f32, T)] {
        &self.stops
    }
}

impl<T: Interpolate + Clone + PartialEq> Curve<T> {
    /// Evaluates the curve, returning `None` when it has no stops.
    #[must_use]
    pub fn try_evaluate(&self, x: f32) -> Option<T> {
        let mut lower: Option<&(f32, T)> = None;
        let mut upper: Option<&(f32, T)> = None;
        for stop in &self.stops {
            let input = stop.0;
            if input <= x && lower.is_none_or(|l| input > l.0) {
                lower = Some(stop);
            }
            if input >= x && upper.is_none_or(|u| input < u.0) {
                upper = Some(stop);
            }
        }

        match (lower, upper) {
            (Some((lo_x, lo)), Some((hi_x, hi))) => {
                if lo_x == hi_x || lo == hi {
                    return Some(lo.clone());
                }
                let t = interpolation_factor(self.base, x - lo_x, hi_x - lo_x);
                Some(T::interpolate(lo, hi, t))
            }
            (Some((_, v)), None) | (None, Some((_, v))) => Some(v.clone()),
            (None, None) => None,
        }
    }
}

impl<T: Interpolate + Clone + PartialEq + Default> Curve<T> {
    /// Evaluates the curve, returning `T::default()` when it has no stops.
    #[must_use]
    pub fn evaluate(&self, x: f32) -> T {
        self.try_evaluate(x).unwrap_or_default()
    }
}

/// Returns how far `progress` is through `span` under `base`.
pub(crate) fn interpolation_factor(base: f32, progress: f32, span: f32) -> f64 {
    let (base, progress, span) = (f64::from(base), f64::from(progress), f64::from(span));
    if span == 0.0 {
        0.0
    } else if base == 1.0 {
        progress / span
    } else {
        (base.powf(progress) - 1.0) / (base.powf(span) - 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::color::Color;
    use alloc::vec;

    #[test]
    fn linear_between_stops() {
        let curve = Curve::linear(vec![(0.0, 0.0_f32), (10.0, 10.0)]);
        assert_eq!(curve.evaluate(5.0), 5.0);
    }

    #[test]
    fn exponential_between_stops() {
        let curve = Curve::exponential(2.0, vec![(0.0, 0.0_f32), (2.0, 3.0)]);
        // (2^1 - 1) / (2^2 - 1) = 1/3 of the way.
        assert!((curve.evaluate(1.0) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn exponential_is_strictly_monotonic_between_stops() {
        for base in [2.0, 0.5] {
            let curve = Curve::exponential(base, vec![(4.0, 1.0_f32), (8.0, 9.0)]);
            let mut last = 1.0;
            for step in 1..40 {
                let z = 4.0 + step as f32 * 0.1;
                let v = curve.evaluate(z);
                assert!(v > last, "base {base}: {v} at z {z} not above {last}");
                assert!(v < 9.0, "base {base}: {v} at z {z} reached the upper stop");
                last = v;
            }
        }
    }

    #[test]
    fn clamps_outside_the_stop_range() {
        let curve = Curve::linear(vec![(5.0, 1.0_f32), (10.0, 2.0)]);
        assert_eq!(curve.evaluate(0.0), 1.0);
        assert_eq!(curve.evaluate(20.0), 2.0);
    }

    #[test]
    fn exact_stop_returns_that_stop() {
        let curve = Curve::linear(vec![(5.0, 1.0_f32), (10.0, 2.0)]);
        assert_eq!(curve.evaluate(10.0), 2.0);
        assert_eq!(curve.evaluate(5.0), 1.0);
    }

    #[test]
    fn stops_need_not_be_sorted() {
        let curve = Curve::linear(vec![(10.0, 10.0_f32), (0.0, 0.0), (20.0, 0.0)]);
        assert_eq!(curve.evaluate(5.0), 5.0);
        assert_eq!(curve.evaluate(15.0), 5.0);
    }

    #[test]
    fn equal_values_skip_interpolation() {
        let curve = Curve::linear(vec![(0.0, Color::BLACK), (10.0, Color::BLACK)]);
        assert_eq!(curve.evaluate(3.0), Color::BLACK);
    }

    #[test]
    fn empty_curve_is_default() {
        let curve: ZoomCurve<f32> = Curve::linear(vec![]);
        assert_eq!(curve.try_evaluate(3.0), None);
        assert_eq!(curve.evaluate(3.0), 0.0);
    }

    #[test]
    #[should_panic(expected = "curve base must be positive")]
    fn rejects_non_positive_base() {
        let _ = Curve::exponential(0.0, vec![(0.0, 1.0_f32)]);
    }
}
