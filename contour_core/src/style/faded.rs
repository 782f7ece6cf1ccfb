// Copyright 2026 the Contour Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cross-faded properties.
//!
//! Some properties (line dash arrays, patterns) cannot be interpolated. When
//! the zoom crosses an integer level they instead cross-fade between the
//! value for the neighbouring integer zoom and the value for the current one.
//! Each side carries the scale at which it must be drawn so that both stay
//! visually continuous.
//!
//! Zooming in fades from the value at `z - 1` (drawn at twice the scale) to
//! the value at `z`. Zooming out fades from the value at `z + 1` (drawn at
//! half the scale) to the value at `z`. The fade progresses both with the
//! fractional zoom and with time since the last integer zoom crossing.

use core::time::Duration;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

use super::evaluate::{EvaluationParameters, Evaluator};
use super::interpolate::Interpolate;
use super::value::{PropertyType, PropertyValue};

/// A pair of values being cross-faded.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Faded<T> {
    /// The value being faded out.
    pub from: T,
    /// The value being faded in.
    pub to: T,
    /// Draw scale of `from`.
    pub from_scale: f32,
    /// Draw scale of `to`.
    pub to_scale: f32,
    /// Fade progress in `0.0..=1.0`; 0 is all `from`.
    pub t: f32,
}

impl<T: Clone> Faded<T> {
    /// A settled value that is not fading.
    #[must_use]
    pub fn settled(value: T) -> Self {
        Self {
            from: value.clone(),
            to: value,
            from_scale: 1.0,
            to_scale: 1.0,
            t: 0.0,
        }
    }
}

impl<T: Clone> Interpolate for Faded<T> {
    fn interpolate(a: &Self, b: &Self, t: f64) -> Self {
        if t < 1.0 { a.clone() } else { b.clone() }
    }
}

/// Tracks zoom movement across frames.
///
/// Cross-faded properties need to know which direction the zoom last moved
/// through an integer level, and when.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZoomHistory {
    last_zoom: f32,
    last_integer_zoom: f32,
    last_integer_zoom_time: Duration,
    first: bool,
}

impl Default for ZoomHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl ZoomHistory {
    /// An empty history; the first update always reports a change.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            last_zoom: 0.0,
            last_integer_zoom: 0.0,
            last_integer_zoom_time: Duration::ZERO,
            first: true,
        }
    }

    /// Records the zoom for the frame at `now`. Returns `true` if the zoom
    /// changed since the previous update.
    pub fn update(&mut self, z: f32, now: Duration) -> bool {
        if self.first {
            self.first = false;
            self.last_integer_zoom = z.floor();
            self.last_integer_zoom_time = Duration::ZERO;
            self.last_zoom = z;
            return true;
        }

        let (last_floor, floor) = (self.last_zoom.floor(), z.floor());
        if last_floor < floor {
            self.last_integer_zoom = floor;
            self.last_integer_zoom_time = now;
        } else if last_floor > floor {
            self.last_integer_zoom = floor + 1.0;
            self.last_integer_zoom_time = now;
        }

        if z == self.last_zoom {
            return false;
        }
        self.last_zoom = z;
        true
    }

    /// The zoom passed to the last update.
    #[must_use]
    pub const fn last_zoom(&self) -> f32 {
        self.last_zoom
    }

    /// The integer zoom most recently crossed.
    #[must_use]
    pub const fn last_integer_zoom(&self) -> f32 {
        self.last_integer_zoom
    }

    /// When the last integer zoom was crossed.
    #[must_use]
    pub const fn last_integer_zoom_time(&self) -> Duration {
        self.last_integer_zoom_time
    }
}

/// Evaluates cross-faded properties.
#[derive(Clone, Debug)]
pub struct CrossFadedPropertyEvaluator<'a, T> {
    params: &'a EvaluationParameters,
    default: T,
}

impl<'a, T> CrossFadedPropertyEvaluator<'a, T> {
    /// Creates an evaluator with the property's default value.
    #[must_use]
    pub const fn new(params: &'a EvaluationParameters, default: T) -> Self {
        Self { params, default }
    }
}

impl<T: Clone> CrossFadedPropertyEvaluator<'_, T> {
    fn calculate(&self, min: T, mid: T, max: T) -> Faded<T> {
        let z = self.params.zoom;
        let fraction = z - z.floor();
        let (zooming_in, progress) = match &self.params.zoom_history {
            Some(history) => {
                let elapsed = self
                    .params
                    .now
                    .saturating_sub(history.last_integer_zoom_time());
                let fade = self.params.fade_duration;
                let progress = if fade.is_zero() {
                    1.0
                } else {
                    (elapsed.as_secs_f32() / fade.as_secs_f32()).min(1.0)
                };
                (z > history.last_integer_zoom(), progress)
            }
            None => (true, 0.0),
        };

        if zooming_in {
            Faded {
                from: min,
                to: mid,
                from_scale: 2.0,
                to_scale: 1.0,
                t: fraction + (1.0 - fraction) * progress,
            }
        } else {
            Faded {
                from: max,
                to: mid,
                from_scale: 0.5,
                to_scale: 1.0,
                t: 1.0 - (1.0 - progress) * fraction,
            }
        }
    }
}

impl<T: PropertyType> Evaluator<PropertyValue<T>> for CrossFadedPropertyEvaluator<'_, T> {
    type Output = Faded<T>;

    fn evaluate(&self, value: &PropertyValue<T>) -> Faded<T> {
        match value {
            PropertyValue::Undefined => Faded::settled(self.default.clone()),
            PropertyValue::Constant(c) => self.calculate(c.clone(), c.clone(), c.clone()),
            PropertyValue::ZoomCurve(curve) => {
                let z = self.params.zoom;
                self.calculate(
                    curve.evaluate(z - 1.0),
                    curve.evaluate(z),
                    curve.evaluate(z + 1.0),
                )
            }
        }
    }
}
