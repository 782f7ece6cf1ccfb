// Copyright 2026 the Contour Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Turning declarative property values into per-frame values.
//!
//! An [`Evaluator`] maps one kind of declared value to its evaluated form at
//! the current [`EvaluationParameters`]:
//!
//! | Evaluator                        | Input              | Output                  |
//! |----------------------------------|--------------------|-------------------------|
//! | [`PropertyEvaluator`]            | [`PropertyValue`]  | `T`                     |
//! | [`DataDrivenPropertyEvaluator`]  | [`StyleValue`]     | [`PossiblyEvaluated`]   |
//! | [`CrossFadedPropertyEvaluator`]  | [`PropertyValue`]  | [`Faded`]               |
//!
//! Undefined values evaluate to the evaluator's default. Data-driven values
//! that are functions stay unevaluated until a feature is at hand.
//!
//! [`CrossFadedPropertyEvaluator`]: super::faded::CrossFadedPropertyEvaluator
//! [`Faded`]: super::faded::Faded

use core::time::Duration;

use super::faded::ZoomHistory;
use super::function::PropertyFunction;
use super::interpolate::Interpolate;
use super::value::{PropertyType, PropertyValue, StyleValue};
use crate::feature::GeometryTileFeature;

/// How long a cross-faded property takes to settle after crossing an
/// integer zoom.
pub const DEFAULT_FADE_DURATION: Duration = Duration::from_millis(300);

/// The inputs to one evaluation pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EvaluationParameters {
    /// Current zoom level.
    pub zoom: f32,
    /// Current time, on the same clock as transitions.
    pub now: Duration,
    /// Recent zoom movement, used by cross-faded properties.
    pub zoom_history: Option<ZoomHistory>,
    /// Duration of a cross-fade between integer zooms.
    pub fade_duration: Duration,
}

impl EvaluationParameters {
    /// Parameters at `zoom`, at time zero, with no zoom history.
    #[must_use]
    pub const fn new(zoom: f32) -> Self {
        Self {
            zoom,
            now: Duration::ZERO,
            zoom_history: None,
            fade_duration: DEFAULT_FADE_DURATION,
        }
    }

    /// Sets the current time.
    #[must_use]
    pub const fn with_now(mut self, now: Duration) -> Self {
        self.now = now;
        self
    }

    /// Sets the zoom history.
    #[must_use]
    pub const fn with_zoom_history(mut self, history: ZoomHistory) -> Self {
        self.zoom_history = Some(history);
        self
    }

    /// Sets the cross-fade duration.
    #[must_use]
    pub const fn with_fade_duration(mut self, fade_duration: Duration) -> Self {
        self.fade_duration = fade_duration;
        self
    }
}

/// Evaluates one kind of declared value.
pub trait Evaluator<V> {
    /// The evaluated form.
    type Output: Interpolate;

    /// Evaluates `value`.
    fn evaluate(&self, value: &V) -> Self::Output;
}

/// A data-driven property after zoom evaluation.
#[derive(Clone, Debug, PartialEq)]
pub enum PossiblyEvaluated<T> {
    /// The same value for every feature.
    Constant(T),
    /// A function still to be evaluated per feature.
    Function(PropertyFunction<T>),
}

impl<T: Default> Default for PossiblyEvaluated<T> {
    fn default() -> Self {
        Self::Constant(T::default())
    }
}

impl<T: PropertyType> PossiblyEvaluated<T> {
    /// Returns `true` if every feature gets the same value.
    #[must_use]
    pub const fn is_constant(&self) -> bool {
        matches!(self, Self::Constant(_))
    }

    /// Returns the constant, if this is one.
    #[must_use]
    pub const fn constant(&self) -> Option<&T> {
        match self {
            Self::Constant(v) => Some(v),
            Self::Function(_) => None,
        }
    }

    /// Returns the constant, or `default` for a function.
    #[must_use]
    pub fn constant_or(&self, default: T) -> T {
        self.constant().cloned().unwrap_or(default)
    }

    /// Returns the value for `feature`.
    #[must_use]
    pub fn evaluate(&self, feature: &dyn GeometryTileFeature) -> T {
        match self {
            Self::Constant(v) => v.clone(),
            Self::Function(f) => f.evaluate(feature),
        }
    }
}

/// Only constants blend. Anything involving a function keeps the earlier
/// value until the transition ends.
impl<T: PropertyType> Interpolate for PossiblyEvaluated<T> {
    fn interpolate(a: &Self, b: &Self, t: f64) -> Self {
        match (a, b) {
            (Self::Constant(a), Self::Constant(b)) => Self::Constant(T::interpolate(a, b, t)),
            _ => a.clone(),
        }
    }
}

/// Evaluates ordinary properties to a concrete value.
#[derive(Clone, Debug)]
pub struct PropertyEvaluator<'a, T> {
    params: &'a EvaluationParameters,
    default: T,
}

impl<'a, T> PropertyEvaluator<'a, T> {
    /// Creates an evaluator with the property's default value.
    #[must_use]
    pub const fn new(params: &'a EvaluationParameters, default: T) -> Self {
        Self { params, default }
    }
}

impl<T: PropertyType> Evaluator<PropertyValue<T>> for PropertyEvaluator<'_, T> {
    type Output = T;

    fn evaluate(&self, value: &PropertyValue<T>) -> T {
        match value {
            PropertyValue::Undefined => self.default.clone(),
            PropertyValue::Constant(v) => v.clone(),
            PropertyValue::ZoomCurve(curve) => curve.evaluate(self.params.zoom),
        }
    }
}

/// Evaluates data-driven properties as far as zoom allows.
#[derive(Clone, Debug)]
pub struct DataDrivenPropertyEvaluator<'a, T> {
    params: &'a EvaluationParameters,
    default: T,
}

impl<'a, T> DataDrivenPropertyEvaluator<'a, T> {
    /// Creates an evaluator with the property's default value.
    #[must_use]
    pub const fn new(params: &'a EvaluationParameters, default: T) -> Self {
        Self { params, default }
    }
}

impl<T: PropertyType> Evaluator<StyleValue<T>> for DataDrivenPropertyEvaluator<'_, T> {
    type Output = PossiblyEvaluated<T>;

    fn evaluate(&self, value: &StyleValue<T>) -> PossiblyEvaluated<T> {
        match value {
            StyleValue::Undefined => PossiblyEvaluated::Constant(self.default.clone()),
            StyleValue::Constant(v) => PossiblyEvaluated::Constant(v.clone()),
            StyleValue::ZoomCurve(curve) => {
                PossiblyEvaluated::Constant(curve.evaluate(self.params.zoom))
            }
            StyleValue::Function(f) => PossiblyEvaluated::Function(f.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature::{FeatureType, TileFeature};
    use crate::style::color::Color;
    use crate::style::curve::Curve;
    use crate::style::function::FunctionStops;
    use alloc::vec;

    #[test]
    fn property_evaluator_cases() {
        let params = EvaluationParameters::new(5.0);
        let eval = PropertyEvaluator::new(&params, 1.0_f32);
        assert_eq!(eval.evaluate(&PropertyValue::Undefined), 1.0);
        assert_eq!(eval.evaluate(&PropertyValue::Constant(3.0)), 3.0);
        let curve = PropertyValue::ZoomCurve(Curve::linear(vec![(0.0, 0.0), (10.0, 20.0)]));
        assert_eq!(eval.evaluate(&curve), 10.0);
    }

    #[test]
    fn data_driven_evaluator_keeps_functions() {
        let params = EvaluationParameters::new(5.0);
        let eval = DataDrivenPropertyEvaluator::new(&params, Color::BLACK);

        let evaluated = eval.evaluate(&StyleValue::Undefined);
        assert_eq!(evaluated.constant(), Some(&Color::BLACK));

        let function = PropertyFunction::new("color", FunctionStops::Identity);
        let evaluated = eval.evaluate(&StyleValue::Function(function));
        assert!(!evaluated.is_constant());
        assert_eq!(evaluated.constant_or(Color::WHITE), Color::WHITE);

        let feature = TileFeature::new(FeatureType::LineString, vec![])
            .with_property("color", "#ffffff");
        assert_eq!(evaluated.evaluate(&feature), Color::WHITE);
    }

    #[test]
    fn constant_values_ignore_the_feature() {
        let params = EvaluationParameters::new(5.0);
        let eval = DataDrivenPropertyEvaluator::new(&params, 1.0_f32);
        let values = [
            StyleValue::Undefined,
            StyleValue::Constant(4.0),
            StyleValue::ZoomCurve(Curve::linear(vec![(0.0, 0.0), (10.0, 20.0)])),
        ];
        let thin = TileFeature::new(FeatureType::LineString, vec![]).with_property("width", 1.0);
        let wide = TileFeature::new(FeatureType::LineString, vec![])
            .with_property("width", 30.0)
            .with_property("class", "motorway");

        for (value, expected) in values.iter().zip([1.0, 4.0, 10.0]) {
            let evaluated = eval.evaluate(value);
            assert!(evaluated.is_constant(), "{value:?} should be constant");
            assert_eq!(evaluated.evaluate(&thin), expected);
            assert_eq!(evaluated.evaluate(&thin), evaluated.evaluate(&wide));
        }
    }

    #[test]
    fn possibly_evaluated_blends_only_constants() {
        let a = PossiblyEvaluated::Constant(0.0_f32);
        let b = PossiblyEvaluated::Constant(10.0_f32);
        assert_eq!(
            PossiblyEvaluated::interpolate(&a, &b, 0.5),
            PossiblyEvaluated::Constant(5.0)
        );

        let f = PossiblyEvaluated::Function(PropertyFunction::new("w", FunctionStops::Identity));
        assert_eq!(PossiblyEvaluated::interpolate(&a, &f, 0.5), a);
        assert_eq!(PossiblyEvaluated::interpolate(&f, &b, 0.5), f);
    }

    #[test]
    fn builder_sets_fields() {
        let params = EvaluationParameters::new(3.0)
            .with_now(Duration::from_secs(2))
            .with_fade_duration(Duration::ZERO);
        assert_eq!(params.now, Duration::from_secs(2));
        assert_eq!(params.fade_duration, Duration::ZERO);
        assert!(params.zoom_history.is_none());
    }
}
