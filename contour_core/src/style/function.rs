// Copyright 2026 the Contour Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-feature property functions.
//!
//! A [`PropertyFunction`] reads one property of a tile feature and maps it to
//! a style value through a set of [`FunctionStops`]. Features that lack the
//! property, or carry a value of the wrong kind, get the function's default.

use alloc::string::String;
use alloc::vec::Vec;

use super::color::Color;
use super::curve::Curve;
use super::interpolate::Interpolate;
use crate::feature::{FeatureValue, GeometryTileFeature};

/// Conversion from a raw feature value, used by identity functions.
pub trait FromFeatureValue: Sized {
    /// Converts the value, or returns `None` if it has the wrong kind.
    fn from_feature_value(value: &FeatureValue) -> Option<Self>;
}

impl FromFeatureValue for f32 {
    #[expect(
        clippy::cast_possible_truncation,
        reason = "style values are single precision"
    )]
    fn from_feature_value(value: &FeatureValue) -> Option<Self> {
        value.as_f64().map(|v| v as Self)
    }
}

impl FromFeatureValue for bool {
    fn from_feature_value(value: &FeatureValue) -> Option<Self> {
        value.as_bool()
    }
}

impl FromFeatureValue for String {
    fn from_feature_value(value: &FeatureValue) -> Option<Self> {
        value.as_str().map(Into::into)
    }
}

impl FromFeatureValue for Color {
    fn from_feature_value(value: &FeatureValue) -> Option<Self> {
        Self::from_hex(value.as_str()?)
    }
}

impl<const N: usize> FromFeatureValue for [f32; N] {
    fn from_feature_value(_: &FeatureValue) -> Option<Self> {
        None
    }
}

impl FromFeatureValue for Vec<f32> {
    fn from_feature_value(_: &FeatureValue) -> Option<Self> {
        None
    }
}

/// How a [`PropertyFunction`] maps a feature value to a style value.
#[derive(Clone, Debug, PartialEq)]
pub enum FunctionStops<T> {
    /// Numeric input, interpolated like a zoom curve.
    Exponential(Curve<T>),
    /// Numeric input, stepped: the value of the last stop at or below the
    /// input, or of the first stop when the input is below all of them.
    /// Stops must be sorted by input.
    Interval(Vec<(f32, T)>),
    /// Exact match on the input.
    Categorical(Vec<(FeatureValue, T)>),
    /// The feature value itself.
    Identity,
}

/// A style value computed from one property of each feature.
#[derive(Clone, Debug, PartialEq)]
pub struct PropertyFunction<T> {
    property: String,
    stops: FunctionStops<T>,
    default: Option<T>,
}

impl<T> PropertyFunction<T> {
    /// Creates a function over the named feature property.
    #[must_use]
    pub fn new(property: &str, stops: FunctionStops<T>) -> Self {
        Self {
            property: property.into(),
            stops,
            default: None,
        }
    }

    /// Sets the value used when a feature cannot be evaluated.
    ///
    /// Without one, `T::default()` is used.
    #[must_use]
    pub fn with_default(mut self, default: T) -> Self {
        self.default = Some(default);
        self
    }

    /// The feature property this function reads.
    #[must_use]
    pub fn property(&self) -> &str {
        &self.property
    }

    /// The function's stops.
    #[must_use]
    pub fn stops(&self) -> &FunctionStops<T> {
        &self.stops
    }
}

impl<T> PropertyFunction<T>
where
    T: Interpolate + FromFeatureValue + Clone + PartialEq + Default,
{
    /// Evaluates the function for one feature.
    #[must_use]
    pub fn evaluate(&self, feature: &dyn GeometryTileFeature) -> T {
        self.try_evaluate(feature)
            .or_else(|| self.default.clone())
            .unwrap_or_default()
    }

    #[expect(
        clippy::cast_possible_truncation,
        reason = "stop inputs are single precision"
    )]
    fn try_evaluate(&self, feature: &dyn GeometryTileFeature) -> Option<T> {
        let value = feature.value(&self.property)?;
        match &self.stops {
            FunctionStops::Exponential(curve) => curve.try_evaluate(value.as_f64()? as f32),
            FunctionStops::Interval(stops) => {
                let input = value.as_f64()? as f32;
                let (_, first) = stops.first()?;
                let found = stops
                    .iter()
                    .take_while(|(x, _)| *x <= input)
                    .last()
                    .map_or(first, |(_, v)| v);
                Some(found.clone())
            }
            FunctionStops::Categorical(stops) => stops
                .iter()
                .find(|(key, _)| key.matches(&value))
                .map(|(_, v)| v.clone()),
            FunctionStops::Identity => T::from_feature_value(&value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature::{FeatureType, TileFeature};
    use alloc::vec;

    fn feature(key: &str, value: impl Into<FeatureValue>) -> TileFeature {
        TileFeature::new(FeatureType::LineString, vec![]).with_property(key, value)
    }

    #[test]
    fn exponential_reads_numeric_property() {
        let f = PropertyFunction::new(
            "lanes",
            FunctionStops::Exponential(Curve::linear(vec![(1.0, 2.0_f32), (5.0, 10.0)])),
        );
        assert_eq!(f.evaluate(&feature("lanes", 3_i64)), 6.0);
    }

    #[test]
    fn interval_steps() {
        let f = PropertyFunction::new(
            "rank",
            FunctionStops::Interval(vec![(0.0, 1.0_f32), (10.0, 2.0), (20.0, 3.0)]),
        );
        assert_eq!(f.evaluate(&feature("rank", 15.0)), 2.0);
        assert_eq!(f.evaluate(&feature("rank", 20.0)), 3.0);
        assert_eq!(f.evaluate(&feature("rank", -5.0)), 1.0);
    }

    #[test]
    fn categorical_matches_exactly() {
        let f = PropertyFunction::new(
            "class",
            FunctionStops::Categorical(vec![
                (FeatureValue::from("motorway"), Color::WHITE),
                (FeatureValue::from("path"), Color::BLACK),
            ]),
        )
        .with_default(Color::TRANSPARENT);
        assert_eq!(f.evaluate(&feature("class", "path")), Color::BLACK);
        assert_eq!(f.evaluate(&feature("class", "river")), Color::TRANSPARENT);
    }

    #[test]
    fn identity_passes_values_through() {
        let f: PropertyFunction<f32> = PropertyFunction::new("width", FunctionStops::Identity);
        assert_eq!(f.evaluate(&feature("width", 4.5)), 4.5);

        let c: PropertyFunction<Color> = PropertyFunction::new("color", FunctionStops::Identity);
        assert_eq!(c.evaluate(&feature("color", "#fff")), Color::WHITE);
    }

    #[test]
    fn missing_or_mistyped_values_use_the_default() {
        let f = PropertyFunction::new("width", FunctionStops::Identity).with_default(7.0_f32);
        assert_eq!(f.evaluate(&feature("other", 1.0)), 7.0);
        assert_eq!(f.evaluate(&feature("width", "wide")), 7.0);

        let no_default: PropertyFunction<f32> =
            PropertyFunction::new("width", FunctionStops::Identity);
        assert_eq!(no_default.evaluate(&feature("other", 1.0)), 0.0);
    }
}
