// Copyright 2026 the Contour Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tile features as seen by styling and bucket building.
//!
//! Decoding tiles is somebody else's job. The decoder hands features over
//! through the [`GeometryTileFeature`] and [`GeometryTileLayer`] traits;
//! [`TileFeature`] and [`TileLayer`] are plain in-memory implementations for
//! callers that already hold decoded data (and for tests).

use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;

use kurbo::Point;

/// One ring or line string, in tile units.
pub type GeometryCoordinates = Vec<Point>;

/// All rings or lines of one feature.
pub type GeometryCollection = Vec<GeometryCoordinates>;

/// The geometry type of a feature.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FeatureType {
    /// Unknown or unsupported geometry.
    #[default]
    Unknown,
    /// Points.
    Point,
    /// Line strings.
    LineString,
    /// Polygons.
    Polygon,
}

/// A feature property value.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum FeatureValue {
    /// No value.
    #[default]
    Null,
    /// A boolean.
    Bool(bool),
    /// An unsigned integer.
    Uint(u64),
    /// A signed integer.
    Int(i64),
    /// A floating point number.
    Float(f64),
    /// A string.
    String(String),
}

impl FeatureValue {
    /// Returns the value as a number if it is numeric.
    #[expect(clippy::cast_precision_loss, reason = "feature numbers are styled as f64")]
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Self::Uint(v) => Some(v as f64),
            Self::Int(v) => Some(v as f64),
            Self::Float(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the value as a string slice if it is a string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the value as a boolean if it is one.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match *self {
            Self::Bool(b) => Some(b),
            _ => None,
        }
    }

    /// Compares two values, treating all numeric variants as one kind.
    ///
    /// Values of different kinds are unordered.
    #[must_use]
    pub fn compare(&self, other: &Self) -> Option<core::cmp::Ordering> {
        match (self, other) {
            (Self::String(a), Self::String(b)) => Some(a.cmp(b)),
            (Self::Bool(a), Self::Bool(b)) => Some(a.cmp(b)),
            (Self::Null, Self::Null) => Some(core::cmp::Ordering::Equal),
            _ => self.as_f64()?.partial_cmp(&other.as_f64()?),
        }
    }

    /// Returns `true` if both values are equal under [`compare`](Self::compare).
    #[must_use]
    pub fn matches(&self, other: &Self) -> bool {
        self.compare(other) == Some(core::cmp::Ordering::Equal)
    }
}

impl From<bool> for FeatureValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for FeatureValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for FeatureValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for FeatureValue {
    fn from(v: &str) -> Self {
        Self::String(v.into())
    }
}

/// A single decoded feature of a tile layer.
pub trait GeometryTileFeature {
    /// The feature's geometry type.
    fn feature_type(&self) -> FeatureType;

    /// Looks up a property by key.
    fn value(&self, key: &str) -> Option<FeatureValue>;

    /// The feature id, if the tile carries one.
    fn id(&self) -> Option<u64> {
        None
    }

    /// The feature's geometry in tile units.
    fn geometries(&self) -> GeometryCollection;
}

/// One named layer of a decoded tile.
pub trait GeometryTileLayer {
    /// The source layer name.
    fn name(&self) -> &str;

    /// The number of features.
    fn feature_count(&self) -> usize;

    /// Returns the feature at `index`.
    ///
    /// # Panics
    ///
    /// Implementations may panic if `index >= feature_count()`.
    fn feature(&self, index: usize) -> Box<dyn GeometryTileFeature + '_>;
}

/// An in-memory [`GeometryTileFeature`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TileFeature {
    feature_type: FeatureType,
    id: Option<u64>,
    properties: BTreeMap<String, FeatureValue>,
    geometry: GeometryCollection,
}

impl TileFeature {
    /// Creates a feature with no properties.
    #[must_use]
    pub fn new(feature_type: FeatureType, geometry: GeometryCollection) -> Self {
        Self {
            feature_type,
            id: None,
            properties: BTreeMap::new(),
            geometry,
        }
    }

    /// Creates a line-string feature.
    #[must_use]
    pub fn line(geometry: GeometryCollection) -> Self {
        Self::new(FeatureType::LineString, geometry)
    }

    /// Adds a property.
    #[must_use]
    pub fn with_property(mut self, key: &str, value: impl Into<FeatureValue>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Sets the feature id.
    #[must_use]
    pub fn with_id(mut self, id: u64) -> Self {
        self.id = Some(id);
        self
    }
}

impl GeometryTileFeature for TileFeature {
    fn feature_type(&self) -> FeatureType {
        self.feature_type
    }

    fn value(&self, key: &str) -> Option<FeatureValue> {
        self.properties.get(key).cloned()
    }

    fn id(&self) -> Option<u64> {
        self.id
    }

    fn geometries(&self) -> GeometryCollection {
        self.geometry.clone()
    }
}

/// An in-memory [`GeometryTileLayer`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TileLayer {
    name: String,
    features: Vec<TileFeature>,
}

impl TileLayer {
    /// Creates a layer from its name and features.
    #[must_use]
    pub fn new(name: &str, features: Vec<TileFeature>) -> Self {
        Self {
            name: name.into(),
            features,
        }
    }
}

impl GeometryTileLayer for TileLayer {
    fn name(&self) -> &str {
        &self.name
    }

    fn feature_count(&self) -> usize {
        self.features.len()
    }

    fn feature(&self, index: usize) -> Box<dyn GeometryTileFeature + '_> {
        Box::new(&self.features[index])
    }
}

impl<T: GeometryTileFeature + ?Sized> GeometryTileFeature for &T {
    fn feature_type(&self) -> FeatureType {
        (**self).feature_type()
    }

    fn value(&self, key: &str) -> Option<FeatureValue> {
        (**self).value(key)
    }

    fn id(&self) -> Option<u64> {
        (**self).id()
    }

    fn geometries(&self) -> GeometryCollection {
        (**self).geometries()
    }
}

/// Identifies a tile at its data zoom and the zoom it is displayed at.
///
/// Past the source's maximum zoom, tiles are overscaled: the data comes from
/// zoom `z` but is drawn at `overscaled_z`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct OverscaledTileId {
    /// Zoom the tile data belongs to.
    pub z: u8,
    /// Zoom the tile is displayed at. Never less than `z`.
    pub overscaled_z: u8,
}

impl OverscaledTileId {
    /// Creates a tile id.
    ///
    /// # Panics
    ///
    /// Panics if `overscaled_z < z`.
    #[must_use]
    pub fn new(z: u8, overscaled_z: u8) -> Self {
        assert!(
            overscaled_z >= z,
            "overscaled zoom {overscaled_z} is below the data zoom {z}"
        );
        Self { z, overscaled_z }
    }

    /// Returns how many times the tile is magnified past its data zoom.
    #[must_use]
    pub fn overscale_factor(&self) -> u32 {
        1 << (self.overscaled_z - self.z).min(31)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn numeric_values_compare_across_variants() {
        assert!(FeatureValue::Int(3).matches(&FeatureValue::Float(3.0)));
        assert!(FeatureValue::Uint(3).matches(&FeatureValue::Int(3)));
        assert!(!FeatureValue::from("3").matches(&FeatureValue::Int(3)));
        assert_eq!(
            FeatureValue::Int(2).compare(&FeatureValue::Float(2.5)),
            Some(core::cmp::Ordering::Less)
        );
    }

    #[test]
    fn tile_layer_hands_out_features() {
        let layer = TileLayer::new(
            "roads",
            vec![
                TileFeature::line(vec![vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0)]])
                    .with_property("class", "primary")
                    .with_id(7),
            ],
        );
        assert_eq!(layer.name(), "roads");
        assert_eq!(layer.feature_count(), 1);
        let feature = layer.feature(0);
        assert_eq!(feature.feature_type(), FeatureType::LineString);
        assert_eq!(feature.value("class"), Some(FeatureValue::from("primary")));
        assert_eq!(feature.value("missing"), None);
        assert_eq!(feature.id(), Some(7));
        assert_eq!(feature.geometries()[0].len(), 2);
    }

    #[test]
    fn overscale_factor() {
        assert_eq!(OverscaledTileId::new(14, 14).overscale_factor(), 1);
        assert_eq!(OverscaledTileId::new(14, 16).overscale_factor(), 4);
    }

    #[test]
    #[should_panic(expected = "below the data zoom")]
    fn overscaled_zoom_must_not_be_below_data_zoom() {
        let _ = OverscaledTileId::new(5, 4);
    }
}
