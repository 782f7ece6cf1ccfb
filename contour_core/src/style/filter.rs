// Copyright 2026 the Contour Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Feature filters.
//!
//! A layer only draws the features of its source layer that pass its
//! [`Filter`]. The key `"$id"` refers to the feature id instead of a
//! property.

use alloc::string::String;
use alloc::vec::Vec;
use core::cmp::Ordering;

use crate::feature::{FeatureType, FeatureValue, GeometryTileFeature, GeometryTileLayer};

/// A predicate over tile features.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Filter {
    /// Matches everything.
    #[default]
    Null,
    /// The property equals the value.
    Equals(String, FeatureValue),
    /// The property is missing or differs from the value.
    NotEquals(String, FeatureValue),
    /// The property is less than the value.
    Less(String, FeatureValue),
    /// The property is less than or equal to the value.
    LessOrEqual(String, FeatureValue),
    /// The property is greater than the value.
    Greater(String, FeatureValue),
    /// The property is greater than or equal to the value.
    GreaterOrEqual(String, FeatureValue),
    /// The property equals one of the values.
    In(String, Vec<FeatureValue>),
    /// The property is missing or equals none of the values.
    NotIn(String, Vec<FeatureValue>),
    /// The property is present.
    Has(String),
    /// The property is absent.
    NotHas(String),
    /// The feature has this geometry type.
    TypeEquals(FeatureType),
    /// Every sub-filter matches.
    All(Vec<Self>),
    /// At least one sub-filter matches.
    Any(Vec<Self>),
    /// No sub-filter matches.
    NoneOf(Vec<Self>),
}

impl Filter {
    /// Returns `true` if `feature` passes the filter.
    #[must_use]
    pub fn matches(&self, feature: &dyn GeometryTileFeature) -> bool {
        let compare = |key: &str, value: &FeatureValue, accept: fn(Ordering) -> bool| {
            lookup(feature, key)
                .and_then(|v| v.compare(value))
                .is_some_and(accept)
        };
        match self {
            Self::Null => true,
            Self::Equals(key, value) => compare(key, value, Ordering::is_eq),
            Self::NotEquals(key, value) => !compare(key, value, Ordering::is_eq),
            Self::Less(key, value) => compare(key, value, Ordering::is_lt),
            Self::LessOrEqual(key, value) => compare(key, value, Ordering::is_le),
            Self::Greater(key, value) => compare(key, value, Ordering::is_gt),
            Self::GreaterOrEqual(key, value) => compare(key, value, Ordering::is_ge),
            Self::In(key, values) => {
                lookup(feature, key).is_some_and(|v| values.iter().any(|w| v.matches(w)))
            }
            Self::NotIn(key, values) => {
                !lookup(feature, key).is_some_and(|v| values.iter().any(|w| v.matches(w)))
            }
            Self::Has(key) => lookup(feature, key).is_some(),
            Self::NotHas(key) => lookup(feature, key).is_none(),
            Self::TypeEquals(ty) => feature.feature_type() == *ty,
            Self::All(filters) => filters.iter().all(|f| f.matches(feature)),
            Self::Any(filters) => filters.iter().any(|f| f.matches(feature)),
            Self::NoneOf(filters) => !filters.iter().any(|f| f.matches(feature)),
        }
    }

    /// Calls `f` with every feature of `layer` that passes the filter, along
    /// with its index in the layer.
    pub fn each_matching(
        &self,
        layer: &dyn GeometryTileLayer,
        mut f: impl FnMut(&dyn GeometryTileFeature, usize),
    ) {
        for index in 0..layer.feature_count() {
            let feature = layer.feature(index);
            if self.matches(&*feature) {
                f(&*feature, index);
            }
        }
    }
}

fn lookup(feature: &dyn GeometryTileFeature, key: &str) -> Option<FeatureValue> {
    if key == "$id" {
        feature.id().map(FeatureValue::Uint)
    } else {
        feature.value(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature::{TileFeature, TileLayer};
    use alloc::vec;

    fn road(class: &str, lanes: i64) -> TileFeature {
        TileFeature::line(vec![])
            .with_property("class", class)
            .with_property("lanes", lanes)
    }

    #[test]
    fn comparisons() {
        let f = road("primary", 2);
        assert!(Filter::Equals("class".into(), "primary".into()).matches(&f));
        assert!(Filter::NotEquals("class".into(), "service".into()).matches(&f));
        assert!(Filter::NotEquals("missing".into(), "x".into()).matches(&f));
        assert!(Filter::Less("lanes".into(), FeatureValue::Int(3)).matches(&f));
        assert!(Filter::GreaterOrEqual("lanes".into(), FeatureValue::Float(2.0)).matches(&f));
        assert!(!Filter::Greater("lanes".into(), FeatureValue::Int(2)).matches(&f));
        assert!(!Filter::Less("class".into(), FeatureValue::Int(2)).matches(&f));
    }

    #[test]
    fn membership_and_presence() {
        let f = road("primary", 2).with_id(9);
        let classes: Vec<FeatureValue> = vec!["primary".into(), "secondary".into()];
        assert!(Filter::In("class".into(), classes.clone()).matches(&f));
        assert!(!Filter::NotIn("class".into(), classes).matches(&f));
        assert!(Filter::Has("lanes".into()).matches(&f));
        assert!(Filter::NotHas("name".into()).matches(&f));
        assert!(Filter::Equals("$id".into(), FeatureValue::Int(9)).matches(&f));
        assert!(Filter::TypeEquals(FeatureType::LineString).matches(&f));
    }

    #[test]
    fn combinators() {
        let f = road("primary", 2);
        let yes = Filter::Has("class".into());
        let no = Filter::Has("name".into());
        assert!(Filter::All(vec![yes.clone(), Filter::Null]).matches(&f));
        assert!(!Filter::All(vec![yes.clone(), no.clone()]).matches(&f));
        assert!(Filter::Any(vec![no.clone(), yes]).matches(&f));
        assert!(Filter::NoneOf(vec![no]).matches(&f));
        assert!(Filter::All(vec![]).matches(&f));
    }

    #[test]
    fn each_matching_reports_layer_indices() {
        let layer = TileLayer::new(
            "roads",
            vec![road("service", 1), road("primary", 2), road("primary", 4)],
        );
        let mut seen = Vec::new();
        Filter::Equals("class".into(), "primary".into())
            .each_matching(&layer, |_, index| seen.push(index));
        assert_eq!(seen, [1, 2]);
    }
}
