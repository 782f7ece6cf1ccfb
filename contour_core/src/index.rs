// Copyright 2026 the Contour Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Spatial index of rendered features, for hit testing.
//!
//! Bucket building inserts every feature it draws through the
//! [`SpatialFeatureIndex`] trait. [`FeatureIndex`] is an R-tree
//! implementation: each ring is indexed by its bounding box, and
//! [`query`](FeatureIndex::query) returns the candidate features whose boxes
//! come within a radius of the query geometry. Exact tests are left to the
//! style layer (see
//! [`LineLayer::query_intersects_geometry`](crate::layer::LineLayer::query_intersects_geometry)).

use alloc::string::String;
use alloc::vec::Vec;

use kurbo::{Point, Rect};
use rstar::{AABB, RTree, RTreeObject};

use crate::feature::GeometryCollection;

/// Receives the features drawn into a bucket.
pub trait SpatialFeatureIndex {
    /// Records that feature `index` of `source_layer` was drawn by
    /// `style_layer` with the given geometry.
    fn insert(
        &mut self,
        geometries: &GeometryCollection,
        index: usize,
        source_layer: &str,
        style_layer: &str,
    );
}

/// A feature as recorded in the index.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct IndexedSubfeature {
    /// Index of the feature in its source layer.
    pub index: usize,
    /// Name of the tile layer the feature came from.
    pub source_layer: String,
    /// Identifier of the style layer that drew it.
    pub style_layer: String,
    /// Insertion order; later insertions draw on top.
    pub sort_index: usize,
}

#[derive(Clone, Debug, PartialEq)]
struct IndexedRing {
    subfeature: usize,
    min: [f64; 2],
    max: [f64; 2],
}

impl RTreeObject for IndexedRing {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(self.min, self.max)
    }
}

/// R-tree backed [`SpatialFeatureIndex`].
#[derive(Debug, Default)]
pub struct FeatureIndex {
    tree: RTree<IndexedRing>,
    subfeatures: Vec<IndexedSubfeature>,
}

impl FeatureIndex {
    /// Creates an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of indexed features.
    #[must_use]
    pub fn len(&self) -> usize {
        self.subfeatures.len()
    }

    /// Returns `true` if nothing has been indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subfeatures.is_empty()
    }

    /// Returns the features whose bounds come within `additional_radius` of
    /// the query geometry's bounds, in insertion order.
    #[must_use]
    pub fn query(&self, query: &[Point], additional_radius: f64) -> Vec<&IndexedSubfeature> {
        let Some(bounds) = bounding_box(query) else {
            return Vec::new();
        };
        let bounds = bounds.inflate(additional_radius, additional_radius);
        let envelope = AABB::from_corners([bounds.x0, bounds.y0], [bounds.x1, bounds.y1]);

        let mut hits: Vec<usize> = self
            .tree
            .locate_in_envelope_intersecting(&envelope)
            .map(|ring| ring.subfeature)
            .collect();
        hits.sort_unstable();
        hits.dedup();
        hits.into_iter().map(|i| &self.subfeatures[i]).collect()
    }
}

impl SpatialFeatureIndex for FeatureIndex {
    fn insert(
        &mut self,
        geometries: &GeometryCollection,
        index: usize,
        source_layer: &str,
        style_layer: &str,
    ) {
        let subfeature = self.subfeatures.len();
        for ring in geometries {
            let Some(bounds) = bounding_box(ring) else {
                continue;
            };
            self.tree.insert(IndexedRing {
                subfeature,
                min: [bounds.x0, bounds.y0],
                max: [bounds.x1, bounds.y1],
            });
        }
        // Every feature gets a slot, even one with no rings to hit.
        self.subfeatures.push(IndexedSubfeature {
            index,
            source_layer: source_layer.into(),
            style_layer: style_layer.into(),
            sort_index: subfeature,
        });
    }
}

fn bounding_box(points: &[Point]) -> Option<Rect> {
    let (first, rest) = points.split_first()?;
    Some(
        rest.iter()
            .fold(Rect::from_points(*first, *first), |r, &p| r.union_pt(p)),
    )
}
