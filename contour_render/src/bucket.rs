// Copyright 2026 the Contour Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Buckets: per-tile, per-layer GPU-ready geometry.

use contour_core::feature::{GeometryTileLayer, OverscaledTileId};
use contour_core::index::SpatialFeatureIndex;
use contour_core::trace::UploadEvent;

use crate::gpu::GpuContext;

/// Inputs to building the bucket of one style layer for one tile.
pub struct BucketParameters<'a> {
    /// The tile being built.
    pub tile_id: OverscaledTileId,
    /// The source layer of the tile that holds the features.
    pub layer: &'a dyn GeometryTileLayer,
    /// Receives every feature drawn into the bucket.
    pub feature_index: &'a mut dyn SpatialFeatureIndex,
}

impl core::fmt::Debug for BucketParameters<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BucketParameters")
            .field("tile_id", &self.tile_id)
            .field("layer", &self.layer.name())
            .finish_non_exhaustive()
    }
}

/// A style layer type that can build buckets.
pub trait BucketLayer {
    /// The bucket type built.
    type Bucket: Bucket;

    /// Builds the bucket for the tile in `params`. `style_layer` is the
    /// layer's identifier, recorded in the feature index.
    ///
    /// Uses the paint properties from the layer's last evaluation.
    fn create_bucket(&self, style_layer: &str, params: &mut BucketParameters<'_>) -> Self::Bucket;
}

/// What an upload sent to the GPU.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UploadStats {
    /// Bytes of layout vertex data.
    pub vertex_bytes: usize,
    /// Bytes of index data.
    pub index_bytes: usize,
    /// Paint attribute buffers created.
    pub paint_buffers: u32,
}

impl UploadStats {
    /// The trace event for these stats.
    #[must_use]
    pub fn event(&self, frame_index: u64, layer_index: u32) -> UploadEvent {
        UploadEvent {
            frame_index,
            layer_index,
            vertex_bytes: self.vertex_bytes,
            index_bytes: self.index_bytes,
            paint_buffers: self.paint_buffers,
        }
    }
}

/// Built geometry awaiting upload and draw.
pub trait Bucket {
    /// Returns `true` if the bucket has anything to draw.
    fn has_data(&self) -> bool;

    /// Returns `true` once [`upload`](Self::upload) has run.
    fn is_uploaded(&self) -> bool;

    /// Moves the bucket's data to the GPU.
    fn upload(&mut self, context: &mut impl GpuContext) -> UploadStats;
}
