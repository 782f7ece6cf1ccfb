// Copyright 2026 the Contour Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Paint attribute data.
//!
//! A data-driven paint property is either constant for the whole bucket or
//! varies per feature. Constants are bound as a single attribute value and
//! never allocate; per-feature values are staged one entry per vertex while
//! the bucket is built and become a vertex buffer on upload.

use contour_core::feature::GeometryTileFeature;

use crate::attribute::AttributeSet;
use crate::gpu::{AttributeValue, GpuContext, UniqueBuffer, VertexAttribute};

/// Evaluated paint properties whose data-driven members become attributes.
///
/// Attribute `i` corresponds to `Self::ATTRIBUTES[i]`.
pub trait DataDrivenPaint: AttributeSet {
    /// The components of attribute `i` if it is constant for every feature.
    fn constant_components(&self, attribute: usize) -> Option<[f32; 4]>;

    /// The components of attribute `i` for one feature.
    fn feature_components(&self, attribute: usize, feature: &dyn GeometryTileFeature) -> [f32; 4];
}

#[derive(Debug)]
enum AttributeSlot {
    Constant([f32; 4]),
    Variable {
        vertices: Vec<f32>,
        buffer: Option<UniqueBuffer>,
    },
}

/// Per-bucket attribute storage for the data-driven paint properties of `P`.
#[derive(Debug)]
pub struct PaintAttributeData<P> {
    properties: P,
    zoom: f32,
    slots: Vec<AttributeSlot>,
}

impl<P: DataDrivenPaint> PaintAttributeData<P> {
    /// Sets up one slot per attribute of `P`: a constant value where the
    /// property is constant, an empty staging vector otherwise.
    #[must_use]
    pub fn new(properties: P, zoom: f32) -> Self {
        let slots = (0..P::ATTRIBUTES.len())
            .map(|i| match properties.constant_components(i) {
                Some(components) => AttributeSlot::Constant(components),
                None => AttributeSlot::Variable {
                    vertices: Vec::new(),
                    buffer: None,
                },
            })
            .collect();
        Self {
            properties,
            zoom,
            slots,
        }
    }

    /// The evaluated properties the data was built from.
    #[must_use]
    pub fn properties(&self) -> &P {
        &self.properties
    }

    /// The zoom the bucket was built at.
    #[must_use]
    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    /// Returns `true` if at least one property varies per feature.
    #[must_use]
    pub fn has_variable(&self) -> bool {
        self.slots
            .iter()
            .any(|slot| matches!(slot, AttributeSlot::Variable { .. }))
    }

    /// Appends `length` copies of `feature`'s value to every variable slot.
    ///
    /// Call once per feature, after its vertices were appended, with the
    /// number of vertices it contributed.
    pub fn populate_vertex_vectors(&mut self, feature: &dyn GeometryTileFeature, length: usize) {
        for (i, slot) in self.slots.iter_mut().enumerate() {
            if let AttributeSlot::Variable { vertices, .. } = slot {
                let n = P::ATTRIBUTES[i].format.components();
                let components = self.properties.feature_components(i, feature);
                for _ in 0..length {
                    vertices.extend_from_slice(&components[..n]);
                }
            }
        }
    }

    /// Number of staged vertices of variable attribute `i`, or `None` for a
    /// constant attribute.
    #[must_use]
    pub fn staged_len(&self, attribute: usize) -> Option<usize> {
        match &self.slots[attribute] {
            AttributeSlot::Constant(_) => None,
            AttributeSlot::Variable { vertices, .. } => {
                Some(vertices.len() / P::ATTRIBUTES[attribute].format.components())
            }
        }
    }

    /// Uploads every staging vector into a vertex buffer and returns the
    /// number of buffers created. A previous upload's buffers are replaced.
    pub fn upload(&mut self, context: &mut impl GpuContext) -> u32 {
        let mut created = 0;
        for slot in &mut self.slots {
            if let AttributeSlot::Variable { vertices, buffer } = slot {
                *buffer = Some(context.create_vertex_buffer(bytemuck::cast_slice(vertices)));
                created += 1;
            }
        }
        created
    }

    /// The attribute values, in `P::ATTRIBUTES` order.
    ///
    /// # Panics
    ///
    /// Panics if a variable attribute has not been uploaded.
    #[must_use]
    pub fn attribute_values(&self) -> Vec<AttributeValue> {
        self.slots
            .iter()
            .zip(P::ATTRIBUTES)
            .map(|(slot, attribute)| match slot {
                AttributeSlot::Constant(components) => AttributeValue::Constant(*components),
                AttributeSlot::Variable {
                    buffer: Some(buffer),
                    ..
                } => AttributeValue::Variable(VertexAttribute {
                    buffer: buffer.id(),
                    format: attribute.format,
                    offset: 0,
                    stride: attribute.format.size(),
                }),
                AttributeSlot::Variable { buffer: None, .. } => {
                    panic!("bucket must be uploaded before drawing")
                }
            })
            .collect()
    }
}
