// Copyright 2026 the Contour Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Static attribute sets.

use contour_core::style::Color;

use crate::buffer::VertexBuffer;
use crate::gpu::{AttributeDescriptor, AttributeValue, VertexAttribute};

/// A fixed, ordered list of shader attributes.
///
/// Layout vertex types list the fields of one vertex, in memory order.
/// Paint types list their data-driven properties.
pub trait AttributeSet {
    /// The attributes, in location order.
    const ATTRIBUTES: &'static [AttributeDescriptor];
}

/// Binds every attribute of a layout vertex type to `buffer`.
///
/// Offsets follow the attribute order, so a vertex type's fields must be
/// declared in the same order as its [`AttributeSet::ATTRIBUTES`].
#[must_use]
pub fn layout_attribute_values<V: AttributeSet + bytemuck::Pod>(
    buffer: &VertexBuffer<V>,
) -> Vec<AttributeValue> {
    let stride = size_of::<V>();
    let mut offset = 0;
    V::ATTRIBUTES
        .iter()
        .map(|attribute| {
            let value = AttributeValue::Variable(VertexAttribute {
                buffer: buffer.id(),
                format: attribute.format,
                offset,
                stride,
            });
            offset += attribute.format.size();
            value
        })
        .collect()
}

/// Conversion of an evaluated property to attribute components.
pub trait AttributeComponents {
    /// The value padded to four components.
    fn components(&self) -> [f32; 4];
}

impl AttributeComponents for f32 {
    fn components(&self) -> [f32; 4] {
        [*self, 0.0, 0.0, 0.0]
    }
}

impl AttributeComponents for Color {
    fn components(&self) -> [f32; 4] {
        self.to_array()
    }
}
