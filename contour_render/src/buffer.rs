// Copyright 2026 the Contour Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Typed vertex and index buffers.

use std::marker::PhantomData;

use bytemuck::Pod;

use crate::gpu::{BufferId, GpuContext, UniqueBuffer};

/// A GPU buffer holding vertices of type `V`.
#[derive(Debug)]
pub struct VertexBuffer<V> {
    buffer: UniqueBuffer,
    vertex_count: usize,
    _marker: PhantomData<fn() -> V>,
}

impl<V: Pod> VertexBuffer<V> {
    /// Uploads `vertices` into a new buffer.
    pub fn upload(context: &mut impl GpuContext, vertices: &[V]) -> Self {
        Self {
            buffer: context.create_vertex_buffer(bytemuck::cast_slice(vertices)),
            vertex_count: vertices.len(),
            _marker: PhantomData,
        }
    }

    /// The buffer handle.
    #[must_use]
    pub fn id(&self) -> BufferId {
        self.buffer.id()
    }

    /// Number of vertices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.vertex_count
    }

    /// Returns `true` if the buffer holds no vertices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertex_count == 0
    }

    /// Size in bytes.
    #[must_use]
    pub fn byte_len(&self) -> usize {
        self.vertex_count * size_of::<V>()
    }
}

/// A GPU buffer of 16-bit triangle indices.
#[derive(Debug)]
pub struct IndexBuffer {
    buffer: UniqueBuffer,
    index_count: usize,
}

impl IndexBuffer {
    /// Uploads `triangles` into a new buffer.
    pub fn upload(context: &mut impl GpuContext, triangles: &[[u16; 3]]) -> Self {
        Self {
            buffer: context.create_index_buffer(bytemuck::cast_slice(triangles)),
            index_count: triangles.len() * 3,
        }
    }

    /// The buffer handle.
    #[must_use]
    pub fn id(&self) -> BufferId {
        self.buffer.id()
    }

    /// Number of indices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.index_count
    }

    /// Returns `true` if the buffer holds no indices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index_count == 0
    }

    /// Size in bytes.
    #[must_use]
    pub fn byte_len(&self) -> usize {
        self.index_count * size_of::<u16>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recording::RecordingContext;

    #[test]
    fn index_upload_packs_u16_triangles() {
        let mut ctx = RecordingContext::new();
        let indices = IndexBuffer::upload(&mut ctx, &[[0, 1, 2], [1, 3, 2]]);
        assert_eq!(indices.len(), 6);
        assert_eq!(indices.byte_len(), 12);
        let data = ctx.buffer_data(indices.id()).unwrap();
        let read: Vec<u16> = data
            .chunks_exact(2)
            .map(|b| u16::from_ne_bytes([b[0], b[1]]))
            .collect();
        assert_eq!(read, vec![0, 1, 2, 1, 3, 2]);
    }

    #[test]
    fn vertex_upload_counts_vertices() {
        let mut ctx = RecordingContext::new();
        let vertices = VertexBuffer::upload(&mut ctx, &[[1.0_f32, 2.0], [3.0, 4.0]]);
        assert_eq!(vertices.len(), 2);
        assert_eq!(vertices.byte_len(), 16);
        assert_eq!(ctx.buffer_data(vertices.id()).map(<[u8]>::len), Some(16));
    }
}
