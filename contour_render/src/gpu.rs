// Copyright 2026 the Contour Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The GPU context abstraction.
//!
//! Everything that touches GPU state goes through [`GpuContext`]. Handles
//! ([`BufferId`], [`VertexArrayId`], [`ProgramId`]) are plain ids, so the
//! CPU-side types that hold them are `Send`. Owned GPU objects are wrapped in
//! [`UniqueBuffer`] and [`UniqueVertexArray`]: dropping one pushes its id onto
//! the context's [`ReleaseQueue`], and the context deletes queued objects in
//! [`perform_cleanup`](GpuContext::perform_cleanup) on the thread that owns
//! it.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

// ---------------------------------------------------------------------------
// Handles
// ---------------------------------------------------------------------------

/// A GPU buffer (vertex or index data).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BufferId(pub u32);

impl fmt::Debug for BufferId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BufferId({})", self.0)
    }
}

/// A vertex array object.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VertexArrayId(pub u32);

impl fmt::Debug for VertexArrayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VertexArrayId({})", self.0)
    }
}

/// A linked shader program.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProgramId(pub u32);

impl fmt::Debug for ProgramId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ProgramId({})", self.0)
    }
}

/// A vertex attribute location within a program.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AttributeLocation(pub u32);

// ---------------------------------------------------------------------------
// Attributes
// ---------------------------------------------------------------------------

/// Component layout of one vertex attribute.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AttributeFormat {
    /// Two signed 16-bit integers.
    I16x2,
    /// Four unsigned bytes.
    U8x4,
    /// One float.
    F32,
    /// Two floats.
    F32x2,
    /// Four floats.
    F32x4,
}

impl AttributeFormat {
    /// Size in bytes.
    #[must_use]
    pub const fn size(self) -> usize {
        match self {
            Self::I16x2 | Self::U8x4 | Self::F32 => 4,
            Self::F32x2 => 8,
            Self::F32x4 => 16,
        }
    }

    /// Number of components.
    #[must_use]
    pub const fn components(self) -> usize {
        match self {
            Self::F32 => 1,
            Self::I16x2 | Self::F32x2 => 2,
            Self::U8x4 | Self::F32x4 => 4,
        }
    }
}

/// A named attribute in a program's attribute set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AttributeDescriptor {
    /// Shader attribute name, e.g. `"a_pos"`.
    pub name: &'static str,
    /// Component layout.
    pub format: AttributeFormat,
}

impl AttributeDescriptor {
    /// Creates a descriptor.
    #[must_use]
    pub const fn new(name: &'static str, format: AttributeFormat) -> Self {
        Self { name, format }
    }
}

/// Where a buffer-backed attribute reads from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct VertexAttribute {
    /// Source buffer.
    pub buffer: BufferId,
    /// Component layout.
    pub format: AttributeFormat,
    /// Byte offset of the attribute within one vertex.
    pub offset: usize,
    /// Byte distance between consecutive vertices.
    pub stride: usize,
}

/// The value an attribute location is bound to.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AttributeValue {
    /// One value for every vertex. Unused components are zero.
    Constant([f32; 4]),
    /// One value per vertex, read from a buffer.
    Variable(VertexAttribute),
}

// ---------------------------------------------------------------------------
// Draw state
// ---------------------------------------------------------------------------

/// Primitive type of a draw call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DrawMode {
    /// Independent triangles, three indices each.
    #[default]
    Triangles,
    /// Independent lines, two indices each.
    Lines,
}

/// Comparison used by depth and stencil tests.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CompareFunc {
    /// Never passes.
    Never,
    /// Passes if less.
    Less,
    /// Passes if equal.
    Equal,
    /// Passes if less or equal.
    LessEqual,
    /// Passes if greater.
    Greater,
    /// Passes if different.
    NotEqual,
    /// Passes if greater or equal.
    GreaterEqual,
    /// Always passes.
    #[default]
    Always,
}

/// Depth test configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DepthMode {
    /// Depth comparison.
    pub func: CompareFunc,
    /// Whether passing fragments write depth.
    pub write: bool,
    /// Depth range `[near, far]`.
    pub range: [f32; 2],
}

impl DepthMode {
    /// No depth test, no depth writes.
    pub const DISABLED: Self = Self {
        func: CompareFunc::Always,
        write: false,
        range: [0.0, 1.0],
    };

    /// Tests against existing depth without writing, within `range`.
    #[must_use]
    pub const fn read_only(range: [f32; 2]) -> Self {
        Self {
            func: CompareFunc::LessEqual,
            write: false,
            range,
        }
    }
}

/// Stencil test configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct StencilMode {
    /// Stencil comparison.
    pub func: CompareFunc,
    /// Reference value.
    pub reference: u8,
    /// Mask applied to both reference and stored value.
    pub mask: u8,
}

impl StencilMode {
    /// No stencil test.
    pub const DISABLED: Self = Self {
        func: CompareFunc::Always,
        reference: 0,
        mask: 0,
    };

    /// Passes where the stored value equals `reference` (tile clipping).
    #[must_use]
    pub const fn equal(reference: u8, mask: u8) -> Self {
        Self {
            func: CompareFunc::Equal,
            reference,
            mask,
        }
    }
}

/// Blend mode for compositing a draw call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum BlendMode {
    /// Overwrite the destination.
    Replace,
    /// Premultiplied source-over alpha compositing.
    #[default]
    SourceOver,
    /// Add source to destination (overdraw inspection).
    Additive,
}

/// Color output configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ColorMode {
    /// Blend mode.
    pub blend: BlendMode,
    /// Per-channel write mask (RGBA).
    pub mask: [bool; 4],
}

impl ColorMode {
    /// Opaque writes, no blending.
    pub const UNBLENDED: Self = Self {
        blend: BlendMode::Replace,
        mask: [true; 4],
    };

    /// Premultiplied alpha blending.
    pub const ALPHA_BLENDED: Self = Self {
        blend: BlendMode::SourceOver,
        mask: [true; 4],
    };

    /// Additive blending, used to visualize overdraw.
    pub const ADDITIVE: Self = Self {
        blend: BlendMode::Additive,
        mask: [true; 4],
    };
}

/// Depth, stencil, and color state for a draw.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawState {
    /// Depth test.
    pub depth: DepthMode,
    /// Stencil test.
    pub stencil: StencilMode,
    /// Color output.
    pub color: ColorMode,
}

impl DrawState {
    /// Creates a draw state.
    #[must_use]
    pub const fn new(depth: DepthMode, stencil: StencilMode, color: ColorMode) -> Self {
        Self {
            depth,
            stencil,
            color,
        }
    }
}

// ---------------------------------------------------------------------------
// Uniforms
// ---------------------------------------------------------------------------

/// A uniform value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum UniformValue {
    /// `float`.
    F32(f32),
    /// `vec2`.
    Vec2([f32; 2]),
    /// `vec4`.
    Vec4([f32; 4]),
    /// `mat4`, column-major.
    Mat4([f32; 16]),
}

/// Named uniform values for one draw.
pub type UniformValues = Vec<(&'static str, UniformValue)>;

// ---------------------------------------------------------------------------
// Release queue and owned handles
// ---------------------------------------------------------------------------

/// A GPU object waiting to be deleted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Released {
    /// A buffer.
    Buffer(BufferId),
    /// A vertex array.
    VertexArray(VertexArrayId),
}

/// Objects dropped on any thread, deleted later on the context's thread.
#[derive(Clone, Debug, Default)]
pub struct ReleaseQueue {
    inner: Arc<Mutex<Vec<Released>>>,
}

impl ReleaseQueue {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues an object for deletion.
    pub fn push(&self, released: Released) {
        // A panic while holding the lock leaves the Vec intact.
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(released);
    }

    /// Takes every queued object.
    #[must_use]
    pub fn drain(&self) -> Vec<Released> {
        std::mem::take(&mut *self.inner.lock().unwrap_or_else(PoisonError::into_inner))
    }

    /// Number of queued objects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Returns `true` if nothing is queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// An owned buffer. Dropping it queues the buffer for deletion.
#[derive(Debug)]
pub struct UniqueBuffer {
    id: BufferId,
    queue: ReleaseQueue,
}

impl UniqueBuffer {
    /// Takes ownership of `id`; it is released through `queue`.
    #[must_use]
    pub fn new(id: BufferId, queue: ReleaseQueue) -> Self {
        Self { id, queue }
    }

    /// The buffer handle.
    #[must_use]
    pub fn id(&self) -> BufferId {
        self.id
    }
}

impl Drop for UniqueBuffer {
    fn drop(&mut self) {
        self.queue.push(Released::Buffer(self.id));
    }
}

/// An owned vertex array. Dropping it queues the vertex array for deletion.
#[derive(Debug)]
pub struct UniqueVertexArray {
    id: VertexArrayId,
    queue: ReleaseQueue,
}

impl UniqueVertexArray {
    /// Takes ownership of `id`; it is released through `queue`.
    #[must_use]
    pub fn new(id: VertexArrayId, queue: ReleaseQueue) -> Self {
        Self { id, queue }
    }

    /// The vertex array handle.
    #[must_use]
    pub fn id(&self) -> VertexArrayId {
        self.id
    }
}

impl Drop for UniqueVertexArray {
    fn drop(&mut self) {
        self.queue.push(Released::VertexArray(self.id));
    }
}

// ---------------------------------------------------------------------------
// GpuContext trait
// ---------------------------------------------------------------------------

/// A GPU context owned by the render thread.
///
/// Binding methods are expected to skip redundant state changes where the
/// underlying API allows; callers still avoid issuing them where a cheaper
/// check exists (see [`Segment::bind`](crate::Segment::bind)).
pub trait GpuContext {
    /// Creates a vertex buffer holding `data`.
    fn create_vertex_buffer(&mut self, data: &[u8]) -> UniqueBuffer;

    /// Creates an index buffer holding `data`.
    fn create_index_buffer(&mut self, data: &[u8]) -> UniqueBuffer;

    /// Compiles and links a program, binding `attributes[i]` to location `i`.
    ///
    /// # Errors
    ///
    /// Returns the compiler or linker log on failure.
    fn create_program(
        &mut self,
        vertex: &str,
        fragment: &str,
        attributes: &[&str],
    ) -> Result<ProgramId, String>;

    /// Creates a vertex array object.
    fn create_vertex_array(&mut self) -> UniqueVertexArray;

    /// Makes `id` the current vertex array.
    fn bind_vertex_array(&mut self, id: VertexArrayId);

    /// Binds the element buffer of the current vertex array.
    fn bind_element_buffer(&mut self, id: BufferId);

    /// Points `location` of the current vertex array at `value`, with
    /// buffer reads starting `vertex_offset` vertices in.
    fn bind_attribute(
        &mut self,
        location: AttributeLocation,
        value: &AttributeValue,
        vertex_offset: usize,
    );

    /// Makes `id` the current program.
    fn use_program(&mut self, id: ProgramId);

    /// Applies depth, stencil, and color state.
    fn set_draw_state(&mut self, state: &DrawState);

    /// Uploads uniforms to the current program.
    fn set_uniforms(&mut self, uniforms: &[(&'static str, UniformValue)]);

    /// Draws `index_count` indices starting at `index_offset` from the
    /// current vertex array.
    fn draw_elements(&mut self, mode: DrawMode, index_offset: usize, index_count: usize);

    /// The queue owned objects are released through.
    fn release_queue(&self) -> &ReleaseQueue;

    /// Deletes every object on the release queue.
    fn perform_cleanup(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attribute_format_sizes() {
        assert_eq!(AttributeFormat::I16x2.size(), 4);
        assert_eq!(AttributeFormat::U8x4.components(), 4);
        assert_eq!(AttributeFormat::F32x4.size(), 16);
        assert_eq!(AttributeFormat::F32.components(), 1);
    }

    #[test]
    fn dropping_owned_handles_queues_them() {
        let queue = ReleaseQueue::new();
        let buffer = UniqueBuffer::new(BufferId(3), queue.clone());
        let vao = UniqueVertexArray::new(VertexArrayId(4), queue.clone());
        assert!(queue.is_empty());

        drop(buffer);
        drop(vao);
        assert_eq!(
            queue.drain(),
            vec![
                Released::Buffer(BufferId(3)),
                Released::VertexArray(VertexArrayId(4)),
            ]
        );
        assert!(queue.is_empty());
    }

    #[test]
    fn handles_release_from_other_threads() {
        let queue = ReleaseQueue::new();
        let vao = UniqueVertexArray::new(VertexArrayId(9), queue.clone());
        std::thread::spawn(move || drop(vao))
            .join()
            .unwrap();
        assert_eq!(queue.drain(), vec![Released::VertexArray(VertexArrayId(9))]);
    }
}
