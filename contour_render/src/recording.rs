// Copyright 2026 the Contour Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A [`GpuContext`] that records commands instead of talking to a GPU.
//!
//! Used for tests and for inspecting how many state changes a frame costs.
//! Like a real context's state cache, it drops redundant vertex array,
//! program, and draw state binds before they are recorded.

use std::collections::{HashMap, HashSet};

use crate::gpu::{
    AttributeLocation, AttributeValue, BufferId, DrawMode, DrawState, GpuContext, ProgramId,
    ReleaseQueue, Released, UniformValue, UniqueBuffer, UniqueVertexArray, VertexArrayId,
};

/// Whether a buffer holds vertices or indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BufferKind {
    /// Vertex data.
    Vertex,
    /// Index data.
    Index,
}

/// One recorded GPU command.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// A buffer was created.
    CreateBuffer {
        /// New handle.
        id: BufferId,
        /// Vertex or index.
        kind: BufferKind,
        /// Size in bytes.
        len: usize,
    },
    /// A program was linked.
    CreateProgram {
        /// New handle.
        id: ProgramId,
        /// Attribute names in location order.
        attributes: Vec<String>,
    },
    /// A vertex array was created.
    CreateVertexArray(VertexArrayId),
    /// The current vertex array changed.
    BindVertexArray(VertexArrayId),
    /// An element buffer was bound.
    BindElementBuffer(BufferId),
    /// An attribute location was pointed at a value.
    BindAttribute {
        /// Attribute location.
        location: AttributeLocation,
        /// Bound value.
        value: AttributeValue,
        /// First vertex read.
        vertex_offset: usize,
    },
    /// The current program changed.
    UseProgram(ProgramId),
    /// Draw state changed.
    SetDrawState(DrawState),
    /// Uniforms were uploaded.
    SetUniforms(Vec<(&'static str, UniformValue)>),
    /// A draw call.
    DrawElements {
        /// Primitive type.
        mode: DrawMode,
        /// First index.
        index_offset: usize,
        /// Index count.
        index_count: usize,
    },
    /// A queued buffer was deleted.
    DeleteBuffer(BufferId),
    /// A queued vertex array was deleted.
    DeleteVertexArray(VertexArrayId),
}

/// A recording [`GpuContext`].
#[derive(Debug, Default)]
pub struct RecordingContext {
    next_id: u32,
    queue: ReleaseQueue,
    commands: Vec<Command>,
    buffers: HashMap<BufferId, Vec<u8>>,
    vertex_arrays: HashSet<VertexArrayId>,
    bound_vertex_array: Option<VertexArrayId>,
    program: Option<ProgramId>,
    draw_state: Option<DrawState>,
}

impl RecordingContext {
    /// Creates an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every command recorded since creation or the last
    /// [`clear_commands`](Self::clear_commands).
    #[must_use]
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// Forgets recorded commands. Bound state is kept.
    pub fn clear_commands(&mut self) {
        self.commands.clear();
    }

    /// Number of recorded commands matching `pred`.
    #[must_use]
    pub fn count(&self, pred: impl Fn(&Command) -> bool) -> usize {
        self.commands.iter().filter(|c| pred(c)).count()
    }

    /// Number of recorded draw calls.
    #[must_use]
    pub fn draw_calls(&self) -> usize {
        self.count(|c| matches!(c, Command::DrawElements { .. }))
    }

    /// Contents of a live buffer.
    #[must_use]
    pub fn buffer_data(&self, id: BufferId) -> Option<&[u8]> {
        self.buffers.get(&id).map(Vec::as_slice)
    }

    /// Number of buffers not yet deleted.
    #[must_use]
    pub fn live_buffers(&self) -> usize {
        self.buffers.len()
    }

    /// Number of vertex arrays not yet deleted.
    #[must_use]
    pub fn live_vertex_arrays(&self) -> usize {
        self.vertex_arrays.len()
    }

    fn next(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }

    fn create_buffer(&mut self, kind: BufferKind, data: &[u8]) -> UniqueBuffer {
        let id = BufferId(self.next());
        self.buffers.insert(id, data.to_vec());
        self.commands.push(Command::CreateBuffer {
            id,
            kind,
            len: data.len(),
        });
        UniqueBuffer::new(id, self.queue.clone())
    }
}

impl GpuContext for RecordingContext {
    fn create_vertex_buffer(&mut self, data: &[u8]) -> UniqueBuffer {
        self.create_buffer(BufferKind::Vertex, data)
    }

    fn create_index_buffer(&mut self, data: &[u8]) -> UniqueBuffer {
        self.create_buffer(BufferKind::Index, data)
    }

    fn create_program(
        &mut self,
        _vertex: &str,
        _fragment: &str,
        attributes: &[&str],
    ) -> Result<ProgramId, String> {
        let id = ProgramId(self.next());
        self.commands.push(Command::CreateProgram {
            id,
            attributes: attributes.iter().map(|a| (*a).to_owned()).collect(),
        });
        Ok(id)
    }

    fn create_vertex_array(&mut self) -> UniqueVertexArray {
        let id = VertexArrayId(self.next());
        self.vertex_arrays.insert(id);
        self.commands.push(Command::CreateVertexArray(id));
        UniqueVertexArray::new(id, self.queue.clone())
    }

    fn bind_vertex_array(&mut self, id: VertexArrayId) {
        if self.bound_vertex_array != Some(id) {
            self.bound_vertex_array = Some(id);
            self.commands.push(Command::BindVertexArray(id));
        }
    }

    fn bind_element_buffer(&mut self, id: BufferId) {
        self.commands.push(Command::BindElementBuffer(id));
    }

    fn bind_attribute(
        &mut self,
        location: AttributeLocation,
        value: &AttributeValue,
        vertex_offset: usize,
    ) {
        self.commands.push(Command::BindAttribute {
            location,
            value: *value,
            vertex_offset,
        });
    }

    fn use_program(&mut self, id: ProgramId) {
        if self.program != Some(id) {
            self.program = Some(id);
            self.commands.push(Command::UseProgram(id));
        }
    }

    fn set_draw_state(&mut self, state: &DrawState) {
        if self.draw_state.as_ref() != Some(state) {
            self.draw_state = Some(*state);
            self.commands.push(Command::SetDrawState(*state));
        }
    }

    fn set_uniforms(&mut self, uniforms: &[(&'static str, UniformValue)]) {
        self.commands.push(Command::SetUniforms(uniforms.to_vec()));
    }

    fn draw_elements(&mut self, mode: DrawMode, index_offset: usize, index_count: usize) {
        self.commands.push(Command::DrawElements {
            mode,
            index_offset,
            index_count,
        });
    }

    fn release_queue(&self) -> &ReleaseQueue {
        &self.queue
    }

    fn perform_cleanup(&mut self) {
        for released in self.queue.drain() {
            match released {
                Released::Buffer(id) => {
                    self.buffers.remove(&id);
                    self.commands.push(Command::DeleteBuffer(id));
                }
                Released::VertexArray(id) => {
                    self.vertex_arrays.remove(&id);
                    if self.bound_vertex_array == Some(id) {
                        self.bound_vertex_array = None;
                    }
                    self.commands.push(Command::DeleteVertexArray(id));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redundant_vertex_array_binds_are_dropped() {
        let mut ctx = RecordingContext::new();
        let vao = ctx.create_vertex_array();
        ctx.bind_vertex_array(vao.id());
        ctx.bind_vertex_array(vao.id());
        assert_eq!(
            ctx.count(|c| matches!(c, Command::BindVertexArray(_))),
            1
        );
    }

    #[test]
    fn cleanup_deletes_dropped_objects() {
        let mut ctx = RecordingContext::new();
        let buffer = ctx.create_vertex_buffer(&[1, 2, 3, 4]);
        let vao = ctx.create_vertex_array();
        assert_eq!(ctx.buffer_data(buffer.id()), Some(&[1, 2, 3, 4][..]));
        assert_eq!(ctx.live_buffers(), 1);
        assert_eq!(ctx.live_vertex_arrays(), 1);

        drop(buffer);
        drop(vao);
        assert_eq!(ctx.release_queue().len(), 2);
        assert_eq!(ctx.live_buffers(), 1);

        ctx.perform_cleanup();
        assert_eq!(ctx.live_buffers(), 0);
        assert_eq!(ctx.live_vertex_arrays(), 0);
        assert!(ctx.release_queue().is_empty());
    }

    #[test]
    fn deleted_vertex_array_is_rebound() {
        let mut ctx = RecordingContext::new();
        let vao = ctx.create_vertex_array();
        let id = vao.id();
        ctx.bind_vertex_array(id);
        drop(vao);
        ctx.perform_cleanup();
        ctx.clear_commands();
        ctx.bind_vertex_array(id);
        assert_eq!(ctx.commands(), &[Command::BindVertexArray(id)]);
    }
}
