// Copyright 2026 the Contour Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Draw segments and their bind cache.
//!
//! A bucket's vertices are addressed with 16-bit indices, so a bucket holding
//! more than 65535 vertices is split into [`Segment`]s. Each segment owns a
//! vertex array object whose state (element buffer, attribute pointers) is
//! cached across frames: re-binding a segment whose inputs did not change
//! costs a single vertex array bind.

use std::slice;

use crate::gpu::{AttributeLocation, AttributeValue, BufferId, GpuContext, UniqueVertexArray};

/// Most vertices one segment can address.
pub const MAX_SEGMENT_VERTICES: usize = u16::MAX as usize;

/// What a [`Segment::bind`] call had to do.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BindOutcome {
    /// A vertex array was created (first bind).
    pub created_vertex_array: bool,
    /// The element buffer was bound.
    pub bound_index_buffer: bool,
    /// Number of attribute pointers issued.
    pub bound_attributes: u32,
}

impl BindOutcome {
    /// Returns `true` if only the vertex array bind was needed.
    #[must_use]
    pub fn is_cached(&self) -> bool {
        !self.created_vertex_array && !self.bound_index_buffer && self.bound_attributes == 0
    }
}

/// A contiguous range of a bucket's vertices and indices.
#[derive(Debug)]
pub struct Segment {
    vertex_offset: usize,
    index_offset: usize,
    /// Number of vertices in the segment.
    pub vertex_length: usize,
    /// Number of indices in the segment.
    pub index_length: usize,

    vertex_array: Option<UniqueVertexArray>,
    index_buffer: Option<BufferId>,
    attribute_bindings: Option<Vec<AttributeValue>>,
}

impl Segment {
    /// Creates an empty segment starting at the given offsets.
    #[must_use]
    pub fn new(vertex_offset: usize, index_offset: usize) -> Self {
        Self::with_lengths(vertex_offset, index_offset, 0, 0)
    }

    /// Creates a segment covering the given ranges.
    #[must_use]
    pub fn with_lengths(
        vertex_offset: usize,
        index_offset: usize,
        vertex_length: usize,
        index_length: usize,
    ) -> Self {
        Self {
            vertex_offset,
            index_offset,
            vertex_length,
            index_length,
            vertex_array: None,
            index_buffer: None,
            attribute_bindings: None,
        }
    }

    /// First vertex of the segment. Indices are relative to it.
    #[must_use]
    pub fn vertex_offset(&self) -> usize {
        self.vertex_offset
    }

    /// First index of the segment.
    #[must_use]
    pub fn index_offset(&self) -> usize {
        self.index_offset
    }

    /// Makes the segment's vertex array current and brings its state up to
    /// date.
    ///
    /// The vertex array is created on first use. The element buffer and the
    /// attribute pointers are only re-issued when they differ from what the
    /// vertex array already holds.
    ///
    /// # Panics
    ///
    /// Panics if `locations` and `bindings` differ in length.
    pub fn bind(
        &mut self,
        context: &mut impl GpuContext,
        index_buffer: BufferId,
        locations: &[AttributeLocation],
        bindings: &[AttributeValue],
    ) -> BindOutcome {
        assert_eq!(
            locations.len(),
            bindings.len(),
            "one binding per attribute location"
        );
        let mut outcome = BindOutcome::default();

        let vertex_array = match &self.vertex_array {
            Some(vertex_array) => vertex_array.id(),
            None => {
                outcome.created_vertex_array = true;
                self.vertex_array.insert(context.create_vertex_array()).id()
            }
        };
        context.bind_vertex_array(vertex_array);

        if self.index_buffer != Some(index_buffer) {
            self.index_buffer = Some(index_buffer);
            context.bind_element_buffer(index_buffer);
            outcome.bound_index_buffer = true;
        }

        if self.attribute_bindings.as_deref() != Some(bindings) {
            for (location, value) in locations.iter().zip(bindings) {
                context.bind_attribute(*location, value, self.vertex_offset);
                outcome.bound_attributes += 1;
            }
            self.attribute_bindings = Some(bindings.to_vec());
        }

        outcome
    }
}

/// The ordered segments of one bucket.
#[derive(Debug, Default)]
pub struct SegmentVector {
    segments: Vec<Segment>,
}

impl SegmentVector {
    /// Creates an empty vector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a segment.
    pub fn push(&mut self, segment: Segment) {
        self.segments.push(segment);
    }

    /// Returns the segment to append `vertex_count` vertices to.
    ///
    /// A new segment starting at `next_vertex` / `next_index` is opened when
    /// there is none yet or the last one would overflow the 16-bit index
    /// range.
    ///
    /// # Panics
    ///
    /// Panics if `vertex_count` alone exceeds [`MAX_SEGMENT_VERTICES`].
    pub fn reserve(
        &mut self,
        vertex_count: usize,
        next_vertex: usize,
        next_index: usize,
    ) -> &mut Segment {
        assert!(
            vertex_count <= MAX_SEGMENT_VERTICES,
            "{vertex_count} vertices do not fit one segment"
        );
        let fits = self
            .segments
            .last()
            .is_some_and(|last| last.vertex_length + vertex_count <= MAX_SEGMENT_VERTICES);
        if !fits {
            self.segments.push(Segment::new(next_vertex, next_index));
        }
        match self.segments.last_mut() {
            Some(segment) => segment,
            None => unreachable!("a segment was just pushed"),
        }
    }

    /// Number of segments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Returns `true` if there are no segments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Iterates over the segments.
    pub fn iter(&self) -> slice::Iter<'_, Segment> {
        self.segments.iter()
    }

    /// Iterates mutably over the segments.
    pub fn iter_mut(&mut self) -> slice::IterMut<'_, Segment> {
        self.segments.iter_mut()
    }
}

impl<'a> IntoIterator for &'a SegmentVector {
    type Item = &'a Segment;
    type IntoIter = slice::Iter<'a, Segment>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a> IntoIterator for &'a mut SegmentVector {
    type Item = &'a mut Segment;
    type IntoIter = slice::IterMut<'a, Segment>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}
