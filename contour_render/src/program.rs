// Copyright 2026 the Contour Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shader program assembly and draw calls.

use std::fmt;
use std::marker::PhantomData;

use bytemuck::Pod;
use contour_core::trace::DrawEvent;

use crate::attribute::{AttributeSet, layout_attribute_values};
use crate::buffer::{IndexBuffer, VertexBuffer};
use crate::gpu::{
    AttributeLocation, AttributeValue, DrawMode, DrawState, GpuContext, ProgramId, UniformValue,
};
use crate::segment::{BindOutcome, SegmentVector};

/// Marker every fragment shader must contain when overdraw inspection is on.
pub const OVERDRAW_MARKER: &str = "#ifdef OVERDRAW_INSPECTOR";

/// Settings shared by every program of a renderer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProgramParameters {
    /// Device pixels per logical pixel.
    pub pixel_ratio: f32,
    /// Whether to build the overdraw inspector variant.
    pub overdraw: bool,
}

impl ProgramParameters {
    /// Creates program parameters.
    #[must_use]
    pub const fn new(pixel_ratio: f32, overdraw: bool) -> Self {
        Self {
            pixel_ratio,
            overdraw,
        }
    }
}

impl Default for ProgramParameters {
    fn default() -> Self {
        Self::new(1.0, false)
    }
}

/// GLSL source of one shader pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ShaderSource {
    /// Name used in error messages.
    pub name: &'static str,
    /// Vertex shader.
    pub vertex: &'static str,
    /// Fragment shader.
    pub fragment: &'static str,
}

/// Errors from building a [`Program`].
///
/// These indicate a broken shader or build configuration and are not
/// expected to be recoverable.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProgramError {
    /// Overdraw inspection was requested but the fragment shader has no
    /// `#ifdef OVERDRAW_INSPECTOR` region.
    MissingOverdrawMarker {
        /// Shader name.
        shader: &'static str,
    },
    /// The context failed to compile or link the program.
    Compile {
        /// Shader name.
        shader: &'static str,
        /// Compiler or linker log.
        log: String,
    },
}

impl fmt::Display for ProgramError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingOverdrawMarker { shader } => write!(
                f,
                "fragment shader \"{shader}\" has no {OVERDRAW_MARKER} region"
            ),
            Self::Compile { shader, log } => {
                write!(f, "failed to build program \"{shader}\": {log}")
            }
        }
    }
}

impl std::error::Error for ProgramError {}

fn pixel_ratio_define(params: &ProgramParameters) -> String {
    format!("#define DEVICE_PIXEL_RATIO {:.6}\n", params.pixel_ratio)
}

/// The vertex source with the pixel ratio define prepended.
#[must_use]
pub fn vertex_source(shader: &ShaderSource, params: &ProgramParameters) -> String {
    pixel_ratio_define(params) + shader.vertex
}

/// The fragment source with the pixel ratio define prepended and, in
/// overdraw mode, `OVERDRAW_INSPECTOR` defined after the first line.
///
/// # Errors
///
/// Returns [`ProgramError::MissingOverdrawMarker`] in overdraw mode if the
/// shader has no overdraw region.
pub fn fragment_source(
    shader: &ShaderSource,
    params: &ProgramParameters,
) -> Result<String, ProgramError> {
    let mut source = pixel_ratio_define(params) + shader.fragment;
    if params.overdraw {
        if !source.contains(OVERDRAW_MARKER) {
            return Err(ProgramError::MissingOverdrawMarker {
                shader: shader.name,
            });
        }
        // The define line always ends in a newline.
        if let Some(newline) = source.find('\n') {
            source.replace_range(newline..=newline, "\n#define OVERDRAW_INSPECTOR\n");
        }
    }
    Ok(source)
}

/// Counts what a [`Program::draw`] call cost.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DrawStats {
    /// Draw calls issued (one per segment).
    pub draw_calls: u32,
    /// Vertex arrays created on first bind.
    pub vertex_arrays_created: u32,
    /// Element buffer binds.
    pub index_buffer_binds: u32,
    /// Attribute pointer binds.
    pub attribute_binds: u32,
    /// Segment binds that hit the cache completely.
    pub skipped_binds: u32,
}

impl DrawStats {
    /// Accounts for one segment bind and its draw call.
    pub fn record(&mut self, outcome: &BindOutcome) {
        self.draw_calls += 1;
        self.vertex_arrays_created += u32::from(outcome.created_vertex_array);
        self.index_buffer_binds += u32::from(outcome.bound_index_buffer);
        self.attribute_binds += outcome.bound_attributes;
        self.skipped_binds += u32::from(outcome.is_cached());
    }

    /// Adds another set of stats.
    pub fn merge(&mut self, other: &Self) {
        self.draw_calls += other.draw_calls;
        self.vertex_arrays_created += other.vertex_arrays_created;
        self.index_buffer_binds += other.index_buffer_binds;
        self.attribute_binds += other.attribute_binds;
        self.skipped_binds += other.skipped_binds;
    }

    /// The trace event for these stats.
    #[must_use]
    pub fn event(&self, frame_index: u64, layer_index: u32) -> DrawEvent {
        DrawEvent {
            frame_index,
            layer_index,
            draw_calls: self.draw_calls,
            vertex_arrays_created: self.vertex_arrays_created,
            index_buffer_binds: self.index_buffer_binds,
            attribute_binds: self.attribute_binds,
            skipped_binds: self.skipped_binds,
        }
    }
}

/// A linked program for layout vertex type `L` and paint attributes `P`.
///
/// Attribute locations are assigned in order: the layout attributes first,
/// then the paint attributes.
#[derive(Debug)]
pub struct Program<L, P> {
    id: ProgramId,
    locations: Vec<AttributeLocation>,
    _marker: PhantomData<fn() -> (L, P)>,
}

impl<L: AttributeSet + Pod, P: AttributeSet> Program<L, P> {
    /// Assembles and links the program.
    ///
    /// # Errors
    ///
    /// Returns [`ProgramError`] if the sources cannot be assembled or the
    /// context fails to link them.
    pub fn new(
        context: &mut impl GpuContext,
        shader: &ShaderSource,
        params: &ProgramParameters,
    ) -> Result<Self, ProgramError> {
        let vertex = vertex_source(shader, params);
        let fragment = fragment_source(shader, params)?;
        let names = Self::attribute_names();
        let id = context
            .create_program(&vertex, &fragment, &names)
            .map_err(|log| ProgramError::Compile {
                shader: shader.name,
                log,
            })?;
        let locations = (0..names.len())
            .map(|i| AttributeLocation(u32::try_from(i).unwrap_or(u32::MAX)))
            .collect();
        Ok(Self {
            id,
            locations,
            _marker: PhantomData,
        })
    }

    /// Layout attribute names followed by paint attribute names.
    #[must_use]
    pub fn attribute_names() -> Vec<&'static str> {
        L::ATTRIBUTES
            .iter()
            .chain(P::ATTRIBUTES)
            .map(|a| a.name)
            .collect()
    }

    /// The program handle.
    #[must_use]
    pub fn id(&self) -> ProgramId {
        self.id
    }

    /// Draws every segment, binding layout attributes from
    /// `layout_vertices` followed by `paint_values`.
    ///
    /// # Panics
    ///
    /// Panics if `paint_values` does not hold one value per paint attribute.
    pub fn draw(
        &self,
        context: &mut impl GpuContext,
        mode: DrawMode,
        state: &DrawState,
        uniforms: &[(&'static str, UniformValue)],
        layout_vertices: &VertexBuffer<L>,
        indices: &IndexBuffer,
        segments: &mut SegmentVector,
        paint_values: &[AttributeValue],
    ) -> DrawStats {
        assert_eq!(
            paint_values.len(),
            P::ATTRIBUTES.len(),
            "one paint value per paint attribute"
        );
        context.use_program(self.id);
        context.set_draw_state(state);
        context.set_uniforms(uniforms);

        let mut values = layout_attribute_values(layout_vertices);
        values.extend_from_slice(paint_values);

        let mut stats = DrawStats::default();
        for segment in segments {
            let outcome = segment.bind(context, indices.id(), &self.locations, &values);
            context.draw_elements(mode, segment.index_offset(), segment.index_length);
            stats.record(&outcome);
        }
        stats
    }
}
