// Copyright 2026 the Contour Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! GPU-facing half of contour: buckets, paint attributes, and programs.
//!
//! The crate turns the evaluated style layers of [`contour_core`] into draw
//! calls against a [`GpuContext`]:
//!
//! ```text
//!   LineLayer ──create_bucket──▶ LineBucket ──upload──▶ GPU buffers
//!                                    │
//!                                    ▼
//!   LineProgram ◀──draw── segments + PaintAttributeData
//! ```
//!
//! - [`LineBucket`] tessellates line features into extruded vertices, split
//!   into [`Segment`]s that each fit 16-bit indices.
//! - [`PaintAttributeData`] binds data-driven paint properties either as a
//!   constant attribute or as a per-vertex buffer.
//! - [`Segment::bind`] caches one vertex array per program and skips
//!   rebinding when nothing changed.
//! - [`Program`] assembles shader sources (pixel ratio and overdraw defines)
//!   and assigns attribute locations.
//!
//! GPU objects are owned by [`UniqueBuffer`] and [`UniqueVertexArray`]. They
//! may be dropped on any thread; deletion is deferred until the context's
//! [`perform_cleanup`](GpuContext::perform_cleanup).
//!
//! [`recording::RecordingContext`] is a headless [`GpuContext`] that records
//! the commands it receives, for tests and diagnostics.

#![cfg_attr(docsrs, feature(doc_auto_cfg))]

mod attribute;
mod bucket;
mod buffer;
mod gpu;
mod line;
mod paint;
mod program;
pub mod recording;
mod segment;
mod shaders;

pub use attribute::{AttributeComponents, AttributeSet, layout_attribute_values};
pub use bucket::{Bucket, BucketLayer, BucketParameters, UploadStats};
pub use buffer::{IndexBuffer, VertexBuffer};
pub use gpu::{
    AttributeDescriptor, AttributeFormat, AttributeLocation, AttributeValue, BlendMode, BufferId,
    ColorMode, CompareFunc, DepthMode, DrawMode, DrawState, GpuContext, ProgramId, ReleaseQueue,
    Released, StencilMode, UniformValue, UniformValues, UniqueBuffer, UniqueVertexArray,
    VertexArrayId, VertexAttribute,
};
pub use line::{
    EXTRUDE_SCALE, LINE_DISTANCE_SCALE, LineBucket, LineLayoutVertex, LineProgram,
    MAX_LINE_DISTANCE, line_uniforms,
};
pub use paint::{DataDrivenPaint, PaintAttributeData};
pub use program::{
    DrawStats, OVERDRAW_MARKER, Program, ProgramError, ProgramParameters, ShaderSource,
    fragment_source, vertex_source,
};
pub use segment::{BindOutcome, MAX_SEGMENT_VERTICES, Segment, SegmentVector};
pub use shaders::LINE_SHADER;
