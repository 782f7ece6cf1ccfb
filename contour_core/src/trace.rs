// Copyright 2026 the Contour Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for the render loop.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that
//! render-loop instrumentation calls at each stage: style evaluation, bucket
//! construction, GPU upload, and draw. All method bodies default to no-ops,
//! so implementing only the events you care about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing (zero overhead). When
//! **on**, each method performs a single `Option` branch before dispatching.
//!
//! [`FrameSummaryBuilder`] is a convenience helper that collects phase
//! timestamps and draw statistics during a frame and produces a
//! [`FrameSummary`] at the end.
//!
//! # Crate features
//!
//! - `trace`: enables the `Tracer` method bodies (one branch per call).
//! - `trace-rich` (implies `trace`): gates [`RenderPassChange`] events plus
//!   the corresponding `TraceSink` method.

use core::time::Duration;

use crate::layer::StyleChanges;
#[cfg(feature = "trace-rich")]
use crate::layer::{RenderPass, StyleLayerStore};

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Which phase of the render loop is being measured.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PhaseKind {
    /// Style cascade and evaluation.
    Evaluate,
    /// Bucket construction (tessellation, paint attribute population).
    Build,
    /// Uploading bucket data to the GPU.
    Upload,
    /// Issuing draw calls.
    Draw,
}

impl PhaseKind {
    /// A short lowercase name, e.g. `"evaluate"`.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Evaluate => "evaluate",
            Self::Build => "build",
            Self::Upload => "upload",
            Self::Draw => "draw",
        }
    }
}

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Marks the beginning of a render-loop phase.
#[derive(Clone, Copy, Debug)]
pub struct PhaseBeginEvent {
    /// Frame counter.
    pub frame_index: u64,
    /// Which phase is starting.
    pub phase: PhaseKind,
    /// Time at the start of the phase.
    pub timestamp: Duration,
}

/// Marks the end of a render-loop phase.
#[derive(Clone, Copy, Debug)]
pub struct PhaseEndEvent {
    /// Frame counter.
    pub frame_index: u64,
    /// Which phase is ending.
    pub phase: PhaseKind,
    /// Time at the end of the phase.
    pub timestamp: Duration,
}

/// Emitted after the style has been evaluated for a frame.
#[derive(Clone, Copy, Debug)]
pub struct StyleEvaluatedEvent {
    /// Frame counter.
    pub frame_index: u64,
    /// Zoom the style was evaluated at.
    pub zoom: f32,
    /// Number of layers re-cascaded.
    pub cascaded: u32,
    /// Number of layers whose buckets became stale.
    pub layout_changed: u32,
    /// Number of layers whose render pass changed.
    pub render_pass_changes: u32,
    /// Number of layers added.
    pub added: u32,
    /// Number of layers removed.
    pub removed: u32,
    /// Whether any property is mid-transition.
    pub transitioning: bool,
}

impl StyleEvaluatedEvent {
    /// Summarizes a [`StyleChanges`] for tracing.
    #[must_use]
    pub fn new(frame_index: u64, zoom: f32, changes: &StyleChanges) -> Self {
        Self {
            frame_index,
            zoom,
            cascaded: count(changes.cascaded.len()),
            layout_changed: count(changes.layout.len()),
            render_pass_changes: count(changes.render_passes.len()),
            added: count(changes.added.len()),
            removed: count(changes.removed.len()),
            transitioning: changes.transitioning,
        }
    }
}

/// Emitted after a bucket is built for one style layer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BucketBuiltEvent {
    /// Frame counter.
    pub frame_index: u64,
    /// Store slot of the style layer.
    pub layer_index: u32,
    /// Features that passed the filter.
    pub features: u32,
    /// Vertices produced.
    pub vertices: u32,
    /// Indices produced (three per triangle).
    pub indices: u32,
    /// Segments produced.
    pub segments: u32,
}

/// Emitted after a bucket's data is uploaded.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UploadEvent {
    /// Frame counter.
    pub frame_index: u64,
    /// Store slot of the style layer.
    pub layer_index: u32,
    /// Bytes of layout vertex data.
    pub vertex_bytes: usize,
    /// Bytes of index data.
    pub index_bytes: usize,
    /// Per-vertex paint attribute buffers created.
    pub paint_buffers: u32,
}

/// Emitted after a layer's draw calls are issued.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DrawEvent {
    /// Frame counter.
    pub frame_index: u64,
    /// Store slot of the style layer.
    pub layer_index: u32,
    /// Draw calls issued.
    pub draw_calls: u32,
    /// Vertex arrays created on first bind.
    pub vertex_arrays_created: u32,
    /// Element buffer binds.
    pub index_buffer_binds: u32,
    /// Individual attribute binds.
    pub attribute_binds: u32,
    /// Segment binds satisfied from the cache.
    pub skipped_binds: u32,
}

/// Per-frame timing summary produced by [`FrameSummaryBuilder`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameSummary {
    /// Frame counter.
    pub frame_index: u64,
    /// Zoom of the frame.
    pub zoom: f32,
    /// Evaluate phase duration (zero if not measured).
    pub evaluate: Duration,
    /// Build phase duration (zero if not measured).
    pub build: Duration,
    /// Upload phase duration (zero if not measured).
    pub upload: Duration,
    /// Draw phase duration (zero if not measured).
    pub draw: Duration,
    /// Total draw calls.
    pub draw_calls: u32,
    /// Whether another frame is needed for transitions.
    pub transitioning: bool,
}

/// A per-frame render pass change record.
#[cfg(feature = "trace-rich")]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderPassChange {
    /// Store slot of the style layer.
    pub layer_index: u32,
    /// The layer's new pass.
    pub pass: RenderPass,
}

/// Collects the render pass changes of an evaluation.
#[cfg(feature = "trace-rich")]
#[must_use]
pub fn render_pass_changes(
    store: &StyleLayerStore,
    changes: &StyleChanges,
) -> alloc::vec::Vec<RenderPassChange> {
    changes
        .render_passes
        .iter()
        .map(|&layer_index| RenderPassChange {
            layer_index,
            pass: store.render_pass_at(layer_index),
        })
        .collect()
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "layer counts fit in u32 in practice"
)]
fn count(n: usize) -> u32 {
    n as u32
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from the render loop.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called at the beginning of a render-loop phase.
    fn on_phase_begin(&mut self, e: &PhaseBeginEvent) {
        _ = e;
    }

    /// Called at the end of a render-loop phase.
    fn on_phase_end(&mut self, e: &PhaseEndEvent) {
        _ = e;
    }

    /// Called after the style is evaluated.
    fn on_style_evaluated(&mut self, e: &StyleEvaluatedEvent) {
        _ = e;
    }

    /// Called after a bucket is built.
    fn on_bucket_built(&mut self, e: &BucketBuiltEvent) {
        _ = e;
    }

    /// Called after a bucket is uploaded.
    fn on_upload(&mut self, e: &UploadEvent) {
        _ = e;
    }

    /// Called after a layer is drawn.
    fn on_draw(&mut self, e: &DrawEvent) {
        _ = e;
    }

    /// Called with a per-frame timing summary.
    fn on_frame_summary(&mut self, s: &FrameSummary) {
        _ = s;
    }

    /// Called with per-frame render pass changes (requires `trace-rich`
    /// feature).
    #[cfg(feature = "trace-rich")]
    fn on_render_pass_changes(&mut self, frame_index: u64, changes: &[RenderPassChange]) {
        _ = (frame_index, changes);
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits a [`PhaseBeginEvent`].
    #[inline]
    pub fn phase_begin(&mut self, e: &PhaseBeginEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_phase_begin(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`PhaseEndEvent`].
    #[inline]
    pub fn phase_end(&mut self, e: &PhaseEndEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_phase_end(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`StyleEvaluatedEvent`].
    #[inline]
    pub fn style_evaluated(&mut self, e: &StyleEvaluatedEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_style_evaluated(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`BucketBuiltEvent`].
    #[inline]
    pub fn bucket_built(&mut self, e: &BucketBuiltEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_bucket_built(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits an [`UploadEvent`].
    #[inline]
    pub fn upload(&mut self, e: &UploadEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_upload(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`DrawEvent`].
    #[inline]
    pub fn draw(&mut self, e: &DrawEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_draw(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`FrameSummary`].
    #[inline]
    pub fn frame_summary(&mut self, s: &FrameSummary) {
        #[cfg(feature = "trace")]
        if let Some(sink) = &mut self.sink {
            sink.on_frame_summary(s);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = s;
        }
    }

    /// Emits render pass changes (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    #[inline]
    pub fn render_pass_changes(&mut self, frame_index: u64, changes: &[RenderPassChange]) {
        if let Some(s) = &mut self.sink {
            s.on_render_pass_changes(frame_index, changes);
        }
    }
}

// ---------------------------------------------------------------------------
// FrameSummaryBuilder
// ---------------------------------------------------------------------------

/// Collects phase timestamps and draw statistics during a frame and produces
/// a [`FrameSummary`].
#[derive(Debug)]
pub struct FrameSummaryBuilder {
    frame_index: u64,
    zoom: f32,
    phase_starts: [Option<Duration>; 4],
    phase_ends: [Option<Duration>; 4],
    draw_calls: u32,
    transitioning: bool,
}

impl FrameSummaryBuilder {
    /// Starts building a summary for a frame.
    #[must_use]
    pub fn new(frame_index: u64, zoom: f32) -> Self {
        Self {
            frame_index,
            zoom,
            phase_starts: [None; 4],
            phase_ends: [None; 4],
            draw_calls: 0,
            transitioning: false,
        }
    }

    /// Records the start of a phase.
    pub fn phase_begin(&mut self, phase: PhaseKind, t: Duration) {
        self.phase_starts[phase_index(phase)] = Some(t);
    }

    /// Records the end of a phase.
    pub fn phase_end(&mut self, phase: PhaseKind, t: Duration) {
        self.phase_ends[phase_index(phase)] = Some(t);
    }

    /// Accumulates the draw calls of one layer.
    pub fn record_draw(&mut self, e: &DrawEvent) {
        self.draw_calls += e.draw_calls;
    }

    /// Takes the transition flag from a style evaluation.
    pub fn record_style(&mut self, e: &StyleEvaluatedEvent) {
        self.transitioning = e.transitioning;
    }

    /// Consumes the builder and produces the final [`FrameSummary`].
    #[must_use]
    pub fn finish(self) -> FrameSummary {
        FrameSummary {
            frame_index: self.frame_index,
            zoom: self.zoom,
            evaluate: self.phase_duration(PhaseKind::Evaluate),
            build: self.phase_duration(PhaseKind::Build),
            upload: self.phase_duration(PhaseKind::Upload),
            draw: self.phase_duration(PhaseKind::Draw),
            draw_calls: self.draw_calls,
            transitioning: self.transitioning,
        }
    }

    fn phase_duration(&self, phase: PhaseKind) -> Duration {
        let idx = phase_index(phase);
        match (self.phase_starts[idx], self.phase_ends[idx]) {
            (Some(start), Some(end)) => end.saturating_sub(start),
            _ => Duration::ZERO,
        }
    }
}

/// Maps a [`PhaseKind`] to an array index.
const fn phase_index(phase: PhaseKind) -> usize {
    match phase {
        PhaseKind::Evaluate => 0,
        PhaseKind::Build => 1,
        PhaseKind::Upload => 2,
        PhaseKind::Draw => 3,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;

    fn us(v: u64) -> Duration {
        Duration::from_micros(v)
    }

    #[test]
    fn style_evaluated_event_counts_changes() {
        let changes = StyleChanges {
            cascaded: vec![0, 1],
            layout: vec![1],
            render_passes: vec![0, 1, 2],
            added: vec![2],
            transitioning: true,
            ..StyleChanges::default()
        };
        let e = StyleEvaluatedEvent::new(9, 12.5, &changes);
        assert_eq!(e.frame_index, 9);
        assert_eq!(e.cascaded, 2);
        assert_eq!(e.layout_changed, 1);
        assert_eq!(e.render_pass_changes, 3);
        assert_eq!(e.added, 1);
        assert_eq!(e.removed, 0);
        assert!(e.transitioning);
    }

    #[test]
    fn noop_sink_compiles() {
        let mut sink = NoopSink;
        sink.on_bucket_built(&BucketBuiltEvent::default());
        sink.on_draw(&DrawEvent::default());
        sink.on_frame_summary(&FrameSummary::default());
    }

    #[test]
    fn tracer_none_does_nothing() {
        let mut tracer = Tracer::none();
        tracer.upload(&UploadEvent::default());
        tracer.draw(&DrawEvent::default());
    }

    #[test]
    fn summary_builder_computes_durations() {
        let mut builder = FrameSummaryBuilder::new(42, 14.0);

        builder.phase_begin(PhaseKind::Evaluate, us(1_000));
        builder.phase_end(PhaseKind::Evaluate, us(1_100));
        builder.phase_begin(PhaseKind::Build, us(1_100));
        builder.phase_end(PhaseKind::Build, us(1_500));
        builder.phase_begin(PhaseKind::Upload, us(1_500));
        builder.phase_end(PhaseKind::Upload, us(3_000));
        builder.phase_begin(PhaseKind::Draw, us(3_000));
        builder.phase_end(PhaseKind::Draw, us(3_050));
        builder.record_draw(&DrawEvent {
            draw_calls: 3,
            ..DrawEvent::default()
        });
        builder.record_draw(&DrawEvent {
            draw_calls: 2,
            ..DrawEvent::default()
        });

        let summary = builder.finish();
        assert_eq!(summary.evaluate, us(100));
        assert_eq!(summary.build, us(400));
        assert_eq!(summary.upload, us(1_500));
        assert_eq!(summary.draw, us(50));
        assert_eq!(summary.draw_calls, 5);
        assert_eq!(summary.frame_index, 42);
        assert!(!summary.transitioning);
    }

    #[test]
    fn summary_builder_missing_phases_are_zero() {
        let summary = FrameSummaryBuilder::new(0, 0.0).finish();
        assert_eq!(summary.evaluate, Duration::ZERO);
        assert_eq!(summary.build, Duration::ZERO);
        assert_eq!(summary.upload, Duration::ZERO);
        assert_eq!(summary.draw, Duration::ZERO);
    }

    #[cfg(feature = "trace")]
    #[test]
    fn tracer_dispatches_to_sink() {
        use alloc::vec::Vec;

        struct RecordingSink {
            draws: Vec<u32>,
        }
        impl TraceSink for RecordingSink {
            fn on_draw(&mut self, e: &DrawEvent) {
                self.draws.push(e.layer_index);
            }
        }

        let mut sink = RecordingSink { draws: Vec::new() };
        let mut tracer = Tracer::new(&mut sink);
        tracer.draw(&DrawEvent {
            layer_index: 7,
            ..DrawEvent::default()
        });
        // Access sink after tracer is dropped.
        drop(tracer);
        assert_eq!(sink.draws, &[7]);
    }

    #[cfg(feature = "trace-rich")]
    #[test]
    fn render_pass_changes_read_the_store() {
        use crate::layer::BackgroundLayer;
        use crate::style::EvaluationParameters;

        let mut store = StyleLayerStore::new();
        let id = store.add_layer("bg", BackgroundLayer::new()).unwrap();
        let changes = store.evaluate(&EvaluationParameters::new(0.0));
        assert_eq!(
            render_pass_changes(&store, &changes),
            vec![RenderPassChange {
                layer_index: id.index(),
                pass: RenderPass::Opaque,
            }]
        );
    }
}
