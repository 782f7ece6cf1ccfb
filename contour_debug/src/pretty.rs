// Copyright 2026 the Contour Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr). Durations
//! are printed in microseconds.

use std::io::Write;
use std::time::Duration;

use contour_core::trace::{
    BucketBuiltEvent, DrawEvent, FrameSummary, PhaseBeginEvent, PhaseEndEvent, RenderPassChange,
    StyleEvaluatedEvent, TraceSink, UploadEvent,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink").finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
        }
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self { writer }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self { writer }
    }

    /// Consumes the sink and returns its writer.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.writer
    }
}

fn us(d: Duration) -> f64 {
    d.as_nanos() as f64 / 1000.0
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_phase_begin(&mut self, e: &PhaseBeginEvent) {
        let _ = writeln!(
            self.writer,
            "[phase:begin] frame={} {} at {:.1}µs",
            e.frame_index,
            e.phase.name(),
            us(e.timestamp),
        );
    }

    fn on_phase_end(&mut self, e: &PhaseEndEvent) {
        let _ = writeln!(
            self.writer,
            "[phase:end] frame={} {} at {:.1}µs",
            e.frame_index,
            e.phase.name(),
            us(e.timestamp),
        );
    }

    fn on_style_evaluated(&mut self, e: &StyleEvaluatedEvent) {
        let _ = writeln!(
            self.writer,
            "[style] frame={} zoom={:.2} cascaded={} layout={} passes={} +{} -{}{}",
            e.frame_index,
            e.zoom,
            e.cascaded,
            e.layout_changed,
            e.render_pass_changes,
            e.added,
            e.removed,
            if e.transitioning { " transitioning" } else { "" },
        );
    }

    fn on_bucket_built(&mut self, e: &BucketBuiltEvent) {
        let _ = writeln!(
            self.writer,
            "[bucket] frame={} layer={} features={} vertices={} indices={} segments={}",
            e.frame_index, e.layer_index, e.features, e.vertices, e.indices, e.segments,
        );
    }

    fn on_upload(&mut self, e: &UploadEvent) {
        let _ = writeln!(
            self.writer,
            "[upload] frame={} layer={} vertex={}B index={}B paint_buffers={}",
            e.frame_index, e.layer_index, e.vertex_bytes, e.index_bytes, e.paint_buffers,
        );
    }

    fn on_draw(&mut self, e: &DrawEvent) {
        let _ = writeln!(
            self.writer,
            "[draw] frame={} layer={} calls={} vao_created={} attr_binds={} cached={}",
            e.frame_index,
            e.layer_index,
            e.draw_calls,
            e.vertex_arrays_created,
            e.attribute_binds,
            e.skipped_binds,
        );
    }

    fn on_frame_summary(&mut self, s: &FrameSummary) {
        let _ = writeln!(
            self.writer,
            "[summary] frame={} zoom={:.2} evaluate={:.1}µs build={:.1}µs \
             upload={:.1}µs draw={:.1}µs calls={}{}",
            s.frame_index,
            s.zoom,
            us(s.evaluate),
            us(s.build),
            us(s.upload),
            us(s.draw),
            s.draw_calls,
            if s.transitioning { " transitioning" } else { "" },
        );
    }

    fn on_render_pass_changes(&mut self, frame_index: u64, changes: &[RenderPassChange]) {
        for change in changes {
            let _ = writeln!(
                self.writer,
                "[pass] frame={frame_index} layer={} -> {:?}",
                change.layer_index, change.pass,
            );
        }
    }
}
