// Copyright 2026 the Contour Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compact binary event recording and decoding.
//!
//! [`RecorderSink`] implements [`TraceSink`] and encodes events into a
//! `Vec<u8>` as fixed-size little-endian records. [`decode`] reads them back
//! as an iterator of [`RecordedEvent`].
//!
//! Durations are stored as whole nanoseconds and zoom levels as `f32` bits.
//! [`on_render_pass_changes`](TraceSink::on_render_pass_changes) stores only
//! the count.

use std::time::Duration;

use contour_core::trace::{
    BucketBuiltEvent, DrawEvent, FrameSummary, PhaseBeginEvent, PhaseEndEvent, PhaseKind,
    RenderPassChange, StyleEvaluatedEvent, TraceSink, UploadEvent,
};

// ---------------------------------------------------------------------------
// Event type discriminants
// ---------------------------------------------------------------------------

const TAG_PHASE_BEGIN: u8 = 1;
const TAG_PHASE_END: u8 = 2;
const TAG_STYLE_EVALUATED: u8 = 3;
const TAG_BUCKET_BUILT: u8 = 4;
const TAG_UPLOAD: u8 = 5;
const TAG_DRAW: u8 = 6;
const TAG_FRAME_SUMMARY: u8 = 7;
const TAG_RENDER_PASS_CHANGES_COUNT: u8 = 8;

// ---------------------------------------------------------------------------
// RecorderSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that encodes events into a compact binary buffer.
#[derive(Debug, Default)]
pub struct RecorderSink {
    buf: Vec<u8>,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a view of the recorded bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consumes the recorder and returns the recorded bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    // -- encoding helpers --------------------------------------------------

    fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    fn write_bool(&mut self, v: bool) {
        self.write_u8(u8::from(v));
    }

    fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_f32(&mut self, v: f32) {
        self.write_u32(v.to_bits());
    }

    fn write_usize(&mut self, v: usize) {
        self.write_u64(u64::try_from(v).unwrap_or(u64::MAX));
    }

    fn write_duration(&mut self, d: Duration) {
        self.write_u64(u64::try_from(d.as_nanos()).unwrap_or(u64::MAX));
    }

    fn write_phase(&mut self, p: PhaseKind) {
        self.write_u8(match p {
            PhaseKind::Evaluate => 0,
            PhaseKind::Build => 1,
            PhaseKind::Upload => 2,
            PhaseKind::Draw => 3,
        });
    }
}

impl TraceSink for RecorderSink {
    fn on_phase_begin(&mut self, e: &PhaseBeginEvent) {
        self.write_u8(TAG_PHASE_BEGIN);
        self.write_u64(e.frame_index);
        self.write_phase(e.phase);
        self.write_duration(e.timestamp);
    }

    fn on_phase_end(&mut self, e: &PhaseEndEvent) {
        self.write_u8(TAG_PHASE_END);
        self.write_u64(e.frame_index);
        self.write_phase(e.phase);
        self.write_duration(e.timestamp);
    }

    fn on_style_evaluated(&mut self, e: &StyleEvaluatedEvent) {
        self.write_u8(TAG_STYLE_EVALUATED);
        self.write_u64(e.frame_index);
        self.write_f32(e.zoom);
        self.write_u32(e.cascaded);
        self.write_u32(e.layout_changed);
        self.write_u32(e.render_pass_changes);
        self.write_u32(e.added);
        self.write_u32(e.removed);
        self.write_bool(e.transitioning);
    }

    fn on_bucket_built(&mut self, e: &BucketBuiltEvent) {
        self.write_u8(TAG_BUCKET_BUILT);
        self.write_u64(e.frame_index);
        self.write_u32(e.layer_index);
        self.write_u32(e.features);
        self.write_u32(e.vertices);
        self.write_u32(e.indices);
        self.write_u32(e.segments);
    }

    fn on_upload(&mut self, e: &UploadEvent) {
        self.write_u8(TAG_UPLOAD);
        self.write_u64(e.frame_index);
        self.write_u32(e.layer_index);
        self.write_usize(e.vertex_bytes);
        self.write_usize(e.index_bytes);
        self.write_u32(e.paint_buffers);
    }

    fn on_draw(&mut self, e: &DrawEvent) {
        self.write_u8(TAG_DRAW);
        self.write_u64(e.frame_index);
        self.write_u32(e.layer_index);
        self.write_u32(e.draw_calls);
        self.write_u32(e.vertex_arrays_created);
        self.write_u32(e.index_buffer_binds);
        self.write_u32(e.attribute_binds);
        self.write_u32(e.skipped_binds);
    }

    fn on_frame_summary(&mut self, s: &FrameSummary) {
        self.write_u8(TAG_FRAME_SUMMARY);
        self.write_u64(s.frame_index);
        self.write_f32(s.zoom);
        self.write_duration(s.evaluate);
        self.write_duration(s.build);
        self.write_duration(s.upload);
        self.write_duration(s.draw);
        self.write_u32(s.draw_calls);
        self.write_bool(s.transitioning);
    }

    fn on_render_pass_changes(&mut self, frame_index: u64, changes: &[RenderPassChange]) {
        self.write_u8(TAG_RENDER_PASS_CHANGES_COUNT);
        self.write_u64(frame_index);
        self.write_u32(u32::try_from(changes.len()).unwrap_or(u32::MAX));
    }
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

/// A decoded event from a binary recording.
#[derive(Clone, Debug)]
pub enum RecordedEvent {
    /// A [`PhaseBeginEvent`].
    PhaseBegin(PhaseBeginEvent),
    /// A [`PhaseEndEvent`].
    PhaseEnd(PhaseEndEvent),
    /// A [`StyleEvaluatedEvent`].
    StyleEvaluated(StyleEvaluatedEvent),
    /// A [`BucketBuiltEvent`].
    BucketBuilt(BucketBuiltEvent),
    /// An [`UploadEvent`].
    Upload(UploadEvent),
    /// A [`DrawEvent`].
    Draw(DrawEvent),
    /// A [`FrameSummary`].
    FrameSummary(FrameSummary),
    /// Render-pass-change count for a frame.
    RenderPassChangesCount {
        /// Frame counter.
        frame_index: u64,
        /// Number of layers whose pass changed.
        count: u32,
    },
}

/// Decodes a byte slice produced by [`RecorderSink`] into an iterator of
/// [`RecordedEvent`].
pub fn decode(bytes: &[u8]) -> DecodeIter<'_> {
    DecodeIter {
        data: bytes,
        pos: 0,
    }
}

/// Iterator over decoded events.
#[derive(Debug)]
pub struct DecodeIter<'a> {
    data: &'a [u8],
    pos: usize,
}

impl DecodeIter<'_> {
    fn take<const N: usize>(&mut self) -> Option<[u8; N]> {
        let bytes = self.data.get(self.pos..self.pos + N)?.try_into().ok()?;
        self.pos += N;
        Some(bytes)
    }

    fn read_u8(&mut self) -> Option<u8> {
        self.take::<1>().map(|[v]| v)
    }

    fn read_bool(&mut self) -> Option<bool> {
        Some(self.read_u8()? != 0)
    }

    fn read_u32(&mut self) -> Option<u32> {
        self.take().map(u32::from_le_bytes)
    }

    fn read_u64(&mut self) -> Option<u64> {
        self.take().map(u64::from_le_bytes)
    }

    fn read_f32(&mut self) -> Option<f32> {
        self.read_u32().map(f32::from_bits)
    }

    fn read_usize(&mut self) -> Option<usize> {
        Some(usize::try_from(self.read_u64()?).unwrap_or(usize::MAX))
    }

    fn read_duration(&mut self) -> Option<Duration> {
        self.read_u64().map(Duration::from_nanos)
    }

    fn read_phase(&mut self) -> Option<PhaseKind> {
        Some(match self.read_u8()? {
            0 => PhaseKind::Evaluate,
            1 => PhaseKind::Build,
            2 => PhaseKind::Upload,
            _ => PhaseKind::Draw,
        })
    }

    fn decode_phase_begin(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::PhaseBegin(PhaseBeginEvent {
            frame_index: self.read_u64()?,
            phase: self.read_phase()?,
            timestamp: self.read_duration()?,
        }))
    }

    fn decode_phase_end(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::PhaseEnd(PhaseEndEvent {
            frame_index: self.read_u64()?,
            phase: self.read_phase()?,
            timestamp: self.read_duration()?,
        }))
    }

    fn decode_style_evaluated(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::StyleEvaluated(StyleEvaluatedEvent {
            frame_index: self.read_u64()?,
            zoom: self.read_f32()?,
            cascaded: self.read_u32()?,
            layout_changed: self.read_u32()?,
            render_pass_changes: self.read_u32()?,
            added: self.read_u32()?,
            removed: self.read_u32()?,
            transitioning: self.read_bool()?,
        }))
    }

    fn decode_bucket_built(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::BucketBuilt(BucketBuiltEvent {
            frame_index: self.read_u64()?,
            layer_index: self.read_u32()?,
            features: self.read_u32()?,
            vertices: self.read_u32()?,
            indices: self.read_u32()?,
            segments: self.read_u32()?,
        }))
    }

    fn decode_upload(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Upload(UploadEvent {
            frame_index: self.read_u64()?,
            layer_index: self.read_u32()?,
            vertex_bytes: self.read_usize()?,
            index_bytes: self.read_usize()?,
            paint_buffers: self.read_u32()?,
        }))
    }

    fn decode_draw(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Draw(DrawEvent {
            frame_index: self.read_u64()?,
            layer_index: self.read_u32()?,
            draw_calls: self.read_u32()?,
            vertex_arrays_created: self.read_u32()?,
            index_buffer_binds: self.read_u32()?,
            attribute_binds: self.read_u32()?,
            skipped_binds: self.read_u32()?,
        }))
    }

    fn decode_frame_summary(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::FrameSummary(FrameSummary {
            frame_index: self.read_u64()?,
            zoom: self.read_f32()?,
            evaluate: self.read_duration()?,
            build: self.read_duration()?,
            upload: self.read_duration()?,
            draw: self.read_duration()?,
            draw_calls: self.read_u32()?,
            transitioning: self.read_bool()?,
        }))
    }

    fn decode_render_pass_changes_count(&mut self) -> Option<RecordedEvent> {
        let frame_index = self.read_u64()?;
        let count = self.read_u32()?;
        Some(RecordedEvent::RenderPassChangesCount { frame_index, count })
    }
}

impl Iterator for DecodeIter<'_> {
    type Item = RecordedEvent;

    fn next(&mut self) -> Option<Self::Item> {
        let tag = self.read_u8()?;
        match tag {
            TAG_PHASE_BEGIN => self.decode_phase_begin(),
            TAG_PHASE_END => self.decode_phase_end(),
            TAG_STYLE_EVALUATED => self.decode_style_evaluated(),
            TAG_BUCKET_BUILT => self.decode_bucket_built(),
            TAG_UPLOAD => self.decode_upload(),
            TAG_DRAW => self.decode_draw(),
            TAG_FRAME_SUMMARY => self.decode_frame_summary(),
            TAG_RENDER_PASS_CHANGES_COUNT => self.decode_render_pass_changes_count(),
            _ => None, // unknown tag → stop iteration
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use contour_core::layer::RenderPass;

    use super::*;

    fn sample_summary() -> FrameSummary {
        FrameSummary {
            frame_index: 7,
            zoom: 14.5,
            evaluate: Duration::from_micros(120),
            build: Duration::from_micros(900),
            upload: Duration::from_micros(60),
            draw: Duration::from_micros(300),
            draw_calls: 12,
            transitioning: true,
        }
    }

    #[test]
    fn phase_events_keep_their_timestamps() {
        let mut rec = RecorderSink::new();
        rec.on_phase_begin(&PhaseBeginEvent {
            frame_index: 5,
            phase: PhaseKind::Build,
            timestamp: Duration::from_nanos(2000),
        });
        rec.on_phase_end(&PhaseEndEvent {
            frame_index: 5,
            phase: PhaseKind::Build,
            timestamp: Duration::from_nanos(3000),
        });

        let events: Vec<_> = decode(rec.as_bytes()).collect();
        assert_eq!(events.len(), 2);
        match &events[0] {
            RecordedEvent::PhaseBegin(e) => {
                assert_eq!(e.frame_index, 5);
                assert_eq!(e.phase, PhaseKind::Build);
                assert_eq!(e.timestamp, Duration::from_nanos(2000));
            }
            other => panic!("expected PhaseBegin, got {other:?}"),
        }
        match &events[1] {
            RecordedEvent::PhaseEnd(e) => {
                assert_eq!(e.phase, PhaseKind::Build);
                assert_eq!(e.timestamp, Duration::from_nanos(3000));
            }
            other => panic!("expected PhaseEnd, got {other:?}"),
        }
    }

    #[test]
    fn frame_summary_survives_recording() {
        let mut rec = RecorderSink::new();
        let orig = sample_summary();
        rec.on_frame_summary(&orig);

        let events: Vec<_> = decode(rec.as_bytes()).collect();
        match events.as_slice() {
            [RecordedEvent::FrameSummary(s)] => assert_eq!(*s, orig),
            other => panic!("expected one FrameSummary, got {other:?}"),
        }
    }

    #[test]
    fn a_frame_of_events_decodes_in_order() {
        let mut rec = RecorderSink::new();
        rec.on_style_evaluated(&StyleEvaluatedEvent {
            frame_index: 1,
            zoom: 10.0,
            cascaded: 3,
            layout_changed: 1,
            render_pass_changes: 2,
            added: 3,
            removed: 0,
            transitioning: false,
        });
        let built = BucketBuiltEvent {
            frame_index: 1,
            layer_index: 2,
            features: 4,
            vertices: 40,
            indices: 54,
            segments: 1,
        };
        rec.on_bucket_built(&built);
        let upload = UploadEvent {
            frame_index: 1,
            layer_index: 2,
            vertex_bytes: 320,
            index_bytes: 108,
            paint_buffers: 1,
        };
        rec.on_upload(&upload);
        let draw = DrawEvent {
            frame_index: 1,
            layer_index: 2,
            draw_calls: 1,
            vertex_arrays_created: 1,
            index_buffer_binds: 1,
            attribute_binds: 7,
            skipped_binds: 0,
        };
        rec.on_draw(&draw);

        let events: Vec<_> = decode(rec.as_bytes()).collect();
        assert_eq!(events.len(), 4);
        match &events[0] {
            RecordedEvent::StyleEvaluated(e) => {
                assert_eq!(e.zoom, 10.0);
                assert_eq!(e.render_pass_changes, 2);
                assert!(!e.transitioning);
            }
            other => panic!("expected StyleEvaluated, got {other:?}"),
        }
        assert!(matches!(&events[1], RecordedEvent::BucketBuilt(e) if *e == built));
        assert!(matches!(&events[2], RecordedEvent::Upload(e) if *e == upload));
        assert!(matches!(&events[3], RecordedEvent::Draw(e) if *e == draw));
    }

    #[test]
    fn empty_buffer_decodes_to_nothing() {
        let events: Vec<_> = decode(&[]).collect();
        assert!(events.is_empty());
    }

    #[test]
    fn truncated_record_stops_decoding() {
        let mut rec = RecorderSink::new();
        rec.on_frame_summary(&sample_summary());
        rec.on_frame_summary(&sample_summary());
        let bytes = rec.into_bytes();
        let events: Vec<_> = decode(&bytes[..bytes.len() - 3]).collect();
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn render_pass_changes_count() {
        let mut rec = RecorderSink::new();
        let changes = [
            RenderPassChange {
                layer_index: 0,
                pass: RenderPass::Translucent,
            },
            RenderPassChange {
                layer_index: 3,
                pass: RenderPass::None,
            },
        ];
        rec.on_render_pass_changes(42, &changes);

        let events: Vec<_> = decode(rec.as_bytes()).collect();
        assert_eq!(events.len(), 1);
        match &events[0] {
            RecordedEvent::RenderPassChangesCount { frame_index, count } => {
                assert_eq!(*frame_index, 42);
                assert_eq!(*count, 2);
            }
            other => panic!("expected RenderPassChangesCount, got {other:?}"),
        }
    }
}
