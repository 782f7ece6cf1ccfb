// Copyright 2026 the Contour Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chrome Trace Event Format exporter.
//!
//! [`export`] reads recorded bytes from a [`RecorderSink`](super::recorder::RecorderSink)
//! and writes [Chrome Trace Event Format][format] JSON to the given writer.
//!
//! Phases become duration events. Everything else becomes an instant event
//! stamped with the most recent phase timestamp, so it lands inside the
//! phase that emitted it.
//!
//! [format]: https://docs.google.com/document/d/1CvAClvFfyA5R-PhYUmn5OOQtYMH4h6I0nSsKchNAySU

use std::io::{self, Write};
use std::time::Duration;

use serde_json::{Value, json};

use crate::recorder::{RecordedEvent, decode};

/// Exports recorded events as Chrome Trace Event Format JSON.
///
/// The output is a complete JSON array of trace event objects, suitable for
/// loading into `chrome://tracing` or [Perfetto](https://ui.perfetto.dev/).
/// Layer events use the style layer's store slot as the thread id.
pub fn export(bytes: &[u8], writer: &mut dyn Write) -> io::Result<()> {
    let mut events: Vec<Value> = Vec::new();
    let mut now = 0.0;

    for recorded in decode(bytes) {
        match recorded {
            RecordedEvent::PhaseBegin(e) => {
                now = us(e.timestamp);
                events.push(json!({
                    "ph": "B",
                    "name": e.phase.name(),
                    "cat": "Frame",
                    "ts": now,
                    "pid": 0,
                    "tid": 0,
                    "args": {
                        "frame_index": e.frame_index,
                    }
                }));
            }
            RecordedEvent::PhaseEnd(e) => {
                now = us(e.timestamp);
                events.push(json!({
                    "ph": "E",
                    "name": e.phase.name(),
                    "cat": "Frame",
                    "ts": now,
                    "pid": 0,
                    "tid": 0,
                    "args": {
                        "frame_index": e.frame_index,
                    }
                }));
            }
            RecordedEvent::StyleEvaluated(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "StyleEvaluated",
                    "cat": "Style",
                    "ts": now,
                    "pid": 0,
                    "tid": 0,
                    "s": "t",
                    "args": {
                        "frame_index": e.frame_index,
                        "zoom": e.zoom,
                        "cascaded": e.cascaded,
                        "layout_changed": e.layout_changed,
                        "render_pass_changes": e.render_pass_changes,
                        "added": e.added,
                        "removed": e.removed,
                        "transitioning": e.transitioning,
                    }
                }));
            }
            RecordedEvent::BucketBuilt(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "BucketBuilt",
                    "cat": "Layer",
                    "ts": now,
                    "pid": 0,
                    "tid": e.layer_index,
                    "s": "t",
                    "args": {
                        "frame_index": e.frame_index,
                        "features": e.features,
                        "vertices": e.vertices,
                        "indices": e.indices,
                        "segments": e.segments,
                    }
                }));
            }
            RecordedEvent::Upload(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "Upload",
                    "cat": "Layer",
                    "ts": now,
                    "pid": 0,
                    "tid": e.layer_index,
                    "s": "t",
                    "args": {
                        "frame_index": e.frame_index,
                        "vertex_bytes": e.vertex_bytes,
                        "index_bytes": e.index_bytes,
                        "paint_buffers": e.paint_buffers,
                    }
                }));
            }
            RecordedEvent::Draw(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "Draw",
                    "cat": "Layer",
                    "ts": now,
                    "pid": 0,
                    "tid": e.layer_index,
                    "s": "t",
                    "args": {
                        "frame_index": e.frame_index,
                        "draw_calls": e.draw_calls,
                        "vertex_arrays_created": e.vertex_arrays_created,
                        "index_buffer_binds": e.index_buffer_binds,
                        "attribute_binds": e.attribute_binds,
                        "skipped_binds": e.skipped_binds,
                    }
                }));
            }
            RecordedEvent::FrameSummary(s) => {
                events.push(json!({
                    "ph": "i",
                    "name": "FrameSummary",
                    "cat": "Summary",
                    "ts": now,
                    "pid": 0,
                    "tid": 0,
                    "s": "g",
                    "args": {
                        "frame_index": s.frame_index,
                        "zoom": s.zoom,
                        "evaluate_us": us(s.evaluate),
                        "build_us": us(s.build),
                        "upload_us": us(s.upload),
                        "draw_us": us(s.draw),
                        "draw_calls": s.draw_calls,
                        "transitioning": s.transitioning,
                    }
                }));
            }
            RecordedEvent::RenderPassChangesCount { frame_index, count } => {
                events.push(json!({
                    "ph": "i",
                    "name": "RenderPassChanges",
                    "cat": "Rich",
                    "ts": now,
                    "pid": 0,
                    "tid": 0,
                    "s": "p",
                    "args": {
                        "frame_index": frame_index,
                        "count": count,
                    }
                }));
            }
        }
    }

    serde_json::to_writer_pretty(writer, &events)?;
    Ok(())
}

fn us(d: Duration) -> f64 {
    d.as_nanos() as f64 / 1000.0
}

#[cfg(test)]
mod tests {
    use contour_core::trace::{
        DrawEvent, PhaseBeginEvent, PhaseEndEvent, PhaseKind, TraceSink,
    };

    use super::*;
    use crate::recorder::RecorderSink;

    #[test]
    fn export_produces_valid_json() {
        let mut rec = RecorderSink::new();
        rec.on_phase_begin(&PhaseBeginEvent {
            frame_index: 0,
            phase: PhaseKind::Draw,
            timestamp: Duration::from_millis(1),
        });
        rec.on_draw(&DrawEvent {
            frame_index: 0,
            layer_index: 3,
            draw_calls: 2,
            ..DrawEvent::default()
        });
        rec.on_phase_end(&PhaseEndEvent {
            frame_index: 0,
            phase: PhaseKind::Draw,
            timestamp: Duration::from_micros(1100),
        });

        let mut out = Vec::new();
        export(rec.as_bytes(), &mut out).unwrap();
        let json_str = String::from_utf8(out).unwrap();

        let parsed: Vec<Value> = serde_json::from_str(&json_str).unwrap();
        assert_eq!(parsed.len(), 3);

        assert_eq!(parsed[0]["ph"], "B");
        assert_eq!(parsed[0]["name"], "draw");
        assert_eq!(parsed[0]["ts"], 1000.0);

        // The draw lands at the phase start, on its layer's track.
        assert_eq!(parsed[1]["ph"], "i");
        assert_eq!(parsed[1]["name"], "Draw");
        assert_eq!(parsed[1]["ts"], 1000.0);
        assert_eq!(parsed[1]["tid"], 3);
        assert_eq!(parsed[1]["args"]["draw_calls"], 2);

        assert_eq!(parsed[2]["ph"], "E");
        assert_eq!(parsed[2]["ts"], 1100.0);
    }

    #[test]
    fn export_empty_recording() {
        let mut out = Vec::new();
        export(&[], &mut out).unwrap();
        let json_str = String::from_utf8(out).unwrap();
        let parsed: Vec<Value> = serde_json::from_str(&json_str).unwrap();
        assert!(parsed.is_empty());
    }
}
