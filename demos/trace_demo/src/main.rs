// Copyright 2026 the Contour Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Simulated frame loop that exercises the tracing and diagnostics pipeline.
//!
//! Builds a small style over one synthetic tile and runs 30 frames of
//! evaluate, build, upload, and draw against a
//! [`RecordingContext`](contour_render::recording::RecordingContext). Halfway
//! through, a style class is switched on to start a color transition. Events
//! go to both a [`PrettyPrintSink`](contour_debug::pretty::PrettyPrintSink)
//! and a [`RecorderSink`](contour_debug::recorder::RecorderSink), then a
//! Chrome trace JSON file is written.

use std::collections::HashMap;
use std::fs::File;
use std::io::BufWriter;
use std::time::Duration;

use kurbo::Point;

use contour_core::feature::{OverscaledTileId, TileFeature, TileLayer};
use contour_core::index::FeatureIndex;
use contour_core::layer::{BackgroundLayer, LineLayer, RenderPass, StyleLayerStore};
use contour_core::style::{
    Color, EvaluationParameters, FunctionStops, PropertyFunction, PropertyValue, StyleClass,
    StyleValue,
};
use contour_core::trace::{
    BucketBuiltEvent, DrawEvent, FrameSummary, FrameSummaryBuilder, PhaseBeginEvent,
    PhaseEndEvent, PhaseKind, RenderPassChange, StyleEvaluatedEvent, TraceSink, Tracer,
    UploadEvent, render_pass_changes,
};
use contour_render::recording::RecordingContext;
use contour_render::{
    Bucket, BucketLayer, BucketParameters, ColorMode, DepthMode, DrawState, GpuContext,
    LINE_SHADER, LineBucket, LineProgram, ProgramParameters, StencilMode, line_uniforms,
};

use contour_debug::pretty::PrettyPrintSink;
use contour_debug::recorder::RecorderSink;

const FRAME_COUNT: u64 = 30;
const FRAME_INTERVAL: Duration = Duration::from_micros(16_667);
const ZOOM: f32 = 14.0;

/// Forwards every event to two sinks.
struct Tee<'a>(&'a mut dyn TraceSink, &'a mut dyn TraceSink);

impl TraceSink for Tee<'_> {
    fn on_phase_begin(&mut self, e: &PhaseBeginEvent) {
        self.0.on_phase_begin(e);
        self.1.on_phase_begin(e);
    }

    fn on_phase_end(&mut self, e: &PhaseEndEvent) {
        self.0.on_phase_end(e);
        self.1.on_phase_end(e);
    }

    fn on_style_evaluated(&mut self, e: &StyleEvaluatedEvent) {
        self.0.on_style_evaluated(e);
        self.1.on_style_evaluated(e);
    }

    fn on_bucket_built(&mut self, e: &BucketBuiltEvent) {
        self.0.on_bucket_built(e);
        self.1.on_bucket_built(e);
    }

    fn on_upload(&mut self, e: &UploadEvent) {
        self.0.on_upload(e);
        self.1.on_upload(e);
    }

    fn on_draw(&mut self, e: &DrawEvent) {
        self.0.on_draw(e);
        self.1.on_draw(e);
    }

    fn on_frame_summary(&mut self, s: &FrameSummary) {
        self.0.on_frame_summary(s);
        self.1.on_frame_summary(s);
    }

    fn on_render_pass_changes(&mut self, frame_index: u64, changes: &[RenderPassChange]) {
        self.0.on_render_pass_changes(frame_index, changes);
        self.1.on_render_pass_changes(frame_index, changes);
    }
}

fn main() {
    // -- sinks -------------------------------------------------------------
    let mut pretty = PrettyPrintSink::new(Box::new(std::io::stdout()));
    let mut recorder = RecorderSink::new();

    // -- style -------------------------------------------------------------
    let mut store = StyleLayerStore::new();
    store
        .add_layer("background", BackgroundLayer::new())
        .expect("fresh store");

    let roads = store
        .add_layer("roads", LineLayer::new("transportation"))
        .expect("fresh store");
    store.update_line_paint(roads, |paint| {
        paint.width.set_default(PropertyValue::Constant(3.0));
        paint.color.set_default(StyleValue::Function(PropertyFunction::new(
            "color",
            FunctionStops::Identity,
        )));
    });

    let rail = store
        .add_layer("rail", LineLayer::new("transportation"))
        .expect("fresh store");
    store.update_line_paint(rail, |paint| {
        paint.color.set_default(StyleValue::Constant(Color::BLACK));
        paint
            .color
            .set(StyleClass::named("night"), StyleValue::Constant(Color::WHITE));
    });

    // -- tile --------------------------------------------------------------
    let tile = TileLayer::new(
        "transportation",
        vec![
            TileFeature::line(vec![vec![
                Point::new(0.0, 0.0),
                Point::new(2048.0, 1024.0),
                Point::new(4096.0, 1024.0),
            ]])
            .with_property("color", "#e0a030"),
            TileFeature::line(vec![vec![Point::new(0.0, 4096.0), Point::new(4096.0, 0.0)]])
                .with_property("color", "#808080"),
        ],
    );
    let tile_id = OverscaledTileId::new(14, 14);

    // -- GPU ---------------------------------------------------------------
    let mut ctx = RecordingContext::new();
    let program = LineProgram::new(&mut ctx, &LINE_SHADER, &ProgramParameters::default())
        .expect("line shader assembles");
    let state = DrawState::new(
        DepthMode::DISABLED,
        StencilMode::DISABLED,
        ColorMode::ALPHA_BLENDED,
    );
    let mut buckets: HashMap<u32, LineBucket> = HashMap::new();
    let mut feature_index = FeatureIndex::new();

    // -- simulated loop ----------------------------------------------------
    let mut now = Duration::from_secs(1);

    for frame_index in 0..FRAME_COUNT {
        if frame_index == FRAME_COUNT / 2 {
            store.set_classes(vec![StyleClass::named("night")]);
        }

        let mut tee = Tee(&mut pretty, &mut recorder);
        let mut tracer = Tracer::new(&mut tee);
        let mut summary = FrameSummaryBuilder::new(frame_index, ZOOM);
        let mut clock = now;
        let mut phase = |tracer: &mut Tracer<'_>,
                         summary: &mut FrameSummaryBuilder,
                         kind: PhaseKind,
                         begin: bool,
                         cost: Duration| {
            if begin {
                summary.phase_begin(kind, clock);
                tracer.phase_begin(&PhaseBeginEvent {
                    frame_index,
                    phase: kind,
                    timestamp: clock,
                });
            } else {
                clock += cost;
                summary.phase_end(kind, clock);
                tracer.phase_end(&PhaseEndEvent {
                    frame_index,
                    phase: kind,
                    timestamp: clock,
                });
            }
        };

        // 1. Evaluate
        phase(&mut tracer, &mut summary, PhaseKind::Evaluate, true, Duration::ZERO);
        let changes = store.evaluate(&EvaluationParameters::new(ZOOM).with_now(now));
        let style_event = StyleEvaluatedEvent::new(frame_index, ZOOM, &changes);
        tracer.style_evaluated(&style_event);
        tracer.render_pass_changes(frame_index, &render_pass_changes(&store, &changes));
        summary.record_style(&style_event);
        phase(
            &mut tracer,
            &mut summary,
            PhaseKind::Evaluate,
            false,
            Duration::from_micros(80),
        );

        // 2. Build: buckets bake the paint snapshot, so any paint change rebuilds.
        phase(&mut tracer, &mut summary, PhaseKind::Build, true, Duration::ZERO);
        if !changes.is_empty() || changes.transitioning || frame_index == 0 {
            buckets.clear();
            feature_index = FeatureIndex::new();
            for &slot in store.order() {
                let Some(layer) = store.layer_at(slot).and_then(|l| l.as_line()) else {
                    continue;
                };
                if store.render_pass_at(slot) == RenderPass::None {
                    continue;
                }
                let mut params = BucketParameters {
                    tile_id,
                    layer: &tile,
                    feature_index: &mut feature_index,
                };
                let bucket = layer.create_bucket(store.identifier_at(slot), &mut params);
                tracer.bucket_built(&bucket.built_event(frame_index, slot));
                buckets.insert(slot, bucket);
            }
        }
        phase(
            &mut tracer,
            &mut summary,
            PhaseKind::Build,
            false,
            Duration::from_micros(400),
        );

        // 3. Upload
        phase(&mut tracer, &mut summary, PhaseKind::Upload, true, Duration::ZERO);
        for (&slot, bucket) in &mut buckets {
            if !bucket.is_uploaded() {
                let stats = bucket.upload(&mut ctx);
                tracer.upload(&stats.event(frame_index, slot));
            }
        }
        phase(
            &mut tracer,
            &mut summary,
            PhaseKind::Upload,
            false,
            Duration::from_micros(120),
        );

        // 4. Draw, bottom to top.
        phase(&mut tracer, &mut summary, PhaseKind::Draw, true, Duration::ZERO);
        for &slot in store.order() {
            let (Some(bucket), Some(layer)) = (
                buckets.get_mut(&slot),
                store.layer_at(slot).and_then(|l| l.as_line()),
            ) else {
                continue;
            };
            let uniforms = line_uniforms(identity(), layer.evaluated(), 1.0, [1.0, 1.0]);
            let stats = bucket.draw(&mut ctx, &program, &state, &uniforms);
            let draw_event = stats.event(frame_index, slot);
            tracer.draw(&draw_event);
            summary.record_draw(&draw_event);
        }
        ctx.perform_cleanup();
        phase(
            &mut tracer,
            &mut summary,
            PhaseKind::Draw,
            false,
            Duration::from_micros(250),
        );

        tracer.frame_summary(&summary.finish());
        now += FRAME_INTERVAL;
    }

    println!(
        "indexed {} features, {} live buffers",
        feature_index.len(),
        ctx.live_buffers()
    );

    // -- export Chrome trace -----------------------------------------------
    let path = "trace.json";
    let file = File::create(path).expect("failed to create trace.json");
    let mut writer = BufWriter::new(file);
    contour_debug::chrome::export(recorder.as_bytes(), &mut writer)
        .expect("failed to write Chrome trace");

    println!("Wrote {path} ({FRAME_COUNT} frames)");
}

#[rustfmt::skip]
fn identity() -> [f32; 16] {
    [
        1.0, 0.0, 0.0, 0.0,
        0.0, 1.0, 0.0, 0.0,
        0.0, 0.0, 1.0, 0.0,
        0.0, 0.0, 0.0, 1.0,
    ]
}
