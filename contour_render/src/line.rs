// Copyright 2026 the Contour Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Line buckets: tessellation, paint attributes, and drawing.
//!
//! Every point of a line becomes two vertices, pushed out to either side
//! along the miter normal. The vertex shader scales the normals by the line
//! width, so one bucket serves every zoom of its tile.

use bytemuck::{Pod, Zeroable};
use kurbo::{Point, Vec2};

use contour_core::feature::{GeometryCollection, GeometryTileFeature};
use contour_core::geometry::miter_extrusions;
use contour_core::layer::{LineLayer, LineLayout, LinePaint};
use contour_core::style::{EvaluationParameters, LineCap, LineJoin};
use contour_core::trace::BucketBuiltEvent;

use crate::attribute::{AttributeComponents, AttributeSet};
use crate::bucket::{Bucket, BucketLayer, BucketParameters, UploadStats};
use crate::buffer::{IndexBuffer, VertexBuffer};
use crate::gpu::{
    AttributeDescriptor, AttributeFormat, DrawMode, DrawState, GpuContext, UniformValue,
    UniformValues,
};
use crate::paint::{DataDrivenPaint, PaintAttributeData};
use crate::program::{DrawStats, Program};
use crate::segment::{MAX_SEGMENT_VERTICES, SegmentVector};

/// Extrusion vectors are stored as `round(63 * v) + 128`.
pub const EXTRUDE_SCALE: f64 = 63.0;

/// Tile units per unit of `linesofar` in the vertex data.
pub const LINE_DISTANCE_SCALE: f64 = 0.5;

/// Largest `linesofar` that fits the vertex data's 14 bits.
pub const MAX_LINE_DISTANCE: i32 = (1 << 14) - 1;

/// The program that draws line buckets.
pub type LineProgram = Program<LineLayoutVertex, LinePaint>;

/// One line vertex.
///
/// `pos` holds the tile coordinate doubled, with the round flag in the low
/// bit of x and the side (1 for the +normal side) in the low bit of y.
/// `data` holds the quantized extrusion, the direction with the low bits of
/// the distance along the line, and the high bits of that distance.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Pod, Zeroable)]
pub struct LineLayoutVertex {
    /// Position and flags.
    pub pos: [i16; 2],
    /// Extrusion, direction, and distance.
    pub data: [u8; 4],
}

impl LineLayoutVertex {
    /// Packs a vertex. `dir` is clamped to -1, 0, or 1 and `linesofar` to
    /// [`MAX_LINE_DISTANCE`].
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "coordinates are tile units and quantized values are range-checked"
    )]
    pub fn new(p: Point, extrude: Vec2, round: bool, up: bool, dir: i8, linesofar: i32) -> Self {
        let x = p.x.round() as i16;
        let y = p.y.round() as i16;
        let linesofar = linesofar.clamp(0, MAX_LINE_DISTANCE);
        Self {
            pos: [
                x.wrapping_mul(2) | i16::from(round),
                y.wrapping_mul(2) | i16::from(up),
            ],
            data: [
                quantize(extrude.x),
                quantize(extrude.y),
                (dir.signum() + 1) as u8 | (((linesofar & 0x3F) as u8) << 2),
                (linesofar >> 6) as u8,
            ],
        }
    }

    /// The tile coordinate.
    #[must_use]
    pub fn position(&self) -> [i16; 2] {
        [self.pos[0] >> 1, self.pos[1] >> 1]
    }

    /// Whether this is the +normal side of the line.
    #[must_use]
    pub fn is_up(&self) -> bool {
        self.pos[1] & 1 == 1
    }

    /// Whether the vertex belongs to a round join or cap.
    #[must_use]
    pub fn is_round(&self) -> bool {
        self.pos[0] & 1 == 1
    }

    /// The extrusion vector, after quantization.
    #[must_use]
    pub fn extrude(&self) -> Vec2 {
        Vec2::new(
            (f64::from(self.data[0]) - 128.0) / EXTRUDE_SCALE,
            (f64::from(self.data[1]) - 128.0) / EXTRUDE_SCALE,
        )
    }

    /// The distance along the line, in `linesofar` units.
    #[must_use]
    pub fn linesofar(&self) -> i32 {
        i32::from(self.data[2] >> 2) | (i32::from(self.data[3]) << 6)
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "the clamped value lies in 2..=254"
)]
fn quantize(v: f64) -> u8 {
    ((EXTRUDE_SCALE * v.clamp(-2.0, 2.0)).round() + 128.0) as u8
}

impl AttributeSet for LineLayoutVertex {
    const ATTRIBUTES: &'static [AttributeDescriptor] = &[
        AttributeDescriptor::new("a_pos", AttributeFormat::I16x2),
        AttributeDescriptor::new("a_data", AttributeFormat::U8x4),
    ];
}

impl AttributeSet for LinePaint {
    const ATTRIBUTES: &'static [AttributeDescriptor] = &[
        AttributeDescriptor::new("a_color", AttributeFormat::F32x4),
        AttributeDescriptor::new("a_opacity", AttributeFormat::F32),
        AttributeDescriptor::new("a_gapwidth", AttributeFormat::F32),
        AttributeDescriptor::new("a_offset", AttributeFormat::F32),
        AttributeDescriptor::new("a_blur", AttributeFormat::F32),
    ];
}

impl DataDrivenPaint for LinePaint {
    fn constant_components(&self, attribute: usize) -> Option<[f32; 4]> {
        match attribute {
            0 => self.color.constant().map(AttributeComponents::components),
            1 => self.opacity.constant().map(AttributeComponents::components),
            2 => self.gap_width.constant().map(AttributeComponents::components),
            3 => self.offset.constant().map(AttributeComponents::components),
            4 => self.blur.constant().map(AttributeComponents::components),
            _ => None,
        }
    }

    fn feature_components(&self, attribute: usize, feature: &dyn GeometryTileFeature) -> [f32; 4] {
        match attribute {
            0 => self.color.evaluate(feature).components(),
            1 => self.opacity.evaluate(feature).components(),
            2 => self.gap_width.evaluate(feature).components(),
            3 => self.offset.evaluate(feature).components(),
            4 => self.blur.evaluate(feature).components(),
            _ => [0.0; 4],
        }
    }
}

/// Uniforms for drawing a line bucket.
///
/// `matrix` already includes the layer's translate. `pixels_to_tile_units`
/// is the size of one pixel in tile units at the current zoom.
#[must_use]
pub fn line_uniforms(
    matrix: [f32; 16],
    paint: &LinePaint,
    pixels_to_tile_units: f32,
    gl_units_to_pixels: [f32; 2],
) -> UniformValues {
    vec![
        ("u_matrix", UniformValue::Mat4(matrix)),
        ("u_ratio", UniformValue::F32(1.0 / pixels_to_tile_units)),
        ("u_width", UniformValue::F32(paint.width)),
        ("u_gl_units_to_pixels", UniformValue::Vec2(gl_units_to_pixels)),
    ]
}

/// The line geometry of one style layer in one tile.
#[derive(Debug)]
pub struct LineBucket {
    layout: LineLayout,
    overscaling: u32,
    features: u32,

    vertices: Vec<LineLayoutVertex>,
    triangles: Vec<[u16; 3]>,
    segments: SegmentVector,
    paint: PaintAttributeData<LinePaint>,

    vertex_buffer: Option<VertexBuffer<LineLayoutVertex>>,
    index_buffer: Option<IndexBuffer>,
}

impl LineBucket {
    /// Creates an empty bucket.
    #[must_use]
    pub fn new(layout: LineLayout, paint: LinePaint, zoom: f32, overscaling: u32) -> Self {
        Self {
            layout,
            overscaling,
            features: 0,
            vertices: Vec::new(),
            triangles: Vec::new(),
            segments: SegmentVector::new(),
            paint: PaintAttributeData::new(paint, zoom),
            vertex_buffer: None,
            index_buffer: None,
        }
    }

    /// The evaluated layout the bucket was built with.
    #[must_use]
    pub fn layout(&self) -> &LineLayout {
        &self.layout
    }

    /// How many times the tile is magnified past its data zoom.
    #[must_use]
    pub fn overscaling(&self) -> u32 {
        self.overscaling
    }

    /// Number of features added.
    #[must_use]
    pub fn feature_count(&self) -> u32 {
        self.features
    }

    /// The tessellated vertices.
    #[must_use]
    pub fn vertices(&self) -> &[LineLayoutVertex] {
        &self.vertices
    }

    /// The triangles, indexed relative to their segment's vertex offset.
    #[must_use]
    pub fn triangles(&self) -> &[[u16; 3]] {
        &self.triangles
    }

    /// The draw segments.
    #[must_use]
    pub fn segments(&self) -> &SegmentVector {
        &self.segments
    }

    /// The paint attribute data.
    #[must_use]
    pub fn paint_data(&self) -> &PaintAttributeData<LinePaint> {
        &self.paint
    }

    /// Tessellates a feature's geometry and stages its paint values.
    ///
    /// # Panics
    ///
    /// Panics if the bucket was already uploaded.
    pub fn add_feature(&mut self, feature: &dyn GeometryTileFeature, geometry: &GeometryCollection) {
        assert!(
            self.vertex_buffer.is_none(),
            "cannot add features to an uploaded bucket"
        );
        let before = self.vertices.len();
        for line in geometry {
            self.add_line(line);
        }
        self.paint
            .populate_vertex_vectors(feature, self.vertices.len() - before);
        self.features += 1;
    }

    fn add_line(&mut self, line: &[Point]) {
        let mut points: Vec<Point> = Vec::with_capacity(line.len());
        for &p in line {
            if points.last() != Some(&p) {
                points.push(p);
            }
        }
        if points.len() < 2 {
            return;
        }

        let miter_limit = match self.layout.join {
            LineJoin::Miter => f64::from(self.layout.miter_limit),
            LineJoin::Bevel | LineJoin::Round => 1.0,
        };
        let extrusions = miter_extrusions(&points, miter_limit);

        let mut distances = Vec::with_capacity(points.len());
        let mut distance = 0.0;
        for (i, p) in points.iter().enumerate() {
            if i > 0 {
                distance += (*p - points[i - 1]).hypot();
            }
            distances.push(distance);
        }

        let closed = points.len() > 2 && points.first() == points.last();

        // Long lines are split into chunks that share their boundary point.
        let max_points = MAX_SEGMENT_VERTICES / 2;
        let mut start = 0;
        loop {
            let end = (start + max_points).min(points.len());
            self.add_chunk(
                &points[start..end],
                &extrusions[start..end],
                &distances[start..end],
                !closed && start == 0,
                !closed && end == points.len(),
            );
            if end == points.len() {
                break;
            }
            start = end - 1;
        }
    }

    #[expect(
        clippy::cast_possible_truncation,
        reason = "segments address at most u16::MAX vertices"
    )]
    fn add_chunk(
        &mut self,
        points: &[Point],
        extrusions: &[Vec2],
        distances: &[f64],
        cap_start: bool,
        cap_end: bool,
    ) {
        let n = points.len();
        let next_vertex = self.vertices.len();
        let next_index = self.triangles.len() * 3;
        let segment = self.segments.reserve(2 * n, next_vertex, next_index);
        let base = next_vertex - segment.vertex_offset();

        for i in 0..n {
            let p = points[i];
            let normal = extrusions[i];
            let is_start = cap_start && i == 0;
            let is_end = cap_end && i + 1 == n;

            let (shift, dir, round) = if is_start || is_end {
                let tangent = if is_start {
                    -(points[1] - points[0]).normalize()
                } else {
                    (points[n - 1] - points[n - 2]).normalize()
                };
                let dir = if is_start { -1 } else { 1 };
                match self.layout.cap {
                    LineCap::Butt => (Vec2::ZERO, 0, false),
                    LineCap::Square => (tangent, 0, false),
                    LineCap::Round => (Vec2::ZERO, dir, true),
                }
            } else {
                (Vec2::ZERO, 0, self.layout.join == LineJoin::Round)
            };

            let linesofar = (distances[i] * LINE_DISTANCE_SCALE) as i32;
            self.vertices.push(LineLayoutVertex::new(
                p,
                normal + shift,
                round,
                true,
                dir,
                linesofar,
            ));
            self.vertices.push(LineLayoutVertex::new(
                p,
                -normal + shift,
                round,
                false,
                dir,
                linesofar,
            ));
        }

        for i in 0..n - 1 {
            let a = (base + 2 * i) as u16;
            self.triangles.push([a, a + 1, a + 2]);
            self.triangles.push([a + 1, a + 3, a + 2]);
        }

        segment.vertex_length += 2 * n;
        segment.index_length += 6 * (n - 1);
    }

    /// The trace event describing the built bucket.
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "bucket sizes fit in u32"
    )]
    pub fn built_event(&self, frame_index: u64, layer_index: u32) -> BucketBuiltEvent {
        BucketBuiltEvent {
            frame_index,
            layer_index,
            features: self.features,
            vertices: self.vertices.len() as u32,
            indices: (self.triangles.len() * 3) as u32,
            segments: self.segments.len() as u32,
        }
    }

    /// Draws the bucket with `program`.
    ///
    /// # Panics
    ///
    /// Panics if the bucket was not uploaded.
    pub fn draw(
        &mut self,
        context: &mut impl GpuContext,
        program: &LineProgram,
        state: &DrawState,
        uniforms: &[(&'static str, UniformValue)],
    ) -> DrawStats {
        let (Some(vertices), Some(indices)) = (&self.vertex_buffer, &self.index_buffer) else {
            panic!("bucket must be uploaded before drawing");
        };
        let paint_values = self.paint.attribute_values();
        program.draw(
            context,
            DrawMode::Triangles,
            state,
            uniforms,
            vertices,
            indices,
            &mut self.segments,
            &paint_values,
        )
    }
}

impl Bucket for LineBucket {
    fn has_data(&self) -> bool {
        !self.segments.is_empty()
    }

    fn is_uploaded(&self) -> bool {
        self.vertex_buffer.is_some()
    }

    fn upload(&mut self, context: &mut impl GpuContext) -> UploadStats {
        let vertices = VertexBuffer::upload(context, &self.vertices);
        let indices = IndexBuffer::upload(context, &self.triangles);
        let stats = UploadStats {
            vertex_bytes: vertices.byte_len(),
            index_bytes: indices.byte_len(),
            paint_buffers: self.paint.upload(context),
        };
        self.vertex_buffer = Some(vertices);
        self.index_buffer = Some(indices);
        stats
    }
}

impl BucketLayer for LineLayer {
    type Bucket = LineBucket;

    fn create_bucket(&self, style_layer: &str, params: &mut BucketParameters<'_>) -> LineBucket {
        let zoom = f32::from(params.tile_id.overscaled_z);
        let layout = self.layout().evaluate(&EvaluationParameters::new(zoom));
        let mut bucket = LineBucket::new(
            layout,
            self.evaluated().clone(),
            zoom,
            params.tile_id.overscale_factor(),
        );
        if params.layer.name() != self.source_layer() {
            return bucket;
        }

        let feature_index = &mut *params.feature_index;
        self.filter().each_matching(params.layer, |feature, index| {
            let geometry = feature.geometries();
            bucket.add_feature(feature, &geometry);
            feature_index.insert(&geometry, index, self.source_layer(), style_layer);
        });
        bucket
    }
}

#[cfg(test)]
mod tests {
    use core::time::Duration;

    use contour_core::feature::{FeatureValue, OverscaledTileId, TileFeature, TileLayer};
    use contour_core::index::FeatureIndex;
    use contour_core::style::{
        CascadeParameters, Color, Filter, FunctionStops, PropertyFunction, StyleValue,
    };

    use super::*;
    use crate::gpu::{AttributeValue, ColorMode, DepthMode, StencilMode};
    use crate::program::ProgramParameters;
    use crate::recording::{Command, RecordingContext};
    use crate::shaders::LINE_SHADER;

    fn bucket(cap: LineCap, join: LineJoin) -> LineBucket {
        let layout = LineLayout {
            cap,
            join,
            ..LineLayout::default()
        };
        LineBucket::new(layout, LinePaint::default(), 14.0, 1)
    }

    fn add_line(bucket: &mut LineBucket, points: &[(f64, f64)]) {
        let line: Vec<Point> = points.iter().map(|&(x, y)| Point::new(x, y)).collect();
        let geometry = vec![line];
        let feature = TileFeature::line(geometry.clone());
        bucket.add_feature(&feature, &geometry);
    }

    fn evaluated_layer(source_layer: &str) -> LineLayer {
        let mut layer = LineLayer::new(source_layer);
        layer.cascade(&CascadeParameters::new(&[], Duration::ZERO));
        layer.evaluate(&EvaluationParameters::new(14.0));
        layer
    }

    #[test]
    fn vertex_packing() {
        let v = LineLayoutVertex::new(Point::new(10.0, 20.0), Vec2::new(1.0, 0.0), false, true, 0, 0);
        assert_eq!(v.pos, [20, 41]);
        assert_eq!(v.data, [191, 128, 1, 0]);
        assert_eq!(v.position(), [10, 20]);
        assert!(v.is_up());
        assert!(!v.is_round());

        let v = LineLayoutVertex::new(Point::new(3.0, 4.0), Vec2::new(-5.0, 0.5), true, false, 1, 100);
        assert!(v.is_round());
        assert!(!v.is_up());
        // Extrusion is clamped to [-2, 2].
        assert_eq!(v.data[0], 2);
        assert_eq!(v.linesofar(), 100);
        assert_eq!(v.data[2] & 0b11, 2);
        assert!((v.extrude().y - 0.5).abs() < 1.0 / EXTRUDE_SCALE);
    }

    #[test]
    fn line_distance_saturates() {
        let v = LineLayoutVertex::new(Point::ZERO, Vec2::ZERO, false, false, 0, 1 << 20);
        assert_eq!(v.linesofar(), MAX_LINE_DISTANCE);
    }

    #[test]
    fn two_point_line_is_one_quad() {
        let mut b = bucket(LineCap::Butt, LineJoin::Miter);
        add_line(&mut b, &[(0.0, 0.0), (10.0, 0.0)]);

        assert_eq!(b.vertices().len(), 4);
        assert_eq!(b.triangles(), &[[0, 1, 2], [1, 3, 2]]);
        assert_eq!(b.segments().len(), 1);
        let segment = b.segments().iter().next().unwrap();
        assert_eq!(segment.vertex_length, 4);
        assert_eq!(segment.index_length, 6);
        assert!(b.has_data());
        assert_eq!(b.feature_count(), 1);

        let [up, down, ..] = b.vertices() else {
            unreachable!();
        };
        assert!(up.is_up() && !down.is_up());
        assert!((up.extrude() + down.extrude()).hypot() < 1e-9);
        assert_eq!(b.vertices()[2].linesofar(), 5);
    }

    #[test]
    fn repeated_points_collapse() {
        let mut b = bucket(LineCap::Butt, LineJoin::Miter);
        add_line(&mut b, &[(1.0, 1.0), (1.0, 1.0), (1.0, 1.0)]);
        add_line(&mut b, &[(5.0, 5.0)]);
        assert!(!b.has_data());
        assert!(b.vertices().is_empty());
        assert_eq!(b.feature_count(), 2);

        let mut b = bucket(LineCap::Butt, LineJoin::Miter);
        add_line(&mut b, &[(0.0, 0.0), (0.0, 0.0), (4.0, 0.0)]);
        assert_eq!(b.vertices().len(), 4);
    }

    #[test]
    fn caps_mark_the_ends() {
        let mut b = bucket(LineCap::Round, LineJoin::Bevel);
        add_line(&mut b, &[(0.0, 0.0), (10.0, 0.0), (20.0, 0.0)]);
        let v = b.vertices();
        assert!(v[0].is_round() && v[5].is_round());
        assert!(!v[2].is_round());
        assert_eq!(v[0].data[2] & 0b11, 0);
        assert_eq!(v[2].data[2] & 0b11, 1);
        assert_eq!(v[4].data[2] & 0b11, 2);

        let mut b = bucket(LineCap::Square, LineJoin::Miter);
        add_line(&mut b, &[(0.0, 0.0), (10.0, 0.0)]);
        let v = b.vertices();
        assert!((v[0].extrude().x + 1.0).abs() < 1e-9);
        assert!((v[3].extrude().x - 1.0).abs() < 1e-9);
    }

    #[test]
    fn closed_rings_have_no_caps() {
        let mut b = bucket(LineCap::Round, LineJoin::Miter);
        add_line(
            &mut b,
            &[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 0.0)],
        );
        assert!(b.vertices().iter().all(|v| !v.is_round()));
    }

    #[test]
    fn long_lines_split_into_segments() {
        let points: Vec<(f64, f64)> = (0..40_000_u32)
            .map(|i| (f64::from(i % 2 * 10), f64::from(i / 2 % 2000)))
            .collect();
        let mut b = bucket(LineCap::Butt, LineJoin::Miter);
        add_line(&mut b, &points);

        let first_points = MAX_SEGMENT_VERTICES / 2;
        let second_points = 40_000 - first_points + 1;
        assert_eq!(b.segments().len(), 2);
        let lengths: Vec<usize> = b.segments().iter().map(|s| s.vertex_length).collect();
        assert_eq!(lengths, [2 * first_points, 2 * second_points]);
        assert_eq!(b.vertices().len(), 2 * (first_points + second_points));
        assert_eq!(
            b.triangles().len(),
            2 * (first_points - 1) + 2 * (second_points - 1)
        );

        // Indices restart at each segment.
        let second = b.segments().iter().nth(1).unwrap();
        assert_eq!(second.vertex_offset(), 2 * first_points);
        assert_eq!(b.triangles()[second.index_offset() / 3], [0, 1, 2]);
    }

    #[test]
    fn create_bucket_filters_indexes_and_stages_paint() {
        let mut layer = LineLayer::new("roads");
        layer.set_filter(Filter::Equals("class".into(), FeatureValue::from("major")));
        layer.paint_mut().color.set_default(StyleValue::Function(PropertyFunction::new(
            "color",
            FunctionStops::Identity,
        )));
        layer.cascade(&CascadeParameters::new(&[], Duration::ZERO));
        layer.evaluate(&EvaluationParameters::new(14.0));

        let tile = TileLayer::new(
            "roads",
            vec![
                TileFeature::line(vec![vec![Point::new(0.0, 0.0), Point::new(100.0, 0.0)]])
                    .with_property("class", "major")
                    .with_property("color", "#ff0000"),
                TileFeature::line(vec![vec![Point::new(0.0, 50.0), Point::new(100.0, 50.0)]])
                    .with_property("class", "minor"),
                TileFeature::line(vec![vec![
                    Point::new(0.0, 200.0),
                    Point::new(50.0, 200.0),
                    Point::new(100.0, 250.0),
                ]])
                .with_property("class", "major")
                .with_property("color", "#00f"),
            ],
        );
        let mut index = FeatureIndex::new();
        let mut params = BucketParameters {
            tile_id: OverscaledTileId::new(14, 16),
            layer: &tile,
            feature_index: &mut index,
        };
        let b = layer.create_bucket("road-lines", &mut params);

        assert_eq!(b.overscaling(), 4);
        assert_eq!(b.feature_count(), 2);
        assert_eq!(b.vertices().len(), 4 + 6);
        assert_eq!(b.paint_data().staged_len(0), Some(10));
        assert_eq!(b.paint_data().staged_len(1), None);

        assert_eq!(index.len(), 2);
        let hits = index.query(&[Point::new(50.0, 0.0)], 1.0);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].index, 0);
        assert_eq!(hits[0].style_layer, "road-lines");
        assert!(index.query(&[Point::new(50.0, 50.0)], 1.0).is_empty());
    }

    #[test]
    fn other_source_layers_build_nothing() {
        let layer = evaluated_layer("roads");
        let tile = TileLayer::new(
            "water",
            vec![TileFeature::line(vec![vec![Point::ZERO, Point::new(10.0, 0.0)]])],
        );
        let mut index = FeatureIndex::new();
        let mut params = BucketParameters {
            tile_id: OverscaledTileId::new(10, 10),
            layer: &tile,
            feature_index: &mut index,
        };
        let b = layer.create_bucket("water-lines", &mut params);
        assert!(!b.has_data());
        assert_eq!(b.overscaling(), 1);
        assert!(index.is_empty());
    }

    #[test]
    fn upload_and_draw() {
        let mut ctx = RecordingContext::new();
        let program = LineProgram::new(&mut ctx, &LINE_SHADER, &ProgramParameters::default())
            .unwrap();

        let mut b = bucket(LineCap::Butt, LineJoin::Miter);
        add_line(&mut b, &[(0.0, 0.0), (10.0, 0.0)]);
        assert!(!b.is_uploaded());
        let stats = b.upload(&mut ctx);
        assert!(b.is_uploaded());
        assert_eq!(
            stats,
            UploadStats {
                vertex_bytes: 4 * size_of::<LineLayoutVertex>(),
                index_bytes: 6 * 2,
                paint_buffers: 0,
            }
        );

        let state = DrawState::new(
            DepthMode::DISABLED,
            StencilMode::DISABLED,
            ColorMode::ALPHA_BLENDED,
        );
        let paint = LinePaint::default();
        let uniforms = line_uniforms([0.0; 16], &paint, 2.0, [1.0, 1.0]);
        let first = b.draw(&mut ctx, &program, &state, &uniforms);
        assert_eq!(first.draw_calls, 1);
        assert_eq!(first.vertex_arrays_created, 1);
        assert_eq!(first.attribute_binds, 7);
        assert_eq!(ctx.draw_calls(), 1);

        let color = ctx
            .commands()
            .iter()
            .find_map(|c| match c {
                Command::BindAttribute {
                    location, value, ..
                } if location.0 == 2 => Some(*value),
                _ => None,
            })
            .unwrap();
        assert_eq!(color, AttributeValue::Constant(Color::BLACK.to_array()));

        let second = b.draw(&mut ctx, &program, &state, &uniforms);
        assert_eq!(second.skipped_binds, 1);
        assert_eq!(second.attribute_binds, 0);
        assert_eq!(ctx.draw_calls(), 2);
    }

    #[test]
    fn uniforms_carry_ratio_and_width() {
        let paint = LinePaint {
            width: 3.0,
            ..LinePaint::default()
        };
        let uniforms = line_uniforms([0.0; 16], &paint, 4.0, [2.0, 2.0]);
        assert!(uniforms.contains(&("u_ratio", UniformValue::F32(0.25))));
        assert!(uniforms.contains(&("u_width", UniformValue::F32(3.0))));
    }

    #[test]
    #[should_panic(expected = "bucket must be uploaded before drawing")]
    fn draw_before_upload_panics() {
        let mut ctx = RecordingContext::new();
        let program = LineProgram::new(&mut ctx, &LINE_SHADER, &ProgramParameters::default())
            .unwrap();
        let mut b = bucket(LineCap::Butt, LineJoin::Miter);
        add_line(&mut b, &[(0.0, 0.0), (10.0, 0.0)]);
        let state = DrawState::new(
            DepthMode::DISABLED,
            StencilMode::DISABLED,
            ColorMode::ALPHA_BLENDED,
        );
        b.draw(&mut ctx, &program, &state, &[]);
    }

    #[test]
    #[should_panic(expected = "cannot add features to an uploaded bucket")]
    fn adding_after_upload_panics() {
        let mut ctx = RecordingContext::new();
        let mut b = bucket(LineCap::Butt, LineJoin::Miter);
        add_line(&mut b, &[(0.0, 0.0), (10.0, 0.0)]);
        b.upload(&mut ctx);
        add_line(&mut b, &[(0.0, 5.0), (10.0, 5.0)]);
    }
}
