// Copyright 2026 the Contour Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hit-test geometry in tile units.
//!
//! Rendering-time query geometry (a tap point, a selection box) is tested
//! against the raw feature geometry after adjusting for the layer's paint
//! properties: [`translate_query_geometry`] undoes the layer's translate and
//! [`offset_line`] applies the layer's perpendicular line offset. The result
//! goes through [`polygon_intersects_buffered_multi_line`].
//!
//! Queries are polygons in general; a single point and a two-point segment
//! are the degenerate cases.

use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Point, Vec2};

use crate::feature::{GeometryCollection, GeometryCoordinates};
use crate::style::types::TranslateAnchor;

/// Upper bound on the miter length factor `1 / cos(θ/2)` when offsetting.
///
/// Near-reversals would otherwise push offset points arbitrarily far from
/// the line. 2 matches the default `line-miter-limit`.
pub const MAX_OFFSET_MITER: f64 = 2.0;

/// Returns the per-point miter extrusion vectors of a line.
///
/// Each vector bisects the unit perpendiculars of the incoming and outgoing
/// segments and is scaled by `1 / cos(θ/2)` (capped at `max_miter`), so that
/// moving a point by `extrusion * d` keeps it at distance `d` from both
/// adjacent segments. End points use the single available perpendicular.
/// Points that have no usable perpendicular (a lone point, or a run of
/// repeated points) get a zero vector. An exact reversal falls back to the
/// outgoing perpendicular.
#[must_use]
pub fn miter_extrusions(line: &[Point], max_miter: f64) -> Vec<Vec2> {
    let n = line.len();
    (0..n)
        .map(|i| {
            let incoming = if i == 0 {
                Vec2::ZERO
            } else {
                unit_perp(line[i] - line[i - 1])
            };
            let outgoing = if i + 1 == n {
                Vec2::ZERO
            } else {
                unit_perp(line[i + 1] - line[i])
            };
            let reference = if outgoing == Vec2::ZERO {
                incoming
            } else {
                outgoing
            };

            let sum = incoming + outgoing;
            let len = sum.hypot();
            if len < 1e-9 {
                return reference;
            }
            let extrude = sum / len;
            let cos_half_angle = extrude.dot(reference);
            extrude * (1.0 / cos_half_angle).min(max_miter)
        })
        .collect()
}

fn unit_perp(v: Vec2) -> Vec2 {
    let len = v.hypot();
    if len == 0.0 {
        Vec2::ZERO
    } else {
        Vec2::new(-v.y, v.x) / len
    }
}

/// Shifts every ring perpendicular to itself by `offset` tile units.
///
/// Positive offsets move to the left of the direction of travel in a y-down
/// tile space. Returns `None` when `offset` is zero so callers can keep the
/// original geometry without copying it.
#[must_use]
pub fn offset_line(rings: &GeometryCollection, offset: f64) -> Option<GeometryCollection> {
    if offset == 0.0 {
        return None;
    }
    Some(
        rings
            .iter()
            .map(|ring| {
                miter_extrusions(ring, MAX_OFFSET_MITER)
                    .into_iter()
                    .zip(ring)
                    .map(|(extrude, &p)| p + extrude * offset)
                    .collect()
            })
            .collect(),
    )
}

/// Moves query geometry into the frame of a translated layer.
///
/// `translate` is in pixels and is scaled by `pixels_to_tile_units`. With a
/// [`TranslateAnchor::Viewport`] anchor it is first rotated by `-bearing`
/// (radians). Returns `None` when the translation is zero.
#[must_use]
pub fn translate_query_geometry(
    query: &[Point],
    translate: [f32; 2],
    anchor: TranslateAnchor,
    bearing: f64,
    pixels_to_tile_units: f64,
) -> Option<GeometryCoordinates> {
    if translate == [0.0, 0.0] {
        return None;
    }
    let mut offset = Vec2::new(f64::from(translate[0]), f64::from(translate[1])) * pixels_to_tile_units;
    if anchor == TranslateAnchor::Viewport {
        offset = rotate(offset, -bearing);
    }
    Some(query.iter().map(|&p| p - offset).collect())
}

fn rotate(v: Vec2, angle: f64) -> Vec2 {
    let (sin, cos) = (angle.sin(), angle.cos());
    Vec2::new(cos * v.x - sin * v.y, sin * v.x + cos * v.y)
}

// ---------------------------------------------------------------------------
// Intersection tests
// ---------------------------------------------------------------------------

/// Returns `true` if `polygon` comes within `radius` of any line, or contains
/// any line vertex.
#[must_use]
pub fn polygon_intersects_buffered_multi_line(
    polygon: &[Point],
    lines: &GeometryCollection,
    radius: f64,
) -> bool {
    lines.iter().any(|line| {
        (polygon.len() >= 3 && line.iter().any(|&p| polygon_contains_point(polygon, p)))
            || line_intersects_buffered_line(polygon, line, radius)
    })
}

/// Returns `true` if the two lines cross or come within `radius` of each
/// other.
#[must_use]
pub fn line_intersects_buffered_line(a: &[Point], b: &[Point], radius: f64) -> bool {
    if a.len() > 1 {
        if line_intersects_line(a, b) {
            return true;
        }
        if b.iter().any(|&p| point_intersects_buffered_line(p, a, radius)) {
            return true;
        }
    }
    a.iter().any(|&p| point_intersects_buffered_line(p, b, radius))
}

/// Returns `true` if `p` is strictly within `radius` of `line`.
#[must_use]
pub fn point_intersects_buffered_line(p: Point, line: &[Point], radius: f64) -> bool {
    let radius_squared = radius * radius;
    match line {
        [] => false,
        [only] => (p - *only).hypot2() < radius_squared,
        _ => line
            .windows(2)
            .any(|w| dist_to_segment_squared(p, w[0], w[1]) < radius_squared),
    }
}

/// Returns `true` if any segment of `a` crosses any segment of `b`.
#[must_use]
pub fn line_intersects_line(a: &[Point], b: &[Point]) -> bool {
    a.windows(2).any(|sa| {
        b.windows(2)
            .any(|sb| segments_intersect(sa[0], sa[1], sb[0], sb[1]))
    })
}

/// Returns `true` if segment `p0 p1` properly crosses segment `q0 q1`.
#[must_use]
pub fn segments_intersect(p0: Point, p1: Point, q0: Point, q1: Point) -> bool {
    is_counter_clockwise(p0, q0, q1) != is_counter_clockwise(p1, q0, q1)
        && is_counter_clockwise(p0, p1, q0) != is_counter_clockwise(p0, p1, q1)
}

fn is_counter_clockwise(a: Point, b: Point, c: Point) -> bool {
    (c.y - a.y) * (b.x - a.x) > (b.y - a.y) * (c.x - a.x)
}

/// Squared distance from `p` to the segment `v w`.
#[must_use]
pub fn dist_to_segment_squared(p: Point, v: Point, w: Point) -> f64 {
    let l2 = (w - v).hypot2();
    if l2 == 0.0 {
        return (p - v).hypot2();
    }
    let t = (p - v).dot(w - v) / l2;
    if t < 0.0 {
        (p - v).hypot2()
    } else if t > 1.0 {
        (p - w).hypot2()
    } else {
        (p - v.lerp(w, t)).hypot2()
    }
}

/// Even-odd point-in-polygon test. The ring may be open or closed.
#[must_use]
pub fn polygon_contains_point(ring: &[Point], p: Point) -> bool {
    let mut inside = false;
    let mut j = ring.len().wrapping_sub(1);
    for (i, &p1) in ring.iter().enumerate() {
        let p2 = ring[j];
        if (p1.y > p.y) != (p2.y > p.y) && p.x < (p2.x - p1.x) * (p.y - p1.y) / (p2.y - p1.y) + p1.x
        {
            inside = !inside;
        }
        j = i;
    }
    inside
}
