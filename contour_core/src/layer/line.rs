// Copyright 2026 the Contour Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The line style layer.
//!
//! A [`LineLayer`] draws the line features of one source layer. Each frame it
//! is [cascaded](LineLayer::cascade) (when its paint changed) and
//! [evaluated](LineLayer::evaluate) at the current zoom, which fixes its
//! [`RenderPass`] and the [`LinePaint`] snapshot that buckets and draw calls
//! read. Its hit test undoes the paint-time translate and offset before
//! testing query geometry against the buffered line.

use alloc::string::String;
use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::Point;

use super::id::RenderPass;
use crate::feature::GeometryCollection;
use crate::geometry::{offset_line, polygon_intersects_buffered_multi_line, translate_query_geometry};
use crate::style::{
    CascadeParameters, Cascading, Color, CrossFadedPropertyEvaluator, DataDrivenPropertyEvaluator,
    EvaluationParameters, Faded, Filter, LineCap, LineJoin, PossiblyEvaluated, PropertyEvaluator,
    PropertyValue, StyleValue, TranslateAnchor,
};

/// Declared paint properties of a line layer, per style class.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LinePaintProperties {
    /// `line-opacity`. Data-driven.
    pub opacity: Cascading<StyleValue<f32>>,
    /// `line-color`. Data-driven.
    pub color: Cascading<StyleValue<Color>>,
    /// `line-translate`, in pixels.
    pub translate: Cascading<PropertyValue<[f32; 2]>>,
    /// `line-translate-anchor`.
    pub translate_anchor: Cascading<PropertyValue<TranslateAnchor>>,
    /// `line-width`, in pixels.
    pub width: Cascading<PropertyValue<f32>>,
    /// `line-gap-width`, in pixels. Data-driven.
    pub gap_width: Cascading<StyleValue<f32>>,
    /// `line-offset`, in pixels. Data-driven.
    pub offset: Cascading<StyleValue<f32>>,
    /// `line-blur`, in pixels. Data-driven.
    pub blur: Cascading<StyleValue<f32>>,
    /// `line-dasharray`, in line widths. Cross-faded.
    pub dasharray: Cascading<PropertyValue<Vec<f32>>>,
    /// `line-pattern`, an image name. Cross-faded.
    pub pattern: Cascading<PropertyValue<String>>,
}

impl LinePaintProperties {
    fn cascade(&mut self, params: &CascadeParameters<'_>) {
        self.opacity.cascade(params);
        self.color.cascade(params);
        self.translate.cascade(params);
        self.translate_anchor.cascade(params);
        self.width.cascade(params);
        self.gap_width.cascade(params);
        self.offset.cascade(params);
        self.blur.cascade(params);
        self.dasharray.cascade(params);
        self.pattern.cascade(params);
    }

    fn evaluate(&mut self, params: &EvaluationParameters) -> LinePaint {
        let d = LinePaint::default();
        let now = params.now;
        LinePaint {
            opacity: self.opacity.evaluate(
                &DataDrivenPropertyEvaluator::new(params, LinePaint::DEFAULT_OPACITY),
                now,
            ),
            color: self.color.evaluate(
                &DataDrivenPropertyEvaluator::new(params, LinePaint::DEFAULT_COLOR),
                now,
            ),
            translate: self
                .translate
                .evaluate(&PropertyEvaluator::new(params, d.translate), now),
            translate_anchor: self
                .translate_anchor
                .evaluate(&PropertyEvaluator::new(params, d.translate_anchor), now),
            width: self
                .width
                .evaluate(&PropertyEvaluator::new(params, d.width), now),
            gap_width: self
                .gap_width
                .evaluate(&DataDrivenPropertyEvaluator::new(params, 0.0), now),
            offset: self
                .offset
                .evaluate(&DataDrivenPropertyEvaluator::new(params, 0.0), now),
            blur: self
                .blur
                .evaluate(&DataDrivenPropertyEvaluator::new(params, 0.0), now),
            dasharray: self
                .dasharray
                .evaluate(&CrossFadedPropertyEvaluator::new(params, Vec::new()), now),
            pattern: self
                .pattern
                .evaluate(&CrossFadedPropertyEvaluator::new(params, String::new()), now),
        }
    }

    fn has_transition(&self) -> bool {
        self.opacity.has_transition()
            || self.color.has_transition()
            || self.translate.has_transition()
            || self.translate_anchor.has_transition()
            || self.width.has_transition()
            || self.gap_width.has_transition()
            || self.offset.has_transition()
            || self.blur.has_transition()
            || self.dasharray.has_transition()
            || self.pattern.has_transition()
    }
}

/// Paint properties of a line layer evaluated for one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct LinePaint {
    /// `line-opacity`.
    pub opacity: PossiblyEvaluated<f32>,
    /// `line-color`.
    pub color: PossiblyEvaluated<Color>,
    /// `line-translate`.
    pub translate: [f32; 2],
    /// `line-translate-anchor`.
    pub translate_anchor: TranslateAnchor,
    /// `line-width`.
    pub width: f32,
    /// `line-gap-width`.
    pub gap_width: PossiblyEvaluated<f32>,
    /// `line-offset`.
    pub offset: PossiblyEvaluated<f32>,
    /// `line-blur`.
    pub blur: PossiblyEvaluated<f32>,
    /// `line-dasharray`.
    pub dasharray: Faded<Vec<f32>>,
    /// `line-pattern`.
    pub pattern: Faded<String>,
}

impl LinePaint {
    /// Default `line-opacity`.
    pub const DEFAULT_OPACITY: f32 = 1.0;
    /// Default `line-color`.
    pub const DEFAULT_COLOR: Color = Color::BLACK;
    /// Default `line-width`.
    pub const DEFAULT_WIDTH: f32 = 1.0;
}

impl Default for LinePaint {
    fn default() -> Self {
        Self {
            opacity: PossiblyEvaluated::Constant(Self::DEFAULT_OPACITY),
            color: PossiblyEvaluated::Constant(Self::DEFAULT_COLOR),
            translate: [0.0, 0.0],
            translate_anchor: TranslateAnchor::Map,
            width: Self::DEFAULT_WIDTH,
            gap_width: PossiblyEvaluated::Constant(0.0),
            offset: PossiblyEvaluated::Constant(0.0),
            blur: PossiblyEvaluated::Constant(0.0),
            dasharray: Faded::settled(Vec::new()),
            pattern: Faded::settled(String::new()),
        }
    }
}

/// Declared layout properties of a line layer.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LineLayoutProperties {
    /// `line-cap`.
    pub cap: PropertyValue<LineCap>,
    /// `line-join`.
    pub join: PropertyValue<LineJoin>,
    /// `line-miter-limit`.
    pub miter_limit: PropertyValue<f32>,
    /// `line-round-limit`.
    pub round_limit: PropertyValue<f32>,
}

impl LineLayoutProperties {
    /// Evaluates the layout at `params.zoom`.
    #[must_use]
    pub fn evaluate(&self, params: &EvaluationParameters) -> LineLayout {
        use crate::style::Evaluator as _;

        let d = LineLayout::default();
        LineLayout {
            cap: PropertyEvaluator::new(params, d.cap).evaluate(&self.cap),
            join: PropertyEvaluator::new(params, d.join).evaluate(&self.join),
            miter_limit: PropertyEvaluator::new(params, d.miter_limit).evaluate(&self.miter_limit),
            round_limit: PropertyEvaluator::new(params, d.round_limit).evaluate(&self.round_limit),
        }
    }
}

/// Layout properties of a line layer evaluated for one tile.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineLayout {
    /// `line-cap`.
    pub cap: LineCap,
    /// `line-join`.
    pub join: LineJoin,
    /// `line-miter-limit`.
    pub miter_limit: f32,
    /// `line-round-limit`.
    pub round_limit: f32,
}

impl Default for LineLayout {
    fn default() -> Self {
        Self {
            cap: LineCap::Butt,
            join: LineJoin::Miter,
            miter_limit: 2.0,
            round_limit: 1.05,
        }
    }
}

/// A style layer that draws line features.
#[derive(Clone, Debug, PartialEq)]
pub struct LineLayer {
    source_layer: String,
    filter: Filter,
    layout: LineLayoutProperties,
    paint: LinePaintProperties,
    evaluated: LinePaint,
    dash_line_width: f32,
    passes: RenderPass,
}

impl LineLayer {
    /// Creates a layer drawing the features of `source_layer`, with every
    /// property at its default.
    #[must_use]
    pub fn new(source_layer: &str) -> Self {
        Self {
            source_layer: source_layer.into(),
            filter: Filter::Null,
            layout: LineLayoutProperties::default(),
            paint: LinePaintProperties::default(),
            evaluated: LinePaint::default(),
            dash_line_width: LinePaint::DEFAULT_WIDTH,
            passes: RenderPass::None,
        }
    }

    /// The tile layer this layer draws from.
    #[must_use]
    pub fn source_layer(&self) -> &str {
        &self.source_layer
    }

    /// The feature filter.
    #[must_use]
    pub fn filter(&self) -> &Filter {
        &self.filter
    }

    /// Replaces the feature filter. Buckets must be rebuilt.
    pub fn set_filter(&mut self, filter: Filter) {
        self.filter = filter;
    }

    /// The declared layout properties.
    #[must_use]
    pub fn layout(&self) -> &LineLayoutProperties {
        &self.layout
    }

    /// Mutable access to the declared layout properties. Buckets must be
    /// rebuilt after a change.
    pub fn layout_mut(&mut self) -> &mut LineLayoutProperties {
        &mut self.layout
    }

    /// The declared paint properties.
    #[must_use]
    pub fn paint(&self) -> &LinePaintProperties {
        &self.paint
    }

    /// Mutable access to the declared paint properties. Changes take effect
    /// at the next [`cascade`](Self::cascade).
    pub fn paint_mut(&mut self) -> &mut LinePaintProperties {
        &mut self.paint
    }

    /// Resolves style classes and starts transitions.
    pub fn cascade(&mut self, params: &CascadeParameters<'_>) {
        self.paint.cascade(params);
    }

    /// Evaluates the paint properties for a frame. Returns `true` while any
    /// property is mid-transition, meaning another frame is needed.
    pub fn evaluate(&mut self, params: &EvaluationParameters) -> bool {
        // Dash arrays are scaled by the width at the integer zoom below.
        let mut dash_params = *params;
        dash_params.zoom = params.zoom.floor();
        self.dash_line_width = self.paint.width.evaluate(
            &PropertyEvaluator::new(&dash_params, LinePaint::DEFAULT_WIDTH),
            params.now,
        );

        self.evaluated = self.paint.evaluate(params);

        let visible = self.evaluated.opacity.constant_or(LinePaint::DEFAULT_OPACITY) > 0.0
            && self.evaluated.color.constant_or(LinePaint::DEFAULT_COLOR).a > 0.0
            && self.evaluated.width > 0.0;
        self.passes = if visible {
            RenderPass::Translucent
        } else {
            RenderPass::None
        };

        self.paint.has_transition()
    }

    /// The render pass chosen by the last [`evaluate`](Self::evaluate).
    #[must_use]
    pub fn render_pass(&self) -> RenderPass {
        self.passes
    }

    /// The paint snapshot from the last [`evaluate`](Self::evaluate).
    #[must_use]
    pub fn evaluated(&self) -> &LinePaint {
        &self.evaluated
    }

    /// Line width at the integer zoom, used to scale dash arrays.
    #[must_use]
    pub fn dash_line_width(&self) -> f32 {
        self.dash_line_width
    }

    /// Full drawn width in pixels.
    ///
    /// A gapped line is drawn as two lines of `line-width` on either side of
    /// the gap, so it spans `gap + 2 * width`.
    #[must_use]
    pub fn line_width(&self) -> f32 {
        let width = self.evaluated.width;
        let gap = self.evaluated.gap_width.constant_or(0.0);
        if gap > 0.0 { gap + 2.0 * width } else { width }
    }

    /// How far in pixels from a feature's geometry a query can hit it.
    #[must_use]
    pub fn query_radius(&self) -> f32 {
        let [tx, ty] = self.evaluated.translate;
        let offset = self.evaluated.offset.constant_or(0.0);
        self.line_width() / 2.0 + offset.abs() + tx.hypot(ty)
    }

    /// Returns `true` if `query` (in tile units) hits the line drawn from
    /// `geometry`.
    ///
    /// `bearing` is the map rotation in radians, used for viewport-anchored
    /// translation.
    #[must_use]
    pub fn query_intersects_geometry(
        &self,
        query: &[Point],
        geometry: &GeometryCollection,
        bearing: f32,
        pixels_to_tile_units: f32,
    ) -> bool {
        let pixels_to_tile_units = f64::from(pixels_to_tile_units);
        let half_width = f64::from(self.line_width()) / 2.0 * pixels_to_tile_units;

        let translated = translate_query_geometry(
            query,
            self.evaluated.translate,
            self.evaluated.translate_anchor,
            f64::from(bearing),
            pixels_to_tile_units,
        );
        let offset = f64::from(self.evaluated.offset.constant_or(0.0));
        let offset_geometry = offset_line(geometry, offset * pixels_to_tile_units);

        polygon_intersects_buffered_multi_line(
            translated.as_deref().unwrap_or(query),
            offset_geometry.as_ref().unwrap_or(geometry),
            half_width,
        )
    }
}
