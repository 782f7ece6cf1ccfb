// Copyright 2026 the Contour Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The background style layer: a full-screen fill below everything else.

use super::id::RenderPass;
use crate::style::{
    CascadeParameters, Cascading, Color, EvaluationParameters, PropertyEvaluator, PropertyValue,
};

/// Declared paint properties of a background layer.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BackgroundPaintProperties {
    /// `background-color`.
    pub color: Cascading<PropertyValue<Color>>,
    /// `background-opacity`.
    pub opacity: Cascading<PropertyValue<f32>>,
}

/// Paint properties of a background layer evaluated for one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BackgroundPaint {
    /// `background-color`.
    pub color: Color,
    /// `background-opacity`.
    pub opacity: f32,
}

impl Default for BackgroundPaint {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            opacity: 1.0,
        }
    }
}

/// A style layer that fills the viewport with a color.
///
/// A fully opaque background draws in the opaque pass, which lets the
/// renderer skip clearing the framebuffer.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BackgroundLayer {
    paint: BackgroundPaintProperties,
    evaluated: BackgroundPaint,
    passes: RenderPass,
}

impl BackgroundLayer {
    /// Creates a background layer with default paint.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The declared paint properties.
    #[must_use]
    pub fn paint(&self) -> &BackgroundPaintProperties {
        &self.paint
    }

    /// Mutable access to the declared paint properties.
    pub fn paint_mut(&mut self) -> &mut BackgroundPaintProperties {
        &mut self.paint
    }

    /// Resolves style classes and starts transitions.
    pub fn cascade(&mut self, params: &CascadeParameters<'_>) {
        self.paint.color.cascade(params);
        self.paint.opacity.cascade(params);
    }

    /// Evaluates the paint properties for a frame. Returns `true` while a
    /// property is mid-transition.
    pub fn evaluate(&mut self, params: &EvaluationParameters) -> bool {
        let d = BackgroundPaint::default();
        self.evaluated = BackgroundPaint {
            color: self
                .paint
                .color
                .evaluate(&PropertyEvaluator::new(params, d.color), params.now),
            opacity: self
                .paint
                .opacity
                .evaluate(&PropertyEvaluator::new(params, d.opacity), params.now),
        };

        let BackgroundPaint { color, opacity } = self.evaluated;
        self.passes = if opacity <= 0.0 || color.a <= 0.0 {
            RenderPass::None
        } else if opacity >= 1.0 && color.a >= 1.0 {
            RenderPass::Opaque
        } else {
            RenderPass::Translucent
        };

        self.paint.color.has_transition() || self.paint.opacity.has_transition()
    }

    /// The render pass chosen by the last [`evaluate`](Self::evaluate).
    #[must_use]
    pub fn render_pass(&self) -> RenderPass {
        self.passes
    }

    /// The paint snapshot from the last [`evaluate`](Self::evaluate).
    #[must_use]
    pub fn evaluated(&self) -> &BackgroundPaint {
        &self.evaluated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::time::Duration;

    fn pass_for(color: Color, opacity: f32) -> RenderPass {
        let mut layer = BackgroundLayer::new();
        layer.paint_mut().color.set_default(PropertyValue::Constant(color));
        layer.paint_mut().opacity.set_default(PropertyValue::Constant(opacity));
        layer.cascade(&CascadeParameters::new(&[], Duration::ZERO));
        layer.evaluate(&EvaluationParameters::new(0.0));
        layer.render_pass()
    }

    #[test]
    fn render_pass_follows_opacity() {
        assert_eq!(pass_for(Color::WHITE, 1.0), RenderPass::Opaque);
        assert_eq!(pass_for(Color::WHITE, 0.5), RenderPass::Translucent);
        assert_eq!(pass_for(Color::new(0.5, 0.5, 0.5, 0.5), 1.0), RenderPass::Translucent);
        assert_eq!(pass_for(Color::WHITE, 0.0), RenderPass::None);
        assert_eq!(pass_for(Color::TRANSPARENT, 1.0), RenderPass::None);
    }
}
