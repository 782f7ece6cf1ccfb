// Copyright 2026 the Contour Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frame evaluation and change tracking.
//!
//! Evaluation follows a drain-recompute pattern:
//!
//! 1. **PAINT**: Drain dirty indices and re-cascade each layer against the
//!    store's active classes and transition.
//! 2. **LAYOUT** / **VISIBILITY**: Drain dirty indices (no recomputation;
//!    renderers rebuild buckets or skip layers as they see fit).
//! 3. **TOPOLOGY**: Drain and report whether the draw order changed.
//! 4. Every live layer is evaluated at the frame's zoom and time, since
//!    zoom curves and transitions change without any property being set.
//!
//! [`StyleChanges`] uses raw slot indices (`u32`) rather than
//! [`StyleLayerId`] handles so that renderers can index directly into the
//! store via the `*_at()` accessors (e.g.
//! [`layer_at`](super::StyleLayerStore::layer_at)) without paying for
//! generation checks on every access.
//!
//! [`StyleLayerId`]: super::StyleLayerId

use alloc::vec::Vec;

use super::id::{RenderPass, Visibility};
use super::store::StyleLayerStore;
use crate::dirty;
use crate::style::{CascadeParameters, EvaluationParameters};

/// The set of changes produced by a single [`StyleLayerStore::evaluate`]
/// call.
#[derive(Clone, Debug, Default)]
pub struct StyleChanges {
    /// Layers that were re-cascaded.
    pub cascaded: Vec<u32>,
    /// Layers whose layout or filter changed. Their buckets are stale.
    pub layout: Vec<u32>,
    /// Layers whose visibility changed.
    pub visibility: Vec<u32>,
    /// Layers whose render pass changed.
    pub render_passes: Vec<u32>,
    /// Layers added since the last evaluate.
    pub added: Vec<u32>,
    /// Layers removed since the last evaluate.
    pub removed: Vec<u32>,
    /// Whether layers were added, removed, or reordered.
    pub order_changed: bool,
    /// Whether any layer is mid-transition, so another frame is needed.
    pub transitioning: bool,
}

impl StyleChanges {
    /// Clears all change lists.
    pub fn clear(&mut self) {
        self.cascaded.clear();
        self.layout.clear();
        self.visibility.clear();
        self.render_passes.clear();
        self.added.clear();
        self.removed.clear();
        self.order_changed = false;
        self.transitioning = false;
    }

    /// Returns `true` if nothing changed and nothing is animating.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cascaded.is_empty()
            && self.layout.is_empty()
            && self.visibility.is_empty()
            && self.render_passes.is_empty()
            && self.added.is_empty()
            && self.removed.is_empty()
            && !self.order_changed
            && !self.transitioning
    }
}

impl StyleLayerStore {
    /// Cascades and evaluates the style for one frame, returning the set of
    /// changes.
    pub fn evaluate(&mut self, params: &EvaluationParameters) -> StyleChanges {
        let mut changes = StyleChanges::default();
        self.evaluate_into(params, &mut changes);
        changes
    }

    /// Like [`evaluate`](Self::evaluate), but reuses a caller-provided buffer
    /// to avoid allocation.
    pub fn evaluate_into(&mut self, params: &EvaluationParameters, changes: &mut StyleChanges) {
        changes.clear();

        // Drain PAINT channel and re-cascade.
        let cascaded: Vec<u32> = self.drain_live(dirty::PAINT);
        {
            let Self {
                layers,
                classes,
                transition,
                ..
            } = self;
            let cascade = CascadeParameters::new(classes, params.now).with_transition(*transition);
            for &idx in &cascaded {
                if let Some(layer) = layers[idx as usize].as_mut() {
                    layer.cascade(&cascade);
                }
            }
        }
        changes.cascaded = cascaded;

        changes.layout = self.drain_live(dirty::LAYOUT);
        changes.visibility = self.drain_live(dirty::VISIBILITY);

        // Removed slots are reported too, so drain without filtering.
        let topology: Vec<u32> = self
            .dirty
            .drain(dirty::TOPOLOGY)
            .deterministic()
            .run()
            .collect();
        changes.order_changed = !topology.is_empty();

        for &idx in &self.order {
            let Some(layer) = self.layers[idx as usize].as_mut() else {
                continue;
            };
            changes.transitioning |= layer.evaluate(params);
            let pass = match self.visibility[idx as usize] {
                Visibility::Visible => layer.render_pass(),
                Visibility::None => RenderPass::None,
            };
            if self.render_pass[idx as usize] != pass {
                self.render_pass[idx as usize] = pass;
                changes.render_passes.push(idx);
            }
        }

        // Move lifecycle lists.
        core::mem::swap(&mut self.pending_added, &mut changes.added);
        core::mem::swap(&mut self.pending_removed, &mut changes.removed);
    }

    /// Drains a local channel, dropping slots freed since they were marked.
    fn drain_live(&mut self, channel: understory_dirty::Channel) -> Vec<u32> {
        let drained: Vec<u32> = self.dirty.drain(channel).deterministic().run().collect();
        drained
            .into_iter()
            .filter(|&idx| self.layers[idx as usize].is_some())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;
    use core::time::Duration;

    use super::*;
    use crate::layer::{BackgroundLayer, LineLayer};
    use crate::style::{Color, PropertyValue, StyleClass, StyleValue, TransitionOptions};

    fn params(now_ms: u64) -> EvaluationParameters {
        EvaluationParameters::new(10.0).with_now(Duration::from_millis(now_ms))
    }

    #[test]
    fn first_evaluate_reports_added_layers() {
        let mut store = StyleLayerStore::new();
        let line = store.add_layer("roads", LineLayer::new("road")).unwrap();
        let bg = store.add_layer("bg", BackgroundLayer::new()).unwrap();

        let changes = store.evaluate(&params(0));
        assert_eq!(changes.added, vec![line.index(), bg.index()]);
        assert_eq!(changes.cascaded, vec![line.index(), bg.index()]);
        assert!(changes.order_changed);
        assert!(!changes.transitioning);
        assert_eq!(store.render_pass(line), RenderPass::Translucent);
        assert_eq!(store.render_pass(bg), RenderPass::Opaque);
        assert_eq!(changes.render_passes, vec![line.index(), bg.index()]);
    }

    #[test]
    fn no_change_evaluate_returns_empty() {
        let mut store = StyleLayerStore::new();
        store.add_layer("roads", LineLayer::new("road")).unwrap();
        let _ = store.evaluate(&params(0));
        let changes = store.evaluate(&params(16));
        assert!(changes.is_empty(), "{changes:?}");
    }

    #[test]
    fn paint_change_cascades_and_transitions() {
        let mut store = StyleLayerStore::new();
        let id = store.add_layer("roads", LineLayer::new("road")).unwrap();
        let _ = store.evaluate(&params(0));

        store.update_line_paint(id, |paint| {
            paint.width.set_default(PropertyValue::Constant(5.0));
        });
        let changes = store.evaluate(&params(1000));
        assert_eq!(changes.cascaded, vec![id.index()]);
        assert!(changes.transitioning);
        assert_eq!(store.line_layer(id).evaluated().width, 1.0);

        let changes = store.evaluate(&params(1150));
        assert!(changes.transitioning);
        let mid = store.line_layer(id).evaluated().width;
        assert!(mid > 1.0 && mid < 5.0, "mid-transition width {mid}");

        let changes = store.evaluate(&params(1300));
        assert!(!changes.transitioning);
        assert_eq!(store.line_layer(id).evaluated().width, 5.0);
    }

    #[test]
    fn classes_recascade_every_layer() {
        let mut store = StyleLayerStore::new();
        store.set_transition(TransitionOptions::NONE);
        let id = store.add_layer("roads", LineLayer::new("road")).unwrap();
        store.update_line_paint(id, |paint| {
            paint.opacity.set(
                StyleClass::named("faded"),
                StyleValue::Constant(0.25),
            );
        });
        let _ = store.evaluate(&params(0));
        assert_eq!(
            store.line_layer(id).evaluated().opacity.constant(),
            Some(&1.0)
        );

        store.set_classes(vec![StyleClass::named("faded")]);
        let changes = store.evaluate(&params(10));
        assert_eq!(changes.cascaded, vec![id.index()]);
        assert!(!changes.transitioning);
        assert_eq!(
            store.line_layer(id).evaluated().opacity.constant(),
            Some(&0.25)
        );
    }

    #[test]
    fn layout_and_filter_changes_are_reported() {
        let mut store = StyleLayerStore::new();
        let id = store.add_layer("roads", LineLayer::new("road")).unwrap();
        let _ = store.evaluate(&params(0));

        store.update_line_layout(id, |layout| {
            layout.miter_limit = PropertyValue::Constant(4.0);
        });
        let changes = store.evaluate(&params(0));
        assert_eq!(changes.layout, vec![id.index()]);
        assert!(changes.cascaded.is_empty());

        store.set_filter(id, crate::style::Filter::Has("name".into()));
        let changes = store.evaluate(&params(0));
        assert_eq!(changes.layout, vec![id.index()]);
    }

    #[test]
    fn hidden_layer_has_no_render_pass() {
        let mut store = StyleLayerStore::new();
        let id = store.add_layer("bg", BackgroundLayer::new()).unwrap();
        let _ = store.evaluate(&params(0));

        store.set_visibility(id, Visibility::None);
        let changes = store.evaluate(&params(0));
        assert_eq!(changes.visibility, vec![id.index()]);
        assert_eq!(changes.render_passes, vec![id.index()]);
        assert_eq!(store.render_pass(id), RenderPass::None);

        store.set_visibility(id, Visibility::Visible);
        let _ = store.evaluate(&params(0));
        assert_eq!(store.render_pass(id), RenderPass::Opaque);
    }

    #[test]
    fn translucent_background() {
        let mut store = StyleLayerStore::new();
        store.set_transition(TransitionOptions::NONE);
        let id = store.add_layer("bg", BackgroundLayer::new()).unwrap();
        store.update_background_paint(id, |paint| {
            paint
                .color
                .set_default(PropertyValue::Constant(Color::new(0.0, 0.0, 0.5, 0.5)));
        });
        let _ = store.evaluate(&params(0));
        assert_eq!(store.render_pass(id), RenderPass::Translucent);
    }

    #[test]
    fn removal_is_reported_and_dirty_marks_dropped() {
        let mut store = StyleLayerStore::new();
        let id = store.add_layer("roads", LineLayer::new("road")).unwrap();
        let _ = store.evaluate(&params(0));

        store.update_line_paint(id, |paint| {
            paint.width.set_default(PropertyValue::Constant(3.0));
        });
        store.remove_layer(id);
        let changes = store.evaluate(&params(0));
        assert_eq!(changes.removed, vec![id.index()]);
        assert!(changes.cascaded.is_empty());
        assert!(changes.order_changed);
    }

    #[test]
    fn reorder_sets_order_changed() {
        let mut store = StyleLayerStore::new();
        let a = store.add_layer("a", LineLayer::new("road")).unwrap();
        store.add_layer("b", LineLayer::new("road")).unwrap();
        let _ = store.evaluate(&params(0));

        store.move_layer_before(a, None);
        let changes = store.evaluate(&params(0));
        assert!(changes.order_changed);
        assert!(changes.added.is_empty());
    }

    #[test]
    fn evaluate_into_reuses_buffer() {
        let mut store = StyleLayerStore::new();
        store.add_layer("a", LineLayer::new("road")).unwrap();
        let mut changes = StyleChanges::default();
        store.evaluate_into(&params(0), &mut changes);
        assert_eq!(changes.added.len(), 1);
        store.evaluate_into(&params(0), &mut changes);
        assert!(changes.is_empty());
    }
}
