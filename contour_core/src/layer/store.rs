// Copyright 2026 the Contour Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Struct-of-arrays style layer storage with allocation, draw order, and
//! property management.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use understory_dirty::{CycleHandling, DirtyTracker};

use super::background::{BackgroundLayer, BackgroundPaintProperties};
use super::id::{RenderPass, StyleLayerId, Visibility};
use super::line::{LineLayer, LineLayoutProperties, LinePaintProperties};
use crate::dirty;
use crate::style::{CascadeParameters, EvaluationParameters, Filter, StyleClass, TransitionOptions};

/// A style layer of any supported type.
#[derive(Clone, Debug, PartialEq)]
pub enum StyleLayer {
    /// Stroked line features.
    Line(LineLayer),
    /// A viewport fill.
    Background(BackgroundLayer),
}

impl StyleLayer {
    /// The style type name, e.g. `"line"`.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Line(_) => "line",
            Self::Background(_) => "background",
        }
    }

    /// Resolves style classes and starts transitions.
    pub fn cascade(&mut self, params: &CascadeParameters<'_>) {
        match self {
            Self::Line(layer) => layer.cascade(params),
            Self::Background(layer) => layer.cascade(params),
        }
    }

    /// Evaluates paint properties. Returns `true` while mid-transition.
    pub fn evaluate(&mut self, params: &EvaluationParameters) -> bool {
        match self {
            Self::Line(layer) => layer.evaluate(params),
            Self::Background(layer) => layer.evaluate(params),
        }
    }

    /// The render pass chosen by the last evaluation.
    #[must_use]
    pub fn render_pass(&self) -> RenderPass {
        match self {
            Self::Line(layer) => layer.render_pass(),
            Self::Background(layer) => layer.render_pass(),
        }
    }

    /// Returns the line layer, if this is one.
    #[must_use]
    pub fn as_line(&self) -> Option<&LineLayer> {
        match self {
            Self::Line(layer) => Some(layer),
            Self::Background(_) => None,
        }
    }

    /// Returns the background layer, if this is one.
    #[must_use]
    pub fn as_background(&self) -> Option<&BackgroundLayer> {
        match self {
            Self::Background(layer) => Some(layer),
            Self::Line(_) => None,
        }
    }
}

impl From<LineLayer> for StyleLayer {
    fn from(layer: LineLayer) -> Self {
        Self::Line(layer)
    }
}

impl From<BackgroundLayer> for StyleLayer {
    fn from(layer: BackgroundLayer) -> Self {
        Self::Background(layer)
    }
}

/// Errors from structural edits to a [`StyleLayerStore`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StyleError {
    /// A live layer already uses this identifier.
    DuplicateLayer(String),
}

impl fmt::Display for StyleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateLayer(id) => {
                write!(f, "a layer with identifier \"{id}\" already exists")
            }
        }
    }
}

impl core::error::Error for StyleError {}

/// Struct-of-arrays storage for the layers of one style.
///
/// Layers are addressed by [`StyleLayerId`] handles. Removed layers free
/// their slot for reuse, and generation counters prevent stale handle
/// access. Draw order is kept separately from slot order.
#[derive(Debug)]
pub struct StyleLayerStore {
    // -- Per-slot data --
    pub(crate) identifiers: Vec<String>,
    pub(crate) layers: Vec<Option<StyleLayer>>,
    pub(crate) visibility: Vec<Visibility>,

    // -- Computed (written by evaluate) --
    pub(crate) render_pass: Vec<RenderPass>,

    // -- Allocation --
    pub(crate) generation: Vec<u32>,
    pub(crate) free_list: Vec<u32>,
    pub(crate) len: u32,

    // -- Draw order, bottom to top --
    pub(crate) order: Vec<u32>,

    // -- Dirty tracking --
    pub(crate) dirty: DirtyTracker<u32>,

    // -- Style-wide cascade inputs --
    pub(crate) classes: Vec<StyleClass>,
    pub(crate) transition: TransitionOptions,

    // -- Lifecycle tracking --
    pub(crate) pending_added: Vec<u32>,
    pub(crate) pending_removed: Vec<u32>,
}

impl Default for StyleLayerStore {
    fn default() -> Self {
        Self::new()
    }
}

impl StyleLayerStore {
    /// Creates an empty store with no active classes and the default
    /// transition.
    #[must_use]
    pub fn new() -> Self {
        Self {
            identifiers: Vec::new(),
            layers: Vec::new(),
            visibility: Vec::new(),
            render_pass: Vec::new(),
            generation: Vec::new(),
            free_list: Vec::new(),
            len: 0,
            order: Vec::new(),
            dirty: DirtyTracker::with_cycle_handling(CycleHandling::Error),
            classes: Vec::new(),
            transition: TransitionOptions::STYLE_DEFAULT,
            pending_added: Vec::new(),
            pending_removed: Vec::new(),
        }
    }

    // -- Allocation API --

    /// Adds a layer on top of the draw order.
    ///
    /// # Errors
    ///
    /// Returns [`StyleError::DuplicateLayer`] if a live layer already uses
    /// `identifier`.
    pub fn add_layer(
        &mut self,
        identifier: &str,
        layer: impl Into<StyleLayer>,
    ) -> Result<StyleLayerId, StyleError> {
        let id = self.allocate(identifier, layer.into())?;
        self.order.push(id.idx);
        Ok(id)
    }

    /// Adds a layer directly below `before` in the draw order.
    ///
    /// # Errors
    ///
    /// Returns [`StyleError::DuplicateLayer`] if a live layer already uses
    /// `identifier`.
    ///
    /// # Panics
    ///
    /// Panics if `before` is stale.
    pub fn add_layer_before(
        &mut self,
        identifier: &str,
        layer: impl Into<StyleLayer>,
        before: StyleLayerId,
    ) -> Result<StyleLayerId, StyleError> {
        self.validate(before);
        let id = self.allocate(identifier, layer.into())?;
        let pos = self.order_position(before.idx);
        self.order.insert(pos, id.idx);
        Ok(id)
    }

    /// Removes a layer and hands it back to the caller, who may add it
    /// again later under the same or another identifier.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn remove_layer(&mut self, id: StyleLayerId) -> StyleLayer {
        self.validate(id);
        let idx = id.idx;
        let pos = self.order_position(idx);
        self.order.remove(pos);

        let layer = self.layers[idx as usize].take();
        self.identifiers[idx as usize].clear();
        self.render_pass[idx as usize] = RenderPass::None;

        self.dirty.remove_key(idx);

        // Bump generation so old handles immediately fail validation.
        self.generation[idx as usize] += 1;

        self.free_list.push(idx);
        self.pending_removed.push(idx);
        self.dirty.mark(idx, dirty::TOPOLOGY);

        match layer {
            Some(layer) => layer,
            None => unreachable!("live slot {idx} holds no layer"),
        }
    }

    /// Returns whether the given handle refers to a live layer.
    #[must_use]
    pub fn is_alive(&self, id: StyleLayerId) -> bool {
        (id.idx < self.len)
            && self.generation[id.idx as usize] == id.generation
            && self.layers[id.idx as usize].is_some()
    }

    /// Looks up a live layer by identifier.
    #[must_use]
    pub fn layer_id(&self, identifier: &str) -> Option<StyleLayerId> {
        (0..self.len)
            .find(|&idx| {
                self.layers[idx as usize].is_some() && self.identifiers[idx as usize] == identifier
            })
            .map(|idx| StyleLayerId {
                idx,
                generation: self.generation[idx as usize],
            })
    }

    /// Number of live layers.
    #[must_use]
    pub fn layer_count(&self) -> usize {
        self.order.len()
    }

    // -- Order API --

    /// Moves a layer directly below `before`, or to the top when `before`
    /// is `None`.
    ///
    /// # Panics
    ///
    /// Panics if either handle is stale.
    pub fn move_layer_before(&mut self, id: StyleLayerId, before: Option<StyleLayerId>) {
        self.validate(id);
        if let Some(before) = before {
            self.validate(before);
            if before == id {
                return;
            }
        }
        let pos = self.order_position(id.idx);
        self.order.remove(pos);
        match before {
            Some(before) => {
                let pos = self.order_position(before.idx);
                self.order.insert(pos, id.idx);
            }
            None => self.order.push(id.idx),
        }
        self.dirty.mark(id.idx, dirty::TOPOLOGY);
    }

    /// Live slot indices in draw order, bottom to top.
    #[must_use]
    pub fn order(&self) -> &[u32] {
        &self.order
    }

    // -- Property API --

    /// Returns the layer's identifier.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[must_use]
    pub fn identifier(&self, id: StyleLayerId) -> &str {
        self.validate(id);
        &self.identifiers[id.idx as usize]
    }

    /// Returns the layer.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[must_use]
    pub fn layer(&self, id: StyleLayerId) -> &StyleLayer {
        self.validate(id);
        self.slot(id.idx)
    }

    /// Returns the layer as a line layer.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale or the layer is of another type.
    #[must_use]
    pub fn line_layer(&self, id: StyleLayerId) -> &LineLayer {
        match self.layer(id) {
            StyleLayer::Line(layer) => layer,
            other => self.wrong_type(id, other, "line"),
        }
    }

    /// Returns the layer as a background layer.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale or the layer is of another type.
    #[must_use]
    pub fn background_layer(&self, id: StyleLayerId) -> &BackgroundLayer {
        match self.layer(id) {
            StyleLayer::Background(layer) => layer,
            other => self.wrong_type(id, other, "background"),
        }
    }

    /// Edits a line layer's paint properties and schedules a re-cascade.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale or the layer is not a line layer.
    pub fn update_line_paint(
        &mut self,
        id: StyleLayerId,
        f: impl FnOnce(&mut LinePaintProperties),
    ) {
        f(self.line_layer_mut(id).paint_mut());
        self.dirty.mark(id.idx, dirty::PAINT);
    }

    /// Edits a line layer's layout properties. Its buckets become stale.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale or the layer is not a line layer.
    pub fn update_line_layout(
        &mut self,
        id: StyleLayerId,
        f: impl FnOnce(&mut LineLayoutProperties),
    ) {
        f(self.line_layer_mut(id).layout_mut());
        self.dirty.mark(id.idx, dirty::LAYOUT);
    }

    /// Replaces a line layer's filter. Its buckets become stale.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale or the layer is not a line layer.
    pub fn set_filter(&mut self, id: StyleLayerId, filter: Filter) {
        self.line_layer_mut(id).set_filter(filter);
        self.dirty.mark(id.idx, dirty::LAYOUT);
    }

    /// Edits a background layer's paint properties and schedules a
    /// re-cascade.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale or the layer is not a background layer.
    pub fn update_background_paint(
        &mut self,
        id: StyleLayerId,
        f: impl FnOnce(&mut BackgroundPaintProperties),
    ) {
        let _ = self.background_layer(id);
        if let Some(StyleLayer::Background(layer)) = self.layers[id.idx as usize].as_mut() {
            f(layer.paint_mut());
        }
        self.dirty.mark(id.idx, dirty::PAINT);
    }

    /// Shows or hides a layer.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn set_visibility(&mut self, id: StyleLayerId, visibility: Visibility) {
        self.validate(id);
        if self.visibility[id.idx as usize] != visibility {
            self.visibility[id.idx as usize] = visibility;
            self.dirty.mark(id.idx, dirty::VISIBILITY);
        }
    }

    /// Returns the layer's visibility.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[must_use]
    pub fn visibility(&self, id: StyleLayerId) -> Visibility {
        self.validate(id);
        self.visibility[id.idx as usize]
    }

    /// Returns the render pass from the last evaluation. Hidden layers
    /// report [`RenderPass::None`].
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[must_use]
    pub fn render_pass(&self, id: StyleLayerId) -> RenderPass {
        self.validate(id);
        self.render_pass[id.idx as usize]
    }

    // -- Style-wide API --

    /// Replaces the active style classes, highest priority first. Every
    /// layer is re-cascaded at the next evaluation.
    pub fn set_classes(&mut self, classes: Vec<StyleClass>) {
        self.classes = classes;
        for &idx in &self.order {
            self.dirty.mark(idx, dirty::PAINT);
        }
    }

    /// The active style classes.
    #[must_use]
    pub fn classes(&self) -> &[StyleClass] {
        &self.classes
    }

    /// Returns whether `class` is active.
    #[must_use]
    pub fn has_class(&self, class: &StyleClass) -> bool {
        self.classes.contains(class)
    }

    /// Sets the style-wide transition used by later cascades when a
    /// property declares none of its own.
    pub fn set_transition(&mut self, transition: TransitionOptions) {
        self.transition = transition;
    }

    /// The style-wide transition.
    #[must_use]
    pub fn transition(&self) -> TransitionOptions {
        self.transition
    }

    // -- Index-based accessors (for renderers iterating StyleChanges) --

    /// Returns the layer in slot `idx`, or `None` if the slot is free.
    #[must_use]
    pub fn layer_at(&self, idx: u32) -> Option<&StyleLayer> {
        self.layers.get(idx as usize).and_then(Option::as_ref)
    }

    /// Returns the identifier of slot `idx`. Empty for free slots.
    #[must_use]
    pub fn identifier_at(&self, idx: u32) -> &str {
        &self.identifiers[idx as usize]
    }

    /// Returns the render pass of slot `idx`.
    #[must_use]
    pub fn render_pass_at(&self, idx: u32) -> RenderPass {
        self.render_pass[idx as usize]
    }

    /// Returns the visibility of slot `idx`.
    #[must_use]
    pub fn visibility_at(&self, idx: u32) -> Visibility {
        self.visibility[idx as usize]
    }

    // -- Internal helpers --

    fn allocate(&mut self, identifier: &str, layer: StyleLayer) -> Result<StyleLayerId, StyleError> {
        if self.layer_id(identifier).is_some() {
            return Err(StyleError::DuplicateLayer(identifier.into()));
        }

        let idx = if let Some(idx) = self.free_list.pop() {
            // Reuse a freed slot; the generation was bumped on removal.
            self.identifiers[idx as usize] = identifier.into();
            self.layers[idx as usize] = Some(layer);
            self.visibility[idx as usize] = Visibility::Visible;
            self.render_pass[idx as usize] = RenderPass::None;
            idx
        } else {
            let idx = self.len;
            self.len += 1;
            self.identifiers.push(identifier.into());
            self.layers.push(Some(layer));
            self.visibility.push(Visibility::Visible);
            self.render_pass.push(RenderPass::None);
            self.generation.push(0);
            idx
        };

        self.pending_added.push(idx);
        self.dirty.mark(idx, dirty::PAINT);
        self.dirty.mark(idx, dirty::TOPOLOGY);

        Ok(StyleLayerId {
            idx,
            generation: self.generation[idx as usize],
        })
    }

    fn line_layer_mut(&mut self, id: StyleLayerId) -> &mut LineLayer {
        let _ = self.line_layer(id);
        match self.layers[id.idx as usize].as_mut() {
            Some(StyleLayer::Line(layer)) => layer,
            _ => unreachable!("slot {} changed type", id.idx),
        }
    }

    fn slot(&self, idx: u32) -> &StyleLayer {
        match &self.layers[idx as usize] {
            Some(layer) => layer,
            None => unreachable!("live slot {idx} holds no layer"),
        }
    }

    fn order_position(&self, idx: u32) -> usize {
        match self.order.iter().position(|&i| i == idx) {
            Some(pos) => pos,
            None => unreachable!("live slot {idx} missing from draw order"),
        }
    }

    fn wrong_type(&self, id: StyleLayerId, layer: &StyleLayer, expected: &str) -> ! {
        panic!(
            "layer \"{}\" ({id:?}) is a {} layer, not a {expected} layer",
            self.identifiers[id.idx as usize],
            layer.type_name()
        )
    }

    /// Panics if the handle is stale.
    pub(crate) fn validate(&self, id: StyleLayerId) {
        assert!(
            id.idx < self.len
                && self.generation[id.idx as usize] == id.generation
                && self.layers[id.idx as usize].is_some(),
            "stale StyleLayerId: {id:?} (current gen: {})",
            if id.idx < self.len {
                self.generation[id.idx as usize]
            } else {
                u32::MAX
            }
        );
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;
    use crate::style::PropertyValue;

    #[test]
    fn add_and_remove() {
        let mut store = StyleLayerStore::new();
        let id = store.add_layer("roads", LineLayer::new("road")).unwrap();
        assert!(store.is_alive(id));
        assert_eq!(store.identifier(id), "roads");
        assert_eq!(store.layer_id("roads"), Some(id));

        let layer = store.remove_layer(id);
        assert!(!store.is_alive(id));
        assert_eq!(layer.type_name(), "line");
        assert_eq!(store.layer_id("roads"), None);
        assert_eq!(store.layer_count(), 0);
    }

    #[test]
    fn generation_prevents_stale_access() {
        let mut store = StyleLayerStore::new();
        let id1 = store.add_layer("a", LineLayer::new("road")).unwrap();
        store.remove_layer(id1);
        let id2 = store.add_layer("a", LineLayer::new("road")).unwrap();
        assert!(!store.is_alive(id1));
        assert!(store.is_alive(id2));
        assert_eq!(id1.index(), id2.index());
        assert_ne!(id1.generation(), id2.generation());
    }

    #[test]
    #[should_panic(expected = "stale StyleLayerId")]
    fn stale_handle_panics() {
        let mut store = StyleLayerStore::new();
        let id = store.add_layer("a", LineLayer::new("road")).unwrap();
        store.remove_layer(id);
        let _ = store.identifier(id);
    }

    #[test]
    fn duplicate_identifier_is_rejected() {
        let mut store = StyleLayerStore::new();
        store.add_layer("a", LineLayer::new("road")).unwrap();
        let err = store.add_layer("a", BackgroundLayer::new()).unwrap_err();
        assert_eq!(err, StyleError::DuplicateLayer("a".into()));
        assert_eq!(
            alloc::format!("{err}"),
            "a layer with identifier \"a\" already exists"
        );
        assert_eq!(store.layer_count(), 1);
    }

    #[test]
    fn removed_layer_can_be_added_again() {
        let mut store = StyleLayerStore::new();
        let id = store.add_layer("a", LineLayer::new("road")).unwrap();
        let layer = store.remove_layer(id);
        let id = store.add_layer("b", layer).unwrap();
        assert_eq!(store.line_layer(id).source_layer(), "road");
    }

    #[test]
    #[should_panic(expected = "is a background layer, not a line layer")]
    fn wrong_type_accessor_panics() {
        let mut store = StyleLayerStore::new();
        let id = store.add_layer("bg", BackgroundLayer::new()).unwrap();
        store.update_line_paint(id, |paint| {
            paint.width.set_default(PropertyValue::Constant(2.0));
        });
    }

    #[test]
    fn draw_order() {
        let mut store = StyleLayerStore::new();
        let a = store.add_layer("a", BackgroundLayer::new()).unwrap();
        let b = store.add_layer("b", LineLayer::new("road")).unwrap();
        let c = store.add_layer_before("c", LineLayer::new("rail"), b).unwrap();
        assert_eq!(store.order(), &[a.idx, c.idx, b.idx]);

        store.move_layer_before(b, Some(a));
        assert_eq!(store.order(), &[b.idx, a.idx, c.idx]);

        store.move_layer_before(b, None);
        assert_eq!(store.order(), &[a.idx, c.idx, b.idx]);

        store.remove_layer(c);
        assert_eq!(store.order(), &[a.idx, b.idx]);
    }

    #[test]
    fn classes() {
        let mut store = StyleLayerStore::new();
        store.set_classes(vec![StyleClass::named("night")]);
        assert!(store.has_class(&StyleClass::named("night")));
        assert!(!store.has_class(&StyleClass::named("day")));
        assert_eq!(store.classes().len(), 1);
    }

    #[test]
    fn index_accessors() {
        let mut store = StyleLayerStore::new();
        let id = store.add_layer("a", LineLayer::new("road")).unwrap();
        assert_eq!(store.identifier_at(id.idx), "a");
        assert!(store.layer_at(id.idx).and_then(StyleLayer::as_line).is_some());
        assert!(store.layer_at(7).is_none());
        store.remove_layer(id);
        assert!(store.layer_at(id.idx).is_none());
    }
}
