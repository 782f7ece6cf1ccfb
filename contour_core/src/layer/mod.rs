// Copyright 2026 the Contour Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Style layer data model.
//!
//! A *style layer* describes how one kind of feature is drawn. Each layer
//! has:
//!
//! - An identity ([`StyleLayerId`]), a generational handle that becomes
//!   stale when the layer is removed, and a unique string identifier.
//! - **Declared properties** set by the caller through the store, e.g.
//!   [`update_line_paint`](StyleLayerStore::update_line_paint) and
//!   [`set_filter`](StyleLayerStore::set_filter).
//! - **Evaluated properties** produced by
//!   [`evaluate`](StyleLayerStore::evaluate): a paint snapshot for the
//!   current zoom and time, and the [`RenderPass`] the layer draws in.
//!
//! Layers are stored in struct-of-arrays layout with index-based handles.
//! Draw order is a separate list of slot indices.
//!
//! # Dirty tracking
//!
//! Property mutations automatically mark the corresponding dirty channel
//! (see [`dirty`](crate::dirty)):
//!
//! - **PAINT**: the layer is re-cascaded at the next evaluation.
//! - **LAYOUT**: buckets built from the layer must be rebuilt.
//! - **VISIBILITY** / **TOPOLOGY**: reported so renderers can update their
//!   draw lists.

mod background;
mod evaluate;
mod id;
mod line;
mod store;

pub use background::{BackgroundLayer, BackgroundPaint, BackgroundPaintProperties};
pub use evaluate::StyleChanges;
pub use id::{RenderPass, StyleLayerId, Visibility};
pub use line::{LineLayer, LineLayout, LineLayoutProperties, LinePaint, LinePaintProperties};
pub use store::{StyleError, StyleLayer, StyleLayerStore};
