// Copyright 2026 the Contour Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dirty-tracking channel constants.
//!
//! Contour uses multi-channel dirty tracking (via [`understory_dirty`]) to
//! decide which style layers need work on the next evaluation pass. Each
//! channel represents an independent category of change.
//!
//! # Channels
//!
//! Style layers have no parent/child relationships, so every channel is
//! local-only: a mark affects exactly the layer that was marked.
//!
//! - [`PAINT`] is marked when a paint property, a paint transition, or the
//!   active style classes change. The layer is re-cascaded before it is
//!   evaluated.
//! - [`LAYOUT`] is marked when a layout property or the filter changes.
//!   Buckets built from the layer are stale and must be rebuilt.
//! - [`VISIBILITY`] is marked when a layer is shown or hidden.
//! - [`TOPOLOGY`] is marked when a layer is added, removed, or moved in the
//!   draw order.
//!
//! # Consumption
//!
//! Callers never query dirty state directly. Each
//! [`StyleLayerStore::evaluate`](crate::layer::StyleLayerStore::evaluate)
//! call drains all channels and surfaces the results as
//! [`StyleChanges`](crate::layer::StyleChanges).

use understory_dirty::Channel;

/// Paint property, paint transition, or style class changed. Requires a
/// re-cascade.
pub const PAINT: Channel = Channel::new(0);

/// Layout property or filter changed. Requires a bucket rebuild.
pub const LAYOUT: Channel = Channel::new(1);

/// Visibility changed.
pub const VISIBILITY: Channel = Channel::new(2);

/// Layer set or draw order changed.
pub const TOPOLOGY: Channel = Channel::new(3);
