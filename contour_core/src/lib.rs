// Copyright 2026 the Contour Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Style property evaluation, style layers, and hit-test geometry for
//! vector map tiles.
//!
//! `contour_core` provides the renderer-independent half of a vector map
//! style: declared property values, their per-frame evaluation, the layer
//! store, and the geometry used for feature queries. It is `no_std`
//! compatible (with `alloc`).
//!
//! # Architecture
//!
//! ```text
//!   StyleValue / PropertyFunction (declared per style class)
//!       │
//!       ▼
//!   Cascading::cascade() ──► Transitioning ──► Evaluator ──► LinePaint
//!                                                               │
//!                 ┌─────────────────────────────────────────────┘
//!                 ▼
//!   StyleLayerStore::evaluate() ──► StyleChanges ──► renderer
//! ```
//!
//! **[`style`]**: Property values, zoom curves, feature functions,
//! transitions, cross-fades, and filters.
//!
//! **[`layer`]**: Struct-of-arrays style layer store with generational
//! handles. Line and background layers are supported.
//!
//! **[`dirty`]**: Multi-channel dirty tracking via `understory_dirty`.
//! Property mutations automatically mark the appropriate channel.
//!
//! **[`feature`]**: Tile feature traits and in-memory implementations.
//!
//! **[`geometry`]**: Line offsetting, query translation, and buffered
//! intersection tests.
//!
//! **[`index`]**: R-tree feature index answering rendered-feature queries.
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) trait and event types for
//! render-loop instrumentation, with zero-overhead [`Tracer`](trace::Tracer)
//! wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).
//! - `trace-rich` (disabled by default, implies `trace`): Gates per-layer
//!   render pass change events.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod dirty;
pub mod feature;
pub mod geometry;
pub mod index;
pub mod layer;
pub mod style;
pub mod trace;
