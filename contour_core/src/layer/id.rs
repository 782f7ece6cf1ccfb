// Copyright 2026 the Contour Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Style layer identity.

use core::fmt;

/// A handle to a layer in a [`StyleLayerStore`](super::StyleLayerStore).
///
/// Contains both a slot index and a generation counter so that stale handles
/// can be detected after a layer is removed and the slot is reused.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct StyleLayerId {
    /// Slot index into the store's arrays.
    pub(crate) idx: u32,
    /// Generation counter; must match the store's generation for this slot.
    pub(crate) generation: u32,
}

impl StyleLayerId {
    /// Returns the raw slot index (for diagnostics only).
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.idx
    }

    /// Returns the generation counter.
    #[inline]
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Debug for StyleLayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StyleLayerId({}@gen{})", self.idx, self.generation)
    }
}

/// Which render pass a layer draws in, if any.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum RenderPass {
    /// The layer draws nothing this frame.
    #[default]
    None,
    /// The layer draws fully opaque content, front to back.
    Opaque,
    /// The layer blends with what is below it, back to front.
    Translucent,
}

/// Whether a layer takes part in rendering at all.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Visibility {
    /// Drawn when its render pass allows.
    #[default]
    Visible,
    /// Never drawn.
    None,
}
