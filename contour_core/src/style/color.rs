// Copyright 2026 the Contour Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Premultiplied RGBA colors.

use super::interpolate::Interpolate;

/// A premultiplied RGBA color with components in `0.0..=1.0`.
///
/// The default color is fully transparent.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Color {
    /// Red, premultiplied by alpha.
    pub r: f32,
    /// Green, premultiplied by alpha.
    pub g: f32,
    /// Blue, premultiplied by alpha.
    pub b: f32,
    /// Alpha.
    pub a: f32,
}

impl Color {
    /// Opaque black.
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);
    /// Opaque white.
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);
    /// Fully transparent.
    pub const TRANSPARENT: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    /// Creates a color from already-premultiplied components.
    #[must_use]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Creates a color from straight 8-bit channels and an alpha, and
    /// premultiplies it.
    #[must_use]
    pub fn from_rgba8(r: u8, g: u8, b: u8, a: f32) -> Self {
        let a = a.clamp(0.0, 1.0);
        Self {
            r: f32::from(r) / 255.0 * a,
            g: f32::from(g) / 255.0 * a,
            b: f32::from(b) / 255.0 * a,
            a,
        }
    }

    /// Parses `#rgb` or `#rrggbb` hex notation into an opaque color.
    #[must_use]
    pub fn from_hex(s: &str) -> Option<Self> {
        let digits = s.strip_prefix('#')?;
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |i: usize, len: usize| -> Option<u8> {
            let v = u8::from_str_radix(digits.get(i * len..(i + 1) * len)?, 16).ok()?;
            Some(if len == 1 { v * 17 } else { v })
        };
        let len = match digits.len() {
            3 => 1,
            6 => 2,
            _ => return None,
        };
        Some(Self::from_rgba8(
            channel(0, len)?,
            channel(1, len)?,
            channel(2, len)?,
            1.0,
        ))
    }

    /// Returns the components as `[r, g, b, a]`.
    #[must_use]
    pub const fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl Interpolate for Color {
    fn interpolate(a: &Self, b: &Self, t: f64) -> Self {
        let [r, g, b, a] = <[f32; 4]>::interpolate(&a.to_array(), &b.to_array(), t);
        Self { r, g, b, a }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_parsing() {
        assert_eq!(Color::from_hex("#fff"), Some(Color::WHITE));
        assert_eq!(Color::from_hex("#000000"), Some(Color::BLACK));
        assert_eq!(Color::from_hex("#ff0000"), Some(Color::new(1.0, 0.0, 0.0, 1.0)));
        assert_eq!(Color::from_hex("fff"), None);
        assert_eq!(Color::from_hex("#ffff"), None);
        assert_eq!(Color::from_hex("#gg0000"), None);
    }

    #[test]
    fn hex_rejects_signs() {
        assert_eq!(Color::from_hex("#+f+f+f"), None);
        assert_eq!(Color::from_hex("#+ff"), None);
        assert_eq!(Color::from_hex("#-1-1-1"), None);
    }

    #[test]
    fn straight_alpha_is_premultiplied() {
        let c = Color::from_rgba8(255, 0, 0, 0.5);
        assert_eq!(c, Color::new(0.5, 0.0, 0.0, 0.5));
    }

    #[test]
    fn interpolates_per_component() {
        let mid = Color::interpolate(&Color::BLACK, &Color::WHITE, 0.5);
        assert_eq!(mid, Color::new(0.5, 0.5, 0.5, 1.0));
    }
}
