// Copyright 2026 the Contour Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Enumerated style property types.

use super::function::FromFeatureValue;
use super::interpolate::discrete_interpolate;
use crate::feature::FeatureValue;

/// Defines a style enum together with its style-sheet keywords.
macro_rules! style_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $(
                $(#[$vmeta:meta])*
                $variant:ident = $keyword:literal
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
        pub enum $name {
            $(
                $(#[$vmeta])*
                $variant,
            )+
        }

        impl $name {
            /// Parses the style-sheet keyword for this value.
            #[must_use]
            pub fn from_keyword(keyword: &str) -> Option<Self> {
                match keyword {
                    $($keyword => Some(Self::$variant),)+
                    _ => None,
                }
            }

            /// Returns the style-sheet keyword for this value.
            #[must_use]
            pub const fn keyword(self) -> &'static str {
                match self {
                    $(Self::$variant => $keyword,)+
                }
            }
        }

        impl FromFeatureValue for $name {
            fn from_feature_value(value: &FeatureValue) -> Option<Self> {
                Self::from_keyword(value.as_str()?)
            }
        }

        discrete_interpolate!($name);
    };
}

style_enum! {
    /// The frame of reference for a translate property.
    pub enum TranslateAnchor {
        /// Translate relative to the map; rotates with it.
        #[default]
        Map = "map",
        /// Translate relative to the screen; stays put under rotation.
        Viewport = "viewport",
    }
}

style_enum! {
    /// How the ends of a line are drawn.
    pub enum LineCap {
        /// Square end exactly at the end point.
        #[default]
        Butt = "butt",
        /// Rounded end.
        Round = "round",
        /// Square end extended by half the line width.
        Square = "square",
    }
}

style_enum! {
    /// How line segments are joined.
    pub enum LineJoin {
        /// Cut-off corner.
        Bevel = "bevel",
        /// Rounded corner.
        Round = "round",
        /// Sharp corner, limited by the miter limit.
        #[default]
        Miter = "miter",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::interpolate::Interpolate;

    #[test]
    fn keywords_round_trip() {
        for cap in [LineCap::Butt, LineCap::Round, LineCap::Square] {
            assert_eq!(LineCap::from_keyword(cap.keyword()), Some(cap));
        }
        assert_eq!(LineJoin::from_keyword("bogus"), None);
        assert_eq!(
            TranslateAnchor::from_feature_value(&FeatureValue::from("viewport")),
            Some(TranslateAnchor::Viewport)
        );
    }

    #[test]
    fn enums_snap_when_interpolated() {
        let a = LineJoin::Bevel;
        let b = LineJoin::Round;
        assert_eq!(LineJoin::interpolate(&a, &b, 0.5), a);
        assert_eq!(LineJoin::interpolate(&a, &b, 1.0), b);
    }
}
