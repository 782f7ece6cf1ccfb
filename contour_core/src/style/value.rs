// Copyright 2026 the Contour Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Declarative property values as a style sheet states them.
//!
//! Paint and layout properties come in two kinds. Ordinary properties hold a
//! [`PropertyValue`]: undefined, a constant, or a zoom curve. Data-driven
//! properties hold a [`StyleValue`], which may additionally be a per-feature
//! [`PropertyFunction`]. Keeping the kinds apart means a function can never
//! be assigned to a property that cannot be evaluated per feature.
//!
//! Values are immutable once built. Evaluation reads them and produces new
//! values; it never writes back.

use super::curve::ZoomCurve;
use super::function::{FromFeatureValue, PropertyFunction};
use super::interpolate::Interpolate;

/// Everything a style property value type must support.
pub trait PropertyType: Interpolate + FromFeatureValue + Clone + PartialEq + Default {}

impl<T: Interpolate + FromFeatureValue + Clone + PartialEq + Default> PropertyType for T {}

/// The value of a property that cannot vary per feature.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum PropertyValue<T> {
    /// Not set; the property's default applies.
    #[default]
    Undefined,
    /// A fixed value.
    Constant(T),
    /// A value that varies with zoom.
    ZoomCurve(ZoomCurve<T>),
}

impl<T> PropertyValue<T> {
    /// Returns `true` if no value is set.
    #[must_use]
    pub const fn is_undefined(&self) -> bool {
        matches!(self, Self::Undefined)
    }

    /// Returns the constant, if this is one.
    #[must_use]
    pub const fn constant(&self) -> Option<&T> {
        match self {
            Self::Constant(v) => Some(v),
            _ => None,
        }
    }
}

/// The value of a data-driven property.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum StyleValue<T> {
    /// Not set; the property's default applies.
    #[default]
    Undefined,
    /// A fixed value.
    Constant(T),
    /// A value that varies with zoom.
    ZoomCurve(ZoomCurve<T>),
    /// A value computed from each feature.
    Function(PropertyFunction<T>),
}

impl<T> StyleValue<T> {
    /// Returns `true` if no value is set.
    #[must_use]
    pub const fn is_undefined(&self) -> bool {
        matches!(self, Self::Undefined)
    }

    /// Returns `true` if this value must be evaluated per feature.
    #[must_use]
    pub const fn is_data_driven(&self) -> bool {
        matches!(self, Self::Function(_))
    }
}

impl<T> From<PropertyValue<T>> for StyleValue<T> {
    fn from(value: PropertyValue<T>) -> Self {
        match value {
            PropertyValue::Undefined => Self::Undefined,
            PropertyValue::Constant(v) => Self::Constant(v),
            PropertyValue::ZoomCurve(c) => Self::ZoomCurve(c),
        }
    }
}

impl<T> From<PropertyFunction<T>> for StyleValue<T> {
    fn from(function: PropertyFunction<T>) -> Self {
        Self::Function(function)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::curve::Curve;
    use crate::style::function::FunctionStops;
    use alloc::vec;

    #[test]
    fn kinds() {
        let undefined: StyleValue<f32> = StyleValue::default();
        assert!(undefined.is_undefined());

        let function: StyleValue<f32> =
            PropertyFunction::new("width", FunctionStops::Identity).into();
        assert!(function.is_data_driven());

        let curve: StyleValue<f32> =
            PropertyValue::ZoomCurve(Curve::linear(vec![(0.0, 1.0)])).into();
        assert!(!curve.is_data_driven());
        assert!(!curve.is_undefined());

        assert_eq!(PropertyValue::Constant(2.0_f32).constant(), Some(&2.0));
    }
}
