// Copyright 2026 the Contour Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The style property model.
//!
//! Declared values ([`PropertyValue`], [`StyleValue`]) are cascaded through
//! style classes into [`Transitioning`] values, then evaluated each frame by
//! an [`Evaluator`] into concrete values, [`PossiblyEvaluated`] data-driven
//! values, or [`Faded`] cross-faded pairs.

pub mod color;
pub mod curve;
pub mod evaluate;
pub mod faded;
pub mod filter;
pub mod function;
pub mod interpolate;
pub mod transition;
pub mod types;
pub mod value;

pub use color::Color;
pub use curve::{Curve, ZoomCurve};
pub use evaluate::{
    DataDrivenPropertyEvaluator, EvaluationParameters, Evaluator, PossiblyEvaluated,
    PropertyEvaluator,
};
pub use faded::{CrossFadedPropertyEvaluator, Faded, ZoomHistory};
pub use filter::Filter;
pub use function::{FunctionStops, PropertyFunction};
pub use interpolate::{Interpolate, UnitBezier};
pub use transition::{
    CascadeParameters, Cascading, StyleClass, TransitionOptions, Transitioning,
};
pub use types::{LineCap, LineJoin, TranslateAnchor};
pub use value::{PropertyType, PropertyValue, StyleValue};
