// Copyright 2026 the Contour Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Style classes, cascading, and transitions.
//!
//! A paint property may hold a different value per [`StyleClass`]. Cascading
//! picks the value of the first active class that sets one, falling back to
//! [`StyleClass::Default`]. Whenever the cascaded value is replaced, the old
//! value is kept as the *prior* of a [`Transitioning`] value and the two are
//! blended over the transition's duration, eased with
//! [`UnitBezier::EASE`].
//!
//! ```text
//!   Cascading::cascade(params)          Cascading::evaluate(evaluator, now)
//!   ─────────────────────────           ────────────────────────────────────
//!   pick class value ──► Transitioning { value, prior ──► Transitioning { .. } }
//!                                  │
//!                                  ▼
//!                    prior value ──ease(t)──► value
//! ```

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::time::Duration;

use super::evaluate::Evaluator;
use super::interpolate::{Interpolate, UnitBezier};

/// The default transition duration.
pub const DEFAULT_TRANSITION_DURATION: Duration = Duration::from_millis(300);

/// A named set of property overrides.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum StyleClass {
    /// The base values every layer falls back to.
    #[default]
    Default,
    /// A named class, e.g. `"night"`.
    Named(String),
}

impl StyleClass {
    /// Creates a named class.
    #[must_use]
    pub fn named(name: &str) -> Self {
        Self::Named(name.into())
    }
}

/// Transition timing. Unset fields inherit from an outer scope.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TransitionOptions {
    /// How long the transition lasts.
    pub duration: Option<Duration>,
    /// How long before it starts.
    pub delay: Option<Duration>,
}

impl TransitionOptions {
    /// No transition at all.
    pub const NONE: Self = Self::new(Duration::ZERO, Duration::ZERO);

    /// The style-wide default: [`DEFAULT_TRANSITION_DURATION`], no delay.
    pub const STYLE_DEFAULT: Self = Self::new(DEFAULT_TRANSITION_DURATION, Duration::ZERO);

    /// Options with both fields set.
    #[must_use]
    pub const fn new(duration: Duration, delay: Duration) -> Self {
        Self {
            duration: Some(duration),
            delay: Some(delay),
        }
    }

    /// Fills unset fields from `defaults`.
    #[must_use]
    pub const fn reverse_merge(self, defaults: Self) -> Self {
        Self {
            duration: match self.duration {
                Some(d) => Some(d),
                None => defaults.duration,
            },
            delay: match self.delay {
                Some(d) => Some(d),
                None => defaults.delay,
            },
        }
    }
}

/// The inputs to one cascade pass.
#[derive(Clone, Copy, Debug)]
pub struct CascadeParameters<'a> {
    /// Active classes, highest priority first. [`StyleClass::Default`] is
    /// always consulted last.
    pub classes: &'a [StyleClass],
    /// Current time.
    pub now: Duration,
    /// Style-wide transition options.
    pub transition: TransitionOptions,
}

impl<'a> CascadeParameters<'a> {
    /// Cascade parameters with the given classes and the default transition.
    #[must_use]
    pub const fn new(classes: &'a [StyleClass], now: Duration) -> Self {
        Self {
            classes,
            now,
            transition: TransitionOptions::STYLE_DEFAULT,
        }
    }

    /// Sets the style-wide transition options.
    #[must_use]
    pub const fn with_transition(mut self, transition: TransitionOptions) -> Self {
        self.transition = transition;
        self
    }

    fn lookup_order(&self) -> impl Iterator<Item = &'a StyleClass> + use<'a> {
        let classes: &'a [StyleClass] = self.classes;
        classes.iter().chain(core::iter::once(&DEFAULT_CLASS))
    }
}

static DEFAULT_CLASS: StyleClass = StyleClass::Default;

/// A value that may be blending in from a prior value.
#[derive(Clone, Debug, PartialEq)]
pub struct Transitioning<V> {
    value: V,
    prior: Option<Box<Self>>,
    begin: Duration,
    end: Duration,
}

impl<V> Transitioning<V> {
    /// A value with no prior; it is in effect immediately.
    #[must_use]
    pub const fn settled(value: V) -> Self {
        Self {
            value,
            prior: None,
            begin: Duration::ZERO,
            end: Duration::ZERO,
        }
    }

    /// Starts a transition from `prior` to `value` at `now`.
    ///
    /// Unset options mean no delay and an instant switch.
    #[must_use]
    pub fn new(value: V, prior: Self, options: TransitionOptions, now: Duration) -> Self {
        let begin = now + options.delay.unwrap_or_default();
        let end = begin + options.duration.unwrap_or_default();
        Self {
            value,
            prior: Some(Box::new(prior)),
            begin,
            end,
        }
    }

    /// The target value.
    #[must_use]
    pub const fn value(&self) -> &V {
        &self.value
    }

    /// Returns `true` while a prior value still contributes.
    #[must_use]
    pub const fn has_transition(&self) -> bool {
        self.prior.is_some()
    }

    /// Evaluates the blended value at `now`.
    ///
    /// Priors that have fully given way are dropped, so finished transitions
    /// cost nothing on later frames.
    pub fn evaluate<E: Evaluator<V>>(&mut self, evaluator: &E, now: Duration) -> E::Output {
        let final_value = evaluator.evaluate(&self.value);
        let Some(prior) = self.prior.as_mut() else {
            return final_value;
        };
        if now >= self.end {
            self.prior = None;
            return final_value;
        }
        if now < self.begin {
            return prior.evaluate(evaluator, now);
        }
        let t = (now - self.begin).as_secs_f64() / (self.end - self.begin).as_secs_f64();
        let prior_value = prior.evaluate(evaluator, now);
        E::Output::interpolate(&prior_value, &final_value, UnitBezier::EASE.solve(t, 0.001))
    }
}

/// A property's per-class values and its current cascaded state.
#[derive(Clone, Debug, PartialEq)]
pub struct Cascading<V> {
    values: Vec<(StyleClass, V)>,
    transitions: Vec<(StyleClass, TransitionOptions)>,
    cascaded: Option<Transitioning<V>>,
}

impl<V> Default for Cascading<V> {
    fn default() -> Self {
        Self {
            values: Vec::new(),
            transitions: Vec::new(),
            cascaded: None,
        }
    }
}

impl<V: Clone + Default> Cascading<V> {
    /// Returns the value set for `class`.
    #[must_use]
    pub fn get(&self, class: &StyleClass) -> Option<&V> {
        self.values.iter().find(|(c, _)| c == class).map(|(_, v)| v)
    }

    /// Sets the value for `class`. Takes effect at the next cascade.
    pub fn set(&mut self, class: StyleClass, value: V) {
        match self.values.iter_mut().find(|(c, _)| *c == class) {
            Some((_, v)) => *v = value,
            None => self.values.push((class, value)),
        }
    }

    /// Sets the value for the default class.
    pub fn set_default(&mut self, value: V) {
        self.set(StyleClass::Default, value);
    }

    /// Sets the transition options used when `class` is the one that
    /// decides the transition.
    pub fn set_transition(&mut self, class: StyleClass, options: TransitionOptions) {
        match self.transitions.iter_mut().find(|(c, _)| *c == class) {
            Some((_, o)) => *o = options,
            None => self.transitions.push((class, options)),
        }
    }

    /// Resolves the active value and starts a transition to it.
    ///
    /// The very first cascade settles immediately.
    pub fn cascade(&mut self, params: &CascadeParameters<'_>) {
        let value = params
            .lookup_order()
            .find_map(|class| self.get(class))
            .cloned()
            .unwrap_or_default();
        let transition = params
            .lookup_order()
            .find_map(|class| {
                self.transitions
                    .iter()
                    .find(|(c, _)| c == class)
                    .map(|(_, o)| *o)
            })
            .unwrap_or_default()
            .reverse_merge(params.transition);

        self.cascaded = Some(match self.cascaded.take() {
            Some(prior) => Transitioning::new(value, prior, transition, params.now),
            None => Transitioning::settled(value),
        });
    }

    /// Evaluates the cascaded value at `now`. Before the first cascade the
    /// undefined value is evaluated.
    pub fn evaluate<E: Evaluator<V>>(&mut self, evaluator: &E, now: Duration) -> E::Output {
        match &mut self.cascaded {
            Some(cascaded) => cascaded.evaluate(evaluator, now),
            None => evaluator.evaluate(&V::default()),
        }
    }

    /// Returns `true` while the cascaded value is mid-transition.
    #[must_use]
    pub fn has_transition(&self) -> bool {
        self.cascaded
            .as_ref()
            .is_some_and(Transitioning::has_transition)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::evaluate::{EvaluationParameters, PropertyEvaluator};
    use crate::style::value::PropertyValue;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn evaluate(prop: &mut Cascading<PropertyValue<f32>>, now: Duration) -> f32 {
        let params = EvaluationParameters::new(0.0).with_now(now);
        prop.evaluate(&PropertyEvaluator::new(&params, -1.0), now)
    }

    #[test]
    fn first_cascade_settles_immediately() {
        let mut prop = Cascading::default();
        prop.set_default(PropertyValue::Constant(1.0_f32));
        prop.cascade(&CascadeParameters::new(&[], ms(0)));
        assert!(!prop.has_transition());
        assert_eq!(evaluate(&mut prop, ms(0)), 1.0);
    }

    #[test]
    fn uncascaded_property_evaluates_to_default() {
        let mut prop: Cascading<PropertyValue<f32>> = Cascading::default();
        assert_eq!(evaluate(&mut prop, ms(0)), -1.0);
    }

    #[test]
    fn transition_blends_and_then_ends() {
        let mut prop = Cascading::default();
        prop.set_default(PropertyValue::Constant(0.0_f32));
        prop.cascade(&CascadeParameters::new(&[], ms(0)));

        prop.set_default(PropertyValue::Constant(10.0));
        prop.cascade(&CascadeParameters::new(&[], ms(1000)));
        assert!(prop.has_transition());

        let mid = evaluate(&mut prop, ms(1150));
        assert!(mid > 0.0 && mid < 10.0, "mid-transition value {mid}");
        assert!(prop.has_transition());

        assert_eq!(evaluate(&mut prop, ms(1300)), 10.0);
        assert!(!prop.has_transition());
    }

    #[test]
    fn delay_holds_the_prior_value() {
        let mut prop = Cascading::default();
        prop.set_default(PropertyValue::Constant(0.0_f32));
        prop.cascade(&CascadeParameters::new(&[], ms(0)));

        prop.set_default(PropertyValue::Constant(10.0));
        prop.set_transition(StyleClass::Default, TransitionOptions::new(ms(100), ms(50)));
        prop.cascade(&CascadeParameters::new(&[], ms(0)));

        assert_eq!(evaluate(&mut prop, ms(25)), 0.0);
        assert_eq!(evaluate(&mut prop, ms(150)), 10.0);
    }

    #[test]
    fn zero_duration_switches_at_once() {
        let mut prop = Cascading::default();
        prop.set_default(PropertyValue::Constant(0.0_f32));
        let params = CascadeParameters::new(&[], ms(0)).with_transition(TransitionOptions::NONE);
        prop.cascade(&params);
        prop.set_default(PropertyValue::Constant(5.0));
        prop.cascade(&params);
        assert_eq!(evaluate(&mut prop, ms(0)), 5.0);
        assert!(!prop.has_transition());
    }

    #[test]
    fn named_classes_override_default() {
        let night = StyleClass::named("night");
        let mut prop = Cascading::default();
        prop.set_default(PropertyValue::Constant(1.0_f32));
        prop.set(night.clone(), PropertyValue::Constant(2.0));

        let classes = [night];
        let params = CascadeParameters::new(&classes, ms(0));
        prop.cascade(&params);
        assert_eq!(evaluate(&mut prop, ms(0)), 2.0);

        let params = CascadeParameters::new(&[], ms(0)).with_transition(TransitionOptions::NONE);
        prop.cascade(&params);
        assert_eq!(evaluate(&mut prop, ms(0)), 1.0);
    }

    #[test]
    fn reverse_merge_fills_gaps() {
        let partial = TransitionOptions {
            duration: Some(ms(10)),
            delay: None,
        };
        let merged = partial.reverse_merge(TransitionOptions::new(ms(99), ms(5)));
        assert_eq!(merged, TransitionOptions::new(ms(10), ms(5)));
    }
}
