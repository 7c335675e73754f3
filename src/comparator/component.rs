use std::{fmt, marker::PhantomData};

use crate::event::{ComponentKind, Event, KindedComponent};

use super::ComparatorResult;

/// A single filter unit inspecting one component kind of an event.
///
/// Evaluation is pure apart from declared side effects such as drawing from a
/// [`RandomSource`](crate::random::RandomSource).
pub trait ComparatorComponent: fmt::Debug {
    /// Kind this filter inspects.
    fn kind(&self) -> ComponentKind;

    fn evaluate(&self, event: &Event) -> ComparatorResult;
}

/// Runs `check` on the event's `C` component, or rejects when it is absent.
///
/// A filter cannot match evidence it cannot inspect; a component whose stored
/// type does not match `C` counts as absent.
pub fn with_component<C, F>(event: &Event, check: F) -> ComparatorResult
where
    C: KindedComponent,
    F: FnOnce(&C) -> ComparatorResult,
{
    event.get::<C>().map_or(ComparatorResult::Reject, check)
}

/// Filter over an arbitrary component type backed by a closure.
pub struct PredicateFilter<C, F> {
    name: &'static str,
    predicate: F,
    _component: PhantomData<fn(&C)>,
}

impl<C, F> PredicateFilter<C, F>
where
    C: KindedComponent,
    F: Fn(&C) -> ComparatorResult,
{
    pub fn new(name: &'static str, predicate: F) -> Self {
        Self {
            name,
            predicate,
            _component: PhantomData,
        }
    }
}

impl<C, F> fmt::Debug for PredicateFilter<C, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PredicateFilter")
            .field("name", &self.name)
            .finish()
    }
}

impl<C, F> ComparatorComponent for PredicateFilter<C, F>
where
    C: KindedComponent,
    F: Fn(&C) -> ComparatorResult,
{
    fn kind(&self) -> ComponentKind {
        C::KIND
    }

    fn evaluate(&self, event: &Event) -> ComparatorResult {
        with_component(event, |component: &C| (self.predicate)(component))
    }
}
