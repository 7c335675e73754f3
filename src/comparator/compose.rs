use tracing::trace;

use crate::event::Event;

use super::{ComparatorComponent, ComparatorResult};

/// Ordered composition of filter units.
///
/// Every component is evaluated on every call, in insertion order, even after
/// an intermediate `Reject`. Probabilistic components therefore consume their
/// randomness the same way regardless of what the other components decide.
#[derive(Debug, Default)]
pub struct Comparator {
    components: Vec<Box<dyn ComparatorComponent>>,
}

impl Comparator {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn from_components(components: Vec<Box<dyn ComparatorComponent>>) -> Self {
        Self { components }
    }

    pub fn with<C: ComparatorComponent + 'static>(mut self, component: C) -> Self {
        self.components.push(Box::new(component));
        self
    }

    pub fn push(&mut self, component: Box<dyn ComparatorComponent>) {
        self.components.push(component);
    }

    pub fn evaluate(&self, event: &Event) -> ComparatorResult {
        let result = ComparatorResult::combine_all(self.components.iter().map(|component| {
            let verdict = component.evaluate(event);
            trace!("{} filter -> {}", component.kind(), verdict);
            verdict
        }));
        trace!("Comparator verdict: {}", result);
        result
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}
