//! # Event
//!
//! An [`Event`] is an immutable, ordered bag of components with at most one
//! component per [`ComponentKind`]. Components are stored behind `Arc`, so
//! cloning an event is cheap and handlers can keep one past their call.

use std::{collections::HashMap, sync::Arc};

use thiserror::Error;
use tracing::{debug, trace, warn};

use super::{ComponentKind, EventComponent, EventType, GlobalComponent, KindedComponent};

/// Describes one occurrence.
///
/// Built through [`make_event`] or [`Event::builder`]. Both reject a second
/// component of an already present kind.
#[derive(Debug, Clone, Default)]
pub struct Event {
    components: Vec<Arc<dyn EventComponent>>,
    index: HashMap<ComponentKind, usize>,
}

impl Event {
    pub fn builder() -> EventBuilder {
        EventBuilder::new()
    }

    /// Typed lookup. Returns `None` when the kind is missing.
    ///
    /// A component stored under `T::KIND` that is not actually a `T` is
    /// treated as absent as well.
    pub fn get<T: KindedComponent>(&self) -> Option<&T> {
        let component = self.component(T::KIND)?;
        let typed = component.as_any().downcast_ref::<T>();
        if typed.is_none() {
            warn!(
                "Component of kind {} is not a {}",
                T::KIND,
                std::any::type_name::<T>()
            );
        }
        typed
    }

    /// Untyped lookup by kind.
    pub fn component(&self, kind: ComponentKind) -> Option<&dyn EventComponent> {
        self.index
            .get(&kind)
            .map(|position| self.components[*position].as_ref())
    }

    pub fn contains(&self, kind: ComponentKind) -> bool {
        self.index.contains_key(&kind)
    }

    /// Kinds in construction order.
    pub fn kinds(&self) -> impl Iterator<Item = ComponentKind> + '_ {
        self.components.iter().map(|component| component.kind())
    }

    pub fn components(&self) -> impl Iterator<Item = &dyn EventComponent> {
        self.components.iter().map(|component| component.as_ref())
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Shortcut for the Global component's event type.
    pub fn event_type(&self) -> Option<&EventType> {
        self.get::<GlobalComponent>()
            .map(|global| &global.event_type)
    }
}

/// Builds an event from already boxed components.
pub fn make_event<I>(components: I) -> EventResult<Event>
where
    I: IntoIterator<Item = Arc<dyn EventComponent>>,
{
    let mut builder = EventBuilder::new();
    for component in components {
        builder = builder.shared(component);
    }
    builder.build()
}

#[derive(Default, Debug)]
pub struct EventBuilder {
    components: Vec<Arc<dyn EventComponent>>,
}

impl EventBuilder {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn component<C: EventComponent>(self, component: C) -> Self {
        self.shared(Arc::new(component))
    }

    pub fn shared(mut self, component: Arc<dyn EventComponent>) -> Self {
        self.components.push(component);
        self
    }

    pub fn build(self) -> EventResult<Event> {
        let mut index = HashMap::with_capacity(self.components.len());
        for (position, component) in self.components.iter().enumerate() {
            let kind = component.kind();
            if index.insert(kind, position).is_some() {
                debug!("Rejected event with duplicate {} component", kind);
                return Err(EventError::DuplicateComponent { kind });
            }
        }
        trace!("Built event with {} components", self.components.len());
        Ok(Event {
            components: self.components,
            index,
        })
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EventError {
    #[error("Event already has a {kind} component")]
    DuplicateComponent { kind: ComponentKind },
}

pub type EventResult<T> = Result<T, EventError>;
