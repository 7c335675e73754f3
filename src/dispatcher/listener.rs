use std::{cell::Cell, fmt, rc::Rc};

use thiserror::Error;
use tracing::trace;

use crate::{
    comparator::Comparator,
    event::{Event, EventError},
};

use super::DispatchError;

/// Priority given to listeners registered without one.
pub const DEFAULT_PRIORITY: i32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "listener-{}", self.0)
    }
}

pub type HandlerResult = Result<(), HandlerError>;

/// Procedure invoked with every event its comparator accepts.
pub type Handler = Rc<dyn Fn(&Event) -> HandlerResult>;

#[derive(Error, Debug)]
pub enum HandlerError {
    #[error("Handler failed: {0}")]
    Failed(String),

    #[error("Handler could not build event: {0}")]
    Event(#[from] EventError),

    #[error("Handler broadcast failed: {0}")]
    Dispatch(#[from] Box<DispatchError>),
}

impl HandlerError {
    pub fn failed<S: Into<String>>(message: S) -> Self {
        HandlerError::Failed(message.into())
    }
}

impl From<DispatchError> for HandlerError {
    fn from(error: DispatchError) -> Self {
        HandlerError::Dispatch(Box::new(error))
    }
}

/// Registered (comparator, handler) pair.
pub(crate) struct Listener {
    pub id: ListenerId,
    pub priority: i32,
    pub comparator: Comparator,
    pub handler: Handler,
}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listener")
            .field("id", &self.id)
            .field("priority", &self.priority)
            .field("comparator", &self.comparator)
            .finish()
    }
}

/// Listeners ordered by ascending priority, then registration order.
#[derive(Debug, Default)]
pub(crate) struct ListenerRegistry {
    listeners: Vec<Listener>,
    next_id: Cell<u64>,
}

impl ListenerRegistry {
    pub fn insert(&mut self, comparator: Comparator, priority: i32, handler: Handler) -> ListenerId {
        let id = self.reserve_id();
        self.insert_reserved(id, comparator, priority, handler);
        id
    }

    /// Hands out the next id without registering anything. Works through a
    /// shared borrow, so ids stay unique while comparators are running.
    pub fn reserve_id(&self) -> ListenerId {
        let id = ListenerId(self.next_id.get());
        self.next_id.set(self.next_id.get() + 1);
        id
    }

    pub fn insert_reserved(
        &mut self,
        id: ListenerId,
        comparator: Comparator,
        priority: i32,
        handler: Handler,
    ) {
        let listener = Listener {
            id,
            priority,
            comparator,
            handler,
        };
        // 同じ優先度なら登録順を保つ
        let position = self
            .listeners
            .iter()
            .position(|existing| existing.priority > priority)
            .unwrap_or(self.listeners.len());
        self.listeners.insert(position, listener);
    }

    pub fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|listener| listener.id != id);
        before != self.listeners.len()
    }

    /// Evaluates every comparator against `event` and returns the handlers of
    /// the accepting listeners, in dispatch order.
    pub fn accepting(&self, event: &Event) -> Vec<(ListenerId, Handler)> {
        self.listeners
            .iter()
            .filter_map(|listener| {
                let verdict = listener.comparator.evaluate(event);
                trace!("{} evaluated {}", listener.id, verdict);
                verdict
                    .is_accept()
                    .then(|| (listener.id, listener.handler.clone()))
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn contains(&self, id: ListenerId) -> bool {
        self.listeners.iter().any(|listener| listener.id == id)
    }

    #[cfg(test)]
    pub fn ids(&self) -> Vec<ListenerId> {
        self.listeners.iter().map(|listener| listener.id).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        comparator::{GlobalFilter, NullFilter},
        event::{presets, EventType},
    };
    use pretty_assertions::assert_eq;

    fn noop() -> Handler {
        Rc::new(|_event: &Event| Ok(()))
    }

    fn attack_comparator() -> Comparator {
        Comparator::new().with(GlobalFilter::new(EventType::Attack))
    }

    #[test]
    fn test_default_priority_keeps_registration_order() {
        let mut registry = ListenerRegistry::default();
        let a = registry.insert(attack_comparator(), DEFAULT_PRIORITY, noop());
        let b = registry.insert(attack_comparator(), DEFAULT_PRIORITY, noop());
        let c = registry.insert(attack_comparator(), DEFAULT_PRIORITY, noop());
        assert_eq!(registry.ids(), vec![a, b, c]);
    }

    #[test]
    fn test_priority_insertion_is_stable() {
        let mut registry = ListenerRegistry::default();
        let late = registry.insert(attack_comparator(), 200, noop());
        let normal = registry.insert(attack_comparator(), DEFAULT_PRIORITY, noop());
        let early = registry.insert(attack_comparator(), 10, noop());
        let normal_2 = registry.insert(attack_comparator(), DEFAULT_PRIORITY, noop());
        assert_eq!(registry.ids(), vec![early, normal, normal_2, late]);
    }

    #[test]
    fn test_remove() {
        let mut registry = ListenerRegistry::default();
        let a = registry.insert(attack_comparator(), DEFAULT_PRIORITY, noop());
        let b = registry.insert(attack_comparator(), DEFAULT_PRIORITY, noop());
        assert!(registry.remove(a));
        assert!(!registry.remove(a));
        assert!(!registry.contains(a));
        assert!(registry.contains(b));
        assert_eq!(registry.ids(), vec![b]);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_reserved_id_is_not_reused() {
        let mut registry = ListenerRegistry::default();
        let reserved = registry.reserve_id();
        let next = registry.insert(attack_comparator(), DEFAULT_PRIORITY, noop());
        assert_ne!(reserved, next);
        assert!(!registry.contains(reserved));

        registry.insert_reserved(reserved, attack_comparator(), DEFAULT_PRIORITY, noop());
        assert_eq!(registry.ids(), vec![next, reserved]);
    }

    #[test]
    fn test_accepting_filters_by_verdict() {
        let mut registry = ListenerRegistry::default();
        let accepted = registry.insert(attack_comparator(), DEFAULT_PRIORITY, noop());
        registry.insert(
            Comparator::new().with(GlobalFilter::new(EventType::TurnEnd)),
            DEFAULT_PRIORITY,
            noop(),
        );
        // Neutral のみでは発火しない
        registry.insert(Comparator::new().with(NullFilter), DEFAULT_PRIORITY, noop());

        let event = presets::attack(0, 0, 1).unwrap();
        let ids: Vec<ListenerId> = registry
            .accepting(&event)
            .into_iter()
            .map(|(id, _)| id)
            .collect();
        assert_eq!(ids, vec![accepted]);
    }

    #[test]
    fn test_handler_error_from_dispatch_error() {
        let error: HandlerError = DispatchError::QueueFull { capacity: 4 }.into();
        assert!(matches!(error, HandlerError::Dispatch(_)));
        assert_eq!(
            error.to_string(),
            "Handler broadcast failed: Event queue is full (capacity 4)"
        );
    }
}
