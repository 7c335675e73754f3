//! # EventManager
//!
//! Queue-based broadcast dispatcher.
//!
//! ```text
//!            broadcast(E)
//!                 │
//!                 ▼
//!   ┌──────── enqueue at tail ────────┐
//!   │                                 │
//!   │ draining?  yes ──▶ return       │
//!   │    no                           │
//!   ▼                                 │
//! Idle ──▶ Draining: peek head        │
//!            │ evaluate all comparators
//!            │ invoke accepted handlers ──(may broadcast)──┘
//!            │ pop head
//!            └── repeat until empty ──▶ Idle
//! ```
//!
//! Events triggered from inside a handler land at the tail and are handled only
//! after everything already queued. The call stack stays flat however much
//! handlers fan out.
//!
//! All state is single-threaded. Multi-threaded producers must funnel their
//! events through one owner of the manager.

use std::{
    cell::{Cell, RefCell},
    collections::VecDeque,
    rc::{Rc, Weak},
    sync::Arc,
};

use thiserror::Error;
use tracing::{debug, trace, warn};

use crate::{
    comparator::Comparator,
    config::{DispatcherConfig, FailurePolicy},
    event::Event,
};

use super::listener::{
    Handler, HandlerError, HandlerResult, ListenerId, ListenerRegistry, DEFAULT_PRIORITY,
};

/// Counters since the manager was created.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchStats {
    pub broadcasts: u64,
    pub drained: u64,
    pub deliveries: u64,
    pub handler_failures: u64,
}

/// Registry change requested while comparators hold the registry.
enum Deferred {
    Insert {
        id: ListenerId,
        priority: i32,
        comparator: Comparator,
        handler: Handler,
    },
    Remove(ListenerId),
}

struct DispatcherState {
    config: DispatcherConfig,
    listeners: RefCell<ListenerRegistry>,
    deferred: RefCell<Vec<Deferred>>,
    queue: RefCell<VecDeque<Arc<Event>>>,
    draining: Cell<bool>,
    stats: Cell<DispatchStats>,
}

/// Owned dispatcher handle.
///
/// Cloning yields another handle to the same listeners and queue. Handlers that
/// broadcast should capture an [`Emitter`] instead of a clone, so the manager
/// does not keep itself alive through its own listeners.
#[derive(Clone)]
pub struct EventManager {
    state: Rc<DispatcherState>,
}

impl Default for EventManager {
    fn default() -> Self {
        Self::new()
    }
}

impl EventManager {
    pub fn new() -> Self {
        Self::with_config(DispatcherConfig::default())
    }

    pub fn with_config(config: DispatcherConfig) -> Self {
        debug!("Creating EventManager with {:?}", config);
        Self {
            state: Rc::new(DispatcherState {
                config,
                listeners: RefCell::new(ListenerRegistry::default()),
                deferred: RefCell::new(Vec::new()),
                queue: RefCell::new(VecDeque::new()),
                draining: Cell::new(false),
                stats: Cell::new(DispatchStats::default()),
            }),
        }
    }

    pub fn config(&self) -> &DispatcherConfig {
        &self.state.config
    }

    /// Registers `handler` to run for every event `comparator` accepts.
    ///
    /// Registering from inside a handler or a comparator is allowed; the new
    /// listener sees events starting with the next one dispatched.
    pub fn add_listener<F>(&self, comparator: Comparator, handler: F) -> ListenerId
    where
        F: Fn(&Event) -> HandlerResult + 'static,
    {
        self.add_listener_with_priority(comparator, DEFAULT_PRIORITY, handler)
    }

    /// Like [`add_listener`](Self::add_listener), but lower `priority` values
    /// are evaluated and invoked first.
    pub fn add_listener_with_priority<F>(
        &self,
        comparator: Comparator,
        priority: i32,
        handler: F,
    ) -> ListenerId
    where
        F: Fn(&Event) -> HandlerResult + 'static,
    {
        let handler: Handler = Rc::new(handler);
        let id = match self.state.listeners.try_borrow_mut() {
            Ok(mut listeners) => listeners.insert(comparator, priority, handler),
            Err(_) => {
                // 比較中はレジストリが借用されているので、後で反映する
                let id = self.state.listeners.borrow().reserve_id();
                self.state.deferred.borrow_mut().push(Deferred::Insert {
                    id,
                    priority,
                    comparator,
                    handler,
                });
                trace!("Deferred registration of {}", id);
                id
            }
        };
        debug!("Registered {} with priority {}", id, priority);
        id
    }

    /// Returns false if `id` was not registered.
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        let removed = match self.state.listeners.try_borrow_mut() {
            Ok(mut listeners) => listeners.remove(id),
            Err(_) => self.defer_removal(id),
        };
        if removed {
            debug!("Removed {}", id);
        }
        removed
    }

    /// Queues `event` and, unless a drain is already running, drains the queue.
    ///
    /// Called from outside a handler, this returns once the event and
    /// everything it transitively caused have been delivered. Called from
    /// inside a handler, it only enqueues.
    pub fn broadcast(&self, event: Event) -> DispatchResult<()> {
        self.broadcast_shared(Arc::new(event))
    }

    pub fn broadcast_shared(&self, event: Arc<Event>) -> DispatchResult<()> {
        self.enqueue(event)?;
        if self.state.draining.get() {
            trace!("Drain in progress, event deferred");
            return Ok(());
        }
        self.run_drain()
    }

    /// Resumes delivery of events left queued by an aborted drain.
    pub fn drain(&self) -> DispatchResult<()> {
        if self.state.draining.get() || self.state.queue.borrow().is_empty() {
            return Ok(());
        }
        self.run_drain()
    }

    /// Emitter for use inside handlers.
    pub fn emitter(&self) -> Emitter {
        Emitter {
            state: Rc::downgrade(&self.state),
        }
    }

    /// Queued events, including the one currently being dispatched.
    pub fn pending(&self) -> usize {
        self.state.queue.borrow().len()
    }

    pub fn listener_count(&self) -> usize {
        let listeners = self.state.listeners.borrow().len();
        let deferred = self.state.deferred.borrow();
        deferred.iter().fold(listeners, |count, change| match change {
            Deferred::Insert { .. } => count + 1,
            Deferred::Remove(_) => count - 1,
        })
    }

    pub fn is_draining(&self) -> bool {
        self.state.draining.get()
    }

    pub fn stats(&self) -> DispatchStats {
        self.state.stats.get()
    }

    fn defer_removal(&self, id: ListenerId) -> bool {
        let mut deferred = self.state.deferred.borrow_mut();
        let pending_insert = deferred
            .iter()
            .position(|change| matches!(change, Deferred::Insert { id: pending, .. } if *pending == id));
        if let Some(position) = pending_insert {
            deferred.remove(position);
            return true;
        }
        let already_removed = deferred
            .iter()
            .any(|change| matches!(change, Deferred::Remove(pending) if *pending == id));
        if already_removed || !self.state.listeners.borrow().contains(id) {
            return false;
        }
        trace!("Deferred removal of {}", id);
        deferred.push(Deferred::Remove(id));
        true
    }

    fn apply_deferred(&self) {
        let changes = std::mem::take(&mut *self.state.deferred.borrow_mut());
        if changes.is_empty() {
            return;
        }
        let mut listeners = self.state.listeners.borrow_mut();
        for change in changes {
            match change {
                Deferred::Insert {
                    id,
                    priority,
                    comparator,
                    handler,
                } => listeners.insert_reserved(id, comparator, priority, handler),
                Deferred::Remove(id) => {
                    listeners.remove(id);
                }
            }
        }
    }

    fn enqueue(&self, event: Arc<Event>) -> DispatchResult<()> {
        let mut queue = self.state.queue.borrow_mut();
        if let Some(capacity) = self.state.config.max_pending {
            if queue.len() >= capacity {
                warn!("Dropping broadcast, {} events already pending", queue.len());
                return Err(DispatchError::QueueFull { capacity });
            }
        }
        debug_event("Broadcasting", &event);
        queue.push_back(event);
        drop(queue);
        self.record(|stats| stats.broadcasts += 1);
        Ok(())
    }

    fn run_drain(&self) -> DispatchResult<()> {
        let _guard = DrainGuard::enter(&self.state.draining);
        trace!("Drain started");
        loop {
            let Some(event) = self.state.queue.borrow().front().cloned() else {
                break;
            };
            let result = self.dispatch(&event);
            self.state.queue.borrow_mut().pop_front();
            self.record(|stats| stats.drained += 1);
            result?;
        }
        trace!("Drain finished");
        Ok(())
    }

    /// Comparators first, handlers second, so a handler cannot change which
    /// other handlers fire for the same event.
    fn dispatch(&self, event: &Event) -> DispatchResult<()> {
        let responders = self.state.listeners.borrow().accepting(event);
        self.apply_deferred();
        trace!("{} listeners accepted event", responders.len());

        for (id, handler) in responders {
            self.record(|stats| stats.deliveries += 1);
            if let Err(source) = handler(event) {
                self.record(|stats| stats.handler_failures += 1);
                match self.state.config.failure_policy {
                    FailurePolicy::Propagate => {
                        return Err(DispatchError::Handler {
                            listener: id,
                            source,
                        });
                    }
                    FailurePolicy::Isolate => {
                        warn!("{} failed, continuing: {}", id, source);
                    }
                }
            }
        }
        Ok(())
    }

    fn record<F: FnOnce(&mut DispatchStats)>(&self, update: F) {
        let mut stats = self.state.stats.get();
        update(&mut stats);
        self.state.stats.set(stats);
    }
}

/// Weak broadcast handle. Does not keep the manager alive.
#[derive(Clone)]
pub struct Emitter {
    state: Weak<DispatcherState>,
}

impl Emitter {
    pub fn broadcast(&self, event: Event) -> DispatchResult<()> {
        let state = self.state.upgrade().ok_or(DispatchError::ManagerDropped)?;
        EventManager { state }.broadcast(event)
    }
}

/// Clears the draining flag however the drain loop exits.
struct DrainGuard<'a> {
    draining: &'a Cell<bool>,
}

impl<'a> DrainGuard<'a> {
    fn enter(draining: &'a Cell<bool>) -> Self {
        draining.set(true);
        Self { draining }
    }
}

impl Drop for DrainGuard<'_> {
    fn drop(&mut self) {
        self.draining.set(false);
    }
}

pub fn debug_event(prefix: &str, event: &Event) {
    match event.event_type() {
        Some(event_type) => debug!("{} {} event: {:?}", prefix, event_type, event),
        None => trace!("{} untyped event: {:?}", prefix, event),
    }
}

#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("{listener} failed: {source}")]
    Handler {
        listener: ListenerId,
        source: HandlerError,
    },

    #[error("Event queue is full (capacity {capacity})")]
    QueueFull { capacity: usize },

    #[error("EventManager was dropped")]
    ManagerDropped,
}

pub type DispatchResult<T> = Result<T, DispatchError>;
