//! # Dispatcher
//!
//! The [`EventManager`] owns the listener registry and the pending-event queue.
//! A listener is a [`Comparator`](crate::comparator::Comparator) paired with a
//! handler; the handler runs for every broadcast event the comparator accepts.
//!
//! ```rust
//! # use std::{cell::Cell, rc::Rc};
//! # use herald::comparator::{Comparator, GlobalFilter};
//! # use herald::dispatcher::EventManager;
//! # use herald::event::{presets, Event, EventType};
//! let manager = EventManager::new();
//! let hits = Rc::new(Cell::new(0));
//!
//! let counter = hits.clone();
//! manager.add_listener(
//!     Comparator::new().with(GlobalFilter::new(EventType::Attack)),
//!     move |_event: &Event| {
//!         counter.set(counter.get() + 1);
//!         Ok(())
//!     },
//! );
//!
//! manager.broadcast(presets::attack(0, 1, 3).unwrap()).unwrap();
//! manager.broadcast(presets::signal(EventType::TurnEnd).unwrap()).unwrap();
//! assert_eq!(hits.get(), 1);
//! ```

pub mod listener;
pub mod manager;

pub use listener::{Handler, HandlerError, HandlerResult, ListenerId, DEFAULT_PRIORITY};
pub use manager::{
    debug_event, DispatchError, DispatchResult, DispatchStats, Emitter, EventManager,
};
