//! # Herald: typed in-process event bus
//!
//! Producers build an [`Event`] from tagged components and hand it to an
//! [`EventManager`]. Consumers register a [`Comparator`] (a declarative
//! filter) together with a handler; the manager runs the handler for every
//! event the comparator accepts.
//!
//! ## Building blocks
//!
//! - [`event`]: components, event types, and the immutable [`Event`]
//! - [`comparator`]: the three-valued [`ComparatorResult`] algebra, the filter
//!   units, and [`Comparator`] composition
//! - [`dispatcher`]: listener registration and the FIFO drain loop
//! - [`random`]: randomness capability injected into probabilistic filters
//! - [`config`]: [`DispatcherConfig`] and its JSON loader
//!
//! ## Dispatch Pipeline
//!
//! ```text
//! broadcast(E) → enqueue → [drain] peek → evaluate all comparators → invoke accepted handlers → pop
//! ```
//!
//! Handlers may broadcast again. Those events go to the back of the queue and
//! are delivered after everything queued before them, never nested.
//!
//! ## Example
//!
//! ```rust
//! use std::{cell::RefCell, rc::Rc};
//! use herald::{
//!     comparator::{ActorFilter, Comparator, GlobalFilter, NullFilter},
//!     dispatcher::EventManager,
//!     event::{presets, ActorComponent, Event, EventType},
//! };
//!
//! let manager = EventManager::new();
//! let seen = Rc::new(RefCell::new(Vec::new()));
//!
//! let attack_made = Comparator::new()
//!     .with(GlobalFilter::new(EventType::Attack))
//!     .with(ActorFilter::actor(Some(true), 0))
//!     .with(NullFilter)
//!     .with(NullFilter);
//!
//! let log = seen.clone();
//! manager.add_listener(attack_made, move |event: &Event| {
//!     if let Some(actor) = event.get::<ActorComponent>() {
//!         log.borrow_mut().push(actor.actor_id);
//!     }
//!     Ok(())
//! });
//!
//! manager.broadcast(presets::attack(0, 0, 1)?)?;
//! manager.broadcast(presets::attack(1, 0, 1)?)?;
//! assert_eq!(*seen.borrow(), vec![0]);
//! # Ok::<(), herald::Error>(())
//! ```

pub mod comparator;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod event;
pub mod random;

// Re-exports
pub use comparator::{Comparator, ComparatorComponent, ComparatorResult};
pub use config::{DispatcherConfig, FailurePolicy};
pub use dispatcher::{DispatchError, Emitter, EventManager, HandlerError, HandlerResult, ListenerId};
pub use error::*;
pub use event::{make_event, ComponentKind, Event, EventComponent, EventType, KindedComponent};
pub use random::RandomSource;

#[cfg(test)]
mod tests {
    use tracing_subscriber::{EnvFilter, FmtSubscriber};

    #[ctor::ctor]
    fn init_tests() {
        // 全テスト共通で tracing_subscriber を一度だけ初期化
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .finish();
        tracing::subscriber::set_global_default(subscriber)
            .expect("Failed to set tracing subscriber");
    }
}
