//! # Events
//!
//! Producers describe an occurrence as an [`Event`]: a set of tagged
//! components, at most one per [`ComponentKind`].
//!
//! ```text
//! ┌──────────────────────── Event ────────────────────────┐
//! │ Global(Attack) │ Actor(0) │ Target(0, single) │ Damage(1) │
//! └───────────────────────────────────────────────────────┘
//! ```
//!
//! Consumers never see the concrete list; they look components up by type with
//! [`Event::get`], which yields `None` for a missing kind.
//!
//! ```rust
//! # use herald::event::{Event, EventType, GlobalComponent, DamageComponent, ActorComponent};
//! let event = Event::builder()
//!     .component(GlobalComponent::new(EventType::Attack))
//!     .component(DamageComponent::new(4))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(event.get::<DamageComponent>().map(|d| d.amount), Some(4));
//! assert!(event.get::<ActorComponent>().is_none());
//! ```

pub mod component;
pub mod event_type;
pub mod message;
pub mod presets;

pub use component::*;
pub use event_type::EventType;
pub use message::{make_event, Event, EventBuilder, EventError, EventResult};
