//! # Comparators
//!
//! A [`Comparator`] decides whether a listener responds to an event. It is an
//! ordered list of [`ComparatorComponent`]s, each inspecting one component
//! kind, folded with [`ComparatorResult::combine`]:
//!
//! | a \ b   | Accept | Neutral | Reject |
//! |---------|--------|---------|--------|
//! | Accept  | Accept | Accept  | Reject |
//! | Neutral | Accept | Neutral | Reject |
//! | Reject  | Reject | Reject  | Reject |
//!
//! Only an overall `Accept` fires the handler. A comparator made solely of
//! neutral parts never fires.
//!
//! ```rust
//! # use herald::comparator::{ActorFilter, Comparator, ComparatorResult, GlobalFilter, NullFilter};
//! # use herald::event::{presets, EventType};
//! let attack_made = Comparator::new()
//!     .with(GlobalFilter::new(EventType::Attack))
//!     .with(ActorFilter::actor(Some(true), 0))
//!     .with(NullFilter);
//!
//! let mine = presets::attack(0, 3, 1).unwrap();
//! let theirs = presets::attack(1, 3, 1).unwrap();
//! assert_eq!(attack_made.evaluate(&mine), ComparatorResult::Accept);
//! assert_eq!(attack_made.evaluate(&theirs), ComparatorResult::Reject);
//! ```

pub mod builtin;
pub mod component;
pub mod compose;
pub mod result;

pub use builtin::{
    ActorFilter, ComparatorError, DamageFilter, GlobalFilter, IdMatch, NullFilter,
    SingleTargetMatch, TargetFilter,
};
pub use component::{with_component, ComparatorComponent, PredicateFilter};
pub use compose::Comparator;
pub use result::ComparatorResult;
