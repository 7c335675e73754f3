use std::{any::Any, fmt};

use super::EventType;

/// Entity identifier used by the Actor and Target components.
pub type EntityId = u64;

/// Tag naming the semantic role of a component inside an [`Event`](super::Event).
///
/// An event holds at most one component per kind. `Custom` keeps the set open:
/// downstream crates declare their own kinds without touching this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ComponentKind {
    Null,
    Global,
    Actor,
    Target,
    Damage,
    Custom(&'static str),
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComponentKind::Null => write!(f, "Null"),
            ComponentKind::Global => write!(f, "Global"),
            ComponentKind::Actor => write!(f, "Actor"),
            ComponentKind::Target => write!(f, "Target"),
            ComponentKind::Damage => write!(f, "Damage"),
            ComponentKind::Custom(name) => write!(f, "Custom({})", name),
        }
    }
}

/// A tagged data fragment of an event.
///
/// Implementors are plain immutable values. `as_any` backs the typed lookup in
/// [`Event::get`](super::Event::get).
pub trait EventComponent: fmt::Debug + Send + Sync + 'static {
    fn kind(&self) -> ComponentKind;

    fn as_any(&self) -> &dyn Any;
}

/// Component types with a statically known kind, retrievable by type.
pub trait KindedComponent: EventComponent + Sized {
    const KIND: ComponentKind;
}

/// Implements [`EventComponent`] and [`KindedComponent`] for a concrete type.
///
/// ```rust
/// # use herald::{impl_event_component, ComponentKind};
/// #[derive(Debug)]
/// struct Heal {
///     amount: i64,
/// }
/// impl_event_component!(Heal, ComponentKind::Custom("heal"));
/// ```
#[macro_export]
macro_rules! impl_event_component {
    ($ty:ty, $kind:expr) => {
        impl $crate::event::EventComponent for $ty {
            fn kind(&self) -> $crate::event::ComponentKind {
                <Self as $crate::event::KindedComponent>::KIND
            }

            fn as_any(&self) -> &dyn ::std::any::Any {
                self
            }
        }

        impl $crate::event::KindedComponent for $ty {
            const KIND: $crate::event::ComponentKind = $kind;
        }
    };
}

/// Placeholder component without data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NullComponent;

/// Carries the event type identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalComponent {
    pub event_type: EventType,
}

impl GlobalComponent {
    pub fn new(event_type: EventType) -> Self {
        Self { event_type }
    }
}

/// The entity performing the action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActorComponent {
    pub actor_id: EntityId,
}

impl ActorComponent {
    pub fn new(actor_id: EntityId) -> Self {
        Self { actor_id }
    }
}

/// The entity receiving the action, and whether it was the only one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetComponent {
    pub target_id: EntityId,
    pub single_target: bool,
}

impl TargetComponent {
    pub fn new(target_id: EntityId, single_target: bool) -> Self {
        Self {
            target_id,
            single_target,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DamageComponent {
    pub amount: i64,
}

impl DamageComponent {
    pub fn new(amount: i64) -> Self {
        Self { amount }
    }
}

impl_event_component!(NullComponent, ComponentKind::Null);
impl_event_component!(GlobalComponent, ComponentKind::Global);
impl_event_component!(ActorComponent, ComponentKind::Actor);
impl_event_component!(TargetComponent, ComponentKind::Target);
impl_event_component!(DamageComponent, ComponentKind::Damage);
