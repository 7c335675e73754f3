//! Ready-made events for the turn-based game layer.

use super::{
    ActorComponent, DamageComponent, EntityId, Event, EventResult, EventType, GlobalComponent,
    TargetComponent,
};

/// Global(Attack), Actor, single Target and Damage.
pub fn attack(actor_id: EntityId, target_id: EntityId, damage: i64) -> EventResult<Event> {
    Event::builder()
        .component(GlobalComponent::new(EventType::Attack))
        .component(ActorComponent::new(actor_id))
        .component(TargetComponent::new(target_id, true))
        .component(DamageComponent::new(damage))
        .build()
}

/// Global-only event, e.g. `TurnStart`.
pub fn signal(event_type: EventType) -> EventResult<Event> {
    Event::builder()
        .component(GlobalComponent::new(event_type))
        .build()
}
