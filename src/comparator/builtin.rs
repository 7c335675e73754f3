//! Built-in filters for the built-in component kinds.

use std::{collections::HashSet, fmt, rc::Rc};

use thiserror::Error;
use tracing::trace;

use crate::{
    event::{
        ActorComponent, ComponentKind, DamageComponent, EntityId, Event, EventType,
        GlobalComponent, KindedComponent, TargetComponent,
    },
    random::RandomSource,
};

use super::{with_component, ComparatorComponent, ComparatorResult};

/// Structural placeholder for an unused slot. Always `Neutral`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullFilter;

impl ComparatorComponent for NullFilter {
    fn kind(&self) -> ComponentKind {
        ComponentKind::Null
    }

    fn evaluate(&self, _event: &Event) -> ComparatorResult {
        ComparatorResult::Neutral
    }
}

/// Matches the event type, optionally gated by a response chance.
pub struct GlobalFilter {
    accepted: Option<HashSet<EventType>>,
    response_chance: Option<ResponseChance>,
}

struct ResponseChance {
    chance: f64,
    source: Rc<dyn RandomSource>,
}

impl GlobalFilter {
    pub fn new(event_type: EventType) -> Self {
        Self::any_of([event_type])
    }

    pub fn any_of<I>(event_types: I) -> Self
    where
        I: IntoIterator<Item = EventType>,
    {
        Self {
            accepted: Some(event_types.into_iter().collect()),
            response_chance: None,
        }
    }

    /// Does not constrain the event type.
    pub fn any() -> Self {
        Self {
            accepted: None,
            response_chance: None,
        }
    }

    /// Rejects whenever a sample drawn from `source` exceeds `chance`.
    ///
    /// The draw happens on every evaluation, whatever the type verdict.
    pub fn with_response_chance(
        mut self,
        chance: f64,
        source: Rc<dyn RandomSource>,
    ) -> Result<Self, ComparatorError> {
        if !(0.0..=1.0).contains(&chance) {
            return Err(ComparatorError::InvalidResponseChance { chance });
        }
        self.response_chance = Some(ResponseChance { chance, source });
        Ok(self)
    }

    fn type_verdict(&self, global: &GlobalComponent) -> ComparatorResult {
        match &self.accepted {
            Some(accepted) if !accepted.is_empty() => {
                ComparatorResult::from_match(accepted.contains(&global.event_type))
            }
            _ => ComparatorResult::Neutral,
        }
    }
}

impl fmt::Debug for GlobalFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GlobalFilter")
            .field("accepted", &self.accepted)
            .field(
                "response_chance",
                &self.response_chance.as_ref().map(|gate| gate.chance),
            )
            .finish()
    }
}

impl ComparatorComponent for GlobalFilter {
    fn kind(&self) -> ComponentKind {
        ComponentKind::Global
    }

    fn evaluate(&self, event: &Event) -> ComparatorResult {
        let verdict = with_component(event, |global: &GlobalComponent| self.type_verdict(global));

        let Some(gate) = &self.response_chance else {
            return verdict;
        };
        let sample = gate.source.sample();
        if sample > gate.chance {
            trace!(
                "Response chance {} missed with sample {}, was {}",
                gate.chance,
                sample,
                verdict
            );
            return ComparatorResult::Reject;
        }
        verdict
    }
}

/// Compares an entity id read from component `C` against a reference id.
///
/// `self_match = Some(true)` requires the ids to be equal, `Some(false)`
/// requires them to differ, `None` leaves the id unconstrained.
pub struct IdMatch<C> {
    self_match: Option<bool>,
    reference_id: EntityId,
    id_of: fn(&C) -> EntityId,
}

impl<C> IdMatch<C> {
    pub fn new(self_match: Option<bool>, reference_id: EntityId, id_of: fn(&C) -> EntityId) -> Self {
        Self {
            self_match,
            reference_id,
            id_of,
        }
    }

    fn check(&self, id: EntityId) -> ComparatorResult {
        match self.self_match {
            Some(must_match) => ComparatorResult::from_match((id == self.reference_id) == must_match),
            None => ComparatorResult::Neutral,
        }
    }
}

impl IdMatch<ActorComponent> {
    pub fn actor(self_match: Option<bool>, reference_id: EntityId) -> Self {
        Self::new(self_match, reference_id, |actor| actor.actor_id)
    }
}

impl IdMatch<TargetComponent> {
    pub fn target(self_match: Option<bool>, reference_id: EntityId) -> Self {
        Self::new(self_match, reference_id, |target| target.target_id)
    }
}

impl<C> fmt::Debug for IdMatch<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdMatch")
            .field("component", &std::any::type_name::<C>())
            .field("self_match", &self.self_match)
            .field("reference_id", &self.reference_id)
            .finish()
    }
}

impl<C: KindedComponent> ComparatorComponent for IdMatch<C> {
    fn kind(&self) -> ComponentKind {
        C::KIND
    }

    fn evaluate(&self, event: &Event) -> ComparatorResult {
        with_component(event, |component: &C| self.check((self.id_of)(component)))
    }
}

pub type ActorFilter = IdMatch<ActorComponent>;

/// Checks the Target's single-target flag. `None` is `Neutral`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SingleTargetMatch {
    pub single_target: Option<bool>,
}

impl SingleTargetMatch {
    pub fn new(single_target: Option<bool>) -> Self {
        Self { single_target }
    }

    fn check(&self, target: &TargetComponent) -> ComparatorResult {
        match self.single_target {
            Some(expected) => ComparatorResult::from_match(expected == target.single_target),
            None => ComparatorResult::Neutral,
        }
    }
}

impl ComparatorComponent for SingleTargetMatch {
    fn kind(&self) -> ComponentKind {
        ComponentKind::Target
    }

    fn evaluate(&self, event: &Event) -> ComparatorResult {
        with_component(event, |target: &TargetComponent| self.check(target))
    }
}

/// Target id match followed by the single-target flag check.
///
/// The flag is only consulted when the id check did not reject.
#[derive(Debug)]
pub struct TargetFilter {
    id: IdMatch<TargetComponent>,
    single: SingleTargetMatch,
}

impl TargetFilter {
    pub fn new(self_match: Option<bool>, reference_id: EntityId, single_target: Option<bool>) -> Self {
        Self {
            id: IdMatch::target(self_match, reference_id),
            single: SingleTargetMatch::new(single_target),
        }
    }
}

impl ComparatorComponent for TargetFilter {
    fn kind(&self) -> ComponentKind {
        ComponentKind::Target
    }

    fn evaluate(&self, event: &Event) -> ComparatorResult {
        with_component(event, |target: &TargetComponent| {
            let base = self.id.check(target.target_id);
            if base.is_reject() {
                return base;
            }
            base.combine(self.single.check(target))
        })
    }
}

/// Bounds on the Damage amount. Both bounds apply when both are set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DamageFilter {
    pub min: Option<i64>,
    pub max: Option<i64>,
}

impl DamageFilter {
    pub fn new(min: Option<i64>, max: Option<i64>) -> Self {
        Self { min, max }
    }

    pub fn at_least(min: i64) -> Self {
        Self::new(Some(min), None)
    }

    pub fn at_most(max: i64) -> Self {
        Self::new(None, Some(max))
    }

    pub fn between(min: i64, max: i64) -> Self {
        Self::new(Some(min), Some(max))
    }

    fn check(&self, amount: i64) -> ComparatorResult {
        if self.min.is_none() && self.max.is_none() {
            return ComparatorResult::Neutral;
        }
        let above = self.min.map_or(true, |min| amount >= min);
        let below = self.max.map_or(true, |max| amount <= max);
        ComparatorResult::from_match(above && below)
    }
}

impl ComparatorComponent for DamageFilter {
    fn kind(&self) -> ComponentKind {
        ComponentKind::Damage
    }

    fn evaluate(&self, event: &Event) -> ComparatorResult {
        with_component(event, |damage: &DamageComponent| self.check(damage.amount))
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ComparatorError {
    #[error("Response chance must be within [0, 1], got {chance}")]
    InvalidResponseChance { chance: f64 },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        event::presets,
        random::{FixedRandom, MockRandomSource},
    };
    use ComparatorResult::*;

    fn attack(actor: EntityId, target: EntityId, damage: i64) -> Event {
        presets::attack(actor, target, damage).unwrap()
    }

    #[test]
    fn test_null_filter_is_always_neutral() {
        assert_eq!(NullFilter.evaluate(&attack(0, 0, 1)), Neutral);
        assert_eq!(NullFilter.evaluate(&Event::default()), Neutral);
    }

    #[test]
    fn test_global_filter_type_match() {
        let event = attack(0, 0, 1);
        assert_eq!(GlobalFilter::new(EventType::Attack).evaluate(&event), Accept);
        assert_eq!(GlobalFilter::new(EventType::TurnEnd).evaluate(&event), Reject);
        assert_eq!(
            GlobalFilter::any_of([EventType::TurnEnd, EventType::Attack]).evaluate(&event),
            Accept
        );
        assert_eq!(GlobalFilter::any().evaluate(&event), Neutral);
        assert_eq!(GlobalFilter::any_of([]).evaluate(&event), Neutral);
    }

    #[test]
    fn test_global_filter_missing_component_rejects() {
        let event = Event::builder()
            .component(DamageComponent::new(1))
            .build()
            .unwrap();
        assert_eq!(GlobalFilter::any().evaluate(&event), Reject);
    }

    #[test]
    fn test_response_chance_forces_reject() {
        let filter = GlobalFilter::new(EventType::Attack)
            .with_response_chance(0.0, Rc::new(FixedRandom(0.5)))
            .unwrap();
        assert_eq!(filter.evaluate(&attack(0, 0, 1)), Reject);
    }

    #[test]
    fn test_response_chance_passes_verdict_through() {
        let filter = GlobalFilter::new(EventType::Attack)
            .with_response_chance(0.75, Rc::new(FixedRandom(0.5)))
            .unwrap();
        assert_eq!(filter.evaluate(&attack(0, 0, 1)), Accept);

        let neutral = GlobalFilter::any()
            .with_response_chance(0.75, Rc::new(FixedRandom(0.75)))
            .unwrap();
        assert_eq!(neutral.evaluate(&attack(0, 0, 1)), Neutral);
    }

    #[test]
    fn test_response_chance_draws_even_when_type_rejects() {
        let mut source = MockRandomSource::new();
        source.expect_sample().times(1).return_const(0.1);
        let filter = GlobalFilter::new(EventType::TurnStart)
            .with_response_chance(0.5, Rc::new(source))
            .unwrap();
        assert_eq!(filter.evaluate(&attack(0, 0, 1)), Reject);
    }

    #[test]
    fn test_response_chance_out_of_range() {
        let result = GlobalFilter::any().with_response_chance(1.5, Rc::new(FixedRandom(0.0)));
        assert_eq!(
            result.unwrap_err(),
            ComparatorError::InvalidResponseChance { chance: 1.5 }
        );
        assert!(GlobalFilter::any()
            .with_response_chance(f64::NAN, Rc::new(FixedRandom(0.0)))
            .is_err());
    }

    #[test]
    fn test_actor_filter() {
        let must_be_self = ActorFilter::actor(Some(true), 0);
        let must_be_other = ActorFilter::actor(Some(false), 0);
        let anyone = ActorFilter::actor(None, 0);

        assert_eq!(must_be_self.evaluate(&attack(0, 5, 1)), Accept);
        assert_eq!(must_be_self.evaluate(&attack(1, 5, 1)), Reject);
        assert_eq!(must_be_other.evaluate(&attack(0, 5, 1)), Reject);
        assert_eq!(must_be_other.evaluate(&attack(1, 5, 1)), Accept);
        assert_eq!(anyone.evaluate(&attack(9, 5, 1)), Neutral);
        assert_eq!(anyone.evaluate(&Event::default()), Reject);
    }

    #[test]
    fn test_target_filter() {
        let single = Event::builder()
            .component(TargetComponent::new(3, true))
            .build()
            .unwrap();
        let multi = Event::builder()
            .component(TargetComponent::new(3, false))
            .build()
            .unwrap();

        // id only
        assert_eq!(TargetFilter::new(Some(true), 3, None).evaluate(&single), Accept);
        assert_eq!(TargetFilter::new(Some(true), 4, None).evaluate(&single), Reject);
        // flag only
        assert_eq!(TargetFilter::new(None, 0, Some(true)).evaluate(&single), Accept);
        assert_eq!(TargetFilter::new(None, 0, Some(true)).evaluate(&multi), Reject);
        assert_eq!(TargetFilter::new(None, 0, None).evaluate(&multi), Neutral);
        // id reject wins over a matching flag
        assert_eq!(TargetFilter::new(Some(true), 4, Some(true)).evaluate(&single), Reject);
        // matching id, mismatching flag
        assert_eq!(TargetFilter::new(Some(true), 3, Some(false)).evaluate(&single), Reject);
    }

    #[test]
    fn test_target_filter_matches_composition() {
        let events = [
            Event::builder().component(TargetComponent::new(3, true)).build().unwrap(),
            Event::builder().component(TargetComponent::new(3, false)).build().unwrap(),
            Event::builder().component(TargetComponent::new(8, true)).build().unwrap(),
        ];
        for self_match in [None, Some(true), Some(false)] {
            for single in [None, Some(true), Some(false)] {
                let filter = TargetFilter::new(self_match, 3, single);
                let id = IdMatch::target(self_match, 3);
                let flag = SingleTargetMatch::new(single);
                for event in &events {
                    assert_eq!(
                        filter.evaluate(event),
                        id.evaluate(event).combine(flag.evaluate(event))
                    );
                }
            }
        }
    }

    #[test]
    fn test_damage_filter() {
        let min_two = DamageFilter::at_least(2);
        assert_eq!(min_two.evaluate(&attack(0, 0, 1)), Reject);
        assert_eq!(min_two.evaluate(&attack(0, 0, 5)), Accept);
        assert_eq!(min_two.evaluate(&presets::signal(EventType::Attack).unwrap()), Reject);

        let max_three = DamageFilter::at_most(3);
        assert_eq!(max_three.evaluate(&attack(0, 0, 3)), Accept);
        assert_eq!(max_three.evaluate(&attack(0, 0, 4)), Reject);

        let range = DamageFilter::between(2, 4);
        assert_eq!(range.evaluate(&attack(0, 0, 1)), Reject);
        assert_eq!(range.evaluate(&attack(0, 0, 3)), Accept);
        assert_eq!(range.evaluate(&attack(0, 0, 5)), Reject);

        assert_eq!(DamageFilter::default().evaluate(&attack(0, 0, 5)), Neutral);
    }
}
