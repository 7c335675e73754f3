//! Registers a couple of listeners and logs what they receive.
//!
//! RUST_LOG=debug cargo run --example attack_log

use std::rc::Rc;

use herald::{
    comparator::{ActorFilter, Comparator, DamageFilter, GlobalFilter, NullFilter},
    dispatcher::{EventManager, HandlerError},
    event::{presets, ActorComponent, DamageComponent, Event, EventType},
    random::ThreadRandom,
};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

const PLAYER: u64 = 0;

fn main() -> Result<(), herald::Error> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| herald::Error::internal(e.to_string()))?;

    let manager = EventManager::new();

    let attack_made = Comparator::new()
        .with(GlobalFilter::new(EventType::Attack))
        .with(ActorFilter::actor(Some(true), PLAYER))
        .with(NullFilter)
        .with(NullFilter);
    manager.add_listener(attack_made, |event: &Event| {
        let actor = event
            .get::<ActorComponent>()
            .ok_or_else(|| HandlerError::failed("attack without actor"))?;
        info!("Player {} attacked", actor.actor_id);
        Ok(())
    });

    // 大ダメージを受けたら半分の確率で反撃する
    let emitter = manager.emitter();
    let heavy_hit_taken = Comparator::new()
        .with(
            GlobalFilter::new(EventType::Attack)
                .with_response_chance(0.5, Rc::new(ThreadRandom))?,
        )
        .with(ActorFilter::actor(Some(false), PLAYER))
        .with(DamageFilter::at_least(5));
    manager.add_listener(heavy_hit_taken, move |event: &Event| {
        let damage = event.get::<DamageComponent>().map_or(0, |d| d.amount);
        info!("Took {} damage, striking back", damage);
        emitter.broadcast(presets::attack(PLAYER, 1, damage / 2)?)?;
        Ok(())
    });

    manager.broadcast(presets::signal(EventType::TurnStart)?)?;
    manager.broadcast(presets::attack(PLAYER, 1, 3)?)?;
    manager.broadcast(presets::attack(1, PLAYER, 8)?)?;
    manager.broadcast(presets::signal(EventType::TurnEnd)?)?;

    info!("Dispatch stats: {:?}", manager.stats());
    Ok(())
}
