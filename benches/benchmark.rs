use criterion::{black_box, criterion_group, criterion_main, Criterion};
use herald::{
    comparator::{ActorFilter, Comparator, DamageFilter, GlobalFilter, NullFilter},
    dispatcher::EventManager,
    event::{presets, Event, EventType},
};

fn attack_comparator(actor: u64) -> Comparator {
    Comparator::new()
        .with(GlobalFilter::new(EventType::Attack))
        .with(ActorFilter::actor(Some(true), actor))
        .with(DamageFilter::at_least(1))
        .with(NullFilter)
}

fn bench_evaluate(c: &mut Criterion) {
    let comparator = attack_comparator(0);
    let event = presets::attack(0, 1, 5).unwrap();
    c.bench_function("comparator evaluate", |b| {
        b.iter(|| comparator.evaluate(black_box(&event)))
    });
}

fn bench_broadcast(c: &mut Criterion) {
    let manager = EventManager::new();
    for actor in 0..64 {
        manager.add_listener(attack_comparator(actor), |_event: &Event| Ok(()));
    }
    c.bench_function("broadcast to 64 listeners", |b| {
        b.iter(|| {
            let event = presets::attack(black_box(3), 1, 5).unwrap();
            manager.broadcast(event).unwrap();
        })
    });
}

fn bench_fan_out(c: &mut Criterion) {
    let manager = EventManager::new();
    let emitter = manager.emitter();
    manager.add_listener(
        Comparator::new().with(GlobalFilter::new(EventType::TurnStart)),
        move |_event: &Event| {
            for _ in 0..16 {
                emitter.broadcast(presets::signal(EventType::TurnEnd)?)?;
            }
            Ok(())
        },
    );
    c.bench_function("re-entrant fan out x16", |b| {
        b.iter(|| {
            manager
                .broadcast(presets::signal(EventType::TurnStart).unwrap())
                .unwrap();
        })
    });
}

// ベンチマークグループの定義
criterion_group!(benches, bench_evaluate, bench_broadcast, bench_fan_out);
criterion_main!(benches);
