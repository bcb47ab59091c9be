//! Battle simulation benchmarks for arena_core.
//!
//! Run with: `cargo bench -p arena_core`

// Benchmark binaries don't need docs on macro-generated functions
#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use arena_core::essence::EssenceConfig;
use arena_core::prelude::*;

/// A running battle with a handful of units already on the field.
fn populated_battle() -> Battle {
    let config = MatchConfig {
        essence: EssenceConfig {
            initial: 10,
            max: 100,
            ..EssenceConfig::default()
        },
        ..MatchConfig::default()
    };
    let mut battle = Battle::new(config);
    battle
        .start(&StructurePlacement::standard(&config.bounds))
        .expect("standard placement is valid");

    let roster = TemplateRoster::base();
    let mut left = ScriptedDriver::new(
        Side::Friendly,
        vec!["knight".into(), "archer".into(), "wizard".into()],
        10,
    );
    let mut right = ScriptedDriver::new(
        Side::Opponent,
        vec!["archer".into(), "giant".into()],
        10,
    );
    for _ in 0..100 {
        left.act(&mut battle, &roster).expect("scripted deploy");
        right.act(&mut battle, &roster).expect("scripted deploy");
        battle.tick();
    }
    battle
}

pub fn battle_benchmark(c: &mut Criterion) {
    c.bench_function("tick_populated_battle", |b| {
        let battle = populated_battle();
        b.iter(|| {
            let mut battle = battle.clone();
            black_box(battle.tick())
        })
    });

    c.bench_function("state_hash", |b| {
        let battle = populated_battle();
        b.iter(|| black_box(battle.state_hash()))
    });

    c.bench_function("snapshot", |b| {
        let battle = populated_battle();
        b.iter(|| black_box(battle.snapshot()))
    });
}

criterion_group!(benches, battle_benchmark);
criterion_main!(benches);
