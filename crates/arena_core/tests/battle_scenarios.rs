//! End-to-end battle scenarios exercised through the public surface:
//! deploy, tick, snapshot. No private state is touched.

use arena_core::entity::Health;
use arena_core::essence::EssenceConfig;
use arena_core::prelude::*;
use proptest::prelude::*;

fn at(x: i32, y: i32) -> Vec2Fixed {
    Vec2Fixed::new(Fixed::from_num(x), Fixed::from_num(y))
}

/// A passive structure placement for hand-built scenarios.
fn passive(side: Side, x: i32, y: i32, health: u32, is_core: bool) -> StructurePlacement {
    StructurePlacement {
        side,
        position: at(x, y),
        health,
        is_core,
        lane: None,
        damage: 0,
        range: Fixed::ZERO,
        attack_cooldown: 0,
    }
}

fn started(config: MatchConfig, placements: &[StructurePlacement]) -> Battle {
    let mut battle = Battle::new(config);
    battle.start(placements).unwrap();
    battle
}

#[test]
fn test_successive_deploys_draw_on_regen() {
    // Two 4-cost deploys with a regen pulse between them
    let config = MatchConfig {
        essence: EssenceConfig {
            initial: 10,
            ..EssenceConfig::default()
        },
        ..MatchConfig::default()
    };
    let mut battle = started(config, &StructurePlacement::standard(&config.bounds));

    let roster = TemplateRoster::base();
    let wizard = roster.get("wizard").unwrap();
    assert_eq!(wizard.cost, 4);

    battle
        .deploy(wizard, Side::Friendly, at(200, 150), 1)
        .unwrap();
    assert_eq!(battle.pool(Side::Friendly).current(), 6);

    // One regen pulse lands while the first wizard marches
    for _ in 0..20 {
        battle.tick();
    }
    assert_eq!(battle.pool(Side::Friendly).current(), 7);

    // Second deploy draws on the regenerated pool: 10 - 4 + 1 - 4
    battle
        .deploy(wizard, Side::Friendly, at(200, 450), 1)
        .unwrap();
    assert_eq!(battle.pool(Side::Friendly).current(), 3);

    battle.tick();
    assert_eq!(battle.unit_count(Side::Friendly), 2);
}

#[test]
fn test_melee_exchange_deals_one_strike_per_cooldown() {
    let config = MatchConfig {
        essence: EssenceConfig {
            initial: 10,
            ..EssenceConfig::default()
        },
        ..MatchConfig::default()
    };
    // Passive structures so only the two units trade damage
    let placements = vec![
        passive(Side::Friendly, 60, 300, 2400, true),
        passive(Side::Opponent, 840, 300, 2400, true),
    ];
    let mut battle = started(config, &placements);

    let roster = TemplateRoster::base();
    let knight = roster.get("knight").unwrap();
    let friendly = battle
        .deploy(knight, Side::Friendly, at(440, 150), 1)
        .unwrap();
    let opposing = battle
        .deploy(knight, Side::Opponent, at(460, 150), 1)
        .unwrap();

    // Spawn tick: both in range (distance 20), both strike immediately
    let events = battle.tick();
    let hits: Vec<_> = events
        .damage_events
        .iter()
        .filter(|e| e.attacker == friendly || e.attacker == opposing)
        .collect();
    assert_eq!(hits.len(), 2);
    assert!(hits.iter().all(|e| e.damage == knight.damage));

    // Cooldown window: no further strikes while it counts down
    let mut strikes = 0;
    for _ in 0..knight.attack_cooldown {
        strikes += battle.tick().damage_events.len();
    }
    assert_eq!(strikes, 0);

    // The tick after the cooldown elapses, both strike again
    assert_eq!(battle.tick().damage_events.len(), 2);
    let unit = battle.unit(friendly).unwrap();
    assert_eq!(unit.health.current, unit.health.max - 2 * knight.damage);
}

#[test]
fn test_core_loss_ends_match_with_max_margin() {
    let placements = vec![
        passive(Side::Friendly, 60, 300, 2400, true),
        passive(Side::Friendly, 180, 150, 1400, false),
        // Fragile opponent core just across the river
        passive(Side::Opponent, 460, 150, 1, true),
        passive(Side::Opponent, 800, 450, 1400, false),
    ];
    let config = MatchConfig::default();
    let mut battle = started(config, &placements);

    let roster = TemplateRoster::base();
    let knight = roster.get("knight").unwrap();
    battle
        .deploy(knight, Side::Friendly, at(430, 150), 1)
        .unwrap();

    let mut core_fell = false;
    for _ in 0..60 {
        let events = battle.tick();
        if events.structures_destroyed.iter().any(|s| s.is_core) {
            core_fell = true;
            break;
        }
    }
    assert!(core_fell);
    assert_eq!(battle.state(), MatchState::Ended);

    let verdict = battle.verdict().unwrap();
    assert_eq!(verdict.winner, Some(Side::Friendly));
    // Winner is credited with every structure the loser had
    assert_eq!(verdict.tallies.friendly, 2);
    assert_eq!(verdict.tallies.opponent, 0);
}

#[test]
fn test_regulation_expiry_with_lead_ends_match() {
    let placements = vec![
        passive(Side::Friendly, 60, 300, 2400, true),
        // Fragile tower gives the friendly side a tally lead
        passive(Side::Opponent, 460, 150, 1, false),
        passive(Side::Opponent, 840, 300, 2400, true),
    ];
    let config = MatchConfig {
        duration_ticks: 60,
        overtime_ticks: 20,
        ..MatchConfig::default()
    };
    let mut battle = started(config, &placements);

    let roster = TemplateRoster::base();
    let knight = roster.get("knight").unwrap();
    battle
        .deploy(knight, Side::Friendly, at(430, 150), 1)
        .unwrap();

    while battle.state() != MatchState::Ended {
        battle.tick();
        assert!(battle.get_tick() <= 60, "match must end at regulation");
    }

    let verdict = battle.verdict().unwrap();
    assert_eq!(verdict.winner, Some(Side::Friendly));
    assert_eq!(verdict.tallies.friendly, 1);
}

#[test]
fn test_tied_regulation_enters_overtime_and_doubles_regen() {
    let config = MatchConfig {
        duration_ticks: 10,
        overtime_ticks: 10,
        essence: EssenceConfig {
            initial: 0,
            interval: 4,
            amount: 1,
            ..EssenceConfig::default()
        },
        ..MatchConfig::default()
    };
    let mut battle = started(config, &StructurePlacement::standard(&config.bounds));

    // Regulation: pulses at ticks 4 and 8
    for _ in 0..10 {
        battle.tick();
    }
    assert_eq!(battle.state(), MatchState::Overtime);
    assert_eq!(battle.pool(Side::Friendly).current(), 2);

    // First overtime pulse lands at tick 12 with doubled regen
    battle.tick();
    battle.tick();
    assert_eq!(battle.pool(Side::Friendly).current(), 4);
    assert_eq!(battle.pool(Side::Opponent).current(), 4);

    // Overtime expiry with tallies still level is a draw
    while battle.state() != MatchState::Ended {
        battle.tick();
        assert!(battle.get_tick() <= 20, "overtime must expire");
    }
    let verdict = battle.verdict().unwrap();
    assert_eq!(verdict.winner, None);
}

#[test]
fn test_simultaneous_kill_counts_one_death() {
    let config = MatchConfig {
        essence: EssenceConfig {
            initial: 10,
            ..EssenceConfig::default()
        },
        ..MatchConfig::default()
    };
    let placements = vec![
        passive(Side::Friendly, 60, 300, 2400, true),
        passive(Side::Opponent, 840, 300, 2400, true),
        // Fragile tower both knights reach on their spawn tick
        passive(Side::Opponent, 460, 150, 20, false),
    ];
    let mut battle = started(config, &placements);

    let roster = TemplateRoster::base();
    let knight = roster.get("knight").unwrap();
    battle
        .deploy(knight, Side::Friendly, at(445, 150), 1)
        .unwrap();
    battle
        .deploy(knight, Side::Friendly, at(450, 150), 1)
        .unwrap();

    let events = battle.tick();

    // Both strike independently; the kill is still recorded once and
    // the overkill strike deals nothing past the clamp
    assert_eq!(events.structures_destroyed.len(), 1);
    let total: u32 = events.damage_events.iter().map(|e| e.damage).sum();
    assert_eq!(total, 20);
    assert_eq!(battle.tallies().friendly, 1);
}

#[test]
fn test_ended_match_rejects_deploys() {
    let config = MatchConfig::default();
    let mut battle = started(config, &StructurePlacement::standard(&config.bounds));
    battle.end_match();

    let roster = TemplateRoster::base();
    let knight = roster.get("knight").unwrap();
    let result = battle.deploy(knight, Side::Friendly, at(200, 150), 1);
    assert!(matches!(
        result,
        Err(ArenaError::MatchNotActive(MatchState::Ended))
    ));
}

#[test]
fn test_scripted_match_is_deterministic() {
    let run = || {
        let config = MatchConfig {
            duration_ticks: 400,
            ..MatchConfig::default()
        };
        let mut battle = started(config, &StructurePlacement::standard(&config.bounds));
        let roster = TemplateRoster::base();
        let mut left = ScriptedDriver::new(
            Side::Friendly,
            vec!["knight".into(), "archer".into(), "giant".into()],
            20,
        );
        let mut right = ScriptedDriver::new(
            Side::Opponent,
            vec!["archer".into(), "wizard".into()],
            30,
        );

        while battle.state() != MatchState::Ended {
            left.act(&mut battle, &roster).unwrap();
            right.act(&mut battle, &roster).unwrap();
            battle.tick();
        }
        battle.state_hash()
    };

    assert_eq!(run(), run());
}

#[test]
fn test_snapshot_matches_after_restore() {
    let config = MatchConfig::default();
    let mut battle = started(config, &StructurePlacement::standard(&config.bounds));
    let roster = TemplateRoster::base();
    battle
        .deploy(roster.get("archer").unwrap(), Side::Friendly, at(200, 150), 1)
        .unwrap();
    for _ in 0..30 {
        battle.tick();
    }

    let bytes = battle.serialize().unwrap();
    let mut restored = Battle::deserialize(&bytes).unwrap();
    assert_eq!(battle.snapshot(), restored.snapshot());

    // Restored battles continue identically
    battle.tick();
    restored.tick();
    assert_eq!(battle.state_hash(), restored.state_hash());
}

proptest! {
    #[test]
    fn prop_health_clamps_at_zero(max in 1u32..2000, hits in prop::collection::vec(0u32..800, 0..32)) {
        let mut health = Health::new(max);
        for hit in hits {
            let dealt = health.apply_damage(hit);
            prop_assert!(dealt <= hit);
            prop_assert!(health.current <= max);
        }
    }

    #[test]
    fn prop_essence_spend_is_atomic(start in 0u32..20, cost in 0u32..30) {
        let mut pool = EssencePool::new(start, 20);
        let before = pool.current();
        if pool.spend(cost) {
            prop_assert_eq!(pool.current(), before - cost);
        } else {
            prop_assert_eq!(pool.current(), before);
            prop_assert!(cost > before);
        }
    }
}
