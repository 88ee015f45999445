//! End-to-end scenarios driven through the public [`Coordinator`] API.

#![allow(
    clippy::unwrap_used,
    clippy::float_cmp,
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects
)]

mod common;

use borders_core::host::WorldSink;
use borders_core::{
    BordersConfig, Command, CommandOutcome, Coordinator, DiscoveryOutcome, MIN_BORDER_SIZE,
    StateStore,
};
use borders_types::{Dimension, Notification, Position};
use common::TestWorld;

fn config_with(yaml: &str) -> BordersConfig {
    BordersConfig::parse(yaml).unwrap()
}

/// Join the first player at `spawn`, start the game, and take the initial
/// inventory scan.
fn running_game(config: &BordersConfig, spawn: Position) -> (Coordinator, TestWorld) {
    let mut world = TestWorld::new();
    let mut coordinator = Coordinator::new(config);
    let player = world.spawn("alex", spawn);
    coordinator.on_player_join(&mut world, player, spawn);
    coordinator.on_command(&mut world, Command::Start).unwrap();
    coordinator.on_tick(&mut world);
    (coordinator, world)
}

#[test]
fn first_join_centers_on_spawn_cell() {
    let mut world = TestWorld::new();
    let mut coordinator = Coordinator::new(&BordersConfig::default());
    let spawn = Position::new(100.0, 64.0, 200.0);
    let player = world.spawn("alex", spawn);

    coordinator.on_player_join(&mut world, player, spawn);

    let state = coordinator.state();
    assert!(state.border_initialized);
    assert_eq!(state.border_center_x, 104.0);
    assert_eq!(state.border_center_z, 200.0);
    assert_eq!(state.border_size, 16.0);
    assert_eq!(world.position(player), Position::new(104.0, 64.0, 200.0));
    for dimension in Dimension::ALL {
        assert_eq!(world.border(dimension), Some((16.0, 104.0, 200.0)));
    }
}

#[test]
fn death_at_minimum_size_stays_at_minimum() {
    let (mut coordinator, mut world) =
        running_game(&BordersConfig::default(), Position::new(0.0, 64.0, 0.0));
    let player = world.order[0];

    let outcome = coordinator.on_player_death(&mut world, player).unwrap();

    assert!(outcome.clamped);
    assert_eq!(coordinator.state().border_size, 16.0);
    assert_eq!(
        world.notifications.last(),
        Some(&Notification::DeathShrink {
            player,
            new_size: 16.0
        })
    );
}

#[test]
fn backlog_absorbs_first_discoveries() {
    let config = config_with("game:\n  ignored_discoveries: 2\n  discovery_growth_per_side: 3\n");
    let (mut coordinator, mut world) = running_game(&config, Position::new(0.0, 64.0, 0.0));
    let player = world.order[0];

    world.give(player, "apple", 1);
    world.give(player, "bread", 1);
    world.give(player, "carrot", 1);
    let summary = coordinator.on_tick(&mut world);

    let outcomes: Vec<DiscoveryOutcome> = summary.discoveries.iter().map(|d| d.outcome).collect();
    assert_eq!(
        outcomes,
        vec![
            DiscoveryOutcome::Suppressed { remaining: 1 },
            DiscoveryOutcome::Suppressed { remaining: 0 },
            DiscoveryOutcome::Recorded { grew_to: Some(22.0) },
        ]
    );
    assert_eq!(world.score(player), 1);
    assert_eq!(coordinator.state().obtained_items.len(), 3);
}

#[test]
fn failsafe_fires_once_per_stall() {
    let config = config_with("game:\n  failsafe_delay_ticks: 100\n");
    let (mut coordinator, mut world) = running_game(&config, Position::new(0.0, 64.0, 0.0));

    // Start rebased at tick 0, the initial scan was tick 1.
    for _ in 2..100 {
        assert!(coordinator.on_tick(&mut world).failsafe.is_none());
    }
    let at_delay = coordinator.on_tick(&mut world);
    assert_eq!(at_delay.tick, 100);
    assert!(at_delay.failsafe.is_some());
    assert_eq!(coordinator.state().last_discovery_tick, 100);

    let next = coordinator.on_tick(&mut world);
    assert!(next.failsafe.is_none());
    assert_eq!(coordinator.state().border_size, 18.0);
}

#[test]
fn reset_returns_world_to_start() {
    let (mut coordinator, mut world) =
        running_game(&BordersConfig::default(), Position::new(100.0, 64.0, 200.0));
    let player = world.order[0];
    world.give(player, "dirt", 1);
    coordinator.on_tick(&mut world);
    coordinator
        .on_command(&mut world, Command::Grow { per_side: 20 })
        .unwrap();
    world.teleport(player, Position::new(120.0, 70.0, 230.0));

    let outcome = coordinator.on_command(&mut world, Command::Reset).unwrap();

    assert_eq!(outcome, CommandOutcome::Reset);
    let state = coordinator.state();
    assert!(state.obtained_items.is_empty());
    assert_eq!(state.border_size, MIN_BORDER_SIZE);
    assert!(!state.game_active);
    assert_eq!(state.global_tick, 0);
    assert_eq!(state.border_center_x, 104.0);
    assert_eq!(state.border_center_z, 200.0);
    assert_eq!(world.score(player), 0);
    assert!(world.players[&player].inventory.is_empty());
    assert_eq!(world.position(player), Position::new(100.5, 64.0, 200.5));
}

#[test]
fn late_joiner_outside_border_is_returned_to_spawn() {
    let (mut coordinator, mut world) =
        running_game(&BordersConfig::default(), Position::new(3.0, 64.0, 3.0));
    let far = Position::new(-400.0, 80.0, 12.0);
    let late = world.spawn("sam", far);

    coordinator.on_player_join(&mut world, late, far);

    assert_eq!(world.position(late), Position::new(3.5, 64.0, 3.5));
    assert_eq!(coordinator.state().border_size, 16.0);
}

#[test]
fn unloaded_dimension_does_not_block_others() {
    let mut world = TestWorld::new();
    world.loaded = vec![Dimension::Overworld, Dimension::End];
    let mut coordinator = Coordinator::new(&BordersConfig::default());
    let spawn = Position::new(0.0, 64.0, 0.0);
    let player = world.spawn("alex", spawn);

    coordinator.on_player_join(&mut world, player, spawn);
    coordinator
        .on_command(&mut world, Command::Grow { per_side: 4 })
        .unwrap();

    assert_eq!(world.border(Dimension::Nether), None);
    assert_eq!(world.border(Dimension::Overworld), Some((24.0, 8.0, 8.0)));
    assert_eq!(world.border(Dimension::End), Some((24.0, 8.0, 8.0)));
}

#[test]
fn invariants_hold_across_mixed_events() {
    let config = config_with("game:\n  failsafe_delay_ticks: 7\n  death_shrink_per_side: 9\n");
    let (mut coordinator, mut world) = running_game(&config, Position::new(0.0, 64.0, 0.0));
    let player = world.order[0];
    let items = ["a", "b", "c", "d", "e", "f", "g", "h"];

    for step in 0_usize..200 {
        if step % 11 == 0 {
            world.give(player, items[(step / 11) % items.len()], 1);
        }
        if step % 13 == 0 {
            coordinator.on_player_death(&mut world, player);
        }
        if step == 150 {
            coordinator
                .on_command(&mut world, Command::SetTimer { seconds: 0 })
                .unwrap();
        }
        coordinator.on_tick(&mut world);

        let state: &StateStore = coordinator.state();
        assert!(state.border_size >= MIN_BORDER_SIZE, "step {step}");
        assert!(state.last_discovery_tick <= state.global_tick, "step {step}");
        for dimension in Dimension::ALL {
            assert_eq!(
                world.border(dimension),
                Some((
                    state.border_size,
                    state.border_center_x,
                    state.border_center_z
                )),
                "step {step}"
            );
        }
    }
}
