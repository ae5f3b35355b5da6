use glam::Vec2;
use mcbean_core::{
    Command, Event, GamePhase, MenuDirection, MenuOption, RoundResult, SeededRandom, TargetLaunch,
    Trajectory, INTRO_TICKS, ROUND_SIZE, WALK_TICKS,
};
use mcbean_world::{self as world, query, World};

fn new_world() -> World {
    World::new(Box::new(SeededRandom::from_seed(0x5eed)))
}

fn run(world: &mut World, commands: impl IntoIterator<Item = Command>) -> Vec<Event> {
    let mut events = Vec::new();
    for command in commands {
        world::apply(world, command, &mut events);
    }
    events
}

fn ticks(count: u32) -> impl Iterator<Item = Command> {
    (0..count).map(|_| Command::Tick)
}

fn enter_gameplay(world: &mut World) {
    let _ = run(world, ticks(INTRO_TICKS + 1 + WALK_TICKS + 1));
    assert_eq!(query::phase(world), GamePhase::Gameplay);
}

fn stacked_launch() -> TargetLaunch {
    TargetLaunch {
        trajectory: Trajectory::TopLeftToBottomRight,
        speed: 2.5,
    }
}

fn play_round_with_three_hits(world: &mut World) -> Vec<Event> {
    let launch = stacked_launch();
    let _ = run(
        world,
        [
            Command::SpawnTarget { launch },
            Command::SpawnTarget { launch },
            Command::SpawnTarget { launch },
        ],
    );
    let _ = run(world, ticks(5));
    let center = query::targets(world)[0].position();
    let miss = Vec2::new(5.0, 595.0);

    run(
        world,
        [
            Command::Fire { position: center },
            Command::Fire { position: center },
            Command::Fire { position: center },
            Command::Fire { position: miss },
            Command::Fire { position: miss },
            Command::Fire { position: miss },
        ],
    )
}

#[test]
fn phases_advance_on_strict_timer_thresholds() {
    let mut world = new_world();

    let _ = run(&mut world, ticks(INTRO_TICKS));
    assert_eq!(query::phase(&world), GamePhase::Intro);
    let _ = run(&mut world, ticks(1));
    assert_eq!(query::phase(&world), GamePhase::Walk);

    let _ = run(&mut world, ticks(WALK_TICKS));
    assert_eq!(query::phase(&world), GamePhase::Walk);
    let events = run(&mut world, ticks(1));
    assert_eq!(query::phase(&world), GamePhase::Gameplay);
    assert!(events.contains(&Event::PhaseChanged {
        from: GamePhase::Walk,
        to: GamePhase::Gameplay,
    }));
}

#[test]
fn six_shots_with_three_hits_end_the_game() {
    let mut world = new_world();
    enter_gameplay(&mut world);

    let events = play_round_with_three_hits(&mut world);

    let hits = events
        .iter()
        .filter(|event| matches!(event, Event::ShotFired { hit: Some(_), .. }))
        .count();
    assert_eq!(hits, 3);
    assert_eq!(query::score(&world), 3);
    assert_eq!(query::bullets(&world), 0);
    assert_eq!(query::round_results(&world), &[RoundResult::new(3, ROUND_SIZE)]);
    assert_eq!(query::phase(&world), GamePhase::GameOver);
    assert!(events.contains(&Event::RoundCompleted {
        round: 1,
        result: RoundResult::new(3, ROUND_SIZE),
    }));
}

#[test]
fn broken_discs_cannot_be_hit_twice() {
    let mut world = new_world();
    enter_gameplay(&mut world);
    let _ = run(
        &mut world,
        [Command::SpawnTarget {
            launch: stacked_launch(),
        }],
    );
    let center = query::targets(&world)[0].position();

    let events = run(
        &mut world,
        [
            Command::Fire { position: center },
            Command::Fire { position: center },
        ],
    );

    let hits: Vec<_> = events
        .iter()
        .filter_map(|event| match event {
            Event::ShotFired { hit, .. } => Some(*hit),
            _ => None,
        })
        .collect();
    assert_eq!(hits.len(), 2);
    assert!(hits[0].is_some());
    assert!(hits[1].is_none());
    assert_eq!(query::score(&world), 1);
    assert_eq!(query::bullets(&world), ROUND_SIZE - 2);
}

#[test]
fn further_rounds_refill_the_magazine() {
    let mut world = World::with_rounds(Box::new(SeededRandom::from_seed(7)), 2);
    enter_gameplay(&mut world);

    let events = play_round_with_three_hits(&mut world);

    assert!(events.contains(&Event::RoundStarted { round: 2 }));
    assert_eq!(query::phase(&world), GamePhase::Gameplay);
    assert_eq!(query::round(&world), 2);
    assert_eq!(query::bullets(&world), ROUND_SIZE);
    assert_eq!(query::round_hits(&world), 0);
    assert_eq!(query::live_target_count(&world), 0);
    assert_eq!(query::score(&world), 3);
}

#[test]
fn game_over_menu_confirms_restart_and_quit() {
    let mut world = new_world();
    enter_gameplay(&mut world);
    let _ = play_round_with_three_hits(&mut world);
    assert_eq!(query::menu_selection(&world), MenuOption::Restart);

    let events = run(&mut world, [Command::ConfirmSelection]);
    assert_eq!(events, vec![Event::RestartConfirmed]);

    let events = run(
        &mut world,
        [
            Command::MoveSelection {
                direction: MenuDirection::Down,
            },
            Command::MoveSelection {
                direction: MenuDirection::Down,
            },
            Command::ConfirmSelection,
        ],
    );
    assert_eq!(
        events,
        vec![
            Event::MenuSelectionChanged {
                option: MenuOption::Quit,
            },
            Event::QuitConfirmed,
        ]
    );

    let _ = run(
        &mut world,
        [Command::MoveSelection {
            direction: MenuDirection::Up,
        }],
    );
    assert_eq!(query::menu_selection(&world), MenuOption::Restart);
}

#[test]
fn discs_leaving_the_playfield_are_removed() {
    let mut world = new_world();
    enter_gameplay(&mut world);
    let _ = run(
        &mut world,
        [Command::SpawnTarget {
            launch: TargetLaunch {
                trajectory: Trajectory::BottomRightToTopLeft,
                speed: 3.0,
            },
        }],
    );

    let events = run(&mut world, ticks(400));

    assert_eq!(query::live_target_count(&world), 0);
    assert_eq!(
        events
            .iter()
            .filter(|event| matches!(event, Event::TargetRemoved { .. }))
            .count(),
        1
    );
}

#[test]
fn spawned_disc_advances_once_on_launch() {
    let mut world = new_world();
    enter_gameplay(&mut world);
    let launch = stacked_launch();
    let _ = run(&mut world, [Command::SpawnTarget { launch }]);

    let disc = &query::targets(&world)[0];
    let trajectory = launch.trajectory;
    let start_x = trajectory.start_x();
    let velocity = trajectory.velocity_for(launch.speed);
    assert!((disc.position().x - (start_x + velocity)).abs() < 1e-4);
    assert!((disc.velocity_x() - velocity).abs() < 1e-6);
}

#[test]
fn tick_start_count_includes_discs_culled_during_the_tick() {
    let mut world = new_world();
    enter_gameplay(&mut world);
    let _ = run(
        &mut world,
        [Command::SpawnTarget {
            launch: TargetLaunch {
                trajectory: Trajectory::BottomRightToTopLeft,
                speed: 3.0,
            },
        }],
    );

    for _ in 0..1_000 {
        let events = run(&mut world, ticks(1));
        if events
            .iter()
            .any(|event| matches!(event, Event::TargetRemoved { .. }))
        {
            assert_eq!(query::live_target_count(&world), 0);
            assert_eq!(query::tick_start_target_count(&world), 1);
            let _ = run(&mut world, ticks(1));
            assert_eq!(query::tick_start_target_count(&world), 0);
            return;
        }
    }
    panic!("disc never left the playfield");
}
