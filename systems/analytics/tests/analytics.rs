use contagion_core::{CellCoord, Command, InfectionCause};
use contagion_system_analytics::{Analytics, OutbreakSummary, TickReport};
use contagion_world::{self as world, query, World};

fn apply_all(world: &mut World, commands: &[Command], analytics: &mut Analytics) {
    let mut events = Vec::new();
    for command in commands {
        world::apply(world, *command, &mut events);
    }
    analytics.handle(&events);
}

#[test]
fn reports_split_infections_by_cause_per_tick() {
    let mut world = World::new(4, 4).expect("grid fits");
    let mut analytics = Analytics::new();

    apply_all(
        &mut world,
        &[
            Command::SeedCell {
                cell: CellCoord::new(0, 0),
            },
            Command::SeedCell {
                cell: CellCoord::new(9, 9),
            },
        ],
        &mut analytics,
    );
    analytics.flush();

    apply_all(
        &mut world,
        &[
            Command::InfectCell {
                cell: CellCoord::new(0, 1),
                cause: InfectionCause::Movement,
            },
            Command::InfectCell {
                cell: CellCoord::new(0, 1),
                cause: InfectionCause::Pressure,
            },
            Command::InfectCell {
                cell: CellCoord::new(3, 3),
                cause: InfectionCause::Pressure,
            },
            Command::Tick,
        ],
        &mut analytics,
    );

    assert_eq!(
        analytics.reports(),
        &[
            TickReport {
                tick: 0,
                seeded: 1,
                rejected: 1,
                ..TickReport::default()
            },
            TickReport {
                tick: 1,
                moved: 1,
                pressured: 1,
                duplicates: 1,
                ..TickReport::default()
            },
        ]
    );
    assert_eq!(analytics.last_report().map(TickReport::newly_infected), Some(2));

    let summary = OutbreakSummary::from_view(&query::grid_view(&world));
    assert_eq!(summary.infected, query::infected_count(&world));
    assert_eq!(summary.total, 16);
    assert_eq!(summary.infected + summary.susceptible, summary.total);
}

#[test]
fn quiet_ticks_still_produce_reports() {
    let mut world = World::new(2, 2).expect("grid fits");
    let mut analytics = Analytics::new();

    for _ in 0..3 {
        apply_all(&mut world, &[Command::Tick], &mut analytics);
    }

    let ticks: Vec<u64> = analytics.reports().iter().map(|report| report.tick).collect();
    assert_eq!(ticks, vec![1, 2, 3]);
    assert!(analytics
        .reports()
        .iter()
        .all(|report| report.newly_infected() == 0));
}
