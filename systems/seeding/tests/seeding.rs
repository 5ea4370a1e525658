use contagion_core::{CellCoord, CellState, Event, GridError};
use contagion_system_seeding::{Config, Seeding, DEFAULT_OUTBREAK};
use contagion_world::{self as world, query, World};

fn seed(world: &mut World, seeding: &Seeding) -> Vec<Event> {
    let mut commands = Vec::new();
    seeding.handle(&mut commands);

    let mut events = Vec::new();
    for command in commands {
        world::apply(world, command, &mut events);
    }
    events
}

#[test]
fn single_seed_infects_exactly_that_cell() {
    let mut world = World::new(46, 69).expect("grid fits");
    let seeding = Seeding::new(Config::new(vec![CellCoord::new(22, 41)]));

    let _ = seed(&mut world, &seeding);

    assert_eq!(
        query::cell_state(&world, CellCoord::new(22, 41)),
        Ok(CellState::Infected)
    );
    assert_eq!(query::infected_count(&world), 1);
    assert!(query::grid_view(&world)
        .iter()
        .filter(|(cell, _)| *cell != CellCoord::new(22, 41))
        .all(|(_, state)| state == CellState::Susceptible));
}

#[test]
fn default_cluster_seeds_every_cell_of_reference_grid() {
    let mut world = World::new(46, 69).expect("grid fits");

    let events = seed(&mut world, &Seeding::default());

    assert_eq!(events.len(), DEFAULT_OUTBREAK.len());
    assert_eq!(query::infected_count(&world), DEFAULT_OUTBREAK.len());
    for cell in DEFAULT_OUTBREAK {
        assert_eq!(query::cell_state(&world, cell), Ok(CellState::Infected));
    }
}

#[test]
fn out_of_bounds_seeds_are_skipped() {
    let mut world = World::new(4, 4).expect("grid fits");
    let seeding = Seeding::new(Config::new(vec![
        CellCoord::new(1, 1),
        CellCoord::new(4, 0),
        CellCoord::new(2, 9),
        CellCoord::new(3, 3),
    ]));

    let events = seed(&mut world, &seeding);

    let rejected = events
        .iter()
        .filter(|event| {
            matches!(
                event,
                Event::CommandRejected {
                    error: GridError::OutOfBounds { .. },
                    ..
                }
            )
        })
        .count();
    assert_eq!(rejected, 2);
    assert_eq!(query::infected_count(&world), 2);
}

#[test]
fn empty_outbreak_leaves_a_valid_grid() {
    let mut world = World::new(3, 3).expect("grid fits");

    let events = seed(&mut world, &Seeding::new(Config::new(Vec::new())));

    assert!(events.is_empty());
    assert_eq!(world, World::new(3, 3).expect("grid fits"));
}

#[test]
fn default_cluster_on_small_grid_keeps_only_cells_in_range() {
    let mut world = World::new(30, 45).expect("grid fits");

    let _ = seed(&mut world, &Seeding::default());

    let in_range = DEFAULT_OUTBREAK
        .iter()
        .filter(|cell| cell.row() < 30 && cell.column() < 45)
        .count();
    assert_eq!(query::infected_count(&world), in_range);
    assert!(query::grid_view(&world).infected().count() < DEFAULT_OUTBREAK.len());
}
