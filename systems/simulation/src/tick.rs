use contagion_core::{Command, Event, RandomDraws};
use contagion_system_infection::Infection;
use contagion_system_movement::Movement;
use contagion_world::{self as world, query, World};
use tracing::trace;

/// Composes the movement and infection phases into one grid transition.
///
/// Both phases read the same tick-start view. Their proposals are merged into
/// a clone of the world only after both have finished, so neither phase can
/// observe an infection made during the same tick.
#[derive(Clone, Debug, Default)]
pub struct TickDriver {
    movement: Movement,
    infection: Infection,
}

impl TickDriver {
    /// Creates a driver from explicitly configured phase systems.
    #[must_use]
    pub fn new(movement: Movement, infection: Infection) -> Self {
        Self {
            movement,
            infection,
        }
    }

    /// Produces the next world from `current`.
    ///
    /// Draws are consumed by the movement phase first, then the infection
    /// phase. Every merge outcome, including the closing
    /// [`Event::TickAdvanced`], is appended to `out_events`.
    pub fn apply_tick<D>(&self, current: &World, draws: &mut D, out_events: &mut Vec<Event>) -> World
    where
        D: RandomDraws + ?Sized,
    {
        let view = query::grid_view(current);
        let mut commands = Vec::new();
        self.movement.handle(&view, draws, &mut commands);
        let moved = commands.len();
        self.infection.handle(&view, draws, &mut commands);

        trace!(
            tick = query::tick_index(current) + 1,
            movement = moved,
            pressure = commands.len() - moved,
            "merging proposals"
        );

        let mut next = current.clone();
        for command in commands {
            world::apply(&mut next, command, out_events);
        }
        world::apply(&mut next, Command::Tick, out_events);
        next
    }
}

/// Advances `current` by one tick using the default phase parameters.
pub fn apply_tick<D>(current: &World, draws: &mut D) -> World
where
    D: RandomDraws + ?Sized,
{
    let mut events = Vec::new();
    TickDriver::default().apply_tick(current, draws, &mut events)
}
