#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Movement phase: infected populations dispersing into adjacent cells.

use contagion_core::{
    CellCoord, CellState, Command, Direction, GridError, GridView, InfectionCause, RandomDraws,
    MOVE_PROBABILITY,
};
use tracing::{debug, trace};

/// Pure system that reads the tick-start grid and proposes movement infections.
#[derive(Clone, Copy, Debug)]
pub struct Movement {
    probability: f64,
}

impl Default for Movement {
    fn default() -> Self {
        Self::new(MOVE_PROBABILITY)
    }
}

impl Movement {
    /// Creates the system with the per-direction move probability.
    #[must_use]
    pub const fn new(probability: f64) -> Self {
        Self { probability }
    }

    /// Probability that a single direction receives moving population.
    #[must_use]
    pub const fn probability(&self) -> f64 {
        self.probability
    }

    /// Emits an infect command for every successful move into a susceptible neighbour.
    ///
    /// Infected cells are visited in row-major order and each consumes exactly
    /// eight unit draws, one per [`Direction::ALL`] entry. Neighbours beyond
    /// the grid edge are skipped. The output may contain the same cell more
    /// than once when several infected cells move into it.
    pub fn handle<D>(&self, view: &GridView<'_>, draws: &mut D, out: &mut Vec<Command>)
    where
        D: RandomDraws + ?Sized,
    {
        let before = out.len();

        for origin in view.infected() {
            for direction in Direction::ALL {
                if draws.unit() >= self.probability {
                    continue;
                }

                match neighbour(view, origin, direction) {
                    Ok((_, CellState::Infected)) => {}
                    Ok((cell, CellState::Susceptible)) => out.push(Command::InfectCell {
                        cell,
                        cause: InfectionCause::Movement,
                    }),
                    Err(error) => debug!(
                        row = origin.row(),
                        column = origin.column(),
                        ?direction,
                        %error,
                        "unable to infect neighbour"
                    ),
                }
            }
        }

        trace!(proposed = out.len() - before, "movement phase complete");
    }
}

fn neighbour(
    view: &GridView<'_>,
    origin: CellCoord,
    direction: Direction,
) -> Result<(CellCoord, CellState), GridError> {
    let cell = view.resolve(origin, direction.offset())?;
    let state = view.state(cell)?;
    Ok((cell, state))
}
