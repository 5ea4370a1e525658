#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative grid state for the Contagion engine.
//!
//! The [`World`] owns the cell grid and a tick counter. It only changes
//! through [`apply`], which executes a single [`Command`] and reports the
//! outcome as [`Event`] values. Systems observe it through the [`query`]
//! module.

use contagion_core::{
    cell_count, CellCoord, CellRecord, CellState, Command, Event, GridError, GridView,
    InfectionCause,
};
use tracing::warn;

/// Dense row-major cell storage with fixed dimensions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    cells: Vec<CellState>,
    height: u32,
    width: u32,
}

impl Grid {
    /// Creates a grid of the provided dimensions with every cell susceptible.
    ///
    /// Fails with [`GridError::TooLarge`] when the grid would exceed
    /// [`contagion_core::MAX_CELLS`].
    pub fn new(height: u32, width: u32) -> Result<Self, GridError> {
        let len = cell_count(height, width)?;
        Ok(Self {
            cells: vec![CellState::Susceptible; len],
            height,
            width,
        })
    }

    /// Number of rows in the grid.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Number of columns in the grid.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Reads the state of `cell`.
    pub fn get(&self, cell: CellCoord) -> Result<CellState, GridError> {
        self.view().state(cell)
    }

    /// Overwrites the state of `cell`.
    pub fn set(&mut self, cell: CellCoord, state: CellState) -> Result<(), GridError> {
        let index = self.view().index(cell)?;
        self.cells[index] = state;
        Ok(())
    }

    /// Captures a read-only view over the grid.
    #[must_use]
    pub fn view(&self) -> GridView<'_> {
        GridView::new(&self.cells, self.height, self.width)
    }

    /// Flattens the grid into row-major records.
    #[must_use]
    pub fn to_flat_snapshot(&self) -> Vec<CellRecord> {
        self.view().records()
    }
}

/// Represents the authoritative epidemic state for one run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct World {
    grid: Grid,
    tick_index: u64,
}

impl World {
    /// Creates a world whose grid is entirely susceptible.
    pub fn new(height: u32, width: u32) -> Result<Self, GridError> {
        Ok(Self {
            grid: Grid::new(height, width)?,
            tick_index: 0,
        })
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Infection is idempotent: targeting an infected cell reports
/// [`Event::CellAlreadyInfected`]. Coordinates outside the grid are skipped
/// with a warning and reported as [`Event::CommandRejected`].
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    let (cell, cause) = match command {
        Command::SeedCell { cell } => (cell, InfectionCause::Seed),
        Command::InfectCell { cell, cause } => (cell, cause),
        Command::Tick => {
            world.tick_index = world.tick_index.saturating_add(1);
            out_events.push(Event::TickAdvanced {
                tick: world.tick_index,
            });
            return;
        }
    };

    match world.grid.get(cell) {
        Ok(CellState::Infected) => out_events.push(Event::CellAlreadyInfected { cell }),
        Ok(CellState::Susceptible) => match world.grid.set(cell, CellState::Infected) {
            Ok(()) => out_events.push(Event::CellInfected { cell, cause }),
            Err(error) => reject(cell, cause, error, out_events),
        },
        Err(error) => reject(cell, cause, error, out_events),
    }
}

fn reject(cell: CellCoord, cause: InfectionCause, error: GridError, out_events: &mut Vec<Event>) {
    match cause {
        InfectionCause::Seed => warn!(
            row = cell.row(),
            column = cell.column(),
            %error,
            "unable to seed cell"
        ),
        InfectionCause::Movement | InfectionCause::Pressure => warn!(
            row = cell.row(),
            column = cell.column(),
            ?cause,
            %error,
            "unable to update cell"
        ),
    }
    out_events.push(Event::CommandRejected { cell, error });
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::{Grid, World};
    use contagion_core::{CellCoord, CellRecord, CellState, GridError, GridView};

    /// Provides read-only access to the world's grid.
    #[must_use]
    pub fn grid(world: &World) -> &Grid {
        &world.grid
    }

    /// Captures a read-only view of the cell states.
    #[must_use]
    pub fn grid_view(world: &World) -> GridView<'_> {
        world.grid.view()
    }

    /// Reads the state of a single cell.
    pub fn cell_state(world: &World, cell: CellCoord) -> Result<CellState, GridError> {
        world.grid.get(cell)
    }

    /// Grid dimensions as `(height, width)`.
    #[must_use]
    pub fn dimensions(world: &World) -> (u32, u32) {
        (world.grid.height(), world.grid.width())
    }

    /// Number of ticks merged into the world so far.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }

    /// Number of infected cells.
    #[must_use]
    pub fn infected_count(world: &World) -> usize {
        world.grid.view().infected().count()
    }

    /// Flattens the grid into row-major records for export.
    #[must_use]
    pub fn snapshot(world: &World) -> Vec<CellRecord> {
        world.grid.to_flat_snapshot()
    }
}
