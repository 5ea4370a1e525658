#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Contagion epidemic engine.
//!
//! This crate defines the message surface that connects the run loop, the
//! authoritative world, and the pure phase systems. Systems read an immutable
//! [`GridView`] captured at the start of a tick and respond exclusively with
//! [`Command`] values. The world executes those commands through its `apply`
//! entry point and reports the outcome as [`Event`] values.

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Probability that an infected cell leaks infection in a single compass direction per tick.
///
/// A quarter of a cell's population moves, split evenly across eight directions
/// (`0.25 / 8 = 0.03125`). The model deliberately keeps the rounded value.
pub const MOVE_PROBABILITY: f64 = 0.03;

/// Exclusive upper bound of the random infection threshold drawn per susceptible cell.
pub const INFECTION_THRESHOLD_CEILING: u32 = 25;

/// Largest ring radius consulted when computing the infection index.
pub const INFECTION_RADIUS: u32 = 10;

/// Largest number of cells a grid may hold.
pub const MAX_CELLS: u64 = u32::MAX as u64;

/// Number of cells in a `height` x `width` grid.
///
/// Fails with [`GridError::TooLarge`] when the product exceeds [`MAX_CELLS`]
/// or does not fit the platform's address space.
pub fn cell_count(height: u32, width: u32) -> Result<usize, GridError> {
    let cells = u64::from(height) * u64::from(width);
    if cells > MAX_CELLS {
        return Err(GridError::TooLarge { height, width });
    }
    usize::try_from(cells).map_err(|_| GridError::TooLarge { height, width })
}

/// Epidemiological state of a single grid cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellState {
    /// The cell has not been infected yet.
    #[default]
    Susceptible,
    /// The cell is infected. Infection is permanent.
    Infected,
}

impl CellState {
    /// Numeric code used by flat exports (`0` susceptible, `1` infected).
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Susceptible => 0,
            Self::Infected => 1,
        }
    }

    /// Reports whether the state is [`CellState::Infected`].
    #[must_use]
    pub const fn is_infected(self) -> bool {
        matches!(self, Self::Infected)
    }
}

/// Location of a single grid cell expressed as zero-based row and column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    row: u32,
    column: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(row: u32, column: u32) -> Self {
        Self { row, column }
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Translates the coordinate by `offset`.
    ///
    /// Returns `None` when either resulting component would be negative or
    /// overflow `u32`. Upper bounds are not checked here because the
    /// coordinate carries no grid dimensions; [`GridView::state`] does that.
    #[must_use]
    pub fn offset(self, offset: Offset) -> Option<CellCoord> {
        let row = self.row.checked_add_signed(offset.dy())?;
        let column = self.column.checked_add_signed(offset.dx())?;
        Some(CellCoord::new(row, column))
    }

    /// Computes the Chebyshev (king-move) distance between two coordinates.
    #[must_use]
    pub fn chebyshev_distance(self, other: CellCoord) -> u32 {
        self.row.abs_diff(other.row).max(self.column.abs_diff(other.column))
    }
}

/// Relative displacement between two cells measured in rows (`dy`) and columns (`dx`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Offset {
    dy: i32,
    dx: i32,
}

impl Offset {
    /// Creates a new offset.
    #[must_use]
    pub const fn new(dy: i32, dx: i32) -> Self {
        Self { dy, dx }
    }

    /// Row displacement; negative values point north.
    #[must_use]
    pub const fn dy(&self) -> i32 {
        self.dy
    }

    /// Column displacement; negative values point west.
    #[must_use]
    pub const fn dx(&self) -> i32 {
        self.dx
    }

    /// Chebyshev length of the offset, i.e. the ring it belongs to.
    #[must_use]
    pub const fn chebyshev_radius(&self) -> u32 {
        let dy = self.dy.unsigned_abs();
        let dx = self.dx.unsigned_abs();
        if dy > dx {
            dy
        } else {
            dx
        }
    }
}

/// The eight compass directions an infected population may disperse toward.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Toward decreasing row indices.
    North,
    /// Toward decreasing rows and increasing columns.
    NorthEast,
    /// Toward increasing column indices.
    East,
    /// Toward increasing rows and increasing columns.
    SouthEast,
    /// Toward increasing row indices.
    South,
    /// Toward increasing rows and decreasing columns.
    SouthWest,
    /// Toward decreasing column indices.
    West,
    /// Toward decreasing rows and decreasing columns.
    NorthWest,
}

impl Direction {
    /// All directions in clockwise order starting at north.
    pub const ALL: [Direction; 8] = [
        Direction::North,
        Direction::NorthEast,
        Direction::East,
        Direction::SouthEast,
        Direction::South,
        Direction::SouthWest,
        Direction::West,
        Direction::NorthWest,
    ];

    /// Unit offset pointing one cell in this direction.
    #[must_use]
    pub const fn offset(self) -> Offset {
        match self {
            Self::North => Offset::new(-1, 0),
            Self::NorthEast => Offset::new(-1, 1),
            Self::East => Offset::new(0, 1),
            Self::SouthEast => Offset::new(1, 1),
            Self::South => Offset::new(1, 0),
            Self::SouthWest => Offset::new(1, -1),
            Self::West => Offset::new(0, -1),
            Self::NorthWest => Offset::new(-1, -1),
        }
    }
}

impl TryFrom<u8> for Direction {
    type Error = GridError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Direction::ALL
            .get(usize::from(value))
            .copied()
            .ok_or(GridError::InvalidNeighborDirection(value))
    }
}

/// Failures raised by bounds-checked grid access.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error)]
pub enum GridError {
    /// The coordinate lies outside `[0, height) x [0, width)`.
    #[error("cell ({row}, {column}) lies outside the {height}x{width} grid")]
    OutOfBounds {
        /// Requested row.
        row: i64,
        /// Requested column.
        column: i64,
        /// Number of rows in the grid.
        height: u32,
        /// Number of columns in the grid.
        width: u32,
    },
    /// The requested dimensions hold more than [`MAX_CELLS`] cells.
    #[error("a {height}x{width} grid exceeds the supported cell count")]
    TooLarge {
        /// Requested number of rows.
        height: u32,
        /// Requested number of columns.
        width: u32,
    },
    /// A direction index outside the eight compass directions was supplied.
    #[error("neighbor direction {0} is not one of the eight compass directions")]
    InvalidNeighborDirection(u8),
}

/// Path through which a cell became infected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InfectionCause {
    /// Part of the initial outbreak cluster.
    Seed,
    /// Infected population moved in from an adjacent cell.
    Movement,
    /// Accumulated infection pressure from the extended neighbourhood exceeded the threshold.
    Pressure,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Marks a cell as part of the initial outbreak.
    SeedCell {
        /// Cell to infect.
        cell: CellCoord,
    },
    /// Marks a cell as newly infected during a tick.
    InfectCell {
        /// Cell to infect.
        cell: CellCoord,
        /// Phase that proposed the infection.
        cause: InfectionCause,
    },
    /// Records that one more tick has been merged into the grid.
    Tick,
}

impl Command {
    /// Cell targeted by the command, if the command addresses one.
    #[must_use]
    pub const fn cell(&self) -> Option<CellCoord> {
        match self {
            Self::SeedCell { cell } | Self::InfectCell { cell, .. } => Some(*cell),
            Self::Tick => None,
        }
    }
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    /// The tick counter advanced.
    TickAdvanced {
        /// Number of ticks applied so far, including this one.
        tick: u64,
    },
    /// A susceptible cell transitioned to infected.
    CellInfected {
        /// Cell that became infected.
        cell: CellCoord,
        /// Path through which the infection happened.
        cause: InfectionCause,
    },
    /// The targeted cell was already infected, so nothing changed.
    CellAlreadyInfected {
        /// Cell that was targeted.
        cell: CellCoord,
    },
    /// The command addressed a cell outside the grid and was skipped.
    CommandRejected {
        /// Cell that was targeted.
        cell: CellCoord,
        /// Bounds failure reported by the grid.
        error: GridError,
    },
}

/// Read-only view into the dense, row-major cell state buffer.
#[derive(Clone, Copy, Debug)]
pub struct GridView<'a> {
    cells: &'a [CellState],
    height: u32,
    width: u32,
}

impl<'a> GridView<'a> {
    /// Captures a new view backed by the provided row-major cell slice.
    ///
    /// `cells` must hold exactly `height * width` entries.
    #[must_use]
    pub fn new(cells: &'a [CellState], height: u32, width: u32) -> Self {
        debug_assert_eq!(
            cells.len() as u64,
            u64::from(height) * u64::from(width),
            "cell buffer does not match grid dimensions"
        );
        Self {
            cells,
            height,
            width,
        }
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

    /// Returns the state of the provided cell or [`GridError::OutOfBounds`].
    pub fn state(&self, cell: CellCoord) -> Result<CellState, GridError> {
        let index = self.index(cell)?;
        self.cells.get(index).copied().ok_or_else(|| self.out_of_bounds(cell))
    }

    /// Resolves the cell displaced from `origin` by `offset`.
    ///
    /// Negative results are reported as [`GridError::OutOfBounds`] just like
    /// coordinates beyond the far edges.
    pub fn resolve(&self, origin: CellCoord, offset: Offset) -> Result<CellCoord, GridError> {
        let cell = origin.offset(offset).ok_or(GridError::OutOfBounds {
            row: i64::from(origin.row()) + i64::from(offset.dy()),
            column: i64::from(origin.column()) + i64::from(offset.dx()),
            height: self.height,
            width: self.width,
        })?;
        if self.contains(cell) {
            Ok(cell)
        } else {
            Err(self.out_of_bounds(cell))
        }
    }

    /// Returns the state of the cell displaced from `origin` by `offset`.
    pub fn state_at(&self, origin: CellCoord, offset: Offset) -> Result<CellState, GridError> {
        self.state(self.resolve(origin, offset)?)
    }

    /// Reports whether the cell lies inside the grid.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.row() < self.height && cell.column() < self.width
    }

    /// Iterates every cell in row-major order together with its state.
    pub fn iter(&self) -> impl Iterator<Item = (CellCoord, CellState)> + 'a {
        let width = self.width;
        self.cells.iter().enumerate().map(move |(index, state)| {
            let index = index as u64;
            let width = u64::from(width);
            let row = (index / width) as u32;
            let column = (index % width) as u32;
            (CellCoord::new(row, column), *state)
        })
    }

    /// Iterates the infected cells in row-major order.
    pub fn infected(&self) -> impl Iterator<Item = CellCoord> + 'a {
        self.iter()
            .filter(|(_, state)| state.is_infected())
            .map(|(cell, _)| cell)
    }

    /// Iterates the susceptible cells in row-major order.
    pub fn susceptible(&self) -> impl Iterator<Item = CellCoord> + 'a {
        self.iter()
            .filter(|(_, state)| !state.is_infected())
            .map(|(cell, _)| cell)
    }

    /// Flattens the grid into addressable records in row-major order.
    #[must_use]
    pub fn records(&self) -> Vec<CellRecord> {
        self.iter()
            .map(|(cell, state)| CellRecord::new(cell, state, self.width))
            .collect()
    }

    /// Row-major position of `cell` in the backing buffer.
    pub fn index(&self, cell: CellCoord) -> Result<usize, GridError> {
        if !self.contains(cell) {
            return Err(self.out_of_bounds(cell));
        }
        let row = usize::try_from(cell.row()).map_err(|_| self.out_of_bounds(cell))?;
        let column = usize::try_from(cell.column()).map_err(|_| self.out_of_bounds(cell))?;
        let width = usize::try_from(self.width).map_err(|_| self.out_of_bounds(cell))?;
        Ok(row * width + column)
    }

    fn out_of_bounds(&self, cell: CellCoord) -> GridError {
        GridError::OutOfBounds {
            row: i64::from(cell.row()),
            column: i64::from(cell.column()),
            height: self.height,
            width: self.width,
        }
    }
}

/// One cell of a flattened grid snapshot, addressed by a stable row-major identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellRecord {
    /// Sequential identifier `row * width + column`.
    pub id: u64,
    /// Epidemiological state of the cell.
    pub state: CellState,
    /// Zero-based row the record originates from.
    pub row: u32,
    /// Zero-based column the record originates from.
    #[serde(rename = "col")]
    pub column: u32,
}

impl CellRecord {
    /// Builds the record for `cell` in a grid that is `width` columns wide.
    #[must_use]
    pub fn new(cell: CellCoord, state: CellState, width: u32) -> Self {
        Self {
            id: u64::from(cell.row()) * u64::from(width) + u64::from(cell.column()),
            state,
            row: cell.row(),
            column: cell.column(),
        }
    }

    /// Coordinate the record originates from.
    #[must_use]
    pub const fn cell(&self) -> CellCoord {
        CellCoord::new(self.row, self.column)
    }
}

/// Source of the random samples consumed by the phase systems.
///
/// Production runs adapt a seeded generator through [`RngDraws`]; tests can
/// script the exact sequence of values.
pub trait RandomDraws {
    /// Uniform sample in `[0, 1)`.
    fn unit(&mut self) -> f64;

    /// Uniform integer in `[0, ceiling)`. `ceiling` is never zero.
    fn below(&mut self, ceiling: u32) -> u32;
}

/// Adapts any [`rand::Rng`] to [`RandomDraws`].
#[derive(Clone, Debug)]
pub struct RngDraws<R> {
    rng: R,
}

impl<R: Rng> RngDraws<R> {
    /// Wraps the provided generator.
    #[must_use]
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Consumes the adapter, yielding the wrapped generator.
    #[must_use]
    pub fn into_inner(self) -> R {
        self.rng
    }
}

impl<R: Rng> RandomDraws for RngDraws<R> {
    fn unit(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }

    fn below(&mut self, ceiling: u32) -> u32 {
        self.rng.gen_range(0..ceiling)
    }
}

#[cfg(test)]
mod tests {
    use super::{
        cell_count, CellCoord, CellRecord, CellState, Direction, GridError, GridView, Offset,
        RandomDraws, RngDraws, MAX_CELLS,
    };
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn direction_offsets_cover_the_unit_ring() {
        let mut offsets: Vec<Offset> = Direction::ALL.iter().map(|d| d.offset()).collect();
        offsets.sort();
        offsets.dedup();
        assert_eq!(offsets.len(), 8);
        assert!(offsets.iter().all(|offset| offset.chebyshev_radius() == 1));
    }

    #[test]
    fn direction_rejects_indices_beyond_the_compass() {
        assert_eq!(Direction::try_from(0), Ok(Direction::North));
        assert_eq!(Direction::try_from(7), Ok(Direction::NorthWest));
        assert_eq!(
            Direction::try_from(8),
            Err(GridError::InvalidNeighborDirection(8))
        );
    }

    #[test]
    fn offset_refuses_negative_coordinates() {
        let origin = CellCoord::new(0, 3);
        assert_eq!(origin.offset(Offset::new(-1, 0)), None);
        assert_eq!(
            origin.offset(Offset::new(2, -3)),
            Some(CellCoord::new(2, 0))
        );
    }

    #[test]
    fn view_reports_out_of_bounds_on_every_edge() {
        let cells = vec![CellState::Susceptible; 6];
        let view = GridView::new(&cells, 2, 3);

        assert!(view.state(CellCoord::new(1, 2)).is_ok());
        assert!(matches!(
            view.state(CellCoord::new(2, 0)),
            Err(GridError::OutOfBounds { row: 2, .. })
        ));
        assert!(matches!(
            view.state(CellCoord::new(0, 3)),
            Err(GridError::OutOfBounds { column: 3, .. })
        ));
        assert!(matches!(
            view.state_at(CellCoord::new(0, 0), Offset::new(-1, -1)),
            Err(GridError::OutOfBounds {
                row: -1,
                column: -1,
                ..
            })
        ));
    }

    #[test]
    fn cell_count_is_capped() {
        assert_eq!(cell_count(46, 69), Ok(46 * 69));
        assert_eq!(cell_count(0, 7), Ok(0));
        assert_eq!(cell_count(1, u32::MAX), Ok(MAX_CELLS as usize));
        assert_eq!(
            cell_count(2, u32::MAX),
            Err(GridError::TooLarge {
                height: 2,
                width: u32::MAX,
            })
        );
    }

    #[test]
    fn index_is_row_major_and_bounds_checked() {
        let cells = vec![CellState::Susceptible; 12];
        let view = GridView::new(&cells, 3, 4);

        assert_eq!(view.index(CellCoord::new(0, 0)), Ok(0));
        assert_eq!(view.index(CellCoord::new(2, 3)), Ok(11));
        assert!(view.index(CellCoord::new(3, 0)).is_err());
        assert!(view.index(CellCoord::new(0, 4)).is_err());
    }

    #[test]
    fn records_follow_row_major_identifiers() {
        let mut cells = vec![CellState::Susceptible; 6];
        cells[4] = CellState::Infected;
        let view = GridView::new(&cells, 2, 3);

        let records = view.records();
        assert_eq!(records.len(), 6);
        for (expected_id, record) in records.iter().enumerate() {
            assert_eq!(record.id, expected_id as u64);
        }
        assert_eq!(
            records[4],
            CellRecord {
                id: 4,
                state: CellState::Infected,
                row: 1,
                column: 1,
            }
        );
    }

    #[test]
    fn rng_draws_stay_within_requested_ranges() {
        let mut draws = RngDraws::new(ChaCha8Rng::seed_from_u64(7));
        for _ in 0..1_000 {
            let unit = draws.unit();
            assert!((0.0..1.0).contains(&unit));
            assert!(draws.below(25) < 25);
        }
    }
}
