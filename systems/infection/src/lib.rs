#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Distance-weighted infection pressure and the infection phase.
//!
//! The infection index of a cell sums, for every ring radius `r` up to the
//! configured maximum, the number of infected cells first encountered at `r`
//! divided by `r`. Closer infected cells therefore weigh more than distant
//! ones. During the infection phase every susceptible cell compares its index
//! against a fresh random threshold.

use contagion_core::{
    CellCoord, Command, GridView, InfectionCause, Offset, RandomDraws, INFECTION_RADIUS,
    INFECTION_THRESHOLD_CEILING,
};
use contagion_system_neighborhood::{ring, within, Neighborhood};
use tracing::trace;

/// Counts infected cells at exactly `radius` from `cell`.
///
/// Offsets that fall outside the grid contribute nothing.
#[must_use]
pub fn count_infected_in_ring(view: &GridView<'_>, cell: CellCoord, radius: u32) -> u32 {
    count_infected(view, cell, &ring(radius))
}

/// Computes the infection index of `cell` over rings `1..=max_radius`.
#[must_use]
pub fn infection_index(view: &GridView<'_>, cell: CellCoord, max_radius: u32) -> f64 {
    IndexCalculator::new(max_radius).infection_index(view, cell)
}

fn count_infected(view: &GridView<'_>, cell: CellCoord, offsets: &[Offset]) -> u32 {
    offsets
        .iter()
        .filter(|offset| matches!(view.state_at(cell, **offset), Ok(state) if state.is_infected()))
        .count() as u32
}

/// Infection index calculator backed by a cached set of rings.
#[derive(Clone, Debug)]
pub struct IndexCalculator {
    neighborhood: Neighborhood,
}

impl IndexCalculator {
    /// Creates a calculator that consults rings up to `max_radius`.
    #[must_use]
    pub fn new(max_radius: u32) -> Self {
        Self {
            neighborhood: Neighborhood::new(max_radius),
        }
    }

    /// Largest ring radius included in the index.
    #[must_use]
    pub fn max_radius(&self) -> u32 {
        self.neighborhood.max_radius()
    }

    /// Counts infected cells at exactly `radius` from `cell`.
    ///
    /// Radii beyond the cache are enumerated on demand.
    #[must_use]
    pub fn count_infected_in_ring(&self, view: &GridView<'_>, cell: CellCoord, radius: u32) -> u32 {
        if radius > self.max_radius() {
            return count_infected_in_ring(view, cell, radius);
        }
        count_infected(view, cell, self.neighborhood.ring(radius))
    }

    /// Counts infected cells within Chebyshev distance `radius` of `cell`, origin excluded.
    ///
    /// Consecutive radii differ by exactly the ring count at the larger one.
    #[must_use]
    pub fn count_infected_within(&self, view: &GridView<'_>, cell: CellCoord, radius: u32) -> u32 {
        count_infected(view, cell, &within(radius))
    }

    /// Computes the distance-decayed infection index of `cell`.
    #[must_use]
    pub fn infection_index(&self, view: &GridView<'_>, cell: CellCoord) -> f64 {
        self.neighborhood
            .rings()
            .map(|(radius, offsets)| {
                f64::from(count_infected(view, cell, offsets)) / f64::from(radius)
            })
            .sum()
    }
}

/// Pure system that proposes infections driven by neighbourhood pressure.
#[derive(Clone, Debug)]
pub struct Infection {
    calculator: IndexCalculator,
    threshold_ceiling: u32,
}

impl Default for Infection {
    fn default() -> Self {
        Self::new(INFECTION_RADIUS, INFECTION_THRESHOLD_CEILING)
    }
}

impl Infection {
    /// Creates the system with explicit radius and threshold range.
    ///
    /// Thresholds are drawn from `[0, threshold_ceiling)`; a ceiling of zero
    /// is treated as one.
    #[must_use]
    pub fn new(max_radius: u32, threshold_ceiling: u32) -> Self {
        Self {
            calculator: IndexCalculator::new(max_radius),
            threshold_ceiling: threshold_ceiling.max(1),
        }
    }

    /// Calculator used to score cells.
    #[must_use]
    pub fn calculator(&self) -> &IndexCalculator {
        &self.calculator
    }

    /// Scans the susceptible cells of `view` in row-major order and emits an
    /// infect command for every cell whose index reaches its threshold.
    ///
    /// Exactly one threshold is drawn per susceptible cell.
    pub fn handle<D>(&self, view: &GridView<'_>, draws: &mut D, out: &mut Vec<Command>)
    where
        D: RandomDraws + ?Sized,
    {
        let before = out.len();

        for cell in view.susceptible() {
            let index = self.calculator.infection_index(view, cell);
            let threshold = draws.below(self.threshold_ceiling);
            if index >= f64::from(threshold) {
                out.push(Command::InfectCell {
                    cell,
                    cause: InfectionCause::Pressure,
                });
            }
        }

        trace!(proposed = out.len() - before, "infection phase complete");
    }
}
