use contagion_core::{CellRecord, CellState, GridView};
use serde::Serialize;

/// Population counts of a grid at one point in time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct OutbreakSummary {
    /// Number of cells in the grid.
    pub total: usize,
    /// Number of infected cells.
    pub infected: usize,
    /// Number of susceptible cells.
    pub susceptible: usize,
}

impl OutbreakSummary {
    /// Tallies the cells visible through `view`.
    #[must_use]
    pub fn from_view(view: &GridView<'_>) -> Self {
        Self::tally(view.iter().map(|(_, state)| state))
    }

    /// Tallies a flattened snapshot.
    #[must_use]
    pub fn from_records(records: &[CellRecord]) -> Self {
        Self::tally(records.iter().map(|record| record.state))
    }

    /// Share of infected cells in `[0, 1]`; zero for an empty grid.
    #[must_use]
    pub fn infected_fraction(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.infected as f64 / self.total as f64
    }

    fn tally(states: impl Iterator<Item = CellState>) -> Self {
        states.fold(Self::default(), |mut summary, state| {
            summary.total += 1;
            match state {
                CellState::Infected => summary.infected += 1,
                CellState::Susceptible => summary.susceptible += 1,
            }
            summary
        })
    }
}

#[cfg(test)]
mod tests {
    use super::OutbreakSummary;
    use contagion_core::{CellState, GridView};

    #[test]
    fn counts_partition_the_grid() {
        let mut cells = vec![CellState::Susceptible; 12];
        cells[0] = CellState::Infected;
        cells[7] = CellState::Infected;
        cells[11] = CellState::Infected;
        let view = GridView::new(&cells, 3, 4);

        let summary = OutbreakSummary::from_view(&view);

        assert_eq!(
            summary,
            OutbreakSummary {
                total: 12,
                infected: 3,
                susceptible: 9,
            }
        );
        assert!((summary.infected_fraction() - 0.25).abs() < f64::EPSILON);
        assert_eq!(OutbreakSummary::from_records(&view.records()), summary);
    }

    #[test]
    fn empty_grid_has_zero_fraction() {
        assert_eq!(OutbreakSummary::default().infected_fraction(), 0.0);
    }
}
