#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Outbreak analytics derived from world events and grid snapshots.

mod metrics;

pub use metrics::OutbreakSummary;

use contagion_core::{Event, InfectionCause};
use serde::Serialize;

/// Outcome of the commands merged during one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct TickReport {
    /// Tick the report describes; zero covers seeding.
    pub tick: u64,
    /// Cells infected by the seeder.
    pub seeded: u32,
    /// Cells infected by movement from an adjacent cell.
    pub moved: u32,
    /// Cells infected by neighbourhood pressure.
    pub pressured: u32,
    /// Proposals that targeted an already infected cell.
    pub duplicates: u32,
    /// Commands skipped because they addressed a cell outside the grid.
    pub rejected: u32,
}

impl TickReport {
    /// Cells newly infected during the tick.
    #[must_use]
    pub const fn newly_infected(&self) -> u32 {
        self.seeded + self.moved + self.pressured
    }
}

/// System that folds world events into per-tick reports.
#[derive(Debug, Default)]
pub struct Analytics {
    pending: TickReport,
    reports: Vec<TickReport>,
}

impl Analytics {
    /// Creates a new analytics system with no reports.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Consumes events emitted by the world.
    ///
    /// Events accumulate into the pending report until
    /// [`Event::TickAdvanced`] closes it. Call [`Analytics::flush`] to close
    /// the seeding report, which never sees a tick event.
    pub fn handle(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::CellInfected { cause, .. } => match cause {
                    InfectionCause::Seed => self.pending.seeded += 1,
                    InfectionCause::Movement => self.pending.moved += 1,
                    InfectionCause::Pressure => self.pending.pressured += 1,
                },
                Event::CellAlreadyInfected { .. } => self.pending.duplicates += 1,
                Event::CommandRejected { .. } => self.pending.rejected += 1,
                Event::TickAdvanced { tick } => {
                    self.pending.tick = *tick;
                    self.flush();
                }
            }
        }
    }

    /// Closes the pending report and starts the next one.
    pub fn flush(&mut self) {
        let report = std::mem::take(&mut self.pending);
        self.pending.tick = report.tick + 1;
        self.reports.push(report);
    }

    /// Reports closed so far, oldest first.
    #[must_use]
    pub fn reports(&self) -> &[TickReport] {
        &self.reports
    }

    /// The most recently closed report, if any.
    #[must_use]
    pub fn last_report(&self) -> Option<&TickReport> {
        self.reports.last()
    }
}
