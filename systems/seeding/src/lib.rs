#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Seeding system responsible for emitting the initial outbreak cluster.

use contagion_core::{CellCoord, Command};

/// Outbreak cluster of the reference 46x69 scenario, as `(row, column)`.
pub const DEFAULT_OUTBREAK: [CellCoord; 31] = [
    CellCoord::new(22, 41),
    CellCoord::new(24, 58),
    CellCoord::new(25, 42),
    CellCoord::new(25, 43),
    CellCoord::new(26, 40),
    CellCoord::new(27, 63),
    CellCoord::new(27, 67),
    CellCoord::new(28, 33),
    CellCoord::new(29, 60),
    CellCoord::new(30, 41),
    CellCoord::new(30, 52),
    CellCoord::new(31, 29),
    CellCoord::new(31, 54),
    CellCoord::new(32, 44),
    CellCoord::new(32, 52),
    CellCoord::new(33, 53),
    CellCoord::new(35, 37),
    CellCoord::new(36, 34),
    CellCoord::new(37, 35),
    CellCoord::new(38, 27),
    CellCoord::new(40, 30),
    CellCoord::new(41, 29),
    CellCoord::new(41, 30),
    CellCoord::new(42, 32),
    CellCoord::new(42, 33),
    CellCoord::new(42, 35),
    CellCoord::new(43, 25),
    CellCoord::new(43, 27),
    CellCoord::new(43, 31),
    CellCoord::new(44, 26),
    CellCoord::new(45, 23),
];

/// Configuration parameters required to construct the seeding system.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    outbreak: Vec<CellCoord>,
}

impl Config {
    /// Creates a configuration that seeds the provided cells.
    #[must_use]
    pub fn new(outbreak: Vec<CellCoord>) -> Self {
        Self { outbreak }
    }

    /// Cells infected at the start of a run.
    #[must_use]
    pub fn outbreak(&self) -> &[CellCoord] {
        &self.outbreak
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_OUTBREAK.to_vec())
    }
}

/// Pure system that emits one seed command per outbreak cell.
#[derive(Debug)]
pub struct Seeding {
    outbreak: Vec<CellCoord>,
}

impl Seeding {
    /// Creates a new seeding system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            outbreak: config.outbreak,
        }
    }

    /// Emits seed commands in configuration order.
    ///
    /// Bounds are not checked here. The world rejects out-of-range cells
    /// individually, so a partly invalid list still seeds its valid cells.
    pub fn handle(&self, out: &mut Vec<Command>) {
        out.extend(
            self.outbreak
                .iter()
                .map(|&cell| Command::SeedCell { cell }),
        );
    }
}

impl Default for Seeding {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_outbreak_fits_reference_grid() {
        assert!(DEFAULT_OUTBREAK
            .iter()
            .all(|cell| cell.row() < 46 && cell.column() < 69));
    }

    #[test]
    fn default_outbreak_has_no_duplicates() {
        let mut cells = DEFAULT_OUTBREAK.to_vec();
        cells.sort();
        cells.dedup();
        assert_eq!(cells.len(), DEFAULT_OUTBREAK.len());
    }
}
