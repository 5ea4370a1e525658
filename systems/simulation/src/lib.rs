#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Run loop for the Contagion engine.
//!
//! A run builds an all-susceptible world, applies the outbreak seeds and then
//! advances the grid through a fixed number of ticks. Each tick is produced by
//! the [`TickDriver`] from the previous one.

mod tick;

pub use tick::{apply_tick, TickDriver};

use contagion_core::{cell_count, CellCoord, GridError, RandomDraws, RngDraws};
use contagion_system_analytics::{Analytics, OutbreakSummary};
use contagion_system_seeding::{self as seeding, Seeding, DEFAULT_OUTBREAK};
use contagion_world::{self as world, query, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use thiserror::Error;
use tracing::info;

/// Rows in the reference scenario.
pub const DEFAULT_HEIGHT: u32 = 46;
/// Columns in the reference scenario.
pub const DEFAULT_WIDTH: u32 = 69;
/// Seed used when a configuration does not provide one.
pub const DEFAULT_RNG_SEED: u64 = 0x0b5e_55ed_c0ff_ee42;

/// Structural problems detected before a run starts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Either grid dimension is zero.
    #[error("grid dimensions must be positive (received {height}x{width})")]
    ZeroDimension {
        /// Requested number of rows.
        height: u32,
        /// Requested number of columns.
        width: u32,
    },
    /// The grid would hold more than [`contagion_core::MAX_CELLS`] cells.
    #[error("a {height}x{width} grid exceeds the supported cell count")]
    TooLarge {
        /// Requested number of rows.
        height: u32,
        /// Requested number of columns.
        width: u32,
    },
}

/// Parameters of a single run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SimulationConfig {
    height: u32,
    width: u32,
    runs: u32,
    rng_seed: u64,
    outbreak: Vec<CellCoord>,
}

impl SimulationConfig {
    /// Validates the dimensions and creates a configuration seeded with the
    /// default outbreak cluster and random seed.
    pub fn new(height: u32, width: u32, runs: u32) -> Result<Self, ConfigError> {
        if height == 0 || width == 0 {
            return Err(ConfigError::ZeroDimension { height, width });
        }
        if cell_count(height, width).is_err() {
            return Err(ConfigError::TooLarge { height, width });
        }
        Ok(Self {
            height,
            width,
            runs,
            rng_seed: DEFAULT_RNG_SEED,
            outbreak: DEFAULT_OUTBREAK.to_vec(),
        })
    }

    /// Replaces the random seed.
    #[must_use]
    pub fn with_seed(mut self, rng_seed: u64) -> Self {
        self.rng_seed = rng_seed;
        self
    }

    /// Replaces the outbreak cluster.
    #[must_use]
    pub fn with_outbreak(mut self, outbreak: Vec<CellCoord>) -> Self {
        self.outbreak = outbreak;
        self
    }

    /// Number of rows.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Number of columns.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of ticks to apply.
    #[must_use]
    pub const fn runs(&self) -> u32 {
        self.runs
    }

    /// Seed for the run's random generator.
    #[must_use]
    pub const fn rng_seed(&self) -> u64 {
        self.rng_seed
    }

    /// Cells infected before the first tick.
    #[must_use]
    pub fn outbreak(&self) -> &[CellCoord] {
        &self.outbreak
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            height: DEFAULT_HEIGHT,
            width: DEFAULT_WIDTH,
            runs: 0,
            rng_seed: DEFAULT_RNG_SEED,
            outbreak: DEFAULT_OUTBREAK.to_vec(),
        }
    }
}

/// Owns the configuration, tick driver and analytics of one run.
#[derive(Debug)]
pub struct Simulation {
    config: SimulationConfig,
    driver: TickDriver,
    analytics: Analytics,
}

impl Simulation {
    /// Prepares a run with the default phase parameters.
    #[must_use]
    pub fn new(config: SimulationConfig) -> Self {
        Self::with_driver(config, TickDriver::default())
    }

    /// Prepares a run with a custom tick driver.
    #[must_use]
    pub fn with_driver(config: SimulationConfig, driver: TickDriver) -> Self {
        Self {
            config,
            driver,
            analytics: Analytics::new(),
        }
    }

    /// Configuration of the run.
    #[must_use]
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Per-tick reports gathered so far.
    #[must_use]
    pub fn analytics(&self) -> &Analytics {
        &self.analytics
    }

    /// Builds the all-susceptible world and applies the outbreak seeds.
    ///
    /// Starts a fresh set of analytics reports.
    pub fn initial_world(&mut self) -> Result<World, GridError> {
        self.analytics = Analytics::new();
        let mut world = World::new(self.config.height, self.config.width)?;
        let seeder = Seeding::new(seeding::Config::new(self.config.outbreak.clone()));
        let mut commands = Vec::new();
        seeder.handle(&mut commands);

        let mut events = Vec::new();
        for command in commands {
            world::apply(&mut world, command, &mut events);
        }
        self.analytics.handle(&events);
        self.analytics.flush();
        Ok(world)
    }

    /// Executes the run with a generator seeded from the configuration.
    pub fn run(&mut self) -> Result<World, GridError> {
        let mut draws = RngDraws::new(ChaCha8Rng::seed_from_u64(self.config.rng_seed));
        self.run_with(&mut draws)
    }

    /// Executes the run drawing randomness from `draws`.
    ///
    /// Reports from any previous run are discarded.
    pub fn run_with<D>(&mut self, draws: &mut D) -> Result<World, GridError>
    where
        D: RandomDraws + ?Sized,
    {
        let mut world = self.initial_world()?;
        info!(
            height = self.config.height,
            width = self.config.width,
            runs = self.config.runs,
            seed = self.config.rng_seed,
            infected = query::infected_count(&world),
            "starting run"
        );

        let mut events = Vec::new();
        for _ in 0..self.config.runs {
            events.clear();
            world = self.driver.apply_tick(&world, draws, &mut events);
            self.analytics.handle(&events);
        }

        let summary = OutbreakSummary::from_view(&query::grid_view(&world));
        info!(
            ticks = query::tick_index(&world),
            infected = summary.infected,
            susceptible = summary.susceptible,
            "run complete"
        );
        Ok(world)
    }
}

/// Builds, seeds and advances a grid according to `config`, returning the final world.
///
/// With `runs = 0` the seeded initial world is returned unchanged. Fails only
/// for grids that [`SimulationConfig::new`] would have rejected as too large.
pub fn run_model(config: &SimulationConfig) -> Result<World, GridError> {
    Simulation::new(config.clone()).run()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_dimensions_are_rejected() {
        assert_eq!(
            SimulationConfig::new(0, 10, 3),
            Err(ConfigError::ZeroDimension {
                height: 0,
                width: 10
            })
        );
        assert!(SimulationConfig::new(10, 0, 3).is_err());
        assert!(SimulationConfig::new(1, 1, 0).is_ok());
        assert_eq!(
            SimulationConfig::new(u32::MAX, 2, 0),
            Err(ConfigError::TooLarge {
                height: u32::MAX,
                width: 2
            })
        );
    }

    #[test]
    fn default_config_matches_reference_scenario() {
        let config = SimulationConfig::default();
        assert_eq!((config.height(), config.width()), (46, 69));
        assert_eq!(config.runs(), 0);
        assert_eq!(config.outbreak().len(), 31);
        assert_eq!(
            SimulationConfig::new(46, 69, 0).expect("valid dimensions"),
            config
        );
    }

    #[test]
    fn initial_world_records_a_seeding_report() {
        let mut simulation = Simulation::new(SimulationConfig::default());
        let world = simulation.initial_world().expect("grid fits");

        let report = simulation
            .analytics()
            .last_report()
            .copied()
            .expect("seeding report");
        assert_eq!(report.tick, 0);
        assert_eq!(report.seeded as usize, query::infected_count(&world));
    }
}
