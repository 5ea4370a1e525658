use std::{fs, path::Path};

use anyhow::{Context, Result};
use contagion_core::CellCoord;
use contagion_simulation::{SimulationConfig, DEFAULT_HEIGHT, DEFAULT_WIDTH};
use serde::Deserialize;

/// Run parameters read from a TOML file. Every key is optional.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct FileConfig {
    height: Option<u32>,
    width: Option<u32>,
    runs: Option<u32>,
    seed: Option<u64>,
    /// `[row, column]` pairs replacing the default outbreak cluster.
    outbreak: Option<Vec<[u32; 2]>>,
}

impl FileConfig {
    /// Reads and parses the file at `path`.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file at {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("failed to load config file at {}", path.display()))
    }

    pub(crate) fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("failed to parse config toml contents")
    }
}

/// Values supplied on the command line; they take precedence over the file.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct Overrides {
    pub(crate) height: Option<u32>,
    pub(crate) width: Option<u32>,
    pub(crate) runs: Option<u32>,
    pub(crate) seed: Option<u64>,
}

/// Merges flags, file values and defaults into a validated configuration.
///
/// `fallback_seed` is only called when neither source names a seed.
pub(crate) fn resolve(
    file: FileConfig,
    overrides: Overrides,
    fallback_seed: impl FnOnce() -> u64,
) -> Result<SimulationConfig> {
    let height = overrides.height.or(file.height).unwrap_or(DEFAULT_HEIGHT);
    let width = overrides.width.or(file.width).unwrap_or(DEFAULT_WIDTH);
    let runs = overrides.runs.or(file.runs).unwrap_or(0);
    let seed = overrides.seed.or(file.seed).unwrap_or_else(fallback_seed);

    let mut config = SimulationConfig::new(height, width, runs)
        .context("invalid simulation configuration")?
        .with_seed(seed);
    if let Some(outbreak) = file.outbreak {
        config = config.with_outbreak(
            outbreak
                .into_iter()
                .map(|[row, column]| CellCoord::new(row, column))
                .collect(),
        );
    }
    Ok(config)
}
