//! Simulation-wide configuration types (§3 "Simulation configuration") and
//! the per-pattern `FillingConfig` (§3). Legacy `config.txt` `Key Value`
//! parsing lives in `core-io`; this crate only owns the typed
//! representation plus loading it from a TOML document, the way the
//! teacher's `core-config` owns `oxidized.toml` loading.

mod filling;
mod simulation;

pub use filling::{ConfigError, FillingConfig, FillingMethod};
pub use simulation::{
    AggregationParameters, BayesianParameters, DisagreementWeights, DiscontinuityPolicy,
    FillingFlags, OptimisedDimensions, SimulationConfig, SortingMethod, SplayLineBoundaryPolicy,
};

use std::path::Path;

use anyhow::{Context, Result};

/// Loads a `SimulationConfig` from a TOML file. Unknown tables/keys are
/// tolerated by `serde`'s default deserialisation so forward evolution of
/// the file doesn't break older binaries; missing tables fall back to
/// `Default`.
pub fn load_simulation_config(path: &Path) -> Result<SimulationConfig> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading simulation config {}", path.display()))?;
    let config: SimulationConfig = toml::from_str(&raw)
        .with_context(|| format!("parsing simulation config {}", path.display()))?;
    tracing::info!(path = %path.display(), "loaded simulation config");
    Ok(config)
}

/// A `SimulationConfig` with sensible defaults, used when no config file is
/// given on the command line.
pub fn default_simulation_config() -> SimulationConfig {
    SimulationConfig::default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_partial_toml_with_defaults_for_missing_tables() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[bayesian]\ntotal_iterations = 7\n").unwrap();
        let config = load_simulation_config(file.path()).unwrap();
        assert_eq!(config.bayesian.total_iterations, 7);
        assert_eq!(config.aggregation.percentile, 0.5);
    }
}
