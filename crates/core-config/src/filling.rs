use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How initial seed lines are chosen (§3, §4.G). A closed tagged variant:
/// the engine's setup dispatches on it and there is no open extension
/// point (§9 "Polymorphism over filling method").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum FillingMethod {
    Splay,
    Perimeter,
    Dual,
}

impl std::fmt::Display for FillingMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            FillingMethod::Splay => "Splay",
            FillingMethod::Perimeter => "Perimeter",
            FillingMethod::Dual => "Dual",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for FillingMethod {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Splay" => Ok(FillingMethod::Splay),
            "Perimeter" => Ok(FillingMethod::Perimeter),
            "Dual" => Ok(FillingMethod::Dual),
            other => Err(ConfigError::InvalidConfig(format!(
                "unrecognised InitialSeedingMethod '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// The generating parameters that decide how a single pattern is filled
/// (§3 `FillingConfig`). Constructed either from `config.txt` (§6) or
/// directly by the Bayesian driver when it proposes a new parameter
/// vector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FillingConfig {
    pub seeding_method: FillingMethod,
    pub termination_radius: f64,
    pub step_length: f64,
    pub print_radius: f64,
    pub seed_spacing: f64,
    pub repulsion_magnitude: f64,
    pub repulsion_angle: f64,
    pub seed: u64,
}

impl FillingConfig {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        seeding_method: FillingMethod,
        termination_radius: f64,
        step_length: f64,
        print_radius: f64,
        seed_spacing: f64,
        repulsion_magnitude: f64,
        repulsion_angle: f64,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        let config = Self {
            seeding_method,
            termination_radius,
            step_length,
            print_radius,
            seed_spacing,
            repulsion_magnitude,
            repulsion_angle,
            seed,
        };
        config.validate()?;
        Ok(config)
    }

    /// §3 invariants: `seed_spacing >= 2 * print_radius` and the repulsion
    /// angle lies in `[0, pi/2]`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.seed_spacing < 2.0 * self.print_radius {
            return Err(ConfigError::InvalidConfig(format!(
                "seed spacing {} must be >= 2 * print radius {}",
                self.seed_spacing, self.print_radius
            )));
        }
        if !(0.0..=std::f64::consts::FRAC_PI_2).contains(&self.repulsion_angle) {
            return Err(ConfigError::InvalidConfig(format!(
                "repulsion angle {} must lie in [0, pi/2]",
                self.repulsion_angle
            )));
        }
        Ok(())
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_seed_spacing_below_twice_print_radius() {
        let err = FillingConfig::new(
            FillingMethod::Perimeter,
            0.0,
            8.0,
            4.0,
            7.0,
            0.0,
            0.0,
            0,
        );
        assert!(err.is_err());
    }

    #[test]
    fn accepts_boundary_seed_spacing() {
        let ok = FillingConfig::new(
            FillingMethod::Perimeter,
            0.0,
            8.0,
            4.0,
            8.0,
            0.0,
            0.0,
            0,
        );
        assert!(ok.is_ok());
    }

    #[test]
    fn filling_method_round_trips_through_display_and_from_str() {
        for m in [FillingMethod::Splay, FillingMethod::Perimeter, FillingMethod::Dual] {
            let parsed: FillingMethod = m.to_string().parse().unwrap();
            assert_eq!(parsed, m);
        }
    }
}
