use std::path::Path;

use core_config::{FillingConfig, FillingMethod};

use crate::error::IoError;

struct RawConfig {
    seeding_method: FillingMethod,
    termination_radius: f64,
    step_length: f64,
    print_radius: f64,
    seed_spacing: Option<f64>,
    repulsion_magnitude: f64,
    repulsion_angle: f64,
    seeds: Vec<u64>,
}

impl Default for RawConfig {
    fn default() -> Self {
        Self {
            seeding_method: FillingMethod::Splay,
            termination_radius: 5.0,
            step_length: 10.0,
            print_radius: 5.0,
            seed_spacing: None,
            repulsion_magnitude: 0.0,
            repulsion_angle: 0.0,
            seeds: Vec::new(),
        }
    }
}

fn parse_into(field: &mut f64, value: &str, key: &str) {
    match value.parse::<f64>() {
        Ok(v) => *field = v,
        Err(_) => tracing::warn!(key, value, "malformed config value, keeping default"),
    }
}

/// Reads a `config.txt`-style `Key Value...` file into one `FillingConfig`
/// per listed `Seed`, defaulting to a single seed-0 config if none is
/// listed. Unrecognised keys are logged and skipped rather than treated as
/// fatal. `RepulsionRadius` is a recognised key, accepted and discarded
/// without a warning — the engine this format came from never consumed it.
pub fn read_filling_configs(path: &Path) -> Result<Vec<FillingConfig>, IoError> {
    let text = std::fs::read_to_string(path).map_err(|e| IoError::Read { path: path.to_path_buf(), source: e })?;
    let mut raw = RawConfig::default();

    for line in text.lines() {
        let line = line.trim_end_matches('\r');
        let mut tokens = line.split_whitespace();
        let Some(key) = tokens.next() else { continue };
        let values: Vec<&str> = tokens.collect();
        if values.is_empty() {
            continue;
        }

        match key {
            "InitialSeedingMethod" => match values[0].parse() {
                Ok(method) => raw.seeding_method = method,
                Err(error) => tracing::warn!(%error, key, "unrecognised config value, keeping default"),
            },
            "TerminationRadius" => match values[0].parse::<f64>() {
                Ok(v) => raw.termination_radius = if v > 0.0 { v } else { 0.0 },
                Err(_) => tracing::warn!(key, value = values[0], "malformed config value, keeping default"),
            },
            "StepLength" => parse_into(&mut raw.step_length, values[0], key),
            "PrintRadius" => parse_into(&mut raw.print_radius, values[0], key),
            "Repulsion" => parse_into(&mut raw.repulsion_magnitude, values[0], key),
            "RepulsionAngle" => parse_into(&mut raw.repulsion_angle, values[0], key),
            "SeedSpacing" => {
                let mut v = raw.seed_spacing.unwrap_or(0.0);
                parse_into(&mut v, values[0], key);
                raw.seed_spacing = Some(v);
            }
            "Seed" => {
                for token in &values {
                    match token.parse::<u64>() {
                        Ok(seed) => raw.seeds.push(seed),
                        Err(_) => tracing::warn!(key, value = *token, "malformed seed value, skipping"),
                    }
                }
            }
            "RepulsionRadius" => {}
            other => tracing::warn!(key = other, "unrecognised configuration key, skipping"),
        }
    }

    let seed_spacing = raw.seed_spacing.unwrap_or(2.0 * raw.print_radius);
    if raw.seeds.is_empty() {
        raw.seeds.push(0);
    }

    raw.seeds
        .iter()
        .map(|&seed| {
            FillingConfig::new(
                raw.seeding_method,
                raw.termination_radius,
                raw.step_length,
                raw.print_radius,
                seed_spacing,
                raw.repulsion_magnitude,
                raw.repulsion_angle,
                seed,
            )
            .map_err(IoError::from)
        })
        .collect()
}

/// Writes the winning `FillingConfig`(s) back in the same `Key Value` shape
/// `config.txt` is read in, including an inert `RepulsionRadius` line for
/// round-trip parity with files this format was read from.
pub fn write_filling_config(configs: &[FillingConfig], path: &Path) -> Result<(), IoError> {
    let template = configs.first().ok_or(IoError::EmptyTable)?;
    let mut out = String::new();
    out.push_str(&format!("InitialSeedingMethod {}\n", template.seeding_method));
    out.push_str(&format!("TerminationRadius {}\n", template.termination_radius));
    out.push_str(&format!("SeedSpacing {}\n", template.seed_spacing));
    out.push_str(&format!("Repulsion {}\n", template.repulsion_magnitude));
    out.push_str("RepulsionRadius 0\n");
    out.push_str(&format!("RepulsionAngle {}\n", template.repulsion_angle));
    out.push_str(&format!("StepLength {}\n", template.step_length));
    out.push_str(&format!("PrintRadius {}\n", template.print_radius));
    out.push_str("Seed");
    for config in configs {
        out.push_str(&format!(" {}", config.seed));
    }
    out.push('\n');
    std::fs::write(path, out).map_err(|e| IoError::Write { path: path.to_path_buf(), source: e })
}
