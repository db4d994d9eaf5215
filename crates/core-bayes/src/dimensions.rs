use core_config::{FillingConfig, OptimisedDimensions};

/// Which `FillingConfig` field a dimension writes back to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DimensionKind {
    RepulsionMagnitude,
    RepulsionAngle,
    SeedSpacing,
    TerminationRadius,
}

#[derive(Debug, Clone, Copy)]
pub struct Dimension {
    pub kind: DimensionKind,
    pub bounds: (f64, f64),
    pub guesses: (f64, f64),
}

/// The four optimisable dimensions' brackets and fixed initial guesses
/// (§4.I). `print_radius` parameterises `seed_spacing` and
/// `termination_radius`'s brackets.
fn all_dimensions(print_radius: f64) -> [Dimension; 4] {
    [
        Dimension {
            kind: DimensionKind::RepulsionMagnitude,
            bounds: (0.0, 2.0),
            guesses: (0.0, 0.25),
        },
        Dimension {
            kind: DimensionKind::RepulsionAngle,
            bounds: (0.0, std::f64::consts::FRAC_PI_2),
            guesses: (0.0, std::f64::consts::FRAC_PI_2),
        },
        Dimension {
            kind: DimensionKind::SeedSpacing,
            // Lower bound pinned to the `FillingConfig` invariant
            // (`seed_spacing >= 2 * print_radius`, core-config::filling): a
            // bracket reaching below it would let the optimiser propose a
            // point `FillingConfig::validate` rejects outright, aborting the
            // whole search instead of just scoring that point badly.
            bounds: (2.0 * print_radius, 3.0 * print_radius),
            guesses: (2.0 * print_radius, 2.0 * print_radius + 1.0),
        },
        Dimension {
            kind: DimensionKind::TerminationRadius,
            bounds: (0.0, print_radius + 1.0),
            guesses: (0.0, (print_radius - 1.0).max(0.0)),
        },
    ]
}

/// Selects the dimensions enabled by `flags`, in a fixed canonical order.
pub fn selected_dimensions(flags: &OptimisedDimensions, print_radius: f64) -> Vec<Dimension> {
    all_dimensions(print_radius)
        .into_iter()
        .filter(|d| match d.kind {
            DimensionKind::RepulsionMagnitude => flags.repulsion_magnitude,
            DimensionKind::RepulsionAngle => flags.repulsion_angle,
            DimensionKind::SeedSpacing => flags.seed_spacing,
            DimensionKind::TerminationRadius => flags.termination_radius,
        })
        .collect()
}

pub fn bounds_of(dimensions: &[Dimension]) -> Vec<(f64, f64)> {
    dimensions.iter().map(|d| d.bounds).collect()
}

/// The cartesian product of every selected dimension's two fixed guesses
/// (§4.I step 2), in the same dimension order as `dimensions`.
pub fn guess_grid(dimensions: &[Dimension]) -> Vec<Vec<f64>> {
    let mut grid = vec![Vec::new()];
    for dim in dimensions {
        let mut next = Vec::with_capacity(grid.len() * 2);
        for point in &grid {
            for guess in [dim.guesses.0, dim.guesses.1] {
                let mut extended = point.clone();
                extended.push(guess);
                next.push(extended);
            }
        }
        grid = next;
    }
    grid
}

/// Writes `point` (one value per dimension, same order as `dimensions`)
/// onto a copy of `template`.
pub fn apply_point(template: &FillingConfig, dimensions: &[Dimension], point: &[f64]) -> FillingConfig {
    let mut config = *template;
    for (dim, &value) in dimensions.iter().zip(point) {
        match dim.kind {
            DimensionKind::RepulsionMagnitude => config.repulsion_magnitude = value,
            DimensionKind::RepulsionAngle => config.repulsion_angle = value,
            DimensionKind::SeedSpacing => config.seed_spacing = value,
            DimensionKind::TerminationRadius => config.termination_radius = value,
        }
    }
    config
}
