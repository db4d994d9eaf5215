use serde::{Deserialize, Serialize};

/// How a director discontinuity encountered mid-propagation is handled
/// (§4.G). `Stick` remembers the last continuous candidate and only falls
/// back to it if every subsequently-tried length is itself discontinuous.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum DiscontinuityPolicy {
    Ignore,
    Stick,
    Terminate,
}

/// Whether a zero-splay segment touching the domain boundary keeps its
/// boundary-adjacent nodes or collapses to its midpoint (§4.D).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum SplayLineBoundaryPolicy {
    Centres,
    Boundaries,
}

/// Output path ordering strategy (§4.J), a closed variant like
/// `FillingMethod` (§9 "Polymorphism over sorting strategy").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortingMethod {
    NearestNeighbour,
    SeedLineAware,
}

/// Filling-method policy flags threaded read-only through the engine (§3).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FillingFlags {
    pub vector_filling: bool,
    pub vector_sorting: bool,
    pub drop_isolated_points: bool,
    pub min_line_length_multiplier: f64,
    pub discontinuity_policy: DiscontinuityPolicy,
    pub discontinuity_angle_threshold_radians: f64,
    pub splay_line_policy: SplayLineBoundaryPolicy,
    pub sorting_method: SortingMethod,
}

impl Default for FillingFlags {
    fn default() -> Self {
        Self {
            vector_filling: true,
            vector_sorting: true,
            drop_isolated_points: true,
            min_line_length_multiplier: 1.0,
            discontinuity_policy: DiscontinuityPolicy::Stick,
            discontinuity_angle_threshold_radians: std::f64::consts::FRAC_PI_4,
            splay_line_policy: SplayLineBoundaryPolicy::Centres,
            sorting_method: SortingMethod::NearestNeighbour,
        }
    }
}

/// Weights and exponents of the disagreement functional (§4.H).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisagreementWeights {
    pub empty_spot_weight: f64,
    pub empty_spot_exponent: f64,
    pub overlap_weight: f64,
    pub overlap_exponent: f64,
    pub director_weight: f64,
    pub director_exponent: f64,
    pub path_weight: f64,
    pub path_exponent: f64,
}

impl Default for DisagreementWeights {
    fn default() -> Self {
        Self {
            empty_spot_weight: 1.0,
            empty_spot_exponent: 1.0,
            overlap_weight: 1.0,
            overlap_exponent: 1.0,
            director_weight: 1.0,
            director_exponent: 1.0,
            path_weight: 0.0,
            path_exponent: 1.0,
        }
    }
}

/// Which of the four dimensions the Bayesian driver is allowed to move
/// (§4.I).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimisedDimensions {
    pub repulsion_angle: bool,
    pub repulsion_magnitude: bool,
    pub seed_spacing: bool,
    pub termination_radius: bool,
}

impl Default for OptimisedDimensions {
    fn default() -> Self {
        Self {
            repulsion_angle: true,
            repulsion_magnitude: true,
            seed_spacing: true,
            termination_radius: true,
        }
    }
}

/// Bayesian-driver parameters (§4.I).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BayesianParameters {
    pub total_iterations: usize,
    pub improvement_iterations: usize,
    pub relearning_period: usize,
    pub noise: f64,
    pub optimised_dimensions: OptimisedDimensions,
}

impl Default for BayesianParameters {
    fn default() -> Self {
        Self {
            total_iterations: 200,
            improvement_iterations: 50,
            relearning_period: 20,
            noise: 1e-3,
            optimised_dimensions: OptimisedDimensions::default(),
        }
    }
}

/// Aggregation-over-seeds parameters (§4.H, §5).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregationParameters {
    pub worker_threads: usize,
    pub seeds_per_evaluation: usize,
    pub final_seeds: usize,
    pub percentile: f64,
    pub layer_count: usize,
}

impl Default for AggregationParameters {
    fn default() -> Self {
        Self {
            worker_threads: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
            seeds_per_evaluation: 8,
            final_seeds: 32,
            percentile: 0.5,
            layer_count: 1,
        }
    }
}

/// The full set of read-only simulation policy groups consumed by the
/// engine, the quantifier, and the Bayesian driver (§3). Threaded explicitly
/// through constructors instead of the process-wide config paths the
/// original reaches for (§9 "Global mutable state").
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub filling: FillingFlags,
    pub disagreement: DisagreementWeights,
    pub bayesian: BayesianParameters,
    pub aggregation: AggregationParameters,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            filling: FillingFlags::default(),
            disagreement: DisagreementWeights::default(),
            bayesian: BayesianParameters::default(),
            aggregation: AggregationParameters::default(),
        }
    }
}
