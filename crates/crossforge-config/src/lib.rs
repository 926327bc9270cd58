//! Configuration system for CrossForge.
//!
//! Load solver configuration from TOML or YAML files to control termination,
//! model strengthening and search without code changes.
//!
//! # Examples
//!
//! Load configuration from TOML string:
//!
//! ```
//! use crossforge_config::{SearchStrategy, SolverConfig};
//! use std::time::Duration;
//!
//! let config = SolverConfig::from_toml_str(r#"
//!     [termination]
//!     seconds_spent_limit = 30
//!
//!     [model]
//!     adjacent_pair_table = true
//!
//!     [search]
//!     strategy = "median"
//!     [search.restarts]
//!     enabled = true
//!     base_fail_limit = 200
//! "#).unwrap();
//!
//! assert_eq!(config.time_limit(), Some(Duration::from_secs(30)));
//! assert_eq!(config.search.strategy, SearchStrategy::Median);
//! assert!(config.model.reduction_rule_1);
//! ```
//!
//! Use default config when file is missing:
//!
//! ```
//! use crossforge_config::SolverConfig;
//!
//! let config = SolverConfig::load("crossforge.toml").unwrap_or_default();
//! // Proceeds with defaults if file doesn't exist
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main solver configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SolverConfig {
    /// Environment mode affecting reproducibility and assertions.
    #[serde(default)]
    pub environment_mode: EnvironmentMode,

    /// Random seed for reproducible results.
    #[serde(default)]
    pub random_seed: Option<u64>,

    /// Termination configuration.
    #[serde(default)]
    pub termination: Option<TerminationConfig>,

    /// Model construction switches.
    #[serde(default)]
    pub model: ModelConfig,

    /// Search configuration.
    #[serde(default)]
    pub search: SearchConfig,
}

impl SolverConfig {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a file, choosing YAML for `.yaml`/`.yml`
    /// extensions and TOML otherwise.
    ///
    /// # Errors
    ///
    /// Returns error if file doesn't exist or contains invalid content.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml_file(path),
            _ => Self::from_toml_file(path),
        }
    }

    /// Loads configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Loads configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Parses configuration from a YAML string.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(s)?)
    }

    /// Sets the termination time limit.
    pub fn with_termination_seconds(mut self, seconds: u64) -> Self {
        self.termination = Some(TerminationConfig {
            seconds_spent_limit: Some(seconds),
            ..self.termination.unwrap_or_default()
        });
        self
    }

    /// Stops after the given number of improving solutions.
    pub fn with_solution_limit(mut self, count: u64) -> Self {
        self.termination = Some(TerminationConfig {
            solution_count_limit: Some(count),
            ..self.termination.unwrap_or_default()
        });
        self
    }

    /// Sets the random seed.
    pub fn with_random_seed(mut self, seed: u64) -> Self {
        self.random_seed = Some(seed);
        self
    }

    pub fn with_environment_mode(mut self, mode: EnvironmentMode) -> Self {
        self.environment_mode = mode;
        self
    }

    pub fn with_search_strategy(mut self, strategy: SearchStrategy) -> Self {
        self.search.strategy = strategy;
        self
    }

    pub fn with_model(mut self, model: ModelConfig) -> Self {
        self.model = model;
        self
    }

    pub fn with_restarts(mut self, restarts: RestartConfig) -> Self {
        self.search.restarts = restarts;
        self
    }

    /// Enables or disables the heuristic warm start.
    pub fn with_heuristic_warm_start(mut self, enabled: bool) -> Self {
        self.search.heuristic_warm_start = enabled;
        self
    }

    /// Returns the termination time limit, if configured.
    ///
    /// Convenience method that delegates to `termination.time_limit()`.
    ///
    /// # Examples
    ///
    /// ```
    /// use crossforge_config::SolverConfig;
    /// use std::time::Duration;
    ///
    /// let config = SolverConfig::from_toml_str(r#"
    ///     [termination]
    ///     seconds_spent_limit = 2
    ///     millis_spent_limit = 500
    /// "#).unwrap();
    ///
    /// assert_eq!(config.time_limit(), Some(Duration::from_millis(2500)));
    /// ```
    pub fn time_limit(&self) -> Option<Duration> {
        self.termination.as_ref().and_then(|t| t.time_limit())
    }

    /// Seed to use for tie-breaking, if the run must be reproducible.
    pub fn effective_seed(&self) -> Option<u64> {
        match (self.random_seed, self.environment_mode) {
            (Some(seed), _) => Some(seed),
            (None, EnvironmentMode::NonReproducible) => None,
            (None, _) => Some(DEFAULT_SEED),
        }
    }

    /// Checks values that deserialize fine but cannot drive a solve.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let restarts = &self.search.restarts;
        if restarts.enabled {
            if restarts.base_fail_limit == 0 {
                return Err(ConfigError::Invalid(
                    "search.restarts.base_fail_limit must be positive".to_string(),
                ));
            }
            if restarts.growth.is_nan() || restarts.growth <= 1.0 {
                return Err(ConfigError::Invalid(format!(
                    "search.restarts.growth must be greater than 1, got {}",
                    restarts.growth
                )));
            }
        }
        if let Some(termination) = &self.termination {
            if termination.solution_count_limit == Some(0) {
                return Err(ConfigError::Invalid(
                    "termination.solution_count_limit must be positive".to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// Seed used by reproducible modes when none is configured.
pub const DEFAULT_SEED: u64 = 0x5EED;

/// Environment mode affecting solver behavior.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EnvironmentMode {
    /// Non-reproducible mode with minimal overhead.
    #[default]
    NonReproducible,

    /// Reproducible mode with deterministic behavior.
    Reproducible,

    /// Recounts the crossings of every improving solution.
    FastAssert,

    /// Also checks every propagator's entailment on each solution.
    FullAssert,
}

impl EnvironmentMode {
    pub fn is_asserted(self) -> bool {
        matches!(self, Self::FastAssert | Self::FullAssert)
    }
}

/// Termination configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct TerminationConfig {
    /// Maximum seconds to spend solving.
    pub seconds_spent_limit: Option<u64>,

    /// Maximum milliseconds to spend solving, added to the seconds limit.
    pub millis_spent_limit: Option<u64>,

    /// Maximum number of improving solutions.
    pub solution_count_limit: Option<u64>,

    /// Maximum number of search nodes.
    pub node_count_limit: Option<u64>,

    /// Maximum number of failed nodes.
    pub fail_count_limit: Option<u64>,
}

impl TerminationConfig {
    /// Returns the time limit as a Duration, if any.
    pub fn time_limit(&self) -> Option<Duration> {
        let millis =
            self.seconds_spent_limit.unwrap_or(0) * 1000 + self.millis_spent_limit.unwrap_or(0);
        if millis > 0 {
            Some(Duration::from_millis(millis))
        } else {
            None
        }
    }
}

/// Model construction switches.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct ModelConfig {
    /// Order pairs where one direction costs nothing and the other does.
    pub reduction_rule_1: bool,

    /// Order twin vertices by index.
    pub reduction_rule_2: bool,

    /// Order degree-2 pairs whose crossing counts are {1, 2}.
    pub reduction_rule_3: bool,

    /// Restrict neighbors in the permutation to their preferred order.
    pub adjacent_pair_table: bool,

    /// Propagate the assignment-based objective lower bound.
    pub lower_bound: bool,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            reduction_rule_1: true,
            reduction_rule_2: true,
            reduction_rule_3: true,
            adjacent_pair_table: false,
            lower_bound: true,
        }
    }
}

impl ModelConfig {
    /// All reduction rules and strengthening disabled.
    pub fn bare() -> Self {
        Self {
            reduction_rule_1: false,
            reduction_rule_2: false,
            reduction_rule_3: false,
            adjacent_pair_table: false,
            lower_bound: false,
        }
    }

    /// Decodes a bit mask: bit 0..2 rules 1..3, bit 3 the adjacent pair
    /// table, bit 4 the lower bound.
    ///
    /// ```
    /// use crossforge_config::ModelConfig;
    ///
    /// let model = ModelConfig::from_mask(0b10101);
    /// assert!(model.reduction_rule_1);
    /// assert!(!model.reduction_rule_2);
    /// assert!(model.reduction_rule_3);
    /// assert!(!model.adjacent_pair_table);
    /// assert!(model.lower_bound);
    /// ```
    pub fn from_mask(mask: u32) -> Self {
        Self {
            reduction_rule_1: mask & 1 != 0,
            reduction_rule_2: mask & 2 != 0,
            reduction_rule_3: mask & 4 != 0,
            adjacent_pair_table: mask & 8 != 0,
            lower_bound: mask & 16 != 0,
        }
    }

    /// Number of distinct masks accepted by [`from_mask`](Self::from_mask).
    pub const MASK_COUNT: u32 = 32;
}

/// Search strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchStrategy {
    /// Weighted degree over positions, smallest value first.
    #[default]
    Default,

    /// Weighted degree, values closest to the median order first.
    Median,

    /// Weighted degree, values closest to the barycenter order first.
    Barycenter,
}

impl SearchStrategy {
    pub const ALL: [SearchStrategy; 3] = [Self::Default, Self::Median, Self::Barycenter];
}

impl std::fmt::Display for SearchStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchStrategy::Default => write!(f, "default"),
            SearchStrategy::Median => write!(f, "median"),
            SearchStrategy::Barycenter => write!(f, "barycenter"),
        }
    }
}

impl std::str::FromStr for SearchStrategy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "default" => Ok(Self::Default),
            "median" => Ok(Self::Median),
            "barycenter" => Ok(Self::Barycenter),
            other => Err(ConfigError::Invalid(format!(
                "unknown search strategy '{}'",
                other
            ))),
        }
    }
}

/// Search configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct SearchConfig {
    pub strategy: SearchStrategy,

    pub restarts: RestartConfig,

    /// Seed the search with the median/barycenter heuristic solution.
    pub heuristic_warm_start: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            strategy: SearchStrategy::Default,
            restarts: RestartConfig::default(),
            heuristic_warm_start: true,
        }
    }
}

/// Geometric restart policy with no-good recording.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct RestartConfig {
    pub enabled: bool,

    /// Failures allowed before the first restart.
    pub base_fail_limit: u64,

    /// Factor applied to the fail limit after each restart.
    pub growth: f64,
}

impl Default for RestartConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            base_fail_limit: 100,
            growth: 1.5,
        }
    }
}

impl RestartConfig {
    pub fn geometric(base_fail_limit: u64, growth: f64) -> Self {
        Self {
            enabled: true,
            base_fail_limit,
            growth,
        }
    }

    /// Fail limit of the `index`-th run (0-based).
    pub fn fail_limit(&self, index: u32) -> u64 {
        let limit = self.base_fail_limit as f64 * self.growth.powi(index as i32);
        if limit >= u64::MAX as f64 {
            u64::MAX
        } else {
            limit.ceil() as u64
        }
    }
}
