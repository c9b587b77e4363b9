//! Limiter configuration

use crate::pruner::MaxInfluences;

/// Default tolerance for the weight-sum check on read
pub const DEFAULT_WEIGHT_TOLERANCE: f64 = 1e-3;

/// Settings for a limiter run
///
/// ```rust
/// use influence_limiter::{LimiterConfig, MaxInfluences};
///
/// let config = LimiterConfig::new()
///     .with_max_influences(MaxInfluences::new(4)?)
///     .with_weight_tolerance(1e-4);
/// assert_eq!(config.max_influences().get(), 4);
/// # Ok::<(), influence_limiter::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LimiterConfig {
    max_influences: MaxInfluences,
    weight_tolerance: f64,
    deduplicate_vertices: bool,
}

impl LimiterConfig {
    /// Defaults: cap of 1, tolerance of [`DEFAULT_WEIGHT_TOLERANCE`], deduplication on
    pub fn new() -> Self {
        Self {
            max_influences: MaxInfluences::default(),
            weight_tolerance: DEFAULT_WEIGHT_TOLERANCE,
            deduplicate_vertices: true,
        }
    }

    /// Set the maximum number of influences per vertex
    pub fn with_max_influences(mut self, max_influences: MaxInfluences) -> Self {
        self.max_influences = max_influences;
        self
    }

    /// Set how far a read weight table may stray from 1.0 before a warning
    ///
    /// Negative or non-finite values fall back to the default.
    pub fn with_weight_tolerance(mut self, tolerance: f64) -> Self {
        self.weight_tolerance = if tolerance.is_finite() && tolerance >= 0.0 {
            tolerance
        } else {
            DEFAULT_WEIGHT_TOLERANCE
        };
        self
    }

    /// Process a vertex named twice in one selection only once
    pub fn with_deduplication(mut self, enable: bool) -> Self {
        self.deduplicate_vertices = enable;
        self
    }

    /// The maximum number of influences per vertex
    pub fn max_influences(&self) -> MaxInfluences {
        self.max_influences
    }

    /// The weight-sum tolerance
    pub fn weight_tolerance(&self) -> f64 {
        self.weight_tolerance
    }

    /// Whether repeated vertices are skipped
    pub fn deduplicate_vertices(&self) -> bool {
        self.deduplicate_vertices
    }
}

impl Default for LimiterConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = LimiterConfig::default();
        assert_eq!(config.max_influences(), MaxInfluences::MIN);
        assert_eq!(config.weight_tolerance(), DEFAULT_WEIGHT_TOLERANCE);
        assert!(config.deduplicate_vertices());
    }

    #[test]
    fn test_invalid_tolerance_falls_back() {
        let config = LimiterConfig::new().with_weight_tolerance(-1.0);
        assert_eq!(config.weight_tolerance(), DEFAULT_WEIGHT_TOLERANCE);
        let config = config.with_weight_tolerance(f64::NAN);
        assert_eq!(config.weight_tolerance(), DEFAULT_WEIGHT_TOLERANCE);
    }
}
