//! Random instance generation.
//!
//! Points are drawn uniformly from `[0, grid_size) x [0, grid_size)` by a
//! seeded [`StdRng`], so a seed fully determines the instance.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::types::{PipelineError, Point};

/// Parameters for [`generate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Number of cities.
    pub count: usize,
    /// Side length of the square the cities are drawn from.
    pub grid_size: f64,
    /// RNG seed.
    pub seed: u64,
}

impl GeneratorConfig {
    /// Default number of cities.
    pub const DEFAULT_COUNT: usize = 10;

    /// Default side length of the sampling square.
    pub const DEFAULT_GRID_SIZE: f64 = 100.0;

    /// Default RNG seed.
    pub const DEFAULT_SEED: u64 = 42;

    /// Check that the parameters describe a non-empty sampling square
    /// and at least one city.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::InvalidConfig`] describing the first bad
    /// field.
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.count == 0 {
            return Err(PipelineError::InvalidConfig(
                "count must be at least 1".to_owned(),
            ));
        }
        if !self.grid_size.is_finite() || self.grid_size <= 0.0 {
            return Err(PipelineError::InvalidConfig(format!(
                "grid_size must be a positive finite number, got {}",
                self.grid_size
            )));
        }
        Ok(())
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            count: Self::DEFAULT_COUNT,
            grid_size: Self::DEFAULT_GRID_SIZE,
            seed: Self::DEFAULT_SEED,
        }
    }
}

/// Draw `config.count` uniformly random points.
///
/// # Errors
///
/// Returns [`PipelineError::InvalidConfig`] if `config` fails
/// [`GeneratorConfig::validate`].
pub fn generate(config: &GeneratorConfig) -> Result<Vec<Point>, PipelineError> {
    config.validate()?;

    let mut rng = StdRng::seed_from_u64(config.seed);
    let points: Vec<Point> = (0..config.count)
        .map(|_| {
            let x = rng.random_range(0.0..config.grid_size);
            let y = rng.random_range(0.0..config.grid_size);
            Point::new(x, y)
        })
        .collect();

    log::debug!(
        "generate: {} points in [0, {}) seed={}",
        points.len(),
        config.grid_size,
        config.seed
    );
    Ok(points)
}
