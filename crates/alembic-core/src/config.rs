//! Game tuning: board size, brew table, layout distribution, and the
//! starting resources of a new game.

use serde::{Deserialize, Serialize};

use crate::brew::BrewTable;
use crate::tile::PipeShape;

/// Errors from validating a [`GameConfig`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("board dimension must be at least 1")]
    ZeroDimension,
    #[error("max potency must be at least 1")]
    ZeroMaxPotency,
    #[error("pipe distribution is empty")]
    EmptyDistribution,
    #[error("initial mulligans ({initial}) exceed the maximum ({max})")]
    MulliganOverflow { initial: u32, max: u32 },
    #[error("{counts} starting source counts for a {dim}-wide board")]
    TooManySources { counts: usize, dim: usize },
}

/// Complete tuning for one game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Side length of the board; also the number of sources and sinks.
    pub dim: usize,
    pub brew: BrewTable,
    /// Shapes drawn uniformly for each new tile. Repeat a shape to make it
    /// more common.
    pub distribution: Vec<PipeShape>,
    /// Remaining uses of the starting sources, one per essence in index
    /// order before shuffling.
    pub starting_counts: Vec<u32>,
    pub initial_mulligans: u32,
    pub max_mulligans: u32,
}

impl GameConfig {
    pub const DEFAULT_DIM: usize = 6;

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.dim == 0 {
            return Err(ConfigError::ZeroDimension);
        }
        if self.brew.max_potency == 0 {
            return Err(ConfigError::ZeroMaxPotency);
        }
        if self.distribution.is_empty() {
            return Err(ConfigError::EmptyDistribution);
        }
        if self.initial_mulligans > self.max_mulligans {
            return Err(ConfigError::MulliganOverflow {
                initial: self.initial_mulligans,
                max: self.max_mulligans,
            });
        }
        if self.starting_counts.len() > self.dim.min(3) {
            return Err(ConfigError::TooManySources {
                counts: self.starting_counts.len(),
                dim: self.dim,
            });
        }
        Ok(())
    }

    /// The shipped weighting: zigs most common, a single merge rarest.
    pub fn default_distribution() -> Vec<PipeShape> {
        use PipeShape::*;
        vec![
            Corner, Corner, Cross, Cross, Straight, Straight, Zig, Zig, Zig, T, T, Merge,
        ]
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            dim: Self::DEFAULT_DIM,
            brew: BrewTable::default(),
            distribution: Self::default_distribution(),
            starting_counts: vec![1, 2, 3],
            initial_mulligans: 2,
            max_mulligans: 3,
        }
    }
}
