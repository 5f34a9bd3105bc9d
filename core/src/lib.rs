//! Deterministic cell/cache model for a browser geolocation collectible
//! game: continuous coordinates canonicalize into a stable grid of discrete
//! cells, caches seed their coins reproducibly from the cell coordinates,
//! and only mutated cache state is ever persisted — everything else
//! regenerates on demand.

use serde::{Deserialize, Serialize};

pub use board::*;
pub use cache::*;
pub use coin::*;
pub use error::*;
pub use luck::*;
pub use momento::*;
pub use session::*;
pub use types::*;

mod board;
mod cache;
mod coin;
mod error;
mod luck;
mod momento;
mod session;
mod types;

/// Tuning knobs for a play session.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Size of one cell in coordinate degrees.
    pub tile_width: f64,
    /// Number of cells enumerated in each direction around the player.
    pub visibility_radius: u32,
    /// Fraction of cells that spawn a cache, in `[0, 1]`.
    pub spawn_probability: f64,
}

impl GameConfig {
    pub const fn new_unchecked(
        tile_width: f64,
        visibility_radius: u32,
        spawn_probability: f64,
    ) -> Self {
        Self {
            tile_width,
            visibility_radius,
            spawn_probability,
        }
    }

    pub fn new(tile_width: f64, visibility_radius: u32, spawn_probability: f64) -> Result<Self> {
        if !tile_width.is_finite() || tile_width <= 0.0 {
            return Err(GameError::InvalidTileWidth);
        }
        Ok(Self::new_unchecked(
            tile_width,
            visibility_radius,
            spawn_probability.clamp(0.0, 1.0),
        ))
    }
}

impl Default for GameConfig {
    /// One tile is 1e-4 degrees and one cell in ten spawns a cache.
    fn default() -> Self {
        Self::new_unchecked(1e-4, 8, 0.1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_clamps_spawn_probability() {
        let config = GameConfig::new(1e-4, 4, 3.0).unwrap();
        assert_eq!(config.spawn_probability, 1.0);

        let config = GameConfig::new(1e-4, 4, -0.5).unwrap();
        assert_eq!(config.spawn_probability, 0.0);
    }

    #[test]
    fn config_rejects_bad_tile_width() {
        assert!(matches!(
            GameConfig::new(f64::INFINITY, 4, 0.1),
            Err(GameError::InvalidTileWidth)
        ));
    }
}
