//! The square board of rotatable pipe tiles.
//!
//! Tiles are stored row-major. Row 0 is the top edge where sources pour in;
//! row `dim - 1` is the bottom edge that drains into the sinks.

use serde::{Deserialize, Serialize};

use crate::direction::{Direction, Rotation};
use crate::rng::SimRng;
use crate::tile::{PipeShape, Tile};

/// Errors from grid construction and tile access.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    #[error("grid dimension must be at least 1")]
    ZeroDimension,
    #[error("row {row} has {len} tiles, expected {dim}")]
    RaggedRow { row: usize, len: usize, dim: usize },
    #[error("cell ({x}, {y}) is outside a {dim}x{dim} grid")]
    OutOfBounds { x: usize, y: usize, dim: usize },
    #[error("shape distribution is empty")]
    EmptyDistribution,
    #[error("{len} tiles for a {dim}x{dim} grid")]
    TileCount { len: usize, dim: usize },
}

/// A fixed-size `dim x dim` grid of pipe tiles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipeGrid {
    dim: usize,
    tiles: Vec<Tile>,
}

impl PipeGrid {
    /// A grid with every tile set to `shape` at rotation zero.
    pub fn filled(dim: usize, shape: PipeShape) -> Result<Self, GridError> {
        if dim == 0 {
            return Err(GridError::ZeroDimension);
        }
        Ok(Self {
            dim,
            tiles: vec![Tile::new(shape, Rotation::None); dim * dim],
        })
    }

    /// Build a grid from rows of tiles, top row first.
    pub fn from_rows(rows: Vec<Vec<Tile>>) -> Result<Self, GridError> {
        let dim = rows.len();
        if dim == 0 {
            return Err(GridError::ZeroDimension);
        }
        let mut tiles = Vec::with_capacity(dim * dim);
        for (row, cells) in rows.into_iter().enumerate() {
            if cells.len() != dim {
                return Err(GridError::RaggedRow {
                    row,
                    len: cells.len(),
                    dim,
                });
            }
            tiles.extend(cells);
        }
        Ok(Self { dim, tiles })
    }

    /// Random layout: each tile draws its shape uniformly from
    /// `distribution` (repeat a shape to weight it) and a random rotation.
    pub fn generate(
        dim: usize,
        distribution: &[PipeShape],
        rng: &mut SimRng,
    ) -> Result<Self, GridError> {
        if dim == 0 {
            return Err(GridError::ZeroDimension);
        }
        if distribution.is_empty() {
            return Err(GridError::EmptyDistribution);
        }
        let tiles = (0..dim * dim)
            .map(|_| {
                let shape = distribution[rng.below(distribution.len() as u64) as usize];
                let rotation = Rotation::from_quarter_turns(rng.below(4) as u8);
                Tile::new(shape, rotation)
            })
            .collect();
        Ok(Self { dim, tiles })
    }

    /// Check the invariants the constructors establish. Needed for grids
    /// that arrive through deserialization.
    pub fn validate(&self) -> Result<(), GridError> {
        if self.dim == 0 {
            return Err(GridError::ZeroDimension);
        }
        if self.tiles.len() != self.dim * self.dim {
            return Err(GridError::TileCount {
                len: self.tiles.len(),
                dim: self.dim,
            });
        }
        Ok(())
    }

    /// Side length of the grid.
    pub fn dim(&self) -> usize {
        self.dim
    }

    fn index(&self, x: usize, y: usize) -> Option<usize> {
        (x < self.dim && y < self.dim).then(|| y * self.dim + x)
    }

    pub fn get(&self, x: usize, y: usize) -> Option<&Tile> {
        self.index(x, y).and_then(|i| self.tiles.get(i))
    }

    pub fn get_mut(&mut self, x: usize, y: usize) -> Option<&mut Tile> {
        let i = self.index(x, y)?;
        self.tiles.get_mut(i)
    }

    /// Turn the tile at `(x, y)` by `delta` quarter turns. Flow is not
    /// recomputed; the caller must solve again.
    pub fn rotate_tile(&mut self, x: usize, y: usize, delta: i32) -> Result<(), GridError> {
        let dim = self.dim;
        let tile = self
            .get_mut(x, y)
            .ok_or(GridError::OutOfBounds { x, y, dim })?;
        tile.rotate(delta);
        Ok(())
    }

    /// Neighbor of `(x, y)` across edge `dir`, if it lies on the grid.
    pub fn neighbor(&self, x: usize, y: usize, dir: Direction) -> Option<(usize, usize)> {
        let (dx, dy) = dir.offset();
        let nx = x.checked_add_signed(dx as isize)?;
        let ny = y.checked_add_signed(dy as isize)?;
        self.index(nx, ny).map(|_| (nx, ny))
    }

    /// Reset every tile's fill slots to unreached.
    pub fn clear_fill(&mut self) {
        for tile in &mut self.tiles {
            tile.clear_fill();
        }
    }

    /// Iterate tiles row-major with their coordinates.
    pub fn tiles(&self) -> impl Iterator<Item = ((usize, usize), &Tile)> {
        let dim = self.dim;
        self.tiles
            .iter()
            .enumerate()
            .map(move |(i, t)| ((i % dim, i / dim), t))
    }

    /// Tiles of one row, left to right.
    pub fn row(&self, y: usize) -> Option<&[Tile]> {
        if y >= self.dim {
            return None;
        }
        self.tiles.get(y * self.dim..(y + 1) * self.dim)
    }
}
