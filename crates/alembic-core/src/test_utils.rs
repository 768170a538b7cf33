//! Shared test helpers for unit tests, integration tests, and benchmarks.
//!
//! Gated behind `#[cfg(any(test, feature = "test-utils"))]` so these helpers
//! are available in unit tests, integration tests, and benchmarks (via the
//! `test-utils` feature).

use crate::direction::Rotation;
use crate::fluid::{Blend, Essence, FluidColor};
use crate::grid::PipeGrid;
use crate::id::SourceId;
use crate::rng::SimRng;
use crate::source::Source;
use crate::tile::{PipeShape, Tile};

// ===========================================================================
// Colors
// ===========================================================================

pub fn strength() -> FluidColor {
    FluidColor::Primary(Essence::Strength)
}
pub fn charisma() -> FluidColor {
    FluidColor::Primary(Essence::Charisma)
}
pub fn sorcery() -> FluidColor {
    FluidColor::Primary(Essence::Sorcery)
}
pub fn bloodlust() -> FluidColor {
    FluidColor::Secondary(Blend::Bloodlust)
}
pub fn charm() -> FluidColor {
    FluidColor::Secondary(Blend::Charm)
}
pub fn fire() -> FluidColor {
    FluidColor::Secondary(Blend::Fire)
}

// ===========================================================================
// Tiles and grids
// ===========================================================================

pub fn tile(shape: PipeShape, turns: u8) -> Tile {
    Tile::new(shape, Rotation::from_quarter_turns(turns))
}

/// Build a grid from compact row strings, top row first.
///
/// Each cell is a shape letter followed by a rotation digit:
/// `c` corner, `x` cross, `m` merge, `s` straight, `t` t, `z` zig.
/// For example `"s0 c1 z0"`.
///
/// # Panics
///
/// Panics on malformed cells or ragged rows.
pub fn grid_from(rows: &[&str]) -> PipeGrid {
    let rows = rows
        .iter()
        .map(|row| row.split_whitespace().map(parse_cell).collect())
        .collect();
    PipeGrid::from_rows(rows).expect("test grid must be square")
}

fn parse_cell(cell: &str) -> Tile {
    let mut chars = cell.chars();
    let shape = match chars.next() {
        Some('c') => PipeShape::Corner,
        Some('x') => PipeShape::Cross,
        Some('m') => PipeShape::Merge,
        Some('s') => PipeShape::Straight,
        Some('t') => PipeShape::T,
        Some('z') => PipeShape::Zig,
        other => panic!("unknown shape letter {other:?} in {cell:?}"),
    };
    let turns = chars
        .next()
        .and_then(|c| c.to_digit(10))
        .unwrap_or_else(|| panic!("missing rotation digit in {cell:?}"));
    tile(shape, turns as u8)
}

/// A random `dim x dim` grid using every shape with equal weight.
pub fn random_grid(dim: usize, seed: u64) -> PipeGrid {
    PipeGrid::generate(dim, &PipeShape::all(), &mut SimRng::new(seed))
        .expect("non-zero dimension")
}

// ===========================================================================
// Sources
// ===========================================================================

pub fn source(essence: Essence, count: u32) -> Option<Source> {
    Some(Source::new(essence, count))
}

/// `dim` empty source slots with the given columns filled.
pub fn sources_at(dim: usize, filled: &[(usize, Essence, u32)]) -> Vec<Option<Source>> {
    let mut out = vec![None; dim];
    for &(column, essence, count) in filled {
        out[column] = source(essence, count);
    }
    out
}

pub fn ids(columns: &[usize]) -> std::collections::BTreeSet<SourceId> {
    columns.iter().copied().map(SourceId::from_column).collect()
}
