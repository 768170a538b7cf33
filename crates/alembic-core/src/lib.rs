//! Alembic Core -- flow propagation and brew resolution for a pipe-rotation
//! potion game.
//!
//! A square board of rotatable pipe tiles sits between a row of essence
//! sources above it and a row of sinks below it. Each source pours its
//! essence into the top of its column; the flow follows connected pipe
//! edges, blending when two essences meet and spoiling when a third
//! arrives. At the end of a day every sink brews whatever color reaches
//! the bottom of its column, shifting its potency vector, and the sources
//! that fed it are drained.
//!
//! # Day Cycle
//!
//! [`state::GameState`] owns one game and sequences it:
//!
//! 1. **Rotate** -- the player turns tiles; [`state::GameState::solve`]
//!    recomputes the flow to show the result.
//! 2. **Solve** -- [`flow::FlowSolver`] clears the board and walks each
//!    active source depth-first, recording color, contributors, and hop
//!    distance per tile subset.
//! 3. **Brew** -- [`brew::compute_brew_outputs`] reads the bottom row and
//!    [`brew::resolve_brew`] applies the brew table and drains sources.
//! 4. **New day** -- a fresh layout is generated and a mulligan granted.
//!
//! # Key Types
//!
//! - [`tile::PipeShape`] -- The six pipe shapes and their static
//!   connectivity tables.
//! - [`grid::PipeGrid`] -- Row-major square board of [`tile::Tile`]s.
//! - [`fluid::FluidColor`] -- Closed set of fluid colors and the mixing
//!   rules between them.
//! - [`brew::BrewTable`] -- Per-color potency deltas and the potency cap.
//! - [`config::GameConfig`] -- Board size, brew table, layout distribution,
//!   and starting resources.
//! - [`serialize`] -- Versioned snapshots via bitcode and FNV state hashing.

pub mod brew;
pub mod config;
pub mod direction;
pub mod flow;
pub mod fluid;
pub mod grid;
pub mod id;
pub mod rng;
pub mod serialize;
pub mod source;
pub mod state;
pub mod tile;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
