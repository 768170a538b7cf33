//! Pipe tiles: shapes, rotation, and per-subset fill state.
//!
//! Each shape has a canonical connectivity table listing one or two
//! *subsets* of mutually connected edges. Fluid entering a tile through an
//! edge spreads to every other edge of the same subset and nowhere else, so
//! `cross` and `zig` tiles can carry two unrelated flows at once.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::direction::{Direction, Rotation};
use crate::fluid::FluidColor;
use crate::id::SourceId;

use crate::direction::Direction::{Bottom, Left, Right, Top};

/// Number of fill slots on every tile. Single-subset shapes leave the
/// second slot unused.
pub const FILL_SLOTS: usize = 2;

// ---------------------------------------------------------------------------
// Shapes
// ---------------------------------------------------------------------------

/// The fixed set of pipe shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipeShape {
    Corner,
    Cross,
    Merge,
    Straight,
    T,
    Zig,
}

impl PipeShape {
    /// All shapes.
    pub fn all() -> [PipeShape; 6] {
        [
            PipeShape::Corner,
            PipeShape::Cross,
            PipeShape::Merge,
            PipeShape::Straight,
            PipeShape::T,
            PipeShape::Zig,
        ]
    }

    /// Canonical (unrotated) connectivity. Each inner slice is one subset;
    /// a direction appears in at most one subset per shape.
    pub fn subsets(self) -> &'static [&'static [Direction]] {
        match self {
            PipeShape::Corner => &[&[Top, Right]],
            PipeShape::Cross => &[&[Top, Bottom], &[Left, Right]],
            PipeShape::Merge => &[&[Top, Right, Bottom, Left]],
            PipeShape::Straight => &[&[Top, Bottom]],
            PipeShape::T => &[&[Top, Right, Bottom]],
            PipeShape::Zig => &[&[Top, Right], &[Left, Bottom]],
        }
    }

    /// Lowercase name used in data files.
    pub fn name(self) -> &'static str {
        match self {
            PipeShape::Corner => "corner",
            PipeShape::Cross => "cross",
            PipeShape::Merge => "merge",
            PipeShape::Straight => "straight",
            PipeShape::T => "t",
            PipeShape::Zig => "zig",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::all().into_iter().find(|s| s.name() == name)
    }
}

// ---------------------------------------------------------------------------
// Entry resolution
// ---------------------------------------------------------------------------

/// Which subset of a tile a flow joins, and where it can leave.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Entry {
    /// Index of the fill slot the flow belongs to.
    pub subset: usize,
    /// Grid-frame edge the flow arrived through.
    pub entered: Direction,
    connections: &'static [Direction],
    rotation: Rotation,
}

impl Entry {
    /// Every edge of the matched subset, in the grid frame. Includes the
    /// edge the flow entered through.
    pub fn exits(&self) -> impl DoubleEndedIterator<Item = Direction> + '_ {
        let rotation = self.rotation;
        self.connections.iter().map(move |d| d.rotated(rotation))
    }

    /// Edges the flow continues through: every exit except the one it
    /// arrived by.
    pub fn onward(&self) -> impl DoubleEndedIterator<Item = Direction> + '_ {
        let entered = self.entered;
        self.exits().filter(move |d| *d != entered)
    }
}

/// Resolve a flow arriving at `shape` (turned by `rotation`) through the
/// grid-frame edge `from`. Returns `None` when the shape has no connection
/// on that edge.
pub fn resolve_entry(shape: PipeShape, rotation: Rotation, from: Direction) -> Option<Entry> {
    let check = from.unrotated(rotation);
    let subsets = shape.subsets();
    let subset = subsets.iter().position(|set| set.contains(&check))?;
    Some(Entry {
        subset,
        entered: from,
        connections: subsets[subset],
        rotation,
    })
}

// ---------------------------------------------------------------------------
// Fill state
// ---------------------------------------------------------------------------

/// Flow state of one tile subset, recomputed on every solve.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FillSlot {
    /// Sources that reached this subset.
    pub contributors: BTreeSet<SourceId>,
    /// Mixed color, `None` while unreached.
    pub color: Option<FluidColor>,
    /// Smallest hop count from any source, `None` while unreached.
    pub distance: Option<u32>,
}

impl FillSlot {
    /// Whether any source reached this subset.
    pub fn is_reached(&self) -> bool {
        !self.contributors.is_empty()
    }

    pub fn clear(&mut self) {
        self.contributors.clear();
        self.color = None;
        self.distance = None;
    }
}

// ---------------------------------------------------------------------------
// Tile
// ---------------------------------------------------------------------------

/// One grid cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub shape: PipeShape,
    pub rotation: Rotation,
    /// Transient flow state; never persisted.
    #[serde(skip)]
    pub fill: [FillSlot; FILL_SLOTS],
}

impl Tile {
    pub fn new(shape: PipeShape, rotation: Rotation) -> Self {
        Self {
            shape,
            rotation,
            fill: Default::default(),
        }
    }

    /// Turn the tile by `delta` quarter turns (negative is counter-clockwise).
    /// Fill state is left untouched until the next solve.
    pub fn rotate(&mut self, delta: i32) {
        self.rotation = self.rotation.turned(delta);
    }

    pub fn resolve_entry(&self, from: Direction) -> Option<Entry> {
        resolve_entry(self.shape, self.rotation, from)
    }

    /// Number of independent subsets this tile's shape routes.
    pub fn subset_count(&self) -> usize {
        self.shape.subsets().len()
    }

    pub fn slot(&self, subset: usize) -> &FillSlot {
        &self.fill[subset]
    }

    /// Subsets currently carrying fluid.
    pub fn lit_subsets(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.subset_count()).filter(|&i| self.fill[i].is_reached())
    }

    pub fn clear_fill(&mut self) {
        for slot in &mut self.fill {
            slot.clear();
        }
    }
}
