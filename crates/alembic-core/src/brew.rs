//! Brewing: reading what reaches the sinks and applying it.
//!
//! After a solve, each bottom-row tile is asked what would leave through its
//! bottom edge. A brew then adds the color's output vector to that sink's
//! potency, clamps it, and drains every source that contributed to any
//! brewed sink exactly once, regardless of how many sinks it fed.
//!
//! Brewing does not solve. Callers solve once, read [`compute_brew_outputs`],
//! and apply [`resolve_brew`] once; applying twice re-applies the deltas.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::direction::Direction;
use crate::fluid::{Blend, Essence, FluidColor};
use crate::grid::PipeGrid;
use crate::id::SourceId;
use crate::source::Source;

// ---------------------------------------------------------------------------
// Potency
// ---------------------------------------------------------------------------

/// Per-essence strength of a sink's contents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Potency(pub [u32; 3]);

impl Potency {
    pub const ZERO: Potency = Potency([0; 3]);

    pub fn get(&self, essence: Essence) -> u32 {
        self.0[essence.index() as usize]
    }

    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|v| *v == 0)
    }

    /// Add a signed delta per component, clamping each to `[0, max]`.
    pub fn apply(self, delta: [i32; 3], max: u32) -> Potency {
        let mut out = [0u32; 3];
        for (i, slot) in out.iter_mut().enumerate() {
            let v = self.0[i] as i64 + delta[i] as i64;
            *slot = v.clamp(0, max as i64) as u32;
        }
        Potency(out)
    }
}

// ---------------------------------------------------------------------------
// Brew table
// ---------------------------------------------------------------------------

/// Output vector per fluid color plus the potency cap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrewTable {
    /// Indexed by [`FluidColor::index`].
    pub outputs: [[i32; 3]; FluidColor::COUNT],
    pub max_potency: u32,
}

impl BrewTable {
    pub const DEFAULT_MAX_POTENCY: u32 = 16;

    pub fn output(&self, color: FluidColor) -> [i32; 3] {
        self.outputs[color.index() as usize]
    }
}

impl Default for BrewTable {
    fn default() -> Self {
        Self {
            outputs: [
                [2, 0, -1],
                [-1, 2, 0],
                [0, -1, 2],
                [2, 2, -1],
                [-1, 2, 2],
                [2, -1, 2],
                [-1, -1, -1],
                // The elixir never leaves a pipe.
                [0, 0, 0],
            ],
            max_potency: Self::DEFAULT_MAX_POTENCY,
        }
    }
}

// ---------------------------------------------------------------------------
// Sinks and brew records
// ---------------------------------------------------------------------------

/// A beaker under one grid column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sink {
    pub potency: Potency,
}

/// What a sink would receive if brewed now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrewRecord {
    pub color: FluidColor,
    pub sources: BTreeSet<SourceId>,
}

/// Something that happened during a brew, for the host's effects layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrewEvent {
    SinkBrewed {
        sink: usize,
        color: FluidColor,
        before: Potency,
        after: Potency,
    },
    SourceDrained {
        column: usize,
        remaining: u32,
    },
    /// Emitted after the `SourceDrained` that took the count to zero.
    SourceExhausted {
        column: usize,
    },
}

/// Result of applying a brew.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BrewSummary {
    /// Sinks that received output.
    pub brewed: usize,
    /// Every source that fed at least one brewed sink.
    pub used: BTreeSet<SourceId>,
    pub events: Vec<BrewEvent>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BrewError {
    #[error("{outputs} brew outputs but only {sinks} sinks")]
    SinkCountMismatch { outputs: usize, sinks: usize },
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

/// What each sink column would brew from the grid's current fill state.
///
/// Entry `i` is `None` when the bottom tile of column `i` has no bottom
/// edge or nothing reaches the subset that owns it.
pub fn compute_brew_outputs(grid: &PipeGrid) -> Vec<Option<BrewRecord>> {
    let Some(bottom) = grid.dim().checked_sub(1).and_then(|y| grid.row(y)) else {
        return Vec::new();
    };
    bottom
        .iter()
        .map(|tile| {
            let entry = tile.resolve_entry(Direction::Bottom)?;
            let slot = tile.slot(entry.subset);
            if !slot.is_reached() {
                return None;
            }
            slot.color.map(|color| BrewRecord {
                color,
                sources: slot.contributors.clone(),
            })
        })
        .collect()
}

/// Apply brew outputs to the sinks and drain the contributing sources.
pub fn resolve_brew(
    outputs: &[Option<BrewRecord>],
    sinks: &mut [Sink],
    sources: &mut [Option<Source>],
    table: &BrewTable,
) -> Result<BrewSummary, BrewError> {
    if outputs.len() > sinks.len() {
        return Err(BrewError::SinkCountMismatch {
            outputs: outputs.len(),
            sinks: sinks.len(),
        });
    }

    let mut summary = BrewSummary::default();

    for (i, record) in outputs.iter().enumerate() {
        let Some(record) = record else {
            continue;
        };
        let sink = &mut sinks[i];
        let before = sink.potency;
        let after = before.apply(table.output(record.color), table.max_potency);
        sink.potency = after;
        summary.brewed += 1;
        summary.used.extend(record.sources.iter().copied());
        summary.events.push(BrewEvent::SinkBrewed {
            sink: i,
            color: record.color,
            before,
            after,
        });
    }

    for id in &summary.used {
        let column = id.column();
        let Some(Some(source)) = sources.get_mut(column) else {
            log::warn!("brew used {id:?} but column {column} has no source");
            continue;
        };
        let exhausted = source.drain();
        summary.events.push(BrewEvent::SourceDrained {
            column,
            remaining: source.count,
        });
        if exhausted {
            summary.events.push(BrewEvent::SourceExhausted { column });
        }
    }

    log::debug!(
        "brewed {} sinks from {} sources",
        summary.brewed,
        summary.used.len()
    );
    Ok(summary)
}

/// Potency every sink would have after brewing `outputs`. Nothing is
/// mutated. Sinks without output keep their current potency.
pub fn preview_brew(outputs: &[Option<BrewRecord>], sinks: &[Sink], table: &BrewTable) -> Vec<Potency> {
    sinks
        .iter()
        .enumerate()
        .map(|(i, sink)| match outputs.get(i) {
            Some(Some(record)) => sink
                .potency
                .apply(table.output(record.color), table.max_potency),
            _ => sink.potency,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Beaker classification
// ---------------------------------------------------------------------------

fn much_greater(a: u32, b: u32) -> bool {
    a.saturating_sub(b) >= 3 || a >= b.saturating_mul(2)
}

/// The color a beaker shows for `potency`.
///
/// `max_size` caps how many essences may combine: 1 shows only the
/// strongest essence, 2 allows a blend, 3 allows the elixir. Returns `None`
/// for an empty beaker.
pub fn beaker_color(potency: Potency, max_size: usize) -> Option<FluidColor> {
    let v = potency.0;
    let mut order = [0usize, 1, 2];
    order.sort_by(|&a, &b| v[b].cmp(&v[a]));
    let [first, second, third] = order;

    if v[first] == 0 {
        return None;
    }
    let top = Essence::from_index(first as u8)?;
    if max_size <= 1 || v[second] == 0 || much_greater(v[first], v[second]) {
        return Some(FluidColor::Primary(top));
    }
    if max_size == 2 || v[third] == 0 || much_greater(v[second], v[third]) {
        let next = Essence::from_index(second as u8)?;
        return Some(Blend::of(top, next).map_or(FluidColor::Primary(top), FluidColor::Secondary));
    }
    Some(FluidColor::Elixir)
}
