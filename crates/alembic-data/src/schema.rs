//! Serde structs for the tuning file.
//!
//! Every field is optional; anything left out keeps the shipped tuning.
//! Shapes and colors are referenced by name and resolved by the loader.

use alembic_core::config::GameConfig;
use alembic_core::tile::PipeShape;
use serde::Deserialize;

/// Top-level tuning file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TuningData {
    pub dim: usize,
    pub max_potency: u32,
    pub initial_mulligans: u32,
    pub max_mulligans: u32,
    pub starting_counts: Vec<u32>,
    /// Replaces the whole layout distribution when present.
    pub distribution: Vec<ShapeWeightData>,
    /// Per-color overrides of the brew table. Colors not listed keep their
    /// shipped output.
    pub brew: Vec<BrewOutputData>,
}

/// How often a shape is drawn relative to the others.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ShapeWeightData {
    pub shape: String,
    #[serde(default = "default_weight")]
    pub weight: u32,
}

fn default_weight() -> u32 {
    1
}

/// Potency delta a color applies to a sink.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BrewOutputData {
    pub color: String,
    pub output: [i32; 3],
}

impl Default for TuningData {
    fn default() -> Self {
        let config = GameConfig::default();
        Self {
            dim: config.dim,
            max_potency: config.brew.max_potency,
            initial_mulligans: config.initial_mulligans,
            max_mulligans: config.max_mulligans,
            starting_counts: config.starting_counts,
            distribution: weights_of(&config.distribution),
            brew: Vec::new(),
        }
    }
}

/// Collapse runs of equal shapes into weighted entries.
fn weights_of(distribution: &[PipeShape]) -> Vec<ShapeWeightData> {
    let mut out: Vec<ShapeWeightData> = Vec::new();
    for shape in distribution {
        match out.last_mut() {
            Some(last) if last.shape == shape.name() => last.weight += 1,
            _ => out.push(ShapeWeightData {
                shape: shape.name().to_string(),
                weight: 1,
            }),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_weights_match_shipped_distribution() {
        let data = TuningData::default();
        let weights: Vec<(&str, u32)> = data
            .distribution
            .iter()
            .map(|w| (w.shape.as_str(), w.weight))
            .collect();
        assert_eq!(
            weights,
            vec![
                ("corner", 2),
                ("cross", 2),
                ("straight", 2),
                ("zig", 3),
                ("t", 2),
                ("merge", 1),
            ]
        );
    }

    #[test]
    fn weight_defaults_to_one() {
        let w: ShapeWeightData = serde_json::from_str(r#"{"shape": "cross"}"#).unwrap();
        assert_eq!(w.weight, 1);
    }
}
