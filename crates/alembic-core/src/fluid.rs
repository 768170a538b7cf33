//! Fluid colors and the mixing rules applied as flows meet.
//!
//! The color space is closed: three primary essences, the three blends of
//! two different essences, a spoiled sludge, and the elixir that only a
//! balanced beaker of all three essences can show. Each color has a stable
//! numeric index (0..=7) used by tuning tables and snapshots.

use serde::{Deserialize, Serialize};

/// One of the three primary fluids a source can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Essence {
    Strength,
    Charisma,
    Sorcery,
}

impl Essence {
    /// All essences in index order.
    pub fn all() -> [Essence; 3] {
        [Essence::Strength, Essence::Charisma, Essence::Sorcery]
    }

    /// Numeric index (0..=2). Also the potency vector component this
    /// essence feeds.
    pub fn index(self) -> u8 {
        match self {
            Essence::Strength => 0,
            Essence::Charisma => 1,
            Essence::Sorcery => 2,
        }
    }

    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(Essence::Strength),
            1 => Some(Essence::Charisma),
            2 => Some(Essence::Sorcery),
            _ => None,
        }
    }
}

/// A mix of exactly two different essences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Blend {
    /// Strength + Charisma (index 3).
    Bloodlust,
    /// Charisma + Sorcery (index 4).
    Charm,
    /// Sorcery + Strength (index 5).
    Fire,
}

impl Blend {
    /// Blend of two essences, or `None` if they are the same essence.
    ///
    /// With `a = min`, `b = max` the blend index is `3 + (b - 1) * 2 - a`,
    /// which enumerates the pairs cyclically: {0,1} -> 3, {1,2} -> 4,
    /// {2,0} -> 5.
    pub fn of(x: Essence, y: Essence) -> Option<Self> {
        if x == y {
            return None;
        }
        let a = x.index().min(y.index());
        let b = x.index().max(y.index());
        match 3 + (b - 1) * 2 - a {
            3 => Some(Blend::Bloodlust),
            4 => Some(Blend::Charm),
            _ => Some(Blend::Fire),
        }
    }

    /// The two essences this blend is made of.
    pub fn components(self) -> [Essence; 2] {
        match self {
            Blend::Bloodlust => [Essence::Strength, Essence::Charisma],
            Blend::Charm => [Essence::Charisma, Essence::Sorcery],
            Blend::Fire => [Essence::Sorcery, Essence::Strength],
        }
    }

    /// Whether `essence` is already part of this blend.
    pub fn contains(self, essence: Essence) -> bool {
        self.components().contains(&essence)
    }

    pub fn index(self) -> u8 {
        match self {
            Blend::Bloodlust => 3,
            Blend::Charm => 4,
            Blend::Fire => 5,
        }
    }
}

/// The color of a fluid anywhere in the workshop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FluidColor {
    Primary(Essence),
    Secondary(Blend),
    /// Index 6: a blend met an unrelated essence. Also marks an exhausted
    /// source.
    Spoiled,
    /// Index 7: all three essences in balance. Never produced by pipe flow.
    Elixir,
}

/// Result of an essence arriving at an already-colored flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Absorb {
    /// The flow takes on this color (possibly unchanged) and keeps spreading.
    Become(FluidColor),
    /// The essence is already represented (or the flow is spoiled); the
    /// arrival contributes nothing and stops here.
    Cancel,
}

impl FluidColor {
    /// Number of distinct colors.
    pub const COUNT: usize = 8;

    pub const SPOILED_INDEX: u8 = 6;

    /// Stable numeric index (0..=7).
    pub fn index(self) -> u8 {
        match self {
            FluidColor::Primary(e) => e.index(),
            FluidColor::Secondary(b) => b.index(),
            FluidColor::Spoiled => 6,
            FluidColor::Elixir => 7,
        }
    }

    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            0..=2 => Essence::from_index(index).map(FluidColor::Primary),
            3 => Some(FluidColor::Secondary(Blend::Bloodlust)),
            4 => Some(FluidColor::Secondary(Blend::Charm)),
            5 => Some(FluidColor::Secondary(Blend::Fire)),
            6 => Some(FluidColor::Spoiled),
            7 => Some(FluidColor::Elixir),
            _ => None,
        }
    }

    /// All colors in index order.
    pub fn all() -> [FluidColor; Self::COUNT] {
        [
            FluidColor::Primary(Essence::Strength),
            FluidColor::Primary(Essence::Charisma),
            FluidColor::Primary(Essence::Sorcery),
            FluidColor::Secondary(Blend::Bloodlust),
            FluidColor::Secondary(Blend::Charm),
            FluidColor::Secondary(Blend::Fire),
            FluidColor::Spoiled,
            FluidColor::Elixir,
        ]
    }

    /// Lowercase name used in data files.
    pub fn name(self) -> &'static str {
        match self {
            FluidColor::Primary(Essence::Strength) => "strength",
            FluidColor::Primary(Essence::Charisma) => "charisma",
            FluidColor::Primary(Essence::Sorcery) => "sorcery",
            FluidColor::Secondary(Blend::Bloodlust) => "bloodlust",
            FluidColor::Secondary(Blend::Charm) => "charm",
            FluidColor::Secondary(Blend::Fire) => "fire",
            FluidColor::Spoiled => "spoiled",
            FluidColor::Elixir => "elixir",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::all().into_iter().find(|c| c.name() == name)
    }

    /// The essence, if this is a primary color.
    pub fn essence(self) -> Option<Essence> {
        match self {
            FluidColor::Primary(e) => Some(e),
            _ => None,
        }
    }

    /// How a flow of this color reacts to `incoming` arriving from another
    /// source. This is the directional rule the flow solver applies.
    pub fn absorb(self, incoming: Essence) -> Absorb {
        match self {
            FluidColor::Primary(existing) => match Blend::of(existing, incoming) {
                Some(blend) => Absorb::Become(FluidColor::Secondary(blend)),
                None => Absorb::Become(self),
            },
            FluidColor::Secondary(blend) if blend.contains(incoming) => Absorb::Cancel,
            FluidColor::Secondary(_) => Absorb::Become(FluidColor::Spoiled),
            FluidColor::Spoiled | FluidColor::Elixir => Absorb::Cancel,
        }
    }

    /// Symmetric mix of two colors.
    ///
    /// Identical colors are unchanged. Two different essences blend. A blend
    /// meeting one of its own essences stays the blend; anything else
    /// spoils.
    pub fn mix(self, other: FluidColor) -> FluidColor {
        use FluidColor::*;
        if self == other {
            return self;
        }
        match (self, other) {
            (Primary(a), Primary(b)) => Blend::of(a, b).map_or(Spoiled, Secondary),
            (Secondary(blend), Primary(e)) | (Primary(e), Secondary(blend)) => {
                if blend.contains(e) {
                    Secondary(blend)
                } else {
                    Spoiled
                }
            }
            _ => Spoiled,
        }
    }
}

impl From<Essence> for FluidColor {
    fn from(essence: Essence) -> Self {
        FluidColor::Primary(essence)
    }
}

impl From<Blend> for FluidColor {
    fn from(blend: Blend) -> Self {
        FluidColor::Secondary(blend)
    }
}
