//! Edge directions and quarter-turn rotations on the pipe grid.
//!
//! Directions are numbered clockwise from the top edge (`Top = 0` through
//! `Left = 3`). A [`Rotation`] is applied additively modulo 4, so rotating a
//! tile by one quarter turn maps its canonical `Top` connection to `Right`.

use serde::{Deserialize, Serialize};

/// One of the four edges of a grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Direction {
    Top,
    Right,
    Bottom,
    Left,
}

impl Direction {
    /// All four directions in clockwise order starting at `Top`.
    pub fn all() -> [Direction; 4] {
        [
            Direction::Top,
            Direction::Right,
            Direction::Bottom,
            Direction::Left,
        ]
    }

    /// Numeric index (0..=3, clockwise from `Top`).
    pub fn index(self) -> u8 {
        match self {
            Direction::Top => 0,
            Direction::Right => 1,
            Direction::Bottom => 2,
            Direction::Left => 3,
        }
    }

    /// Direction for an index, wrapping modulo 4.
    pub fn from_index(index: u8) -> Self {
        match index % 4 {
            0 => Direction::Top,
            1 => Direction::Right,
            2 => Direction::Bottom,
            _ => Direction::Left,
        }
    }

    /// Cell offset `(dx, dy)` of the neighbor across this edge. `y` grows
    /// downward, so `Top` is `(0, -1)`.
    pub fn offset(self) -> (i32, i32) {
        match self {
            Direction::Top => (0, -1),
            Direction::Right => (1, 0),
            Direction::Bottom => (0, 1),
            Direction::Left => (-1, 0),
        }
    }

    /// The edge facing this one from the neighboring cell.
    pub fn opposite(self) -> Self {
        Self::from_index(self.index() + 2)
    }

    /// Rotate from a tile's canonical frame into the grid frame.
    pub fn rotated(self, rotation: Rotation) -> Self {
        Self::from_index(self.index() + rotation.quarter_turns())
    }

    /// Rotate from the grid frame back into a tile's canonical frame.
    pub fn unrotated(self, rotation: Rotation) -> Self {
        Self::from_index(self.index() + 4 - rotation.quarter_turns())
    }
}

/// Clockwise rotation of a tile in quarter turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Rotation {
    /// No rotation.
    #[default]
    None,
    /// 90 degrees clockwise.
    Cw90,
    /// 180 degrees.
    Cw180,
    /// 270 degrees clockwise (90 degrees counter-clockwise).
    Cw270,
}

impl Rotation {
    /// All four rotation values.
    pub fn all() -> [Rotation; 4] {
        [
            Rotation::None,
            Rotation::Cw90,
            Rotation::Cw180,
            Rotation::Cw270,
        ]
    }

    /// Number of clockwise quarter turns (0..=3).
    pub fn quarter_turns(self) -> u8 {
        match self {
            Rotation::None => 0,
            Rotation::Cw90 => 1,
            Rotation::Cw180 => 2,
            Rotation::Cw270 => 3,
        }
    }

    /// Rotation for a quarter-turn count, wrapping modulo 4.
    pub fn from_quarter_turns(turns: u8) -> Self {
        match turns % 4 {
            0 => Rotation::None,
            1 => Rotation::Cw90,
            2 => Rotation::Cw180,
            _ => Rotation::Cw270,
        }
    }

    /// Apply a signed number of quarter turns. Negative values turn
    /// counter-clockwise.
    pub fn turned(self, delta: i32) -> Self {
        let turns = (self.quarter_turns() as i32 + delta).rem_euclid(4);
        Self::from_quarter_turns(turns as u8)
    }

    /// Rotate 90 degrees clockwise.
    pub fn rotate_cw(self) -> Self {
        self.turned(1)
    }

    /// Rotate 90 degrees counter-clockwise.
    pub fn rotate_ccw(self) -> Self {
        self.turned(-1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposite_pairs() {
        assert_eq!(Direction::Top.opposite(), Direction::Bottom);
        assert_eq!(Direction::Right.opposite(), Direction::Left);
        assert_eq!(Direction::Bottom.opposite(), Direction::Top);
        assert_eq!(Direction::Left.opposite(), Direction::Right);
    }

    #[test]
    fn offsets_match_screen_axes() {
        assert_eq!(Direction::Top.offset(), (0, -1));
        assert_eq!(Direction::Right.offset(), (1, 0));
        assert_eq!(Direction::Bottom.offset(), (0, 1));
        assert_eq!(Direction::Left.offset(), (-1, 0));
    }

    #[test]
    fn rotate_then_unrotate_is_identity() {
        for dir in Direction::all() {
            for rot in Rotation::all() {
                assert_eq!(dir.rotated(rot).unrotated(rot), dir);
            }
        }
    }

    #[test]
    fn unrotate_matches_modular_formula() {
        // check = (from - rot + 4) % 4
        for dir in Direction::all() {
            for rot in Rotation::all() {
                let expected = (dir.index() + 4 - rot.quarter_turns()) % 4;
                assert_eq!(dir.unrotated(rot).index(), expected);
            }
        }
    }

    #[test]
    fn turned_wraps_both_ways() {
        assert_eq!(Rotation::None.turned(-1), Rotation::Cw270);
        assert_eq!(Rotation::Cw270.turned(1), Rotation::None);
        assert_eq!(Rotation::Cw90.turned(6), Rotation::Cw270);
        assert_eq!(Rotation::Cw180.turned(-9), Rotation::Cw90);
    }

    #[test]
    fn cw_and_ccw_are_inverse() {
        for rot in Rotation::all() {
            assert_eq!(rot.rotate_cw().rotate_ccw(), rot);
        }
    }
}
