//! Fluid sources along the top edge of the board.

use serde::{Deserialize, Serialize};

use crate::fluid::{Essence, FluidColor};

/// A tap above one grid column. Pours only while `count > 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub color: FluidColor,
    /// Remaining brews this source can feed.
    pub count: u32,
}

impl Source {
    pub fn new(essence: Essence, count: u32) -> Self {
        Self {
            color: FluidColor::Primary(essence),
            count,
        }
    }

    pub fn is_active(&self) -> bool {
        self.count > 0
    }

    /// Whether the source is used up and waiting to be cleared.
    pub fn is_exhausted(&self) -> bool {
        self.count == 0
    }

    /// The essence this source pours, if it is pouring at all.
    pub fn active_essence(&self) -> Option<Essence> {
        if self.is_active() {
            self.color.essence()
        } else {
            None
        }
    }

    /// Consume one use. On reaching zero the color switches to
    /// [`FluidColor::Spoiled`] so the empty tap stays visible until the
    /// next clear. Returns `true` if this drain exhausted the source.
    pub fn drain(&mut self) -> bool {
        if self.count == 0 {
            return false;
        }
        self.count -= 1;
        if self.count == 0 {
            self.color = FluidColor::Spoiled;
            return true;
        }
        false
    }
}
