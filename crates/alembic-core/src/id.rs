use serde::{Deserialize, Serialize};

/// Identifies a source by its column. Ids are 1-based so that no valid id
/// is ever confused with "no source".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SourceId(pub u32);

impl SourceId {
    /// Id of the source feeding `column`.
    pub fn from_column(column: usize) -> Self {
        Self(column as u32 + 1)
    }

    /// Column this source sits above.
    pub fn column(self) -> usize {
        (self.0 as usize).saturating_sub(1)
    }
}
