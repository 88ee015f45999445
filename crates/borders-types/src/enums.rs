//! Enumeration types shared across the workspace.

use serde::{Deserialize, Serialize};

/// A world dimension that carries its own border instance.
///
/// Every dimension receives the same size and center; the Nether is not
/// scaled by the usual 8:1 coordinate ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    /// The main world. The initial spawn position always lives here.
    Overworld,
    /// The Nether.
    Nether,
    /// The End.
    End,
}

impl Dimension {
    /// All dimensions in sync order.
    pub const ALL: [Self; 3] = [Self::Overworld, Self::Nether, Self::End];
}

impl core::fmt::Display for Dimension {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Overworld => write!(f, "overworld"),
            Self::Nether => write!(f, "nether"),
            Self::End => write!(f, "end"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dimension_serde_uses_snake_case() {
        let json = serde_json::to_string(&Dimension::Overworld).ok();
        assert_eq!(json.as_deref(), Some("\"overworld\""));
    }

    #[test]
    fn overworld_syncs_first() {
        assert_eq!(Dimension::ALL.first(), Some(&Dimension::Overworld));
    }
}
