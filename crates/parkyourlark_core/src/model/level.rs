//! Level and level-space records.
//!
//! Serialized with PascalCase field names to match the request schema
//! (`{"Level": ..., "Space": ...}`).

use serde::{Deserialize, Serialize};

/// A named floor or tier of a parking facility.
///
/// Equality is strict identifier match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Level {
    pub id: String,
}

impl Level {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// Association of one space identifier with one level.
///
/// Duplicates are allowed: registering the same pair twice stores two rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LevelSpace {
    pub level: Level,
    pub space: String,
}

impl LevelSpace {
    pub fn new(level: Level, space: impl Into<String>) -> Self {
        Self {
            level,
            space: space.into(),
        }
    }

    /// Returns the id of the level this space belongs to.
    pub fn level_id(&self) -> &str {
        self.level.id.as_str()
    }
}
