//! Character catalog: health and focus pools at the reference level.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::data::error::Result;
use crate::data::loader::{load_document, normalize_lookup};

pub const CHARACTERS_STEM: &str = "characters";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Character {
    pub name: String,
    pub max_health: u32,
    #[serde(default)]
    pub max_focus: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CharacterCatalog {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_version: Option<String>,
    pub characters: Vec<Character>,
}

impl CharacterCatalog {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        load_document(path)
    }

    /// Find a character by name; case, spacing and underscores are ignored.
    pub fn find(&self, name: &str) -> Option<&Character> {
        let wanted = normalize_lookup(name);
        if wanted.is_empty() {
            return None;
        }
        self.characters
            .iter()
            .find(|character| normalize_lookup(&character.name) == wanted)
    }

    pub fn len(&self) -> usize {
        self.characters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }
}
