//! Effect catalog: selectable recovery modifiers shown in the notebook.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::data::error::Result;
use crate::data::loader::load_document;

pub const EFFECTS_STEM: &str = "effects";

/// Display grouping for an effect. Not used by the calculator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectCategory {
    #[serde(rename = "base value")]
    BaseValue,
    #[serde(rename = "in-round stackable")]
    InRoundStackable,
    #[serde(rename = "out-of-round non-stackable")]
    OutOfRoundNonStackable,
    #[serde(rename = "in-round buff")]
    InRoundBuff,
}

impl EffectCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BaseValue => "base value",
            Self::InRoundStackable => "in-round stackable",
            Self::OutOfRoundNonStackable => "out-of-round non-stackable",
            Self::InRoundBuff => "in-round buff",
        }
    }
}

impl fmt::Display for EffectCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Effect {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub category: EffectCategory,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EffectCatalog {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_version: Option<String>,
    pub effects: Vec<Effect>,
}

impl EffectCatalog {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        load_document(path)
    }

    pub fn get(&self, id: u32) -> Option<&Effect> {
        self.effects.iter().find(|effect| effect.id == id)
    }

    /// The selected ids that exist in this catalog, in the caller's order.
    pub fn known_ids(&self, selected: &[u32]) -> Vec<u32> {
        selected
            .iter()
            .copied()
            .filter(|&id| self.get(id).is_some())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }
}
