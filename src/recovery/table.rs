//! Recovery table: the calculator evaluated for every character against every
//! combination of effects, for the notebook's reference tables and CSV export.

use std::io::Write;

use rayon::prelude::*;
use serde::Serialize;

use crate::data::Character;
use crate::recovery::effects::RecoveryEffect;
use crate::recovery::engine::{calculate, CharacterStats};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecoveryTableRow {
    pub character: String,
    pub effects: Vec<u32>,
    pub self_health: u32,
    pub self_health_percent: String,
    pub self_focus: u32,
    pub self_focus_percent: String,
}

/// Every subset of the known effect ids, ordered by bitmask (empty set first).
pub fn effect_combinations() -> Vec<Vec<u32>> {
    let count = RecoveryEffect::ALL.len();
    (0u32..(1 << count))
        .map(|mask| {
            RecoveryEffect::ALL
                .iter()
                .enumerate()
                .filter(|(bit, _)| mask & (1 << bit) != 0)
                .map(|(_, effect)| effect.id())
                .collect()
        })
        .collect()
}

/// Evaluate each character (with no ally) against each combination.
///
/// Characters are processed in parallel; rows keep catalog order, then combination order.
/// Characters the calculator rejects (zero max health) produce no rows.
pub fn build_recovery_table(
    characters: &[Character],
    combinations: &[Vec<u32>],
) -> Vec<RecoveryTableRow> {
    characters
        .par_iter()
        .map(|character| rows_for_character(character, combinations))
        .collect::<Vec<_>>()
        .into_iter()
        .flatten()
        .collect()
}

fn rows_for_character(character: &Character, combinations: &[Vec<u32>]) -> Vec<RecoveryTableRow> {
    let stats = CharacterStats::from(character);
    combinations
        .iter()
        .filter_map(|effects| {
            let result = match calculate(Some(stats), None, effects) {
                Ok(result) => result,
                Err(err) => {
                    tracing::warn!(character = %character.name, error = %err, "skipping table row");
                    return None;
                }
            };
            Some(RecoveryTableRow {
                character: character.name.clone(),
                effects: result.applied_effects,
                self_health: result.self_health_amount,
                self_health_percent: result.self_health_percent,
                self_focus: result.self_focus_amount,
                self_focus_percent: result.self_focus_percent,
            })
        })
        .collect()
}

fn effects_cell(effects: &[u32]) -> String {
    if effects.is_empty() {
        return "-".to_string();
    }
    effects
        .iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join("+")
}

/// Write rows as CSV with a header line.
pub fn write_table_csv<W: Write>(rows: &[RecoveryTableRow], writer: W) -> Result<(), csv::Error> {
    let mut out = csv::Writer::from_writer(writer);
    out.write_record([
        "character",
        "effects",
        "self_health",
        "self_health_percent",
        "self_focus",
        "self_focus_percent",
    ])?;
    for row in rows {
        out.write_record([
            row.character.clone(),
            effects_cell(&row.effects),
            row.self_health.to_string(),
            row.self_health_percent.clone(),
            row.self_focus.to_string(),
            row.self_focus_percent.clone(),
        ])?;
    }
    out.flush()?;
    Ok(())
}
