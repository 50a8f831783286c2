//! Recovery calculator: folds the selected effects over the base item formula and
//! converts the resulting fractions into amounts for the acting character and an ally.

use std::collections::BTreeSet;

use serde::Serialize;
use thiserror::Error;

use crate::data::Character;
use crate::recovery::effects::{RecoveryEffect, RecoveryFractions, RecoveryState, RuleContext};
use crate::recovery::trace::{percent_label, StepTrace};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalculationError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Base attributes of a character at the reference level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharacterStats {
    pub max_health: u32,
    pub max_focus: u32,
}

impl CharacterStats {
    pub const fn new(max_health: u32, max_focus: u32) -> Self {
        Self {
            max_health,
            max_focus,
        }
    }

    /// Placeholder ally used when no ally is selected; every ally output is zero.
    pub const fn zero() -> Self {
        Self::new(0, 0)
    }
}

impl From<&Character> for CharacterStats {
    fn from(character: &Character) -> Self {
        Self::new(character.max_health, character.max_focus)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationResult {
    pub self_health_amount: u32,
    pub self_focus_amount: u32,
    pub ally_health_amount: u32,
    pub ally_focus_amount: u32,
    pub self_health_percent: String,
    pub self_focus_percent: String,
    pub ally_health_percent: String,
    pub ally_focus_percent: String,
    pub fractions: RecoveryFractions,
    /// Recognised effect ids, in the order they were applied.
    pub applied_effects: Vec<u32>,
    pub steps: Vec<String>,
}

/// Recognised effects from a selection, deduplicated and in ascending id order.
/// Ids without a rule are dropped.
pub fn resolve_effects(selected: &[u32]) -> Vec<RecoveryEffect> {
    selected
        .iter()
        .filter_map(|&id| RecoveryEffect::from_id(id))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Compute recovery for `acting` (and optionally `ally`) under the selected effect ids.
///
/// Selection order does not matter: effects are always applied by ascending id,
/// because the shared-recovery and boost rules depend on whether slow recovery is
/// present and on what earlier ids already set.
pub fn calculate(
    acting: Option<CharacterStats>,
    ally: Option<CharacterStats>,
    selected: &[u32],
) -> Result<CalculationResult, CalculationError> {
    let acting = acting
        .ok_or_else(|| CalculationError::InvalidInput("acting character is required".into()))?;
    if acting.max_health == 0 {
        return Err(CalculationError::InvalidInput(
            "acting character max health must be positive".into(),
        ));
    }
    if ally.is_some_and(|a| a.max_health == 0) {
        return Err(CalculationError::InvalidInput(
            "ally character max health must be positive".into(),
        ));
    }
    let ally = ally.unwrap_or(CharacterStats::zero());

    let effects = resolve_effects(selected);
    let ctx = RuleContext {
        slow_recovery: effects.contains(&RecoveryEffect::SlowRecovery),
    };

    let mut trace = StepTrace::new();
    let baseline = RecoveryState::baseline();
    trace.push(format!(
        "Base: basic recovery item restores {} health",
        percent_label(baseline.fractions.self_health)
    ));

    let state = effects
        .iter()
        .fold(baseline, |state, effect| effect.apply(state, ctx, &mut trace));

    let result = assemble_result(acting, ally, &effects, state.fractions, trace);
    tracing::debug!(
        effects = ?result.applied_effects,
        self_health = result.self_health_amount,
        ally_health = result.ally_health_amount,
        "recovery calculated"
    );
    Ok(result)
}

fn amount(base: u32, fraction: f64) -> u32 {
    (f64::from(base) * fraction).floor() as u32
}

fn assemble_result(
    acting: CharacterStats,
    ally: CharacterStats,
    effects: &[RecoveryEffect],
    fractions: RecoveryFractions,
    mut trace: StepTrace,
) -> CalculationResult {
    let self_health_amount = amount(acting.max_health, fractions.self_health);
    let self_focus_amount = amount(acting.max_focus, fractions.self_focus);
    let ally_health_amount = amount(ally.max_health, fractions.ally_health);
    let ally_focus_amount = amount(ally.max_focus, fractions.ally_focus);

    let summary = [
        ("self health", fractions.self_health, self_health_amount),
        ("self focus", fractions.self_focus, self_focus_amount),
        ("ally health", fractions.ally_health, ally_health_amount),
        ("ally focus", fractions.ally_focus, ally_focus_amount),
    ];
    for (label, fraction, value) in summary {
        if fraction != 0.0 {
            trace.push(format!(
                "Result: {label} {} = {value}",
                percent_label(fraction)
            ));
        }
    }

    CalculationResult {
        self_health_amount,
        self_focus_amount,
        ally_health_amount,
        ally_focus_amount,
        self_health_percent: percent_label(fractions.self_health),
        self_focus_percent: percent_label(fractions.self_focus),
        ally_health_percent: percent_label(fractions.ally_health),
        ally_focus_percent: percent_label(fractions.ally_focus),
        fractions,
        applied_effects: effects.iter().map(|e| e.id()).collect(),
        steps: trace.into_lines(),
    }
}
