//! The closed set of recovery-modifying effects and the rule each one applies.
//!
//! Effects are identified in the catalog by ids 1 through 6. Each id maps to exactly
//! one [RecoveryEffect] variant; ids outside that range have no rule and are skipped
//! by the engine.

use crate::recovery::trace::{percent_label, StepTrace};

/// Default amount restored by the basic health-recovery item.
pub const BASE_HEALTH_FRACTION: f64 = 0.6;
/// Self focus restored by [RecoveryEffect::FocusRestore].
pub const FOCUS_RESTORE_FRACTION: f64 = 0.3;
/// Self health left after [RecoveryEffect::SharedRecovery] splits the item with an ally.
pub const SHARED_SELF_HEALTH_FRACTION: f64 = 0.5;
pub const SHARED_ALLY_HEALTH_FRACTION: f64 = 0.3;
pub const SHARED_ALLY_FOCUS_FRACTION: f64 = 0.15;
/// Multiplier applied by each "+20% recovery amount" effect.
pub const BOOST_MULTIPLIER: f64 = 1.2;
pub const SLOW_IMMEDIATE_FRACTION: f64 = 0.10;
/// 81 ticks of 1% each.
pub const SLOW_SUSTAINED_TICKS: u32 = 81;
pub const SLOW_SUSTAINED_FRACTION: f64 = 0.81;
pub const ALLY_SLOW_IMMEDIATE_FRACTION: f64 = 0.05;
/// 41 ticks of 1% each.
pub const ALLY_SLOW_SUSTAINED_TICKS: u32 = 41;
/// Immediate 5% plus 41 ticks of 1%, kept as a single literal so amounts floor cleanly.
pub const ALLY_SLOW_TOTAL_FRACTION: f64 = 0.46;
pub const MAX_FRACTION: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RecoveryEffect {
    /// id 1
    FocusRestore,
    /// id 2
    SharedRecovery,
    /// id 3
    BoostFirst,
    /// id 4
    BoostSecond,
    /// id 5
    BoostThird,
    /// id 6
    SlowRecovery,
}

impl RecoveryEffect {
    /// Every effect, in processing (ascending id) order.
    pub const ALL: [RecoveryEffect; 6] = [
        Self::FocusRestore,
        Self::SharedRecovery,
        Self::BoostFirst,
        Self::BoostSecond,
        Self::BoostThird,
        Self::SlowRecovery,
    ];

    pub const fn id(self) -> u32 {
        match self {
            Self::FocusRestore => 1,
            Self::SharedRecovery => 2,
            Self::BoostFirst => 3,
            Self::BoostSecond => 4,
            Self::BoostThird => 5,
            Self::SlowRecovery => 6,
        }
    }

    pub const fn from_id(id: u32) -> Option<Self> {
        match id {
            1 => Some(Self::FocusRestore),
            2 => Some(Self::SharedRecovery),
            3 => Some(Self::BoostFirst),
            4 => Some(Self::BoostSecond),
            5 => Some(Self::BoostThird),
            6 => Some(Self::SlowRecovery),
            _ => None,
        }
    }

    /// Label used in trace lines.
    pub const fn label(self) -> &'static str {
        match self {
            Self::FocusRestore => "Focus Restore",
            Self::SharedRecovery => "Shared Recovery",
            Self::BoostFirst => "Recovery Boost I",
            Self::BoostSecond => "Recovery Boost II",
            Self::BoostThird => "Recovery Boost III",
            Self::SlowRecovery => "Slow Recovery",
        }
    }

    /// Apply this effect's rule to `state`, appending what changed to `trace`.
    pub fn apply(self, state: RecoveryState, ctx: RuleContext, trace: &mut StepTrace) -> RecoveryState {
        match self {
            Self::FocusRestore => apply_focus_restore(self, state, trace),
            Self::SharedRecovery => apply_shared_recovery(self, state, ctx, trace),
            Self::BoostFirst | Self::BoostSecond | Self::BoostThird => {
                apply_boost(self, state, ctx, trace)
            }
            Self::SlowRecovery => apply_slow_recovery(self, state, trace),
        }
    }
}

/// The four recovery fractions, each in [0, 1].
#[derive(Debug, Clone, Copy, Default, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecoveryFractions {
    pub self_health: f64,
    pub self_focus: f64,
    pub ally_health: f64,
    pub ally_focus: f64,
}

/// Accumulator threaded through the rule fold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecoveryState {
    pub fractions: RecoveryFractions,
    /// Boosts held back for the immediate part of slow recovery.
    pub immediate_boost_count: u32,
}

impl RecoveryState {
    pub const fn baseline() -> Self {
        Self {
            fractions: RecoveryFractions {
                self_health: BASE_HEALTH_FRACTION,
                self_focus: 0.0,
                ally_health: 0.0,
                ally_focus: 0.0,
            },
            immediate_boost_count: 0,
        }
    }
}

/// Facts about the whole selection that individual rules branch on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RuleContext {
    pub slow_recovery: bool,
}

fn apply_focus_restore(
    effect: RecoveryEffect,
    mut state: RecoveryState,
    trace: &mut StepTrace,
) -> RecoveryState {
    state.fractions.self_focus = FOCUS_RESTORE_FRACTION;
    trace.push(format!(
        "{}: self focus set to {}",
        effect.label(),
        percent_label(state.fractions.self_focus)
    ));
    state
}

fn apply_shared_recovery(
    effect: RecoveryEffect,
    mut state: RecoveryState,
    ctx: RuleContext,
    trace: &mut StepTrace,
) -> RecoveryState {
    state.fractions.ally_health = SHARED_ALLY_HEALTH_FRACTION;
    if ctx.slow_recovery {
        trace.push(format!(
            "{}: ally health set to {} (self health left to slow recovery)",
            effect.label(),
            percent_label(state.fractions.ally_health)
        ));
    } else {
        state.fractions.self_health = SHARED_SELF_HEALTH_FRACTION;
        trace.push(format!(
            "{}: self health set to {}, ally health set to {}",
            effect.label(),
            percent_label(state.fractions.self_health),
            percent_label(state.fractions.ally_health)
        ));
    }

    if state.fractions.self_focus != 0.0 {
        state.fractions.ally_focus = SHARED_ALLY_FOCUS_FRACTION;
        trace.push(format!(
            "{}: self focus active, ally focus set to {}",
            effect.label(),
            percent_label(state.fractions.ally_focus)
        ));
    }
    state
}

fn apply_boost(
    effect: RecoveryEffect,
    mut state: RecoveryState,
    ctx: RuleContext,
    trace: &mut StepTrace,
) -> RecoveryState {
    if ctx.slow_recovery {
        state.immediate_boost_count += 1;
        trace.push(format!(
            "{}: held for slow recovery immediate part (stack {})",
            effect.label(),
            state.immediate_boost_count
        ));
        return state;
    }

    let boosted = state.fractions.self_health * BOOST_MULTIPLIER;
    state.fractions.self_health = boosted.min(MAX_FRACTION);
    let capped = if boosted > MAX_FRACTION { " (capped)" } else { "" };
    trace.push(format!(
        "{}: self health x{BOOST_MULTIPLIER} -> {}{capped}",
        effect.label(),
        percent_label(state.fractions.self_health)
    ));
    state
}

fn apply_slow_recovery(
    effect: RecoveryEffect,
    mut state: RecoveryState,
    trace: &mut StepTrace,
) -> RecoveryState {
    let boost = BOOST_MULTIPLIER.powi(state.immediate_boost_count as i32);
    let immediate = (SLOW_IMMEDIATE_FRACTION * boost).min(MAX_FRACTION);
    state.fractions.self_health = (immediate + SLOW_SUSTAINED_FRACTION).min(MAX_FRACTION);
    trace.push(format!(
        "{}: immediate {} + sustained {} ({SLOW_SUSTAINED_TICKS} ticks of 1%) -> self health {}",
        effect.label(),
        percent_label(immediate),
        percent_label(SLOW_SUSTAINED_FRACTION),
        percent_label(state.fractions.self_health)
    ));

    if state.fractions.ally_health != 0.0 {
        state.fractions.ally_health = ALLY_SLOW_TOTAL_FRACTION;
        trace.push(format!(
            "{}: ally immediate {} + sustained {ALLY_SLOW_SUSTAINED_TICKS} ticks of 1% -> ally health {}",
            effect.label(),
            percent_label(ALLY_SLOW_IMMEDIATE_FRACTION),
            percent_label(state.fractions.ally_health)
        ));
    }
    state
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_round_trip_for_every_effect() {
        for effect in RecoveryEffect::ALL {
            assert_eq!(RecoveryEffect::from_id(effect.id()), Some(effect));
        }
        assert_eq!(RecoveryEffect::from_id(0), None);
        assert_eq!(RecoveryEffect::from_id(7), None);
    }

    #[test]
    fn all_is_sorted_by_id() {
        let ids: Vec<u32> = RecoveryEffect::ALL.iter().map(|e| e.id()).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn boost_under_slow_recovery_only_counts() {
        let mut trace = StepTrace::default();
        let ctx = RuleContext { slow_recovery: true };
        let out = RecoveryEffect::BoostFirst.apply(RecoveryState::baseline(), ctx, &mut trace);
        assert_eq!(out.fractions.self_health, BASE_HEALTH_FRACTION);
        assert_eq!(out.immediate_boost_count, 1);
        assert_eq!(trace.len(), 1);
    }

    #[test]
    fn boost_clamps_to_full_health() {
        let mut trace = StepTrace::default();
        let mut state = RecoveryState::baseline();
        state.fractions.self_health = 0.9;
        let out = RecoveryEffect::BoostThird.apply(state, RuleContext::default(), &mut trace);
        assert_eq!(out.fractions.self_health, 1.0);
        assert!(trace.lines()[0].ends_with("(capped)"));
    }

    #[test]
    fn slow_recovery_leaves_unshared_ally_alone() {
        let mut trace = StepTrace::default();
        let ctx = RuleContext { slow_recovery: true };
        let out = RecoveryEffect::SlowRecovery.apply(RecoveryState::baseline(), ctx, &mut trace);
        assert_eq!(out.fractions.ally_health, 0.0);
        assert_eq!(trace.len(), 1);
    }
}
