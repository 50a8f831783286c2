pub mod effects;
pub mod engine;
pub mod table;
pub mod trace;

pub use effects::{
    RecoveryEffect, RecoveryFractions, RecoveryState, RuleContext, BASE_HEALTH_FRACTION,
    BOOST_MULTIPLIER, MAX_FRACTION,
};
pub use engine::{calculate, resolve_effects, CalculationError, CalculationResult, CharacterStats};
pub use table::{build_recovery_table, effect_combinations, write_table_csv, RecoveryTableRow};
pub use trace::{percent_label, StepTrace};
