use std::collections::HashSet;
use std::fmt;

use crate::data::character::CharacterCatalog;
use crate::data::effect::EffectCatalog;
use crate::data::loader::normalize_lookup;
use crate::recovery::RecoveryEffect;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ValidationSeverity {
    Error,
    Warning,
    Info,
}

impl ValidationSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

impl fmt::Display for ValidationSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationDiagnostic {
    pub severity: ValidationSeverity,
    pub context: String,
    pub message: String,
}

impl fmt::Display for ValidationDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.context, self.message)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub diagnostics: Vec<ValidationDiagnostic>,
}

impl ValidationReport {
    pub fn push(
        &mut self,
        severity: ValidationSeverity,
        context: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.diagnostics.push(ValidationDiagnostic {
            severity,
            context: context.into(),
            message: message.into(),
        });
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|diag| diag.severity == ValidationSeverity::Error)
    }

    pub fn count(&self, severity: ValidationSeverity) -> usize {
        self.diagnostics
            .iter()
            .filter(|diag| diag.severity == severity)
            .count()
    }
}

/// Check both catalogs for problems the calculator or the notebook would trip over.
pub fn validate_catalogs(effects: &EffectCatalog, characters: &CharacterCatalog) -> ValidationReport {
    let mut report = ValidationReport::default();
    validate_effects(&mut report, effects);
    validate_characters(&mut report, characters);
    report
}

fn validate_effects(report: &mut ValidationReport, catalog: &EffectCatalog) {
    let mut seen_ids = HashSet::new();

    for (index, effect) in catalog.effects.iter().enumerate() {
        let context = format!("effects[{index}] id={}", effect.id);
        if !seen_ids.insert(effect.id) {
            report.push(
                ValidationSeverity::Error,
                context.clone(),
                format!("duplicate id {}", effect.id),
            );
        }
        if effect.name.trim().is_empty() {
            report.push(
                ValidationSeverity::Error,
                format!("{context}.name"),
                "missing non-empty 'name'",
            );
        }
        if RecoveryEffect::from_id(effect.id).is_none() {
            report.push(
                ValidationSeverity::Warning,
                context,
                "no recovery rule for this id; selecting it has no effect",
            );
        }
    }

    for rule in RecoveryEffect::ALL {
        if !seen_ids.contains(&rule.id()) {
            report.push(
                ValidationSeverity::Warning,
                "effects",
                format!("recovery rule {} ({}) has no catalog entry", rule.id(), rule.label()),
            );
        }
    }
}

fn validate_characters(report: &mut ValidationReport, catalog: &CharacterCatalog) {
    let mut seen_names = HashSet::new();

    for (index, character) in catalog.characters.iter().enumerate() {
        let context = format!("characters[{index}]");
        let key = normalize_lookup(&character.name);
        if key.is_empty() {
            report.push(
                ValidationSeverity::Error,
                format!("{context}.name"),
                "missing non-empty 'name'",
            );
        } else if !seen_names.insert(key) {
            report.push(
                ValidationSeverity::Error,
                format!("{context}.name"),
                format!("duplicate name '{}'", character.name),
            );
        }
        if character.max_health == 0 {
            report.push(
                ValidationSeverity::Error,
                format!("{context}.maxHealth"),
                "max health must be positive",
            );
        }
        if character.max_focus == 0 {
            report.push(
                ValidationSeverity::Info,
                format!("{context}.maxFocus"),
                "no focus pool; focus recovery is always 0",
            );
        }
    }
}
