/// Append-only list of human-readable calculation steps.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepTrace {
    lines: Vec<String>,
}

impl StepTrace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }
}

/// Whole-number percentage label for a fraction, rounded to nearest (`0.954` -> `"95%"`).
///
/// Amounts are floored separately, so a label can disagree with
/// `label * base / 100` by a unit or more.
pub fn percent_label(fraction: f64) -> String {
    format!("{}%", (fraction * 100.0).round() as i64)
}
