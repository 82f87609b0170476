use crate::data::SolveResponse;
use serde::Serialize;
use std::fmt;

/// What the user sees next to the grid after a solve.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SolveReport {
    pub cost: f64,
    pub happiness: f64,
    pub violations: Vec<String>,
    pub explanation: Vec<String>,
}

impl From<&SolveResponse> for SolveReport {
    fn from(response: &SolveResponse) -> Self {
        Self {
            cost: response.cost,
            happiness: response.happiness,
            violations: response.violations.clone(),
            explanation: response.explanation.clone(),
        }
    }
}

impl SolveReport {
    pub fn summary(&self) -> String {
        format!(
            "Violations: {}  Desirability: {}",
            self.cost, self.happiness
        )
    }
}

impl fmt::Display for SolveReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.summary())?;

        writeln!(f, "Violations")?;
        if self.violations.is_empty() {
            writeln!(f, "No violations")?;
        }
        for v in &self.violations {
            writeln!(f, "- {v}")?;
        }

        writeln!(f, "Explanation")?;
        if self.explanation.is_empty() {
            writeln!(f, "No explanation provided.")?;
        }
        for (i, e) in self.explanation.iter().enumerate() {
            writeln!(f, "{}. {e}", i + 1)?;
        }
        Ok(())
    }
}
