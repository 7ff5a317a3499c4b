//! Diff, risk and change-set models.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Four-level risk classification, ordered from least to most severe.
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    pub fn from_score(score: u32) -> Self {
        match score {
            s if s >= 6 => RiskLevel::Critical,
            s if s >= 4 => RiskLevel::High,
            s if s >= 2 => RiskLevel::Medium,
            _ => RiskLevel::Low,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
            RiskLevel::Critical => "critical",
        }
    }

    /// Short banner tag used by the text report.
    pub fn tag(&self) -> &'static str {
        match self {
            RiskLevel::Low => "[LOW]",
            RiskLevel::Medium => "[MED]",
            RiskLevel::High => "[HIGH]",
            RiskLevel::Critical => "[CRIT]",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RiskLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(RiskLevel::Low),
            "medium" | "med" => Ok(RiskLevel::Medium),
            "high" => Ok(RiskLevel::High),
            "critical" | "crit" => Ok(RiskLevel::Critical),
            other => Err(format!("unknown risk level '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffStats {
    pub additions: usize,
    pub deletions: usize,
    pub modifications: usize,
    pub total_lines_changed: usize,
}

impl DiffStats {
    pub fn new(additions: usize, deletions: usize) -> Self {
        DiffStats {
            additions,
            deletions,
            modifications: additions.min(deletions),
            total_lines_changed: additions + deletions,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Risk-annotated diff of one file.
pub struct DiffResult {
    #[serde(rename = "diff")]
    pub diff_text: String,
    pub stats: DiffStats,
    pub risk_level: RiskLevel,
    pub risk_factors: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeAction {
    Create,
    Modify,
}

impl ChangeAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeAction::Create => "create",
            ChangeAction::Modify => "modify",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// A proposed mutation of one file within a change set.
pub struct FileChange {
    pub path: String,
    pub action: ChangeAction,
    #[serde(rename = "diff_result")]
    pub diff: DiffResult,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Batch roll-up of a change set.
pub struct ChangeSetSummary {
    pub total_files: usize,
    pub new_files: usize,
    pub modified_files: usize,
    pub total_additions: usize,
    pub total_deletions: usize,
    pub overall_risk: RiskLevel,
    pub high_risk_files: Vec<String>,
}
