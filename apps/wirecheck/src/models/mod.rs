//! Shared data models for verification, patching and diff outputs.

pub mod change;

pub use change::{
    ChangeAction, ChangeSetSummary, DiffResult, DiffStats, FileChange, RiskLevel,
};

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
/// Kind of wiring defect.
pub enum IssueKind {
    MissingImport,
    ImportedButUnused,
    NamingConflict,
    InvalidImport,
    BrokenImport,
    RouteNotRegistered,
    NoEntryPoint,
}

impl IssueKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueKind::MissingImport => "missing_import",
            IssueKind::ImportedButUnused => "imported_but_unused",
            IssueKind::NamingConflict => "naming_conflict",
            IssueKind::InvalidImport => "invalid_import",
            IssueKind::BrokenImport => "broken_import",
            IssueKind::RouteNotRegistered => "route_not_registered",
            IssueKind::NoEntryPoint => "no_entry_point",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    Warning,
    Info,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// A single wiring issue.
///
/// `target` names the file a remediation would patch (the shell or backend
/// entry) when that differs from `file`.
pub struct Issue {
    #[serde(rename = "type")]
    pub kind: IssueKind,
    pub severity: Severity,
    pub file: String,
    pub description: String,
    pub auto_fixable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub import_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub import_line: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
}

impl Issue {
    pub fn new(kind: IssueKind, severity: Severity, file: &str, description: String) -> Self {
        Issue {
            kind,
            severity,
            file: file.to_string(),
            description,
            auto_fixable: false,
            component: None,
            route_name: None,
            import_path: None,
            import_line: None,
            line: None,
            target: None,
        }
    }

    pub fn component(mut self, name: &str) -> Self {
        self.component = Some(name.to_string());
        self
    }

    pub fn route_name(mut self, name: &str) -> Self {
        self.route_name = Some(name.to_string());
        self
    }

    pub fn target(mut self, target: &str) -> Self {
        self.target = Some(target.to_string());
        self
    }

    pub fn import(mut self, record: &ImportRecord) -> Self {
        self.import_path = Some(record.import_path.clone());
        self.import_line = Some(record.raw_line.clone());
        self.line = Some(record.line_number);
        self
    }

    /// Seal the issue: `auto_fixable` mirrors whether the planner can act on it.
    pub fn finish(mut self) -> Self {
        self.auto_fixable = crate::plan::plan_fix(&self).is_some();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
/// One concrete remediation step. Paths are project-relative.
pub enum FixAction {
    AddImport {
        target_file: String,
        component: String,
        source: String,
    },
    AddUsage {
        target_file: String,
        component: String,
    },
    RemoveInvalidImport {
        target_file: String,
        import_line: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        import_path: Option<String>,
    },
    RegisterRoute {
        target_file: String,
        route_file: String,
        route_name: String,
    },
}

impl FixAction {
    pub fn target_file(&self) -> &str {
        match self {
            FixAction::AddImport { target_file, .. }
            | FixAction::AddUsage { target_file, .. }
            | FixAction::RemoveInvalidImport { target_file, .. }
            | FixAction::RegisterRoute { target_file, .. } => target_file,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            FixAction::AddImport { .. } => "add_import",
            FixAction::AddUsage { .. } => "add_usage",
            FixAction::RemoveInvalidImport { .. } => "remove_invalid_import",
            FixAction::RegisterRoute { .. } => "register_route",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FixStatus {
    Success,
    Partial,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailedFix {
    pub fix: FixAction,
    pub error: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// An action a guard turned into a no-op.
pub struct SkippedFix {
    pub fix: FixAction,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Result of applying a fix plan.
pub struct FixOutcome {
    pub status: FixStatus,
    pub fixed: Vec<FixAction>,
    pub skipped: Vec<SkippedFix>,
    pub failed: Vec<FailedFix>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerifyStatus {
    Ok,
    IssuesFound,
    Warning,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Verification container returned by the detector.
pub struct Verification {
    pub status: VerifyStatus,
    pub issues: Vec<Issue>,
    pub auto_fixable: bool,
    pub fix_plan: Vec<FixAction>,
}

impl Verification {
    /// Build a verification from collected issues, planning fixes as it goes.
    pub fn from_issues(issues: Vec<Issue>) -> Self {
        let status = if issues.is_empty() {
            VerifyStatus::Ok
        } else {
            VerifyStatus::IssuesFound
        };
        let auto_fixable = issues.iter().all(|i| i.auto_fixable);
        let fix_plan = crate::plan::plan(&issues);
        Verification {
            status,
            issues,
            auto_fixable,
            fix_plan,
        }
    }

    /// The "no entry file" outcome: a warning, never an error.
    pub fn no_entry_point(description: &str) -> Self {
        let issue = Issue::new(
            IssueKind::NoEntryPoint,
            Severity::Warning,
            "",
            description.to_string(),
        )
        .finish();
        Verification {
            status: VerifyStatus::Warning,
            issues: vec![issue],
            auto_fixable: false,
            fix_plan: Vec::new(),
        }
    }

    /// Combine two passes. A warning only survives when nothing worse was found.
    pub fn merge(self, other: Verification) -> Verification {
        let status = match (self.status, other.status) {
            (VerifyStatus::IssuesFound, _) | (_, VerifyStatus::IssuesFound) => {
                VerifyStatus::IssuesFound
            }
            (VerifyStatus::Warning, _) | (_, VerifyStatus::Warning) => VerifyStatus::Warning,
            _ => VerifyStatus::Ok,
        };
        let mut issues = self.issues;
        issues.extend(other.issues);
        let mut fix_plan = self.fix_plan;
        fix_plan.extend(other.fix_plan);
        Verification {
            status,
            auto_fixable: issues.iter().all(|i| i.auto_fixable),
            issues,
            fix_plan,
        }
    }

    pub fn count(&self, kind: IssueKind) -> usize {
        self.issues.iter().filter(|i| i.kind == kind).count()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// A parsed import statement.
pub struct ImportRecord {
    pub raw_line: String,
    /// 1-based line of the statement's first line.
    pub line_number: usize,
    /// 1-based line of the statement's last line.
    pub end_line: usize,
    pub imported_names: BTreeSet<String>,
    pub import_path: String,
    pub owner_file: String,
}

impl ImportRecord {
    pub fn binds(&self, name: &str) -> bool {
        self.imported_names.contains(name)
    }
}

/// `Entry` marks a file a runtime boots from; such files may import other
/// bootstrap files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileRole {
    Entry,
    Regular,
}

#[derive(Debug, Clone)]
/// A project file read fresh from disk.
pub struct SourceFile {
    pub path: String,
    pub content: String,
    pub role: FileRole,
}
