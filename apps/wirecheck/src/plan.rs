//! Issue to remediation mapping.

use crate::error::Result;
use crate::models::{FixAction, Issue, IssueKind};

/// The single fix for `issue`, or `None` when it needs human judgment.
pub fn plan_fix(issue: &Issue) -> Option<FixAction> {
    match issue.kind {
        IssueKind::MissingImport => Some(FixAction::AddImport {
            target_file: issue.target.clone()?,
            component: issue.component.clone()?,
            source: issue.file.clone(),
        }),
        IssueKind::ImportedButUnused => Some(FixAction::AddUsage {
            target_file: issue.target.clone()?,
            component: issue.component.clone()?,
        }),
        IssueKind::NamingConflict | IssueKind::InvalidImport => {
            Some(FixAction::RemoveInvalidImport {
                target_file: issue.file.clone(),
                import_line: issue.import_line.clone()?,
                import_path: issue.import_path.clone(),
            })
        }
        IssueKind::RouteNotRegistered => Some(FixAction::RegisterRoute {
            target_file: issue.target.clone()?,
            route_file: issue.file.clone(),
            route_name: issue.route_name.clone()?,
        }),
        IssueKind::BrokenImport | IssueKind::NoEntryPoint => None,
    }
}

/// One fix per plannable issue, in issue order.
pub fn plan(issues: &[Issue]) -> Vec<FixAction> {
    issues.iter().filter_map(plan_fix).collect()
}

/// Parse a plan written as a JSON array of `action`-tagged fixes.
pub fn parse_plan(text: &str) -> Result<Vec<FixAction>> {
    Ok(serde_json::from_str(text)?)
}
