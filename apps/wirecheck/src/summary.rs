//! Change-set roll-up, text report and proposed-tree preview.

use crate::diff::generate_diff;
use crate::error::Result;
use crate::locate;
use crate::models::{ChangeAction, ChangeSetSummary, FileChange, RiskLevel};
use crate::utils;
use rayon::prelude::*;
use std::path::Path;

const PREVIEW_LINES: usize = 10;
const RULE_WIDTH: usize = 70;

pub fn summarize(changes: &[FileChange]) -> ChangeSetSummary {
    let new_files = changes
        .iter()
        .filter(|c| c.action == ChangeAction::Create)
        .count();
    ChangeSetSummary {
        total_files: changes.len(),
        new_files,
        modified_files: changes.len() - new_files,
        total_additions: changes.iter().map(|c| c.diff.stats.additions).sum(),
        total_deletions: changes.iter().map(|c| c.diff.stats.deletions).sum(),
        overall_risk: changes
            .iter()
            .map(|c| c.diff.risk_level)
            .max()
            .unwrap_or(RiskLevel::Low),
        high_risk_files: changes
            .iter()
            .filter(|c| c.diff.risk_level >= RiskLevel::High)
            .map(|c| c.path.clone())
            .collect(),
    }
}

/// Plain-text report: summary, risk banner, high-risk list and a short diff
/// preview per file.
pub fn render_report(changes: &[FileChange]) -> String {
    let summary = summarize(changes);
    let heavy = "=".repeat(RULE_WIDTH);
    let light = "-".repeat(RULE_WIDTH);
    let mut out = vec![
        String::new(),
        heavy.clone(),
        "PREVIEW OF PROPOSED CHANGES".to_string(),
        heavy.clone(),
        String::new(),
        "Summary:".to_string(),
        format!("  Total files: {}", summary.total_files),
        format!("  New files: {}", summary.new_files),
        format!("  Modified files: {}", summary.modified_files),
        format!("  Lines added: +{}", summary.total_additions),
        format!("  Lines deleted: -{}", summary.total_deletions),
        String::new(),
        format!(
            "{} Overall Risk: {}",
            summary.overall_risk.tag(),
            summary.overall_risk.as_str().to_uppercase()
        ),
    ];
    if !summary.high_risk_files.is_empty() {
        out.push(String::new());
        out.push("High-risk files:".to_string());
        for p in &summary.high_risk_files {
            out.push(format!("    - {}", p));
        }
    }
    out.push(String::new());
    out.push(light.clone());
    out.push("DETAILED CHANGES:".to_string());
    out.push(light);

    for change in changes {
        let marker = match change.action {
            ChangeAction::Create => "[NEW]",
            ChangeAction::Modify => "[MOD]",
        };
        let d = &change.diff;
        out.push(String::new());
        out.push(format!(
            "{} {}: {}",
            marker,
            change.action.as_str().to_uppercase(),
            change.path
        ));
        out.push(format!("   {} Risk: {}", d.risk_level.tag(), d.risk_level));
        out.push(format!(
            "   +{} -{} lines changed",
            d.stats.additions, d.stats.deletions
        ));
        if !d.risk_factors.is_empty() {
            out.push(format!("   Risks: {}", d.risk_factors.join(", ")));
        }
        let diff_lines: Vec<&str> = d.diff_text.lines().collect();
        if !diff_lines.is_empty() {
            out.push(String::new());
            out.push("   Preview:".to_string());
            for line in diff_lines.iter().take(PREVIEW_LINES) {
                if line.starts_with('+') || line.starts_with('-') || line.starts_with("@@") {
                    out.push(format!("   {}", line));
                }
            }
            if diff_lines.len() > PREVIEW_LINES {
                out.push(format!(
                    "   ... ({} more diff lines)",
                    diff_lines.len() - PREVIEW_LINES
                ));
            }
        }
    }

    out.push(String::new());
    out.push(heavy.clone());
    out.push("Review the changes above before applying.".to_string());
    out.push(heavy);
    out.push(String::new());
    out.join("\n")
}

/// Read every file below `dir` as `(relative path, content)`, skipping
/// excluded directories. Paths are sorted.
pub fn collect_tree(dir: &Path, exclude_dirs: &[String]) -> Result<Vec<(String, String)>> {
    let mut out = Vec::new();
    for path in locate::walk(dir, exclude_dirs) {
        let rel = utils::project_relative(dir, &path);
        out.push((rel, utils::read_lossy(&path)?));
    }
    out.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(out)
}

/// Diff each proposed `(path, content)` against the file currently at
/// `root/path`. Reads happen in order; the diff step runs on the rayon pool
/// and the result keeps input order.
pub fn preview_changes(root: &Path, proposed: &[(String, String)]) -> Vec<FileChange> {
    let mut inputs = Vec::with_capacity(proposed.len());
    for (rel, new) in proposed {
        let abs = root.join(rel);
        if !abs.exists() {
            inputs.push((rel, ChangeAction::Create, String::new(), new));
            continue;
        }
        match utils::read_lossy(&abs) {
            Ok(original) => inputs.push((rel, ChangeAction::Modify, original, new)),
            Err(e) => log::warn!("skipping {}: {}", rel, e),
        }
    }
    inputs
        .par_iter()
        .map(|(rel, action, original, new)| FileChange {
            path: rel.to_string(),
            action: *action,
            diff: generate_diff(original, new, rel),
        })
        .collect()
}
