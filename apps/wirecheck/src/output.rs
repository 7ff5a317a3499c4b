//! Output rendering for verify, imports, fix, diff and preview commands.
//!
//! Supports `human` (default) and `json` outputs. JSON shapes are built by the
//! pure `compose_*_json` functions so they can be tested without capturing
//! stdout.

use crate::models::{
    DiffResult, FileChange, FixAction, FixOutcome, ImportRecord, Issue, RiskLevel, Severity,
    Verification, VerifyStatus,
};
use crate::summary;
use owo_colors::OwoColorize;
use serde_json::json;
use serde_json::Value as JsonVal;

fn use_colors(output: &str) -> bool {
    output != "json" && std::env::var_os("NO_COLOR").is_none()
}

fn print_json(v: &JsonVal) {
    match serde_json::to_string_pretty(v) {
        Ok(s) => println!("{}", s),
        Err(_) => println!("{}", v),
    }
}

fn severity_badge(sev: Severity, color: bool) -> (String, String) {
    let (badge, icon) = match sev {
        Severity::Critical => ("⟦critical⟧", "✖"),
        Severity::Warning => ("⟦warn⟧", "▲"),
        Severity::Info => ("⟦info⟧", "◆"),
    };
    if !color {
        return (badge.to_string(), icon.to_string());
    }
    match sev {
        Severity::Critical => (badge.red().bold().to_string(), icon.red().to_string()),
        Severity::Warning => (badge.yellow().bold().to_string(), icon.yellow().to_string()),
        Severity::Info => (badge.blue().bold().to_string(), icon.blue().to_string()),
    }
}

fn risk_label(level: RiskLevel, color: bool) -> String {
    let text = level.tag();
    if !color {
        return text.to_string();
    }
    match level {
        RiskLevel::Low => text.green().to_string(),
        RiskLevel::Medium => text.yellow().to_string(),
        RiskLevel::High => text.red().to_string(),
        RiskLevel::Critical => text.red().bold().to_string(),
    }
}

fn issue_line(is: &Issue, color: bool) -> String {
    let (badge, icon) = severity_badge(is.severity, color);
    let file = if is.file.is_empty() {
        "<project>".to_string()
    } else {
        is.file.clone()
    };
    let file = if color {
        file.bold().to_string()
    } else {
        file
    };
    let fix = if is.auto_fixable { " (auto-fixable)" } else { "" };
    format!(
        "{} {} {} ❲{}❳ {}{}",
        icon,
        badge,
        file,
        is.kind.as_str(),
        is.description,
        fix
    )
}

fn action_line(fix: &FixAction) -> String {
    match fix {
        FixAction::AddImport {
            target_file,
            component,
            source,
        } => format!("add_import {} <- {} ({})", target_file, component, source),
        FixAction::AddUsage {
            target_file,
            component,
        } => format!("add_usage {} <{} />", target_file, component),
        FixAction::RemoveInvalidImport {
            target_file,
            import_line,
            ..
        } => format!("remove_invalid_import {}: {}", target_file, import_line),
        FixAction::RegisterRoute {
            target_file,
            route_name,
            ..
        } => format!("register_route {} /api/{}", target_file, route_name),
    }
}

/// Print a verification result.
pub fn print_verification(v: &Verification, output: &str) {
    if output == "json" {
        print_json(&compose_verification_json(v));
        return;
    }
    let color = use_colors(output);
    for is in &v.issues {
        println!("{}", issue_line(is, color));
    }
    let summary = format!(
        "Summary: status={} issues={} auto_fixable={} planned_fixes={}",
        status_str(v.status),
        v.issues.len(),
        v.auto_fixable,
        v.fix_plan.len()
    );
    if color {
        println!("{}", summary.bold());
    } else {
        println!("{}", summary);
    }
}

fn status_str(s: VerifyStatus) -> &'static str {
    match s {
        VerifyStatus::Ok => "ok",
        VerifyStatus::IssuesFound => "issues_found",
        VerifyStatus::Warning => "warning",
    }
}

/// Compose verification JSON (pure).
pub fn compose_verification_json(v: &Verification) -> JsonVal {
    serde_json::to_value(v).unwrap_or(JsonVal::Null)
}

/// Print the import records of one file.
pub fn print_imports(file: &str, records: &[ImportRecord], output: &str) {
    if output == "json" {
        print_json(&compose_imports_json(file, records));
        return;
    }
    let color = use_colors(output);
    for r in records {
        let loc = if r.end_line > r.line_number {
            format!("{}:{}-{}", file, r.line_number, r.end_line)
        } else {
            format!("{}:{}", file, r.line_number)
        };
        let names: Vec<&str> = r.imported_names.iter().map(|s| s.as_str()).collect();
        if color {
            println!("{} {} <- {}", loc.bold(), names.join(", "), r.import_path.cyan());
        } else {
            println!("{} {} <- {}", loc, names.join(", "), r.import_path);
        }
    }
}

pub fn compose_imports_json(file: &str, records: &[ImportRecord]) -> JsonVal {
    json!({
        "file": file,
        "imports": records,
        "total": records.len(),
    })
}

/// Print a fix run: the plan, what was applied and what detection reports
/// afterwards. `outcome` and `after` are `None` on a dry run.
pub fn print_fix(
    plan: &[FixAction],
    outcome: Option<&FixOutcome>,
    after: Option<&Verification>,
    output: &str,
) {
    if output == "json" {
        print_json(&compose_fix_json(plan, outcome, after));
        return;
    }
    let color = use_colors(output);
    let Some(outcome) = outcome else {
        for fix in plan {
            if color {
                println!("{} {}", "planned:".cyan().bold(), action_line(fix));
            } else {
                println!("planned: {}", action_line(fix));
            }
        }
        println!("{} dry run, {} action(s) not applied", crate::utils::note_prefix(), plan.len());
        return;
    };
    for fix in &outcome.fixed {
        if color {
            println!("{} {}", "fixed:".green().bold(), action_line(fix));
        } else {
            println!("fixed: {}", action_line(fix));
        }
    }
    for s in &outcome.skipped {
        if color {
            println!("{} {} ({})", "skipped:".yellow().bold(), action_line(&s.fix), s.reason);
        } else {
            println!("skipped: {} ({})", action_line(&s.fix), s.reason);
        }
    }
    for f in &outcome.failed {
        if color {
            println!("{} {}: {}", "failed:".red().bold(), action_line(&f.fix), f.error);
        } else {
            println!("failed: {}: {}", action_line(&f.fix), f.error);
        }
    }
    if let Some(after) = after {
        for is in &after.issues {
            println!("{}", issue_line(is, color));
        }
    }
    let summary = format!(
        "Summary: fixed={} skipped={} failed={} remaining_issues={}",
        outcome.fixed.len(),
        outcome.skipped.len(),
        outcome.failed.len(),
        after.map(|a| a.issues.len()).unwrap_or(0)
    );
    if color {
        println!("{}", summary.bold());
    } else {
        println!("{}", summary);
    }
}

/// Compose fix JSON (pure).
pub fn compose_fix_json(
    plan: &[FixAction],
    outcome: Option<&FixOutcome>,
    after: Option<&Verification>,
) -> JsonVal {
    json!({
        "dry_run": outcome.is_none(),
        "plan": plan,
        "outcome": outcome,
        "after": after,
    })
}

/// Print one file diff with its risk assessment.
pub fn print_diff(path: &str, res: &DiffResult, output: &str) {
    if output == "json" {
        print_json(&compose_diff_json(path, res));
        return;
    }
    let color = use_colors(output);
    for line in res.diff_text.lines() {
        if !color {
            println!("{}", line);
        } else if line.starts_with("+++") || line.starts_with("---") {
            println!("{}", line.bold());
        } else if line.starts_with('+') {
            println!("{}", line.green());
        } else if line.starts_with('-') {
            println!("{}", line.red());
        } else if line.starts_with("@@") {
            println!("{}", line.cyan());
        } else {
            println!("{}", line);
        }
    }
    println!(
        "{} {} +{} -{} ({})",
        risk_label(res.risk_level, color),
        path,
        res.stats.additions,
        res.stats.deletions,
        res.risk_factors.join(", ")
    );
}

pub fn compose_diff_json(path: &str, res: &DiffResult) -> JsonVal {
    json!({
        "path": path,
        "diff": res.diff_text,
        "stats": res.stats,
        "risk_level": res.risk_level,
        "risk_factors": res.risk_factors,
    })
}

/// Print a change-set preview. `max_risk` is echoed when a risk gate is
/// active.
pub fn print_preview(changes: &[FileChange], max_risk: Option<RiskLevel>, output: &str) {
    if output == "json" {
        print_json(&compose_preview_json(changes, max_risk));
        return;
    }
    print!("{}", summary::render_report(changes));
    if let Some(limit) = max_risk {
        let overall = summary::summarize(changes).overall_risk;
        if overall > limit {
            eprintln!(
                "{} overall risk {} exceeds the allowed maximum {}",
                crate::utils::error_prefix(),
                overall,
                limit
            );
        } else {
            println!(
                "{} overall risk {} within the allowed maximum {}",
                crate::utils::info_prefix(),
                overall,
                limit
            );
        }
    }
}

/// Compose preview JSON (pure).
pub fn compose_preview_json(changes: &[FileChange], max_risk: Option<RiskLevel>) -> JsonVal {
    let summary = summary::summarize(changes);
    let passed = max_risk.map(|limit| summary.overall_risk <= limit);
    json!({
        "files": changes,
        "summary": summary,
        "max_risk": max_risk,
        "passed": passed,
    })
}
