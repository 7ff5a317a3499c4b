//! Unified diffs with line statistics.

use crate::models::{DiffResult, DiffStats, RiskLevel};
use crate::risk;
use similar::{ChangeTag, TextDiff};

const CONTEXT_LINES: usize = 3;

/// Diff `original` against `new` and attach a risk assessment.
///
/// An empty `original` is a file creation: every line is an addition and the
/// result is always low risk.
pub fn generate_diff(original: &str, new: &str, path: &str) -> DiffResult {
    if original.is_empty() {
        return creation_diff(new, path);
    }

    let diff = TextDiff::from_lines(original, new);
    let mut out = String::new();
    let mut additions = 0usize;
    let mut deletions = 0usize;

    out.push_str(&format!("--- a/{}\n", path));
    out.push_str(&format!("+++ b/{}\n", path));
    for group in diff.grouped_ops(CONTEXT_LINES).iter() {
        let (old_start, new_start) = match group.first() {
            Some(op) => (op.old_range().start, op.new_range().start),
            None => continue,
        };
        let old_len: usize = group.iter().map(|op| op.old_range().len()).sum();
        let new_len: usize = group.iter().map(|op| op.new_range().len()).sum();
        out.push_str(&format!(
            "@@ -{} +{} @@\n",
            hunk_range(old_start, old_len),
            hunk_range(new_start, new_len)
        ));
        for op in group {
            for change in diff.iter_changes(op) {
                let sign = match change.tag() {
                    ChangeTag::Delete => {
                        deletions += 1;
                        '-'
                    }
                    ChangeTag::Insert => {
                        additions += 1;
                        '+'
                    }
                    ChangeTag::Equal => ' ',
                };
                out.push(sign);
                out.push_str(change.value());
                if !change.value().ends_with('\n') {
                    out.push('\n');
                }
            }
        }
    }
    if additions == 0 && deletions == 0 {
        out.clear();
    }

    let stats = DiffStats::new(additions, deletions);
    let (risk_level, risk_factors) = risk::assess_risk(original, new, &stats, path);
    DiffResult {
        diff_text: out,
        stats,
        risk_level,
        risk_factors,
    }
}

/// `start,len` in unified-diff notation (1-based; an empty range names the
/// line before it).
fn hunk_range(start: usize, len: usize) -> String {
    if len == 0 {
        format!("{},0", start)
    } else {
        format!("{},{}", start + 1, len)
    }
}

fn creation_diff(new: &str, path: &str) -> DiffResult {
    let lines: Vec<&str> = new.lines().collect();
    let mut out = String::new();
    out.push_str("--- /dev/null\n");
    out.push_str(&format!("+++ {}\n", path));
    out.push_str(&format!("@@ -0,0 +1,{} @@\n", lines.len()));
    for line in &lines {
        out.push('+');
        out.push_str(line);
        out.push('\n');
    }
    DiffResult {
        diff_text: out,
        stats: DiffStats::new(lines.len(), 0),
        risk_level: RiskLevel::Low,
        risk_factors: vec!["New file creation".to_string()],
    }
}
