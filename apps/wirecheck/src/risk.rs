//! Additive risk scoring for proposed file changes.

use crate::models::{DiffStats, RiskLevel};
use regex::Regex;
use similar::TextDiff;
use std::sync::OnceLock;
use std::time::Duration;

/// Path fragments that mark configuration, credentials or schema files.
pub const SENSITIVE_PATH_KEYWORDS: &[&str] =
    &["config", "env", "auth", "security", "database", "migration"];

/// Case-sensitive markers of destructive schema or data operations.
pub const DESTRUCTIVE_SQL_KEYWORDS: &[&str] =
    &["DROP", "ALTER TABLE", "DELETE FROM", "TRUNCATE", "migrate"];

const REWRITE_MIN_CHARS: usize = 100;
const REWRITE_SIMILARITY: f32 = 0.3;
const SIMILARITY_TIMEOUT: Duration = Duration::from_millis(500);

fn http_verb_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\b(?:GET|POST|PUT|DELETE|PATCH)\b|\.(?:get|post|put|delete|patch)\s*\(").unwrap()
    })
}

/// Character-level similarity in `[0, 1]`.
pub fn similarity(a: &str, b: &str) -> f32 {
    TextDiff::configure()
        .timeout(SIMILARITY_TIMEOUT)
        .diff_chars(a, b)
        .ratio()
}

fn size_factor(total: usize) -> Option<(u32, String)> {
    if total > 500 {
        Some((3, format!("Very large change ({} lines)", total)))
    } else if total > 200 {
        Some((2, format!("Large change ({} lines)", total)))
    } else if total > 50 {
        Some((1, format!("Moderate change ({} lines)", total)))
    } else {
        None
    }
}

/// Score a modification of `path` from `original` to `new`.
///
/// Creation (empty `original`) is always low risk.
pub fn assess_risk(
    original: &str,
    new: &str,
    stats: &DiffStats,
    path: &str,
) -> (RiskLevel, Vec<String>) {
    if original.is_empty() {
        return (RiskLevel::Low, vec!["New file creation".to_string()]);
    }
    let mut score = 0u32;
    let mut factors = Vec::new();
    let mut add = |points: u32, reason: String| {
        score += points;
        factors.push(reason);
    };

    if let Some((points, reason)) = size_factor(stats.total_lines_changed) {
        add(points, reason);
    }

    if stats.deletions > 0 {
        let ratio = stats.deletions as f64 / stats.total_lines_changed as f64;
        if ratio > 0.5 {
            add(2, format!("High deletion ratio ({:.0}%)", ratio * 100.0));
        }
    }

    let lower = path.to_ascii_lowercase();
    if SENSITIVE_PATH_KEYWORDS.iter().any(|k| lower.contains(k)) {
        add(2, "Modifying critical file".to_string());
    }

    if (lower.contains("route") || lower.contains("api"))
        && original != new
        && http_verb_re().is_match(new)
    {
        add(1, "API endpoint modification".to_string());
    }

    if DESTRUCTIVE_SQL_KEYWORDS.iter().any(|k| new.contains(k)) {
        add(3, "Database schema change".to_string());
    }

    if original.len() > REWRITE_MIN_CHARS {
        let ratio = similarity(original, new);
        if ratio < REWRITE_SIMILARITY {
            add(
                2,
                format!("Complete file rewrite (only {:.0}% similar)", ratio * 100.0),
            );
        }
    }

    let level = RiskLevel::from_score(score);
    if factors.is_empty() {
        factors.push("Minor changes".to_string());
    }
    log::debug!("risk for {}: score {} -> {}", path, score, level);
    (level, factors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::generate_diff;

    #[test]
    fn test_migration_with_sixty_lines_is_medium() {
        let original = "const a = 1;\n";
        let mut new = original.to_string();
        for i in 0..60 {
            new.push_str(&format!("  column_{}: 'text',\n", i));
        }
        let stats = DiffStats::new(60, 0);
        let (level, factors) = assess_risk(original, &new, &stats, "db/migrations/0001_users.js");
        assert_eq!(level, RiskLevel::Medium);
        assert_eq!(
            factors,
            vec![
                "Moderate change (60 lines)".to_string(),
                "Modifying critical file".to_string()
            ]
        );
    }

    #[test]
    fn test_new_file_is_always_low() {
        let body = "DROP TABLE users;\n".repeat(700);
        let stats = DiffStats::new(700, 0);
        let (level, _) = assess_risk("", &body, &stats, "config/auth/migration.sql");
        assert_eq!(level, RiskLevel::Low);
    }

    #[test]
    fn test_destructive_rewrite_is_critical() {
        let original = "SELECT id, name, email FROM users WHERE active = 1 ORDER BY name;\n".repeat(3);
        let new = "DROP TABLE users;\n";
        let res = generate_diff(&original, new, "db/schema.sql");
        // deletion ratio + destructive SQL + rewrite
        assert_eq!(res.risk_level, RiskLevel::Critical);
        assert!(res.risk_factors.iter().any(|f| f.starts_with("High deletion ratio")));
        assert!(res.risk_factors.contains(&"Database schema change".to_string()));
        assert!(res.risk_factors.iter().any(|f| f.starts_with("Complete file rewrite")));
    }

    #[test]
    fn test_api_route_change() {
        let original = "router.get('/a', a);\n";
        let new = "router.get('/a', a);\nrouter.post('/b', b);\n";
        let res = generate_diff(original, new, "routes/items.js");
        assert_eq!(res.risk_factors, vec!["API endpoint modification".to_string()]);
        assert_eq!(res.risk_level, RiskLevel::Low);
    }

    #[test]
    fn test_risk_is_monotonic_for_insertions() {
        let mut original = String::new();
        for i in 0..20 {
            original.push_str(&format!("app.get('/r{}', handler{});\n", i, i));
        }
        let mut last = RiskLevel::Low;
        let mut last_total = 0;
        for extra in [1usize, 30, 60, 250, 600] {
            let mut new = original.clone();
            for i in 0..extra {
                new.push_str(&format!("// note {}\n", i));
            }
            let res = generate_diff(&original, &new, "src/api/routes.js");
            assert!(res.stats.total_lines_changed > last_total);
            assert!(res.risk_level >= last, "{} lines dropped risk", extra);
            last = res.risk_level;
            last_total = res.stats.total_lines_changed;
        }
        assert_eq!(last, RiskLevel::Critical);
    }
}
