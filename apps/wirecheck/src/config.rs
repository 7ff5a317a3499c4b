//! Configuration discovery and effective settings resolution.
//!
//! wirecheck reads `wirecheck.toml|yaml|yml` from the repository root (or the
//! closest ancestor) and merges it with CLI flags to produce an `Effective`
//! config. Defaults:
//! - `output`: `human`
//! - `locate.shell`: `App.jsx, App.tsx, App.js, App.ts`
//! - `locate.routes`: `routes.jsx, routes.tsx, routes.js, routes.ts`
//! - `locate.backend`: `server.js, server.ts, app.js, app.ts, index.js, index.ts, app.py, main.py`
//! - `locate.exclude_dirs`: `node_modules, .git, dist, build, .next, target, __pycache__, venv, .venv`
//! - `rules.*`: keyword lists used by path classification
//! - `preview.max_risk`: `high`
//!
//! Overrides precedence: CLI > config file > defaults.

use crate::models::change::RiskLevel;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILES: [&str; 3] = ["wirecheck.toml", "wirecheck.yaml", "wirecheck.yml"];

#[derive(Debug, Default, Deserialize, Clone)]
/// Entry-file lookup section under `[locate]`.
pub struct LocateCfg {
    pub shell: Option<Vec<String>>,
    pub routes: Option<Vec<String>>,
    pub backend: Option<Vec<String>>,
    pub exclude_dirs: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize, Clone)]
/// Keyword lists under `[rules]`.
pub struct RulesCfg {
    pub page_keywords: Option<Vec<String>>,
    pub support_keywords: Option<Vec<String>>,
    pub route_keywords: Option<Vec<String>>,
    pub framework_aliases: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize, Clone)]
pub struct PreviewCfg {
    pub max_risk: Option<String>,
}

#[derive(Debug, Default, Deserialize, Clone)]
/// Root configuration loaded from `wirecheck.toml|yaml`.
pub struct WirecheckConfig {
    pub output: Option<String>,
    #[serde(default)]
    pub locate: Option<LocateCfg>,
    #[serde(default)]
    pub rules: Option<RulesCfg>,
    #[serde(default)]
    pub preview: Option<PreviewCfg>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Knobs for locating entry files and classifying generated paths.
pub struct DetectOptions {
    pub shell_candidates: Vec<String>,
    pub routes_candidates: Vec<String>,
    pub backend_candidates: Vec<String>,
    pub exclude_dirs: Vec<String>,
    pub page_keywords: Vec<String>,
    pub support_keywords: Vec<String>,
    pub route_keywords: Vec<String>,
    pub framework_aliases: Vec<String>,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for DetectOptions {
    fn default() -> Self {
        DetectOptions {
            shell_candidates: strings(&["App.jsx", "App.tsx", "App.js", "App.ts"]),
            routes_candidates: strings(&["routes.jsx", "routes.tsx", "routes.js", "routes.ts"]),
            backend_candidates: strings(&[
                "server.js", "server.ts", "app.js", "app.ts", "index.js", "index.ts", "app.py",
                "main.py",
            ]),
            exclude_dirs: strings(&[
                "node_modules",
                ".git",
                "dist",
                "build",
                ".next",
                "target",
                "__pycache__",
                "venv",
                ".venv",
            ]),
            page_keywords: strings(&["page", "view", "screen"]),
            support_keywords: strings(&[
                "util", "hook", "service", "config", "helper", "context", "store", "test",
            ]),
            route_keywords: strings(&["route", "controller"]),
            framework_aliases: strings(&["React", "Vue", "Svelte", "Preact", "Solid", "Angular"]),
        }
    }
}

impl DetectOptions {
    /// Defaults overlaid with whatever the config file declares.
    pub fn from_config(cfg: &WirecheckConfig) -> Self {
        let mut opts = DetectOptions::default();
        if let Some(loc) = cfg.locate.as_ref() {
            overlay(&mut opts.shell_candidates, &loc.shell);
            overlay(&mut opts.routes_candidates, &loc.routes);
            overlay(&mut opts.backend_candidates, &loc.backend);
            overlay(&mut opts.exclude_dirs, &loc.exclude_dirs);
        }
        if let Some(r) = cfg.rules.as_ref() {
            overlay(&mut opts.page_keywords, &r.page_keywords);
            overlay(&mut opts.support_keywords, &r.support_keywords);
            overlay(&mut opts.route_keywords, &r.route_keywords);
            overlay(&mut opts.framework_aliases, &r.framework_aliases);
        }
        opts
    }
}

fn overlay(dst: &mut Vec<String>, src: &Option<Vec<String>>) {
    if let Some(v) = src {
        *dst = v.clone();
    }
}

#[derive(Debug, Clone)]
/// Fully-resolved configuration used by commands after applying precedence.
pub struct Effective {
    pub repo_root: PathBuf,
    pub output: String,
    pub max_risk: RiskLevel,
    pub detect: DetectOptions,
    pub config_found: bool,
}

/// Walk upward from `start` to detect the repository root.
///
/// Stops when a `wirecheck.toml|yaml|yml` or a `.git` directory is found.
pub fn detect_repo_root(start: &Path) -> PathBuf {
    let mut cur = start;
    loop {
        if CONFIG_FILES.iter().any(|f| cur.join(f).exists()) {
            return cur.to_path_buf();
        }
        if cur.join(".git").exists() {
            return cur.to_path_buf();
        }
        match cur.parent() {
            Some(p) => cur = p,
            None => return start.to_path_buf(),
        }
    }
}

/// Load `WirecheckConfig` from `wirecheck.toml` or `wirecheck.yaml|yml` if present.
pub fn load_config(root: &Path) -> Option<WirecheckConfig> {
    let toml_path = root.join("wirecheck.toml");
    if toml_path.exists() {
        let s = fs::read_to_string(&toml_path).ok()?;
        return match toml::from_str(&s) {
            Ok(cfg) => Some(cfg),
            Err(e) => {
                log::warn!("ignoring {}: {}", toml_path.display(), e);
                None
            }
        };
    }
    for yml in ["wirecheck.yaml", "wirecheck.yml"] {
        let p = root.join(yml);
        if p.exists() {
            let s = fs::read_to_string(&p).ok()?;
            return match serde_yaml::from_str(&s) {
                Ok(cfg) => Some(cfg),
                Err(e) => {
                    log::warn!("ignoring {}: {}", p.display(), e);
                    None
                }
            };
        }
    }
    None
}

/// Resolve `Effective` by merging CLI flags, discovered config, and defaults.
pub fn resolve_effective(
    cli_repo_root: Option<&str>,
    cli_output: Option<&str>,
    cli_max_risk: Option<RiskLevel>,
) -> Effective {
    let start = PathBuf::from(cli_repo_root.unwrap_or("."));
    let config_root = detect_repo_root(&start);
    // an explicit root is the project; config may still live further up
    let repo_root = if cli_repo_root.is_some() {
        start
    } else {
        config_root.clone()
    };
    let loaded = load_config(&config_root);
    let config_found = loaded.is_some();
    let cfg = loaded.unwrap_or_default();

    let output = cli_output
        .map(|s| s.to_string())
        .or(cfg.output.clone())
        .unwrap_or_else(|| "human".to_string());

    let cfg_max_risk = cfg
        .preview
        .as_ref()
        .and_then(|p| p.max_risk.as_deref())
        .and_then(|s| match s.parse::<RiskLevel>() {
            Ok(level) => Some(level),
            Err(e) => {
                log::warn!("[preview].max_risk: {}", e);
                None
            }
        });
    let max_risk = cli_max_risk.or(cfg_max_risk).unwrap_or(RiskLevel::High);

    Effective {
        repo_root,
        output,
        max_risk,
        detect: DetectOptions::from_config(&cfg),
        config_found,
    }
}
