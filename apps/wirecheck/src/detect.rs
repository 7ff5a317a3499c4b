//! Wiring defect detection.
//!
//! Two independent passes:
//! - import validation over one file's own import records, using an ordered
//!   list of checks where the first hit per record wins;
//! - wiring validation of generated files against the located shell (UI) or
//!   backend entry file.
//!
//! Every call re-reads the files it needs; nothing is cached between calls.

use crate::config::DetectOptions;
use crate::imports::{self, ImportExtractor};
use crate::locate::{self, ProjectFiles};
use crate::models::{
    FileRole, ImportRecord, Issue, IssueKind, Severity, SourceFile, Verification,
};
use crate::rules::RuleSet;
use crate::utils;
use regex::Regex;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Import levels at or beyond which a path is treated as leaving the project.
const MAX_PARENT_LEVELS: usize = 3;

/// Stems reserved for bootstrap files that nothing else should import.
const RESERVED_BOOTSTRAP: &[&str] = &["main", "index"];

/// Extensions a bootstrap file may carry.
const BOOTSTRAP_EXTENSIONS: &[&str] = &[".js", ".jsx", ".ts", ".tsx", ".mjs", ".cjs", ".py"];

struct ImportContext<'a> {
    root: &'a Path,
    file: &'a SourceFile,
    own_stem: String,
    extractor: &'static dyn ImportExtractor,
    opts: &'a DetectOptions,
}

type ImportCheck = fn(&ImportContext, &ImportRecord) -> Option<Issue>;

/// Ordered import checks; the first one that reports wins for a record.
const IMPORT_CHECKS: &[ImportCheck] = &[
    check_naming_conflict,
    check_outside_project,
    check_bootstrap_import,
    check_unresolvable,
];

fn check_naming_conflict(cx: &ImportContext, rec: &ImportRecord) -> Option<Issue> {
    if cx.own_stem.is_empty() || !rec.binds(&cx.own_stem) {
        return None;
    }
    if cx.opts.framework_aliases.iter().any(|a| *a == cx.own_stem) {
        return None;
    }
    Some(
        Issue::new(
            IssueKind::NamingConflict,
            Severity::Critical,
            &cx.file.path,
            format!(
                "'{}' imports '{}' which shares its own module name (line {})",
                cx.file.path, cx.own_stem, rec.line_number
            ),
        )
        .import(rec)
        .finish(),
    )
}

fn check_outside_project(cx: &ImportContext, rec: &ImportRecord) -> Option<Issue> {
    let rel = cx.extractor.relative_path(&rec.import_path)?;
    if imports::parent_levels(&rel) < MAX_PARENT_LEVELS {
        return None;
    }
    Some(
        Issue::new(
            IssueKind::InvalidImport,
            Severity::Critical,
            &cx.file.path,
            format!(
                "Import '{}' reaches outside the project (line {})",
                rec.import_path, rec.line_number
            ),
        )
        .import(rec)
        .finish(),
    )
}

fn is_bootstrap_stem(stem: &str) -> bool {
    RESERVED_BOOTSTRAP
        .iter()
        .any(|s| s.eq_ignore_ascii_case(stem))
}

fn check_bootstrap_import(cx: &ImportContext, rec: &ImportRecord) -> Option<Issue> {
    if cx.file.role == FileRole::Entry {
        return None;
    }
    let rel = cx.extractor.relative_path(&rec.import_path)?;
    let segs: Vec<&str> = rel.split('/').collect();
    let (last, dirs) = segs.split_last()?;
    if !dirs.iter().all(|d| *d == "." || *d == "..") || dirs.is_empty() {
        return None;
    }
    if !is_bootstrap_stem(&utils::stem(last)) {
        return None;
    }
    Some(
        Issue::new(
            IssueKind::InvalidImport,
            Severity::Critical,
            &cx.file.path,
            format!(
                "Import '{}' pulls a bootstrap file into '{}' (line {})",
                rec.import_path, cx.file.path, rec.line_number
            ),
        )
        .import(rec)
        .finish(),
    )
}

fn with_suffix(p: &Path, suffix: &str) -> PathBuf {
    let mut s = p.as_os_str().to_os_string();
    s.push(suffix);
    PathBuf::from(s)
}

/// Whether a relative import resolves to a file on disk.
fn resolves(base_dir: &Path, rel: &str, extractor: &dyn ImportExtractor) -> bool {
    let candidate = utils::normalize(&base_dir.join(rel));
    if candidate.is_file() {
        return true;
    }
    let exts = extractor.extensions();
    if exts.iter().any(|e| with_suffix(&candidate, e).is_file()) {
        return true;
    }
    exts.iter().any(|e| {
        candidate
            .join(format!("{}{}", extractor.index_stem(), e))
            .is_file()
    })
}

fn check_unresolvable(cx: &ImportContext, rec: &ImportRecord) -> Option<Issue> {
    let rel = cx.extractor.relative_path(&rec.import_path)?;
    let abs = cx.root.join(&cx.file.path);
    let base = abs.parent().unwrap_or(cx.root);
    if resolves(base, &rel, cx.extractor) {
        return None;
    }
    Some(
        Issue::new(
            IssueKind::BrokenImport,
            Severity::Critical,
            &cx.file.path,
            format!(
                "Import '{}' does not resolve to a file (line {})",
                rec.import_path, rec.line_number
            ),
        )
        .import(rec)
        .finish(),
    )
}

fn validate_source(root: &Path, file: &SourceFile, opts: &DetectOptions) -> Vec<Issue> {
    let extractor = match imports::extractor_for(&file.path) {
        Some(x) => x,
        None => return Vec::new(),
    };
    let cx = ImportContext {
        root,
        file,
        own_stem: utils::stem(&file.path),
        extractor,
        opts,
    };
    extractor
        .extract(&file.path, &file.content)
        .iter()
        .filter_map(|rec| IMPORT_CHECKS.iter().find_map(|check| check(&cx, rec)))
        .collect()
}

/// Validate the import statements of one project file.
///
/// An unreadable file yields no issues (it is skipped with a warning).
pub fn validate_imports(root: &Path, file: &str, opts: &DetectOptions) -> Verification {
    match locate::load_source(root, file, &entry_names(opts)) {
        Ok(src) => Verification::from_issues(validate_source(root, &src, opts)),
        Err(e) => {
            log::warn!("skipping {}: {}", file, e);
            Verification::from_issues(Vec::new())
        }
    }
}

/// File names a runtime boots from: the backend entry candidates plus every
/// `main`/`index` variant. Files with these names get `FileRole::Entry`.
fn entry_names(opts: &DetectOptions) -> Vec<String> {
    let mut names = opts.backend_candidates.clone();
    for stem in RESERVED_BOOTSTRAP {
        for ext in BOOTSTRAP_EXTENSIONS {
            names.push(format!("{}{}", stem, ext));
        }
    }
    names
}

fn normalize_generated(root: &Path, generated: &[String]) -> Vec<String> {
    let mut seen = BTreeSet::new();
    generated
        .iter()
        .map(|g| utils::project_relative(root, Path::new(g)))
        .filter(|g| seen.insert(g.clone()))
        .collect()
}

/// Shell text with import statements blanked out.
fn body_without_imports(content: &str, records: &[ImportRecord]) -> String {
    content
        .split('\n')
        .enumerate()
        .filter(|(idx, _)| {
            let n = idx + 1;
            !records
                .iter()
                .any(|r| n >= r.line_number && n <= r.end_line)
        })
        .map(|(_, line)| line)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Whether `name` is rendered as a tag or passed as a value in `body`.
pub fn is_used(body: &str, name: &str) -> bool {
    let n = regex::escape(name);
    match Regex::new(&format!(r"<{}\b|\{{\s*{}\s*\}}", n, n)) {
        Ok(re) => re.is_match(body),
        Err(_) => false,
    }
}

fn load_optional(root: &Path, abs: Option<PathBuf>, opts: &DetectOptions) -> Option<SourceFile> {
    let abs = abs?;
    let rel = utils::project_relative(root, &abs);
    match locate::load_source(root, &rel, &entry_names(opts)) {
        Ok(src) => Some(src),
        Err(e) => {
            log::warn!("skipping {}: {}", rel, e);
            None
        }
    }
}

/// Check that generated pages are imported and rendered by the shell.
pub fn verify_frontend(root: &Path, generated: &[String], opts: &DetectOptions) -> Verification {
    let files = ProjectFiles::scan(root, &opts.exclude_dirs);
    let shell_abs = files.find(&opts.shell_candidates);
    frontend_pass(root, &files, shell_abs, generated, opts)
}

fn frontend_pass(
    root: &Path,
    files: &ProjectFiles,
    shell_abs: Option<PathBuf>,
    generated: &[String],
    opts: &DetectOptions,
) -> Verification {
    let shell = match load_optional(root, shell_abs, opts) {
        Some(s) => s,
        None => return Verification::no_entry_point("Cannot find the application shell file"),
    };
    let routes = load_optional(root, files.find(&opts.routes_candidates), opts);

    let mut issues = validate_source(root, &shell, opts);

    let shell_records = imports::extract(&shell.path, &shell.content);
    let routes_records = routes
        .as_ref()
        .map(|r| imports::extract(&r.path, &r.content))
        .unwrap_or_default();
    let body = body_without_imports(&shell.content, &shell_records);
    let rules = RuleSet::frontend(opts);

    for path in normalize_generated(root, generated) {
        if path == shell.path || !rules.classify(&path).is_required() {
            continue;
        }
        let name = utils::stem(&path);
        let in_shell = shell_records.iter().any(|r| r.binds(&name));
        let in_routes = routes_records.iter().any(|r| r.binds(&name));
        if !in_shell && !in_routes {
            issues.push(
                Issue::new(
                    IssueKind::MissingImport,
                    Severity::Critical,
                    &path,
                    format!("Component '{}' is not imported in {}", name, shell.path),
                )
                .component(&name)
                .target(&shell.path)
                .finish(),
            );
        } else if in_shell && !is_used(&body, &name) {
            issues.push(
                Issue::new(
                    IssueKind::ImportedButUnused,
                    Severity::Warning,
                    &path,
                    format!("Component '{}' is imported but never rendered", name),
                )
                .component(&name)
                .target(&shell.path)
                .finish(),
            );
        }
    }
    Verification::from_issues(issues)
}

/// Whether the backend entry text references a route module by name.
pub fn is_registered(entry_text: &str, name: &str) -> bool {
    let n = regex::escape(name);
    let pattern = format!(
        r"(?i)(require.*{n}|import.*{n}|from.*{n}.*import|\.use.*{n}|include_router.*{n}|register_blueprint.*{n})",
        n = n
    );
    match Regex::new(&pattern) {
        Ok(re) => re.is_match(entry_text),
        Err(_) => false,
    }
}

/// Check that generated route/controller files are registered with the
/// backend entry file.
///
/// The entry file's own imports are validated as well.
pub fn verify_backend(root: &Path, generated: &[String], opts: &DetectOptions) -> Verification {
    let files = ProjectFiles::scan(root, &opts.exclude_dirs);
    backend_pass(root, &files, generated, opts)
}

fn backend_pass(
    root: &Path,
    files: &ProjectFiles,
    generated: &[String],
    opts: &DetectOptions,
) -> Verification {
    let entry = match load_optional(root, files.find(&opts.backend_candidates), opts) {
        Some(s) => s,
        None => return Verification::no_entry_point("Cannot find main backend entry file"),
    };
    let rules = RuleSet::backend(opts);
    let entry_name = Path::new(&entry.path)
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    let mut issues = validate_source(root, &entry, opts);
    for path in normalize_generated(root, generated) {
        if path == entry.path || !rules.classify(&path).is_required() {
            continue;
        }
        let name = utils::stem(&path);
        if is_registered(&entry.content, &name) {
            continue;
        }
        issues.push(
            Issue::new(
                IssueKind::RouteNotRegistered,
                Severity::Critical,
                &path,
                format!("Route '{}' is not registered in {}", name, entry_name),
            )
            .route_name(&name)
            .target(&entry.path)
            .finish(),
        );
    }
    Verification::from_issues(issues)
}

/// Run every pass relevant to `generated`.
///
/// The project is walked once. Files the backend rules claim as routes are
/// left out of the frontend pass. The frontend pass runs when a page was
/// generated or a shell exists; the backend pass runs when a route or
/// controller was generated.
pub fn verify(root: &Path, generated: &[String], opts: &DetectOptions) -> Verification {
    let frontend_rules = RuleSet::frontend(opts);
    let backend_rules = RuleSet::backend(opts);
    let (backend_generated, frontend_generated): (Vec<String>, Vec<String>) =
        normalize_generated(root, generated)
            .into_iter()
            .partition(|g| backend_rules.classify(g).is_required());

    let files = ProjectFiles::scan(root, &opts.exclude_dirs);
    let shell_abs = files.find(&opts.shell_candidates);
    let wants_frontend = shell_abs.is_some()
        || frontend_generated
            .iter()
            .any(|g| frontend_rules.classify(g).is_required());
    let wants_backend = !backend_generated.is_empty();

    let mut result = Verification::from_issues(Vec::new());
    if wants_frontend {
        result = result.merge(frontend_pass(root, &files, shell_abs, &frontend_generated, opts));
    }
    if wants_backend {
        result = result.merge(backend_pass(root, &files, &backend_generated, opts));
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FixAction, VerifyStatus};
    use std::fs;
    use tempfile::tempdir;

    fn write(root: &Path, rel: &str, body: &str) {
        let p = root.join(rel);
        fs::create_dir_all(p.parent().unwrap()).unwrap();
        fs::write(p, body).unwrap();
    }

    fn gen(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_broken_import_is_not_auto_fixable() {
        let tmp = tempdir().unwrap();
        let root = tmp.path();
        write(
            root,
            "src/App.jsx",
            "import Header from './components/Header';\n\nfunction App() {\n  return <Header />;\n}\nexport default App;\n",
        );
        let v = verify_frontend(root, &[], &DetectOptions::default());
        assert_eq!(v.status, VerifyStatus::IssuesFound);
        assert_eq!(v.issues.len(), 1);
        assert_eq!(v.issues[0].kind, IssueKind::BrokenImport);
        assert!(!v.issues[0].auto_fixable);
        assert!(!v.auto_fixable);
        assert!(v.fix_plan.is_empty());
    }

    #[test]
    fn test_import_resolution_tries_extensions_and_index() {
        let tmp = tempdir().unwrap();
        let root = tmp.path();
        write(root, "src/components/Header.jsx", "");
        write(root, "src/widgets/index.ts", "");
        write(root, "src/data.json", "{}");
        write(
            root,
            "src/App.jsx",
            "import Header from './components/Header';\nimport W from './widgets';\nimport data from './data.json';\n",
        );
        let v = validate_imports(root, "src/App.jsx", &DetectOptions::default());
        assert_eq!(v.status, VerifyStatus::Ok);
    }

    #[test]
    fn test_self_import_is_naming_conflict_only() {
        let tmp = tempdir().unwrap();
        let root = tmp.path();
        write(
            root,
            "src/App.jsx",
            "import React from 'react';\nimport App from './App';\n\nfunction App() {\n  return <div />;\n}\n",
        );
        let v = validate_imports(root, "src/App.jsx", &DetectOptions::default());
        assert_eq!(v.issues.len(), 1);
        let issue = &v.issues[0];
        assert_eq!(issue.kind, IssueKind::NamingConflict);
        assert!(issue.auto_fixable);
        assert_eq!(issue.line, Some(2));
        assert_eq!(
            v.fix_plan,
            vec![FixAction::RemoveInvalidImport {
                target_file: "src/App.jsx".into(),
                import_line: "import App from './App';".into(),
                import_path: Some("./App".into()),
            }]
        );
    }

    #[test]
    fn test_framework_alias_is_not_a_conflict() {
        let tmp = tempdir().unwrap();
        let root = tmp.path();
        write(root, "src/React.jsx", "import React from 'react';\n");
        let v = validate_imports(root, "src/React.jsx", &DetectOptions::default());
        assert_eq!(v.status, VerifyStatus::Ok);
    }

    #[test]
    fn test_outside_project_and_bootstrap_imports() {
        let tmp = tempdir().unwrap();
        let root = tmp.path();
        write(root, "src/main.jsx", "");
        write(
            root,
            "src/App.jsx",
            "import secrets from '../../../etc/secrets';\nimport boot from './main';\n",
        );
        let v = validate_imports(root, "src/App.jsx", &DetectOptions::default());
        let kinds: Vec<_> = v.issues.iter().map(|i| i.kind).collect();
        assert_eq!(kinds, vec![IssueKind::InvalidImport, IssueKind::InvalidImport]);
        assert!(v.auto_fixable);
        assert_eq!(v.fix_plan.len(), 2);
    }

    #[test]
    fn test_bootstrap_may_import_bootstrap_and_barrels_are_fine() {
        let tmp = tempdir().unwrap();
        let root = tmp.path();
        write(root, "src/index.js", "");
        write(root, "src/components/index.js", "");
        write(root, "src/main.jsx", "import x from './index';\n");
        write(root, "src/App.jsx", "import { Button } from './components/index';\n");
        let opts = DetectOptions::default();
        assert_eq!(validate_imports(root, "src/main.jsx", &opts).status, VerifyStatus::Ok);
        assert_eq!(validate_imports(root, "src/App.jsx", &opts).status, VerifyStatus::Ok);
    }

    #[test]
    fn test_unreadable_file_is_skipped() {
        let tmp = tempdir().unwrap();
        let v = validate_imports(tmp.path(), "src/Nope.jsx", &DetectOptions::default());
        assert_eq!(v.status, VerifyStatus::Ok);
    }

    #[test]
    fn test_pages_required_components_not() {
        let tmp = tempdir().unwrap();
        let root = tmp.path();
        write(root, "src/pages/Dashboard.jsx", "");
        write(root, "src/components/Card.jsx", "");
        write(root, "src/hooks/usePage.js", "");
        write(
            root,
            "src/App.jsx",
            "function App() {\n  return (\n    <div>\n    </div>\n  );\n}\nexport default App;\n",
        );
        let v = verify_frontend(
            root,
            &gen(&[
                "src/pages/Dashboard.jsx",
                "src/components/Card.jsx",
                "src/hooks/usePage.js",
                "src/main.jsx",
            ]),
            &DetectOptions::default(),
        );
        assert_eq!(v.issues.len(), 1);
        let issue = &v.issues[0];
        assert_eq!(issue.kind, IssueKind::MissingImport);
        assert_eq!(issue.component.as_deref(), Some("Dashboard"));
        assert_eq!(
            v.fix_plan,
            vec![FixAction::AddImport {
                target_file: "src/App.jsx".into(),
                component: "Dashboard".into(),
                source: "src/pages/Dashboard.jsx".into(),
            }]
        );
    }

    #[test]
    fn test_imported_but_unused_and_routes_file() {
        let tmp = tempdir().unwrap();
        let root = tmp.path();
        write(root, "src/pages/Home.jsx", "");
        write(root, "src/pages/About.jsx", "");
        write(root, "src/pages/Contact.jsx", "");
        write(
            root,
            "src/App.jsx",
            "import Home from './pages/Home';\nimport Contact from './pages/Contact';\n\nfunction App() {\n  return (\n    <div>\n      <Contact />\n    </div>\n  );\n}\n",
        );
        write(root, "src/routes.jsx", "import About from './pages/About';\n");
        let v = verify_frontend(
            root,
            &gen(&["src/pages/Home.jsx", "src/pages/About.jsx", "src/pages/Contact.jsx"]),
            &DetectOptions::default(),
        );
        assert_eq!(v.issues.len(), 1);
        assert_eq!(v.issues[0].kind, IssueKind::ImportedButUnused);
        assert_eq!(v.issues[0].severity, Severity::Warning);
        assert_eq!(v.issues[0].component.as_deref(), Some("Home"));
    }

    #[test]
    fn test_missing_shell_is_a_warning() {
        let tmp = tempdir().unwrap();
        let v = verify_frontend(tmp.path(), &gen(&["src/pages/Home.jsx"]), &DetectOptions::default());
        assert_eq!(v.status, VerifyStatus::Warning);
        assert_eq!(v.count(IssueKind::NoEntryPoint), 1);
        assert!(!v.auto_fixable);
    }

    #[test]
    fn test_route_not_registered() {
        let tmp = tempdir().unwrap();
        let root = tmp.path();
        write(
            root,
            "server.js",
            "const express = require('express');\nconst app = express();\n\napp.listen(3000);\n",
        );
        write(root, "routes/users.js", "");
        write(root, "models/user.js", "");
        let v = verify_backend(
            root,
            &gen(&["routes/users.js", "models/user.js"]),
            &DetectOptions::default(),
        );
        assert_eq!(v.issues.len(), 1);
        assert_eq!(v.issues[0].kind, IssueKind::RouteNotRegistered);
        assert_eq!(v.issues[0].route_name.as_deref(), Some("users"));
        assert_eq!(
            v.fix_plan,
            vec![FixAction::RegisterRoute {
                target_file: "server.js".into(),
                route_file: "routes/users.js".into(),
                route_name: "users".into(),
            }]
        );
    }

    #[test]
    fn test_registered_patterns() {
        assert!(is_registered("const usersRouter = require('./routes/users');", "users"));
        assert!(is_registered("app.use('/api/users', usersRouter);", "users"));
        assert!(is_registered("from routes.users import users_bp", "users"));
        assert!(is_registered("app.include_router(Users.router)", "users"));
        assert!(!is_registered("const x = 1;\nusers\nrequire('a');", "users"));
    }

    #[test]
    fn test_backend_without_entry_point() {
        let tmp = tempdir().unwrap();
        let v = verify_backend(tmp.path(), &gen(&["routes/users.js"]), &DetectOptions::default());
        assert_eq!(v.status, VerifyStatus::Warning);
        assert_eq!(v.issues.len(), 1);
        assert!(v.fix_plan.is_empty());
    }

    #[test]
    fn test_verify_runs_only_relevant_passes() {
        let tmp = tempdir().unwrap();
        let root = tmp.path();
        write(root, "server.js", "app.listen(3000);\n");
        let v = verify(root, &gen(&["routes/orders.js"]), &DetectOptions::default());
        assert_eq!(v.status, VerifyStatus::IssuesFound);
        assert_eq!(v.count(IssueKind::RouteNotRegistered), 1);
        assert_eq!(v.count(IssueKind::NoEntryPoint), 0);
    }

    #[test]
    fn test_dotted_escape_is_outside_project() {
        let tmp = tempdir().unwrap();
        let root = tmp.path();
        write(root, "src/App.jsx", "import secret from './../../../etc/secret';\n");
        let v = validate_imports(root, "src/App.jsx", &DetectOptions::default());
        assert_eq!(v.issues.len(), 1);
        assert_eq!(v.issues[0].kind, IssueKind::InvalidImport);
        assert!(v.auto_fixable);
    }

    #[test]
    fn test_entry_role_exempts_bootstrap_imports() {
        let tmp = tempdir().unwrap();
        let root = tmp.path();
        write(root, "index.js", "");
        write(root, "src/index.js", "");
        write(root, "server.js", "import boot from './index';\n");
        write(root, "src/lib/db.js", "import boot from '../index';\n");
        let opts = DetectOptions::default();
        assert_eq!(validate_imports(root, "server.js", &opts).status, VerifyStatus::Ok);
        let v = validate_imports(root, "src/lib/db.js", &opts);
        assert_eq!(v.count(IssueKind::InvalidImport), 1);
    }

    #[test]
    fn test_backend_entry_imports_are_validated() {
        let tmp = tempdir().unwrap();
        let root = tmp.path();
        write(
            root,
            "server.js",
            "import db from '../../../outside/db.js';\nimport server from './server.js';\nimport x from './nope.js';\nimport express from 'express';\nconst app = express();\napp.listen(3000);\n",
        );
        write(root, "routes/users.js", "");
        let v = verify_backend(root, &gen(&["routes/users.js"]), &DetectOptions::default());
        let kinds: Vec<_> = v.issues.iter().map(|i| i.kind).collect();
        assert_eq!(
            kinds,
            vec![
                IssueKind::InvalidImport,
                IssueKind::NamingConflict,
                IssueKind::BrokenImport,
                IssueKind::RouteNotRegistered,
            ]
        );
        assert_eq!(v.fix_plan.len(), 3);
    }

    #[test]
    fn test_verify_keeps_backend_routes_and_leaf_components_out_of_the_shell() {
        let tmp = tempdir().unwrap();
        let root = tmp.path();
        write(
            root,
            "src/App.jsx",
            "function App() {\n  return (\n    <div>\n    </div>\n  );\n}\nexport default App;\n",
        );
        write(
            root,
            "server.js",
            "const express = require('express');\nconst app = express();\napp.listen(3000);\n",
        );
        write(root, "src/components/Preview.jsx", "");
        write(root, "src/components/FullscreenModal.jsx", "");
        write(root, "routes/pages.js", "");
        let v = verify(
            root,
            &gen(&[
                "src/components/Preview.jsx",
                "src/components/FullscreenModal.jsx",
                "routes/pages.js",
            ]),
            &DetectOptions::default(),
        );
        assert_eq!(v.count(IssueKind::MissingImport), 0);
        assert_eq!(
            v.fix_plan,
            vec![FixAction::RegisterRoute {
                target_file: "server.js".into(),
                route_file: "routes/pages.js".into(),
                route_name: "pages".into(),
            }]
        );
    }

    #[test]
    fn test_pages_whose_names_contain_support_words_are_checked() {
        let tmp = tempdir().unwrap();
        let root = tmp.path();
        write(root, "src/App.jsx", "function App() {\n  return <div />;\n}\n");
        let pages = [
            "src/pages/LatestNews.jsx",
            "src/pages/Contest.jsx",
            "src/pages/Restore.jsx",
            "src/pages/Dashboard.jsx",
        ];
        for p in pages {
            write(root, p, "");
        }
        let v = verify_frontend(root, &gen(&pages), &DetectOptions::default());
        assert_eq!(v.count(IssueKind::MissingImport), 4);
    }

    #[test]
    fn test_is_used_patterns() {
        assert!(is_used("<Home />", "Home"));
        assert!(is_used("element={<Home/>}", "Home"));
        assert!(is_used("component={ Home }", "Home"));
        assert!(!is_used("<HomeLayout />", "Home"));
    }
}
