//! Guarded, idempotent source patching.
//!
//! Each fix action is split into a pure text transformation (`*_text`
//! functions, old content in, new content out) and a thin I/O shell that
//! reads the target fresh, applies the transformation and replaces the file
//! atomically. Actions run strictly in order; a failing action is recorded and
//! never rolls back earlier ones.

use crate::detect;
use crate::error::{Error, Result};
use crate::imports;
use crate::models::{FailedFix, FixAction, FixOutcome, FixStatus, ImportRecord, SkippedFix};
use crate::utils;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Extensions stripped from synthesized import paths.
const STRIP_EXTENSIONS: &[&str] = &[".jsx", ".tsx", ".js", ".ts", ".mjs", ".cjs"];

/// Outcome of one pure transformation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Patched {
    Changed(String),
    Unchanged(&'static str),
}

fn identifier_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z_$][\w$]*$").unwrap())
}

fn declaration_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"\bfunction\s*[A-Za-z_$]?[\w$]*\s*\(|\b(?:const|let|var)\s+[A-Za-z_$][\w$]*\s*=\s*(?:async\s*)?(?:\([^)]*\)|[A-Za-z_$][\w$]*)\s*=>|\bclass\s+[A-Za-z_$][\w$]*",
        )
        .unwrap()
    })
}

fn closing_tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^</([A-Za-z][\w.]*)?>").unwrap())
}

fn export_default_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s*export\s+default\s+(?:async\s+)?(?:function\s+|class\s+)?([A-Za-z_$][\w$]*)")
            .unwrap()
    })
}

fn es_module_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"(?m)^\s*(?:import\s*['"]|import\s+[\w$*{]|export\s)"#).unwrap())
}

fn express_app_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?m)^\s*(?:const|let|var)\s+([A-Za-z_$][\w$]*)\s*=\s*express\(\s*\)").unwrap()
    })
}

fn flask_app_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)^([A-Za-z_]\w*)\s*=\s*(?:Flask|FastAPI)\(").unwrap())
}

fn require_field(value: &str, field: &str, fix: &FixAction) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::Validation(format!(
            "{} is missing required field '{}'",
            fix.name(),
            field
        )));
    }
    Ok(())
}

fn require_identifier(value: &str, field: &str, fix: &FixAction) -> Result<()> {
    require_field(value, field, fix)?;
    if !identifier_re().is_match(value) {
        return Err(Error::Validation(format!(
            "{}: '{}' is not a valid identifier for '{}'",
            fix.name(),
            value,
            field
        )));
    }
    Ok(())
}

/// Reject actions that are structurally unusable before anything is written.
pub fn validate(fix: &FixAction) -> Result<()> {
    let target = fix.target_file();
    require_field(target, "target_file", fix)?;
    let norm = utils::normalize(Path::new(target));
    if norm.is_absolute() || norm.starts_with("..") {
        return Err(Error::Validation(format!(
            "{}: target_file '{}' must stay inside the project",
            fix.name(),
            target
        )));
    }
    match fix {
        FixAction::AddImport {
            component, source, ..
        } => {
            require_identifier(component, "component", fix)?;
            require_field(source, "source", fix)
        }
        FixAction::AddUsage { component, .. } => require_identifier(component, "component", fix),
        FixAction::RemoveInvalidImport { import_line, .. } => {
            require_field(import_line, "import_line", fix)
        }
        FixAction::RegisterRoute {
            route_file,
            route_name,
            ..
        } => {
            require_field(route_file, "route_file", fix)?;
            require_field(route_name, "route_name", fix)?;
            if !route_name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
            {
                return Err(Error::Validation(format!(
                    "register_route: unsupported route name '{}'",
                    route_name
                )));
            }
            Ok(())
        }
    }
}

/// Apply `plan` against the project at `root`.
///
/// Returns `Err` only when an action fails validation; per-action runtime
/// failures are collected in `failed`.
pub fn apply_fixes(root: &Path, plan: &[FixAction]) -> Result<FixOutcome> {
    for fix in plan {
        validate(fix)?;
    }
    let mut fixed = Vec::new();
    let mut skipped = Vec::new();
    let mut failed = Vec::new();
    for fix in plan {
        match apply_one(root, fix) {
            Ok(Patched::Changed(_)) => {
                log::info!("applied {} to {}", fix.name(), fix.target_file());
                fixed.push(fix.clone());
            }
            Ok(Patched::Unchanged(reason)) => {
                log::debug!("skipped {} on {}: {}", fix.name(), fix.target_file(), reason);
                skipped.push(SkippedFix {
                    fix: fix.clone(),
                    reason: reason.to_string(),
                });
            }
            Err(e) => {
                log::warn!("{} on {} failed: {}", fix.name(), fix.target_file(), e);
                failed.push(FailedFix {
                    fix: fix.clone(),
                    error: e.to_string(),
                });
            }
        }
    }
    let status = if failed.is_empty() {
        FixStatus::Success
    } else {
        FixStatus::Partial
    };
    Ok(FixOutcome {
        status,
        fixed,
        skipped,
        failed,
    })
}

fn read_target(root: &Path, target: &str) -> Result<(PathBuf, String)> {
    let abs = root.join(target);
    if !abs.is_file() {
        return Err(Error::Patch(format!("target file not found: {}", target)));
    }
    let content = utils::read_lossy(&abs)?;
    Ok((abs, content))
}

fn commit(abs: &Path, patched: Patched) -> Result<Patched> {
    if let Patched::Changed(text) = &patched {
        utils::write_atomic(abs, text)?;
    }
    Ok(patched)
}

fn apply_one(root: &Path, fix: &FixAction) -> Result<Patched> {
    match fix {
        FixAction::AddImport {
            target_file,
            component,
            source,
        } => {
            if same_file(root, target_file, source) {
                return Ok(Patched::Unchanged("target and source are the same file"));
            }
            let (abs, content) = read_target(root, target_file)?;
            let path = import_path_between(target_file, source);
            commit(&abs, add_import_text(target_file, &content, component, &path))
        }
        FixAction::AddUsage {
            target_file,
            component,
        } => {
            let (abs, content) = read_target(root, target_file)?;
            commit(&abs, add_usage_text(target_file, &content, component)?)
        }
        FixAction::RemoveInvalidImport {
            target_file,
            import_line,
            import_path,
        } => {
            let (abs, content) = read_target(root, target_file)?;
            let (text, removed) =
                remove_import_text(target_file, &content, import_line, import_path.as_deref());
            if removed == 0 {
                return Ok(Patched::Unchanged("import already absent"));
            }
            log::debug!("removed {} import statement(s) from {}", removed, target_file);
            commit(&abs, Patched::Changed(text))
        }
        FixAction::RegisterRoute {
            target_file,
            route_file,
            route_name,
        } => {
            let (abs, content) = read_target(root, target_file)?;
            commit(
                &abs,
                register_route_text(target_file, &content, route_file, route_name),
            )
        }
    }
}

/// Whether `target` and `source` name the same file, either lexically or
/// after resolving extensionless sources and symlinks.
pub fn same_file(root: &Path, target: &str, source: &str) -> bool {
    let t = utils::normalize(&root.join(target));
    let s = utils::normalize(&root.join(source));
    if t == s {
        return true;
    }
    let t_canon = match t.canonicalize() {
        Ok(p) => p,
        Err(_) => return false,
    };
    let mut candidates = vec![s.clone()];
    if utils::extension(source).is_empty() {
        for ext in STRIP_EXTENSIONS {
            let mut os = s.as_os_str().to_os_string();
            os.push(ext);
            candidates.push(PathBuf::from(os));
        }
    }
    candidates
        .iter()
        .filter_map(|c| c.canonicalize().ok())
        .any(|c| c == t_canon)
}

/// Import specifier for `source` as seen from the directory of `target`.
///
/// Falls back to the unmodified `source` when no relative path exists.
pub fn import_path_between(target: &str, source: &str) -> String {
    strip_source_extension(&relative_specifier(target, source))
}

fn relative_specifier(target: &str, source: &str) -> String {
    let target_dir = Path::new(target).parent().unwrap_or_else(|| Path::new(""));
    let source_norm = utils::normalize(Path::new(source));
    let rel = match pathdiff::diff_paths(&source_norm, utils::normalize(target_dir)) {
        Some(p) => utils::to_slash(&p),
        None => return source.replace('\\', "/"),
    };
    if rel.starts_with('.') || rel.starts_with('/') {
        rel
    } else {
        format!("./{}", rel)
    }
}

fn strip_source_extension(path: &str) -> String {
    for ext in STRIP_EXTENSIONS {
        if let Some(stripped) = path.strip_suffix(ext) {
            return stripped.to_string();
        }
    }
    path.to_string()
}

fn split_lines(content: &str) -> Vec<String> {
    content.split('\n').map(|s| s.to_string()).collect()
}

fn last_import_end(records: &[ImportRecord]) -> usize {
    records.iter().map(|r| r.end_line).max().unwrap_or(0)
}

/// Insert `import <component> from '<path>';` after the last import.
pub fn add_import_text(owner: &str, content: &str, component: &str, path: &str) -> Patched {
    let records = imports::extract(owner, content);
    if records.iter().any(|r| r.binds(component)) {
        return Patched::Unchanged("symbol already imported");
    }
    let mut lines = split_lines(content);
    let at = last_import_end(&records).min(lines.len());
    lines.insert(at, format!("import {} from '{}';", component, path));
    Patched::Changed(lines.join("\n"))
}

fn quoted_tokens(line: &str) -> Vec<&str> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r#"['"]([^'"]+)['"]"#).unwrap());
    re.captures_iter(line)
        .filter_map(|c| c.get(1).map(|m| m.as_str()))
        .collect()
}

/// Remove the flagged import statement(s). Returns the new text and how many
/// statements or stray lines were removed.
pub fn remove_import_text(
    owner: &str,
    content: &str,
    import_line: &str,
    import_path: Option<&str>,
) -> (String, usize) {
    let wanted = utils::squash_ws(import_line.trim());
    let lines = split_lines(content);
    let mut drop = vec![false; lines.len()];
    let mut removed = 0usize;

    for rec in imports::extract(owner, content) {
        let same_text = utils::squash_ws(&rec.raw_line) == wanted;
        let same_path = import_path.map(|p| rec.import_path == p).unwrap_or(false);
        if !same_text && !same_path {
            continue;
        }
        for idx in (rec.line_number - 1)..rec.end_line.min(lines.len()) {
            drop[idx] = true;
        }
        removed += 1;
    }
    for (idx, line) in lines.iter().enumerate() {
        if drop[idx] {
            continue;
        }
        let stray_text = utils::squash_ws(line.trim()) == wanted;
        let stray_path = import_path
            .map(|p| looks_like_import(line) && quoted_tokens(line).contains(&p))
            .unwrap_or(false);
        if stray_text || stray_path {
            drop[idx] = true;
            removed += 1;
        }
    }
    let kept: Vec<&str> = lines
        .iter()
        .zip(drop.iter())
        .filter(|(_, d)| !**d)
        .map(|(l, _)| l.as_str())
        .collect();
    (kept.join("\n"), removed)
}

fn looks_like_import(line: &str) -> bool {
    let t = line.trim_start();
    t.starts_with("import ") || t.starts_with("from ") || t.contains("require(")
}

/// Identifier built from a file stem or route name (`user-routes` → `userRoutes`).
pub fn camel_identifier(name: &str, upper_first: bool) -> String {
    let mut out = String::new();
    let mut upper_next = upper_first;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() || c == '_' || c == '$' {
            if upper_next {
                out.push(c.to_ascii_uppercase());
            } else {
                out.push(c);
            }
            upper_next = false;
        } else {
            upper_next = !out.is_empty();
        }
    }
    if out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    out
}

fn snake_identifier(name: &str) -> String {
    let s: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    if s.starts_with(|c: char| c.is_ascii_digit()) {
        format!("_{}", s)
    } else {
        s
    }
}

fn in_import_span(line_idx: usize, records: &[ImportRecord]) -> bool {
    let n = line_idx + 1;
    records.iter().any(|r| n >= r.line_number && n <= r.end_line)
}

/// Render `<component />` inside the target's markup.
pub fn add_usage_text(owner: &str, content: &str, component: &str) -> Result<Patched> {
    let tag_re = Regex::new(&format!(r"<{}\b", regex::escape(component)))
        .map_err(|e| Error::Patch(e.to_string()))?;
    if tag_re.is_match(content) {
        return Ok(Patched::Unchanged("component already rendered"));
    }
    let records = imports::extract(owner, content);
    let lines = split_lines(content);
    let body: Vec<&str> = lines
        .iter()
        .enumerate()
        .filter(|(i, _)| !in_import_span(*i, &records))
        .map(|(_, l)| l.as_str())
        .collect();
    let body_text = body.join("\n");
    let has_decl = declaration_re().is_match(&body_text);
    let has_return = body_text.contains("return");
    let has_tag = body.iter().any(|l| {
        l.char_indices()
            .any(|(i, c)| c == '<' && l[i + 1..].starts_with(|n: char| n.is_ascii_alphabetic() || n == '/' || n == '>'))
    });
    if !has_decl && !has_return && !has_tag {
        return Ok(Patched::Changed(component_wrapper(owner, &lines, &records, component)));
    }

    let usage = |indent: &str| format!("{}<{} />", indent, component);
    let mut lines = lines;
    if let Some((at, indent)) = return_block_slot(&lines) {
        lines.insert(at, usage(&indent));
    } else if let Some((at, indent)) = closing_container_slot(&lines) {
        lines.insert(at, usage(&indent));
    } else if let Some((at, indent)) = final_brace_slot(&lines) {
        lines.insert(at, usage(&indent));
    } else {
        return Err(Error::Patch(format!(
            "no insertion point for <{} /> in {}",
            component, owner
        )));
    }
    Ok(Patched::Changed(lines.join("\n")))
}

fn component_wrapper(
    owner: &str,
    lines: &[String],
    records: &[ImportRecord],
    component: &str,
) -> String {
    let name = {
        let n = camel_identifier(&utils::stem(owner), true);
        if n.is_empty() {
            "App".to_string()
        } else {
            n
        }
    };
    let mut out: Vec<String> = lines
        .iter()
        .enumerate()
        .filter(|(i, _)| in_import_span(*i, records))
        .map(|(_, l)| l.clone())
        .collect();
    if !out.is_empty() {
        out.push(String::new());
    }
    out.push(format!("function {}() {{", name));
    out.push("  return (".to_string());
    out.push("    <div>".to_string());
    out.push(format!("      <{} />", component));
    out.push("    </div>".to_string());
    out.push("  );".to_string());
    out.push("}".to_string());
    out.push(String::new());
    out.push(format!("export default {};", name));
    out.push(String::new());
    out.join("\n")
}

fn is_return_block(line: &str) -> bool {
    let t = line.trim_start();
    t.starts_with("return (") || t.starts_with("return(")
}

/// Brace depth at the start of each line.
fn brace_depths(lines: &[String]) -> Vec<i32> {
    let mut depth = 0;
    let mut out = Vec::with_capacity(lines.len());
    for line in lines {
        out.push(depth);
        for c in line.chars() {
            match c {
                '{' => depth += 1,
                '}' => depth -= 1,
                _ => {}
            }
        }
    }
    out
}

/// Whether `line` declares `name` as a function, binding or class.
fn declares(line: &str, name: &str) -> bool {
    let mut t = line.trim_start();
    for prefix in ["export ", "default ", "async "] {
        t = t.strip_prefix(prefix).map(str::trim_start).unwrap_or(t);
    }
    ["function ", "const ", "let ", "var ", "class "].iter().any(|kw| {
        t.strip_prefix(kw)
            .and_then(|rest| rest.trim_start().strip_prefix(name))
            .is_some_and(|rest| {
                !rest.starts_with(|c: char| c.is_alphanumeric() || c == '_' || c == '$')
            })
    })
}

/// The `return (` line of the component the file renders: among the
/// shallowest `return (` lines, the first one after the default-exported
/// declaration, else the last one. Returns nested in callbacks sit deeper
/// and are never chosen over the component's own.
fn primary_return(lines: &[String]) -> Option<usize> {
    let depths = brace_depths(lines);
    let returns: Vec<usize> = (0..lines.len()).filter(|i| is_return_block(&lines[*i])).collect();
    let shallowest = returns.iter().map(|i| depths[*i]).min()?;
    let top: Vec<usize> = returns
        .into_iter()
        .filter(|i| depths[*i] == shallowest)
        .collect();
    let exported = lines
        .iter()
        .find_map(|l| export_default_re().captures(l).map(|c| c[1].to_string()));
    let decl = exported.and_then(|name| {
        (0..lines.len()).find(|i| depths[*i] == 0 && declares(&lines[*i], &name))
    });
    match decl {
        Some(d) => top
            .iter()
            .copied()
            .find(|i| *i >= d)
            .or_else(|| top.last().copied()),
        None => top.last().copied(),
    }
}

/// Strategy 1: before the last closing tag of the component's multi-line
/// `return (...)` block.
fn return_block_slot(lines: &[String]) -> Option<(usize, String)> {
    let start = primary_return(lines)?;
    let mut depth: i32 = 0;
    let mut end = None;
    'outer: for (idx, line) in lines.iter().enumerate().skip(start) {
        let from = if idx == start {
            line.find("return").map(|p| p + "return".len()).unwrap_or(0)
        } else {
            0
        };
        for c in line[from..].chars() {
            match c {
                '(' => depth += 1,
                ')' => {
                    depth -= 1;
                    if depth == 0 {
                        end = Some(idx);
                        break 'outer;
                    }
                }
                _ => {}
            }
        }
    }
    let end = end?;
    (start + 1..=end)
        .rev()
        .find(|i| lines[*i].trim_start().starts_with("</"))
        .map(|i| (i, format!("{}  ", utils::indent_of(&lines[i]))))
}

/// Strategy 2: before the last generic closing container tag in the file.
fn closing_container_slot(lines: &[String]) -> Option<(usize, String)> {
    lines
        .iter()
        .rposition(|l| closing_tag_re().is_match(l.trim_start()))
        .map(|i| (i, format!("{}  ", utils::indent_of(&lines[i]))))
}

/// Strategy 3: before the file's final closing brace.
fn final_brace_slot(lines: &[String]) -> Option<(usize, String)> {
    lines
        .iter()
        .rposition(|l| l.trim_start().starts_with('}'))
        .map(|i| (i, format!("{}  ", utils::indent_of(&lines[i]))))
}

fn is_server_start(line: &str) -> bool {
    line.contains(".listen(") || line.trim_start().starts_with("if __name__")
}

/// Import and register a route module with the backend entry file.
pub fn register_route_text(
    owner: &str,
    content: &str,
    route_file: &str,
    route_name: &str,
) -> Patched {
    if detect::is_registered(content, route_name) {
        return Patched::Unchanged("route already registered");
    }
    let records = imports::extract(owner, content);
    let (import_line, register_line) = if utils::extension(owner) == ".py" {
        python_route_lines(content, owner, route_file, route_name)
    } else {
        script_route_lines(content, &records, owner, route_file, route_name)
    };

    let mut lines = split_lines(content);
    let last_import_like = lines
        .iter()
        .rposition(|l| looks_like_import(l))
        .map(|i| i + 1)
        .unwrap_or(0);
    let at = last_import_like.max(last_import_end(&records)).min(lines.len());
    lines.insert(at, import_line);

    match lines.iter().position(|l| is_server_start(l)) {
        Some(i) => {
            let indent = utils::indent_of(&lines[i]).to_string();
            lines.insert(i, format!("{}{}", indent, register_line));
        }
        None => {
            // keep a trailing newline trailing
            let at = if lines.last().map(|l| l.is_empty()).unwrap_or(false) {
                lines.len() - 1
            } else {
                lines.len()
            };
            lines.insert(at, register_line);
        }
    }
    Patched::Changed(lines.join("\n"))
}

/// Extensions an ES import of a route module drops; `.js` stays, as Node's
/// ESM resolver needs it.
const ESM_STRIP_EXTENSIONS: &[&str] = &[".tsx", ".ts"];

/// Whether the module is written with ES `import`/`export` statements,
/// including bare side-effect imports, and no `require(` calls.
fn is_es_module(content: &str, records: &[ImportRecord]) -> bool {
    !content.contains("require(") && (!records.is_empty() || es_module_re().is_match(content))
}

fn script_route_lines(
    content: &str,
    records: &[ImportRecord],
    owner: &str,
    route_file: &str,
    route_name: &str,
) -> (String, String) {
    let var = format!("{}Router", camel_identifier(route_name, false));
    let app = express_app_re()
        .captures(content)
        .map(|c| c[1].to_string())
        .unwrap_or_else(|| "app".to_string());
    let import_line = if is_es_module(content, records) {
        let spec = relative_specifier(owner, route_file);
        let spec = ESM_STRIP_EXTENSIONS
            .iter()
            .find_map(|e| spec.strip_suffix(e))
            .unwrap_or(&spec);
        format!("import {} from '{}';", var, spec)
    } else {
        format!(
            "const {} = require('{}');",
            var,
            import_path_between(owner, route_file)
        )
    };
    let register_line = format!("{}.use('/api/{}', {});", app, route_name, var);
    (import_line, register_line)
}

fn python_route_lines(
    content: &str,
    owner: &str,
    route_file: &str,
    route_name: &str,
) -> (String, String) {
    let var = format!("{}_bp", snake_identifier(route_name));
    let app = flask_app_re()
        .captures(content)
        .map(|c| c[1].to_string())
        .unwrap_or_else(|| "app".to_string());
    let module_path = route_file.strip_suffix(".py").unwrap_or(route_file);
    let rel = relative_specifier(owner, module_path);
    let dotted_source = if rel.starts_with("../") || rel.starts_with('/') {
        module_path.replace('\\', "/")
    } else {
        rel.trim_start_matches("./").to_string()
    };
    let module = dotted_source.replace('/', ".");
    (
        format!("from {} import {}", module, var),
        format!("{}.register_blueprint({})", app, var),
    )
}
