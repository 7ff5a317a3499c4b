//! Import statement extraction, one implementation per language family.
//!
//! Extraction is line-oriented: a small scanner first marks which lines start
//! in plain code (outside block comments, template literals and triple-quoted
//! strings), and only those lines may open an import statement. Multi-line
//! statements are joined into a single record spanning `line_number..=end_line`.

use crate::models::ImportRecord;
use crate::utils;
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::OnceLock;

/// Upper bound on physical lines folded into one import statement.
const MAX_STATEMENT_LINES: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Syntax {
    EcmaScript,
    Python,
}

/// Language-family specific import handling.
pub trait ImportExtractor: Sync {
    fn syntax(&self) -> Syntax;

    /// Source extensions tried when resolving an extensionless import.
    fn extensions(&self) -> &'static [&'static str];

    /// File stem that makes a directory importable (`index`, `__init__`).
    fn index_stem(&self) -> &'static str;

    /// Parse import statements out of `text`.
    fn extract(&self, owner: &str, text: &str) -> Vec<ImportRecord>;

    /// Slash path of a relative import, `None` for package imports.
    fn relative_path(&self, import_path: &str) -> Option<String>;
}

pub struct EcmaScriptImports;
pub struct PythonImports;

static ECMASCRIPT: EcmaScriptImports = EcmaScriptImports;
static PYTHON: PythonImports = PythonImports;

const ES_EXTENSIONS: &[&str] = &[
    ".js", ".jsx", ".ts", ".tsx", ".mjs", ".cjs", ".vue", ".svelte", ".json",
];
const PY_EXTENSIONS: &[&str] = &[".py"];

/// Pick the extractor for a file by its extension.
pub fn extractor_for(path: &str) -> Option<&'static dyn ImportExtractor> {
    let ext = utils::extension(path);
    match ext.as_str() {
        ".py" => Some(&PYTHON),
        ".json" | "" => None,
        e if ES_EXTENSIONS.contains(&e) => Some(&ECMASCRIPT),
        _ => None,
    }
}

/// Convenience: extract imports from `text` when `owner` has a known syntax.
pub fn extract(owner: &str, text: &str) -> Vec<ImportRecord> {
    extractor_for(owner)
        .map(|x| x.extract(owner, text))
        .unwrap_or_default()
}

/// How many levels above its own directory a relative slash path climbs once
/// `.` and `name/..` pairs are folded away.
pub fn parent_levels(rel: &str) -> usize {
    let mut depth = 0usize;
    let mut escaped = 0usize;
    for seg in rel.split('/') {
        match seg {
            "" | "." => {}
            ".." if depth > 0 => depth -= 1,
            ".." => escaped += 1,
            _ => depth += 1,
        }
    }
    escaped
}

fn es_import_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"^import\s+(?:type\s+)?(.+?)\s*\bfrom\s*['"]([^'"]+)['"]"#).unwrap()
    })
}

fn py_from_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^from\s+(\.*[\w.]*)\s+import\s+(.+)$").unwrap())
}

fn py_import_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^import\s+(.+)$").unwrap())
}

fn ident_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[A-Za-z_$][\w$]*").unwrap())
}

fn names_of(blob: &str) -> BTreeSet<String> {
    ident_re()
        .find_iter(blob)
        .map(|m| m.as_str())
        .filter(|t| !matches!(*t, "as" | "type" | "default" | "typeof"))
        .map(|t| t.to_string())
        .collect()
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Scan {
    Code,
    Block,
    Template,
    Triple(char),
}

/// For each line, whether it begins in plain code.
pub fn code_line_starts(text: &str, syntax: Syntax) -> Vec<bool> {
    let mut out = Vec::new();
    let mut state = Scan::Code;
    for line in text.split('\n') {
        out.push(state == Scan::Code);
        state = match syntax {
            Syntax::EcmaScript => scan_es_line(line, state),
            Syntax::Python => scan_py_line(line, state),
        };
    }
    out
}

fn scan_es_line(line: &str, mut state: Scan) -> Scan {
    let chars: Vec<char> = line.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        let next = chars.get(i + 1).copied();
        match state {
            Scan::Block => {
                if c == '*' && next == Some('/') {
                    state = Scan::Code;
                    i += 1;
                }
            }
            Scan::Template => {
                if c == '\\' {
                    i += 1;
                } else if c == '`' {
                    state = Scan::Code;
                }
            }
            Scan::Code => match c {
                '/' if next == Some('/') => return Scan::Code,
                '/' if next == Some('*') => {
                    state = Scan::Block;
                    i += 1;
                }
                '`' => state = Scan::Template,
                '\'' | '"' => {
                    // single-line string: skip to its closing quote
                    i += 1;
                    while i < chars.len() && chars[i] != c {
                        if chars[i] == '\\' {
                            i += 1;
                        }
                        i += 1;
                    }
                }
                _ => {}
            },
            Scan::Triple(_) => state = Scan::Code,
        }
        i += 1;
    }
    state
}

fn scan_py_line(line: &str, mut state: Scan) -> Scan {
    let chars: Vec<char> = line.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        match state {
            Scan::Triple(q) => {
                if c == '\\' {
                    i += 1;
                } else if c == q && chars.get(i + 1) == Some(&q) && chars.get(i + 2) == Some(&q) {
                    state = Scan::Code;
                    i += 2;
                }
            }
            Scan::Code => match c {
                '#' => return Scan::Code,
                '\'' | '"' => {
                    if chars.get(i + 1) == Some(&c) && chars.get(i + 2) == Some(&c) {
                        state = Scan::Triple(c);
                        i += 2;
                    } else {
                        i += 1;
                        while i < chars.len() && chars[i] != c {
                            if chars[i] == '\\' {
                                i += 1;
                            }
                            i += 1;
                        }
                    }
                }
                _ => {}
            },
            _ => state = Scan::Code,
        }
        i += 1;
    }
    state
}

fn opens_es_import(trimmed: &str) -> bool {
    trimmed
        .strip_prefix("import")
        .map(|rest| rest.starts_with(|c: char| c.is_whitespace() || c == '{' || c == '*'))
        .unwrap_or(false)
}

fn es_statement_complete(stmt: &str) -> bool {
    es_import_re().is_match(stmt)
        || stmt.contains(';')
        || stmt["import".len()..].trim_start().starts_with(['\'', '"'])
}

impl ImportExtractor for EcmaScriptImports {
    fn syntax(&self) -> Syntax {
        Syntax::EcmaScript
    }

    fn extensions(&self) -> &'static [&'static str] {
        ES_EXTENSIONS
    }

    fn index_stem(&self) -> &'static str {
        "index"
    }

    fn extract(&self, owner: &str, text: &str) -> Vec<ImportRecord> {
        let lines: Vec<&str> = text.split('\n').collect();
        let starts = code_line_starts(text, Syntax::EcmaScript);
        let mut out = Vec::new();
        let mut i = 0;
        while i < lines.len() {
            let first = lines[i].trim();
            if !starts[i] || !opens_es_import(first) {
                i += 1;
                continue;
            }
            let mut stmt = first.to_string();
            let mut end = i;
            while !es_statement_complete(&stmt)
                && end + 1 < lines.len()
                && end - i < MAX_STATEMENT_LINES
                && !opens_es_import(lines[end + 1].trim())
            {
                end += 1;
                stmt.push(' ');
                stmt.push_str(lines[end].trim());
            }
            if let Some(caps) = es_import_re().captures(&stmt) {
                out.push(ImportRecord {
                    raw_line: utils::squash_ws(&stmt),
                    line_number: i + 1,
                    end_line: end + 1,
                    imported_names: names_of(&caps[1]),
                    import_path: caps[2].to_string(),
                    owner_file: owner.to_string(),
                });
            }
            i = end + 1;
        }
        out
    }

    fn relative_path(&self, import_path: &str) -> Option<String> {
        let p = import_path.trim();
        if p == "." || p == ".." || p.starts_with("./") || p.starts_with("../") {
            Some(p.to_string())
        } else {
            None
        }
    }
}

fn strip_py_comment(line: &str) -> &str {
    match line.find('#') {
        Some(idx) => &line[..idx],
        None => line,
    }
}

impl ImportExtractor for PythonImports {
    fn syntax(&self) -> Syntax {
        Syntax::Python
    }

    fn extensions(&self) -> &'static [&'static str] {
        PY_EXTENSIONS
    }

    fn index_stem(&self) -> &'static str {
        "__init__"
    }

    fn extract(&self, owner: &str, text: &str) -> Vec<ImportRecord> {
        let lines: Vec<&str> = text.split('\n').collect();
        let starts = code_line_starts(text, Syntax::Python);
        let mut out = Vec::new();
        let mut i = 0;
        while i < lines.len() {
            let first = strip_py_comment(lines[i]).trim();
            if !starts[i] || !(first.starts_with("from ") || first.starts_with("import ")) {
                i += 1;
                continue;
            }
            let mut stmt = first.to_string();
            let mut end = i;
            // parenthesized or backslash-continued name lists
            while (stmt.matches('(').count() > stmt.matches(')').count() || stmt.ends_with('\\'))
                && end + 1 < lines.len()
                && end - i < MAX_STATEMENT_LINES
            {
                end += 1;
                stmt = stmt.trim_end_matches('\\').to_string();
                stmt.push(' ');
                stmt.push_str(strip_py_comment(lines[end]).trim());
            }
            let raw = utils::squash_ws(&stmt);
            if let Some(caps) = py_from_re().captures(&stmt) {
                out.push(ImportRecord {
                    raw_line: raw,
                    line_number: i + 1,
                    end_line: end + 1,
                    imported_names: names_of(&caps[2].replace(['(', ')'], " ")),
                    import_path: caps[1].to_string(),
                    owner_file: owner.to_string(),
                });
            } else if let Some(caps) = py_import_re().captures(&stmt) {
                for part in caps[1].split(',') {
                    let mut words = part.split_whitespace();
                    let module = match words.next() {
                        Some(m) => m.to_string(),
                        None => continue,
                    };
                    let bound = match (words.next(), words.next()) {
                        (Some("as"), Some(alias)) => alias.to_string(),
                        _ => module.split('.').next().unwrap_or(&module).to_string(),
                    };
                    out.push(ImportRecord {
                        raw_line: raw.clone(),
                        line_number: i + 1,
                        end_line: end + 1,
                        imported_names: BTreeSet::from([bound]),
                        import_path: module,
                        owner_file: owner.to_string(),
                    });
                }
            }
            i = end + 1;
        }
        out
    }

    fn relative_path(&self, import_path: &str) -> Option<String> {
        let dots = import_path.chars().take_while(|c| *c == '.').count();
        if dots == 0 {
            return None;
        }
        let rest = import_path[dots..].replace('.', "/");
        let prefix = if dots == 1 {
            ".".to_string()
        } else {
            vec![".."; dots - 1].join("/")
        };
        if rest.is_empty() {
            Some(prefix)
        } else {
            Some(format!("{}/{}", prefix, rest))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn es(text: &str) -> Vec<ImportRecord> {
        EcmaScriptImports.extract("src/App.jsx", text)
    }

    #[test]
    fn test_es_default_named_and_namespace_forms() {
        let text = "import React from 'react';\nimport { useState, useEffect as ue } from \"react\";\nimport * as api from './api';\nimport Header, { Footer } from './components/Layout';\n";
        let recs = es(text);
        assert_eq!(recs.len(), 4);
        assert!(recs[0].binds("React"));
        assert_eq!(recs[0].import_path, "react");
        assert!(recs[1].binds("useState") && recs[1].binds("ue"));
        assert!(recs[2].binds("api"));
        assert_eq!(recs[2].line_number, 3);
        assert!(recs[3].binds("Header") && recs[3].binds("Footer"));
        assert_eq!(recs[3].import_path, "./components/Layout");
    }

    #[test]
    fn test_es_multiline_import_spans_lines() {
        let text = "import {\n  Alpha,\n  Beta,\n} from './letters';\nconst x = 1;\n";
        let recs = es(text);
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].line_number, 1);
        assert_eq!(recs[0].end_line, 4);
        assert!(recs[0].binds("Alpha") && recs[0].binds("Beta"));
    }

    #[test]
    fn test_es_ignores_comments_and_template_literals() {
        let text = "/*\nimport Ghost from './Ghost';\n*/\nconst s = `\nimport Phantom from './Phantom';\n`;\n// import Nope from './Nope';\nimport Real from './Real';\n";
        let recs = es(text);
        assert_eq!(recs.len(), 1);
        assert!(recs[0].binds("Real"));
        assert_eq!(recs[0].line_number, 8);
    }

    #[test]
    fn test_es_side_effect_import_is_not_a_record() {
        let recs = es("import './index.css';\nimport App from './App';\n");
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].line_number, 2);
    }

    #[test]
    fn test_python_from_and_plain_imports() {
        let text = "import os, json as j\nfrom .routes.users import users_bp\nfrom flask import (\n    Flask,\n    jsonify,\n)\n\"\"\"\nfrom fake import nothing\n\"\"\"\n";
        let recs = PythonImports.extract("app.py", text);
        assert_eq!(recs.len(), 4);
        assert!(recs[0].binds("os"));
        assert!(recs[1].binds("j"));
        assert_eq!(recs[2].import_path, ".routes.users");
        assert!(recs[3].binds("Flask") && recs[3].binds("jsonify"));
        assert_eq!(recs[3].end_line, 6);
    }

    #[test]
    fn test_relative_paths() {
        assert_eq!(
            EcmaScriptImports.relative_path("../../../x"),
            Some("../../../x".to_string())
        );
        assert_eq!(EcmaScriptImports.relative_path("react"), None);
        assert_eq!(
            PythonImports.relative_path(".routes.users"),
            Some("./routes/users".to_string())
        );
        assert_eq!(
            PythonImports.relative_path("...models"),
            Some("../models".to_string())
        );
        assert_eq!(PythonImports.relative_path("flask"), None);
        assert_eq!(parent_levels("../../../x"), 3);
        assert_eq!(parent_levels("./a/../b"), 0);
        assert_eq!(parent_levels("./../../../etc/secret"), 3);
        assert_eq!(parent_levels("a/../../../../x"), 3);
        assert_eq!(parent_levels("../a/b/../../c"), 1);
    }

    #[test]
    fn test_extractor_for_extension() {
        assert_eq!(extractor_for("a/App.tsx").unwrap().syntax(), Syntax::EcmaScript);
        assert_eq!(extractor_for("main.py").unwrap().syntax(), Syntax::Python);
        assert!(extractor_for("README.md").is_none());
    }
}
