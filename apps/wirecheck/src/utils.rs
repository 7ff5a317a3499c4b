//! Supporting helpers: path normalization, lossy reads, atomic writes and
//! colored message prefixes.

use crate::error::{Error, Result};
use owo_colors::OwoColorize;
use std::fs;
use std::io::Write;
use std::path::{Component, Path, PathBuf};

fn colors_enabled() -> bool {
    std::env::var_os("NO_COLOR").is_none()
}

pub fn error_prefix() -> String {
    if colors_enabled() {
        "error:".red().bold().to_string()
    } else {
        "error:".to_string()
    }
}

pub fn note_prefix() -> String {
    if colors_enabled() {
        "note:".cyan().bold().to_string()
    } else {
        "note:".to_string()
    }
}

pub fn info_prefix() -> String {
    if colors_enabled() {
        "info:".blue().bold().to_string()
    } else {
        "info:".to_string()
    }
}

/// Render a path with forward slashes regardless of platform.
pub fn to_slash(p: &Path) -> String {
    p.to_string_lossy().replace('\\', "/")
}

/// Lexically normalize a path: drop `.` segments and fold `..` into the
/// preceding normal segment when there is one.
pub fn normalize(p: &Path) -> PathBuf {
    let mut out: Vec<Component> = Vec::new();
    for c in p.components() {
        match c {
            Component::CurDir => {}
            Component::ParentDir => match out.last() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                _ => out.push(c),
            },
            other => out.push(other),
        }
    }
    out.iter().collect()
}

/// Project-relative, forward-slash form of `p` (which may be absolute or
/// already relative to `root`).
pub fn project_relative(root: &Path, p: &Path) -> String {
    let abs = if p.is_absolute() {
        p.to_path_buf()
    } else {
        root.join(p)
    };
    let abs = normalize(&abs);
    let root = normalize(root);
    match abs.strip_prefix(&root) {
        Ok(rel) => to_slash(rel),
        Err(_) => to_slash(&abs),
    }
}

/// File stem (module name) of a slash or platform path.
pub fn stem(p: &str) -> String {
    Path::new(p)
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default()
}

/// Lowercased extension including the leading dot, or empty.
pub fn extension(p: &str) -> String {
    Path::new(p)
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy().to_ascii_lowercase()))
        .unwrap_or_default()
}

/// Read a file as text, replacing invalid UTF-8 sequences.
pub fn read_lossy(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(|e| Error::io(path, e))?;
    Ok(match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
    })
}

/// Replace `path` with `contents` via a temporary sibling file and rename,
/// so readers never observe a half-written file.
pub fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let dir = path
        .parent()
        .filter(|d| !d.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| Error::io(dir, e))?;
    tmp.write_all(contents.as_bytes())
        .map_err(|e| Error::io(tmp.path(), e))?;
    tmp.flush().map_err(|e| Error::io(tmp.path(), e))?;
    // temp files are created 0600; keep the target's mode
    if let Ok(meta) = fs::metadata(path) {
        fs::set_permissions(tmp.path(), meta.permissions())
            .map_err(|e| Error::io(tmp.path(), e))?;
    }
    tmp.persist(path).map_err(|e| Error::io(path, e.error))?;
    Ok(())
}

/// Leading whitespace of a line.
pub fn indent_of(line: &str) -> &str {
    &line[..line.len() - line.trim_start().len()]
}

/// Collapse runs of whitespace so two spellings of one statement compare equal.
pub fn squash_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Lowercased words of an identifier-like name.
///
/// Splits on punctuation and on case changes: `usePageHook` gives
/// `use, page, hook`, `HTTPServer` gives `http, server`, `user_routes.test`
/// gives `user, routes, test`.
pub fn words(name: &str) -> Vec<String> {
    let mut out = Vec::new();
    for part in name.split(|c: char| !c.is_ascii_alphanumeric()) {
        let chars: Vec<char> = part.chars().collect();
        let mut cur = String::new();
        for (i, &c) in chars.iter().enumerate() {
            let boundary = i > 0
                && c.is_ascii_uppercase()
                && (!chars[i - 1].is_ascii_uppercase()
                    || chars.get(i + 1).is_some_and(|n| n.is_ascii_lowercase()));
            if boundary && !cur.is_empty() {
                out.push(cur.to_ascii_lowercase());
                cur.clear();
            }
            cur.push(c);
        }
        if !cur.is_empty() {
            out.push(cur.to_ascii_lowercase());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_normalize_folds_parent_segments() {
        assert_eq!(
            normalize(Path::new("src/./pages/../App.jsx")),
            PathBuf::from("src/App.jsx")
        );
        assert_eq!(normalize(Path::new("../a/b")), PathBuf::from("../a/b"));
    }

    #[test]
    fn test_project_relative_handles_absolute_and_relative() {
        let root = Path::new("/proj");
        assert_eq!(
            project_relative(root, Path::new("/proj/src/App.jsx")),
            "src/App.jsx"
        );
        assert_eq!(project_relative(root, Path::new("src/App.jsx")), "src/App.jsx");
    }

    #[test]
    fn test_words_split_on_case_and_punctuation() {
        assert_eq!(words("usePageHook"), vec!["use", "page", "hook"]);
        assert_eq!(words("HTTPServer"), vec!["http", "server"]);
        assert_eq!(words("user_routes.test"), vec!["user", "routes", "test"]);
        assert_eq!(words("LatestNews"), vec!["latest", "news"]);
        assert_eq!(words("Contest"), vec!["contest"]);
        assert!(words("").is_empty());
    }

    #[test]
    fn test_read_lossy_replaces_invalid_bytes() {
        let tmp = tempdir().unwrap();
        let p = tmp.path().join("bad.js");
        fs::write(&p, b"const a = '\xff';\n").unwrap();
        let s = read_lossy(&p).unwrap();
        assert!(s.contains('\u{FFFD}'));
    }

    #[test]
    fn test_write_atomic_replaces_content() {
        let tmp = tempdir().unwrap();
        let p = tmp.path().join("a.txt");
        fs::write(&p, "old").unwrap();
        write_atomic(&p, "new").unwrap();
        assert_eq!(fs::read_to_string(&p).unwrap(), "new");
        // no temp leftovers beside the target
        assert_eq!(fs::read_dir(tmp.path()).unwrap().count(), 1);
    }
}
