//! Entry-point lookup and fresh source loading.
//!
//! Lookup is a pure read: candidates are tried in order and the first
//! candidate with any match wins. Among several matches of one candidate a
//! path with a `src` segment is preferred, then the shallowest path, then
//! lexicographic order, so the answer does not depend on directory-walk order.

use crate::error::Result;
use crate::models::{FileRole, SourceFile};
use crate::utils;
use glob::Pattern;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Directory names pruned from every walk. Entries may be glob patterns
/// (`*.egg-info`); anything that does not parse is matched literally.
pub struct Excludes(Vec<Pattern>);

impl Excludes {
    pub fn new(dirs: &[String]) -> Self {
        let patterns = dirs
            .iter()
            .filter_map(|d| match Pattern::new(d) {
                Ok(p) => Some(p),
                Err(e) => {
                    log::debug!("exclude {} is not a glob ({}); matching literally", d, e);
                    Pattern::new(&Pattern::escape(d)).ok()
                }
            })
            .collect();
        Excludes(patterns)
    }

    pub fn matches(&self, dir_name: &str) -> bool {
        self.0.iter().any(|p| p.matches(dir_name))
    }
}

/// Every file below `root` in path order. Excluded directories are pruned
/// and never descended into.
pub fn walk(root: &Path, exclude_dirs: &[String]) -> Vec<PathBuf> {
    let excludes = Excludes::new(exclude_dirs);
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            e.depth() == 0
                || !(e.file_type().is_dir() && excludes.matches(&e.file_name().to_string_lossy()))
        })
        .filter_map(|e| match e {
            Ok(e) => Some(e),
            Err(err) => {
                log::warn!("skipping unreadable entry: {}", err);
                None
            }
        })
        .filter(|e| e.path().is_file())
        .map(|e| e.into_path())
        .collect()
}

/// The files of one project, walked once and queried for any number of
/// candidate lists.
pub struct ProjectFiles {
    root: PathBuf,
    files: Vec<PathBuf>,
}

impl ProjectFiles {
    pub fn scan(root: &Path, exclude_dirs: &[String]) -> Self {
        let files = walk(root, exclude_dirs);
        log::debug!("scanned {} files below {}", files.len(), root.display());
        ProjectFiles {
            root: root.to_path_buf(),
            files,
        }
    }

    /// First file named by `candidates`; see the module docs for tie-breaks.
    pub fn find(&self, candidates: &[String]) -> Option<PathBuf> {
        for name in candidates {
            let best = self
                .files
                .iter()
                .filter(|p| p.strip_prefix(&self.root).is_ok_and(|r| r.ends_with(name)))
                .min_by(|a, b| {
                    rank(&self.root, a)
                        .cmp(&rank(&self.root, b))
                        .then_with(|| a.cmp(b))
                });
            if let Some(found) = best {
                log::debug!("located {} at {}", name, found.display());
                return Some(found.clone());
            }
        }
        None
    }
}

/// Find the first entry file named by `candidates` below `root`.
pub fn find_file(root: &Path, candidates: &[String], exclude_dirs: &[String]) -> Option<PathBuf> {
    ProjectFiles::scan(root, exclude_dirs).find(candidates)
}

fn segments(root: &Path, p: &Path) -> Vec<String> {
    p.strip_prefix(root)
        .unwrap_or(p)
        .components()
        .map(|c| c.as_os_str().to_string_lossy().to_string())
        .collect()
}

/// Sort key: `src` matches first, then fewer components.
fn rank(root: &Path, p: &Path) -> (bool, usize) {
    let segs = segments(root, p);
    let in_src = segs.iter().any(|s| s == "src");
    (!in_src, segs.len())
}

/// Read a project file fresh from disk. `entry_names` decides the role.
pub fn load_source(root: &Path, rel: &str, entry_names: &[String]) -> Result<SourceFile> {
    let abs = root.join(rel);
    let content = utils::read_lossy(&abs)?;
    let path = utils::project_relative(root, &abs);
    let file_name = abs
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let role = if entry_names.iter().any(|n| *n == file_name) {
        FileRole::Entry
    } else {
        FileRole::Regular
    };
    Ok(SourceFile {
        path,
        content,
        role,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn touch(root: &Path, rel: &str) {
        let p = root.join(rel);
        fs::create_dir_all(p.parent().unwrap()).unwrap();
        fs::write(p, "").unwrap();
    }

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_prefers_src_segment() {
        let tmp = tempdir().unwrap();
        let root = tmp.path();
        touch(root, "App.jsx");
        touch(root, "frontend/src/App.jsx");
        let found = find_file(root, &names(&["App.jsx"]), &[]).unwrap();
        assert!(found.ends_with("frontend/src/App.jsx"));
    }

    #[test]
    fn test_candidate_order_wins_over_depth() {
        let tmp = tempdir().unwrap();
        let root = tmp.path();
        touch(root, "App.tsx");
        touch(root, "deep/nested/App.jsx");
        let found = find_file(root, &names(&["App.jsx", "App.tsx"]), &[]).unwrap();
        assert!(found.ends_with("deep/nested/App.jsx"));
    }

    #[test]
    fn test_ties_are_shallowest_then_lexicographic() {
        let tmp = tempdir().unwrap();
        let root = tmp.path();
        touch(root, "b/server.js");
        touch(root, "a/server.js");
        touch(root, "a/x/server.js");
        let found = find_file(root, &names(&["server.js"]), &[]).unwrap();
        assert!(found.ends_with("a/server.js"));
    }

    #[test]
    fn test_excluded_dirs_and_not_found() {
        let tmp = tempdir().unwrap();
        let root = tmp.path();
        touch(root, "node_modules/pkg/App.jsx");
        let ex = names(&["node_modules"]);
        assert!(find_file(root, &names(&["App.jsx"]), &ex).is_none());
        assert!(find_file(root, &names(&["main.py"]), &ex).is_none());
    }

    #[test]
    fn test_one_scan_answers_every_candidate_list() {
        let tmp = tempdir().unwrap();
        let root = tmp.path();
        touch(root, "src/App.jsx");
        touch(root, "src/routes.jsx");
        touch(root, "server/server.js");
        touch(root, "node_modules/express/server.js");
        touch(root, "pkg.egg-info/server.js");
        let files = ProjectFiles::scan(root, &names(&["node_modules", "*.egg-info"]));
        assert_eq!(files.files.len(), 3);
        assert!(files.find(&names(&["App.jsx"])).unwrap().ends_with("src/App.jsx"));
        assert!(files.find(&names(&["routes.jsx"])).is_some());
        assert!(files
            .find(&names(&["server.js"]))
            .unwrap()
            .ends_with("server/server.js"));
        assert!(files.find(&names(&["src/App.jsx"])).is_some());
    }

    #[test]
    fn test_walk_prunes_excluded_dirs_and_sorts() {
        let tmp = tempdir().unwrap();
        let root = tmp.path();
        touch(root, "b.js");
        touch(root, "a/z.js");
        touch(root, "dist/bundle.js");
        touch(root, "a/dist/inner.js");
        let rel: Vec<String> = walk(root, &names(&["dist"]))
            .iter()
            .map(|p| utils::project_relative(root, p))
            .collect();
        assert_eq!(rel, vec!["a/z.js", "b.js"]);
    }

    #[test]
    fn test_load_source_role() {
        let tmp = tempdir().unwrap();
        let root = tmp.path();
        fs::create_dir_all(root.join("src")).unwrap();
        fs::write(root.join("src/App.jsx"), "export default 1;\n").unwrap();
        let sf = load_source(root, "src/App.jsx", &names(&["App.jsx"])).unwrap();
        assert_eq!(sf.path, "src/App.jsx");
        assert_eq!(sf.role, FileRole::Entry);
        assert!(load_source(root, "src/Missing.jsx", &[]).is_err());
    }
}
