//! Path classification as ordered `(predicate, class)` rule lists.
//!
//! Rules are evaluated top to bottom and the first matching predicate decides
//! the class; `fallback` applies when nothing matches.

use crate::config::DetectOptions;
use crate::utils;

/// UI-like extensions considered by the frontend pass.
pub const UI_EXTENSIONS: &[&str] = &[".jsx", ".tsx", ".js", ".ts", ".vue", ".svelte"];

/// Stems of files a runtime boots from; never wired into the shell.
pub const BOOTSTRAP_STEMS: &[&str] = &["app", "main", "index"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathClass {
    /// Not relevant to this pass.
    Ignored,
    /// Bootstrap or shell file.
    Entry,
    /// Utilities, hooks, services and friends; owned by whoever uses them.
    Support,
    /// Must be imported by the shell.
    Page,
    /// Leaf component; pages own these imports.
    Component,
    /// Must be registered with the backend entry.
    Route,
}

impl PathClass {
    /// Whether a file of this class has to be wired into an entry file.
    pub fn is_required(&self) -> bool {
        matches!(self, PathClass::Page | PathClass::Route)
    }
}

#[derive(Debug, Clone)]
pub enum Predicate {
    ExtensionNotIn(Vec<String>),
    /// Case-insensitive stem comparison.
    StemIn(Vec<String>),
    /// Some directory segment is a keyword or its plural (`pages/`, `__tests__/`).
    DirSegmentIn(Vec<String>),
    /// The last word of the stem is a keyword or its plural (`ProfilePage`,
    /// `useAuthHook`, `Button.test`).
    StemSuffixIn(Vec<String>),
}

/// Whole-word keyword test; `word` is already lowercase.
fn is_keyword(word: &str, keywords: &[String]) -> bool {
    keywords.iter().any(|k| {
        let k = k.to_ascii_lowercase();
        word == k || word.strip_suffix('s') == Some(k.as_str())
    })
}

impl Predicate {
    pub fn matches(&self, path: &str) -> bool {
        match self {
            Predicate::ExtensionNotIn(exts) => !exts.contains(&utils::extension(path)),
            Predicate::StemIn(stems) => {
                let stem = utils::stem(path).to_ascii_lowercase();
                stems.iter().any(|s| s.to_ascii_lowercase() == stem)
            }
            Predicate::DirSegmentIn(words) => {
                let segs: Vec<&str> = path.split('/').collect();
                segs[..segs.len().saturating_sub(1)].iter().any(|d| {
                    let d = d.trim_matches('_').to_ascii_lowercase();
                    is_keyword(&d, words)
                })
            }
            Predicate::StemSuffixIn(words) => utils::words(&utils::stem(path))
                .last()
                .is_some_and(|w| is_keyword(w, words)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PathRule {
    pub predicate: Predicate,
    pub class: PathClass,
}

#[derive(Debug, Clone)]
pub struct RuleSet {
    pub rules: Vec<PathRule>,
    pub fallback: PathClass,
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl RuleSet {
    /// Rules deciding which generated UI files must reach the shell.
    pub fn frontend(opts: &DetectOptions) -> Self {
        RuleSet {
            rules: vec![
                PathRule {
                    predicate: Predicate::ExtensionNotIn(owned(UI_EXTENSIONS)),
                    class: PathClass::Ignored,
                },
                PathRule {
                    predicate: Predicate::StemIn(owned(BOOTSTRAP_STEMS)),
                    class: PathClass::Entry,
                },
                PathRule {
                    predicate: Predicate::DirSegmentIn(opts.support_keywords.clone()),
                    class: PathClass::Support,
                },
                PathRule {
                    predicate: Predicate::StemSuffixIn(opts.support_keywords.clone()),
                    class: PathClass::Support,
                },
                PathRule {
                    predicate: Predicate::DirSegmentIn(opts.page_keywords.clone()),
                    class: PathClass::Page,
                },
                PathRule {
                    predicate: Predicate::StemSuffixIn(opts.page_keywords.clone()),
                    class: PathClass::Page,
                },
            ],
            fallback: PathClass::Component,
        }
    }

    /// Rules deciding which generated backend files must be registered.
    pub fn backend(opts: &DetectOptions) -> Self {
        RuleSet {
            rules: vec![
                PathRule {
                    predicate: Predicate::DirSegmentIn(opts.route_keywords.clone()),
                    class: PathClass::Route,
                },
                PathRule {
                    predicate: Predicate::StemSuffixIn(opts.route_keywords.clone()),
                    class: PathClass::Route,
                },
            ],
            fallback: PathClass::Ignored,
        }
    }

    pub fn classify(&self, path: &str) -> PathClass {
        let class = self
            .rules
            .iter()
            .find(|r| r.predicate.matches(path))
            .map(|r| r.class)
            .unwrap_or(self.fallback);
        log::debug!("classified {} as {:?}", path, class);
        class
    }
}
