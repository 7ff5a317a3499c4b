//! wirecheck core library.
//!
//! Verifies that generated source files are actually wired into a project
//! (imported, rendered, registered), repairs the defects it can with guarded
//! idempotent patches, and scores proposed file changes by risk.
//!
//! High-level modules:
//! - `cli`: CLI argument parsing (binary uses this).
//! - `config`: Discovery and effective configuration resolution.
//! - `locate`: Entry-file lookup and fresh source loading.
//! - `imports`: Per-language import extraction.
//! - `rules`: Ordered path classification rules.
//! - `detect`: Import validation and frontend/backend wiring checks.
//! - `plan`: Issue to fix-action mapping.
//! - `patch`: Guarded text transformations with atomic writes.
//! - `diff`, `risk`, `summary`: Change previews, risk scoring and roll-ups.
//! - `models`: Shared data models.
//! - `output`: Human/JSON printers.
//! - `error`, `utils`: Error type and supporting helpers.
//!
//! Every operation takes the project root explicitly; nothing is cached
//! between calls.
pub mod cli;
pub mod config;
pub mod detect;
pub mod diff;
pub mod error;
pub mod imports;
pub mod locate;
pub mod models;
pub mod output;
pub mod patch;
pub mod plan;
pub mod risk;
pub mod rules;
pub mod summary;
pub mod utils;

pub use error::{Error, Result};
