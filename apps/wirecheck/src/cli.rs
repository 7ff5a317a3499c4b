//! CLI argument parsing via `clap`.

use crate::models::RiskLevel;
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(
    name = "wirecheck",
    version,
    about = "Verify and repair how generated source files are wired into a project",
    long_about = "wirecheck finds generated pages and routes that are not imported, rendered or registered by the project's entry files, repairs them with guarded idempotent patches, and scores proposed changes by risk.\n\nConfiguration precedence: CLI > wirecheck.toml > defaults.",
    after_help = "Examples:\n  wirecheck verify src/pages/Dashboard.jsx routes/users.js\n  wirecheck fix --dry-run src/pages/Dashboard.jsx\n  wirecheck diff src/App.jsx --new /tmp/App.jsx\n  wirecheck preview --proposed ./out --check --max-risk medium",
    arg_required_else_help = true
)]
/// Top-level CLI options and subcommands.
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
/// Which wiring passes to run.
pub enum Kind {
    Frontend,
    Backend,
    All,
}

#[derive(Subcommand)]
/// Supported subcommands.
pub enum Commands {
    /// Show version
    #[command(about = "Show version", long_about = "Print the current wirecheck version.")]
    Version,
    /// Detect wiring defects
    #[command(
        about = "Detect wiring defects",
        long_about = "Check that the given generated files are imported, rendered or registered by the project's entry files, and validate the shell's own imports. Exits 1 when issues are found.",
        after_help = "Examples:\n  wirecheck verify src/pages/Home.jsx\n  wirecheck verify --kind backend routes/users.js --output json"
    )]
    Verify {
        #[arg(long, help = "Project root (default: detected from current dir)")]
        repo_root: Option<String>,
        #[arg(long, help = "Output mode: human|json (default: human)")]
        output: Option<String>,
        #[arg(long, value_enum, default_value_t = Kind::All, help = "Passes to run")]
        kind: Kind,
        #[arg(help = "Generated files, project-relative or absolute")]
        files: Vec<String>,
    },
    /// List import statements of one file
    #[command(
        about = "List imports",
        long_about = "Print the import records extracted from one source file, with line spans and bound names. With --check, validate them instead (self-imports, paths leaving the project, bootstrap imports, unresolvable paths) and exit 1 on issues.",
        after_help = "Examples:\n  wirecheck imports src/App.jsx\n  wirecheck imports --check server.js"
    )]
    Imports {
        #[arg(long, help = "Project root (default: detected from current dir)")]
        repo_root: Option<String>,
        #[arg(long, help = "Output mode: human|json (default: human)")]
        output: Option<String>,
        #[arg(long, help = "Validate the imports instead of listing them")]
        check: bool,
        #[arg(help = "Project-relative source file")]
        file: String,
    },
    /// Detect and repair wiring defects
    #[command(
        about = "Repair wiring defects",
        long_about = "Run detection, apply the resulting fix plan (or one loaded with --plan) and re-run detection. Exits 1 when a fix failed or issues remain.",
        after_help = "Examples:\n  wirecheck fix src/pages/Home.jsx\n  wirecheck fix --plan plan.json\n  wirecheck fix --dry-run --output json routes/users.js"
    )]
    Fix {
        #[arg(long, help = "Project root (default: detected from current dir)")]
        repo_root: Option<String>,
        #[arg(long, help = "Output mode: human|json (default: human)")]
        output: Option<String>,
        #[arg(long, value_enum, default_value_t = Kind::All, help = "Passes to run")]
        kind: Kind,
        #[arg(long, help = "JSON fix plan to apply instead of the detected one")]
        plan: Option<String>,
        #[arg(long, action = clap::ArgAction::SetTrue, help = "Print the plan without writing files")]
        dry_run: bool,
        #[arg(help = "Generated files, project-relative or absolute")]
        files: Vec<String>,
    },
    /// Diff one file against proposed content
    #[command(
        about = "Diff a file",
        long_about = "Show a unified diff between a project file (missing means creation) and proposed content, with a risk assessment."
    )]
    Diff {
        #[arg(long, help = "Project root (default: detected from current dir)")]
        repo_root: Option<String>,
        #[arg(long, help = "Output mode: human|json (default: human)")]
        output: Option<String>,
        #[arg(help = "Project-relative path of the file being changed")]
        path: String,
        #[arg(long, help = "File holding the proposed content")]
        new: String,
    },
    /// Preview a proposed tree as a risk-scored change set
    #[command(
        about = "Preview a change set",
        long_about = "Diff every file of a proposed tree against the project and summarize the change set. With --check, exit 1 when the overall risk exceeds the allowed maximum.",
        after_help = "Examples:\n  wirecheck preview --proposed ./generated\n  wirecheck preview --proposed ./generated --check --max-risk medium"
    )]
    Preview {
        #[arg(long, help = "Project root (default: detected from current dir)")]
        repo_root: Option<String>,
        #[arg(long, help = "Output mode: human|json (default: human)")]
        output: Option<String>,
        #[arg(long, help = "Directory mirroring the project layout with proposed files")]
        proposed: String,
        #[arg(long, action = clap::ArgAction::SetTrue, help = "Exit non-zero when the risk gate fails")]
        check: bool,
        #[arg(long, help = "Highest acceptable overall risk: low|medium|high|critical")]
        max_risk: Option<RiskLevel>,
    },
}
