//! wirecheck CLI binary entry point.
//! Resolves configuration, delegates to the library and prints results.

use clap::Parser;
use std::fs;
use std::path::Path;
use wirecheck::cli::{Cli, Commands, Kind};
use wirecheck::config::{self, Effective};
use wirecheck::models::{FixAction, Verification, VerifyStatus};
use wirecheck::{detect, diff, imports, locate, output, patch, plan, summary, utils};

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default))
        .format_timestamp(None)
        .init();
}

fn fail(msg: &str, code: i32) -> ! {
    eprintln!("{} {}", utils::error_prefix(), msg);
    std::process::exit(code);
}

fn note_missing_config(eff: &Effective) {
    if !eff.config_found && eff.output != "json" {
        eprintln!(
            "{} No wirecheck.toml found; using defaults.",
            utils::note_prefix()
        );
    }
}

fn run_verify(eff: &Effective, kind: Kind, files: &[String]) -> Verification {
    let root = &eff.repo_root;
    match kind {
        Kind::Frontend => detect::verify_frontend(root, files, &eff.detect),
        Kind::Backend => detect::verify_backend(root, files, &eff.detect),
        Kind::All => detect::verify(root, files, &eff.detect),
    }
}

fn load_plan(path: &str) -> Vec<FixAction> {
    let text = match fs::read_to_string(path) {
        Ok(t) => t,
        Err(e) => fail(&wirecheck::Error::io(path, e).to_string(), 2),
    };
    match plan::parse_plan(&text) {
        Ok(plan) => plan,
        Err(e) => fail(&format!("{} in plan {}", e, path), 2),
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match cli.cmd {
        Commands::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
        }
        Commands::Verify {
            repo_root,
            output,
            kind,
            files,
        } => {
            let eff = config::resolve_effective(repo_root.as_deref(), output.as_deref(), None);
            note_missing_config(&eff);
            let result = run_verify(&eff, kind, &files);
            output::print_verification(&result, &eff.output);
            if result.status == VerifyStatus::IssuesFound {
                std::process::exit(1);
            }
        }
        Commands::Imports {
            repo_root,
            output,
            check,
            file,
        } => {
            let eff = config::resolve_effective(repo_root.as_deref(), output.as_deref(), None);
            let src = match locate::load_source(&eff.repo_root, &file, &[]) {
                Ok(s) => s,
                Err(e) => fail(&e.to_string(), 2),
            };
            if imports::extractor_for(&src.path).is_none() {
                fail(&format!("unsupported source type: {}", src.path), 2);
            }
            if check {
                let result = detect::validate_imports(&eff.repo_root, &src.path, &eff.detect);
                output::print_verification(&result, &eff.output);
                if result.status == VerifyStatus::IssuesFound {
                    std::process::exit(1);
                }
                return;
            }
            let records = imports::extract(&src.path, &src.content);
            output::print_imports(&src.path, &records, &eff.output);
        }
        Commands::Fix {
            repo_root,
            output,
            kind,
            plan,
            dry_run,
            files,
        } => {
            let eff = config::resolve_effective(repo_root.as_deref(), output.as_deref(), None);
            note_missing_config(&eff);
            let plan = match plan {
                Some(p) => load_plan(&p),
                None => run_verify(&eff, kind, &files).fix_plan,
            };
            if dry_run {
                for fix in &plan {
                    if let Err(e) = patch::validate(fix) {
                        fail(&e.to_string(), 2);
                    }
                }
                output::print_fix(&plan, None, None, &eff.output);
                return;
            }
            let outcome = match patch::apply_fixes(&eff.repo_root, &plan) {
                Ok(o) => o,
                Err(e) => fail(&e.to_string(), 2),
            };
            let after = run_verify(&eff, kind, &files);
            output::print_fix(&plan, Some(&outcome), Some(&after), &eff.output);
            if !outcome.failed.is_empty() || after.status == VerifyStatus::IssuesFound {
                std::process::exit(1);
            }
        }
        Commands::Diff {
            repo_root,
            output,
            path,
            new,
        } => {
            let eff = config::resolve_effective(repo_root.as_deref(), output.as_deref(), None);
            let proposed = match utils::read_lossy(Path::new(&new)) {
                Ok(s) => s,
                Err(e) => fail(&e.to_string(), 2),
            };
            let target = eff.repo_root.join(&path);
            let original = if target.exists() {
                match utils::read_lossy(&target) {
                    Ok(s) => s,
                    Err(e) => fail(&e.to_string(), 2),
                }
            } else {
                String::new()
            };
            let rel = utils::project_relative(&eff.repo_root, Path::new(&path));
            let res = diff::generate_diff(&original, &proposed, &rel);
            output::print_diff(&rel, &res, &eff.output);
        }
        Commands::Preview {
            repo_root,
            output,
            proposed,
            check,
            max_risk,
        } => {
            let eff =
                config::resolve_effective(repo_root.as_deref(), output.as_deref(), max_risk);
            let tree = match summary::collect_tree(Path::new(&proposed), &eff.detect.exclude_dirs)
            {
                Ok(t) => t,
                Err(e) => fail(&e.to_string(), 2),
            };
            if tree.is_empty() {
                fail(&format!("no files under {}", proposed), 2);
            }
            let changes = summary::preview_changes(&eff.repo_root, &tree);
            let gate = if check { Some(eff.max_risk) } else { None };
            output::print_preview(&changes, gate, &eff.output);
            if check && summary::summarize(&changes).overall_risk > eff.max_risk {
                std::process::exit(1);
            }
        }
    }
}
