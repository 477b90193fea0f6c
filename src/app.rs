//! Application orchestrator.
//! Merges config, initializes logging, installs signal handlers, scans the
//! project, plans the batch, and runs either the dry-run preview or the real
//! move-and-rewrite pass.

use anyhow::{bail, Result};
use std::sync::{Arc, Mutex};
use tracing::{debug, error, info};

use crate::cli::Args;
use crate::config::{find_tsconfig, load_tsconfig, Config};
use crate::errors::TsMoveError;
use crate::logging::init_tracing;
use crate::output as out;
use crate::plan::{affected_imports_for_request, build_move_plan};
use crate::preview::{format_preview, generate_dry_run_preview};
use crate::project::{AliasMap, ModuleGraph, SourceTree};
use crate::resolve::normalize_path;
use crate::rewrite::update_imports_in_moved_files;
use crate::shutdown;
use crate::tracker::MoveTracker;

fn report_failure(path: &std::path::Path, e: &anyhow::Error) {
    if let Some(tm) = e.downcast_ref::<TsMoveError>() {
        let kind = tm.kind();
        error!(kind, src = %path.display(), "move failed: {tm}");
    } else {
        error!(src = %path.display(), error = ?e, "move failed");
    }
    out::print_error(&format!("{}: {e}", path.display()));
}

/// Run the CLI application.
pub fn run(args: Args) -> Result<()> {
    // Usage errors are reported before logging comes up, mv-style.
    let (sources, dest) = match args.split_request() {
        Ok(parts) => parts,
        Err(e) => {
            out::print_error(&e.to_string());
            out::print_user("usage: tsmv [OPTIONS] SOURCE... DEST");
            return Err(e.into());
        }
    };

    // Defaults, then tsconfig path mappings, then CLI overrides (CLI wins).
    let mut cfg = Config::default();
    cfg.project_root = normalize_path(&std::env::current_dir()?);

    let tsconfig_path = args
        .tsconfig
        .clone()
        .or_else(|| find_tsconfig(&cfg.project_root));
    if let Some(path) = &tsconfig_path {
        if let Some(mapping) = load_tsconfig(path) {
            cfg.alias_prefix = mapping.alias_prefix;
            cfg.alias_root = Some(mapping.alias_root);
        }
    }
    args.apply_overrides(&mut cfg);

    // Initialize logging and capture the guard so we can drop it on signal
    let guard_opt: Option<tracing_appender::non_blocking::WorkerGuard> =
        init_tracing(&cfg.log_level, cfg.log_file.as_deref(), args.json).map_err(|e| {
            out::print_error(&format!("Failed to initialize logging: {}", e));
            e
        })?;

    // Guard needs to be dropped on SIGINT to flush logs
    let guard_slot = Arc::new(Mutex::new(guard_opt));
    {
        let guard_slot = Arc::clone(&guard_slot);
        ctrlc::set_handler(move || {
            shutdown::request();
            out::print_warn("Received interrupt; shutting down gracefully...");
            if let Ok(mut g) = guard_slot.lock() {
                let _ = g.take(); // drop guard here to flush tracing_appender
            }
        })
        .expect("failed to install signal handler");
    }

    if shutdown::is_requested() {
        return Ok(());
    }

    debug!("Starting tsmv: {:?}", args);

    let result = (|| -> Result<()> {
        let mut tree = SourceTree::scan(&cfg.project_root, &cfg.extensions)?;
        if let Some(root) = &cfg.alias_root {
            tree = tree.with_alias(
                AliasMap {
                    prefix: cfg.alias_prefix.clone(),
                    root: root.clone(),
                },
                cfg.absolute_imports,
            );
        }
        debug!(
            modules = tree.files().len(),
            root = %cfg.project_root.display(),
            "project model ready"
        );

        let plan = build_move_plan(&sources, &dest, &cfg)?;
        for (path, reason) in &plan.rejected {
            report_failure(path, reason);
        }

        if cfg.dry_run {
            let sources: Vec<_> = sources.iter().map(|s| normalize_path(s)).collect();
            let affected = affected_imports_for_request(&tree, &sources);
            let preview = generate_dry_run_preview(&sources, &dest, &affected);
            out::print_user(&format_preview(&preview));
            if !plan.rejected.is_empty() {
                bail!("{} source(s) could not be planned", plan.rejected.len());
            }
            return Ok(());
        }

        let mut tracker = MoveTracker::new();
        let outcome = update_imports_in_moved_files(&mut tree, &plan, &mut tracker, &cfg)?;

        for (path, e) in &outcome.failures {
            report_failure(path, e);
        }
        if outcome.cycle.has_cycle {
            let path = outcome
                .cycle
                .cycle_path
                .as_deref()
                .unwrap_or_default()
                .join(" -> ");
            out::print_warn(&TsMoveError::CycleDetected(path).to_string());
        }

        info!(
            moved = outcome.completed.len(),
            skipped = outcome.skipped.len(),
            failed = outcome.failures.len(),
            import_edits = outcome.import_edits,
            "batch finished"
        );
        out::print_success(&format!(
            "moved {} file{}, updated {} import{}",
            outcome.completed.len(),
            if outcome.completed.len() == 1 { "" } else { "s" },
            outcome.import_edits,
            if outcome.import_edits == 1 { "" } else { "s" },
        ));

        let failed = outcome.failures.len() + plan.rejected.len();
        if failed > 0 {
            bail!("completed with {failed} failure(s)");
        }
        Ok(())
    })();

    // Ensure logs are flushed before exit
    if let Ok(mut g) = guard_slot.lock() {
        let _ = g.take();
    }

    result
}
