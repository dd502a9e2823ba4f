//! BigSweep: find and remove unusually large files.
//!
//! Thin binary entry point. All logic lives in the `bigsweep-core` crate;
//! this file only turns command-line flags into core calls and prints what
//! comes back.

mod cli;

use anyhow::{bail, Context, Result};
use bigsweep_core::eraser::{spawn_delete, spawn_empty_trash, FileEraser, TrashEraser};
use bigsweep_core::model::size::{format_count, format_size};
use bigsweep_core::model::{FileEntry, ScanResult};
use bigsweep_core::monitor::{start_usage_monitor, UsageUpdate, DEFAULT_USAGE_REFRESH};
use bigsweep_core::platform::{default_volume_root, probe, DiskUsage};
use bigsweep_core::report::{write_csv, write_json};
use bigsweep_core::scanner::{ScanEvent, ScanOptions};
use bigsweep_core::session::ScanSession;
use clap::Parser;
use cli::{Cli, Commands, OutputFormat};
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

/// How long to block for each scan event before re-checking.
const EVENT_WAIT: Duration = Duration::from_millis(200);

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialise structured logging on stderr so stdout stays clean for
    // JSON and CSV output.
    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Scan {
            root,
            threshold,
            include_hidden,
            include_packages,
            threads,
            format,
        } => {
            let mut options = ScanOptions::default().with_threshold(threshold);
            options.skip_hidden = !include_hidden;
            options.skip_packages = !include_packages;
            options = if threads == 0 {
                options.parallel()
            } else {
                options.with_threads(threads)
            };
            run_scan(root, options, format)
        }
        Commands::Delete { files, yes } => run_delete(files, yes),
        Commands::EmptyTrash { yes } => run_empty_trash(yes),
        Commands::Usage { path, watch } => run_usage(path, watch),
    }
}

fn run_scan(root: PathBuf, options: ScanOptions, format: OutputFormat) -> Result<()> {
    let mut session = ScanSession::new(options);
    session
        .start(&root)
        .with_context(|| format!("cannot start scan of {}", root.display()))?;

    let result = loop {
        let Some(event) = session.next_event(EVENT_WAIT) else {
            if session.is_scanning() {
                continue;
            }
            // The scan thread is gone without a terminal event.
            break session.result().clone();
        };
        match event {
            ScanEvent::Progress(p) => {
                eprint!(
                    "\r{} found | {}\x1b[K",
                    format_count(p.items_found),
                    p.current_path.display()
                );
            }
            ScanEvent::Completed { result, summary } => {
                eprintln!(
                    "\rScanned {} items in {:.1?} ({} unreadable)\x1b[K",
                    format_count(summary.visited),
                    summary.duration,
                    summary.skipped
                );
                break result;
            }
            ScanEvent::Cancelled { partial, .. } => {
                eprintln!("\rScan cancelled\x1b[K");
                break partial;
            }
            ScanEvent::Failed(err) => {
                eprintln!();
                return Err(err).context("scan failed");
            }
        }
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match format {
        OutputFormat::Table => print_table(&result, &mut out)?,
        OutputFormat::Json => {
            write_json(&result, &mut out)?;
            writeln!(out)?;
        }
        OutputFormat::Csv => write_csv(&result, &mut out)?,
    }
    Ok(())
}

fn print_table(result: &ScanResult, out: &mut impl Write) -> Result<()> {
    if result.is_empty() {
        writeln!(out, "No large files found")?;
        return Ok(());
    }
    for entry in result {
        writeln!(
            out,
            "{:>10}  {}  {}",
            format_size(entry.size()),
            entry.modified().format("%Y-%m-%d"),
            entry.path().display()
        )?;
    }
    writeln!(
        out,
        "{} files, {} total",
        format_count(result.len() as u64),
        format_size(result.total_size())
    )?;
    Ok(())
}

fn run_delete(files: Vec<PathBuf>, yes: bool) -> Result<()> {
    if !yes {
        bail!(
            "refusing to delete {} file(s) without --yes; this cannot be undone",
            files.len()
        );
    }

    let mut entries = Vec::with_capacity(files.len());
    for path in &files {
        match FileEntry::from_path(path) {
            Ok(entry) => entries.push(entry),
            Err(err) => eprintln!("skipping {}: {err}", path.display()),
        }
    }

    let report = spawn_delete(FileEraser::default(), entries)?
        .wait()
        .context("delete worker exited without a report")?;
    println!("{}", report.summary());
    if !report.all_succeeded() {
        bail!("{} file(s) could not be deleted", report.failed.len());
    }
    Ok(())
}

fn run_empty_trash(yes: bool) -> Result<()> {
    if !yes {
        bail!("refusing to empty the trash without --yes; this cannot be undone");
    }
    let removed = spawn_empty_trash(TrashEraser::for_current_user())?
        .wait()
        .context("trash worker exited without a result")??;
    println!("Trash emptied ({removed} items)");
    Ok(())
}

fn print_usage(usage: &DiskUsage) {
    println!(
        "total {}  used {} ({:.0}%)  free {}",
        format_size(usage.total_bytes()),
        format_size(usage.used_bytes()),
        usage.used_fraction() * 100.0,
        format_size(usage.free_bytes())
    );
}

fn run_usage(path: Option<PathBuf>, watch: bool) -> Result<()> {
    let path = path.unwrap_or_else(default_volume_root);

    if !watch {
        let usage = probe(&path).with_context(|| format!("no usage data for {}", path.display()))?;
        print_usage(&usage);
        return Ok(());
    }

    let monitor = start_usage_monitor(path, DEFAULT_USAGE_REFRESH)?;
    for update in monitor.receiver.iter() {
        match update {
            UsageUpdate::Refreshed(usage) => print_usage(&usage),
            UsageUpdate::Unavailable(reason) => tracing::warn!("Usage unavailable: {reason}"),
        }
    }
    Ok(())
}
