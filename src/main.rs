mod archive_script;
mod cli;
mod compare;
mod dir_list;
mod manifest;
mod manifest_file;
mod rel_path;
mod report;
mod scan;
mod util;

use anyhow::Context;
use cli::{Cli, Command, LogLevel};
use manifest::ManifestDocument;
use report::ComparisonReport;
use scan::ScanResult;
use std::fmt as stdfmt;
use std::io::{IsTerminal, stderr};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{Event, Level, Subscriber, error, info};
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt as tracing_fmt;
use tracing_subscriber::fmt::FmtContext;
use tracing_subscriber::fmt::format::{FormatEvent, FormatFields, Writer};
use tracing_subscriber::prelude::*;
use tracing_subscriber::registry::LookupSpan;
use util::naming::{default_manifest_filename, with_manifest_extension};

struct FilelistExitCode;

impl FilelistExitCode {
    /// Exit code used when a comparison finds paths present on only one side.
    fn differences_found() -> ExitCode {
        ExitCode::from(1)
    }

    /// Exit code used for other errors (I/O errors, invalid manifests, etc.).
    fn any_error() -> ExitCode {
        ExitCode::from(255)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.log_level);

    // Change working directory if -C was specified
    if let Some(directory) = cli.directory
        && let Err(e) = std::env::set_current_dir(&directory)
    {
        error!(
            "Failed to change directory to {}: {}",
            directory.display(),
            e
        );
        return FilelistExitCode::any_error();
    }

    let result: anyhow::Result<ExitCode> = match cli.command {
        Command::Scan { path, output } => handle_scan(&path, output),
        Command::Compare {
            manifest_a,
            manifest_b,
            script,
            no_script,
            report,
            list,
        } => handle_compare(&manifest_a, &manifest_b, script, no_script, report, list),
        Command::ScriptPaths { script } => handle_script_paths(&script),
    };

    match result {
        Ok(exit_code) => exit_code,
        Err(err) => {
            error!("{err:#}");
            FilelistExitCode::any_error()
        }
    }
}

fn handle_scan(path: &Path, output: Option<PathBuf>) -> anyhow::Result<ExitCode> {
    let ScanResult {
        root,
        manifest,
        warnings,
    } = scan::scan(path)?;

    let output = match output {
        Some(output) => with_manifest_extension(output),
        None => PathBuf::from(default_manifest_filename(&root)),
    };

    let doc = ManifestDocument::new(root.to_string_lossy().into_owned(), manifest);
    manifest_file::save(&doc, &output)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    if !warnings.is_empty() {
        info!(
            "{} entries could not be read and are missing from the manifest",
            warnings.len()
        );
    }

    report::print_scan_summary(&root, &doc, warnings.len(), &output);

    Ok(ExitCode::SUCCESS)
}

fn handle_compare(
    path_a: &Path,
    path_b: &Path,
    script_path: Option<PathBuf>,
    no_script: bool,
    report_path: Option<PathBuf>,
    list: bool,
) -> anyhow::Result<ExitCode> {
    let a = manifest_file::load(path_a)
        .with_context(|| format!("Failed to load {}", path_a.display()))?;
    let b = manifest_file::load(path_b)
        .with_context(|| format!("Failed to load {}", path_b.display()))?;

    let diff = compare::diff(&a.manifest, &b.manifest);

    report::print_comparison(path_a, &a, path_b, &b, &diff);

    if list {
        println!();
        report::print_differing_paths(&diff);
    }

    if let Some(report_path) = report_path {
        ComparisonReport::new(path_a, &a.manifest, path_b, &b.manifest, &diff)
            .save(&report_path)
            .with_context(|| format!("Failed to write {}", report_path.display()))?;
        info!("Wrote comparison report to {}", report_path.display());
    }

    if !no_script {
        let paths = diff.differing_paths();
        if paths.is_empty() {
            info!("No differing files; not writing an archive script");
        } else {
            let script = archive_script::generate(&paths)?;
            let script_path =
                script_path.unwrap_or_else(|| PathBuf::from(script.suggested_filename));
            script
                .save(&script_path)
                .with_context(|| format!("Failed to write {}", script_path.display()))?;
            println!();
            println!(
                "Archive script for {} files written to {}",
                paths.len(),
                script_path.display()
            );
        }
    }

    if diff.has_differences() {
        Ok(FilelistExitCode::differences_found())
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

fn handle_script_paths(script: &Path) -> anyhow::Result<ExitCode> {
    let paths = archive_script::load_embedded_paths(script)
        .with_context(|| format!("Failed to read {}", script.display()))?;

    for path in &paths {
        println!("{}", path);
    }
    info!("{} paths embedded in {}", paths.len(), script.display());

    Ok(ExitCode::SUCCESS)
}

fn log_filter(verbose: u8, log_level: Option<LogLevel>) -> EnvFilter {
    if let Some(level) = log_level {
        return EnvFilter::new(level.as_filter());
    }

    match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        _ => EnvFilter::new("debug"),
    }
}

fn init_tracing(verbose: u8, log_level: Option<LogLevel>) {
    let stderr_is_terminal = stderr().is_terminal();
    let formatter = EmojiFormatter { stderr_is_terminal };

    let fmt_layer = tracing_fmt::layer()
        .event_format(formatter)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(log_filter(verbose, log_level))
        .with(fmt_layer)
        .init();
}

struct EmojiFormatter {
    stderr_is_terminal: bool,
}

impl<S, N> FormatEvent<S, N> for EmojiFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> stdfmt::Result {
        if self.stderr_is_terminal {
            match *event.metadata().level() {
                Level::DEBUG => write!(writer, "🔍 ")?,
                Level::INFO => write!(writer, "ℹ️ ")?,
                Level::WARN => write!(writer, "⚠️  ")?,
                Level::ERROR => write!(writer, "❌️ ")?,
                _ => {}
            }
        } else {
            match *event.metadata().level() {
                Level::TRACE => writer.write_str("TRACE: ")?,
                Level::DEBUG => writer.write_str("DEBUG: ")?,
                Level::INFO => writer.write_str("INFO: ")?,
                Level::WARN => writer.write_str("WARN: ")?,
                Level::ERROR => writer.write_str("ERROR: ")?,
                _ => {}
            }
        }

        ctx.format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}
