//! CLI logic for the `fc` tool.
//!
//! Works on canvases saved by a `FileStore`: one JSON record file per
//! storage key inside `--store-dir`.

mod args;

pub use args::{Args, Command};

use std::{fs, io, io::Write, path::PathBuf};

use log::{debug, info, warn};
use thiserror::Error;

use fc_core::{CodecError, LoadReport, emit_scene, parse_text_report, scene_from_json};
use fc_editor::{CanvasSession, EditorConfig, EditorError, FileStore, Store, StoreError};

/// Errors reported by the CLI
#[derive(Debug, Error)]
pub enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{0}")]
    Store(#[from] StoreError),

    #[error("stored canvas is unreadable: {0}")]
    Codec(#[from] CodecError),

    #[error("{0}")]
    Editor(#[from] EditorError),

    #[error("no canvas stored under key `{key}` in {}", dir.display())]
    MissingCanvas { key: String, dir: PathBuf },

    #[error("{0} problem(s) found")]
    Problems(usize),
}

/// Run the `fc` CLI, writing command output to `out`.
///
/// # Errors
///
/// Returns `CliError` for:
/// - File or store I/O errors
/// - A stored canvas that is missing or not valid JSON
/// - `check` finding anything that would be dropped
pub fn run(args: &Args, out: &mut impl Write) -> Result<(), CliError> {
    let config = EditorConfig {
        storage_key: args.key.clone(),
        ..EditorConfig::default()
    };
    let store = FileStore::new(&args.store_dir, &config.storage_key);
    debug!(path:? = store.path(); "Using store");

    match &args.command {
        Command::Export { output } => {
            let report = load_stored(&store, args)?;
            let text = emit_scene(&report.scene);
            match output {
                Some(path) => {
                    fs::write(path, &text)?;
                    info!(path:? = path, elements = report.scene.len(); "Exported canvas");
                }
                None => writeln!(out, "{text}")?,
            }
        }
        Command::Import { input } => {
            let text = fs::read_to_string(input)?;
            let mut session = CanvasSession::open(store, config);
            let skipped = session.import_text(&text)?;
            for line in &skipped {
                warn!("{}: {line}", input.display());
            }
            writeln!(
                out,
                "imported {} element(s), {} link(s); skipped {} line(s)",
                session.scene().len(),
                session.scene().links().len(),
                skipped.len()
            )?;
        }
        Command::Check { input: Some(input) } => {
            let text = fs::read_to_string(input)?;
            let report = parse_text_report(&text);
            for line in &report.skipped {
                writeln!(out, "{}: {line}", input.display())?;
            }
            writeln!(
                out,
                "{} element(s), {} link(s)",
                report.scene.len(),
                report.scene.links().len()
            )?;
            if !report.skipped.is_empty() {
                return Err(CliError::Problems(report.skipped.len()));
            }
        }
        Command::Check { input: None } => {
            let report = load_stored(&store, args)?;
            for record in &report.malformed {
                writeln!(out, "{record}")?;
            }
            for link in &report.dropped_links {
                writeln!(out, "{link}")?;
            }
            writeln!(
                out,
                "{} element(s), {} link(s)",
                report.scene.len(),
                report.scene.links().len()
            )?;
            let problems = report.malformed.len() + report.dropped_links.len();
            if problems > 0 {
                return Err(CliError::Problems(problems));
            }
        }
    }

    Ok(())
}

/// Load the stored canvas without the session's fall-back-to-empty leniency.
fn load_stored(store: &FileStore, args: &Args) -> Result<LoadReport, CliError> {
    let json = store.load()?.ok_or_else(|| CliError::MissingCanvas {
        key: args.key.clone(),
        dir: args.store_dir.clone(),
    })?;
    Ok(scene_from_json(&json)?)
}
