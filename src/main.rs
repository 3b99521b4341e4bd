use std::collections::HashMap;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use serde_json::json;
use tracing_subscriber::EnvFilter;

use labelcraft::config::EditorConfig;
use labelcraft::engine::Editor;
use labelcraft::orient::OrientError;
use labelcraft::persist::{self, SaveError};
use labelcraft::resolve;
use labelcraft::transfer::ImportError;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("cannot read {path}: {source}")]
    Read { path: PathBuf, source: std::io::Error },
    #[error(transparent)]
    Import(#[from] ImportError),
    #[error(transparent)]
    Orient(#[from] OrientError),
    #[error("label cannot be saved: {0}")]
    Invalid(#[from] SaveError),
    #[error("invalid date `{0}`; use YYYY-MM-DD or DD/MM/YYYY")]
    InvalidDate(String),
    #[error("invalid JSON output: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "labelcraft", about = "Label document tools")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check that a label document imports and could be saved.
    Validate { file: PathBuf },
    /// Print the document in canonical form.
    Normalize { file: PathBuf },
    /// Turn the canvas to an absolute angle (0, 90, 180, 270).
    Rotate {
        file: PathBuf,
        #[arg(long, allow_negative_numbers = true)]
        angle: f64,
    },
    /// Print the resolved value of every field and each element's text.
    Resolve {
        file: PathBuf,
        /// Date used as "today".
        #[arg(long)]
        today: Option<String>,
        /// Override a key or catalog path, as `key=value`. Repeatable.
        #[arg(long = "set", value_parser = parse_assignment)]
        set: Vec<(String, String)>,
    },
}

fn parse_assignment(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((k, v)) if !k.trim().is_empty() => Ok((k.trim().to_owned(), v.to_owned())),
        _ => Err(format!("expected key=value, got `{raw}`")),
    }
}

fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = EditorConfig::from_env();

    match cli.command {
        Command::Validate { file } => run_validate(config, &file),
        Command::Normalize { file } => run_normalize(config, &file),
        Command::Rotate { file, angle } => run_rotate(config, &file, angle),
        Command::Resolve { file, today, set } => run_resolve(config, &file, today.as_deref(), set),
    }
}

fn open(config: EditorConfig, file: &Path) -> Result<Editor, CliError> {
    let text = std::fs::read_to_string(file).map_err(|source| CliError::Read { path: file.to_path_buf(), source })?;
    let mut editor = Editor::new(config);
    editor.import_json(&text)?;
    Ok(editor)
}

fn run_validate(config: EditorConfig, file: &Path) -> Result<(), CliError> {
    let editor = open(config, file)?;
    persist::validate_for_save(&editor.name, editor.elements())?;
    let report = json!({
        "ok": true,
        "name": editor.name,
        "elements": editor.elements().len(),
        "canvas": editor.canvas,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn run_normalize(config: EditorConfig, file: &Path) -> Result<(), CliError> {
    let editor = open(config, file)?;
    println!("{}", editor.export_json()?);
    Ok(())
}

fn run_rotate(config: EditorConfig, file: &Path, angle: f64) -> Result<(), CliError> {
    let mut editor = open(config, file)?;
    editor.rotate_canvas_to(angle)?;
    println!("{}", editor.export_json()?);
    Ok(())
}

fn run_resolve(
    config: EditorConfig,
    file: &Path,
    today: Option<&str>,
    set: Vec<(String, String)>,
) -> Result<(), CliError> {
    let editor = open(config, file)?;
    let today = match today {
        Some(raw) => resolve::parse_date(raw).ok_or_else(|| CliError::InvalidDate(raw.to_owned()))?,
        None => resolve::today(),
    };
    let overrides: HashMap<String, String> = set.into_iter().collect();
    let resolution = editor.resolve_at(&overrides, today);

    let texts: Vec<_> = editor
        .elements()
        .iter()
        .enumerate()
        .map(|(index, el)| {
            json!({
                "index": index,
                "type": el.element_type(),
                "text": resolution.element_text.get(&el.id),
            })
        })
        .collect();
    let report = json!({ "values": resolution.values, "elements": texts });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
