//! usj-flex - Scripture to interlinear text bridge
//!
//! Bridge executable: every command prints a JSON result object on stdout,
//! or an error object on stderr with exit code 1.

#![deny(unsafe_code)]
#![allow(clippy::module_name_repetitions)]

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, CreateTextArgs, Commands};
use serde::Serialize;
use std::io;
use std::path::PathBuf;
use usj_flex::bridge::{self, BridgeError, BridgeResponse, CreateTextRequest};
use usj_flex::config::{BridgeConfig, CONFIG_FILE};
use usj_flex::provider::{collect_chapters, BookProvider, ChapterRange, DirectoryProvider};
use usj_flex::store::ProjectRegistry;
use usj_flex::usj::UsjDocument;

/// Main entry point for the usj-flex bridge
fn main() {
    match run() {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {:?}", e);
            std::process::exit(1);
        }
    }
}

/// Run the CLI application
///
/// # Returns
/// * `Ok(true)` - The command succeeded
/// * `Ok(false)` - The command failed and its error object was printed
/// * `Err(anyhow::Error)` - The result could not be written
fn run() -> Result<bool> {
    let cli = Cli::parse();

    env_logger::Builder::from_default_env()
        .filter_level(if cli.verbose {
            log::LevelFilter::Info
        } else {
            log::LevelFilter::Warn
        })
        .init();

    let config = match load_config(cli.config.clone()) {
        Ok(config) => config,
        Err(e) => return emit::<()>(Err(e)),
    };
    let registry = ProjectRegistry::new(projects_dir(&cli, &config));
    log::info!("Using projects directory {}", registry.root().display());

    match cli.command {
        Commands::ListProjects => emit(Ok(bridge::list_projects(&registry))),

        Commands::ProjectInfo { project } => emit(
            registry
                .open(&project)
                .map_err(BridgeError::from)
                .and_then(|p| bridge::project_info(&p)),
        ),

        Commands::CreateText(args) => emit(handle_create_text_command(&registry, &config, &args)),

        Commands::CheckTextName { project, name } => emit(
            registry
                .open(&project)
                .map_err(BridgeError::from)
                .and_then(|p| bridge::check_text_name(&p, &name)),
        ),

        Commands::VerifyTextById { project, id } => emit(
            registry
                .open(&project)
                .map_err(BridgeError::from)
                .and_then(|p| bridge::verify_text_by_id(&p, id)),
        ),

        Commands::CheckHostToolStatus => emit(Ok(bridge::check_host_tool_status(&registry))),

        Commands::GetSafeNavigationTarget { project, text_id } => emit(
            registry
                .open(&project)
                .map_err(BridgeError::from)
                .and_then(|p| bridge::get_safe_navigation_target(&p, text_id)),
        ),
    }
}

/// Print a command result as JSON
///
/// Success goes to stdout, failure to stderr.
fn emit<T: Serialize>(result: Result<T, BridgeError>) -> Result<bool> {
    let success = result.is_ok();
    if let Err(e) = &result {
        log::debug!("Command failed: {:?}", e);
    }

    let response = BridgeResponse::from(result);
    let json = serde_json::to_string_pretty(&response).context("Failed to serialize result")?;

    if success {
        println!("{}", json);
    } else {
        eprintln!("{}", json);
    }
    Ok(success)
}

/// Load the configuration file, falling back to defaults when it is missing
fn load_config(path: Option<PathBuf>) -> Result<BridgeConfig, BridgeError> {
    let path = path.unwrap_or_else(|| PathBuf::from(CONFIG_FILE));
    let config = BridgeConfig::load(&path)?;
    if config.is_some() {
        log::info!("Loaded configuration from {}", path.display());
    }
    Ok(config.unwrap_or_default())
}

/// Projects directory: CLI flag, then config file, then the working directory
fn projects_dir(cli: &Cli, config: &BridgeConfig) -> PathBuf {
    cli.projects_dir
        .clone()
        .or_else(|| config.projects_dir.clone())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Handle the create-text command
fn handle_create_text_command(
    registry: &ProjectRegistry,
    config: &BridgeConfig,
    args: &CreateTextArgs,
) -> Result<bridge::CreatedText, BridgeError> {
    let mut project = registry.open(&args.project)?;

    let (chapters, first_is_book_start, default_title) = read_chapters(args)?;
    let title = args
        .title
        .clone()
        .or(default_title)
        .ok_or_else(|| BridgeError::InvalidRequest("a text title is required".to_string()))?;

    let request = CreateTextRequest {
        title,
        overwrite: args.overwrite,
        vernacular_override: args.ws.clone().or_else(|| config.vernacular_override.clone()),
        options: args.filter_options(config.filter),
        chapters,
        first_is_book_start,
    };

    bridge::create_text(&mut project, &request)
}

/// Gather the chapters to convert
///
/// # Returns
/// * The ordered chapters, whether the first one starts the book, and the
///   default title derived from the book code and range
fn read_chapters(
    args: &CreateTextArgs,
) -> Result<(Vec<UsjDocument>, bool, Option<String>), BridgeError> {
    if let (Some(dir), Some(book), Some(range)) = (&args.usj_dir, &args.book, args.chapters) {
        let provider = DirectoryProvider::new(dir);
        let chapters = collect_chapters(&provider, book, range)?;
        return Ok(ranged(chapters, book, range));
    }

    let doc = UsjDocument::from_reader(io::stdin().lock())?;
    let book = args
        .book
        .clone()
        .or_else(|| doc.book_code().map(str::to_ascii_uppercase));

    match (args.chapters, book) {
        (Some(range), Some(book)) => {
            let provider = BookProvider::new(&doc);
            let chapters = collect_chapters(&provider, &book, range)?;
            Ok(ranged(chapters, &book, range))
        }
        (Some(_), None) => Err(BridgeError::InvalidRequest(
            "a book code is required to select chapters".to_string(),
        )),
        // A whole document counts as the start of its book
        (None, book) => Ok((vec![doc], true, book)),
    }
}

fn ranged(
    chapters: Vec<UsjDocument>,
    book: &str,
    range: ChapterRange,
) -> (Vec<UsjDocument>, bool, Option<String>) {
    let title = format!("{} {}", book.to_ascii_uppercase(), range);
    (chapters, range.starts_at_book_beginning(), Some(title))
}
