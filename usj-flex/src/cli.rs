//! Command-line interface definitions for usj-flex

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use usj_flex::filter::FilterOptions;
use usj_flex::provider::ChapterRange;
use uuid::Uuid;

/// CLI structure for the usj-flex bridge
#[derive(Parser)]
#[command(name = "usj-flex")]
#[command(version)]
#[command(about = "Export USJ scripture into interlinear texts", long_about = None)]
pub struct Cli {
    /// Directory holding target projects (overrides the config file)
    #[arg(long, global = true, value_name = "DIR")]
    pub projects_dir: Option<PathBuf>,

    /// Configuration file (defaults to usj-flex.toml in the working directory)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Log pipeline progress to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available bridge commands
///
/// Each prints a JSON result object; failures go to stderr with exit code 1.
#[derive(Subcommand)]
pub enum Commands {
    /// List the target projects
    ListProjects,

    /// Show writing systems and texts of a project
    ProjectInfo {
        /// Project name
        #[arg(short, long)]
        project: String,
    },

    /// Convert USJ into a new text
    CreateText(CreateTextArgs),

    /// Check whether a text name is taken
    CheckTextName {
        /// Project name
        #[arg(short, long)]
        project: String,

        /// Text name to check
        name: String,
    },

    /// Check whether a text id exists
    VerifyTextById {
        /// Project name
        #[arg(short, long)]
        project: String,

        /// Text id
        id: Uuid,
    },

    /// Report which projects are open in the host tool
    CheckHostToolStatus,

    /// Pick a text the host tool can safely open
    GetSafeNavigationTarget {
        /// Project name
        #[arg(short, long)]
        project: String,

        /// Preferred text id
        #[arg(long)]
        text_id: Option<Uuid>,
    },
}

/// Arguments of `create-text`
#[derive(Args)]
pub struct CreateTextArgs {
    /// Project name
    #[arg(short, long)]
    pub project: String,

    /// Text name (defaults to "<BOOK> <chapters>")
    #[arg(short, long)]
    pub title: Option<String>,

    /// Replace an existing text with the same name
    #[arg(long)]
    pub overwrite: bool,

    /// Vernacular writing system to use instead of the project default
    #[arg(long, value_name = "WS")]
    pub ws: Option<String>,

    /// Book code, required with --usj-dir
    #[arg(short, long)]
    pub book: Option<String>,

    /// Chapter range to export, e.g. 1-3 or 5
    #[arg(short, long)]
    pub chapters: Option<ChapterRange>,

    /// Read chapters from <DIR>/<BOOK>/<n>.json instead of stdin
    #[arg(long, value_name = "DIR", requires_all = ["book", "chapters"])]
    pub usj_dir: Option<PathBuf>,

    /// Keep footnotes
    #[arg(long)]
    pub include_footnotes: bool,

    /// Keep cross references and reference paragraphs
    #[arg(long)]
    pub include_cross_refs: bool,

    /// Keep the book introduction
    #[arg(long)]
    pub include_intro: bool,

    /// Keep translator remarks
    #[arg(long)]
    pub include_remarks: bool,

    /// Drop figures
    #[arg(long)]
    pub no_figures: bool,
}

impl CreateTextArgs {
    /// Apply the include/exclude flags on top of configured defaults
    pub fn filter_options(&self, base: FilterOptions) -> FilterOptions {
        FilterOptions {
            include_footnotes: base.include_footnotes || self.include_footnotes,
            include_cross_refs: base.include_cross_refs || self.include_cross_refs,
            include_intro: base.include_intro || self.include_intro,
            include_remarks: base.include_remarks || self.include_remarks,
            include_figures: base.include_figures && !self.no_figures,
        }
    }
}
