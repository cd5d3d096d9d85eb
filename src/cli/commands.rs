use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "fo", about = concat!("folio v", env!("CARGO_PKG_VERSION"), " - a local project portfolio"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Use a different data directory
    #[arg(short = 'C', long = "data-dir", global = true)]
    pub data_dir: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List projects
    List(QueryArgs),
    /// Show one project (default: the featured project)
    Show(ShowArgs),
    /// List tag facets
    Tags,
    /// Add a project
    Add(AddArgs),
    /// Edit a project
    Edit(EditArgs),
    /// Delete a project
    Delete(ConfirmIdArgs),
    /// Toggle a project's star
    Star(IdArg),
    /// Import projects from a JSON file
    Import(ImportArgs),
    /// Export all projects as JSON
    Export(ExportArgs),
    /// Replace every project with the sample set
    Reset(YesArg),
    /// Show or set the theme
    Theme(ThemeArgs),
    /// Write a static HTML page of the portfolio
    Html(HtmlArgs),
    /// Show the recovery log
    Recovery(RecoveryArgs),
}

// ---------------------------------------------------------------------------
// Read command args
// ---------------------------------------------------------------------------

#[derive(Args, Default)]
pub struct QueryArgs {
    /// Case-insensitive text filter over title, description and tags
    #[arg(long, short = 's')]
    pub search: Option<String>,
    /// Only projects carrying this exact tag
    #[arg(long)]
    pub tag: Option<String>,
    /// Only starred projects
    #[arg(long)]
    pub favorites: bool,
    /// Sort order (newest, oldest, az, starred)
    #[arg(long, value_parser = parse_sort)]
    pub sort: Option<crate::model::config::SortKey>,
}

fn parse_sort(s: &str) -> Result<crate::model::config::SortKey, String> {
    crate::model::config::SortKey::parse(s)
}

#[derive(Args)]
pub struct ShowArgs {
    /// Project id
    pub id: Option<String>,
}

#[derive(Args)]
pub struct IdArg {
    /// Project id
    pub id: String,
}

#[derive(Args)]
pub struct YesArg {
    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

#[derive(Args)]
pub struct ConfirmIdArgs {
    /// Project id
    pub id: String,
    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

// ---------------------------------------------------------------------------
// Write command args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct AddArgs {
    /// Project title
    pub title: String,
    /// Project description
    pub description: String,
    /// Comma-separated tags
    #[arg(long)]
    pub tags: Option<String>,
    /// Code repository URL
    #[arg(long)]
    pub github: Option<String>,
    /// Live demo URL
    #[arg(long)]
    pub demo: Option<String>,
    /// Image file to attach
    #[arg(long)]
    pub image: Option<String>,
}

#[derive(Args)]
pub struct EditArgs {
    /// Project id
    pub id: String,
    /// New title
    #[arg(long)]
    pub title: Option<String>,
    /// New description
    #[arg(long)]
    pub description: Option<String>,
    /// Replace tags (comma-separated; empty string clears)
    #[arg(long)]
    pub tags: Option<String>,
    /// New code repository URL
    #[arg(long)]
    pub github: Option<String>,
    /// New live demo URL
    #[arg(long)]
    pub demo: Option<String>,
    /// Replace the image with this file
    #[arg(long, conflicts_with = "clear_image")]
    pub image: Option<String>,
    /// Remove the image
    #[arg(long)]
    pub clear_image: bool,
}

#[derive(Args)]
pub struct ImportArgs {
    /// JSON file holding an array of projects
    pub file: String,
}

#[derive(Args)]
pub struct ExportArgs {
    /// Output file, or - for stdout
    #[arg(long, short = 'o', default_value = "projects.json")]
    pub output: String,
}

#[derive(Args)]
pub struct ThemeArgs {
    /// light, dark, or toggle (omit to print the current theme)
    pub value: Option<String>,
}

#[derive(Args)]
pub struct HtmlArgs {
    /// Output file, or - for stdout
    #[arg(long, short = 'o', default_value = "portfolio.html")]
    pub output: String,
    #[command(flatten)]
    pub query: QueryArgs,
}

#[derive(Args)]
pub struct RecoveryArgs {
    #[command(subcommand)]
    pub action: Option<RecoveryAction>,
    /// Maximum number of entries to show
    #[arg(long, default_value_t = 10)]
    pub limit: usize,
    /// Print the path to the recovery log instead
    #[arg(long)]
    pub path: bool,
}

#[derive(Subcommand)]
pub enum RecoveryAction {
    /// Remove old entries
    Prune(RecoveryPruneArgs),
}

#[derive(Args)]
pub struct RecoveryPruneArgs {
    /// Remove entries older than this timestamp (default: 30 days ago)
    #[arg(long, conflicts_with = "all")]
    pub before: Option<String>,
    /// Remove all entries
    #[arg(long)]
    pub all: bool,
}
