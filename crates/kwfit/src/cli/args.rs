//! Clap argument definitions for the `kwfit` CLI.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};
use kwfit_classify::FitStatus;
use kwfit_config::TierStrategy;
use kwfit_dictionary::{ProductLine, TokenBucket};

/// Parses a dictionary bucket name.
fn parse_bucket(s: &str) -> Result<TokenBucket, String> {
    s.parse()
}

/// Parses a concrete product line.
fn parse_product_line(s: &str) -> Result<ProductLine, String> {
    let line: ProductLine = s.parse()?;
    if line.is_concrete() {
        Ok(line)
    } else {
        Err(format!(
            "'{line}' is not a concrete product line (expected one of: {})",
            ProductLine::CONCRETE.map(ProductLine::as_str).join(", ")
        ))
    }
}

/// Parses a fit status.
fn parse_fit_status(s: &str) -> Result<FitStatus, String> {
    s.parse()
}

/// Parses a tiering strategy.
fn parse_strategy(s: &str) -> Result<TierStrategy, String> {
    s.parse()
}

/// Top-level CLI options.
#[derive(Parser)]
#[command(name = "kwfit")]
#[command(about = "Keyword fit classifier and page priority scorer")]
pub struct Cli {
    /// Log more (-v info, -vv debug, -vvv trace). KWFIT_LOG overrides.
    #[arg(short = 'v', long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Arguments for `kwfit init`.
#[derive(Args, Debug, Clone)]
pub struct InitCommand {
    /// Create global ~/.kwfit.toml instead
    #[arg(long)]
    pub global: bool,

    /// Overwrite existing configuration file
    #[arg(long)]
    pub force: bool,
}

/// Arguments for `kwfit classify`.
#[derive(Args, Debug, Clone)]
pub struct ClassifyCommand {
    /// Client code
    pub client: String,

    /// Keywords to classify
    #[arg(required = true)]
    pub keywords: Vec<String>,

    /// Show the per-bucket matches behind each verdict
    #[arg(long)]
    pub signals: bool,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `kwfit tag`.
#[derive(Args, Debug, Clone)]
pub struct TagCommand {
    /// Client code
    pub client: String,

    /// Only tag keywords from this location (overrides the client's default)
    #[arg(short = 'l', long)]
    pub location: Option<String>,

    /// Only tag keywords whose domain matches this glob (repeatable; overrides the client's default)
    #[arg(short = 'd', long = "domain")]
    pub domains: Vec<String>,

    /// Ignore the client's configured location and domain filters
    #[arg(long, conflicts_with_all = ["location", "domains"])]
    pub all: bool,

    /// Classify on all cores
    #[arg(long)]
    pub parallel: bool,

    /// Output the run report in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `kwfit tags`.
#[derive(Args, Debug, Clone)]
pub struct TagsCommand {
    /// Client code
    pub client: String,

    /// Only show tags with this fit status
    #[arg(short = 's', long, value_parser = parse_fit_status)]
    pub status: Option<FitStatus>,

    /// Show at most this many tags
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `kwfit dict`.
#[derive(Args, Debug, Clone)]
pub struct DictCommand {
    /// Dictionary operation.
    #[command(subcommand)]
    pub action: DictAction,
}

/// Arguments for `kwfit dict show`.
#[derive(Args, Debug, Clone)]
pub struct DictShowCommand {
    /// Client code
    pub client: String,

    /// Only show this bucket
    #[arg(short = 'b', long, value_parser = parse_bucket)]
    pub bucket: Option<TokenBucket>,

    /// Output the stored dictionary as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `kwfit dict add`.
#[derive(Args, Debug, Clone)]
pub struct DictAddCommand {
    /// Client code
    pub client: String,

    /// Bucket: brand, positive, negative, ambiguous, anchor or ignore
    #[arg(value_parser = parse_bucket)]
    pub bucket: TokenBucket,

    /// Tokens to add
    #[arg(required_unless_present = "file")]
    pub tokens: Vec<String>,

    /// Read additional tokens from a file, one per line
    #[arg(short = 'f', long)]
    pub file: Option<PathBuf>,

    /// Mark negative tokens as hard negatives (veto)
    #[arg(long)]
    pub hard: bool,

    /// Map added positive tokens to a product line (repeatable)
    #[arg(long = "line", value_parser = parse_product_line)]
    pub lines: Vec<ProductLine>,
}

/// Arguments for `kwfit dict remove`.
#[derive(Args, Debug, Clone)]
pub struct DictRemoveCommand {
    /// Client code
    pub client: String,

    /// Bucket to remove from
    #[arg(value_parser = parse_bucket)]
    pub bucket: TokenBucket,

    /// Tokens to remove
    #[arg(required = true)]
    pub tokens: Vec<String>,
}

/// Arguments for `kwfit dict lines`.
#[derive(Args, Debug, Clone)]
pub struct DictLinesCommand {
    /// Client code
    pub client: String,

    /// Positive token to map
    pub token: String,

    /// Product lines; none clears the mapping
    #[arg(value_parser = parse_product_line)]
    pub lines: Vec<ProductLine>,
}

/// Arguments for `kwfit dict check`.
#[derive(Args, Debug, Clone)]
pub struct DictCheckCommand {
    /// Client code
    pub client: String,
}

/// Dictionary operations.
#[derive(Subcommand, Debug, Clone)]
pub enum DictAction {
    /// Show a client's tokens by bucket
    Show(DictShowCommand),
    /// Add tokens to a bucket
    Add(DictAddCommand),
    /// Remove tokens from a bucket
    Remove(DictRemoveCommand),
    /// Set the product lines of a positive token
    Lines(DictLinesCommand),
    /// Check a dictionary for conflicts
    Check(DictCheckCommand),
}

/// Arguments for `kwfit priority`.
#[derive(Args, Debug, Clone)]
pub struct PriorityCommand {
    /// Client code
    pub client: String,

    /// Tiering strategy: percentile or fixed-threshold [default: from config]
    #[arg(long, value_parser = parse_strategy)]
    pub strategy: Option<TierStrategy>,

    /// Write scores and tiers back to the client's page records
    #[arg(long)]
    pub write: bool,

    /// Show at most this many pages
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Supported `kwfit` subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// Initialize kwfit configuration in current directory
    Init(InitCommand),

    /// Show status and validate configuration
    Status,

    /// Show effective configuration settings
    Config,

    /// Classify keywords against a client's dictionary
    #[command(after_help = "\
FIT STATUSES:
  CORE_MATCH   Fits a core product line
  BRAND_KW     Brand keyword
  REVIEW       Mixed or weak signals, needs a human look
  NO_MATCH     Rejected (hard negative, negatives, or no signals at all)
  BLANK        Empty keyword

EXAMPLES:
  kwfit classify acme 'acme twister' 'rug doctor'
  kwfit classify acme 'yarn twister' --signals
  kwfit classify acme 'yarn twister' --json")]
    Classify(ClassifyCommand),

    /// Tag a client's stored keyword set and merge the verdicts into its tags
    Tag(TagCommand),

    /// List a client's stored tags
    Tags(TagsCommand),

    /// Edit and check a client's token dictionary
    Dict(DictCommand),

    /// Score and tier a client's pages
    Priority(PriorityCommand),
}
