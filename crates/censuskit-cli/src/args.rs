use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use censuskit_core::category::Family;
use censuskit_core::table::Dimension;

#[derive(Parser, Debug)]
#[command(
    name = "censuskit",
    about = "Reconcile mismatched census categories and compute conditional distributions",
    version,
    after_help = "Examples:\n  censuskit query age \"30 to 34 years\"                 # sources from censuskit.toml\n  censuskit query age \"30 to 34 years\" --table age_income=tables/b19037.json\n  censuskit condition tables/b15001.json \"25 to 34 years\" --family age\n  censuskit marginal tables/b15001.json --axis b\n  censuskit match income \"$40,000 to $60,000\" --table tables/b19037.json\n  censuskit crosswalk age --table tables/b19037.json\n  censuskit inspect tables/b15001.json"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to censuskit.toml
    /// Falls back to CENSUSKIT_CONFIG env var or .env file, then ./censuskit.toml
    #[arg(long, global = true, env = "CENSUSKIT_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Query every registered source for one category value
    Query(QueryArgs),

    /// Conditional distribution of one table given a value on one axis
    Condition(ConditionArgs),

    /// Marginal distribution of one table axis
    Marginal(MarginalArgs),

    /// Match a category value against a list of candidates
    Match(MatchArgs),

    /// Map a whole vocabulary onto a table's categories
    Crosswalk(CrosswalkArgs),

    /// Summarize a joint table file and flag unrecognized labels
    Inspect(InspectArgs),
}

#[derive(Parser, Debug)]
pub struct QueryArgs {
    /// Category family of the value (age, income, education, profession, race, gender)
    pub family: Family,

    /// The value to query, e.g. "30 to 34 years"
    pub value: String,

    /// Extra or overriding sources as id=path (e.g., age_income=tables/b19037.json)
    #[arg(long = "table", value_delimiter = ',')]
    pub tables: Vec<String>,

    /// Only query these source ids
    #[arg(long, value_delimiter = ',')]
    pub only: Vec<String>,

    /// Location descriptor forwarded to table providers, as JSON
    #[arg(long)]
    pub location: Option<String>,

    /// Maximum concurrent table fetches
    #[arg(long)]
    pub max_concurrency: Option<usize>,

    /// Output format
    #[arg(long, default_value = "table")]
    pub format: OutputFormat,
}

#[derive(Parser, Debug)]
pub struct ConditionArgs {
    /// Joint table JSON file
    pub table: PathBuf,

    /// The value to condition on
    pub value: String,

    /// Axis to condition on (a or b)
    #[arg(long, conflicts_with = "family")]
    pub axis: Option<Dimension>,

    /// Find the axis by family and match the value against its categories
    #[arg(long)]
    pub family: Option<Family>,

    /// Output format
    #[arg(long, default_value = "table")]
    pub format: OutputFormat,
}

#[derive(Parser, Debug)]
pub struct MarginalArgs {
    /// Joint table JSON file
    pub table: PathBuf,

    /// Axis to summarize (a or b)
    #[arg(long, default_value = "a")]
    pub axis: Dimension,

    /// Output format
    #[arg(long, default_value = "table")]
    pub format: OutputFormat,
}

#[derive(Parser, Debug)]
pub struct MatchArgs {
    /// Category family
    pub family: Family,

    /// The value to match
    pub target: String,

    /// Candidate labels (defaults to the family's standard vocabulary)
    pub candidates: Vec<String>,

    /// Take candidates from this table's axis of the same family instead
    #[arg(long, conflicts_with = "candidates")]
    pub table: Option<PathBuf>,

    /// Output format
    #[arg(long, default_value = "table")]
    pub format: OutputFormat,
}

#[derive(Parser, Debug)]
pub struct CrosswalkArgs {
    /// Category family
    pub family: Family,

    /// Table whose axis of this family is the target vocabulary
    #[arg(long)]
    pub table: Option<PathBuf>,

    /// Target labels, when no table is given
    #[arg(long, value_delimiter = ';', required_unless_present = "table")]
    pub to: Vec<String>,

    /// Source labels (defaults to the family's standard vocabulary)
    #[arg(long, value_delimiter = ';')]
    pub from: Vec<String>,

    /// Flag entries scoring below this
    #[arg(long, default_value = "0.5")]
    pub threshold: f64,

    /// Output format
    #[arg(long, default_value = "table")]
    pub format: OutputFormat,
}

#[derive(Parser, Debug)]
pub struct InspectArgs {
    /// Joint table JSON file
    pub table: PathBuf,

    /// Output format
    #[arg(long, default_value = "table")]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

impl QueryArgs {
    /// Parse source overrides like "age_income=tables/b19037.json".
    /// Entries without '=' are skipped with a warning.
    pub fn parse_tables(&self) -> Vec<(String, PathBuf)> {
        self.tables
            .iter()
            .filter_map(|entry| match entry.split_once('=') {
                Some((id, path)) if !id.is_empty() && !path.is_empty() => {
                    Some((id.to_string(), PathBuf::from(path)))
                }
                _ => {
                    tracing::warn!(
                        "Invalid --table entry: '{}'. Expected format 'id=path'. Ignoring.",
                        entry
                    );
                    None
                }
            })
            .collect()
    }
}
