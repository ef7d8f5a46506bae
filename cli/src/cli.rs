use catq::{OutputTarget, DEFAULT_ENDPOINT};
use clap::{ArgAction, Parser, Subcommand, ValueHint};
use std::path::PathBuf;

/// The catalog shipped with this tool.
const BUNDLED_CATALOG: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/query");

#[derive(Parser)]
#[command(about, version, name = "catq")]
/// List and execute SPARQL query templates against a SPARQL endpoint
pub struct Args {
    /// Directory containing the `*.sparql` query templates
    #[arg(long, global = true, default_value = BUNDLED_CATALOG, value_hint = ValueHint::DirPath)]
    pub catalog: PathBuf,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// List all available queries, or the variables of a selected query
    #[command(visible_aliases = ["ls", "l"])]
    List {
        /// Selects the query for which to list the variables
        ///
        /// If not provided, lists all available queries.
        #[arg(value_name = "QUERYNAME")]
        query: Option<String>,
    },
    /// Execute the chosen query
    #[command(visible_aliases = ["q", "qry"])]
    Query {
        /// Selects the query template to render with the given variables
        #[arg(value_name = "QUERYNAME")]
        query: String,
        /// Binds a named variable of the template
        ///
        /// Can be repeated. A later binding for the same NAME replaces an earlier one. VALUE may
        /// be a negative number, e.g. `-v minlon -10.5`.
        #[arg(
            short = 'v',
            long = "var",
            num_args = 2,
            value_names = ["NAME", "VALUE"],
            allow_negative_numbers = true,
            action = ArgAction::Append
        )]
        var: Vec<String>,
        /// Where to write the CSV results, `-` for stdout
        #[arg(short, long, value_name = "FILE|-", default_value = catq::STDOUT_MARKER, value_hint = ValueHint::FilePath)]
        output: OutputTarget,
        /// Overwrite the output file if it already exists
        #[arg(short, long)]
        force: bool,
        /// URL of the SPARQL endpoint to query
        #[arg(short, long, default_value = DEFAULT_ENDPOINT, value_hint = ValueHint::Url)]
        url: String,
    },
}
