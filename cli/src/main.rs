#![allow(clippy::print_stdout, reason = "The results and reports are printed on stdout")]
use crate::cli::{Args, Command};
use anyhow::anyhow;
use catq::error::CatalogError;
use catq::{
    render_query, submit_query, Bindings, ExecutedQuery, HttpEndpoint, QueryCatalog, QueryRequest,
};
use clap::Parser;
use std::io;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod cli;

#[tokio::main(flavor = "current_thread")]
pub async fn main() -> anyhow::Result<ExitCode> {
    init_tracing()?;
    let args = Args::parse();
    let catalog = QueryCatalog::new(args.catalog);
    let success = match args.command {
        Command::List { query: None } => list_queries(&catalog),
        Command::List { query: Some(query) } => list_variables(&catalog, &query),
        Command::Query {
            query,
            var,
            output,
            force,
            url,
        } => {
            let request = QueryRequest {
                name: query,
                bindings: bindings_from_args(&var).resolve(),
                output,
                force,
            };
            run_query(&catalog, &request, &url).await
        }
    };
    Ok(if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Diagnostics go to stderr so they never mix with results on stdout.
fn init_tracing() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init()
        .map_err(|e| anyhow!("Could not install the log subscriber: {e}"))
}

fn list_queries(catalog: &QueryCatalog) -> bool {
    match catalog.list_queries() {
        Ok(names) if names.is_empty() => {
            println!("No queries found in the query folder");
            true
        }
        Ok(names) => {
            println!("Available queries found are:");
            print_items(&names);
            true
        }
        Err(e) => {
            println!("Error: {e}");
            false
        }
    }
}

fn list_variables(catalog: &QueryCatalog, query: &str) -> bool {
    match catalog.variables(query) {
        Ok(variables) if variables.is_empty() => {
            println!("No variables found for query {query}");
            true
        }
        Ok(variables) => {
            println!("Variables needed for query {query} are:");
            print_items(&variables);
            true
        }
        Err(e) => {
            println!("Error: {e}");
            false
        }
    }
}

async fn run_query(catalog: &QueryCatalog, request: &QueryRequest, url: &str) -> bool {
    match execute(catalog, request, url).await {
        Ok(executed) => {
            tracing::info!(rows = executed.rows, "Query executed");
            true
        }
        Err(e) => {
            report_query_failure(&e, request, url);
            false
        }
    }
}

/// The endpoint is only created once the template is rendered and the output is known to be
/// writable.
async fn execute(
    catalog: &QueryCatalog,
    request: &QueryRequest,
    url: &str,
) -> Result<ExecutedQuery, CatalogError> {
    let query = render_query(catalog, request)?;
    let endpoint = HttpEndpoint::new(url)?;
    submit_query(&endpoint, request, query, io::stdout()).await
}

fn report_query_failure(error: &CatalogError, request: &QueryRequest, url: &str) {
    println!("Error: {error}");
    println!(
        "Failed to execute query {} with bindings {} on endpoint {url}",
        request.name, request.bindings
    );
    if let Some(query) = error.rendered_query() {
        println!("Using query:\n--\n{query}\n--");
    }
}

/// Pairs up the flat `NAME VALUE` list collected for the repeated `--var` option.
fn bindings_from_args(values: &[String]) -> Bindings {
    values
        .chunks_exact(2)
        .map(|pair| (pair[0].as_str(), pair[1].as_str()))
        .collect()
}

fn print_items(items: &[String]) {
    for item in items {
        println!(" - {item}");
    }
}
