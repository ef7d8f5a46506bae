use crate::bindings::ResolvedBindings;
use crate::catalog::QueryCatalog;
use crate::endpoint::SparqlEndpoint;
use crate::error::CatalogError;
use crate::output::OutputTarget;
use std::io::Write;

/// A request to execute a catalog query.
#[derive(Clone, Debug)]
pub struct QueryRequest {
    /// The name of the template.
    pub name: String,
    /// The bindings, with duplicate names already collapsed.
    pub bindings: ResolvedBindings,
    /// Where the CSV results are written to.
    pub output: OutputTarget,
    /// Whether an existing output file may be replaced.
    pub force: bool,
}

/// Summary of a successful execution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExecutedQuery {
    /// The rendered query text that was submitted.
    pub query: String,
    /// The number of result rows written.
    pub rows: usize,
}

/// Renders the requested template and checks that its output destination can be written.
///
/// No endpoint is involved, so these failures are reported before any endpoint is created.
pub fn render_query(
    catalog: &QueryCatalog,
    request: &QueryRequest,
) -> Result<String, CatalogError> {
    catalog.template_path(&request.name)?;
    let query = catalog.render(&request.name, &request.bindings)?;
    request.output.check_writable(request.force)?;
    Ok(query)
}

/// Evaluates an already rendered `query` on `endpoint` and writes the results.
///
/// Results for [`OutputTarget::Stdout`] are written to `stdout`.
pub async fn submit_query<E: SparqlEndpoint + ?Sized>(
    endpoint: &E,
    request: &QueryRequest,
    query: String,
    stdout: impl Write,
) -> Result<ExecutedQuery, CatalogError> {
    let results = match endpoint.query(&query).await {
        Ok(results) => results,
        Err(source) => {
            return Err(CatalogError::RemoteQuery {
                url: endpoint.url().to_owned(),
                query,
                source,
            })
        }
    };
    request
        .output
        .write_results(&results, request.force, stdout)?;
    tracing::debug!(
        query = request.name.as_str(),
        rows = results.len(),
        output = %request.output,
        "Query results written"
    );
    Ok(ExecutedQuery {
        query,
        rows: results.len(),
    })
}

/// Renders the requested template, evaluates it on `endpoint` and writes the results.
///
/// The template and the output destination are checked before the endpoint is contacted.
pub async fn execute_query<E: SparqlEndpoint + ?Sized>(
    catalog: &QueryCatalog,
    endpoint: &E,
    request: &QueryRequest,
    stdout: impl Write,
) -> Result<ExecutedQuery, CatalogError> {
    let query = render_query(catalog, request)?;
    submit_query(endpoint, request, query, stdout).await
}
