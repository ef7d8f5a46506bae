use reqwest::StatusCode;
use sparesults::QueryResultsParseError;
use std::io;
use std::path::PathBuf;

/// An error raised while listing, inspecting or executing a catalog query.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum CatalogError {
    /// There is no `<name>.sparql` file in the catalog directory.
    #[error("Query with name {name} does not have a matching template file")]
    TemplateNotFound { name: String },
    /// The output file exists and overwriting was not forced.
    #[error("Output file {} already exists", path.display())]
    OutputExists { path: PathBuf },
    /// The template could not be parsed or rendered with the given bindings.
    #[error("Could not render the template for query {name}: {source:#}")]
    Render {
        name: String,
        #[source]
        source: minijinja::Error,
    },
    /// The endpoint URL is not a valid URL.
    #[error("Invalid endpoint URL '{url}': {source}")]
    InvalidEndpoint {
        url: String,
        #[source]
        source: url::ParseError,
    },
    /// The endpoint did not answer the query with usable results.
    #[error("Query on endpoint {url} failed: {source}")]
    RemoteQuery {
        url: String,
        /// The rendered query text that was submitted.
        query: String,
        #[source]
        source: RemoteQueryError,
    },
    /// The results could not be written to their destination.
    #[error("Could not write results to {destination}: {source}")]
    Output {
        destination: String,
        #[source]
        source: io::Error,
    },
    /// The catalog directory could not be scanned.
    #[error("Could not scan the catalog directory {}: {message}", dir.display())]
    Catalog { dir: PathBuf, message: String },
    /// A template file exists but could not be read.
    #[error("Could not read template file {}: {source}", path.display())]
    TemplateRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl CatalogError {
    /// Returns the rendered query text if the error happened after rendering.
    pub fn rendered_query(&self) -> Option<&str> {
        match self {
            Self::RemoteQuery { query, .. } => Some(query),
            _ => None,
        }
    }
}

/// An error returned by a [`SparqlEndpoint`](crate::endpoint::SparqlEndpoint).
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum RemoteQueryError {
    /// The HTTP request could not be sent or its body could not be read.
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
    /// The endpoint answered with a non-success status.
    #[error("The endpoint answered with status {status}: {body}")]
    Status { status: StatusCode, body: String },
    /// The response has a media type that is not a SPARQL results format.
    #[error("The content media type {0} is not supported")]
    UnsupportedContentType(String),
    /// The response body is not a valid results document.
    #[error(transparent)]
    ResultsParsing(#[from] QueryResultsParseError),
    /// Any other failure of a non-HTTP endpoint.
    #[error("{0}")]
    Other(String),
}
