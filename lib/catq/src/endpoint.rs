use crate::error::{CatalogError, RemoteQueryError};
use crate::results::QueryResults;
use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE, USER_AGENT};
use reqwest::Client;
use sparesults::QueryResultsFormat;
use url::Url;

/// The endpoint queried when no other URL is given.
pub const DEFAULT_ENDPOINT: &str = "https://fair-ease-iddas.maris.nl/sparql/query";

/// Result formats accepted from an endpoint, in order of preference.
const ACCEPTED_RESULTS: &str = "application/sparql-results+json, \
    application/sparql-results+xml;q=0.9, \
    text/tab-separated-values;q=0.8";

/// A service that evaluates SPARQL queries.
#[async_trait]
pub trait SparqlEndpoint {
    /// The location of the endpoint, used for reporting.
    fn url(&self) -> &str;

    /// Evaluates `query` and returns its results.
    async fn query(&self, query: &str) -> Result<QueryResults, RemoteQueryError>;
}

/// A remote endpoint speaking the [SPARQL 1.1 protocol](https://www.w3.org/TR/sparql11-protocol/).
pub struct HttpEndpoint {
    url: Url,
    client: Client,
}

impl HttpEndpoint {
    /// Creates an endpoint for `url`.
    pub fn new(url: &str) -> Result<Self, CatalogError> {
        let url = Url::parse(url).map_err(|source| CatalogError::InvalidEndpoint {
            url: url.to_owned(),
            source,
        })?;
        Ok(Self {
            url,
            client: Client::new(),
        })
    }
}

#[async_trait]
impl SparqlEndpoint for HttpEndpoint {
    fn url(&self) -> &str {
        self.url.as_str()
    }

    async fn query(&self, query: &str) -> Result<QueryResults, RemoteQueryError> {
        tracing::info!(endpoint = %self.url, "Submitting query");
        let response = self
            .client
            .post(self.url.clone())
            .header(ACCEPT, ACCEPTED_RESULTS)
            .header(USER_AGENT, concat!("catq/", env!("CARGO_PKG_VERSION")))
            .form(&[("query", query)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RemoteQueryError::Status { status, body });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_owned();
        let format = results_format(&content_type)
            .ok_or_else(|| RemoteQueryError::UnsupportedContentType(content_type.clone()))?;

        let body = response.bytes().await?;
        tracing::debug!(bytes = body.len(), %content_type, "Received query results");
        Ok(QueryResults::read(&body[..], format)?)
    }
}

/// Maps a response media type to a parseable results format. Media type parameters are ignored.
fn results_format(content_type: &str) -> Option<QueryResultsFormat> {
    let media_type = content_type.split(';').next()?.trim();
    match QueryResultsFormat::from_media_type(media_type)? {
        QueryResultsFormat::Csv => None,
        format => Some(format),
    }
}

#[cfg(test)]
#[allow(clippy::panic_in_result_fn)]
mod tests {
    use super::*;
    use anyhow::Result;

    #[test]
    fn invalid_url_is_rejected() {
        assert!(matches!(
            HttpEndpoint::new("not a url"),
            Err(CatalogError::InvalidEndpoint { .. })
        ));
    }

    #[test]
    fn default_endpoint_is_valid() -> Result<()> {
        let endpoint = HttpEndpoint::new(DEFAULT_ENDPOINT)?;
        assert_eq!(endpoint.url(), DEFAULT_ENDPOINT);
        Ok(())
    }

    #[test]
    fn results_format_from_content_type() {
        assert_eq!(
            results_format("application/sparql-results+json; charset=utf-8"),
            Some(QueryResultsFormat::Json)
        );
        assert_eq!(
            results_format("application/sparql-results+xml"),
            Some(QueryResultsFormat::Xml)
        );
        assert_eq!(
            results_format("text/tab-separated-values"),
            Some(QueryResultsFormat::Tsv)
        );
        assert_eq!(results_format("text/csv"), None);
        assert_eq!(results_format("text/html"), None);
        assert_eq!(results_format(""), None);
    }
}
