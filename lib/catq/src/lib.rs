#![doc = include_str!("../README.md")]

mod bindings;
mod catalog;
mod endpoint;
pub mod error;
mod executor;
mod filters;
mod output;
mod results;

pub use bindings::{Bindings, ResolvedBindings};
pub use catalog::{QueryCatalog, TEMPLATE_EXTENSION};
pub use endpoint::{HttpEndpoint, SparqlEndpoint, DEFAULT_ENDPOINT};
pub use executor::{execute_query, render_query, submit_query, ExecutedQuery, QueryRequest};
pub use output::{OutputTarget, STDOUT_MARKER};
pub use results::QueryResults;
