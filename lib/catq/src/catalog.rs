use crate::bindings::ResolvedBindings;
use crate::error::CatalogError;
use crate::filters::register_filters;
use glob::Pattern;
use minijinja::{Environment, UndefinedBehavior};
use std::collections::BTreeSet;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

/// The file extension of query templates.
pub const TEMPLATE_EXTENSION: &str = "sparql";

/// A directory of SPARQL query templates.
///
/// Each `<name>.sparql` file in the directory is a query named `<name>`. Templates use the Jinja2
/// syntax, e.g. `{{ org }}` is replaced by the value bound to `org`.
#[derive(Clone, Debug)]
pub struct QueryCatalog {
    dir: PathBuf,
}

impl QueryCatalog {
    /// Creates a catalog over the templates in `dir`.
    ///
    /// The directory is only read when queries are listed or rendered.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the names of all templates in the catalog, sorted lexicographically.
    ///
    /// A missing directory contains no queries.
    pub fn list_queries(&self) -> Result<Vec<String>, CatalogError> {
        let pattern = format!(
            "{}/*.{TEMPLATE_EXTENSION}",
            Pattern::escape(&self.dir.to_string_lossy())
        );
        let paths = glob::glob(&pattern).map_err(|e| CatalogError::Catalog {
            dir: self.dir.clone(),
            message: e.to_string(),
        })?;

        let mut names = Vec::new();
        for path in paths {
            let path = match path {
                Ok(path) => path,
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping unreadable catalog entry");
                    continue;
                }
            };
            if !path.is_file() {
                continue;
            }
            if let Some(name) = path.file_stem().and_then(OsStr::to_str) {
                names.push(name.to_owned());
            }
        }
        names.sort();
        tracing::debug!(queries = ?names, "Available queries found");
        Ok(names)
    }

    /// Returns the path of the template for `name`.
    ///
    /// Fails with [`CatalogError::TemplateNotFound`] if there is no such file.
    pub fn template_path(&self, name: &str) -> Result<PathBuf, CatalogError> {
        let not_found = || CatalogError::TemplateNotFound {
            name: name.to_owned(),
        };
        if name.is_empty() || name.contains(['/', '\\']) {
            return Err(not_found());
        }
        let path = self.dir.join(format!("{name}.{TEMPLATE_EXTENSION}"));
        if path.is_file() {
            Ok(path)
        } else {
            Err(not_found())
        }
    }

    /// Returns the variables referenced by the template `name`, deduplicated and sorted.
    ///
    /// Only top-level names are reported: `{{ org.name }}` references `org`.
    pub fn variables(&self, name: &str) -> Result<Vec<String>, CatalogError> {
        let source = self.read_template(name)?;
        let file_name = template_file_name(name);
        let env = template_environment();
        let template = env
            .template_from_named_str(&file_name, &source)
            .map_err(|source| CatalogError::Render {
                name: name.to_owned(),
                source,
            })?;
        let variables = template
            .undeclared_variables(false)
            .into_iter()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect::<Vec<_>>();
        tracing::debug!(query = name, ?variables, "Variables found");
        Ok(variables)
    }

    /// Renders the template `name` with `bindings`.
    ///
    /// Every variable referenced by the template must be bound.
    pub fn render(&self, name: &str, bindings: &ResolvedBindings) -> Result<String, CatalogError> {
        let source = self.read_template(name)?;
        let file_name = template_file_name(name);
        let render_error = |source| CatalogError::Render {
            name: name.to_owned(),
            source,
        };
        let env = template_environment();
        let query = env
            .template_from_named_str(&file_name, &source)
            .and_then(|template| template.render(bindings.as_map()))
            .map_err(render_error)?;
        Ok(query)
    }

    fn read_template(&self, name: &str) -> Result<String, CatalogError> {
        let path = self.template_path(name)?;
        fs::read_to_string(&path).map_err(|source| CatalogError::TemplateRead { path, source })
    }
}

/// Unbound variables fail rendering.
fn template_environment<'source>() -> Environment<'source> {
    let mut env = Environment::new();
    env.set_undefined_behavior(UndefinedBehavior::Strict);
    env.set_keep_trailing_newline(true);
    register_filters(&mut env);
    env
}

fn template_file_name(name: &str) -> String {
    format!("{name}.{TEMPLATE_EXTENSION}")
}
