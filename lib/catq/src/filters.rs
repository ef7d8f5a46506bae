//! Template filters that format binding values as SPARQL syntax.
//!
//! Bindings are plain strings. Templates decide how a value is embedded in the query:
//!
//! ```text
//! SELECT ?ds WHERE {
//!   ?ds dct:publisher {{ publisher | uri }} ;
//!       dct:title ?title .
//!   FILTER(REGEX(?title, "{{ term | regexstr }}", "i"))
//!   FILTER(?modified > {{ since | xsd('date') }})
//! }
//! ```

use minijinja::{Environment, Error, ErrorKind};
use oxiri::Iri;

const XSD_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema#";
const REGEX_METACHARACTERS: &str = ".*+?()[]{}^$|";

/// Registers all SPARQL syntax filters on `env`.
pub fn register_filters(env: &mut Environment<'_>) {
    env.add_filter("uri", uri);
    env.add_filter("literal", literal);
    env.add_filter("xsd", xsd);
    env.add_filter("regexstr", regexstr);
}

/// Renders `value` as an IRI reference, e.g. `<http://example.com/a>`.
fn uri(value: &str) -> Result<String, Error> {
    let iri = Iri::parse(value).map_err(|e| {
        Error::new(
            ErrorKind::InvalidOperation,
            format!("'{value}' is not a valid IRI: {e}"),
        )
    })?;
    Ok(format!("<{}>", iri.as_str()))
}

/// Renders `value` as a quoted string literal.
fn literal(value: &str) -> String {
    format!("\"{}\"", escape_string(value))
}

/// Renders `value` as a typed literal. The datatype may be a local name of the XSD namespace,
/// a prefixed name or a full IRI.
fn xsd(value: &str, datatype: &str) -> Result<String, Error> {
    let datatype = if datatype.starts_with("xsd:") {
        datatype.to_owned()
    } else if datatype.contains(':') {
        uri(datatype)?
    } else if !datatype.is_empty() && datatype.chars().all(char::is_alphanumeric) {
        format!("<{XSD_NAMESPACE}{datatype}>")
    } else {
        return Err(Error::new(
            ErrorKind::InvalidOperation,
            format!("'{datatype}' is not a valid datatype"),
        ));
    };
    Ok(format!("{}^^{datatype}", literal(value)))
}

/// Escapes `value` so it matches itself inside a `REGEX` pattern string.
fn regexstr(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\\\\\"),
            c if REGEX_METACHARACTERS.contains(c) => {
                escaped.push_str("\\\\");
                escaped.push(c);
            }
            c => push_escaped_char(&mut escaped, c),
        }
    }
    escaped
}

fn escape_string(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        push_escaped_char(&mut escaped, c);
    }
    escaped
}

fn push_escaped_char(target: &mut String, c: char) {
    match c {
        '\\' => target.push_str("\\\\"),
        '"' => target.push_str("\\\""),
        '\n' => target.push_str("\\n"),
        '\r' => target.push_str("\\r"),
        '\t' => target.push_str("\\t"),
        c => target.push(c),
    }
}

#[cfg(test)]
#[allow(clippy::panic_in_result_fn)]
mod tests {
    use super::*;
    use anyhow::Result;
    use minijinja::context;

    fn render(template: &str, value: &str) -> Result<String, Error> {
        let mut env = Environment::new();
        register_filters(&mut env);
        env.render_str(template, context! { value => value })
    }

    #[test]
    fn uri_wraps_valid_iri() -> Result<()> {
        assert_eq!(
            render("{{ value | uri }}", "http://example.com/a")?,
            "<http://example.com/a>"
        );
        Ok(())
    }

    #[test]
    fn uri_rejects_relative_reference() {
        let err = render("{{ value | uri }}", "not an iri").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidOperation);
    }

    #[test]
    fn literal_escapes_quotes_and_newlines() -> Result<()> {
        assert_eq!(
            render("{{ value | literal }}", "say \"hi\"\nnow")?,
            r#""say \"hi\"\nnow""#
        );
        Ok(())
    }

    #[test]
    fn xsd_local_name() -> Result<()> {
        assert_eq!(
            render("{{ value | xsd('date') }}", "2024-01-01")?,
            r#""2024-01-01"^^<http://www.w3.org/2001/XMLSchema#date>"#
        );
        Ok(())
    }

    #[test]
    fn xsd_prefixed_name_is_kept() -> Result<()> {
        assert_eq!(
            render("{{ value | xsd('xsd:integer') }}", "42")?,
            r#""42"^^xsd:integer"#
        );
        Ok(())
    }

    #[test]
    fn xsd_rejects_garbage_datatype() {
        assert!(render("{{ value | xsd('a b') }}", "42").is_err());
    }

    #[test]
    fn regexstr_escapes_metacharacters() -> Result<()> {
        assert_eq!(
            render("{{ value | regexstr }}", "a.b (c)")?,
            r"a\\.b \\(c\\)"
        );
        Ok(())
    }

    #[test]
    fn regexstr_escapes_backslash_and_quote() -> Result<()> {
        assert_eq!(
            render("{{ value | regexstr }}", r#"\""#)?,
            r#"\\\\\""#
        );
        Ok(())
    }
}
