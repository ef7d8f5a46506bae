use oxrdf::Variable;
use sparesults::{
    QueryResultsFormat, QueryResultsParseError, QueryResultsParser, QueryResultsSerializer,
    QuerySolution, ReaderQueryResultsParserOutput,
};
use std::io::{self, Read, Write};

/// Results of a [SPARQL query](https://www.w3.org/TR/sparql11-query/) returned by an endpoint.
#[derive(Debug, PartialEq)]
pub enum QueryResults {
    /// Results of a [SELECT](https://www.w3.org/TR/sparql11-query/#select) query.
    Solutions {
        variables: Vec<Variable>,
        solutions: Vec<QuerySolution>,
    },
    /// Result of an [ASK](https://www.w3.org/TR/sparql11-query/#ask) query.
    Boolean(bool),
}

impl QueryResults {
    /// Reads a SPARQL query results serialization.
    pub fn read(
        reader: impl Read,
        format: QueryResultsFormat,
    ) -> Result<Self, QueryResultsParseError> {
        match QueryResultsParser::from_format(format).for_reader(reader)? {
            ReaderQueryResultsParserOutput::Solutions(parser) => {
                let variables = parser.variables().to_vec();
                let solutions = parser.collect::<Result<Vec<_>, _>>()?;
                Ok(Self::Solutions {
                    variables,
                    solutions,
                })
            }
            ReaderQueryResultsParserOutput::Boolean(value) => Ok(Self::Boolean(value)),
        }
    }

    /// Writes the results as [SPARQL CSV](https://www.w3.org/TR/sparql11-results-csv-tsv/).
    pub fn write_csv<W: Write>(&self, writer: W) -> io::Result<W> {
        let serializer = QueryResultsSerializer::from_format(QueryResultsFormat::Csv);
        match self {
            Self::Boolean(value) => serializer.serialize_boolean_to_writer(writer, *value),
            Self::Solutions {
                variables,
                solutions,
            } => {
                let mut serializer =
                    serializer.serialize_solutions_to_writer(writer, variables.clone())?;
                for solution in solutions {
                    serializer.serialize(solution)?;
                }
                serializer.finish()
            }
        }
    }

    /// The number of solutions, or `1` for a boolean result.
    pub fn len(&self) -> usize {
        match self {
            Self::Solutions { solutions, .. } => solutions.len(),
            Self::Boolean(_) => 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
#[allow(clippy::panic_in_result_fn)]
mod tests {
    use super::*;
    use anyhow::{bail, Result};

    const SOLUTIONS_JSON: &str = r#"{
        "head": { "vars": ["ds", "title"] },
        "results": { "bindings": [
            { "ds": { "type": "uri", "value": "http://example.com/ds1" },
              "title": { "type": "literal", "value": "Ocean, data" } },
            { "ds": { "type": "uri", "value": "http://example.com/ds2" } }
        ] }
    }"#;

    #[test]
    fn read_json_solutions() -> Result<()> {
        let results = QueryResults::read(SOLUTIONS_JSON.as_bytes(), QueryResultsFormat::Json)?;
        let QueryResults::Solutions {
            variables,
            solutions,
        } = &results
        else {
            bail!("expected solutions, got {results:?}");
        };
        assert_eq!(
            variables,
            &[Variable::new_unchecked("ds"), Variable::new_unchecked("title")]
        );
        assert_eq!(solutions.len(), 2);
        assert_eq!(results.len(), 2);
        Ok(())
    }

    #[test]
    fn write_csv_solutions() -> Result<()> {
        let results = QueryResults::read(SOLUTIONS_JSON.as_bytes(), QueryResultsFormat::Json)?;
        let csv = String::from_utf8(results.write_csv(Vec::new())?)?;
        assert_eq!(
            csv,
            "ds,title\r\nhttp://example.com/ds1,\"Ocean, data\"\r\nhttp://example.com/ds2,\r\n"
        );
        Ok(())
    }

    #[test]
    fn write_csv_boolean() -> Result<()> {
        let results = QueryResults::read(
            r#"{"head":{},"boolean":true}"#.as_bytes(),
            QueryResultsFormat::Json,
        )?;
        assert_eq!(results, QueryResults::Boolean(true));
        assert_eq!(results.write_csv(Vec::new())?, b"true");
        Ok(())
    }

    #[test]
    fn read_rejects_invalid_document() {
        assert!(QueryResults::read("{".as_bytes(), QueryResultsFormat::Json).is_err());
    }
}
