use crate::error::CatalogError;
use crate::results::QueryResults;
use std::convert::Infallible;
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// The command line value that selects standard output.
pub const STDOUT_MARKER: &str = "-";

/// Where query results are written to.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum OutputTarget {
    /// Results are buffered in memory and printed.
    #[default]
    Stdout,
    /// Results are written to the file at this path.
    File(PathBuf),
}

impl OutputTarget {
    /// Fails with [`CatalogError::OutputExists`] if this target is an existing file and `force`
    /// is not set.
    pub fn check_writable(&self, force: bool) -> Result<(), CatalogError> {
        match self {
            Self::File(path) if !force && path.exists() => Err(CatalogError::OutputExists {
                path: path.clone(),
            }),
            _ => Ok(()),
        }
    }

    /// Writes `results` as CSV to this target.
    ///
    /// For [`OutputTarget::Stdout`] the CSV is serialized into a buffer which is then copied to
    /// `stdout`. For [`OutputTarget::File`] the file is only replaced if `force` is set.
    pub fn write_results(
        &self,
        results: &QueryResults,
        force: bool,
        mut stdout: impl Write,
    ) -> Result<(), CatalogError> {
        let output_error = |source| CatalogError::Output {
            destination: self.to_string(),
            source,
        };
        match self {
            Self::Stdout => {
                let buffer = results.write_csv(Vec::new()).map_err(output_error)?;
                stdout.write_all(&buffer).map_err(output_error)?;
                stdout.flush().map_err(output_error)
            }
            Self::File(path) => {
                let file = open_output_file(path, force)?;
                let writer = results
                    .write_csv(BufWriter::new(file))
                    .map_err(output_error)?;
                close_file_writer(writer).map_err(output_error)
            }
        }
    }
}

impl FromStr for OutputTarget {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(if s == STDOUT_MARKER {
            Self::Stdout
        } else {
            Self::File(PathBuf::from(s))
        })
    }
}

impl fmt::Display for OutputTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stdout => f.write_str("standard output"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

fn open_output_file(path: &Path, force: bool) -> Result<File, CatalogError> {
    let mut options = OpenOptions::new();
    options.write(true);
    if force {
        options.create(true).truncate(true);
    } else {
        options.create_new(true);
    }
    options.open(path).map_err(|source| {
        if source.kind() == io::ErrorKind::AlreadyExists {
            CatalogError::OutputExists {
                path: path.to_owned(),
            }
        } else {
            CatalogError::Output {
                destination: path.display().to_string(),
                source,
            }
        }
    })
}

fn close_file_writer(writer: BufWriter<File>) -> io::Result<()> {
    let mut file = writer
        .into_inner()
        .map_err(io::IntoInnerError::into_error)?;
    file.flush()?;
    file.sync_all()
}

#[cfg(test)]
#[allow(clippy::panic_in_result_fn)]
mod tests {
    use super::*;
    use anyhow::Result;
    use assert_fs::prelude::*;
    use assert_fs::TempDir;

    fn results() -> QueryResults {
        QueryResults::Boolean(true)
    }

    #[test]
    fn parse_dash_as_stdout() -> Result<()> {
        assert_eq!("-".parse::<OutputTarget>()?, OutputTarget::Stdout);
        assert_eq!(
            "out.csv".parse::<OutputTarget>()?,
            OutputTarget::File(PathBuf::from("out.csv"))
        );
        Ok(())
    }

    #[test]
    fn stdout_writes_to_the_given_writer() -> Result<()> {
        let mut printed = Vec::new();
        OutputTarget::Stdout.write_results(&results(), false, &mut printed)?;
        assert_eq!(printed, b"true");
        Ok(())
    }

    #[test]
    fn existing_file_without_force_is_a_conflict() -> Result<()> {
        let dir = TempDir::new()?;
        let file = dir.child("out.csv");
        file.write_str("previous")?;
        let target = OutputTarget::File(file.path().to_path_buf());

        assert!(matches!(
            target.check_writable(false),
            Err(CatalogError::OutputExists { .. })
        ));
        assert!(matches!(
            target.write_results(&results(), false, io::sink()),
            Err(CatalogError::OutputExists { .. })
        ));
        file.assert("previous");
        Ok(())
    }

    #[test]
    fn existing_file_with_force_is_overwritten() -> Result<()> {
        let dir = TempDir::new()?;
        let file = dir.child("out.csv");
        file.write_str("previous content")?;
        let target = OutputTarget::File(file.path().to_path_buf());

        target.check_writable(true)?;
        target.write_results(&results(), true, io::sink())?;
        file.assert("true");
        Ok(())
    }

    #[test]
    fn new_file_is_created() -> Result<()> {
        let dir = TempDir::new()?;
        let file = dir.child("out.csv");
        let target = OutputTarget::File(file.path().to_path_buf());

        target.check_writable(false)?;
        target.write_results(&results(), false, io::sink())?;
        file.assert("true");
        Ok(())
    }
}
