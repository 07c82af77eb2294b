//! Defines the crate-level [`Error`] returned by loading and recommendation
//! operations.

use std::fmt;
use std::path::PathBuf;

use crate::{frontmatter, markdown};

/// The result of a fallible content operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error loading, compiling, or selecting content.
#[derive(Debug)]
pub enum Error {
    /// Returned when a content file's front-matter is malformed or
    /// incomplete.
    ContentParse {
        path: PathBuf,
        err: frontmatter::Error,
    },

    /// Returned when no document maps to the requested identifier.
    NotFound(String),

    /// Returned when a caller violates a precondition (e.g., a negative
    /// limit).
    InvalidArgument(String),

    /// Returned when two entries in the content directory map to the same
    /// identifier.
    DuplicateIdentifier {
        identifier: String,
        first: PathBuf,
        second: PathBuf,
    },

    /// Returned when an entry's name isn't valid UTF-8 or doesn't produce a
    /// usable slug.
    InvalidFileName(PathBuf),

    /// Returned when a document's body can't be compiled.
    Compile {
        identifier: String,
        err: markdown::Error,
    },

    /// Returned for I/O problems while reading a content file.
    Read { path: PathBuf, err: std::io::Error },

    /// Returned for WalkDir I/O errors.
    WalkDir(walkdir::Error),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::ContentParse { path, err } => {
                write!(f, "parsing `{}`: {}", path.display(), err)
            }
            Error::NotFound(identifier) => {
                write!(f, "no document with identifier `{}`", identifier)
            }
            Error::InvalidArgument(msg) => {
                write!(f, "invalid argument: {}", msg)
            }
            Error::DuplicateIdentifier {
                identifier,
                first,
                second,
            } => write!(
                f,
                "`{}` and `{}` both map to identifier `{}`",
                first.display(),
                second.display(),
                identifier
            ),
            Error::InvalidFileName(path) => {
                write!(f, "invalid file name: {:?}", path)
            }
            Error::Compile { identifier, err } => {
                write!(f, "compiling `{}`: {}", identifier, err)
            }
            Error::Read { path, err } => {
                write!(f, "reading `{}`: {}", path.display(), err)
            }
            Error::WalkDir(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::ContentParse { path: _, err } => Some(err),
            Error::NotFound(_) => None,
            Error::InvalidArgument(_) => None,
            Error::DuplicateIdentifier { .. } => None,
            Error::InvalidFileName(_) => None,
            Error::Compile { identifier: _, err } => Some(err),
            Error::Read { path: _, err } => Some(err),
            Error::WalkDir(err) => Some(err),
        }
    }
}

impl From<walkdir::Error> for Error {
    /// Converts a [`walkdir::Error`] into an [`Error`]. It allows us to
    /// use the `?` operator for directory traversal.
    fn from(err: walkdir::Error) -> Error {
        Error::WalkDir(err)
    }
}
