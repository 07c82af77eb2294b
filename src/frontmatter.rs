//! Splits a content file into its YAML front-matter and its body, and parses
//! the front-matter into [`Metadata`].

use std::fmt;

use chrono::NaiveDate;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};

use crate::document::Metadata;

const FENCE: &str = "---";

/// The date format for the `date` key (e.g., `2021-04-16`).
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parses a content file into its [`Metadata`] and the (uncompiled) body that
/// follows the closing fence. Each file must be structured as follows:
///
/// 1. Initial frontmatter fence (`---`)
/// 2. YAML frontmatter with `title`, `description`, `category`, `date`, and
///    optionally `keywords`
/// 3. Terminal frontmatter fence (`---`) on its own line
/// 4. Body
///
/// For example:
///
/// ```md
/// ---
/// title: Hello, world!
/// description: A first post.
/// category: Culture
/// date: 2021-04-16
/// keywords: [greet]
/// ---
/// # Hello
///
/// World
/// ```
pub fn parse(input: &str) -> Result<(Metadata, &str)> {
    let (yaml, body) = split(input)?;
    let metadata: Metadata = serde_yaml::from_str(yaml)?;
    for (field, value) in [
        ("title", &metadata.title),
        ("description", &metadata.description),
        ("category", &metadata.category),
    ] {
        if value.trim().is_empty() {
            return Err(Error::BlankField(field));
        }
    }
    Ok((metadata, body))
}

fn split(input: &str) -> Result<(&str, &str)> {
    let input = input.trim_start_matches('\u{feff}');
    let rest = match input.split_once('\n') {
        Some((first, rest)) if is_fence(first) => rest,
        None if is_fence(input) => return Err(Error::MissingEndFence),
        _ => return Err(Error::MissingStartFence),
    };
    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if is_fence(line.trim_end_matches('\n')) {
            return Ok((&rest[..offset], &rest[offset + line.len()..]));
        }
        offset += line.len();
    }
    Err(Error::MissingEndFence)
}

/// A fence must be alone on its line.
fn is_fence(line: &str) -> bool {
    line.trim_end_matches('\r') == FENCE
}

/// Deserializes a `YYYY-MM-DD` string into a [`NaiveDate`].
pub(crate) fn deserialize_date<'de, D>(
    deserializer: D,
) -> std::result::Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).map_err(|e| {
        D::Error::custom(format!("invalid date `{}`: {}", s, e))
    })
}

/// Represents the result of a front-matter parse.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error parsing a file's front-matter.
#[derive(Debug)]
pub enum Error {
    /// Returned when a source file is missing its starting frontmatter fence
    /// (`---`).
    MissingStartFence,

    /// Returned when a source file is missing its terminal frontmatter fence
    /// (`---` i.e., the starting fence was found but the ending one was
    /// missing).
    MissingEndFence,

    /// Returned when there was an error parsing the frontmatter as YAML,
    /// including missing required keys and malformed dates.
    DeserializeYaml(serde_yaml::Error),

    /// Returned when a required string field is present but blank.
    BlankField(&'static str),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::MissingStartFence => {
                write!(f, "content must begin with `---`")
            }
            Error::MissingEndFence => write!(f, "missing closing `---`"),
            Error::DeserializeYaml(err) => err.fmt(f),
            Error::BlankField(field) => {
                write!(f, "required field `{}` is blank", field)
            }
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::DeserializeYaml(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_yaml::Error> for Error {
    /// Converts a [`serde_yaml::Error`] into an [`Error`]. It allows us to use
    /// the `?` operator for [`serde_yaml`] deserialization functions.
    fn from(err: serde_yaml::Error) -> Error {
        Error::DeserializeYaml(err)
    }
}
