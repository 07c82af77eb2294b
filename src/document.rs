//! Defines the [`ContentDocument`] type along with its [`Metadata`], lazily
//! compiled [`Body`], and the [`sort_by_date`] ordering used by index views.

use std::borrow::{Borrow, Cow};
use std::path::PathBuf;
use std::sync::OnceLock;

use chrono::NaiveDate;
use serde::Deserialize;
use url::Url;

use crate::markdown::{self, Compiler};
use crate::thumbnail::Thumbnail;

/// Represents one article.
#[derive(Clone, Debug, PartialEq)]
pub struct ContentDocument {
    /// The article's slug. It's derived from the article's folder (or file)
    /// name and is unique across a content repository.
    pub identifier: String,

    /// The article's front-matter.
    pub metadata: Metadata,

    /// Whether the article is a bundle (`{name}/index.md`) or a single file
    /// (`{name}.md`).
    pub kind: SourceKind,

    /// The path of the markup file the article was parsed from.
    pub source_path: PathBuf,

    /// Files co-located with a bundle's index document, relative to the
    /// bundle directory and sorted. Always empty for single-file articles.
    pub assets: Vec<PathBuf>,

    /// The article's body.
    pub body: Body,

    /// The article's decorative thumbnail.
    pub thumbnail: Thumbnail,
}

impl ContentDocument {
    /// Returns the body compiled to HTML. Links are resolved relative to the
    /// article's location under the compiler's articles URL.
    ///
    /// The HTML for the first articles URL the body is compiled against is
    /// kept and borrowed on later calls with that URL. Any other URL compiles
    /// afresh on every call.
    pub fn compiled_body(
        &self,
        compiler: &Compiler,
    ) -> Result<Cow<'_, str>, markdown::Error> {
        self.body.compiled(compiler.articles_url(), || {
            compiler.compile(&self.kind.link_base(&self.identifier), &self.body.source)
        })
    }

    /// Returns the article's publication date.
    pub fn published_date(&self) -> NaiveDate {
        self.metadata.published_date
    }
}

/// The front-matter of a [`ContentDocument`].
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Metadata {
    pub title: String,

    pub description: String,

    /// Compared by exact, case-sensitive equality when picking related
    /// articles.
    pub category: String,

    #[serde(
        rename = "date",
        alias = "publishedDate",
        alias = "published_date",
        deserialize_with = "crate::frontmatter::deserialize_date"
    )]
    pub published_date: NaiveDate,

    /// Compared by exact, case-sensitive equality when picking related
    /// articles. Order is preserved from the source file.
    #[serde(default)]
    pub keywords: Vec<String>,
}

/// The layout of an article on disk.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SourceKind {
    /// A directory containing an `index.md` (or `index.mdx`) plus assets.
    Bundle,

    /// A lone `{name}.md` (or `{name}.mdx`) file.
    File,
}

impl SourceKind {
    /// The path, relative to the articles URL, against which the body's
    /// relative links are resolved.
    fn link_base(self, identifier: &str) -> String {
        match self {
            SourceKind::Bundle => format!("{}/index.md", identifier),
            SourceKind::File => format!("{}.md", identifier),
        }
    }
}

/// The authored markup of an article plus its compiled HTML, which is only
/// produced on demand.
#[derive(Clone, Debug, Default)]
pub struct Body {
    source: String,
    compiled: OnceLock<Compiled>,
}

#[derive(Clone, Debug)]
struct Compiled {
    articles_url: Url,
    html: String,
}

impl Body {
    pub fn new(source: String) -> Body {
        Body {
            source,
            compiled: OnceLock::new(),
        }
    }

    /// The uncompiled markup.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn is_compiled(&self) -> bool {
        self.compiled.get().is_some()
    }

    fn compiled<F, E>(&self, articles_url: &Url, compile: F) -> Result<Cow<'_, str>, E>
    where
        F: FnOnce() -> Result<String, E>,
    {
        if let Some(memo) = self.compiled.get() {
            return match memo.articles_url == *articles_url {
                true => Ok(Cow::Borrowed(memo.html.as_str())),
                false => compile().map(Cow::Owned),
            };
        }
        let fresh = Compiled {
            articles_url: articles_url.clone(),
            html: compile()?,
        };
        match self.compiled.set(fresh) {
            Ok(()) => Ok(self.memoized(articles_url).unwrap_or_default()),
            // another thread stored its HTML first
            Err(rejected) => Ok(self
                .memoized(articles_url)
                .unwrap_or(Cow::Owned(rejected.html))),
        }
    }

    fn memoized(&self, articles_url: &Url) -> Option<Cow<'_, str>> {
        self.compiled
            .get()
            .filter(|memo| memo.articles_url == *articles_url)
            .map(|memo| Cow::Borrowed(memo.html.as_str()))
    }
}

impl PartialEq for Body {
    /// Two bodies are equal when their markup is equal, whether or not either
    /// has been compiled yet.
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

/// The order in which [`sort_by_date`] arranges documents.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Direction {
    /// Most recent first.
    #[default]
    Descending,

    /// Oldest first.
    Ascending,
}

/// Sorts documents by publication date. The sort is stable: documents with
/// the same date keep their relative order.
pub fn sort_by_date<D>(mut documents: Vec<D>, direction: Direction) -> Vec<D>
where
    D: Borrow<ContentDocument>,
{
    documents.sort_by(|a, b| {
        let (a, b) = (a.borrow().published_date(), b.borrow().published_date());
        match direction {
            Direction::Descending => b.cmp(&a),
            Direction::Ascending => a.cmp(&b),
        }
    });
    documents
}

#[cfg(test)]
pub(crate) mod test {
    use super::*;

    /// Builds an in-memory document for tests.
    pub(crate) fn document(
        identifier: &str,
        category: &str,
        date: &str,
        keywords: &[&str],
    ) -> ContentDocument {
        ContentDocument {
            identifier: identifier.to_owned(),
            metadata: Metadata {
                title: identifier.to_uppercase(),
                description: format!("About {}", identifier),
                category: category.to_owned(),
                published_date: NaiveDate::parse_from_str(
                    date,
                    crate::frontmatter::DATE_FORMAT,
                )
                .unwrap(),
                keywords: keywords.iter().map(|k| (*k).to_owned()).collect(),
            },
            kind: SourceKind::File,
            source_path: PathBuf::from(format!("{}.md", identifier)),
            assets: Vec::new(),
            body: Body::new(format!("# {}\n", identifier)),
            thumbnail: Thumbnail::generate(identifier, category),
        }
    }

    fn identifiers(documents: &[&ContentDocument]) -> Vec<String> {
        documents.iter().map(|d| d.identifier.clone()).collect()
    }

    #[test]
    fn test_sort_descending_is_stable() {
        let (a, b, c, d) = (
            document("a", "Culture", "2021-01-01", &[]),
            document("b", "Culture", "2022-01-01", &[]),
            document("c", "Culture", "2021-01-01", &[]),
            document("d", "Culture", "2020-06-01", &[]),
        );
        let sorted = sort_by_date(vec![&a, &b, &c, &d], Direction::Descending);
        assert_eq!(vec!["b", "a", "c", "d"], identifiers(&sorted));

        // Swapping the tied inputs swaps them in the output.
        let sorted = sort_by_date(vec![&c, &b, &a, &d], Direction::Descending);
        assert_eq!(vec!["b", "c", "a", "d"], identifiers(&sorted));
    }

    #[test]
    fn test_sort_ascending() {
        let (a, b, c) = (
            document("a", "Culture", "2021-01-01", &[]),
            document("b", "Culture", "2019-01-01", &[]),
            document("c", "Culture", "2021-01-01", &[]),
        );
        let sorted = sort_by_date(vec![&a, &b, &c], Direction::Ascending);
        assert_eq!(vec!["b", "a", "c"], identifiers(&sorted));
    }

    #[test]
    fn test_sort_is_idempotent() {
        let docs = vec![
            document("a", "Culture", "2021-01-01", &[]),
            document("b", "Culture", "2023-01-01", &[]),
            document("c", "Culture", "2021-01-01", &[]),
        ];
        let once = sort_by_date(docs, Direction::default());
        let twice = sort_by_date(once.clone(), Direction::default());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_body_equality_ignores_compilation() -> Result<(), markdown::Error> {
        let url = url::Url::parse("https://example.com/articles/")?;
        let compiler = Compiler::new(&url);
        let compiled = document("a", "Culture", "2021-01-01", &[]);
        let pristine = compiled.clone();
        compiled.compiled_body(&compiler)?;
        assert!(compiled.body.is_compiled());
        assert!(!pristine.body.is_compiled());
        assert_eq!(pristine, compiled);
        Ok(())
    }

    #[test]
    fn test_compiled_body_is_memoized() -> Result<(), markdown::Error> {
        let url = url::Url::parse("https://example.com/articles/")?;
        let compiler = Compiler::new(&url);
        let doc = document("a", "Culture", "2021-01-01", &[]);
        let first = doc.compiled_body(&compiler)?.as_ptr();
        let second = doc.compiled_body(&compiler)?.as_ptr();
        assert_eq!(first, second);
        assert_eq!("<h1>a</h1>\n", doc.compiled_body(&compiler)?);
        Ok(())
    }

    #[test]
    fn test_compiled_body_follows_articles_url() -> Result<(), markdown::Error> {
        let one = url::Url::parse("https://one.org/articles/")?;
        let two = url::Url::parse("https://two.org/posts/")?;
        let mut doc = document("a", "Culture", "2021-01-01", &[]);
        doc.kind = SourceKind::Bundle;
        doc.body = Body::new("![x](./x.png)\n".to_owned());

        let first = doc.compiled_body(&Compiler::new(&one))?;
        assert!(first.contains(r#"src="https://one.org/articles/a/x.png""#), "{}", first);

        let second = doc.compiled_body(&Compiler::new(&two))?;
        assert!(second.contains(r#"src="https://two.org/posts/a/x.png""#), "{}", second);
        assert!(matches!(second, Cow::Owned(_)));

        let again = doc.compiled_body(&Compiler::new(&one))?;
        assert!(matches!(again, Cow::Borrowed(_)));
        assert_eq!(first, again);
        Ok(())
    }
}
