//! Compiles article markup into HTML. Embedded components (raw HTML such as
//! `<Callout>`) are passed through untouched for the renderer to handle.

use crate::url::Converter as LinkConverter;
use pulldown_cmark::{html, CowStr, Event, LinkType, Options, Parser, Tag};
use std::fmt;
use url::{ParseError as UrlParseError, Url};

/// Converts article markup into HTML.
pub struct Compiler<'a> {
    /// The URL prefix for articles (e.g., `https://example.org/articles/`).
    /// This should end in a trailing slash.
    articles_url: &'a Url,
}

impl<'a> Compiler<'a> {
    pub fn new(articles_url: &'a Url) -> Compiler<'a> {
        Compiler { articles_url }
    }

    pub fn articles_url(&self) -> &Url {
        self.articles_url
    }

    /// Compiles `markup` to HTML.
    ///
    /// * `base` is the path of the source file relative to the articles
    ///   root (e.g., `foo/index.md` for a bundle or `foo.md` for a single
    ///   file). Relative links and images are resolved against it.
    /// * `markup` is the body of the source file.
    pub fn compile(&self, base: &str, markup: &str) -> Result<String, Error> {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_FOOTNOTES);
        options.insert(Options::ENABLE_SMART_PUNCTUATION);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_TASKLISTS);

        let event_converter = EventConverter {
            link_converter: LinkConverter::new(self.articles_url, base)?,
        };
        let events = Parser::new_ext(markup, options)
            .map(|ev| event_converter.convert(ev))
            .collect::<Result<Vec<Event>, UrlParseError>>()?;

        let mut out = String::with_capacity(markup.len() * 3 / 2);
        html::push_html(&mut out, events.into_iter());
        Ok(out)
    }
}

struct EventConverter<'a> {
    link_converter: LinkConverter<'a>,
}

impl<'a> EventConverter<'a> {
    fn convert_url<'b>(&self, url: CowStr<'b>) -> Result<CowStr<'b>, UrlParseError> {
        Ok(CowStr::Boxed(
            self.link_converter.convert(&url)?.into_boxed_str(),
        ))
    }

    fn convert_tag<'b>(&self, tag: Tag<'b>) -> Result<Tag<'b>, UrlParseError> {
        Ok(match tag {
            // Links between articles are authored against the source tree
            // (`../other/index.md`) and need to point at the article's page
            // instead. Relative links to co-located assets need to be made
            // absolute since the article page isn't served from the bundle
            // directory.
            Tag::Link(LinkType::Email, url, title) => {
                Tag::Link(LinkType::Email, url, title)
            }
            Tag::Link(link, url, title) => {
                Tag::Link(link, self.convert_url(url)?, title)
            }
            Tag::Image(link, url, title) => {
                Tag::Image(link, self.convert_url(url)?, title)
            }
            _ => tag,
        })
    }

    fn convert<'b>(&self, ev: Event<'b>) -> Result<Event<'b>, UrlParseError> {
        Ok(match ev {
            Event::Start(tag) => Event::Start(self.convert_tag(tag)?),
            _ => ev,
        })
    }
}

/// Represents an error converting markup to HTML.
#[derive(Debug)]
pub enum Error {
    /// Returned when there is a problem parsing URLs.
    UrlParse(UrlParseError),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::UrlParse(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::UrlParse(err) => Some(err),
        }
    }
}

impl From<UrlParseError> for Error {
    /// Converts a [`url::ParseError`] into an [`Error`]. It allows us to use
    /// the `?` operator for URL parsing and joining functions.
    fn from(err: UrlParseError) -> Error {
        Error::UrlParse(err)
    }
}
