use std::borrow::Cow;

use url::{ParseError, Url};

const MARKUP_EXTENSIONS: [&str; 2] = [".md", ".mdx"];

/// Rewrites URLs found in an article body. Links to other articles' source
/// files become links to their pages (`{articles_root}{identifier}`);
/// relative links to assets become absolute; everything else is normalized.
pub struct Converter<'a> {
    articles_root: &'a Url,
    base: Url,
}

impl<'a> Converter<'a> {
    /// Constructs a new `Converter`
    ///
    /// # Arguments
    ///
    /// * `articles_root` - the URL prefix for articles. It must end with a
    ///   trailing slash.
    /// * `base` - the relative path from `articles_root` from which target
    ///   URLs will be converted (e.g., `hello/index.md`).
    pub fn new(articles_root: &'a Url, base: &str) -> Result<Converter<'a>> {
        Ok(Converter {
            articles_root,
            base: articles_root.join(base)?,
        })
    }

    /// Returns the article name for a root-relative path to an article
    /// source file (`foo.md` or `foo/index.md`), or `None` if the path
    /// points at anything else.
    fn parse_article_base(relative: &str) -> Option<&str> {
        for ext in MARKUP_EXTENSIONS {
            if let Some(base) = relative.strip_suffix(&format!("/index{}", ext)) {
                return match base.contains('/') {
                    true => None,
                    false => Some(base),
                };
            }
        }
        for ext in MARKUP_EXTENSIONS {
            if let Some(base) = relative.strip_suffix(ext) {
                return match base.contains('/') || base.is_empty() {
                    true => None,
                    false => Some(base),
                };
            }
        }
        None
    }

    fn convert_absolute(&self, absolute: Url) -> Result<Url> {
        let mut bare = absolute.clone();
        bare.set_fragment(None);
        bare.set_query(None);
        if let Some(relative) = self.articles_root.make_relative(&bare) {
            if !relative.starts_with("../") {
                if let Some(base) = Self::parse_article_base(&relative) {
                    // Identifiers are slugs of the decoded folder or file
                    // name, and `make_relative` leaves the path encoded.
                    let name = urlencoding::decode(base).unwrap_or(Cow::Borrowed(base));
                    let mut page = self.articles_root.join(&slug::slugify(name))?;
                    page.set_fragment(absolute.fragment());
                    return Ok(page);
                }
            }
        }
        Ok(absolute)
    }

    fn convert_unknown(&self, url: &str) -> Result<Url> {
        match Url::parse(url) {
            Ok(absolute) => self.convert_absolute(absolute),
            Err(ParseError::RelativeUrlWithoutBase) => {
                self.convert_absolute(self.base.join(url)?)
            }
            Err(e) => Err(e),
        }
    }

    pub fn convert(&self, url: &str) -> Result<String> {
        Ok(self.convert_unknown(url)?.to_string())
    }
}

type Result<T> = std::result::Result<T, ParseError>;
