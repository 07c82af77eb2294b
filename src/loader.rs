//! Defines the [`Loader`], which turns a content directory into
//! [`ContentDocument`]s. Loading only reads and parses front-matter; bodies
//! are compiled on demand (see [`ContentDocument::compiled_body`]).

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};

use crate::cache::Cache;
use crate::document::{Body, ContentDocument, SourceKind};
use crate::error::{Error, Result};
use crate::frontmatter;
use crate::thumbnail::Thumbnail;

const MARKUP_EXTENSIONS: [&str; 2] = ["md", "mdx"];
const INDEX_FILES: [&str; 2] = ["index.md", "index.mdx"];

/// Loads [`ContentDocument`]s from a content directory. Each entry in the
/// directory is either a bundle (`{name}/index.md` plus co-located assets)
/// or a single file (`{name}.md`); `.mdx` works in place of `.md` for
/// either. The document's identifier is the slugified `{name}`.
pub struct Loader<'a> {
    /// `content_directory` is the directory that holds one entry per
    /// article.
    content_directory: &'a Path,

    /// `cache` is consulted before parsing a document and populated after.
    cache: Option<&'a Cache>,
}

/// A discovered-but-unparsed article.
#[derive(Debug)]
struct Entry {
    identifier: String,
    kind: SourceKind,

    /// The bundle directory or the single file.
    root: PathBuf,

    /// The markup file.
    source_path: PathBuf,
}

impl<'a> Loader<'a> {
    /// Constructs a loader that reads from disk on every call.
    pub fn new(content_directory: &'a Path) -> Loader<'a> {
        Loader {
            content_directory,
            cache: None,
        }
    }

    /// Constructs a loader that reads through `cache`.
    pub fn with_cache(content_directory: &'a Path, cache: &'a Cache) -> Loader<'a> {
        Loader {
            content_directory,
            cache: Some(cache),
        }
    }

    /// Returns every document in the content directory in discovery order
    /// (entries sorted by file name). The whole batch fails on the first
    /// document that can't be read or parsed; the error names the file.
    pub fn all_documents(&self) -> Result<Vec<Arc<ContentDocument>>> {
        let entries = self.discover()?;
        let documents = entries
            .iter()
            .map(|entry| self.load(entry))
            .collect::<Result<Vec<_>>>()?;
        info!(
            "loaded {} documents from `{}`",
            documents.len(),
            self.content_directory.display()
        );
        Ok(documents)
    }

    /// Returns the document whose identifier is `identifier`, or
    /// [`Error::NotFound`]. Other entries in the content directory are never
    /// parsed, and entries whose names yield no identifier are skipped.
    pub fn document(&self, identifier: &str) -> Result<Arc<ContentDocument>> {
        if let Some(document) = self.cache.and_then(|c| c.get(identifier)) {
            return Ok(document);
        }
        match self.find(identifier)? {
            Some(entry) => self.load(&entry),
            None => Err(Error::NotFound(identifier.to_owned())),
        }
    }

    fn load(&self, entry: &Entry) -> Result<Arc<ContentDocument>> {
        match self.cache {
            Some(cache) => {
                cache.get_or_try_insert_with(&entry.identifier, || self.parse(entry))
            }
            None => self.parse(entry).map(Arc::new),
        }
    }

    fn parse(&self, entry: &Entry) -> Result<ContentDocument> {
        debug!("parsing `{}`", entry.source_path.display());
        let contents = std::fs::read_to_string(&entry.source_path).map_err(|err| {
            Error::Read {
                path: entry.source_path.clone(),
                err,
            }
        })?;
        let (metadata, body) =
            frontmatter::parse(&contents).map_err(|err| Error::ContentParse {
                path: entry.source_path.clone(),
                err,
            })?;

        // Only list assets once we know the document itself is valid.
        let assets = match entry.kind {
            SourceKind::Bundle => self.assets(entry)?,
            SourceKind::File => Vec::new(),
        };

        Ok(ContentDocument {
            thumbnail: Thumbnail::generate(&entry.identifier, &metadata.category),
            identifier: entry.identifier.clone(),
            metadata,
            kind: entry.kind,
            source_path: entry.source_path.clone(),
            assets,
            body: Body::new(body.to_owned()),
        })
    }

    fn assets(&self, entry: &Entry) -> Result<Vec<PathBuf>> {
        let mut assets = Vec::new();
        for result in WalkDir::new(&entry.root)
            .min_depth(1)
            .sort_by(|a, b| a.file_name().cmp(b.file_name()))
        {
            let asset = result?;
            if asset.file_type().is_file() && asset.path() != entry.source_path {
                assets.push(
                    asset
                        .path()
                        // strip_prefix shouldn't fail since `root` is always
                        // an ancestor of the walked paths
                        .strip_prefix(&entry.root)
                        .unwrap_or_else(|_| asset.path())
                        .to_owned(),
                );
            }
        }
        Ok(assets)
    }

    /// Classifies the content directory's entries in file name order,
    /// leaving out anything that isn't an article.
    fn scan(&self) -> impl Iterator<Item = Result<Entry>> + 'a {
        WalkDir::new(self.content_directory)
            .min_depth(1)
            .max_depth(1)
            .sort_by(|a, b| a.file_name().cmp(b.file_name()))
            .into_iter()
            .filter_map(|result| match result {
                Ok(dir_entry) => Self::classify(&dir_entry).transpose(),
                Err(err) => Some(Err(err.into())),
            })
    }

    /// Lists the articles in the content directory without parsing them.
    /// Any unusable or colliding name fails the whole listing.
    fn discover(&self) -> Result<Vec<Entry>> {
        let mut entries = Vec::new();
        let mut seen: HashMap<String, PathBuf> = HashMap::new();
        for entry in self.scan() {
            let entry = entry?;
            if let Some(first) = seen.get(&entry.identifier) {
                return Err(Error::DuplicateIdentifier {
                    identifier: entry.identifier,
                    first: first.clone(),
                    second: entry.root,
                });
            }
            debug!(
                "discovered `{}` at `{}`",
                entry.identifier,
                entry.root.display()
            );
            seen.insert(entry.identifier.clone(), entry.root.clone());
            entries.push(entry);
        }
        Ok(entries)
    }

    /// Finds the entry for `identifier`. Only a collision involving
    /// `identifier` itself is an error.
    fn find(&self, identifier: &str) -> Result<Option<Entry>> {
        let mut found: Option<Entry> = None;
        for entry in self.scan() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(Error::InvalidFileName(path)) => {
                    warn!("skipping `{}`: no identifier in its name", path.display());
                    continue;
                }
                Err(err) => return Err(err),
            };
            if entry.identifier != identifier {
                continue;
            }
            if let Some(first) = &found {
                return Err(Error::DuplicateIdentifier {
                    identifier: entry.identifier,
                    first: first.root.clone(),
                    second: entry.root,
                });
            }
            found = Some(entry);
        }
        Ok(found)
    }

    fn classify(dir_entry: &DirEntry) -> Result<Option<Entry>> {
        let path = dir_entry.path();
        if dir_entry.file_name().to_string_lossy().starts_with('.') {
            debug!("skipping `{}`", path.display());
            return Ok(None);
        }

        let (kind, name, source_path) = if dir_entry.file_type().is_dir() {
            match INDEX_FILES.iter().map(|f| path.join(f)).find(|p| p.is_file()) {
                Some(index) => (SourceKind::Bundle, path.file_name(), index),
                None => {
                    debug!("skipping `{}`", path.display());
                    return Ok(None);
                }
            }
        } else if Self::is_markup(path) {
            (SourceKind::File, path.file_stem(), path.to_owned())
        } else {
            debug!("skipping `{}`", path.display());
            return Ok(None);
        };

        let name = name
            .and_then(|n| n.to_str())
            .ok_or_else(|| Error::InvalidFileName(path.to_owned()))?;
        let identifier = slug::slugify(name);
        if identifier.is_empty() {
            return Err(Error::InvalidFileName(path.to_owned()));
        }
        Ok(Some(Entry {
            identifier,
            kind,
            root: path.to_owned(),
            source_path,
        }))
    }

    fn is_markup(path: &Path) -> bool {
        path.is_file()
            && path
                .extension()
                .and_then(|ext| ext.to_str())
                .map_or(false, |ext| MARKUP_EXTENSIONS.contains(&ext))
    }
}
