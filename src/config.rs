//! Loads the `folio.yaml` project file.

use crate::recommend::Weights;
use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use url::Url;

/// The name of the project file searched for by [`Config::from_directory`].
pub const PROJECT_FILE: &str = "folio.yaml";

#[derive(Deserialize)]
struct RelatedLimit(usize);
impl Default for RelatedLimit {
    fn default() -> Self {
        RelatedLimit(3)
    }
}

#[derive(Deserialize, Default)]
struct Recommendations {
    #[serde(default)]
    limit: RelatedLimit,

    #[serde(default)]
    category_weight: Option<u32>,

    #[serde(default)]
    keyword_weight: Option<u32>,
}

#[derive(Deserialize)]
struct Project {
    site_root: Url,

    #[serde(default = "default_content_directory")]
    content_directory: PathBuf,

    #[serde(default = "default_articles_path")]
    articles_path: String,

    #[serde(default)]
    recommendations: Recommendations,
}

fn default_content_directory() -> PathBuf {
    PathBuf::from("content")
}

fn default_articles_path() -> String {
    String::from("articles/")
}

/// Everything needed to load, compile, and relate a site's articles.
#[derive(Debug)]
pub struct Config {
    /// The directory holding one entry per article.
    pub content_directory: PathBuf,

    /// The URL under which article pages live. Always ends with `/`.
    pub articles_url: Url,

    pub weights: Weights,

    /// How many related articles to show per article.
    pub related_limit: usize,
}

impl Config {
    /// Searches `dir` and its ancestors for a `folio.yaml` and loads the
    /// first one found.
    pub fn from_directory(dir: &Path) -> Result<Config> {
        let path = dir.join(PROJECT_FILE);
        if path.exists() {
            match Config::from_project_file(&path) {
                Ok(config) => Ok(config),
                Err(e) => Err(anyhow!("Loading configuration: {:?}", e)),
            }
        } else {
            match dir.parent() {
                Some(parent) => Config::from_directory(parent),
                None => Err(anyhow!(
                    "Could not find `{}` in any parent directory",
                    PROJECT_FILE
                )),
            }
        }
    }

    /// Loads a project file. Relative paths inside it are resolved against
    /// the file's directory.
    pub fn from_project_file(path: &Path) -> Result<Config> {
        use crate::util::open;
        let project: Project = serde_yaml::from_reader(open(path, "project")?)?;
        match path.parent() {
            None => Err(anyhow!(
                "Can't get parent directory for provided project file path '{:?}'",
                path
            )),
            Some(project_root) => {
                let mut articles_path = project.articles_path;
                if !articles_path.ends_with('/') {
                    articles_path.push('/');
                }
                let defaults = Weights::default();
                let recommendations = project.recommendations;
                let weights = Weights::new(
                    recommendations.category_weight.unwrap_or(defaults.category),
                    recommendations.keyword_weight.unwrap_or(defaults.keyword),
                )?;
                Ok(Config {
                    content_directory: project_root.join(project.content_directory),
                    articles_url: project.site_root.join(&articles_path)?,
                    weights,
                    related_limit: recommendations.limit.0,
                })
            }
        }
    }
}
