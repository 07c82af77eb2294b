//! Picks the articles shown under "related posts". Candidates are scored
//! against the source article by shared category and keywords; anything left
//! over after the scored candidates is filled with the most recent articles.

use std::cmp::Ordering;
use std::collections::HashSet;

use crate::document::ContentDocument;
use crate::error::{Error, Result};

/// The default score for sharing the source's category.
pub const DEFAULT_CATEGORY_WEIGHT: u32 = 100;

/// The default score for each keyword shared with the source.
pub const DEFAULT_KEYWORD_WEIGHT: u32 = 10;

/// The relative importance of the similarity signals.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Weights {
    /// Added once when a candidate's category equals the source's.
    pub category: u32,

    /// Added for each distinct keyword a candidate shares with the source.
    pub keyword: u32,
}

impl Default for Weights {
    fn default() -> Self {
        Weights {
            category: DEFAULT_CATEGORY_WEIGHT,
            keyword: DEFAULT_KEYWORD_WEIGHT,
        }
    }
}

impl Weights {
    /// Constructs validated weights. Both must be positive, and the category
    /// weight must exceed the keyword weight so that a category match stays
    /// the dominant signal.
    pub fn new(category: u32, keyword: u32) -> Result<Weights> {
        Weights { category, keyword }.validate()
    }

    /// Returns `self` if it satisfies the constraints in [`Weights::new`].
    pub fn validate(self) -> Result<Weights> {
        if self.keyword == 0 || self.category == 0 {
            return Err(Error::InvalidArgument(format!(
                "weights must be positive (category = {}, keyword = {})",
                self.category, self.keyword
            )));
        }
        if self.category <= self.keyword {
            return Err(Error::InvalidArgument(format!(
                "category weight ({}) must exceed keyword weight ({})",
                self.category, self.keyword
            )));
        }
        Ok(self)
    }
}

/// Converts a signed limit (e.g., from user input) into a `usize`, rejecting
/// negative values.
pub fn checked_limit(limit: i64) -> Result<usize> {
    usize::try_from(limit).map_err(|_| {
        Error::InvalidArgument(format!("limit must not be negative; got {}", limit))
    })
}

/// Ranks candidates by similarity to a source document.
#[derive(Clone, Copy, Debug, Default)]
pub struct Selector {
    weights: Weights,
}

struct Scored<'a> {
    document: &'a ContentDocument,
    score: u32,

    /// Days between the candidate's and the source's publication dates.
    distance: i64,
}

impl Selector {
    pub fn new(weights: Weights) -> Selector {
        Selector { weights }
    }

    /// Scores `candidate` against `source`. Category and keyword comparisons
    /// are exact and case-sensitive.
    pub fn score(&self, source: &ContentDocument, candidate: &ContentDocument) -> u32 {
        let category = match source.metadata.category == candidate.metadata.category {
            true => self.weights.category,
            false => 0,
        };
        let source_keywords: HashSet<&str> =
            source.metadata.keywords.iter().map(String::as_str).collect();
        let shared = candidate
            .metadata
            .keywords
            .iter()
            .map(String::as_str)
            .collect::<HashSet<&str>>()
            .intersection(&source_keywords)
            .count() as u32;
        category.saturating_add(self.weights.keyword.saturating_mul(shared))
    }

    /// Returns up to `limit` documents from `candidates` most related to
    /// `source`, most related first. `source` itself (by identifier) is never
    /// included, and a candidate identifier appearing more than once is only
    /// considered once.
    ///
    /// Candidates are ordered by score (descending), then by how close their
    /// publication date is to the source's, then by publication date
    /// (descending), then by identifier. If fewer than `limit` candidates
    /// score above zero, the rest of the result is filled with the remaining
    /// candidates, most recent first.
    pub fn recommend<'a, I>(
        &self,
        source: &ContentDocument,
        candidates: I,
        limit: usize,
    ) -> Vec<&'a ContentDocument>
    where
        I: IntoIterator<Item = &'a ContentDocument>,
    {
        if limit == 0 {
            return Vec::new();
        }

        let mut seen: HashSet<&str> = HashSet::new();
        seen.insert(source.identifier.as_str());
        let (mut related, mut backfill): (Vec<Scored>, Vec<Scored>) = candidates
            .into_iter()
            .filter(|&candidate| seen.insert(candidate.identifier.as_str()))
            .map(|candidate| Scored {
                document: candidate,
                score: self.score(source, candidate),
                distance: candidate
                    .published_date()
                    .signed_duration_since(source.published_date())
                    .num_days()
                    .abs(),
            })
            .partition(|scored| scored.score > 0);

        related.sort_by(|a, b| {
            b.score
                .cmp(&a.score)
                .then(a.distance.cmp(&b.distance))
                .then_with(|| newest_first(a.document, b.document))
        });
        backfill.sort_by(|a, b| newest_first(a.document, b.document));

        related
            .into_iter()
            .chain(backfill)
            .take(limit)
            .map(|scored| scored.document)
            .collect()
    }
}

fn newest_first(a: &ContentDocument, b: &ContentDocument) -> Ordering {
    b.published_date()
        .cmp(&a.published_date())
        .then_with(|| a.identifier.cmp(&b.identifier))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::document::test::document;

    fn identifiers(documents: &[&ContentDocument]) -> Vec<String> {
        documents.iter().map(|d| d.identifier.clone()).collect()
    }

    fn scenario() -> (ContentDocument, ContentDocument, ContentDocument) {
        (
            document("a", "Engineering", "2023-05-01", &["go", "concurrency"]),
            document("b", "Engineering", "2022-01-01", &["rust"]),
            document("c", "Culture", "2023-04-01", &[]),
        )
    }

    #[test]
    fn test_category_match_then_backfill() {
        let (a, b, c) = scenario();
        let related = Selector::default().recommend(&a, [&b, &c], 2);
        assert_eq!(vec!["b", "c"], identifiers(&related));
    }

    #[test]
    fn test_no_candidates() {
        let (a, _, _) = scenario();
        assert!(Selector::default().recommend(&a, Vec::<&ContentDocument>::new(), 3).is_empty());
    }

    #[test]
    fn test_zero_limit() {
        let (a, b, c) = scenario();
        assert!(Selector::default().recommend(&a, [&b, &c], 0).is_empty());
    }

    #[test]
    fn test_source_is_excluded() {
        let (a, b, c) = scenario();
        let related = Selector::default().recommend(&a, [&a, &b, &a, &c], 5);
        assert_eq!(vec!["b", "c"], identifiers(&related));
    }

    #[test]
    fn test_duplicates_considered_once() {
        let (a, b, c) = scenario();
        let related = Selector::default().recommend(&a, [&b, &b, &c], 5);
        assert_eq!(vec!["b", "c"], identifiers(&related));
    }

    #[test]
    fn test_keywords_break_category_ties() {
        let a = document("a", "Engineering", "2023-05-01", &["go", "concurrency"]);
        let one = document("one", "Engineering", "2020-01-01", &["go"]);
        let two = document("two", "Engineering", "2019-01-01", &["concurrency", "go"]);
        let none = document("none", "Engineering", "2023-05-01", &[]);
        let related = Selector::default().recommend(&a, [&none, &one, &two], 3);
        assert_eq!(vec!["two", "one", "none"], identifiers(&related));
    }

    #[test]
    fn test_category_dominates_keywords() {
        let a = document("a", "Engineering", "2023-05-01", &["go", "rust"]);
        let same_category = document("same", "Engineering", "2020-01-01", &[]);
        let shared_keywords = document("keywords", "Culture", "2023-05-01", &["go", "rust"]);
        let related = Selector::default().recommend(&a, [&shared_keywords, &same_category], 2);
        assert_eq!(vec!["same", "keywords"], identifiers(&related));
    }

    #[test]
    fn test_keywords_are_case_sensitive() {
        let a = document("a", "Engineering", "2023-05-01", &["Rust"]);
        let b = document("b", "engineering", "2023-05-01", &["rust"]);
        assert_eq!(0, Selector::default().score(&a, &b));
    }

    #[test]
    fn test_date_proximity_breaks_score_ties() {
        let a = document("a", "Engineering", "2021-06-01", &[]);
        let near = document("near", "Engineering", "2021-05-01", &[]);
        let far = document("far", "Engineering", "2023-01-01", &[]);
        let related = Selector::default().recommend(&a, [&far, &near], 2);
        assert_eq!(vec!["near", "far"], identifiers(&related));
    }

    #[test]
    fn test_identifier_breaks_full_ties() {
        let a = document("a", "Engineering", "2021-06-01", &[]);
        let y = document("y", "Culture", "2021-01-01", &[]);
        let x = document("x", "Culture", "2021-01-01", &[]);
        let related = Selector::default().recommend(&a, [&y, &x], 2);
        assert_eq!(vec!["x", "y"], identifiers(&related));
    }

    #[test]
    fn test_backfill_is_most_recent_first() {
        let a = document("a", "Engineering", "2021-06-01", &[]);
        let old = document("old", "Culture", "2019-01-01", &[]);
        let new = document("new", "Culture", "2022-01-01", &[]);
        let mid = document("mid", "Design", "2020-01-01", &[]);
        let related = Selector::default().recommend(&a, [&old, &new, &mid], 2);
        assert_eq!(vec!["new", "mid"], identifiers(&related));
    }

    #[test]
    fn test_deterministic() {
        let (a, b, c) = scenario();
        let d = document("d", "Engineering", "2022-01-01", &["go"]);
        let selector = Selector::default();
        assert_eq!(
            identifiers(&selector.recommend(&a, [&b, &c, &d], 3)),
            identifiers(&selector.recommend(&a, [&b, &c, &d], 3)),
        );
    }

    #[test]
    fn test_custom_weights() -> Result<()> {
        let a = document("a", "Engineering", "2023-05-01", &["go", "rust", "wasm"]);
        let category = document("category", "Engineering", "2023-05-01", &[]);
        let keywords = document("keywords", "Culture", "2023-05-01", &["go", "rust", "wasm"]);
        let related = Selector::new(Weights::new(20, 10)?).recommend(&a, [&category, &keywords], 2);
        assert_eq!(vec!["keywords", "category"], identifiers(&related));
        Ok(())
    }

    #[test]
    fn test_invalid_weights() {
        assert!(matches!(Weights::new(10, 10), Err(Error::InvalidArgument(_))));
        assert!(matches!(Weights::new(10, 0), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn test_checked_limit() -> Result<()> {
        assert_eq!(3, checked_limit(3)?);
        assert_eq!(0, checked_limit(0)?);
        assert!(matches!(checked_limit(-1), Err(Error::InvalidArgument(_))));
        Ok(())
    }
}
