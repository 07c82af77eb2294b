use std::error::Error as StdError;
use std::fs;
use std::path::Path;

use folio::markdown::Compiler;
use folio::{sort_by_date, Cache, ContentDocument, Direction, Error, Loader, Selector};
use tempfile::TempDir;
use url::Url;

type TestResult = Result<(), Box<dyn StdError>>;

fn write_article(
    root: &Path,
    name: &str,
    category: &str,
    date: &str,
    keywords: &str,
    body: &str,
) -> std::io::Result<()> {
    let dir = root.join(name);
    fs::create_dir_all(&dir)?;
    fs::write(
        dir.join("index.mdx"),
        format!(
            "---\ntitle: {name}\ndescription: About {name}\ncategory: {category}\ndate: {date}\nkeywords: {keywords}\n---\n{body}",
            name = name,
            category = category,
            date = date,
            keywords = keywords,
            body = body,
        ),
    )
}

/// A (Engineering, [go, concurrency]), B (Engineering, [rust]) and
/// C (Culture, []).
fn repository() -> std::io::Result<TempDir> {
    let dir = TempDir::new()?;
    write_article(
        dir.path(),
        "a",
        "Engineering",
        "2023-05-01",
        "[go, concurrency]",
        "Read [b](../b/index.mdx) next.\n\n![chart](./chart.svg)\n",
    )?;
    fs::write(dir.path().join("a/chart.svg"), "<svg/>")?;
    write_article(dir.path(), "b", "Engineering", "2022-01-01", "[rust]", "B\n")?;
    write_article(dir.path(), "c", "Culture", "2023-04-01", "[]", "C\n")?;
    Ok(dir)
}

fn identifiers(documents: &[&ContentDocument]) -> Vec<String> {
    documents.iter().map(|d| d.identifier.clone()).collect()
}

#[test]
fn related_articles_prefer_category_then_backfill() -> TestResult {
    let dir = repository()?;
    let loader = Loader::new(dir.path());
    let a = loader.document("a")?;
    let b = loader.document("b")?;
    let c = loader.document("c")?;

    let related = Selector::default().recommend(&a, [&*b, &*c], 2);
    assert_eq!(vec!["b", "c"], identifiers(&related));

    assert!(Selector::default()
        .recommend(&a, Vec::<&ContentDocument>::new(), 3)
        .is_empty());
    assert!(Selector::default().recommend(&a, [&*b, &*c], 0).is_empty());
    Ok(())
}

#[test]
fn recommendations_over_whole_repository() -> TestResult {
    let dir = repository()?;
    let documents = Loader::new(dir.path()).all_documents()?;
    let selector = Selector::default();
    for source in &documents {
        let related = selector.recommend(source, documents.iter().map(|d| &**d), 10);
        assert_eq!(documents.len() - 1, related.len());
        assert!(related.iter().all(|d| d.identifier != source.identifier));
        assert_eq!(
            identifiers(&related),
            identifiers(&selector.recommend(source, documents.iter().map(|d| &**d), 10)),
        );
    }
    Ok(())
}

#[test]
fn missing_document_is_not_found() -> TestResult {
    let dir = repository()?;
    match Loader::new(dir.path()).document("does-not-exist") {
        Err(Error::NotFound(identifier)) => assert_eq!("does-not-exist", identifier),
        Err(err) => return Err(err.into()),
        Ok(document) => panic!("found unexpected document `{}`", document.identifier),
    }
    Ok(())
}

#[test]
fn sorting_loaded_documents() -> TestResult {
    let dir = repository()?;
    let documents = Loader::new(dir.path()).all_documents()?;
    let sorted = sort_by_date(documents, Direction::Descending);
    let order: Vec<&str> = sorted.iter().map(|d| d.identifier.as_str()).collect();
    assert_eq!(vec!["a", "c", "b"], order);
    assert_eq!(sorted.clone(), sort_by_date(sorted, Direction::Descending));
    Ok(())
}

#[test]
fn lookup_through_cache_equals_bulk_load() -> TestResult {
    let dir = repository()?;
    let cache = Cache::new();
    let cached = Loader::with_cache(dir.path(), &cache);
    let uncached = Loader::new(dir.path());
    for document in uncached.all_documents()? {
        assert_eq!(*document, *cached.document(&document.identifier)?);
    }
    assert_eq!(3, cache.len());
    Ok(())
}

#[test]
fn compiled_body_resolves_links() -> TestResult {
    let dir = repository()?;
    let a = Loader::new(dir.path()).document("a")?;
    assert_eq!(vec![Path::new("chart.svg").to_owned()], a.assets);

    let articles_url = Url::parse("https://example.com/articles/")?;
    let html = a.compiled_body(&Compiler::new(&articles_url))?;
    assert!(html.contains(r#"href="https://example.com/articles/b""#), "{}", html);
    assert!(
        html.contains(r#"src="https://example.com/articles/a/chart.svg""#),
        "{}",
        html
    );
    Ok(())
}
