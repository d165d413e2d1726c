//! Aggregator integration tests

mod common;

use std::sync::Arc;
use std::time::{Duration, Instant};

use common::providers::{book, Script, ScriptedProvider};
use imbook_core::{BookResolver, DataSource, SearchAggregator};

const ISBN: &str = "9784101359137";

fn resolver_with(
    commerce: Arc<ScriptedProvider>,
    registry: Arc<ScriptedProvider>,
    index: Arc<ScriptedProvider>,
) -> Arc<BookResolver> {
    Arc::new(
        BookResolver::builder()
            .commerce(commerce)
            .registry(registry)
            .generic_index(index)
            .timeout(Duration::from_secs(2))
            .build()
            .unwrap(),
    )
}

#[tokio::test]
async fn test_keyword_merges_both_sides_resolver_first() {
    let commerce = ScriptedProvider::new("commerce", DataSource::Commerce)
        .on_keyword(Script::Records(vec![
            book("Kitchen", "Banana Yoshimoto", Some(ISBN), DataSource::Commerce),
        ]))
        .shared();
    let index = ScriptedProvider::new("generic_index", DataSource::GenericIndex)
        .on_keyword(Script::Records(vec![
            book("Kitchen (Bunko)", "Yoshimoto", Some(ISBN), DataSource::GenericIndex),
            book("Goodbye Tsugumi", "Banana Yoshimoto", None, DataSource::GenericIndex),
        ]))
        .shared();
    let registry = ScriptedProvider::new("registry", DataSource::Registry).shared();

    let aggregator = SearchAggregator::new(resolver_with(commerce.clone(), registry, index.clone()));
    let records = aggregator.search("banana").await;

    let sources: Vec<DataSource> = records.iter().map(|r| r.data_source).collect();
    assert_eq!(sources, vec![DataSource::Commerce, DataSource::GenericIndex]);
    assert_eq!(records[1].title, "Goodbye Tsugumi");

    // resolver short-circuits on commerce, the aggregator still asks the index
    assert_eq!(commerce.keyword_calls(), 1);
    assert_eq!(index.keyword_calls(), 1);
}

#[tokio::test]
async fn test_isbn_text_takes_isbn_paths() {
    let commerce = ScriptedProvider::new("commerce", DataSource::Commerce).shared();
    let registry = ScriptedProvider::new("registry", DataSource::Registry)
        .on_isbn(Script::Records(vec![book("Kitchen", "Yoshimoto", Some(ISBN), DataSource::Registry)]))
        .shared();
    let index = ScriptedProvider::new("generic_index", DataSource::GenericIndex)
        .on_isbn(Script::Records(vec![book("Kitchen", "Yoshimoto", Some(ISBN), DataSource::GenericIndex)]))
        .shared();

    let aggregator = SearchAggregator::new(resolver_with(commerce.clone(), registry.clone(), index.clone()));
    let records = aggregator.search("978-4-10-135913-7").await;

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].data_source, DataSource::Registry);
    assert_eq!(commerce.keyword_calls() + registry.keyword_calls() + index.keyword_calls(), 0);
    assert_eq!(index.last_isbn().as_deref(), Some(ISBN));
}

#[tokio::test]
async fn test_failing_side_contributes_nothing() {
    let commerce = ScriptedProvider::new("commerce", DataSource::Commerce)
        .on_keyword(Script::Fail)
        .shared();
    let registry = ScriptedProvider::new("registry", DataSource::Registry).shared();
    let resolver_index = ScriptedProvider::new("generic_index", DataSource::GenericIndex)
        .on_keyword(Script::Fail)
        .shared();
    let extra_index = ScriptedProvider::new("secondary_index", DataSource::GenericIndex)
        .on_keyword(Script::Records(vec![book("Kitchen", "Yoshimoto", None, DataSource::GenericIndex)]))
        .shared();

    let aggregator = SearchAggregator::with_index(
        resolver_with(commerce, registry, resolver_index),
        extra_index.clone(),
    );
    let records = aggregator.search("kitchen").await;

    assert_eq!(records.len(), 1);
    assert_eq!(extra_index.keyword_calls(), 1);
}

#[tokio::test]
async fn test_sides_run_concurrently() {
    let delay = Duration::from_millis(300);
    let commerce = ScriptedProvider::new("commerce", DataSource::Commerce)
        .on_keyword(Script::Delay(delay, vec![book("A", "x", None, DataSource::Commerce)]))
        .shared();
    let registry = ScriptedProvider::new("registry", DataSource::Registry).shared();
    let index = ScriptedProvider::new("generic_index", DataSource::GenericIndex).shared();
    let extra_index = ScriptedProvider::new("secondary_index", DataSource::GenericIndex)
        .on_keyword(Script::Delay(delay, vec![book("B", "y", None, DataSource::GenericIndex)]))
        .shared();

    let aggregator = SearchAggregator::with_index(resolver_with(commerce, registry, index), extra_index);

    let started = Instant::now();
    let records = aggregator.search("anything").await;

    assert_eq!(records.len(), 2);
    assert!(started.elapsed() < delay * 2, "sides ran sequentially: {:?}", started.elapsed());
}

#[tokio::test]
async fn test_blank_text_is_empty() {
    let make = |name| ScriptedProvider::new(name, DataSource::Manual).shared();
    let index = make("generic_index");
    let aggregator = SearchAggregator::new(resolver_with(make("commerce"), make("registry"), index.clone()));

    assert!(aggregator.search("   ").await.is_empty());
    assert_eq!(index.total_calls(), 0);
}

fn resolver_without_commerce(registry: Arc<ScriptedProvider>, index: Arc<ScriptedProvider>) -> Arc<BookResolver> {
    Arc::new(
        BookResolver::builder()
            .registry(registry)
            .generic_index(index)
            .timeout(Duration::from_secs(2))
            .build()
            .unwrap(),
    )
}

#[tokio::test]
async fn test_shared_index_queried_once_for_keywords() {
    let registry = ScriptedProvider::new("registry", DataSource::Registry).shared();
    let index = ScriptedProvider::new("generic_index", DataSource::GenericIndex)
        .on_keyword(Script::Records(vec![book("Kitchen", "Yoshimoto", None, DataSource::GenericIndex)]))
        .shared();

    let resolver = resolver_without_commerce(registry, index.clone());
    let aggregator = SearchAggregator::new(resolver.clone());
    let records = aggregator.search("kitchen").await;

    assert_eq!(records.len(), 1);
    assert_eq!(index.keyword_calls(), 1);
    assert_eq!(resolver.history().entries(), vec!["kitchen"]);
}

#[tokio::test]
async fn test_shared_index_queried_once_for_isbn() {
    let registry = ScriptedProvider::new("registry", DataSource::Registry).shared();
    let index = ScriptedProvider::new("generic_index", DataSource::GenericIndex)
        .on_isbn(Script::Records(vec![book("Kitchen", "Yoshimoto", Some(ISBN), DataSource::GenericIndex)]))
        .shared();

    let aggregator = SearchAggregator::new(resolver_without_commerce(registry.clone(), index.clone()));
    let records = aggregator.search(ISBN).await;

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].data_source, DataSource::GenericIndex);
    assert_eq!(registry.isbn_calls(), 1);
    assert_eq!(index.isbn_calls(), 1);
}

#[tokio::test]
async fn test_separate_index_keeps_resolver_fallback() {
    let registry = ScriptedProvider::new("registry", DataSource::Registry).shared();
    let resolver_index = ScriptedProvider::new("generic_index", DataSource::GenericIndex)
        .on_keyword(Script::Records(vec![book("Kitchen", "Yoshimoto", None, DataSource::GenericIndex)]))
        .shared();
    let extra_index = ScriptedProvider::new("secondary_index", DataSource::GenericIndex).shared();

    let aggregator = SearchAggregator::with_index(
        resolver_without_commerce(registry, resolver_index.clone()),
        extra_index.clone(),
    );
    let records = aggregator.search("kitchen").await;

    assert_eq!(records.len(), 1);
    assert_eq!(resolver_index.keyword_calls(), 1);
    assert_eq!(extra_index.keyword_calls(), 1);
}
