//! Resolution orchestrator
//!
//! Runs providers in a fixed priority order and stops as soon as a
//! sufficient answer exists. Every provider call is bounded by its own
//! timeout; a failing or slow provider is logged and contributes nothing.
//!
//! ISBN lookups: commerce (if configured) → registry → generic index, the
//! last only when the registry found nothing. Keyword lookups: commerce (if
//! configured) → generic index.

use std::sync::Arc;
use std::time::Duration;

use crate::cache::{CacheKey, QueryHistory, ResultCache};
use crate::config::ResolverConfig;
use crate::deduplication::deduplicate;
use crate::domain::BookRecord;
use crate::error::{ConfigError, ResolveError, Result};
use crate::http::HttpClient;
use crate::identifiers::parse_isbn;
use crate::selection::into_best;
use crate::sources::{BookProvider, CommerceSource, GenericIndexSource, RegistrySource, SourceError};

/// Kind of lookup sent to a provider
#[derive(Debug, Clone, Copy)]
pub(crate) enum Lookup<'a> {
    Isbn(&'a str),
    Keyword(&'a str),
}

impl Lookup<'_> {
    fn kind(&self) -> &'static str {
        match self {
            Lookup::Isbn(_) => "isbn",
            Lookup::Keyword(_) => "keyword",
        }
    }
}

/// Whether a resolver chain may end on the generic index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum IndexFallback {
    Include,
    /// The caller queries the same index itself
    Skip,
}

/// Call one provider under a timeout, degrading any failure to no records
pub(crate) async fn call_provider(
    provider: &dyn BookProvider,
    lookup: Lookup<'_>,
    timeout: Duration,
) -> Vec<BookRecord> {
    let call = async {
        match lookup {
            Lookup::Isbn(isbn) => provider.search_by_isbn(isbn).await,
            Lookup::Keyword(query) => provider.search_by_query(query).await,
        }
    };

    let outcome = match tokio::time::timeout(timeout, call).await {
        Ok(result) => result,
        Err(_) => Err(SourceError::Timeout(timeout)),
    };

    match outcome {
        Ok(records) => {
            tracing::info!(
                provider = provider.name(),
                lookup = lookup.kind(),
                count = records.len(),
                "provider returned records"
            );
            records
        }
        Err(e) => {
            tracing::warn!(
                provider = provider.name(),
                lookup = lookup.kind(),
                error = %e,
                "provider lookup failed, continuing without it"
            );
            Vec::new()
        }
    }
}

/// Validate a raw ISBN, stripping separators first
fn validated_isbn(raw: &str) -> Result<String> {
    parse_isbn(raw).ok_or_else(|| {
        ResolveError::InvalidArgument(format!(
            "isbn '{}' must be 10 or 13 characters, optionally prefixed 978/979, ending in a digit or X",
            raw.trim()
        ))
    })
}

/// Priority-ordered book metadata resolver with a result cache
pub struct BookResolver {
    commerce: Option<Arc<dyn BookProvider>>,
    registry: Arc<dyn BookProvider>,
    generic_index: Arc<dyn BookProvider>,
    cache: Arc<ResultCache>,
    history: Arc<QueryHistory>,
    timeout: Duration,
}

impl BookResolver {
    pub fn builder() -> BookResolverBuilder {
        BookResolverBuilder::default()
    }

    /// Build HTTP-backed providers from configuration
    pub fn from_config(config: &ResolverConfig) -> std::result::Result<Self, ConfigError> {
        config.validate()?;

        let client = HttpClient::new(&config.user_agent, config.timeout())?;

        let mut builder = Self::builder()
            .registry(Arc::new(RegistrySource::new(client.clone(), &config.registry)))
            .generic_index(Arc::new(GenericIndexSource::new(client.clone(), &config.generic_index)))
            .cache(Arc::new(ResultCache::from_config(&config.cache)))
            .history(Arc::new(QueryHistory::from_config(&config.history)))
            .timeout(config.timeout());

        if let Some(commerce) = &config.commerce {
            builder = builder.commerce(Arc::new(CommerceSource::new(client, commerce)));
        } else {
            tracing::debug!("commerce catalog not configured, skipping it");
        }

        builder.build()
    }

    pub fn cache(&self) -> &Arc<ResultCache> {
        &self.cache
    }

    pub fn history(&self) -> &Arc<QueryHistory> {
        &self.history
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub(crate) fn generic_index(&self) -> &Arc<dyn BookProvider> {
        &self.generic_index
    }

    /// Resolve candidates for an ISBN without touching the cache
    pub async fn resolve_by_isbn(&self, isbn: &str) -> Result<Vec<BookRecord>> {
        let isbn = validated_isbn(isbn)?;
        Ok(self.resolve_isbn_chain(&isbn, IndexFallback::Include).await)
    }

    async fn resolve_isbn_chain(&self, isbn: &str, fallback: IndexFallback) -> Vec<BookRecord> {
        let lookup = Lookup::Isbn(isbn);

        if let Some(commerce) = &self.commerce {
            let records = call_provider(commerce.as_ref(), lookup, self.timeout).await;
            if !records.is_empty() {
                tracing::debug!(isbn, provider = commerce.name(), "short-circuit on commerce result");
                return records;
            }
        }

        let records = call_provider(self.registry.as_ref(), lookup, self.timeout).await;
        if !records.is_empty() || fallback == IndexFallback::Skip {
            return records;
        }

        tracing::debug!(isbn, "registry found nothing, trying generic index");
        call_provider(self.generic_index.as_ref(), lookup, self.timeout).await
    }

    /// Resolve a keyword query without touching the cache or history
    pub async fn resolve_by_keyword(&self, query: &str) -> Vec<BookRecord> {
        self.resolve_keyword_chain(query, IndexFallback::Include).await
    }

    async fn resolve_keyword_chain(&self, query: &str, fallback: IndexFallback) -> Vec<BookRecord> {
        let query = query.trim();
        if query.is_empty() {
            return Vec::new();
        }
        let lookup = Lookup::Keyword(query);

        if let Some(commerce) = &self.commerce {
            let records = call_provider(commerce.as_ref(), lookup, self.timeout).await;
            if !records.is_empty() {
                tracing::debug!(query, provider = commerce.name(), "short-circuit on commerce result");
                return records;
            }
        }

        if fallback == IndexFallback::Skip {
            return Vec::new();
        }
        call_provider(self.generic_index.as_ref(), lookup, self.timeout).await
    }

    /// Look up the single most complete record for an ISBN
    ///
    /// Returns an empty list when no provider knows the ISBN. Fails only for
    /// malformed input, before any cache or network access.
    pub async fn search_by_isbn(&self, isbn: &str) -> Result<Vec<BookRecord>> {
        self.search_by_isbn_with(isbn, IndexFallback::Include).await
    }

    pub(crate) async fn search_by_isbn_with(
        &self,
        isbn: &str,
        fallback: IndexFallback,
    ) -> Result<Vec<BookRecord>> {
        let isbn = validated_isbn(isbn)?;
        let key = CacheKey::isbn(&isbn);

        if let Some(records) = self.cache.get(&key) {
            tracing::debug!(key = %key, "cache hit");
            return Ok(records);
        }
        tracing::debug!(key = %key, "cache miss");

        let best: Vec<BookRecord> = into_best(self.resolve_isbn_chain(&isbn, fallback).await)
            .into_iter()
            .collect();

        if !best.is_empty() {
            self.cache.put(key, best.clone());
        }
        Ok(best)
    }

    /// Keyword search, deduplicated and cached by normalized query
    pub async fn search_by_query(&self, text: &str) -> Vec<BookRecord> {
        self.search_by_query_with(text, IndexFallback::Include).await
    }

    pub(crate) async fn search_by_query_with(&self, text: &str, fallback: IndexFallback) -> Vec<BookRecord> {
        if text.trim().is_empty() {
            return Vec::new();
        }

        self.history.record(text).await;

        let key = CacheKey::query(text);
        if let Some(records) = self.cache.get(&key) {
            tracing::debug!(key = %key, "cache hit");
            return records;
        }
        tracing::debug!(key = %key, "cache miss");

        let records = deduplicate(self.resolve_keyword_chain(text, fallback).await);
        if !records.is_empty() {
            self.cache.put(key, records.clone());
        }
        records
    }
}

/// Builder for [`BookResolver`]
///
/// Registry and generic index are required; commerce is optional. Cache and
/// history default to in-memory instances.
#[derive(Default)]
pub struct BookResolverBuilder {
    commerce: Option<Arc<dyn BookProvider>>,
    registry: Option<Arc<dyn BookProvider>>,
    generic_index: Option<Arc<dyn BookProvider>>,
    cache: Option<Arc<ResultCache>>,
    history: Option<Arc<QueryHistory>>,
    timeout: Option<Duration>,
}

impl BookResolverBuilder {
    pub fn commerce(mut self, provider: Arc<dyn BookProvider>) -> Self {
        self.commerce = Some(provider);
        self
    }

    pub fn registry(mut self, provider: Arc<dyn BookProvider>) -> Self {
        self.registry = Some(provider);
        self
    }

    pub fn generic_index(mut self, provider: Arc<dyn BookProvider>) -> Self {
        self.generic_index = Some(provider);
        self
    }

    pub fn cache(mut self, cache: Arc<ResultCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn history(mut self, history: Arc<QueryHistory>) -> Self {
        self.history = Some(history);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn build(self) -> std::result::Result<BookResolver, ConfigError> {
        let registry = self
            .registry
            .ok_or_else(|| ConfigError::MissingField("registry provider".to_string()))?;
        let generic_index = self
            .generic_index
            .ok_or_else(|| ConfigError::MissingField("generic index provider".to_string()))?;

        let defaults = ResolverConfig::default();

        Ok(BookResolver {
            commerce: self.commerce,
            registry,
            generic_index,
            cache: self
                .cache
                .unwrap_or_else(|| Arc::new(ResultCache::from_config(&defaults.cache))),
            history: self
                .history
                .unwrap_or_else(|| Arc::new(QueryHistory::in_memory(defaults.history.capacity))),
            timeout: self.timeout.unwrap_or_else(|| defaults.timeout()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DataSource;
    use async_trait::async_trait;

    struct Fixed(Vec<BookRecord>);

    #[async_trait]
    impl BookProvider for Fixed {
        async fn search_by_isbn(&self, _isbn: &str) -> std::result::Result<Vec<BookRecord>, SourceError> {
            Ok(self.0.clone())
        }

        fn name(&self) -> &'static str {
            "fixed"
        }

        fn data_source(&self) -> DataSource {
            DataSource::Manual
        }
    }

    fn resolver(registry: Vec<BookRecord>) -> BookResolver {
        BookResolver::builder()
            .registry(Arc::new(Fixed(registry)))
            .generic_index(Arc::new(Fixed(Vec::new())))
            .build()
            .unwrap()
    }

    #[test]
    fn test_builder_requires_registry_and_index() {
        let result = BookResolver::builder()
            .generic_index(Arc::new(Fixed(Vec::new())))
            .build();
        assert!(matches!(result, Err(ConfigError::MissingField(_))));
    }

    #[test]
    fn test_validated_isbn() {
        assert_eq!(validated_isbn("978-4-16-715805-7").unwrap(), "9784167158057");
        assert!(matches!(validated_isbn("abc"), Err(ResolveError::InvalidArgument(_))));
    }

    #[tokio::test]
    async fn test_unsupported_keyword_search_degrades_to_empty() {
        let provider = Fixed(Vec::new());
        let records = call_provider(&provider, Lookup::Keyword("kitchen"), Duration::from_secs(1)).await;
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn test_registry_record_is_selected() {
        let record = BookRecord::new(Some("Kitchen".into()), None, DataSource::Registry);
        let resolver = resolver(vec![record.clone()]);

        let found = resolver.search_by_isbn("9784167158057").await.unwrap();
        assert_eq!(found, vec![record]);
        assert_eq!(resolver.cache().len(), 1);
    }

    #[tokio::test]
    async fn test_not_found_is_not_cached() {
        let resolver = resolver(Vec::new());
        assert!(resolver.search_by_isbn("9784167158057").await.unwrap().is_empty());
        assert!(resolver.cache().is_empty());
    }

    #[tokio::test]
    async fn test_blank_query_skips_history() {
        let resolver = resolver(Vec::new());
        assert!(resolver.search_by_query("   ").await.is_empty());
        assert!(resolver.history().entries().is_empty());
    }
}
