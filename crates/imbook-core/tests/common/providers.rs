//! Scripted in-memory providers
//!
//! Each provider returns canned records (or a canned failure) and counts
//! how often it was asked, so tests can assert on call order and
//! short-circuiting without a network.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use imbook_core::http::HttpError;
use imbook_core::{BookProvider, BookRecord, DataSource, SourceError};

#[derive(Clone)]
pub enum Script {
    Records(Vec<BookRecord>),
    Fail,
    /// Sleep before answering; used to trip the resolver timeout
    Delay(Duration, Vec<BookRecord>),
}

pub struct ScriptedProvider {
    name: &'static str,
    source: DataSource,
    isbn: Script,
    keyword: Script,
    isbn_calls: AtomicUsize,
    keyword_calls: AtomicUsize,
    last_isbn: std::sync::Mutex<Option<String>>,
}

impl ScriptedProvider {
    pub fn new(name: &'static str, source: DataSource) -> Self {
        Self {
            name,
            source,
            isbn: Script::Records(Vec::new()),
            keyword: Script::Records(Vec::new()),
            isbn_calls: AtomicUsize::new(0),
            keyword_calls: AtomicUsize::new(0),
            last_isbn: std::sync::Mutex::new(None),
        }
    }

    pub fn on_isbn(mut self, script: Script) -> Self {
        self.isbn = script;
        self
    }

    pub fn on_keyword(mut self, script: Script) -> Self {
        self.keyword = script;
        self
    }

    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn isbn_calls(&self) -> usize {
        self.isbn_calls.load(Ordering::SeqCst)
    }

    pub fn keyword_calls(&self) -> usize {
        self.keyword_calls.load(Ordering::SeqCst)
    }

    pub fn total_calls(&self) -> usize {
        self.isbn_calls() + self.keyword_calls()
    }

    pub fn last_isbn(&self) -> Option<String> {
        self.last_isbn.lock().unwrap().clone()
    }

    async fn play(script: &Script) -> Result<Vec<BookRecord>, SourceError> {
        match script {
            Script::Records(records) => Ok(records.clone()),
            Script::Fail => Err(SourceError::Http(HttpError::Status { status: 503 })),
            Script::Delay(delay, records) => {
                tokio::time::sleep(*delay).await;
                Ok(records.clone())
            }
        }
    }
}

#[async_trait]
impl BookProvider for ScriptedProvider {
    async fn search_by_isbn(&self, isbn: &str) -> Result<Vec<BookRecord>, SourceError> {
        self.isbn_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_isbn.lock().unwrap() = Some(isbn.to_string());
        Self::play(&self.isbn).await
    }

    async fn search_by_query(&self, _query: &str) -> Result<Vec<BookRecord>, SourceError> {
        self.keyword_calls.fetch_add(1, Ordering::SeqCst);
        Self::play(&self.keyword).await
    }

    fn name(&self) -> &'static str {
        self.name
    }

    fn data_source(&self) -> DataSource {
        self.source
    }
}

/// Record with a title, author and optional ISBN
pub fn book(title: &str, author: &str, isbn: Option<&str>, source: DataSource) -> BookRecord {
    BookRecord::new(Some(title.to_string()), Some(author.to_string()), source)
        .with_isbn(isbn.map(str::to_string))
}
