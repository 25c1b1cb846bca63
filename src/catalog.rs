//! Paginated catalog of published semantics.
//!
//! The language backend lists semantics documents under
//! `{base}/v2/languages/semantics`, filtered by an optional search term and
//! paged with `pageNumber` / `pageSize`. [`SemanticsCatalog`] accumulates
//! the pages into selectable options, [`SearchDebounce`] throttles search
//! input, and [`Fetch`] is the transport seam.

#[cfg(test)]
#[path = "catalog_test.rs"]
mod catalog_test;

use std::cmp::Ordering;
use std::time::{Duration, Instant};

use serde::{Deserialize, Deserializer, Serialize};
use url::Url;

const SEMANTICS_ROUTE: [&str; 3] = ["v2", "languages", "semantics"];

/// Join `segments` onto the backend `base` URL as path segments.
///
/// # Errors
///
/// Returns `Err` if `base` is not an absolute URL that can carry a path.
pub fn service_url(base: &str, segments: &[&str]) -> Result<Url, CatalogError> {
    let mut url = Url::parse(base)?;
    url.path_segments_mut()
        .map_err(|()| CatalogError::NotABase(base.to_owned()))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

// =============================================================
// Wire types
// =============================================================

/// Response body of every backend list endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEnvelope<T> {
    #[serde(default)]
    pub data: Option<T>,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub total_count: u64,
    #[serde(default)]
    pub error_code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl<T> ResponseEnvelope<T> {
    /// Fail if the backend reported an error code.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Backend`] when `errorCode` is present and non-empty.
    pub fn into_result(self) -> Result<Self, CatalogError> {
        match self.error_code.as_deref() {
            Some(code) if !code.is_empty() => Err(CatalogError::Backend {
                code: code.to_owned(),
                message: self.message.unwrap_or_default(),
            }),
            _ => Ok(self),
        }
    }
}

fn null_as_zero<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    Option::<u64>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// One published semantics document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: u64,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    /// The document, either inline JSON or JSON text.
    #[serde(default)]
    pub semantics: serde_json::Value,
}

/// Orders entries by name.
#[must_use]
pub fn sort_by_name(a: &CatalogEntry, b: &CatalogEntry) -> Ordering {
    a.name.cmp(&b.name)
}

/// An entry as offered for selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub label: String,
    /// Entry id as text.
    pub value: String,
}

impl From<&CatalogEntry> for SelectOption {
    fn from(entry: &CatalogEntry) -> Self {
        Self { label: format!("{}: [{}]", entry.name, entry.kind), value: entry.id.to_string() }
    }
}

// =============================================================
// Catalog
// =============================================================

#[derive(Debug, Clone)]
pub struct SemanticsCatalog {
    page_size: u32,
    /// Last page ingested; 0 before the first.
    page: u32,
    search: String,
    entries: Vec<CatalogEntry>,
    options: Vec<SelectOption>,
    total: u64,
    selected: Option<SelectOption>,
}

impl SemanticsCatalog {
    #[must_use]
    pub fn new(page_size: u32) -> Self {
        Self {
            page_size: page_size.max(1),
            page: 0,
            search: String::new(),
            entries: Vec::new(),
            options: Vec::new(),
            total: 0,
            selected: None,
        }
    }

    #[must_use]
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Number of pages ingested since the last search change.
    #[must_use]
    pub fn page(&self) -> u32 {
        self.page
    }

    #[must_use]
    pub fn search(&self) -> &str {
        &self.search
    }

    #[must_use]
    pub fn options(&self) -> &[SelectOption] {
        &self.options
    }

    #[must_use]
    pub fn total(&self) -> u64 {
        self.total
    }

    #[must_use]
    pub fn selected(&self) -> Option<&SelectOption> {
        self.selected.as_ref()
    }

    /// Entries loaded for the current search, in arrival order.
    #[must_use]
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// Stored document for an entry id.
    #[must_use]
    pub fn semantics_by_id(&self, id: u64) -> Option<&serde_json::Value> {
        self.entries.iter().find(|e| e.id == id).map(|e| &e.semantics)
    }

    /// Whether the backend reported more entries than have been loaded.
    #[must_use]
    pub fn has_more(&self) -> bool {
        (self.options.len() as u64) < self.total
    }

    /// Change the search term and start paging from the first page again.
    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
        self.page = 0;
        self.total = 0;
    }

    /// URL of the next page to request.
    ///
    /// # Errors
    ///
    /// Returns `Err` if `base` is not a usable URL.
    pub fn request_url(&self, base: &str) -> Result<Url, CatalogError> {
        let mut url = service_url(base, &SEMANTICS_ROUTE)?;
        {
            let mut query = url.query_pairs_mut();
            if !self.search.is_empty() {
                query.append_pair("search", &self.search);
            }
            query.append_pair("pageNumber", &(self.page + 1).to_string());
            query.append_pair("pageSize", &self.page_size.to_string());
        }
        Ok(url)
    }

    /// Accept one page of results. The first page replaces the options;
    /// later pages extend them.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Backend`] if the envelope carries an error code.
    pub fn ingest(&mut self, envelope: ResponseEnvelope<Vec<CatalogEntry>>) -> Result<(), CatalogError> {
        let envelope = envelope.into_result()?;
        if self.page == 0 {
            self.entries.clear();
            self.options.clear();
        }
        let entries = envelope.data.unwrap_or_default();
        self.options.extend(entries.iter().map(SelectOption::from));
        self.entries.extend(entries);
        self.total = envelope.total_count;
        self.page += 1;
        tracing::debug!(page = self.page, loaded = self.options.len(), total = self.total, "ingested catalog page");
        Ok(())
    }

    /// Pick an option by its value and return the document as pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::UnknownSelection`] if no loaded entry has
    /// that id.
    pub fn select(&mut self, value: &str) -> Result<String, CatalogError> {
        let unknown = || CatalogError::UnknownSelection(value.to_owned());
        let id: u64 = value.trim().parse().map_err(|_| unknown())?;
        let document = self.semantics_by_id(id).ok_or_else(unknown)?;
        let text = match document {
            serde_json::Value::String(text) => match serde_json::from_str::<serde_json::Value>(text) {
                Ok(parsed) => serde_json::to_string_pretty(&parsed)?,
                Err(_) => text.clone(),
            },
            other => serde_json::to_string_pretty(other)?,
        };
        self.selected = self.options.iter().find(|o| o.value == id.to_string()).cloned();
        Ok(text)
    }

    /// Request and ingest the next page through `fetcher`.
    ///
    /// # Errors
    ///
    /// Returns `Err` on transport failure, an unreadable body, or a backend
    /// error code.
    pub fn load_next_page(&mut self, fetcher: &mut impl Fetch, base: &str) -> Result<(), CatalogError> {
        let url = self.request_url(base)?;
        let body = match fetcher.fetch(&url) {
            Ok(body) => body,
            Err(FetchError::Status { status, body }) => {
                let envelope: ResponseEnvelope<serde_json::Value> =
                    serde_json::from_str(&body).map_err(|_| FetchError::Status { status, body: body.clone() })?;
                envelope.into_result()?;
                return Err(FetchError::Status { status, body }.into());
            }
            Err(e) => return Err(e.into()),
        };
        let envelope: ResponseEnvelope<Vec<CatalogEntry>> = serde_json::from_str(&body)?;
        self.ingest(envelope)
    }
}

// =============================================================
// Search debounce
// =============================================================

/// Holds back search input until it has been quiet for `delay`.
#[derive(Debug, Clone)]
pub struct SearchDebounce {
    delay: Duration,
    pending: Option<(String, Instant)>,
}

impl SearchDebounce {
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self { delay, pending: None }
    }

    /// Record new input at `now`, superseding anything pending.
    pub fn input(&mut self, text: impl Into<String>, now: Instant) {
        self.pending = Some((text.into(), now));
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Release the pending input if its delay has elapsed by `now`.
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        let ready = self
            .pending
            .as_ref()
            .is_some_and(|(_, at)| now.saturating_duration_since(*at) >= self.delay);
        if ready { self.pending.take().map(|(text, _)| text) } else { None }
    }

    /// Release ready input into `catalog`, resetting its paging. Returns
    /// whether a new search started.
    pub fn apply(&mut self, catalog: &mut SemanticsCatalog, now: Instant) -> bool {
        match self.poll(now) {
            Some(search) => {
                catalog.set_search(search);
                true
            }
            None => false,
        }
    }
}

// =============================================================
// Transport
// =============================================================

/// Fetches a URL and returns the response body.
pub trait Fetch {
    /// # Errors
    ///
    /// Returns [`FetchError::Status`] for a non-success response and
    /// [`FetchError::Transport`] when no response arrived.
    fn fetch(&mut self, url: &Url) -> Result<String, FetchError>;
}

/// Blocking HTTP transport.
#[derive(Debug, Clone, Default)]
pub struct HttpFetch {
    client: reqwest::blocking::Client,
}

impl HttpFetch {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Fetch for HttpFetch {
    fn fetch(&mut self, url: &Url) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        let status = response.status();
        let body = response.text().map_err(|e| FetchError::Transport(e.to_string()))?;
        if !status.is_success() {
            return Err(FetchError::Status { status: status.as_u16(), body });
        }
        Ok(body)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("HTTP {status}")]
    Status { status: u16, body: String },
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("invalid backend url: {0}")]
    Url(#[from] url::ParseError),
    #[error("backend url cannot carry a path: {0}")]
    NotABase(String),
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("invalid catalog response: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{code}: {message}")]
    Backend { code: String, message: String },
    #[error("no catalog entry with id {0:?}")]
    UnknownSelection(String),
}
