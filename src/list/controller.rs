use serde::Serialize;

use super::query::{ListQuery, ListScreen};
use super::{ListError, ViewStatus};
use crate::api::Page;
use crate::error::{ClientError, ClientResult};

/// Full state of one listing: the URL-visible query plus result counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQueryState {
    pub page: u32,
    pub page_size: u32,
    pub filters: std::collections::BTreeMap<String, String>,
    pub total_pages: u32,
    pub total_items: u64,
}

impl ListQueryState {
    fn query(&self) -> ListQuery {
        ListQuery {
            page: self.page,
            filters: self.filters.clone(),
        }
    }
}

/// A fetch the caller must issue. `seq` tags it so a late answer for a
/// superseded state can be recognized and dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub seq: u64,
    pub query: ListQuery,
    pub params: Vec<(String, String)>,
}

#[derive(Debug)]
pub enum FetchOutcome {
    Applied,
    /// The state moved on before this response arrived; nothing changed.
    Stale,
    Failed(ClientError),
}

impl FetchOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, FetchOutcome::Applied)
    }

    pub fn is_stale(&self) -> bool {
        matches!(self, FetchOutcome::Stale)
    }
}

/// Synchronous state machine behind a listing screen. Mutations that change
/// the query hand back exactly one `FetchRequest`; mutations that change
/// nothing hand back `None`.
#[derive(Debug, Clone)]
pub struct ListController<T> {
    screen: &'static ListScreen,
    base_path: String,
    state: ListQueryState,
    items: Vec<T>,
    status: ViewStatus,
    latest_seq: u64,
}

impl<T> ListController<T> {
    pub fn new(screen: &'static ListScreen, base_path: impl Into<String>) -> Self {
        Self::with_query(screen, base_path.into(), ListQuery::defaults(screen))
    }

    /// Build from a location such as `/jobs?status=open&page=2`, a bare
    /// `?status=open`, or `status=open`.
    pub fn initialize_from_url(screen: &'static ListScreen, location: &str) -> Self {
        let (path, query) = match location.split_once('?') {
            Some((path, query)) => (path, query),
            None if location.starts_with('/') => (location, ""),
            None => ("", location),
        };
        let base_path = if path.is_empty() { screen.path } else { path };
        Self::with_query(
            screen,
            base_path.to_string(),
            ListQuery::from_query_string(screen, query),
        )
    }

    fn with_query(screen: &'static ListScreen, base_path: String, query: ListQuery) -> Self {
        Self {
            screen,
            base_path,
            state: ListQueryState {
                page: query.page,
                page_size: screen.page_size,
                filters: query.filters,
                total_pages: 0,
                total_items: 0,
            },
            items: Vec::new(),
            status: ViewStatus::Idle,
            latest_seq: 0,
        }
    }

    pub fn screen(&self) -> &'static ListScreen {
        self.screen
    }

    pub fn state(&self) -> &ListQueryState {
        &self.state
    }

    pub fn query(&self) -> ListQuery {
        self.state.query()
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn status(&self) -> &ViewStatus {
        &self.status
    }

    /// Canonical location for the current state
    pub fn location(&self) -> String {
        let query = self.query().to_query_string(self.screen);
        if query.is_empty() {
            self.base_path.clone()
        } else {
            format!("{}?{}", self.base_path, query)
        }
    }

    /// Request for the current state, superseding any fetch in flight.
    /// Used on mount and for retry.
    pub fn begin_fetch(&mut self) -> FetchRequest {
        self.latest_seq += 1;
        self.status = ViewStatus::Loading;
        let query = self.query();
        FetchRequest {
            seq: self.latest_seq,
            params: query.to_api_params(self.screen),
            query,
        }
    }

    /// Update one filter and go back to page 1.
    pub fn set_filter(&mut self, name: &str, value: &str) -> Result<Option<FetchRequest>, ListError> {
        let mut query = self.query();
        let changed = query.set_filter(self.screen, name, value)?;
        let moved = self.state.page != 1;

        self.state.filters = query.filters;
        self.state.page = 1;

        if changed || moved {
            Ok(Some(self.begin_fetch()))
        } else {
            Ok(None)
        }
    }

    /// Move to page `n`. Out-of-range or unchanged pages are a no-op.
    pub fn set_page(&mut self, n: u32) -> Option<FetchRequest> {
        let last = self.state.total_pages.max(1);
        if n < 1 || n > last || n == self.state.page {
            return None;
        }
        self.state.page = n;
        Some(self.begin_fetch())
    }

    /// Take the server's counts. The server's `currentPage`, kept within
    /// `1..=max(1, totalPages)`, wins over the locally held page.
    pub fn apply_server_result(&mut self, page: Page<T>) {
        let pagination = page.pagination;
        self.state.total_pages = pagination.total_pages;
        self.state.total_items = pagination.total_items;
        // A server may echo a page past the end, e.g. after rows were deleted
        let current = pagination.current_page.clamp(1, pagination.total_pages.max(1));
        if current != self.state.page {
            tracing::debug!(
                "{}: server corrected page {} -> {}",
                self.screen.name,
                self.state.page,
                current
            );
            self.state.page = current;
        }
        self.items = page.items;
        self.status = if self.items.is_empty() {
            ViewStatus::Empty
        } else {
            ViewStatus::Ready
        };
    }

    /// Settle a fetch. Responses for anything but the latest request, or for
    /// a query that no longer matches the current one, are dropped.
    pub fn complete(&mut self, request: &FetchRequest, result: ClientResult<Page<T>>) -> FetchOutcome {
        if request.seq != self.latest_seq || request.query != self.query() {
            tracing::debug!(
                "{}: dropping stale response #{} (latest #{})",
                self.screen.name,
                request.seq,
                self.latest_seq
            );
            return FetchOutcome::Stale;
        }

        match result {
            Ok(page) => {
                self.apply_server_result(page);
                FetchOutcome::Applied
            }
            // Navigation to login already happened; leave the view alone
            Err(ClientError::AuthExpired) => {
                self.status = ViewStatus::Idle;
                FetchOutcome::Failed(ClientError::AuthExpired)
            }
            Err(err) => {
                tracing::warn!("{}: fetch failed: {}", self.screen.name, err);
                self.items.clear();
                self.status = ViewStatus::Error {
                    message: err.to_string(),
                    inline: err.is_inline(),
                };
                FetchOutcome::Failed(err)
            }
        }
    }
}
