use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::{watch, Mutex};

use super::controller::{FetchOutcome, FetchRequest, ListController, ListQueryState};
use super::query::ListScreen;
use super::{ListError, ViewStatus};
use crate::api::{ApiClient, Page};
use crate::error::ClientResult;

/// Where a listing's rows come from.
#[async_trait]
pub trait ListSource<T>: Send + Sync {
    async fn fetch(&self, params: &[(String, String)]) -> ClientResult<Page<T>>;
}

/// List endpoint reached through the API gateway
#[derive(Debug, Clone)]
pub struct ApiListSource {
    client: ApiClient,
    path: String,
}

impl ApiListSource {
    pub fn new(client: ApiClient, path: impl Into<String>) -> Self {
        Self {
            client,
            path: path.into(),
        }
    }

    pub fn for_screen(client: ApiClient, screen: &ListScreen, id: Option<&str>) -> Self {
        Self::new(client, screen.resolve_api_path(id))
    }
}

#[async_trait]
impl<T> ListSource<T> for ApiListSource
where
    T: DeserializeOwned + Send + 'static,
{
    async fn fetch(&self, params: &[(String, String)]) -> ClientResult<Page<T>> {
        self.client.get(&self.path, params).await
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ListSnapshot<T> {
    pub state: ListQueryState,
    pub items: Vec<T>,
    pub status: ViewStatus,
    pub location: String,
}

/// Drives a `ListController` against a `ListSource`.
///
/// The controller lock is never held across a fetch, so several fetches may
/// be in flight at once; only the one matching the state at completion time
/// is applied.
pub struct ListView<T> {
    controller: Mutex<ListController<T>>,
    source: Arc<dyn ListSource<T>>,
    location: watch::Sender<String>,
}

impl<T> ListView<T>
where
    T: Clone + Send + 'static,
{
    pub fn new(controller: ListController<T>, source: Arc<dyn ListSource<T>>) -> Self {
        let location = watch::channel(controller.location()).0;
        Self {
            controller: Mutex::new(controller),
            source,
            location,
        }
    }

    /// Initial fetch for the state parsed from the URL
    pub async fn mount(&self) -> FetchOutcome {
        let request = self.controller.lock().await.begin_fetch();
        self.run(request).await
    }

    /// Re-issue the fetch for the current state after an error
    pub async fn retry(&self) -> FetchOutcome {
        self.mount().await
    }

    /// `Ok(None)` when nothing changed and no fetch was issued.
    pub async fn set_filter(&self, name: &str, value: &str) -> Result<Option<FetchOutcome>, ListError> {
        let request = {
            let mut controller = self.controller.lock().await;
            let request = controller.set_filter(name, value)?;
            self.publish_location(&controller);
            request
        };
        match request {
            Some(request) => Ok(Some(self.run(request).await)),
            None => Ok(None),
        }
    }

    /// `None` when the page was unchanged or out of range.
    pub async fn set_page(&self, n: u32) -> Option<FetchOutcome> {
        let request = {
            let mut controller = self.controller.lock().await;
            let request = controller.set_page(n);
            self.publish_location(&controller);
            request
        };
        match request {
            Some(request) => Some(self.run(request).await),
            None => None,
        }
    }

    pub async fn snapshot(&self) -> ListSnapshot<T> {
        let controller = self.controller.lock().await;
        ListSnapshot {
            state: controller.state().clone(),
            items: controller.items().to_vec(),
            status: controller.status().clone(),
            location: controller.location(),
        }
    }

    /// Canonical location after every state change (the "address bar")
    pub fn subscribe_location(&self) -> watch::Receiver<String> {
        self.location.subscribe()
    }

    async fn run(&self, request: FetchRequest) -> FetchOutcome {
        let result = self.source.fetch(&request.params).await;
        let mut controller = self.controller.lock().await;
        let outcome = controller.complete(&request, result);
        self.publish_location(&controller);
        outcome
    }

    fn publish_location(&self, controller: &ListController<T>) {
        let next = controller.location();
        self.location.send_if_modified(|current| {
            if *current == next {
                false
            } else {
                *current = next;
                true
            }
        });
    }
}
