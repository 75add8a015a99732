use serde::{Deserialize, Serialize};

use crate::error::{ClientError, ClientResult};

/// Response wrapper every upstream endpoint uses:
/// `{ "success": bool, "message"?: string, "data"?: T }`
#[derive(Debug, Clone, Deserialize)]
pub struct ApiEnvelope<T> {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    pub data: Option<T>,
}

impl<T> ApiEnvelope<T> {
    /// Server-supplied explanation, preferring `message` over `error`
    pub fn reason(&self) -> Option<&str> {
        self.message
            .as_deref()
            .or(self.error.as_deref())
            .filter(|m| !m.trim().is_empty())
    }

    pub fn into_result(self) -> ClientResult<T> {
        if !self.success {
            let message = self
                .reason()
                .unwrap_or("The server rejected the request")
                .to_string();
            return Err(ClientError::logical_failure(message));
        }
        self.data
            .ok_or_else(|| ClientError::decode("response is missing the data field"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    #[serde(default = "first_page")]
    pub current_page: u32,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_items: u64,
}

fn first_page() -> u32 {
    1
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            current_page: 1,
            total_pages: 0,
            total_items: 0,
        }
    }
}

/// Paginated payload: `{ "items": [...], "pagination": {...} }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    #[serde(default)]
    pub pagination: Pagination,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, pagination: Pagination) -> Self {
        Self { items, pagination }
    }
}
