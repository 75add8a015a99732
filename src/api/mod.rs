pub mod client;
pub mod endpoints;
pub mod envelope;
pub mod models;

pub use client::{ApiClient, QueryParams};
pub use envelope::{ApiEnvelope, Page, Pagination};
