pub mod api;
pub mod cli;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod guard;
pub mod list;
pub mod navigation;
pub mod session;

pub use error::{ClientError, ClientResult};
