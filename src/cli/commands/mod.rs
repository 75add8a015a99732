pub mod auth;
pub mod dashboard;
pub mod list;
pub mod route;
