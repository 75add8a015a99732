use serde::Serialize;
use std::fmt;
use std::sync::Mutex;

/// Named navigation targets. Concrete paths belong to the embedding router.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Destination {
    Login,
    Dashboard,
    Jobs,
}

impl Destination {
    /// Default path for each destination
    pub fn path(&self) -> &'static str {
        match self {
            Destination::Login => "/login",
            Destination::Dashboard => "/dashboard",
            Destination::Jobs => "/jobs",
        }
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Performs a full redirect. Implementations discard any view state they own.
pub trait Navigator: Send + Sync {
    fn navigate(&self, destination: Destination);
}

/// Terminal front end: a redirect to login becomes a hint on stderr.
#[derive(Debug, Default)]
pub struct TerminalNavigator;

impl Navigator for TerminalNavigator {
    fn navigate(&self, destination: Destination) {
        match destination {
            Destination::Login => {
                eprintln!("Session expired or missing. Run `jobboard auth login <email>` to sign in.");
            }
            other => {
                tracing::info!("Redirecting to {}", other);
            }
        }
    }
}

/// Keeps every navigation in order. Useful for embedders that apply
/// redirects on their own loop, and for tests.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    visited: Mutex<Vec<Destination>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn visited(&self) -> Vec<Destination> {
        self.visited.lock().map(|v| v.clone()).unwrap_or_default()
    }

    pub fn last(&self) -> Option<Destination> {
        self.visited().last().copied()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, destination: Destination) {
        if let Ok(mut visited) = self.visited.lock() {
            visited.push(destination);
        }
    }
}
