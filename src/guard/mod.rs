//! Per-navigation access decisions.
//!
//! The guard is a pure function of the current session and the route table.
//! Nothing is cached between navigations, so a session cleared by the API
//! gateway takes effect on the very next check.

pub mod routes;

use serde::Serialize;

use crate::navigation::{Destination, Navigator};
use crate::session::{Role, Session, SessionStore};

pub use routes::{RouteAccessRule, RouteTable};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", content = "destination", rename_all = "lowercase")]
pub enum GuardDecision {
    Render,
    Redirect(Destination),
}

/// Where a signed-in user lands when a route is not for them.
pub fn home_for(role: Option<Role>) -> Destination {
    match role {
        Some(Role::EliteTeam) => Destination::Jobs,
        _ => Destination::Dashboard,
    }
}

#[derive(Debug, Clone, Default)]
pub struct Guard {
    table: RouteTable,
}

impl Guard {
    pub fn new(table: RouteTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    pub fn evaluate(&self, session: &Session, path: &str) -> GuardDecision {
        let decision = match self.table.find(path) {
            Some(rule) if rule.public_only => Self::evaluate_public(session),
            Some(rule) => Self::evaluate_protected(session, rule),
            // Unknown routes only require a token
            None => Self::evaluate_protected(session, &RouteAccessRule::protected("", &[])),
        };
        tracing::debug!(
            "Guard {} (role {:?}) -> {:?}",
            path,
            session.role,
            decision
        );
        decision
    }

    fn evaluate_protected(session: &Session, rule: &RouteAccessRule) -> GuardDecision {
        if !session.is_authenticated() {
            return GuardDecision::Redirect(Destination::Login);
        }
        if !rule.permits(session.role) {
            return GuardDecision::Redirect(home_for(session.role));
        }
        GuardDecision::Render
    }

    fn evaluate_public(session: &Session) -> GuardDecision {
        if session.is_authenticated() {
            GuardDecision::Redirect(home_for(session.role))
        } else {
            GuardDecision::Render
        }
    }

    /// Evaluate against a fresh read of the store
    pub fn check(&self, store: &SessionStore, path: &str) -> GuardDecision {
        self.evaluate(&store.snapshot(), path)
    }

    /// Evaluate and perform the redirect if there is one. Returns whether the
    /// requested view may render.
    pub fn enter(&self, store: &SessionStore, navigator: &dyn Navigator, path: &str) -> bool {
        match self.check(store, path) {
            GuardDecision::Render => true,
            GuardDecision::Redirect(destination) => {
                navigator.navigate(destination);
                false
            }
        }
    }

    /// Capability check for a role against a path, ignoring the token
    pub fn role_can(&self, role: Option<Role>, path: &str) -> bool {
        self.table.find(path).map_or(true, |rule| rule.public_only || rule.permits(role))
    }
}
