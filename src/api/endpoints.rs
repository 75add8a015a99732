// Typed calls for each upstream endpoint the admin client consumes.

use super::client::{ApiClient, QueryParams};
use super::envelope::Page;
use super::models::*;
use crate::dashboard::GrowthFilter;
use crate::error::{ClientError, ClientResult};
use crate::session::Role;

/// Page size used when the dashboard pulls a list only to count it.
pub const OVERVIEW_LIMIT: u32 = 100;

impl ApiClient {
    /// Exchange credentials for a token and persist the session.
    pub async fn login(&self, email: &str, password: &str) -> ClientResult<Role> {
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let response: LoginResponse = self.post("/auth/login", &request).await?;

        let role = response.role.parse::<Role>().map_err(|e| {
            tracing::warn!("Login returned {}", e);
            ClientError::logical_failure(format!("Account role '{}' is not supported", response.role))
        })?;

        self.session().set_session(&response.token, role)?;
        tracing::info!("Logged in as {} ({})", email, role);
        Ok(role)
    }

    pub async fn list_jobs(&self, query: &[(String, String)]) -> ClientResult<Page<Job>> {
        self.get("/jobs", query).await
    }

    pub async fn job_categories(&self) -> ClientResult<Vec<JobCategory>> {
        self.get("/jobs/categories", &[]).await
    }

    pub async fn verification_counts(&self) -> ClientResult<VerificationCounts> {
        self.get("/jobs/verification-counts", &[]).await
    }

    pub async fn team_member_stats(&self) -> ClientResult<Vec<TeamMemberStat>> {
        self.get("/team/stats", &[]).await
    }

    pub async fn list_applicants(&self, query: &[(String, String)]) -> ClientResult<Page<Applicant>> {
        self.get("/applicants", query).await
    }

    pub async fn team_roster(&self) -> ClientResult<Vec<TeamMember>> {
        self.get("/team", &[]).await
    }

    pub async fn users_count(&self) -> ClientResult<UserCount> {
        self.get("/users/count", &[]).await
    }

    pub async fn user_growth(&self, filter: &GrowthFilter) -> ClientResult<Vec<GrowthPoint>> {
        self.get("/users/growth", &filter.to_params()).await
    }

    pub async fn team_posted_jobs(&self, member_id: &str, query: &[(String, String)]) -> ClientResult<Page<Job>> {
        self.get(&format!("/team/{}/jobs", member_id), query).await
    }

    pub async fn list_imports(&self, query: &[(String, String)]) -> ClientResult<Page<ImportRecord>> {
        self.get("/imports", query).await
    }
}

/// First page of a list at the overview size
pub fn overview_params() -> QueryParams {
    vec![
        ("page".to_string(), "1".to_string()),
        ("limit".to_string(), OVERVIEW_LIMIT.to_string()),
    ]
}
