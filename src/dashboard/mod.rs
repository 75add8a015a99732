//! Dashboard statistics assembled from a role-dependent batch of concurrent
//! requests.
//!
//! A batch is all-or-nothing: every request is awaited, and if any one fails
//! no snapshot is shown.

pub mod snapshot;

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;

use crate::api::endpoints::overview_params;
use crate::api::models::{
    Applicant, GrowthPoint, Job, JobCategory, TeamMember, TeamMemberStat, UserCount, VerificationCounts,
};
use crate::api::{ApiClient, Page};
use crate::error::{ClientError, ClientResult};
use crate::list::ViewStatus;
use crate::session::Role;

use snapshot::rank_members;

pub use snapshot::{ApplicantCounts, DashboardSnapshot, GrowthFilter, GrowthPeriod, JobCounts};

/// The upstream calls a dashboard may make.
#[async_trait]
pub trait DashboardSource: Send + Sync {
    async fn jobs_overview(&self) -> ClientResult<Page<Job>>;
    async fn job_categories(&self) -> ClientResult<Vec<JobCategory>>;
    async fn verification_counts(&self) -> ClientResult<VerificationCounts>;
    async fn team_member_stats(&self) -> ClientResult<Vec<TeamMemberStat>>;
    async fn applicants_overview(&self) -> ClientResult<Page<Applicant>>;
    async fn team_roster(&self) -> ClientResult<Vec<TeamMember>>;
    async fn users_count(&self) -> ClientResult<UserCount>;
    async fn user_growth(&self, filter: &GrowthFilter) -> ClientResult<Vec<GrowthPoint>>;
}

#[async_trait]
impl DashboardSource for ApiClient {
    async fn jobs_overview(&self) -> ClientResult<Page<Job>> {
        self.list_jobs(&overview_params()).await
    }

    async fn job_categories(&self) -> ClientResult<Vec<JobCategory>> {
        ApiClient::job_categories(self).await
    }

    async fn verification_counts(&self) -> ClientResult<VerificationCounts> {
        ApiClient::verification_counts(self).await
    }

    async fn team_member_stats(&self) -> ClientResult<Vec<TeamMemberStat>> {
        ApiClient::team_member_stats(self).await
    }

    async fn applicants_overview(&self) -> ClientResult<Page<Applicant>> {
        self.list_applicants(&overview_params()).await
    }

    async fn team_roster(&self) -> ClientResult<Vec<TeamMember>> {
        ApiClient::team_roster(self).await
    }

    async fn users_count(&self) -> ClientResult<UserCount> {
        ApiClient::users_count(self).await
    }

    async fn user_growth(&self, filter: &GrowthFilter) -> ClientResult<Vec<GrowthPoint>> {
        ApiClient::user_growth(self, filter).await
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum BatchRequest {
    Jobs,
    JobCategories,
    VerificationCounts,
    TeamMemberStats,
    Applicants,
    TeamRoster,
    UsersCount,
    UserGrowth,
}

const ELITE_TEAM_BATCH: &[BatchRequest] = &[
    BatchRequest::Jobs,
    BatchRequest::JobCategories,
    BatchRequest::VerificationCounts,
    BatchRequest::TeamMemberStats,
];

const FULL_BATCH: &[BatchRequest] = &[
    BatchRequest::Jobs,
    BatchRequest::JobCategories,
    BatchRequest::VerificationCounts,
    BatchRequest::TeamMemberStats,
    BatchRequest::Applicants,
    BatchRequest::TeamRoster,
    BatchRequest::UsersCount,
    BatchRequest::UserGrowth,
];

/// Requests issued for a role. Elite team members never ask for applicant,
/// roster, user-count or growth data.
pub fn batch_for(role: Option<Role>) -> &'static [BatchRequest] {
    match role {
        Some(Role::EliteTeam) => ELITE_TEAM_BATCH,
        _ => FULL_BATCH,
    }
}

pub struct DashboardAggregator {
    source: Arc<dyn DashboardSource>,
    role: Option<Role>,
    growth_filter: GrowthFilter,
    snapshot: Option<DashboardSnapshot>,
    status: ViewStatus,
}

impl DashboardAggregator {
    pub fn new(source: Arc<dyn DashboardSource>, role: Option<Role>) -> Self {
        Self {
            source,
            role,
            growth_filter: GrowthFilter::default(),
            snapshot: None,
            status: ViewStatus::Idle,
        }
    }

    pub fn with_growth_filter(mut self, filter: GrowthFilter) -> Self {
        self.growth_filter = filter;
        self
    }

    pub fn role(&self) -> Option<Role> {
        self.role
    }

    pub fn growth_filter(&self) -> GrowthFilter {
        self.growth_filter
    }

    pub fn snapshot(&self) -> Option<&DashboardSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn status(&self) -> &ViewStatus {
        &self.status
    }

    /// Issue the role's batch and replace the snapshot with the result.
    pub async fn load(&mut self) -> ClientResult<&DashboardSnapshot> {
        self.status = ViewStatus::Loading;
        tracing::debug!("Loading dashboard batch {:?}", batch_for(self.role));

        let result = match self.role {
            Some(Role::EliteTeam) => self.load_elite_team().await,
            _ => self.load_full().await,
        };

        match result {
            Ok(snapshot) => {
                self.status = ViewStatus::Ready;
                Ok(&*self.snapshot.insert(snapshot))
            }
            Err(err) => {
                self.snapshot = None;
                self.status = match &err {
                    ClientError::AuthExpired => ViewStatus::Idle,
                    other => ViewStatus::Error {
                        message: other.to_string(),
                        inline: false,
                    },
                };
                tracing::warn!("Dashboard batch failed: {}", err);
                Err(err)
            }
        }
    }

    async fn load_elite_team(&self) -> ClientResult<DashboardSnapshot> {
        let source = self.source.as_ref();
        let (jobs, categories, verification, members) = futures::join!(
            source.jobs_overview(),
            source.job_categories(),
            source.verification_counts(),
            source.team_member_stats(),
        );

        let mut snapshot = DashboardSnapshot::empty(self.role);
        snapshot.job_counts = JobCounts::from_page(&jobs?);
        snapshot.category_breakdown = categories?;
        snapshot.verification_counts = verification?;
        snapshot.team_member_stats = rank_members(members?);
        Ok(snapshot)
    }

    async fn load_full(&self) -> ClientResult<DashboardSnapshot> {
        let source = self.source.as_ref();
        let filter = self.growth_filter;
        let (jobs, categories, verification, members, applicants, roster, users, growth) = futures::join!(
            source.jobs_overview(),
            source.job_categories(),
            source.verification_counts(),
            source.team_member_stats(),
            source.applicants_overview(),
            source.team_roster(),
            source.users_count(),
            source.user_growth(&filter),
        );

        let mut snapshot = DashboardSnapshot::empty(self.role);
        snapshot.job_counts = JobCounts::from_page(&jobs?);
        snapshot.category_breakdown = categories?;
        snapshot.verification_counts = verification?;
        snapshot.team_member_stats = rank_members(members?);
        snapshot.applicant_counts = ApplicantCounts::from_page(&applicants?);
        snapshot.team_size = roster?.len() as u64;
        snapshot.total_users = users?.total;
        snapshot.user_growth = growth?;
        Ok(snapshot)
    }

    /// Change the growth chart's role/period. Re-fetches only the growth
    /// series, and only when a loaded dashboard shows it. Returns whether a
    /// request was issued.
    ///
    /// The new filter is kept only once its series has arrived, so after a
    /// failure the same filter can be requested again.
    pub async fn set_growth_filter(&mut self, filter: GrowthFilter) -> ClientResult<bool> {
        if filter == self.growth_filter {
            return Ok(false);
        }

        if !batch_for(self.role).contains(&BatchRequest::UserGrowth) || self.snapshot.is_none() {
            // Picked up by the next full load
            self.growth_filter = filter;
            return Ok(false);
        }

        match self.source.user_growth(&filter).await {
            Ok(series) => {
                self.growth_filter = filter;
                if let Some(snapshot) = self.snapshot.as_mut() {
                    snapshot.user_growth = series;
                }
                Ok(true)
            }
            Err(err) => {
                if err.is_auth_expired() {
                    self.snapshot = None;
                    self.status = ViewStatus::Idle;
                }
                tracing::warn!("Growth series for {:?} failed: {}", filter, err);
                Err(err)
            }
        }
    }
}
