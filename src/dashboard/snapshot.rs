use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::api::models::{Applicant, GrowthPoint, Job, JobCategory, TeamMemberStat, VerificationCounts};
use crate::api::Page;
use crate::session::Role;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobCounts {
    pub total: u64,
    /// Active jobs within the overview window
    pub active: u64,
    /// Inactive jobs within the same window; `active + inactive` may be below `total`
    pub inactive: u64,
}

impl JobCounts {
    pub fn from_page(page: &Page<Job>) -> Self {
        let total = page.pagination.total_items.max(page.items.len() as u64);
        let window = page.items.len() as u64;
        let active = page.items.iter().filter(|job| job.is_active()).count() as u64;
        Self {
            total,
            active,
            inactive: window - active,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicantCounts {
    pub total: u64,
    /// Applicants in the overview window with a `shortlisted` status
    pub shortlisted: u64,
}

impl ApplicantCounts {
    pub fn from_page(page: &Page<Applicant>) -> Self {
        Self {
            total: page.pagination.total_items.max(page.items.len() as u64),
            shortlisted: page
                .items
                .iter()
                .filter(|a| a.status.as_deref() == Some("shortlisted"))
                .count() as u64,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GrowthPeriod {
    Week,
    #[default]
    Month,
    Year,
}

impl GrowthPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            GrowthPeriod::Week => "week",
            GrowthPeriod::Month => "month",
            GrowthPeriod::Year => "year",
        }
    }
}

impl fmt::Display for GrowthPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GrowthPeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "week" | "weekly" => Ok(GrowthPeriod::Week),
            "month" | "monthly" => Ok(GrowthPeriod::Month),
            "year" | "yearly" => Ok(GrowthPeriod::Year),
            other => Err(format!("unknown period '{}' (expected week, month or year)", other)),
        }
    }
}

/// Role/period selection for the user-growth chart. `role: None` means all users.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GrowthFilter {
    pub role: Option<Role>,
    pub period: GrowthPeriod,
}

impl GrowthFilter {
    pub fn new(role: Option<Role>, period: GrowthPeriod) -> Self {
        Self { role, period }
    }

    pub fn to_params(&self) -> Vec<(String, String)> {
        vec![
            (
                "role".to_string(),
                self.role.map_or("all", |r| r.as_str()).to_string(),
            ),
            ("period".to_string(), self.period.as_str().to_string()),
        ]
    }
}

/// Display-ready statistics. Rebuilt from scratch on every full load.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    pub role: Option<Role>,
    pub job_counts: JobCounts,
    pub verification_counts: VerificationCounts,
    pub applicant_counts: ApplicantCounts,
    /// Ordered by job count, highest first
    pub team_member_stats: Vec<TeamMemberStat>,
    pub team_size: u64,
    pub total_users: u64,
    pub user_growth: Vec<GrowthPoint>,
    pub category_breakdown: Vec<JobCategory>,
    pub generated_at: DateTime<Utc>,
}

impl DashboardSnapshot {
    pub fn empty(role: Option<Role>) -> Self {
        Self {
            role,
            job_counts: JobCounts::default(),
            verification_counts: VerificationCounts::default(),
            applicant_counts: ApplicantCounts::default(),
            team_member_stats: Vec::new(),
            team_size: 0,
            total_users: 0,
            user_growth: Vec::new(),
            category_breakdown: Vec::new(),
            generated_at: Utc::now(),
        }
    }
}

pub(crate) fn rank_members(mut stats: Vec<TeamMemberStat>) -> Vec<TeamMemberStat> {
    stats.sort_by(|a, b| b.job_count.cmp(&a.job_count).then_with(|| a.name.cmp(&b.name)));
    stats
}
