use std::sync::Arc;

use clap::Args;

use crate::cli::utils::{output_error, output_json};
use crate::cli::{Context, OutputFormat};
use crate::dashboard::{DashboardAggregator, DashboardSnapshot, GrowthFilter, GrowthPeriod};
use crate::navigation::Destination;
use crate::session::Role;

#[derive(Args, Debug, Clone, Default)]
pub struct DashboardArgs {
    #[arg(long, help = "Role for the user-growth chart (jobSeeker, recruiter, ...); all users when omitted")]
    pub growth_role: Option<Role>,

    #[arg(long, default_value = "month", help = "Growth period: week, month or year")]
    pub period: GrowthPeriod,
}

pub async fn handle(ctx: &Context, args: DashboardArgs, output_format: OutputFormat) -> anyhow::Result<()> {
    if let Err(destination) = ctx.enter(Destination::Dashboard.path()) {
        anyhow::bail!("Dashboard not available; redirected to {}", destination);
    }

    let filter = GrowthFilter::new(args.growth_role, args.period);
    let mut dashboard = DashboardAggregator::new(Arc::new(ctx.client.clone()), ctx.store.get_role())
        .with_growth_filter(filter);

    let snapshot = match dashboard.load().await {
        Ok(snapshot) => snapshot,
        Err(e) => {
            if !e.is_auth_expired() {
                output_error(&output_format, &e.to_string(), Some(e.error_code()))?;
            }
            return Err(e.into());
        }
    };

    match output_format {
        OutputFormat::Json => output_json(snapshot),
        OutputFormat::Text => {
            print_text(snapshot, filter);
            Ok(())
        }
    }
}

fn print_text(snapshot: &DashboardSnapshot, filter: GrowthFilter) {
    let jobs = &snapshot.job_counts;
    println!(
        "Jobs:          {} total ({} sampled: {} active, {} inactive)",
        jobs.total,
        jobs.active + jobs.inactive,
        jobs.active,
        jobs.inactive
    );

    let v = &snapshot.verification_counts;
    println!("Verification:  {} verified, {} pending, {} rejected", v.verified, v.pending, v.rejected);

    // Elite team dashboards never load these
    if snapshot.role != Some(Role::EliteTeam) {
        println!(
            "Applicants:    {} total, {} shortlisted",
            snapshot.applicant_counts.total, snapshot.applicant_counts.shortlisted
        );
        println!("Team size:     {}", snapshot.team_size);
        println!("Users:         {}", snapshot.total_users);
    }

    if !snapshot.category_breakdown.is_empty() {
        println!("\nCategories:");
        for category in &snapshot.category_breakdown {
            println!("  {:<28} {}", category.name, category.job_count);
        }
    }

    if !snapshot.team_member_stats.is_empty() {
        println!("\nTeam members by jobs posted:");
        for member in &snapshot.team_member_stats {
            println!("  {:<28} {}", member.name, member.job_count);
        }
    }

    if !snapshot.user_growth.is_empty() {
        println!(
            "\nUser growth ({}, per {}):",
            filter.role.map_or("all users".to_string(), |r| r.to_string()),
            filter.period
        );
        for point in &snapshot.user_growth {
            println!("  {:<28} {}", point.label, point.count);
        }
    }
}
