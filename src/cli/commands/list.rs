use std::sync::Arc;

use clap::Args;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::api::models::{Applicant, ImportRecord, Job};
use crate::cli::utils::{format_row, output_empty_collection, output_error, output_json};
use crate::cli::{Context, OutputFormat};
use crate::list::screens::{APPLICANTS, IMPORTS, JOBS, TEAM_POSTED_JOBS};
use crate::list::{ApiListSource, FetchOutcome, ListController, ListQuery, ListScreen, ListView, ViewStatus};

#[derive(Args, Debug, Clone, Default)]
pub struct ListArgs {
    #[arg(long, help = "Query string as it appears in the dashboard URL, e.g. \"status=open&page=2\"")]
    pub query: Option<String>,

    #[arg(long, help = "Page number")]
    pub page: Option<u32>,

    #[arg(long = "filter", value_name = "NAME=VALUE", help = "Filter by name (repeatable)")]
    pub filters: Vec<String>,
}

/// One-line text rendering of a list item
pub trait ListRow {
    fn cells(&self) -> Vec<String>;
    fn widths() -> &'static [usize];
}

impl ListRow for Job {
    fn cells(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.title.clone(),
            self.company.clone(),
            self.status.clone().unwrap_or_default(),
            self.verification_status.clone().unwrap_or_default(),
        ]
    }

    fn widths() -> &'static [usize] {
        &[24, 32, 20, 10, 10]
    }
}

impl ListRow for Applicant {
    fn cells(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.name.clone(),
            self.email.clone(),
            self.job_title.clone().unwrap_or_default(),
            self.status.clone().unwrap_or_default(),
        ]
    }

    fn widths() -> &'static [usize] {
        &[24, 24, 28, 24, 12]
    }
}

impl ListRow for ImportRecord {
    fn cells(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.file_name.clone(),
            self.import_type.clone().unwrap_or_default(),
            self.status.clone().unwrap_or_default(),
            self.rows.to_string(),
        ]
    }

    fn widths() -> &'static [usize] {
        &[24, 32, 12, 12, 8]
    }
}

pub async fn jobs(ctx: &Context, args: ListArgs, output_format: OutputFormat) -> anyhow::Result<()> {
    show::<Job>(ctx, &JOBS, None, args, output_format).await
}

pub async fn applicants(ctx: &Context, args: ListArgs, output_format: OutputFormat) -> anyhow::Result<()> {
    show::<Applicant>(ctx, &APPLICANTS, None, args, output_format).await
}

pub async fn team_jobs(ctx: &Context, member_id: &str, args: ListArgs, output_format: OutputFormat) -> anyhow::Result<()> {
    show::<Job>(ctx, &TEAM_POSTED_JOBS, Some(member_id), args, output_format).await
}

pub async fn imports(ctx: &Context, args: ListArgs, output_format: OutputFormat) -> anyhow::Result<()> {
    show::<ImportRecord>(ctx, &IMPORTS, None, args, output_format).await
}

/// Location a browser would hold for these arguments
pub fn build_location(screen: &ListScreen, id: Option<&str>, args: &ListArgs) -> anyhow::Result<String> {
    let mut query = ListQuery::from_query_string(screen, args.query.as_deref().unwrap_or_default());

    for raw in &args.filters {
        let (name, value) = raw
            .split_once('=')
            .ok_or_else(|| anyhow::anyhow!("Filter '{}' must look like NAME=VALUE", raw))?;
        query.set_filter(screen, name.trim(), value.trim()).map_err(|e| {
            anyhow::anyhow!("{} (available: {})", e, screen.filter_names().join(", "))
        })?;
    }
    if let Some(page) = args.page {
        query.page = page.max(1);
    }

    let path = screen.resolve_path(id);
    let query = query.to_query_string(screen);
    Ok(if query.is_empty() { path } else { format!("{}?{}", path, query) })
}

async fn show<T>(
    ctx: &Context,
    screen: &'static ListScreen,
    id: Option<&str>,
    args: ListArgs,
    output_format: OutputFormat,
) -> anyhow::Result<()>
where
    T: ListRow + DeserializeOwned + Serialize + Clone + Send + Sync + 'static,
{
    let location = build_location(screen, id, &args)?;
    if let Err(destination) = ctx.enter(&location) {
        anyhow::bail!("Access to {} denied; redirected to {}", screen.resolve_path(id), destination);
    }

    let controller = ListController::<T>::initialize_from_url(screen, &location);
    let source = Arc::new(ApiListSource::for_screen(ctx.client.clone(), screen, id));
    let view = ListView::new(controller, source);

    if let FetchOutcome::Failed(e) = view.mount().await {
        if !e.is_auth_expired() {
            output_error(&output_format, &e.to_string(), Some(e.error_code()))?;
        }
        return Err(e.into());
    }

    let snapshot = view.snapshot().await;
    if let OutputFormat::Json = output_format {
        return output_json(&snapshot);
    }

    if snapshot.status == ViewStatus::Empty {
        output_empty_collection(&output_format, screen.name, &format!("No {} found", screen.name))?;
    } else {
        for item in &snapshot.items {
            let cells = item.cells();
            let cells: Vec<&str> = cells.iter().map(String::as_str).collect();
            println!("{}", format_row(&cells, T::widths()));
        }
    }

    let state = &snapshot.state;
    println!(
        "Page {}/{} ({} total)",
        state.page,
        state.total_pages.max(1),
        state.total_items
    );
    println!("Location: {}", snapshot.location);
    Ok(())
}
