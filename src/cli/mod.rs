pub mod commands;
pub mod utils;

use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::api::ApiClient;
use crate::config::AppConfig;
use crate::guard::{Guard, GuardDecision};
use crate::navigation::{Destination, Navigator, TerminalNavigator};
use crate::session::SessionStore;

#[derive(Parser)]
#[command(name = "jobboard")]
#[command(about = "Job-board admin CLI - manage jobs, applicants, team and imports")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Sign in, sign out and inspect the stored session")]
    Auth {
        #[command(subcommand)]
        cmd: commands::auth::AuthCommands,
    },

    #[command(about = "List job postings")]
    Jobs(commands::list::ListArgs),

    #[command(about = "List applicants")]
    Applicants(commands::list::ListArgs),

    #[command(about = "List jobs posted by one team member")]
    TeamJobs {
        #[arg(help = "Team member ID")]
        member_id: String,
        #[command(flatten)]
        args: commands::list::ListArgs,
    },

    #[command(about = "List data imports")]
    Imports(commands::list::ListArgs),

    #[command(about = "Show dashboard statistics")]
    Dashboard(commands::dashboard::DashboardArgs),

    #[command(about = "Inspect route access rules")]
    Route {
        #[command(subcommand)]
        cmd: commands::route::RouteCommands,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

/// Services shared by every command
pub struct Context {
    pub store: SessionStore,
    pub client: ApiClient,
    pub guard: Guard,
    pub navigator: Arc<dyn Navigator>,
}

impl Context {
    pub fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let store = SessionStore::open(config)?;
        let navigator: Arc<dyn Navigator> = Arc::new(TerminalNavigator);
        let client = ApiClient::from_config(config, store.clone(), navigator.clone())?;
        Ok(Self {
            store,
            client,
            guard: Guard::default(),
            navigator,
        })
    }

    /// Gate a screen. On redirect the navigator is told where to go and
    /// `Err` carries the destination.
    pub fn enter(&self, path: &str) -> Result<(), Destination> {
        match self.guard.check(&self.store, path) {
            GuardDecision::Render => Ok(()),
            GuardDecision::Redirect(destination) => {
                self.navigator.navigate(destination);
                Err(destination)
            }
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);
    let ctx = Context::from_config(crate::config::config())?;

    match cli.command {
        Commands::Auth { cmd } => commands::auth::handle(&ctx, cmd, output_format).await,
        Commands::Jobs(args) => commands::list::jobs(&ctx, args, output_format).await,
        Commands::Applicants(args) => commands::list::applicants(&ctx, args, output_format).await,
        Commands::TeamJobs { member_id, args } => {
            commands::list::team_jobs(&ctx, &member_id, args, output_format).await
        }
        Commands::Imports(args) => commands::list::imports(&ctx, args, output_format).await,
        Commands::Dashboard(args) => commands::dashboard::handle(&ctx, args, output_format).await,
        Commands::Route { cmd } => commands::route::handle(&ctx, cmd, output_format).await,
    }
}
