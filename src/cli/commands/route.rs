use clap::Subcommand;
use serde_json::json;

use crate::cli::utils::output_json;
use crate::cli::{Context, OutputFormat};
use crate::guard::GuardDecision;

#[derive(Subcommand)]
pub enum RouteCommands {
    #[command(about = "Show what the stored session gets when navigating to a path")]
    Check {
        #[arg(help = "Path, e.g. /applicants or /jobs?page=2")]
        path: String,
    },

    #[command(about = "List every route and the roles allowed on it")]
    Table,
}

pub async fn handle(ctx: &Context, cmd: RouteCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        RouteCommands::Check { path } => {
            let decision = ctx.guard.check(&ctx.store, &path);
            match output_format {
                OutputFormat::Json => output_json(&json!({ "path": path, "result": decision })),
                OutputFormat::Text => {
                    match decision {
                        GuardDecision::Render => println!("{}: allowed", path),
                        GuardDecision::Redirect(destination) => {
                            println!("{}: redirect to {}", path, destination)
                        }
                    }
                    Ok(())
                }
            }
        }
        RouteCommands::Table => {
            let rules = ctx.guard.table().rules();
            match output_format {
                OutputFormat::Json => {
                    let rows: Vec<_> = rules
                        .iter()
                        .map(|rule| {
                            json!({
                                "path": rule.path,
                                "publicOnly": rule.public_only,
                                "allowedRoles": rule.allowed_roles,
                            })
                        })
                        .collect();
                    output_json(&rows)
                }
                OutputFormat::Text => {
                    for rule in rules {
                        let roles = if rule.public_only {
                            "signed-out only".to_string()
                        } else if rule.allowed_roles.is_empty() {
                            "any signed-in user".to_string()
                        } else {
                            rule.allowed_roles
                                .iter()
                                .map(|r| r.as_str())
                                .collect::<Vec<_>>()
                                .join(", ")
                        };
                        println!("{:<20} {}", rule.path, roles);
                    }
                    Ok(())
                }
            }
        }
    }
}
