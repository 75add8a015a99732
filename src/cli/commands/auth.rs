use std::io::{self, BufRead, Write};

use clap::Subcommand;
use serde_json::json;

use crate::cli::utils::{output_error, output_json, output_success};
use crate::cli::{Context, OutputFormat};
use crate::guard::{home_for, GuardDecision};
use crate::navigation::Destination;

#[derive(Subcommand)]
pub enum AuthCommands {
    #[command(about = "Login to the admin API")]
    Login {
        #[arg(help = "Account email")]
        email: String,
        #[arg(long, help = "Password (will prompt if not provided)")]
        password: Option<String>,
    },

    #[command(about = "Forget the stored session")]
    Logout,

    #[command(about = "Show current authentication status")]
    Status,
}

pub async fn handle(ctx: &Context, cmd: AuthCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        AuthCommands::Login { email, password } => {
            // Login is for signed-out users only
            if let GuardDecision::Redirect(destination) = ctx.guard.check(&ctx.store, Destination::Login.path()) {
                let role = ctx.store.get_role();
                return output_success(
                    &output_format,
                    &format!(
                        "Already signed in{}; continue at {}",
                        role.map(|r| format!(" as {}", r)).unwrap_or_default(),
                        destination
                    ),
                    Some(json!({ "redirect": destination.path() })),
                );
            }

            let password = match password {
                Some(p) => p,
                None => prompt_password()?,
            };

            match ctx.client.login(&email, &password).await {
                Ok(role) => output_success(
                    &output_format,
                    &format!("Logged in as {} ({})", email, role),
                    Some(json!({ "role": role, "redirect": home_for(Some(role)).path() })),
                ),
                Err(e) => {
                    output_error(&output_format, &e.to_string(), Some(e.error_code()))?;
                    Err(e.into())
                }
            }
        }
        AuthCommands::Logout => {
            ctx.store.clear_session();
            output_success(&output_format, "Logged out", None)
        }
        AuthCommands::Status => {
            let session = ctx.store.snapshot();
            match output_format {
                OutputFormat::Json => output_json(&json!({
                    "authenticated": session.is_authenticated(),
                    "role": session.role,
                    "savedAt": session.saved_at,
                })),
                OutputFormat::Text => {
                    if session.is_authenticated() {
                        println!(
                            "Signed in as {}",
                            session.role.map(|r| r.to_string()).unwrap_or_else(|| "<unrecognized role>".to_string())
                        );
                        if let Some(saved_at) = session.saved_at {
                            println!("Since: {}", saved_at.to_rfc3339());
                        }
                    } else {
                        println!("Not signed in");
                    }
                    Ok(())
                }
            }
        }
    }
}

fn prompt_password() -> anyhow::Result<String> {
    print!("Password: ");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    let password = line.trim_end_matches(['\r', '\n']).to_string();
    if password.is_empty() {
        anyhow::bail!("Password is required");
    }
    Ok(password)
}
