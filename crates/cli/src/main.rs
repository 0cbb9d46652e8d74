//! Wirebind CLI - Command-line interface for Wirebind RPC servers

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use serde_json::Value;
use tabled::{Table, Tabled};
use wirebind_core::domain::{is_kebab_case, to_camel_case, to_kebab_case, to_snake_case};
use wirebind_core::Route;
use wirebind_sdk::{RpcClient, SdkError};

const DEFAULT_RPC_URL: &str = "http://127.0.0.1:9530";

#[derive(Parser)]
#[command(name = "wirebind")]
#[command(about = "Wirebind RPC CLI", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Server base URL
    #[arg(long, env = "WIREBIND_URL", default_value = DEFAULT_RPC_URL)]
    url: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Call a procedure
    Call {
        /// App name (e.g., example-test)
        app: String,

        /// Procedure name (e.g., get-output)
        procedure: String,

        /// Input as JSON string
        #[arg(short, long, default_value = "{}")]
        payload: String,
    },

    /// Show the route of a procedure
    Route {
        app: String,
        procedure: String,
    },

    /// Convert an identifier between casings
    Case {
        #[arg(value_enum)]
        style: CaseStyle,

        text: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum CaseStyle {
    Kebab,
    Snake,
    Camel,
}

#[derive(Tabled)]
struct RouteRow {
    path: String,
    method: String,
    procedure: String,
    binding: String,
}

fn convert(style: CaseStyle, text: &str) -> String {
    match style {
        CaseStyle::Kebab => to_kebab_case(text),
        CaseStyle::Snake => to_snake_case(text),
        CaseStyle::Camel => to_camel_case(text),
    }
}

fn route_row(app: &str, procedure: &str) -> RouteRow {
    let route = Route::derive(app, procedure);
    let procedure = to_kebab_case(procedure);
    RouteRow {
        path: route.path,
        method: route.methods.join(","),
        binding: format!("{}/{}.ts", to_kebab_case(app), procedure),
        procedure,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Call {
            app,
            procedure,
            payload,
        } => {
            let input: Value = serde_json::from_str(&payload).context("Invalid JSON payload")?;

            let client = RpcClient::new(&cli.url).context("Invalid server URL")?;
            match client.call_raw(&app, &procedure, &input).await {
                Ok(output) => {
                    println!("{}", "✓ Call succeeded".green().bold());
                    println!("{}", serde_json::to_string_pretty(&output)?);
                }
                Err(SdkError::Rpc {
                    status,
                    kind,
                    message,
                }) => {
                    println!("  {} {} {}", "✗".red(), status.to_string().red().bold(), kind);
                    println!("  {} {}", "Message:".bold(), message);
                    anyhow::bail!("{} {} failed with status {}", app, procedure, status);
                }
                Err(e) => {
                    return Err(e).context(format!("Failed to reach {}", cli.url));
                }
            }
        }

        Commands::Route { app, procedure } => {
            for (label, name) in [("App", &app), ("Procedure", &procedure)] {
                if !is_kebab_case(name) {
                    println!(
                        "  {} {} '{}' is not kebab-case; registration would reject it",
                        "⚠".yellow(),
                        label,
                        name
                    );
                }
            }
            let table = Table::new(vec![route_row(&app, &procedure)]).to_string();
            println!("{}", table);
        }

        Commands::Case { style, text } => {
            println!("{}", convert(style, &text));
        }
    }

    Ok(())
}
