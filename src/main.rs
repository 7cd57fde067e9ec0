//! Frame SPA CLI
//!
//! Command-line interface for inspecting a configured route table:
//! - Resolve paths headlessly and show what would be mounted
//! - List routes
//! - Generate a default config file

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde_json::{json, Value};

use frame_spa::config::{generate_default_config, init_logging, Config};
use frame_spa::document::{Document, MemoryDocument};
use frame_spa::history::{empty_state, History, MemoryHistory};
use frame_spa::{Application, RouteOutcome};

#[derive(Parser)]
#[command(name = "frame-spa")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Headless single-page-application router")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: search the standard locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format (table, json)
    #[arg(short, long, default_value = "table", global = true)]
    pub format: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Route each path through the configured table and print the result
    Resolve {
        /// Paths to resolve, in order (query strings allowed)
        #[arg(required = true)]
        paths: Vec<String>,
    },

    /// List configured routes in match order
    Routes,

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    init_logging(&config.logging);

    match cli.command {
        Commands::Resolve { paths } => {
            let history: Arc<dyn History> = Arc::new(MemoryHistory::new());
            let document = Arc::new(MemoryDocument::with_container(config.app.target.clone()));
            let app = Application::from_config(
                &config,
                history,
                Arc::clone(&document) as Arc<dyn Document>,
            )
            .context("Failed to build route table")?;

            let mut results = Vec::with_capacity(paths.len());
            for path in &paths {
                let outcome = app.navigate_to(path, &Value::Null, empty_state()).await;
                let location = app.router().location().href();

                let entry = match outcome {
                    Ok(RouteOutcome::Rendered(ctx)) => json!({
                        "path": path,
                        "location": location,
                        "route": ctx.route_path(),
                        "params": ctx.params(),
                        "title": ctx.title(),
                        "content": document.content(&config.app.target)?,
                    }),
                    Ok(RouteOutcome::Vetoed { route }) => json!({
                        "path": path,
                        "location": location,
                        "route": route,
                        "error": "vetoed",
                    }),
                    Ok(RouteOutcome::Superseded(ctx)) => json!({
                        "path": path,
                        "location": location,
                        "route": ctx.route_path(),
                        "error": "superseded",
                    }),
                    Err(e) => json!({
                        "path": path,
                        "location": location,
                        "error": e.to_string(),
                    }),
                };
                results.push(entry);
            }

            match cli.format.as_str() {
                "json" => println!("{}", serde_json::to_string_pretty(&results)?),
                _ => print_resolved(&results),
            }
        }

        Commands::Routes => {
            let history: Arc<dyn History> = Arc::new(MemoryHistory::new());
            let document: Arc<dyn Document> = Arc::new(MemoryDocument::new());
            let app = Application::from_config(&config, history, document)
                .context("Failed to build route table")?;

            match cli.format.as_str() {
                "json" => {
                    let routes: Vec<&str> = app.routes().iter().map(|r| r.path()).collect();
                    println!("{}", serde_json::to_string_pretty(&routes)?);
                }
                _ => {
                    println!("Target: {}", app.target());
                    println!("Matching: {:?}", config.router.param_matching);
                    println!();
                    println!("{:<4} {}", "#", "Route");
                    println!("{}", "-".repeat(40));
                    for (i, route) in app.routes().iter().enumerate() {
                        let marker = if Application::is_not_found_route(route) {
                            " (not found)"
                        } else {
                            ""
                        };
                        println!("{:<4} {}{}", i, route.path(), marker);
                    }
                }
            }
        }

        Commands::Config { output } => {
            let config = generate_default_config();

            match output {
                Some(path) => {
                    if let Some(parent) = path.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(&path, &config)?;
                    println!("Config written to {:?}", path);
                }
                None => {
                    print!("{}", config);
                }
            }
        }
    }

    Ok(())
}

fn print_resolved(results: &[Value]) {
    println!(
        "{:<30} {:<25} {:<20} {}",
        "Path", "Route", "Title", "Content"
    );
    println!("{}", "-".repeat(100));

    for entry in results {
        let field = |name: &str| entry.get(name).and_then(Value::as_str).unwrap_or("-");
        let content = match entry.get("error").and_then(Value::as_str) {
            Some(error) => format!("error: {}", error),
            None => truncate(field("content"), 40),
        };
        println!(
            "{:<30} {:<25} {:<20} {}",
            field("path"),
            field("route"),
            field("title"),
            content
        );
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}
