//! R-Droid command line
//!
//! Builds Android modules and inspects their manifests and resources.

use std::path::PathBuf;
use anyhow::Result;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use r_droid_android_support::build::ApkAnalyzer;
use r_droid_android_support::commands::{
    BuildCommand, DrawableCommand, DrawablesCommand, ManifestCommand, ResourcesCommand,
};
use r_droid_android_support::core::{APP_NAME, VERSION};

/// R-Droid Android project support
#[derive(Parser)]
#[command(name = "rdroid")]
#[command(about = "Package Android modules and inspect their resources")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Project root directory (defaults to current directory)
    #[arg(short, long, global = true)]
    project: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Package Android modules into APKs
    Build {
        /// Module to build; repeat for several (default: all)
        #[arg(short, long)]
        module: Vec<String>,

        /// Package modules even when nothing changed
        #[arg(long)]
        force: bool,
    },

    /// List declared resources of one type (string, drawable, color, style)
    Resources {
        module: String,
        resource_type: String,
    },

    /// Resolve a drawable to its file
    Drawable {
        module: String,
        name: String,
    },

    /// List drawable names
    Drawables {
        module: String,
    },

    /// Show and validate a module's manifest
    Manifest {
        module: String,
    },
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("warn")
        }
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    info!("{} v{}", APP_NAME, VERSION);

    let project_path = match cli.project {
        Some(path) => path,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::Build { module, force } => {
            let outcome = BuildCommand {
                project_path,
                modules: module,
                force,
            }
            .execute()
            .await?;

            if cli.json {
                print_json(&outcome)?;
            } else {
                for message in &outcome.report.messages {
                    println!("{}", message);
                }
                for package in &outcome.packages {
                    println!(
                        "Built {} ({}, {} entries)",
                        package.path.display(),
                        ApkAnalyzer::format_size(package.size),
                        package.entries
                    );
                }
                for name in &outcome.report.skipped {
                    println!("{} is up to date", name);
                }
                println!(
                    "{} packaged, {} up to date, {} failed, {} errors",
                    outcome.report.processed.len(),
                    outcome.report.skipped.len(),
                    outcome.report.failed.len(),
                    outcome.report.error_count()
                );
            }

            if !outcome.report.succeeded() {
                std::process::exit(1);
            }
        }
        Commands::Resources { module, resource_type } => {
            let resources = ResourcesCommand {
                project_path,
                module,
                resource_type,
            }
            .execute()?;

            if cli.json {
                print_json(&resources)?;
            } else {
                for resource in &resources {
                    println!("{} = {}", resource.name(), resource.value);
                }
            }
        }
        Commands::Drawable { module, name } => {
            let file = DrawableCommand {
                project_path,
                module,
                name: name.clone(),
            }
            .execute()?;

            match file {
                Some(path) if cli.json => print_json(&path)?,
                Some(path) => println!("{}", path.display()),
                None => {
                    eprintln!("Drawable {} not found", name);
                    std::process::exit(1);
                }
            }
        }
        Commands::Drawables { module } => {
            let names = DrawablesCommand { project_path, module }.execute()?;
            if cli.json {
                print_json(&names)?;
            } else {
                for name in names {
                    println!("{}", name);
                }
            }
        }
        Commands::Manifest { module } => {
            let summary = ManifestCommand { project_path, module }.execute()?;
            if cli.json {
                print_json(&summary)?;
            } else {
                println!("package: {}", summary.package);
                if let Some(ref activity) = summary.main_activity {
                    println!("main activity: {}", activity);
                }
                for permission in &summary.permissions {
                    println!("uses-permission: {}", permission);
                }
                for component in &summary.components {
                    println!("{}", component);
                }
                for problem in &summary.problems {
                    let position = problem
                        .position
                        .map(|p| format!("{}:{}: ", p.line, p.column))
                        .unwrap_or_default();
                    println!(
                        "{}{:?}: <{} android:{}> {}",
                        position, problem.severity, problem.element, problem.attribute, problem.message
                    );
                }
            }
        }
    }

    Ok(())
}
