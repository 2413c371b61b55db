// CLI Interface
//
// This module provides the command-line interface for LeMaillage.

use crate::config::{ProjectConfig, DEFAULT_CONFIG_FILE};
use crate::errors::{format_error, MaillageError};
use crate::inject::inject_links;
use crate::writer::write_reports;
use anyhow::{Context, Result as AnyhowResult};
use chrono::Utc;
use clap::{Parser, Subcommand};
use leliens::{
    build_link_intel_report_with, build_recommendations, shortfalls, EngineOptions,
};
use lerecherche::build_vector;
use leregistre::Registry;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// LeMaillage - Internal Link Intelligence
#[derive(Parser, Debug)]
#[command(name = "lemaillage")]
#[command(author = "LeMaillage Contributors")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Recommend internal links for a content registry and report on link health", long_about = None)]
pub struct Cli {
    /// Path to the project directory
    #[arg(global = true, long = "project", short = 'p')]
    pub project_path: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(global = true, long = "verbose", short = 'v')]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write the JSON report, Markdown report and links data file
    Report {
        /// Also inject the links map into the target file
        #[arg(long = "apply")]
        apply: bool,

        /// Registry JSON file (overrides lemaillage.toml)
        #[arg(long = "registry", value_name = "PATH")]
        registry: Option<PathBuf>,

        /// Output directory (overrides lemaillage.toml)
        #[arg(long = "out", value_name = "DIR")]
        out: Option<PathBuf>,

        /// Injection target (overrides lemaillage.toml)
        #[arg(long = "target", value_name = "FILE")]
        target: Option<PathBuf>,

        /// Score pages in parallel
        #[arg(long = "parallel")]
        parallel: bool,
    },

    /// Show the recommendations and blocked list of one page
    Show {
        /// Page URL as it appears in the registry
        #[arg(value_name = "URL")]
        url: String,

        /// Registry JSON file (overrides lemaillage.toml)
        #[arg(long = "registry", value_name = "PATH")]
        registry: Option<PathBuf>,
    },

    /// Write a default lemaillage.toml
    Init {
        /// Overwrite an existing file
        #[arg(long = "force")]
        force: bool,
    },
}

impl Cli {
    /// Run the CLI
    pub fn run(self) -> AnyhowResult<()> {
        init_logging(self.verbose);

        let project = get_project_path(self.project_path)?;

        match self.command {
            Commands::Report {
                apply,
                registry,
                out,
                target,
                parallel,
            } => cmd_report(
                &project,
                ReportArgs {
                    apply,
                    registry,
                    out,
                    target,
                    parallel,
                },
            ),
            Commands::Show { url, registry } => cmd_show(&project, &url, registry),
            Commands::Init { force } => cmd_init(&project, force),
        }
    }
}

/// Initialize logging to stderr; `RUST_LOG` takes precedence over `--verbose`
pub fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Get project path from explicit path or current directory
fn get_project_path(explicit: Option<PathBuf>) -> AnyhowResult<PathBuf> {
    match explicit {
        Some(path) => Ok(path),
        None => std::env::current_dir().context("Failed to determine current directory"),
    }
}

fn load_config(project: &Path) -> AnyhowResult<ProjectConfig> {
    ProjectConfig::load(project).with_context(|| {
        format!(
            "Failed to load {}",
            project.join(DEFAULT_CONFIG_FILE).display()
        )
    })
}

fn load_registry(path: &Path) -> AnyhowResult<Registry> {
    let registry = Registry::load(path)
        .map_err(MaillageError::from)
        .with_context(|| format!("Failed to load registry {}", path.display()))?;
    info!("Loaded {} pages from {}", registry.len(), path.display());
    Ok(registry)
}

/// Flags of the `report` command
#[derive(Debug, Default)]
struct ReportArgs {
    apply: bool,
    registry: Option<PathBuf>,
    out: Option<PathBuf>,
    target: Option<PathBuf>,
    parallel: bool,
}

/// Report command implementation
fn cmd_report(project: &Path, args: ReportArgs) -> AnyhowResult<()> {
    let config = load_config(project)?;

    let registry_path = args
        .registry
        .unwrap_or_else(|| config.registry_path(project));
    let out_dir = args.out.unwrap_or_else(|| config.out_dir(project));
    let target = args.target.or_else(|| config.target_file(project));

    let registry = load_registry(&registry_path)?;
    let engine = &config.engine.recommendation;
    let options = EngineOptions {
        parallel: args.parallel || config.engine.parallel,
    };

    let report = build_link_intel_report_with(&registry, engine, options, Utc::now());
    let found = shortfalls(&report, &registry, engine);
    let written = write_reports(&out_dir, &report, &found)?;

    println!("✓ Link report complete");
    println!("  Pages: {}", report.summary.pages);
    println!("  Orphans: {}", report.summary.orphans);
    println!("  Weak: {}", report.summary.weak_pages.len());
    println!("  Over-linked: {}", report.summary.overlinked_pages.len());
    println!("  Shortfalls: {}", found.len());
    println!("  JSON: {}", written.json.display());
    println!("  Markdown: {}", written.markdown.display());
    println!("  Links data: {}", written.links.display());

    if args.apply {
        let target = target
            .ok_or_else(|| {
                MaillageError::config_error(
                    "No injection target configured",
                    Some("Pass --target FILE or set paths.target_file".to_string()),
                )
            })
            .context("Cannot apply links")?;
        inject_links(&target, &report)?;
        println!("  Injected: {}", target.display());
    } else if target.is_some() {
        println!("  Dry run: pass --apply to inject links");
    }

    Ok(())
}

/// Terms listed by `show`
const SHOW_TOP_TERMS: usize = 8;

/// Show command implementation
fn cmd_show(project: &Path, url: &str, registry: Option<PathBuf>) -> AnyhowResult<()> {
    let config = load_config(project)?;
    let registry_path = registry.unwrap_or_else(|| config.registry_path(project));
    let registry = load_registry(&registry_path)?;

    let Some(page) = registry.get(url) else {
        warn!("{url} is not in the registry");
        println!("No page with URL {url}");
        return Ok(());
    };

    let result = build_recommendations(page, &registry, &config.engine.recommendation);

    println!("{} ({}, {})", page.url, page.page_type, page.locale);

    let terms: Vec<String> = build_vector(page)
        .top_terms(SHOW_TOP_TERMS)
        .into_iter()
        .map(|(term, weight)| format!("{term} ({weight:.1})"))
        .collect();
    println!("Top terms: {}", terms.join(", "));
    println!("\nRecommendations ({}):", result.recommendations.len());
    for (i, rec) in result.recommendations.iter().enumerate() {
        println!(
            "  {}. {} [{}] {:.3} - {}",
            i + 1,
            rec.entry.url,
            rec.entry.page_type,
            rec.score,
            rec.reason
        );
    }

    println!("\nBlocked ({}):", result.blocked.len());
    for rec in &result.blocked {
        println!("  - {} {:.3}", rec.entry.url, rec.score);
    }

    Ok(())
}

/// Init command implementation
fn cmd_init(project: &Path, force: bool) -> AnyhowResult<()> {
    let path = project.join(DEFAULT_CONFIG_FILE);
    if path.exists() && !force {
        println!("{} already exists (use --force to overwrite)", path.display());
        return Ok(());
    }

    let written = ProjectConfig::default().save(project)?;
    println!("✓ Wrote {}", written.display());
    Ok(())
}

/// Main entry point for the CLI
///
/// Failures are printed to stderr with their recovery suggestion.
pub fn main() -> ExitCode {
    let cli = Cli::parse();
    match cli.run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", format_error(&e));
            ExitCode::FAILURE
        }
    }
}
