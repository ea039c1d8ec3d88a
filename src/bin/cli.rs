//! Reportview CLI
//!
//! Command-line interface for offline report work:
//! - Render a reports file to an HTML page or JSON
//! - Render a single chart spec to SVG
//! - Sanitize markup
//! - Fetch from an upstream reports API
//! - Generate a default config file

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use std::io::Read;
use std::path::{Path, PathBuf};

use reportview::config::{Config, LoggingConfig};
use reportview::dispatch::Dispatcher;
use reportview::logging::{init_tracing, with_bootstrap_tracing, TracingLog};
use reportview::render::{ChartRenderer, RenderSurface};
use reportview::report::{ChartSpec, ItemSummary, ReportsResponse};
use reportview::sanitize::{HtmlSanitizer, Sanitize};
use reportview::source::{HttpReportSource, ReportSource};
use reportview::view::{render_items, render_page, PageParts};

#[derive(Parser)]
#[command(name = "reportview-cli")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Render dashboard reports to SVG and sanitized HTML")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: search the standard locations)
    #[arg(short = 'c', long = "config", global = true)]
    pub config_file: Option<PathBuf>,

    /// Log level for diagnostics on stderr
    #[arg(long, default_value = "warn", global = true)]
    pub log_level: String,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Html,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render a reports file (`{"items": [...]}`)
    Render {
        /// Path to the reports JSON file
        input: PathBuf,
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Output format
        #[arg(short, long, value_enum, default_value = "html")]
        format: OutputFormat,
    },

    /// Render one chart spec to SVG
    Chart {
        /// Path to the chart spec JSON (bare or `{"chart": ...}`)
        input: PathBuf,
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Chart id written into the SVG
        #[arg(long, default_value = "chart")]
        id: String,
    },

    /// Sanitize HTML from a file or stdin
    Sanitize {
        /// Input file (default: stdin)
        input: Option<PathBuf>,
    },

    /// Fetch items from the upstream reports API
    Fetch {
        /// Base URL (default: from config)
        #[arg(long)]
        url: Option<String>,
        /// Bearer token (default: from config)
        #[arg(long)]
        token: Option<String>,
        /// Print the raw response instead of a summary
        #[arg(long)]
        raw: bool,
    },

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

    let config = match &cli.config_file {
        Some(path) => Config::load_with_env(path)
            .with_context(|| format!("loading config from {:?}", path))?,
        None => with_bootstrap_tracing(&cli.log_level, Config::load_default),
    };

    init_tracing(&LoggingConfig {
        level: cli.log_level.clone(),
        format: config.logging.format.clone(),
    });

    match cli.command {
        Commands::Render {
            input,
            output,
            format,
        } => {
            let content = std::fs::read(&input)
                .with_context(|| format!("reading {:?}", input))?;
            let response: ReportsResponse = serde_json::from_slice(&content)
                .with_context(|| format!("{:?} is not a reports file", input))?;

            let dispatcher = Dispatcher::from_config(&config, TracingLog::shared());
            let state = render_items(response.into_items(), &dispatcher);

            for skipped in &state.last_report.skipped {
                tracing::info!(index = skipped.index, reason = ?skipped.reason, "Item skipped");
            }

            let rendered = match format {
                OutputFormat::Html => render_page(&PageParts::from(&state)),
                OutputFormat::Json => serde_json::to_string_pretty(&state.snapshot(0))?,
            };
            write_output(output.as_deref(), &rendered)?;
        }

        Commands::Chart { input, output, id } => {
            let content = std::fs::read_to_string(&input)
                .with_context(|| format!("reading {:?}", input))?;
            let spec = ChartSpec::from_chart_data(&content)?;

            let mut surface = RenderSurface::new(id);
            ChartRenderer::from_config(&config.render).render(&mut surface, &spec)?;
            write_output(output.as_deref(), &surface.to_svg())?;
        }

        Commands::Sanitize { input } => {
            let raw = match input {
                Some(path) => std::fs::read_to_string(&path)
                    .with_context(|| format!("reading {:?}", path))?,
                None => {
                    let mut buf = String::new();
                    std::io::stdin().read_to_string(&mut buf)?;
                    buf
                }
            };
            let clean = HtmlSanitizer::from_config(&config.sanitizer).sanitize(&raw);
            println!("{}", clean);
        }

        Commands::Fetch { url, token, raw } => {
            let mut source_config = config.source.clone();
            if let Some(url) = url {
                source_config.url = url;
            }
            if token.is_some() {
                source_config.auth_token = token;
            }

            let source = HttpReportSource::new(&source_config)?;
            eprintln!("Fetching {}", source.describe());
            let response = source.fetch_reports().await?;

            if raw {
                println!("{}", serde_json::to_string_pretty(&response)?);
            } else {
                let items = response.into_items();
                if items.is_empty() {
                    bail!("source returned no items");
                }
                println!("{:<6} {:<10} {:<24} {}", "INDEX", "TYPE", "ID", "VALID");
                println!("{}", "-".repeat(48));
                for (index, item) in items.iter().enumerate() {
                    let summary = ItemSummary::of(index, item);
                    println!(
                        "{:<6} {:<10} {:<24} {}",
                        summary.index,
                        summary.kind.as_deref().unwrap_or("-"),
                        summary.id.as_deref().unwrap_or("-"),
                        if summary.valid { "yes" } else { "no" }
                    );
                }
            }
        }

        Commands::Config { output } => {
            let config = reportview::config::generate_default_config();

            match output {
                Some(path) => {
                    // Create parent directory if needed
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

fn write_output(path: Option<&Path>, content: &str) -> anyhow::Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content).with_context(|| format!("writing {:?}", path))?;
            eprintln!("Wrote {:?}", path);
        }
        None => println!("{}", content),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_render() {
        let cli = Cli::parse_from(["reportview-cli", "render", "items.json", "-f", "json"]);
        assert!(matches!(
            cli.command,
            Commands::Render {
                format: OutputFormat::Json,
                ..
            }
        ));
    }
}
