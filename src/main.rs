// src/main.rs

use anyhow::{Context, Result};
use chrono::{Local, NaiveDateTime};
use clap::{Parser, Subcommand};
use linkviz::{
    analyze::analyze_all,
    benchmark::{self, klaviyo, shopify},
    config::Config,
    export::{load_export, parse_all},
    output::{emit_json, write_json},
    report::{self, read_theme, Render},
    sanitize::sanitize_all,
};
use serde::Serialize;
use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "linkviz")]
#[command(about = "Parse, analyze, sanitize and visualize a LinkedIn data export")]
#[command(version)]
struct Cli {
    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// YAML config file
    #[arg(long, global = true, env = "LINKVIZ_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse an export folder into one JSON document
    Parse {
        folder: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Run every analysis over parsed JSON
    Analyze {
        input: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Replace personal data with fakes, optionally rendering a demo
    Sanitize {
        /// Parsed JSON file or export folder
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        output: PathBuf,
        #[arg(long)]
        templates: Option<PathBuf>,
        #[arg(long)]
        theme: Option<PathBuf>,
        /// Skip the demo pages
        #[arg(long)]
        json_only: bool,
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Render HTML pages from analysis JSON
    Render {
        #[arg(long)]
        templates: PathBuf,
        #[arg(long)]
        data: PathBuf,
        #[arg(long)]
        output: PathBuf,
        #[arg(long)]
        theme: Option<PathBuf>,
        #[arg(long)]
        dashboard_only: bool,
    },

    /// Parse, analyze and render in one go
    Run {
        folder: PathBuf,
        #[arg(long)]
        output: PathBuf,
        #[arg(long)]
        templates: Option<PathBuf>,
        #[arg(long)]
        theme: Option<PathBuf>,
        /// Sanitize before analyzing
        #[arg(long)]
        sanitize: bool,
    },

    /// Rate exported e-commerce marketing data against industry benchmarks
    #[command(subcommand)]
    Benchmark(BenchmarkCommand),
}

#[derive(Subcommand)]
enum BenchmarkCommand {
    /// Audit an exported Klaviyo account (flows, segments, lists, campaigns)
    Klaviyo {
        /// Account JSON
        #[arg(long)]
        input: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Reporting window named in the campaign section
        #[arg(long, default_value_t = 30)]
        days: u32,
    },

    /// Assess Shopify store metrics given as a JSON object of name to value
    Shopify {
        #[arg(long)]
        input: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // ─── 1) init logging ─────────────────────────────────────────────
    let default_level = if cli.verbose { "debug" } else { "info" };
    let env =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();

    // ─── 2) load config ──────────────────────────────────────────────
    let cfg = Config::load(cli.config.as_deref())?;
    let now = Local::now().naive_local();

    // ─── 3) dispatch ─────────────────────────────────────────────────
    match cli.command {
        Commands::Parse { folder, output } => {
            if !folder.is_dir() {
                anyhow::bail!("export folder not found: {}", folder.display());
            }
            let export = parse_all(&folder);
            emit_json(output.as_deref(), &export)
        }
        Commands::Analyze { input, output } => {
            let export = load_export(&input)?;
            let analysis = analyze_all(&export, &cfg, now);
            emit_json(output.as_deref(), &analysis)
        }
        Commands::Sanitize {
            input,
            output,
            templates,
            theme,
            json_only,
            seed,
        } => {
            let export = load_export(&input)?;
            let sanitized = sanitize_all(&export, &cfg.keywords, seed.unwrap_or(cfg.seed));
            write_json(&output.join("sanitized-data.json"), &sanitized)?;

            match (json_only, templates) {
                (true, _) => {}
                (false, Some(templates)) => {
                    let analysis = analyze_all(&sanitized, &cfg, now);
                    render_all(
                        &templates,
                        &output.join("demo"),
                        &analysis,
                        theme.as_deref(),
                        now,
                    )?;
                }
                (false, None) => {
                    info!("no --templates given, skipping demo pages");
                }
            }
            Ok(())
        }
        Commands::Render {
            templates,
            data,
            output,
            theme,
            dashboard_only,
        } => {
            let text = fs::read_to_string(&data)
                .with_context(|| format!("reading {}", data.display()))?;
            let value: serde_json::Value = serde_json::from_str(&text)
                .with_context(|| format!("parsing {}", data.display()))?;
            if let Some(obj) = value.as_object() {
                info!(keys = obj.len(), "loaded analysis data");
            }

            if dashboard_only {
                let css = read_theme(theme.as_deref())?;
                let render = Render {
                    template_dir: &templates,
                    output_dir: &output,
                    data: &value,
                    theme_css: &css,
                    generated_at: now,
                };
                report::generate_dashboard(&render)?;
                Ok(())
            } else {
                render_all(&templates, &output, &value, theme.as_deref(), now)
            }
        }
        Commands::Run {
            folder,
            output,
            templates,
            theme,
            sanitize,
        } => {
            if !folder.is_dir() {
                anyhow::bail!("export folder not found: {}", folder.display());
            }
            let mut export = parse_all(&folder);
            if sanitize {
                export = sanitize_all(&export, &cfg.keywords, cfg.seed);
            }
            let analysis = analyze_all(&export, &cfg, now);
            write_json(&output.join("analysis.json"), &analysis)?;

            match templates {
                Some(templates) => {
                    render_all(&templates, &output, &analysis, theme.as_deref(), now)
                }
                None => {
                    info!("no --templates given, skipping HTML");
                    Ok(())
                }
            }
        }
        Commands::Benchmark(BenchmarkCommand::Klaviyo {
            input,
            output,
            days,
        }) => {
            let account: klaviyo::Account = benchmark::load_json(&input)?;
            emit_json(output.as_deref(), &klaviyo::audit_account(&account, days))
        }
        Commands::Benchmark(BenchmarkCommand::Shopify { input, output }) => {
            let metrics: BTreeMap<String, f64> = benchmark::load_json(&input)?;
            emit_json(output.as_deref(), &shopify::assess_store(&metrics))
        }
    }
}

fn render_all<T: Serialize + ?Sized>(
    templates: &Path,
    output: &Path,
    data: &T,
    theme: Option<&Path>,
    now: NaiveDateTime,
) -> Result<()> {
    let css = read_theme(theme)?;
    let render = Render {
        template_dir: templates,
        output_dir: output,
        data,
        theme_css: &css,
        generated_at: now,
    };
    let generated = report::generate_all(&render)?;
    match &generated.dashboard {
        Some(p) => info!(pages = generated.individual.len(), dashboard = %p.display(), "render complete"),
        None => warn!(pages = generated.individual.len(), "render complete without a dashboard"),
    }
    Ok(())
}
