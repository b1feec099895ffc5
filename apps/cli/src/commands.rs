//! CLI command definitions, routing, and tracing setup.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use leadenrich_core::batch::{BatchOptions, BatchSummary, run_batch};
use leadenrich_core::{EnrichedCompanyRecord, Enricher, ProgressReporter};
use leadenrich_shared::{
    AppConfig, api_key_from_env, init_config, load_config, load_config_from,
};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// leadenrich: find a company's website, revenue estimate and firmographics.
#[derive(Parser)]
#[command(
    name = "leadenrich",
    version,
    about = "Enrich company names with website, revenue and firmographic data.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file to use instead of ~/.leadenrich/leadenrich.toml.
    #[arg(long, global = true, env = "LEADENRICH_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Look up a company's estimated revenue.
    Revenue {
        /// Company name.
        company: String,
    },

    /// Find a company's official website.
    Website {
        /// Company name.
        company: String,
    },

    /// Fetch firmographic data for a website URL or domain.
    Apollo {
        /// Website URL or bare domain.
        domain: String,
    },

    /// Run every resolver for one company and print the merged record.
    Enrich {
        /// Company name.
        company: String,
    },

    /// Enrich every company in a CSV file.
    Batch {
        /// CSV file with a `Company` (or `Company Name`) column.
        csv: PathBuf,

        /// Output directory (defaults to batch.output_dir).
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Companies enriched in parallel (defaults to batch.concurrency).
        #[arg(short, long)]
        concurrency: Option<usize>,

        /// Print the run summary with all records as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags. Logs go to stderr so command
/// output on stdout stays machine-readable.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "leadenrich=info",
        1 => "leadenrich=debug",
        _ => "leadenrich=trace",
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config;
    match cli.command {
        Command::Revenue { company } => cmd_revenue(config_path, &company).await,
        Command::Website { company } => cmd_website(config_path, &company).await,
        Command::Apollo { domain } => cmd_apollo(config_path, &domain).await,
        Command::Enrich { company } => cmd_enrich(config_path, &company).await,
        Command::Batch {
            csv,
            out,
            concurrency,
            json,
        } => cmd_batch(config_path, csv, out, concurrency, json).await,
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init().await,
            ConfigAction::Show => cmd_config_show(config_path).await,
        },
    }
}

fn resolve_config(path: Option<PathBuf>) -> Result<AppConfig> {
    Ok(match path {
        Some(path) => load_config_from(&path)?,
        None => load_config()?,
    })
}

/// Build the enricher. The API key is only read when the command needs it,
/// so revenue and website lookups do not warn about a missing key.
fn build_enricher(config: &AppConfig, with_api_key: bool) -> Result<Enricher> {
    let api_key = if with_api_key {
        api_key_from_env(&config.apollo)
    } else {
        None
    };
    Ok(Enricher::from_config(config, api_key)?)
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

async fn cmd_revenue(config_path: Option<PathBuf>, company: &str) -> Result<()> {
    let config = resolve_config(config_path)?;
    let enricher = build_enricher(&config, false)?;

    let result = enricher.revenue().resolve(company).await?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

async fn cmd_website(config_path: Option<PathBuf>, company: &str) -> Result<()> {
    let config = resolve_config(config_path)?;
    let enricher = build_enricher(&config, false)?;

    match enricher.website().resolve(company).await {
        Some(url) => {
            println!("{url}");
            Ok(())
        }
        None => Err(eyre!("Website not found")),
    }
}

async fn cmd_apollo(config_path: Option<PathBuf>, domain: &str) -> Result<()> {
    let config = resolve_config(config_path)?;
    let enricher = build_enricher(&config, true)?;

    let result = enricher.apollo().enrich(Some(domain)).await;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

async fn cmd_enrich(config_path: Option<PathBuf>, company: &str) -> Result<()> {
    let config = resolve_config(config_path)?;
    let enricher = build_enricher(&config, true)?;

    let record = enricher.enrich_company(company).await;
    println!("{}", serde_json::to_string_pretty(&record)?);
    Ok(())
}

async fn cmd_batch(
    config_path: Option<PathBuf>,
    csv: PathBuf,
    out: Option<PathBuf>,
    concurrency: Option<usize>,
    json: bool,
) -> Result<()> {
    let config = resolve_config(config_path)?;
    let enricher = Arc::new(build_enricher(&config, true)?);

    let concurrency = concurrency.unwrap_or(config.batch.concurrency);
    if concurrency == 0 {
        return Err(eyre!("--concurrency must be at least 1"));
    }

    let options = BatchOptions {
        input: csv,
        output_dir: out.unwrap_or_else(|| PathBuf::from(&config.batch.output_dir)),
        concurrency,
    };

    info!(
        input = %options.input.display(),
        output_dir = %options.output_dir.display(),
        concurrency,
        "running batch"
    );

    let reporter = CliProgress::new();
    let summary = match run_batch(enricher, &options, &reporter).await {
        Ok(summary) => summary,
        Err(e) => {
            reporter.spinner.finish_and_clear();
            return Err(e.into());
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!();
    println!("  Batch complete!");
    println!("  Run:         {}", summary.run_id);
    println!("  Companies:   {}", summary.total);
    println!("  With errors: {}", summary.with_errors);
    println!("  Output:      {}", summary.output_path.display());
    println!(
        "  Time:        {:.1}s",
        (summary.finished_at - summary.started_at).num_milliseconds() as f64 / 1000.0
    );
    println!();

    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap()
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn company_done(&self, record: &EnrichedCompanyRecord, current: usize, total: usize) {
        let status = if record.errors.is_empty() { "ok" } else { "partial" };
        self.spinner.set_message(format!(
            "Enriched [{current}/{total}] {} ({status})",
            record.company
        ));
    }

    fn done(&self, _summary: &BatchSummary) {
        self.spinner.finish_and_clear();
    }
}

async fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

async fn cmd_config_show(config_path: Option<PathBuf>) -> Result<()> {
    let config = resolve_config(config_path)?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}
