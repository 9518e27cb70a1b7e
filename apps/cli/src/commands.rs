//! CLI command definitions, routing, and tracing setup.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use cims_core::{ConfirmProceed, ProgressReporter, RunOutcome, RunSummary};
use cims_shared::{AppConfig, RunConfig, init_config, load_config, load_config_from};
use color_eyre::eyre::{Result, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// cims — download the FEEC 100 cims summit catalog as JSON.
#[derive(Parser)]
#[command(
    name = "cims",
    version,
    about = "Scrape the FEEC \"100 cims\" summit catalog into a single JSON file.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

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
    /// Fetch the whole catalog, enrich it with coordinates, and write the JSON file.
    Run {
        /// Maximum number of detail pages fetched at once.
        #[arg(short, long, value_parser = parse_concurrency)]
        concurrency: Option<usize>,

        /// Output file (defaults to the configured `output_file`).
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Skip the confirmation prompt.
        #[arg(short, long)]
        yes: bool,

        /// Indent the JSON output.
        #[arg(long)]
        pretty: bool,

        /// Config file to read instead of ~/.cims/cims.toml.
        #[arg(long)]
        config: Option<PathBuf>,
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

fn parse_concurrency(value: &str) -> std::result::Result<usize, String> {
    match value.parse::<usize>() {
        Ok(0) => Err("concurrency must be at least 1".into()),
        Ok(n) => Ok(n),
        Err(e) => Err(format!("invalid concurrency '{value}': {e}")),
    }
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "cims=info",
        1 => "cims=debug",
        _ => "cims=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

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
    match cli.command {
        Command::Run {
            concurrency,
            out,
            yes,
            pretty,
            config,
        } => {
            let app_config = match config {
                Some(path) => load_config_from(&path)?,
                None => load_config()?,
            };
            let run_config = resolve_run_config(&app_config, concurrency, out, pretty);
            cmd_run(&run_config, yes).await
        }
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init().await,
            ConfigAction::Show => cmd_config_show().await,
        },
    }
}

/// Apply command-line overrides on top of the file/default configuration.
fn resolve_run_config(
    config: &AppConfig,
    concurrency: Option<usize>,
    out: Option<PathBuf>,
    pretty: bool,
) -> RunConfig {
    let mut run = RunConfig::from(config);
    if let Some(n) = concurrency {
        run.concurrency = n;
    }
    if let Some(path) = out {
        run.output_path = path;
    }
    run.pretty |= pretty;
    run
}

async fn cmd_run(config: &RunConfig, assume_yes: bool) -> Result<()> {
    print_banner();

    info!(
        concurrency = config.concurrency,
        output = %config.output_path.display(),
        "starting scrape"
    );

    let confirm = StdinConfirm { assume_yes };
    let reporter = CliProgress::new();
    let outcome = cims_core::run(config, &confirm, &reporter).await;
    reporter.finish();

    match outcome? {
        RunOutcome::Declined => {
            println!("Has decidit aturar l'execució. Si la vols tornar a executar, torna a executar!");
        }
        RunOutcome::Completed(summary) => print_summary(&summary),
    }

    Ok(())
}

fn print_banner() {
    println!(
        r"
       /\                                                         /\
      /  \      Benvingut, ets a punt d'obtenir les dades de     /  \
     /    \  les muntanyes del repte dels 100 cims de la FEEC!  /    \
    /______\___________________________________________________/______\
"
    );
    println!("Si us plau, fes servir aquesta eina amb responsabilitat! Ja que pot saturar la web de la FEEC!");
    println!("El creador d'aquesta eina no es fa responsable de l'ús que se'n pugui fer!");
    println!();
}

fn print_summary(summary: &RunSummary) {
    println!();
    println!("  Catalog written!");
    println!("  Summits:         {}", summary.records);
    if summary.without_coordinates > 0 {
        println!("  No coordinates:  {}", summary.without_coordinates);
    }
    println!("  Path:            {}", summary.destination);
    println!("  Time:            {:.1}s", summary.elapsed.as_secs_f64());
    println!();
}

// ---------------------------------------------------------------------------
// Confirmation prompt
// ---------------------------------------------------------------------------

/// Asks the operator on stdin before any request is made.
struct StdinConfirm {
    assume_yes: bool,
}

impl ConfirmProceed for StdinConfirm {
    fn confirm_proceed(&self) -> bool {
        if self.assume_yes {
            return true;
        }

        print!("Vols continuar amb l'execució del scraper, sota la teva responsabilitat? (S/N) ");
        if std::io::stdout().flush().is_err() {
            return false;
        }

        let mut answer = String::new();
        match std::io::stdin().lock().read_line(&mut answer) {
            Ok(_) => is_affirmative(&answer),
            Err(_) => false,
        }
    }
}

/// `S`/`s` (sí) or `Y`/`y`; anything else declines.
fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim(), "S" | "s" | "Y" | "y")
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
///
/// The spinner only starts ticking at the first phase, so nothing is drawn
/// over the confirmation prompt.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .expect("static spinner template")
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        Self { spinner }
    }

    fn finish(&self) {
        if !self.spinner.is_finished() {
            self.spinner.finish_and_clear();
        }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner
            .enable_steady_tick(std::time::Duration::from_millis(80));
        self.spinner.set_message(name.to_string());
    }

    fn catalog_loaded(&self, records: usize) {
        self.spinner.println(format!("  {records} summits in the catalog"));
    }

    fn record_enriched(&self, current: usize, total: usize) {
        self.spinner
            .set_message(format!("Fetching summit details [{current}/{total}]"));
    }

    fn done(&self, _summary: &RunSummary) {
        self.spinner.finish_and_clear();
    }
}

async fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

async fn cmd_config_show() -> Result<()> {
    let config: AppConfig = load_config()?;
    let toml_str =
        toml::to_string_pretty(&config).map_err(|e| eyre!("cannot render config: {e}"))?;
    println!("{toml_str}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_accepts_catalan_and_english_yes() {
        for answer in ["S\n", "s", " y \r\n", "Y"] {
            assert!(is_affirmative(answer), "{answer:?}");
        }
        for answer in ["", "N", "n\n", "si", "yes", "SS"] {
            assert!(!is_affirmative(answer), "{answer:?}");
        }
    }

    #[test]
    fn concurrency_flag_rejects_zero() {
        assert_eq!(parse_concurrency("15"), Ok(15));
        assert!(parse_concurrency("0").is_err());
        assert!(parse_concurrency("many").is_err());
    }

    #[test]
    fn flags_override_file_values() {
        let config = AppConfig::default();

        let untouched = resolve_run_config(&config, None, None, false);
        assert_eq!(untouched.concurrency, config.defaults.concurrency);
        assert_eq!(untouched.pretty, config.defaults.pretty);

        let overridden =
            resolve_run_config(&config, Some(3), Some(PathBuf::from("out/cims.json")), true);
        assert_eq!(overridden.concurrency, 3);
        assert_eq!(overridden.output_path, PathBuf::from("out/cims.json"));
        assert!(overridden.pretty);
    }

    #[test]
    fn run_subcommand_parses() {
        let cli = Cli::try_parse_from(["cims", "-v", "run", "--yes", "-c", "4", "--pretty"])
            .unwrap();
        assert_eq!(cli.verbose, 1);
        let Command::Run {
            concurrency,
            yes,
            pretty,
            out,
            config,
        } = cli.command
        else {
            panic!("expected run");
        };
        assert_eq!(concurrency, Some(4));
        assert!(yes && pretty);
        assert!(out.is_none() && config.is_none());
    }
}
