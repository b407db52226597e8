//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use biblia_concordance::{InferenceClient, UpdateOutcome, load_store, update_concordance};
use biblia_core::dataset::load_dataset;
use biblia_core::pipeline::{
    GenerateConfig, ProgressReporter, TransformConfig, generate_characters, transform_dataset,
};
use biblia_shared::{
    AppConfig, CharacterBuildConfig, DuplicateSeedPolicy, VerseRef, init_config, load_config,
    resolve_api_key,
};
use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// Biblia — data tools for the Reina-Valera reader.
#[derive(Parser)]
#[command(
    name = "biblia",
    version,
    about = "Build character cards, normalize scripture data, and collect concordances.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv).
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
    /// Generate the character list, one card per chapter.
    Characters {
        /// Structured dataset (defaults to config `paths.dataset`).
        #[arg(long)]
        dataset: Option<PathBuf>,

        /// Seed character list (defaults to config `paths.seeds`).
        #[arg(long)]
        seeds: Option<PathBuf>,

        /// Output file, overwritten (defaults to config `paths.characters`).
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Maximum number of cards (defaults to config `characters.max_records`).
        #[arg(long)]
        max: Option<usize>,

        /// Fail when two seeds share a chapter key.
        #[arg(long)]
        reject_duplicate_seeds: bool,
    },

    /// Convert the raw verse dump into the structured dataset.
    Transform {
        /// Raw dump (defaults to config `paths.raw_source`).
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output dataset, overwritten (defaults to config `paths.dataset`).
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Concordance store operations.
    Concordance {
        #[command(subcommand)]
        action: ConcordanceAction,
    },

    /// Configuration management.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Concordance subcommands.
#[derive(Subcommand)]
pub(crate) enum ConcordanceAction {
    /// Ask the model for cross references of a verse and store them.
    Add {
        /// Verse reference, e.g. "Juan 10:10".
        reference: String,

        /// Verse text; looked up in the dataset when omitted.
        #[arg(long)]
        text: Option<String>,

        /// Concordance store (defaults to config `paths.concordances`).
        #[arg(long)]
        store: Option<PathBuf>,

        /// Dataset used for verse text lookup (defaults to config `paths.dataset`).
        #[arg(long)]
        dataset: Option<PathBuf>,
    },
    /// Print the stored cross references of a verse.
    Show {
        /// Verse reference, e.g. "Juan 10:10".
        reference: String,

        /// Concordance store (defaults to config `paths.concordances`).
        #[arg(long)]
        store: Option<PathBuf>,
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

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "biblia=info",
        1 => "biblia=debug",
        _ => "biblia=trace",
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
        Command::Characters {
            dataset,
            seeds,
            out,
            max,
            reject_duplicate_seeds,
        } => cmd_characters(dataset, seeds, out, max, reject_duplicate_seeds),
        Command::Transform { input, out } => cmd_transform(input, out),
        Command::Concordance { action } => match action {
            ConcordanceAction::Add {
                reference,
                text,
                store,
                dataset,
            } => cmd_concordance_add(&reference, text, store, dataset).await,
            ConcordanceAction::Show { reference, store } => cmd_concordance_show(&reference, store),
        },
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(),
        },
    }
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

fn cmd_characters(
    dataset: Option<PathBuf>,
    seeds: Option<PathBuf>,
    out: Option<PathBuf>,
    max: Option<usize>,
    reject_duplicate_seeds: bool,
) -> Result<()> {
    let config = load_config()?;

    let mut build = CharacterBuildConfig::from(&config);
    if let Some(max) = max {
        build.max_records = max;
    }
    if reject_duplicate_seeds {
        build.duplicate_policy = DuplicateSeedPolicy::Reject;
    }

    let generate = GenerateConfig {
        dataset_path: dataset.unwrap_or_else(|| PathBuf::from(&config.paths.dataset)),
        seeds_path: seeds.unwrap_or_else(|| PathBuf::from(&config.paths.seeds)),
        output_path: out.unwrap_or_else(|| PathBuf::from(&config.paths.characters)),
        build,
    };

    info!(
        dataset = %generate.dataset_path.display(),
        seeds = %generate.seeds_path.display(),
        max = generate.build.max_records,
        "generating characters"
    );

    let reporter = CliProgress::new();
    let result = generate_characters(&generate, &reporter)?;

    println!();
    println!("  Characters generated!");
    println!("  Records:      {}", result.record_count);
    println!("  Seed hits:    {}", result.stats.seed_hits);
    println!("  Placeholders: {}", result.stats.placeholders);
    println!("  Chapters:     {}", result.stats.chapters_total);
    if result.stats.truncated {
        println!("  Truncated at: {}", generate.build.max_records);
    }
    println!("  SHA-256:      {}", result.written.sha256);
    println!("  Path:         {}", result.output_path.display());
    println!("  Time:         {:.1}s", result.elapsed.as_secs_f64());
    println!();

    Ok(())
}

fn cmd_transform(input: Option<PathBuf>, out: Option<PathBuf>) -> Result<()> {
    let config = load_config()?;

    let transform = TransformConfig {
        input_path: input.unwrap_or_else(|| PathBuf::from(&config.paths.raw_source)),
        output_path: out.unwrap_or_else(|| PathBuf::from(&config.paths.dataset)),
    };

    info!(input = %transform.input_path.display(), "transforming raw dump");

    let reporter = CliProgress::new();
    let result = transform_dataset(&transform, &reporter)?;

    println!();
    println!("  Dataset written!");
    println!("  Books:    {}", result.report.books);
    println!("  Chapters: {}", result.report.chapters);
    println!("  Verses:   {}", result.report.verses);
    if result.report.skipped_books + result.report.skipped_chapters > 0 {
        println!(
            "  Skipped:  {} books, {} chapters",
            result.report.skipped_books, result.report.skipped_chapters
        );
    }
    println!("  Path:     {}", result.output_path.display());
    println!();

    Ok(())
}

async fn cmd_concordance_add(
    reference: &str,
    text: Option<String>,
    store: Option<PathBuf>,
    dataset: Option<PathBuf>,
) -> Result<()> {
    let config = load_config()?;
    let verse: VerseRef = reference.parse()?;
    let store_path = store.unwrap_or_else(|| PathBuf::from(&config.paths.concordances));
    let dataset_path = dataset.unwrap_or_else(|| PathBuf::from(&config.paths.dataset));

    info!(reference = %verse, store = %store_path.display(), "updating concordances");

    let reporter = CliProgress::new();
    let outcome = add_concordance(&config, &verse, text, &store_path, &dataset_path, &reporter).await;
    reporter.done();

    match outcome? {
        UpdateOutcome::Added { related } => {
            println!("Added {related} cross references for {verse} to {}", store_path.display());
        }
        UpdateOutcome::AlreadyPresent => {
            println!("{verse} is already in {}", store_path.display());
        }
        UpdateOutcome::NothingToAdd => {
            println!("No cross references obtained for {verse}; store unchanged");
        }
    }

    Ok(())
}

/// Store check first; the verse text and API key are only needed for a new reference.
async fn add_concordance(
    config: &AppConfig,
    verse: &VerseRef,
    text: Option<String>,
    store_path: &Path,
    dataset_path: &Path,
    reporter: &impl ProgressReporter,
) -> Result<UpdateOutcome> {
    if load_store(store_path)?.contains(&verse.to_string()) {
        info!(reference = %verse, "reference already in store, skipping");
        return Ok(UpdateOutcome::AlreadyPresent);
    }

    let verse_text = match text {
        Some(text) => text,
        None => {
            let ds = load_dataset(dataset_path)?;
            ds.verse_text(verse).map(String::from).ok_or_else(|| {
                eyre!(
                    "'{verse}' not found in {}; pass the verse with --text",
                    dataset_path.display()
                )
            })?
        }
    };

    let api_key = resolve_api_key(&config.inference)?;
    let client = InferenceClient::new(&config.inference, api_key)?;

    reporter.phase(&format!("Asking the model about {verse}"));
    Ok(update_concordance(store_path, verse, &verse_text, &client).await?)
}

fn cmd_concordance_show(reference: &str, store: Option<PathBuf>) -> Result<()> {
    let config = load_config()?;
    let verse: VerseRef = reference.parse()?;
    let store_path = store.unwrap_or_else(|| PathBuf::from(&config.paths.concordances));

    let store = load_store(&store_path)?;
    match store.find(&verse.to_string()) {
        Some(entry) => println!("{}", serde_json::to_string_pretty(entry)?),
        None => println!("No concordances stored for {verse}"),
    }

    Ok(())
}

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show() -> Result<()> {
    let config: AppConfig = load_config()?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
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
        if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
            spinner.set_style(
                style.tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
            );
        }
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn done(&self) {
        self.spinner.finish_and_clear();
    }
}
