//! End-to-end file workflows.
//!
//! - `generate_characters`: dataset + seeds → character list → `characters.json`
//! - `transform_dataset`: raw dump → structured dataset → `reina_valera.json`

use std::path::PathBuf;
use std::time::Instant;

use tracing::{info, instrument};

use biblia_shared::{BibliaError, CharacterBuildConfig, Result};

use crate::characters::{self, BuildStats};
use crate::dataset::{self, WriteSummary};
use crate::seeds;
use crate::transform::{self, TransformReport};

/// Configuration for [`generate_characters`].
#[derive(Debug, Clone)]
pub struct GenerateConfig {
    /// Structured scripture dataset to read.
    pub dataset_path: PathBuf,
    /// Seed character list to read.
    pub seeds_path: PathBuf,
    /// Destination for the character list (overwritten).
    pub output_path: PathBuf,
    /// Cap, placeholder and duplicate settings.
    pub build: CharacterBuildConfig,
}

/// Result of [`generate_characters`].
#[derive(Debug)]
pub struct GenerateResult {
    /// Number of records written.
    pub record_count: usize,
    pub stats: BuildStats,
    pub written: WriteSummary,
    pub output_path: PathBuf,
    /// Total elapsed time.
    pub elapsed: std::time::Duration,
}

/// Configuration for [`transform_dataset`].
#[derive(Debug, Clone)]
pub struct TransformConfig {
    /// Raw abbreviation-keyed dump.
    pub input_path: PathBuf,
    /// Destination for the structured dataset (overwritten).
    pub output_path: PathBuf,
}

/// Result of [`transform_dataset`].
#[derive(Debug)]
pub struct TransformResult {
    pub report: TransformReport,
    pub written: WriteSummary,
    pub output_path: PathBuf,
    pub elapsed: std::time::Duration,
}

/// Progress callback for reporting workflow status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called when the workflow completes.
    fn done(&self);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn done(&self) {}
}

/// Generate the character list.
///
/// 1. Load dataset (fatal on failure, nothing is written)
/// 2. Load seeds and apply the duplicate policy
/// 3. Build the bounded list
/// 4. Overwrite the output file
#[instrument(skip_all, fields(dataset = %config.dataset_path.display(), out = %config.output_path.display()))]
pub fn generate_characters(
    config: &GenerateConfig,
    progress: &dyn ProgressReporter,
) -> Result<GenerateResult> {
    let start = Instant::now();

    progress.phase("Loading dataset");
    let dataset = dataset::load_dataset(&config.dataset_path)?;

    progress.phase("Loading seed characters");
    let seeds = seeds::load_seeds(&config.seeds_path, config.build.duplicate_policy)?;

    progress.phase("Building character list");
    let list = characters::build_characters(&dataset, &seeds, &config.build);

    progress.phase("Writing characters");
    let written = characters::write_characters(
        &config.output_path,
        &list.records,
        config.build.max_records,
    )?;

    progress.done();

    let result = GenerateResult {
        record_count: list.records.len(),
        stats: list.stats,
        written,
        output_path: config.output_path.clone(),
        elapsed: start.elapsed(),
    };
    info!(records = result.record_count, elapsed_ms = result.elapsed.as_millis() as u64, "generate complete");
    Ok(result)
}

/// Normalize the raw dump into the structured dataset.
#[instrument(skip_all, fields(input = %config.input_path.display(), out = %config.output_path.display()))]
pub fn transform_dataset(
    config: &TransformConfig,
    progress: &dyn ProgressReporter,
) -> Result<TransformResult> {
    let start = Instant::now();

    progress.phase("Reading raw dump");
    let content = std::fs::read_to_string(&config.input_path)
        .map_err(|e| BibliaError::io(&config.input_path, e))?;
    info!(chars = content.len(), "raw dump read");
    let raw = transform::parse_raw(&content)?;

    progress.phase("Transforming books");
    let (dataset, report) = transform::transform_raw(&raw);

    progress.phase("Writing dataset");
    let written = dataset::write_json_pretty(&config.output_path, &dataset)?;

    progress.done();

    Ok(TransformResult {
        report,
        written,
        output_path: config.output_path.clone(),
        elapsed: start.elapsed(),
    })
}
