//! Curated seed characters: loading, duplicate checks and key lookup.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::path::Path;

use tracing::{info, instrument, warn};

use biblia_shared::{BibliaError, DuplicateSeedPolicy, Result, SeedCharacter};

use crate::dataset::read_json_file;

/// Load a seed list (JSON array of [`SeedCharacter`]) and apply the duplicate policy.
#[instrument(skip_all, fields(path = %path.display(), policy = ?policy))]
pub fn load_seeds(path: &Path, policy: DuplicateSeedPolicy) -> Result<Vec<SeedCharacter>> {
    let seeds: Vec<SeedCharacter> = read_json_file(path)?;
    check_duplicates(&seeds, policy)?;
    info!(seeds = seeds.len(), "seed characters loaded");
    Ok(seeds)
}

/// Chapter keys that appear more than once, in order of their second occurrence.
pub fn duplicate_keys(seeds: &[SeedCharacter]) -> Vec<&str> {
    let mut seen: HashMap<&str, usize> = HashMap::new();
    let mut dups = Vec::new();
    for seed in seeds {
        let count = seen.entry(seed.chapter.as_str()).or_insert(0);
        *count += 1;
        if *count == 2 {
            dups.push(seed.chapter.as_str());
        }
    }
    dups
}

/// Enforce `policy` on the seed list.
pub fn check_duplicates(seeds: &[SeedCharacter], policy: DuplicateSeedPolicy) -> Result<()> {
    let dups = duplicate_keys(seeds);
    if dups.is_empty() {
        return Ok(());
    }

    match policy {
        DuplicateSeedPolicy::FirstWins => {
            for key in &dups {
                warn!(chapter = %key, "duplicate seed key, later entries are shadowed");
            }
            Ok(())
        }
        DuplicateSeedPolicy::Reject => Err(BibliaError::validation(format!(
            "duplicate seed chapter keys: {}",
            dups.join(", ")
        ))),
    }
}

/// Lookup table from chapter key to the first seed carrying that key.
#[derive(Debug)]
pub struct SeedIndex<'a> {
    by_chapter: HashMap<&'a str, &'a SeedCharacter>,
}

impl<'a> SeedIndex<'a> {
    pub fn new(seeds: &'a [SeedCharacter]) -> Self {
        let mut by_chapter = HashMap::with_capacity(seeds.len());
        for seed in seeds {
            if let Entry::Vacant(slot) = by_chapter.entry(seed.chapter.as_str()) {
                slot.insert(seed);
            }
        }
        Self { by_chapter }
    }

    /// First seed whose chapter key equals `key`.
    pub fn get(&self, key: &str) -> Option<&'a SeedCharacter> {
        self.by_chapter.get(key).copied()
    }
}
