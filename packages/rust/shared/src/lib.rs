//! Shared types, error model, and configuration for the Biblia data tools.
//!
//! This crate is the foundation depended on by all other Biblia crates.
//! It provides:
//! - [`BibliaError`] — the unified error type
//! - Domain types ([`ScriptureDataset`], [`SeedCharacter`], [`CharacterRecord`],
//!   [`ConcordanceStore`], [`VerseRef`])
//! - Configuration ([`AppConfig`], [`CharacterBuildConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, CharacterBuildConfig, CharactersConfig, DuplicateSeedPolicy, InferenceConfig,
    PathsConfig, config_dir, config_file_path, expand_home, init_config, load_config,
    load_config_from, resolve_api_key,
};
pub use error::{BibliaError, Result};
pub use types::{
    Book, Chapter, ChapterNumber, CharacterRecord, ConcordanceEntry, ConcordanceStore,
    CrossReference, ScriptureDataset, SeedCharacter, Verse, VerseRef, chapter_key,
};
