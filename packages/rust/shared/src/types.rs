//! Core domain types: the scripture dataset, seed and generated characters,
//! and the concordance store.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::BibliaError;

// ---------------------------------------------------------------------------
// Scripture dataset
// ---------------------------------------------------------------------------

/// Root structure of the structured dataset (`reina_valera.json`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScriptureDataset {
    /// Books in canonical order.
    pub books: Vec<Book>,
}

impl ScriptureDataset {
    /// Total number of chapters across all books.
    pub fn chapter_count(&self) -> usize {
        self.books.iter().map(|b| b.chapters.len()).sum()
    }

    /// Look up the text of a single verse, if the dataset carries verses.
    pub fn verse_text(&self, reference: &VerseRef) -> Option<&str> {
        self.books
            .iter()
            .filter(|b| b.name == reference.book)
            .flat_map(|b| b.chapters.iter())
            .find(|c| c.chapter.is(reference.chapter))?
            .verses
            .iter()
            .find(|v| v.verse == reference.verse)
            .map(|v| v.text.as_str())
    }
}

/// A single book and its chapters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Book {
    /// Display name (e.g., `Génesis`).
    pub name: String,
    /// Chapters in order.
    pub chapters: Vec<Chapter>,
}

/// A chapter identifier plus its verses, when present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chapter {
    /// Chapter identifier, normally 1-based and sequential.
    pub chapter: ChapterNumber,
    #[serde(default)]
    pub verses: Vec<Verse>,
}

/// Chapter identifier as found in the dataset.
///
/// Identifiers are not validated: a string is carried through into chapter
/// keys verbatim, and any other JSON value (float, null, bool) as its JSON text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChapterNumber {
    Number(i64),
    Text(String),
    Other(serde_json::Value),
}

impl ChapterNumber {
    /// Whether this identifier renders as chapter `n`.
    pub fn is(&self, n: u32) -> bool {
        match self {
            Self::Number(v) => *v == i64::from(n),
            other => other.to_string() == n.to_string(),
        }
    }
}

impl From<u32> for ChapterNumber {
    fn from(n: u32) -> Self {
        Self::Number(i64::from(n))
    }
}

impl fmt::Display for ChapterNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
            Self::Other(v) => write!(f, "{v}"),
        }
    }
}

/// A numbered verse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verse {
    pub verse: u32,
    pub text: String,
}

/// Build the join key between scripture structure and seed data: `"<Book> <Chapter>"`.
pub fn chapter_key(book: &str, chapter: &ChapterNumber) -> String {
    format!("{book} {chapter}")
}

// ---------------------------------------------------------------------------
// Characters
// ---------------------------------------------------------------------------

/// A curated character pinned to a chapter key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedCharacter {
    pub name: String,
    pub description: String,
    /// Chapter key, `"<Book> <Chapter>"`.
    pub chapter: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// One entry of the generated `characters.json`.
///
/// Field order matches the serialized output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterRecord {
    pub name: String,
    pub image: String,
    pub description: String,
    pub chapter: String,
}

// ---------------------------------------------------------------------------
// Concordances
// ---------------------------------------------------------------------------

/// Root structure of `concordances.json`.
///
/// Unknown top-level keys are kept so a rewrite does not drop them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConcordanceStore {
    #[serde(default)]
    pub concordances: Vec<ConcordanceEntry>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl ConcordanceStore {
    /// Find the entry for a reference, first match.
    pub fn find(&self, reference: &str) -> Option<&ConcordanceEntry> {
        self.concordances.iter().find(|e| e.reference == reference)
    }

    /// Whether an entry for the reference already exists.
    pub fn contains(&self, reference: &str) -> bool {
        self.find(reference).is_some()
    }
}

/// Cross references recorded for one verse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConcordanceEntry {
    /// Verse reference, e.g. `Juan 10:10`.
    pub reference: String,
    pub related: Vec<CrossReference>,
}

/// A related verse with a short text excerpt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrossReference {
    pub book: String,
    pub chapter: u32,
    pub verse: u32,
    pub text: String,
}

// ---------------------------------------------------------------------------
// VerseRef
// ---------------------------------------------------------------------------

/// A parsed verse reference such as `Juan 10:10` or `1 Juan 3:16`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VerseRef {
    pub book: String,
    pub chapter: u32,
    pub verse: u32,
}

impl FromStr for VerseRef {
    type Err = BibliaError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        static REF_RE: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r"^\s*(.+?)\s+(\d+):(\d+)\s*$").expect("valid regex")
        });

        let caps = REF_RE.captures(s).ok_or_else(|| {
            BibliaError::parse(format!(
                "invalid verse reference '{s}': expected '<Book> <chapter>:<verse>'"
            ))
        })?;

        let number = |i: usize| {
            caps[i]
                .parse::<u32>()
                .map_err(|e| BibliaError::parse(format!("invalid verse reference '{s}': {e}")))
        };

        Ok(Self {
            book: caps[1].to_string(),
            chapter: number(2)?,
            verse: number(3)?,
        })
    }
}

impl fmt::Display for VerseRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}:{}", self.book, self.chapter, self.verse)
    }
}
