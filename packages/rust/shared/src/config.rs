//! Application configuration for the Biblia data tools.
//!
//! User config lives at `~/.biblia/biblia.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{BibliaError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "biblia.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".biblia";

// ---------------------------------------------------------------------------
// Config structs (matching biblia.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Input and output file locations.
    #[serde(default)]
    pub paths: PathsConfig,

    /// Character list generation settings.
    #[serde(default)]
    pub characters: CharactersConfig,

    /// Hosted inference endpoint settings.
    #[serde(default)]
    pub inference: InferenceConfig,
}

/// `[paths]` section. Relative paths resolve against the working directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Raw abbreviation-keyed verse dump read by `transform`.
    #[serde(default = "default_raw_source")]
    pub raw_source: String,

    /// Structured scripture dataset (`{ books: [...] }`).
    #[serde(default = "default_dataset")]
    pub dataset: String,

    /// Curated seed character list.
    #[serde(default = "default_seeds")]
    pub seeds: String,

    /// Generated character list.
    #[serde(default = "default_characters")]
    pub characters: String,

    /// Concordance store.
    #[serde(default = "default_concordances")]
    pub concordances: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            raw_source: default_raw_source(),
            dataset: default_dataset(),
            seeds: default_seeds(),
            characters: default_characters(),
            concordances: default_concordances(),
        }
    }
}

fn default_raw_source() -> String {
    "es_rvr.json".into()
}
fn default_dataset() -> String {
    "src/data/reina_valera.json".into()
}
fn default_seeds() -> String {
    "data/seed_characters.json".into()
}
fn default_characters() -> String {
    "src/data/characters.json".into()
}
fn default_concordances() -> String {
    "src/data/concordances.json".into()
}

/// `[characters]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CharactersConfig {
    /// Maximum number of records emitted.
    #[serde(default = "default_max_records")]
    pub max_records: usize,

    /// Base URL for placeholder images; the label is appended as `?text=`.
    #[serde(default = "default_placeholder_base")]
    pub placeholder_base: String,

    /// Fail seed loading when two seeds share a chapter key.
    #[serde(default)]
    pub reject_duplicate_seeds: bool,
}

impl Default for CharactersConfig {
    fn default() -> Self {
        Self {
            max_records: default_max_records(),
            placeholder_base: default_placeholder_base(),
            reject_duplicate_seeds: false,
        }
    }
}

fn default_max_records() -> usize {
    1700
}
fn default_placeholder_base() -> String {
    "https://placehold.co/50x50".into()
}

/// `[inference]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferenceConfig {
    /// Model endpoint receiving the text-generation request.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Name of the env var holding the API key (never store the key itself).
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Fallback file holding the API key when the env var is unset.
    #[serde(default = "default_key_file")]
    pub key_file: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Generation length limit.
    #[serde(default = "default_max_new_tokens")]
    pub max_new_tokens: u32,

    /// Sampling temperature.
    #[serde(default = "default_temperature")]
    pub temperature: f64,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            api_key_env: default_api_key_env(),
            key_file: default_key_file(),
            timeout_secs: default_timeout_secs(),
            max_new_tokens: default_max_new_tokens(),
            temperature: default_temperature(),
        }
    }
}

fn default_endpoint() -> String {
    "https://api-inference.huggingface.co/models/mistralai/Mixtral-8x7B-Instruct-v0.1".into()
}
fn default_api_key_env() -> String {
    "REACT_APP_HF_API_KEY".into()
}
fn default_key_file() -> String {
    "~/.hf_key.txt".into()
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_max_new_tokens() -> u32 {
    300
}
fn default_temperature() -> f64 {
    0.7
}

impl InferenceConfig {
    /// Parse the configured endpoint.
    pub fn endpoint_url(&self) -> Result<Url> {
        Url::parse(&self.endpoint).map_err(|e| {
            BibliaError::config(format!("invalid inference endpoint '{}': {e}", self.endpoint))
        })
    }
}

// ---------------------------------------------------------------------------
// Character build config (runtime, merged from config + CLI flags)
// ---------------------------------------------------------------------------

/// What to do when two seed characters share a chapter key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicateSeedPolicy {
    /// Keep every seed; the first one for a key shadows the rest.
    #[default]
    FirstWins,
    /// Refuse to load a seed list containing duplicate keys.
    Reject,
}

/// Runtime character build configuration — merged from config file + CLI flags.
#[derive(Debug, Clone)]
pub struct CharacterBuildConfig {
    /// Cap on emitted records.
    pub max_records: usize,
    /// Placeholder image base URL.
    pub placeholder_base: String,
    /// Duplicate seed handling.
    pub duplicate_policy: DuplicateSeedPolicy,
}

impl Default for CharacterBuildConfig {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for CharacterBuildConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            max_records: config.characters.max_records,
            placeholder_base: config.characters.placeholder_base.clone(),
            duplicate_policy: if config.characters.reject_duplicate_seeds {
                DuplicateSeedPolicy::Reject
            } else {
                DuplicateSeedPolicy::FirstWins
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.biblia/`).
pub fn config_dir() -> Result<PathBuf> {
    let home =
        dirs::home_dir().ok_or_else(|| BibliaError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.biblia/biblia.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| BibliaError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| BibliaError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| BibliaError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| BibliaError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| BibliaError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

/// Expand a leading `~/` to the user's home directory.
pub fn expand_home(path: &str) -> PathBuf {
    match path.strip_prefix("~/") {
        Some(rest) => match dirs::home_dir() {
            Some(home) => home.join(rest),
            None => PathBuf::from(path),
        },
        None => PathBuf::from(path),
    }
}

/// Resolve the inference API key: the configured env var first, then the key file.
pub fn resolve_api_key(config: &InferenceConfig) -> Result<String> {
    let from_env = std::env::var(&config.api_key_env).ok();
    resolve_api_key_from(from_env, &expand_home(&config.key_file), &config.api_key_env)
}

fn resolve_api_key_from(from_env: Option<String>, key_file: &Path, var_name: &str) -> Result<String> {
    if let Some(key) = from_env.filter(|k| !k.trim().is_empty()) {
        return Ok(key.trim().to_string());
    }

    match std::fs::read_to_string(key_file) {
        Ok(content) if !content.trim().is_empty() => {
            tracing::debug!(path = %key_file.display(), "API key read from key file");
            Ok(content.trim().to_string())
        }
        _ => Err(BibliaError::config(format!(
            "inference API key not found. Set the {var_name} environment variable \
             or write the key to {}",
            key_file.display()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_file(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("biblia-config-test-{}", uuid::Uuid::now_v7()));
        std::fs::create_dir_all(&dir).unwrap();
        dir.join(name)
    }

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("reina_valera.json"));
        assert!(toml_str.contains("REACT_APP_HF_API_KEY"));
    }

    #[test]
    fn config_roundtrip() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize");
        let parsed: AppConfig = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.characters.max_records, 1700);
        assert_eq!(parsed.inference.timeout_secs, 30);
        assert_eq!(parsed.paths.concordances, "src/data/concordances.json");
    }

    #[test]
    fn partial_config_fills_defaults() {
        let toml_str = r#"
[characters]
max_records = 12
reject_duplicate_seeds = true
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.characters.max_records, 12);
        assert_eq!(config.characters.placeholder_base, "https://placehold.co/50x50");
        assert_eq!(config.paths.seeds, "data/seed_characters.json");

        let build = CharacterBuildConfig::from(&config);
        assert_eq!(build.max_records, 12);
        assert_eq!(build.duplicate_policy, DuplicateSeedPolicy::Reject);
    }

    #[test]
    fn build_config_defaults_to_first_wins() {
        let build = CharacterBuildConfig::default();
        assert_eq!(build.max_records, 1700);
        assert_eq!(build.duplicate_policy, DuplicateSeedPolicy::FirstWins);
    }

    #[test]
    fn endpoint_url_validation() {
        let mut config = InferenceConfig::default();
        assert!(config.endpoint_url().is_ok());

        config.endpoint = "not a url".into();
        let err = config.endpoint_url().unwrap_err();
        assert!(err.to_string().contains("invalid inference endpoint"));
    }

    #[test]
    fn expand_home_leaves_plain_paths() {
        assert_eq!(expand_home("src/data/x.json"), PathBuf::from("src/data/x.json"));
        assert!(!expand_home("~/.hf_key.txt").starts_with("~"));
    }

    #[test]
    fn api_key_prefers_env_value() {
        let missing = temp_file("absent.txt");
        let key = resolve_api_key_from(Some(" hf_env \n".into()), &missing, "X").unwrap();
        assert_eq!(key, "hf_env");
    }

    #[test]
    fn api_key_falls_back_to_key_file() {
        let path = temp_file("key.txt");
        std::fs::write(&path, "hf_from_file\n").unwrap();
        let key = resolve_api_key_from(Some(String::new()), &path, "X").unwrap();
        assert_eq!(key, "hf_from_file");
    }

    #[test]
    fn api_key_missing_everywhere() {
        let mut config = InferenceConfig::default();
        // Use a unique env var name to avoid interfering with other tests
        config.api_key_env = "BIBLIA_TEST_NONEXISTENT_KEY_12345".into();
        config.key_file = temp_file("absent.txt").to_string_lossy().into_owned();
        let result = resolve_api_key(&config);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("API key not found"));
    }
}
