// Configuration loading and parsing (hrpro.toml, credentials.toml).

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::draw::AnimationSettings;
use crate::export::default_export_dir;
use crate::labels::Locale;

/// Environment variable consulted when credentials.toml has no API key.
pub const API_KEY_ENV: &str = "ANTHROPIC_API_KEY";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// Top-level assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub general: GeneralConfig,
    pub draw: DrawConfig,
    pub grouping: GroupingConfig,
    pub export: ExportConfig,
    pub llm: LlmConfig,
    pub credentials: CredentialsConfig,
}

impl Config {
    pub fn animation_settings(&self) -> AnimationSettings {
        AnimationSettings {
            ticks: self.draw.ticks,
            interval: Duration::from_millis(self.draw.tick_interval_ms),
        }
    }

    /// Configured export directory, or the platform download directory.
    pub fn export_dir(&self) -> PathBuf {
        self.export
            .dir
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(default_export_dir)
    }
}

// ---------------------------------------------------------------------------
// hrpro.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for the entire hrpro.toml file.
#[derive(Debug, Clone, Deserialize)]
struct AppFile {
    #[serde(default)]
    general: GeneralConfig,
    draw: DrawConfig,
    grouping: GroupingConfig,
    #[serde(default)]
    export: ExportConfig,
    llm: LlmConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeneralConfig {
    #[serde(default)]
    pub locale: Locale,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DrawConfig {
    pub ticks: u32,
    pub tick_interval_ms: u64,
    #[serde(default)]
    pub allow_repeat: bool,
}

impl Default for DrawConfig {
    fn default() -> Self {
        DrawConfig {
            ticks: 20,
            tick_interval_ms: 100,
            allow_repeat: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GroupingConfig {
    pub group_size: usize,
    #[serde(default)]
    pub generated_names: bool,
}

impl Default for GroupingConfig {
    fn default() -> Self {
        GroupingConfig {
            group_size: 4,
            generated_names: true,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExportConfig {
    #[serde(default)]
    pub dir: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    pub model: String,
    pub team_names_max_tokens: u32,
    pub congratulation_max_tokens: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        LlmConfig {
            model: "claude-sonnet-4-5-20250929".to_string(),
            team_names_max_tokens: 300,
            congratulation_max_tokens: 120,
        }
    }
}

// ---------------------------------------------------------------------------
// credentials.toml structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize, Default)]
pub struct CredentialsConfig {
    pub anthropic_api_key: Option<String>,
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate configuration from `config/hrpro.toml` and (optionally)
/// `config/credentials.toml`, relative to `base_dir`.
///
/// Does not copy defaults or consult the environment; `load_config()` does
/// both.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let config_dir = base_dir.join("config");

    // --- hrpro.toml (required) ---
    let app_path = config_dir.join("hrpro.toml");
    let app_text = read_file(&app_path)?;
    let app_file: AppFile = toml::from_str(&app_text).map_err(|e| ConfigError::ParseError {
        path: app_path.clone(),
        source: e,
    })?;

    // --- credentials.toml (optional) ---
    let credentials_path = config_dir.join("credentials.toml");
    let credentials = if credentials_path.exists() {
        let cred_text = read_file(&credentials_path)?;
        toml::from_str(&cred_text).map_err(|e| ConfigError::ParseError {
            path: credentials_path.clone(),
            source: e,
        })?
    } else {
        CredentialsConfig::default()
    };

    let config = Config {
        general: app_file.general,
        draw: app_file.draw,
        grouping: app_file.grouping,
        export: app_file.export,
        llm: app_file.llm,
        credentials,
    };

    validate(&config)?;

    Ok(config)
}

/// Ensure all config files exist by copying missing ones from `defaults/`.
/// Returns the list of files that were copied. Skips `.example` files.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults_dir = base_dir.join("defaults");
    let config_dir = base_dir.join("config");

    if !defaults_dir.exists() {
        if !config_dir.exists() {
            return Err(ConfigError::DefaultsCopyError {
                message: format!(
                    "neither defaults/ nor config/ directory found in {}; \
                     run from the project root or ensure defaults/ is present",
                    base_dir.display()
                ),
            });
        }
        return Ok(vec![]);
    }

    std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to create config directory: {e}"),
    })?;

    let mut copied = Vec::new();

    let entries = std::fs::read_dir(&defaults_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to read defaults directory: {e}"),
    })?;

    for entry in entries {
        let entry = entry.map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("failed to read defaults entry: {e}"),
        })?;
        let path = entry.path();

        if !path.is_file() {
            continue;
        }
        let Some(file_name) = path.file_name() else {
            continue;
        };
        if file_name.to_str().is_some_and(|n| n.ends_with(".example")) {
            continue;
        }
        let target = config_dir.join(file_name);

        match std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&target)
        {
            Ok(mut dest) => {
                let content = std::fs::read(&path).map_err(|e| ConfigError::DefaultsCopyError {
                    message: format!("failed to read {}: {e}", path.display()),
                })?;
                std::io::Write::write_all(&mut dest, &content).map_err(|e| {
                    ConfigError::DefaultsCopyError {
                        message: format!("failed to write {}: {e}", target.display()),
                    }
                })?;
                copied.push(target);
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {}
            Err(e) => {
                return Err(ConfigError::DefaultsCopyError {
                    message: format!("failed to create {}: {e}", target.display()),
                });
            }
        }
    }

    Ok(copied)
}

/// Loads config relative to the current working directory, copying defaults
/// first. Falls back to `ANTHROPIC_API_KEY` when no key is on file.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    ensure_config_files(&cwd)?;
    let mut config = load_config_from(&cwd)?;

    let has_key = config
        .credentials
        .anthropic_api_key
        .as_deref()
        .is_some_and(|k| !k.is_empty());
    if !has_key {
        config.credentials.anthropic_api_key = std::env::var(API_KEY_ENV).ok();
    }

    Ok(config)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.draw.ticks == 0 {
        return Err(ConfigError::ValidationError {
            field: "draw.ticks".into(),
            message: "must be greater than 0".into(),
        });
    }

    if config.draw.tick_interval_ms == 0 {
        return Err(ConfigError::ValidationError {
            field: "draw.tick_interval_ms".into(),
            message: "must be greater than 0".into(),
        });
    }

    if config.grouping.group_size == 0 {
        return Err(ConfigError::ValidationError {
            field: "grouping.group_size".into(),
            message: "must be greater than 0".into(),
        });
    }

    let token_fields: &[(&str, u32)] = &[
        ("llm.team_names_max_tokens", config.llm.team_names_max_tokens),
        (
            "llm.congratulation_max_tokens",
            config.llm.congratulation_max_tokens,
        ),
    ];
    for (name, val) in token_fields {
        if *val == 0 {
            return Err(ConfigError::ValidationError {
                field: name.to_string(),
                message: "must be > 0".into(),
            });
        }
    }

    if config.llm.model.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "llm.model".into(),
            message: "must not be empty".into(),
        });
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    /// The workspace `defaults/` directory, two levels above this crate.
    fn workspace_root() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("../..")
    }

    /// Fresh temp dir containing `config/hrpro.toml` copied from defaults.
    fn temp_with_defaults(name: &str) -> PathBuf {
        let tmp = std::env::temp_dir().join(name);
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("config")).unwrap();
        fs::copy(
            workspace_root().join("defaults/hrpro.toml"),
            tmp.join("config/hrpro.toml"),
        )
        .unwrap();
        tmp
    }

    fn rewrite_app_toml(tmp: &Path, from: &str, to: &str) {
        let path = tmp.join("config/hrpro.toml");
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains(from), "defaults/hrpro.toml should contain `{from}`");
        fs::write(&path, text.replace(from, to)).unwrap();
    }

    fn expect_validation_field(tmp: &Path, expected: &str) {
        let err = load_config_from(tmp).unwrap_err();
        match &err {
            ConfigError::ValidationError { field, .. } => assert_eq!(field, expected),
            other => panic!("expected ValidationError, got: {other}"),
        }
    }

    #[test]
    fn load_valid_config_from_defaults() {
        let tmp = temp_with_defaults("hrpro_config_valid");
        let config = load_config_from(&tmp).expect("should load valid config");

        assert_eq!(config.general.locale, Locale::English);
        assert_eq!(config.draw.ticks, 20);
        assert_eq!(config.draw.tick_interval_ms, 100);
        assert!(!config.draw.allow_repeat);
        assert_eq!(config.grouping.group_size, 4);
        assert!(config.grouping.generated_names);
        assert!(config.export.dir.is_none());
        assert_eq!(config.llm.model, "claude-sonnet-4-5-20250929");
        assert!(config.credentials.anthropic_api_key.is_none());

        let settings = config.animation_settings();
        assert_eq!(settings.ticks, 20);
        assert_eq!(settings.interval, Duration::from_millis(100));

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn credentials_toml_with_api_key() {
        let tmp = temp_with_defaults("hrpro_config_with_creds");
        fs::write(
            tmp.join("config/credentials.toml"),
            "anthropic_api_key = \"sk-ant-test-key\"\n",
        )
        .unwrap();

        let config = load_config_from(&tmp).expect("should load with credentials.toml");
        assert_eq!(
            config.credentials.anthropic_api_key.as_deref(),
            Some("sk-ant-test-key")
        );

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn locale_and_export_dir_are_read() {
        let tmp = temp_with_defaults("hrpro_config_locale");
        rewrite_app_toml(&tmp, "locale = \"en\"", "locale = \"zh-TW\"");
        rewrite_app_toml(&tmp, "# dir = \"exports\"", "dir = \"exports\"");

        let config = load_config_from(&tmp).unwrap();
        assert_eq!(config.general.locale, Locale::TraditionalChinese);
        assert_eq!(config.export_dir(), PathBuf::from("exports"));

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_zero_ticks() {
        let tmp = temp_with_defaults("hrpro_config_zero_ticks");
        rewrite_app_toml(&tmp, "ticks = 20", "ticks = 0");
        expect_validation_field(&tmp, "draw.ticks");
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_zero_interval() {
        let tmp = temp_with_defaults("hrpro_config_zero_interval");
        rewrite_app_toml(&tmp, "tick_interval_ms = 100", "tick_interval_ms = 0");
        expect_validation_field(&tmp, "draw.tick_interval_ms");
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_zero_group_size() {
        let tmp = temp_with_defaults("hrpro_config_zero_group");
        rewrite_app_toml(&tmp, "group_size = 4", "group_size = 0");
        expect_validation_field(&tmp, "grouping.group_size");
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_zero_token_budget() {
        let tmp = temp_with_defaults("hrpro_config_zero_tokens");
        rewrite_app_toml(&tmp, "team_names_max_tokens = 300", "team_names_max_tokens = 0");
        expect_validation_field(&tmp, "llm.team_names_max_tokens");
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn file_not_found_for_missing_app_toml() {
        let tmp = std::env::temp_dir().join("hrpro_config_missing");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("config")).unwrap();

        let err = load_config_from(&tmp).unwrap_err();
        match &err {
            ConfigError::FileNotFound { path } => assert!(path.ends_with("hrpro.toml")),
            other => panic!("expected FileNotFound, got: {other}"),
        }

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn parse_error_for_invalid_toml() {
        let tmp = std::env::temp_dir().join("hrpro_config_invalid_toml");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("config")).unwrap();
        fs::write(tmp.join("config/hrpro.toml"), "this is not valid [[[ toml").unwrap();

        let err = load_config_from(&tmp).unwrap_err();
        match &err {
            ConfigError::ParseError { path, .. } => assert!(path.ends_with("hrpro.toml")),
            other => panic!("expected ParseError, got: {other}"),
        }

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn ensure_config_files_copies_missing_and_skips_examples() {
        let tmp = std::env::temp_dir().join("hrpro_config_ensure_copies");
        let _ = fs::remove_dir_all(&tmp);
        let defaults_dir = tmp.join("defaults");
        fs::create_dir_all(&defaults_dir).unwrap();

        fs::copy(
            workspace_root().join("defaults/hrpro.toml"),
            defaults_dir.join("hrpro.toml"),
        )
        .unwrap();
        fs::write(
            defaults_dir.join("credentials.toml.example"),
            "anthropic_api_key = \"sk-ant-...\"\n",
        )
        .unwrap();

        let copied = ensure_config_files(&tmp).expect("should succeed");
        assert_eq!(copied.len(), 1);
        assert!(tmp.join("config/hrpro.toml").exists());
        assert!(!tmp.join("config/credentials.toml.example").exists());

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn ensure_config_files_skips_existing() {
        let tmp = std::env::temp_dir().join("hrpro_config_ensure_skips");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("defaults")).unwrap();
        fs::create_dir_all(tmp.join("config")).unwrap();

        fs::copy(
            workspace_root().join("defaults/hrpro.toml"),
            tmp.join("defaults/hrpro.toml"),
        )
        .unwrap();
        fs::write(tmp.join("config/hrpro.toml"), "# custom\n").unwrap();

        let copied = ensure_config_files(&tmp).expect("should succeed");
        assert!(copied.is_empty());
        let content = fs::read_to_string(tmp.join("config/hrpro.toml")).unwrap();
        assert_eq!(content, "# custom\n");

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn ensure_config_files_errors_when_both_dirs_missing() {
        let tmp = std::env::temp_dir().join("hrpro_config_both_missing");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(&tmp).unwrap();

        let err = ensure_config_files(&tmp).unwrap_err();
        match &err {
            ConfigError::DefaultsCopyError { message } => {
                assert!(message.contains("neither defaults/ nor config/"));
            }
            other => panic!("expected DefaultsCopyError, got: {other}"),
        }

        let _ = fs::remove_dir_all(&tmp);
    }
}
