//! TOML configuration for sheet layout, flag tokens and output

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::report::excel::{FlagTokens, SheetLayout};
use crate::report::key::sha1_hex;
use crate::report::{PipelineOptions, TransitionOptions};

/// Environment variable naming a config file
pub const CONFIG_ENV: &str = "REPORT_ROLLUP_CONFIG";

/// Where published tables go and how they are delimited
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputOptions {
    pub directory: PathBuf,
    pub delimiter: char,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("reports"),
            delimiter: ';',
        }
    }
}

/// Complete tool configuration; every section may be omitted
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RollupConfig {
    pub layout: SheetLayout,
    pub flags: FlagTokens,
    pub transitions: TransitionOptions,
    pub output: OutputOptions,
}

impl RollupConfig {
    /// Parse a TOML document
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: RollupConfig = toml::from_str(text).context("Invalid configuration")?;
        if !config.output.delimiter.is_ascii() {
            anyhow::bail!(
                "Output delimiter must be a single ASCII character, got '{}'",
                config.output.delimiter
            );
        }
        Ok(config)
    }

    /// Read a config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("In config file: {}", path.display()))
    }

    /// Load configuration: an explicit path, then `REPORT_ROLLUP_CONFIG`, then
    /// the per-user config file, then built-in defaults.
    ///
    /// A path given explicitly or through the environment must exist.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let env_path = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
        match resolve_path(explicit, env_path, default_config_path()) {
            ConfigSource::Required(path) => {
                if !path.exists() {
                    anyhow::bail!("Config file does not exist: {}", path.display());
                }
                log::debug!("Loading config from {}", path.display());
                Self::from_file(&path)
            }
            ConfigSource::Optional(path) if path.exists() => {
                log::debug!("Loading user config from {}", path.display());
                Self::from_file(&path)
            }
            _ => {
                log::debug!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// SHA-1 of every setting that shapes the published files. The output
    /// directory is excluded; it decides where files go, not what they hold.
    pub fn fingerprint(&self) -> Result<String> {
        let mut shaping = self.clone();
        shaping.output.directory = PathBuf::new();
        let text = toml::to_string(&shaping).context("Failed to serialize configuration")?;
        Ok(sha1_hex(text.as_bytes()))
    }

    pub fn pipeline_options(&self) -> PipelineOptions {
        PipelineOptions {
            layout: self.layout.clone(),
            flags: self.flags.clone(),
            transitions: self.transitions.clone(),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum ConfigSource {
    Required(PathBuf),
    Optional(PathBuf),
    Defaults,
}

fn resolve_path(
    explicit: Option<&Path>,
    env_path: Option<PathBuf>,
    user_path: Option<PathBuf>,
) -> ConfigSource {
    if let Some(path) = explicit {
        return ConfigSource::Required(path.to_path_buf());
    }
    if let Some(path) = env_path.filter(|p| !p.as_os_str().is_empty()) {
        return ConfigSource::Required(path);
    }
    match user_path {
        Some(path) => ConfigSource::Optional(path),
        None => ConfigSource::Defaults,
    }
}

/// ~/.config/report-rollup/config.toml on Linux
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("report-rollup").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_gives_defaults() {
        let config = RollupConfig::from_toml("").unwrap();
        assert_eq!(config, RollupConfig::default());
        assert_eq!(config.layout.header_row, 4);
        assert_eq!(config.output.delimiter, ';');
        assert_eq!(config.output.directory, PathBuf::from("reports"));
    }

    #[test]
    fn test_partial_sections_keep_other_defaults() {
        let config = RollupConfig::from_toml(
            r#"
            [layout]
            header_row = 6
            forecast_sentinel = "FORECAST"

            [transitions]
            include_initial = true

            [output]
            delimiter = ","
            "#,
        )
        .unwrap();

        assert_eq!(config.layout.header_row, 6);
        assert_eq!(config.layout.date_col, 8);
        assert_eq!(config.layout.forecast_sentinel, "FORECAST");
        assert!(config.transitions.include_initial);
        assert_eq!(config.output.delimiter, ',');
        assert_eq!(config.flags, FlagTokens::default());
    }

    #[test]
    fn test_custom_flag_tokens() {
        let config = RollupConfig::from_toml("[flags]\ntruthy = [\"ok\"]\n").unwrap();
        assert_eq!(config.flags.truthy, vec!["ok".to_string()]);
        assert_eq!(config.pipeline_options().flags.truthy, vec!["ok".to_string()]);
    }

    #[test]
    fn test_fingerprint_tracks_output_shaping_settings() {
        let base = RollupConfig::default();
        let fingerprint = base.fingerprint().unwrap();
        assert_eq!(fingerprint.len(), 40);
        assert_eq!(RollupConfig::default().fingerprint().unwrap(), fingerprint);

        let mut moved = base.clone();
        moved.output.directory = PathBuf::from("elsewhere");
        assert_eq!(moved.fingerprint().unwrap(), fingerprint);

        let mut initial = base.clone();
        initial.transitions.include_initial = true;
        assert_ne!(initial.fingerprint().unwrap(), fingerprint);

        let mut comma = base.clone();
        comma.output.delimiter = ',';
        assert_ne!(comma.fingerprint().unwrap(), fingerprint);

        let mut tokens = base.clone();
        tokens.flags.truthy.push("ok".to_string());
        assert_ne!(tokens.fingerprint().unwrap(), fingerprint);

        let mut layout = base;
        layout.layout.forecast_sentinel = "FORECAST".to_string();
        assert_ne!(layout.fingerprint().unwrap(), fingerprint);
    }

    #[test]
    fn test_rejects_bad_documents() {
        assert!(RollupConfig::from_toml("[layout]\nheader_row = \"four\"").is_err());
        assert!(RollupConfig::from_toml("[output]\ndelimiter = \"é\"").is_err());
    }

    #[test]
    fn test_resolution_order() {
        let explicit = PathBuf::from("a.toml");
        let env = PathBuf::from("b.toml");
        let user = PathBuf::from("c.toml");

        assert_eq!(
            resolve_path(Some(&explicit), Some(env.clone()), Some(user.clone())),
            ConfigSource::Required(explicit.clone())
        );
        assert_eq!(
            resolve_path(None, Some(env.clone()), Some(user.clone())),
            ConfigSource::Required(env)
        );
        assert_eq!(
            resolve_path(None, Some(PathBuf::new()), Some(user.clone())),
            ConfigSource::Optional(user.clone())
        );
        assert_eq!(resolve_path(None, None, None), ConfigSource::Defaults);
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let path = std::env::temp_dir().join("report-rollup-no-such-config.toml");
        let err = RollupConfig::load(Some(&path)).unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }
}
