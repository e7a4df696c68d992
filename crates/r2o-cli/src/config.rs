use anyhow::{Context, Result};
use r2o_core::RenderOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// CLI configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CliConfig {
    /// Where pages are written
    #[serde(default)]
    pub output: OutputConfig,
    /// Rendering switches passed to the converter
    #[serde(default)]
    pub render: RenderOptions,
}

/// Output directories
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory for regular pages
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,

    /// Directory for daily notes; the pages directory when unset
    #[serde(default)]
    pub daily_dir: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            daily_dir: None,
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("md")
}

impl OutputConfig {
    /// Daily-note directory after falling back to the pages directory
    pub fn daily_dir(&self) -> &Path {
        self.daily_dir.as_deref().unwrap_or(&self.dir)
    }
}

impl CliConfig {
    /// Load configuration with precedence: defaults < file < env < args
    pub fn load(
        config_file: Option<PathBuf>,
        output: Option<PathBuf>,
        daily_dir: Option<PathBuf>,
        sanitize_anchors: bool,
    ) -> Result<Self> {
        let mut config = Self::from_file_or_default(config_file)?;

        config.apply_env(|key| std::env::var(key).ok());

        // Override with CLI args (highest priority)
        if let Some(dir) = output {
            config.output.dir = dir;
        }
        if let Some(dir) = daily_dir {
            config.output.daily_dir = Some(dir);
        }
        if sanitize_anchors {
            config.render.sanitize_anchor_tokens = true;
        }

        Ok(config)
    }

    /// Override with environment variables
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup("R2O_OUTPUT_DIR") {
            self.output.dir = PathBuf::from(dir);
        }
        if let Some(dir) = lookup("R2O_DAILY_DIR") {
            self.output.daily_dir = Some(PathBuf::from(dir));
        }
    }

    /// Get default config file path
    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join("r2o");
        Ok(config_dir.join("config.toml"))
    }

    /// Load config from file or return default
    fn from_file_or_default(config_file: Option<PathBuf>) -> Result<Self> {
        // An explicit file is always read; the user config is skipped in test mode
        if config_file.is_none() && std::env::var("R2O_TEST_MODE").is_ok() {
            return Ok(Self::default());
        }

        let path = config_file
            .or_else(|| Self::default_config_path().ok())
            .filter(|p| p.exists());

        match path {
            Some(path) => Self::from_file(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Display the current configuration as TOML
    pub fn display_as_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config as TOML")
    }
}
