//! Application configuration for mdgen.
//!
//! User config lives at `~/.mdgen/mdgen.toml`.
//! CLI flags override interactive answers, which override config file values,
//! which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{MdGenError, Result};
use crate::types::Delimiter;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "mdgen.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".mdgen";

// ---------------------------------------------------------------------------
// Config structs (matching mdgen.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Global defaults.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Body conversion settings.
    #[serde(default)]
    pub conversion: ConversionConfig,

    /// Output path policy.
    #[serde(default)]
    pub paths: PathsConfig,
}

/// `[defaults]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Default CSV delimiter (a single ASCII character).
    #[serde(default = "default_delimiter")]
    pub delimiter: String,

    /// Whether to emit an H1 heading from the title column.
    #[serde(default = "default_true")]
    pub create_header: bool,

    /// Root directory the page tree is written under.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// File name written inside each page directory.
    #[serde(default = "default_file_name")]
    pub file_name: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            delimiter: default_delimiter(),
            create_header: true,
            output_dir: default_output_dir(),
            file_name: default_file_name(),
        }
    }
}

fn default_delimiter() -> String {
    ",".into()
}
fn default_output_dir() -> String {
    "./output".into()
}
fn default_file_name() -> String {
    "README.md".into()
}
fn default_true() -> bool {
    true
}

/// `[conversion]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionConfig {
    /// Re-emit inline elements with no Markdown form (`span`, `sup`, ...) as HTML.
    #[serde(default)]
    pub keep_inline_html: bool,

    /// Cell value in the `textile` column that turns on Textile conversion.
    #[serde(default = "default_textile_marker")]
    pub textile_marker: String,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            keep_inline_html: false,
            textile_marker: default_textile_marker(),
        }
    }
}

fn default_textile_marker() -> String {
    "Y".into()
}

/// `[paths]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Reject url values that are absolute or climb out with `..`.
    #[serde(default)]
    pub reject_unsafe: bool,
}

// ---------------------------------------------------------------------------
// Generate config (runtime, merged from config + CLI flags + prompts)
// ---------------------------------------------------------------------------

/// Runtime configuration for one `generate` run.
#[derive(Debug, Clone)]
pub struct GenerateConfig {
    /// Source CSV file.
    pub source: PathBuf,
    /// Field delimiter.
    pub delimiter: Delimiter,
    /// Emit `# <title>` after the front matter.
    pub create_header: bool,
    /// Root of the generated page tree.
    pub output_root: PathBuf,
    /// Name of the file written in each page directory.
    pub file_name: String,
    /// Keep residual inline HTML in converted bodies.
    pub keep_inline_html: bool,
    /// Marker value enabling Textile conversion for a row.
    pub textile_marker: String,
    /// Reject absolute or `..`-containing url values.
    pub reject_unsafe_paths: bool,
}

impl GenerateConfig {
    /// Build a run config for `source` from the loaded app config.
    ///
    /// Fails if the configured delimiter is not a single ASCII character.
    pub fn from_app(source: impl Into<PathBuf>, config: &AppConfig) -> Result<Self> {
        Ok(Self {
            source: source.into(),
            delimiter: config.defaults.delimiter.parse()?,
            create_header: config.defaults.create_header,
            output_root: PathBuf::from(&config.defaults.output_dir),
            file_name: config.defaults.file_name.clone(),
            keep_inline_html: config.conversion.keep_inline_html,
            textile_marker: config.conversion.textile_marker.clone(),
            reject_unsafe_paths: config.paths.reject_unsafe,
        })
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.mdgen/`).
pub fn config_dir() -> Result<PathBuf> {
    let home =
        dirs::home_dir().ok_or_else(|| MdGenError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.mdgen/mdgen.toml`).
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
    let content = std::fs::read_to_string(path).map_err(|e| MdGenError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| MdGenError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| MdGenError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| MdGenError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| MdGenError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}
