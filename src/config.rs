use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data::layout::LayoutRules;
use crate::data::loader::LoadOptions;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("reading config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parsing config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("delimiter must be a single ASCII character, got '{0}'")]
    InvalidDelimiter(String),

    #[error("invalid colour '{value}' for column '{column}'")]
    InvalidColor { column: String, value: String },
}

// ---------------------------------------------------------------------------
// Application configuration
// ---------------------------------------------------------------------------

/// Everything the viewer reads at startup besides the catalog itself.
/// All fields are optional in the JSON file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// WHATWG label of the catalog's text encoding.
    pub encoding: String,
    /// Field delimiter of the catalog file.
    pub delimiter: String,
    /// Base directory for relative image paths. Defaults to the catalog's
    /// directory.
    pub image_root: Option<PathBuf>,
    /// Rendered image width in points.
    pub image_width: f32,
    /// Shown for absent optional fields.
    pub missing_placeholder: String,
    /// Column label → background colour (`#rrggbb`).
    pub column_colors: BTreeMap<String, String>,
    /// Font with CJK coverage. Common system fonts are tried when unset.
    pub font_path: Option<PathBuf>,
    pub layout: LayoutRules,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            encoding: "shift_jis".to_string(),
            delimiter: ",".to_string(),
            image_root: None,
            image_width: 100.0,
            missing_placeholder: "データなし".to_string(),
            column_colors: BTreeMap::from([
                ("ボーカル".to_string(), "#ffe4e1".to_string()),
                ("ダンス".to_string(), "#add8e6".to_string()),
                ("ビジュアル".to_string(), "#ffffe0".to_string()),
            ]),
            font_path: None,
            layout: LayoutRules::default(),
        }
    }
}

impl AppConfig {
    /// Read a JSON config file; unspecified fields keep their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = serde_json::from_str(text)?;
        config.load_options()?;
        Ok(config)
    }

    /// Options for [`crate::data::loader::load_file`].
    pub fn load_options(&self) -> Result<LoadOptions, ConfigError> {
        let delimiter = match self.delimiter.as_bytes() {
            [b] if b.is_ascii() => *b,
            _ if self.delimiter == "\\t" => b'\t',
            _ => return Err(ConfigError::InvalidDelimiter(self.delimiter.clone())),
        };
        Ok(LoadOptions {
            encoding: self.encoding.clone(),
            delimiter,
        })
    }

    /// Directory relative image paths resolve against.
    pub fn image_root_for(&self, data_path: &Path) -> PathBuf {
        self.image_root.clone().unwrap_or_else(|| {
            data_path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_default()
        })
    }
}
