//! Application configuration types.
//!
//! The top-level [`Config`] struct is deserialized from JSON and carries the
//! server, storage, and analysis sections. Every section defaults sensibly so
//! a completely empty `{}` file is valid.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::Error;

/// Widest bounding-box outline the pipeline will draw, in pixels.
pub const MAX_BOX_THICKNESS: u32 = 32;

// ---------------------------------------------------------------------------
// Top-level Config
// ---------------------------------------------------------------------------

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub analysis: AnalysisConfig,
}

impl Config {
    /// Deserialize a `Config` from a JSON string.
    pub fn from_json(json_str: &str) -> Result<Self> {
        serde_json::from_str(json_str)
            .map_err(|e| Error::Validation(format!("config parse error: {e}")))
    }

    /// Load configuration from a file path, falling back to defaults if the
    /// path is `None` or the file does not exist.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };

        match std::fs::read_to_string(path) {
            Ok(contents) => Self::from_json(&contents).unwrap_or_else(|e| {
                tracing::warn!("Failed to parse config file {}: {e}", path.display());
                Self::default()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("No config file at {}; using defaults", path.display());
                Self::default()
            }
            Err(e) => {
                tracing::warn!("Failed to read config file {}: {e}", path.display());
                Self::default()
            }
        }
    }

    /// Load configuration strictly: read and parse errors are returned.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Return a list of validation warnings (non-fatal issues).
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.server.port == 0 {
            warnings.push("server.port is 0; a random port will be assigned".into());
        }

        if self.server.max_upload_bytes == 0 {
            warnings.push("server.max_upload_bytes is 0; every upload will be rejected".into());
        }

        if let Some(ref dir) = self.server.static_dir {
            if !dir.join("index.html").exists() {
                warnings.push(format!(
                    "server.static_dir {} has no index.html; GET / will return 404",
                    dir.display()
                ));
            }
        }

        if self.storage.upload_dir == self.storage.result_dir {
            warnings.push(
                "storage.upload_dir and storage.result_dir are the same directory".into(),
            );
        }

        if self.analysis.canny_low > self.analysis.canny_high {
            warnings.push(format!(
                "analysis.canny_low ({}) is greater than analysis.canny_high ({}); the thresholds will be swapped",
                self.analysis.canny_low, self.analysis.canny_high
            ));
        }

        if self.analysis.box_thickness == 0 {
            warnings.push("analysis.box_thickness is 0; no boxes will be drawn".into());
        } else if self.analysis.box_thickness > MAX_BOX_THICKNESS {
            warnings.push(format!(
                "analysis.box_thickness ({}) exceeds {MAX_BOX_THICKNESS}; it will be capped",
                self.analysis.box_thickness
            ));
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory holding the front-end build (`index.html` and assets).
    pub static_dir: Option<PathBuf>,
    /// Upper bound on the request body of `POST /upload`.
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 5000,
            static_dir: Some(PathBuf::from("build")),
            max_upload_bytes: 16 * 1024 * 1024,
        }
    }
}

/// Where uploads and annotated results are written.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub upload_dir: PathBuf,
    pub result_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            upload_dir: PathBuf::from("uploads"),
            result_dir: PathBuf::from("results"),
        }
    }
}

/// Image pipeline tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Canny hysteresis low threshold.
    pub canny_low: f32,
    /// Canny hysteresis high threshold.
    pub canny_high: f32,
    /// RGB color of the drawn bounding boxes.
    pub box_color: [u8; 3],
    /// Line width of the drawn bounding boxes, in pixels.
    pub box_thickness: u32,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            canny_low: 50.0,
            canny_high: 150.0,
            box_color: [0, 0, 255],
            box_thickness: 2,
        }
    }
}
