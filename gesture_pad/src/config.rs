//! Application configuration, loadable from a JSON file.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use face_gate::{FaceBox, DEFAULT_MATCH_THRESHOLD};
use gesture_engine::EngineConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppConfigError {
    #[error("cannot read config {path}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("malformed config {path}: {source}")]
    Parse { path: PathBuf, source: serde_json::Error },
    #[error(transparent)]
    Engine(#[from] gesture_engine::ConfigError),
    #[error("match_threshold must be positive and finite (got {0})")]
    Threshold(f32),
    #[error("identity must name an enrolled person")]
    NoIdentity,
    #[error("embed_side must be positive")]
    EmbedSide,
}

/// Where actions go.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SinkKind {
    /// Log only.
    #[default]
    Log,
    /// Real mouse and keyboard (needs the `os-input` feature).
    Os,
}

/// Configuration for the full application.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub engine:          EngineConfig,
    /// Directory of `<name>.json` enrolled faces.
    pub registry_dir:    PathBuf,
    /// The one person allowed to unlock gesture control.
    pub identity:        String,
    pub match_threshold: f32,
    pub sink:            SinkKind,
    /// Where faces sit in camera frames.  Zero-area boxes are skipped.
    pub face_boxes:      Vec<FaceBox>,
    /// Thumbnail side of the embedder used on camera frames.
    pub embed_side:      u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            engine:          EngineConfig::default(),
            registry_dir:    PathBuf::from("faces"),
            identity:        String::new(),
            match_threshold: DEFAULT_MATCH_THRESHOLD,
            sink:            SinkKind::Log,
            face_boxes:      vec![FaceBox::full()],
            embed_side:      32,
        }
    }
}

impl AppConfig {
    /// Read a JSON config.  Missing fields keep their defaults.
    pub fn load(path: &Path) -> Result<Self, AppConfigError> {
        let text = fs::read_to_string(path)
            .map_err(|source| AppConfigError::Io { path: path.to_path_buf(), source })?;
        serde_json::from_str(&text)
            .map_err(|source| AppConfigError::Parse { path: path.to_path_buf(), source })
    }

    pub fn validate(&self) -> Result<(), AppConfigError> {
        self.engine.validate()?;
        if !(self.match_threshold.is_finite() && self.match_threshold > 0.0) {
            return Err(AppConfigError::Threshold(self.match_threshold));
        }
        if self.identity.trim().is_empty() {
            return Err(AppConfigError::NoIdentity);
        }
        if self.embed_side == 0 {
            return Err(AppConfigError::EmbedSide);
        }
        Ok(())
    }
}
