// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Application configuration — loaded on start, saved when a preference changes,
// and passed explicitly to whatever needs it.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::Result;
use crate::types::{FacingMode, ImageMime};

/// Interface language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    Fr,
    En,
}

/// Marketplace role; drives the accent colour of the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserType {
    Transporter,
    Shipper,
}

impl UserType {
    pub fn accent_color(&self) -> &'static str {
        match self {
            Self::Transporter => "#f59e0b",
            Self::Shipper => "#2563eb",
        }
    }
}

/// Limits applied to every selected or captured image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureLimits {
    /// Largest accepted image in bytes.
    pub max_bytes: u64,
    /// Accepted formats.
    pub allowed: Vec<ImageMime>,
}

impl CaptureLimits {
    pub const DEFAULT_MAX_BYTES: u64 = 5 * 1024 * 1024;

    pub fn allows(&self, mime: ImageMime) -> bool {
        self.allowed.contains(&mime)
    }
}

impl Default for CaptureLimits {
    fn default() -> Self {
        Self {
            max_bytes: Self::DEFAULT_MAX_BYTES,
            allowed: vec![ImageMime::Jpeg, ImageMime::Png, ImageMime::Webp],
        }
    }
}

/// Persistent application settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// UI language.
    pub language: Language,
    /// Role of the signed-in user.
    pub user_type: UserType,
    /// Size and format limits for captured documents.
    pub capture: CaptureLimits,
    /// Camera used for document capture.
    pub camera_facing: FacingMode,
    /// JPEG quality (1–100) for camera snapshots.
    pub jpeg_quality: u8,
    /// Give up on an extraction call after this many milliseconds.
    pub extraction_timeout_ms: u64,
    /// Artificial latency of the sample extractor.
    pub sample_delay_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            language: Language::Fr,
            user_type: UserType::Transporter,
            capture: CaptureLimits::default(),
            camera_facing: FacingMode::Environment,
            jpeg_quality: 95,
            extraction_timeout_ms: 30_000,
            sample_delay_ms: 1_500,
        }
    }
}

impl AppConfig {
    pub fn extraction_timeout(&self) -> Duration {
        Duration::from_millis(self.extraction_timeout_ms)
    }

    pub fn sample_delay(&self) -> Duration {
        Duration::from_millis(self.sample_delay_ms)
    }

    /// Load from a JSON file, falling back to defaults when the file is
    /// missing or unreadable.
    pub fn load(path: &Path) -> Self {
        let data = match std::fs::read_to_string(path) {
            Ok(data) => data,
            Err(e) => {
                debug!(path = %path.display(), error = %e, "no config file, using defaults");
                return Self::default();
            }
        };
        match serde_json::from_str::<Self>(&data) {
            Ok(mut config) => {
                config.jpeg_quality = config.jpeg_quality.clamp(1, 100);
                config
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "corrupt config file, using defaults");
                Self::default()
            }
        }
    }

    /// Write the config as pretty JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_capture_policy() {
        let config = AppConfig::default();
        assert_eq!(config.capture.max_bytes, 5 * 1024 * 1024);
        assert!(config.capture.allows(ImageMime::Webp));
        assert_eq!(config.jpeg_quality, 95);
        assert_eq!(config.camera_facing, FacingMode::Environment);
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = AppConfig {
            language: Language::En,
            user_type: UserType::Shipper,
            ..Default::default()
        };
        config.save(&path).unwrap();
        assert_eq!(AppConfig::load(&path), config);
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(
            AppConfig::load(&dir.path().join("absent.json")),
            AppConfig::default()
        );
    }

    #[test]
    fn corrupt_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert_eq!(AppConfig::load(&path), AppConfig::default());
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "language": "en", "jpeg_quality": 0 }"#).unwrap();
        let config = AppConfig::load(&path);
        assert_eq!(config.language, Language::En);
        assert_eq!(config.jpeg_quality, 1);
        assert_eq!(config.user_type, UserType::Transporter);
    }
}
