// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// On-device OCR backend.
//
// Reads the document photo with the `ocrs` engine (neural models executed by
// `rten`) and turns the printed "Label: value" lines into extraction fields.
// Only built with the `ocr` feature:
//
// ```toml
// fretdoc-capture = { path = "crates/fretdoc-capture", features = ["ocr"] }
// ```
//
// The engine needs `text-detection.rten` and `text-recognition.rten`, which
// `ocrs-cli` downloads to `$XDG_CACHE_HOME/ocrs` on first run.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use fretdoc_core::error::{FretdocError, Result};
use fretdoc_core::types::{Confidence, DocumentType, ExtractionResult};
use image::DynamicImage;
use ocrs::{ImageSource, OcrEngine as OcrsEngine, OcrEngineParams};
use rten::Model;
use tracing::{debug, info, instrument};

use super::adapter::DocumentExtractor;
use super::labels::{coverage, parse_labelled_fields};
use crate::image::ImageProcessor;
use crate::source::SelectedImage;

const DETECTION_MODEL_FILENAME: &str = "text-detection.rten";
const RECOGNITION_MODEL_FILENAME: &str = "text-recognition.rten";

/// Longest side handed to the text detector; phone photos are far larger.
const OCR_MAX_SIDE: u32 = 2_048;

fn default_model_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CACHE_HOME") {
        PathBuf::from(xdg).join("ocrs")
    } else if let Ok(home) = std::env::var("HOME") {
        PathBuf::from(home).join(".cache").join("ocrs")
    } else {
        PathBuf::from("ocrs-models")
    }
}

/// Where the two OCR models live.
#[derive(Debug, Clone)]
pub struct OcrConfig {
    pub detection_model_path: PathBuf,
    pub recognition_model_path: PathBuf,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self::from_dir(default_model_dir())
    }
}

impl OcrConfig {
    /// Expects `text-detection.rten` and `text-recognition.rten` in `dir`.
    pub fn from_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            detection_model_path: dir.join(DETECTION_MODEL_FILENAME),
            recognition_model_path: dir.join(RECOGNITION_MODEL_FILENAME),
        }
    }

    pub fn validate(&self) -> Result<()> {
        for path in [&self.detection_model_path, &self.recognition_model_path] {
            if !path.exists() {
                return Err(FretdocError::OcrError(format!(
                    "model not found at {}; run `ocrs-cli` once to download models",
                    path.display()
                )));
            }
        }
        Ok(())
    }
}

/// Loaded OCR models. Loading is the slow part; build once and share.
pub struct OcrEngine {
    engine: OcrsEngine,
}

impl OcrEngine {
    #[instrument(skip_all, fields(
        detection = %config.detection_model_path.display(),
        recognition = %config.recognition_model_path.display(),
    ))]
    pub fn new(config: OcrConfig) -> Result<Self> {
        config.validate()?;

        let load = |path: &Path| {
            Model::load_file(path).map_err(|err| {
                FretdocError::OcrError(format!("failed to load model {}: {err}", path.display()))
            })
        };
        let detection_model = load(&config.detection_model_path)?;
        let recognition_model = load(&config.recognition_model_path)?;

        let engine = OcrsEngine::new(OcrEngineParams {
            detection_model: Some(detection_model),
            recognition_model: Some(recognition_model),
            ..Default::default()
        })
        .map_err(|err| FretdocError::OcrError(format!("failed to initialise OCR engine: {err}")))?;

        info!("OCR engine ready");
        Ok(Self { engine })
    }

    pub fn with_defaults() -> Result<Self> {
        Self::new(OcrConfig::default())
    }

    /// All recognised text, one line per printed line.
    #[instrument(skip_all, fields(width = image.width(), height = image.height()))]
    pub fn recognize_text(&self, image: &DynamicImage) -> Result<String> {
        let rgb = image.to_rgb8();
        let (width, height) = rgb.dimensions();
        let source = ImageSource::from_bytes(rgb.as_raw(), (width, height)).map_err(|err| {
            FretdocError::OcrError(format!("bad image source ({width}x{height}): {err}"))
        })?;
        let input = self
            .engine
            .prepare_input(source)
            .map_err(|err| FretdocError::OcrError(format!("OCR preprocessing failed: {err}")))?;
        let text = self
            .engine
            .get_text(&input)
            .map_err(|err| FretdocError::OcrError(format!("text recognition failed: {err}")))?;
        debug!(lines = text.lines().count(), "text recognised");
        Ok(text)
    }
}

/// Whether both model files are in the default cache directory.
pub fn models_available() -> bool {
    OcrConfig::default().validate().is_ok()
}

/// `DocumentExtractor` backed by the on-device OCR engine.
///
/// Confidence is the share of the document's expected fields that were
/// found on the page.
#[derive(Clone)]
pub struct OcrExtractor {
    engine: Arc<OcrEngine>,
}

impl OcrExtractor {
    pub fn new(engine: Arc<OcrEngine>) -> Self {
        Self { engine }
    }
}

#[async_trait]
impl DocumentExtractor for OcrExtractor {
    fn name(&self) -> &str {
        "ocr"
    }

    async fn extract(
        &self,
        image: &SelectedImage,
        document_type: DocumentType,
    ) -> Result<ExtractionResult> {
        let bytes = image.bytes().to_vec();
        let engine = Arc::clone(&self.engine);

        let text = tokio::task::spawn_blocking(move || {
            let prepared = ImageProcessor::from_bytes(&bytes)?
                .fit_within(OCR_MAX_SIDE, OCR_MAX_SIDE)
                .prepare_for_ocr()
                .into_dynamic();
            engine.recognize_text(&prepared)
        })
        .await
        .map_err(|e| FretdocError::OcrError(format!("OCR task aborted: {e}")))??;

        let fields = parse_labelled_fields(&text);
        let confidence = Confidence::new(coverage(&fields, document_type));
        debug!(fields = fields.len(), "labelled fields parsed");
        Ok(ExtractionResult::new(document_type, fields, confidence))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_from_dir() {
        let config = OcrConfig::from_dir("/tmp/models");
        assert_eq!(
            config.detection_model_path,
            PathBuf::from("/tmp/models/text-detection.rten")
        );
        assert_eq!(
            config.recognition_model_path,
            PathBuf::from("/tmp/models/text-recognition.rten")
        );
    }

    #[test]
    fn missing_models_are_an_ocr_error() {
        let config = OcrConfig::from_dir("/nonexistent/ocr-models");
        assert!(matches!(config.validate(), Err(FretdocError::OcrError(_))));
        assert!(OcrEngine::new(config).is_err());
    }
}
