// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Central service layer — loads settings, picks the extraction backend and
// hands out capture workflows to the pages.

use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

use fretdoc_bridge::{NativeCamera, PlatformBridge};
use fretdoc_capture::{
    CameraSession, DocumentCapture, DocumentExtractor, ExtractionAdapter, FileSelection,
    SampleExtractor,
};
use fretdoc_core::AppConfig;
use fretdoc_core::error::Result;
use fretdoc_core::types::{DocumentType, StreamConstraints};
use tracing::info;

use super::data_dir;

/// Shared application services, available to every component through
/// `use_context::<AppServices>()`. Cheap to clone.
#[derive(Clone)]
pub struct AppServices {
    bridge: Arc<dyn PlatformBridge>,
    adapter: ExtractionAdapter,
    config: Arc<Mutex<AppConfig>>,
    config_path: PathBuf,
}

impl AppServices {
    /// Initialise services. Call once at app startup.
    pub fn init() -> Self {
        let config_path = data_dir::config_path();
        let config = AppConfig::load(&config_path);
        let bridge = fretdoc_bridge::platform_bridge();
        let adapter = ExtractionAdapter::new(extractor(&config), config.extraction_timeout());
        info!(
            platform = bridge.platform_name(),
            backend = adapter.backend(),
            config = %config_path.display(),
            "app services initialised"
        );
        Self {
            bridge,
            adapter,
            config: Arc::new(Mutex::new(config)),
            config_path,
        }
    }

    // -- Capture -------------------------------------------------------------

    /// A fresh capture workflow for one document, with its own camera session.
    pub fn new_capture(&self, document_type: DocumentType) -> DocumentCapture {
        let config = self.config();
        let camera: Arc<dyn NativeCamera> = self.bridge.clone();
        let constraints = StreamConstraints {
            facing: config.camera_facing,
            ..Default::default()
        };
        let session = CameraSession::new(camera, constraints, config.jpeg_quality);
        DocumentCapture::new(document_type, config.capture, self.adapter.clone(), session)
    }

    /// Let the user choose an image file. `Ok(None)` when the dialog was
    /// dismissed.
    pub fn pick_image(&self) -> Result<Option<FileSelection>> {
        #[cfg(not(any(target_os = "ios", target_os = "android")))]
        {
            let Some(path) = rfd::FileDialog::new()
                .add_filter("Images", &["jpg", "jpeg", "png", "webp"])
                .pick_file()
            else {
                return Ok(None);
            };
            FileSelection::from_path(&path).map(Some)
        }
        #[cfg(any(target_os = "ios", target_os = "android"))]
        {
            let mimes = ["image/jpeg", "image/png", "image/webp"];
            let Some(path) = self.bridge.pick_file(&mimes)? else {
                return Ok(None);
            };
            let bytes = self.bridge.read_picked_file(&path)?;
            let name = path.rsplit('/').next().unwrap_or("document").to_owned();
            Ok(Some(FileSelection::new(bytes, None, name)))
        }
    }

    // -- Config Persistence --------------------------------------------------

    pub fn config(&self) -> AppConfig {
        self.config
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Update and persist the config.
    pub fn save_config(&self, config: &AppConfig) -> Result<()> {
        *self.config.lock().unwrap_or_else(PoisonError::into_inner) = config.clone();
        config.save(&self.config_path)
    }
}

/// The extraction backend for this build: on-device OCR when compiled in and
/// its models are installed, sample data otherwise.
fn extractor(config: &AppConfig) -> Arc<dyn DocumentExtractor> {
    #[cfg(feature = "ocr")]
    {
        use fretdoc_capture::extract::ocr::{OcrEngine, OcrExtractor, models_available};
        if models_available() {
            match OcrEngine::with_defaults() {
                Ok(engine) => return Arc::new(OcrExtractor::new(Arc::new(engine))),
                Err(e) => tracing::warn!(error = %e, "OCR unavailable, using sample extractor"),
            }
        }
    }
    Arc::new(SampleExtractor::new(config.sample_delay()))
}
