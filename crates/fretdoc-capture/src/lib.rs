// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// fretdoc-capture — Document capture and extraction for Fretdoc onboarding.
//
// Takes a document photo from a file, a drop or the camera, keeps track of
// front and back for two-sided documents, reads fields through a pluggable
// extraction backend, and pre-fills the onboarding forms with what it found.

pub mod camera;
pub mod extract;
pub mod image;
pub mod integrity;
pub mod prefill;
pub mod sides;
pub mod source;
pub mod workflow;

pub use camera::{CameraSession, CameraState};
pub use extract::{DocumentExtractor, ExtractionAdapter, SampleExtractor};
pub use image::processor::ImageProcessor;
pub use prefill::{prefill, prefill_changes};
pub use sides::{SideCoordinator, SideEvent};
pub use source::{CaptureInput, CaptureOrigin, CaptureSelector, FileSelection, SelectedImage};
pub use workflow::{CaptureStep, DocumentCapture, ExtractionOutcome, PendingExtraction};

#[cfg(feature = "ocr")]
pub use extract::{OcrEngine, OcrExtractor};
