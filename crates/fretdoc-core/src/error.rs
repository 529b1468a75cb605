// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Fretdoc.

use thiserror::Error;

/// Top-level error type for all Fretdoc operations.
#[derive(Debug, Error)]
pub enum FretdocError {
    // -- Acquisition errors --
    #[error("unsupported image type: {0}")]
    UnsupportedMimeType(String),

    #[error("image is too large: {size} bytes (limit {limit} bytes)")]
    FileTooLarge { size: u64, limit: u64 },

    #[error("selected file is empty")]
    EmptyFile,

    #[error("camera permission denied")]
    CameraPermissionDenied,

    #[error("no camera available: {0}")]
    CameraUnavailable(String),

    #[error("camera is {actual}, expected {expected}")]
    CameraState {
        expected: &'static str,
        actual: &'static str,
    },

    #[error("frame capture failed: {0}")]
    FrameCapture(String),

    #[error("image processing failed: {0}")]
    ImageError(String),

    #[error("back side is identical to the front side")]
    DuplicateSide,

    #[error("a capture is already being processed")]
    CaptureBusy,

    #[error("no image selected")]
    NoImageSelected,

    // -- Extraction errors --
    #[error("extraction failed: {0}")]
    ExtractionFailed(String),

    #[error("extraction timed out after {0} ms")]
    ExtractionTimeout(u64),

    #[error("malformed extraction response: {0}")]
    MalformedExtraction(String),

    #[error("an extraction is already in flight")]
    ExtractionInFlight,

    #[error("OCR failed: {0}")]
    OcrError(String),

    // -- Resource release --
    #[error("failed to release camera track {track}: {reason}")]
    TrackRelease { track: String, reason: String },

    // -- Storage / persistence --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // -- Platform bridge --
    #[error("platform bridge error: {0}")]
    Bridge(String),

    #[error("feature not available on this platform")]
    PlatformUnavailable,
}

/// Where an error sits in the capture workflow's error taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Reported where it happens; capture state rolls back to before the attempt.
    Acquisition,
    /// Degrades to manual entry; form values are kept.
    Extraction,
    /// Logged only, never shown to the user.
    ResourceRelease,
    /// Persistence and serialisation problems outside the capture flow.
    Internal,
}

impl FretdocError {
    /// Classify this error for propagation decisions.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::UnsupportedMimeType(_)
            | Self::FileTooLarge { .. }
            | Self::EmptyFile
            | Self::CameraPermissionDenied
            | Self::CameraUnavailable(_)
            | Self::CameraState { .. }
            | Self::FrameCapture(_)
            | Self::ImageError(_)
            | Self::DuplicateSide
            | Self::CaptureBusy
            | Self::NoImageSelected
            | Self::Bridge(_)
            | Self::PlatformUnavailable => ErrorCategory::Acquisition,

            Self::ExtractionFailed(_)
            | Self::ExtractionTimeout(_)
            | Self::MalformedExtraction(_)
            | Self::ExtractionInFlight
            | Self::OcrError(_) => ErrorCategory::Extraction,

            Self::TrackRelease { .. } => ErrorCategory::ResourceRelease,

            Self::Io(_) | Self::Serialization(_) => ErrorCategory::Internal,
        }
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, FretdocError>;
