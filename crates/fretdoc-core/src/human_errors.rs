// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for the capture screens.
//
// Every technical error is mapped to a plain message with a clear suggestion.
// Severity drives the toast style; extraction problems always point the user
// to manual entry.

use crate::error::FretdocError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Worth trying again straight away.
    Transient,
    /// The user must do something (grant permission, pick another file).
    ActionRequired,
    /// Automatic reading failed; fill the form by hand.
    ManualEntry,
    /// Not possible on this device or with this file.
    Permanent,
}

/// A human-readable error with plain message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Short summary (toast title).
    pub message: String,
    /// What the user should try.
    pub suggestion: String,
    /// Whether offering a retry button makes sense.
    pub retriable: bool,
    /// Drives icon and colour.
    pub severity: Severity,
}

impl HumanError {
    fn new(message: &str, suggestion: impl Into<String>, retriable: bool, severity: Severity) -> Self {
        Self {
            message: message.into(),
            suggestion: suggestion.into(),
            retriable,
            severity,
        }
    }
}

/// Convert a `FretdocError` into something a driver at a roadside stop can act on.
pub fn humanize_error(err: &FretdocError) -> HumanError {
    use Severity::*;

    match err {
        // -- Acquisition --
        FretdocError::UnsupportedMimeType(kind) => HumanError::new(
            "This file type isn't accepted.",
            format!("Please choose a JPEG, PNG or WebP photo of the document. (File type: {kind})"),
            false,
            ActionRequired,
        ),
        FretdocError::FileTooLarge { limit, .. } => HumanError::new(
            "This photo is too large.",
            format!(
                "Photos must be smaller than {} MB. Retake the photo at a lower resolution or choose a smaller file.",
                limit / (1024 * 1024)
            ),
            false,
            ActionRequired,
        ),
        FretdocError::EmptyFile => HumanError::new(
            "The selected file is empty.",
            "Choose the file again; it may not have finished downloading.",
            false,
            ActionRequired,
        ),
        FretdocError::CameraPermissionDenied => HumanError::new(
            "We can't use your camera.",
            "Allow camera access for this app in your settings, or choose an existing photo instead.",
            false,
            ActionRequired,
        ),
        FretdocError::CameraUnavailable(_) => HumanError::new(
            "No camera was found.",
            "Choose an existing photo of the document instead.",
            false,
            Permanent,
        ),
        FretdocError::CameraState { .. } => HumanError::new(
            "The camera isn't ready yet.",
            "Wait a moment, then try again.",
            true,
            Transient,
        ),
        FretdocError::FrameCapture(_) => HumanError::new(
            "The photo couldn't be taken.",
            "Hold the phone steady and try again.",
            true,
            Transient,
        ),
        FretdocError::ImageError(_) => HumanError::new(
            "There's a problem with this image.",
            "The image may be damaged. Take a new photo or save it as JPEG first.",
            false,
            ActionRequired,
        ),
        FretdocError::DuplicateSide => HumanError::new(
            "That's the same photo as the front.",
            "Turn the document over and photograph the back.",
            false,
            ActionRequired,
        ),
        FretdocError::CaptureBusy => HumanError::new(
            "Another capture is still in progress.",
            "Take the photo or close the camera, or wait for the document to be read, then try again.",
            true,
            Transient,
        ),
        FretdocError::ExtractionInFlight => HumanError::new(
            "We're still reading the previous photo.",
            "Wait for it to finish, then try again.",
            true,
            Transient,
        ),
        FretdocError::NoImageSelected => HumanError::new(
            "No photo selected yet.",
            "Take a photo or choose an image of the document first.",
            false,
            ActionRequired,
        ),

        // -- Extraction --
        FretdocError::ExtractionFailed(_)
        | FretdocError::ExtractionTimeout(_)
        | FretdocError::MalformedExtraction(_)
        | FretdocError::OcrError(_) => HumanError::new(
            "We couldn't read this document automatically.",
            "Please fill in the form by hand. A sharper photo in good light may work better.",
            true,
            ManualEntry,
        ),

        // -- Resource release (normally only logged) --
        FretdocError::TrackRelease { .. } => HumanError::new(
            "The camera didn't close cleanly.",
            "You can carry on; restart the app if the camera light stays on.",
            false,
            Transient,
        ),

        // -- Storage --
        FretdocError::Io(io_err) if io_err.kind() == std::io::ErrorKind::NotFound => {
            HumanError::new(
                "The file couldn't be found.",
                "It may have been moved or deleted. Try choosing it again.",
                false,
                ActionRequired,
            )
        }
        FretdocError::Io(io_err) if io_err.kind() == std::io::ErrorKind::PermissionDenied => {
            HumanError::new(
                "The app doesn't have permission to read that file.",
                "Copy the file somewhere else, or grant storage access, then try again.",
                false,
                ActionRequired,
            )
        }
        FretdocError::Io(_) => HumanError::new(
            "There was a problem reading or writing a file.",
            "Try again. If this keeps happening, your device's storage may be full.",
            true,
            Transient,
        ),
        FretdocError::Serialization(_) => HumanError::new(
            "The app had an internal data problem.",
            "Try again. If this keeps happening, please report it.",
            true,
            Transient,
        ),

        // -- Platform --
        FretdocError::Bridge(_) => HumanError::new(
            "A device feature didn't work.",
            "Try again, or choose an existing photo instead.",
            true,
            Transient,
        ),
        FretdocError::PlatformUnavailable => HumanError::new(
            "This feature isn't available on your device.",
            "Choose an existing photo of the document instead.",
            false,
            Permanent,
        ),
    }
}
