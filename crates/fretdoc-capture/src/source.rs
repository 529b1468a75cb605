// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Capture source selection — the file picker, drag-and-drop and camera all end
// up here and leave as one validated `SelectedImage`.

use std::path::Path;
use std::sync::Arc;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use fretdoc_core::config::CaptureLimits;
use fretdoc_core::error::{FretdocError, Result};
use fretdoc_core::types::ImageMime;
use tracing::{debug, info, instrument, warn};

use crate::integrity;

/// How an image entered the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureOrigin {
    FilePicker,
    DragAndDrop,
    Camera,
}

/// Raw file as delivered by a picker or a drop event.
#[derive(Debug, Clone)]
pub struct FileSelection {
    pub bytes: Vec<u8>,
    /// MIME type reported by the platform, if any.
    pub declared_mime: Option<String>,
    pub file_name: String,
}

impl FileSelection {
    pub fn new(bytes: Vec<u8>, declared_mime: Option<&str>, file_name: impl Into<String>) -> Self {
        Self {
            bytes,
            declared_mime: declared_mime.map(str::to_owned),
            file_name: file_name.into(),
        }
    }

    /// Read a file from disk. No MIME type is declared; it is inferred later.
    pub fn from_path(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document".into());
        Ok(Self {
            bytes,
            declared_mime: None,
            file_name,
        })
    }
}

/// What the user handed us.
#[derive(Debug, Clone)]
pub enum CaptureInput {
    /// Chosen through the file dialog.
    Picked(FileSelection),
    /// Dropped onto the capture surface.
    Dropped(FileSelection),
    /// Snapshot from a camera session.
    Camera(FileSelection),
}

impl CaptureInput {
    pub fn origin(&self) -> CaptureOrigin {
        match self {
            Self::Picked(_) => CaptureOrigin::FilePicker,
            Self::Dropped(_) => CaptureOrigin::DragAndDrop,
            Self::Camera(_) => CaptureOrigin::Camera,
        }
    }
}

/// A validated image ready for preview and extraction.
///
/// Bytes are shared, so cloning for an extraction call is cheap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedImage {
    bytes: Arc<[u8]>,
    mime: ImageMime,
    file_name: String,
    origin: CaptureOrigin,
    fingerprint: String,
}

impl SelectedImage {
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn mime(&self) -> ImageMime {
        self.mime
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn origin(&self) -> CaptureOrigin {
        self.origin
    }

    /// SHA-256 hex of the bytes.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// `data:` URL for an `<img>` preview.
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime.as_str(), STANDARD.encode(&self.bytes))
    }
}

/// Validate an input and turn it into a `SelectedImage`.
///
/// Picked, dropped and camera inputs go through the exact same checks.
#[instrument(skip_all, fields(origin = ?input.origin()))]
pub fn normalize(input: CaptureInput, limits: &CaptureLimits) -> Result<SelectedImage> {
    let origin = input.origin();
    let (CaptureInput::Picked(file) | CaptureInput::Dropped(file) | CaptureInput::Camera(file)) =
        input;

    let size = file.bytes.len() as u64;
    if size == 0 {
        return Err(FretdocError::EmptyFile);
    }
    if size > limits.max_bytes {
        warn!(size, limit = limits.max_bytes, file = %file.file_name, "rejecting oversize image");
        return Err(FretdocError::FileTooLarge {
            size,
            limit: limits.max_bytes,
        });
    }

    let mime = resolve_mime(&file)?;
    if !limits.allows(mime) {
        return Err(FretdocError::UnsupportedMimeType(mime.as_str().into()));
    }

    let fingerprint = integrity::fingerprint(&file.bytes);
    info!(
        file = %file.file_name,
        mime = mime.as_str(),
        size,
        fingerprint = integrity::short(&fingerprint),
        "image accepted"
    );
    Ok(SelectedImage {
        bytes: Arc::from(file.bytes),
        mime,
        file_name: file.file_name,
        origin,
        fingerprint,
    })
}

/// Declared type first, then the file extension, then the content itself.
fn resolve_mime(file: &FileSelection) -> Result<ImageMime> {
    if let Some(declared) = file.declared_mime.as_deref().filter(|m| !m.trim().is_empty()) {
        return ImageMime::from_mime(declared)
            .ok_or_else(|| FretdocError::UnsupportedMimeType(declared.to_owned()));
    }

    let from_ext = Path::new(&file.file_name)
        .extension()
        .and_then(|e| e.to_str())
        .and_then(ImageMime::from_extension);
    if let Some(mime) = from_ext {
        return Ok(mime);
    }

    let sniffed = image::guess_format(&file.bytes).map_err(|_| {
        FretdocError::UnsupportedMimeType(format!("unrecognised content in {}", file.file_name))
    })?;
    debug!(?sniffed, "mime type sniffed from content");
    match sniffed {
        image::ImageFormat::Jpeg => Ok(ImageMime::Jpeg),
        image::ImageFormat::Png => Ok(ImageMime::Png),
        image::ImageFormat::WebP => Ok(ImageMime::Webp),
        other => Err(FretdocError::UnsupportedMimeType(
            other.to_mime_type().to_owned(),
        )),
    }
}

/// Holds the current preview. A rejected input never disturbs it.
#[derive(Debug, Clone, Default)]
pub struct CaptureSelector {
    limits: CaptureLimits,
    preview: Option<SelectedImage>,
}

impl CaptureSelector {
    pub fn new(limits: CaptureLimits) -> Self {
        Self {
            limits,
            preview: None,
        }
    }

    /// Validate `input` and make it the current preview.
    pub fn accept(&mut self, input: CaptureInput) -> Result<&SelectedImage> {
        let image = normalize(input, &self.limits)?;
        Ok(self.preview.insert(image))
    }

    /// Install an image already validated against these limits.
    pub(crate) fn set_preview(&mut self, image: SelectedImage) -> &SelectedImage {
        self.preview.insert(image)
    }

    pub fn preview(&self) -> Option<&SelectedImage> {
        self.preview.as_ref()
    }

    pub fn clear(&mut self) {
        self.preview = None;
    }

    pub fn limits(&self) -> &CaptureLimits {
        &self.limits
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];

    fn jpeg_file(name: &str, len: usize) -> FileSelection {
        FileSelection::new(vec![0xAB; len], Some("image/jpeg"), name)
    }

    #[test]
    fn accepts_declared_jpeg() {
        let img = normalize(
            CaptureInput::Picked(jpeg_file("carte-grise.jpg", 1024)),
            &CaptureLimits::default(),
        )
        .unwrap();
        assert_eq!(img.mime(), ImageMime::Jpeg);
        assert_eq!(img.origin(), CaptureOrigin::FilePicker);
        assert_eq!(img.fingerprint().len(), 64);
    }

    #[test]
    fn rejects_oversize() {
        let err = normalize(
            CaptureInput::Picked(jpeg_file("big.jpg", 6 * 1024 * 1024)),
            &CaptureLimits::default(),
        )
        .unwrap_err();
        assert!(matches!(err, FretdocError::FileTooLarge { size, .. } if size == 6 * 1024 * 1024));
    }

    #[test]
    fn exactly_at_limit_is_accepted() {
        let limits = CaptureLimits::default();
        let file = jpeg_file("edge.jpg", limits.max_bytes as usize);
        assert!(normalize(CaptureInput::Picked(file), &limits).is_ok());
    }

    #[test]
    fn rejects_disallowed_declared_type() {
        let file = FileSelection::new(vec![1, 2, 3], Some("application/pdf"), "scan.pdf");
        let err = normalize(CaptureInput::Dropped(file), &CaptureLimits::default()).unwrap_err();
        assert!(matches!(err, FretdocError::UnsupportedMimeType(m) if m == "application/pdf"));
    }

    #[test]
    fn rejects_empty() {
        let file = FileSelection::new(Vec::new(), Some("image/png"), "empty.png");
        assert!(matches!(
            normalize(CaptureInput::Picked(file), &CaptureLimits::default()),
            Err(FretdocError::EmptyFile)
        ));
    }

    #[test]
    fn falls_back_to_extension_then_content() {
        let by_ext = FileSelection::new(vec![1; 10], None, "permis.WEBP");
        assert_eq!(
            normalize(CaptureInput::Picked(by_ext), &CaptureLimits::default())
                .unwrap()
                .mime(),
            ImageMime::Webp
        );

        let sniffed = FileSelection::new(PNG_MAGIC.to_vec(), None, "blob");
        assert_eq!(
            normalize(CaptureInput::Dropped(sniffed), &CaptureLimits::default())
                .unwrap()
                .mime(),
            ImageMime::Png
        );

        let unknown = FileSelection::new(b"hello".to_vec(), None, "notes");
        assert!(normalize(CaptureInput::Dropped(unknown), &CaptureLimits::default()).is_err());
    }

    #[test]
    fn respects_narrowed_allow_list() {
        let limits = CaptureLimits {
            allowed: vec![ImageMime::Jpeg],
            ..Default::default()
        };
        let file = FileSelection::new(PNG_MAGIC.to_vec(), Some("image/png"), "a.png");
        assert!(matches!(
            normalize(CaptureInput::Picked(file), &limits),
            Err(FretdocError::UnsupportedMimeType(_))
        ));
    }

    #[test]
    fn drop_and_pick_are_equivalent() {
        let limits = CaptureLimits::default();
        let picked = normalize(CaptureInput::Picked(jpeg_file("a.jpg", 64)), &limits).unwrap();
        let dropped = normalize(CaptureInput::Dropped(jpeg_file("a.jpg", 64)), &limits).unwrap();
        assert_eq!(picked.bytes(), dropped.bytes());
        assert_eq!(picked.mime(), dropped.mime());
        assert_eq!(picked.fingerprint(), dropped.fingerprint());
        assert_eq!(picked.file_name(), dropped.file_name());
    }

    #[test]
    fn rejection_keeps_previous_preview() {
        let mut selector = CaptureSelector::default();
        selector
            .accept(CaptureInput::Picked(jpeg_file("front.jpg", 128)))
            .unwrap();
        let before = selector.preview().cloned();

        let err = selector
            .accept(CaptureInput::Picked(jpeg_file("huge.jpg", 6 * 1024 * 1024)))
            .unwrap_err();
        assert!(matches!(err, FretdocError::FileTooLarge { .. }));
        assert_eq!(selector.preview().cloned(), before);
    }

    #[test]
    fn data_url_prefix() {
        let img = normalize(
            CaptureInput::Picked(FileSelection::new(vec![0, 1, 2], Some("image/png"), "x.png")),
            &CaptureLimits::default(),
        )
        .unwrap();
        assert_eq!(img.to_data_url(), "data:image/png;base64,AAEC");
    }
}
