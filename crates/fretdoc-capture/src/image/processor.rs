// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image processor — turns camera frames into still images, decodes selected
// files for validation, and prepares images for text recognition. Operates on
// in-memory images using the `image` and `imageproc` crates.

use fretdoc_core::error::FretdocError;
use fretdoc_core::types::VideoFrame;
use image::{DynamicImage, RgbaImage};
use tracing::{debug, info, instrument};

/// Image pipeline operating on a single in-memory image.
///
/// Transformations consume `self` and return a new processor, so steps chain:
///
/// ```ignore
/// let jpeg = ImageProcessor::from_frame(frame)?
///     .fit_within(2048, 2048)
///     .to_jpeg_bytes(95)?;
/// ```
pub struct ImageProcessor {
    image: DynamicImage,
}

impl ImageProcessor {
    // -- Construction ---------------------------------------------------------

    /// Wrap a raw RGBA camera frame.
    ///
    /// Incomplete frames (buffer shorter than `width * height * 4`) are
    /// rejected so a half-delivered frame never becomes a document photo.
    #[instrument(skip(frame), fields(width = frame.width, height = frame.height))]
    pub fn from_frame(frame: VideoFrame) -> Result<Self, FretdocError> {
        if !frame.is_complete() {
            return Err(FretdocError::FrameCapture(format!(
                "incomplete frame: {} bytes for {}x{}",
                frame.rgba.len(),
                frame.width,
                frame.height
            )));
        }
        let buffer = RgbaImage::from_raw(frame.width, frame.height, frame.rgba).ok_or_else(|| {
            FretdocError::FrameCapture("frame buffer does not match its dimensions".into())
        })?;
        debug!("Frame wrapped");
        Ok(Self {
            image: DynamicImage::ImageRgba8(buffer),
        })
    }

    /// Decode encoded bytes (JPEG, PNG, WebP).
    #[instrument(skip(data), fields(data_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self, FretdocError> {
        let img = image::load_from_memory(data).map_err(|err| {
            FretdocError::ImageError(format!("failed to decode image: {}", err))
        })?;
        debug!(width = img.width(), height = img.height(), "Image decoded from bytes");
        Ok(Self { image: img })
    }

    // -- Accessors ------------------------------------------------------------

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn as_dynamic(&self) -> &DynamicImage {
        &self.image
    }

    pub fn into_dynamic(self) -> DynamicImage {
        self.image
    }

    // -- Transformations ------------------------------------------------------

    /// Downscale to fit within `max_width` x `max_height`, preserving aspect
    /// ratio. Images already within bounds are left alone.
    pub fn fit_within(self, max_width: u32, max_height: u32) -> Self {
        if self.image.width() <= max_width && self.image.height() <= max_height {
            return self;
        }
        info!(
            from_w = self.image.width(),
            from_h = self.image.height(),
            max_width,
            max_height,
            "Downscaling image"
        );
        Self {
            image: self
                .image
                .resize(max_width, max_height, image::imageops::FilterType::Lanczos3),
        }
    }

    /// Grayscale plus a full-range contrast stretch, which is what the text
    /// detector copes with best on phone photos of laminated cards.
    #[instrument(skip(self))]
    pub fn prepare_for_ocr(self) -> Self {
        let gray = self.image.to_luma8();
        let (lo, hi) = gray
            .pixels()
            .fold((u8::MAX, u8::MIN), |(lo, hi), p| (lo.min(p[0]), hi.max(p[0])));
        let stretched = if hi > lo {
            imageproc::contrast::stretch_contrast(&gray, lo, hi, 0, 255)
        } else {
            gray
        };
        debug!(lo, hi, "Contrast stretched for OCR");
        Self {
            image: DynamicImage::ImageLuma8(stretched),
        }
    }

    // -- Output ---------------------------------------------------------------

    /// Encode as JPEG bytes with the given quality (1-100).
    pub fn to_jpeg_bytes(&self, quality: u8) -> Result<Vec<u8>, FretdocError> {
        let mut buffer = Vec::new();
        let rgb = self.image.to_rgb8();
        let encoder =
            image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buffer, quality.clamp(1, 100));
        rgb.write_with_encoder(encoder).map_err(|err| {
            FretdocError::ImageError(format!("JPEG encoding failed: {}", err))
        })?;
        Ok(buffer)
    }
}
