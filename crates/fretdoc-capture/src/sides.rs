// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Front/back coordination for two-sided documents.

use fretdoc_core::error::{FretdocError, Result};
use fretdoc_core::types::{DocumentSide, DocumentType, ExtractionResult};
use tracing::{debug, info};

use crate::source::SelectedImage;

/// What the caller should tell the user after a side was recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SideEvent {
    /// Still expecting the front (no usable front result yet).
    StayOnFront,
    /// Front done; ask for the back.
    FlipToBack,
    /// All required sides captured.
    Completed,
}

/// Tracks which side of a document is expected next.
#[derive(Debug, Clone)]
pub struct SideCoordinator {
    document_type: DocumentType,
    current: DocumentSide,
    front_image: Option<SelectedImage>,
    front_result: Option<ExtractionResult>,
    complete: bool,
}

impl SideCoordinator {
    pub fn new(document_type: DocumentType) -> Self {
        Self {
            document_type,
            current: DocumentSide::Front,
            front_image: None,
            front_result: None,
            complete: false,
        }
    }

    pub fn document_type(&self) -> DocumentType {
        self.document_type
    }

    /// Always `Front` for single-sided documents.
    pub fn current_side(&self) -> DocumentSide {
        self.current
    }

    pub fn needs_back(&self) -> bool {
        self.document_type.two_sided()
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn front_image(&self) -> Option<&SelectedImage> {
        self.front_image.as_ref()
    }

    pub fn front_result(&self) -> Option<&ExtractionResult> {
        self.front_result.as_ref()
    }

    /// Record a front capture and, for two-sided documents with a front
    /// result, move on to the back.
    pub fn record_front(
        &mut self,
        image: SelectedImage,
        result: Option<ExtractionResult>,
    ) -> SideEvent {
        if self.current != DocumentSide::Front || self.complete {
            debug!(document = %self.document_type, "front already recorded, ignoring");
            return self.next_event();
        }

        self.front_image = Some(image);
        if result.is_some() {
            self.front_result = result;
        }

        if !self.needs_back() {
            self.complete = true;
            info!(document = %self.document_type, "single-sided document complete");
            return SideEvent::Completed;
        }

        if self.flip_to_back() {
            SideEvent::FlipToBack
        } else {
            SideEvent::StayOnFront
        }
    }

    /// Move to the back side. A no-op unless the document is two-sided and
    /// a front image and front result are held.
    pub fn flip_to_back(&mut self) -> bool {
        if self.current == DocumentSide::Back {
            return true;
        }
        if !self.needs_back() || self.front_image.is_none() || self.front_result.is_none() {
            debug!(document = %self.document_type, "flip to back refused");
            return false;
        }
        self.current = DocumentSide::Back;
        info!(document = %self.document_type, "front captured, waiting for back");
        true
    }

    /// Check a back capture against the held front.
    pub fn check_back(&self, image: &SelectedImage) -> Result<()> {
        match &self.front_image {
            Some(front) if front.fingerprint() == image.fingerprint() => {
                Err(FretdocError::DuplicateSide)
            }
            _ => Ok(()),
        }
    }

    /// Record the back capture, completing a two-sided document.
    pub fn record_back(&mut self, image: &SelectedImage) -> Result<SideEvent> {
        if self.current != DocumentSide::Back {
            debug!(document = %self.document_type, "back recorded while expecting front, ignoring");
            return Ok(self.next_event());
        }
        self.check_back(image)?;
        self.complete = true;
        info!(document = %self.document_type, "two-sided document complete");
        Ok(SideEvent::Completed)
    }

    /// Back to the front side, dropping any held front image and result.
    pub fn reset(&mut self) {
        self.front_image = None;
        self.front_result = None;
        self.current = DocumentSide::Front;
        self.complete = false;
    }

    /// What the user is waiting on right now.
    pub fn next_event(&self) -> SideEvent {
        match (self.complete, self.current) {
            (true, _) => SideEvent::Completed,
            (false, DocumentSide::Back) => SideEvent::FlipToBack,
            (false, DocumentSide::Front) => SideEvent::StayOnFront,
        }
    }
}
