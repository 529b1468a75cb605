// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// One capture slot: selector, camera, side coordinator and extraction, wired
// together with the serialisation rules of the capture screen.
//
// Extraction is split in three so the UI can await it without holding a
// borrow of the workflow:
//
//   begin_extraction() -> PendingExtraction   (synchronous, takes a ticket)
//   PendingExtraction::run().await            (owns everything it needs)
//   finish_extraction(outcome)                (stale tickets are dropped)
//
// Every `select`, `cancel` and `reset` moves the slot to a new generation, so
// an outcome issued for an older generation can never touch the sides or the
// preview.

use fretdoc_bridge::traits::NativeCamera;
use fretdoc_core::config::CaptureLimits;
use fretdoc_core::error::{FretdocError, Result};
use fretdoc_core::types::{DocumentSide, DocumentType, ExtractionResult};
use tracing::{debug, info, warn};

use crate::camera::CameraSession;
use crate::extract::ExtractionAdapter;
use crate::sides::{SideCoordinator, SideEvent};
use crate::source::{CaptureInput, CaptureSelector, SelectedImage, normalize};

/// Identifies the slot generation an extraction was started in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractionTicket {
    generation: u64,
}

/// An extraction that has been admitted but not yet run.
///
/// Owns its image and adapter, so it can be moved into a spawned task.
pub struct PendingExtraction {
    ticket: ExtractionTicket,
    adapter: ExtractionAdapter,
    image: SelectedImage,
    document_type: DocumentType,
    side: DocumentSide,
}

impl PendingExtraction {
    pub fn ticket(&self) -> ExtractionTicket {
        self.ticket
    }

    pub fn side(&self) -> DocumentSide {
        self.side
    }

    pub async fn run(self) -> ExtractionOutcome {
        let result = self.adapter.extract(&self.image, self.document_type).await;
        ExtractionOutcome {
            ticket: self.ticket,
            image: self.image,
            side: self.side,
            result,
        }
    }
}

/// The result of a finished `PendingExtraction`, to hand back to
/// [`DocumentCapture::finish_extraction`].
#[derive(Debug)]
pub struct ExtractionOutcome {
    ticket: ExtractionTicket,
    image: SelectedImage,
    side: DocumentSide,
    result: Option<ExtractionResult>,
}

impl ExtractionOutcome {
    pub fn ticket(&self) -> ExtractionTicket {
        self.ticket
    }
}

/// What an accepted extraction outcome means for the screen.
#[derive(Debug, Clone)]
pub struct CaptureStep {
    /// Side the extraction was run for.
    pub side: DocumentSide,
    pub event: SideEvent,
    /// Fields to pre-fill from; `None` means manual entry.
    pub result: Option<ExtractionResult>,
}

/// The capture workflow for one document.
pub struct DocumentCapture<C: NativeCamera + ?Sized = dyn NativeCamera> {
    selector: CaptureSelector,
    sides: SideCoordinator,
    adapter: ExtractionAdapter,
    camera: CameraSession<C>,
    generation: u64,
    in_flight: Option<u64>,
}

impl<C: NativeCamera + ?Sized> DocumentCapture<C> {
    pub fn new(
        document_type: DocumentType,
        limits: CaptureLimits,
        adapter: ExtractionAdapter,
        mut camera: CameraSession<C>,
    ) -> Self {
        camera.limit_still_size(limits.max_bytes);
        Self {
            selector: CaptureSelector::new(limits),
            sides: SideCoordinator::new(document_type),
            adapter,
            camera,
            generation: 0,
            in_flight: None,
        }
    }

    pub fn document_type(&self) -> DocumentType {
        self.sides.document_type()
    }

    pub fn sides(&self) -> &SideCoordinator {
        &self.sides
    }

    pub fn preview(&self) -> Option<&SelectedImage> {
        self.selector.preview()
    }

    pub fn camera(&self) -> &CameraSession<C> {
        &self.camera
    }

    pub fn is_extracting(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Validate an input and make it the preview for the current side.
    ///
    /// Refused while an extraction is running or the camera is open. On the
    /// back side, an image identical to the held front is refused too. A
    /// refused input leaves the previous preview in place.
    pub fn select(&mut self, input: CaptureInput) -> Result<&SelectedImage> {
        if self.in_flight.is_some() || self.camera.is_streaming() {
            return Err(FretdocError::CaptureBusy);
        }
        let image = normalize(input, self.selector.limits())?;
        if self.sides.current_side() == DocumentSide::Back {
            self.sides.check_back(&image)?;
        }
        self.generation += 1;
        Ok(self.selector.set_preview(image))
    }

    /// Open the camera for the current side.
    pub async fn start_camera(&mut self) -> Result<()> {
        if self.in_flight.is_some() {
            return Err(FretdocError::CaptureBusy);
        }
        self.camera.start().await
    }

    /// Live camera view as a `data:` URL, `None` when the camera is closed.
    pub fn live_preview(&mut self, max_side: u32) -> Option<String> {
        if !self.camera.is_streaming() {
            return None;
        }
        match self.camera.preview_data_url(max_side) {
            Ok(url) => Some(url),
            Err(e) => {
                debug!(error = %e, "live preview frame dropped");
                None
            }
        }
    }

    /// Take the photo, close the camera and select the result.
    pub fn capture_photo(&mut self) -> Result<&SelectedImage> {
        if self.in_flight.is_some() {
            return Err(FretdocError::CaptureBusy);
        }
        let file = self.camera.capture()?;
        self.select(CaptureInput::Camera(file))
    }

    /// Admit an extraction of the current preview. Refused while the camera
    /// is open.
    pub fn begin_extraction(&mut self) -> Result<PendingExtraction> {
        if self.in_flight.is_some() {
            return Err(FretdocError::ExtractionInFlight);
        }
        if self.camera.is_streaming() {
            return Err(FretdocError::CaptureBusy);
        }
        let image = self
            .selector
            .preview()
            .cloned()
            .ok_or(FretdocError::NoImageSelected)?;

        self.in_flight = Some(self.generation);
        let side = self.sides.current_side();
        debug!(generation = self.generation, ?side, "extraction admitted");
        Ok(PendingExtraction {
            ticket: ExtractionTicket {
                generation: self.generation,
            },
            adapter: self.adapter.clone(),
            image,
            document_type: self.sides.document_type(),
            side,
        })
    }

    /// Apply a finished extraction. Outcomes from an older generation are
    /// discarded and yield `None`.
    pub fn finish_extraction(&mut self, outcome: ExtractionOutcome) -> Option<CaptureStep> {
        if self.in_flight != Some(outcome.ticket.generation) {
            debug!(
                ticket = outcome.ticket.generation,
                current = self.generation,
                "discarding stale extraction"
            );
            return None;
        }
        self.in_flight = None;

        let ExtractionOutcome {
            image,
            side,
            result,
            ..
        } = outcome;

        let event = match side {
            DocumentSide::Front => self.sides.record_front(image, result.clone()),
            DocumentSide::Back => match self.sides.record_back(&image) {
                Ok(event) => event,
                Err(e) => {
                    warn!(error = %e, "back capture refused");
                    self.sides.next_event()
                }
            },
        };

        if event == SideEvent::FlipToBack && side == DocumentSide::Front {
            self.selector.clear();
        }
        info!(?side, ?event, extracted = result.is_some(), "extraction applied");
        Some(CaptureStep {
            side,
            event,
            result,
        })
    }

    /// Abandon the running extraction, if any, and close the camera.
    ///
    /// Returns whether an extraction was abandoned.
    pub fn cancel(&mut self) -> bool {
        self.camera.cancel();
        self.generation += 1;
        match self.in_flight.take() {
            Some(generation) => {
                info!(generation, "extraction cancelled");
                true
            }
            None => false,
        }
    }

    /// Start over on the front side with nothing selected.
    pub fn reset(&mut self) {
        self.cancel();
        self.selector.clear();
        self.sides.reset();
    }

    /// Start over for another document type.
    pub fn switch_document(&mut self, document_type: DocumentType) {
        self.reset();
        self.sides = SideCoordinator::new(document_type);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;
    use fretdoc_bridge::traits::CameraStream;
    use fretdoc_core::types::StreamConstraints;

    use super::*;
    use crate::extract::DocumentExtractor;
    use crate::source::FileSelection;

    struct NoCamera;

    #[async_trait]
    impl NativeCamera for NoCamera {
        async fn request_stream(&self, _: &StreamConstraints) -> Result<Box<dyn CameraStream>> {
            Err(FretdocError::CameraUnavailable("none".into()))
        }
    }

    struct Echo;

    #[async_trait]
    impl DocumentExtractor for Echo {
        fn name(&self) -> &str {
            "echo"
        }

        async fn extract(
            &self,
            image: &SelectedImage,
            document_type: DocumentType,
        ) -> Result<ExtractionResult> {
            Ok(ExtractionResult::from_pairs(
                document_type,
                [("full_name", image.file_name())],
                None,
            ))
        }
    }

    fn workflow(doc: DocumentType) -> DocumentCapture<NoCamera> {
        let adapter = ExtractionAdapter::new(Arc::new(Echo), Duration::from_secs(1));
        let camera = CameraSession::new(Arc::new(NoCamera), StreamConstraints::default(), 95);
        DocumentCapture::new(doc, CaptureLimits::default(), adapter, camera)
    }

    fn picked(name: &str, seed: u8) -> CaptureInput {
        CaptureInput::Picked(FileSelection::new(vec![seed; 32], Some("image/jpeg"), name))
    }

    #[tokio::test]
    async fn two_sided_flow_reaches_completion() {
        let mut wf = workflow(DocumentType::DriverLicense);
        wf.select(picked("front.jpg", 1)).unwrap();
        let outcome = wf.begin_extraction().unwrap().run().await;
        let step = wf.finish_extraction(outcome).unwrap();
        assert_eq!(step.event, SideEvent::FlipToBack);
        assert_eq!(step.result.unwrap().get("full_name"), Some("front.jpg"));
        assert!(wf.preview().is_none());

        wf.select(picked("back.jpg", 2)).unwrap();
        let outcome = wf.begin_extraction().unwrap().run().await;
        let step = wf.finish_extraction(outcome).unwrap();
        assert_eq!(step.side, DocumentSide::Back);
        assert_eq!(step.event, SideEvent::Completed);
        assert!(wf.sides().is_complete());
    }

    #[tokio::test]
    async fn busy_while_extracting() {
        let mut wf = workflow(DocumentType::VehicleRegistration);
        wf.select(picked("a.jpg", 1)).unwrap();
        let pending = wf.begin_extraction().unwrap();
        assert!(matches!(wf.select(picked("b.jpg", 2)), Err(FretdocError::CaptureBusy)));
        assert!(matches!(
            wf.begin_extraction(),
            Err(FretdocError::ExtractionInFlight)
        ));
        assert_eq!(wf.preview().unwrap().file_name(), "a.jpg");

        let step = wf.finish_extraction(pending.run().await).unwrap();
        assert_eq!(step.event, SideEvent::Completed);
        assert!(!wf.is_extracting());
    }

    #[tokio::test]
    async fn cancelled_outcome_is_discarded() {
        let mut wf = workflow(DocumentType::IdentityCard);
        wf.select(picked("front.jpg", 1)).unwrap();
        let pending = wf.begin_extraction().unwrap();
        assert!(wf.cancel());
        let outcome = pending.run().await;
        assert!(wf.finish_extraction(outcome).is_none());
        assert_eq!(wf.sides().current_side(), DocumentSide::Front);
        assert!(wf.sides().front_result().is_none());
    }

    #[tokio::test]
    async fn reset_discards_in_flight_and_front() {
        let mut wf = workflow(DocumentType::IdentityCard);
        wf.select(picked("front.jpg", 1)).unwrap();
        let pending = wf.begin_extraction().unwrap();
        wf.reset();
        assert!(wf.finish_extraction(pending.run().await).is_none());
        assert!(wf.preview().is_none());
        assert!(matches!(
            wf.begin_extraction(),
            Err(FretdocError::NoImageSelected)
        ));
    }

    #[tokio::test]
    async fn back_identical_to_front_is_refused_at_selection() {
        let mut wf = workflow(DocumentType::IdentityCard);
        wf.select(picked("front.jpg", 5)).unwrap();
        let outcome = wf.begin_extraction().unwrap().run().await;
        wf.finish_extraction(outcome);
        assert_eq!(wf.sides().current_side(), DocumentSide::Back);
        assert!(matches!(
            wf.select(picked("front-again.jpg", 5)),
            Err(FretdocError::DuplicateSide)
        ));
        assert!(wf.preview().is_none());
    }

    #[tokio::test]
    async fn camera_failure_keeps_preview() {
        let mut wf = workflow(DocumentType::VehicleRegistration);
        wf.select(picked("a.jpg", 1)).unwrap();
        assert!(wf.start_camera().await.is_err());
        assert!(wf.capture_photo().is_err());
        assert_eq!(wf.preview().unwrap().file_name(), "a.jpg");
    }
}
