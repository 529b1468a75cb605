// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Capture page — photograph or pick a document, read it, pre-fill the forms.
//
// A photo can be dropped on the preview area, chosen in the file dialog or
// taken with the camera. On desktop the camera button goes through the
// platform bridge, which reports the camera as unavailable there.

use dioxus::prelude::*;

use fretdoc_capture::{CaptureInput, DocumentCapture, FileSelection, SideEvent};
use fretdoc_core::human_errors::{HumanError, humanize_error};
use fretdoc_core::types::{DocumentSide, DocumentType};
use fretdoc_core::FretdocError;

use crate::services::app_services::AppServices;
use crate::state::AppState;

const LIVE_VIEW_INTERVAL_MS: u64 = 200;
const LIVE_VIEW_MAX_SIDE: u32 = 640;

/// Snapshot of the workflow for one render.
struct View {
    side: DocumentSide,
    two_sided: bool,
    preview: Option<String>,
    extracting: bool,
    streaming: bool,
    complete: bool,
}

impl View {
    fn of(wf: Option<&DocumentCapture>) -> Option<Self> {
        let wf = wf?;
        Some(Self {
            side: wf.sides().current_side(),
            two_sided: wf.sides().needs_back(),
            preview: wf.preview().map(|img| img.to_data_url()),
            extracting: wf.is_extracting(),
            streaming: wf.camera().is_streaming(),
            complete: wf.sides().is_complete(),
        })
    }
}

/// Hand a picked or dropped file to the workflow. Refused while the camera is
/// being opened, when the workflow is out of its slot.
fn accept_file(wf: Option<&mut DocumentCapture>, input: CaptureInput) -> Result<(), FretdocError> {
    let wf = wf.ok_or(FretdocError::CaptureBusy)?;
    wf.select(input).map(|_| ())
}

#[component]
pub fn Capture() -> Element {
    let svc = use_context::<AppServices>();
    let mut state = use_context::<Signal<AppState>>();
    let mut doc_type = use_signal(|| DocumentType::VehicleRegistration);
    // `None` only while the camera is being opened.
    let mut capture = use_signal({
        let svc = svc.clone();
        move || Some(svc.new_capture(DocumentType::VehicleRegistration))
    });
    let mut error = use_signal(|| Option::<HumanError>::None);
    let mut notice = use_signal(|| Option::<String>::None);

    let mut live_frame = use_signal(|| Option::<String>::None);

    // Refresh the live camera view while the camera is open.
    let _poller = use_resource(move || async move {
        loop {
            tokio::time::sleep(std::time::Duration::from_millis(LIVE_VIEW_INTERVAL_MS)).await;
            let streaming = capture
                .peek()
                .as_ref()
                .is_some_and(|wf| wf.camera().is_streaming());
            let frame = if streaming {
                capture
                    .write()
                    .as_mut()
                    .and_then(|wf| wf.live_preview(LIVE_VIEW_MAX_SIDE))
            } else {
                None
            };
            if frame.is_some() || live_frame.peek().is_some() {
                live_frame.set(frame);
            }
        }
    });

    let report = move |e: FretdocError| {
        tracing::warn!(error = %e, "capture action failed");
        let mut error = error;
        error.set(Some(humanize_error(&e)));
    };

    let view = View::of(capture.read().as_ref());

    rsx! {
        div {
            h1 { "Documents" }
            p { style: "color: #666;", "Photograph a document and we fill in the forms for you." }

            // Document type
            select {
                style: "width: 100%; padding: 10px; border-radius: 8px; border: 1px solid #ccc; margin: 8px 0;",
                value: doc_type.read().as_str(),
                disabled: view.as_ref().is_none_or(|v| v.extracting),
                onchange: move |evt| {
                    if let Ok(doc) = evt.value().parse::<DocumentType>() {
                        doc_type.set(doc);
                        if let Some(wf) = capture.write().as_mut() {
                            wf.switch_document(doc);
                        }
                        error.set(None);
                        notice.set(None);
                    }
                },
                for doc in DocumentType::ALL {
                    option { value: doc.as_str(), {doc.label()} }
                }
            }

            {match view {
                None => rsx! {
                    p { style: "text-align: center; color: #888; margin: 48px 0;", "Opening camera..." }
                },
                Some(view) => rsx! {
                    if view.two_sided {
                        SideIndicator { side: view.side, complete: view.complete }
                    }

                    // Preview, also the drop target
                    div {
                        ondragover: move |evt| evt.prevent_default(),
                        ondrop: move |evt| async move {
                            evt.prevent_default();
                            error.set(None);
                            let Some(file) = evt.files().into_iter().next() else {
                                return;
                            };
                            let name = file.name();
                            let dropped = match file.read_bytes().await {
                                Ok(bytes) => FileSelection::new(
                                    bytes.to_vec(),
                                    file.content_type().as_deref(),
                                    name,
                                ),
                                Err(e) => {
                                    report(FretdocError::ImageError(format!("could not read {name}: {e}")));
                                    return;
                                }
                            };
                            if let Err(e) = accept_file(capture.write().as_mut(), CaptureInput::Dropped(dropped)) {
                                report(e);
                            }
                        },
                        if let Some(url) = live_frame.read().clone().filter(|_| view.streaming) {
                            img {
                                src: "{url}",
                                style: "width: 100%; max-height: 320px; object-fit: contain; border-radius: 12px; background: #000;",
                            }
                        } else if let Some(url) = view.preview.clone() {
                            img {
                                src: "{url}",
                                style: "width: 100%; max-height: 320px; object-fit: contain; border-radius: 12px; background: #f0f0f0;",
                            }
                        } else {
                            div { style: "height: 160px; border: 2px dashed #ccc; border-radius: 12px; display: flex; align-items: center; justify-content: center; color: #aaa;",
                                "Drop a photo here"
                            }
                        }
                    }

                    // Sources
                    div { style: "display: flex; gap: 8px; margin-top: 12px;",
                        button {
                            style: "flex: 1; padding: 12px; border-radius: 8px; border: 1px solid #ccc; background: white;",
                            disabled: view.extracting || view.streaming,
                            onclick: {
                                let svc = svc.clone();
                                move |_| {
                                    error.set(None);
                                    match svc.pick_image() {
                                        Ok(Some(file)) => {
                                            if let Err(e) = accept_file(capture.write().as_mut(), CaptureInput::Picked(file)) {
                                                report(e);
                                            }
                                        }
                                        Ok(None) => {}
                                        Err(e) => report(e),
                                    }
                                }
                            },
                            "Choose a photo"
                        }
                        if view.streaming {
                            button {
                                style: "flex: 1; padding: 12px; border-radius: 8px; border: none; background: #34c759; color: white;",
                                onclick: move |_| {
                                    let taken = capture
                                        .write()
                                        .as_mut()
                                        .map(|wf| wf.capture_photo().map(|_| ()));
                                    if let Some(Err(e)) = taken {
                                        report(e);
                                    }
                                },
                                "Take photo"
                            }
                            button {
                                style: "padding: 12px; border-radius: 8px; border: 1px solid #ccc; background: white;",
                                onclick: move |_| {
                                    if let Some(wf) = capture.write().as_mut() {
                                        wf.cancel();
                                    }
                                },
                                "Close camera"
                            }
                        } else {
                            button {
                                style: "flex: 1; padding: 12px; border-radius: 8px; border: 1px solid #ccc; background: white;",
                                disabled: view.extracting,
                                onclick: move |_| {
                                    error.set(None);
                                    spawn(async move {
                                        // Taken out for the await so renders never see a held borrow.
                                        let Some(mut wf) = capture.write().take() else {
                                            return;
                                        };
                                        let started = wf.start_camera().await;
                                        capture.set(Some(wf));
                                        if let Err(e) = started {
                                            report(e);
                                        }
                                    });
                                },
                                "Use camera"
                            }
                        }
                    }

                    // Extraction
                    button {
                        style: "width: 100%; padding: 14px; border-radius: 8px; border: none; background: #007aff; color: white; font-size: 16px; margin-top: 12px;",
                        disabled: view.preview.is_none() || view.extracting || view.streaming,
                        onclick: move |_| {
                            error.set(None);
                            let begun = capture.write().as_mut().map(|wf| wf.begin_extraction());
                            let pending = match begun {
                                Some(Ok(pending)) => pending,
                                Some(Err(e)) => {
                                    report(e);
                                    return;
                                }
                                None => return,
                            };
                            notice.set(Some("Reading the document...".into()));
                            spawn(async move {
                                let outcome = pending.run().await;
                                let step = capture
                                    .write()
                                    .as_mut()
                                    .and_then(|wf| wf.finish_extraction(outcome));
                                let Some(step) = step else {
                                    return;
                                };
                                let mut message = match &step.result {
                                    Some(result) => {
                                        let filled = state.write().apply_extraction(result);
                                        let confidence = result
                                            .confidence()
                                            .map(|c| format!(" ({}% sure)", c.percent()))
                                            .unwrap_or_default();
                                        format!(
                                            "Read at {}{confidence}: {filled} field(s) filled.",
                                            result.extracted_at().format("%H:%M")
                                        )
                                    }
                                    None => "We could not read this document. Please fill the form by hand.".to_owned(),
                                };
                                match step.event {
                                    SideEvent::FlipToBack => message.push_str(" Now turn the card over and capture the back."),
                                    SideEvent::Completed => message.push_str(" Document complete."),
                                    SideEvent::StayOnFront => {}
                                }
                                notice.set(Some(message));
                            });
                        },
                        if view.extracting { "Reading..." } else { "Read document" }
                    }

                    if view.extracting {
                        button {
                            style: "width: 100%; padding: 8px; border-radius: 8px; border: 1px solid #ff3b30; color: #ff3b30; background: white; margin-top: 8px;",
                            onclick: move |_| {
                                if let Some(wf) = capture.write().as_mut() {
                                    wf.cancel();
                                }
                                notice.set(Some("Reading cancelled.".into()));
                            },
                            "Cancel"
                        }
                    } else if view.preview.is_some() || view.complete {
                        button {
                            style: "width: 100%; padding: 8px; border-radius: 8px; border: 1px solid #ccc; background: white; margin-top: 8px;",
                            onclick: move |_| {
                                if let Some(wf) = capture.write().as_mut() {
                                    wf.reset();
                                }
                                error.set(None);
                                notice.set(None);
                            },
                            "Start over"
                        }
                    }
                },
            }}

            if let Some(ref msg) = *notice.read() {
                p { style: "margin-top: 12px; color: #333; font-size: 14px; text-align: center;", "{msg}" }
            }
            if let Some(ref err) = *error.read() {
                div { style: "margin-top: 12px; padding: 12px; border-radius: 8px; background: #fff1f0; color: #a8071a; font-size: 14px;",
                    strong { "{err.message}" }
                    br {}
                    "{err.suggestion}"
                }
            }
        }
    }
}

#[component]
fn SideIndicator(side: DocumentSide, complete: bool) -> Element {
    let (front, back) = match (complete, side) {
        (true, _) => ("done", "done"),
        (false, DocumentSide::Front) => ("now", "next"),
        (false, DocumentSide::Back) => ("done", "now"),
    };
    rsx! {
        div { style: "display: flex; gap: 8px; margin: 8px 0; font-size: 13px; color: #555;",
            span { "Front: {front}" }
            span { "Back: {back}" }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use fretdoc_bridge::NativeCamera;
    use fretdoc_bridge::stub::StubBridge;
    use fretdoc_capture::{CameraSession, CaptureOrigin, ExtractionAdapter, SampleExtractor};
    use fretdoc_core::config::CaptureLimits;
    use fretdoc_core::types::StreamConstraints;

    use super::*;

    fn workflow() -> DocumentCapture {
        let camera: Arc<dyn NativeCamera> = Arc::new(StubBridge);
        let session = CameraSession::new(camera, StreamConstraints::default(), 95);
        let adapter = ExtractionAdapter::new(
            Arc::new(SampleExtractor::new(Duration::ZERO)),
            Duration::from_secs(5),
        );
        DocumentCapture::new(DocumentType::IdentityCard, CaptureLimits::default(), adapter, session)
    }

    fn photo(name: &str) -> FileSelection {
        FileSelection::new(vec![7; 128], Some("image/png"), name)
    }

    #[test]
    fn dropped_file_is_selected_like_a_picked_one() {
        let mut wf = workflow();
        accept_file(Some(&mut wf), CaptureInput::Dropped(photo("cni.png"))).unwrap();
        let preview = wf.preview().unwrap();
        assert_eq!(preview.file_name(), "cni.png");
        assert_eq!(preview.origin(), CaptureOrigin::DragAndDrop);

        accept_file(Some(&mut wf), CaptureInput::Picked(photo("cni-2.png"))).unwrap();
        assert_eq!(wf.preview().unwrap().origin(), CaptureOrigin::FilePicker);
    }

    #[test]
    fn dropped_file_of_wrong_type_keeps_preview() {
        let mut wf = workflow();
        accept_file(Some(&mut wf), CaptureInput::Dropped(photo("cni.png"))).unwrap();
        let pdf = FileSelection::new(b"%PDF-1.7".to_vec(), Some("application/pdf"), "cni.pdf");
        let err = accept_file(Some(&mut wf), CaptureInput::Dropped(pdf)).unwrap_err();
        assert!(matches!(err, FretdocError::UnsupportedMimeType(_)));
        assert_eq!(wf.preview().unwrap().file_name(), "cni.png");
    }

    #[test]
    fn file_is_refused_while_camera_opens() {
        let err = accept_file(None, CaptureInput::Dropped(photo("cni.png"))).unwrap_err();
        assert!(matches!(err, FretdocError::CaptureBusy));
    }
}
