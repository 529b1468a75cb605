// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Camera session lifecycle against a fake platform camera.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::FakeCamera;
use fretdoc_capture::{CameraSession, CameraState, CaptureInput, CaptureSelector};
use fretdoc_core::types::{ImageMime, StreamConstraints};

fn session(camera: &Arc<FakeCamera>) -> CameraSession<FakeCamera> {
    CameraSession::new(Arc::clone(camera), StreamConstraints::default(), 95)
}

#[tokio::test]
async fn restart_never_leaves_two_live_streams() {
    let camera = Arc::new(FakeCamera::default());
    let mut session = session(&camera);

    session.start().await.unwrap();
    session.start().await.unwrap();
    session.start().await.unwrap();

    assert_eq!(camera.ledger.issued(), 3);
    assert_eq!(camera.ledger.live_streams(), 1);
    assert_eq!(*camera.peak.lock().unwrap(), 1);
    assert!(session.is_streaming());

    session.cancel();
    assert_eq!(camera.ledger.live_streams(), 0);
}

#[tokio::test]
async fn captured_photo_passes_the_selector() {
    let camera = Arc::new(FakeCamera::default());
    let mut session = session(&camera);
    session.start().await.unwrap();
    assert_eq!(session.resolution(), Some((64, 48)));

    let file = session.capture().unwrap();
    assert_eq!(session.state(), CameraState::Idle);
    assert_eq!(camera.ledger.live_streams(), 0);
    assert!(file.file_name.starts_with("camera-"));

    let mut selector = CaptureSelector::default();
    let image = selector.accept(CaptureInput::Camera(file)).unwrap();
    assert_eq!(image.mime(), ImageMime::Jpeg);
}

#[tokio::test(start_paused = true)]
async fn abandoned_request_rolls_back_to_idle() {
    let camera = Arc::new(FakeCamera {
        hang: true,
        ..Default::default()
    });
    let mut session = session(&camera);

    let attempt = tokio::time::timeout(Duration::from_secs(10), session.start()).await;
    assert!(attempt.is_err());
    assert_eq!(session.state(), CameraState::Idle);
    assert_eq!(camera.ledger.live_streams(), 0);
}

#[tokio::test]
async fn dropping_the_session_releases_the_camera() {
    let camera = Arc::new(FakeCamera::default());
    {
        let mut session = session(&camera);
        session.start().await.unwrap();
        assert_eq!(camera.ledger.live_streams(), 1);
    }
    assert_eq!(camera.ledger.live_streams(), 0);
}
