// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Camera session manager.
//
//   Idle ──start──▶ Requesting ──granted──▶ Streaming ──capture──▶ Capturing ──▶ Idle
//                        │                      │
//                        └──denied──▶ Idle      └──cancel──▶ Idle
//
// The live stream is held by `OwnedStream`, whose `Drop` stops every track.
// Every way out of `Streaming`/`Capturing` (capture, cancel, restart, dropping
// the session) goes through that guard, so a session that reports `Idle` never
// holds a live track. Track-stop failures are logged and otherwise ignored.

use std::sync::Arc;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use fretdoc_bridge::traits::{CameraStream, NativeCamera};
use fretdoc_core::error::{FretdocError, Result};
use fretdoc_core::types::{SessionId, StreamConstraints, VideoFrame};
use tracing::{debug, info, instrument, warn};

use crate::image::ImageProcessor;
use crate::source::FileSelection;

const PREVIEW_QUALITY: u8 = 70;
/// Quality used when a still at the configured quality is over the size cap.
const OVERSIZE_QUALITY: u8 = 80;
/// Stills are never shrunk below this longest side to meet the size cap.
const MIN_STILL_SIDE: u32 = 200;

/// Lifecycle states of a camera session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraState {
    Idle,
    Requesting,
    Streaming,
    Capturing,
}

impl CameraState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Requesting => "requesting",
            Self::Streaming => "streaming",
            Self::Capturing => "capturing",
        }
    }
}

/// Exclusive owner of a live stream. Dropping it stops every track.
struct OwnedStream {
    inner: Box<dyn CameraStream>,
}

impl OwnedStream {
    fn release_tracks(&mut self) {
        let stream_id = self.inner.id().to_owned();
        for track in self.inner.tracks().into_iter().filter(|t| t.live) {
            if let Err(e) = self.inner.stop_track(&track.id) {
                let err = FretdocError::TrackRelease {
                    track: track.id.clone(),
                    reason: e.to_string(),
                };
                warn!(stream = %stream_id, error = %err, "track release failed");
            }
        }
        debug!(stream = %stream_id, "stream released");
    }
}

impl Drop for OwnedStream {
    fn drop(&mut self) {
        self.release_tracks();
    }
}

/// Puts the state back to `Idle` if a stream request is abandoned mid-await.
struct RequestRollback<'a> {
    state: &'a mut CameraState,
    settled: bool,
}

impl<'a> RequestRollback<'a> {
    fn begin(state: &'a mut CameraState) -> Self {
        *state = CameraState::Requesting;
        Self {
            state,
            settled: false,
        }
    }

    fn settle(mut self, next: CameraState) {
        *self.state = next;
        self.settled = true;
    }
}

impl Drop for RequestRollback<'_> {
    fn drop(&mut self) {
        if !self.settled {
            *self.state = CameraState::Idle;
        }
    }
}

/// One camera capture session over a platform camera.
pub struct CameraSession<C: NativeCamera + ?Sized> {
    camera: Arc<C>,
    constraints: StreamConstraints,
    jpeg_quality: u8,
    max_bytes: Option<u64>,
    state: CameraState,
    stream: Option<OwnedStream>,
    session_id: Option<SessionId>,
}

impl<C: NativeCamera + ?Sized> CameraSession<C> {
    pub fn new(camera: Arc<C>, constraints: StreamConstraints, jpeg_quality: u8) -> Self {
        Self {
            camera,
            constraints,
            jpeg_quality: jpeg_quality.clamp(1, 100),
            max_bytes: None,
            state: CameraState::Idle,
            stream: None,
            session_id: None,
        }
    }

    /// Keep captured stills under `max_bytes`, re-encoding at a lower
    /// quality and then a lower resolution when needed.
    pub fn limit_still_size(&mut self, max_bytes: u64) {
        self.max_bytes = Some(max_bytes);
    }

    pub fn state(&self) -> CameraState {
        self.state
    }

    pub fn is_streaming(&self) -> bool {
        self.state == CameraState::Streaming
    }

    pub fn session_id(&self) -> Option<SessionId> {
        self.session_id
    }

    /// Native resolution of the live stream.
    pub fn resolution(&self) -> Option<(u32, u32)> {
        self.stream.as_ref().map(|s| s.inner.resolution())
    }

    /// Ask for the camera and start streaming.
    ///
    /// Any stream this session already holds is released first. On failure
    /// the session is back in `Idle` holding nothing.
    #[instrument(skip(self))]
    pub async fn start(&mut self) -> Result<()> {
        if self.release("restart") {
            info!("previous stream released before restarting");
        }

        let rollback = RequestRollback::begin(&mut self.state);
        let requested = self.camera.request_stream(&self.constraints).await;

        let stream = match requested {
            Ok(stream) => OwnedStream { inner: stream },
            Err(e) => {
                rollback.settle(CameraState::Idle);
                warn!(error = %e, "camera request failed");
                return Err(e);
            }
        };

        if stream.inner.live_track_count() == 0 {
            rollback.settle(CameraState::Idle);
            drop(stream);
            return Err(FretdocError::CameraUnavailable(
                "stream has no live video track".into(),
            ));
        }

        rollback.settle(CameraState::Streaming);
        let id = SessionId::new();
        let (width, height) = stream.inner.resolution();
        info!(session = %id, stream = stream.inner.id(), width, height, "camera streaming");
        self.stream = Some(stream);
        self.session_id = Some(id);
        Ok(())
    }

    /// Current frame for the live preview surface; stays in `Streaming`.
    pub fn preview_frame(&mut self) -> Result<VideoFrame> {
        let not_streaming = self.not_streaming();
        match (self.state, self.stream.as_mut()) {
            (CameraState::Streaming, Some(stream)) => stream.inner.grab_frame(),
            _ => Err(not_streaming),
        }
    }

    /// Downscaled JPEG `data:` URL of the current frame, for the live view.
    pub fn preview_data_url(&mut self, max_side: u32) -> Result<String> {
        let frame = self.preview_frame()?;
        let jpeg = ImageProcessor::from_frame(frame)?
            .fit_within(max_side, max_side)
            .to_jpeg_bytes(PREVIEW_QUALITY)?;
        Ok(format!("data:image/jpeg;base64,{}", STANDARD.encode(jpeg)))
    }

    /// Take a still photo and close the camera.
    ///
    /// The frame is grabbed at native resolution, every track is stopped,
    /// and only then is the frame encoded as JPEG. The session ends in
    /// `Idle` whether or not the capture succeeded.
    #[instrument(skip(self))]
    pub fn capture(&mut self) -> Result<FileSelection> {
        if self.state != CameraState::Streaming {
            return Err(self.not_streaming());
        }
        let Some(mut stream) = self.stream.take() else {
            self.state = CameraState::Idle;
            return Err(self.not_streaming());
        };

        self.state = CameraState::Capturing;
        let frame = stream.inner.grab_frame();
        drop(stream);
        self.state = CameraState::Idle;
        let session = self.session_id.take();

        let frame = frame?;
        let (width, height) = (frame.width, frame.height);
        let jpeg = self.encode_still(ImageProcessor::from_frame(frame)?)?;
        info!(width, height, bytes = jpeg.len(), "still frame captured");

        let name = match session {
            Some(id) => format!("camera-{id}.jpg"),
            None => "camera.jpg".to_owned(),
        };
        Ok(FileSelection::new(jpeg, Some("image/jpeg"), name))
    }

    /// Close the camera without taking a photo.
    ///
    /// Returns whether a stream was released. Safe to call in any state.
    pub fn cancel(&mut self) -> bool {
        self.release("cancel")
    }

    fn encode_still(&self, mut still: ImageProcessor) -> Result<Vec<u8>> {
        let mut quality = self.jpeg_quality;
        let mut jpeg = still.to_jpeg_bytes(quality)?;
        let Some(limit) = self.max_bytes else {
            return Ok(jpeg);
        };
        while jpeg.len() as u64 > limit {
            if quality > OVERSIZE_QUALITY {
                quality = OVERSIZE_QUALITY;
            } else {
                let longest = still.width().max(still.height());
                if longest <= MIN_STILL_SIDE {
                    warn!(bytes = jpeg.len(), limit, "still stays over the size limit");
                    break;
                }
                let side = (longest * 3 / 4).max(MIN_STILL_SIDE);
                still = still.fit_within(side, side);
            }
            jpeg = still.to_jpeg_bytes(quality)?;
            debug!(
                bytes = jpeg.len(),
                quality,
                width = still.width(),
                height = still.height(),
                "still re-encoded to fit size limit"
            );
        }
        Ok(jpeg)
    }

    fn release(&mut self, reason: &'static str) -> bool {
        self.state = CameraState::Idle;
        self.session_id = None;
        match self.stream.take() {
            Some(stream) => {
                debug!(reason, "releasing camera stream");
                drop(stream);
                true
            }
            None => false,
        }
    }

    fn not_streaming(&self) -> FretdocError {
        FretdocError::CameraState {
            expected: CameraState::Streaming.as_str(),
            actual: self.state.as_str(),
        }
    }
}

impl<C: NativeCamera + ?Sized> Drop for CameraSession<C> {
    fn drop(&mut self) {
        if self.release("teardown") {
            info!("camera released on teardown");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use fretdoc_core::types::TrackInfo;

    use super::*;

    #[derive(Default)]
    struct Tracks {
        live: Vec<bool>,
    }

    struct OneTrackStream {
        tracks: Arc<Mutex<Tracks>>,
        index: usize,
        fail_stop: bool,
    }

    impl CameraStream for OneTrackStream {
        fn id(&self) -> &str {
            "stream"
        }

        fn tracks(&self) -> Vec<TrackInfo> {
            vec![TrackInfo {
                id: format!("video-{}", self.index),
                label: None,
                live: self.tracks.lock().unwrap().live[self.index],
            }]
        }

        fn resolution(&self) -> (u32, u32) {
            (4, 2)
        }

        fn grab_frame(&mut self) -> Result<VideoFrame> {
            Ok(VideoFrame {
                width: 4,
                height: 2,
                rgba: vec![128; 32],
            })
        }

        fn stop_track(&mut self, _track_id: &str) -> Result<()> {
            // The platform marks the track ended even when it reports an error.
            self.tracks.lock().unwrap().live[self.index] = false;
            if self.fail_stop {
                return Err(FretdocError::Bridge("device busy".into()));
            }
            Ok(())
        }
    }

    #[derive(Default)]
    struct FakeCamera {
        tracks: Arc<Mutex<Tracks>>,
        deny: bool,
        fail_stop: bool,
    }

    impl FakeCamera {
        fn live(&self) -> usize {
            self.tracks.lock().unwrap().live.iter().filter(|l| **l).count()
        }
    }

    #[async_trait]
    impl NativeCamera for FakeCamera {
        async fn request_stream(
            &self,
            _constraints: &StreamConstraints,
        ) -> Result<Box<dyn CameraStream>> {
            if self.deny {
                return Err(FretdocError::CameraPermissionDenied);
            }
            let index = {
                let mut t = self.tracks.lock().unwrap();
                t.live.push(true);
                t.live.len() - 1
            };
            Ok(Box::new(OneTrackStream {
                tracks: Arc::clone(&self.tracks),
                index,
                fail_stop: self.fail_stop,
            }))
        }
    }

    fn session(camera: FakeCamera) -> (Arc<FakeCamera>, CameraSession<FakeCamera>) {
        let camera = Arc::new(camera);
        let session = CameraSession::new(Arc::clone(&camera), StreamConstraints::default(), 95);
        (camera, session)
    }

    #[tokio::test]
    async fn capture_releases_and_returns_jpeg() {
        let (camera, mut session) = session(FakeCamera::default());
        session.start().await.unwrap();
        assert_eq!(session.state(), CameraState::Streaming);
        assert_eq!(camera.live(), 1);

        let file = session.capture().unwrap();
        assert_eq!(session.state(), CameraState::Idle);
        assert_eq!(camera.live(), 0);
        assert_eq!(file.declared_mime.as_deref(), Some("image/jpeg"));
        assert_eq!(image::guess_format(&file.bytes).unwrap(), image::ImageFormat::Jpeg);
    }

    #[tokio::test]
    async fn denied_permission_returns_to_idle() {
        let (camera, mut session) = session(FakeCamera {
            deny: true,
            ..Default::default()
        });
        let err = session.start().await.unwrap_err();
        assert!(matches!(err, FretdocError::CameraPermissionDenied));
        assert_eq!(session.state(), CameraState::Idle);
        assert_eq!(camera.live(), 0);
        assert!(session.resolution().is_none());
    }

    #[tokio::test]
    async fn stop_failure_still_reaches_idle() {
        let (camera, mut session) = session(FakeCamera {
            fail_stop: true,
            ..Default::default()
        });
        session.start().await.unwrap();
        assert!(session.cancel());
        assert_eq!(session.state(), CameraState::Idle);
        assert_eq!(camera.live(), 0);
    }

    #[tokio::test]
    async fn drop_releases_stream() {
        let (camera, mut session) = session(FakeCamera::default());
        session.start().await.unwrap();
        drop(session);
        assert_eq!(camera.live(), 0);
    }

    #[tokio::test]
    async fn preview_keeps_streaming() {
        let (camera, mut session) = session(FakeCamera::default());
        assert!(session.preview_frame().is_err());
        session.start().await.unwrap();

        let frame = session.preview_frame().unwrap();
        assert_eq!((frame.width, frame.height), (4, 2));
        let url = session.preview_data_url(2).unwrap();
        assert!(url.starts_with("data:image/jpeg;base64,"));
        assert_eq!(session.state(), CameraState::Streaming);
        assert_eq!(camera.live(), 1);
    }

    #[test]
    fn capture_when_idle_is_an_error() {
        let (_camera, mut session) = session(FakeCamera::default());
        assert!(matches!(
            session.capture(),
            Err(FretdocError::CameraState { actual: "idle", .. })
        ));
        assert!(!session.cancel());
    }
}
