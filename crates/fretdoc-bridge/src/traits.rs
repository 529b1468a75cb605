// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-agnostic trait definitions for native capabilities.

use async_trait::async_trait;
use fretdoc_core::error::Result;
use fretdoc_core::types::{StreamConstraints, TrackInfo, VideoFrame};

/// Unified bridge that groups all native capabilities used by capture.
pub trait PlatformBridge: NativeCamera + NativeFilePicker {
    /// Human-readable platform name (e.g. "Android 14").
    fn platform_name(&self) -> &str;
}

/// Live camera access.
#[async_trait]
pub trait NativeCamera: Send + Sync {
    /// Ask the platform for a live video stream.
    ///
    /// Suspends while the permission prompt is up. Fails with
    /// `CameraPermissionDenied` or `CameraUnavailable`; on failure no stream
    /// handle exists.
    async fn request_stream(
        &self,
        constraints: &StreamConstraints,
    ) -> Result<Box<dyn CameraStream>>;
}

/// A live stream handed out by [`NativeCamera::request_stream`].
///
/// The holder owns the stream exclusively and must stop every track when done.
pub trait CameraStream: Send {
    /// Platform identifier of the stream.
    fn id(&self) -> &str;

    /// All tracks of the stream, live or stopped.
    fn tracks(&self) -> Vec<TrackInfo>;

    /// Native resolution of the video track.
    fn resolution(&self) -> (u32, u32);

    /// Rasterise the current frame at native resolution.
    fn grab_frame(&mut self) -> Result<VideoFrame>;

    /// Stop one track. Stopping an already stopped track is not an error.
    fn stop_track(&mut self, track_id: &str) -> Result<()>;

    /// Number of tracks still live.
    fn live_track_count(&self) -> usize {
        self.tracks().iter().filter(|t| t.live).count()
    }
}

/// Pick files from the device storage.
pub trait NativeFilePicker {
    /// Show a file picker filtered to the given MIME types.
    /// Returns the file path chosen, or None if cancelled.
    fn pick_file(&self, mime_types: &[&str]) -> Result<Option<String>>;

    /// Read the bytes of a previously picked file.
    fn read_picked_file(&self, path: &str) -> Result<Vec<u8>>;
}
