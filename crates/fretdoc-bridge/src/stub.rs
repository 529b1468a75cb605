// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Stub bridge for desktop/CI builds where native mobile APIs are unavailable.

use async_trait::async_trait;
use fretdoc_core::error::{FretdocError, Result};
use fretdoc_core::types::StreamConstraints;

use crate::traits::*;

/// Bridge returned on platforms without a native implementation.
pub struct StubBridge;

impl PlatformBridge for StubBridge {
    fn platform_name(&self) -> &str {
        "Desktop (stub)"
    }
}

#[async_trait]
impl NativeCamera for StubBridge {
    async fn request_stream(
        &self,
        constraints: &StreamConstraints,
    ) -> Result<Box<dyn CameraStream>> {
        tracing::warn!(facing = ?constraints.facing, "NativeCamera::request_stream called on stub bridge");
        Err(FretdocError::CameraUnavailable("no camera bridge on this platform".into()))
    }
}

impl NativeFilePicker for StubBridge {
    fn pick_file(&self, _mime_types: &[&str]) -> Result<Option<String>> {
        tracing::warn!("NativeFilePicker::pick_file called on stub bridge");
        Err(FretdocError::PlatformUnavailable)
    }

    fn read_picked_file(&self, path: &str) -> Result<Vec<u8>> {
        Ok(std::fs::read(path)?)
    }
}
