// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Fretdoc — platform bridge abstractions.
//
// The capture pipeline talks to the device camera and file picker only through
// the traits in `traits`. Desktop and CI builds get `StubBridge`, which reports
// every native capability as unavailable so the UI falls back to file selection.

use std::sync::Arc;

pub mod stub;
pub mod traits;

pub use traits::{CameraStream, NativeCamera, NativeFilePicker, PlatformBridge};

/// The bridge implementation for the target platform.
pub fn platform_bridge() -> Arc<dyn PlatformBridge> {
    Arc::new(stub::StubBridge)
}
