// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Test doubles shared by the integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use fretdoc_bridge::traits::{CameraStream, NativeCamera};
use fretdoc_capture::{DocumentExtractor, SelectedImage};
use fretdoc_core::error::{FretdocError, Result};
use fretdoc_core::types::{DocumentType, ExtractionResult, StreamConstraints, TrackInfo, VideoFrame};

/// Liveness of every track ever handed out, by stream index.
#[derive(Default)]
pub struct TrackLedger {
    live: Mutex<Vec<bool>>,
}

impl TrackLedger {
    pub fn live_streams(&self) -> usize {
        self.live.lock().unwrap().iter().filter(|l| **l).count()
    }

    pub fn issued(&self) -> usize {
        self.live.lock().unwrap().len()
    }
}

pub struct FakeStream {
    ledger: Arc<TrackLedger>,
    index: usize,
    width: u32,
    height: u32,
    noisy: bool,
}

impl CameraStream for FakeStream {
    fn id(&self) -> &str {
        "fake-stream"
    }

    fn tracks(&self) -> Vec<TrackInfo> {
        vec![TrackInfo {
            id: format!("video-{}", self.index),
            label: Some("back camera".into()),
            live: self.ledger.live.lock().unwrap()[self.index],
        }]
    }

    fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn grab_frame(&mut self) -> Result<VideoFrame> {
        let len = (self.width * self.height * 4) as usize;
        let rgba = if self.noisy {
            noise(len, self.index as u32 + 1)
        } else {
            vec![200; len]
        };
        Ok(VideoFrame {
            width: self.width,
            height: self.height,
            rgba,
        })
    }

    fn stop_track(&mut self, _track_id: &str) -> Result<()> {
        self.ledger.live.lock().unwrap()[self.index] = false;
        Ok(())
    }
}

/// Sensor noise, which JPEG cannot compress much. Opaque alpha.
fn noise(len: usize, seed: u32) -> Vec<u8> {
    let mut state = seed;
    (0..len)
        .map(|i| {
            if i % 4 == 3 {
                return 255;
            }
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            (state >> 24) as u8
        })
        .collect()
}

/// Camera that grants every request, or hangs forever when `hang` is set.
pub struct FakeCamera {
    pub ledger: Arc<TrackLedger>,
    pub hang: bool,
    /// Frame size handed out by every stream.
    pub frame: (u32, u32),
    /// Fill frames with noise instead of a flat grey.
    pub noisy: bool,
    /// Highest number of simultaneously live streams ever observed.
    pub peak: Mutex<usize>,
}

impl Default for FakeCamera {
    fn default() -> Self {
        Self {
            ledger: Arc::default(),
            hang: false,
            frame: (64, 48),
            noisy: false,
            peak: Mutex::new(0),
        }
    }
}

#[async_trait]
impl NativeCamera for FakeCamera {
    async fn request_stream(&self, _: &StreamConstraints) -> Result<Box<dyn CameraStream>> {
        if self.hang {
            std::future::pending::<()>().await;
        }
        let index = {
            let mut live = self.ledger.live.lock().unwrap();
            live.push(true);
            live.len() - 1
        };
        let now_live = self.ledger.live_streams();
        let mut peak = self.peak.lock().unwrap();
        *peak = (*peak).max(now_live);
        Ok(Box::new(FakeStream {
            ledger: Arc::clone(&self.ledger),
            index,
            width: self.frame.0,
            height: self.frame.1,
            noisy: self.noisy,
        }))
    }
}

/// Extractor answering with fixed pairs after `delay`, or failing.
pub struct ScriptedExtractor {
    pub delay: Duration,
    pub pairs: Vec<(&'static str, &'static str)>,
    pub fail: bool,
}

impl ScriptedExtractor {
    pub fn answering(pairs: &[(&'static str, &'static str)]) -> Self {
        Self {
            delay: Duration::ZERO,
            pairs: pairs.to_vec(),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            delay: Duration::ZERO,
            pairs: Vec::new(),
            fail: true,
        }
    }

    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[async_trait]
impl DocumentExtractor for ScriptedExtractor {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn extract(
        &self,
        _image: &SelectedImage,
        document_type: DocumentType,
    ) -> Result<ExtractionResult> {
        tokio::time::sleep(self.delay).await;
        if self.fail {
            return Err(FretdocError::ExtractionFailed("service unavailable".into()));
        }
        Ok(ExtractionResult::from_pairs(
            document_type,
            self.pairs.iter().copied(),
            None,
        ))
    }
}
