// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// The extraction seam and the non-throwing adapter in front of it.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use fretdoc_core::error::{ErrorCategory, FretdocError, Result};
use fretdoc_core::types::{Confidence, DocumentType, ExtractionResult};
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

use crate::integrity;
use crate::source::SelectedImage;

/// A recognition backend: OCR engine, remote ML service, canned sample data.
#[async_trait]
pub trait DocumentExtractor: Send + Sync {
    /// Backend name for logs.
    fn name(&self) -> &str;

    /// Read `image` as a `document_type`. Errors are allowed here; the
    /// adapter absorbs them.
    async fn extract(
        &self,
        image: &SelectedImage,
        document_type: DocumentType,
    ) -> Result<ExtractionResult>;
}

/// Wraps a backend with a timeout and response validation.
#[derive(Clone)]
pub struct ExtractionAdapter {
    extractor: Arc<dyn DocumentExtractor>,
    timeout: Duration,
}

impl ExtractionAdapter {
    pub fn new(extractor: Arc<dyn DocumentExtractor>, timeout: Duration) -> Self {
        Self { extractor, timeout }
    }

    pub fn backend(&self) -> &str {
        self.extractor.name()
    }

    /// Extract fields, or `None` when the document must be entered manually.
    pub async fn extract(
        &self,
        image: &SelectedImage,
        document_type: DocumentType,
    ) -> Option<ExtractionResult> {
        match self.try_extract(image, document_type).await {
            Ok(result) => Some(result),
            Err(e) => {
                warn!(
                    backend = self.backend(),
                    document = %document_type,
                    error = %e,
                    "extraction failed, falling back to manual entry"
                );
                None
            }
        }
    }

    /// Like [`extract`](Self::extract) but keeps the reason for failure.
    #[instrument(skip(self, image), fields(fingerprint = integrity::short(image.fingerprint())))]
    pub async fn try_extract(
        &self,
        image: &SelectedImage,
        document_type: DocumentType,
    ) -> Result<ExtractionResult> {
        let call = self.extractor.extract(image, document_type);
        let result = match tokio::time::timeout(self.timeout, call).await {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => return Err(as_extraction_error(e)),
            Err(_) => return Err(FretdocError::ExtractionTimeout(self.timeout.as_millis() as u64)),
        };
        let result = validate(result, document_type)?;
        info!(
            document = %document_type,
            fields = result.fields().len(),
            confidence = result.confidence().map(|c| c.value()),
            "extraction complete"
        );
        Ok(result)
    }
}

/// Backends may fail with anything; to the workflow it is an extraction failure.
fn as_extraction_error(err: FretdocError) -> FretdocError {
    match err.category() {
        ErrorCategory::Extraction => err,
        _ => FretdocError::ExtractionFailed(err.to_string()),
    }
}

fn validate(result: ExtractionResult, expected: DocumentType) -> Result<ExtractionResult> {
    if result.document_type() != expected {
        return Err(FretdocError::MalformedExtraction(format!(
            "asked for {expected}, backend answered {}",
            result.document_type()
        )));
    }
    if result.is_empty() {
        return Err(FretdocError::MalformedExtraction("no fields recognised".into()));
    }
    Ok(result)
}

/// Wire shape of a recognition service response.
#[derive(Debug, Deserialize)]
struct ExtractionResponse {
    document_type: String,
    #[serde(default)]
    fields: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    confidence: Option<f64>,
}

/// Parse a JSON response from a recognition backend.
///
/// Numeric values are stringified; nulls, arrays and objects are dropped.
/// A document type other than `expected` makes the whole response malformed.
/// A confidence outside `[0, 1]` is dropped and the fields are kept.
pub fn parse_response(json: &str, expected: DocumentType) -> Result<ExtractionResult> {
    let response: ExtractionResponse = serde_json::from_str(json)
        .map_err(|e| FretdocError::MalformedExtraction(e.to_string()))?;

    let document_type: DocumentType = response.document_type.parse()?;
    if document_type != expected {
        return Err(FretdocError::MalformedExtraction(format!(
            "asked for {expected}, response is for {document_type}"
        )));
    }

    let confidence = response.confidence.and_then(|value| match Confidence::try_from(value) {
        Ok(c) => Some(c),
        Err(e) => {
            warn!(error = %e, "ignoring confidence score");
            None
        }
    });

    let mut fields = BTreeMap::new();
    for (key, value) in response.fields {
        let text = match value {
            serde_json::Value::String(s) => s,
            serde_json::Value::Number(n) => n.to_string(),
            serde_json::Value::Bool(b) => b.to_string(),
            other => {
                debug!(key = %key, kind = ?other, "dropping non-scalar field");
                continue;
            }
        };
        fields.insert(key, text.trim().to_owned());
    }

    Ok(ExtractionResult::new(document_type, fields, confidence))
}
