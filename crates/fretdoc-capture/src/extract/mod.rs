// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Extraction — turning a document photo into a field/value map.
//
// Callers only see `ExtractionAdapter`, which never fails: any backend error,
// malformed response or timeout comes back as `None`, meaning "fill the form
// by hand". Backends plug in through the `DocumentExtractor` trait.

pub mod adapter;
pub mod labels;
pub mod sample;

#[cfg(feature = "ocr")]
pub mod ocr;

pub use adapter::{DocumentExtractor, ExtractionAdapter, parse_response};
pub use sample::SampleExtractor;

#[cfg(feature = "ocr")]
pub use ocr::{OcrEngine, OcrExtractor};
