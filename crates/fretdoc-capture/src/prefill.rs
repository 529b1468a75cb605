// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Form pre-fill from an extraction result.
//
// Only blank fields are filled. Whatever the user typed stays, and running the
// same result twice changes nothing the second time.

use fretdoc_core::form::{FieldChange, FormState};
use fretdoc_core::types::ExtractionResult;
use tracing::{debug, info};

/// The field changes pre-filling `form` from `result` would make.
///
/// Changes come in schema order and go through the same path as user edits,
/// so the caller can feed them to its form one by one.
pub fn prefill_changes(form: &FormState, result: &ExtractionResult) -> Vec<FieldChange> {
    let schema = form.schema();
    schema
        .fields
        .iter()
        .filter(|spec| form.is_blank(spec.name))
        .filter_map(|spec| {
            let value = schema.resolve(spec, result.fields())?;
            debug!(field = spec.name, "pre-filling from extraction");
            Some(FieldChange::extracted(spec.name, value))
        })
        .collect()
}

/// A copy of `form` with blank fields filled from `result`.
pub fn prefill(form: &FormState, result: &ExtractionResult) -> FormState {
    let mut next = form.clone();
    let mut filled = 0usize;
    for change in prefill_changes(form, result) {
        if next.apply(change) {
            filled += 1;
        }
    }
    info!(
        domain = ?form.domain(),
        document = %result.document_type(),
        filled,
        "form pre-filled"
    );
    next
}
