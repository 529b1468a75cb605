// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Global application state — reactive signals for the Dioxus UI.

use fretdoc_capture::prefill_changes;
use fretdoc_core::AppConfig;
use fretdoc_core::form::{FieldChange, FormDomain, FormState};
use fretdoc_core::types::ExtractionResult;

use crate::services::app_services::AppServices;

/// Shared state accessible to all pages via `use_context`.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application settings.
    pub config: AppConfig,
    /// One onboarding form per domain, in `FormDomain::ALL` order.
    forms: [FormState; 4],
    /// Status message for user feedback.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(svc: &AppServices) -> Self {
        Self::with_config(svc.config())
    }

    fn with_config(config: AppConfig) -> Self {
        Self {
            config,
            forms: FormDomain::ALL.map(FormState::new),
            status_message: None,
        }
    }

    pub fn form(&self, domain: FormDomain) -> &FormState {
        &self.forms[slot(domain)]
    }

    /// A keystroke in a form field.
    pub fn edit(&mut self, domain: FormDomain, field: &str, value: String) {
        self.forms[slot(domain)].apply(FieldChange::user(field, value));
    }

    /// Pre-fill the form the result belongs to. Returns how many fields were
    /// filled.
    pub fn apply_extraction(&mut self, result: &ExtractionResult) -> usize {
        let form = &mut self.forms[slot(result.document_type().form_domain())];
        let changes = prefill_changes(form, result);
        changes
            .into_iter()
            .filter(|change| form.apply(change.clone()))
            .count()
    }
}

fn slot(domain: FormDomain) -> usize {
    match domain {
        FormDomain::Vehicle => 0,
        FormDomain::Driver => 1,
        FormDomain::Personal => 2,
        FormDomain::Company => 3,
    }
}
