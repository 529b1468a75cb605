// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Fretdoc — Core types, form model and error definitions shared across all crates.

pub mod config;
pub mod error;
pub mod form;
pub mod human_errors;
pub mod types;

pub use config::AppConfig;
pub use error::FretdocError;
pub use form::{FieldChange, FieldOrigin, FormDomain, FormSchema, FormState};
pub use types::*;
