// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Sample extractor — canned responses after a fixed delay, for demos and for
// running the onboarding flow without a recognition backend.

use std::time::Duration;

use async_trait::async_trait;
use fretdoc_core::error::Result;
use fretdoc_core::types::{DocumentType, ExtractionResult};
use tracing::debug;

use super::adapter::{DocumentExtractor, parse_response};
use crate::source::SelectedImage;

/// Returns the same sample data for every image of a given document type.
#[derive(Debug, Clone)]
pub struct SampleExtractor {
    delay: Duration,
}

impl SampleExtractor {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for SampleExtractor {
    fn default() -> Self {
        Self::new(Duration::from_millis(1_500))
    }
}

#[async_trait]
impl DocumentExtractor for SampleExtractor {
    fn name(&self) -> &str {
        "sample"
    }

    async fn extract(
        &self,
        image: &SelectedImage,
        document_type: DocumentType,
    ) -> Result<ExtractionResult> {
        debug!(file = image.file_name(), document = %document_type, "serving sample extraction");
        tokio::time::sleep(self.delay).await;
        parse_response(sample_response(document_type), document_type)
    }
}

/// Canned backend response for a document type.
fn sample_response(document_type: DocumentType) -> &'static str {
    match document_type {
        DocumentType::VehicleRegistration => {
            r#"{
                "document_type": "vehicle_registration",
                "fields": {
                    "plate_number": "1234 ABC 75",
                    "make": "TOYOTA",
                    "model": "HILUX",
                    "year": "2018",
                    "chassis_number": "MR0FZ29G401234567",
                    "first_registration_date": "2018-03-14",
                    "owner_name": "TRANSPORTS KONATE SARL"
                },
                "confidence": 0.92
            }"#
        }
        DocumentType::VehicleInsurance => {
            r#"{
                "document_type": "vehicle_insurance",
                "fields": {
                    "policy_number": "POL-2024-556677",
                    "insurer": "NSIA ASSURANCES",
                    "plate_number": "1234 ABC 75",
                    "valid_from": "2024-01-01",
                    "valid_until": "2024-12-31"
                },
                "confidence": 0.88
            }"#
        }
        DocumentType::DriverLicense => {
            r#"{
                "document_type": "driver_license",
                "fields": {
                    "full_name": "KONATE MAMADOU",
                    "birth_date": "1985-06-12",
                    "license_number": "CI-DL-0045821",
                    "issue_date": "2019-02-01",
                    "expiry_date": "2029-01-31",
                    "categories": "B, C, CE"
                },
                "confidence": 0.9
            }"#
        }
        DocumentType::IdentityCard => {
            r#"{
                "document_type": "identity_card",
                "fields": {
                    "full_name": "KONATE MAMADOU",
                    "birth_date": "1985-06-12",
                    "birth_place": "BOUAKE",
                    "id_number": "C0012345678",
                    "nationality": "IVOIRIENNE",
                    "expiry_date": "2030-05-20"
                },
                "confidence": 0.91
            }"#
        }
        DocumentType::BusinessRegistration => {
            r#"{
                "document_type": "business_registration",
                "fields": {
                    "company_name": "TRANSPORTS KONATE SARL",
                    "registration_number": "CI-ABJ-2016-B-12345",
                    "tax_id": "1612345A",
                    "legal_form": "SARL",
                    "address": "Zone industrielle de Yopougon, Abidjan"
                },
                "confidence": 0.87
            }"#
        }
    }
}
