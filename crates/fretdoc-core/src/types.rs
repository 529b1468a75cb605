// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for document capture and extraction.

use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::FretdocError;
use crate::form::FormDomain;

/// Unique identifier for a camera capture session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Documents a transporter or shipper uploads during onboarding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    /// Carte grise.
    VehicleRegistration,
    /// Vehicle insurance certificate.
    VehicleInsurance,
    /// Driving licence (front and back).
    DriverLicense,
    /// National identity card (front and back).
    IdentityCard,
    /// RCCM business registration extract.
    BusinessRegistration,
}

impl DocumentType {
    pub const ALL: [DocumentType; 5] = [
        Self::VehicleRegistration,
        Self::VehicleInsurance,
        Self::DriverLicense,
        Self::IdentityCard,
        Self::BusinessRegistration,
    ];

    /// Wire tag used by extraction backends.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::VehicleRegistration => "vehicle_registration",
            Self::VehicleInsurance => "vehicle_insurance",
            Self::DriverLicense => "driver_license",
            Self::IdentityCard => "identity_card",
            Self::BusinessRegistration => "business_registration",
        }
    }

    /// Display label for the capture screen.
    pub fn label(&self) -> &'static str {
        match self {
            Self::VehicleRegistration => "Vehicle registration",
            Self::VehicleInsurance => "Vehicle insurance",
            Self::DriverLicense => "Driver licence",
            Self::IdentityCard => "Identity card",
            Self::BusinessRegistration => "Business registration",
        }
    }

    /// Whether both a front and a back capture are needed.
    pub fn two_sided(&self) -> bool {
        matches!(self, Self::DriverLicense | Self::IdentityCard)
    }

    /// The form an extraction of this document pre-fills.
    pub fn form_domain(&self) -> FormDomain {
        match self {
            Self::VehicleRegistration | Self::VehicleInsurance => FormDomain::Vehicle,
            Self::DriverLicense => FormDomain::Driver,
            Self::IdentityCard => FormDomain::Personal,
            Self::BusinessRegistration => FormDomain::Company,
        }
    }

    /// Field keys an extraction of this document is expected to yield.
    pub fn expected_fields(&self) -> &'static [&'static str] {
        match self {
            Self::VehicleRegistration => &[
                "plate_number",
                "make",
                "model",
                "year",
                "chassis_number",
                "first_registration_date",
                "owner_name",
            ],
            Self::VehicleInsurance => &[
                "policy_number",
                "insurer",
                "plate_number",
                "valid_from",
                "valid_until",
            ],
            Self::DriverLicense => &[
                "full_name",
                "birth_date",
                "license_number",
                "issue_date",
                "expiry_date",
                "categories",
            ],
            Self::IdentityCard => &[
                "full_name",
                "birth_date",
                "birth_place",
                "id_number",
                "nationality",
                "expiry_date",
            ],
            Self::BusinessRegistration => &[
                "company_name",
                "registration_number",
                "tax_id",
                "legal_form",
                "address",
            ],
        }
    }
}

impl std::fmt::Display for DocumentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentType {
    type Err = FretdocError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == tag)
            .ok_or_else(|| FretdocError::MalformedExtraction(format!("unknown document type {tag}")))
    }
}

/// Which side of a document the workflow is expecting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentSide {
    Front,
    Back,
}

/// Image formats accepted by the capture pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImageMime {
    Jpeg,
    Png,
    Webp,
}

impl ImageMime {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Webp => "image/webp",
        }
    }

    /// Parse a MIME string; parameters such as `;charset=` are ignored.
    pub fn from_mime(mime: &str) -> Option<Self> {
        let essence = mime.split(';').next().unwrap_or("").trim();
        match essence.to_ascii_lowercase().as_str() {
            "image/jpeg" | "image/jpg" | "image/pjpeg" => Some(Self::Jpeg),
            "image/png" => Some(Self::Png),
            "image/webp" => Some(Self::Webp),
            _ => None,
        }
    }

    /// Infer the format from a file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" | "jfif" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            "webp" => Some(Self::Webp),
            _ => None,
        }
    }
}

/// Self-reported certainty of an extraction, always within `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Confidence(f64);

impl Confidence {
    /// Returns `None` for NaN or values outside `[0, 1]`.
    pub fn new(value: f64) -> Option<Self> {
        (0.0..=1.0).contains(&value).then_some(Self(value))
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    /// Rounded percentage for display.
    pub fn percent(&self) -> u8 {
        (self.0 * 100.0).round() as u8
    }
}

impl TryFrom<f64> for Confidence {
    type Error = FretdocError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| {
            FretdocError::MalformedExtraction(format!("confidence {value} outside [0, 1]"))
        })
    }
}

impl From<Confidence> for f64 {
    fn from(c: Confidence) -> f64 {
        c.0
    }
}

/// Structured output of one extraction call. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    document_type: DocumentType,
    fields: BTreeMap<String, String>,
    confidence: Option<Confidence>,
    extracted_at: DateTime<Utc>,
}

impl ExtractionResult {
    pub fn new(
        document_type: DocumentType,
        fields: BTreeMap<String, String>,
        confidence: Option<Confidence>,
    ) -> Self {
        Self {
            document_type,
            fields,
            confidence,
            extracted_at: Utc::now(),
        }
    }

    /// Build from `(key, value)` pairs; a repeated key keeps its first value.
    pub fn from_pairs<K, V>(
        document_type: DocumentType,
        pairs: impl IntoIterator<Item = (K, V)>,
        confidence: Option<Confidence>,
    ) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let mut fields = BTreeMap::new();
        for (k, v) in pairs {
            fields.entry(k.into()).or_insert_with(|| v.into());
        }
        Self::new(document_type, fields, confidence)
    }

    pub fn document_type(&self) -> DocumentType {
        self.document_type
    }

    pub fn fields(&self) -> &BTreeMap<String, String> {
        &self.fields
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    pub fn confidence(&self) -> Option<Confidence> {
        self.confidence
    }

    pub fn extracted_at(&self) -> DateTime<Utc> {
        self.extracted_at
    }

    pub fn is_empty(&self) -> bool {
        self.fields.values().all(|v| v.trim().is_empty())
    }
}

// ---------------------------------------------------------------------------
// Camera types shared with the platform bridge
// ---------------------------------------------------------------------------

/// Which physical camera to ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FacingMode {
    /// Rear camera, the one pointed at documents.
    Environment,
    /// Front ("selfie") camera.
    User,
}

/// Parameters for a camera stream request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamConstraints {
    pub facing: FacingMode,
    pub ideal_width: Option<u32>,
    pub ideal_height: Option<u32>,
}

impl Default for StreamConstraints {
    fn default() -> Self {
        Self {
            facing: FacingMode::Environment,
            ideal_width: None,
            ideal_height: None,
        }
    }
}

/// One media track of a camera stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackInfo {
    pub id: String,
    pub label: Option<String>,
    pub live: bool,
}

/// A raw RGBA frame pulled from a live stream at its native resolution.
#[derive(Debug, Clone)]
pub struct VideoFrame {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl VideoFrame {
    /// Whether the buffer holds exactly `width * height` RGBA pixels.
    pub fn is_complete(&self) -> bool {
        self.width > 0
            && self.height > 0
            && self.rgba.len() as u64 == u64::from(self.width) * u64::from(self.height) * 4
    }
}
