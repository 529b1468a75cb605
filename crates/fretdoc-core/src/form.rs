// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Onboarding forms fed by document extraction.
//
// Each form domain declares its fields together with the ordered list of
// extraction keys that may carry the field's value. Upstream extractors speak
// more than one vocabulary (English snake_case keys, French labels from OCR of
// West African documents), hence the aliases.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// The four onboarding forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormDomain {
    Vehicle,
    Driver,
    Personal,
    Company,
}

impl FormDomain {
    pub const ALL: [FormDomain; 4] = [Self::Vehicle, Self::Driver, Self::Personal, Self::Company];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Vehicle => "Vehicle",
            Self::Driver => "Driver",
            Self::Personal => "Personal details",
            Self::Company => "Company",
        }
    }

    pub fn schema(&self) -> &'static FormSchema {
        match self {
            Self::Vehicle => &VEHICLE,
            Self::Driver => &DRIVER,
            Self::Personal => &PERSONAL,
            Self::Company => &COMPANY,
        }
    }
}

/// One declared form field.
#[derive(Debug)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    /// Extra extraction keys tried after `name`, in order.
    pub aliases: &'static [&'static str],
}

impl FieldSpec {
    /// Extraction keys to try, first match wins.
    pub fn candidates(&self) -> impl Iterator<Item = &'static str> + '_ {
        std::iter::once(self.name).chain(self.aliases.iter().copied())
    }
}

/// The ordered field list of a form domain.
#[derive(Debug)]
pub struct FormSchema {
    pub domain: FormDomain,
    pub fields: &'static [FieldSpec],
}

impl FormSchema {
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Resolve a field's value from an extraction field map.
    ///
    /// Blank values are skipped so a later alias can still supply the field.
    pub fn resolve<'a>(
        &self,
        spec: &FieldSpec,
        extracted: &'a BTreeMap<String, String>,
    ) -> Option<&'a str> {
        spec.candidates()
            .filter_map(|key| extracted.get(key))
            .map(|v| v.trim())
            .find(|v| !v.is_empty())
    }
}

const fn field(
    name: &'static str,
    label: &'static str,
    aliases: &'static [&'static str],
) -> FieldSpec {
    FieldSpec {
        name,
        label,
        aliases,
    }
}

static VEHICLE: FormSchema = FormSchema {
    domain: FormDomain::Vehicle,
    fields: &[
        field(
            "plate_number",
            "Plate number",
            &["immatriculation", "numero_immatriculation", "plaque"],
        ),
        field("make", "Make", &["marque"]),
        field("model", "Model", &["modele", "type_commercial"]),
        field("year", "Year", &["annee", "annee_fabrication"]),
        field(
            "chassis_number",
            "Chassis number",
            &["vin", "numero_chassis", "numero_serie"],
        ),
        field(
            "first_registration_date",
            "First registration",
            &["date_premiere_immatriculation", "date_mise_en_circulation"],
        ),
        field("insurer", "Insurer", &["assureur", "compagnie"]),
        field("policy_number", "Policy number", &["numero_police"]),
        field(
            "insurance_expiry",
            "Insurance valid until",
            &["valid_until", "date_fin_validite"],
        ),
        field("capacity_tonnes", "Capacity (t)", &[]),
    ],
};

static DRIVER: FormSchema = FormSchema {
    domain: FormDomain::Driver,
    fields: &[
        field("full_name", "Full name", &["nom_complet", "nom_prenoms"]),
        field(
            "birth_date",
            "Date of birth",
            &["date_naissance", "date_de_naissance"],
        ),
        field("license_number", "Licence number", &["numero_permis"]),
        field(
            "license_expiry",
            "Licence expiry",
            &["expiry_date", "date_expiration", "date_validite"],
        ),
        field(
            "license_categories",
            "Categories",
            &["categories", "categories_permis"],
        ),
        field("phone", "Phone", &[]),
    ],
};

static PERSONAL: FormSchema = FormSchema {
    domain: FormDomain::Personal,
    fields: &[
        field("full_name", "Full name", &["nom_complet", "nom_prenoms"]),
        field("birth_date", "Date of birth", &["date_naissance"]),
        field("birth_place", "Place of birth", &["lieu_naissance"]),
        field("id_number", "ID number", &["numero_cni", "numero_piece"]),
        field("nationality", "Nationality", &["nationalite"]),
        field("id_expiry", "ID expiry", &["expiry_date", "date_expiration"]),
        field("phone", "Phone", &[]),
        field("email", "Email", &[]),
    ],
};

static COMPANY: FormSchema = FormSchema {
    domain: FormDomain::Company,
    fields: &[
        field(
            "company_name",
            "Company name",
            &["raison_sociale", "denomination"],
        ),
        field(
            "registration_number",
            "RCCM number",
            &["rccm", "numero_rccm"],
        ),
        field("tax_id", "Tax ID", &["ncc", "nif", "ifu"]),
        field("legal_form", "Legal form", &["forme_juridique"]),
        field("address", "Address", &["adresse", "siege_social"]),
        field("contact_email", "Contact email", &[]),
    ],
};

/// Who last wrote a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldOrigin {
    User,
    Extracted,
}

/// A single field-level change, the same event a keystroke produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldChange {
    pub field: String,
    pub value: String,
    pub origin: FieldOrigin,
}

impl FieldChange {
    pub fn user(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
            origin: FieldOrigin::User,
        }
    }

    pub fn extracted(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
            origin: FieldOrigin::Extracted,
        }
    }
}

/// Current values of one form, keyed by declared field name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormState {
    domain: FormDomain,
    values: BTreeMap<String, String>,
    origins: BTreeMap<String, FieldOrigin>,
}

impl FormState {
    /// An empty form with every declared field present and blank.
    pub fn new(domain: FormDomain) -> Self {
        let values = domain
            .schema()
            .fields
            .iter()
            .map(|f| (f.name.to_owned(), String::new()))
            .collect();
        Self {
            domain,
            values,
            origins: BTreeMap::new(),
        }
    }

    pub fn domain(&self) -> FormDomain {
        self.domain
    }

    pub fn schema(&self) -> &'static FormSchema {
        self.domain.schema()
    }

    /// Current value, empty for undeclared fields.
    pub fn value(&self, field: &str) -> &str {
        self.values.get(field).map(String::as_str).unwrap_or("")
    }

    /// Whether the field is blank (whitespace counts as blank).
    pub fn is_blank(&self, field: &str) -> bool {
        self.value(field).trim().is_empty()
    }

    pub fn origin(&self, field: &str) -> Option<FieldOrigin> {
        self.origins.get(field).copied()
    }

    pub fn values(&self) -> &BTreeMap<String, String> {
        &self.values
    }

    /// Apply a field change. Changes to undeclared fields are ignored.
    ///
    /// Returns whether the form changed.
    pub fn apply(&mut self, change: FieldChange) -> bool {
        let Some(slot) = self.values.get_mut(&change.field) else {
            debug!(domain = ?self.domain, field = %change.field, "ignoring undeclared field");
            return false;
        };
        if *slot == change.value {
            return false;
        }
        *slot = change.value;
        self.origins.insert(change.field, change.origin);
        true
    }

    /// Builder-style `apply` for tests and fixtures.
    pub fn with(mut self, change: FieldChange) -> Self {
        self.apply(change);
        self
    }
}
