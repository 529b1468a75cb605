// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// "Label: value" parsing for recognised document text.
//
// Printed labels are normalised into extraction keys: accents folded, lower
// case, words joined with `_`, French articles dropped and "N°" read as
// "numero". So "N° d'immatriculation" becomes `numero_immatriculation` and
// "Date de naissance" becomes `date_naissance`, which the form aliases know.

use std::collections::BTreeMap;

use fretdoc_core::types::DocumentType;

const STOPWORDS: &[&str] = &["de", "du", "des", "d", "la", "le", "l", "et"];

/// Parse every `label: value` line of `text` into a key/value map.
///
/// Lines without a colon, or with an empty label or value, are skipped.
/// When a label repeats, the first occurrence wins.
pub fn parse_labelled_fields(text: &str) -> BTreeMap<String, String> {
    let mut fields = BTreeMap::new();
    for line in text.lines() {
        let Some((label, value)) = line.split_once(':') else {
            continue;
        };
        let key = normalize_label(label);
        let value = value.trim();
        if key.is_empty() || value.is_empty() {
            continue;
        }
        fields.entry(key).or_insert_with(|| value.to_owned());
    }
    fields
}

/// Turn a printed label into an extraction key.
pub fn normalize_label(label: &str) -> String {
    let folded: String = label.chars().flat_map(fold).collect();
    folded
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(|w| match w {
            "no" | "num" | "nr" => "numero",
            other => other,
        })
        .filter(|w| !STOPWORDS.contains(w))
        .collect::<Vec<_>>()
        .join("_")
}

/// Lower-case ASCII folding for the Latin letters French documents use.
fn fold(c: char) -> impl Iterator<Item = char> {
    let folded: &[char] = match c {
        'à' | 'â' | 'ä' | 'À' | 'Â' | 'Ä' => &['a'],
        'ç' | 'Ç' => &['c'],
        'é' | 'è' | 'ê' | 'ë' | 'É' | 'È' | 'Ê' | 'Ë' => &['e'],
        'î' | 'ï' | 'Î' | 'Ï' => &['i'],
        'ô' | 'ö' | 'Ô' | 'Ö' | '°' | 'º' => &['o'],
        'ù' | 'û' | 'ü' | 'Ù' | 'Û' | 'Ü' => &['u'],
        'ÿ' | 'Ÿ' => &['y'],
        'œ' | 'Œ' => &['o', 'e'],
        'æ' | 'Æ' => &['a', 'e'],
        _ => &[],
    };
    let plain = folded.is_empty().then(|| c.to_ascii_lowercase());
    folded.iter().copied().chain(plain)
}

/// Share of the document's expected fields found in `fields`.
///
/// An expected field counts as found under its own key or any alias the
/// document's form declares for it.
pub fn coverage(fields: &BTreeMap<String, String>, document_type: DocumentType) -> f64 {
    let expected = document_type.expected_fields();
    if expected.is_empty() {
        return 0.0;
    }
    let schema = document_type.form_domain().schema();
    let found = expected
        .iter()
        .filter(|key| {
            match schema.fields.iter().find(|f| f.candidates().any(|c| c == **key)) {
                Some(spec) => schema.resolve(spec, fields).is_some(),
                None => fields.get(**key).is_some_and(|v| !v.trim().is_empty()),
            }
        })
        .count();
    found as f64 / expected.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn french_labels_normalise_to_alias_keys() {
        assert_eq!(normalize_label("N° d'immatriculation"), "numero_immatriculation");
        assert_eq!(normalize_label("Date de naissance"), "date_naissance");
        assert_eq!(normalize_label("Nom et Prénoms"), "nom_prenoms");
        assert_eq!(normalize_label("Année"), "annee");
        assert_eq!(normalize_label("Modèle"), "modele");
        assert_eq!(normalize_label("Nationalité"), "nationalite");
    }

    #[test]
    fn parses_carte_grise_text() {
        let text = "REPUBLIQUE DE COTE D'IVOIRE\n\
                    N° d'immatriculation : 1234 ABC 75\n\
                    Marque: TOYOTA\n\
                    Modèle : HILUX\n\
                    Marque: NISSAN\n\
                    Année :\n";
        let fields = parse_labelled_fields(text);
        assert_eq!(fields.get("numero_immatriculation").map(String::as_str), Some("1234 ABC 75"));
        assert_eq!(fields.get("marque").map(String::as_str), Some("TOYOTA"));
        assert_eq!(fields.get("modele").map(String::as_str), Some("HILUX"));
        assert!(!fields.contains_key("annee"));
        assert_eq!(fields.len(), 3);
    }

    #[test]
    fn value_may_contain_colons() {
        let fields = parse_labelled_fields("Heure: 10:30");
        assert_eq!(fields.get("heure").map(String::as_str), Some("10:30"));
    }

    #[test]
    fn coverage_counts_aliases() {
        let fields = parse_labelled_fields(
            "Immatriculation: 1234 ABC 75\nMarque: TOYOTA\nModèle: HILUX\nAnnée: 2018",
        );
        let c = coverage(&fields, DocumentType::VehicleRegistration);
        // plate, make, model, year out of seven expected fields
        assert!((c - 4.0 / 7.0).abs() < 1e-9);
        assert_eq!(coverage(&BTreeMap::new(), DocumentType::DriverLicense), 0.0);
    }
}
