//! Extraction of string values from tagged fields.
//!
//! Two entry points exist, one per value model:
//!
//! - [`description_values`] walks the template fields tagged with a semantic
//!   path and applies the rule for each field kind to every submitted value.
//! - [`blueprint_values`] reads the flat plan-blueprint values, where each
//!   date, number or text component contributes directly.
//!
//! Missing, blank or malformed values are skipped. Extraction never fails.

use std::collections::HashSet;

use chrono::{DateTime, Local, Utc};

use crate::semantics::SemanticPath;
use crate::types::{
    DescriptionProperties, FieldData, FieldValue, Plan, ReferenceValue, SelectOption,
    TemplateDefinition, TemplateField,
};

/// Fields of `definition` tagged with `path`.
pub fn fields_tagged<'a>(definition: &'a TemplateDefinition, path: SemanticPath) -> Vec<&'a TemplateField> {
    definition
        .all_fields()
        .into_iter()
        .filter(|f| f.has_semantic(path.as_str()))
        .collect()
}

/// Distinct values submitted for `fields`, rendered as strings.
pub fn description_values(
    fields: &[&TemplateField],
    properties: Option<&DescriptionProperties>,
) -> HashSet<String> {
    let mut values = HashSet::new();
    let Some(properties) = properties else {
        return values;
    };
    for field in fields {
        let Some(data) = &field.data else {
            continue;
        };
        for value in properties.values_for(&field.id) {
            extract_into(data, value, &mut values);
        }
    }
    values
}

/// Values of every plan-blueprint field tagged with `path`.
///
/// Within each blueprint section only the first tagged field is consulted.
pub fn blueprint_values(plan: &Plan, path: SemanticPath) -> HashSet<String> {
    let mut values = HashSet::new();
    for section in plan.blueprint_sections() {
        let Some(field) = section
            .fields
            .iter()
            .find(|f| f.semantics.iter().any(|s| s == path.as_str()))
        else {
            continue;
        };
        let Some(value) = plan.blueprint_value(&field.id) else {
            continue;
        };
        if let Some(date) = &value.date_value {
            values.insert(format_date(date));
        }
        if let Some(number) = value.number_value {
            values.insert(format_number(number));
        }
        if let Some(text) = &value.value {
            values.insert(text.clone());
        }
    }
    values
}

/// Labels of the options whose value or label appears in `raw`, in option order.
///
/// Raw entries matching no option are dropped.
pub fn match_option_labels<'a>(raw: &[String], options: &'a [SelectOption]) -> Vec<&'a str> {
    options
        .iter()
        .filter(|o| raw.iter().any(|r| *r == o.value || *r == o.label))
        .map(|o| o.label.as_str())
        .collect()
}

/// A number as the host platform renders doubles.
///
/// Integral values keep a `.0` and magnitudes outside `[1e-3, 1e7)` use
/// `E` notation:
///
/// ```
/// use fedora_deposit::extract::format_number;
///
/// assert_eq!(format_number(3.0), "3.0");
/// assert_eq!(format_number(12_345_678.0), "1.2345678E7");
/// ```
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".into();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.into();
    }

    let abs = n.abs();
    if abs == 0.0 || (1e-3..1e7).contains(&abs) {
        let plain = n.to_string();
        return if plain.contains('.') { plain } else { format!("{plain}.0") };
    }

    let scientific = format!("{n:e}");
    let (mantissa, exponent) = scientific.split_once('e').unwrap_or((scientific.as_str(), "0"));
    if mantissa.contains('.') {
        format!("{mantissa}E{exponent}")
    } else {
        format!("{mantissa}.0E{exponent}")
    }
}

/// `yyyy-MM-dd` in the local system zone.
pub fn format_date(date: &DateTime<Utc>) -> String {
    date.with_timezone(&Local).format("%Y-%m-%d").to_string()
}

// --- helpers -----------------------------------------------------------------

fn extract_into(data: &FieldData, value: &FieldValue, out: &mut HashSet<String>) {
    match data {
        FieldData::FreeText | FieldData::TextArea | FieldData::RichTextArea => {
            if let Some(text) = non_blank(value.text_value.as_deref()) {
                out.insert(text.to_string());
            }
        }
        FieldData::BooleanDecision | FieldData::CheckBox => {
            if let Some(b) = value.boolean_value {
                out.insert(b.to_string());
            }
        }
        FieldData::DatePicker => {
            if let Some(date) = &value.date_value {
                out.insert(format_date(date));
            }
        }
        FieldData::DatasetIdentifier | FieldData::Validation => {
            let id = value
                .external_identifier
                .as_ref()
                .and_then(|e| non_blank(e.identifier.as_deref()));
            if let Some(id) = id {
                out.insert(id.to_string());
            }
        }
        FieldData::Tags => {
            if let Some(tags) = &value.text_list_value {
                out.extend(tags.iter().cloned());
            }
        }
        FieldData::Select { options, .. } | FieldData::RadioBox { options } => {
            if let Some(raw) = &value.text_list_value {
                out.extend(match_option_labels(raw, options).into_iter().map(str::to_string));
            }
        }
        FieldData::ReferenceTypes { .. } => {
            for reference in value.references.iter().filter(|r| is_well_formed(r)) {
                if let Some(text) = non_blank(reference.reference.as_deref()) {
                    out.insert(text.to_string());
                }
            }
        }
        FieldData::Upload | FieldData::InternalEntriesPlans | FieldData::InternalEntriesDescriptions => {}
    }
}

// A reference counts only with a type code and at least one definition field.
fn is_well_formed(reference: &ReferenceValue) -> bool {
    let has_code = reference
        .reference_type
        .as_ref()
        .and_then(|t| non_blank(t.code.as_deref()))
        .is_some();
    let has_definition = reference
        .definition
        .as_ref()
        .is_some_and(|d| !d.fields.is_empty());
    has_code && has_definition
}

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.trim().is_empty())
}

// --- tests -------------------------------------------------------------------
