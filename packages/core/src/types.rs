//! Plan data model consumed by the metadata builder and the deposit connector.
//!
//! The structures mirror the JSON the host platform sends with a deposit
//! request (camelCase field names). Everything is read-only input: a plan is
//! supplied per deposit call and never mutated.
//!
//! Two value models coexist:
//!
//! - **Description** values are a tree: a template definition of pages,
//!   sections, field-sets and fields, plus a value store keyed by field-set id
//!   whose repeatable items map field ids to [`FieldValue`]s.
//! - **Plan-blueprint** values are flat: a list of blueprint fields and a list
//!   of [`PlanBlueprintValue`]s matched by `field_id`.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Deserialise an explicit JSON `null` as `T::default()`.
///
/// Hosts send `null` for empty lists; pair with `#[serde(default)]` so an
/// absent key behaves the same.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// ---------------------------------------------------------------------------
// Plan
// ---------------------------------------------------------------------------

/// Who may browse a plan on the host platform.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum PlanAccessType {
    /// Listed on the public explore pages; the deposit links back to it.
    Public,
    #[default]
    Restricted,
}

/// A data-management plan as handed to the connector for deposit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    pub id: Uuid,

    /// Human-readable title, emitted as `dc:title`.
    pub label: String,

    #[serde(default)]
    pub access_type: PlanAccessType,

    /// Identifier of the repository object created by an earlier deposit.
    /// `None` on the first deposit of the plan.
    #[serde(default, rename = "previousDOI", alias = "previousDoi")]
    pub previous_doi: Option<String>,

    /// Plan version, stamped into every uploaded artifact name.
    #[serde(default)]
    pub version: u32,

    /// Plan owners; each contributes one `dc:creator`.
    #[serde(default, deserialize_with = "null_as_default")]
    pub users: Vec<PlanUser>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub descriptions: Vec<Description>,

    #[serde(default)]
    pub plan_blueprint: Option<PlanBlueprint>,

    #[serde(default)]
    pub properties: Option<PlanProperties>,

    #[serde(default)]
    pub pdf_file: Option<FileEnvelope>,

    #[serde(default)]
    pub rda_json_file: Option<FileEnvelope>,

    #[serde(default)]
    pub supporting_files_zip: Option<FileEnvelope>,
}

impl Plan {
    /// The plan's artifacts in upload order: PDF, RDA JSON, supporting-files ZIP.
    pub fn artifacts(&self) -> impl Iterator<Item = (ArtifactKind, &FileEnvelope)> {
        [
            (ArtifactKind::Pdf, self.pdf_file.as_ref()),
            (ArtifactKind::RdaJson, self.rda_json_file.as_ref()),
            (ArtifactKind::SupportingFilesZip, self.supporting_files_zip.as_ref()),
        ]
        .into_iter()
        .filter_map(|(kind, file)| file.map(|f| (kind, f)))
    }

    /// Blueprint sections; empty when the plan carries no blueprint definition.
    pub fn blueprint_sections(&self) -> &[BlueprintSection] {
        self.plan_blueprint
            .as_ref()
            .and_then(|b| b.definition.as_ref())
            .map(|d| d.sections.as_slice())
            .unwrap_or_default()
    }

    /// The submitted blueprint value for `field_id`, if any.
    pub fn blueprint_value(&self, field_id: &Uuid) -> Option<&PlanBlueprintValue> {
        self.properties
            .as_ref()?
            .plan_blueprint_values
            .iter()
            .find(|v| &v.field_id == field_id)
    }
}

/// A user attached to a plan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct PlanUser {
    pub user: User,
    #[serde(default)]
    pub role: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(default)]
    pub id: Option<Uuid>,
    /// Display name, emitted verbatim as `dc:creator`.
    pub name: String,
}

// ---------------------------------------------------------------------------
// Artifacts
// ---------------------------------------------------------------------------

/// A file produced by the host for deposit.
///
/// Content is either inline (`file`) or a reference into shared storage
/// (`file_ref`). Inline bytes serialise as a JSON array of numbers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct FileEnvelope {
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub file: Option<Vec<u8>>,
    #[serde(default)]
    pub file_ref: Option<String>,
}

/// The three artifact slots a plan may fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    Pdf,
    RdaJson,
    SupportingFilesZip,
}

impl ArtifactKind {
    /// Content type sent with the upload.
    pub fn content_type(self) -> &'static str {
        match self {
            ArtifactKind::Pdf => "application/pdf",
            ArtifactKind::RdaJson => "application/json",
            ArtifactKind::SupportingFilesZip => "application/zip",
        }
    }
}

impl std::fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArtifactKind::Pdf => write!(f, "pdf"),
            ArtifactKind::RdaJson => write!(f, "rda-json"),
            ArtifactKind::SupportingFilesZip => write!(f, "supporting-files"),
        }
    }
}

// ---------------------------------------------------------------------------
// Plan blueprint
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct PlanBlueprint {
    #[serde(default)]
    pub id: Option<Uuid>,
    #[serde(default)]
    pub definition: Option<BlueprintDefinition>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct BlueprintDefinition {
    #[serde(default, deserialize_with = "null_as_default")]
    pub sections: Vec<BlueprintSection>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct BlueprintSection {
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub fields: Vec<BlueprintField>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct BlueprintField {
    pub id: Uuid,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub semantics: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct PlanProperties {
    #[serde(default, deserialize_with = "null_as_default")]
    pub plan_blueprint_values: Vec<PlanBlueprintValue>,
}

/// A submitted blueprint value. Any of the three components may be set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct PlanBlueprintValue {
    pub field_id: Uuid,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub number_value: Option<f64>,
    #[serde(default)]
    pub date_value: Option<DateTime<Utc>>,
}

// ---------------------------------------------------------------------------
// Descriptions: template definition
// ---------------------------------------------------------------------------

/// A description document attached to a plan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Description {
    #[serde(default)]
    pub id: Option<Uuid>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub description_template: DescriptionTemplate,
    #[serde(default)]
    pub properties: Option<DescriptionProperties>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct DescriptionTemplate {
    #[serde(default)]
    pub id: Option<Uuid>,
    #[serde(default)]
    pub definition: TemplateDefinition,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct TemplateDefinition {
    #[serde(default, deserialize_with = "null_as_default")]
    pub pages: Vec<TemplatePage>,
}

impl TemplateDefinition {
    /// Every field of the template, depth first through pages and nested sections.
    pub fn all_fields(&self) -> Vec<&TemplateField> {
        let mut out = Vec::new();
        for page in &self.pages {
            for section in &page.sections {
                section.collect_fields(&mut out);
            }
        }
        out
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct TemplatePage {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub sections: Vec<TemplateSection>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct TemplateSection {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub sections: Vec<TemplateSection>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub field_sets: Vec<TemplateFieldSet>,
}

impl TemplateSection {
    fn collect_fields<'a>(&'a self, out: &mut Vec<&'a TemplateField>) {
        for set in &self.field_sets {
            out.extend(set.fields.iter());
        }
        for nested in &self.sections {
            nested.collect_fields(out);
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct TemplateFieldSet {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub fields: Vec<TemplateField>,
}

/// A field definition inside a description template.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct TemplateField {
    pub id: String,
    /// Semantic-path tags, e.g. `["fedora.subject", "zenodo.keywords"]`.
    #[serde(default, deserialize_with = "null_as_default")]
    pub semantics: Vec<String>,
    /// Field kind and kind-specific configuration. Fields without data
    /// never contribute values.
    #[serde(default)]
    pub data: Option<FieldData>,
}

impl TemplateField {
    pub fn has_semantic(&self, path: &str) -> bool {
        self.semantics.iter().any(|s| s == path)
    }
}

/// The kind of a template field, tagged by `fieldType` on the wire.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "fieldType", rename_all = "camelCase")]
pub enum FieldData {
    FreeText,
    TextArea,
    RichTextArea,
    BooleanDecision,
    CheckBox,
    DatePicker,
    DatasetIdentifier,
    Validation,
    Tags,
    Select {
        #[serde(default, deserialize_with = "null_as_default")]
        options: Vec<SelectOption>,
        #[serde(default, rename = "multipleSelect")]
        multiple_select: bool,
    },
    RadioBox {
        #[serde(default, deserialize_with = "null_as_default")]
        options: Vec<SelectOption>,
    },
    ReferenceTypes {
        #[serde(default, rename = "referenceTypeId")]
        reference_type_id: Option<Uuid>,
    },
    Upload,
    InternalEntriesPlans,
    InternalEntriesDescriptions,
}

/// One entry of a select or radio option list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct SelectOption {
    pub label: String,
    pub value: String,
}

// ---------------------------------------------------------------------------
// Descriptions: submitted values
// ---------------------------------------------------------------------------

/// Submitted values of a description, keyed by field-set id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct DescriptionProperties {
    #[serde(default, deserialize_with = "null_as_default")]
    pub field_sets: HashMap<String, FieldSetValue>,
}

impl DescriptionProperties {
    /// Every submitted value for `field_id` across all field-sets and their
    /// repeated items. Field ids compare ASCII case-insensitively.
    pub fn values_for(&self, field_id: &str) -> Vec<&FieldValue> {
        self.field_sets
            .values()
            .flat_map(|set| set.items.iter())
            .flat_map(|item| item.fields.iter())
            .filter(|(key, _)| key.eq_ignore_ascii_case(field_id))
            .map(|(_, value)| value)
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct FieldSetValue {
    #[serde(default, deserialize_with = "null_as_default")]
    pub items: Vec<FieldSetItem>,
}

/// One repetition of a field-set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct FieldSetItem {
    #[serde(default)]
    pub ordinal: i32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub fields: HashMap<String, FieldValue>,
}

/// A submitted value. Which component is meaningful depends on the field kind.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct FieldValue {
    #[serde(default)]
    pub text_value: Option<String>,
    #[serde(default)]
    pub text_list_value: Option<Vec<String>>,
    #[serde(default)]
    pub date_value: Option<DateTime<Utc>>,
    #[serde(default)]
    pub boolean_value: Option<bool>,
    #[serde(default)]
    pub external_identifier: Option<ExternalIdentifier>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub references: Vec<ReferenceValue>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ExternalIdentifier {
    #[serde(default)]
    pub identifier: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

/// A reference (funder, licence, organisation…) attached to a reference field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceValue {
    #[serde(default)]
    pub id: Option<Uuid>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default, rename = "type")]
    pub reference_type: Option<ReferenceType>,
    #[serde(default)]
    pub definition: Option<ReferenceDefinition>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceType {
    #[serde(default)]
    pub code: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceDefinition {
    #[serde(default, deserialize_with = "null_as_default")]
    pub fields: Vec<ReferenceField>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceField {
    pub code: String,
    #[serde(default)]
    pub value: Option<String>,
}

// --- tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn artifacts_follow_fixed_order() {
        let plan = Plan {
            supporting_files_zip: Some(FileEnvelope::default()),
            pdf_file: Some(FileEnvelope::default()),
            ..Default::default()
        };
        let kinds: Vec<ArtifactKind> = plan.artifacts().map(|(k, _)| k).collect();
        assert_eq!(kinds, vec![ArtifactKind::Pdf, ArtifactKind::SupportingFilesZip]);
    }

    #[test]
    fn all_fields_walks_nested_sections() {
        let json = r#"{
            "pages": [{
                "sections": [{
                    "fieldSets": [{ "id": "fs1", "fields": [{ "id": "a" }] }],
                    "sections": [{
                        "fieldSets": [{ "id": "fs2", "fields": [{ "id": "b" }, { "id": "c" }] }]
                    }]
                }]
            }]
        }"#;
        let def: TemplateDefinition = serde_json::from_str(json).unwrap();
        let ids: Vec<&str> = def.all_fields().iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn values_for_is_case_insensitive_across_items() {
        let json = r#"{
            "fieldSets": {
                "fs1": { "items": [
                    { "ordinal": 0, "fields": { "Title": { "textValue": "one" } } },
                    { "ordinal": 1, "fields": { "title": { "textValue": "two" } } }
                ] }
            }
        }"#;
        let props: DescriptionProperties = serde_json::from_str(json).unwrap();
        let mut texts: Vec<&str> = props
            .values_for("TITLE")
            .iter()
            .filter_map(|v| v.text_value.as_deref())
            .collect();
        texts.sort();
        assert_eq!(texts, vec!["one", "two"]);
    }

    #[test]
    fn field_data_deserialises_tagged_variants() {
        let json = r#"{ "fieldType": "select", "multipleSelect": true,
                        "options": [{ "label": "Alpha", "value": "a" }] }"#;
        let data: FieldData = serde_json::from_str(json).unwrap();
        assert_eq!(
            data,
            FieldData::Select {
                options: vec![SelectOption { label: "Alpha".into(), value: "a".into() }],
                multiple_select: true,
            }
        );
    }

    #[test]
    fn plan_deserialises_previous_doi() {
        let json = r#"{
            "id": "0b5c1f3e-9a7d-4d2b-8c6e-1f2a3b4c5d6e",
            "label": "Soil survey",
            "accessType": "public",
            "previousDOI": "abc-123",
            "version": 2
        }"#;
        let plan: Plan = serde_json::from_str(json).unwrap();
        assert_eq!(plan.access_type, PlanAccessType::Public);
        assert_eq!(plan.previous_doi.as_deref(), Some("abc-123"));
        assert_eq!(plan.version, 2);
        assert!(plan.users.is_empty());
    }

    #[test]
    fn null_lists_read_as_empty() {
        let json = r#"{
            "id": "0b5c1f3e-9a7d-4d2b-8c6e-1f2a3b4c5d6e",
            "label": "Soil survey",
            "users": null,
            "descriptions": null
        }"#;
        let plan: Plan = serde_json::from_str(json).unwrap();
        assert!(plan.users.is_empty());
        assert!(plan.descriptions.is_empty());

        let field: TemplateField =
            serde_json::from_str(r#"{ "id": "a", "semantics": null }"#).unwrap();
        assert!(field.semantics.is_empty());

        let data: FieldData =
            serde_json::from_str(r#"{ "fieldType": "radioBox", "options": null }"#).unwrap();
        assert_eq!(data, FieldData::RadioBox { options: Vec::new() });
    }
}
