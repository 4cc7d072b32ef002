/// Request payload normalization
///
/// Clients historically submit three list-shaped fields over FormData,
/// which means each can arrive either as a native JSON array or as a
/// JSON-encoded string (and assignees sometimes as a single bare id).
/// This module normalizes every accepted shape into strict typed values
/// at the boundary, so handlers and models never see the ambiguity.
///
/// Degradation rules for malformed encoded strings are deliberate:
/// a string starting with `[` that fails to parse becomes an empty
/// list, any other string is wrapped as a single element.

use serde::Deserialize;
use taskdeck_shared::models::task::{Attachment, ChecklistItem};
use uuid::Uuid;

/// Assignee list: native array, encoded array, or one bare id
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AssigneesField {
    /// Native array of user ids
    List(Vec<Uuid>),

    /// JSON-encoded array or a single id as a string
    Encoded(String),
}

impl AssigneesField {
    /// Normalizes into a plain id list
    pub fn normalize(self) -> Vec<Uuid> {
        match self {
            AssigneesField::List(ids) => ids,
            AssigneesField::Encoded(raw) => {
                let raw = raw.trim();
                if raw.starts_with('[') {
                    serde_json::from_str(raw).unwrap_or_default()
                } else {
                    raw.parse::<Uuid>().map(|id| vec![id]).unwrap_or_default()
                }
            }
        }
    }
}

/// One checklist entry: bare text or a full object
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ChecklistEntry {
    /// Full item, `completed` defaults to false
    Item(ChecklistItem),

    /// Bare text, treated as an incomplete item
    Text(String),
}

impl ChecklistEntry {
    fn into_item(self) -> ChecklistItem {
        match self {
            ChecklistEntry::Item(item) => item,
            ChecklistEntry::Text(text) => ChecklistItem {
                text,
                completed: false,
            },
        }
    }
}

/// Checklist: native array of entries or a JSON-encoded string
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ChecklistField {
    /// Native array
    List(Vec<ChecklistEntry>),

    /// JSON-encoded array, or one bare text item
    Encoded(String),
}

impl ChecklistField {
    /// Normalizes into checklist items
    pub fn normalize(self) -> Vec<ChecklistItem> {
        match self {
            ChecklistField::List(entries) => {
                entries.into_iter().map(ChecklistEntry::into_item).collect()
            }
            ChecklistField::Encoded(raw) => {
                let trimmed = raw.trim();
                if trimmed.starts_with('[') {
                    serde_json::from_str::<Vec<ChecklistEntry>>(trimmed)
                        .map(|entries| {
                            entries.into_iter().map(ChecklistEntry::into_item).collect()
                        })
                        .unwrap_or_default()
                } else {
                    vec![ChecklistEntry::Text(raw).into_item()]
                }
            }
        }
    }
}

/// One attachment: a bare link or a preserved object
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AttachmentEntry {
    /// Full attachment object, kept as-is
    Object(Attachment),

    /// Bare URL, converted to a link attachment
    Link(String),
}

impl AttachmentEntry {
    fn into_attachment(self) -> Attachment {
        match self {
            AttachmentEntry::Object(attachment) => attachment,
            AttachmentEntry::Link(url) => Attachment::link(url),
        }
    }
}

/// Attachments: native array of entries or a JSON-encoded string
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AttachmentsField {
    /// Native array
    List(Vec<AttachmentEntry>),

    /// JSON-encoded array, or one bare link
    Encoded(String),
}

impl AttachmentsField {
    /// Normalizes into attachment records
    pub fn normalize(self) -> Vec<Attachment> {
        match self {
            AttachmentsField::List(entries) => entries
                .into_iter()
                .map(AttachmentEntry::into_attachment)
                .collect(),
            AttachmentsField::Encoded(raw) => {
                let trimmed = raw.trim();
                if trimmed.starts_with('[') {
                    serde_json::from_str::<Vec<AttachmentEntry>>(trimmed)
                        .map(|entries| {
                            entries
                                .into_iter()
                                .map(AttachmentEntry::into_attachment)
                                .collect()
                        })
                        .unwrap_or_default()
                } else {
                    vec![AttachmentEntry::Link(raw).into_attachment()]
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_assignees_native_array() {
        let id = Uuid::new_v4();
        let field: AssigneesField = serde_json::from_value(json!([id])).unwrap();
        assert_eq!(field.normalize(), vec![id]);
    }

    #[test]
    fn test_assignees_encoded_array() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let encoded = format!(r#""[\"{}\",\"{}\"]""#, a, b);
        let field: AssigneesField = serde_json::from_str(&encoded).unwrap();
        assert_eq!(field.normalize(), vec![a, b]);
    }

    #[test]
    fn test_assignees_bare_id_wraps() {
        let id = Uuid::new_v4();
        let field: AssigneesField = serde_json::from_value(json!(id.to_string())).unwrap();
        assert_eq!(field.normalize(), vec![id]);
    }

    #[test]
    fn test_assignees_malformed_encoded_array_degrades_to_empty() {
        let field: AssigneesField = serde_json::from_value(json!("[not json")).unwrap();
        assert!(field.normalize().is_empty());
    }

    #[test]
    fn test_assignees_garbage_string_degrades_to_empty() {
        let field: AssigneesField = serde_json::from_value(json!("not-a-uuid")).unwrap();
        assert!(field.normalize().is_empty());
    }

    #[test]
    fn test_checklist_plain_text_items() {
        let field: ChecklistField =
            serde_json::from_value(json!(["write docs", "review"])).unwrap();
        let items = field.normalize();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].text, "write docs");
        assert!(!items[0].completed);
    }

    #[test]
    fn test_checklist_object_items_keep_completion() {
        let field: ChecklistField = serde_json::from_value(json!([
            { "text": "done already", "completed": true },
            { "text": "still open" }
        ]))
        .unwrap();
        let items = field.normalize();
        assert!(items[0].completed);
        assert!(!items[1].completed);
    }

    #[test]
    fn test_checklist_encoded_string() {
        let field: ChecklistField =
            serde_json::from_value(json!(r#"[{"text":"a","completed":true},"b"]"#)).unwrap();
        let items = field.normalize();
        assert_eq!(items.len(), 2);
        assert!(items[0].completed);
        assert_eq!(items[1].text, "b");
    }

    #[test]
    fn test_checklist_bare_string_becomes_single_item() {
        let field: ChecklistField = serde_json::from_value(json!("just one thing")).unwrap();
        let items = field.normalize();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].text, "just one thing");
    }

    #[test]
    fn test_checklist_malformed_encoded_degrades_to_empty() {
        let field: ChecklistField = serde_json::from_value(json!("[{{broken")).unwrap();
        assert!(field.normalize().is_empty());
    }

    #[test]
    fn test_attachments_link_strings_convert() {
        let field: AttachmentsField =
            serde_json::from_value(json!(["https://example.com/doc"])).unwrap();
        let attachments = field.normalize();
        assert_eq!(attachments[0].file_type, "link");
        assert_eq!(attachments[0].file_url, "https://example.com/doc");
        assert_eq!(attachments[0].original_name, "https://example.com/doc");
    }

    #[test]
    fn test_attachments_objects_preserved() {
        let field: AttachmentsField = serde_json::from_value(json!([{
            "fileUrl": "https://cdn.example.com/a.pdf",
            "fileType": "pdf",
            "originalName": "a.pdf",
            "storageId": "abc123"
        }]))
        .unwrap();
        let attachments = field.normalize();
        assert_eq!(attachments[0].file_type, "pdf");
        assert_eq!(attachments[0].storage_id.as_deref(), Some("abc123"));
    }

    #[test]
    fn test_attachments_encoded_mixed() {
        let encoded = r#"["https://example.com", {"fileUrl":"u","fileType":"image","originalName":"u.png"}]"#;
        let field: AttachmentsField = serde_json::from_value(json!(encoded)).unwrap();
        let attachments = field.normalize();
        assert_eq!(attachments.len(), 2);
        assert_eq!(attachments[0].file_type, "link");
        assert_eq!(attachments[1].file_type, "image");
    }

    #[test]
    fn test_attachments_bare_link_wraps() {
        let field: AttachmentsField =
            serde_json::from_value(json!("https://example.com/one")).unwrap();
        let attachments = field.normalize();
        assert_eq!(attachments.len(), 1);
        assert_eq!(attachments[0].file_type, "link");
    }
}
