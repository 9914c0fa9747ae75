//! Data structures for the `bw` CLI JSON surface.

use serde::{Deserialize, Serialize};

/// Top-level response envelope emitted by `bw ... --response`.
///
/// On success `data` holds the payload; on failure `message` carries
/// the human-readable reason.
#[derive(Debug, Deserialize)]
pub struct BwResponse {
    /// Whether the invocation succeeded.
    #[serde(default)]
    pub success: bool,
    /// Failure reason, present when `success` is false.
    pub message: Option<String>,
    /// Operation payload, present when `success` is true.
    pub data: Option<serde_json::Value>,
}

/// Payload of `bw unlock --response`.
#[derive(Debug, Deserialize)]
pub struct UnlockData {
    /// The raw session token.
    pub raw: String,
}

/// Payload of `bw list items --response`: a paged list wrapper.
#[derive(Debug, Deserialize)]
pub struct ItemList {
    /// The items themselves.
    pub data: Vec<VaultItem>,
}

/// A vault item as reported by `bw list items`.
///
/// Items are read-only on this side: they are deserialized from the
/// CLI and never written back. Unknown fields (logins, cards, notes)
/// are ignored; only what the backup needs is modeled.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VaultItem {
    /// Unique item identifier.
    pub id: String,
    /// Human-readable item name, used as the attachment subfolder.
    pub name: String,
    /// Attachment records, absent for items without attachments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachments: Option<Vec<Attachment>>,
}

impl VaultItem {
    /// Whether this item carries an attachments field.
    pub fn has_attachments(&self) -> bool {
        self.attachments.is_some()
    }

    /// Number of attachment records on this item.
    pub fn attachment_count(&self) -> usize {
        self.attachments.as_ref().map_or(0, |a| a.len())
    }
}

/// An attachment record on a vault item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Attachment {
    /// Unique attachment identifier.
    pub id: String,
    /// Original file name.
    #[serde(rename = "fileName", default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    /// Size in bytes, reported by the CLI as a decimal string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_success_envelope() {
        let json = r#"{"success":true,"data":{"object":"message","raw":"tok-abc"}}"#;
        let resp: BwResponse = serde_json::from_str(json).unwrap();

        assert!(resp.success);
        assert!(resp.message.is_none());

        let unlock: UnlockData = serde_json::from_value(resp.data.unwrap()).unwrap();
        assert_eq!(unlock.raw, "tok-abc");
    }

    #[test]
    fn test_parse_failure_envelope() {
        let json = r#"{"success":false,"message":"Invalid master password."}"#;
        let resp: BwResponse = serde_json::from_str(json).unwrap();

        assert!(!resp.success);
        assert_eq!(resp.message.as_deref(), Some("Invalid master password."));
    }

    #[test]
    fn test_parse_item_with_attachments() {
        let json = r#"{
            "id": "item-1",
            "name": "Card",
            "type": 3,
            "favorite": false,
            "attachments": [
                {"id": "att-1", "fileName": "receipt.pdf", "size": "65536", "sizeName": "64 KB"}
            ]
        }"#;

        let item: VaultItem = serde_json::from_str(json).unwrap();
        assert!(item.has_attachments());
        assert_eq!(item.attachment_count(), 1);
        assert_eq!(
            item.attachments.unwrap()[0].file_name.as_deref(),
            Some("receipt.pdf")
        );
    }

    #[test]
    fn test_parse_item_without_attachments() {
        let json = r#"{"id": "item-2", "name": "Login", "type": 1}"#;
        let item: VaultItem = serde_json::from_str(json).unwrap();

        assert!(!item.has_attachments());
        assert_eq!(item.attachment_count(), 0);
    }

    #[test]
    fn test_parse_item_list_page() {
        let json = r#"{"object":"list","data":[
            {"id":"a","name":"One"},
            {"id":"b","name":"Two","attachments":[]}
        ]}"#;

        let list: ItemList = serde_json::from_str(json).unwrap();
        assert_eq!(list.data.len(), 2);
        assert!(!list.data[0].has_attachments());
        assert!(list.data[1].has_attachments());
        assert_eq!(list.data[1].attachment_count(), 0);
    }
}
