//! The item data model exchanged between the executor and nodes.
//!
//! An item is one unit of workflow data: a JSON payload plus any number of
//! named binary attachments. Binaries travel base64-encoded in the `data`
//! field when serialized, the same shape workflow hosts use for item files.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single input item.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Item {
    #[serde(default)]
    pub json: Value,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub binary: HashMap<String, BinaryData>,
}

impl Item {
    /// An item with an empty JSON object and no attachments.
    pub fn empty() -> Self {
        Self {
            json: Value::Object(Default::default()),
            binary: HashMap::new(),
        }
    }

    /// Attach `data` under `property`, replacing any previous attachment.
    pub fn with_binary(mut self, property: impl Into<String>, data: BinaryData) -> Self {
        self.binary.insert(property.into(), data);
        self
    }
}

/// A binary attachment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BinaryData {
    #[serde(with = "base64_bytes")]
    pub data: Vec<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

impl BinaryData {
    pub fn new(data: Vec<u8>) -> Self {
        Self { data, file_name: None, mime_type: None }
    }

    pub fn with_file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = Some(name.into());
        self
    }

    pub fn with_mime_type(mut self, mime: impl Into<String>) -> Self {
        self.mime_type = Some(mime.into());
        self
    }
}

/// A result item. `paired_item` is the index of the input item it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputItem {
    pub json: Value,
    pub paired_item: usize,
}

mod base64_bytes {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD
            .decode(encoded.trim())
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn binary_data_decodes_base64_and_optional_metadata() {
        let item: Item = serde_json::from_value(json!({
            "json": { "id": 7 },
            "binary": {
                "data": { "data": "UEsDBA==", "fileName": "test.docx" }
            }
        }))
        .expect("item should parse");

        let bin = &item.binary["data"];
        assert_eq!(bin.data, b"PK\x03\x04");
        assert_eq!(bin.file_name.as_deref(), Some("test.docx"));
        assert_eq!(bin.mime_type, None);
    }

    #[test]
    fn invalid_base64_is_rejected() {
        let result: Result<BinaryData, _> =
            serde_json::from_value(json!({ "data": "not base64!!" }));
        assert!(result.is_err());
    }

    #[test]
    fn output_item_uses_paired_item_key() {
        let out = OutputItem { json: json!({ "CleanResult": true }), paired_item: 3 };
        let value = serde_json::to_value(&out).unwrap();
        assert_eq!(value["pairedItem"], 3);
    }
}
