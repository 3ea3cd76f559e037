use serde::{Deserialize, Serialize};

/// Error body returned by the store alongside a non-success status.
///
/// `detail` is usually a string but validation failures carry a list, so it
/// is kept as raw JSON and only ever rendered.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreRejection {
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
}

impl StoreRejection {
    pub fn parse(body: &[u8]) -> Option<Self> {
        serde_json::from_slice(body).ok()
    }

    pub fn detail_text(&self) -> Option<String> {
        match self.detail.as_ref()? {
            serde_json::Value::Null => None,
            serde_json::Value::String(text) => Some(text.clone()),
            other => Some(other.to_string()),
        }
    }
}
