//! Notification domain types

use serde::{Deserialize, Serialize};

/// Twilio Notify notification, sent form-encoded
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Notification {
    /// Identity of the user bound to the service
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity: Option<String>,
    /// Tag selecting a group of bindings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub body: String,
}

impl Notification {
    /// A notification needs a body and at least one addressing field
    pub fn is_addressed(&self) -> bool {
        let present = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.trim().is_empty());
        present(&self.identity) || present(&self.tag)
    }
}
