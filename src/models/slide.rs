use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::transitions::TransitionVariant;

/// A single slide descriptor supplied by the content provider.
/// The engine owns navigation and feedback over slides, never their content.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slide {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    /// Opaque to the engine; interpreted by the host renderer.
    #[serde(default)]
    pub content: Value,
    /// Autoplay dwell time before advancing, in seconds.
    pub duration_secs: u32,
    #[serde(default)]
    pub background: String,
    /// Forces this variant when set, overriding the session selection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transition: Option<TransitionVariant>,
}

impl Slide {
    pub fn new(id: impl Into<String>, title: impl Into<String>, duration_secs: u32) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            subtitle: None,
            content: Value::Null,
            duration_secs,
            background: String::new(),
            transition: None,
        }
    }

    pub fn with_transition(mut self, variant: TransitionVariant) -> Self {
        self.transition = Some(variant);
        self
    }
}
