use std::fmt;
use std::path::Path;

use anyhow::Context as _;

use crate::foundation::error::{ReelError, ReelResult};

/// Keys a generator response must carry.
pub const REQUIRED_KEYS: [&str; 4] = ["hindi_quote", "english_translation", "caption", "hashtags"];

/// Hashtags as either one preformatted string or a list of tags.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum Hashtags {
    /// `"#a #b"`
    Line(String),
    /// `["#a", "#b"]`
    List(Vec<String>),
}

impl fmt::Display for Hashtags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Line(s) => f.write_str(s.trim()),
            Self::List(tags) => f.write_str(&tags.join(" ")),
        }
    }
}

/// Generated post content: the spoken quote, its translation and the post text.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ViralContent {
    /// Quote used as the voice-over script.
    pub hindi_quote: String,
    /// English translation of the quote.
    pub english_translation: String,
    /// Post caption.
    pub caption: String,
    /// Post hashtags.
    pub hashtags: Hashtags,
}

impl ViralContent {
    /// Parse and validate a generator response.
    ///
    /// Any missing key, or an empty quote, is a configuration error.
    pub fn from_json(s: &str) -> ReelResult<Self> {
        let value: serde_json::Value =
            serde_json::from_str(s).map_err(|e| ReelError::serde(e.to_string()))?;
        let obj = value
            .as_object()
            .ok_or_else(|| ReelError::config("content response is not a JSON object"))?;
        let missing: Vec<&str> = REQUIRED_KEYS
            .iter()
            .copied()
            .filter(|k| !obj.contains_key(*k))
            .collect();
        if !missing.is_empty() {
            let got: Vec<&str> = obj.keys().map(String::as_str).collect();
            return Err(ReelError::config(format!(
                "content response missing required fields {missing:?}; got {got:?}"
            )));
        }

        let content: Self =
            serde_json::from_value(value).map_err(|e| ReelError::serde(e.to_string()))?;
        if content.hindi_quote.trim().is_empty() {
            return Err(ReelError::config("content response has an empty hindi_quote"));
        }
        Ok(content)
    }

    /// Read and validate a response file.
    pub fn from_path(path: impl AsRef<Path>) -> ReelResult<Self> {
        let path = path.as_ref();
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("read content '{}'", path.display()))?;
        Self::from_json(&s)
    }

    /// Post text: caption, a blank line, then the hashtags.
    pub fn caption_text(&self) -> String {
        format!("{}\n\n{}", self.caption, self.hashtags)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/collab/content.rs"]
mod tests;
