//! Check-in note enrichment configuration.

use serde::{Deserialize, Serialize};

/// Which enricher writes the note attached to a check-in record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteProvider {
    /// Attach `static_text` to every record.
    #[default]
    Static,
    /// Ask the Gemini API for a short audit line.
    Gemini,
}

fn default_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_endpoint() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

const fn default_timeout_secs() -> u64 {
    8
}

fn default_static_text() -> String {
    "Log entry generated successfully.".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NotesConfig {
    #[serde(default)]
    pub provider: NoteProvider,

    /// Gemini API key.
    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_model")]
    pub model: String,

    /// Base URL of the generative language API.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Request timeout. A timed-out request falls back to the offline note.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_static_text")]
    pub static_text: String,
}

impl Default for NotesConfig {
    fn default() -> Self {
        Self {
            provider: NoteProvider::default(),
            api_key: String::new(),
            model: default_model(),
            endpoint: default_endpoint(),
            timeout_secs: default_timeout_secs(),
            static_text: default_static_text(),
        }
    }
}

impl NotesConfig {
    /// Check if the Gemini provider can be used.
    pub fn is_configured(&self) -> bool {
        self.provider == NoteProvider::Gemini && !self.api_key.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_use_static_notes() {
        let config = NotesConfig::default();
        assert_eq!(config.provider, NoteProvider::Static);
        assert_eq!(config.model, "gemini-2.5-flash");
        assert_eq!(config.timeout_secs, 8);
        assert!(!config.is_configured());
    }

    #[test]
    fn gemini_needs_api_key() {
        let mut config = NotesConfig {
            provider: NoteProvider::Gemini,
            ..Default::default()
        };
        assert!(!config.is_configured());

        config.api_key = "key".into();
        assert!(config.is_configured());
    }
}
