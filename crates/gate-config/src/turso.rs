//! Turso/libSQL configuration.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TursoConfig {
    /// Database URL (e.g., `libsql://visitors-myorg.turso.io`).
    #[serde(default)]
    pub url: String,

    /// Database auth token.
    #[serde(default)]
    pub auth_token: String,

    /// Local libSQL database file. Used instead of the JSON Lines log when
    /// no remote database is configured.
    #[serde(default)]
    pub database_file: String,
}

impl TursoConfig {
    /// Check if the Turso config has the minimum required fields for remote access.
    pub fn is_configured(&self) -> bool {
        !self.url.is_empty() && !self.auth_token.is_empty()
    }

    /// Check if a local libSQL file was requested.
    pub fn has_local_database(&self) -> bool {
        !self.database_file.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_not_configured() {
        let config = TursoConfig::default();
        assert!(!config.is_configured());
        assert!(!config.has_local_database());
    }

    #[test]
    fn configured_when_url_and_token_set() {
        let config = TursoConfig {
            url: "libsql://visitors.turso.io".into(),
            auth_token: "token123".into(),
            ..Default::default()
        };
        assert!(config.is_configured());
    }

    #[test]
    fn url_alone_is_not_enough() {
        let config = TursoConfig {
            url: "libsql://visitors.turso.io".into(),
            ..Default::default()
        };
        assert!(!config.is_configured());
    }
}
