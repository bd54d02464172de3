//! # gate-config
//!
//! Layered configuration loading for Gate using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`GATE_*` prefix, `__` as separator)
//! 2. Project-level `.gate/config.toml`
//! 3. User-level `~/.config/gate/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `GATE_TURSO__URL` -> `turso.url`, `GATE_NOTES__API_KEY` -> `notes.api_key`, etc.
//! The `__` (double underscore) separates nested config sections.
//!
//! # Usage
//!
//! ```no_run
//! use gate_config::GateConfig;
//!
//! let config = GateConfig::load_with_dotenv().expect("config");
//!
//! if config.turso.is_configured() {
//!     println!("Turso URL: {}", config.turso.url);
//! }
//! ```

mod error;
mod general;
mod notes;
mod store;
mod turso;

pub use error::ConfigError;
pub use general::GeneralConfig;
pub use notes::{NoteProvider, NotesConfig};
pub use store::StoreConfig;
pub use turso::TursoConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable prefix for every config key.
pub const ENV_PREFIX: &str = "GATE_";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct GateConfig {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub turso: TursoConfig,
    #[serde(default)]
    pub notes: NotesConfig,
    #[serde(default)]
    pub general: GeneralConfig,
}

impl GateConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy`; use [`GateConfig::load_with_dotenv`] for `.env` loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Figment` if a source cannot be parsed or a value
    /// has the wrong type.
    pub fn load() -> Result<Self, ConfigError> {
        Self::figment().extract().map_err(ConfigError::from)
    }

    /// Load configuration for the project rooted at `root`, reading its
    /// `.gate/config.toml` instead of the one in the current directory.
    ///
    /// # Errors
    ///
    /// Same as [`GateConfig::load`].
    pub fn load_at(root: &Path) -> Result<Self, ConfigError> {
        Self::figment_at(root).extract().map_err(ConfigError::from)
    }

    /// Load configuration with `.env` file support.
    ///
    /// # Errors
    ///
    /// Same as [`GateConfig::load`].
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        Self::load_dotenv();
        Self::load()
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect the figment or layer extra providers.
    pub fn figment() -> Figment {
        Self::figment_at(Path::new(""))
    }

    /// Same chain as [`GateConfig::figment`] with the project layer read from
    /// `root/.gate/config.toml`.
    pub fn figment_at(root: &Path) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        // Layer 2: Project-local config
        let local_path = root.join(".gate").join("config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Environment variables (highest priority)
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Check cross-field constraints figment cannot express.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for the first offending field, or
    /// `ConfigError::NotConfigured` when the Gemini provider has no API key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.store.log_file.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "store.log_file".into(),
                reason: "must not be empty".into(),
            });
        }
        if !self.turso.url.is_empty() && !self.turso.url.contains("://") {
            return Err(ConfigError::InvalidValue {
                field: "turso.url".into(),
                reason: format!("'{}' is not a URL", self.turso.url),
            });
        }
        if self.notes.provider == NoteProvider::Gemini && !self.notes.is_configured() {
            return Err(ConfigError::NotConfigured {
                section: "notes".into(),
            });
        }
        if self.general.default_limit == 0 {
            return Err(ConfigError::InvalidValue {
                field: "general.default_limit".into(),
                reason: "must be at least 1".into(),
            });
        }
        Ok(())
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("gate").join("config.toml"))
    }

    /// Load `.env` from the current directory, then from `CARGO_MANIFEST_DIR`
    /// ancestors. Silently does nothing if none is found.
    fn load_dotenv() {
        if dotenvy::dotenv().is_ok() {
            return;
        }
        if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
            let mut dir = PathBuf::from(manifest_dir);
            for _ in 0..3 {
                let env_path = dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                    return;
                }
                if !dir.pop() {
                    break;
                }
            }
        }
    }
}
