use gate_config::{GateConfig, NoteProvider};

/// Emit warnings for likely mistyped env var keys that silently fell back to defaults.
pub fn warn_unconfigured(config: &GateConfig) {
    for warning in collect_unconfigured_warnings(config, std::env::vars()) {
        tracing::warn!("{warning}");
    }
}

fn collect_unconfigured_warnings<I>(config: &GateConfig, env: I) -> Vec<String>
where
    I: IntoIterator<Item = (String, String)>,
{
    let env_keys = env.into_iter().map(|(key, _)| key).collect::<Vec<_>>();

    let mut warnings = Vec::new();

    if !config.turso.is_configured()
        && !config.turso.has_local_database()
        && has_env_prefix(&env_keys, "GATE_TURSO")
    {
        warnings.push(
            "Turso config appears default while GATE_TURSO* env vars exist. Use double underscores (example: GATE_TURSO__URL)."
                .to_string(),
        );
    }

    if config.notes.provider == NoteProvider::Static
        && config.notes.api_key.is_empty()
        && has_env_prefix(&env_keys, "GATE_NOTES")
        && !has_env_prefix(&env_keys, "GATE_NOTES__")
    {
        warnings.push(
            "Notes config appears default while GATE_NOTES* env vars exist. Use double underscores (example: GATE_NOTES__API_KEY)."
                .to_string(),
        );
    }

    if config.turso.is_configured() && config.turso.has_local_database() {
        warnings.push(
            "Both turso.url and turso.database_file are set; the remote database is used and the local file is ignored."
                .to_string(),
        );
    }

    warnings
}

fn has_env_prefix(keys: &[String], prefix: &str) -> bool {
    keys.iter().any(|key| key.starts_with(prefix))
}
