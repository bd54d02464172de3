//! Notes attached to check-in records.
//!
//! [`NoteEnricher::annotate`] never fails: a broken enrichment service must
//! not stop a guard from logging an entry, so errors degrade to a fixed
//! offline note.

use std::future::Future;
use std::time::Duration;

use chrono::{DateTime, Utc};
use gate_config::{NoteProvider, NotesConfig};
use gate_core::enums::Outcome;
use gate_core::pass::PassPayload;
use serde::{Deserialize, Serialize};

use crate::error::NoteError;

/// Note used when the enrichment service cannot be reached.
pub const OFFLINE_NOTE: &str = "Manual Override: System offline, entry logged locally.";

/// Note used when the service answers with no text.
pub const DEFAULT_NOTE: &str = "Log entry generated successfully.";

/// Produces the free-text note stored with a check-in record.
pub trait NoteEnricher: Send + Sync {
    fn annotate(
        &self,
        payload: &PassPayload,
        outcome: Outcome,
        at: DateTime<Utc>,
    ) -> impl Future<Output = String> + Send;
}

/// Attaches the same text to every record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticNote(pub String);

impl Default for StaticNote {
    fn default() -> Self {
        Self(DEFAULT_NOTE.to_string())
    }
}

impl NoteEnricher for StaticNote {
    async fn annotate(&self, _payload: &PassPayload, _outcome: Outcome, _at: DateTime<Utc>) -> String {
        self.0.clone()
    }
}

/// Mask the middle of an id number, keeping a third on each side.
///
/// `901020105555` becomes `9010****5555`.
pub fn mask_id_number(id: &str) -> String {
    let chars: Vec<char> = id.chars().collect();
    let keep = chars.len() / 3;
    chars
        .iter()
        .enumerate()
        .map(|(i, c)| {
            if i < keep || i >= chars.len() - keep {
                *c
            } else {
                '*'
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Gemini
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Serialize, Deserialize, Default)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Content,
}

/// Asks the Gemini API for a short audit line.
pub struct GeminiNote {
    http: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: String,
}

impl GeminiNote {
    /// Build a client from the `notes` config section.
    ///
    /// # Errors
    ///
    /// Returns `NoteError::Http` if the HTTP client cannot be built.
    pub fn from_config(config: &NotesConfig) -> Result<Self, NoteError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("gate/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: config.api_key.clone(),
        })
    }

    fn url(&self) -> String {
        format!("{}/models/{}:generateContent", self.endpoint, self.model)
    }

    async fn request_note(&self, prompt: String) -> Result<String, NoteError> {
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };
        let resp = self
            .http
            .post(self.url())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;
        note_from_response(check_response(resp).await?).await
    }
}

impl NoteEnricher for GeminiNote {
    async fn annotate(&self, payload: &PassPayload, outcome: Outcome, at: DateTime<Utc>) -> String {
        match self.request_note(build_prompt(payload, outcome, at)).await {
            Ok(note) => note,
            Err(e) => {
                tracing::warn!(model = %self.model, "note enrichment failed: {e}");
                OFFLINE_NOTE.to_string()
            }
        }
    }
}

/// The prompt sent to the model. The id number is masked here and never
/// leaves the process in full.
pub fn build_prompt(payload: &PassPayload, outcome: Outcome, at: DateTime<Utc>) -> String {
    format!(
        "Create a formal, brief security log entry for a condominium visitor check-in.\n\
         \n\
         Visitor Details:\n\
         - Name: {name}\n\
         - IC: {id}\n\
         - Car Plate: {plate}\n\
         - Destination: Block {block}, Lot {lot}, Unit {unit}\n\
         - Check-in Status: {outcome}\n\
         - Time: {time}\n\
         \n\
         The log should be professional and suitable for a property management audit trail. \
         State that standard procedure was followed. Keep it under 50 words.",
        name = payload.visitor_full_name(),
        id = mask_id_number(payload.id_number()),
        plate = payload.vehicle_plate(),
        block = payload.block_code(),
        lot = payload.lot_code(),
        unit = payload.unit_code(),
        time = at.format("%Y-%m-%d %H:%M:%S UTC"),
    )
}

async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, NoteError> {
    if !resp.status().is_success() {
        return Err(NoteError::Api {
            status: resp.status().as_u16(),
            message: resp.text().await.unwrap_or_default(),
        });
    }
    Ok(resp)
}

async fn note_from_response(resp: reqwest::Response) -> Result<String, NoteError> {
    let data: GenerateResponse = resp.json().await?;
    let text: String = data
        .candidates
        .into_iter()
        .next()
        .map(|c| {
            c.content
                .parts
                .into_iter()
                .map(|p| p.text)
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default();
    let text = text.trim();
    Ok(if text.is_empty() {
        DEFAULT_NOTE.to_string()
    } else {
        text.to_string()
    })
}

// ---------------------------------------------------------------------------
// Resolved enricher
// ---------------------------------------------------------------------------

/// The enricher chosen from configuration at startup.
pub enum Notes {
    Static(StaticNote),
    Gemini(GeminiNote),
}

impl Notes {
    /// Pick an enricher for `config`. A Gemini client that cannot be built
    /// degrades to static notes with a warning.
    pub fn from_config(config: &NotesConfig) -> Self {
        if config.provider == NoteProvider::Gemini && config.is_configured() {
            match GeminiNote::from_config(config) {
                Ok(gemini) => return Self::Gemini(gemini),
                Err(e) => tracing::warn!("falling back to static notes: {e}"),
            }
        } else if config.provider == NoteProvider::Gemini {
            tracing::warn!("notes.provider is gemini but notes.api_key is empty; using static notes");
        }
        Self::Static(StaticNote(config.static_text.clone()))
    }

    #[must_use]
    pub const fn provider(&self) -> NoteProvider {
        match self {
            Self::Static(_) => NoteProvider::Static,
            Self::Gemini(_) => NoteProvider::Gemini,
        }
    }
}

impl NoteEnricher for Notes {
    async fn annotate(&self, payload: &PassPayload, outcome: Outcome, at: DateTime<Utc>) -> String {
        match self {
            Self::Static(n) => n.annotate(payload, outcome, at).await,
            Self::Gemini(n) => n.annotate(payload, outcome, at).await,
        }
    }
}
