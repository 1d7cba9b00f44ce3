//! # Security Audit Report
//!
//! The audit section asks a text-generation model for a hardening report on
//! the product's stack. This module owns that single outbound call.
//!
//! ## Design
//!
//! The model is reached through the [`ReportGenerator`] trait, so tests and
//! unconfigured installs can swap the capability out. [`produce_report`]
//! never fails: an empty answer becomes [`EMPTY_REPORT`] and any error
//! becomes [`FALLBACK_REPORT`], logged at `warn`.
//!
//! Requests run on a tokio task started by [`spawn_audit`]; the result comes
//! back to the UI loop as an [`AuditOutcome`] over an unbounded channel,
//! tagged with the ticket of the view instance that asked.

pub mod gemini;

use std::sync::Arc;

use async_trait::async_trait;
use tokio::{sync::mpsc::UnboundedSender, task::JoinHandle};

pub use gemini::GeminiClient;

/// Environment variable holding the model API key.
pub const API_KEY_VAR: &str = "API_KEY";

/// Model asked for the report.
pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";

/// Report shown when the request fails for any reason.
pub const FALLBACK_REPORT: &str = "Security audit simulation complete. (Note: Ensure API_KEY is valid for real analysis). \n\n### Hardening Recommendations:\n1. Implement rate limiting on API endpoints.\n2. Enable Firebase App Check for mobile.\n3. Secure scraper endpoints with HMAC signatures.\n4. Sanitize all Postgres inputs using parameterized queries.\n5. Audit PWA manifest and service workers for store compliance.";

/// Report shown when the model answers with no text.
pub const EMPTY_REPORT: &str = "Failed to generate report.";

/// Prompt describing the audited stack.
pub const AUDIT_PROMPT: &str = "Audit the following SaaS stack:
Monorepo (pnpm), React/Vite/PWA frontend, Node/Express/Postgres backend, Firebase Auth, Python Scrapers.
Integration: Asaas (payments), Capacitor (mobile).
Target: Launching in stores soon.
Identify top 5 security risks, technical debts, and a hardening checklist. Respond with clear, professional markdown.";

#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    /// The API key environment variable is not set.
    #[error("missing API key: env var {var} not set")]
    MissingApiKey { var: String },

    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),

    /// The HTTP request could not be sent or its body not read.
    #[error("API request failed: {0}")]
    Request(String),

    /// The API answered with a non-success status.
    #[error("API response error: status {status}")]
    Response { status: u16, body: String },

    #[error("API response parse failed: {0}")]
    Parse(String),
}

/// Something that turns a prompt into report text.
#[async_trait]
pub trait ReportGenerator: Send + Sync {
    async fn generate_report(&self, prompt: &str) -> Result<String, AuditError>;
}

/// Connection settings for the report model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
}

impl AuditConfig {
    /// Read the key from [`API_KEY_VAR`].
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::MissingApiKey`] when the variable is unset or blank.
    pub fn from_env() -> Result<Self, AuditError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Like [`AuditConfig::from_env`] with a custom variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AuditError> {
        let api_key = lookup(API_KEY_VAR)
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .ok_or_else(|| AuditError::MissingApiKey {
                var: API_KEY_VAR.to_string(),
            })?;
        Ok(Self {
            api_key,
            model: DEFAULT_MODEL.to_string(),
            base_url: gemini::DEFAULT_BASE_URL.to_string(),
        })
    }
}

/// Generator used when no API key is configured. Always fails.
#[derive(Debug, Clone, Default)]
pub struct UnconfiguredGenerator;

#[async_trait]
impl ReportGenerator for UnconfiguredGenerator {
    async fn generate_report(&self, _prompt: &str) -> Result<String, AuditError> {
        Err(AuditError::MissingApiKey {
            var: API_KEY_VAR.to_string(),
        })
    }
}

/// Build the generator for this process: the Gemini client when a key is
/// configured, otherwise [`UnconfiguredGenerator`].
pub fn generator_from_env() -> Arc<dyn ReportGenerator> {
    let client = AuditConfig::from_env().and_then(GeminiClient::new);
    match client {
        Ok(client) => {
            tracing::info!(model = client.model(), "audit generator configured");
            Arc::new(client)
        }
        Err(e) => {
            tracing::info!(
                error = %e,
                "audit generator unavailable, reports will use the fallback"
            );
            Arc::new(UnconfiguredGenerator)
        }
    }
}

/// Ask `generator` for the audit report. Never fails.
pub async fn produce_report(generator: &dyn ReportGenerator) -> String {
    match generator.generate_report(AUDIT_PROMPT).await {
        Ok(text) if text.is_empty() => EMPTY_REPORT.to_string(),
        Ok(text) => text,
        Err(e) => {
            tracing::warn!(error = %e, "audit request failed, using fallback report");
            FALLBACK_REPORT.to_string()
        }
    }
}

/// A finished audit request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditOutcome {
    /// Ticket handed out by the audit view when the request started.
    pub ticket: u64,
    pub report: String,
}

/// Run one audit request in the background and send the outcome to `tx`.
pub fn spawn_audit(
    generator: Arc<dyn ReportGenerator>,
    ticket: u64,
    tx: UnboundedSender<AuditOutcome>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let report = produce_report(generator.as_ref()).await;
        // the receiver is gone only when the app is shutting down
        if tx.send(AuditOutcome { ticket, report }).is_err() {
            tracing::debug!(ticket, "audit outcome dropped, UI loop closed");
        }
    })
}
