//! # Dashboard Data
//!
//! Static view-model records shown by the section views.
//!
//! ## Overview
//!
//! Every record here is a `'static` literal. Nothing is fetched, persisted or
//! mutated: the dashboard presents a mocked picture of the operations stack
//! (scrapers, billing, mobile release pipeline). Lists are exposed as slices
//! so views render them in their literal order.
//!
//! The only mutable view-model, [`RuntimeConfig`], lives in the settings view
//! as local form state and is never submitted anywhere.

mod catalog;

pub use catalog::{
    AUDIT_CRITICAL_FIXES, BUILD_COMMANDS, DEPLOYMENT_STEPS, INFRASTRUCTURE, INTEGRATION_TASKS,
    OBSERVABILITY, PIPELINE_ACTIVITY, SCRAPERS, STAT_CARDS, TRANSACTIONS, WEBHOOKS, WEEKLY_METRICS,
};

use std::fmt;

/// Outcome of the last scraper run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScraperStatus {
    Success,
    Failed,
}

impl fmt::Display for ScraperStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => write!(f, "Success"),
            Self::Failed => write!(f, "Failed"),
        }
    }
}

/// A scraper job and its last run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScraperRecord {
    pub id: &'static str,
    pub name: &'static str,
    /// Display string, e.g. "10 min ago".
    pub last_run: &'static str,
    pub status: ScraperStatus,
    /// Items parsed to Postgres on the last run.
    pub items: u32,
}

/// Normalized billing status of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionStatus {
    Paid,
    Pending,
    Refunded,
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Paid => write!(f, "Paid"),
            Self::Pending => write!(f, "Pending"),
            Self::Refunded => write!(f, "Refunded"),
        }
    }
}

/// A billing transaction from the payment provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transaction {
    pub user: &'static str,
    pub plan: &'static str,
    pub amount: &'static str,
    pub status: TransactionStatus,
    pub date: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    Completed,
    Pending,
    Blocked,
}

/// One item of the mobile launch checklist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeploymentStep {
    pub title: &'static str,
    pub description: &'static str,
    pub status: StepStatus,
}

/// Daily activity used by the dashboard charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeeklyMetric {
    pub day: &'static str,
    pub active: u64,
    pub errors: u64,
    pub revenue: u64,
}

/// Headline number with its change against the previous period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatCard {
    pub title: &'static str,
    pub value: &'static str,
    pub change: &'static str,
    pub positive: bool,
}

/// A row of the "recent pipeline activity" table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineRun {
    pub service: &'static str,
    pub kind: &'static str,
    pub succeeded: bool,
    pub duration: &'static str,
    pub when: &'static str,
}

/// Delivery state of one payment webhook event type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WebhookHealth {
    pub event: &'static str,
    pub status: &'static str,
    pub healthy: bool,
}

/// Checklist entry: a label and whether it is done.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChecklistItem {
    pub label: &'static str,
    pub done: bool,
}

/// A label/value pair shown in fact grids.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fact {
    pub label: &'static str,
    pub value: &'static str,
}

/// Deployment environment targeted by the runtime config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Production,
    Staging,
    Development,
}

impl Environment {
    pub const ALL: [Environment; 3] = [Self::Production, Self::Staging, Self::Development];

    pub fn label(self) -> &'static str {
        match self {
            Self::Production => "Production",
            Self::Staging => "Staging",
            Self::Development => "Development",
        }
    }

    /// The next option in select order, wrapping around.
    pub fn next(self) -> Self {
        match self {
            Self::Production => Self::Staging,
            Self::Staging => Self::Development,
            Self::Development => Self::Production,
        }
    }
}

/// Runtime configuration edited by the settings form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    pub api_base_url: String,
    pub firebase_api_key: String,
    pub environment: Environment,
    pub allow_public_signups: bool,
    pub maintenance_mode: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://api.seliganoponto.com".to_string(),
            firebase_api_key: "AIzaSyC...".to_string(),
            environment: Environment::Production,
            allow_public_signups: true,
            maintenance_mode: false,
        }
    }
}

/// A single-field edit of [`RuntimeConfig`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigUpdate {
    ApiBaseUrl(String),
    Environment(Environment),
    AllowPublicSignups(bool),
    MaintenanceMode(bool),
}

impl RuntimeConfig {
    /// Apply one edit. Only the named field changes.
    pub fn apply(&mut self, update: ConfigUpdate) {
        match update {
            ConfigUpdate::ApiBaseUrl(url) => self.api_base_url = url,
            ConfigUpdate::Environment(env) => self.environment = env,
            ConfigUpdate::AllowPublicSignups(on) => self.allow_public_signups = on,
            ConfigUpdate::MaintenanceMode(on) => self.maintenance_mode = on,
        }
    }
}
