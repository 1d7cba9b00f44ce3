//! Literal records behind every section view.

use super::{
    ChecklistItem, DeploymentStep, Fact, PipelineRun, ScraperRecord, ScraperStatus, StatCard,
    StepStatus, Transaction, TransactionStatus, WebhookHealth, WeeklyMetric,
};

pub static SCRAPERS: [ScraperRecord; 5] = [
    ScraperRecord {
        id: "tudoazul",
        name: "TudoAzul Scraper",
        last_run: "10 min ago",
        status: ScraperStatus::Success,
        items: 142,
    },
    ScraperRecord {
        id: "latam",
        name: "LATAM Pass Scraper",
        last_run: "1 hour ago",
        status: ScraperStatus::Success,
        items: 89,
    },
    ScraperRecord {
        id: "smiles",
        name: "Smiles GOL Scraper",
        last_run: "4 hours ago",
        status: ScraperStatus::Failed,
        items: 0,
    },
    ScraperRecord {
        id: "inter",
        name: "Inter Loop Scraper",
        last_run: "Yesterday",
        status: ScraperStatus::Success,
        items: 12,
    },
    ScraperRecord {
        id: "livelo",
        name: "Livelo Scraper",
        last_run: "Yesterday",
        status: ScraperStatus::Success,
        items: 56,
    },
];

pub static TRANSACTIONS: [Transaction; 4] = [
    Transaction {
        user: "João Silva",
        plan: "Anual Premium",
        amount: "R$ 199,00",
        status: TransactionStatus::Paid,
        date: "10 min ago",
    },
    Transaction {
        user: "Maria Souza",
        plan: "Mensal",
        amount: "R$ 29,90",
        status: TransactionStatus::Pending,
        date: "1 hour ago",
    },
    Transaction {
        user: "Pedro Alvares",
        plan: "Anual Premium",
        amount: "R$ 199,00",
        status: TransactionStatus::Refunded,
        date: "Yesterday",
    },
    Transaction {
        user: "Ana Paula",
        plan: "Mensal",
        amount: "R$ 29,90",
        status: TransactionStatus::Paid,
        date: "Feb 15, 2024",
    },
];

pub static DEPLOYMENT_STEPS: [DeploymentStep; 6] = [
    DeploymentStep {
        title: "Update Bundle IDs",
        description: "Sync IDs in capacitor.config.ts and native projects.",
        status: StepStatus::Completed,
    },
    DeploymentStep {
        title: "Prepare Release Assets",
        description: "Generate high-res icons and splash screens.",
        status: StepStatus::Completed,
    },
    DeploymentStep {
        title: "Configure App Check",
        description: "Secure backend with Firebase App Check tokens.",
        status: StepStatus::Pending,
    },
    DeploymentStep {
        title: "Signing: Android Keystore",
        description: "Generate release.keystore and set gradle properties.",
        status: StepStatus::Pending,
    },
    DeploymentStep {
        title: "Signing: iOS Certificate",
        description: "Create distribution cert in Apple Dev Portal.",
        status: StepStatus::Pending,
    },
    DeploymentStep {
        title: "First Store Upload",
        description: "Manually upload AAB/IPA to consoles for review.",
        status: StepStatus::Blocked,
    },
];

pub static WEEKLY_METRICS: [WeeklyMetric; 7] = [
    WeeklyMetric {
        day: "Mon",
        active: 400,
        errors: 24,
        revenue: 2400,
    },
    WeeklyMetric {
        day: "Tue",
        active: 300,
        errors: 13,
        revenue: 2210,
    },
    WeeklyMetric {
        day: "Wed",
        active: 200,
        errors: 98,
        revenue: 2290,
    },
    WeeklyMetric {
        day: "Thu",
        active: 278,
        errors: 39,
        revenue: 2000,
    },
    WeeklyMetric {
        day: "Fri",
        active: 189,
        errors: 48,
        revenue: 2181,
    },
    WeeklyMetric {
        day: "Sat",
        active: 239,
        errors: 38,
        revenue: 2500,
    },
    WeeklyMetric {
        day: "Sun",
        active: 349,
        errors: 43,
        revenue: 2100,
    },
];

pub static STAT_CARDS: [StatCard; 4] = [
    StatCard {
        title: "Total Users",
        value: "2,842",
        change: "12.5%",
        positive: true,
    },
    StatCard {
        title: "Active Subs",
        value: "1,120",
        change: "8.2%",
        positive: true,
    },
    StatCard {
        title: "API Health",
        value: "99.9%",
        change: "0.1%",
        positive: true,
    },
    StatCard {
        title: "Total Errors",
        value: "154",
        change: "23%",
        positive: false,
    },
];

pub static PIPELINE_ACTIVITY: [PipelineRun; 4] = [
    PipelineRun {
        service: "TudoAzul Scraper",
        kind: "Cron Job",
        succeeded: true,
        duration: "24s",
        when: "2 mins ago",
    },
    PipelineRun {
        service: "LATAM Pipeline",
        kind: "Manual Trigger",
        succeeded: true,
        duration: "1.2m",
        when: "15 mins ago",
    },
    PipelineRun {
        service: "Smiles Engine",
        kind: "Cron Job",
        succeeded: false,
        duration: "0s",
        when: "1 hour ago",
    },
    PipelineRun {
        service: "Asaas Webhook",
        kind: "Incoming",
        succeeded: true,
        duration: "120ms",
        when: "3 hours ago",
    },
];

pub static WEBHOOKS: [WebhookHealth; 3] = [
    WebhookHealth {
        event: "PAYMENT_RECEIVED",
        status: "200 OK",
        healthy: true,
    },
    WebhookHealth {
        event: "PAYMENT_OVERDUE",
        status: "200 OK",
        healthy: true,
    },
    WebhookHealth {
        event: "SUBSCRIPTION_DELETED",
        status: "500 ERR",
        healthy: false,
    },
];

pub static INTEGRATION_TASKS: [ChecklistItem; 4] = [
    ChecklistItem {
        label: "API client initialized",
        done: true,
    },
    ChecklistItem {
        label: "Customer bridge",
        done: true,
    },
    ChecklistItem {
        label: "Link billing status to paywall",
        done: false,
    },
    ChecklistItem {
        label: "Automate premium role updates",
        done: false,
    },
];

/// Comment/command pairs of the native build card.
pub static BUILD_COMMANDS: [(&str, &str); 3] = [
    ("# Prepare Web", "pnpm -C apps/web build"),
    ("# Sync to Native", "npx cap sync android"),
    ("# Open Native IDE", "npx cap open android"),
];

pub static INFRASTRUCTURE: [Fact; 4] = [
    Fact {
        label: "OS",
        value: "Ubuntu 22.04 LTS",
    },
    Fact {
        label: "Node",
        value: "v22.4.0 (LTS)",
    },
    Fact {
        label: "DB",
        value: "Postgres 16",
    },
    Fact {
        label: "Engine",
        value: "Coolify / Docker",
    },
];

pub static AUDIT_CRITICAL_FIXES: [&str; 2] = [
    "Rotate ASAAS Secret Keys immediately after local dev usage.",
    "Set CORS policies to only allow the PWA/Mobile origin.",
];

pub static OBSERVABILITY: [Fact; 3] = [
    Fact {
        label: "Log Retention",
        value: "7 Days",
    },
    Fact {
        label: "Monitoring",
        value: "UptimeRobot",
    },
    Fact {
        label: "Error Tracking",
        value: "Sentry (Ready)",
    },
];
