use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;

use crate::payment::DEFAULT_TOLERANCE_SECS;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub log_dir: String,
    pub log_file: String,
    pub use_json: bool,
    pub rotation: String,
    pub gateway: GatewayConfig,
    /// PostgreSQL connection URL; overridden by `DATABASE_URL`
    #[serde(default)]
    pub postgres_url: Option<String>,
    #[serde(default = "default_max_connections")]
    pub postgres_max_connections: u32,
    #[serde(default)]
    pub orders: OrdersConfig,
    #[serde(default)]
    pub payment: PaymentConfig,
    #[serde(default)]
    pub booking: BookingConfig,
}

fn default_max_connections() -> u32 {
    10
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GatewayConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct OrdersConfig {
    /// Write the order and its ledger rows in one transaction
    #[serde(default)]
    pub transactional_ledger: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PaymentConfig {
    /// Webhook signing secret; overridden by `PAYMENT_WEBHOOK_SECRET`
    #[serde(default)]
    pub webhook_secret: Option<String>,
    #[serde(default = "default_tolerance")]
    pub tolerance_secs: i64,
}

fn default_tolerance() -> i64 {
    DEFAULT_TOLERANCE_SECS
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            webhook_secret: None,
            tolerance_secs: DEFAULT_TOLERANCE_SECS,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct BookingConfig {
    /// External scheduler base URL; overridden by `CALENDAR_URL`
    #[serde(default)]
    pub calendar_url: String,
    /// Hosted checkout page linked after the order is created
    #[serde(default)]
    pub checkout_url: Option<String>,
}

impl AppConfig {
    pub fn load(env: &str) -> anyhow::Result<Self> {
        let config_path = format!("config/{}.yaml", env);
        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path))?;
        let mut config = Self::from_yaml(&content)
            .with_context(|| format!("Failed to parse config yaml: {}", config_path))?;
        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(content)
    }

    /// Apply `DATABASE_URL`, `PAYMENT_WEBHOOK_SECRET` and `CALENDAR_URL`.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let lookup = |key: &str| lookup(key).filter(|v| !v.is_empty());
        if let Some(url) = lookup("DATABASE_URL") {
            self.postgres_url = Some(url);
        }
        if let Some(secret) = lookup("PAYMENT_WEBHOOK_SECRET") {
            self.payment.webhook_secret = Some(secret);
        }
        if let Some(url) = lookup("CALENDAR_URL") {
            self.booking.calendar_url = url;
        }
    }
}
