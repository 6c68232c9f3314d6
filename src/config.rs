//! Merchant credentials and gateway endpoints
use std::collections::HashMap;
use std::path::Path;

use anyhow::Context;

use crate::constants::{INVOICE_URL, PURCHASE_URL};
use crate::policy::TransactionType;

pub const ENV_KEY: &str = "PLATON_KEY";
pub const ENV_PASSWORD: &str = "PLATON_PASSWORD";
pub const ENV_PURCHASE_URL: &str = "PLATON_PURCHASE_URL";
pub const ENV_INVOICE_URL: &str = "PLATON_INVOICE_URL";

#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    pub key: String,
    pub password: String,
    pub purchase_url: String,
    pub invoice_url: String,
}

impl Config {
    /// Credentials with the production endpoints.
    pub fn new(key: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            password: password.into(),
            purchase_url: PURCHASE_URL.to_string(),
            invoice_url: INVOICE_URL.to_string(),
        }
    }

    /// Read the configuration from the process environment, loading `.env` first if present.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Read the configuration from a dotenv file without touching the process environment.
    pub fn from_env_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let vars = dotenvy::from_path_iter(path)
            .with_context(|| format!("failed to open {}", path.display()))?
            .collect::<Result<HashMap<String, String>, _>>()
            .with_context(|| format!("failed to parse {}", path.display()))?;
        Self::from_vars(|name| vars.get(name).cloned())
    }

    fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let key = lookup(ENV_KEY).with_context(|| format!("{ENV_KEY} is not set"))?;
        let password = lookup(ENV_PASSWORD).with_context(|| format!("{ENV_PASSWORD} is not set"))?;

        let mut config = Self::new(key, password);
        if let Some(url) = lookup(ENV_PURCHASE_URL) {
            config.purchase_url = url;
        }
        if let Some(url) = lookup(ENV_INVOICE_URL) {
            config.invoice_url = url;
        }
        Ok(config)
    }

    pub fn url_for(&self, transaction_type: TransactionType) -> &str {
        if transaction_type.is_authorization() {
            &self.purchase_url
        } else {
            &self.invoice_url
        }
    }
}

// the password stays out of logs and panic messages
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("key", &self.key)
            .field("password", &"***")
            .field("purchase_url", &self.purchase_url)
            .field("invoice_url", &self.invoice_url)
            .finish()
    }
}
