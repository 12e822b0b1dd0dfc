//! Server configuration.

use std::{env, path::PathBuf};

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Ledger CSV file.
    pub ledger_path: PathBuf,
    /// Registration log CSV file.
    pub registrations_path: PathBuf,
    /// Public URL of the page, embedded in QR codes as `<public_url>?id=<id>`.
    pub public_url: String,
    /// Emails allowed into the admin panel, compared exactly.
    pub admin_emails: Vec<String>,
    /// Welcome banner image shown at the top of the page.
    pub banner_path: PathBuf,
    /// Page title.
    pub site_title: String,
    /// Log level.
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8501,
            ledger_path: PathBuf::from("users.csv"),
            registrations_path: PathBuf::from("registrations.csv"),
            public_url: "http://localhost:8501/".to_string(),
            admin_emails: Vec::new(),
            banner_path: PathBuf::from("welcome.png"),
            site_title: "Rewards Program".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Loads configuration from an arbitrary variable source.
    pub fn from_lookup(var: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let defaults = Self::default();

        let port = match var("POINTS_SERVER_PORT") {
            Some(raw) => raw
                .parse()
                .map_err(|e| anyhow::anyhow!("Invalid POINTS_SERVER_PORT {raw:?}: {e}"))?,
            None => defaults.port,
        };

        let admin_emails = var("POINTS_ADMIN_EMAILS")
            .map(|raw| parse_email_list(&raw))
            .unwrap_or_default();

        Ok(Self {
            host: var("POINTS_SERVER_HOST").unwrap_or(defaults.host),
            port,
            ledger_path: var("POINTS_LEDGER_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.ledger_path),
            registrations_path: var("POINTS_REGISTRATIONS_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.registrations_path),
            public_url: var("POINTS_PUBLIC_URL")
                .unwrap_or_else(|| format!("http://localhost:{port}/")),
            admin_emails,
            banner_path: var("POINTS_BANNER_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.banner_path),
            site_title: var("POINTS_SITE_TITLE").unwrap_or(defaults.site_title),
            log_level: var("POINTS_LOG_LEVEL").unwrap_or(defaults.log_level),
        })
    }

    /// Returns the server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Returns true if `email` is on the admin allow-list.
    ///
    /// The empty string never passes, even if configured.
    pub fn is_admin(&self, email: &str) -> bool {
        !email.is_empty() && self.admin_emails.iter().any(|admin| admin == email)
    }

    /// Returns the URL a QR code for `id` points to.
    pub fn lookup_url(&self, id: u64) -> String {
        format!("{}?id={}", self.public_url, id)
    }
}

/// Splits a comma-separated allow-list, dropping blanks.
fn parse_email_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|email| !email.is_empty())
        .map(str::to_string)
        .collect()
}
