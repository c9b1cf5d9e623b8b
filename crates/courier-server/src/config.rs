use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{Context, bail};

use courier_api::MessengerConfig;
use courier_core::RandomAcceptance;
use courier_greeting::gemini::DEFAULT_GEMINI_MODEL;

/// Server settings, read from the environment after `.env` is loaded.
#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub store_url: Option<String>,
    /// Serve a seeded in-process document instead of a spreadsheet.
    pub demo: bool,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub accept_probability: f64,
    pub messenger: MessengerConfig,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let host = var("COURIER_HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port: u16 = var("COURIER_PORT")
            .unwrap_or_else(|| "3000".into())
            .parse()
            .context("COURIER_PORT must be a port number")?;
        let addr: SocketAddr = format!("{}:{}", host, port)
            .parse()
            .with_context(|| format!("invalid listen address {host}:{port}"))?;

        let accept_probability = match var("COURIER_ACCEPT_PROBABILITY") {
            Some(raw) => raw
                .parse::<f64>()
                .context("COURIER_ACCEPT_PROBABILITY must be a number")?,
            None => RandomAcceptance::DEFAULT_PROBABILITY,
        };
        if !(0.0..=1.0).contains(&accept_probability) {
            bail!("COURIER_ACCEPT_PROBABILITY must lie between 0 and 1, got {accept_probability}");
        }

        let defaults = MessengerConfig::default();
        let messenger = MessengerConfig {
            resolution_delay: millis(&var, "COURIER_RESOLUTION_DELAY_MS")?
                .unwrap_or(defaults.resolution_delay),
            notification_ttl: millis(&var, "COURIER_NOTIFICATION_TTL_MS")?
                .unwrap_or(defaults.notification_ttl),
            support_phone: var("COURIER_SUPPORT_PHONE").unwrap_or(defaults.support_phone),
            support_reply_delay: defaults.support_reply_delay,
        };

        let store_url = var("COURIER_STORE_URL");
        let demo = match var("COURIER_DEMO") {
            Some(raw) => flag(&raw).context("COURIER_DEMO must be true or false")?,
            None => store_url.is_none(),
        };

        Ok(Self {
            addr,
            store_url,
            demo,
            gemini_api_key: var("GEMINI_API_KEY"),
            gemini_model: var("COURIER_GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.into()),
            accept_probability,
            messenger,
        })
    }
}

fn flag(raw: &str) -> anyhow::Result<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => bail!("unrecognized flag value {other:?}"),
    }
}

fn millis(var: &impl Fn(&str) -> Option<String>, key: &str) -> anyhow::Result<Option<Duration>> {
    var(key)
        .map(|raw| {
            raw.parse::<u64>()
                .map(Duration::from_millis)
                .with_context(|| format!("{key} must be a whole number of milliseconds"))
        })
        .transpose()
}
