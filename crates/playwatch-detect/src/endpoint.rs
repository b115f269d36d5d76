use std::sync::LazyLock;
use std::time::Duration;

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::discovery::{DiscoveryError, KeyValueStore, PortResolver};
use crate::variant_db::VariantProfile;

/// Port sentinel requesting discovery from the variant's sources.
pub const AUTO_DETECT: &str = "auto-detect";

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);

static RE_PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([A-Za-z_]+)\}").unwrap());

#[derive(Debug, Error)]
pub enum EndpointError {
    #[error("unknown placeholder {{{0}}} in URL template")]
    UnknownPlaceholder(String),

    #[error(transparent)]
    Discovery(#[from] DiscoveryError),
}

/// Per-player connection settings, as read from the config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    pub ip: String,
    /// A port number, or [`AUTO_DETECT`].
    pub port: String,
    /// Seconds between ticks.
    pub poll_interval: f64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            ip: "localhost".into(),
            port: AUTO_DETECT.into(),
            poll_interval: 10.0,
        }
    }
}

/// Resolved connection parameters for one variant.
#[derive(Debug, Clone, PartialEq)]
pub struct EndpointConfig {
    pub host: String,
    pub port: String,
    pub poll_interval: Duration,
    /// The template with host and port substituted.
    pub url: String,
}

impl EndpointConfig {
    /// Build the endpoint, running discovery if the port is [`AUTO_DETECT`].
    ///
    /// A discovery failure here leaves the variant inert.
    pub fn resolve<S: KeyValueStore + ?Sized>(
        profile: &VariantProfile,
        config: &MonitorConfig,
        store: &S,
    ) -> Result<Self, EndpointError> {
        let port = if config.port == AUTO_DETECT {
            PortResolver::new(store).resolve(&profile.discovery)?
        } else {
            config.port.clone()
        };

        let url = render_url(&profile.url_template, &config.ip, &port)?;

        Ok(Self {
            host: config.ip.clone(),
            port,
            poll_interval: Duration::try_from_secs_f64(config.poll_interval)
                .unwrap_or(DEFAULT_POLL_INTERVAL),
            url,
        })
    }
}

/// Substitute `{ip}` and `{port}` into a URL template.
pub fn render_url(template: &str, ip: &str, port: &str) -> Result<String, EndpointError> {
    if let Some(unknown) = RE_PLACEHOLDER
        .captures_iter(template)
        .map(|c| c[1].to_string())
        .find(|name| name != "ip" && name != "port")
    {
        return Err(EndpointError::UnknownPlaceholder(unknown));
    }

    Ok(RE_PLACEHOLDER
        .replace_all(template, |caps: &Captures| match &caps[1] {
            "ip" => ip.to_string(),
            _ => port.to_string(),
        })
        .into_owned())
}
