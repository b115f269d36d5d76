use std::time::Duration;

use reqwest::Client;
use thiserror::Error;
use tracing::{debug, warn};

use crate::discovery::KeyValueStore;
use crate::endpoint::{EndpointConfig, EndpointError, MonitorConfig};
use crate::status::StatusRecord;
use crate::variant_db::VariantProfile;
use crate::webui::{self, MalformedResponse, RawVariableSet};

#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("{name} is not available on this platform")]
    Unavailable { name: String },

    #[error(transparent)]
    Endpoint(#[from] EndpointError),

    #[error("fetch failed: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error(transparent)]
    Malformed(#[from] MalformedResponse),
}

/// Polls one player's web interface.
///
/// The harness calls [`update_status`](Self::update_status) every
/// [`poll_interval`](Self::poll_interval) and then reads
/// [`status`](Self::status). Ticks cannot overlap: a tick needs `&mut self`.
#[derive(Debug)]
pub struct WebInterfaceMonitor {
    profile: VariantProfile,
    endpoint: EndpointConfig,
    http: Client,
    status: StatusRecord,
}

impl WebInterfaceMonitor {
    /// Check availability, resolve the endpoint and build the HTTP client.
    ///
    /// Any error here means the variant should be left out of the active set.
    pub fn connect<S: KeyValueStore + ?Sized>(
        profile: VariantProfile,
        config: &MonitorConfig,
        store: &S,
        timeout: Duration,
    ) -> Result<Self, MonitorError> {
        if !profile.is_available() {
            return Err(MonitorError::Unavailable { name: profile.name });
        }
        let endpoint = EndpointConfig::resolve(&profile, config, store)?;
        Self::new(profile, endpoint, timeout)
    }

    /// Build a monitor for an already resolved endpoint.
    pub fn new(
        profile: VariantProfile,
        endpoint: EndpointConfig,
        timeout: Duration,
    ) -> Result<Self, MonitorError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            profile,
            endpoint,
            http,
            status: StatusRecord::Empty,
        })
    }

    pub fn name(&self) -> &str {
        &self.profile.name
    }

    pub fn endpoint(&self) -> &EndpointConfig {
        &self.endpoint
    }

    pub fn poll_interval(&self) -> Duration {
        self.endpoint.poll_interval
    }

    /// Status from the last tick.
    pub fn status(&self) -> &StatusRecord {
        &self.status
    }

    /// One fetch, decode, extract, normalize pass. Does not touch `status`.
    pub async fn poll(&self) -> Result<StatusRecord, MonitorError> {
        let raw = webui::fetch_raw(&self.http, &self.endpoint.url).await?;
        let text = webui::decode(&raw);
        let vars = RawVariableSet::extract(&text);
        debug!(player = %self.profile.name, variables = vars.len(), "Fetched variables");
        Ok(webui::normalize(&vars, &self.profile.quirks)?)
    }

    /// Run one tick and refresh [`status`](Self::status).
    ///
    /// A fetch failure leaves the previous status in place. A malformed
    /// response resets it to [`StatusRecord::Empty`]. Both are returned so the
    /// harness can log them; neither is fatal.
    pub async fn update_status(&mut self) -> Result<(), MonitorError> {
        match self.poll().await {
            Ok(status) => {
                self.status = status;
                Ok(())
            }
            Err(MonitorError::Malformed(e)) => {
                warn!(player = %self.profile.name, error = %e, "Ignoring malformed response");
                self.status = StatusRecord::Empty;
                Err(MonitorError::Malformed(e))
            }
            Err(e) => {
                debug!(player = %self.profile.name, error = %e, "Tick failed");
                Err(e)
            }
        }
    }
}
