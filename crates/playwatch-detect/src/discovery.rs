//! Port discovery from ordered key-value sources.
//!
//! MPC-HC and MPC-BE record the web interface port in the Windows registry,
//! and different releases use different subkeys. [`PortResolver`] walks the
//! sources in order and stops at the first one that exists.

use std::collections::HashMap;

use thiserror::Error;
use tracing::debug;

use crate::variant_db::DiscoverySource;

#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// None of the configured sources exist.
    #[error("port not found in any of: {}", .locations.join(","))]
    NotFound { locations: Vec<String> },

    /// The store cannot be queried on this platform.
    #[error("port discovery is not supported on this platform")]
    Unsupported,
}

/// A registry-like store queried by `(location, key)`.
pub trait KeyValueStore {
    /// Whether this store exists on the current platform. Checked before any
    /// resolution is attempted.
    fn is_supported(&self) -> bool;

    /// Read `key` under `location`. `None` if either is absent.
    fn read(&self, location: &str, key: &str) -> Option<String>;
}

/// In-memory store, for tests and for injecting known ports.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<(String, String), String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, location: &str, key: &str, value: &str) -> Self {
        self.insert(location, key, value);
        self
    }

    pub fn insert(&mut self, location: &str, key: &str, value: &str) {
        self.entries
            .insert((location.to_string(), key.to_string()), value.to_string());
    }
}

impl KeyValueStore for MemoryStore {
    fn is_supported(&self) -> bool {
        true
    }

    fn read(&self, location: &str, key: &str) -> Option<String> {
        self.entries
            .get(&(location.to_string(), key.to_string()))
            .cloned()
    }
}

/// Resolves a port from an ordered list of sources.
pub struct PortResolver<'a, S: KeyValueStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: KeyValueStore + ?Sized> PortResolver<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Return the value of the first source present in the store.
    ///
    /// Later sources are not consulted once one is found. Fails with
    /// [`DiscoveryError::NotFound`] listing every attempted location.
    pub fn resolve(&self, sources: &[DiscoverySource]) -> Result<String, DiscoveryError> {
        if !self.store.is_supported() {
            return Err(DiscoveryError::Unsupported);
        }

        let mut attempted = Vec::with_capacity(sources.len());
        for source in sources {
            if let Some(value) = self.store.read(&source.location, &source.key) {
                debug!(location = %source.location, key = %source.key, %value, "Discovered port");
                return Ok(value);
            }
            debug!(location = %source.location, key = %source.key, "Discovery source absent");
            attempted.push(source.location.clone());
        }

        Err(DiscoveryError::NotFound {
            locations: attempted,
        })
    }
}
