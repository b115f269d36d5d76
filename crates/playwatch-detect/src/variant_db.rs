use serde::{Deserialize, Serialize};

/// Embedded variant database.
const EMBEDDED_DB: &str = include_str!("../data/variants.toml");

/// One place a port number may be read from (registry subkey + value name).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoverySource {
    pub location: String,
    pub key: String,
}

/// Player-specific heuristics applied while normalizing a response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quirks {
    /// The player pauses on the last frame instead of stopping. When the
    /// formatted position equals the formatted duration the state is forced
    /// to stopped.
    #[serde(default)]
    pub stop_at_end: bool,
}

/// A player flavor speaking the `variables.html` protocol.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariantProfile {
    /// Name used in config sections and logs (e.g., "mpc-hc").
    pub name: String,
    /// URL with `{ip}` and `{port}` placeholders.
    pub url_template: String,
    /// Operating systems (`std::env::consts::OS`) the player runs on.
    /// Empty means any.
    #[serde(default)]
    pub platforms: Vec<String>,
    /// Ordered port discovery sources.
    #[serde(default)]
    pub discovery: Vec<DiscoverySource>,
    #[serde(default)]
    pub quirks: Quirks,
    /// Whether this variant is enabled at all.
    #[serde(default = "default_true")]
    pub enabled: bool,
}

fn default_true() -> bool {
    true
}

impl VariantProfile {
    /// Whether this variant applies to the current operating system.
    pub fn is_available(&self) -> bool {
        self.is_available_on(std::env::consts::OS)
    }

    pub fn is_available_on(&self, os: &str) -> bool {
        self.enabled && (self.platforms.is_empty() || self.platforms.iter().any(|p| p == os))
    }
}

/// Wrapper for TOML deserialization.
#[derive(Debug, Deserialize)]
struct VariantDbFile {
    #[serde(rename = "variant")]
    variants: Vec<VariantProfile>,
}

/// Database of known web-interface players.
#[derive(Debug, Clone, Default)]
pub struct VariantDatabase {
    pub variants: Vec<VariantProfile>,
}

impl VariantDatabase {
    /// Load the embedded variant database.
    pub fn embedded() -> Self {
        Self::from_toml(EMBEDDED_DB).expect("embedded variants.toml should be valid")
    }

    /// Load a variant database from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        let db: VariantDbFile = toml::from_str(toml_str)?;
        Ok(Self {
            variants: db.variants,
        })
    }

    /// Merge a user database into this one.
    /// Variants with matching names are replaced; new variants are appended.
    pub fn merge_user(&mut self, user_db: &VariantDatabase) {
        for user_variant in &user_db.variants {
            if let Some(existing) = self
                .variants
                .iter_mut()
                .find(|v| v.name == user_variant.name)
            {
                *existing = user_variant.clone();
            } else {
                self.variants.push(user_variant.clone());
            }
        }
    }

    /// Find a variant by name (case-insensitive).
    pub fn find(&self, name: &str) -> Option<&VariantProfile> {
        self.variants
            .iter()
            .find(|v| v.name.eq_ignore_ascii_case(name))
    }

    /// Variants that are enabled and apply to the current OS.
    pub fn available(&self) -> impl Iterator<Item = &VariantProfile> {
        self.variants.iter().filter(|v| v.is_available())
    }
}
