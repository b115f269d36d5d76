pub mod discovery;
pub mod endpoint;
pub mod monitor;
pub mod platform;
pub mod status;
pub mod variant_db;
pub mod webui;

pub use discovery::{DiscoveryError, KeyValueStore, MemoryStore, PortResolver};
pub use endpoint::{EndpointConfig, EndpointError, MonitorConfig, AUTO_DETECT};
pub use monitor::{MonitorError, WebInterfaceMonitor};
pub use platform::RegistryStore;
pub use status::{PlayState, Playback, StatusRecord};
pub use variant_db::{DiscoverySource, Quirks, VariantDatabase, VariantProfile};
