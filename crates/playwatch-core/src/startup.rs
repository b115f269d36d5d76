use tracing::{debug, info, warn};

use playwatch_detect::{KeyValueStore, MonitorError, VariantDatabase, WebInterfaceMonitor};

use crate::config::AppConfig;

/// Why a variant was left out of the active set.
#[derive(Debug)]
pub struct SkippedVariant {
    pub name: String,
    pub error: MonitorError,
}

/// The outcome of building monitors at startup.
#[derive(Debug, Default)]
pub struct ActiveSet {
    pub monitors: Vec<WebInterfaceMonitor>,
    pub skipped: Vec<SkippedVariant>,
}

/// Build a monitor for every enabled variant.
///
/// Variants that do not apply to this OS, or whose port cannot be resolved,
/// are skipped and logged here once; they are never polled.
pub fn build_monitors<S: KeyValueStore + ?Sized>(
    db: &VariantDatabase,
    config: &AppConfig,
    store: &S,
) -> ActiveSet {
    let mut set = ActiveSet::default();

    for profile in db.variants.iter().filter(|v| v.enabled) {
        let player_config = config.player(&profile.name);
        match WebInterfaceMonitor::connect(profile.clone(), &player_config, store, config.timeout())
        {
            Ok(monitor) => {
                info!(player = %profile.name, url = %monitor.endpoint().url, "Monitoring player");
                set.monitors.push(monitor);
            }
            Err(error @ MonitorError::Unavailable { .. }) => {
                debug!(player = %profile.name, "Not available on this platform");
                set.skipped.push(SkippedVariant {
                    name: profile.name.clone(),
                    error,
                });
            }
            Err(error) => {
                warn!(player = %profile.name, error = %error, "Skipping player");
                set.skipped.push(SkippedVariant {
                    name: profile.name.clone(),
                    error,
                });
            }
        }
    }

    set
}

#[cfg(test)]
mod tests {
    use super::*;
    use playwatch_detect::{EndpointError, MemoryStore};

    const VARIANTS: &str = r#"
        [[variant]]
        name = "discoverable"
        url_template = "http://{ip}:{port}/variables.html"

        [[variant.discovery]]
        location = 'Software\New'
        key = "Port"

        [[variant.discovery]]
        location = 'Software\Old'
        key = "WebServerPort"

        [[variant]]
        name = "lost"
        url_template = "http://{ip}:{port}/variables.html"

        [[variant.discovery]]
        location = 'Software\Lost'
        key = "Port"

        [[variant]]
        name = "elsewhere"
        url_template = "http://{ip}:{port}/variables.html"
        platforms = ["no-such-os"]

        [[variant]]
        name = "off"
        url_template = "http://{ip}:{port}/variables.html"
        enabled = false

        [[variant]]
        name = "fixed"
        url_template = "http://{ip}:{port}/variables.html"
    "#;

    #[test]
    fn test_build_monitors() {
        let db = VariantDatabase::from_toml(VARIANTS).unwrap();
        let config = AppConfig::from_toml(
            r#"
            [players.fixed]
            ip = "10.0.0.2"
            port = "8080"
            "#,
        )
        .unwrap();
        let store = MemoryStore::new().with(r"Software\Old", "WebServerPort", "13579");

        let set = build_monitors(&db, &config, &store);

        let active: Vec<_> = set.monitors.iter().map(|m| m.name()).collect();
        assert_eq!(active, vec!["discoverable", "fixed"]);
        assert_eq!(
            set.monitors[0].endpoint().url,
            "http://localhost:13579/variables.html"
        );
        assert_eq!(
            set.monitors[1].endpoint().url,
            "http://10.0.0.2:8080/variables.html"
        );

        let skipped: Vec<_> = set.skipped.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(skipped, vec!["lost", "elsewhere"]);
        assert!(matches!(
            set.skipped[0].error,
            MonitorError::Endpoint(EndpointError::Discovery(_))
        ));
        assert!(matches!(
            set.skipped[1].error,
            MonitorError::Unavailable { .. }
        ));
    }

    #[test]
    fn test_bad_template_is_skipped() {
        let db = VariantDatabase::from_toml(
            r#"
            [[variant]]
            name = "typo"
            url_template = "http://{host}:{port}/variables.html"
            "#,
        )
        .unwrap();
        let config = AppConfig::from_toml(
            r#"
            [players.typo]
            port = "1"
            "#,
        )
        .unwrap();

        let set = build_monitors(&db, &config, &MemoryStore::new());
        assert!(set.monitors.is_empty());
        assert!(matches!(
            set.skipped[0].error,
            MonitorError::Endpoint(EndpointError::UnknownPlaceholder(_))
        ));
    }
}
