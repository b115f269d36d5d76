//! Run with: cargo run -p playwatch-detect --example status
//!
//! Polls every available player once with default settings and prints what
//! it reports.

use std::time::Duration;

use playwatch_detect::{MonitorConfig, RegistryStore, StatusRecord, VariantDatabase, WebInterfaceMonitor};

#[tokio::main]
async fn main() {
    let db = VariantDatabase::embedded();
    let config = MonitorConfig::default();

    for profile in db.available() {
        let name = profile.name.clone();
        let mut monitor = match WebInterfaceMonitor::connect(
            profile.clone(),
            &config,
            &RegistryStore,
            Duration::from_secs(5),
        ) {
            Ok(m) => m,
            Err(e) => {
                println!("{name}: {e}");
                continue;
            }
        };

        println!("Player: {name} ({})", monitor.endpoint().url);
        if let Err(e) = monitor.update_status().await {
            println!("  Error: {e}");
            continue;
        }
        match monitor.status() {
            StatusRecord::Empty => println!("  Nothing playing."),
            StatusRecord::Loaded(p) => {
                println!("  State:    {}", p.state);
                println!("  Position: {:.1}s / {:.1}s", p.position, p.duration);
                println!("  File:     {}", p.file_path);
            }
        }
        println!();
    }
}
