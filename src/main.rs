// src/main.rs
//
// Headless entry point: opens the wish database and prints the current list.

use anyhow::Context;
use tokio::runtime::Handle;

use wishlist::application::AppState;
use wishlist::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // 1. CONFIGURATION
    let config = AppConfig::from_env().context("resolving configuration")?;

    // 2. APPLICATION STATE
    let state = AppState::initialize(config).context("opening wish database")?;
    let view_state = state.view_state(Handle::current());

    // 3. FIRST SNAPSHOT
    let mut wishes = view_state.all_wishes();
    let snapshot = wishes.changed().await.unwrap_or_default();

    if snapshot.is_empty() {
        println!("No wishes yet");
    } else {
        for wish in &snapshot {
            println!("{}", wish);
        }
    }

    let stats = state.database_stats()?;
    log::info!(
        "{} wish(es), {} bytes on disk",
        stats.wish_count,
        stats.size_bytes
    );

    drop(wishes);
    view_state.close();
    Ok(())
}
