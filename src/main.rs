//! Overlay FX - Main Entry Point
//!
//! Starts the designer API, then loads the effect catalog in the background
//! so the page is usable while modules arrive.

use std::sync::Arc;

use overlay_fx::api::{run_server, SharedState, SharedStateHandle};
use overlay_fx::fx::{BuiltinResolver, CatalogSource, FileCatalog, Loader, StaticCatalog};
use overlay_fx::telemetry::{init_logging, LogConfig};
use overlay_fx::{Designer, DirectoryTemplateStore, ServerSettings};
use tokio::sync::watch;

/// Load every catalog entry into the shared designer, then mark it ready
async fn load_effects<C: CatalogSource>(state: SharedStateHandle, catalog: C, resolver: BuiltinResolver) {
    let loader = Loader::new(resolver);
    let report = loader
        .load_all(&catalog, |module| state.designer_mut().register(module))
        .await;

    for failure in &report.failed {
        tracing::warn!(source = %failure.source_id, reason = %failure.reason, "FX module skipped");
    }
    state.designer_mut().mark_ready();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let settings = ServerSettings::load();
    // Keep the guard alive for the program duration
    let _log_guard = match init_logging(&LogConfig::from(&settings)) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {}", e);
            None
        }
    };

    tracing::info!(
        port = settings.api_port,
        fx_dir = %settings.fx_dir,
        templates_dir = %settings.templates_dir,
        "Starting Overlay FX"
    );

    let templates = Arc::new(DirectoryTemplateStore::new(&settings.templates_dir));
    let state = SharedState::new(Designer::new(), templates).into_handle();

    let resolver = BuiltinResolver::new().with_fx_dir(&settings.fx_dir);
    let loader_state = state.clone();
    match settings.catalog_path.clone() {
        Some(path) => {
            tokio::spawn(load_effects(loader_state, FileCatalog::new(path), resolver));
        }
        None => {
            tokio::spawn(load_effects(loader_state, StaticCatalog::builtin(), resolver));
        }
    }

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = shutdown_tx.send(true);
        }
    });

    run_server(settings.api_port, state, shutdown_rx).await?;
    tracing::info!("Overlay FX stopped");
    Ok(())
}
