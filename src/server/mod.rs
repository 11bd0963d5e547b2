use std::sync::Arc;

use tokio::net::TcpListener;

use crate::config::Config;
use crate::data::RosterError;
use crate::index::RosterStore;

pub mod api;
pub mod routes;

/// Bind and serve. The listener is accepting before the roster is parsed;
/// until the first load finishes, player endpoints answer 503.
pub async fn run_server(config: &Config) -> std::io::Result<()> {
    let store = Arc::new(RosterStore::new(&config.roster_path, config.worker_pool()));

    spawn_reload(Arc::clone(&store));
    if let Some(interval) = config.refresh_interval {
        spawn_refresh(Arc::clone(&store), interval);
    }

    let app = routes::router(store, Some(&config.static_dir));
    let listener = TcpListener::bind(config.bind_addr.as_str()).await?;
    tracing::info!(addr = %config.bind_addr, "fide-lookup server listening");
    axum::serve(listener, app).await
}

fn spawn_reload(store: Arc<RosterStore>) {
    tokio::task::spawn_blocking(move || reload_logged(&store));
}

/// Run one reload outside a request. Returns whether a new index was published.
fn reload_logged(store: &RosterStore) -> bool {
    match store.reload() {
        Ok(_) => true,
        Err(RosterError::ReloadInProgress) => {
            tracing::info!(source = %store.source().display(), "reload already running, skipped");
            false
        }
        // Logged by the store; the previous index keeps serving.
        Err(_) => false,
    }
}

fn spawn_refresh(store: Arc<RosterStore>, every: std::time::Duration) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        // The first tick completes immediately and the startup load covers it.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            tracing::info!(source = %store.source().display(), "scheduled roster refresh");
            spawn_reload(Arc::clone(&store));
        }
    });
}
