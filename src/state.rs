use std::sync::atomic::AtomicUsize;
use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info, warn};

use crate::clients::runner_client::RunnerClient;
use crate::config::Config;
use crate::websocket::Dispatcher;
use crate::ws::RoomRegistry;

/// Shared by the HTTP handlers and every websocket connection.
pub struct AppState {
    pub config: Arc<Config>,
    pub registry: Arc<RoomRegistry>,
    pub dispatcher: Dispatcher,
    pub runner: Option<RunnerClient>,
    pub connections: AtomicUsize,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let registry = Arc::new(RoomRegistry::new(
            config.default_language_id,
            Duration::from_millis(config.typing_timeout_ms),
        ));

        let runner = match &config.runner_url {
            Some(url) => {
                match RunnerClient::new(url.clone(), Duration::from_secs(config.runner_timeout_secs)) {
                    Ok(client) => {
                        info!("Code runner configured at {}", url);
                        Some(client)
                    }
                    Err(e) => {
                        error!("Failed to create code runner client: {}", e);
                        None
                    }
                }
            }
            None => {
                warn!("No runner URL configured - run-code will not be available");
                None
            }
        };

        Self {
            config: Arc::new(config),
            dispatcher: Dispatcher::new(registry.clone()),
            registry,
            runner,
            connections: AtomicUsize::new(0),
        }
    }
}
