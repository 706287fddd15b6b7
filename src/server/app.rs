use std::sync::Arc;

use axum::{
    extract::{Request, State},
    routing::{any, get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::api::health;
use crate::config::{SettingsError, HEALTH_PATH};
use crate::telegram::handle_update;
use crate::webhook::handle_webhook;

use super::AppState;

/// Build the router: one route per configured webhook, the bot update
/// route when `telegram.webhookURL` is set, and the health check.
pub fn create_app(state: AppState) -> Result<Router, SettingsError> {
    let mut router = Router::new().route(HEALTH_PATH, get(health));

    for definition in &state.settings.webhooks {
        tracing::info!(
            webhook = %definition.name,
            route = %definition.route_path(),
            "Creating webhook"
        );
        // Each route owns its own definition
        let definition = Arc::new(definition.clone());
        let path = definition.route_path();
        router = router.route(
            &path,
            any(move |State(state): State<AppState>, request: Request| {
                handle_webhook(state, definition, request)
            }),
        );
    }

    if let Some(path) = state.settings.bot_update_path()? {
        tracing::info!(route = %path, "Listening for bot updates");
        router = router.route(&path, post(handle_update));
    }

    Ok(router.layer(TraceLayer::new_for_http()).with_state(state))
}
