//! Builds the `/api/*` axum `Router` (§6): one shared `ApiState`, an admin
//! API key gate on everything but the ambient health/metrics endpoints, and
//! the same CORS/rate-limit/tracing layering the WebSocket server's sibling
//! HTTP surface has always used.

use std::sync::Arc;
use std::time::Instant;

use axum::middleware as axum_middleware;
use axum::routing::{get, post};
use axum::Router;
use metrics_exporter_prometheus::PrometheusHandle;
use tower_governor::governor::GovernorConfigBuilder;
use tower_governor::GovernorLayer;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::application::billing_streamer::SharedBillingStreamer;
use crate::application::commands::SharedCommandSender;
use crate::application::live_status::SharedLiveStatusCache;
use crate::application::session::SharedSessionRegistry;
use crate::application::smart_charging::SharedSmartChargingCoordinator;
use crate::application::transaction_engine::SharedTransactionEngine;
use crate::config::AppConfig;
use crate::domain::repository::RepositoryProvider;
use crate::interfaces::http::middleware::{admin_auth_middleware, AuthState};
use crate::interfaces::http::modules::{
    cards, charge_points, community, connections, debug, health, metrics, tariffs,
};

/// Every `/api/*` handler's `State` extractor. Cheap to clone: every field
/// is an `Arc` (or wraps one).
#[derive(Clone)]
pub struct ApiState {
    pub repositories: Arc<dyn RepositoryProvider>,
    pub session_registry: SharedSessionRegistry,
    pub command_sender: SharedCommandSender,
    pub transaction_engine: SharedTransactionEngine,
    pub billing_streamer: SharedBillingStreamer,
    pub smart_charging: SharedSmartChargingCoordinator,
    pub live_status: SharedLiveStatusCache,
}

#[allow(clippy::too_many_arguments)]
pub fn build_router(
    repositories: Arc<dyn RepositoryProvider>,
    session_registry: SharedSessionRegistry,
    command_sender: SharedCommandSender,
    transaction_engine: SharedTransactionEngine,
    billing_streamer: SharedBillingStreamer,
    smart_charging: SharedSmartChargingCoordinator,
    live_status: SharedLiveStatusCache,
    prometheus_handle: PrometheusHandle,
    app_cfg: &AppConfig,
) -> Router {
    let api_state = ApiState {
        repositories: repositories.clone(),
        session_registry: session_registry.clone(),
        command_sender,
        transaction_engine,
        billing_streamer,
        smart_charging,
        live_status,
    };

    let auth_state = AuthState {
        admin_key_hash: app_cfg.admin.api_key_hash.clone(),
    };

    let charge_point_routes = Router::new()
        .route("/", get(charge_points::list_charge_points).post(charge_points::create_charge_point))
        .route(
            "/{charge_point_id}",
            get(charge_points::get_charge_point)
                .put(charge_points::update_charge_point)
                .delete(charge_points::delete_charge_point),
        )
        .route("/{charge_point_id}/start", post(charge_points::start_transaction))
        .route("/{charge_point_id}/stop", post(charge_points::stop_transaction))
        .route("/{charge_point_id}/current-limit", post(charge_points::set_current_limit))
        .route("/{charge_point_id}/live-status", get(charge_points::live_status))
        .route(
            "/{charge_point_id}/current-transaction",
            get(charge_points::current_transaction),
        )
        .route(
            "/{charge_point_id}/current-transaction/summary",
            get(charge_points::current_transaction_summary),
        )
        .route(
            "/{charge_point_id}/last-finished-transaction/summary",
            get(charge_points::last_finished_transaction_summary),
        );

    let card_routes = Router::new()
        .route("/", get(cards::list_cards))
        .route("/{id_tag}/balance", get(cards::card_balance))
        .route("/{id_tag}/topup", post(cards::top_up_card));

    let tariff_routes = Router::new()
        .route("/", get(tariffs::list_segments).post(tariffs::add_segment))
        .route("/default", get(tariffs::default_price))
        .route(
            "/{date}",
            get(tariffs::segments_for_date).delete(tariffs::delete_segments_for_date),
        );

    let community_routes = Router::new().route(
        "/",
        get(community::get_community_settings).put(community::update_community_settings),
    );

    let connections_routes = Router::new().route("/", get(connections::list_connections));

    let debug_routes = Router::new().route(
        "/start-transaction-check",
        get(debug::start_transaction_check),
    );

    let protected_api = Router::new()
        .nest("/charge-points", charge_point_routes)
        .nest("/cards", card_routes)
        .nest("/daily-pricing", tariff_routes)
        .nest("/community-settings", community_routes)
        .nest("/connections", connections_routes)
        .nest("/debug", debug_routes)
        .layer(axum_middleware::from_fn_with_state(auth_state, admin_auth_middleware))
        .with_state(api_state);

    let health_state = health::HealthState {
        repositories,
        session_registry,
        started_at: Arc::new(Instant::now()),
    };
    let health_routes = Router::new()
        .route("/healthz", get(health::health_check))
        .with_state(health_state);

    let metrics_state = metrics::MetricsState {
        handle: prometheus_handle,
    };
    let metrics_routes = Router::new()
        .route("/metrics", get(metrics::prometheus_metrics))
        .with_state(metrics_state);

    let rpm = app_cfg.rate_limit.api_requests_per_minute.max(1);
    let replenish_secs = (60.0 / rpm as f64) as u64;
    let governor_conf = GovernorConfigBuilder::default()
        .per_second(replenish_secs.max(1))
        .burst_size(rpm)
        .use_headers()
        .finish()
        .expect("failed to build API rate limiter config");
    info!(requests_per_minute = rpm, "HTTP rate limit configured");

    Router::new()
        .merge(health_routes)
        .merge(metrics_routes)
        .nest("/api", protected_api)
        .layer(GovernorLayer::new(governor_conf))
        .layer(build_cors_layer(&app_cfg.cors))
        .layer(TraceLayer::new_for_http())
}

fn build_cors_layer(cors_cfg: &crate::config::CorsConfig) -> CorsLayer {
    let is_any = cors_cfg.allowed_origins.is_empty() || cors_cfg.allowed_origins.iter().any(|o| o.trim() == "*");

    if is_any {
        info!("CORS: allowing any origin (set [cors].allowed_origins to restrict)");
        CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
    } else {
        let origins: Vec<axum::http::HeaderValue> = cors_cfg
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    }
}
