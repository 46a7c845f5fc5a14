//! EV community charging Central System: OCPP 1.6J WebSocket server plus the
//! REST control/query surface, sharing one persistence store and session
//! registry. Reads configuration from TOML (`~/.config/evcs-ocpp/config.toml`
//! by default, `$OCPP_CONFIG` override).

use std::sync::Arc;

use tracing::{error, info, warn};

use evcs_ocpp::application::background_monitor::BackgroundMonitor;
use evcs_ocpp::application::billing_streamer::BillingStreamer;
use evcs_ocpp::application::commands::CommandSender;
use evcs_ocpp::application::live_status::LiveStatusCache;
use evcs_ocpp::application::session::SessionRegistry;
use evcs_ocpp::application::smart_charging::SmartChargingCoordinator;
use evcs_ocpp::application::tariff_resolver::TariffResolver;
use evcs_ocpp::application::transaction_engine::TransactionEngine;
use evcs_ocpp::config::AppConfig;
use evcs_ocpp::domain::repository::RepositoryProvider;
use evcs_ocpp::infrastructure::crypto::api_key::generate_admin_key;
use evcs_ocpp::infrastructure::database::repositories::tariff_repository::SeaOrmTariffRepository;
use evcs_ocpp::infrastructure::database::{init_database, SeaOrmRepositoryProvider};
use evcs_ocpp::interfaces::http::router::build_router;
use evcs_ocpp::interfaces::ws::WsServer;
use evcs_ocpp::shared::shutdown::{listen_for_shutdown_signals, ShutdownSignal};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = AppConfig::default_config_path();
    let app_cfg = match AppConfig::load(&config_path) {
        Ok(cfg) => {
            tracing_subscriber::fmt()
                .with_env_filter(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(cfg.logging.level.clone())),
                )
                .init();
            info!(path = %config_path.display(), "configuration loaded");
            cfg
        }
        Err(e) => {
            tracing_subscriber::fmt()
                .with_env_filter(tracing_subscriber::EnvFilter::new("info"))
                .init();
            warn!(error = %e, path = %config_path.display(), "failed to load config, using defaults");
            AppConfig::default()
        }
    };

    info!("starting EV community charging Central System");

    let prometheus_handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .expect("failed to install Prometheus metrics recorder");

    if app_cfg.admin.api_key_hash.is_empty() {
        let key = generate_admin_key();
        warn!(
            admin_key = %key,
            "no admin.api_key_hash configured — generated a one-off key for this run only; set admin.api_key_hash in config.toml to persist it"
        );
    }

    let db_config = app_cfg.database_config();
    let db = match init_database(&db_config).await {
        Ok(db) => db,
        Err(e) => {
            error!(error = %e, "failed to initialize database");
            return Err(e.into());
        }
    };

    let repositories: Arc<dyn RepositoryProvider> = Arc::new(SeaOrmRepositoryProvider::new(db.clone()));

    let session_registry = SessionRegistry::shared();
    let command_sender = CommandSender::shared(session_registry.clone());
    let live_status = LiveStatusCache::shared();

    let tariff_repo = Arc::new(SeaOrmTariffRepository::new(db.clone()));
    let tariff_resolver = Arc::new(TariffResolver::new(tariff_repo));

    let smart_charging = SmartChargingCoordinator::shared(
        repositories.clone(),
        session_registry.clone(),
        command_sender.clone(),
    );

    let transaction_engine = TransactionEngine::shared(
        repositories.clone(),
        live_status.clone(),
        smart_charging.clone(),
        tariff_resolver.clone(),
        command_sender.clone(),
    );

    let billing_streamer = BillingStreamer::shared(
        repositories.clone(),
        live_status.clone(),
        tariff_resolver.clone(),
        transaction_engine.clone(),
    );

    let background_monitor = BackgroundMonitor::shared(repositories.clone(), transaction_engine.clone());

    let shutdown = ShutdownSignal::new();
    tokio::spawn(listen_for_shutdown_signals(shutdown.clone()));
    background_monitor.start(shutdown.clone());

    let ws_server = Arc::new(WsServer::new(
        app_cfg.ws_server_config(),
        repositories.clone(),
        session_registry.clone(),
        command_sender.clone(),
        transaction_engine.clone(),
        billing_streamer.clone(),
    ));

    let api_router = build_router(
        repositories,
        session_registry,
        command_sender,
        transaction_engine,
        billing_streamer,
        smart_charging,
        live_status,
        prometheus_handle,
        &app_cfg,
    );

    let api_addr = app_cfg.api_bind_addr();
    let listener = tokio::net::TcpListener::bind(&api_addr).await?;
    info!(addr = %api_addr, "HTTP control surface listening");

    let api_shutdown = shutdown.clone();
    let api_server = axum::serve(listener, api_router.into_make_service()).with_graceful_shutdown(async move {
        api_shutdown.wait().await;
        info!("HTTP server received shutdown signal");
    });

    info!("all servers started");

    let ws_shutdown = shutdown.clone();
    let ws_result = tokio::spawn(async move { ws_server.run(ws_shutdown).await });
    let api_result = tokio::spawn(async move { api_server.await });

    tokio::select! {
        result = ws_result => match result {
            Ok(Ok(())) => info!("WebSocket server stopped"),
            Ok(Err(e)) => error!(error = %e, "WebSocket server error"),
            Err(e) => error!(error = %e, "WebSocket server task panicked"),
        },
        result = api_result => match result {
            Ok(Ok(())) => info!("HTTP server stopped"),
            Ok(Err(e)) => error!(error = %e, "HTTP server error"),
            Err(e) => error!(error = %e, "HTTP server task panicked"),
        },
    }

    if let Err(e) = db.close().await {
        warn!(error = %e, "error closing database connection");
    }

    info!("shutdown complete");
    Ok(())
}
