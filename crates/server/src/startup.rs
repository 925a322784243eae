use std::{net::SocketAddr, sync::Arc, time::Duration};

use configs::{AppConfig, ServerConfig};
use tokio::net::TcpListener;
use tracing::info;

use service::account::{repo::seaorm::SeaOrmAccountRepository, AccountService};
use service::token::JwtTokenVerifier;

use crate::errors::StartupError;
use crate::routes::{self, AppState};

fn bind_addr(server: &ServerConfig) -> anyhow::Result<SocketAddr> {
    Ok(format!("{}:{}", server.host, server.port).parse()?)
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!(event = "shutdown_signal", "received Ctrl+C, draining connections");
    }
}

/// Wire the account service from configuration.
///
/// The signing secret is checked before the database is touched; a missing
/// secret aborts startup.
pub async fn build_state(cfg: &AppConfig) -> Result<AppState, StartupError> {
    let tokens = JwtTokenVerifier::new(&cfg.token.secret)
        .map_err(|e| StartupError::InvalidConfig(format!("token: {e}")))?;
    let db = models::db::connect_with_config(&cfg.database).await?;
    let repo = SeaOrmAccountRepository::new(db);
    let accounts = AccountService::new(Arc::new(repo), Arc::new(tokens));
    Ok(AppState { accounts })
}

/// Public entry: build the app and run the RPC server until Ctrl+C.
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    let state = build_state(&cfg).await?;
    let app = routes::build_router(state, Duration::from_secs(cfg.server.request_timeout_secs));

    let addr = bind_addr(&cfg.server)?;
    info!(%addr, app = %cfg.app.name, version = %cfg.app.version, "starting user service");
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("user service stopped");
    Ok(())
}
