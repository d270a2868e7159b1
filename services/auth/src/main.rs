use std::sync::Arc;
use std::time::Duration;

use anyhow::Context as _;
use axum::Router;
use tokio::net::TcpListener;
use tracing::{info, warn};

use ringpass_auth::config::AuthConfig;
use ringpass_auth::infra::connect::{connect_postgres, connect_redis};
use ringpass_auth::router::build_router;
use ringpass_auth::state::AppState;
use ringpass_auth_types::token::SessionTokenIssuer;
use ringpass_core::config::Config as _;
use ringpass_core::shutdown::shutdown_signal;
use ringpass_core::tracing::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = AuthConfig::from_env().context("load configuration")?;
    config.validate()?;
    info!(?config, "starting auth service");

    let db = connect_postgres(&config.database_url).await?;
    let redis = connect_redis(&config.redis_url()).await?;

    let state = AppState {
        db: db.clone(),
        redis: redis.clone(),
        tokens: Arc::new(SessionTokenIssuer::new(config.jwt_secret.as_bytes())),
        otp: config.otp_settings(),
        store_timeout: config.store_timeout(),
        request_timeout: config.request_timeout(),
    };

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("bind {addr}"))?;

    info!("auth service listening on {addr}");
    serve(listener, router, config.shutdown_grace()).await?;

    redis.close();
    db.close().await.context("close postgres pool")?;
    info!("auth service stopped");
    Ok(())
}

/// Serve until SIGINT/SIGTERM, then give in-flight requests `grace` to finish.
async fn serve(listener: TcpListener, router: Router, grace: Duration) -> anyhow::Result<()> {
    let (stop_tx, stop_rx) = tokio::sync::oneshot::channel::<()>();
    let mut server = tokio::spawn(async move {
        axum::serve(listener, router)
            .with_graceful_shutdown(async {
                let _ = stop_rx.await;
            })
            .await
    });

    tokio::select! {
        res = &mut server => {
            return res.context("server task panicked")?.context("server error");
        }
        () = shutdown_signal() => {}
    }

    info!(?grace, "shutdown signal received, draining requests");
    let _ = stop_tx.send(());
    match tokio::time::timeout(grace, &mut server).await {
        Ok(res) => res.context("server task panicked")?.context("server error")?,
        Err(_) => {
            warn!("grace period elapsed, aborting remaining requests");
            server.abort();
        }
    }
    Ok(())
}
