//! Startup connections with bounded retry, and readiness probes.

use std::time::Duration;

use anyhow::Context as _;
use deadpool_redis::redis::cmd;
use deadpool_redis::{Pool as RedisPool, Runtime};
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use tracing::info;

use ringpass_core::retry::{Backoff, retry_with_backoff};

const POSTGRES_BACKOFF: Backoff = Backoff {
    max_attempts: 10,
    initial_delay: Duration::from_secs(2),
};

const REDIS_BACKOFF: Backoff = Backoff {
    max_attempts: 8,
    initial_delay: Duration::from_secs(1),
};

const REDIS_PING_TIMEOUT: Duration = Duration::from_secs(3);

pub async fn connect_postgres(url: &str) -> anyhow::Result<DatabaseConnection> {
    let mut opts = ConnectOptions::new(url.to_owned());
    opts.max_connections(10)
        .min_connections(2)
        .max_lifetime(Duration::from_secs(3600))
        .connect_timeout(Duration::from_secs(5))
        .acquire_timeout(Duration::from_secs(5))
        .sqlx_logging(false);

    let db = retry_with_backoff("postgres", POSTGRES_BACKOFF, || {
        let opts = opts.clone();
        async move {
            let db = Database::connect(opts).await?;
            db.ping().await?;
            Ok::<_, DbErr>(db)
        }
    })
    .await
    .context("connect to postgres")?;

    info!("connected to postgres");
    Ok(db)
}

pub async fn connect_redis(url: &str) -> anyhow::Result<RedisPool> {
    let pool = deadpool_redis::Config::from_url(url)
        .create_pool(Some(Runtime::Tokio1))
        .context("create redis pool")?;

    let probe = &pool;
    retry_with_backoff("redis", REDIS_BACKOFF, move || ping_redis(probe, REDIS_PING_TIMEOUT))
        .await
        .context("connect to redis")?;

    info!("connected to redis");
    Ok(pool)
}

/// PING over a pooled connection, bounded by `deadline`.
pub async fn ping_redis(pool: &RedisPool, deadline: Duration) -> anyhow::Result<()> {
    tokio::time::timeout(deadline, async {
        let mut conn = pool.get().await.context("redis pool")?;
        let _: String = cmd("PING").query_async(&mut conn).await.context("PING")?;
        Ok::<_, anyhow::Error>(())
    })
    .await
    .context("redis ping timed out")?
}
