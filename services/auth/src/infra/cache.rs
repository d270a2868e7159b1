use std::sync::LazyLock;
use std::time::Duration;

use anyhow::Context;
use deadpool_redis::Pool;
use deadpool_redis::redis::{AsyncCommands, Script};

use crate::domain::repository::{CodeStore, RateLimiter};
use crate::error::AuthServiceError;
use crate::infra::bounded;

fn code_key(phone: &str) -> String {
    format!("otp:{phone}")
}

fn rate_key(phone: &str) -> String {
    format!("rl:{phone}")
}

// INCR and EXPIRE in one step. The TTL check re-arms a counter that lost its
// expiry, which would otherwise lock the phone out forever.
static COUNT_REQUEST: LazyLock<Script> = LazyLock::new(|| {
    Script::new(
        r"
local count = redis.call('INCR', KEYS[1])
if count == 1 or redis.call('TTL', KEYS[1]) == -1 then
    redis.call('EXPIRE', KEYS[1], ARGV[1])
end
return count
",
    )
});

// GET, compare, DEL. A missing key reads as false and never matches.
static CONSUME_CODE: LazyLock<Script> = LazyLock::new(|| {
    Script::new(
        r"
if redis.call('GET', KEYS[1]) == ARGV[1] then
    redis.call('DEL', KEYS[1])
    return 1
end
return 0
",
    )
});

/// Redis TTL arguments are whole seconds; round up so a sub-second duration
/// never becomes "no expiry".
fn whole_secs(d: Duration) -> u64 {
    d.as_secs() + u64::from(d.subsec_nanos() > 0)
}

#[derive(Clone)]
pub struct RedisCodeStore {
    pub pool: Pool,
    pub deadline: Duration,
}

impl CodeStore for RedisCodeStore {
    async fn save(&self, phone: &str, code: &str, ttl: Duration) -> Result<(), AuthServiceError> {
        let key = code_key(phone);
        bounded(self.deadline, "save otp", async {
            let mut conn = self.pool.get().await.context("redis pool")?;
            let (): () = conn
                .set_ex(&key, code, whole_secs(ttl))
                .await
                .context("save otp")?;
            Ok::<_, anyhow::Error>(())
        })
        .await??;
        Ok(())
    }

    async fn verify_and_consume(
        &self,
        phone: &str,
        code: &str,
    ) -> Result<bool, AuthServiceError> {
        let key = code_key(phone);
        let matched = bounded(self.deadline, "consume otp", async {
            let mut conn = self.pool.get().await.context("redis pool")?;
            let matched: i64 = CONSUME_CODE
                .key(&key)
                .arg(code)
                .invoke_async(&mut conn)
                .await
                .context("consume otp")?;
            Ok::<_, anyhow::Error>(matched)
        })
        .await??;
        Ok(matched == 1)
    }
}

#[derive(Clone)]
pub struct RedisRateLimiter {
    pub pool: Pool,
    pub deadline: Duration,
}

impl RateLimiter for RedisRateLimiter {
    async fn allow(
        &self,
        phone: &str,
        max: u32,
        window: Duration,
    ) -> Result<bool, AuthServiceError> {
        let key = rate_key(phone);
        let count = bounded(self.deadline, "count otp request", async {
            let mut conn = self.pool.get().await.context("redis pool")?;
            let count: i64 = COUNT_REQUEST
                .key(&key)
                .arg(whole_secs(window))
                .invoke_async(&mut conn)
                .await
                .context("count otp request")?;
            Ok::<_, anyhow::Error>(count)
        })
        .await??;
        tracing::debug!(count, max, "otp request counted");
        Ok(count <= i64::from(max))
    }
}
