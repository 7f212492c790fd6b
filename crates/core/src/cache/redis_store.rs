use std::fmt;
use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use tokio::sync::OnceCell;
use tracing::info;

use super::{CacheError, KvStore};

/// Redis-backed key-value store (`SETEX` / `GET`).
///
/// The connection is opened on first use, not at construction, so an
/// unreachable server surfaces as a failed cache call rather than a failed
/// startup. Every call, including that first connect, is bounded by
/// `timeout`; the connection manager reconnects on its own after a dropped
/// connection.
pub struct RedisKvStore {
    client: redis::Client,
    conn: OnceCell<ConnectionManager>,
    timeout: Duration,
}

impl fmt::Debug for RedisKvStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisKvStore")
            .field("connected", &self.conn.initialized())
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl RedisKvStore {
    /// Validate `url` and prepare a client. Does not touch the network.
    pub fn new(url: &str, timeout: Duration) -> Result<Self, CacheError> {
        let client = redis::Client::open(url)
            .map_err(|e| CacheError::Backend(format!("Failed to create Redis client: {e}")))?;

        Ok(Self {
            client,
            conn: OnceCell::new(),
            timeout,
        })
    }

    async fn connection(&self) -> redis::RedisResult<ConnectionManager> {
        let conn = self
            .conn
            .get_or_try_init(|| async {
                info!("Connecting to Redis cache");
                let conn = ConnectionManager::new(self.client.clone()).await?;
                info!("Connected to Redis cache");
                Ok::<_, redis::RedisError>(conn)
            })
            .await?;
        Ok(conn.clone())
    }

    async fn bounded<T, F, Fut>(&self, op: F) -> Result<T, CacheError>
    where
        F: FnOnce(ConnectionManager) -> Fut,
        Fut: Future<Output = redis::RedisResult<T>>,
    {
        tokio::time::timeout(self.timeout, async {
            let conn = self.connection().await?;
            op(conn).await
        })
        .await
        .map_err(|_| CacheError::Timeout(self.timeout))?
        .map_err(|e| CacheError::Backend(e.to_string()))
    }
}

#[async_trait]
impl KvStore for RedisKvStore {
    async fn set_with_ttl(
        &self,
        key: &str,
        value: String,
        ttl: Duration,
    ) -> Result<(), CacheError> {
        // SETEX rejects a zero expiry.
        let secs = ttl.as_secs().max(1);
        self.bounded(|mut conn| async move { conn.set_ex::<_, _, ()>(key, value, secs).await })
            .await
    }

    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        self.bounded(|mut conn| async move { conn.get::<_, Option<String>>(key).await })
            .await
    }

    fn backend_name(&self) -> &'static str {
        "redis"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;
    use tokio::net::TcpListener;

    /// Accepts connections and holds them open without ever replying.
    async fn silent_server() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });
        format!("redis://{addr}/0")
    }

    #[tokio::test]
    async fn test_new_rejects_malformed_url() {
        let result = RedisKvStore::new("not a url", Duration::from_millis(200));
        assert!(matches!(result, Err(CacheError::Backend(_))));
    }

    #[tokio::test]
    async fn test_new_does_not_connect() {
        let store = RedisKvStore::new("redis://127.0.0.1:1/0", Duration::from_millis(200)).unwrap();
        assert!(!store.conn.initialized());
        assert_eq!(store.backend_name(), "redis");
    }

    #[tokio::test]
    async fn test_silent_server_times_out_within_bound() {
        let url = silent_server().await;
        let store = RedisKvStore::new(&url, Duration::from_millis(200)).unwrap();

        let started = Instant::now();
        let result = store.get("status:lines").await;
        assert!(matches!(result, Err(CacheError::Timeout(_))));
        assert!(started.elapsed() < Duration::from_secs(2));

        let result = store
            .set_with_ttl("status:lines", "[]".to_string(), Duration::from_secs(180))
            .await;
        assert!(matches!(result, Err(CacheError::Timeout(_))));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_error() {
        let store = RedisKvStore::new("redis://127.0.0.1:1/0", Duration::from_millis(200)).unwrap();

        let started = Instant::now();
        assert!(store.get("status:lines").await.is_err());
        assert!(started.elapsed() < Duration::from_secs(2));
    }
}
