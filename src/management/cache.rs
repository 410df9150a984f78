use std::{collections::HashMap, future::Future, time::Duration};

use async_trait::async_trait;
use redis::{AsyncCommands, AsyncConnectionConfig, RedisResult, aio::MultiplexedConnection};
use tokio::time::Instant;

use crate::{error::CacheError, types::MatchRecord};

/// Prefix of the redis keys holding match records.
pub const KEY_PREFIX: &str = "favsync:track:";

/// Longest a connect or a single command may take.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1);

/// How long the cache is left alone after a failure.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(30);

const FIELD_ID: &str = "destination_id";
const FIELD_TITLE: &str = "destination_title";
const FIELD_ARTIST: &str = "destination_artist";
const FIELD_DURATION: &str = "destination_duration_ms";

/// Store of previously resolved matches, keyed by source track identifier.
///
/// Purely an optimization: the sync treats every error as a cache miss.
#[async_trait]
pub trait MatchCache: Send {
    async fn lookup(&mut self, source_id: &str) -> Result<Option<MatchRecord>, CacheError>;

    /// Inserts or overwrites the record stored under `record.source_id`.
    async fn store(&mut self, record: &MatchRecord) -> Result<(), CacheError>;
}

/// Hash fields a record is stored as.
pub fn record_fields(record: &MatchRecord) -> [(&'static str, String); 4] {
    [
        (FIELD_ID, record.destination_id.clone()),
        (FIELD_TITLE, record.destination_title.clone()),
        (FIELD_ARTIST, record.destination_artist.clone()),
        (FIELD_DURATION, record.destination_duration_ms.to_string()),
    ]
}

/// Rebuilds a record from its hash fields. A hash without a destination id
/// (including an empty one, i.e. a missing key) is a miss.
pub fn record_from_fields(
    source_id: &str,
    mut fields: HashMap<String, String>,
) -> Result<Option<MatchRecord>, CacheError> {
    let Some(destination_id) = fields.remove(FIELD_ID).filter(|id| !id.is_empty()) else {
        return Ok(None);
    };

    let duration = fields.remove(FIELD_DURATION).unwrap_or_default();
    let destination_duration_ms = duration.parse::<u64>().map_err(|_| CacheError::Malformed {
        key: format!("{}{}", KEY_PREFIX, source_id),
        reason: format!("duration {:?} is not a number", duration),
    })?;

    Ok(Some(MatchRecord {
        source_id: source_id.to_string(),
        destination_id,
        destination_title: fields.remove(FIELD_TITLE).unwrap_or_default(),
        destination_artist: fields.remove(FIELD_ARTIST).unwrap_or_default(),
        destination_duration_ms,
    }))
}

/// Match cache backed by a redis server, one hash per source track.
///
/// The connection is opened on first use. Every connect and command is
/// bounded by `timeout`; after a failure the connection is dropped and no
/// new attempt is made before `retry_delay` has passed, so an unreachable
/// server costs one timeout per delay instead of one per track.
pub struct RedisMatchCache {
    client: redis::Client,
    connection: Option<MultiplexedConnection>,
    timeout: Duration,
    retry_delay: Duration,
    retry_at: Option<Instant>,
}

impl RedisMatchCache {
    /// Parses `url`; no connection is made yet.
    pub fn open(url: &str) -> Result<Self, CacheError> {
        Self::with_timeouts(url, DEFAULT_TIMEOUT, DEFAULT_RETRY_DELAY)
    }

    pub fn with_timeouts(
        url: &str,
        timeout: Duration,
        retry_delay: Duration,
    ) -> Result<Self, CacheError> {
        Ok(RedisMatchCache {
            client: redis::Client::open(url)?,
            connection: None,
            timeout,
            retry_delay,
            retry_at: None,
        })
    }

    async fn connection(&mut self) -> Result<MultiplexedConnection, CacheError> {
        if let Some(conn) = &self.connection {
            return Ok(conn.clone());
        }
        if self.retry_at.is_some_and(|at| Instant::now() < at) {
            return Err(CacheError::Unavailable);
        }

        let config = AsyncConnectionConfig::new()
            .set_connection_timeout(self.timeout)
            .set_response_timeout(self.timeout);
        let connecting = self
            .client
            .get_multiplexed_async_connection_with_config(&config);

        match bounded(self.timeout, connecting).await {
            Ok(conn) => {
                self.retry_at = None;
                self.connection = Some(conn.clone());
                Ok(conn)
            }
            Err(e) => {
                self.fail();
                Err(e)
            }
        }
    }

    fn fail(&mut self) {
        self.connection = None;
        self.retry_at = Some(Instant::now() + self.retry_delay);
    }

    fn key(source_id: &str) -> String {
        format!("{}{}", KEY_PREFIX, source_id)
    }
}

async fn bounded<T>(
    limit: Duration,
    operation: impl Future<Output = RedisResult<T>>,
) -> Result<T, CacheError> {
    match tokio::time::timeout(limit, operation).await {
        Ok(result) => Ok(result?),
        Err(_) => Err(CacheError::Timeout(limit)),
    }
}

#[async_trait]
impl MatchCache for RedisMatchCache {
    async fn lookup(&mut self, source_id: &str) -> Result<Option<MatchRecord>, CacheError> {
        let mut conn = self.connection().await?;
        let fields: HashMap<String, String> =
            match bounded(self.timeout, conn.hgetall(Self::key(source_id))).await {
                Ok(fields) => fields,
                Err(e) => {
                    self.fail();
                    return Err(e);
                }
            };

        record_from_fields(source_id, fields)
    }

    async fn store(&mut self, record: &MatchRecord) -> Result<(), CacheError> {
        let mut conn = self.connection().await?;
        let key = Self::key(&record.source_id);
        let fields = record_fields(record);
        let result: Result<(), CacheError> =
            bounded(self.timeout, conn.hset_multiple(key, &fields[..])).await;

        if let Err(e) = result {
            self.fail();
            return Err(e);
        }
        Ok(())
    }
}

/// In-process cache. Only deduplicates within a single run; used when the
/// persistent cache is disabled.
#[derive(Debug, Default)]
pub struct MemoryMatchCache {
    records: HashMap<String, MatchRecord>,
}

impl MemoryMatchCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl MatchCache for MemoryMatchCache {
    async fn lookup(&mut self, source_id: &str) -> Result<Option<MatchRecord>, CacheError> {
        Ok(self.records.get(source_id).cloned())
    }

    async fn store(&mut self, record: &MatchRecord) -> Result<(), CacheError> {
        self.records.insert(record.source_id.clone(), record.clone());
        Ok(())
    }
}
