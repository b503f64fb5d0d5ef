use redis::Commands;
use tracing::info;

use crate::error::Result;
use crate::store::{IndexStore, StoreBatch, StoreOp};

/// [`IndexStore`] backed by one logical Redis database over a synchronous
/// connection. Batches run as MULTI/EXEC transactions.
pub struct RedisStore {
    connection: redis::Connection,
}

impl RedisStore {
    /// Connect to `addr` (`host:port`) and select database `db`.
    pub fn open(addr: &str, db: i64) -> Result<Self> {
        let client = redis::Client::open(format!("redis://{}/{}", addr, db))?;
        let connection = client.get_connection()?;
        info!(addr, db, "connected to redis index store");
        Ok(RedisStore { connection })
    }
}

impl IndexStore for RedisStore {
    fn exists(&mut self, key: &str) -> Result<bool> {
        Ok(self.connection.exists(key)?)
    }

    fn get(&mut self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.connection.get(key)?)
    }

    fn set(&mut self, key: &str, value: &[u8]) -> Result<()> {
        self.connection.set::<_, _, ()>(key, value)?;
        Ok(())
    }

    fn lpush(&mut self, key: &str, value: &str) -> Result<()> {
        self.connection.lpush::<_, _, ()>(key, value)?;
        Ok(())
    }

    fn lrem(&mut self, key: &str, count: isize, value: &str) -> Result<()> {
        self.connection.lrem::<_, _, ()>(key, count, value)?;
        Ok(())
    }

    fn lrange(&mut self, key: &str, start: isize, stop: isize) -> Result<Vec<String>> {
        Ok(self.connection.lrange(key, start, stop)?)
    }

    fn exec(&mut self, batch: StoreBatch) -> Result<()> {
        if batch.is_empty() {
            return Ok(());
        }
        let mut pipe = redis::pipe();
        pipe.atomic();
        for op in batch.into_ops() {
            match op {
                StoreOp::Set { key, value } => {
                    pipe.set(key, value).ignore();
                }
                StoreOp::LPush { key, value } => {
                    pipe.lpush(key, value).ignore();
                }
                StoreOp::LRem { key, count, value } => {
                    pipe.lrem(key, count, value).ignore();
                }
            }
        }
        pipe.query::<()>(&mut self.connection)?;
        Ok(())
    }

    fn flush_all(&mut self) -> Result<()> {
        redis::cmd("FLUSHDB").query::<()>(&mut self.connection)?;
        Ok(())
    }
}
