mod memory;
mod redis_store;

pub use self::memory::MemoryStore;
pub use self::redis_store::RedisStore;

use crate::error::Result;

/// One mutation inside a [`StoreBatch`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoreOp {
    Set { key: String, value: Vec<u8> },
    LPush { key: String, value: String },
    LRem { key: String, count: isize, value: String },
}

/// An ordered list of mutations committed atomically by
/// [`IndexStore::exec`]. Either every op takes effect or none does.
#[derive(Debug, Default)]
pub struct StoreBatch {
    ops: Vec<StoreOp>,
}

impl StoreBatch {
    pub fn new() -> Self {
        StoreBatch::default()
    }

    pub fn set(&mut self, key: String, value: Vec<u8>) {
        self.ops.push(StoreOp::Set { key, value });
    }

    pub fn lpush(&mut self, key: String, value: &str) {
        self.ops.push(StoreOp::LPush {
            key,
            value: value.to_owned(),
        });
    }

    pub fn lrem(&mut self, key: String, count: isize, value: &str) {
        self.ops.push(StoreOp::LRem {
            key,
            count,
            value: value.to_owned(),
        });
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn into_ops(self) -> Vec<StoreOp> {
        self.ops
    }
}

/// Contract over the external key-value service holding signatures and
/// posting lists. Any backend offering string values, lists and atomic
/// batches plugs in here; only implementations of this trait talk to the
/// backend.
pub trait IndexStore {
    fn exists(&mut self, key: &str) -> Result<bool>;

    /// `None` when the key does not exist.
    fn get(&mut self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Unconditional overwrite.
    fn set(&mut self, key: &str, value: &[u8]) -> Result<()>;

    /// Prepend to the list at `key`, creating it if absent.
    fn lpush(&mut self, key: &str, value: &str) -> Result<()>;

    /// Remove occurrences of `value`: the first `count` from the head when
    /// `count > 0`, the first `|count|` from the tail when `count < 0`,
    /// all of them when `count == 0`.
    fn lrem(&mut self, key: &str, count: isize, value: &str) -> Result<()>;

    /// Inclusive range; negative indices count from the end, `-1` being
    /// the last element. Missing keys yield an empty list.
    fn lrange(&mut self, key: &str, start: isize, stop: isize) -> Result<Vec<String>>;

    /// Commit a batch atomically.
    fn exec(&mut self, batch: StoreBatch) -> Result<()>;

    /// Erase every key in the logical database.
    fn flush_all(&mut self) -> Result<()>;
}
