use std::collections::HashMap;

use ahash::AHashMap;
use itertools::Itertools;
use tracing::debug;

use crate::error::{Error, Result};
use crate::minhash::StreamingMinHasher;
use crate::store::{IndexStore, RedisStore, StoreBatch};

/// Key prefix for stored signatures: `MIN:<subject>`.
const SIGNATURE_PREFIX: &str = "MIN:";
/// Key prefix for posting lists: `SEC:<position>-<value>`.
const POSTING_PREFIX: &str = "SEC:";

fn signature_key(subject: &str) -> String {
    format!("{}{}", SIGNATURE_PREFIX, subject)
}

fn posting_key(position: usize, value: u64) -> String {
    format!("{}{}-{}", POSTING_PREFIX, position, value)
}

/// Connection and hashing parameters for a Redis-backed cluster.
#[derive(Clone, Debug)]
pub struct ClusterConfig {
    /// Store endpoint, `host:port`.
    pub addr: String,
    /// Logical Redis database holding the index.
    pub db: i64,
    /// Signature length. Fixed for the lifetime of the index.
    pub num_hashes: usize,
    /// Seed for the hash family. Must match across every writer and
    /// reader of the same index database.
    pub seed: u64,
    /// Batch-size knob kept for configuration compatibility with existing
    /// deployments; not consulted.
    pub load_data_per: u16,
}

/// One ranked query result: a subject and the number of signature
/// positions on which it collides with the queried subject.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Neighbor {
    pub subject: String,
    pub count: usize,
}

/// Incremental MinHash similarity index over an [`IndexStore`].
///
/// Signatures are the source of truth, stored under `MIN:<subject>` as
/// JSON arrays of 64-bit values. The secondary index under
/// `SEC:<position>-<value>` lists every subject whose signature holds
/// `value` at `position`; the two representations are kept consistent by
/// committing each subject's posting edits and signature overwrite as one
/// atomic batch.
///
/// The coordinator holds no index state in memory between calls, so any
/// number of readers may share a database with a writer. Concurrent
/// writers for the *same* subject are not serialized here; callers must
/// do that themselves.
pub struct MinHashCluster<S> {
    store: S,
    num_hashes: usize,
    seed: u64,
}

impl MinHashCluster<RedisStore> {
    /// Connect to the Redis database named by `config`.
    pub fn connect(config: &ClusterConfig) -> Result<Self> {
        let store = RedisStore::open(&config.addr, config.db)?;
        Ok(MinHashCluster::new(store, config.num_hashes, config.seed))
    }
}

impl<S: IndexStore> MinHashCluster<S> {
    pub fn new(store: S, num_hashes: usize, seed: u64) -> Self {
        MinHashCluster {
            store,
            num_hashes,
            seed,
        }
    }

    pub fn num_hashes(&self) -> usize {
        self.num_hashes
    }

    /// Erase the entire logical database, resetting the index.
    pub fn flush(&mut self) -> Result<()> {
        debug!("flushing index database");
        self.store.flush_all()
    }

    /// Insert new subjects and extend known ones.
    ///
    /// Subjects without a stored signature are inserted fresh; subjects
    /// with one have the new tokens folded into it, and only the changed
    /// positions are rewritten in the secondary index. Each subject
    /// commits independently: an error aborts the call before the failing
    /// subject is touched, and subjects already processed keep their
    /// committed state.
    pub fn update_cluster(&mut self, batch: &HashMap<String, Vec<String>>) -> Result<()> {
        for (subject, tokens) in batch {
            if self.store.exists(&signature_key(subject))? {
                self.extend_subject(subject, tokens)?;
            } else {
                let signature = build_signature(self.seed, self.num_hashes, tokens);
                self.insert_subject(subject, &signature)?;
            }
        }
        Ok(())
    }

    /// Rank the subjects most similar to `subject` by collision count and
    /// return up to `top` of them, nearest first. The collision count is
    /// the number of signature positions shared with the queried subject,
    /// an estimator of `num_hashes × Jaccard`.
    pub fn most_common(&mut self, subject: &str, top: usize) -> Result<Vec<Neighbor>> {
        let signature = self.load_signature(subject)?;

        let mut counts: AHashMap<String, usize> = AHashMap::new();
        for (position, value) in signature.iter().enumerate() {
            for colliding in self.store.lrange(&posting_key(position, *value), 0, -1)? {
                *counts.entry(colliding).or_insert(0) += 1;
            }
        }

        let ranked: Vec<Neighbor> = counts
            .into_iter()
            .sorted_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)))
            .map(|(subject, count)| Neighbor { subject, count })
            .collect();

        // The leading entry is the queried subject matching itself on
        // every position.
        if ranked.len() < 2 {
            return Ok(Vec::new());
        }
        let end = usize::min(ranked.len(), top.saturating_add(1));
        Ok(ranked[1..end].to_vec())
    }

    fn insert_subject(&mut self, subject: &str, signature: &[u64]) -> Result<()> {
        let mut batch = StoreBatch::new();
        batch.set(signature_key(subject), serde_json::to_vec(signature)?);
        for (position, value) in signature.iter().enumerate() {
            batch.lpush(posting_key(position, *value), subject);
        }
        debug!(subject, "inserting subject");
        self.store.exec(batch)
    }

    fn extend_subject(&mut self, subject: &str, tokens: &[String]) -> Result<()> {
        let old = self.load_signature(subject)?;
        let mut minhash = StreamingMinHasher::from_signature(self.seed, old.clone());
        for token in tokens {
            minhash.push(token.as_bytes());
        }
        let new = minhash.into_signature();

        let mut batch = StoreBatch::new();
        let mut changed = 0;
        for (position, (old_value, new_value)) in old.iter().zip(new.iter()).enumerate() {
            if old_value != new_value {
                batch.lrem(posting_key(position, *old_value), 1, subject);
                batch.lpush(posting_key(position, *new_value), subject);
                changed += 1;
            }
        }
        batch.set(signature_key(subject), serde_json::to_vec(&new)?);
        debug!(subject, changed, "extending subject");
        self.store.exec(batch)
    }

    fn load_signature(&mut self, subject: &str) -> Result<Vec<u64>> {
        let raw = self
            .store
            .get(&signature_key(subject))?
            .ok_or_else(|| Error::UnknownSubject(subject.to_owned()))?;
        let signature: Vec<u64> =
            serde_json::from_slice(&raw).map_err(|err| Error::CorruptSignature {
                subject: subject.to_owned(),
                detail: err.to_string(),
            })?;
        if signature.len() != self.num_hashes {
            return Err(Error::CorruptSignature {
                subject: subject.to_owned(),
                detail: format!(
                    "expected {} hash values, found {}",
                    self.num_hashes,
                    signature.len()
                ),
            });
        }
        Ok(signature)
    }
}

fn build_signature(seed: u64, num_hashes: usize, tokens: &[String]) -> Vec<u64> {
    let mut minhash = StreamingMinHasher::new(seed, num_hashes);
    for token in tokens {
        minhash.push(token.as_bytes());
    }
    minhash.into_signature()
}
