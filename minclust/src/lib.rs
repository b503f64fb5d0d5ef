/*!
This library implements an incremental [MinHash](https://en.wikipedia.org/wiki/MinHash)
similarity index over an external key-value store.

Every subject is summarized by a fixed-length signature of 64-bit minima.
Signatures are streaming and mergeable: a subject's token set can be extended
at any time without rebuilding the index. A secondary index keyed by
(signature position, hash value) turns neighbor lookup into a collision
tally, which estimates Jaccard similarity between token sets.

The store behind the index is pluggable. [`store::RedisStore`] talks to a
Redis database; [`store::MemoryStore`] keeps everything in process and is
what the examples and tests use.

## Example

 ```
 use minclust::cluster::MinHashCluster;
 use minclust::store::MemoryStore;
 use std::collections::HashMap;

 let mut cluster = MinHashCluster::new(MemoryStore::new(), 128, 1);
 let mut batch = HashMap::new();
 batch.insert("doc-a".to_string(),
              vec!["rust".to_string(), "hashing".to_string()]);
 batch.insert("doc-b".to_string(),
              vec!["rust".to_string(), "hashing".to_string(), "redis".to_string()]);
 cluster.update_cluster(&batch).unwrap();

 let neighbors = cluster.most_common("doc-a", 5).unwrap();
 assert_eq!(neighbors[0].subject, "doc-b");
 assert!(neighbors[0].count > 0);
 ```

## References
[[1] Chapter 3, Mining of Massive Datasets](http://www.mmds.org)

[[2] Broder, On the resemblance and containment of documents](https://ieeexplore.ieee.org/document/666900)

 */

pub mod cluster;
pub mod error;
pub mod minhash;
pub mod store;

pub use crate::cluster::{ClusterConfig, MinHashCluster, Neighbor};
pub use crate::error::{Error, Result};
