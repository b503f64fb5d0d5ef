use std::collections::HashMap;

use crate::error::Result;
use crate::store::{IndexStore, StoreBatch, StoreOp};

/// In-process [`IndexStore`] holding string values and lists in hash maps.
/// Batches apply in order and cannot be observed half-applied, so the
/// atomicity contract holds trivially.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MemoryStore {
    pub(crate) strings: HashMap<String, Vec<u8>>,
    pub(crate) lists: HashMap<String, Vec<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }

    fn push_front(&mut self, key: String, value: String) {
        self.lists.entry(key).or_default().insert(0, value);
    }

    fn remove_occurrences(&mut self, key: &str, count: isize, value: &str) {
        let list = match self.lists.get_mut(key) {
            Some(list) => list,
            None => return,
        };
        if count == 0 {
            list.retain(|element| element != value);
        } else if count > 0 {
            let mut remaining = count;
            list.retain(|element| {
                if remaining > 0 && element == value {
                    remaining -= 1;
                    false
                } else {
                    true
                }
            });
        } else {
            let mut remaining = -count;
            for index in (0..list.len()).rev() {
                if remaining == 0 {
                    break;
                }
                if list[index] == value {
                    list.remove(index);
                    remaining -= 1;
                }
            }
        }
        if list.is_empty() {
            self.lists.remove(key);
        }
    }
}

impl IndexStore for MemoryStore {
    fn exists(&mut self, key: &str) -> Result<bool> {
        Ok(self.strings.contains_key(key) || self.lists.contains_key(key))
    }

    fn get(&mut self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.strings.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &[u8]) -> Result<()> {
        self.strings.insert(key.to_owned(), value.to_vec());
        Ok(())
    }

    fn lpush(&mut self, key: &str, value: &str) -> Result<()> {
        self.push_front(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn lrem(&mut self, key: &str, count: isize, value: &str) -> Result<()> {
        self.remove_occurrences(key, count, value);
        Ok(())
    }

    fn lrange(&mut self, key: &str, start: isize, stop: isize) -> Result<Vec<String>> {
        let list = match self.lists.get(key) {
            Some(list) => list,
            None => return Ok(Vec::new()),
        };
        let len = list.len() as isize;
        let mut start = if start < 0 { len + start } else { start };
        let mut stop = if stop < 0 { len + stop } else { stop };
        if start < 0 {
            start = 0;
        }
        if stop >= len {
            stop = len - 1;
        }
        if start > stop {
            return Ok(Vec::new());
        }
        Ok(list[start as usize..=stop as usize].to_vec())
    }

    fn exec(&mut self, batch: StoreBatch) -> Result<()> {
        for op in batch.into_ops() {
            match op {
                StoreOp::Set { key, value } => {
                    self.strings.insert(key, value);
                }
                StoreOp::LPush { key, value } => self.push_front(key, value),
                StoreOp::LRem { key, count, value } => {
                    self.remove_occurrences(&key, count, &value)
                }
            }
        }
        Ok(())
    }

    fn flush_all(&mut self) -> Result<()> {
        self.strings.clear();
        self.lists.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::MemoryStore;
    use crate::store::{IndexStore, StoreBatch};

    #[test]
    fn test_get_and_set() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get("k").unwrap(), None);
        store.set("k", b"v1").unwrap();
        store.set("k", b"v2").unwrap();
        assert_eq!(store.get("k").unwrap(), Some(b"v2".to_vec()));
        assert!(store.exists("k").unwrap());
        assert!(!store.exists("other").unwrap());
    }

    #[test]
    fn test_lpush_prepends() {
        let mut store = MemoryStore::new();
        store.lpush("l", "a").unwrap();
        store.lpush("l", "b").unwrap();
        store.lpush("l", "c").unwrap();
        assert_eq!(store.lrange("l", 0, -1).unwrap(), vec!["c", "b", "a"]);
    }

    #[test]
    fn test_lrange_bounds() {
        let mut store = MemoryStore::new();
        for value in ["d", "c", "b", "a"] {
            store.lpush("l", value).unwrap();
        }
        assert_eq!(store.lrange("l", 0, 1).unwrap(), vec!["a", "b"]);
        assert_eq!(store.lrange("l", -2, -1).unwrap(), vec!["c", "d"]);
        assert_eq!(store.lrange("l", 0, 100).unwrap(), vec!["a", "b", "c", "d"]);
        assert!(store.lrange("l", 3, 1).unwrap().is_empty());
        assert!(store.lrange("missing", 0, -1).unwrap().is_empty());
    }

    #[test]
    fn test_lrem_counts() {
        let mut store = MemoryStore::new();
        for value in ["x", "y", "x", "y", "x"] {
            store.lpush("l", value).unwrap();
        }
        // list is now [x, y, x, y, x]
        store.lrem("l", 1, "x").unwrap();
        assert_eq!(store.lrange("l", 0, -1).unwrap(), vec!["y", "x", "y", "x"]);
        store.lrem("l", -1, "x").unwrap();
        assert_eq!(store.lrange("l", 0, -1).unwrap(), vec!["y", "x", "y"]);
        store.lrem("l", 0, "y").unwrap();
        assert_eq!(store.lrange("l", 0, -1).unwrap(), vec!["x"]);
    }

    #[test]
    fn test_lrem_drops_empty_list() {
        let mut store = MemoryStore::new();
        store.lpush("l", "only").unwrap();
        store.lrem("l", 1, "only").unwrap();
        assert!(!store.exists("l").unwrap());
    }

    #[test]
    fn test_exec_applies_in_order() {
        let mut store = MemoryStore::new();
        store.lpush("l", "stale").unwrap();

        let mut batch = StoreBatch::new();
        batch.lrem("l".to_string(), 1, "stale");
        batch.lpush("l".to_string(), "fresh");
        batch.set("k".to_string(), b"v".to_vec());
        store.exec(batch).unwrap();

        assert_eq!(store.lrange("l", 0, -1).unwrap(), vec!["fresh"]);
        assert_eq!(store.get("k").unwrap(), Some(b"v".to_vec()));
    }

    #[test]
    fn test_flush_all() {
        let mut store = MemoryStore::new();
        store.set("k", b"v").unwrap();
        store.lpush("l", "a").unwrap();
        store.flush_all().unwrap();
        assert_eq!(store, MemoryStore::new());
    }
}
