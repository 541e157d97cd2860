use crate::container::chained_hash_table::ChainedHashTable;
use crate::container::hash_function::KeyHash;

/// The key-value operations common to in-memory hash tables.
pub trait HashTable<K, V> {
    /// Inserts or overwrites `key`, returning the previous value.
    fn insert(&mut self, key: K, value: V) -> Option<V>;
    fn find(&self, key: &K) -> Option<&V>;
    fn remove(&mut self, key: &K) -> Option<V>;
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<K, V> HashTable<K, V> for ChainedHashTable<K, V>
where
    K: KeyHash + Eq,
{
    fn insert(&mut self, key: K, value: V) -> Option<V> {
        self.put(key, value)
    }

    fn find(&self, key: &K) -> Option<&V> {
        self.get(key)
    }

    fn remove(&mut self, key: &K) -> Option<V> {
        ChainedHashTable::remove(self, key)
    }

    fn len(&self) -> usize {
        self.length
    }
}
