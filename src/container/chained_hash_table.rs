use std::borrow::Borrow;
use std::fmt;
use std::mem;

use log::{debug, trace, warn};

use crate::common::config::{
    BucketIndex, NodeId, TableConfig, DEFAULT_CAPACITY, DEFAULT_LOAD_FACTOR,
};
use crate::common::exception::HashTableError;
use crate::container::chain::{ChainNode, NodeArena};
use crate::container::hash_function::{BucketStrategy, CapacityModulo, KeyHash};

/// Outcome of placing a node into a bucket array.
#[derive(Debug)]
pub(crate) enum Placement<V> {
    /// The node was linked into its chain.
    Created,
    /// A node with the same key was already present; it now holds the new value and
    /// the incoming node was released.
    Updated(V),
}

/// A hash table that resolves collisions by separate chaining.
///
/// Each bucket holds the head of a singly linked chain of key/value nodes. New keys are
/// appended at the tail of their chain. When a put would push `len / capacity` above
/// the load factor, the bucket count is doubled first and every node is relinked into
/// the new bucket array (see [`ChainedHashTable::resize_to_load_factor`]).
///
/// Bucket indices come from a [`BucketStrategy`]; the default is
/// [`CapacityModulo`], i.e. `key_hash mod capacity`.
pub struct ChainedHashTable<K, V> {
    /// Chain heads; `buckets.len()` is the capacity and is never zero.
    pub(crate) buckets: Vec<Option<NodeId>>,
    pub(crate) nodes: NodeArena<K, V>,
    pub(crate) length: usize,
    load_factor: f64,
    pub(crate) hash_fn: Box<dyn BucketStrategy>,
}

impl<K, V> ChainedHashTable<K, V> {
    /// Creates an empty table with 16 buckets and a maximum load factor of 0.75.
    pub fn new() -> Self {
        Self::build(DEFAULT_CAPACITY, DEFAULT_LOAD_FACTOR)
    }

    /// Creates an empty table with `initial_capacity` buckets and a maximum load factor
    /// of 0.75.
    pub fn with_capacity(initial_capacity: usize) -> Result<Self, HashTableError> {
        Self::with_capacity_and_load_factor(initial_capacity, DEFAULT_LOAD_FACTOR)
    }

    /// Creates an empty table with the given bucket count and maximum load factor.
    ///
    /// # Errors
    ///
    /// `InvalidCapacity` for zero buckets, `InvalidLoadFactor` if `load_factor` is not
    /// a finite positive number.
    pub fn with_capacity_and_load_factor(
        initial_capacity: usize,
        load_factor: f64,
    ) -> Result<Self, HashTableError> {
        Self::from_config(&TableConfig::new(initial_capacity, load_factor))
    }

    pub fn from_config(config: &TableConfig) -> Result<Self, HashTableError> {
        config.validate()?;
        Ok(Self::build(config.initial_capacity, config.load_factor))
    }

    fn build(capacity: usize, load_factor: f64) -> Self {
        debug!(
            "Creating chained hash table with {} buckets and load factor {}",
            capacity, load_factor
        );
        Self {
            buckets: vec![None; capacity],
            nodes: NodeArena::new(),
            length: 0,
            load_factor,
            hash_fn: Box::new(CapacityModulo),
        }
    }

    /// Returns the number of key-value pairs in the table.
    #[inline]
    pub fn len(&self) -> usize {
        self.length
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Returns the number of buckets.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    /// Returns the maximum load factor this table grows to keep.
    #[inline]
    pub fn load_factor(&self) -> f64 {
        self.load_factor
    }

    /// Returns the active bucket strategy.
    pub fn hash_function(&self) -> &dyn BucketStrategy {
        &*self.hash_fn
    }

    /// Replaces the bucket strategy.
    ///
    /// Entries already stored are not rehashed. Only swap strategies on an empty table,
    /// otherwise lookups for existing keys may probe the wrong bucket.
    pub fn set_hash_function<S>(&mut self, hash_fn: S)
    where
        S: BucketStrategy + 'static,
    {
        if !self.is_empty() {
            warn!(
                "Replacing the hash function of a table holding {} entries; existing placements are not rehashed",
                self.length
            );
        }
        self.hash_fn = Box::new(hash_fn);
    }

    /// Removes every entry, keeping the current capacity.
    pub fn clear(&mut self) {
        self.buckets.iter_mut().for_each(|head| *head = None);
        self.nodes.clear();
        self.length = 0;
    }

    /// Number of nodes in each bucket, in bucket order.
    pub(crate) fn chain_lengths(&self) -> impl Iterator<Item = usize> + '_ {
        self.buckets
            .iter()
            .map(move |&head| self.nodes.chain(head).count())
    }

    /// Resolves a hash to a bucket of an array with `capacity` slots.
    ///
    /// An index outside the array is a broken strategy; it is folded back into range
    /// so the table stays usable.
    pub(crate) fn locate(strategy: &dyn BucketStrategy, hash: u64, capacity: usize) -> BucketIndex {
        let index = strategy.bucket_index(hash, capacity);
        if index < capacity {
            index
        } else {
            warn!(
                "Hash function returned bucket {} for capacity {}, wrapping",
                index, capacity
            );
            index % capacity
        }
    }
}

impl<K, V> ChainedHashTable<K, V>
where
    K: KeyHash + Eq,
{
    /// Puts a new key-value pair into this table.
    ///
    /// If the key already exists only its value is replaced, and the previous value is
    /// returned. If adding would exceed the maximum load factor the capacity is doubled
    /// before the key is placed.
    pub fn put(&mut self, key: K, value: V) -> Option<V> {
        if (self.length + 1) as f64 / self.capacity() as f64 > self.load_factor {
            self.expand();
        }

        let id = self.nodes.alloc(ChainNode::new(key, value));
        match Self::link_node(&*self.hash_fn, &mut self.nodes, &mut self.buckets, id) {
            Placement::Created => {
                self.length += 1;
                trace!("Created entry, length now {}", self.length);
                None
            }
            Placement::Updated(previous) => {
                trace!("Updated existing entry");
                Some(previous)
            }
        }
    }

    /// Returns a reference to the value stored for `key`.
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: KeyHash + Eq + ?Sized,
    {
        self.find_node(key).map(|id| &self.nodes[id].value)
    }

    /// Returns a mutable reference to the value stored for `key`.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: KeyHash + Eq + ?Sized,
    {
        let id = self.find_node(key)?;
        Some(&mut self.nodes[id].value)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: KeyHash + Eq + ?Sized,
    {
        self.find_node(key).is_some()
    }

    /// Removes `key` from the table, returning its value if it was present.
    ///
    /// A missing key leaves the table untouched.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: KeyHash + Eq + ?Sized,
    {
        let index = self.bucket_index(key);
        let head = self.buckets[index]?;

        if key_eq(&self.nodes[head].key, key) {
            self.buckets[index] = self.nodes[head].next;
            self.length -= 1;
            return Some(self.nodes.take(head).value);
        }

        let mut prev = head;
        while let Some(current) = self.nodes[prev].next {
            if key_eq(&self.nodes[current].key, key) {
                self.nodes[prev].next = self.nodes[current].next;
                self.length -= 1;
                return Some(self.nodes.take(current).value);
            }
            prev = current;
        }

        None
    }

    /// Checks the bookkeeping of the table: the length matches the nodes reachable from
    /// the buckets and the arena, every node sits in the bucket its key hashes to, and
    /// no chain holds a key twice. Violations are logged.
    pub fn verify_integrity(&self) -> bool {
        let capacity = self.capacity();
        let mut reachable = 0;
        let mut intact = true;

        for (index, &head) in self.buckets.iter().enumerate() {
            let chain: Vec<_> = self.nodes.chain(head).collect();
            for (position, (id, node)) in chain.iter().enumerate() {
                let expected = Self::locate(&*self.hash_fn, node.key.key_hash(), capacity);
                if expected != index {
                    warn!(
                        "Node {} is in bucket {} but hashes to bucket {}",
                        id, index, expected
                    );
                    intact = false;
                }
                if chain[..position].iter().any(|(_, other)| other.key == node.key) {
                    warn!("Bucket {} holds a duplicate key at node {}", index, id);
                    intact = false;
                }
            }
            reachable += chain.len();
        }

        if reachable != self.length || self.nodes.live() != self.length {
            warn!(
                "Length {} disagrees with {} reachable and {} stored nodes",
                self.length,
                reachable,
                self.nodes.live()
            );
            intact = false;
        }

        intact
    }

    fn bucket_index<Q>(&self, key: &Q) -> BucketIndex
    where
        Q: KeyHash + ?Sized,
    {
        Self::locate(&*self.hash_fn, key.key_hash(), self.capacity())
    }

    pub(crate) fn find_node<Q>(&self, key: &Q) -> Option<NodeId>
    where
        K: Borrow<Q>,
        Q: KeyHash + Eq + ?Sized,
    {
        let head = self.buckets[self.bucket_index(key)];
        self.nodes
            .chain(head)
            .find(|(_, node)| key_eq(&node.key, key))
            .map(|(id, _)| id)
    }

    /// Places node `id` into `buckets`, keyed by `buckets.len()` as the capacity.
    ///
    /// Shared by `put` and rehashing. The node's successor link is cleared and the node
    /// is appended at the tail of its chain. If the chain already holds the key, the
    /// existing node takes the incoming value and the incoming node is released.
    pub(crate) fn link_node(
        strategy: &dyn BucketStrategy,
        nodes: &mut NodeArena<K, V>,
        buckets: &mut [Option<NodeId>],
        id: NodeId,
    ) -> Placement<V> {
        nodes[id].next = None;
        let index = Self::locate(strategy, nodes[id].key.key_hash(), buckets.len());

        let Some(mut tail) = buckets[index] else {
            buckets[index] = Some(id);
            return Placement::Created;
        };

        loop {
            if nodes[tail].key == nodes[id].key {
                let incoming = nodes.take(id);
                return Placement::Updated(mem::replace(&mut nodes[tail].value, incoming.value));
            }
            match nodes[tail].next {
                Some(next) => tail = next,
                None => break,
            }
        }

        nodes[tail].next = Some(id);
        Placement::Created
    }
}

#[inline]
fn key_eq<K, Q>(stored: &K, key: &Q) -> bool
where
    K: Borrow<Q>,
    Q: Eq + ?Sized,
{
    let stored: &Q = stored.borrow();
    stored == key
}

impl<K, V> Default for ChainedHashTable<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> fmt::Debug for ChainedHashTable<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChainedHashTable")
            .field("length", &self.length)
            .field("capacity", &self.capacity())
            .field("load_factor", &self.load_factor)
            .finish()
    }
}
