use std::{mem, vec};

use log::{debug, warn};

use crate::common::config::{check_load_factor, NodeId};
use crate::common::exception::HashTableError;
use crate::container::chained_hash_table::{ChainedHashTable, Placement};
use crate::container::hash_function::KeyHash;

/// Largest bucket array whose size in bytes fits in an `isize`.
pub(crate) const MAX_BUCKETS: usize = isize::MAX as usize / mem::size_of::<Option<NodeId>>();

impl<K, V> ChainedHashTable<K, V>
where
    K: KeyHash + Eq,
{
    /// Resizes the table to the smallest capacity whose load factor does not exceed
    /// `target`, i.e. `ceil(len / target)` buckets (at least one).
    ///
    /// Grows a dense table or compacts a sparse one. Every stored pair stays
    /// retrievable with the same value. Released node slots at the end of the arena
    /// are handed back as well.
    ///
    /// # Errors
    ///
    /// `InvalidLoadFactor` if `target` is not a finite positive number, and
    /// `CapacityOverflow` if the bucket array for `target` cannot be allocated. The
    /// table is left unchanged in both cases.
    pub fn resize_to_load_factor(&mut self, target: f64) -> Result<(), HashTableError> {
        let target = check_load_factor(target)?;
        let wanted = (self.length as f64 / target).ceil().max(1.0);
        if wanted > MAX_BUCKETS as f64 {
            return Err(HashTableError::CapacityOverflow(wanted));
        }
        let new_capacity = wanted as usize;

        debug!(
            "Resizing to load factor {}: {} -> {} buckets",
            target,
            self.capacity(),
            new_capacity
        );
        self.rehash(new_capacity)?;
        self.nodes.trim();
        Ok(())
    }

    /// Doubles the number of buckets. Called by `put` before the load factor would be
    /// exceeded.
    ///
    /// A tiny table with a small load factor may need more than one doubling for the
    /// pending entry to fit; all of them happen in a single rehash. If the bucket array
    /// cannot be allocated the table keeps its capacity and runs above its load factor.
    pub(crate) fn expand(&mut self) {
        let needed = (self.length + 1) as f64;
        let mut new_capacity = self.capacity().saturating_mul(2).min(MAX_BUCKETS);
        while needed / new_capacity as f64 > self.load_factor() && new_capacity < MAX_BUCKETS {
            new_capacity = new_capacity.saturating_mul(2).min(MAX_BUCKETS);
        }
        debug!(
            "Expanding from {} to {} buckets at length {}",
            self.capacity(),
            new_capacity,
            self.length
        );
        if let Err(err) = self.rehash(new_capacity) {
            warn!("{}, keeping {} buckets", err, self.capacity());
        }
    }

    /// Moves every node into a fresh bucket array of `new_capacity` slots.
    ///
    /// Nodes stay in their arena slots; only successor links and chain heads are
    /// rewritten, so the extra memory is the new bucket array alone.
    ///
    /// If the hash function panics part way through, the new array is still installed
    /// and the nodes not yet relinked are released, leaving a smaller but consistent
    /// table.
    pub(crate) fn rehash(&mut self, new_capacity: usize) -> Result<(), HashTableError> {
        let new_buckets = allocate_buckets(new_capacity)?;
        let old_buckets = mem::take(&mut self.buckets);
        let mut relink = Relink {
            table: self,
            new_buckets,
            old_heads: old_buckets.into_iter(),
            cursor: None,
            in_flight: None,
        };

        while let Some(id) = relink.detach() {
            let placement = Self::link_node(
                &*relink.table.hash_fn,
                &mut relink.table.nodes,
                &mut relink.new_buckets,
                id,
            );
            relink.in_flight = None;
            debug_assert!(
                matches!(placement, Placement::Created),
                "rehash met a duplicate key"
            );
        }

        Ok(())
    }
}

fn allocate_buckets(capacity: usize) -> Result<Vec<Option<NodeId>>, HashTableError> {
    let mut buckets = Vec::new();
    if capacity > MAX_BUCKETS || buckets.try_reserve_exact(capacity).is_err() {
        return Err(HashTableError::CapacityOverflow(capacity as f64));
    }
    buckets.resize(capacity, None);
    Ok(buckets)
}

/// Chains detached from the old bucket array during a rehash.
///
/// Dropping it installs the new bucket array. Nodes it still holds at that point were
/// never relinked and are released from the table.
struct Relink<'a, K, V> {
    table: &'a mut ChainedHashTable<K, V>,
    new_buckets: Vec<Option<NodeId>>,
    old_heads: vec::IntoIter<Option<NodeId>>,
    /// Rest of the old chain being walked.
    cursor: Option<NodeId>,
    /// Node handed out by `detach` and not yet linked.
    in_flight: Option<NodeId>,
}

impl<K, V> Relink<'_, K, V> {
    fn detach(&mut self) -> Option<NodeId> {
        while self.cursor.is_none() {
            self.cursor = self.old_heads.next()?;
        }
        let id = self.cursor?;
        // link_node clears the successor, read it first
        self.cursor = self.table.nodes[id].next;
        self.in_flight = Some(id);
        Some(id)
    }

    fn release_chain(&mut self, head: Option<NodeId>) -> usize {
        let mut released = 0;
        let mut cursor = head;
        while let Some(id) = cursor {
            cursor = self.table.nodes.take(id).next;
            released += 1;
        }
        released
    }
}

impl<K, V> Drop for Relink<'_, K, V> {
    fn drop(&mut self) {
        let mut released = 0;
        if let Some(id) = self.in_flight.take() {
            self.table.nodes.take(id);
            released += 1;
        }
        let cursor = self.cursor.take();
        released += self.release_chain(cursor);
        while let Some(head) = self.old_heads.next() {
            released += self.release_chain(head);
        }

        self.table.buckets = mem::take(&mut self.new_buckets);
        if released > 0 {
            self.table.length -= released;
            warn!(
                "Rehash to {} buckets was interrupted, released {} entries",
                self.table.capacity(),
                released
            );
        }
    }
}
