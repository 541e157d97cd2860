use log::debug;

use crate::common::exception::HashTableError;
use crate::container::chained_hash_table::ChainedHashTable;

impl<K, V> ChainedHashTable<K, V> {
    /// Returns the clustering measure of this table, which tells how (not) random the key
    /// distribution is:
    ///
    /// `C = (m / (n - 1)) * (sum(x_i^2) / n - 1)`
    ///
    /// where `m` is the capacity, `n` the length and `x_i` the number of entries in
    /// bucket `i`.
    ///
    /// * around 1.0: the hash function behaves like a uniform random one;
    /// * greater than 1.0: clustering slows lookups down by roughly a factor of `C`;
    /// * less than 1.0: entries are spread more evenly than a random hash would manage;
    /// * 0.0: every occupied bucket holds exactly one entry.
    ///
    /// # Errors
    ///
    /// `InsufficientEntries` when the table holds fewer than two entries, where the
    /// measure is undefined.
    pub fn measure_clustering(&self) -> Result<f64, HashTableError> {
        if self.length < 2 {
            return Err(HashTableError::InsufficientEntries {
                length: self.length,
            });
        }

        let squares_sum: f64 = self
            .chain_lengths()
            .map(|len| (len * len) as f64)
            .sum();
        let m = self.capacity() as f64;
        let n = self.length as f64;

        let clustering = (m / (n - 1.0)) * (squares_sum / n - 1.0);
        debug!(
            "Clustering {:.4} over {} entries in {} buckets",
            clustering, self.length, m
        );
        Ok(clustering)
    }
}
