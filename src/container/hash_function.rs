use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

use xxhash_rust::xxh3::{self, Xxh3};

use crate::common::config::BucketIndex;
use crate::common::exception::HashTableError;

/// A stable integer hash for keys stored in a `ChainedHashTable`.
///
/// Integer keys hash to themselves (signed values by their two's-complement bits), so
/// their bucket placement under a modulo strategy is predictable. Strings and byte
/// slices go through xxh3. Any other `Hash` type can be wrapped in [`XxHashed`].
///
/// Types that borrow as each other (`String` and `str`, `Vec<u8>` and `[u8]`) must
/// produce the same hash.
pub trait KeyHash {
    fn key_hash(&self) -> u64;
}

macro_rules! identity_key_hash {
    ($($t:ty),* $(,)?) => {
        $(
            impl KeyHash for $t {
                #[inline]
                fn key_hash(&self) -> u64 {
                    *self as u64
                }
            }
        )*
    };
}

identity_key_hash!(u8, u16, u32, u64, usize, i8, i16, i32, i64, isize, char, bool);

impl KeyHash for str {
    #[inline]
    fn key_hash(&self) -> u64 {
        xxh3::xxh3_64(self.as_bytes())
    }
}

impl KeyHash for String {
    #[inline]
    fn key_hash(&self) -> u64 {
        self.as_str().key_hash()
    }
}

impl KeyHash for [u8] {
    #[inline]
    fn key_hash(&self) -> u64 {
        xxh3::xxh3_64(self)
    }
}

impl KeyHash for Vec<u8> {
    #[inline]
    fn key_hash(&self) -> u64 {
        self.as_slice().key_hash()
    }
}

impl<T: KeyHash + ?Sized> KeyHash for &T {
    #[inline]
    fn key_hash(&self) -> u64 {
        (**self).key_hash()
    }
}

/// Represents a hash function for a given key type.
pub struct HashFunction<K: ?Sized> {
    _marker: PhantomData<fn(&K)>,
}

impl<K: ?Sized> HashFunction<K> {
    /// Creates a new `HashFunction`.
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<K: ?Sized> Default for HashFunction<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: ?Sized> Clone for HashFunction<K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K: ?Sized> Copy for HashFunction<K> {}

impl<K: Hash + ?Sized> HashFunction<K> {
    /// Returns the xxh3 hash of the given key, fed through its `Hash` impl.
    pub fn get_hash(&self, key: &K) -> u64 {
        let mut hasher = Xxh3::new();
        key.hash(&mut hasher);
        hasher.finish()
    }
}

/// Adapts any `Hash + Eq` type into a table key by hashing it with [`HashFunction`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct XxHashed<K>(pub K);

impl<K: Hash> KeyHash for XxHashed<K> {
    #[inline]
    fn key_hash(&self) -> u64 {
        HashFunction::<K>::new().get_hash(&self.0)
    }
}

/// Maps a key hash to a bucket index in `[0, capacity)`.
///
/// The table passes its capacity on every call, so a strategy that depends on it
/// always sees the post-resize value.
///
/// Replacing the strategy of a non-empty table leaves existing entries where the old
/// strategy put them. Lookups for those keys may then miss; callers swap strategies
/// only while the table is empty.
pub trait BucketStrategy: Send + Sync {
    fn bucket_index(&self, hash: u64, capacity: usize) -> BucketIndex;
}

/// The default strategy: `hash mod capacity`, using the table's live capacity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CapacityModulo;

impl BucketStrategy for CapacityModulo {
    #[inline]
    fn bucket_index(&self, hash: u64, capacity: usize) -> BucketIndex {
        (hash % capacity as u64) as BucketIndex
    }
}

/// `hash mod modulus` for a modulus fixed at construction, independent of capacity.
///
/// A modulus larger than the table's capacity yields out-of-range indices; keep it at
/// or below the smallest capacity the table will have.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedModulo {
    modulus: u64,
}

impl FixedModulo {
    pub fn new(modulus: u64) -> Result<Self, HashTableError> {
        if modulus == 0 {
            return Err(HashTableError::InvalidModulus(modulus));
        }
        Ok(Self { modulus })
    }

    pub fn modulus(&self) -> u64 {
        self.modulus
    }
}

impl BucketStrategy for FixedModulo {
    #[inline]
    fn bucket_index(&self, hash: u64, _capacity: usize) -> BucketIndex {
        (hash % self.modulus) as BucketIndex
    }
}

impl<F> BucketStrategy for F
where
    F: Fn(u64, usize) -> BucketIndex + Send + Sync,
{
    #[inline]
    fn bucket_index(&self, hash: u64, capacity: usize) -> BucketIndex {
        self(hash, capacity)
    }
}

impl fmt::Debug for dyn BucketStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BucketStrategy")
    }
}
