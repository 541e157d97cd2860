use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::common::exception::HashTableError;

/** Number of buckets a table starts with when no capacity is given. */
pub const DEFAULT_CAPACITY: usize = 16;

/** Largest length/capacity ratio a put may reach before the table doubles. */
pub const DEFAULT_LOAD_FACTOR: f64 = 0.75;

pub type NodeId = usize; // arena slot of a chain node
pub type BucketIndex = usize; // slot in the bucket array

/// Construction parameters for a `ChainedHashTable`.
///
/// Missing fields fall back to [`DEFAULT_CAPACITY`] and [`DEFAULT_LOAD_FACTOR`] when
/// deserialized, so a config file only needs the knobs it changes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    pub initial_capacity: usize,
    pub load_factor: f64,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_CAPACITY,
            load_factor: DEFAULT_LOAD_FACTOR,
        }
    }
}

impl TableConfig {
    pub fn new(initial_capacity: usize, load_factor: f64) -> Self {
        Self {
            initial_capacity,
            load_factor,
        }
    }

    /// Reads a TOML table config from `path` and validates it.
    pub fn load(path: &Path) -> Result<Self, HashTableError> {
        let contents = fs::read_to_string(path)
            .map_err(|e| HashTableError::ConfigLoad(format!("{}: {}", path.display(), e)))?;
        let config: TableConfig =
            toml::from_str(&contents).map_err(|e| HashTableError::ConfigLoad(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that the capacity is non-zero and the load factor usable.
    pub fn validate(&self) -> Result<(), HashTableError> {
        if self.initial_capacity == 0 {
            return Err(HashTableError::InvalidCapacity(self.initial_capacity));
        }
        check_load_factor(self.load_factor)?;
        Ok(())
    }
}

/// Accepts only finite, strictly positive load factors.
pub(crate) fn check_load_factor(load_factor: f64) -> Result<f64, HashTableError> {
    if load_factor.is_finite() && load_factor > 0.0 {
        Ok(load_factor)
    } else {
        Err(HashTableError::InvalidLoadFactor(load_factor))
    }
}
