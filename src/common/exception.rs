use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum HashTableError {
    #[error("Illegal load factor: {0}")]
    InvalidLoadFactor(f64),
    #[error("Illegal capacity: {0}, a table needs at least one bucket")]
    InvalidCapacity(usize),
    #[error("Cannot allocate {0} buckets")]
    CapacityOverflow(f64),
    #[error("Illegal modulus: {0}")]
    InvalidModulus(u64),
    #[error("Clustering is undefined for {length} entries, at least two are required")]
    InsufficientEntries { length: usize },
    #[error("Failed to load table config: {0}")]
    ConfigLoad(String),
}
