pub mod common;
pub mod container;

pub use common::config::TableConfig;
pub use common::exception::HashTableError;
pub use container::chained_hash_table::ChainedHashTable;
