mod chain;
pub mod chained_hash_table;
mod clustering;
pub mod hash_function;
pub mod hash_table;
mod resize;
