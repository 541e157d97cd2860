use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::thread;

use chaintable::container::hash_table::HashTable;
use chaintable::{ChainedHashTable, HashTableError};

use crate::common::logger::init_test_logger;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collision_scenario() {
        init_test_logger();
        let mut table = assert_ok!(ChainedHashTable::with_capacity_and_load_factor(4, 0.75));

        table.put(1u32, "a");
        table.put(5, "b"); // collides with 1 under mod 4
        table.put(2, "c");
        assert_eq!(table.len(), 3);
        assert_eq!(table.capacity(), 4);

        table.put(9, "d"); // collides with 1 and 5
        assert_eq!(table.capacity(), 8);
        assert_eq!(table.len(), 4);
        assert_eq!(table.get(&5), Some(&"b"));
        assert_eq!(table.get(&9), Some(&"d"));
        assert_eq!(table.get(&1), Some(&"a"));
        assert_eq!(table.get(&2), Some(&"c"));
        assert!(table.verify_integrity());
    }

    #[test]
    fn test_invalid_load_factor() {
        let err = assert_err!(ChainedHashTable::<u32, u32>::with_capacity_and_load_factor(8, -0.1));
        assert_eq!(err, HashTableError::InvalidLoadFactor(-0.1));
        assert_eq!(err.to_string(), "Illegal load factor: -0.1");
    }

    #[test]
    fn test_insert_get_remove_many() {
        init_test_logger();
        let mut table = ChainedHashTable::new();
        let num_keys = 10_000u64;

        for i in 0..num_keys {
            assert_eq!(table.put(i, i * 10), None);
        }
        assert_eq!(table.len(), num_keys as usize);
        assert!(table.verify_integrity());

        for i in 0..num_keys {
            assert_eq!(table.get(&i), Some(&(i * 10)), "Missing key {}", i);
        }
        for i in num_keys..2 * num_keys {
            assert_eq!(table.get(&i), None);
        }

        for i in (0..num_keys).step_by(2) {
            assert_eq!(table.remove(&i), Some(i * 10));
        }
        assert_eq!(table.len(), (num_keys / 2) as usize);
        for i in 0..num_keys {
            assert_eq!(table.contains_key(&i), i % 2 == 1);
        }
        assert!(table.verify_integrity());
    }

    #[test]
    fn test_load_factor_holds_after_every_put() {
        let mut table = ChainedHashTable::with_capacity_and_load_factor(1, 0.5).unwrap();

        for i in 0u32..2_000 {
            table.put(i, ());
            let ratio = table.len() as f64 / table.capacity() as f64;
            assert!(
                ratio <= table.load_factor(),
                "load {} exceeds {} after {} puts",
                ratio,
                table.load_factor(),
                i + 1
            );
        }
    }

    #[test]
    fn test_remove_absent_key_changes_nothing() {
        let mut table = ChainedHashTable::with_capacity(8).unwrap();
        for key in [3u32, 11, 19, 4] {
            table.put(key, key);
        }
        let capacity = table.capacity();

        // 27 shares a bucket with 3, 11 and 19
        assert_eq!(table.remove(&27), None);
        assert_eq!(table.remove(&5), None);

        assert_eq!(table.len(), 4);
        assert_eq!(table.capacity(), capacity);
        for key in [3u32, 11, 19, 4] {
            assert_eq!(table.get(&key), Some(&key));
        }
        assert!(table.verify_integrity());
    }

    #[test]
    fn test_matches_std_hashmap_under_random_operations() {
        init_test_logger();
        let mut rng = fastrand::Rng::with_seed(0x5eed);
        let mut table = ChainedHashTable::with_capacity_and_load_factor(2, 1.5).unwrap();
        let mut model = HashMap::new();

        for step in 0..20_000 {
            let key = rng.u64(0..600);
            match rng.u8(0..10) {
                0..=5 => {
                    let value = rng.u64(..);
                    assert_eq!(table.put(key, value), model.insert(key, value));
                }
                6..=8 => assert_eq!(table.remove(&key), model.remove(&key)),
                _ => {
                    let target = 0.25 + rng.f64() * 3.0;
                    table.resize_to_load_factor(target).unwrap();
                }
            }

            assert_eq!(table.len(), model.len(), "length diverged at step {}", step);
            if step % 1_000 == 0 {
                assert!(table.verify_integrity(), "integrity broken at step {}", step);
            }
        }

        for (key, value) in &model {
            assert_eq!(table.get(key), Some(value));
        }
        assert!(table.verify_integrity());
    }

    #[test]
    fn test_string_values_survive_growth() {
        let mut table = ChainedHashTable::with_capacity(2).unwrap();
        for i in 0..500 {
            table.put(format!("key_{}", i), format!("value_{}", i));
        }
        assert_eq!(table.len(), 500);
        for i in 0..500 {
            let expected = format!("value_{}", i);
            assert_eq!(table.get(format!("key_{}", i).as_str()), Some(&expected));
        }
    }

    #[test]
    fn test_through_hash_table_trait() {
        fn exercise<T: HashTable<u32, &'static str>>(table: &mut T) {
            assert!(table.is_empty());
            assert_eq!(table.insert(1, "one"), None);
            assert_eq!(table.insert(1, "uno"), Some("one"));
            assert_eq!(table.find(&1), Some(&"uno"));
            assert_eq!(table.remove(&1), Some("uno"));
            assert_eq!(table.remove(&1), None);
            assert_eq!(table.len(), 0);
        }

        let mut table = ChainedHashTable::new();
        exercise(&mut table);
    }

    #[test]
    fn test_shared_behind_mutex() {
        let table = Arc::new(Mutex::new(ChainedHashTable::<u64, u64>::new()));

        let handles: Vec<_> = (0..4u64)
            .map(|t| {
                let table = Arc::clone(&table);
                thread::spawn(move || {
                    for i in 0..250 {
                        let key = t * 1_000 + i;
                        table.lock().unwrap().put(key, key);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let table = table.lock().unwrap();
        assert_eq!(table.len(), 1_000);
        assert_eq!(table.get(&3_249), Some(&3_249));
        assert!(table.verify_integrity());
    }
}
