//! bucket-table: a single-threaded, open-addressing hash table whose
//! storage is split into fixed-capacity buckets.
//!
//! ```
//! use bucket_table::{BucketTable, TableError};
//!
//! let mut t: BucketTable<u32, &str> = BucketTable::new();
//! t.insert(5, "a")?;
//! assert_eq!(t.insert(5, "b")?, Some("a"));
//! assert_eq!(t.len(), 1);
//! assert_eq!(t.at(&5), Ok(&"b"));
//! assert_eq!(t.at(&6), Err(TableError::KeyNotFound));
//! # Ok::<(), TableError>(())
//! ```
//!
//! Internal Design:
//!
//! Summary
//! - Goal: a small associative map with a predictable, easy to test
//!   placement policy and no hidden per-entry allocations.
//! - Layers:
//!   - `Digest`: per-key-type hash function. Integers hash to their own
//!     bit pattern and floats to their IEEE-754 bits (`-0.0` as `0.0`), so clustering is the
//!     table's problem, not the hash's.
//!   - `Slot<K, V>`: empty or one entry (key, value, stored digest).
//!   - `Buckets<K, V, C>`: one flat arena of `bucket_count * C` slots;
//!     bucket `b` is slots `b * C .. (b + 1) * C`.
//!   - `BucketTable<K, V, C>`: public map. Owns the growth policy and the
//!     `len` counter.
//!
//! Probing
//! - Home bucket is `digest % bucket_count`. Buckets are visited linearly
//!   from there, wrapping once around the storage. Inside a bucket the
//!   first slot that is empty or holds an equal key wins.
//! - There is no removal, so slots fill front to back along a probe path
//!   and an empty slot proves the key is absent.
//!
//! Growth
//! - The first insert allocates `INITIAL_BUCKETS` buckets. Later inserts
//!   double the bucket count before a new key would take the last free
//!   slot, so lookups for absent keys always stop early. A probe sweep
//!   that visits every bucket without a candidate also doubles and
//!   retries.
//! - Growth allocates the new arena first and then moves every entry into
//!   it using the stored digest. Neither `Digest` nor `PartialEq` run while
//!   rehashing, and allocation failure leaves the table untouched.
//!
//! Load factor
//! - `load_factor()` is entries per bucket and `max_load_factor()` is `C`,
//!   so the two share a scale. `occupancy()` gives the conventional
//!   fraction of all slots in use.
//!
//! Notes and non-goals
//! - Single-threaded; no internal locking. Wrap a table in a lock or keep
//!   one per thread.
//! - Growth moves entries, so no reference into the table outlives an
//!   insert (enforced by `&mut self`).
//! - No deletion. Supporting it would need a tombstone slot state so that
//!   probes do not stop early at a removed entry.
//! - `Clone` is a deep copy.

mod bucket;
pub mod digest;
mod error;
mod slot;
pub mod table;
mod table_proptest;

// Public surface
pub use bucket::DEFAULT_BUCKET_SLOTS;
pub use digest::Digest;
pub use error::TableError;
pub use table::{BucketTable, Iter, IterMut, INITIAL_BUCKETS};
