// BucketTable integration tests through the public surface.
//
// The core invariants exercised:
// - Uniqueness: re-inserting a key updates in place; len counts keys.
// - Capacity: len <= bucket_count * C after every operation.
// - Growth: contents survive automatic and explicit growth unchanged.
// - Lookup failure: missing keys report KeyNotFound without side effects.
// - Pluggable digest: caller-defined key types work once they implement Digest.
use bucket_table::{BucketTable, Digest, TableError, DEFAULT_BUCKET_SLOTS, INITIAL_BUCKETS};

// Test: growth while filling the initial storage.
// Assumes: C = 5 and four initial buckets (20 slots).
// Verifies: inserting 1..=20 grows at least once and every value is readable.
#[test]
fn twenty_sequential_keys_grow_and_stay_readable() {
    assert_eq!(DEFAULT_BUCKET_SLOTS, 5);
    let mut t: BucketTable<i32, String> = BucketTable::new();
    for k in 1..=20 {
        t.insert(k, format!("value-{k}")).unwrap();
    }
    assert!(t.bucket_count() > INITIAL_BUCKETS);
    assert_eq!(t.len(), 20);
    for k in 1..=20 {
        assert_eq!(t.at(&k).unwrap(), &format!("value-{k}"));
    }
}

// Test: lookup on an empty table.
// Assumes: no storage is allocated before the first insert.
// Verifies: KeyNotFound, and neither len nor bucket_count change.
#[test]
fn at_on_empty_table_fails_without_side_effects() {
    let t: BucketTable<i32, i32> = BucketTable::new();
    assert_eq!(t.at(&0), Err(TableError::KeyNotFound));
    assert_eq!(t.len(), 0);
    assert_eq!(t.bucket_count(), 0);
}

// Test: update in place.
// Verifies: second insert of key 5 replaces "a" with "b" and len stays 1.
#[test]
fn reinserting_a_key_replaces_its_value() {
    let mut t: BucketTable<u32, &str> = BucketTable::new();
    t.insert(5, "a").unwrap();
    let prev = t.insert(5, "b").unwrap();
    assert_eq!(prev, Some("a"));
    assert_eq!(t.len(), 1);
    assert_eq!(t.at(&5), Ok(&"b"));
}

// Test: idempotent insert.
// Verifies: inserting the same pair twice changes nothing after the first time.
#[test]
fn inserting_the_same_pair_twice_is_idempotent() {
    let mut t: BucketTable<u64, u64> = BucketTable::new();
    t.insert(9, 90).unwrap();
    let (len, buckets) = (t.len(), t.bucket_count());
    t.insert(9, 90).unwrap();
    assert_eq!((t.len(), t.bucket_count()), (len, buckets));
    assert_eq!(t.at(&9), Ok(&90));
}

// Test: the error is a regular std error with a readable message.
#[test]
fn key_not_found_displays() {
    let err = BucketTable::<u8, u8>::new().at(&1).unwrap_err();
    assert_eq!(err.to_string(), "key not found");
    let boxed: Box<dyn std::error::Error> = Box::new(err);
    assert!(boxed.source().is_none());
}

// Test: allocation failure surfaces as an error and keeps prior contents.
#[test]
fn oversized_preallocation_is_reported() {
    let r = BucketTable::<u64, [u8; 64]>::with_buckets(usize::MAX / 16);
    match r {
        Err(TableError::AllocationFailure(e)) => {
            let err = TableError::AllocationFailure(e);
            assert!(std::error::Error::source(&err).is_some());
        }
        Err(other) => panic!("unexpected error: {other:?}"),
        Ok(_) => panic!("allocation should not succeed"),
    }
}

// Test: preallocated tables do not grow until they are nearly full.
#[test]
fn with_buckets_preallocates() {
    let mut t: BucketTable<u16, u16> = BucketTable::with_buckets(16).unwrap();
    assert_eq!(t.bucket_count(), 16);
    for k in 0..70 {
        t.insert(k, k).unwrap();
    }
    assert_eq!(t.bucket_count(), 16);
    assert_eq!(t.len(), 70);
    let empty: BucketTable<u16, u16> = BucketTable::with_buckets(0).unwrap();
    assert_eq!(empty.bucket_count(), 0);
}

// Test: caller-provided digest for a composite key.
// Assumes: Digest is the only requirement besides PartialEq.
// Verifies: such keys insert, update and look up like built-in ones.
#[test]
fn custom_key_type_with_caller_digest() {
    #[derive(Clone, Copy, Debug, PartialEq)]
    struct Point {
        x: i32,
        y: i32,
    }
    impl Digest for Point {
        fn digest(&self) -> u64 {
            ((self.x as u32 as u64) << 32) | self.y as u32 as u64
        }
    }

    let mut t: BucketTable<Point, &str> = BucketTable::new();
    t.insert(Point { x: 1, y: 2 }, "a").unwrap();
    t.insert(Point { x: -1, y: 2 }, "b").unwrap();
    t.insert(Point { x: 1, y: 2 }, "c").unwrap();
    assert_eq!(t.len(), 2);
    assert_eq!(t.at(&Point { x: 1, y: 2 }), Ok(&"c"));
    assert_eq!(t.at(&Point { x: -1, y: 2 }), Ok(&"b"));
    assert_eq!(t.at(&Point { x: 2, y: 1 }), Err(TableError::KeyNotFound));
}

// Test: every supported primitive key type can be used as a key.
#[test]
fn primitive_key_types() {
    fn check<K: Digest + PartialEq + Copy + std::fmt::Debug>(keys: [K; 3]) {
        let mut t: BucketTable<K, usize> = BucketTable::new();
        for (i, k) in keys.iter().enumerate() {
            t.insert(*k, i).unwrap();
        }
        for (i, k) in keys.iter().enumerate() {
            assert_eq!(t.at(k), Ok(&i), "key {k:?}");
        }
    }
    check([0u8, 1, u8::MAX]);
    check([i8::MIN, -1, 1]);
    check([0u16, 300, u16::MAX]);
    check([i16::MIN, -300, 300]);
    check([0u32, 7, u32::MAX]);
    check([i32::MIN, -7, 7]);
    check([0u64, 1 << 40, u64::MAX]);
    check([i64::MIN, -(1 << 40), 1 << 40]);
    check([0usize, 1, usize::MAX]);
    check([isize::MIN, -1, isize::MAX]);
    check([0.5f32, -1.25, f32::MAX]);
    check([0.5f64, -1.25, f64::MIN_POSITIVE]);
}

// Test: positive and negative zero as float keys.
// Assumes: `0.0 == -0.0` under `PartialEq`.
// Verifies: the second insert updates the first entry instead of adding one.
#[test]
fn signed_zero_is_a_single_key() {
    let mut t: BucketTable<f64, u32> = BucketTable::new();
    assert_eq!(t.insert(0.0, 1), Ok(None));
    assert_eq!(t.insert(-0.0, 2), Ok(Some(1)));
    assert_eq!(t.len(), 1);
    assert_eq!(t.at(&0.0), Ok(&2));
    assert_eq!(t.iter().count(), 1);
}

// Test: clone is a deep copy.
// Verifies: growing and updating the copy leaves the source untouched.
#[test]
fn clone_then_mutate_copy() {
    let mut src: BucketTable<u32, Vec<u32>> = BucketTable::new();
    for k in 0..10 {
        src.insert(k, vec![k]).unwrap();
    }
    let mut copy = src.clone();
    for k in 10..100 {
        copy.insert(k, vec![k]).unwrap();
    }
    copy.at_mut(&0).unwrap().push(99);

    assert_eq!(src.len(), 10);
    assert_eq!(src.bucket_count(), INITIAL_BUCKETS);
    assert_eq!(src.at(&0), Ok(&vec![0]));
    assert_eq!(copy.at(&0), Ok(&vec![0, 99]));
    assert!(src.get(&50).is_none());
    assert_eq!(copy.len(), 100);
}

// Test: capacity and load metrics across growth.
#[test]
fn capacity_invariant_holds_while_growing() {
    let mut t: BucketTable<u64, ()> = BucketTable::new();
    for k in 0..1_000u64 {
        t.insert(k * 7919, ()).unwrap();
        assert!(t.len() <= t.bucket_count() * DEFAULT_BUCKET_SLOTS);
        assert!(t.load_factor() <= t.max_load_factor());
    }
    assert_eq!(t.len(), 1_000);
    assert!(t.bucket_count().is_power_of_two());
}
