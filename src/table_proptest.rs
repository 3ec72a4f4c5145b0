#![cfg(test)]

// Property tests for BucketTable kept inside the crate so they can use a
// `Digest` impl for `str` (a foreign type) and check internal metrics.

use crate::digest::Digest;
use crate::table::BucketTable;
use crate::TableError;
use proptest::prelude::*;
use std::collections::{BTreeSet, HashMap};
use std::fmt;

// FNV-1a over the bytes; only used to give string keys a digest.
impl Digest for str {
    fn digest(&self) -> u64 {
        self.bytes().fold(0xcbf2_9ce4_8422_2325, |h, b| {
            (h ^ b as u64).wrapping_mul(0x0100_0000_01b3)
        })
    }
}

// Key newtype with Borrow<str> to exercise borrowed lookup.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
struct Key(String);
impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
impl std::borrow::Borrow<str> for Key {
    fn borrow(&self) -> &str {
        &self.0
    }
}
impl Digest for Key {
    fn digest(&self) -> u64 {
        self.0.as_str().digest()
    }
}

// Same key space, but every key lands in the same home bucket.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
struct Clash(String);
impl Digest for Clash {
    fn digest(&self) -> u64 {
        7
    }
}

// Pool-indexed operations to improve shrinking: indices shrink to earlier keys,
// pool length shrinks, and op lists shrink in length.
#[derive(Clone, Debug)]
enum OpI {
    Insert(usize, i32),
    GetOrInsertWith(usize, i32),
    At(usize),
    Contains(String),
    Mutate(usize, i32),
    Grow(usize),
    CloneAndDiverge(usize, i32),
    Iterate,
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<OpI>)> {
    proptest::collection::vec("[a-z]{0,5}", 1..=24).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let contains_pool = proptest::sample::select(pool.clone());
        let op = prop_oneof![
            4 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::Insert(i, v)),
            2 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::GetOrInsertWith(i, v)),
            2 => idx.clone().prop_map(OpI::At),
            1 => prop_oneof![
                contains_pool.prop_map(|s: String| s),
                "[a-z]{0,5}".prop_map(|s| s)
            ]
            .prop_map(OpI::Contains),
            1 => (idx.clone(), any::<i32>()).prop_map(|(i, d)| OpI::Mutate(i, d)),
            1 => (0usize..64).prop_map(OpI::Grow),
            1 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::CloneAndDiverge(i, v)),
            1 => Just(OpI::Iterate),
        ];
        proptest::collection::vec(op, 1..80).prop_map(move |ops| (pool.clone(), ops))
    })
}

// Drives a table through `ops` and checks it against a HashMap model.
// Invariants exercised across random operation sequences:
// - Keys are unique: `len` matches the model after every op, and inserting
//   an existing key returns the previous value.
// - `at` returns the latest value or KeyNotFound, and never grows.
// - Growth (explicit or automatic) preserves every entry.
// - `len <= capacity` and `load_factor <= max_load_factor` always hold.
// - Clones are independent of their source.
fn run_scenario<K, const C: usize>(
    pool: &[String],
    ops: Vec<OpI>,
    make: impl Fn(&str) -> K,
) -> Result<(), TestCaseError>
where
    K: Digest + PartialEq + Clone + Eq + std::hash::Hash + Ord + fmt::Debug,
{
    let mut sut: BucketTable<K, i32, C> = BucketTable::new();
    let mut model: HashMap<K, i32> = HashMap::new();

    for op in ops {
        match op {
            OpI::Insert(i, v) => {
                let k = make(&pool[i]);
                let prev = sut.insert(k.clone(), v).expect("insert");
                prop_assert_eq!(prev, model.insert(k, v));
            }
            OpI::GetOrInsertWith(i, v) => {
                let k = make(&pool[i]);
                let mut ran = false;
                let got = *sut
                    .get_or_insert_with(k.clone(), || {
                        ran = true;
                        v
                    })
                    .expect("get_or_insert_with");
                let existed = model.contains_key(&k);
                prop_assert_eq!(ran, !existed, "default runs only for absent keys");
                let expected = *model.entry(k).or_insert(v);
                prop_assert_eq!(got, expected);
            }
            OpI::At(i) => {
                let k = make(&pool[i]);
                let buckets = sut.bucket_count();
                match model.get(&k) {
                    Some(v) => prop_assert_eq!(sut.at(&k), Ok(v)),
                    None => prop_assert_eq!(sut.at(&k), Err(TableError::KeyNotFound)),
                }
                prop_assert_eq!(sut.bucket_count(), buckets, "lookups never grow");
            }
            OpI::Contains(s) => {
                let k = make(&s);
                prop_assert_eq!(sut.contains_key(&k), model.contains_key(&k));
            }
            OpI::Mutate(i, d) => {
                let k = make(&pool[i]);
                if let Some(mv) = model.get_mut(&k) {
                    let v = sut.at_mut(&k).expect("present in table");
                    *v = v.wrapping_add(d);
                    *mv = mv.wrapping_add(d);
                } else {
                    prop_assert!(sut.get_mut(&k).is_none());
                }
            }
            OpI::Grow(extra) => {
                let target = sut.bucket_count() + extra;
                sut.grow(target).expect("grow");
                prop_assert!(sut.bucket_count() >= target);
            }
            OpI::CloneAndDiverge(i, v) => {
                let k = make(&pool[i]);
                let mut copy = sut.clone();
                copy.insert(k.clone(), v.wrapping_add(1)).expect("insert into clone");
                prop_assert_eq!(sut.get(&k), model.get(&k), "source unaffected by clone");
                prop_assert_eq!(copy.get(&k), Some(&v.wrapping_add(1)));
            }
            OpI::Iterate => {
                let s_keys: BTreeSet<_> = sut.keys().cloned().collect();
                let m_keys: BTreeSet<_> = model.keys().cloned().collect();
                prop_assert_eq!(s_keys, m_keys);
                for (k, v) in &sut {
                    prop_assert_eq!(model.get(k), Some(v));
                }
            }
        }

        // Post-conditions after each op
        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
        prop_assert!(sut.len() <= sut.capacity());
        prop_assert!(sut.load_factor() <= sut.max_load_factor());
        prop_assert!(sut.occupancy() <= 1.0);
    }

    for (k, v) in &model {
        prop_assert_eq!(sut.at(k), Ok(v));
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]

    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario()) {
        run_scenario::<Key, 5>(&pool, ops, |s| Key(s.to_string()))?;
    }

    // Single-slot buckets make every collision spill into a neighbour.
    #[test]
    fn prop_state_machine_single_slot_buckets((pool, ops) in arb_scenario()) {
        run_scenario::<Key, 1>(&pool, ops, |s| Key(s.to_string()))?;
    }

    // Worst case: one shared digest, so equality alone separates keys.
    #[test]
    fn prop_state_machine_with_collisions((pool, ops) in arb_scenario()) {
        run_scenario::<Clash, 3>(&pool, ops, |s| Clash(s.to_string()))?;
    }

    // Integer keys hash to themselves; clustered runs are the common case.
    #[test]
    fn prop_integer_keys_round_trip(keys in proptest::collection::vec(0u32..512, 0..200)) {
        let mut sut: BucketTable<u32, u32> = BucketTable::new();
        let mut model: HashMap<u32, u32> = HashMap::new();
        for (i, k) in keys.into_iter().enumerate() {
            sut.insert(k, i as u32).expect("insert");
            model.insert(k, i as u32);
        }
        prop_assert_eq!(sut.len(), model.len());
        for (k, v) in &model {
            prop_assert_eq!(sut.at(k), Ok(v));
        }
    }
}

#[test]
fn borrowed_lookup_with_str() {
    let mut t: BucketTable<Key, i32> = BucketTable::new();
    t.insert(Key("hello".to_string()), 1).unwrap();
    assert!(t.contains_key("hello"));
    assert!(!t.contains_key("world"));
    assert_eq!(t.at("hello"), Ok(&1));
    assert_eq!(t.at("world"), Err(TableError::KeyNotFound));
}
