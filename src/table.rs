//! BucketTable: open-addressing map over fixed-capacity buckets.

use crate::bucket::{Buckets, DEFAULT_BUCKET_SLOTS};
use crate::digest::Digest;
use crate::error::TableError;
use crate::slot::{Entry, Slot};
use core::borrow::Borrow;
use core::fmt;
use core::mem;

/// Bucket count allocated by the first insert into an empty table.
pub const INITIAL_BUCKETS: usize = 4;

/// Single-threaded hash table storing entries by value in buckets of `C`
/// slots each.
///
/// Lookups hash the key with [`Digest`], start at bucket
/// `digest % bucket_count` and probe following buckets linearly (wrapping
/// around) until they find the key or an empty slot.
///
/// References returned by accessors are invalidated by any insert that
/// grows the table; the borrow checker enforces this since inserting
/// requires `&mut self`.
#[derive(Clone)]
pub struct BucketTable<K, V, const C: usize = DEFAULT_BUCKET_SLOTS> {
    buckets: Buckets<K, V, C>,
    len: usize,
}

impl<K, V, const C: usize> BucketTable<K, V, C> {
    const NONEMPTY_BUCKETS: () = assert!(C > 0, "buckets must hold at least one slot");

    /// Create an empty table. Nothing is allocated until the first insert.
    pub fn new() -> Self {
        let () = Self::NONEMPTY_BUCKETS;
        Self {
            buckets: Buckets::unallocated(),
            len: 0,
        }
    }

    /// Create a table with `bucket_count` buckets already allocated.
    /// Zero behaves like [`BucketTable::new`].
    pub fn with_buckets(bucket_count: usize) -> Result<Self, TableError> {
        let mut table = Self::new();
        if bucket_count > 0 {
            table.buckets = Buckets::allocate(bucket_count)?;
        }
        Ok(table)
    }

    /// Number of occupied slots.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.bucket_count()
    }

    /// Total slots, `bucket_count() * C`.
    pub fn capacity(&self) -> usize {
        self.buckets.slot_count()
    }

    /// Average entries per bucket, in `[0, C]`. Zero before the first
    /// allocation.
    pub fn load_factor(&self) -> f32 {
        match self.bucket_count() {
            0 => 0.0,
            n => self.len as f32 / n as f32,
        }
    }

    /// Upper bound of [`load_factor`](Self::load_factor): the number of
    /// slots per bucket. Unlike `std`-style tables this is not a fraction;
    /// see [`occupancy`](Self::occupancy) for that.
    pub fn max_load_factor(&self) -> f32 {
        C as f32
    }

    /// Fraction of all slots that are occupied, in `[0, 1]`.
    pub fn occupancy(&self) -> f32 {
        match self.capacity() {
            0 => 0.0,
            n => self.len as f32 / n as f32,
        }
    }

    /// Occupied slots in bucket `index`, counted on demand.
    pub fn bucket_occupancy(&self, index: usize) -> Option<usize> {
        self.buckets.occupancy(index)
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            it: self.buckets.iter(),
            remaining: self.len,
        }
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut {
            it: self.buckets.iter_mut(),
            remaining: self.len,
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.iter().map(|(_, v)| v)
    }

    /// Reallocate to `new_bucket_count` buckets and rehash every entry into
    /// the new storage. Counts not larger than the current one are ignored.
    ///
    /// The new storage is acquired before the old one is touched, so on
    /// error the table is unchanged. Rehashing uses the digest stored with
    /// each entry and never calls back into `K`.
    pub fn grow(&mut self, new_bucket_count: usize) -> Result<(), TableError> {
        if new_bucket_count <= self.bucket_count() {
            return Ok(());
        }
        let fresh = Buckets::allocate(new_bucket_count)?;
        let old = mem::replace(&mut self.buckets, fresh);
        for entry in old.into_entries() {
            // The new storage has more slots than there are entries, so a
            // full probe sweep always reaches an empty slot.
            let placed = self.buckets.place(entry);
            debug_assert!(placed.is_ok(), "rehash ran out of slots");
        }
        Ok(())
    }

    fn next_bucket_count(&self) -> Result<usize, TableError> {
        match self.bucket_count() {
            0 => Ok(INITIAL_BUCKETS),
            n => n.checked_mul(2).ok_or(TableError::CapacityOverflow),
        }
    }
}

impl<K, V, const C: usize> BucketTable<K, V, C>
where
    K: Digest + PartialEq,
{
    /// Insert or update. Returns the previous value when `key` was already
    /// present; `len` then stays the same.
    ///
    /// Fails only when growing is required and storage cannot be acquired,
    /// in which case the table is left as it was.
    pub fn insert(&mut self, key: K, value: V) -> Result<Option<V>, TableError> {
        let digest = key.digest();
        let index = self.find_or_make_room(&key, digest)?;
        let slot = self.buckets.slot_mut(index);
        if let Some(entry) = slot.entry_mut() {
            return Ok(Some(mem::replace(&mut entry.value, value)));
        }
        slot.occupy(Entry { key, value, digest });
        self.len += 1;
        debug_assert!(self.len <= self.capacity());
        Ok(None)
    }

    /// Return the value for `key`, inserting `default()` first if absent.
    /// `default` is not called when the key already exists.
    pub fn get_or_insert_with<F>(&mut self, key: K, default: F) -> Result<&mut V, TableError>
    where
        F: FnOnce() -> V,
    {
        let digest = key.digest();
        let index = self.find_or_make_room(&key, digest)?;
        let len = &mut self.len;
        let entry = self.buckets.slot_mut(index).get_or_occupy_with(|| {
            *len += 1;
            Entry {
                key,
                value: default(),
                digest,
            }
        });
        Ok(&mut entry.value)
    }

    /// Locate the slot for `key`: either the one holding it or an empty
    /// slot on its probe path. Allocates on first use and grows before a
    /// new key would take the last free slot, so probes for absent keys
    /// always stop at an empty slot. A probe sweep that finds nothing only
    /// happens on storage filled without going through this check; it
    /// grows and retries as well.
    fn find_or_make_room(&mut self, key: &K, digest: u64) -> Result<usize, TableError> {
        if self.bucket_count() == 0 {
            self.grow(INITIAL_BUCKETS)?;
        }
        loop {
            match self.buckets.probe(digest, |k| k == key) {
                Some(index) if !self.buckets.slot(index).is_empty() => return Ok(index),
                Some(index) if self.len + 1 < self.capacity() => return Ok(index),
                _ => self.grow(self.next_bucket_count()?)?,
            }
        }
    }
}

impl<K, V, const C: usize> BucketTable<K, V, C> {
    fn find_index<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: ?Sized + Digest + PartialEq,
    {
        if self.len == 0 {
            return None;
        }
        let index = self
            .buckets
            .probe(key.digest(), |k| <K as Borrow<Q>>::borrow(k) == key)?;
        if self.buckets.slot(index).is_empty() {
            return None;
        }
        Some(index)
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Digest + PartialEq,
    {
        let index = self.find_index(key)?;
        self.buckets.slot(index).entry().map(|e| &e.value)
    }

    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Digest + PartialEq,
    {
        let index = self.find_index(key)?;
        self.buckets.slot_mut(index).entry_mut().map(|e| &mut e.value)
    }

    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Digest + PartialEq,
    {
        let index = self.find_index(key)?;
        self.buckets
            .slot(index)
            .entry()
            .map(|e| (&e.key, &e.value))
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Digest + PartialEq,
    {
        self.find_index(key).is_some()
    }

    /// Indexed read; fails with [`TableError::KeyNotFound`] when absent.
    /// Never allocates or grows.
    pub fn at<Q>(&self, key: &Q) -> Result<&V, TableError>
    where
        K: Borrow<Q>,
        Q: ?Sized + Digest + PartialEq,
    {
        self.get(key).ok_or(TableError::KeyNotFound)
    }

    /// Mutable counterpart of [`at`](Self::at).
    pub fn at_mut<Q>(&mut self, key: &Q) -> Result<&mut V, TableError>
    where
        K: Borrow<Q>,
        Q: ?Sized + Digest + PartialEq,
    {
        self.get_mut(key).ok_or(TableError::KeyNotFound)
    }
}

impl<K, V, const C: usize> Default for BucketTable<K, V, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: fmt::Debug, V: fmt::Debug, const C: usize> fmt::Debug for BucketTable<K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<'a, K, V, const C: usize> IntoIterator for &'a BucketTable<K, V, C> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, K, V, const C: usize> IntoIterator for &'a mut BucketTable<K, V, C> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

/// Iterator over entries in storage order.
pub struct Iter<'a, K, V> {
    it: core::slice::Iter<'a, Slot<K, V>>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let e = self.it.find_map(Slot::entry)?;
        self.remaining -= 1;
        Some((&e.key, &e.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

/// Iterator over entries in storage order with mutable values.
pub struct IterMut<'a, K, V> {
    it: core::slice::IterMut<'a, Slot<K, V>>,
    remaining: usize,
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let e = self.it.find_map(Slot::entry_mut)?;
        self.remaining -= 1;
        Some((&e.key, &mut e.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for IterMut<'_, K, V> {}
