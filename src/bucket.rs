//! Buckets: a flat slot arena partitioned into runs of `C` slots.
//!
//! Bucket `b` owns slots `b * C .. (b + 1) * C`. Buckets keep no
//! per-bucket metadata; occupancy is counted on demand.

use crate::error::TableError;
use crate::slot::{Entry, Slot};

/// Slots per bucket used when a table does not pick its own `C`.
pub const DEFAULT_BUCKET_SLOTS: usize = 5;

#[derive(Clone, Debug)]
pub(crate) struct Buckets<K, V, const C: usize> {
    slots: Vec<Slot<K, V>>,
}

impl<K, V, const C: usize> Buckets<K, V, C> {
    /// No storage; `bucket_count() == 0`.
    pub(crate) const fn unallocated() -> Self {
        Self { slots: Vec::new() }
    }

    /// Acquire `bucket_count * C` empty slots, reporting failure instead of
    /// aborting.
    pub(crate) fn allocate(bucket_count: usize) -> Result<Self, TableError> {
        let len = bucket_count
            .checked_mul(C)
            .ok_or(TableError::CapacityOverflow)?;
        let mut slots = Vec::new();
        slots
            .try_reserve_exact(len)
            .map_err(TableError::AllocationFailure)?;
        slots.resize_with(len, Slot::empty);
        Ok(Self { slots })
    }

    #[inline]
    pub(crate) fn bucket_count(&self) -> usize {
        self.slots.len() / C
    }

    #[inline]
    pub(crate) fn slot_count(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub(crate) fn slot(&self, index: usize) -> &Slot<K, V> {
        &self.slots[index]
    }

    #[inline]
    pub(crate) fn slot_mut(&mut self, index: usize) -> &mut Slot<K, V> {
        &mut self.slots[index]
    }

    #[inline]
    fn bucket(&self, bucket: usize) -> &[Slot<K, V>] {
        let start = bucket * C;
        &self.slots[start..start + C]
    }

    /// Number of occupied slots in `bucket`, or `None` past the end.
    pub(crate) fn occupancy(&self, bucket: usize) -> Option<usize> {
        if bucket >= self.bucket_count() {
            return None;
        }
        Some(self.bucket(bucket).iter().filter(|s| !s.is_empty()).count())
    }

    /// Walk buckets `home, home + 1, ...` (wrapping) and return the absolute
    /// index of the first slot that is either empty or holds a key accepted
    /// by `is_key`. `None` means every bucket was visited without a
    /// candidate, i.e. the storage is full and the key is absent.
    ///
    /// Must not be called on unallocated storage.
    pub(crate) fn probe<F>(&self, digest: u64, mut is_key: F) -> Option<usize>
    where
        F: FnMut(&K) -> bool,
    {
        let bucket_count = self.bucket_count();
        debug_assert!(bucket_count > 0, "probing unallocated storage");
        let home = (digest % bucket_count as u64) as usize;

        for step in 0..bucket_count {
            let bucket = (home + step) % bucket_count;
            for (offset, slot) in self.bucket(bucket).iter().enumerate() {
                let candidate = match slot.entry() {
                    None => true,
                    Some(e) => e.digest == digest && is_key(&e.key),
                };
                if candidate {
                    return Some(bucket * C + offset);
                }
            }
        }
        None
    }

    /// Put an entry whose key is known to be absent into the first empty
    /// slot on its probe path. Keys are never compared.
    pub(crate) fn place(&mut self, entry: Entry<K, V>) -> Result<usize, Entry<K, V>> {
        match self.probe(entry.digest, |_| false) {
            Some(index) => {
                self.slots[index].occupy(entry);
                Ok(index)
            }
            None => Err(entry),
        }
    }

    pub(crate) fn iter(&self) -> core::slice::Iter<'_, Slot<K, V>> {
        self.slots.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> core::slice::IterMut<'_, Slot<K, V>> {
        self.slots.iter_mut()
    }

    /// Consume the storage, yielding occupied entries in slot order.
    pub(crate) fn into_entries(self) -> impl Iterator<Item = Entry<K, V>> {
        self.slots.into_iter().filter_map(Slot::into_entry)
    }
}
