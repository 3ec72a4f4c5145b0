//! Slot: the smallest storage unit, empty or holding one entry.

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Entry<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) digest: u64,
}

/// A slot is either empty or occupied. There is no third (tombstone)
/// state: once occupied, a slot only ever has its value replaced.
#[derive(Clone, Debug)]
pub(crate) struct Slot<K, V>(Option<Entry<K, V>>);

impl<K, V> Slot<K, V> {
    #[inline]
    pub(crate) const fn empty() -> Self {
        Slot(None)
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.0.is_none()
    }

    #[inline]
    pub(crate) fn entry(&self) -> Option<&Entry<K, V>> {
        self.0.as_ref()
    }

    #[inline]
    pub(crate) fn entry_mut(&mut self) -> Option<&mut Entry<K, V>> {
        self.0.as_mut()
    }

    /// Fill an empty slot. Occupying an occupied slot would drop an entry
    /// the table still counts.
    #[inline]
    pub(crate) fn occupy(&mut self, entry: Entry<K, V>) -> &mut Entry<K, V> {
        debug_assert!(self.is_empty(), "occupying a non-empty slot");
        self.0.insert(entry)
    }

    /// Return the stored entry, occupying the slot with `make()` first if
    /// it is empty.
    #[inline]
    pub(crate) fn get_or_occupy_with<F>(&mut self, make: F) -> &mut Entry<K, V>
    where
        F: FnOnce() -> Entry<K, V>,
    {
        self.0.get_or_insert_with(make)
    }

    #[inline]
    pub(crate) fn into_entry(self) -> Option<Entry<K, V>> {
        self.0
    }
}

impl<K, V> Default for Slot<K, V> {
    fn default() -> Self {
        Self::empty()
    }
}
