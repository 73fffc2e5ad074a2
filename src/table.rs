use alloc::boxed::Box;
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::Debug;
use core::mem;

use thiserror::Error;

use crate::hash::CharSum;
use crate::hash::KeyHash;

/// Capacity used by [`ProbeTable::new`] and the `Default` impl.
pub const DEFAULT_CAPACITY: usize = 7;

/// Error returned when inserting a new key into a table with no vacant slot.
///
/// Only insertion of a *new* key can fail: updating a key that is already
/// present consumes no slot and succeeds even on a full table. The table is
/// unchanged when this error is returned.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("table is full ({capacity} slots occupied)")]
pub struct TableFull {
    /// Capacity of the table that rejected the insertion.
    pub capacity: usize,
}

/// One slot of the backing array.
///
/// Presence is carried by the variant itself, so an empty slot can never be
/// confused with a stored value.
#[derive(Clone, Debug)]
enum Slot<V> {
    Empty,
    Occupied { key: String, value: V },
}

/// Outcome of scanning the probe sequence for a key.
enum Probe {
    /// The slot holding the probed key.
    Hit(usize),
    /// The first empty slot on the probe path; the key is absent.
    Vacant(usize),
    /// Every slot was scanned without a match or a vacancy.
    Exhausted,
}

/// A fixed-capacity, string-keyed hash table using linear probing.
///
/// The table owns a flat array of slots whose length is fixed at
/// construction. A key's hash (reduced modulo the capacity) picks its home
/// slot; on collision the table scans forward one slot at a time, wrapping
/// at the end of the array, until it finds the key or an empty slot. Every
/// stored entry is reachable from its home slot through a contiguous run of
/// occupied slots, so lookups can always stop at the first empty slot they
/// meet.
///
/// Removal keeps that guarantee without tombstones: the vacated slot becomes
/// empty immediately, and the rest of its run is walked once, reinserting
/// any entry that is no longer at its home slot. See [`remove`].
///
/// All operations are bounded by O(capacity).
///
/// [`remove`]: ProbeTable::remove
///
/// # Examples
///
/// ```rust
/// use probe_table::ProbeTable;
///
/// let mut table = ProbeTable::new();
/// table.insert("hje", 'c').unwrap();
/// table.insert("hej", 'w').unwrap();
///
/// assert_eq!(table.get("hje"), Some(&'c'));
/// assert_eq!(table.remove("hje"), Some('c'));
/// assert_eq!(table.get("hej"), Some(&'w'));
/// ```
#[derive(Clone)]
pub struct ProbeTable<V, H = CharSum> {
    slots: Box<[Slot<V>]>,
    len: usize,
    hasher: H,
}

impl<V> ProbeTable<V, CharSum> {
    /// Creates a table with the default capacity and [`CharSum`] hashing.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use probe_table::DEFAULT_CAPACITY;
    /// use probe_table::ProbeTable;
    ///
    /// let table: ProbeTable<char> = ProbeTable::new();
    /// assert!(table.is_empty());
    /// assert_eq!(table.capacity(), DEFAULT_CAPACITY);
    /// ```
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Creates a table with exactly `capacity` slots and [`CharSum`]
    /// hashing.
    ///
    /// The capacity is fixed for the table's lifetime; the table never
    /// grows. It must be at least 1.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use probe_table::ProbeTable;
    ///
    /// let table: ProbeTable<u32> = ProbeTable::with_capacity(64);
    /// assert_eq!(table.capacity(), 64);
    /// ```
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, CharSum)
    }
}

impl<V, H> ProbeTable<V, H>
where
    H: KeyHash,
{
    /// Creates a table with the default capacity and the given hasher.
    pub fn with_hasher(hasher: H) -> Self {
        Self::with_capacity_and_hasher(DEFAULT_CAPACITY, hasher)
    }

    /// Creates a table with exactly `capacity` slots and the given hasher.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn with_capacity_and_hasher(capacity: usize, hasher: H) -> Self {
        assert!(capacity > 0, "capacity must be positive");
        Self {
            slots: (0..capacity).map(|_| Slot::Empty).collect(),
            len: 0,
            hasher,
        }
    }

    /// Returns the number of occupied slots.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use probe_table::ProbeTable;
    ///
    /// let mut table = ProbeTable::new();
    /// assert_eq!(table.len(), 0);
    /// table.insert("hje", 'c').unwrap();
    /// assert_eq!(table.len(), 1);
    /// ```
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if no slot is occupied.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the slot count chosen at construction.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns the slot index `key` maps to before any probing.
    ///
    /// Distinct keys may share a home index; the entry for `key` is stored
    /// at its home index or in the run of occupied slots following it.
    pub fn home_index(&self, key: &str) -> usize {
        (self.hasher.hash_key(key) % self.slots.len() as u64) as usize
    }

    /// Scans `home, home + 1, ...` (wrapping) for `key`.
    ///
    /// At most `capacity` slots are visited, so this terminates even when
    /// no slot is empty.
    fn probe(&self, key: &str) -> Probe {
        let m = self.slots.len();
        let home = self.home_index(key);
        for i in 0..m {
            let idx = (home + i) % m;
            match &self.slots[idx] {
                Slot::Empty => return Probe::Vacant(idx),
                Slot::Occupied { key: occupant, .. } if occupant.as_str() == key => {
                    return Probe::Hit(idx);
                }
                Slot::Occupied { .. } => {}
            }
        }
        Probe::Exhausted
    }

    /// Returns `true` if `key` is present.
    ///
    /// Equivalent to `self.get(key).is_some()`. Presence is tracked by the
    /// slot state itself, so a stored value can never read as absent.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use probe_table::ProbeTable;
    ///
    /// let mut table = ProbeTable::new();
    /// table.insert("hje", 'c').unwrap();
    /// assert!(table.contains("hje"));
    /// assert!(!table.contains("hej"));
    /// ```
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Inserts a key-value pair, returning the previous value if the key
    /// was already present.
    ///
    /// Probing starts at the key's home index and takes the first slot that
    /// is empty or already holds `key`; intervening collisions push the
    /// entry further along the run.
    ///
    /// # Errors
    ///
    /// Fails with [`TableFull`] when `key` is new and every slot is
    /// occupied by another key. Updating an existing key succeeds even on a
    /// full table, since no extra slot is consumed. The table is unchanged
    /// on error.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use probe_table::ProbeTable;
    ///
    /// let mut table = ProbeTable::with_capacity(1);
    /// assert_eq!(table.insert("a", 1), Ok(None));
    /// // Updates succeed even when the table is full...
    /// assert_eq!(table.insert("a", 2), Ok(Some(1)));
    /// // ...but a new key has nowhere to go.
    /// assert!(table.insert("b", 3).is_err());
    /// ```
    pub fn insert(&mut self, key: &str, value: V) -> Result<Option<V>, TableFull> {
        match self.probe(key) {
            Probe::Hit(idx) => {
                let Slot::Occupied { value: occupant, .. } = &mut self.slots[idx] else {
                    unreachable!("probe hit an empty slot");
                };
                Ok(Some(mem::replace(occupant, value)))
            }
            Probe::Vacant(idx) => {
                self.slots[idx] = Slot::Occupied {
                    key: String::from(key),
                    value,
                };
                self.len += 1;
                Ok(None)
            }
            Probe::Exhausted => Err(TableFull {
                capacity: self.slots.len(),
            }),
        }
    }

    /// Inserts `value` if it is `Some`, removes `key` if it is `None`.
    ///
    /// The `None` form is an alias for [`remove`]: on a present key it
    /// removes the entry, on an absent key it is a no-op, and it never
    /// fails since removal is total. Either way the previous value is
    /// returned.
    ///
    /// [`remove`]: ProbeTable::remove
    ///
    /// # Examples
    ///
    /// ```rust
    /// use probe_table::ProbeTable;
    ///
    /// let mut table = ProbeTable::new();
    /// table.put("pje", Some('d')).unwrap();
    /// assert_eq!(table.len(), 1);
    ///
    /// assert_eq!(table.put("pje", None), Ok(Some('d')));
    /// assert!(table.is_empty());
    /// ```
    pub fn put(&mut self, key: &str, value: Option<V>) -> Result<Option<V>, TableFull> {
        match value {
            Some(value) => self.insert(key, value),
            None => Ok(self.remove(key)),
        }
    }

    /// Returns a reference to the value stored for `key`.
    ///
    /// The probe stops at the first empty slot it meets: the chain-repair
    /// step run by [`remove`] guarantees no entry is ever stranded past a
    /// gap. On a completely full table the probe visits every slot once
    /// before reporting absence.
    ///
    /// [`remove`]: ProbeTable::remove
    ///
    /// # Examples
    ///
    /// ```rust
    /// use probe_table::ProbeTable;
    ///
    /// let mut table = ProbeTable::new();
    /// table.insert("hje", 'c').unwrap();
    /// assert_eq!(table.get("hje"), Some(&'c'));
    /// assert_eq!(table.get("hej"), None);
    /// ```
    pub fn get(&self, key: &str) -> Option<&V> {
        let Probe::Hit(idx) = self.probe(key) else {
            return None;
        };
        let Slot::Occupied { value, .. } = &self.slots[idx] else {
            unreachable!("probe hit an empty slot");
        };
        Some(value)
    }

    /// Returns a mutable reference to the value stored for `key`.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        let Probe::Hit(idx) = self.probe(key) else {
            return None;
        };
        let Slot::Occupied { value, .. } = &mut self.slots[idx] else {
            unreachable!("probe hit an empty slot");
        };
        Some(value)
    }

    /// Removes `key`, returning its value if it was present.
    ///
    /// Removing an absent key is a no-op. On a hit, the vacated slot
    /// becomes empty immediately and the remainder of its probe run is
    /// repaired before this returns, so the no-gaps guarantee relied on by
    /// [`get`] holds again by the time any other operation can observe the
    /// table.
    ///
    /// [`get`]: ProbeTable::get
    ///
    /// # Examples
    ///
    /// ```rust
    /// use probe_table::ProbeTable;
    ///
    /// let mut table = ProbeTable::new();
    /// table.insert("hje", 'c').unwrap();
    /// assert_eq!(table.remove("hje"), Some('c'));
    /// assert_eq!(table.remove("hje"), None);
    /// ```
    pub fn remove(&mut self, key: &str) -> Option<V> {
        let end = match self.probe(key) {
            Probe::Hit(idx) => idx,
            Probe::Vacant(_) | Probe::Exhausted => return None,
        };
        let Slot::Occupied { value, .. } = mem::replace(&mut self.slots[end], Slot::Empty) else {
            unreachable!("probe hit an empty slot");
        };
        self.len -= 1;
        self.rebalance(end);
        Some(value)
    }

    /// Repairs the probe chains after the slot at `end` was vacated.
    ///
    /// Walks forward from `end + 1` to the first empty slot. The run that
    /// contained the removed entry ends there, and slot `end` itself is
    /// already empty, so the walk visits fewer than `capacity` slots. Every
    /// entry in the walk that is not sitting at its home index is picked up
    /// and reinserted through the normal probe path, which re-threads it
    /// into the shortest chain that is still valid. Entries already at home
    /// never need to move.
    ///
    /// Picked-up entries leave the slots and the count before reinsertion
    /// begins, so the occupied count matches the slots at every step.
    fn rebalance(&mut self, end: usize) {
        let m = self.slots.len();
        let mut pending: Vec<(String, V)> = Vec::new();

        let mut idx = (end + 1) % m;
        loop {
            let displaced = match &self.slots[idx] {
                Slot::Empty => break,
                Slot::Occupied { key, .. } => self.home_index(key) != idx,
            };
            if displaced {
                if let Slot::Occupied { key, value } =
                    mem::replace(&mut self.slots[idx], Slot::Empty)
                {
                    self.len -= 1;
                    pending.push((key, value));
                }
            }
            idx = (idx + 1) % m;
        }

        for (key, value) in pending {
            self.reinsert(key, value);
        }
    }

    /// Reinsertion path for entries picked up during chain repair.
    ///
    /// Identical probing to [`ProbeTable::insert`], reusing the owned key.
    /// It cannot fail: occupancy decreased before it is called and the
    /// picked-up keys are unique.
    fn reinsert(&mut self, key: String, value: V) {
        match self.probe(&key) {
            Probe::Vacant(idx) => {
                self.slots[idx] = Slot::Occupied { key, value };
                self.len += 1;
            }
            Probe::Hit(_) | Probe::Exhausted => {
                unreachable!("chain repair always has a vacant slot for a unique key")
            }
        }
    }

    /// Empties every slot, keeping the capacity.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use probe_table::ProbeTable;
    ///
    /// let mut table = ProbeTable::new();
    /// table.insert("hje", 'c').unwrap();
    /// table.clear();
    /// assert!(table.is_empty());
    /// assert_eq!(table.capacity(), probe_table::DEFAULT_CAPACITY);
    /// ```
    pub fn clear(&mut self) {
        for slot in self.slots.iter_mut() {
            *slot = Slot::Empty;
        }
        self.len = 0;
    }

    /// Returns an iterator over the key-value pairs in slot order.
    ///
    /// The order is an artifact of hashing and earlier removals; treat it
    /// as arbitrary.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use probe_table::ProbeTable;
    ///
    /// let mut table = ProbeTable::new();
    /// table.insert("hje", 'c').unwrap();
    /// table.insert("pje", 'd').unwrap();
    ///
    /// let mut keys: Vec<&str> = table.iter().map(|(key, _)| key).collect();
    /// keys.sort();
    /// assert_eq!(keys, ["hje", "pje"]);
    /// ```
    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            slots: self.slots.iter(),
        }
    }

    /// Returns an iterator over the keys, in the same order as [`iter`].
    ///
    /// [`iter`]: ProbeTable::iter
    pub fn keys(&self) -> Keys<'_, V> {
        Keys { inner: self.iter() }
    }

    /// Returns an iterator over the values, in the same order as [`iter`].
    ///
    /// [`iter`]: ProbeTable::iter
    pub fn values(&self) -> Values<'_, V> {
        Values { inner: self.iter() }
    }
}

impl<V, H> ProbeTable<V, H>
where
    V: Debug,
    H: KeyHash,
{
    /// Renders one line per slot, in slot-index order.
    ///
    /// Occupied slots show the value, the key, and the key's home index;
    /// empty slots show a dash. Diagnostic output only: the exact text is
    /// not a stable interface.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use probe_table::ProbeTable;
    ///
    /// let mut table = ProbeTable::with_capacity(3);
    /// table.insert("b", 'x').unwrap();
    /// for line in table.dump() {
    ///     println!("{line}");
    /// }
    /// ```
    pub fn dump(&self) -> Vec<String> {
        self.slots
            .iter()
            .enumerate()
            .map(|(idx, slot)| match slot {
                Slot::Empty => format!("{idx}. -"),
                Slot::Occupied { key, value } => {
                    format!("{idx}. {value:?} {key} ({})", self.home_index(key))
                }
            })
            .collect()
    }
}

impl<V, H> Default for ProbeTable<V, H>
where
    H: KeyHash + Default,
{
    fn default() -> Self {
        Self::with_capacity_and_hasher(DEFAULT_CAPACITY, H::default())
    }
}

impl<V, H> Debug for ProbeTable<V, H>
where
    V: Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ProbeTable")
            .field("len", &self.len)
            .field("capacity", &self.slots.len())
            .field("slots", &self.slots)
            .finish()
    }
}

/// An iterator over the key-value pairs of a `ProbeTable`.
pub struct Iter<'a, V> {
    slots: core::slice::Iter<'a, Slot<V>>,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (&'a str, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.slots.next()? {
                Slot::Occupied { key, value } => return Some((key.as_str(), value)),
                Slot::Empty => {}
            }
        }
    }
}

/// An iterator over the keys of a `ProbeTable`.
pub struct Keys<'a, V> {
    inner: Iter<'a, V>,
}

impl<'a, V> Iterator for Keys<'a, V> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(key, _)| key)
    }
}

/// An iterator over the values of a `ProbeTable`.
pub struct Values<'a, V> {
    inner: Iter<'a, V>,
}

impl<'a, V> Iterator for Values<'a, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, value)| value)
    }
}
