/// A deterministic mapping from string keys to hash values.
///
/// The table reduces the returned value modulo its capacity to obtain the
/// key's home slot, so implementations do not need to know the capacity.
/// Distinct keys are allowed to collide; the table resolves collisions by
/// probing.
///
/// Implementations must be deterministic for the lifetime of the table:
/// chain repair after a removal recomputes home slots from stored keys, and
/// a hash that drifts between calls would silently strand entries.
pub trait KeyHash {
    /// Hashes `key`. The table maps the result into its slot range.
    fn hash_key(&self, key: &str) -> u64;
}

/// The default hash: the sum of the key's character code points.
///
/// Quality is deliberately not a goal. Anagrams collide (`"hje"` and
/// `"hej"` sum identically) and short keys cluster in the low slots; the
/// probing and chain-repair machinery is what handles that. For key sets
/// where the clustering hurts, supply a stronger [`KeyHash`] such as
/// [`FoldState`](crate::hash::FoldState).
///
/// # Examples
///
/// ```rust
/// use probe_table::CharSum;
/// use probe_table::KeyHash;
///
/// assert_eq!(CharSum.hash_key("hje"), CharSum.hash_key("hej"));
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CharSum;

impl KeyHash for CharSum {
    fn hash_key(&self, key: &str) -> u64 {
        key.chars().map(u64::from).sum()
    }
}

#[cfg(feature = "foldhash")]
mod fold {
    use core::fmt;
    use core::hash::BuildHasher;

    use super::KeyHash;

    /// A stronger hash backed by the `foldhash` crate.
    ///
    /// Uses `foldhash`'s fixed-seed state, so it stays deterministic across
    /// runs and processes as [`KeyHash`] requires, while spreading keys far
    /// better than [`CharSum`](super::CharSum).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use probe_table::FoldState;
    /// use probe_table::ProbeTable;
    ///
    /// let mut table: ProbeTable<u32, FoldState> =
    ///     ProbeTable::with_capacity_and_hasher(32, FoldState::default());
    /// table.insert("key", 1).unwrap();
    /// assert_eq!(table.get("key"), Some(&1));
    /// ```
    #[derive(Default, Clone)]
    pub struct FoldState {
        state: foldhash::fast::FixedState,
    }

    impl FoldState {
        /// Creates a hasher whose output is keyed by `seed`.
        ///
        /// Two tables built with the same seed hash identically.
        pub fn with_seed(seed: u64) -> Self {
            Self {
                state: foldhash::fast::FixedState::with_seed(seed),
            }
        }
    }

    impl KeyHash for FoldState {
        fn hash_key(&self, key: &str) -> u64 {
            self.state.hash_one(key)
        }
    }

    impl fmt::Debug for FoldState {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.debug_struct("FoldState").finish_non_exhaustive()
        }
    }
}

#[cfg(feature = "foldhash")]
pub use fold::FoldState;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn char_sum_is_the_sum_of_code_points() {
        assert_eq!(CharSum.hash_key(""), 0);
        assert_eq!(CharSum.hash_key("a"), 97);
        // 'h' + 'j' + 'e' = 104 + 106 + 101
        assert_eq!(CharSum.hash_key("hje"), 311);
        assert_eq!(CharSum.hash_key("pje"), 319);
    }

    #[test]
    fn char_sum_collides_on_anagrams() {
        assert_eq!(CharSum.hash_key("hje"), CharSum.hash_key("hej"));
        assert_eq!(CharSum.hash_key("ab"), CharSum.hash_key("ba"));
    }

    #[cfg(feature = "foldhash")]
    #[test]
    fn fold_state_is_deterministic_per_seed() {
        let a = FoldState::with_seed(7);
        let b = FoldState::with_seed(7);
        assert_eq!(a.hash_key("hje"), b.hash_key("hje"));
        assert_ne!(a.hash_key("hje"), a.hash_key("hej"));
    }
}
