//! Rank sequencing for ordered children (questionings, optionings)

/// Something with a 1-based position among its siblings
pub trait Ranked {
    fn rank(&self) -> Option<u32>;
    fn set_rank(&mut self, rank: u32);
}

/// Toggles for the store-backed rank fixers in [`crate::operations`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankFix {
    /// Re-read the siblings from the store before fixing
    pub reload: bool,
    /// Save the items whose rank changed
    pub persist: bool,
}

impl Default for RankFix {
    fn default() -> Self {
        Self { reload: true, persist: true }
    }
}

/// Renumber `items` to ranks 1..=N.
///
/// Items are stable-sorted by their current rank with missing ranks last, so
/// duplicates and gaps resolve in input order.
pub fn fix_ranks<T: Ranked>(mut items: Vec<T>) -> Vec<T> {
    items.sort_by_key(|item| (item.rank().is_none(), item.rank()));
    for (index, item) in items.iter_mut().enumerate() {
        item.set_rank(index as u32 + 1);
    }
    items
}

/// True when ranks are exactly 1..=N in order
pub fn is_contiguous<T: Ranked>(items: &[T]) -> bool {
    items
        .iter()
        .enumerate()
        .all(|(index, item)| item.rank() == Some(index as u32 + 1))
}
