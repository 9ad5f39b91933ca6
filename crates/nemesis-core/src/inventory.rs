//! Item counts and inventory snapshots.

use ahash::AHashMap;
use nemesis_common::{SnapshotError, SnapshotResult};
use serde::{Deserialize, Serialize};

/// Number of crafting slots in the combining interface.
pub const DEFAULT_SLOT_CAPACITY: usize = 4;

/// A multiset of item names.
///
/// Used both as the present-item mapping of a decision cycle and as the
/// reservation accumulator the planner drains while it recurses.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemCounts {
    /// Items and their quantities
    items: AHashMap<String, u32>,
}

impl ItemCounts {
    /// Creates an empty multiset.
    #[must_use]
    pub fn new() -> Self {
        Self {
            items: AHashMap::new(),
        }
    }

    /// Returns the count of a specific item.
    #[must_use]
    pub fn count(&self, item: &str) -> u32 {
        self.items.get(item).copied().unwrap_or(0)
    }

    /// Checks if at least one of the item is present.
    #[must_use]
    pub fn has(&self, item: &str) -> bool {
        self.count(item) > 0
    }

    /// Adds items.
    pub fn add(&mut self, item: impl Into<String>, amount: u32) {
        if amount == 0 {
            return;
        }
        *self.items.entry(item.into()).or_insert(0) += amount;
    }

    /// Reserves one of the item, returning false if none are left.
    pub fn take_one(&mut self, item: &str) -> bool {
        match self.items.get_mut(item) {
            Some(count) if *count > 0 => {
                *count -= 1;
                true
            },
            _ => false,
        }
    }

    /// Returns true if every element of `needed` (with multiplicity) is
    /// covered by this multiset.
    #[must_use]
    pub fn contains_all<S: AsRef<str>>(&self, needed: &[S]) -> bool {
        let mut required: AHashMap<&str, u32> = AHashMap::new();
        for item in needed {
            *required.entry(item.as_ref()).or_insert(0) += 1;
        }
        required
            .into_iter()
            .all(|(item, amount)| self.count(item) >= amount)
    }

    /// Returns the number of distinct items with a positive count.
    #[must_use]
    pub fn distinct(&self) -> usize {
        self.items.values().filter(|&&count| count > 0).count()
    }

    /// Returns the total number of items.
    #[must_use]
    pub fn total(&self) -> u32 {
        self.items.values().sum()
    }

    /// Returns true if no item has a positive count.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.distinct() == 0
    }

    /// Iterates over present item names (count > 0), in no particular order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.items
            .iter()
            .filter(|(_, &count)| count > 0)
            .map(|(name, _)| name.as_str())
    }

    /// Iterates over `(name, count)` pairs with a positive count.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.items
            .iter()
            .filter(|(_, &count)| count > 0)
            .map(|(name, &count)| (name.as_str(), count))
    }
}

impl<S: Into<String>> FromIterator<S> for ItemCounts {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut counts = Self::new();
        for item in iter {
            counts.add(item, 1);
        }
        counts
    }
}

impl<S: Into<String>> Extend<S> for ItemCounts {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        for item in iter {
            self.add(item, 1);
        }
    }
}

/// What the host observed during one decision cycle.
///
/// `loose` holds one element per physical item in the stash. `committed` is
/// the ordered list of items already placed into the crafting slots, or
/// `None` when the crafting panel is hidden and the slots cannot be read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventorySnapshot {
    /// Items available in the stash
    #[serde(default)]
    pub loose: Vec<String>,
    /// Items placed into crafting slots, in placement order
    #[serde(default)]
    pub committed: Option<Vec<String>>,
    /// Area the player is in
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area: Option<String>,
}

impl InventorySnapshot {
    /// Creates a snapshot with the crafting panel visible.
    #[must_use]
    pub fn new(loose: Vec<String>, committed: Vec<String>) -> Self {
        Self {
            loose,
            committed: Some(committed),
            area: None,
        }
    }

    /// Creates a snapshot taken while the crafting panel is hidden.
    #[must_use]
    pub fn panel_hidden(loose: Vec<String>) -> Self {
        Self {
            loose,
            committed: None,
            area: None,
        }
    }

    /// Sets the area the snapshot was taken in.
    #[must_use]
    pub fn with_area(mut self, area: impl Into<String>) -> Self {
        self.area = Some(area.into());
        self
    }

    /// Returns true if the crafting slots could be read.
    #[must_use]
    pub fn panel_visible(&self) -> bool {
        self.committed.is_some()
    }

    /// Visible committed items; empty when the panel is hidden.
    #[must_use]
    pub fn committed(&self) -> &[String] {
        self.committed.as_deref().unwrap_or_default()
    }

    /// Counts every item on hand, loose and committed alike.
    #[must_use]
    pub fn present_counts(&self) -> ItemCounts {
        self.present_counts_with(self.committed())
    }

    /// Counts loose items plus the given committed list.
    #[must_use]
    pub fn present_counts_with(&self, committed: &[String]) -> ItemCounts {
        self.loose
            .iter()
            .chain(committed.iter())
            .map(String::as_str)
            .collect()
    }

    /// Checks that the visible committed list fits into the crafting slots.
    pub fn check_capacity(&self, capacity: usize) -> SnapshotResult<()> {
        let committed = self.committed().len();
        if committed > capacity {
            return Err(SnapshotError::OverCapacity {
                committed,
                capacity,
            });
        }
        Ok(())
    }
}
