//! Fixed-size merge grid storing item stacks for a single hero class.

use serde::{Deserialize, Serialize};

use crate::{balance::GRID_SLOTS, catalog::ItemKind};

/// Item occupying a merge grid slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemStack {
    /// Kind of the item.
    pub kind: ItemKind,
    /// Level of the item, starting at 1.
    pub level: u32,
}

impl ItemStack {
    /// Creates a new item stack.
    #[must_use]
    pub const fn new(kind: ItemKind, level: u32) -> Self {
        Self { kind, level }
    }

    /// Reports whether two stacks may be merged into one.
    #[must_use]
    pub fn merges_with(&self, other: &Self) -> bool {
        self.kind == other.kind && self.level == other.level
    }

    /// Stack produced by merging two copies of `self`.
    #[must_use]
    pub const fn promoted(self) -> Self {
        Self {
            kind: self.kind,
            level: self.level.saturating_add(1),
        }
    }
}

/// Result of combining two slots.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MergeOutcome {
    /// Nothing happened: an index was invalid, a slot was empty or both indices matched.
    Ignored,
    /// The stacks merged into the target slot.
    Merged(ItemStack),
    /// The slots exchanged their contents.
    Swapped,
}

/// Ordered 3x3 inventory; slot order decides placement and merge priority.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Option<ItemStack>>", into = "Vec<Option<ItemStack>>")]
pub struct MergeGrid {
    slots: [Option<ItemStack>; GRID_SLOTS],
}

impl MergeGrid {
    /// Creates an empty grid.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Contents of every slot in index order.
    #[must_use]
    pub fn slots(&self) -> &[Option<ItemStack>] {
        &self.slots
    }

    /// Item stored at `index`, if any.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<ItemStack> {
        self.slots.get(index).copied().flatten()
    }

    /// Iterates over the occupied slots.
    pub fn items(&self) -> impl Iterator<Item = ItemStack> + '_ {
        self.slots.iter().flatten().copied()
    }

    /// Lowest empty slot index.
    #[must_use]
    pub fn first_empty(&self) -> Option<usize> {
        self.slots.iter().position(Option::is_none)
    }

    /// Places `item` into the lowest empty slot and returns its index.
    pub fn insert(&mut self, item: ItemStack) -> Option<usize> {
        let index = self.first_empty()?;
        self.slots[index] = Some(item);
        Some(index)
    }

    /// Removes and returns the item stored at `index`.
    pub fn take(&mut self, index: usize) -> Option<ItemStack> {
        self.slots.get_mut(index).and_then(Option::take)
    }

    /// Merges `from` into `to` when the stacks match, otherwise swaps them.
    pub fn combine(&mut self, from: usize, to: usize) -> MergeOutcome {
        if from == to {
            return MergeOutcome::Ignored;
        }
        let (Some(source), Some(target)) = (self.get(from), self.get(to)) else {
            return MergeOutcome::Ignored;
        };

        if source.merges_with(&target) {
            let merged = target.promoted();
            self.slots[to] = Some(merged);
            self.slots[from] = None;
            MergeOutcome::Merged(merged)
        } else {
            self.slots.swap(from, to);
            MergeOutcome::Swapped
        }
    }

    /// First mergeable pair `(i, j)` with `i < j` in index order.
    #[must_use]
    pub fn first_merge_pair(&self) -> Option<(usize, usize)> {
        for (i, first) in self.slots.iter().enumerate() {
            let Some(first) = first else {
                continue;
            };
            for (offset, second) in self.slots[i + 1..].iter().enumerate() {
                if second.is_some_and(|second| first.merges_with(&second)) {
                    return Some((i, i + 1 + offset));
                }
            }
        }
        None
    }
}

impl From<Vec<Option<ItemStack>>> for MergeGrid {
    fn from(stored: Vec<Option<ItemStack>>) -> Self {
        let mut grid = Self::default();
        for (slot, item) in grid.slots.iter_mut().zip(stored) {
            *slot = item.filter(|item| item.level > 0);
        }
        grid
    }
}

impl From<MergeGrid> for Vec<Option<ItemStack>> {
    fn from(grid: MergeGrid) -> Self {
        grid.slots.to_vec()
    }
}
