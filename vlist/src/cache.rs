use alloc::vec::Vec;

use crate::ItemsRange;

/// Sentinel marking an unmeasured item size or an unresolved prefix sum.
///
/// Valid sizes are non-negative, so any negative value reads as uncached;
/// this exact constant is what snapshots encode.
pub const UNCACHED: f64 = -1.0;

#[inline]
fn is_uncached(value: f64) -> bool {
    value < 0.0
}

/// A deep, serializable copy of the size cache.
///
/// `offsets` entries are advisory: producers fill them with whatever prefix
/// sums happened to be resolved, and consumers are free to ignore them and
/// recompute. `UNCACHED` slots are encoded as `-1`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct CacheSnapshot {
    pub sizes: Vec<f64>,
    pub offsets: Vec<f64>,
    pub default_size: f64,
    pub length: usize,
}

/// Per-item sizes with lazily cached prefix sums.
///
/// Offsets are resolved front-to-back on demand; `computed_offset_index` is
/// the highest index whose cached prefix is still valid. Writing a size at
/// `i` leaves `offsets[i]` intact (it sums items before `i`) and invalidates
/// everything above.
#[derive(Clone, Debug)]
pub(crate) struct SizeCache {
    sizes: Vec<f64>,
    offsets: Vec<f64>,
    computed_offset_index: Option<usize>,
    default_size: f64,
}

impl SizeCache {
    pub(crate) fn new(length: usize, default_size: f64, snapshot: Option<CacheSnapshot>) -> Self {
        let (mut sizes, default_size) = match snapshot {
            Some(snapshot) => {
                let default_size = if snapshot.default_size > 0.0 {
                    snapshot.default_size
                } else {
                    default_size
                };
                (snapshot.sizes, default_size)
            }
            None => (Vec::with_capacity(length), default_size),
        };
        // The requested length wins over whatever the snapshot carried.
        sizes.resize(length, UNCACHED);
        Self {
            sizes,
            offsets: alloc::vec![UNCACHED; length],
            computed_offset_index: None,
            default_size,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.sizes.len()
    }

    pub(crate) fn default_size(&self) -> f64 {
        self.default_size
    }

    /// Measured size of `index`, or the default estimate while unmeasured.
    pub(crate) fn item_size(&self, index: usize) -> f64 {
        match self.sizes.get(index) {
            Some(&size) if !is_uncached(size) => size,
            _ => self.default_size,
        }
    }

    pub(crate) fn is_unmeasured(&self, index: usize) -> bool {
        self.sizes.get(index).map_or(true, |&size| is_uncached(size))
    }

    /// Returns `true` when the stored slot already holds exactly `size`
    /// (used to drop no-op resize observations).
    pub(crate) fn slot_equals(&self, index: usize, size: f64) -> bool {
        self.sizes
            .get(index)
            .is_some_and(|&stored| !is_uncached(stored) && stored == size)
    }

    /// Writes a measurement and invalidates prefix sums above `index`.
    ///
    /// Returns `true` when the slot was previously unmeasured.
    pub(crate) fn set_item_size(&mut self, index: usize, size: f64) -> bool {
        debug_assert!(index < self.sizes.len(), "resize index out of bounds");
        let was_unmeasured = is_uncached(self.sizes[index]);
        if !was_unmeasured && self.sizes[index] == size {
            return false;
        }
        self.sizes[index] = size;
        // offsets[index] sums items before `index`, so it stays valid.
        self.computed_offset_index = self.computed_offset_index.map(|c| c.min(index));
        was_unmeasured
    }

    /// Prefix sum of effective sizes before `index`, resolved lazily from the
    /// highest already-cached prefix.
    pub(crate) fn compute_offset(&mut self, index: usize) -> f64 {
        if self.sizes.is_empty() {
            return 0.0;
        }
        let index = index.min(self.sizes.len() - 1);
        if let Some(computed) = self.computed_offset_index {
            if computed >= index {
                return self.offsets[index];
            }
        }

        let (mut i, mut top) = match self.computed_offset_index {
            Some(computed) => (computed, self.offsets[computed]),
            None => {
                self.offsets[0] = 0.0;
                (0, 0.0)
            }
        };
        while i < index {
            top += self.item_size(i);
            i += 1;
            self.offsets[i] = top;
        }
        self.computed_offset_index = Some(index);
        top
    }

    pub(crate) fn compute_total_size(&mut self) -> f64 {
        if self.sizes.is_empty() {
            return 0.0;
        }
        let last = self.sizes.len() - 1;
        self.compute_offset(last) + self.item_size(last)
    }

    /// Index of the item containing `offset`, walking forward or backward
    /// from the `low` seed. Amortized O(1) for monotone scroll.
    fn find_index(&mut self, offset: f64, low: usize) -> usize {
        let length = self.sizes.len();
        if length == 0 {
            return 0;
        }
        let mut i = low.min(length - 1);
        let mut top = self.compute_offset(i);
        if top <= offset {
            while i < length - 1 {
                let size = self.item_size(i);
                // A zero-sized item pinned exactly at the window edge still
                // counts as the containing item.
                if size == 0.0 && top == offset {
                    break;
                }
                let next = top + size;
                if next > offset {
                    break;
                }
                top = next;
                i += 1;
            }
        } else {
            while i > 0 {
                i -= 1;
                top -= self.item_size(i);
                if top <= offset {
                    break;
                }
            }
        }
        i
    }

    /// Inclusive `[start, end]` of items intersecting
    /// `[scroll_offset, scroll_offset + viewport_size)`.
    pub(crate) fn compute_range(
        &mut self,
        scroll_offset: f64,
        prev_start: usize,
        viewport_size: f64,
    ) -> ItemsRange {
        let start = self.find_index(scroll_offset, prev_start);
        let end = self.find_index(scroll_offset + viewport_size, start);
        ItemsRange::new(start, end)
    }

    /// Grows or shrinks the cache at either end.
    ///
    /// With `is_shift` the delta applies at the start (prepend/shift) and the
    /// returned `shift` is the total size the affected items contribute,
    /// measured or default. The second value is `true` for a removal.
    pub(crate) fn update_length(&mut self, new_length: usize, is_shift: bool) -> (f64, bool) {
        let old_length = self.sizes.len();
        if new_length == old_length {
            return (0.0, false);
        }
        let is_remove = new_length < old_length;
        let mut shift = 0.0;

        if is_shift {
            if is_remove {
                let removed = old_length - new_length;
                let default_size = self.default_size;
                shift = self
                    .sizes
                    .drain(..removed)
                    .map(|size| if is_uncached(size) { default_size } else { size })
                    .sum();
                self.offsets.truncate(new_length);
            } else {
                let added = new_length - old_length;
                shift = self.default_size * added as f64;
                self.sizes.resize(new_length, UNCACHED);
                self.sizes.rotate_right(added);
                self.offsets.resize(new_length, UNCACHED);
            }
            // Every prefix moved.
            self.computed_offset_index = None;
        } else if is_remove {
            self.sizes.truncate(new_length);
            self.offsets.truncate(new_length);
            self.computed_offset_index = if new_length == 0 {
                None
            } else {
                self.computed_offset_index.map(|c| c.min(new_length - 1))
            };
        } else {
            self.sizes.resize(new_length, UNCACHED);
            self.offsets.resize(new_length, UNCACHED);
        }

        (shift, is_remove)
    }

    /// Replaces the default size with the average of measured sizes.
    ///
    /// No-op while nothing has been measured. All prefix sums are dropped
    /// since every unmeasured item changes effective size.
    pub(crate) fn estimate_default_item_size(&mut self) {
        let mut sum = 0.0;
        let mut measured = 0usize;
        for &size in &self.sizes {
            if !is_uncached(size) {
                sum += size;
                measured += 1;
            }
        }
        if measured == 0 {
            return;
        }
        self.default_size = sum / measured as f64;
        self.computed_offset_index = None;
    }

    pub(crate) fn snapshot(&self) -> CacheSnapshot {
        let mut offsets = alloc::vec![UNCACHED; self.offsets.len()];
        if let Some(computed) = self.computed_offset_index {
            offsets[..=computed].copy_from_slice(&self.offsets[..=computed]);
        }
        CacheSnapshot {
            sizes: self.sizes.clone(),
            offsets,
            default_size: self.default_size,
            length: self.sizes.len(),
        }
    }
}
