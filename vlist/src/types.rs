/// Scroll direction derived from the latest scroll offset update.
///
/// `Idle` is restored by [`crate::Action::ScrollEnd`]; programmatic scrolls
/// (manual or jump-compensation echoes) never change the direction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScrollDirection {
    /// No scroll is in progress.
    #[default]
    Idle,
    /// Scrolling towards decreasing offsets.
    Up,
    /// Scrolling towards increasing offsets.
    Down,
}

/// An inclusive range of item indexes: `[start, end]`.
///
/// This mirrors how the renderer consumes the range (`for i in start..=end`).
/// With zero items the range degenerates to `[0, 0]`; callers gate on
/// [`crate::VirtualStore::items_length`] before iterating.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemsRange {
    pub start: usize,
    /// Inclusive.
    pub end: usize,
}

impl ItemsRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Returns the smallest range covering both `self` and `other`.
    pub fn union(&self, other: Self) -> Self {
        Self {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Returns `true` if `index` lies within `[start, end]`.
    pub fn contains(&self, index: usize) -> bool {
        self.start <= index && index <= self.end
    }
}

bitflags::bitflags! {
    /// Which slices of store state an action mutated, and which a subscriber
    /// is interested in.
    ///
    /// The same mask type serves both sides of the subscription: the reducer
    /// produces a mutation mask, and a subscriber is invoked when that mask
    /// intersects its interest.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct StateUpdate: u8 {
        /// Scroll offset, direction, or compensation state changed.
        const SCROLL = 0b001;
        /// Item sizes, the item count, or viewport geometry changed.
        const SIZE = 0b010;
        /// The change was caused by an actual scroll event from the
        /// container (as opposed to a programmatic update).
        const SCROLL_EVENT = 0b100;
    }
}
