use alloc::sync::Arc;
use alloc::vec::Vec;

use smallvec::SmallVec;

use crate::cache::SizeCache;
use crate::subscriber::{SubscriberCallback, Subscribers, SubscriptionId};
use crate::{CacheSnapshot, ItemsRange, ScrollDirection, StateUpdate};

/// Tolerance for fractional scroll offsets (non-integer device pixel ratios
/// report subpixel positions).
pub const SUBPIXEL_THRESHOLD: f64 = 1.5;

/// Scratch capacity for resize batches; layout observers report a handful of
/// items per frame.
type ResizeBatch = SmallVec<[(usize, f64); 8]>;

/// Inputs to the [`VirtualStore`] reducer.
///
/// Everything the outside world can do to the store goes through
/// [`VirtualStore::dispatch`] with one of these; there is no other mutation
/// path besides [`VirtualStore::flush_jump`].
#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    /// Layout-measured item sizes, as `(index, size)` observations.
    ItemResize(Vec<(usize, f64)>),
    /// New viewport geometry: total extent plus the two non-scrollable
    /// spacer paddings inside the viewport element.
    ViewportResize {
        total: f64,
        start_spacer: f64,
        end_spacer: f64,
    },
    /// The item sequence grew or shrank. With `is_shift` the delta applies
    /// at the start (prepend or shift-removal) and scroll position is
    /// compensated; otherwise at the end.
    ItemsLengthChange { length: usize, is_shift: bool },
    /// A scroll event arrived from the container.
    Scroll(f64),
    /// Scrolling has settled (native scrollend or a quiescence detector).
    ScrollEnd,
    /// A programmatic scroll is about to start.
    ManualScroll,
    /// A smooth programmatic scroll towards `target offset` is about to
    /// start; pre-commits the target range so it stays rendered during the
    /// animation.
    BeforeManualSmoothScroll(f64),
}

/// Configuration for [`VirtualStore::new`].
#[derive(Clone, Debug)]
pub struct StoreOptions {
    /// Number of items in the sequence.
    pub elements_count: usize,
    /// Estimated size of an unmeasured item; the anchor for all layout math
    /// until measurements arrive.
    pub item_size: f64,
    /// Seeds the viewport size estimate before the real container reports
    /// geometry, reducing first-paint churn.
    pub initial_item_count: usize,
    /// Pre-warmed cache state from a previous session.
    pub cache: Option<CacheSnapshot>,
    /// Bottom-anchored layout: short content hugs the viewport end.
    pub is_reverse: bool,
    /// Re-estimate the default item size once from real measurements.
    pub should_auto_estimate_item_size: bool,
    /// Queue jumps while a scroll is in progress instead of applying them
    /// immediately. Platforms that cancel momentum scrolling when scroll
    /// position is written mid-scroll (iOS WebKit) need this.
    pub defer_jump_while_scrolling: bool,
}

impl StoreOptions {
    pub fn new(elements_count: usize) -> Self {
        Self {
            elements_count,
            item_size: 40.0,
            initial_item_count: 0,
            cache: None,
            is_reverse: false,
            should_auto_estimate_item_size: false,
            defer_jump_while_scrolling: false,
        }
    }

    pub fn with_item_size(mut self, item_size: f64) -> Self {
        self.item_size = item_size;
        self
    }

    pub fn with_initial_item_count(mut self, initial_item_count: usize) -> Self {
        self.initial_item_count = initial_item_count;
        self
    }

    pub fn with_cache(mut self, cache: Option<CacheSnapshot>) -> Self {
        self.cache = cache;
        self
    }

    pub fn with_reverse(mut self, is_reverse: bool) -> Self {
        self.is_reverse = is_reverse;
        self
    }

    pub fn with_auto_estimate_item_size(mut self, enabled: bool) -> Self {
        self.should_auto_estimate_item_size = enabled;
        self
    }

    pub fn with_jump_deferral_while_scrolling(mut self, enabled: bool) -> Self {
        self.defer_jump_while_scrolling = enabled;
        self
    }
}

/// The virtualization state machine.
///
/// A reducer over [`Action`]: scroll and resize events enter as actions, the
/// store commits the new state, may schedule a scroll-position compensation
/// ("jump"), and synchronously notifies interested subscribers. The renderer
/// then reads the range, per-item offsets, and total size back out, lays
/// items out absolutely, and reports measured sizes as further actions.
///
/// Dispatch is not re-entrant; subscriber callbacks only receive the sync
/// hint, so they cannot alias the store while it is mid-commit (the borrow
/// checker enforces what the contract demands).
///
/// Queries that resolve lazy prefix sums take `&mut self`; the store is the
/// cache's single writer.
#[derive(Debug)]
pub struct VirtualStore {
    cache: SizeCache,
    viewport_size: f64,
    start_spacer_size: f64,
    end_spacer_size: f64,
    scroll_offset: f64,
    scroll_direction: ScrollDirection,
    jump: f64,
    pending_jump: f64,
    flushed_jump: f64,
    jump_count: u64,
    prepended: bool,
    manual_scrolling: bool,
    smooth_scroll_range: Option<ItemsRange>,
    prev_range: ItemsRange,
    is_reverse: bool,
    should_auto_estimate_item_size: bool,
    defer_jump_while_scrolling: bool,
    subscribers: Subscribers,
}

impl VirtualStore {
    pub fn new(options: StoreOptions) -> Self {
        let StoreOptions {
            elements_count,
            item_size,
            initial_item_count,
            cache,
            is_reverse,
            should_auto_estimate_item_size,
            defer_jump_while_scrolling,
        } = options;
        sdebug!(
            elements_count,
            item_size,
            initial_item_count,
            is_reverse,
            "VirtualStore::new"
        );
        Self {
            cache: SizeCache::new(elements_count, item_size, cache),
            viewport_size: item_size * initial_item_count as f64,
            start_spacer_size: 0.0,
            end_spacer_size: 0.0,
            scroll_offset: 0.0,
            scroll_direction: ScrollDirection::Idle,
            jump: 0.0,
            pending_jump: 0.0,
            flushed_jump: 0.0,
            jump_count: 0,
            prepended: false,
            manual_scrolling: false,
            smooth_scroll_range: None,
            prev_range: ItemsRange::new(0, initial_item_count),
            is_reverse,
            should_auto_estimate_item_size,
            defer_jump_while_scrolling,
            subscribers: Subscribers::default(),
        }
    }

    /// Registers a subscriber for the state slices in `interest`.
    ///
    /// Callbacks run synchronously after each commit that touches an
    /// interesting slice; see [`StateUpdate`].
    pub fn subscribe(
        &mut self,
        interest: StateUpdate,
        callback: impl Fn(bool) + Send + Sync + 'static,
    ) -> SubscriptionId {
        self.subscribers
            .subscribe(interest, Arc::new(callback) as SubscriberCallback)
    }

    /// Removes a subscription; returns `true` when it existed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.unsubscribe(id)
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    // ---- queries ---------------------------------------------------------

    pub fn items_length(&self) -> usize {
        self.cache.len()
    }

    /// Measured size of `index`, or the default estimate.
    pub fn item_size(&self, index: usize) -> f64 {
        self.cache.item_size(index)
    }

    pub fn is_unmeasured_item(&self, index: usize) -> bool {
        self.cache.is_unmeasured(index)
    }

    /// Whether the pre-committed smooth-scroll range (padded by one item on
    /// each side, boundary items can shift the target) still contains
    /// unmeasured items.
    pub fn has_unmeasured_items_in_smooth_scroll_range(&self) -> bool {
        let Some(range) = self.smooth_scroll_range else {
            return false;
        };
        let length = self.cache.len();
        if length == 0 {
            return false;
        }
        let start = range.start.saturating_sub(1);
        let end = (range.end + 1).min(length - 1);
        (start..=end).any(|index| self.cache.is_unmeasured(index))
    }

    /// Start offset of `index`, as the renderer must place it: the cached
    /// prefix sum minus any queued (not yet delivered) jump, shifted to the
    /// viewport end in reverse mode when content is short.
    pub fn item_offset(&mut self, index: usize) -> f64 {
        let mut offset = self.cache.compute_offset(index) - self.pending_jump;
        if self.is_reverse {
            offset += (self.viewport_size - self.cache.compute_total_size()).max(0.0);
        }
        offset
    }

    pub fn total_size(&mut self) -> f64 {
        self.cache.compute_total_size()
    }

    /// Size of the scrollable content: the items, or the spacer-less
    /// viewport when the items do not fill it.
    pub fn scroll_size(&mut self) -> f64 {
        let inner_viewport = self.viewport_size - self.start_spacer_size - self.end_spacer_size;
        self.cache.compute_total_size().max(inner_viewport)
    }

    pub fn max_scroll_offset(&mut self) -> f64 {
        let inner_viewport = self.viewport_size - self.start_spacer_size - self.end_spacer_size;
        self.scroll_size() - inner_viewport
    }

    pub fn scroll_offset(&self) -> f64 {
        self.scroll_offset
    }

    pub fn scroll_direction(&self) -> ScrollDirection {
        self.scroll_direction
    }

    pub fn viewport_size(&self) -> f64 {
        self.viewport_size
    }

    pub fn start_spacer_size(&self) -> f64 {
        self.start_spacer_size
    }

    pub fn end_spacer_size(&self) -> f64 {
        self.end_spacer_size
    }

    /// Generation token; bumped every time a jump becomes deliverable.
    pub fn jump_count(&self) -> u64 {
        self.jump_count
    }

    /// The inclusive index range the renderer must materialize.
    ///
    /// While a flushed jump awaits its echo scroll event, the previous range
    /// is returned unchanged so the compensation cannot flicker items in and
    /// out. During a smooth programmatic scroll the result is widened to
    /// cover the pre-committed target range.
    pub fn range(&mut self) -> ItemsRange {
        if self.flushed_jump != 0.0 {
            return self.prev_range;
        }
        let offset = (self.scroll_offset - self.start_spacer_size).max(0.0);
        let mut next = self
            .cache
            .compute_range(offset, self.prev_range.start, self.viewport_size);
        if let Some(smooth) = self.smooth_scroll_range {
            next = next.union(smooth);
        }
        self.prev_range = next;
        next
    }

    /// Deep, serializable copy of the size cache for persistence.
    pub fn cache_snapshot(&self) -> CacheSnapshot {
        self.cache.snapshot()
    }

    // ---- jump delivery ---------------------------------------------------

    /// Takes the accumulated compensation the renderer must add to the
    /// container's scroll position, clearing it.
    ///
    /// When the viewport exceeds the content no scroll write can stick, so
    /// the correction is dropped and `0` is returned.
    pub fn flush_jump(&mut self) -> f64 {
        if self.viewport_size >= self.cache.compute_total_size() {
            self.jump = 0.0;
            self.flushed_jump = 0.0;
            return 0.0;
        }
        self.flushed_jump = self.jump;
        self.jump = 0.0;
        strace!(flushed_jump = self.flushed_jump, "flush_jump");
        self.flushed_jump
    }

    fn apply_jump(&mut self, jump: f64) {
        if jump == 0.0 {
            return;
        }
        if self.defer_jump_while_scrolling && self.scroll_direction != ScrollDirection::Idle {
            // Writing scroll position now would kill the momentum scroll;
            // queue until SCROLL_END.
            self.pending_jump += jump;
            strace!(pending_jump = self.pending_jump, "apply_jump deferred");
        } else {
            self.jump += jump;
            self.jump_count += 1;
            strace!(jump = self.jump, jump_count = self.jump_count, "apply_jump");
        }
    }

    /// Sum of size deltas the given observations will cause, relative to the
    /// current effective sizes. With `keep_end` only growth counts: an item
    /// shrinking at the list end must not push the anchored user upward.
    fn calculate_jump(&self, updates: &[(usize, f64)], keep_end: bool) -> f64 {
        updates.iter().fold(0.0, |acc, &(index, size)| {
            let diff = size - self.cache.item_size(index);
            if keep_end && diff <= 0.0 {
                acc
            } else {
                acc + diff
            }
        })
    }

    // ---- reducer ---------------------------------------------------------

    /// Applies an action and synchronously notifies interested subscribers.
    pub fn dispatch(&mut self, action: Action) {
        let mut mutated = StateUpdate::empty();
        let mut should_sync = false;
        let mut should_flush_pending_jump = false;

        match action {
            Action::ItemResize(entries) => {
                let updated: ResizeBatch = entries
                    .into_iter()
                    .filter(|&(index, size)| {
                        index < self.cache.len() && !self.cache.slot_equals(index, size)
                    })
                    .collect();
                if !updated.is_empty() {
                    strace!(count = updated.len(), "item_resize");
                    let max_scroll_offset = self.max_scroll_offset();
                    let diff = if self.scroll_offset == 0.0 {
                        // Anchored at the very start; sizes may settle freely
                        // below the fold.
                        0.0
                    } else if self.scroll_offset > max_scroll_offset - SUBPIXEL_THRESHOLD {
                        // Anchored at the end; only growth may push content.
                        self.calculate_jump(&updated, true)
                    } else if self.prepended {
                        // Fresh prepend: the deltas sit above the window.
                        self.calculate_jump(&updated, false)
                    } else {
                        let above: ResizeBatch = updated
                            .iter()
                            .copied()
                            .filter(|&(index, _)| index < self.prev_range.start)
                            .collect();
                        self.calculate_jump(&above, false)
                    };
                    if diff != 0.0 {
                        self.apply_jump(diff);
                    }

                    let mut measured_new = false;
                    for &(index, size) in &updated {
                        if self.cache.set_item_size(index, size) {
                            measured_new = true;
                        }
                    }
                    if self.should_auto_estimate_item_size
                        && measured_new
                        && self.scroll_offset == 0.0
                    {
                        self.cache.estimate_default_item_size();
                        sdebug!(
                            default_size = self.cache.default_size(),
                            "estimated default item size"
                        );
                        self.should_auto_estimate_item_size = false;
                    }
                    self.prepended = false;
                    mutated = StateUpdate::SIZE;
                    should_sync = true;
                }
            }

            Action::ViewportResize {
                total,
                start_spacer,
                end_spacer,
            } => {
                if total != self.viewport_size {
                    strace!(total, start_spacer, end_spacer, "viewport_resize");
                    self.viewport_size = total;
                    self.start_spacer_size = start_spacer;
                    self.end_spacer_size = end_spacer;
                    mutated = StateUpdate::SIZE;
                }
            }

            Action::ItemsLengthChange { length, is_shift } => {
                if length == self.cache.len() {
                    // No-op; nothing moved.
                } else if is_shift {
                    // Captured before the mutation moves the end.
                    let distance_to_end = self.max_scroll_offset() - self.scroll_offset;
                    let (shift, is_remove) = self.cache.update_length(length, true);
                    strace!(length, shift, is_remove, "items_length_change shift");
                    self.apply_jump(if is_remove {
                        // Removal may not drag the offset past 0.
                        -shift.min(distance_to_end)
                    } else {
                        shift
                    });
                    self.prepended = !is_remove;
                    mutated = StateUpdate::SCROLL;
                } else {
                    self.cache.update_length(length, false);
                }
            }

            Action::Scroll(offset) => {
                let next = offset.clamp(0.0, self.max_scroll_offset());
                let flushed_jump = self.flushed_jump;
                self.flushed_jump = 0.0;
                if next != self.scroll_offset {
                    let delta = next - self.scroll_offset;
                    let distance = delta.abs();
                    // The scroll write that delivered the last jump echoes
                    // back as a regular event; don't let it flip direction.
                    let just_jumped = flushed_jump != 0.0 && distance < flushed_jump.abs() + 1.0;
                    if !just_jumped && !self.manual_scrolling {
                        self.scroll_direction = if delta < 0.0 {
                            ScrollDirection::Up
                        } else {
                            ScrollDirection::Down
                        };
                    }
                    // A teleport-sized distance renders synchronously so the
                    // user never sees an unmaterialized window.
                    should_sync = distance > self.viewport_size;
                    self.scroll_offset = next;
                    mutated = StateUpdate::SCROLL | StateUpdate::SCROLL_EVENT;
                }
            }

            Action::ScrollEnd => {
                mutated = StateUpdate::SCROLL;
                if self.scroll_direction != ScrollDirection::Idle {
                    should_flush_pending_jump = true;
                    self.scroll_direction = ScrollDirection::Idle;
                }
                self.manual_scrolling = false;
                self.smooth_scroll_range = None;
            }

            Action::ManualScroll => {
                self.manual_scrolling = true;
            }

            Action::BeforeManualSmoothScroll(target_offset) => {
                let offset = (target_offset - self.start_spacer_size).max(0.0);
                let range = self
                    .cache
                    .compute_range(offset, self.prev_range.start, self.viewport_size);
                strace!(target_offset, ?range, "before_manual_smooth_scroll");
                self.smooth_scroll_range = Some(range);
                mutated = StateUpdate::SCROLL;
            }
        }

        if !mutated.is_empty() {
            if should_flush_pending_jump && self.pending_jump != 0.0 {
                self.jump += self.pending_jump;
                self.pending_jump = 0.0;
                self.jump_count += 1;
            }
            self.subscribers.notify(mutated, should_sync);
        }
    }
}
