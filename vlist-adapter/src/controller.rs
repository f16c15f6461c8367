use alloc::vec::Vec;

use vlist::{Action, VirtualStore};

use crate::ScrollContainer;

/// Displacement below which an in-flight smooth scroll snaps onto its
/// target instead of decaying forever.
const SMOOTH_SETTLE_THRESHOLD: f64 = 0.5;

/// Alignment used by scroll-to helpers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Align {
    /// Align the item start to the viewport start.
    Start,
    /// Center the item in the viewport.
    Center,
    /// Align the item end to the viewport end.
    End,
    /// Choose `Start`/`End` automatically based on visibility.
    Auto,
}

/// A smooth-scroll destination.
///
/// Index destinations are re-resolved while the pre-committed range still
/// holds unmeasured items, since fresh measurements move the item's offset.
#[derive(Clone, Copy, Debug)]
enum SmoothTarget {
    Offset(f64),
    Index { index: usize, align: Align },
}

/// An in-flight smooth scroll with exponential ease-out.
///
/// Rather than sampling a fixed-duration curve, the animator tracks the
/// signed distance still to travel and shrinks it by `speed` every frame,
/// so motion decelerates visibly into the target. Re-aiming mid-flight
/// keeps the current position and only swaps the destination, which makes
/// measurement-driven target corrections free of discontinuities.
#[derive(Clone, Copy, Debug)]
struct SmoothScroll {
    destination: SmoothTarget,
    to: f64,
    /// Signed distance left to travel; `position() = to - remaining`.
    remaining: f64,
    /// Fraction of `remaining` travelled per frame.
    speed: f64,
}

impl SmoothScroll {
    fn new(destination: SmoothTarget, from: f64, to: f64, speed: f64) -> Self {
        Self {
            destination,
            to,
            remaining: to - from,
            speed,
        }
    }

    fn position(&self) -> f64 {
        self.to - self.remaining
    }

    /// Swaps the destination without moving the current position.
    fn re_aim(&mut self, new_to: f64) {
        let position = self.position();
        self.to = new_to;
        self.remaining = new_to - position;
    }

    /// One frame of decay. Returns the offset to write.
    fn advance(&mut self) -> f64 {
        self.remaining *= 1.0 - self.speed;
        if self.remaining.abs() < SMOOTH_SETTLE_THRESHOLD {
            // Land exactly; a decay never reaches the target on its own.
            self.remaining = 0.0;
        }
        self.position().max(0.0)
    }

    fn settled(&self) -> bool {
        self.remaining == 0.0
    }
}

/// A framework-neutral driver that wraps a [`VirtualStore`] and a scroll
/// container, and owns the adapter-side workflows:
///
/// - routing container events into store actions
/// - delivering flushed jump compensations as relative scroll writes
/// - detecting scroll quiescence for containers without a native scrollend
/// - programmatic scrolling, immediate and smooth (ease-out)
///
/// The embedder calls `on_*` when container events occur and `tick(now_ms)`
/// each frame or timer tick. Programmatic writes go out through the
/// container, which is expected to echo them back through the embedder's
/// scroll-event path like any real scrollable element.
#[derive(Debug)]
pub struct Controller<C> {
    store: VirtualStore,
    container: C,
    smooth: Option<SmoothScroll>,
    smooth_scroll_speed: f64,
    seen_jump_count: u64,
    last_scroll_event_ms: Option<u64>,
    scroll_end_delay_ms: u64,
}

impl<C: ScrollContainer> Controller<C> {
    pub fn new(store: VirtualStore, container: C) -> Self {
        let seen_jump_count = store.jump_count();
        Self {
            store,
            container,
            smooth: None,
            smooth_scroll_speed: 0.3,
            seen_jump_count,
            last_scroll_event_ms: None,
            scroll_end_delay_ms: 150,
        }
    }

    /// Debounce window for the scroll quiescence detector.
    pub fn with_scroll_end_delay_ms(mut self, delay_ms: u64) -> Self {
        self.scroll_end_delay_ms = delay_ms;
        self
    }

    /// Fraction of the remaining distance a smooth scroll covers per tick.
    /// Sensible values sit around 0.25–0.45 at typical frame rates.
    pub fn with_smooth_scroll_speed(mut self, speed: f64) -> Self {
        self.smooth_scroll_speed = speed.clamp(0.05, 0.95);
        self
    }

    pub fn store(&self) -> &VirtualStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut VirtualStore {
        &mut self.store
    }

    pub fn container(&self) -> &C {
        &self.container
    }

    pub fn container_mut(&mut self) -> &mut C {
        &mut self.container
    }

    pub fn into_parts(self) -> (VirtualStore, C) {
        (self.store, self.container)
    }

    pub fn is_animating(&self) -> bool {
        self.smooth.is_some()
    }

    /// Call this when the user grabs the list mid-animation (wheel, touch,
    /// scrollbar drag). Containers cannot distinguish their own echoes from
    /// user scrolls, so cancellation is driven by input events instead.
    pub fn interrupt(&mut self) {
        self.smooth = None;
    }

    // ---- container events ------------------------------------------------

    /// A scroll event arrived from the container (user scroll or the echo of
    /// a programmatic write).
    pub fn on_scroll(&mut self, offset: f64, now_ms: u64) {
        self.store.dispatch(Action::Scroll(offset));
        self.last_scroll_event_ms = Some(now_ms);
    }

    /// The container reported a native scrollend.
    pub fn on_scroll_end(&mut self) {
        self.last_scroll_event_ms = None;
        self.store.dispatch(Action::ScrollEnd);
    }

    /// The container reported new geometry.
    pub fn on_viewport_resize(&mut self, total: f64, start_spacer: f64, end_spacer: f64) {
        self.store.dispatch(Action::ViewportResize {
            total,
            start_spacer,
            end_spacer,
        });
    }

    /// Layout measured item sizes.
    pub fn on_item_resize(&mut self, entries: Vec<(usize, f64)>) {
        self.store.dispatch(Action::ItemResize(entries));
    }

    /// The item sequence changed length.
    pub fn on_items_length_change(&mut self, length: usize, is_shift: bool) {
        self.store.dispatch(Action::ItemsLengthChange { length, is_shift });
    }

    // ---- frame driving ---------------------------------------------------

    /// Advances the controller:
    ///
    /// 1. delivers any newly flushed jump to the container,
    /// 2. steps an active smooth scroll (re-aiming index destinations while
    ///    their surroundings are unmeasured), or
    /// 3. runs the scroll quiescence detector.
    ///
    /// Returns the offset written this tick, if any.
    pub fn tick(&mut self, now_ms: u64) -> Option<f64> {
        self.deliver_jump();

        if let Some(mut smooth) = self.smooth {
            if self.store.has_unmeasured_items_in_smooth_scroll_range() {
                if let SmoothTarget::Index { index, align } = smooth.destination {
                    smooth.re_aim(self.offset_for_index(index, align));
                }
            }

            let offset = smooth.advance();
            self.container.set_scroll_offset(offset);

            if smooth.settled() {
                self.smooth = None;
                self.last_scroll_event_ms = None;
                self.store.dispatch(Action::ScrollEnd);
            } else {
                self.smooth = Some(smooth);
            }
            return Some(offset);
        }

        if let Some(last) = self.last_scroll_event_ms {
            if now_ms.saturating_sub(last) >= self.scroll_end_delay_ms {
                self.last_scroll_event_ms = None;
                self.store.dispatch(Action::ScrollEnd);
            }
        }
        None
    }

    fn deliver_jump(&mut self) {
        if self.store.jump_count() == self.seen_jump_count {
            return;
        }
        self.seen_jump_count = self.store.jump_count();
        let jump = self.store.flush_jump();
        if jump != 0.0 {
            self.container.scroll_by(jump);
        }
    }

    // ---- programmatic scrolling ------------------------------------------

    /// Jumps to an absolute offset (no animation).
    pub fn scroll_to(&mut self, offset: f64) {
        self.interrupt();
        self.store.dispatch(Action::ManualScroll);
        self.container.set_scroll_offset(offset.max(0.0));
    }

    /// Jumps to an item (no animation).
    pub fn scroll_to_index(&mut self, index: usize, align: Align) {
        let offset = self.offset_for_index(index, align);
        self.scroll_to(offset);
    }

    /// Starts an eased scroll towards an absolute offset; [`Self::tick`]
    /// drives it to completion.
    pub fn smooth_scroll_to(&mut self, offset: f64) {
        let to = offset.clamp(0.0, self.store.max_scroll_offset());
        self.begin_smooth(SmoothTarget::Offset(to), to);
    }

    /// Starts an eased scroll towards an item, re-resolving the destination
    /// while nearby items are still unmeasured.
    pub fn smooth_scroll_to_index(&mut self, index: usize, align: Align) {
        let to = self.offset_for_index(index, align);
        self.begin_smooth(SmoothTarget::Index { index, align }, to);
    }

    fn begin_smooth(&mut self, destination: SmoothTarget, to: f64) {
        self.store.dispatch(Action::BeforeManualSmoothScroll(to));
        self.store.dispatch(Action::ManualScroll);
        let from = self.store.scroll_offset();
        self.smooth = Some(SmoothScroll::new(
            destination,
            from,
            to,
            self.smooth_scroll_speed,
        ));
    }

    /// The (clamped) offset that brings `index` into the requested position.
    pub fn offset_for_index(&mut self, index: usize, align: Align) -> f64 {
        let length = self.store.items_length();
        if length == 0 {
            return 0.0;
        }
        let index = index.min(length - 1);
        let start = self.store.item_offset(index);
        let size = self.store.item_size(index);
        let view = self.store.viewport_size();

        let target = match align {
            Align::Start => start,
            Align::End => start + size - view,
            Align::Center => start + size / 2.0 - view / 2.0,
            Align::Auto => {
                let cur = self.store.scroll_offset();
                let cur_end = cur + view;
                if start >= cur && start + size <= cur_end {
                    cur
                } else if start < cur {
                    start
                } else {
                    start + size - view
                }
            }
        };

        target.clamp(0.0, self.store.max_scroll_offset())
    }
}
