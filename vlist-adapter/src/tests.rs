use crate::*;
use vlist::{ScrollDirection, StoreOptions, VirtualStore};

/// A scrollable element stand-in: clamps writes like a real container and
/// queues the echo events a browser would fire back.
#[derive(Debug, Default)]
struct SimContainer {
    offset: f64,
    max_offset: f64,
    echoes: Vec<f64>,
}

impl SimContainer {
    fn new(max_offset: f64) -> Self {
        Self {
            offset: 0.0,
            max_offset,
            echoes: Vec::new(),
        }
    }
}

impl ScrollContainer for SimContainer {
    fn set_scroll_offset(&mut self, offset: f64) {
        self.offset = offset.clamp(0.0, self.max_offset);
        self.echoes.push(self.offset);
    }

    fn scroll_by(&mut self, delta: f64) {
        self.set_scroll_offset(self.offset + delta);
    }
}

fn controller(count: usize, viewport: f64) -> Controller<SimContainer> {
    let store = VirtualStore::new(StoreOptions::new(count).with_item_size(40.0));
    let max_offset = count as f64 * 40.0 - viewport;
    let mut c = Controller::new(store, SimContainer::new(max_offset));
    c.on_viewport_resize(viewport, 0.0, 0.0);
    c
}

/// Feeds queued container echoes back through the scroll-event path.
fn pump(c: &mut Controller<SimContainer>, now_ms: u64) {
    loop {
        let echoes = std::mem::take(&mut c.container_mut().echoes);
        if echoes.is_empty() {
            break;
        }
        for offset in echoes {
            c.on_scroll(offset, now_ms);
        }
    }
}

#[test]
fn user_scroll_flows_into_the_store_and_settles() {
    let mut c = controller(100, 400.0);

    c.on_scroll(800.0, 0);
    assert_eq!(c.store().scroll_offset(), 800.0);
    assert_eq!(c.store().scroll_direction(), ScrollDirection::Down);

    // Still within the debounce window.
    c.tick(100);
    assert_eq!(c.store().scroll_direction(), ScrollDirection::Down);

    c.tick(200);
    assert_eq!(c.store().scroll_direction(), ScrollDirection::Idle);
}

#[test]
fn native_scroll_end_bypasses_the_detector() {
    let mut c = controller(100, 400.0);
    c.on_scroll(800.0, 0);
    c.on_scroll_end();
    assert_eq!(c.store().scroll_direction(), ScrollDirection::Idle);
    // The detector has nothing left to do.
    c.tick(1_000);
}

#[test]
fn jump_delivery_moves_the_container_without_flipping_direction() {
    let mut c = controller(100, 400.0);
    c.container_mut().max_offset = 8_000.0; // room for the prepended content
    c.on_scroll(800.0, 0);
    c.tick(200); // settle

    c.on_items_length_change(110, true);
    c.tick(216);
    assert_eq!(c.container().offset, 800.0 + 400.0);

    pump(&mut c, 216);
    assert_eq!(c.store().scroll_offset(), 1200.0);
    // The echo of the compensation write is not a user scroll.
    assert_eq!(c.store().scroll_direction(), ScrollDirection::Idle);
}

#[test]
fn jump_is_delivered_once() {
    let mut c = controller(100, 400.0);
    c.container_mut().max_offset = 8_000.0;
    c.on_scroll(800.0, 0);
    c.tick(200);

    c.on_items_length_change(110, true);
    c.tick(216);
    pump(&mut c, 216);
    let after_delivery = c.container().offset;

    c.tick(232);
    c.tick(248);
    assert_eq!(c.container().offset, after_delivery);
}

#[test]
fn scroll_to_is_a_manual_scroll() {
    let mut c = controller(100, 400.0);
    c.scroll_to(2_000.0);
    pump(&mut c, 0);

    assert_eq!(c.store().scroll_offset(), 2_000.0);
    // Programmatic writes never produce a direction.
    assert_eq!(c.store().scroll_direction(), ScrollDirection::Idle);

    c.tick(200);
    c.on_scroll(2_100.0, 200);
    assert_eq!(c.store().scroll_direction(), ScrollDirection::Down);
}

#[test]
fn offset_for_index_honors_alignment_and_clamps() {
    let mut c = controller(100, 400.0);

    assert_eq!(c.offset_for_index(10, Align::Start), 400.0);
    assert_eq!(c.offset_for_index(10, Align::End), 40.0);
    assert_eq!(c.offset_for_index(10, Align::Center), 220.0);

    // First/last items clamp into the scrollable bounds.
    assert_eq!(c.offset_for_index(0, Align::End), 0.0);
    assert_eq!(c.offset_for_index(99, Align::Start), 3_600.0);
    assert_eq!(c.offset_for_index(usize::MAX, Align::Start), 3_600.0);
}

#[test]
fn align_auto_keeps_fully_visible_items_in_place() {
    let mut c = controller(100, 400.0);
    c.on_scroll(400.0, 0);
    c.tick(200);

    // Item 12 spans [480, 520): fully visible at offset 400.
    assert_eq!(c.offset_for_index(12, Align::Auto), 400.0);
    // Item 2 is above the window: align to start.
    assert_eq!(c.offset_for_index(2, Align::Auto), 80.0);
    // Item 50 is below: align to end.
    assert_eq!(
        c.offset_for_index(50, Align::Auto),
        c.offset_for_index(50, Align::End)
    );
}

#[test]
fn smooth_scroll_reaches_the_target_and_settles() {
    let mut c = controller(1_000, 400.0);
    c.smooth_scroll_to_index(50, Align::Start);
    assert!(c.is_animating());

    let mut now_ms = 0u64;
    let mut last = c.store().scroll_offset();
    while c.is_animating() {
        now_ms += 16;
        c.tick(now_ms);
        pump(&mut c, now_ms);
        assert!(c.store().scroll_offset() >= last);
        last = c.store().scroll_offset();
        // The animation is a manual scroll end to end.
        if c.is_animating() {
            assert_eq!(c.store().scroll_direction(), ScrollDirection::Idle);
        }
    }

    assert_eq!(c.store().scroll_offset(), 2_000.0);
    c.tick(now_ms + 200);
    assert_eq!(c.store().scroll_direction(), ScrollDirection::Idle);
}

#[test]
fn smooth_scroll_retargets_while_the_destination_is_unmeasured() {
    let mut c = controller(100, 400.0);
    c.smooth_scroll_to_index(50, Align::Start);

    // Early in the animation, items above the target get measured larger
    // than the estimate; the item's real position moves down.
    c.tick(16);
    pump(&mut c, 16);
    c.on_item_resize((0..5).map(|i| (i, 80.0)).collect());

    let mut now_ms = 16u64;
    while c.is_animating() {
        now_ms += 16;
        c.tick(now_ms);
        pump(&mut c, now_ms);
    }

    // 5 × 80 + 45 × 40 = 2200: the animation chased the corrected offset.
    assert_eq!(c.store_mut().item_offset(50), 2_200.0);
    assert_eq!(c.store().scroll_offset(), 2_200.0);
}

#[test]
fn smooth_scroll_decelerates_into_the_target() {
    let mut c = controller(1_000, 400.0);
    c.smooth_scroll_to(8_000.0);

    let mut now_ms = 0u64;
    let mut prev_offset = 0.0;
    let mut prev_step = f64::INFINITY;
    while c.is_animating() {
        now_ms += 16;
        let offset = c.tick(now_ms).unwrap();
        pump(&mut c, now_ms);
        let step = offset - prev_offset;
        assert!(step >= 0.0);
        // Each frame covers less ground than the last; the final settle
        // snap may add a subpixel.
        assert!(step <= prev_step + 1.0);
        prev_step = step;
        prev_offset = offset;
    }
    assert_eq!(c.store().scroll_offset(), 8_000.0);
}

#[test]
fn smooth_scroll_works_upward() {
    let mut c = controller(1_000, 400.0);
    c.on_scroll(8_000.0, 0);
    c.tick(200); // settle

    c.smooth_scroll_to(400.0);
    let mut now_ms = 200u64;
    let mut last = c.store().scroll_offset();
    while c.is_animating() {
        now_ms += 16;
        c.tick(now_ms);
        pump(&mut c, now_ms);
        assert!(c.store().scroll_offset() <= last);
        last = c.store().scroll_offset();
    }
    assert_eq!(c.store().scroll_offset(), 400.0);
}

#[test]
fn smooth_scroll_speed_is_clamped_to_a_sane_range() {
    let mut c = controller(1_000, 400.0).with_smooth_scroll_speed(50.0);
    c.smooth_scroll_to(1_000.0);

    let mut now_ms = 0u64;
    let mut ticks = 0;
    while c.is_animating() {
        now_ms += 16;
        c.tick(now_ms);
        pump(&mut c, now_ms);
        ticks += 1;
        assert!(ticks < 20, "clamped speed must still settle quickly");
    }
    assert_eq!(c.store().scroll_offset(), 1_000.0);
}

#[test]
fn interrupt_cancels_the_animation() {
    let mut c = controller(1_000, 400.0);
    c.smooth_scroll_to(10_000.0);
    c.tick(16);
    pump(&mut c, 16);
    let stopped_at = c.store().scroll_offset();

    c.interrupt();
    assert!(!c.is_animating());
    assert_eq!(c.tick(32), None);
    assert_eq!(c.store().scroll_offset(), stopped_at);
}
