// Example: ease-out smooth scroll against a simulated container.
use vlist::{StoreOptions, VirtualStore};
use vlist_adapter::{Align, Controller, ScrollContainer};

#[derive(Debug, Default)]
struct SimContainer {
    offset: f64,
    echo: Option<f64>,
}

impl ScrollContainer for SimContainer {
    fn set_scroll_offset(&mut self, offset: f64) {
        self.offset = offset.max(0.0);
        self.echo = Some(self.offset);
    }

    fn scroll_by(&mut self, delta: f64) {
        self.set_scroll_offset(self.offset + delta);
    }
}

fn main() {
    let store = VirtualStore::new(StoreOptions::new(10_000).with_item_size(40.0));
    let mut c = Controller::new(store, SimContainer::default()).with_smooth_scroll_speed(0.35);
    c.on_viewport_resize(600.0, 0.0, 0.0);

    c.smooth_scroll_to_index(2_000, Align::Start);

    let mut now_ms = 0u64;
    while c.is_animating() {
        now_ms += 16;
        c.tick(now_ms);
        if let Some(offset) = c.container_mut().echo.take() {
            c.on_scroll(offset, now_ms);
        }
        let offset = c.store().scroll_offset();
        let range = c.store_mut().range();
        println!("t={now_ms:>3}ms offset={offset:>8.1} range={range:?}");
    }
}
