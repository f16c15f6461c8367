// Example: minimal windowing over a million rows.
use vlist::{Action, StoreOptions, VirtualStore};

fn main() {
    let mut store = VirtualStore::new(StoreOptions::new(1_000_000).with_item_size(40.0));
    store.dispatch(Action::ViewportResize {
        total: 600.0,
        start_spacer: 0.0,
        end_spacer: 0.0,
    });
    store.dispatch(Action::Scroll(123_456.0));

    let range = store.range();
    println!("total_size={}", store.total_size());
    println!("range={range:?}");
    println!(
        "first visible item starts at {}",
        store.item_offset(range.start)
    );

    // Layout measures the visible items; the window is re-derived.
    let batch: Vec<(usize, f64)> = (range.start..=range.end).map(|i| (i, 56.0)).collect();
    store.dispatch(Action::ItemResize(batch));
    println!("after measurement: total_size={}", store.total_size());
    println!("after measurement: range={:?}", store.range());
}
