// Example: chat-style "load older messages" without visual jumps.
//
// The renderer flow on prepend is:
// 1) the data source grows at the start (ITEMS_LENGTH_CHANGE with shift)
// 2) the store schedules a jump; the renderer flushes it and adds it to the
//    container's scroll position
// 3) the container echoes the write as a scroll event, which the store
//    recognizes and ignores for direction purposes
use vlist::{Action, StoreOptions, VirtualStore};

fn main() {
    let mut store = VirtualStore::new(StoreOptions::new(100).with_item_size(40.0));
    store.dispatch(Action::ViewportResize {
        total: 400.0,
        start_spacer: 0.0,
        end_spacer: 0.0,
    });

    let mut container_offset = 800.0;
    store.dispatch(Action::Scroll(container_offset));
    store.dispatch(Action::ScrollEnd);

    let anchor = store.range().start;
    println!(
        "anchor item {anchor} sits at screen y={}",
        store.item_offset(anchor) - container_offset
    );

    // Ten older messages arrive above the viewport.
    store.dispatch(Action::ItemsLengthChange {
        length: 110,
        is_shift: true,
    });
    let jump = store.flush_jump();
    container_offset += jump;
    store.dispatch(Action::Scroll(container_offset));

    println!("compensated by {jump}");
    println!(
        "anchor item (now {}) sits at screen y={}",
        anchor + 10,
        store.item_offset(anchor + 10) - container_offset
    );
}
