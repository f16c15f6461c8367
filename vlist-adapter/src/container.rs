/// The scrollable element the adapter writes to.
///
/// Both writes are programmatic scrolls: the container is expected to apply
/// them and then report the resulting position back through the embedder's
/// normal scroll-event path (i.e. [`crate::Controller::on_scroll`]), exactly
/// like a browser element echoes `scrollTop` writes as scroll events. Jump
/// compensations are delivered through [`ScrollContainer::scroll_by`] so the
/// write stays correct even when the container clamps.
pub trait ScrollContainer {
    /// Sets the absolute scroll position.
    fn set_scroll_offset(&mut self, offset: f64);

    /// Adjusts the scroll position by a signed delta.
    fn scroll_by(&mut self, delta: f64);
}

impl<C: ScrollContainer + ?Sized> ScrollContainer for &mut C {
    fn set_scroll_offset(&mut self, offset: f64) {
        (**self).set_scroll_offset(offset);
    }

    fn scroll_by(&mut self, delta: f64) {
        (**self).scroll_by(delta);
    }
}
