use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

use crate::StateUpdate;

/// A callback fired after a state commit whose mutation mask intersects the
/// subscriber's interest.
///
/// The argument is the sync hint: `true` asks the renderer to flush the
/// resulting re-render instead of batching it (large scroll distances and
/// fresh measurements would otherwise show a blank frame).
pub type SubscriberCallback = Arc<dyn Fn(bool) + Send + Sync>;

/// Handle returned by [`crate::VirtualStore::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// A flat set of (interest, callback) pairs.
///
/// Notification fan-out is a linear scan; subscriber counts are tiny (a
/// renderer and maybe a scroll-position observer), so anything fancier would
/// only add allocation per event.
#[derive(Default)]
pub(crate) struct Subscribers {
    next_id: u64,
    entries: Vec<(u64, StateUpdate, SubscriberCallback)>,
}

impl Subscribers {
    pub(crate) fn subscribe(
        &mut self,
        interest: StateUpdate,
        callback: SubscriberCallback,
    ) -> SubscriptionId {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.push((id, interest, callback));
        SubscriptionId(id)
    }

    /// Returns `true` when the subscription existed.
    pub(crate) fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _, _)| *entry_id != id.0);
        self.entries.len() != before
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn notify(&self, mutated: StateUpdate, sync: bool) {
        for (_, interest, callback) in &self.entries {
            if interest.intersects(mutated) {
                callback(sync);
            }
        }
    }
}

impl fmt::Debug for Subscribers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscribers")
            .field("len", &self.entries.len())
            .finish_non_exhaustive()
    }
}
