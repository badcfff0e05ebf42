use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use smallvec::SmallVec;

use crate::events::{EventKind, MotionEvent};

/// Callback registered for a motion event kind.
pub type Listener = Rc<dyn Fn(&MotionEvent)>;

#[derive(Default)]
struct ListenerTable {
    by_kind: BTreeMap<EventKind, Vec<Listener>>,
}

/// The window-level event target.
///
/// Cloning a `Viewport` yields another handle to the same listener table. Registering the same
/// listener twice for one kind is a no-op, and removal compares listeners by identity.
#[derive(Clone, Default)]
pub struct Viewport {
    table: Rc<RefCell<ListenerTable>>,
}

impl std::fmt::Debug for Viewport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let table = self.table.borrow();
        let mut map = f.debug_map();
        for (kind, listeners) in &table.by_kind {
            map.entry(kind, &listeners.len());
        }
        map.finish()
    }
}

impl Viewport {
    /// Create a viewport with no listeners.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `listener` for `kind`.
    pub fn add_listener(&self, kind: EventKind, listener: &Listener) {
        let mut table = self.table.borrow_mut();
        let listeners = table.by_kind.entry(kind).or_default();
        if !listeners.iter().any(|l| Rc::ptr_eq(l, listener)) {
            listeners.push(Rc::clone(listener));
        }
    }

    /// Remove `listener` from `kind`. Returns whether it was registered.
    pub fn remove_listener(&self, kind: EventKind, listener: &Listener) -> bool {
        let mut table = self.table.borrow_mut();
        let Some(listeners) = table.by_kind.get_mut(&kind) else {
            return false;
        };
        let before = listeners.len();
        listeners.retain(|l| !Rc::ptr_eq(l, listener));
        let removed = listeners.len() != before;
        if listeners.is_empty() {
            table.by_kind.remove(&kind);
        }
        removed
    }

    /// Number of listeners registered for `kind`.
    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.table
            .borrow()
            .by_kind
            .get(&kind)
            .map_or(0, Vec::len)
    }

    /// Dispatch a window event of `kind` to every listener registered at call time.
    ///
    /// Listeners may add or remove listeners while running; changes apply to the next dispatch.
    /// Returns the number of listeners invoked.
    pub fn dispatch(&self, kind: EventKind) -> usize {
        let snapshot: SmallVec<[Listener; 4]> = self
            .table
            .borrow()
            .by_kind
            .get(&kind)
            .map(|ls| ls.iter().cloned().collect())
            .unwrap_or_default();

        let event = MotionEvent::window(kind);
        for listener in &snapshot {
            listener(&event);
        }
        snapshot.len()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/events/viewport.rs"]
mod tests;
