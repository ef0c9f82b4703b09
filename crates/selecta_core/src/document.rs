//! Host document: page-level pointer listeners
//!
//! Controls need to hear about pointer presses anywhere on the page to close
//! when the user clicks elsewhere. The host owns one [`Document`] and reports
//! every pointer press to it; controls register listeners at mount and the
//! returned [`ListenerGuard`] removes them again when dropped.

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};

use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;

/// Unique identifier of a mounted control
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ControlId(u64);

impl ControlId {
    /// Allocate the next id
    pub(crate) fn next() -> Self {
        static NEXT_ID: AtomicU64 = AtomicU64::new(1);
        Self(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn to_raw(self) -> u64 {
        self.0
    }
}

/// Where a pointer press landed
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerTarget {
    /// Inside the root element of a control
    Control(ControlId),
    /// Anywhere else on the page
    Page,
}

impl PointerTarget {
    /// Whether the press landed inside `control`
    pub fn is_within(&self, control: ControlId) -> bool {
        matches!(self, PointerTarget::Control(id) if *id == control)
    }
}

/// Callback for pointer-down events
///
/// Uses Rc since UI is single-threaded.
pub type PointerListener = Rc<dyn Fn(&PointerTarget)>;

#[derive(Default)]
struct Listeners {
    next_id: u64,
    pointer_down: IndexMap<u64, PointerListener, FxBuildHasher>,
}

/// Page-level event source shared by all controls on a page
#[derive(Clone, Default)]
pub struct Document {
    listeners: Rc<RefCell<Listeners>>,
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("pointer_down_listeners", &self.listener_count())
            .finish()
    }
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a pointer-down listener
    ///
    /// The listener stays registered until the returned guard is dropped.
    #[must_use = "dropping the guard removes the listener immediately"]
    pub fn add_pointer_down_listener<F>(&self, listener: F) -> ListenerGuard
    where
        F: Fn(&PointerTarget) + 'static,
    {
        let mut listeners = self.listeners.borrow_mut();
        let id = listeners.next_id;
        listeners.next_id += 1;
        listeners.pointer_down.insert(id, Rc::new(listener));

        tracing::debug!(listener = id, "registered pointer-down listener");

        ListenerGuard {
            listeners: Rc::downgrade(&self.listeners),
            id,
        }
    }

    /// Report a pointer press to every registered listener
    pub fn pointer_down(&self, target: PointerTarget) {
        // Snapshot so listeners may add or remove listeners while running
        let snapshot: Vec<PointerListener> =
            self.listeners.borrow().pointer_down.values().cloned().collect();

        for listener in snapshot {
            listener(&target);
        }
    }

    /// Number of registered pointer-down listeners
    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().pointer_down.len()
    }
}

/// Keeps a listener registered; removes it on drop
pub struct ListenerGuard {
    listeners: Weak<RefCell<Listeners>>,
    id: u64,
}

impl ListenerGuard {
    /// Remove the listener now
    pub fn remove(self) {
        drop(self);
    }
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        if let Some(listeners) = self.listeners.upgrade() {
            if listeners.borrow_mut().pointer_down.shift_remove(&self.id).is_some() {
                tracing::debug!(listener = self.id, "removed pointer-down listener");
            }
        }
    }
}

impl std::fmt::Debug for ListenerGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerGuard").field("id", &self.id).finish()
    }
}
