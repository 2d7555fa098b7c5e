#![forbid(unsafe_code)]

//! Scoped registration of global input listeners.
//!
//! While a drag is pending or active the host must watch pointer move/up
//! events on the whole document, not just the handle. Those global listeners
//! must not outlive the interaction. [`ListenerRegistry::acquire`] returns a
//! [`ListenerGuard`]; the listeners stay attached exactly as long as some
//! guard for them is alive.
//!
//! The host reads [`ListenerRegistry::attached`] to decide which global
//! events to forward, and can compare [`ListenerRegistry::attach_count`]
//! with [`ListenerRegistry::detach_count`] to detect leaks across many
//! mount/unmount cycles.

use std::cell::Cell;
use std::rc::Rc;

use bitflags::bitflags;

bitflags! {
    /// Kinds of document-level listeners.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ListenerKinds: u8 {
        const POINTER_MOVE = 0b0001;
        const POINTER_UP   = 0b0010;
        const TOUCH_MOVE   = 0b0100;
        const TOUCH_END    = 0b1000;
        /// Everything a drag interaction needs.
        const DRAG = Self::POINTER_MOVE.bits()
            | Self::POINTER_UP.bits()
            | Self::TOUCH_MOVE.bits()
            | Self::TOUCH_END.bits();
    }
}

const KIND_COUNT: usize = 4;

#[derive(Debug, Default)]
struct RegistryState {
    /// Live guard count per kind bit.
    refs: Cell<[u32; KIND_COUNT]>,
    attaches: Cell<u64>,
    detaches: Cell<u64>,
}

impl RegistryState {
    fn adjust(&self, kinds: ListenerKinds, up: bool) {
        let mut refs = self.refs.get();
        for (bit, count) in refs.iter_mut().enumerate() {
            if kinds.bits() & (1 << bit) == 0 {
                continue;
            }
            if up {
                if *count == 0 {
                    self.attaches.set(self.attaches.get() + 1);
                }
                *count = count.saturating_add(1);
            } else if *count > 0 {
                *count -= 1;
                if *count == 0 {
                    self.detaches.set(self.detaches.get() + 1);
                }
            }
        }
        self.refs.set(refs);
    }
}

/// Shared record of which global listeners are attached.
///
/// Cloning yields another handle to the same registry. Single-threaded.
#[derive(Debug, Clone, Default)]
pub struct ListenerRegistry {
    state: Rc<RegistryState>,
}

impl ListenerRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach `kinds` for as long as the returned guard lives.
    #[must_use = "listeners detach as soon as the guard is dropped"]
    pub fn acquire(&self, kinds: ListenerKinds) -> ListenerGuard {
        self.state.adjust(kinds, true);
        ListenerGuard {
            state: Rc::clone(&self.state),
            kinds,
        }
    }

    /// Kinds with at least one live guard.
    #[must_use]
    pub fn attached(&self) -> ListenerKinds {
        let refs = self.state.refs.get();
        let bits = refs
            .iter()
            .enumerate()
            .filter(|(_, count)| **count > 0)
            .fold(0u8, |acc, (bit, _)| acc | (1 << bit));
        ListenerKinds::from_bits_truncate(bits)
    }

    /// Whether any of `kinds` is attached.
    #[must_use]
    pub fn is_attached(&self, kinds: ListenerKinds) -> bool {
        self.attached().intersects(kinds)
    }

    /// Per-kind attach transitions so far.
    #[must_use]
    pub fn attach_count(&self) -> u64 {
        self.state.attaches.get()
    }

    /// Per-kind detach transitions so far.
    #[must_use]
    pub fn detach_count(&self) -> u64 {
        self.state.detaches.get()
    }
}

/// Keeps a set of listeners attached; detaches them on drop.
#[derive(Debug)]
pub struct ListenerGuard {
    state: Rc<RegistryState>,
    kinds: ListenerKinds,
}

impl ListenerGuard {
    /// Kinds held by this guard.
    #[must_use]
    pub fn kinds(&self) -> ListenerKinds {
        self.kinds
    }
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        self.state.adjust(self.kinds, false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guard_attaches_and_detaches() {
        let registry = ListenerRegistry::new();
        assert!(registry.attached().is_empty());
        {
            let guard = registry.acquire(ListenerKinds::DRAG);
            assert_eq!(guard.kinds(), ListenerKinds::DRAG);
            assert_eq!(registry.attached(), ListenerKinds::DRAG);
        }
        assert!(registry.attached().is_empty());
        assert_eq!(registry.attach_count(), 4);
        assert_eq!(registry.detach_count(), 4);
    }

    #[test]
    fn overlapping_guards_keep_shared_kinds() {
        let registry = ListenerRegistry::new();
        let a = registry.acquire(ListenerKinds::POINTER_MOVE | ListenerKinds::POINTER_UP);
        let b = registry.acquire(ListenerKinds::POINTER_UP);
        drop(a);
        assert_eq!(registry.attached(), ListenerKinds::POINTER_UP);
        assert!(registry.is_attached(ListenerKinds::POINTER_UP));
        assert!(!registry.is_attached(ListenerKinds::POINTER_MOVE));
        drop(b);
        assert!(registry.attached().is_empty());
    }

    #[test]
    fn clones_share_state() {
        let registry = ListenerRegistry::new();
        let view = registry.clone();
        let guard = registry.acquire(ListenerKinds::TOUCH_MOVE);
        assert!(view.is_attached(ListenerKinds::TOUCH_MOVE));
        drop(guard);
        assert!(!view.is_attached(ListenerKinds::TOUCH_MOVE));
    }

    #[test]
    fn repeated_cycles_do_not_leak() {
        let registry = ListenerRegistry::new();
        for _ in 0..100 {
            let _guard = registry.acquire(ListenerKinds::DRAG);
        }
        assert_eq!(registry.attach_count(), registry.detach_count());
        assert!(registry.attached().is_empty());
    }
}
