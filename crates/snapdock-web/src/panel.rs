#![forbid(unsafe_code)]

//! Panel shell: the drawer's open state and the trigger that toggles it.

use std::cell::Cell;
use std::rc::Rc;

use snapdock_core::zone::AnimationDirection;

/// Drawer open/closed state.
///
/// The flag lives behind an `Rc<Cell<_>>` so the engine's close callback
/// can share it. Clones observe the same drawer.
#[derive(Debug, Clone, Default)]
pub struct PanelState {
    open: Rc<Cell<bool>>,
    toggles: Rc<Cell<u64>>,
}

impl PanelState {
    /// A closed drawer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.open.get()
    }

    /// Flip the drawer, as a trigger click does.
    pub fn toggle(&self) {
        self.open.set(!self.open.get());
        self.toggles.set(self.toggles.get() + 1);
    }

    pub fn show(&self) {
        self.open.set(true);
    }

    pub fn hide(&self) {
        self.open.set(false);
    }

    /// Number of trigger toggles so far.
    #[must_use]
    pub fn toggle_count(&self) -> u64 {
        self.toggles.get()
    }

    /// Callback that closes this drawer, for
    /// [`DragEngine::set_panel_close_callback`](snapdock_core::engine::DragEngine::set_panel_close_callback).
    pub fn close_callback(&self) -> impl FnMut() + 'static {
        let open = Rc::clone(&self.open);
        move || open.set(false)
    }

    /// Trigger label for the current state.
    #[must_use]
    pub fn trigger_label(&self) -> &'static str {
        if self.is_open() {
            "Close Panel"
        } else {
            "Open Panel"
        }
    }
}

/// What the host renders for the drawer in one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawerView {
    pub open: bool,
    pub direction: AnimationDirection,
}

impl DrawerView {
    /// Value for the drawer element's `data-direction` attribute.
    #[must_use]
    pub const fn data_direction(&self) -> &'static str {
        self.direction.as_str()
    }
}
