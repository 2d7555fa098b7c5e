#![forbid(unsafe_code)]

//! Step-based host loop for the snapdock panel.
//!
//! [`StepHost`] owns a [`DragEngine`], the drawer's [`PanelState`], a
//! deterministic clock, and an input queue. The host (JavaScript) controls
//! the loop:
//!
//! 1. Push events via [`StepHost::push_event`].
//! 2. Advance time via [`StepHost::advance_time`].
//! 3. Call [`StepHost::step`] once per display frame.
//! 4. Render the handle at [`StepResult::position`] and the drawer from
//!    [`StepResult::drawer`].
//!
//! # Example
//!
//! ```
//! use core::time::Duration;
//! use snapdock_core::config::EngineConfig;
//! use snapdock_core::event::InputEvent;
//! use snapdock_core::geometry::Viewport;
//! use snapdock_web::step_host::StepHost;
//!
//! let mut host = StepHost::new(EngineConfig::default(), Viewport::new(1200.0, 800.0));
//!
//! // Click the handle: press and release without moving.
//! host.push_event(InputEvent::pointer_down(1164.0, 764.0));
//! host.push_event(InputEvent::PointerUp);
//! host.advance_time(Duration::from_millis(16));
//! let result = host.step();
//!
//! assert!(result.drawer.open);
//! ```
//!
//! # Event routing
//!
//! Presses reach the engine only when they land on the rendered handle.
//! Move and release events reach it only while the engine holds global
//! listeners. Resizes always pass. Everything else is counted as dropped.
//!
//! Consecutive queued moves of the same kind collapse to the newest one, so
//! the engine sees the latest pointer position of each frame.
//!
//! A press released without becoming a drag is a trigger click and toggles
//! the drawer. A real drag closes the drawer through the engine's close
//! callback and never toggles it.

use core::time::Duration;
use std::cell::Cell;
use std::rc::Rc;

use snapdock_core::config::EngineConfig;
use snapdock_core::engine::{DragEngine, DragPhase};
use snapdock_core::event::{InputEvent, primary_touch};
use snapdock_core::geometry::{Position, Rect, Viewport};
use snapdock_core::zone::DropZone;

use crate::panel::{DrawerView, PanelState};
use crate::{DeterministicClock, HostError, HostEventSource};

/// Result of a single [`StepHost::step`] call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepResult {
    /// Events taken off the queue during this step.
    pub events_processed: u32,
    /// Of those, events the engine never saw.
    pub events_dropped: u32,
    /// Of those, moves superseded by a newer queued move.
    pub events_coalesced: u32,
    /// Current frame index (monotonically increasing).
    pub frame_idx: u64,
    pub phase: DragPhase,
    /// Top-left corner to render the handle at.
    pub position: Position,
    pub zone: DropZone,
    pub drawer: DrawerView,
}

/// Host-driven, non-blocking runner for one docked panel.
pub struct StepHost {
    engine: DragEngine,
    panel: PanelState,
    clock: DeterministicClock,
    events: HostEventSource,
    handle: Rc<Cell<Rect>>,
    frame_idx: u64,
    torn_down: bool,
}

impl core::fmt::Debug for StepHost {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("StepHost")
            .field("engine", &self.engine)
            .field("drawer_open", &self.panel.is_open())
            .field("now", &self.clock.now())
            .field("queued", &self.events.len())
            .field("frame_idx", &self.frame_idx)
            .finish()
    }
}

impl StepHost {
    /// Create a host with a closed drawer and the handle at its initial pin.
    ///
    /// An invalid `config` falls back to defaults; use
    /// [`try_new`](Self::try_new) to reject it instead.
    #[must_use]
    pub fn new(config: EngineConfig, viewport: Viewport) -> Self {
        let mut engine = DragEngine::new(config, viewport);
        let panel = PanelState::new();
        let handle = Rc::new(Cell::new(Rect::square(
            engine.position(),
            engine.config().handle_size,
        )));
        let rendered = Rc::clone(&handle);
        engine.attach_element(move || rendered.get());
        engine.set_panel_close_callback(panel.close_callback());
        Self {
            engine,
            panel,
            clock: DeterministicClock::new(),
            events: HostEventSource::new(viewport),
            handle,
            frame_idx: 0,
            torn_down: false,
        }
    }

    /// Like [`new`](Self::new), but fails on an invalid configuration.
    pub fn try_new(config: EngineConfig, viewport: Viewport) -> Result<Self, HostError> {
        config.validate()?;
        Ok(Self::new(config, viewport))
    }

    /// Create a host configured from `SNAPDOCK_*` environment variables.
    #[must_use]
    pub fn from_env(viewport: Viewport) -> Self {
        Self::new(EngineConfig::from_env(), viewport)
    }

    /// Queue an input event for the next [`step`](Self::step).
    pub fn push_event(&mut self, event: InputEvent) {
        self.events.push_event(event);
    }

    /// Queue a viewport resize.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.push_event(InputEvent::resize(width, height));
    }

    /// Advance the deterministic clock by `dt`.
    pub fn advance_time(&mut self, dt: Duration) {
        self.clock.advance(dt);
    }

    /// Set the deterministic clock to an absolute time.
    pub fn set_time(&mut self, now: Duration) {
        self.clock.set(now);
    }

    /// Process every queued event, then run one engine frame.
    pub fn step(&mut self) -> StepResult {
        let now = self.clock.now();
        let mut events_processed: u32 = 0;
        let mut events_dropped: u32 = 0;
        let mut events_coalesced: u32 = 0;

        while let Some(event) = self.events.read_event() {
            events_processed += 1;
            if self
                .events
                .peek_event()
                .is_some_and(|next| superseded_by(&event, next))
            {
                events_coalesced += 1;
                continue;
            }
            if self.torn_down || !self.accepts(&event) {
                snapdock_core::trace!(event = ?event, "event dropped");
                events_dropped += 1;
                continue;
            }
            self.dispatch(now, &event);
        }

        if !self.torn_down {
            self.engine.tick(now);
        }
        self.sync_handle();
        self.frame_idx += 1;

        StepResult {
            events_processed,
            events_dropped,
            events_coalesced,
            frame_idx: self.frame_idx,
            phase: self.engine.phase(),
            position: self.engine.position(),
            zone: self.engine.current_zone(),
            drawer: self.drawer(),
        }
    }

    /// Flip the drawer programmatically, as a trigger click would.
    pub fn toggle_panel(&mut self) {
        self.panel.toggle();
    }

    /// Tear down the engine. Later events are dropped and the handle stays
    /// where it was.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.engine.teardown();
        self.torn_down = true;
        snapdock_core::debug!(frame_idx = self.frame_idx, "host torn down");
    }

    // --- Accessors ---

    pub fn engine(&self) -> &DragEngine {
        &self.engine
    }

    pub fn panel(&self) -> &PanelState {
        &self.panel
    }

    /// Current drawer rendering state.
    pub fn drawer(&self) -> DrawerView {
        DrawerView {
            open: self.panel.is_open(),
            direction: self.engine.animation_direction(),
        }
    }

    /// Bounding box of the rendered handle as of the last step.
    pub fn handle_rect(&self) -> Rect {
        self.handle.get()
    }

    pub fn now(&self) -> Duration {
        self.clock.now()
    }

    /// Latest viewport pushed by the host.
    pub fn viewport(&self) -> Viewport {
        self.events.viewport()
    }

    pub fn frame_idx(&self) -> u64 {
        self.frame_idx
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    // --- Private helpers ---

    fn accepts(&self, event: &InputEvent) -> bool {
        match event {
            InputEvent::PointerDown { x, y } => self.on_handle(Position::new(*x, *y)),
            InputEvent::TouchStart(points) => {
                primary_touch(points).is_some_and(|p| self.on_handle(p))
            }
            InputEvent::Resize(_) => true,
            _ => event
                .global_listener()
                .is_some_and(|kind| self.engine.listeners().is_attached(kind)),
        }
    }

    fn on_handle(&self, point: Position) -> bool {
        self.engine.has_element() && self.handle.get().contains(point)
    }

    fn dispatch(&mut self, now: Duration, event: &InputEvent) {
        let was_pending = self.engine.is_potential_drag();
        self.engine.handle_event(now, event);
        let released = matches!(event, InputEvent::PointerUp | InputEvent::TouchEnd);
        if released && was_pending && self.engine.phase() == DragPhase::Idle {
            self.panel.toggle();
            snapdock_core::debug!(open = self.panel.is_open(), "trigger clicked");
        }
    }

    fn sync_handle(&self) {
        self.handle.set(Rect::square(
            self.engine.position(),
            self.engine.config().handle_size,
        ));
    }
}

fn superseded_by(event: &InputEvent, next: &InputEvent) -> bool {
    matches!(
        (event, next),
        (InputEvent::PointerMove { .. }, InputEvent::PointerMove { .. })
            | (InputEvent::TouchMove(_), InputEvent::TouchMove(_))
    )
}
