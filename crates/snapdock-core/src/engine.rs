#![forbid(unsafe_code)]

//! The drag-and-snap engine.
//!
//! [`DragEngine`] owns the handle's position and zone and runs the whole
//! press → drag → release → snap-back cycle as an explicit state machine:
//!
//! ```text
//!            press (element bound)          travel >= threshold
//!   Idle ──────────────────────────▶ Pending ───────────────────▶ Dragging
//!    ▲                                  │                            │
//!    │           release                │                 release    │
//!    ├──────────────────────────────────┘                            │
//!    │                                                               ▼
//!    └──────────────────────── settle (t == 1) ─────────────── Snapping
//! ```
//!
//! # Invariants
//!
//! 1. At most one drag session and one snap animation exist at a time; the
//!    phase enum makes "dragging while snapping" unrepresentable.
//! 2. The displayed position is always defined: a live drag position, an
//!    eased snap position, or a settled pin.
//! 3. Global listeners are held only while `Pending` or `Dragging`.
//! 4. The close callback fires exactly once per Pending → Dragging
//!    transition.
//! 5. After a snap completes the position equals the pin exactly.
//! 6. A cancelled snap frame never updates the position; after
//!    [`DragEngine::teardown`] nothing does.
//!
//! # Failure Modes
//!
//! | Condition | Behavior |
//! |-----------|----------|
//! | Press with no element attached | Ignored |
//! | Press while snapping | Ignored, or interrupts when `interrupt_snap` is set |
//! | Non-finite pointer coordinates | Event ignored |
//! | Invalid [`EngineConfig`] | Logged, defaults used |
//! | Any event after teardown | Ignored |

use std::time::Duration;

use crate::animation::{SnapAnimation, SnapTiming};
use crate::config::EngineConfig;
use crate::event::{InputEvent, primary_touch};
use crate::frame::{FrameHandle, FrameScheduler};
use crate::geometry::{Position, Rect, Viewport};
use crate::gravity::Gravity;
use crate::listener::{ListenerGuard, ListenerKinds, ListenerRegistry};
use crate::throttle::RateLimiter;
use crate::zone::{self, AnimationDirection, DropZone};

/// The rendered handle, as seen by the engine.
///
/// The host attaches one before any drag can start. Closures returning a
/// [`Rect`] implement this, as does a plain `Rect`.
pub trait HandleElement {
    /// Current bounding box in viewport pixels.
    fn bounding_rect(&self) -> Rect;
}

impl HandleElement for Rect {
    fn bounding_rect(&self) -> Rect {
        *self
    }
}

impl<F> HandleElement for F
where
    F: Fn() -> Rect,
{
    fn bounding_rect(&self) -> Rect {
        self()
    }
}

/// Observable interaction phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DragPhase {
    /// Settled at a pin.
    Idle,
    /// Pressed, but not moved far enough to count as a drag.
    Pending,
    /// Following the pointer.
    Dragging,
    /// Easing toward a pin after release.
    Snapping,
}

impl DragPhase {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Pending => "pending",
            Self::Dragging => "dragging",
            Self::Snapping => "snapping",
        }
    }
}

/// Lifetime counters, for diagnostics and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineStats {
    pub presses: u64,
    pub presses_ignored: u64,
    pub drags_started: u64,
    pub snaps_started: u64,
    pub snaps_completed: u64,
    pub snaps_cancelled: u64,
    pub zone_changes: u64,
}

enum Phase {
    Idle,
    Pending {
        start: Position,
        offset: Position,
        _listeners: ListenerGuard,
    },
    Dragging {
        offset: Position,
        _listeners: ListenerGuard,
    },
    Snapping {
        animation: SnapAnimation,
        frame: FrameHandle,
    },
}

impl Phase {
    fn kind(&self) -> DragPhase {
        match self {
            Self::Idle => DragPhase::Idle,
            Self::Pending { .. } => DragPhase::Pending,
            Self::Dragging { .. } => DragPhase::Dragging,
            Self::Snapping { .. } => DragPhase::Snapping,
        }
    }
}

/// Headless drag-and-snap state machine for one handle.
///
/// All handlers take the host's monotonic timestamp `now`. Call
/// [`tick`](Self::tick) once per display frame to release throttled input
/// and advance the snap animation.
pub struct DragEngine {
    config: EngineConfig,
    gravity: Gravity,
    timing: SnapTiming,
    viewport: Viewport,
    phase: Phase,
    zone: DropZone,
    position: Position,
    element: Option<Box<dyn HandleElement>>,
    on_panel_close: Option<Box<dyn FnMut()>>,
    listeners: ListenerRegistry,
    frames: FrameScheduler,
    moves: RateLimiter<Position>,
    resizes: RateLimiter<()>,
    torn_down: bool,
    stats: EngineStats,
}

impl std::fmt::Debug for DragEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DragEngine")
            .field("phase", &self.phase.kind())
            .field("zone", &self.zone)
            .field("position", &self.position)
            .field("viewport", &self.viewport)
            .field("element", &self.element.as_ref().map(|_| ".."))
            .field("torn_down", &self.torn_down)
            .finish()
    }
}

impl DragEngine {
    /// Create an engine pinned to the configured initial zone.
    ///
    /// An invalid `config` is replaced by [`EngineConfig::default`].
    pub fn new(config: EngineConfig, viewport: Viewport) -> Self {
        let config = match config.validate() {
            Ok(()) => config,
            #[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
            Err(err) => {
                crate::warn!(error = %err, "invalid engine config, using defaults");
                EngineConfig::default()
            }
        };
        let zone = config.initial_zone;
        let position = zone::pin(zone, viewport, config.handle_size);
        crate::debug!(zone = %zone, x = position.x, y = position.y, "engine initialized");
        Self {
            gravity: config.gravity(),
            timing: config.snap_timing(),
            moves: RateLimiter::new(config.move_throttle),
            resizes: RateLimiter::new(config.resize_throttle),
            config,
            viewport,
            phase: Phase::Idle,
            zone,
            position,
            element: None,
            on_panel_close: None,
            listeners: ListenerRegistry::new(),
            frames: FrameScheduler::new(),
            torn_down: false,
            stats: EngineStats::default(),
        }
    }

    // -- host wiring --------------------------------------------------------

    /// Bind the rendered handle. Replaces any previous element.
    pub fn attach_element(&mut self, element: impl HandleElement + 'static) {
        if self.torn_down {
            return;
        }
        self.element = Some(Box::new(element));
    }

    /// Unbind the handle; later presses are ignored until re-attached.
    pub fn detach_element(&mut self) {
        self.element = None;
    }

    /// Whether an element is bound.
    pub fn has_element(&self) -> bool {
        self.element.is_some()
    }

    /// Register the callback invoked when a real drag begins.
    ///
    /// Only one callback is kept; registering again replaces it.
    pub fn set_panel_close_callback(&mut self, callback: impl FnMut() + 'static) {
        if self.torn_down {
            return;
        }
        self.on_panel_close = Some(Box::new(callback));
    }

    /// Drop the close callback.
    pub fn clear_panel_close_callback(&mut self) {
        self.on_panel_close = None;
    }

    /// Registry of global listeners this engine currently needs.
    ///
    /// Clone it to query from the host while the engine is borrowed.
    pub fn listeners(&self) -> &ListenerRegistry {
        &self.listeners
    }

    // -- read-only state ----------------------------------------------------

    pub fn phase(&self) -> DragPhase {
        self.phase.kind()
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, Phase::Dragging { .. })
    }

    pub fn is_potential_drag(&self) -> bool {
        matches!(self.phase, Phase::Pending { .. })
    }

    pub fn is_snapping(&self) -> bool {
        matches!(self.phase, Phase::Snapping { .. })
    }

    /// Top-left corner of the handle.
    pub fn position(&self) -> Position {
        self.position
    }

    pub fn current_zone(&self) -> DropZone {
        self.zone
    }

    /// Edge the drawer should open from for the current zone.
    pub fn animation_direction(&self) -> AnimationDirection {
        self.zone.animation_direction()
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn stats(&self) -> EngineStats {
        self.stats
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Target of the in-flight snap, if any.
    pub fn snap_target(&self) -> Option<Position> {
        match &self.phase {
            Phase::Snapping { animation, .. } => Some(animation.target()),
            _ => None,
        }
    }

    /// Frame requests waiting for the next [`tick`](Self::tick).
    pub fn pending_frames(&self) -> usize {
        self.frames.pending_count()
    }

    /// Pinned position of `zone` in the current viewport.
    pub fn zone_position(&self, zone: DropZone) -> Position {
        zone::pin(zone, self.viewport, self.config.handle_size)
    }

    fn center_of(&self, origin: Position) -> Position {
        Rect::square(origin, self.config.handle_size).center()
    }

    // -- input --------------------------------------------------------------

    /// Dispatch a canonical input event.
    pub fn handle_event(&mut self, now: Duration, event: &InputEvent) {
        match event {
            InputEvent::PointerDown { x, y } => self.pointer_down(now, *x, *y),
            InputEvent::PointerMove { x, y } => self.pointer_move(now, *x, *y),
            InputEvent::PointerUp | InputEvent::TouchEnd => self.pointer_up(now),
            InputEvent::TouchStart(points) => {
                if let Some(p) = primary_touch(points) {
                    self.pointer_down(now, p.x, p.y);
                }
            }
            InputEvent::TouchMove(points) => {
                if let Some(p) = primary_touch(points) {
                    self.pointer_move(now, p.x, p.y);
                }
            }
            InputEvent::Resize(viewport) => self.resize(now, *viewport),
        }
    }

    /// Press on the handle at client coordinates `(x, y)`.
    pub fn pointer_down(&mut self, _now: Duration, x: f64, y: f64) {
        if self.torn_down {
            return;
        }
        let pointer = Position::new(x, y);
        if !pointer.is_finite() {
            return;
        }
        self.stats.presses += 1;

        let Some(element) = self.element.as_ref() else {
            crate::debug!("press ignored: no element attached");
            self.stats.presses_ignored += 1;
            return;
        };
        let rect = element.bounding_rect();

        match &self.phase {
            Phase::Idle => {}
            Phase::Snapping { frame, .. } if self.config.interrupt_snap => {
                self.frames.cancel(*frame);
                self.stats.snaps_cancelled += 1;
                crate::debug!(
                    x = self.position.x,
                    y = self.position.y,
                    "snap interrupted by press"
                );
            }
            Phase::Snapping { .. } | Phase::Pending { .. } | Phase::Dragging { .. } => {
                self.stats.presses_ignored += 1;
                return;
            }
        }

        self.moves.reset();
        self.phase = Phase::Pending {
            start: pointer,
            offset: pointer - rect.origin(),
            _listeners: self.listeners.acquire(ListenerKinds::DRAG),
        };
        crate::debug!(x, y, "drag pending");
    }

    /// Pointer moved to `(x, y)`. Throttled; see [`EngineConfig::move_throttle`].
    pub fn pointer_move(&mut self, now: Duration, x: f64, y: f64) {
        if self.torn_down || !matches!(self.phase, Phase::Pending { .. } | Phase::Dragging { .. })
        {
            return;
        }
        let pointer = Position::new(x, y);
        if !pointer.is_finite() {
            return;
        }
        if let Some(pointer) = self.moves.submit(now, pointer) {
            self.apply_move(pointer);
        }
    }

    fn apply_move(&mut self, pointer: Position) {
        match std::mem::replace(&mut self.phase, Phase::Idle) {
            Phase::Pending {
                start,
                offset,
                _listeners,
            } => {
                if start.distance(pointer) < self.config.drag_threshold {
                    self.phase = Phase::Pending {
                        start,
                        offset,
                        _listeners,
                    };
                    return;
                }
                self.phase = Phase::Dragging { offset, _listeners };
                self.stats.drags_started += 1;
                crate::debug!(zone = %self.zone, "drag started");
                if let Some(close) = self.on_panel_close.as_mut() {
                    close();
                }
            }
            Phase::Dragging { offset, _listeners } => {
                let cursor = pointer - offset;
                let pin = self.zone_position(self.zone);
                let resisted = self.gravity.resist(pin, self.position, cursor);
                self.position = resisted;
                self.phase = Phase::Dragging { offset, _listeners };
                self.reclassify(resisted);
            }
            other => self.phase = other,
        }
    }

    fn reclassify(&mut self, origin: Position) {
        let zone = zone::classify(self.center_of(origin), self.viewport);
        if zone != self.zone {
            crate::trace!(from = %self.zone, to = %zone, "zone changed");
            self.zone = zone;
            self.stats.zone_changes += 1;
        }
    }

    /// Pointer released anywhere.
    ///
    /// A move still held by the throttle is applied first, so the drop zone
    /// comes from the latest pointer position.
    pub fn pointer_up(&mut self, now: Duration) {
        if self.torn_down {
            return;
        }
        if let Some(pointer) = self.moves.flush(now) {
            self.apply_move(pointer);
        }
        match std::mem::replace(&mut self.phase, Phase::Idle) {
            Phase::Pending { .. } => {
                crate::debug!("press released without drag");
            }
            Phase::Dragging { .. } => {
                self.reclassify(self.position);
                let target = self.zone_position(self.zone);
                let animation = SnapAnimation::new(self.position, target, now, &self.timing);
                let frame = self.frames.request();
                crate::debug!(
                    zone = %self.zone,
                    target_x = target.x,
                    target_y = target.y,
                    duration_ms = animation.duration().as_millis() as u64,
                    "snap started"
                );
                self.stats.snaps_started += 1;
                self.phase = Phase::Snapping { animation, frame };
            }
            other => self.phase = other,
        }
    }

    /// The viewport changed size. Repositioning is throttled; see
    /// [`EngineConfig::resize_throttle`].
    pub fn resize(&mut self, now: Duration, viewport: Viewport) {
        if self.torn_down {
            return;
        }
        self.viewport = viewport;
        if self.resizes.submit(now, ()).is_some() {
            self.apply_resize();
        }
    }

    fn apply_resize(&mut self) {
        if matches!(self.phase, Phase::Idle | Phase::Pending { .. }) {
            self.position = self.zone_position(self.zone);
            crate::trace!(
                width = self.viewport.width,
                height = self.viewport.height,
                "handle re-pinned after resize"
            );
        }
    }

    /// Advance to host frame time `now`.
    ///
    /// Applies any throttled move or resize whose window has elapsed, then
    /// runs due animation frames.
    pub fn tick(&mut self, now: Duration) {
        if self.torn_down {
            return;
        }
        if let Some(pointer) = self.moves.poll(now) {
            self.apply_move(pointer);
        }
        if self.resizes.poll(now).is_some() {
            self.apply_resize();
        }
        for handle in self.frames.begin_frame() {
            self.run_frame(handle, now);
        }
    }

    fn run_frame(&mut self, handle: FrameHandle, now: Duration) {
        let Phase::Snapping { animation, frame } = &mut self.phase else {
            return;
        };
        if *frame != handle {
            return;
        }
        let span = crate::trace_span!("snapdock.snap_frame", frame = handle.id());
        let _guard = span.enter();
        animation.advance_to(now);
        self.position = animation.position();
        if animation.is_complete() {
            crate::debug!(zone = %self.zone, "snap settled");
            self.phase = Phase::Idle;
            self.stats.snaps_completed += 1;
        } else {
            *frame = self.frames.request();
        }
    }

    /// Tear the engine down.
    ///
    /// Cancels any scheduled frame, releases global listeners, and drops the
    /// element and callback. Every later call is a no-op; read-only state
    /// keeps its last values.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        if matches!(self.phase, Phase::Snapping { .. }) {
            self.stats.snaps_cancelled += 1;
        }
        self.frames.clear();
        self.phase = Phase::Idle;
        self.moves.reset();
        self.resizes.reset();
        self.element = None;
        self.on_panel_close = None;
        self.torn_down = true;
        crate::debug!("engine torn down");
    }
}
