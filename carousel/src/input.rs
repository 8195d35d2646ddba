//! Input model: the live drag state and the per-gesture commit machine.
//!
//! The host forwards raw drag samples (movement along the carousel axis,
//! total travelled distance, and the pointer's direction of motion).
//! `GestureInterpreter` normalizes them into a [`DragState`] for the
//! geometry and decides, at most once per gesture, when the drag has gone
//! far enough to move the focus. It never touches the focus index itself;
//! the engine applies the returned [`Commit`].

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use serde::{Deserialize, Serialize};

use crate::consts::SNAP_DIVISOR;
use crate::focus::Mode;

/// Normalized drag values visible to the geometry.
///
/// Neutral (the default) whenever no drag is in progress.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DragState {
    /// A pointer is down and moving the canvas.
    pub active: bool,
    /// Movement along the carousel axis since the gesture started, in pixels.
    pub axis_delta: f64,
    /// Total distance travelled by the pointer. Never negative.
    pub travelled: f64,
    /// Sign of the current motion: -1, 0, or 1.
    pub direction: i8,
}

impl DragState {
    /// The resting state: no drag in progress.
    #[must_use]
    pub fn neutral() -> Self {
        Self::default()
    }

    /// Build an active drag state from raw samples, replacing non-finite
    /// values with zero.
    #[must_use]
    pub fn from_raw(raw_delta: f64, raw_distance: f64, raw_direction: f64) -> Self {
        let axis_delta = finite_or_zero(raw_delta);
        Self {
            active: true,
            axis_delta,
            travelled: finite_or_zero(raw_distance).abs(),
            direction: sign_of(finite_or_zero(raw_direction)),
        }
    }

    /// Direction used to decide a commit. Falls back to the sign of the
    /// accumulated delta when the pointer reports no direction.
    #[must_use]
    pub fn effective_direction(&self) -> i8 {
        if self.direction != 0 { self.direction } else { sign_of(self.axis_delta) }
    }
}

/// A discrete navigation decision produced by a drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    /// Sign of the drag motion that triggered the commit (+1 or -1).
    pub direction_sign: i8,
}

impl Commit {
    /// Change to apply to the focus index. Dragging the canvas toward the
    /// positive axis reveals the previous room, so the sign is inverted.
    #[must_use]
    pub fn focus_delta(self) -> isize {
        -isize::from(self.direction_sign)
    }
}

/// Result of feeding one drag sample to the interpreter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragUpdate {
    /// Drag state to publish after this sample.
    pub drag: DragState,
    /// Set on the single sample that crosses the commit threshold.
    pub commit: Option<Commit>,
}

/// What happens to the canvas when the pointer is released.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DragRelease {
    /// No gesture was being tracked.
    Idle,
    /// The gesture never committed; the focused room springs back to rest.
    SpringBack,
    /// The gesture already committed; rooms settle around the new focus.
    Settled,
}

/// Where the current gesture is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GesturePhase {
    /// No pointer down; waiting for the first drag sample.
    #[default]
    Idle,
    /// Drag in progress, threshold not yet crossed.
    Tracking,
    /// This gesture already committed; further samples are swallowed until release.
    Committed,
}

/// Per-gesture state machine turning raw drag samples into at most one commit.
#[derive(Debug, Clone, Default)]
pub struct GestureInterpreter {
    phase: GesturePhase,
    drag: DragState,
}

impl GestureInterpreter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn phase(&self) -> GesturePhase {
        self.phase
    }

    /// The drag state the geometry should see right now.
    #[must_use]
    pub fn drag(&self) -> DragState {
        self.drag
    }

    /// Feed one drag sample.
    ///
    /// Samples are ignored in browsing mode. Once the gesture has committed,
    /// the drag is reset to neutral (the canvas settles around the new
    /// focus) and every further sample is swallowed until [`Self::on_drag_end`].
    pub fn on_drag_update(
        &mut self,
        mode: Mode,
        viewport_width: f64,
        raw_delta: f64,
        raw_distance: f64,
        raw_direction: f64,
    ) -> DragUpdate {
        if mode == Mode::Browsing || self.phase == GesturePhase::Committed {
            return DragUpdate { drag: self.drag, commit: None };
        }

        let drag = DragState::from_raw(raw_delta, raw_distance, raw_direction);
        self.phase = GesturePhase::Tracking;

        let threshold = commit_threshold(viewport_width);
        let direction = drag.effective_direction();
        if threshold.is_some_and(|t| drag.travelled > t) && direction != 0 {
            self.phase = GesturePhase::Committed;
            self.drag = DragState::neutral();
            return DragUpdate { drag: self.drag, commit: Some(Commit { direction_sign: direction }) };
        }

        self.drag = drag;
        DragUpdate { drag, commit: None }
    }

    /// Pointer released: end the gesture and reset the drag to neutral.
    pub fn on_drag_end(&mut self) -> DragRelease {
        let release = match self.phase {
            GesturePhase::Idle => DragRelease::Idle,
            GesturePhase::Tracking => DragRelease::SpringBack,
            GesturePhase::Committed => DragRelease::Settled,
        };
        self.cancel();
        release
    }

    /// Abandon the current gesture without reporting a release.
    pub fn cancel(&mut self) {
        self.phase = GesturePhase::Idle;
        self.drag = DragState::neutral();
    }
}

/// Distance a drag must exceed before it commits, or `None` for a
/// degenerate viewport (nothing can commit before the first layout).
#[must_use]
pub fn commit_threshold(viewport_width: f64) -> Option<f64> {
    (viewport_width.is_finite() && viewport_width > 0.0).then(|| viewport_width / SNAP_DIVISOR)
}

fn finite_or_zero(v: f64) -> f64 {
    if v.is_finite() { v } else { 0.0 }
}

fn sign_of(v: f64) -> i8 {
    if v > 0.0 {
        1
    } else if v < 0.0 {
        -1
    } else {
        0
    }
}
