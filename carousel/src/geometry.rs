//! Pure projection from carousel state to per-room transforms.
//!
//! Nothing in this module holds state. [`compute_transform`] is called for
//! every room on every publish and must return finite, clamped values for
//! any input, including a zero-sized viewport before the first layout.

#[cfg(test)]
#[path = "geometry_test.rs"]
mod geometry_test;

use serde::{Deserialize, Serialize};

use crate::consts::{DRAG_MIN_SCALE, LAP_FACTOR, MAX_BLUR, SNAP_DIVISOR, VIEW_RADIUS, VIEW_SCALE, VISIBLE_RADIUS};
use crate::focus::Mode;
use crate::input::DragState;

/// Size of the display surface in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// True before the first real layout, or for any non-finite size.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        !(self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0)
    }

    /// Empty space on each side of a room scaled down to `VIEW_SCALE`.
    #[must_use]
    pub fn side_margin(&self) -> f64 {
        self.usable_width() * (1.0 - VIEW_SCALE) * 0.5
    }

    /// Empty space above and below a scaled room; the info panel lives in the bottom one.
    #[must_use]
    pub fn vertical_margin(&self) -> f64 {
        if self.is_degenerate() { 0.0 } else { self.height * (1.0 - VIEW_SCALE) * 0.5 }
    }

    /// Horizontal distance between neighbouring room origins in `mode`.
    #[must_use]
    pub fn stride(&self, mode: Mode) -> f64 {
        match mode {
            Mode::Browsing => self.usable_width(),
            Mode::Viewing => self.usable_width() - self.side_margin() * LAP_FACTOR,
        }
    }

    fn usable_width(&self) -> f64 {
        if self.is_degenerate() { 0.0 } else { self.width }
    }
}

/// Visual state of one room, consumed by the rendering layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// Horizontal offset of the room's origin, in pixels.
    pub x: f64,
    /// Uniform scale in `[0, 1]`.
    pub scale: f64,
    /// Corner radius in pixels.
    pub corner_radius: f64,
    /// Gaussian blur radius in pixels.
    pub blur_px: f64,
    /// Opacity of the bottom info panel in `[0, 1]`.
    pub overlay_opacity: f64,
    /// Opacity of the room itself in `[0, 1]`; drops to zero on exit.
    pub opacity: f64,
    /// Whether the room should be rendered at all.
    pub visible: bool,
    /// Whether the favourite/delete controls are shown.
    pub controls_visible: bool,
}

impl Transform {
    /// Where a room animates to while it is being removed.
    #[must_use]
    pub fn exiting(from: Transform) -> Self {
        Self { scale: 0.0, opacity: 0.0, overlay_opacity: 0.0, controls_visible: false, ..from }
    }
}

/// Signed position of `index` relative to `focus`.
#[must_use]
#[allow(clippy::cast_possible_wrap)]
pub fn offset_of(index: usize, focus: usize) -> i64 {
    index as i64 - focus as i64
}

/// Whether a room at `offset` falls inside the rendered window.
#[must_use]
pub fn in_window(offset: i64) -> bool {
    offset.abs() <= VISIBLE_RADIUS
}

/// Compute the transform for the room at `index`.
///
/// Rooms outside the window still get a best-effort `x` so that a large
/// focus jump does not make them tear across the screen on re-entry.
#[must_use]
pub fn compute_transform(index: usize, focus: usize, mode: Mode, drag: &DragState, viewport: Viewport) -> Transform {
    let offset = offset_of(index, focus);
    let resting = resting_transform(offset, mode, viewport);

    if viewport.is_degenerate() {
        return Transform { visible: false, ..resting };
    }
    if mode == Mode::Browsing || !drag.active {
        return resting;
    }

    let x = resting.x + finite_or_zero(drag.axis_delta);
    if offset != 0 {
        return Transform { x, ..resting };
    }

    let t = drag_progress(drag.travelled, viewport.width);
    Transform {
        x,
        scale: clamp_unit(lerp(VIEW_SCALE, DRAG_MIN_SCALE, t)),
        blur_px: lerp(0.0, MAX_BLUR, t),
        overlay_opacity: clamp_unit(1.0 - t),
        ..resting
    }
}

/// Cheap transform for a room outside the window: only `x` is meaningful.
#[must_use]
pub fn hidden_transform(index: usize, focus: usize, mode: Mode, viewport: Viewport) -> Transform {
    let offset = offset_of(index, focus);
    Transform { visible: false, controls_visible: false, ..resting_transform(offset, mode, viewport) }
}

#[allow(clippy::cast_precision_loss)]
fn resting_transform(offset: i64, mode: Mode, viewport: Viewport) -> Transform {
    let x = offset as f64 * viewport.stride(mode);
    let visible = in_window(offset) && !viewport.is_degenerate();
    match mode {
        Mode::Browsing => Transform {
            x,
            scale: 1.0,
            corner_radius: 0.0,
            blur_px: 0.0,
            overlay_opacity: 0.0,
            opacity: 1.0,
            visible,
            controls_visible: false,
        },
        Mode::Viewing => Transform {
            x,
            scale: VIEW_SCALE,
            corner_radius: VIEW_RADIUS,
            blur_px: 0.0,
            overlay_opacity: if offset == 0 { 1.0 } else { 0.0 },
            opacity: 1.0,
            visible,
            controls_visible: offset == 0 && visible,
        },
    }
}

/// Fraction of the commit threshold covered by `travelled`, in `[0, 1]`.
fn drag_progress(travelled: f64, width: f64) -> f64 {
    let threshold = width / SNAP_DIVISOR;
    if !(threshold.is_finite() && threshold > 0.0) {
        return 0.0;
    }
    clamp_unit(finite_or_zero(travelled).abs() / threshold)
}

fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}

fn clamp_unit(v: f64) -> f64 {
    if v.is_finite() { v.clamp(0.0, 1.0) } else { 0.0 }
}

fn finite_or_zero(v: f64) -> f64 {
    if v.is_finite() { v } else { 0.0 }
}
