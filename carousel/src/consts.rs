//! Shared numeric constants for the carousel crate.

// ── Viewing mode ────────────────────────────────────────────────

/// Scale applied to every room while the gallery is in viewing mode.
pub const VIEW_SCALE: f64 = 0.8;

/// Corner radius of a room in viewing mode, in pixels.
pub const VIEW_RADIUS: f64 = 18.0;

/// How far adjacent rooms lap into the side margins in viewing mode.
/// Must stay above 1.0 or neighbours would not peek in.
pub const LAP_FACTOR: f64 = 1.5;

// ── Dragging ────────────────────────────────────────────────────

/// Fraction of the viewport width (as a divisor) a drag must travel before
/// it commits to the next or previous room.
pub const SNAP_DIVISOR: f64 = 4.0;

/// Blur in pixels applied to the focused room at the commit threshold.
pub const MAX_BLUR: f64 = 15.0;

/// Scale of the focused room at the commit threshold.
pub const DRAG_MIN_SCALE: f64 = 0.74;

// ── Windowing ───────────────────────────────────────────────────

/// Rooms further than this many positions from the focus are never rendered.
pub const VISIBLE_RADIUS: i64 = 2;
