//! Bundled demo rooms and the deterministic placeholder sequence.
//!
//! The gallery ships with six local rooms. They seed a fresh gallery, and
//! they double as filler whenever the image provider cannot be reached:
//! [`FallbackSequence`] hands them out in order, wrapping around, so a run
//! of provider failures still produces distinct and reproducible rooms.

#[cfg(test)]
#[path = "fallback_test.rs"]
mod fallback_test;

use crate::rooms::{Room, RoomDraft};

/// `(image, title, floor, wall)` for each bundled room.
const BUNDLED: [(&str, &str, &str, &str); 6] = [
    ("assets/img1.png", "Living Room", "Dark forest hardwood", "Pearl white"),
    ("assets/img2.png", "Cozy Bedroom", "Hawk maple hardwood", "Deep night blue"),
    ("assets/img3.jpeg", "Minimalistic Living Space", "Light oak wood", "Soft ivory"),
    ("assets/img4.jpeg", "Rustic Café", "Stone tile", "Weathered limestone"),
    ("assets/img5.jpeg", "Sky-high Urban Spa", "Polished grey stone", "Neutral taupe"),
    ("assets/img6.jpeg", "Sunlit Modern Retreat", "Bleached ash wood", "Matte eggshell white"),
];

/// Number of entries in the placeholder sequence.
pub const SEQUENCE_LEN: usize = BUNDLED.len();

/// The bundled room at `position`, wrapping modulo [`SEQUENCE_LEN`].
#[must_use]
pub fn placeholder(position: usize) -> RoomDraft {
    let (image, title, floor, wall) = BUNDLED[position % SEQUENCE_LEN];
    RoomDraft::new(image, title, floor, wall)
}

/// Fresh rooms for every bundled entry, in order.
#[must_use]
pub fn demo_rooms() -> Vec<Room> {
    (0..SEQUENCE_LEN).map(|i| Room::from_draft(placeholder(i))).collect()
}

/// Cursor over the placeholder sequence.
#[derive(Debug, Clone, Default)]
pub struct FallbackSequence {
    cursor: usize,
}

impl FallbackSequence {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Position the next call to [`Self::next_draft`] will use.
    #[must_use]
    pub fn position(&self) -> usize {
        self.cursor
    }

    /// Return the next placeholder and advance, wrapping at the end.
    pub fn next_draft(&mut self) -> RoomDraft {
        let draft = placeholder(self.cursor);
        self.cursor = (self.cursor + 1) % SEQUENCE_LEN;
        draft
    }
}
