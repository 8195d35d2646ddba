//! Room model: the records shown by the carousel and the ordered store that owns them.
//!
//! `Room` is one full-screen gallery item. `RoomDraft` carries the display
//! fields of a room that has not been assigned an identity yet (the
//! provisioning path builds drafts; the store only ever holds rooms). The
//! store's insertion order is the browsing order, so every operation is
//! positional; callers that only hold an id resolve it with
//! [`RoomStore::index_of`] first.

#[cfg(test)]
#[path = "rooms_test.rs"]
mod rooms_test;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a room. Never reused once assigned.
pub type RoomId = Uuid;

/// A gallery room as stored in the collection and handed to renderers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    /// Stable identifier assigned at creation.
    pub id: RoomId,
    /// URI or asset path of the displayed image.
    pub image_source: String,
    /// Headline shown in the info panel.
    pub title: String,
    /// First descriptor line (floor finish, or photo location).
    pub primary_label: String,
    /// Second descriptor line (wall finish, or photographer name).
    pub secondary_label: String,
    /// Whether the user marked this room as a favourite.
    pub favourited: bool,
}

/// Display fields for a room that has not been given an id yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomDraft {
    pub image_source: String,
    pub title: String,
    pub primary_label: String,
    pub secondary_label: String,
}

impl RoomDraft {
    #[must_use]
    pub fn new(
        image_source: impl Into<String>,
        title: impl Into<String>,
        primary_label: impl Into<String>,
        secondary_label: impl Into<String>,
    ) -> Self {
        Self {
            image_source: image_source.into(),
            title: title.into(),
            primary_label: primary_label.into(),
            secondary_label: secondary_label.into(),
        }
    }
}

impl Room {
    /// Give a draft a fresh identity. New rooms start unfavourited.
    #[must_use]
    pub fn from_draft(draft: RoomDraft) -> Self {
        Self {
            id: Uuid::new_v4(),
            image_source: draft.image_source,
            title: draft.title,
            primary_label: draft.primary_label,
            secondary_label: draft.secondary_label,
            favourited: false,
        }
    }

    /// Copy every field except the id, which is freshly assigned.
    #[must_use]
    pub fn duplicate(&self) -> Self {
        Self { id: Uuid::new_v4(), ..self.clone() }
    }
}

/// Errors from collection mutations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CollectionError {
    /// A room with this id is already in the collection.
    #[error("room {0} is already in the collection")]
    DuplicateId(RoomId),
}

/// Ordered, in-memory store of rooms.
#[derive(Debug, Clone, Default)]
pub struct RoomStore {
    rooms: Vec<Room>,
}

impl RoomStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self { rooms: Vec::new() }
    }

    /// Replace the whole collection. Later rooms whose id repeats an earlier
    /// one are dropped.
    pub fn load(&mut self, rooms: Vec<Room>) {
        self.rooms.clear();
        for room in rooms {
            if self.index_of(&room.id).is_none() {
                self.rooms.push(room);
            }
        }
    }

    /// Add a room at the end, returning its index.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::DuplicateId`] if a room with the same id is
    /// already present; the collection is left untouched.
    pub fn append(&mut self, room: Room) -> Result<usize, CollectionError> {
        if self.index_of(&room.id).is_some() {
            return Err(CollectionError::DuplicateId(room.id));
        }
        self.rooms.push(room);
        Ok(self.rooms.len() - 1)
    }

    /// Insert a copy of the room at `position` directly after it. Returns the
    /// copy's index, or `None` if `position` is out of range.
    pub fn duplicate_at(&mut self, position: usize) -> Option<usize> {
        let copy = self.rooms.get(position)?.duplicate();
        self.rooms.insert(position + 1, copy);
        Some(position + 1)
    }

    /// Remove the room at `position`, returning it. Out-of-range positions are a no-op.
    pub fn remove_at(&mut self, position: usize) -> Option<Room> {
        if position >= self.rooms.len() {
            return None;
        }
        Some(self.rooms.remove(position))
    }

    /// Flip the favourite flag in place, returning the new value.
    pub fn toggle_favourite(&mut self, position: usize) -> Option<bool> {
        let room = self.rooms.get_mut(position)?;
        room.favourited = !room.favourited;
        Some(room.favourited)
    }

    /// Position of the room with the given id.
    #[must_use]
    pub fn index_of(&self, id: &RoomId) -> Option<usize> {
        self.rooms.iter().position(|r| r.id == *id)
    }

    #[must_use]
    pub fn get(&self, position: usize) -> Option<&Room> {
        self.rooms.get(position)
    }

    /// Rooms in browsing order.
    #[must_use]
    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    /// Number of rooms currently in the store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    /// Returns `true` if the store contains no rooms.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }
}
