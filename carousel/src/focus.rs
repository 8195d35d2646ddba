//! Focus index and view mode, kept consistent with the collection length.
//!
//! `FocusStore` mirrors the collection length so it can clamp on its own.
//! Every structural mutation goes through [`FocusStore::rebase_on_mutation`],
//! which both moves the focus and returns a [`Transition`] describing the
//! move, so the publisher can tell which way rooms should appear to slide
//! without keeping a "previous index" around.

#[cfg(test)]
#[path = "focus_test.rs"]
mod focus_test;

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// How the gallery is being looked at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Flat full-screen strip, one room per viewport width.
    #[default]
    Browsing,
    /// Zoomed-out, gesture-navigable view with detail controls.
    Viewing,
}

impl Mode {
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Browsing => Self::Viewing,
            Self::Viewing => Self::Browsing,
        }
    }
}

/// The structural mutation that caused a focus rebase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MutationKind {
    Append,
    Duplicate,
    Remove,
}

/// Which way the strip moves as a result of a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Slide {
    /// Focus moved to a later room; the strip slides toward negative x.
    Forward,
    /// Focus moved to an earlier room.
    Backward,
    /// Focus index unchanged.
    Still,
}

/// Record of one focus move caused by a mutation. Emitted once per mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    pub from_focus: usize,
    pub to_focus: usize,
    pub kind: MutationKind,
    /// Collection position the mutation applied to.
    pub position: usize,
}

impl Transition {
    #[must_use]
    pub fn slide(&self) -> Slide {
        match self.to_focus.cmp(&self.from_focus) {
            Ordering::Greater => Slide::Forward,
            Ordering::Less => Slide::Backward,
            Ordering::Equal => Slide::Still,
        }
    }
}

/// Focus index and mode for a collection of `len` rooms.
#[derive(Debug, Clone, Default)]
pub struct FocusStore {
    index: usize,
    mode: Mode,
    len: usize,
}

impl FocusStore {
    /// Store for an empty collection: browsing, no focus.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The focused position, or `None` when the collection is empty.
    #[must_use]
    pub fn index(&self) -> Option<usize> {
        (self.len > 0).then_some(self.index)
    }

    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Focus position `i`, clamped into range. Returns whether the focus moved.
    pub fn set_focus(&mut self, i: usize) -> bool {
        if self.len == 0 {
            return false;
        }
        let next = i.min(self.len - 1);
        let changed = next != self.index;
        self.index = next;
        changed
    }

    /// Move the focus by `delta` positions, clamped. Returns whether it moved.
    pub fn step(&mut self, delta: isize) -> bool {
        if self.len == 0 {
            return false;
        }
        let target = self.index.saturating_add_signed(delta);
        self.set_focus(target)
    }

    /// Switch mode. Viewing is refused for an empty collection.
    /// Returns whether the mode changed (the settle trigger).
    pub fn set_mode(&mut self, mode: Mode) -> bool {
        if mode == Mode::Viewing && self.len == 0 {
            return false;
        }
        let changed = mode != self.mode;
        self.mode = mode;
        changed
    }

    pub fn toggle_mode(&mut self) -> bool {
        self.set_mode(self.mode.toggled())
    }

    /// Adopt a new collection length without a mutation record (bulk load).
    /// Clamps the focus and drops back to browsing when empty.
    pub fn sync_len(&mut self, len: usize) {
        self.len = len;
        self.clamp();
    }

    /// Rebase the focus after a structural mutation at `position` that left
    /// the collection with `new_len` rooms.
    ///
    /// - append: focus the appended room.
    /// - duplicate: focus the copy at `position + 1`.
    /// - remove before the focus: follow the focused room down one slot.
    /// - remove at the focus: the room that slides into `position` takes
    ///   focus, or the new last room if the old last one went.
    /// - remove after the focus: unchanged.
    pub fn rebase_on_mutation(
        &mut self,
        previous_focus: usize,
        kind: MutationKind,
        position: usize,
        new_len: usize,
    ) -> Transition {
        self.len = new_len;
        self.index = match kind {
            MutationKind::Append => new_len.saturating_sub(1),
            MutationKind::Duplicate => position + 1,
            MutationKind::Remove => match position.cmp(&previous_focus) {
                Ordering::Less => previous_focus - 1,
                Ordering::Equal => position,
                Ordering::Greater => previous_focus,
            },
        };
        self.clamp();
        Transition { from_focus: previous_focus, to_focus: self.index, kind, position }
    }

    fn clamp(&mut self) {
        if self.len == 0 {
            self.index = 0;
            self.mode = Mode::Browsing;
        } else if self.index >= self.len {
            self.index = self.len - 1;
        }
    }
}
