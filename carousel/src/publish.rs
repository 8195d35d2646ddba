//! Transform publisher: recomputes room transforms and hands out snapshots.
//!
//! DESIGN
//! ======
//! The engine calls [`TransformPublisher::publish`] after every state change
//! (focus, mode, collection length, drag, viewport). Rooms inside the
//! visible window get a full [`compute_transform`]; rooms outside get the
//! cheap [`hidden_transform`]. Everything is keyed by `RoomId`, never by
//! position, so bookkeeping survives inserts and removals shifting the list.
//!
//! Removal is two-phase. [`TransformPublisher::begin_exit`] pins the room to
//! its exit transform; it stays in the collection until the renderer reports
//! the exit animation finished and the engine calls
//! [`TransformPublisher::finish_exit`]. Meanwhile its scale and fades stay
//! pinned while `x` tracks the strip, and it is hidden once it leaves the
//! window or the viewport degenerates. A hidden exiting room never reappears.

#[cfg(test)]
#[path = "publish_test.rs"]
mod publish_test;

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::focus::{Mode, Transition};
use crate::geometry::{Transform, Viewport, compute_transform, hidden_transform, in_window, offset_of};
use crate::input::DragState;
use crate::rooms::{Room, RoomId};

/// One room as the rendering layer sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemView {
    pub id: RoomId,
    /// Position in the collection at publish time.
    pub index: usize,
    pub transform: Transform,
    /// The room is animating out and will be dropped once the exit completes.
    pub exiting: bool,
    pub room: Room,
}

/// Everything the rendering layer needs to paint one frame of the gallery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Increases by one on every publish.
    pub revision: u64,
    pub mode: Mode,
    pub focus: Option<usize>,
    pub viewport: Viewport,
    pub drag: DragState,
    /// Every room should snap to its resting transform for `mode`.
    pub settle: bool,
    /// The focus move caused by the mutation that triggered this publish, if any.
    pub transition: Option<Transition>,
    /// Whether the add-room control is shown: always for an empty gallery,
    /// otherwise beside the last room in viewing mode while that room is
    /// inside the visible window.
    pub add_control_visible: bool,
    /// A room is being provisioned; the add control shows as busy.
    pub add_control_busy: bool,
    pub items: Vec<ItemView>,
}

impl Snapshot {
    /// Items the renderer should draw.
    pub fn visible_items(&self) -> impl Iterator<Item = &ItemView> {
        self.items.iter().filter(|item| item.transform.visible)
    }

    #[must_use]
    pub fn item(&self, id: &RoomId) -> Option<&ItemView> {
        self.items.iter().find(|item| item.id == *id)
    }

    /// The item at the focus index.
    #[must_use]
    pub fn focused(&self) -> Option<&ItemView> {
        self.items.get(self.focus?)
    }

    /// Serialize for a host that consumes JSON.
    ///
    /// # Errors
    ///
    /// Returns the underlying serializer error; not expected for well-formed snapshots.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Inputs to a publish, captured by the engine at the start of an event.
#[derive(Debug, Clone, Copy)]
pub struct PublishInput<'a> {
    pub rooms: &'a [Room],
    pub focus: Option<usize>,
    pub mode: Mode,
    pub drag: DragState,
    pub viewport: Viewport,
    pub provision_pending: bool,
    pub settle: bool,
    pub transition: Option<Transition>,
}

/// Id-keyed cache of the last published transforms plus in-progress exits.
#[derive(Debug, Clone, Default)]
pub struct TransformPublisher {
    transforms: HashMap<RoomId, Transform>,
    exiting: HashSet<RoomId>,
    revision: u64,
}

impl TransformPublisher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Last transform published for `id`.
    #[must_use]
    pub fn transform(&self, id: &RoomId) -> Option<Transform> {
        self.transforms.get(id).copied()
    }

    #[must_use]
    pub fn is_exiting(&self, id: &RoomId) -> bool {
        self.exiting.contains(id)
    }

    /// Recompute every room and return the new snapshot.
    pub fn publish(&mut self, input: PublishInput<'_>) -> Snapshot {
        let len = input.rooms.len();
        let focus = checked_focus(input.focus, len);
        let anchor = focus.unwrap_or(0);

        let mut items = Vec::with_capacity(len);
        for (index, room) in input.rooms.iter().enumerate() {
            let exiting = self.exiting.contains(&room.id);
            let transform = if exiting {
                // Scale and fades stay pinned; position and visibility follow the strip.
                let resting = hidden_transform(index, anchor, input.mode, input.viewport);
                let pinned = self
                    .transforms
                    .get(&room.id)
                    .copied()
                    .unwrap_or_else(|| Transform::exiting(resting));
                Transform {
                    x: resting.x,
                    visible: pinned.visible && in_window(offset_of(index, anchor)) && !input.viewport.is_degenerate(),
                    ..pinned
                }
            } else if in_window(offset_of(index, anchor)) {
                compute_transform(index, anchor, input.mode, &input.drag, input.viewport)
            } else {
                hidden_transform(index, anchor, input.mode, input.viewport)
            };
            self.transforms.insert(room.id, transform);
            items.push(ItemView { id: room.id, index, transform, exiting, room: room.clone() });
        }

        let live: HashSet<RoomId> = input.rooms.iter().map(|r| r.id).collect();
        self.transforms.retain(|id, _| live.contains(id));
        self.exiting.retain(|id| live.contains(id));
        self.revision += 1;

        let add_control_visible =
            len == 0 || (input.mode == Mode::Viewing && in_window(offset_of(len - 1, anchor)));

        Snapshot {
            revision: self.revision,
            mode: input.mode,
            focus,
            viewport: input.viewport,
            drag: input.drag,
            settle: input.settle,
            transition: input.transition,
            add_control_visible,
            add_control_busy: input.provision_pending,
            items,
        }
    }

    /// Start the exit animation for `id` from its current transform `from`.
    /// Returns the exit transform, or `None` if the room is already exiting.
    pub fn begin_exit(&mut self, id: RoomId, from: Transform) -> Option<Transform> {
        if !self.exiting.insert(id) {
            return None;
        }
        let exit = Transform::exiting(from);
        self.transforms.insert(id, exit);
        Some(exit)
    }

    /// Forget an exit once the renderer has finished it. Returns whether `id` was exiting.
    pub fn finish_exit(&mut self, id: &RoomId) -> bool {
        if !self.exiting.remove(id) {
            return false;
        }
        self.transforms.remove(id);
        true
    }
}

/// Clamp a focus that should already be in range. Anything else is a
/// contract violation upstream: log it and recover.
fn checked_focus(focus: Option<usize>, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    match focus {
        Some(i) if i < len => Some(i),
        other => {
            warn!(?other, len, "focus index out of range at publish; clamping");
            Some(other.map_or(0, |i| i.min(len - 1)))
        }
    }
}
