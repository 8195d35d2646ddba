use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::focus::{FocusStore, Mode, MutationKind, Transition};
use crate::geometry::{Transform, Viewport, compute_transform};
use crate::input::{DragRelease, DragState, GestureInterpreter};
use crate::publish::{PublishInput, Snapshot, TransformPublisher};
use crate::rooms::{CollectionError, Room, RoomId, RoomStore};

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Commands accepted from the rendering layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    ToggleMode,
    DragUpdate { delta: f64, distance: f64, direction: f64 },
    DragEnd,
    AddRoom,
    Duplicate { id: RoomId },
    Remove { id: RoomId },
    ToggleFavourite { id: RoomId },
    Resize { width: f64, height: f64 },
    /// The renderer finished the exit animation started by `Remove`.
    ExitComplete { id: RoomId },
    Share,
    /// The host's provisioner started or finished a request.
    ProvisionPending { pending: bool },
}

/// Actions returned from command handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// A new snapshot was published.
    RenderNeeded,
    /// The mode changed; every room should settle to its resting transform.
    Settle { mode: Mode },
    /// A drag committed and moved the focus.
    Navigated { from: usize, to: usize },
    /// A drag ended without committing; the focused room springs back.
    SpringBack,
    /// The host should fetch a new room and hand it to [`EngineCore::append_room`].
    ProvisionRequested,
    RoomAdded { id: RoomId, transition: Transition },
    /// The room is animating out; call `ExitComplete` when the animation ends.
    ExitStarted { id: RoomId, transform: Transform },
    RoomRemoved { id: RoomId, transition: Transition },
    /// Image source of the focused room, for the host's clipboard.
    ShareReady { source: String },
}

/// Carousel state and command handling. No I/O, no clock.
pub struct EngineCore {
    rooms: RoomStore,
    focus: FocusStore,
    gesture: GestureInterpreter,
    publisher: TransformPublisher,
    viewport: Viewport,
    provision_pending: bool,
    latest: Snapshot,
}

impl Default for EngineCore {
    fn default() -> Self {
        Self::new()
    }
}

impl EngineCore {
    /// An empty gallery with a zero-sized viewport.
    #[must_use]
    pub fn new() -> Self {
        Self::with_rooms(Vec::new())
    }

    /// A gallery seeded with `rooms`, focused on the first one.
    #[must_use]
    pub fn with_rooms(rooms: Vec<Room>) -> Self {
        let mut publisher = TransformPublisher::new();
        let latest = publisher.publish(PublishInput {
            rooms: &[],
            focus: None,
            mode: Mode::Browsing,
            drag: DragState::neutral(),
            viewport: Viewport::default(),
            provision_pending: false,
            settle: false,
            transition: None,
        });
        let mut core = Self {
            rooms: RoomStore::new(),
            focus: FocusStore::new(),
            gesture: GestureInterpreter::new(),
            publisher,
            viewport: Viewport::default(),
            provision_pending: false,
            latest,
        };
        core.load(rooms);
        core
    }

    // --- Data inputs ---

    /// Replace the whole collection and refocus the first room.
    pub fn load(&mut self, rooms: Vec<Room>) -> Vec<Action> {
        self.rooms.load(rooms);
        self.focus.sync_len(self.rooms.len());
        self.focus.set_focus(0);
        self.gesture.cancel();
        self.publish(false, None);
        vec![Action::RenderNeeded]
    }

    /// Dispatch a command from the rendering layer.
    pub fn apply(&mut self, command: Command) -> Vec<Action> {
        match command {
            Command::ToggleMode => self.toggle_mode(),
            Command::DragUpdate { delta, distance, direction } => self.drag_update(delta, distance, direction),
            Command::DragEnd => self.drag_end(),
            Command::AddRoom => self.add_room(),
            Command::Duplicate { id } => self.duplicate(&id),
            Command::Remove { id } => self.remove(&id),
            Command::ToggleFavourite { id } => self.toggle_favourite(&id),
            Command::Resize { width, height } => self.resize(width, height),
            Command::ExitComplete { id } => self.exit_complete(&id),
            Command::Share => self.share(),
            Command::ProvisionPending { pending } => self.set_provision_pending(pending),
        }
    }

    // --- Mode / focus ---

    pub fn toggle_mode(&mut self) -> Vec<Action> {
        if !self.focus.toggle_mode() {
            return Vec::new();
        }
        self.gesture.cancel();
        self.publish(true, None);
        vec![Action::Settle { mode: self.focus.mode() }, Action::RenderNeeded]
    }

    /// Focus the room at `index`, clamped into range.
    pub fn set_focus(&mut self, index: usize) -> Vec<Action> {
        let Some(from) = self.focus.index() else {
            return Vec::new();
        };
        if !self.focus.set_focus(index) {
            return Vec::new();
        }
        self.publish(false, None);
        vec![Action::Navigated { from, to: self.focus.index().unwrap_or(0) }, Action::RenderNeeded]
    }

    // --- Gestures ---

    /// Feed one drag sample. May commit a single focus move per gesture.
    pub fn drag_update(&mut self, delta: f64, distance: f64, direction: f64) -> Vec<Action> {
        let before = self.gesture.drag();
        let update = self
            .gesture
            .on_drag_update(self.focus.mode(), self.viewport.width, delta, distance, direction);

        let Some(commit) = update.commit else {
            if update.drag == before && !update.drag.active {
                return Vec::new();
            }
            self.publish(false, None);
            return vec![Action::RenderNeeded];
        };

        let from = self.focus.index().unwrap_or(0);
        let moved = self.focus.step(commit.focus_delta());
        let to = self.focus.index().unwrap_or(0);
        debug!(from, to, direction = commit.direction_sign, "drag committed");
        self.publish(false, None);
        if moved {
            vec![Action::Navigated { from, to }, Action::RenderNeeded]
        } else {
            vec![Action::RenderNeeded]
        }
    }

    /// Pointer released.
    pub fn drag_end(&mut self) -> Vec<Action> {
        match self.gesture.on_drag_end() {
            DragRelease::Idle => Vec::new(),
            DragRelease::SpringBack => {
                self.publish(false, None);
                vec![Action::SpringBack, Action::RenderNeeded]
            }
            DragRelease::Settled => {
                self.publish(false, None);
                vec![Action::RenderNeeded]
            }
        }
    }

    // --- Mutations ---

    /// Ask the host to provision a room. The engine never fetches anything itself.
    pub fn add_room(&mut self) -> Vec<Action> {
        vec![Action::ProvisionRequested]
    }

    /// Append a provisioned room and focus it.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::DuplicateId`] if the room's id is already
    /// in the collection; nothing changes in that case.
    pub fn append_room(&mut self, room: Room) -> Result<Vec<Action>, CollectionError> {
        let id = room.id;
        let previous = self.focus.index().unwrap_or(0);
        let position = self.rooms.append(room)?;
        let transition = self
            .focus
            .rebase_on_mutation(previous, MutationKind::Append, position, self.rooms.len());
        self.publish(false, Some(transition));
        Ok(vec![Action::RoomAdded { id, transition }, Action::RenderNeeded])
    }

    /// Insert a copy of the room directly after it and focus the copy.
    pub fn duplicate(&mut self, id: &RoomId) -> Vec<Action> {
        let Some(position) = self.live_index(id) else {
            return Vec::new();
        };
        let previous = self.focus.index().unwrap_or(0);
        let Some(copy_at) = self.rooms.duplicate_at(position) else {
            return Vec::new();
        };
        let Some(copy_id) = self.rooms.get(copy_at).map(|r| r.id) else {
            return Vec::new();
        };
        let transition = self
            .focus
            .rebase_on_mutation(previous, MutationKind::Duplicate, position, self.rooms.len());
        self.publish(false, Some(transition));
        vec![Action::RoomAdded { id: copy_id, transition }, Action::RenderNeeded]
    }

    /// Start removing a room. The room stays in the collection, pinned to its
    /// exit transform, until [`Self::exit_complete`] is called for it.
    pub fn remove(&mut self, id: &RoomId) -> Vec<Action> {
        let Some(position) = self.live_index(id) else {
            return Vec::new();
        };
        let from = self.publisher.transform(id).unwrap_or_else(|| {
            compute_transform(
                position,
                self.focus.index().unwrap_or(0),
                self.focus.mode(),
                &self.gesture.drag(),
                self.viewport,
            )
        });
        let Some(transform) = self.publisher.begin_exit(*id, from) else {
            return Vec::new();
        };
        self.publish(false, None);
        vec![Action::ExitStarted { id: *id, transform }, Action::RenderNeeded]
    }

    /// The exit animation for `id` finished: drop the room and rebase the focus.
    pub fn exit_complete(&mut self, id: &RoomId) -> Vec<Action> {
        if !self.publisher.is_exiting(id) {
            return Vec::new();
        }
        let Some(position) = self.rooms.index_of(id) else {
            self.publisher.finish_exit(id);
            return Vec::new();
        };
        let previous = self.focus.index().unwrap_or(0);
        let mode_before = self.focus.mode();
        self.publisher.finish_exit(id);
        self.rooms.remove_at(position);
        let transition = self
            .focus
            .rebase_on_mutation(previous, MutationKind::Remove, position, self.rooms.len());

        let mode_changed = self.focus.mode() != mode_before;
        if mode_changed {
            self.gesture.cancel();
        }
        self.publish(mode_changed, Some(transition));

        let mut actions = vec![Action::RoomRemoved { id: *id, transition }];
        if mode_changed {
            actions.push(Action::Settle { mode: self.focus.mode() });
        }
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Flip the favourite flag. Order and focus are untouched.
    pub fn toggle_favourite(&mut self, id: &RoomId) -> Vec<Action> {
        let Some(position) = self.live_index(id) else {
            return Vec::new();
        };
        if self.rooms.toggle_favourite(position).is_none() {
            return Vec::new();
        }
        self.publish(false, None);
        vec![Action::RenderNeeded]
    }

    // --- Viewport / share ---

    pub fn resize(&mut self, width: f64, height: f64) -> Vec<Action> {
        let viewport = Viewport::new(width, height);
        if viewport == self.viewport {
            return Vec::new();
        }
        self.viewport = viewport;
        self.publish(false, None);
        vec![Action::RenderNeeded]
    }

    /// Record whether the host is provisioning a room; the add control shows
    /// as busy while it is.
    pub fn set_provision_pending(&mut self, pending: bool) -> Vec<Action> {
        if self.provision_pending == pending {
            return Vec::new();
        }
        self.provision_pending = pending;
        self.publish(false, None);
        vec![Action::RenderNeeded]
    }

    pub fn share(&self) -> Vec<Action> {
        self.share_source()
            .map(|source| vec![Action::ShareReady { source: source.to_owned() }])
            .unwrap_or_default()
    }

    // --- Queries ---

    /// The most recently published snapshot.
    #[must_use]
    pub fn snapshot(&self) -> &Snapshot {
        &self.latest
    }

    #[must_use]
    pub fn focused_room(&self) -> Option<&Room> {
        self.rooms.get(self.focus.index()?)
    }

    /// Image source of the focused room, for an external copy-to-clipboard action.
    #[must_use]
    pub fn share_source(&self) -> Option<&str> {
        self.focused_room().map(|r| r.image_source.as_str())
    }

    #[must_use]
    pub fn rooms(&self) -> &[Room] {
        self.rooms.rooms()
    }

    #[must_use]
    pub fn room(&self, id: &RoomId) -> Option<&Room> {
        self.rooms.get(self.rooms.index_of(id)?)
    }

    #[must_use]
    pub fn focus_index(&self) -> Option<usize> {
        self.focus.index()
    }

    #[must_use]
    pub fn provision_pending(&self) -> bool {
        self.provision_pending
    }

    #[must_use]
    pub fn mode(&self) -> Mode {
        self.focus.mode()
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    /// Position of `id`, unless the room is already on its way out.
    fn live_index(&self, id: &RoomId) -> Option<usize> {
        if self.publisher.is_exiting(id) {
            return None;
        }
        self.rooms.index_of(id)
    }

    fn publish(&mut self, settle: bool, transition: Option<Transition>) {
        self.latest = self.publisher.publish(PublishInput {
            rooms: self.rooms.rooms(),
            focus: self.focus.index(),
            mode: self.focus.mode(),
            drag: self.gesture.drag(),
            viewport: self.viewport,
            provision_pending: self.provision_pending,
            settle,
            transition,
        });
    }
}
