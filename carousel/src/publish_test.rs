#![allow(clippy::float_cmp)]

use super::*;
use crate::consts::VIEW_SCALE;
use crate::focus::MutationKind;
use crate::rooms::RoomDraft;

// =============================================================
// Helpers
// =============================================================

fn rooms(n: usize) -> Vec<Room> {
    (0..n)
        .map(|i| Room::from_draft(RoomDraft::new(format!("img{i}.png"), format!("Room {i}"), "floor", "wall")))
        .collect()
}

fn input(rooms: &[Room], focus: Option<usize>, mode: Mode) -> PublishInput<'_> {
    PublishInput {
        rooms,
        focus,
        mode,
        drag: DragState::neutral(),
        viewport: Viewport::new(1000.0, 800.0),
        provision_pending: false,
        settle: false,
        transition: None,
    }
}

// =============================================================
// publish
// =============================================================

#[test]
fn publish_emits_one_item_per_room_in_order() {
    let rs = rooms(4);
    let mut p = TransformPublisher::new();
    let snap = p.publish(input(&rs, Some(1), Mode::Browsing));
    assert_eq!(snap.items.len(), 4);
    for (i, item) in snap.items.iter().enumerate() {
        assert_eq!(item.index, i);
        assert_eq!(item.id, rs[i].id);
    }
}

#[test]
fn publish_increments_revision() {
    let rs = rooms(2);
    let mut p = TransformPublisher::new();
    let a = p.publish(input(&rs, Some(0), Mode::Browsing));
    let b = p.publish(input(&rs, Some(0), Mode::Browsing));
    assert_eq!(a.revision + 1, b.revision);
    assert_eq!(p.revision(), b.revision);
}

#[test]
fn publish_hides_rooms_outside_window() {
    let rs = rooms(8);
    let mut p = TransformPublisher::new();
    let snap = p.publish(input(&rs, Some(0), Mode::Viewing));
    let visible: Vec<usize> = snap.visible_items().map(|i| i.index).collect();
    assert_eq!(visible, vec![0, 1, 2]);
    assert!(snap.items[7].transform.x > 0.0);
}

#[test]
fn publish_caches_transforms_by_id() {
    let rs = rooms(3);
    let mut p = TransformPublisher::new();
    let snap = p.publish(input(&rs, Some(0), Mode::Viewing));
    assert_eq!(p.transform(&rs[2].id), Some(snap.items[2].transform));
}

#[test]
fn publish_drops_cache_for_removed_rooms() {
    let mut rs = rooms(3);
    let mut p = TransformPublisher::new();
    p.publish(input(&rs, Some(0), Mode::Browsing));
    let gone = rs.remove(1);
    p.publish(input(&rs, Some(0), Mode::Browsing));
    assert!(p.transform(&gone.id).is_none());
}

#[test]
fn publish_empty_collection_has_no_focus_and_shows_add() {
    let mut p = TransformPublisher::new();
    let snap = p.publish(input(&[], Some(3), Mode::Browsing));
    assert!(snap.items.is_empty());
    assert_eq!(snap.focus, None);
    assert!(snap.add_control_visible);
}

#[test]
fn publish_clamps_out_of_range_focus() {
    let rs = rooms(2);
    let mut p = TransformPublisher::new();
    let snap = p.publish(input(&rs, Some(9), Mode::Browsing));
    assert_eq!(snap.focus, Some(1));
    assert_eq!(snap.items[1].transform.x, 0.0);
}

#[test]
fn add_control_follows_last_room_in_window() {
    let rs = rooms(5);
    let mut p = TransformPublisher::new();
    assert!(p.publish(input(&rs, Some(4), Mode::Viewing)).add_control_visible);
    assert!(p.publish(input(&rs, Some(2), Mode::Viewing)).add_control_visible);
    assert!(!p.publish(input(&rs, Some(1), Mode::Viewing)).add_control_visible);
    assert!(!p.publish(input(&rs, Some(4), Mode::Browsing)).add_control_visible);
}

#[test]
fn add_control_busy_mirrors_provision_pending() {
    let mut p = TransformPublisher::new();
    assert!(!p.publish(input(&[], None, Mode::Browsing)).add_control_busy);
    let busy = p.publish(PublishInput { provision_pending: true, ..input(&[], None, Mode::Browsing) });
    assert!(busy.add_control_busy);
    assert!(busy.add_control_visible);
}

#[test]
fn publish_carries_transition_and_settle() {
    let rs = rooms(2);
    let mut p = TransformPublisher::new();
    let transition = Transition { from_focus: 0, to_focus: 1, kind: MutationKind::Append, position: 1 };
    let snap = p.publish(PublishInput { settle: true, transition: Some(transition), ..input(&rs, Some(1), Mode::Viewing) });
    assert!(snap.settle);
    assert_eq!(snap.transition, Some(transition));
}

// =============================================================
// Exit
// =============================================================

#[test]
fn begin_exit_pins_exit_transform_across_publishes() {
    let rs = rooms(3);
    let mut p = TransformPublisher::new();
    let snap = p.publish(input(&rs, Some(1), Mode::Viewing));
    let exit = p.begin_exit(rs[1].id, snap.items[1].transform).unwrap();
    assert_eq!(exit.scale, 0.0);
    assert_eq!(exit.opacity, 0.0);

    let snap = p.publish(input(&rs, Some(0), Mode::Viewing));
    let item = snap.item(&rs[1].id).unwrap();
    assert!(item.exiting);
    assert_eq!(item.transform.scale, exit.scale);
    assert_eq!(item.transform.opacity, exit.opacity);
    assert_eq!(item.transform.overlay_opacity, exit.overlay_opacity);
    assert!(item.transform.visible);
    assert_eq!(snap.items[0].transform.scale, VIEW_SCALE);
}

#[test]
fn exiting_room_follows_strip_position() {
    let rs = rooms(3);
    let mut p = TransformPublisher::new();
    let snap = p.publish(input(&rs, Some(1), Mode::Viewing));
    p.begin_exit(rs[1].id, snap.items[1].transform);

    let snap = p.publish(input(&rs, Some(0), Mode::Viewing));
    let expected = hidden_transform(1, 0, Mode::Viewing, Viewport::new(1000.0, 800.0)).x;
    assert_eq!(snap.items[1].transform.x, expected);
    assert!(snap.items[1].transform.x > 0.0);
}

#[test]
fn exiting_room_hidden_outside_window() {
    let rs = rooms(6);
    let mut p = TransformPublisher::new();
    let snap = p.publish(input(&rs, Some(0), Mode::Viewing));
    p.begin_exit(rs[0].id, snap.items[0].transform);

    let snap = p.publish(input(&rs, Some(5), Mode::Viewing));
    assert!(!snap.items[0].transform.visible);

    // Coming back into the window does not revive it.
    let snap = p.publish(input(&rs, Some(1), Mode::Viewing));
    assert!(!snap.items[0].transform.visible);
    assert!(snap.items[0].exiting);
}

#[test]
fn exiting_room_hidden_on_degenerate_viewport() {
    let rs = rooms(2);
    let mut p = TransformPublisher::new();
    let snap = p.publish(input(&rs, Some(0), Mode::Viewing));
    p.begin_exit(rs[0].id, snap.items[0].transform);

    let mut zero = input(&rs, Some(0), Mode::Viewing);
    zero.viewport = Viewport::new(0.0, 0.0);
    let snap = p.publish(zero);
    assert_eq!(snap.visible_items().count(), 0);
    assert!(snap.items[0].transform.x.is_finite());
}

#[test]
fn begin_exit_twice_is_rejected() {
    let rs = rooms(1);
    let mut p = TransformPublisher::new();
    let snap = p.publish(input(&rs, Some(0), Mode::Viewing));
    assert!(p.begin_exit(rs[0].id, snap.items[0].transform).is_some());
    assert!(p.begin_exit(rs[0].id, snap.items[0].transform).is_none());
    assert!(p.is_exiting(&rs[0].id));
}

#[test]
fn finish_exit_clears_bookkeeping() {
    let rs = rooms(1);
    let mut p = TransformPublisher::new();
    let snap = p.publish(input(&rs, Some(0), Mode::Viewing));
    p.begin_exit(rs[0].id, snap.items[0].transform);
    assert!(p.finish_exit(&rs[0].id));
    assert!(!p.is_exiting(&rs[0].id));
    assert!(p.transform(&rs[0].id).is_none());
    assert!(!p.finish_exit(&rs[0].id));
}

#[test]
fn exit_survives_index_shift() {
    let mut rs = rooms(3);
    let mut p = TransformPublisher::new();
    let snap = p.publish(input(&rs, Some(2), Mode::Viewing));
    let target = rs[2].id;
    p.begin_exit(target, snap.items[2].transform);
    rs.remove(0);
    let snap = p.publish(input(&rs, Some(1), Mode::Viewing));
    let item = snap.item(&target).unwrap();
    assert_eq!(item.index, 1);
    assert!(item.exiting);
    assert_eq!(item.transform.scale, 0.0);
}

// =============================================================
// Snapshot
// =============================================================

#[test]
fn snapshot_focused_returns_focus_item() {
    let rs = rooms(3);
    let mut p = TransformPublisher::new();
    let snap = p.publish(input(&rs, Some(2), Mode::Browsing));
    assert_eq!(snap.focused().unwrap().id, rs[2].id);
}

#[test]
fn snapshot_to_json_includes_items() {
    let rs = rooms(1);
    let mut p = TransformPublisher::new();
    let snap = p.publish(input(&rs, Some(0), Mode::Viewing));
    let json: serde_json::Value = serde_json::from_str(&snap.to_json().unwrap()).unwrap();
    assert_eq!(json["mode"], "viewing");
    assert_eq!(json["items"][0]["room"]["title"], "Room 0");
    assert_eq!(json["items"][0]["transform"]["visible"], true);
}
