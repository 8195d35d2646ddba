use super::*;

fn store_with(len: usize, focus: usize) -> FocusStore {
    let mut store = FocusStore::new();
    store.sync_len(len);
    store.set_focus(focus);
    store
}

// =============================================================
// Mode
// =============================================================

#[test]
fn default_mode_is_browsing() {
    assert_eq!(Mode::default(), Mode::Browsing);
}

#[test]
fn toggled_flips_mode() {
    assert_eq!(Mode::Browsing.toggled(), Mode::Viewing);
    assert_eq!(Mode::Viewing.toggled(), Mode::Browsing);
}

#[test]
fn mode_serializes_lowercase() {
    assert_eq!(serde_json::to_string(&Mode::Viewing).unwrap(), "\"viewing\"");
}

// =============================================================
// set_focus / step
// =============================================================

#[test]
fn empty_store_has_no_focus() {
    let store = FocusStore::new();
    assert_eq!(store.index(), None);
    assert!(store.is_empty());
}

#[test]
fn set_focus_is_noop_when_empty() {
    let mut store = FocusStore::new();
    assert!(!store.set_focus(3));
    assert_eq!(store.index(), None);
}

#[test]
fn set_focus_clamps_to_last() {
    let mut store = store_with(3, 0);
    assert!(store.set_focus(10));
    assert_eq!(store.index(), Some(2));
}

#[test]
fn set_focus_reports_unchanged() {
    let mut store = store_with(3, 1);
    assert!(!store.set_focus(1));
}

#[test]
fn step_clamps_at_both_ends() {
    let mut store = store_with(3, 0);
    assert!(!store.step(-1));
    assert_eq!(store.index(), Some(0));
    store.set_focus(2);
    assert!(!store.step(1));
    assert_eq!(store.index(), Some(2));
    assert!(store.step(-1));
    assert_eq!(store.index(), Some(1));
}

// =============================================================
// Mode switching
// =============================================================

#[test]
fn toggle_mode_reports_change() {
    let mut store = store_with(2, 0);
    assert!(store.toggle_mode());
    assert_eq!(store.mode(), Mode::Viewing);
    assert!(store.toggle_mode());
    assert_eq!(store.mode(), Mode::Browsing);
}

#[test]
fn viewing_refused_when_empty() {
    let mut store = FocusStore::new();
    assert!(!store.set_mode(Mode::Viewing));
    assert_eq!(store.mode(), Mode::Browsing);
}

#[test]
fn setting_same_mode_is_not_a_change() {
    let mut store = store_with(2, 0);
    assert!(!store.set_mode(Mode::Browsing));
}

#[test]
fn sync_len_to_zero_forces_browsing() {
    let mut store = store_with(2, 1);
    store.set_mode(Mode::Viewing);
    store.sync_len(0);
    assert_eq!(store.mode(), Mode::Browsing);
    assert_eq!(store.index(), None);
}

#[test]
fn sync_len_clamps_focus() {
    let mut store = store_with(5, 4);
    store.sync_len(2);
    assert_eq!(store.index(), Some(1));
}

// =============================================================
// rebase_on_mutation
// =============================================================

#[test]
fn append_focuses_new_room() {
    let mut store = store_with(3, 0);
    let t = store.rebase_on_mutation(0, MutationKind::Append, 3, 4);
    assert_eq!(store.index(), Some(3));
    assert_eq!(t.from_focus, 0);
    assert_eq!(t.to_focus, 3);
    assert_eq!(t.slide(), Slide::Forward);
}

#[test]
fn append_to_empty_focuses_zero() {
    let mut store = FocusStore::new();
    store.rebase_on_mutation(0, MutationKind::Append, 0, 1);
    assert_eq!(store.index(), Some(0));
}

#[test]
fn duplicate_focuses_copy() {
    let mut store = store_with(3, 1);
    let t = store.rebase_on_mutation(1, MutationKind::Duplicate, 1, 4);
    assert_eq!(store.index(), Some(2));
    assert_eq!(t.kind, MutationKind::Duplicate);
}

#[test]
fn remove_before_focus_keeps_same_room() {
    let mut store = store_with(3, 2);
    let t = store.rebase_on_mutation(2, MutationKind::Remove, 0, 2);
    assert_eq!(store.index(), Some(1));
    assert_eq!(t.slide(), Slide::Backward);
}

#[test]
fn remove_at_focus_keeps_position() {
    let mut store = store_with(3, 1);
    let t = store.rebase_on_mutation(1, MutationKind::Remove, 1, 2);
    assert_eq!(store.index(), Some(1));
    assert_eq!(t.slide(), Slide::Still);
}

#[test]
fn remove_focused_last_room_moves_back() {
    let mut store = store_with(3, 2);
    store.rebase_on_mutation(2, MutationKind::Remove, 2, 2);
    assert_eq!(store.index(), Some(1));
}

#[test]
fn remove_after_focus_is_unchanged() {
    let mut store = store_with(3, 0);
    store.rebase_on_mutation(0, MutationKind::Remove, 2, 2);
    assert_eq!(store.index(), Some(0));
}

#[test]
fn remove_only_room_empties_and_browses() {
    let mut store = store_with(1, 0);
    store.set_mode(Mode::Viewing);
    store.rebase_on_mutation(0, MutationKind::Remove, 0, 0);
    assert_eq!(store.index(), None);
    assert_eq!(store.mode(), Mode::Browsing);
}

#[test]
fn focus_stays_in_range_across_mutation_sequence() {
    let mut store = FocusStore::new();
    let mut len = 0;
    let ops = [
        (MutationKind::Append, 0),
        (MutationKind::Append, 0),
        (MutationKind::Duplicate, 0),
        (MutationKind::Remove, 2),
        (MutationKind::Remove, 0),
        (MutationKind::Remove, 0),
        (MutationKind::Append, 0),
    ];
    for (kind, pos) in ops {
        let prev = store.index().unwrap_or(0);
        len = match kind {
            MutationKind::Append | MutationKind::Duplicate => len + 1,
            MutationKind::Remove => len - 1,
        };
        let pos = if kind == MutationKind::Append { len - 1 } else { pos };
        store.rebase_on_mutation(prev, kind, pos, len);
        if len > 0 {
            assert!(store.index().unwrap() < len);
        } else {
            assert_eq!(store.mode(), Mode::Browsing);
        }
    }
}
