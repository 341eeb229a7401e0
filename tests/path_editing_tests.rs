//! Integrationstests für die Editing-Use-Cases:
//! - Einfügen über Vorschau-Kinder (Eltern-Kette)
//! - Atomares Löschen der Selektion
//! - Umkehren mit Szene-Abgleich
//! - Teil-Element-Selektion

use glam::Vec2;
use waypoint_path::app::use_cases;
use waypoint_path::{
    Path, PathError, PathOptions, PathSession, SceneHost, SegmentGeometry, SegmentId,
    SegmentKindOption, Subchild, Waypoint, WaypointId,
};

/// Mitgeschriebener Szene-Aufruf
#[derive(Debug, Clone, PartialEq)]
enum SceneEvent {
    Attach(SegmentId),
    Detach(SegmentId),
    Refresh(SegmentId),
    Highlight(SegmentId, Subchild),
    Selected(WaypointId),
}

#[derive(Default)]
struct RecordingHost {
    events: Vec<SceneEvent>,
}

impl RecordingHost {
    fn attached(&self) -> Vec<SegmentId> {
        self.events
            .iter()
            .filter_map(|e| match e {
                SceneEvent::Attach(id) => Some(*id),
                _ => None,
            })
            .collect()
    }

    fn detached(&self) -> Vec<SegmentId> {
        self.events
            .iter()
            .filter_map(|e| match e {
                SceneEvent::Detach(id) => Some(*id),
                _ => None,
            })
            .collect()
    }

    fn last_selected(&self) -> Option<WaypointId> {
        self.events.iter().rev().find_map(|e| match e {
            SceneEvent::Selected(id) => Some(*id),
            _ => None,
        })
    }
}

impl SceneHost for RecordingHost {
    fn attach_segment(&mut self, segment: SegmentId, _geometry: &SegmentGeometry, _scale: f32) {
        self.events.push(SceneEvent::Attach(segment));
    }

    fn detach_segment(&mut self, segment: SegmentId) {
        self.events.push(SceneEvent::Detach(segment));
    }

    fn refresh_segment(&mut self, segment: SegmentId, _geometry: &SegmentGeometry) {
        self.events.push(SceneEvent::Refresh(segment));
    }

    fn highlight_subchild(&mut self, segment: SegmentId, subchild: Subchild) {
        self.events.push(SceneEvent::Highlight(segment, subchild));
    }

    fn on_waypoint_selected(&mut self, waypoint: WaypointId) {
        self.events.push(SceneEvent::Selected(waypoint));
    }
}

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Pfad mit `count` Wegpunkten in einer Linie (Abstand 10, Tangente (10,0)).
fn straight_session(count: usize) -> PathSession {
    let mut path = Path::new(PathOptions::default());
    for i in 0..count {
        path.push_waypoint(Waypoint::new(
            Vec2::new(i as f32 * 10.0, 0.0),
            Vec2::new(10.0, 0.0),
        ))
        .unwrap();
    }
    PathSession::new(path)
}

// ─── Einfügen ────────────────────────────────────────────────────────────────

#[test]
fn test_add_waypoint_via_preview_child_inserts_into_parent_chain() {
    init_logging();
    let mut session = straight_session(3);
    let mut host = RecordingHost::default();
    let parent = session.path.segment_at(0).unwrap();

    let child = use_cases::begin_drag_preview(&mut session, parent, &mut host).unwrap();
    assert_eq!(host.attached(), vec![child]);
    assert_eq!(session.selection.active_segment, Some(child));

    let new_id = use_cases::add_path_waypoint(&mut session, child, &mut host).unwrap();

    assert_eq!(session.path.len(), 4);
    assert_eq!(session.path.waypoint_index(new_id), Some(1));
    assert_eq!(session.path.segment(parent).unwrap().end(), new_id);
    // Kind folgt dem geteilten Eltern-Segment
    assert_eq!(session.path.segment(child).unwrap().end(), new_id);
    assert!(session.path.segments().all(|s| s.is_attached()));
    session.path.check_invariants().unwrap();

    assert_eq!(session.selection.active_waypoint, Some(new_id));
    assert!(session.selection.is_selected(new_id));
    assert_eq!(host.last_selected(), Some(new_id));
    assert!(host.events.contains(&SceneEvent::Refresh(child)));
}

#[test]
fn test_end_drag_preview_detaches_child() {
    init_logging();
    let mut session = straight_session(2);
    let mut host = RecordingHost::default();
    let parent = session.path.segment_at(0).unwrap();

    let child = use_cases::begin_drag_preview(&mut session, parent, &mut host).unwrap();
    use_cases::end_drag_preview(&mut session, child, &mut host).unwrap();

    assert!(session.path.segment(child).is_none());
    assert!(session.path.segment(parent).unwrap().children().is_empty());
    assert_eq!(session.selection.active_segment, None);
    assert_eq!(host.detached(), vec![child]);
}

// ─── Löschen ─────────────────────────────────────────────────────────────────

#[test]
fn test_remove_selected_is_all_or_nothing() {
    init_logging();
    let mut session = straight_session(3);
    let mut host = RecordingHost::default();
    let ids = session.path.waypoint_ids();
    session.path.sync_scene(&mut host).unwrap();

    // B ist löschbar, A ist geschützter Startpunkt
    session.selection.select_waypoint(ids[1], false);
    session.selection.select_waypoint(ids[0], true);
    let result = use_cases::remove_selected(&mut session, &mut host);

    assert!(matches!(result, Err(PathError::InvalidOperation(_))));
    assert_eq!(session.path.waypoint_ids(), ids);
    assert_eq!(session.selection.len(), 2);
    assert!(host.detached().is_empty());
    session.path.check_invariants().unwrap();
}

#[test]
fn test_remove_selected_interior_waypoints() {
    init_logging();
    let mut session = straight_session(5);
    let mut host = RecordingHost::default();
    let ids = session.path.waypoint_ids();
    session.path.sync_scene(&mut host).unwrap();

    session.selection.select_waypoint(ids[1], false);
    session.selection.select_waypoint(ids[3], true);
    let removed = use_cases::remove_selected(&mut session, &mut host).unwrap();

    assert_eq!(removed, 2);
    assert_eq!(session.path.waypoint_ids(), vec![ids[0], ids[2], ids[4]]);
    assert_eq!(session.path.segment_count(), 2);
    assert!(session.selection.is_empty());
    assert_eq!(session.selection.active_waypoint, None);
    assert_eq!(host.detached().len(), 2);
    session.path.check_invariants().unwrap();
}

#[test]
fn test_remove_selected_without_selection_is_noop() {
    let mut session = straight_session(3);
    let mut host = RecordingHost::default();
    assert_eq!(use_cases::remove_selected(&mut session, &mut host), Ok(0));
    assert!(host.events.is_empty());
}

#[test]
fn test_remove_waypoint_cleans_selection() {
    let mut session = straight_session(4);
    let mut host = RecordingHost::default();
    let ids = session.path.waypoint_ids();
    session.selection.select_waypoint(ids[2], false);

    use_cases::remove_waypoint(&mut session, ids[2], &mut host).unwrap();

    assert!(!session.selection.is_selected(ids[2]));
    assert_eq!(session.selection.active_waypoint, None);
    assert_eq!(session.path.len(), 3);
}

// ─── Umkehren ────────────────────────────────────────────────────────────────

#[test]
fn test_reverse_path_swaps_scene_segments() {
    init_logging();
    let mut session = straight_session(3);
    let mut host = RecordingHost::default();
    session.path.sync_scene(&mut host).unwrap();
    let old: Vec<SegmentId> = session.path.segments().map(|s| s.id()).collect();
    let ids = session.path.waypoint_ids();
    session.selection.select_waypoint(ids[1], false);
    host.events.clear();

    use_cases::reverse_path(&mut session, &mut host).unwrap();

    let new: Vec<SegmentId> = session.path.segments().map(|s| s.id()).collect();
    assert_eq!(host.detached(), old);
    assert_eq!(host.attached(), new);
    assert!(new.iter().all(|id| !old.contains(id)));
    // Wegpunkt-Handles überleben das Umkehren
    assert_eq!(session.selection.active_waypoint, Some(ids[1]));
    assert_eq!(session.path.first_waypoint(), Some(ids[2]));

    let first = session.path.waypoints().next().unwrap();
    assert_eq!(first.tangent, Vec2::new(-10.0, 0.0));
    assert!(first.reversed);
}

// ─── Bearbeiten & Selektion ──────────────────────────────────────────────────

#[test]
fn test_edit_waypoint_refreshes_both_segments() {
    let mut session = straight_session(3);
    let mut host = RecordingHost::default();
    session.path.sync_scene(&mut host).unwrap();
    host.events.clear();
    let middle = session.path.waypoint_ids()[1];

    use_cases::edit_waypoint(
        &mut session,
        middle,
        waypoint_path::WaypointEdit::position(Vec2::new(10.0, 5.0)),
        &mut host,
    )
    .unwrap();

    let refreshed = host
        .events
        .iter()
        .filter(|e| matches!(e, SceneEvent::Refresh(_)))
        .count();
    assert_eq!(refreshed, 2);
    let geometry = session
        .path
        .segment_geometry(session.path.segment_at(0).unwrap())
        .unwrap();
    assert_eq!(geometry.end, Vec2::new(10.0, 5.0));
}

#[test]
fn test_select_unknown_waypoint_fails_without_notification() {
    let mut session = straight_session(2);
    let mut host = RecordingHost::default();
    let result = use_cases::select_waypoint(&mut session, WaypointId(999), false, &mut host);
    assert_eq!(result, Err(PathError::UnknownWaypoint(WaypointId(999))));
    assert!(host.events.is_empty());

    let first = session.path.first_waypoint().unwrap();
    use_cases::select_waypoint(&mut session, first, false, &mut host).unwrap();
    assert_eq!(host.events, vec![SceneEvent::Selected(first)]);
}

#[test]
fn test_subchild_selector_highlights_and_rejects_out_of_range() {
    let options = PathOptions {
        default_segment_kind: SegmentKindOption::Quick,
        ..PathOptions::default()
    };
    let mut session = PathSession::from_endpoints(
        Waypoint::new(Vec2::ZERO, Vec2::X),
        Waypoint::new(Vec2::new(10.0, 0.0), Vec2::X),
        options,
    )
    .unwrap();
    let mut host = RecordingHost::default();
    let seg = session.path.segment_at(0).unwrap();

    let subchild = use_cases::enable_subchild_selector(&mut session, seg, 2, &mut host).unwrap();
    assert_eq!(subchild, Subchild::EndHandle);
    assert_eq!(session.selection.active_segment, Some(seg));
    assert_eq!(host.events, vec![SceneEvent::Highlight(seg, Subchild::EndHandle)]);

    let err = use_cases::enable_subchild_selector(&mut session, seg, 4, &mut host);
    assert_eq!(err, Err(PathError::OutOfRange { index: 4, len: 3 }));
    assert_eq!(host.events.len(), 1);
}

// ─── Konfiguration ───────────────────────────────────────────────────────────

#[test]
fn test_options_from_toml_drive_new_segments() {
    let options: PathOptions = toml::from_str(
        r#"
default_segment_kind = "quick"
protect_endpoints = false
"#,
    )
    .unwrap();
    let mut session = PathSession::from_endpoints(
        Waypoint::new(Vec2::ZERO, Vec2::X),
        Waypoint::new(Vec2::new(10.0, 0.0), Vec2::X),
        options,
    )
    .unwrap();
    assert!(session.path.segments().all(|s| s.is_quick()));

    let mut host = RecordingHost::default();
    let first = session.path.first_waypoint().unwrap();
    use_cases::remove_waypoint(&mut session, first, &mut host).unwrap();
    assert_eq!(session.path.len(), 1);
    assert_eq!(session.path.segment_count(), 0);
}
