//! Use-Cases: Wegpunkte einfügen, bearbeiten, entfernen und den Pfad umkehren.

use crate::app::PathSession;
use crate::core::{PathResult, SceneHost, SegmentId, Waypoint, WaypointEdit, WaypointId};

/// Fügt nach dem Start eines Segments einen neuen Wegpunkt ein und macht ihn aktiv.
///
/// Bei einem Vorschau-Kind wird in die Kette des Eltern-Segments eingefügt,
/// nicht in die transiente Darstellung des Kinds.
pub fn add_path_waypoint(
    session: &mut PathSession,
    segment: SegmentId,
    host: &mut dyn SceneHost,
) -> PathResult<WaypointId> {
    let target = session.path.insertion_target(segment)?;
    let new_id = session.path.insert_waypoint_after(target)?;
    session.path.sync_scene(host)?;

    session.selection.select_waypoint(new_id, false);
    host.on_waypoint_selected(new_id);
    log::debug!(
        "Wegpunkt {} über Segment {} eingefügt (Ziel {})",
        new_id,
        segment,
        target
    );
    Ok(new_id)
}

/// Ändert einen Wegpunkt und frischt die betroffene Geometrie in der Szene auf.
pub fn edit_waypoint(
    session: &mut PathSession,
    id: WaypointId,
    edit: WaypointEdit,
    host: &mut dyn SceneHost,
) -> PathResult<()> {
    session.path.edit_waypoint(id, edit)?;
    session.path.sync_scene(host)
}

/// Entfernt einen Wegpunkt, bereinigt die Selektion und die Szene.
pub fn remove_waypoint(
    session: &mut PathSession,
    id: WaypointId,
    host: &mut dyn SceneHost,
) -> PathResult<Waypoint> {
    let removed = session.path.remove_waypoint(id)?;
    session.selection.retain_valid(&session.path);
    session.path.sync_scene(host)?;
    Ok(removed)
}

/// Entfernt alle selektierten Wegpunkte, ganz oder gar nicht.
///
/// Die Löschungen laufen auf einer Kopie des Pfads; erst wenn alle
/// gelungen sind, wird die Kopie übernommen. Gibt die Anzahl zurück.
pub fn remove_selected(session: &mut PathSession, host: &mut dyn SceneHost) -> PathResult<usize> {
    if session.selection.is_empty() {
        log::debug!("Nichts zum Löschen selektiert");
        return Ok(0);
    }

    let ids: Vec<WaypointId> = session.selection.selected().collect();
    let mut path = session.path.clone();
    for id in &ids {
        path.remove_waypoint(*id)?;
    }

    session.path = path;
    session.selection.retain_valid(&session.path);
    session.path.sync_scene(host)?;
    log::debug!("{} Wegpunkte entfernt", ids.len());
    Ok(ids.len())
}

/// Kehrt den Pfad um und hängt die neu aufgebauten Segmente in die Szene.
pub fn reverse_path(session: &mut PathSession, host: &mut dyn SceneHost) -> PathResult<()> {
    session.path.reverse()?;
    session.selection.retain_valid(&session.path);
    session.path.sync_scene(host)
}

/// Startet eine Drag-Vorschau: Quick-Kind erzeugen und in die Szene hängen.
pub fn begin_drag_preview(
    session: &mut PathSession,
    segment: SegmentId,
    host: &mut dyn SceneHost,
) -> PathResult<SegmentId> {
    let child = session.path.spawn_quick_child(segment)?;
    session.path.add_to_group(child, host)?;
    session.selection.active_segment = Some(child);
    Ok(child)
}

/// Beendet eine Drag-Vorschau und entfernt das Quick-Kind aus der Szene.
pub fn end_drag_preview(
    session: &mut PathSession,
    child: SegmentId,
    host: &mut dyn SceneHost,
) -> PathResult<()> {
    session.path.release_child(child)?;
    if session.selection.active_segment == Some(child) {
        session.selection.active_segment = None;
    }
    session.path.sync_scene(host)
}
