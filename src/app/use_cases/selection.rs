//! Use-Cases: Wegpunkt-Selektion und aktive Drag-Ziele.

use crate::app::PathSession;
use crate::core::{PathError, PathResult, SceneHost, SegmentId, Subchild, WaypointId};

/// Selektiert einen Wegpunkt und benachrichtigt den Host.
pub fn select_waypoint(
    session: &mut PathSession,
    id: WaypointId,
    additive: bool,
    host: &mut dyn SceneHost,
) -> PathResult<()> {
    if session.path.waypoint(id).is_none() {
        return Err(PathError::UnknownWaypoint(id));
    }
    session.selection.select_waypoint(id, additive);
    host.on_waypoint_selected(id);
    Ok(())
}

/// Markiert ein Teil-Element eines Segments als aktives Drag-Ziel.
pub fn enable_subchild_selector(
    session: &mut PathSession,
    segment: SegmentId,
    index: usize,
    host: &mut dyn SceneHost,
) -> PathResult<Subchild> {
    let subchild = session.path.enable_subchild_selector(segment, index)?;
    session.selection.active_segment = Some(segment);
    host.highlight_subchild(segment, subchild);
    Ok(subchild)
}
