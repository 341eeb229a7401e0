//! Ausgehende Schnittstelle zur Darstellungsschicht.
//!
//! Die Engine ruft diese Hooks synchron auf; alle Methoden haben leere
//! Default-Implementierungen, sodass headless Hosts nichts implementieren müssen.

use super::{SegmentId, Subchild, WaypointId};
use crate::shared::SegmentGeometry;

/// Szene-Graph und Selektions-Benachrichtigung des Hosts.
pub trait SceneHost {
    /// Segment in die Szene einhängen (`addToGroup`).
    fn attach_segment(
        &mut self,
        _segment: SegmentId,
        _geometry: &SegmentGeometry,
        _scale_factor: f32,
    ) {
    }

    /// Segment aus der Szene entfernen (`removeFromGroup`).
    fn detach_segment(&mut self, _segment: SegmentId) {}

    /// Geometrie eines eingehängten Segments hat sich geändert.
    fn refresh_segment(&mut self, _segment: SegmentId, _geometry: &SegmentGeometry) {}

    /// Teil-Element eines Segments ist jetzt das aktive Drag-Ziel.
    fn highlight_subchild(&mut self, _segment: SegmentId, _subchild: Subchild) {}

    /// Ein Wegpunkt wurde zum aktiven Wegpunkt.
    fn on_waypoint_selected(&mut self, _waypoint: WaypointId) {}
}

/// Host ohne Darstellung (Tests, Batch-Verarbeitung).
#[derive(Debug, Clone, Copy, Default)]
pub struct HeadlessScene;

impl SceneHost for HeadlessScene {}
