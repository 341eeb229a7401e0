//! Repräsentiert einen Wegpunkt mit Position und Tangente.

use super::SegmentId;
use glam::Vec2;
use std::fmt;

/// Handle eines Wegpunkts, vom besitzenden `Path` vergeben.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WaypointId(pub u64);

impl fmt::Display for WaypointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "W{}", self.0)
    }
}

/// Ein Anker des Pfads
#[derive(Debug, Clone, PartialEq)]
pub struct Waypoint {
    /// Handle im besitzenden Pfad (vor der Übernahme: `WaypointId(0)`)
    pub(crate) id: WaypointId,
    /// Position (Welteinheiten)
    pub position: Vec2,
    /// Fahrtrichtung samt Betrag
    pub tangent: Vec2,
    /// Tangente vom Benutzer fixiert (wird nicht automatisch berechnet)
    pub locked: bool,
    /// Rückwärtsfahrt an diesem Punkt
    pub reversed: bool,
    /// Segment, das an diesem Wegpunkt endet
    pub(crate) incoming: Option<SegmentId>,
    /// Segment, das an diesem Wegpunkt beginnt
    pub(crate) outgoing: Option<SegmentId>,
}

impl Waypoint {
    /// Erstellt einen freien Wegpunkt (noch keinem Pfad zugeordnet).
    pub fn new(position: Vec2, tangent: Vec2) -> Self {
        Self {
            id: WaypointId(0),
            position,
            tangent,
            locked: false,
            reversed: false,
            incoming: None,
            outgoing: None,
        }
    }

    /// Builder: Tangente fixieren.
    pub fn with_locked(mut self, locked: bool) -> Self {
        self.locked = locked;
        self
    }

    /// Gibt das Handle des Wegpunkts zurück.
    pub fn id(&self) -> WaypointId {
        self.id
    }

    /// Segment, das an diesem Wegpunkt endet.
    pub fn incoming(&self) -> Option<SegmentId> {
        self.incoming
    }

    /// Segment, das an diesem Wegpunkt beginnt.
    pub fn outgoing(&self) -> Option<SegmentId> {
        self.outgoing
    }

    /// Alle anliegenden Segmente (0, 1 oder 2).
    pub fn incident_segments(&self) -> impl Iterator<Item = SegmentId> {
        self.incoming.into_iter().chain(self.outgoing)
    }

    /// Übernimmt alle gesetzten Felder eines Edits; `true` wenn sich die Geometrie geändert hat.
    pub(crate) fn apply(&mut self, edit: &WaypointEdit) -> bool {
        let mut geometry_changed = false;
        if let Some(position) = edit.position {
            geometry_changed |= self.position != position;
            self.position = position;
        }
        if let Some(tangent) = edit.tangent {
            geometry_changed |= self.tangent != tangent;
            self.tangent = tangent;
        }
        if let Some(locked) = edit.locked {
            self.locked = locked;
        }
        if let Some(reversed) = edit.reversed {
            self.reversed = reversed;
        }
        geometry_changed
    }
}

/// Änderungen an einem Wegpunkt; `None` lässt das Feld unverändert.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WaypointEdit {
    /// Neue Position
    pub position: Option<Vec2>,
    /// Neue Tangente
    pub tangent: Option<Vec2>,
    /// Tangente fixieren/freigeben
    pub locked: Option<bool>,
    /// Rückwärts-Flag setzen
    pub reversed: Option<bool>,
}

impl WaypointEdit {
    /// Edit, der nur die Position setzt.
    pub fn position(position: Vec2) -> Self {
        Self {
            position: Some(position),
            ..Self::default()
        }
    }

    /// Edit, der nur die Tangente setzt.
    pub fn tangent(tangent: Vec2) -> Self {
        Self {
            tangent: Some(tangent),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_reports_geometry_change_only_for_position_and_tangent() {
        let mut wp = Waypoint::new(Vec2::ZERO, Vec2::X);
        let flags_only = WaypointEdit {
            locked: Some(true),
            reversed: Some(true),
            ..WaypointEdit::default()
        };
        assert!(!wp.apply(&flags_only));
        assert!(wp.locked);
        assert!(wp.reversed);

        assert!(wp.apply(&WaypointEdit::position(Vec2::new(1.0, 2.0))));
        assert_eq!(wp.position, Vec2::new(1.0, 2.0));
        // Gleicher Wert → keine Änderung
        assert!(!wp.apply(&WaypointEdit::position(Vec2::new(1.0, 2.0))));
    }

    #[test]
    fn test_fresh_waypoint_has_no_segments() {
        let wp = Waypoint::new(Vec2::ONE, Vec2::Y);
        assert_eq!(wp.incident_segments().count(), 0);
        assert!(!wp.locked);
        assert!(!wp.reversed);
    }
}
