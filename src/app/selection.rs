use crate::core::{Path, SegmentId, WaypointId};
use indexmap::IndexSet;

/// Auswahlbezogener Zustand einer Bearbeitungs-Session
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionContext {
    /// Aktiver Wegpunkt (zuletzt selektiert oder neu eingefügt)
    pub active_waypoint: Option<WaypointId>,
    /// Segment mit aktivem Drag-Ziel
    pub active_segment: Option<SegmentId>,
    /// Selektierte Wegpunkte in Selektionsreihenfolge
    selected: IndexSet<WaypointId>,
}

impl SelectionContext {
    /// Erstellt einen leeren Selektionszustand.
    pub fn new() -> Self {
        Self::default()
    }

    /// Selektiert einen Wegpunkt und macht ihn aktiv.
    ///
    /// Ohne `additive` wird die bisherige Selektion ersetzt.
    pub fn select_waypoint(&mut self, id: WaypointId, additive: bool) {
        if !additive {
            self.selected.clear();
        }
        self.selected.insert(id);
        self.active_waypoint = Some(id);
    }

    /// Hebt die Selektion eines Wegpunkts auf.
    pub fn deselect_waypoint(&mut self, id: WaypointId) {
        self.selected.shift_remove(&id);
        if self.active_waypoint == Some(id) {
            self.active_waypoint = self.selected.last().copied();
        }
    }

    /// Leert Selektion, aktiven Wegpunkt und aktives Segment.
    pub fn clear(&mut self) {
        self.selected.clear();
        self.active_waypoint = None;
        self.active_segment = None;
    }

    /// Ob der Wegpunkt selektiert ist.
    pub fn is_selected(&self, id: WaypointId) -> bool {
        self.selected.contains(&id)
    }

    /// Selektierte Wegpunkte in Selektionsreihenfolge.
    pub fn selected(&self) -> impl Iterator<Item = WaypointId> + '_ {
        self.selected.iter().copied()
    }

    /// Anzahl selektierter Wegpunkte.
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    /// `true` wenn nichts selektiert ist.
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Entfernt alle Handles, die im Pfad nicht mehr existieren.
    ///
    /// Gibt `true` zurück, wenn sich die Selektion dadurch geändert hat.
    pub fn retain_valid(&mut self, path: &Path) -> bool {
        let before = self.clone();
        self.selected.retain(|id| path.waypoint(*id).is_some());
        if self
            .active_waypoint
            .is_some_and(|id| path.waypoint(id).is_none())
        {
            self.active_waypoint = self.selected.last().copied();
        }
        if self
            .active_segment
            .is_some_and(|id| path.segment(id).is_none())
        {
            self.active_segment = None;
        }
        *self != before
    }
}
