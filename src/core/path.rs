//! Der Pfad: geordnete Wegpunkte und die verbindenden Segmente.
//!
//! Invariante nach jeder Operation: `segments.len() == max(0, waypoints.len() - 1)`,
//! Segment `i` läuft von Wegpunkt `i` nach Wegpunkt `i + 1`.
//! Änderungen an Wegpunkten werden synchron an alle anliegenden Segmente
//! weitergegeben; es gibt keine verzögerte Neuberechnung.

use super::{
    PathError, PathResult, SceneHost, Segment, SegmentId, SegmentKind, Subchild, Waypoint,
    WaypointEdit, WaypointId,
};
use crate::shared::spline_geometry::{cardinal_tangent, polyline_length, sample_cubic};
use crate::shared::{
    hermite_to_bezier, InsertPlacement, PathOptions, SegmentGeometry, SegmentKindOption,
};
use glam::Vec2;
use indexmap::IndexMap;
use std::collections::HashMap;

/// Grobzustand des Pfads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathState {
    /// Keine Wegpunkte
    Empty,
    /// Genau ein Wegpunkt, keine Segmente
    SingleWaypoint,
    /// Mindestens ein Segment
    MultiSegment,
}

/// Geordnete Kette aus Wegpunkten und Segmenten.
#[derive(Debug, Clone)]
pub struct Path {
    /// Wegpunkte in Fahrreihenfolge
    waypoints: IndexMap<WaypointId, Waypoint>,
    /// Logische Segmente in Fahrreihenfolge
    segments: IndexMap<SegmentId, Segment>,
    /// Quick-Vorschau-Kinder (nicht Teil der Kette)
    children: HashMap<SegmentId, Segment>,
    /// Entfernte, noch eingehängte Segmente für den nächsten `sync_scene`
    pending_detach: Vec<SegmentId>,
    next_waypoint_id: u64,
    next_segment_id: u64,
    options: PathOptions,
}

impl Default for Path {
    fn default() -> Self {
        Self::new(PathOptions::default())
    }
}

impl Path {
    /// Erstellt einen leeren Pfad.
    pub fn new(options: PathOptions) -> Self {
        Self {
            waypoints: IndexMap::new(),
            segments: IndexMap::new(),
            children: HashMap::new(),
            pending_detach: Vec::new(),
            next_waypoint_id: 1,
            next_segment_id: 1,
            options,
        }
    }

    /// Erstellt einen Pfad mit einem einzelnen Startpunkt.
    pub fn with_start(start: Waypoint, options: PathOptions) -> Self {
        let mut path = Self::new(options);
        let start = path.adopt(start);
        log::debug!("Startpunkt {} gesetzt", start.id);
        path.waypoints.insert(start.id, start);
        path
    }

    /// Erstellt einen Pfad aus Start- und Endpunkt, verbunden durch ein Segment.
    pub fn create(start: Waypoint, end: Waypoint, options: PathOptions) -> PathResult<Self> {
        let mut path = Self::with_start(start, options);
        path.push_waypoint(end)?;
        Ok(path)
    }

    // ── Abfragen ─────────────────────────────────────────────────────

    /// Aktive Optionen.
    pub fn options(&self) -> &PathOptions {
        &self.options
    }

    /// Ersetzt die Optionen; bestehende Geometrie bleibt unverändert.
    pub fn set_options(&mut self, options: PathOptions) {
        self.options = options;
    }

    /// Anzahl der Wegpunkte.
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    /// `true` wenn der Pfad keine Wegpunkte hat.
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Anzahl der logischen Segmente.
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Grobzustand (leer, Einzelpunkt, mehrere Segmente).
    pub fn state(&self) -> PathState {
        match self.waypoints.len() {
            0 => PathState::Empty,
            1 => PathState::SingleWaypoint,
            _ => PathState::MultiSegment,
        }
    }

    /// Wegpunkt zum Handle.
    pub fn waypoint(&self, id: WaypointId) -> Option<&Waypoint> {
        self.waypoints.get(&id)
    }

    /// Iterator über alle Wegpunkte in Fahrreihenfolge.
    pub fn waypoints(&self) -> impl Iterator<Item = &Waypoint> {
        self.waypoints.values()
    }

    /// Handles aller Wegpunkte in Fahrreihenfolge.
    pub fn waypoint_ids(&self) -> Vec<WaypointId> {
        self.waypoints.keys().copied().collect()
    }

    /// Position eines Wegpunkts in der Fahrreihenfolge.
    pub fn waypoint_index(&self, id: WaypointId) -> Option<usize> {
        self.waypoints.get_index_of(&id)
    }

    /// Erster Wegpunkt.
    pub fn first_waypoint(&self) -> Option<WaypointId> {
        self.waypoints.keys().next().copied()
    }

    /// Letzter Wegpunkt.
    pub fn last_waypoint(&self) -> Option<WaypointId> {
        self.waypoints.keys().next_back().copied()
    }

    /// Segment zum Handle (logisch oder Vorschau-Kind).
    pub fn segment(&self, id: SegmentId) -> Option<&Segment> {
        self.segments.get(&id).or_else(|| self.children.get(&id))
    }

    /// Iterator über alle logischen Segmente in Fahrreihenfolge.
    pub fn segments(&self) -> impl Iterator<Item = &Segment> {
        self.segments.values()
    }

    /// Handle des Segments an Position `index`.
    pub fn segment_at(&self, index: usize) -> PathResult<SegmentId> {
        self.segments
            .get_index(index)
            .map(|(id, _)| *id)
            .ok_or(PathError::OutOfRange {
                index,
                len: self.segments.len(),
            })
    }

    /// Position eines logischen Segments in der Kette.
    pub fn segment_index(&self, id: SegmentId) -> Option<usize> {
        self.segments.get_index_of(&id)
    }

    /// Anliegende logische Segmente eines Wegpunkts (0, 1 oder 2).
    pub fn incident_segments(&self, id: WaypointId) -> PathResult<Vec<SegmentId>> {
        Ok(self.waypoint_ref(id)?.incident_segments().collect())
    }

    /// Steuerpunkte eines Segments.
    ///
    /// Full-Segmente liefern die gespeicherten Punkte, Quick-Segmente
    /// werden bei jedem Aufruf aus den aktuellen Endpunkten berechnet.
    pub fn control_points(&self, id: SegmentId) -> PathResult<(Vec2, Vec2)> {
        let seg = self.segment_ref(id)?;
        match seg.kind {
            SegmentKind::Full { control1, control2 } => Ok((control1, control2)),
            SegmentKind::Quick => self.solve(seg.start, seg.end),
        }
    }

    /// Vollständige Render-Geometrie eines Segments.
    pub fn segment_geometry(&self, id: SegmentId) -> PathResult<SegmentGeometry> {
        let seg = self.segment_ref(id)?;
        let (control1, control2) = self.control_points(id)?;
        Ok(SegmentGeometry {
            start: self.waypoint_ref(seg.start)?.position,
            control1,
            control2,
            end: self.waypoint_ref(seg.end)?.position,
        })
    }

    /// Polyline eines Segments mit `samples + 1` Punkten.
    pub fn sample_segment(&self, id: SegmentId, samples: usize) -> PathResult<Vec<Vec2>> {
        Ok(sample_cubic(&self.segment_geometry(id)?, samples))
    }

    /// Polyline des gesamten Pfads (Verbindungspunkte nicht doppelt).
    pub fn sample_path(&self, samples_per_segment: usize) -> PathResult<Vec<Vec2>> {
        let mut result: Vec<Vec2> = Vec::new();
        for id in self.segments.keys() {
            let points = self.sample_segment(*id, samples_per_segment)?;
            let skip = usize::from(!result.is_empty());
            result.extend(points.into_iter().skip(skip));
        }
        if result.is_empty() {
            result.extend(self.waypoints.values().map(|wp| wp.position));
        }
        Ok(result)
    }

    /// Approximierte Pfadlänge über die abgetasteten Segmente.
    pub fn approx_length(&self, samples_per_segment: usize) -> PathResult<f32> {
        Ok(polyline_length(&self.sample_path(samples_per_segment)?))
    }

    // ── Aufbau ───────────────────────────────────────────────────────

    /// Hängt einen Wegpunkt am Pfadende an und verbindet ihn mit dem bisherigen Ende.
    pub fn push_waypoint(&mut self, waypoint: Waypoint) -> PathResult<WaypointId> {
        let previous = self.last_waypoint();
        if let Some(previous) = previous {
            self.validate_incident(&[previous])?;
        }
        let waypoint = self.adopt(waypoint);
        let id = waypoint.id;
        self.waypoints.insert(id, waypoint);

        if let Some(previous) = previous {
            let kind = SegmentKind::from_option(self.options.default_segment_kind);
            let seg_id = self.allocate_segment_id();
            self.segments
                .insert(seg_id, Segment::new(seg_id, previous, id, kind, None));
            if let Some(wp) = self.waypoints.get_mut(&previous) {
                wp.outgoing = Some(seg_id);
            }
            if let Some(wp) = self.waypoints.get_mut(&id) {
                wp.incoming = Some(seg_id);
            }
            log::debug!("Wegpunkt {} angehängt, Segment {}", id, seg_id);
            self.refresh_around(&[previous, id])?;
        } else {
            log::debug!("Startpunkt {} gesetzt", id);
        }
        Ok(id)
    }

    // ── Segment-Operationen ──────────────────────────────────────────

    /// Berechnet die Steuerpunkte eines Segments aus den aktuellen Endpunkten neu.
    pub fn update_segment(&mut self, id: SegmentId) -> PathResult<()> {
        let (start, end) = {
            let seg = self.segment_ref(id)?;
            (seg.start, seg.end)
        };
        let (c1, c2) = self.solve(start, end)?;
        let seg = self.segment_mut(id)?;
        match &mut seg.kind {
            SegmentKind::Full { control1, control2 } => {
                *control1 = c1;
                *control2 = c2;
            }
            // Quick: nichts zu speichern, Lesen berechnet neu
            SegmentKind::Quick => {}
        }
        log::trace!("Segment {} aktualisiert", id);
        Ok(())
    }

    /// Setzt das Ende eines Vorschau-Kinds neu und aktualisiert es.
    ///
    /// Enden logischer Segmente ändern sich nur über Einfügen und Entfernen
    /// von Wegpunkten, sonst wäre die Kette nicht mehr geschlossen.
    pub fn set_segment_end(&mut self, id: SegmentId, end: WaypointId) -> PathResult<()> {
        if self.segments.contains_key(&id) {
            return Err(PathError::invalid(format!(
                "Ende des Pfad-Segments {} ändert sich nur über Einfügen/Entfernen",
                id
            )));
        }
        let start = self
            .children
            .get(&id)
            .ok_or(PathError::UnknownSegment(id))?
            .start;
        if start == end {
            return Err(PathError::invalid(format!(
                "Segment {} kann nicht an seinem Start {} enden",
                id, end
            )));
        }
        self.solve(start, end)?;
        if let Some(child) = self.children.get_mut(&id) {
            child.end = end;
        }
        self.update_segment(id)
    }

    /// Setzt die Steuerpunkte eines Full-Segments manuell (Griff gezogen).
    pub fn set_control_points(
        &mut self,
        id: SegmentId,
        control1: Vec2,
        control2: Vec2,
    ) -> PathResult<()> {
        let seg = self.segment_mut(id)?;
        match &mut seg.kind {
            SegmentKind::Full {
                control1: c1,
                control2: c2,
            } => {
                *c1 = control1;
                *c2 = control2;
                Ok(())
            }
            SegmentKind::Quick => Err(PathError::invalid(format!(
                "Quick-Segment {} hat keine verschiebbaren Steuerpunkte",
                id
            ))),
        }
    }

    /// Wechselt die Variante eines logischen Segments.
    pub fn set_segment_kind(&mut self, id: SegmentId, kind: SegmentKindOption) -> PathResult<()> {
        if self.children.contains_key(&id) {
            return Err(PathError::invalid(format!(
                "Vorschau-Kind {} ist immer ein Quick-Segment",
                id
            )));
        }
        let seg = self
            .segments
            .get(&id)
            .ok_or(PathError::UnknownSegment(id))?;
        if seg.kind.option() == kind {
            return Ok(());
        }
        let (control1, control2) = self.solve(seg.start, seg.end)?;
        let seg = self.segment_mut(id)?;
        seg.kind = match kind {
            SegmentKindOption::Full => SegmentKind::Full { control1, control2 },
            SegmentKindOption::Quick => SegmentKind::Quick,
        };
        log::debug!("Segment {} ist jetzt {:?}", id, kind);
        Ok(())
    }

    /// Markiert ein Teil-Element als aktives Drag-Ziel.
    pub fn enable_subchild_selector(&mut self, id: SegmentId, index: usize) -> PathResult<Subchild> {
        let seg = self.segment_mut(id)?;
        let subchild = seg.kind.subchild(index).ok_or(PathError::OutOfRange {
            index,
            len: seg.kind.subchild_count(),
        })?;
        seg.active_subchild = Some(subchild);
        Ok(subchild)
    }

    /// Hängt ein Segment in die Szene ein (`addToGroup`).
    ///
    /// Ein bereits eingehängtes Segment wird nur aufgefrischt. Hebt ein
    /// vorheriges `remove_from_group` auf.
    pub fn add_to_group(&mut self, id: SegmentId, host: &mut dyn SceneHost) -> PathResult<()> {
        let geometry = self.segment_geometry(id)?;
        let scale_factor = self.options.scale_factor;
        let seg = self.segment_mut(id)?;
        seg.hidden = false;
        if seg.attached {
            host.refresh_segment(id, &geometry);
        } else {
            seg.attached = true;
            host.attach_segment(id, &geometry, scale_factor);
        }
        Ok(())
    }

    /// Entfernt ein Segment aus der Szene (`removeFromGroup`); nicht eingehängt → no-op.
    ///
    /// Das Segment bleibt ausgeblendet, bis der Host es mit `add_to_group`
    /// wieder einhängt; `sync_scene` hängt es nicht automatisch ein.
    pub fn remove_from_group(&mut self, id: SegmentId, host: &mut dyn SceneHost) -> PathResult<()> {
        let seg = self.segment_mut(id)?;
        seg.hidden = true;
        if seg.attached {
            seg.attached = false;
            host.detach_segment(id);
        }
        Ok(())
    }

    /// Bringt die Szene auf den Stand des Pfads.
    ///
    /// Entfernte Segmente werden ausgehängt, neue logische Segmente eingehängt
    /// und eingehängte Segmente mit aktueller Geometrie aufgefrischt.
    /// Vom Host ausgeblendete Segmente bleiben draußen.
    pub fn sync_scene(&mut self, host: &mut dyn SceneHost) -> PathResult<()> {
        for id in std::mem::take(&mut self.pending_detach) {
            host.detach_segment(id);
        }
        let logical: Vec<SegmentId> = self.segments.keys().copied().collect();
        for id in logical {
            let seg = &self.segments[&id];
            if seg.attached {
                host.refresh_segment(id, &self.segment_geometry(id)?);
            } else if !seg.hidden {
                self.add_to_group(id, host)?;
            }
        }
        let mut attached_children: Vec<SegmentId> = self
            .children
            .values()
            .filter(|c| c.attached)
            .map(|c| c.id)
            .collect();
        attached_children.sort_unstable();
        for id in attached_children {
            host.refresh_segment(id, &self.segment_geometry(id)?);
        }
        Ok(())
    }

    // ── Vorschau-Kinder ──────────────────────────────────────────────

    /// Erzeugt ein Quick-Vorschau-Kind über denselben Endpunkten wie `parent`.
    pub fn spawn_quick_child(&mut self, parent: SegmentId) -> PathResult<SegmentId> {
        let (start, end) = {
            let seg = self
                .segments
                .get(&parent)
                .ok_or(PathError::UnknownSegment(parent))?;
            (seg.start, seg.end)
        };
        let id = self.allocate_segment_id();
        self.children.insert(
            id,
            Segment::new(id, start, end, SegmentKind::Quick, Some(parent)),
        );
        if let Some(seg) = self.segments.get_mut(&parent) {
            seg.children.push(id);
        }
        log::debug!("Vorschau-Kind {} für Segment {} erzeugt", id, parent);
        Ok(id)
    }

    /// Entfernt ein Vorschau-Kind.
    pub fn release_child(&mut self, child: SegmentId) -> PathResult<()> {
        let removed = self
            .children
            .remove(&child)
            .ok_or(PathError::UnknownSegment(child))?;
        if let Some(parent) = removed.parent.and_then(|p| self.segments.get_mut(&p)) {
            parent.children.retain(|c| *c != child);
        }
        if removed.attached {
            self.pending_detach.push(child);
        }
        Ok(())
    }

    /// Segment, in dessen Kette ein neuer Wegpunkt eingefügt wird:
    /// das Eltern-Segment bei Vorschau-Kindern, sonst das Segment selbst.
    pub fn insertion_target(&self, id: SegmentId) -> PathResult<SegmentId> {
        let seg = self.segment_ref(id)?;
        Ok(seg.parent.unwrap_or(id))
    }

    // ── Wegpunkt-Operationen ─────────────────────────────────────────

    /// Aktualisiert alle an einem Wegpunkt anliegenden Segmente.
    pub fn notify_waypoint_changed(&mut self, id: WaypointId) -> PathResult<()> {
        self.validate_incident(&[id])?;
        let incident: Vec<SegmentId> = self.waypoint_ref(id)?.incident_segments().collect();
        for seg_id in incident {
            self.update_with_children(seg_id)?;
        }
        Ok(())
    }

    /// Ändert einen Wegpunkt und gibt die Änderung synchron an die Segmente weiter.
    ///
    /// Bei aktiven Auto-Tangenten fixiert eine explizit gesetzte Tangente den
    /// Wegpunkt, sofern der Edit `locked` nicht selbst setzt.
    pub fn edit_waypoint(&mut self, id: WaypointId, edit: WaypointEdit) -> PathResult<()> {
        let auto_tangents = self.options.auto_tangents;
        self.waypoint_ref(id)?;
        let mut around = vec![id];
        if auto_tangents {
            around.extend(self.neighbors(id));
        }
        // Erst prüfen, dann ändern: danach kann kein Update mehr scheitern
        self.validate_incident(&around)?;

        let mut edit = edit;
        if auto_tangents && edit.tangent.is_some() && edit.locked.is_none() {
            edit.locked = Some(true);
        }
        let geometry_changed = self
            .waypoints
            .get_mut(&id)
            .ok_or(PathError::UnknownWaypoint(id))?
            .apply(&edit);

        if auto_tangents {
            self.refresh_around(&around)
        } else if geometry_changed {
            self.notify_waypoint_changed(id)
        } else {
            Ok(())
        }
    }

    /// Teilt `segment` mit einem neuen Wegpunkt an der Standard-Position.
    pub fn insert_waypoint_after(&mut self, segment: SegmentId) -> PathResult<WaypointId> {
        let (position, tangent) = self.default_insert_placement(segment)?;
        self.insert_waypoint_at(segment, position, tangent)
    }

    /// Teilt das Segment an Position `index` (siehe `insert_waypoint_after`).
    pub fn insert_after(&mut self, index: usize) -> PathResult<WaypointId> {
        let segment = self.segment_at(index)?;
        self.insert_waypoint_after(segment)
    }

    /// Teilt `segment` in `start → neu` und `neu → end` mit vorgegebener Position/Tangente.
    ///
    /// Das bestehende Segment behält Handle und Start, das neue Segment erbt die Variante.
    pub fn insert_waypoint_at(
        &mut self,
        segment: SegmentId,
        position: Vec2,
        tangent: Vec2,
    ) -> PathResult<WaypointId> {
        if self.children.contains_key(&segment) {
            return Err(PathError::invalid(format!(
                "Vorschau-Kind {} ist nicht Teil der Kette",
                segment
            )));
        }
        let (seg_index, start, old_end, kind) = {
            let index = self
                .segments
                .get_index_of(&segment)
                .ok_or(PathError::UnknownSegment(segment))?;
            let seg = &self.segments[index];
            (index, seg.start, seg.end, seg.kind.option())
        };
        let end_index = self
            .waypoints
            .get_index_of(&old_end)
            .ok_or(PathError::UnknownWaypoint(old_end))?;
        self.validate_incident(&[start, old_end])?;
        let hidden = self.segments[seg_index].hidden;

        let waypoint = self.adopt(Waypoint::new(position, tangent));
        let new_id = waypoint.id;
        self.waypoints.shift_insert(end_index, new_id, waypoint);

        let kind = SegmentKind::from_option(kind);
        let second = self.allocate_segment_id();
        let mut second_segment = Segment::new(second, new_id, old_end, kind, None);
        second_segment.hidden = hidden;
        self.segments
            .shift_insert(seg_index + 1, second, second_segment);
        if let Some(wp) = self.waypoints.get_mut(&new_id) {
            wp.outgoing = Some(second);
        }
        self.retarget_end(segment, new_id)?;
        if let Some(wp) = self.waypoints.get_mut(&old_end) {
            wp.incoming = Some(second);
        }

        log::debug!(
            "Wegpunkt {} in Segment {} eingefügt ({} → {} → {})",
            new_id,
            segment,
            start,
            new_id,
            old_end
        );
        self.refresh_around(&[start, new_id, old_end])?;
        Ok(new_id)
    }

    /// Entfernt einen Wegpunkt und verbindet seine Nachbarn.
    ///
    /// Gibt den abgelösten Wegpunkt (ohne Segment-Referenzen) zurück.
    pub fn remove_waypoint(&mut self, id: WaypointId) -> PathResult<Waypoint> {
        let index = self
            .waypoints
            .get_index_of(&id)
            .ok_or(PathError::UnknownWaypoint(id))?;
        let last_index = self.waypoints.len() - 1;
        if last_index == 0 {
            return Err(PathError::invalid(format!(
                "Wegpunkt {} ist der einzige Wegpunkt des Pfads",
                id
            )));
        }
        if self.options.protect_endpoints && (index == 0 || index == last_index) {
            return Err(PathError::invalid(format!(
                "Wegpunkt {} ist ein Pflicht-Anker (Start/Ende)",
                id
            )));
        }

        let (incoming, outgoing) = {
            let wp = &self.waypoints[index];
            (wp.incoming, wp.outgoing)
        };
        let prev = index
            .checked_sub(1)
            .and_then(|i| self.waypoints.get_index(i))
            .map(|(k, _)| *k);
        let next = self.waypoints.get_index(index + 1).map(|(k, _)| *k);
        if let Some(dangling) = incoming
            .into_iter()
            .chain(outgoing)
            .find(|s| !self.segments.contains_key(s))
        {
            return Err(PathError::invalid(format!(
                "Wegpunkt {} verweist auf entferntes Segment {}",
                id, dangling
            )));
        }
        let around: Vec<WaypointId> = prev.into_iter().chain(next).collect();
        let mut touched = around.clone();
        touched.push(id);
        self.validate_incident(&touched)?;

        // Vorschau-Kinder fremder Segmente, die per `set_segment_end` auf den
        // Wegpunkt zeigen, fallen auf das Ende ihres Eltern-Segments zurück
        let mut stranded: Vec<(SegmentId, SegmentId)> = Vec::new();
        for child in self.children.values().filter(|c| c.end == id) {
            let parent = child.parent.ok_or_else(|| {
                PathError::invalid(format!("Vorschau-Kind {} ohne Eltern-Segment", child.id))
            })?;
            if Some(parent) != incoming && Some(parent) != outgoing {
                self.segments
                    .get(&parent)
                    .ok_or(PathError::UnknownSegment(parent))?;
                stranded.push((child.id, parent));
            }
        }

        match (incoming, outgoing, next) {
            (Some(incoming), Some(outgoing), Some(next)) => {
                self.destroy_segment(outgoing);
                self.retarget_end(incoming, next)?;
            }
            (None, Some(outgoing), Some(next)) => {
                self.destroy_segment(outgoing);
                if let Some(wp) = self.waypoints.get_mut(&next) {
                    wp.incoming = None;
                }
            }
            (Some(incoming), None, _) => {
                self.destroy_segment(incoming);
                if let Some(wp) = prev.and_then(|p| self.waypoints.get_mut(&p)) {
                    wp.outgoing = None;
                }
            }
            _ => {
                return Err(PathError::invalid(format!(
                    "Wegpunkt {} hat inkonsistente Segment-Referenzen",
                    id
                )));
            }
        }

        let mut removed = self
            .waypoints
            .shift_remove(&id)
            .ok_or(PathError::UnknownWaypoint(id))?;
        removed.incoming = None;
        removed.outgoing = None;

        for (child, parent) in stranded {
            let parent_end = self.segment_ref(parent)?.end;
            if let Some(c) = self.children.get_mut(&child) {
                c.end = parent_end;
            }
            log::debug!(
                "Vorschau-Kind {} endet wieder am Ende von Segment {} ({})",
                child,
                parent,
                parent_end
            );
            self.update_segment(child)?;
        }
        log::debug!("Wegpunkt {} entfernt", id);

        self.refresh_around(&around)?;
        Ok(removed)
    }

    /// Kehrt die Fahrtrichtung des Pfads um.
    ///
    /// Wegpunkt-Reihenfolge wird umgedreht, jede Tangente negiert und das
    /// `reversed`-Flag umgeschaltet; die Segmente werden neu aufgebaut und
    /// behalten (gespiegelt) ihre Variante und ihre Vorschau-Kinder.
    /// Einzelpunkt- und leere Pfade bleiben unverändert.
    pub fn reverse(&mut self) -> PathResult<()> {
        if self.waypoints.len() < 2 {
            return Ok(());
        }
        self.check_invariants().map_err(|e| {
            PathError::invalid(format!("Pfad inkonsistent, Umkehren abgebrochen: {}", e))
        })?;

        // Neuer Zustand wird vollständig aufgebaut und erst am Ende übernommen
        let mut waypoints: IndexMap<WaypointId, Waypoint> =
            IndexMap::with_capacity(self.waypoints.len());
        for wp in self.waypoints.values().rev() {
            let mut wp = wp.clone();
            wp.tangent = -wp.tangent;
            wp.reversed = !wp.reversed;
            wp.incoming = None;
            wp.outgoing = None;
            waypoints.insert(wp.id, wp);
        }

        let old_segments: Vec<&Segment> = self.segments.values().collect();
        let ids: Vec<WaypointId> = waypoints.keys().copied().collect();
        let mut segments = IndexMap::with_capacity(old_segments.len());
        let mut children = HashMap::new();
        let mut next_segment_id = self.next_segment_id;

        for (i, pair) in ids.windows(2).enumerate() {
            let mirrored = old_segments[old_segments.len() - 1 - i];
            let (start, end) = (pair[0], pair[1]);
            let seg_id = SegmentId(next_segment_id);
            next_segment_id += 1;

            let kind = match mirrored.kind {
                SegmentKind::Full { .. } => {
                    let (control1, control2) = hermite_to_bezier(
                        waypoints[&start].position,
                        waypoints[&start].tangent,
                        waypoints[&end].position,
                        waypoints[&end].tangent,
                    );
                    SegmentKind::Full { control1, control2 }
                }
                SegmentKind::Quick => SegmentKind::Quick,
            };
            let mut segment = Segment::new(seg_id, start, end, kind, None);
            segment.hidden = mirrored.hidden;
            for _ in &mirrored.children {
                let child_id = SegmentId(next_segment_id);
                next_segment_id += 1;
                children.insert(
                    child_id,
                    Segment::new(child_id, start, end, SegmentKind::Quick, Some(seg_id)),
                );
                segment.children.push(child_id);
            }
            waypoints[&start].outgoing = Some(seg_id);
            waypoints[&end].incoming = Some(seg_id);
            segments.insert(seg_id, segment);
        }

        let mut detached: Vec<SegmentId> = self
            .segments
            .values()
            .chain(self.children.values())
            .filter(|s| s.attached)
            .map(|s| s.id)
            .collect();
        detached.sort_unstable();

        self.waypoints = waypoints;
        self.segments = segments;
        self.children = children;
        self.next_segment_id = next_segment_id;
        self.pending_detach.extend(detached);
        log::debug!("Pfad umgekehrt ({} Wegpunkte)", self.waypoints.len());
        Ok(())
    }

    /// Prüft alle strukturellen Invarianten von Kette und Rückreferenzen.
    pub fn check_invariants(&self) -> PathResult<()> {
        let expected = self.waypoints.len().saturating_sub(1);
        if self.segments.len() != expected {
            return Err(PathError::invalid(format!(
                "{} Segmente für {} Wegpunkte",
                self.segments.len(),
                self.waypoints.len()
            )));
        }
        for (key, wp) in &self.waypoints {
            if *key != wp.id {
                return Err(PathError::invalid(format!(
                    "Wegpunkt unter {} trägt Handle {}",
                    key, wp.id
                )));
            }
        }
        let ids: Vec<WaypointId> = self.waypoints.keys().copied().collect();
        for (i, seg) in self.segments.values().enumerate() {
            if seg.start != ids[i] || seg.end != ids[i + 1] {
                return Err(PathError::invalid(format!(
                    "Segment {} verbindet {} → {}, erwartet {} → {}",
                    seg.id,
                    seg.start,
                    seg.end,
                    ids[i],
                    ids[i + 1]
                )));
            }
            if self.waypoints[&seg.start].outgoing != Some(seg.id)
                || self.waypoints[&seg.end].incoming != Some(seg.id)
            {
                return Err(PathError::invalid(format!(
                    "Rückreferenzen von Segment {} sind verwaist",
                    seg.id
                )));
            }
        }
        if let Some(first) = self.waypoints.values().next() {
            if first.incoming.is_some() {
                return Err(PathError::invalid("Startpunkt hat ein eingehendes Segment"));
            }
        }
        if let Some(last) = self.waypoints.values().next_back() {
            if last.outgoing.is_some() {
                return Err(PathError::invalid("Endpunkt hat ein ausgehendes Segment"));
            }
        }
        for child in self.children.values() {
            let parent = child
                .parent
                .and_then(|p| self.segments.get(&p))
                .ok_or_else(|| {
                    PathError::invalid(format!("Vorschau-Kind {} ohne Eltern-Segment", child.id))
                })?;
            if !parent.children.contains(&child.id) || parent.start != child.start {
                return Err(PathError::invalid(format!(
                    "Vorschau-Kind {} passt nicht zu Segment {}",
                    child.id, parent.id
                )));
            }
            if child.end == child.start || !self.waypoints.contains_key(&child.end) {
                return Err(PathError::invalid(format!(
                    "Vorschau-Kind {} endet an ungültigem Wegpunkt {}",
                    child.id, child.end
                )));
            }
        }
        Ok(())
    }

    // ── Interne Helfer ───────────────────────────────────────────────

    fn waypoint_ref(&self, id: WaypointId) -> PathResult<&Waypoint> {
        self.waypoints
            .get(&id)
            .ok_or(PathError::UnknownWaypoint(id))
    }

    fn segment_ref(&self, id: SegmentId) -> PathResult<&Segment> {
        self.segment(id).ok_or(PathError::UnknownSegment(id))
    }

    fn segment_mut(&mut self, id: SegmentId) -> PathResult<&mut Segment> {
        if self.segments.contains_key(&id) {
            return self
                .segments
                .get_mut(&id)
                .ok_or(PathError::UnknownSegment(id));
        }
        self.children
            .get_mut(&id)
            .ok_or(PathError::UnknownSegment(id))
    }

    fn solve(&self, start: WaypointId, end: WaypointId) -> PathResult<(Vec2, Vec2)> {
        let s = self.waypoint_ref(start)?;
        let e = self.waypoint_ref(end)?;
        Ok(hermite_to_bezier(s.position, s.tangent, e.position, e.tangent))
    }

    /// Vergibt ein Handle; Segment-Referenzen eines fremden Wegpunkts werden verworfen.
    fn adopt(&mut self, mut waypoint: Waypoint) -> Waypoint {
        waypoint.id = WaypointId(self.next_waypoint_id);
        self.next_waypoint_id += 1;
        waypoint.incoming = None;
        waypoint.outgoing = None;
        waypoint
    }

    fn allocate_segment_id(&mut self) -> SegmentId {
        let id = SegmentId(self.next_segment_id);
        self.next_segment_id += 1;
        id
    }

    /// Vorgänger und Nachfolger eines Wegpunkts in der Kette.
    fn neighbors(&self, id: WaypointId) -> Vec<WaypointId> {
        let Some(index) = self.waypoints.get_index_of(&id) else {
            return Vec::new();
        };
        let prev = index.checked_sub(1).and_then(|i| self.waypoints.get_index(i));
        let next = self.waypoints.get_index(index + 1);
        prev.into_iter().chain(next).map(|(k, _)| *k).collect()
    }

    fn update_with_children(&mut self, id: SegmentId) -> PathResult<()> {
        self.update_segment(id)?;
        let children = self
            .segments
            .get(&id)
            .map(|s| s.children.clone())
            .unwrap_or_default();
        for child in children {
            self.update_segment(child)?;
        }
        Ok(())
    }

    /// Prüft, dass alle an `around` anliegenden Segmente samt Vorschau-Kindern
    /// auf existierende Wegpunkte zeigen.
    ///
    /// Nach erfolgreicher Prüfung kann `refresh_around` für dieselben
    /// Wegpunkte nicht mehr scheitern.
    fn validate_incident(&self, around: &[WaypointId]) -> PathResult<()> {
        for id in around {
            for seg_id in self.waypoint_ref(*id)?.incident_segments() {
                let seg = self
                    .segments
                    .get(&seg_id)
                    .ok_or(PathError::UnknownSegment(seg_id))?;
                self.waypoint_ref(seg.start)?;
                self.waypoint_ref(seg.end)?;
                for child_id in &seg.children {
                    let child = self
                        .children
                        .get(child_id)
                        .ok_or(PathError::UnknownSegment(*child_id))?;
                    self.waypoint_ref(child.end)?;
                }
            }
        }
        Ok(())
    }

    /// Auto-Tangenten der betroffenen Wegpunkte neu setzen und deren Segmente aktualisieren.
    fn refresh_around(&mut self, around: &[WaypointId]) -> PathResult<()> {
        if self.options.auto_tangents {
            let tension = self.options.auto_tangent_tension;
            for id in around {
                let Some(index) = self.waypoints.get_index_of(id) else {
                    continue;
                };
                if self.waypoints[index].locked {
                    continue;
                }
                let prev = index.checked_sub(1).map(|i| self.waypoints[i].position);
                let next = self.waypoints.get_index(index + 1).map(|(_, wp)| wp.position);
                let current = self.waypoints[index].position;
                if let Some(tangent) = cardinal_tangent(prev, current, next, tension) {
                    self.waypoints[index].tangent = tangent;
                }
            }
        }

        let mut affected: Vec<SegmentId> = Vec::new();
        for id in around {
            if let Some(wp) = self.waypoints.get(id) {
                for seg in wp.incident_segments() {
                    if !affected.contains(&seg) {
                        affected.push(seg);
                    }
                }
            }
        }
        for seg in affected {
            self.update_with_children(seg)?;
        }
        Ok(())
    }

    /// Internes `setEnd`: Ende umhängen, Rückreferenzen und Kinder nachziehen, neu berechnen.
    fn retarget_end(&mut self, id: SegmentId, new_end: WaypointId) -> PathResult<()> {
        let seg = self
            .segments
            .get_mut(&id)
            .ok_or(PathError::UnknownSegment(id))?;
        let old_end = seg.end;
        seg.end = new_end;
        let children = seg.children.clone();
        for child in &children {
            if let Some(c) = self.children.get_mut(child) {
                c.end = new_end;
            }
        }
        if let Some(wp) = self.waypoints.get_mut(&old_end) {
            if wp.incoming == Some(id) {
                wp.incoming = None;
            }
        }
        if let Some(wp) = self.waypoints.get_mut(&new_end) {
            wp.incoming = Some(id);
        }
        self.update_with_children(id)
    }

    /// Entfernt ein logisches Segment samt Vorschau-Kindern.
    fn destroy_segment(&mut self, id: SegmentId) {
        let Some(seg) = self.segments.shift_remove(&id) else {
            return;
        };
        for child in &seg.children {
            if let Some(c) = self.children.remove(child) {
                if c.attached {
                    self.pending_detach.push(c.id);
                }
            }
        }
        if seg.attached {
            self.pending_detach.push(id);
        }
    }

    /// Position und Tangente eines neuen Wegpunkts gemäß `insert_placement`.
    fn default_insert_placement(&self, segment: SegmentId) -> PathResult<(Vec2, Vec2)> {
        let geometry = self.segment_geometry(segment)?;
        let seg = self.segment_ref(segment)?;
        let position = match self.options.insert_placement {
            InsertPlacement::CurveMidpoint => geometry.point_at(0.5),
            InsertPlacement::ChordMidpoint => (geometry.start + geometry.end) * 0.5,
        };
        let mean =
            (self.waypoint_ref(seg.start)?.tangent + self.waypoint_ref(seg.end)?.tangent) * 0.5;
        let tangent = if mean.length() < self.options.tangent_epsilon {
            geometry.end - geometry.start
        } else {
            mean
        };
        Ok((position, tangent))
    }
}
