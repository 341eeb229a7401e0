//! Segment zwischen zwei Wegpunkten (Full- oder Quick-Variante).

use super::WaypointId;
use crate::shared::SegmentKindOption;
use glam::Vec2;
use std::fmt;

/// Handle eines Segments, vom besitzenden `Path` vergeben.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SegmentId(pub u64);

impl fmt::Display for SegmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S{}", self.0)
    }
}

/// Interpolations-Variante eines Segments.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SegmentKind {
    /// Kubisches Segment mit gespeicherten Steuerpunkten
    Full {
        /// Erster Steuerpunkt
        control1: Vec2,
        /// Zweiter Steuerpunkt
        control2: Vec2,
    },
    /// Steuerpunkte werden bei jedem Lesen aus den Endpunkten abgeleitet
    Quick,
}

impl SegmentKind {
    /// Leere Variante passend zur Option (Full-Punkte werden beim ersten `update` gesetzt).
    pub fn from_option(option: SegmentKindOption) -> Self {
        match option {
            SegmentKindOption::Full => SegmentKind::Full {
                control1: Vec2::ZERO,
                control2: Vec2::ZERO,
            },
            SegmentKindOption::Quick => SegmentKind::Quick,
        }
    }

    /// Zugehörige Options-Variante.
    pub fn option(&self) -> SegmentKindOption {
        match self {
            SegmentKind::Full { .. } => SegmentKindOption::Full,
            SegmentKind::Quick => SegmentKindOption::Quick,
        }
    }

    /// Anzahl der Teil-Elemente, die als Drag-Ziel aktivierbar sind.
    pub fn subchild_count(&self) -> usize {
        match self {
            SegmentKind::Full { .. } => FULL_SUBCHILDREN.len(),
            SegmentKind::Quick => QUICK_SUBCHILDREN.len(),
        }
    }

    /// Teil-Element zum Selektor-Index, `None` außerhalb des Bereichs.
    pub fn subchild(&self, index: usize) -> Option<Subchild> {
        match self {
            SegmentKind::Full { .. } => FULL_SUBCHILDREN.get(index).copied(),
            SegmentKind::Quick => QUICK_SUBCHILDREN.get(index).copied(),
        }
    }
}

/// Aktivierbare Teil-Elemente eines Segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subchild {
    /// Kurvenkörper
    Curve,
    /// Griff am Start-Wegpunkt
    StartHandle,
    /// Griff des ersten Steuerpunkts
    Control1,
    /// Griff des zweiten Steuerpunkts
    Control2,
    /// Griff am End-Wegpunkt
    EndHandle,
}

const FULL_SUBCHILDREN: [Subchild; 5] = [
    Subchild::Curve,
    Subchild::StartHandle,
    Subchild::Control1,
    Subchild::Control2,
    Subchild::EndHandle,
];

// Quick-Segmente haben keine verschiebbaren Steuerpunkte
const QUICK_SUBCHILDREN: [Subchild; 3] =
    [Subchild::Curve, Subchild::StartHandle, Subchild::EndHandle];

/// Ein Segment des Pfads
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub(crate) id: SegmentId,
    pub(crate) start: WaypointId,
    pub(crate) end: WaypointId,
    pub(crate) kind: SegmentKind,
    /// Nicht-besitzende Rückreferenz auf ein zusammengesetztes Eltern-Segment
    pub(crate) parent: Option<SegmentId>,
    /// Quick-Vorschau-Kinder dieses Segments
    pub(crate) children: Vec<SegmentId>,
    /// In der Szene eingehängt
    pub(crate) attached: bool,
    /// Vom Host per `remove_from_group` ausgeblendet
    pub(crate) hidden: bool,
    pub(crate) active_subchild: Option<Subchild>,
}

impl Segment {
    pub(crate) fn new(
        id: SegmentId,
        start: WaypointId,
        end: WaypointId,
        kind: SegmentKind,
        parent: Option<SegmentId>,
    ) -> Self {
        Self {
            id,
            start,
            end,
            kind,
            parent,
            children: Vec::new(),
            attached: false,
            hidden: false,
            active_subchild: None,
        }
    }

    /// Handle des Segments.
    pub fn id(&self) -> SegmentId {
        self.id
    }

    /// Start-Wegpunkt (unveränderlich nach der Erstellung).
    pub fn start(&self) -> WaypointId {
        self.start
    }

    /// End-Wegpunkt.
    pub fn end(&self) -> WaypointId {
        self.end
    }

    /// Interpolations-Variante.
    pub fn kind(&self) -> &SegmentKind {
        &self.kind
    }

    /// `true` für Quick-Segmente.
    pub fn is_quick(&self) -> bool {
        matches!(self.kind, SegmentKind::Quick)
    }

    /// Eltern-Segment eines Vorschau-Kinds.
    pub fn parent(&self) -> Option<SegmentId> {
        self.parent
    }

    /// Vorschau-Kinder dieses Segments.
    pub fn children(&self) -> &[SegmentId] {
        &self.children
    }

    /// Ob das Segment aktuell in der Szene eingehängt ist.
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Vom Host ausgeblendet; `sync_scene` hängt es nicht wieder ein.
    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Aktuell als Drag-Ziel markiertes Teil-Element.
    pub fn active_subchild(&self) -> Option<Subchild> {
        self.active_subchild
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subchild_ranges_per_kind() {
        let full = SegmentKind::from_option(SegmentKindOption::Full);
        assert_eq!(full.subchild_count(), 5);
        assert_eq!(full.subchild(2), Some(Subchild::Control1));
        assert_eq!(full.subchild(5), None);

        let quick = SegmentKind::Quick;
        assert_eq!(quick.subchild_count(), 3);
        assert_eq!(quick.subchild(2), Some(Subchild::EndHandle));
        assert_eq!(quick.subchild(3), None);
    }

    #[test]
    fn test_kind_option_roundtrip() {
        for option in [SegmentKindOption::Full, SegmentKindOption::Quick] {
            assert_eq!(SegmentKind::from_option(option).option(), option);
        }
    }
}
