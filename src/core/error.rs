//! Fehlertypen der Pfad-Operationen.

use super::{SegmentId, WaypointId};
use thiserror::Error;

/// Fehler einer Pfad- oder Segment-Operation.
///
/// Eine fehlgeschlagene Operation hinterlässt den Pfad unverändert.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    /// Strukturverletzung (z.B. letzten Pflicht-Wegpunkt löschen)
    #[error("Ungültige Operation: {0}")]
    InvalidOperation(String),
    /// Index oder Selektor außerhalb des gültigen Bereichs
    #[error("Index {index} außerhalb des gültigen Bereichs (Länge {len})")]
    OutOfRange {
        /// Übergebener Index
        index: usize,
        /// Anzahl gültiger Einträge
        len: usize,
    },
    /// Wegpunkt-Handle gehört nicht (mehr) zu diesem Pfad
    #[error("Unbekannter Wegpunkt {0}")]
    UnknownWaypoint(WaypointId),
    /// Segment-Handle gehört nicht (mehr) zu diesem Pfad
    #[error("Unbekanntes Segment {0}")]
    UnknownSegment(SegmentId),
}

impl PathError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        PathError::InvalidOperation(reason.into())
    }
}

/// Ergebnis-Typ aller fehlbaren Pfad-Operationen.
pub type PathResult<T> = Result<T, PathError>;
