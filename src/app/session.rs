//! Bearbeitungs-Session: Pfad und Selektion als explizite Einheit.

use super::SelectionContext;
use crate::core::{Path, PathResult, Waypoint};
use crate::shared::PathOptions;

/// Zustand einer interaktiven Pfad-Bearbeitung
#[derive(Debug, Clone, Default)]
pub struct PathSession {
    /// Bearbeiteter Pfad
    pub path: Path,
    /// Aktiver Wegpunkt, aktives Segment und Mehrfachselektion
    pub selection: SelectionContext,
}

impl PathSession {
    /// Erstellt eine Session für einen bestehenden Pfad.
    pub fn new(path: Path) -> Self {
        Self {
            path,
            selection: SelectionContext::new(),
        }
    }

    /// Erstellt eine Session mit einem Pfad aus Start- und Endpunkt.
    pub fn from_endpoints(
        start: Waypoint,
        end: Waypoint,
        options: PathOptions,
    ) -> PathResult<Self> {
        Ok(Self::new(Path::create(start, end, options)?))
    }
}
