//! Core-Domänentypen: Wegpunkte, Segmente, Pfad und Szene-Schnittstelle.

pub mod error;
pub mod path;
pub mod scene;
pub mod segment;
/// Wegpunkt mit Position, Tangente und Sperr-/Rückwärts-Flags
pub mod waypoint;

pub use error::{PathError, PathResult};
pub use path::{Path, PathState};
pub use scene::{HeadlessScene, SceneHost};
pub use segment::{Segment, SegmentId, SegmentKind, Subchild};
pub use waypoint::{Waypoint, WaypointEdit, WaypointId};
