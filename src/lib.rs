//! Waypoint-Path-Engine.
//! Inkrementell aktualisierbare Pfade aus kubischen Segmenten zwischen Wegpunkten,
//! als Library für Editoren und Planungs-Tools exportiert.

pub mod app;
pub mod core;
pub mod shared;

pub use app::{PathSession, SelectionContext};
pub use core::{
    HeadlessScene, Path, PathError, PathResult, PathState, SceneHost, Segment, SegmentId,
    SegmentKind, Subchild, Waypoint, WaypointEdit, WaypointId,
};
pub use shared::{
    hermite_to_bezier, InsertPlacement, PathOptions, SegmentGeometry, SegmentKindOption,
};
