//! Geteilte Typen für layer-übergreifende Verträge.
//!
//! Enthält reine Geometrie und Optionen, die zwischen `core` und `app`
//! geteilt werden, um direkte Abhängigkeiten zu vermeiden.

pub mod options;
pub mod spline_geometry;

pub use options::{InsertPlacement, PathOptions, SegmentKindOption};
pub use spline_geometry::{hermite_to_bezier, SegmentGeometry};
