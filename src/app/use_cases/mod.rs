//! Use-Cases der Pfad-Bearbeitung.

/// Einfügen, Entfernen, Umkehren und Bearbeiten von Wegpunkten
pub mod editing;
/// Selektion von Wegpunkten und Drag-Zielen
pub mod selection;

pub use editing::{
    add_path_waypoint, begin_drag_preview, edit_waypoint, end_drag_preview, remove_selected,
    remove_waypoint, reverse_path,
};
pub use selection::{enable_subchild_selector, select_waypoint};
