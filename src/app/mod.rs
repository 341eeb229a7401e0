//! Application-Layer: Session, Selektion und Use-Cases.
//!
//! Verbindet den Pfad mit dem Host: jede Use-Case-Funktion mutiert den Pfad,
//! gleicht die Selektion ab und bringt die Szene synchron auf den neuen Stand.

pub mod selection;
pub mod session;
pub mod use_cases;

pub use selection::SelectionContext;
pub use session::PathSession;
