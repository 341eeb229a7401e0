//! Zentrale Konfiguration der Pfad-Engine.
//!
//! `PathOptions` enthält alle zur Laufzeit änderbaren Werte.
//! Die `const`-Werte bleiben als Fallback/Default erhalten.

use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};

// ── Geometrie ───────────────────────────────────────────────────────

/// Tangenten kürzer als dieser Wert gelten als Null-Tangente.
pub const TANGENT_EPSILON: f32 = 1e-4;
/// Standard-Spannung für automatisch berechnete Tangenten (0 = Catmull-Rom).
pub const AUTO_TANGENT_TENSION: f32 = 0.0;

// ── Szene ───────────────────────────────────────────────────────────

/// Standard-Linienstärke beim Einhängen eines Segments in die Szene.
pub const SCALE_FACTOR: f32 = 1.0;

/// Segment-Art, mit der neue Segmente erzeugt werden.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentKindOption {
    /// Kubisches Segment mit gespeicherten, manuell verschiebbaren Steuerpunkten
    #[default]
    Full,
    /// Quick-Segment, Steuerpunkte werden bei jedem Lesen abgeleitet
    Quick,
}

/// Position eines neu eingefügten Wegpunkts innerhalb des geteilten Segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsertPlacement {
    /// B(0.5) der aktuellen Kurve
    #[default]
    CurveMidpoint,
    /// Mitte der Sehne zwischen Start und Ende
    ChordMidpoint,
}

/// Alle zur Laufzeit änderbaren Pfad-Optionen.
/// Wird als `waypoint_path.toml` gespeichert (siehe [`PathOptions::config_path`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathOptions {
    /// Segment-Art für neu erzeugte Segmente
    #[serde(default)]
    pub default_segment_kind: SegmentKindOption,
    /// Platzierung neu eingefügter Wegpunkte
    #[serde(default)]
    pub insert_placement: InsertPlacement,
    /// Erster und letzter Wegpunkt sind Pflicht-Anker und nicht löschbar
    #[serde(default = "default_true")]
    pub protect_endpoints: bool,
    /// Tangenten nicht gesperrter Wegpunkte aus den Nachbarn berechnen
    #[serde(default)]
    pub auto_tangents: bool,
    /// Spannung der automatischen Tangenten (0 = Catmull-Rom, 1 = Null-Tangente)
    #[serde(default = "default_auto_tangent_tension")]
    pub auto_tangent_tension: f32,
    /// Schwelle, unter der eine Tangente als Null gilt
    #[serde(default = "default_tangent_epsilon")]
    pub tangent_epsilon: f32,
    /// Linienstärke beim Einhängen in die Szene
    #[serde(default = "default_scale_factor")]
    pub scale_factor: f32,
}

impl Default for PathOptions {
    fn default() -> Self {
        Self {
            default_segment_kind: SegmentKindOption::Full,
            insert_placement: InsertPlacement::CurveMidpoint,
            protect_endpoints: true,
            auto_tangents: false,
            auto_tangent_tension: AUTO_TANGENT_TENSION,
            tangent_epsilon: TANGENT_EPSILON,
            scale_factor: SCALE_FACTOR,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_auto_tangent_tension() -> f32 {
    AUTO_TANGENT_TENSION
}

fn default_tangent_epsilon() -> f32 {
    TANGENT_EPSILON
}

fn default_scale_factor() -> f32 {
    SCALE_FACTOR
}

/// Dateiname der Pfad-Optionen.
pub const OPTIONS_FILE_NAME: &str = "waypoint_path.toml";

impl PathOptions {
    /// Liest und validiert Pfad-Optionen aus einer TOML-Datei.
    pub fn read_from_file(path: &std::path::Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Pfad-Optionen nicht lesbar: {}", path.display()))?;
        let options: Self = toml::from_str(&text)
            .with_context(|| format!("Pfad-Optionen ungültig: {}", path.display()))?;
        if !options.tangent_epsilon.is_finite() || options.tangent_epsilon < 0.0 {
            bail!("tangent_epsilon muss endlich und >= 0 sein");
        }
        Ok(options)
    }

    /// Wie `read_from_file`, liefert bei fehlender oder kaputter Datei aber Standardwerte.
    pub fn load_from_file(path: &std::path::Path) -> Self {
        if !path.exists() {
            log::debug!("{} fehlt, Pfad-Optionen auf Standard", path.display());
            return Self::default();
        }
        Self::read_from_file(path).unwrap_or_else(|err| {
            log::warn!("{:#}; Pfad-Optionen auf Standard", err);
            Self::default()
        })
    }

    /// Schreibt die Optionen als TOML; fehlende Verzeichnisse werden angelegt.
    pub fn save_to_file(&self, path: &std::path::Path) -> anyhow::Result<()> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Verzeichnis nicht anlegbar: {}", dir.display()))?;
        }
        let text = toml::to_string_pretty(self).context("Pfad-Optionen nicht serialisierbar")?;
        std::fs::write(path, text)
            .with_context(|| format!("Pfad-Optionen nicht schreibbar: {}", path.display()))?;
        log::debug!("Pfad-Optionen -> {}", path.display());
        Ok(())
    }

    /// Ort der Optionen-Datei in `dir`, ohne Angabe im Arbeitsverzeichnis.
    pub fn config_path(dir: Option<&std::path::Path>) -> std::path::PathBuf {
        dir.unwrap_or_else(|| std::path::Path::new("."))
            .join(OPTIONS_FILE_NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_uses_defaults() {
        let opts: PathOptions =
            toml::from_str("auto_tangents = true\ninsert_placement = \"chord_midpoint\"\n")
                .expect("TOML muss parsebar sein");
        assert!(opts.auto_tangents);
        assert_eq!(opts.insert_placement, InsertPlacement::ChordMidpoint);
        assert!(opts.protect_endpoints);
        assert_eq!(opts.default_segment_kind, SegmentKindOption::Full);
        assert_eq!(opts.tangent_epsilon, TANGENT_EPSILON);
    }

    #[test]
    fn test_toml_roundtrip_preserves_values() {
        let opts = PathOptions {
            default_segment_kind: SegmentKindOption::Quick,
            protect_endpoints: false,
            scale_factor: 2.5,
            ..PathOptions::default()
        };
        let text = toml::to_string_pretty(&opts).expect("Serialisierung");
        let back: PathOptions = toml::from_str(&text).expect("Deserialisierung");
        assert_eq!(back, opts);
    }

    #[test]
    fn test_load_missing_file_falls_back_to_default() {
        let path = std::env::temp_dir().join("waypoint_path_missing_options_4711.toml");
        let _ = std::fs::remove_file(&path);
        assert_eq!(PathOptions::load_from_file(&path), PathOptions::default());
    }

    #[test]
    fn test_save_and_load_file() {
        let path = std::env::temp_dir().join(format!(
            "waypoint_path_options_{}.toml",
            std::process::id()
        ));
        let opts = PathOptions {
            auto_tangents: true,
            auto_tangent_tension: 0.25,
            ..PathOptions::default()
        };
        opts.save_to_file(&path).expect("Speichern muss klappen");
        let loaded = PathOptions::load_from_file(&path);
        let _ = std::fs::remove_file(&path);
        assert_eq!(loaded, opts);
    }

    #[test]
    fn test_malformed_file_is_reported_and_falls_back() {
        let path = std::env::temp_dir().join(format!(
            "waypoint_path_broken_options_{}.toml",
            std::process::id()
        ));
        std::fs::write(&path, "auto_tangents = \"vielleicht\"\n").expect("Schreiben");
        let err = PathOptions::read_from_file(&path).expect_err("Fehler erwartet");
        assert!(format!("{:#}", err).contains("Pfad-Optionen ungültig"));
        assert_eq!(PathOptions::load_from_file(&path), PathOptions::default());

        std::fs::write(&path, "tangent_epsilon = -1.0\n").expect("Schreiben");
        assert!(PathOptions::read_from_file(&path).is_err());
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_save_creates_missing_directory() {
        let dir = std::env::temp_dir().join(format!(
            "waypoint_path_options_dir_{}",
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        let path = PathOptions::config_path(Some(&dir));
        assert!(path.ends_with(OPTIONS_FILE_NAME));

        PathOptions::default().save_to_file(&path).expect("Speichern muss klappen");
        assert_eq!(
            PathOptions::read_from_file(&path).expect("Lesen"),
            PathOptions::default()
        );
        let _ = std::fs::remove_dir_all(&dir);
    }
}
