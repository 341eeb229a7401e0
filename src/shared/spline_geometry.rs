//! Reine Geometrie-Funktionen für kubische Bézier-Segmente.
//!
//! Layer-neutral: wird von `core::Path` und den Use-Cases in `app`
//! importiert, ohne Zirkel-Abhängigkeiten zu erzeugen.

use glam::Vec2;

/// Start- und Endpunkt eines Segments samt beider Steuerpunkte.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentGeometry {
    /// Position des Start-Wegpunkts
    pub start: Vec2,
    /// Erster Steuerpunkt (Startseite)
    pub control1: Vec2,
    /// Zweiter Steuerpunkt (Endseite)
    pub control2: Vec2,
    /// Position des End-Wegpunkts
    pub end: Vec2,
}

impl SegmentGeometry {
    /// Evaluiert die Kurve bei `t ∈ [0, 1]`.
    pub fn point_at(&self, t: f32) -> Vec2 {
        cubic_bezier(self.start, self.control1, self.control2, self.end, t)
    }

    /// Ableitung der Kurve bei `t ∈ [0, 1]`.
    pub fn derivative_at(&self, t: f32) -> Vec2 {
        cubic_bezier_derivative(self.start, self.control1, self.control2, self.end, t)
    }
}

/// Hermite → Bézier: berechnet die beiden inneren Steuerpunkte aus
/// Position und Tangente von Start- und End-Wegpunkt.
///
/// Die Kurve verlässt P0 mit `T0`, am Ende wird `T3` doppelt gewichtet:
///
/// ```text
/// CP1 = P0 + T0 / 3
/// CP2 = P3 − 2·T3 / 3
/// ```
///
/// Null-Tangenten liefern einen Steuerpunkt deckungsgleich mit dem Endpunkt.
pub fn hermite_to_bezier(
    start_pos: Vec2,
    start_tangent: Vec2,
    end_pos: Vec2,
    end_tangent: Vec2,
) -> (Vec2, Vec2) {
    let control1 = start_pos + start_tangent / 3.0;
    let control2 = end_pos - 2.0 * end_tangent / 3.0;
    (control1, control2)
}

/// B(t) = (1-t)³·P0 + 3(1-t)²t·P1 + 3(1-t)t²·P2 + t³·P3
pub fn cubic_bezier(p0: Vec2, p1: Vec2, p2: Vec2, p3: Vec2, t: f32) -> Vec2 {
    let inv = 1.0 - t;
    let inv2 = inv * inv;
    let t2 = t * t;
    inv2 * inv * p0 + 3.0 * inv2 * t * p1 + 3.0 * inv * t2 * p2 + t2 * t * p3
}

/// B'(t) = 3(1-t)²·(P1-P0) + 6(1-t)t·(P2-P1) + 3t²·(P3-P2)
pub fn cubic_bezier_derivative(p0: Vec2, p1: Vec2, p2: Vec2, p3: Vec2, t: f32) -> Vec2 {
    let inv = 1.0 - t;
    3.0 * inv * inv * (p1 - p0) + 6.0 * inv * t * (p2 - p1) + 3.0 * t * t * (p3 - p2)
}

/// Tastet ein Segment gleichmäßig im Parameterraum ab.
///
/// `samples`: Anzahl der Teilstrecken; das Ergebnis enthält `samples + 1` Punkte
/// (Start- und Endpunkt eingeschlossen). `samples == 0` wird als 1 behandelt.
pub fn sample_cubic(geometry: &SegmentGeometry, samples: usize) -> Vec<Vec2> {
    let samples = samples.max(1);
    (0..=samples)
        .map(|i| geometry.point_at(i as f32 / samples as f32))
        .collect()
}

/// Approximierte Länge einer Polyline.
pub fn polyline_length(points: &[Vec2]) -> f32 {
    points.windows(2).map(|w| w[0].distance(w[1])).sum()
}

/// Cardinal-Spline-Tangente eines Wegpunkts aus seinen Nachbarn.
///
/// - Innenpunkt: `(1 - tension) · (next − prev) / 2`
/// - Pfad-Anfang: `(1 - tension) · (next − current)`
/// - Pfad-Ende: `(1 - tension) · (current − prev)`
///
/// `tension = 0` entspricht Catmull-Rom. Ohne Nachbarn: `None`.
pub fn cardinal_tangent(
    prev: Option<Vec2>,
    current: Vec2,
    next: Option<Vec2>,
    tension: f32,
) -> Option<Vec2> {
    let scale = 1.0 - tension;
    match (prev, next) {
        (Some(p), Some(n)) => Some(scale * 0.5 * (n - p)),
        (None, Some(n)) => Some(scale * (n - current)),
        (Some(p), None) => Some(scale * (current - p)),
        (None, None) => None,
    }
}
