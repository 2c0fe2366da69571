use std::collections::{BTreeMap, BTreeSet};

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, LinSrgb, Mix, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            to_color32(rgb)
        })
        .collect()
}

fn to_color32(rgb: Srgb) -> Color32 {
    Color32::from_rgb(
        (rgb.red.clamp(0.0, 1.0) * 255.0).round() as u8,
        (rgb.green.clamp(0.0, 1.0) * 255.0).round() as u8,
        (rgb.blue.clamp(0.0, 1.0) * 255.0).round() as u8,
    )
}

// ---------------------------------------------------------------------------
// Country colours: country name → Color32
// ---------------------------------------------------------------------------

/// Assigns each country a stable, distinct colour.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl ColorMap {
    /// Build a colour map over all countries of the dataset so colours do
    /// not shift when the selection changes.
    pub fn new(countries: &BTreeSet<String>) -> Self {
        let palette = generate_palette(countries.len());
        let mapping = countries.iter().cloned().zip(palette).collect();

        ColorMap {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    /// Look up the colour for a country.
    pub fn color_for(&self, country: &str) -> Color32 {
        self.mapping
            .get(country)
            .copied()
            .unwrap_or(self.default_color)
    }
}

// ---------------------------------------------------------------------------
// Sequential scale for the map
// ---------------------------------------------------------------------------

/// Viridis anchor colours, dark to bright.
const VIRIDIS: [[u8; 3]; 5] = [
    [0x44, 0x01, 0x54],
    [0x3b, 0x52, 0x8b],
    [0x21, 0x91, 0x8c],
    [0x5e, 0xc9, 0x62],
    [0xfd, 0xe7, 0x25],
];

/// Maps values in `[min, max]` onto a Viridis-like gradient.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SequentialScale {
    pub min: f64,
    pub max: f64,
}

impl SequentialScale {
    /// Scale spanning the given values; `None` when there are none.
    pub fn spanning(values: impl IntoIterator<Item = f64>) -> Option<Self> {
        values.into_iter().fold(None, |acc, v| match acc {
            None => Some(SequentialScale { min: v, max: v }),
            Some(s) => Some(SequentialScale {
                min: s.min.min(v),
                max: s.max.max(v),
            }),
        })
    }

    /// Position of `value` on the scale, in `[0, 1]`.
    pub fn normalize(&self, value: f64) -> f32 {
        let range = self.max - self.min;
        if range.abs() < f64::EPSILON {
            return 0.5;
        }
        ((value - self.min) / range).clamp(0.0, 1.0) as f32
    }

    pub fn color_at(&self, value: f64) -> Color32 {
        gradient(self.normalize(value))
    }
}

/// Interpolate the Viridis anchors in linear RGB.
pub fn gradient(t: f32) -> Color32 {
    let t = t.clamp(0.0, 1.0);
    let segments = (VIRIDIS.len() - 1) as f32;
    let pos = t * segments;
    let lower = (pos.floor() as usize).min(VIRIDIS.len() - 2);
    let local = pos - lower as f32;

    let linear = |[r, g, b]: [u8; 3]| -> LinSrgb {
        Srgb::new(r, g, b).into_format::<f32>().into_linear()
    };
    let mixed = linear(VIRIDIS[lower]).mix(linear(VIRIDIS[lower + 1]), local);
    let rgb: Srgb = mixed.into_color();
    to_color32(rgb)
}

/// Black or white, whichever reads better on `background`.
pub fn contrasting_text(background: Color32) -> Color32 {
    let luma = 0.299 * background.r() as f32
        + 0.587 * background.g() as f32
        + 0.114 * background.b() as f32;
    if luma > 140.0 {
        Color32::BLACK
    } else {
        Color32::WHITE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_has_requested_size() {
        assert!(generate_palette(0).is_empty());
        assert_eq!(generate_palette(7).len(), 7);
    }

    #[test]
    fn unknown_country_gets_default_color() {
        let countries: BTreeSet<String> = ["France".to_string(), "Ireland".to_string()].into();
        let map = ColorMap::new(&countries);
        assert_ne!(map.color_for("France"), map.color_for("Ireland"));
        assert_eq!(map.color_for("Atlantis"), Color32::GRAY);
    }

    #[test]
    fn gradient_hits_anchor_ends() {
        assert_eq!(gradient(0.0), Color32::from_rgb(0x44, 0x01, 0x54));
        assert_eq!(gradient(1.0), Color32::from_rgb(0xfd, 0xe7, 0x25));
    }

    #[test]
    fn scale_normalizes_and_handles_flat_ranges() {
        let scale = SequentialScale::spanning([90.0, 110.0, 100.0]).unwrap();
        assert_eq!(scale.normalize(90.0), 0.0);
        assert_eq!(scale.normalize(100.0), 0.5);
        assert_eq!(scale.normalize(500.0), 1.0);

        let flat = SequentialScale::spanning([100.0]).unwrap();
        assert_eq!(flat.normalize(100.0), 0.5);
        assert!(SequentialScale::spanning(std::iter::empty()).is_none());
    }
}
