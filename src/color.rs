use std::collections::BTreeMap;

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
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

fn to_linear(c: Color32) -> LinSrgb {
    Srgb::new(c.r(), c.g(), c.b()).into_format::<f32>().into_linear()
}

fn from_linear(c: LinSrgb) -> Color32 {
    let srgb: Srgb<u8> = Srgb::<f32>::from_linear(c).into_format();
    Color32::from_rgb(srgb.red, srgb.green, srgb.blue)
}

/// Blend `a` towards `b` by `t` in linear RGB; `t` is clamped to `[0, 1]`.
pub fn blend(a: Color32, b: Color32, t: f32) -> Color32 {
    from_linear(to_linear(a).mix(to_linear(b), t.clamp(0.0, 1.0)))
}

// ---------------------------------------------------------------------------
// Continuous scales
// ---------------------------------------------------------------------------

/// Single-hue ramp from `light` (low values) to `dark` (high values).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SequentialScale {
    pub light: Color32,
    pub dark: Color32,
}

impl SequentialScale {
    pub const BLUES: SequentialScale = SequentialScale {
        light: Color32::from_rgb(0xde, 0xeb, 0xf7),
        dark: Color32::from_rgb(0x08, 0x30, 0x6b),
    };

    pub const GREENS: SequentialScale = SequentialScale {
        light: Color32::from_rgb(0xe5, 0xf5, 0xe0),
        dark: Color32::from_rgb(0x00, 0x44, 0x1b),
    };

    /// Colour for `value` on the `[min, max]` range.
    pub fn color_at(&self, value: f64, min: f64, max: f64) -> Color32 {
        let t = if max > min {
            ((value - min) / (max - min)) as f32
        } else {
            1.0
        };
        blend(self.light, self.dark, t)
    }
}

/// Blue–white–red ramp for correlation coefficients in `[-1, 1]`.
pub fn diverging(value: f64) -> Color32 {
    const NEG: Color32 = Color32::from_rgb(0x21, 0x66, 0xac);
    const MID: Color32 = Color32::from_rgb(0xf7, 0xf7, 0xf7);
    const POS: Color32 = Color32::from_rgb(0xb2, 0x18, 0x2b);
    let v = value.clamp(-1.0, 1.0) as f32;
    if v < 0.0 {
        blend(MID, NEG, -v)
    } else {
        blend(MID, POS, v)
    }
}

/// Black or white, whichever reads better on `background`.
pub fn text_on(background: Color32) -> Color32 {
    let luma = 0.299 * background.r() as f32
        + 0.587 * background.g() as f32
        + 0.114 * background.b() as f32;
    if luma > 140.0 {
        Color32::BLACK
    } else {
        Color32::WHITE
    }
}

// ---------------------------------------------------------------------------
// Color mapping: category label → Color32
// ---------------------------------------------------------------------------

/// Maps category labels to distinct colours, with optional fixed entries.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl ColorMap {
    /// Build a colour map for the given labels.
    pub fn new<S: AsRef<str>>(labels: &[S]) -> Self {
        let palette = generate_palette(labels.len());
        let mapping: BTreeMap<String, Color32> = labels
            .iter()
            .zip(palette)
            .map(|(label, c)| (label.as_ref().to_string(), c))
            .collect();

        ColorMap {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    /// Every label gets the same colour.
    pub fn uniform(color: Color32) -> Self {
        ColorMap {
            mapping: BTreeMap::new(),
            default_color: color,
        }
    }

    /// Pin specific labels to specific colours.
    pub fn with_fixed(mut self, fixed: &[(&str, Color32)]) -> Self {
        for (label, color) in fixed {
            self.mapping.insert(label.to_string(), *color);
        }
        self
    }

    /// Look up the colour for a given label.
    pub fn color_for(&self, label: &str) -> Color32 {
        self.mapping
            .get(label)
            .copied()
            .unwrap_or(self.default_color)
    }
}

// ---------------------------------------------------------------------------
// Chart themes
// ---------------------------------------------------------------------------

/// Palette set used by one dashboard tab.
#[derive(Debug, Clone)]
pub struct ChartTheme {
    /// Colour for single-series bar charts.
    pub primary: Color32,
    /// Fixed colours for known category labels (income, gender, race…).
    pub fixed: Vec<(&'static str, Color32)>,
    /// Ramp for count-shaded charts.
    pub scale: SequentialScale,
    /// Tile colours for the treemap, largest tile first.
    pub shades: [Color32; 5],
}

impl ChartTheme {
    /// Used by the with-outliers tab.
    pub fn blues() -> Self {
        Self {
            primary: Color32::from_rgb(0x63, 0x6e, 0xfa),
            fixed: vec![
                ("Low", Color32::from_rgb(0x63, 0x6e, 0xfa)),
                ("High", Color32::from_rgb(0xef, 0x55, 0x3b)),
            ],
            scale: SequentialScale::BLUES,
            shades: [
                Color32::from_rgb(0x08, 0x30, 0x6b),
                Color32::from_rgb(0x21, 0x71, 0xb5),
                Color32::from_rgb(0x42, 0x92, 0xc6),
                Color32::from_rgb(0x6b, 0xae, 0xd6),
                Color32::from_rgb(0xc6, 0xdb, 0xef),
            ],
        }
    }

    /// Used by the without-outliers tab.
    pub fn greens() -> Self {
        let dark = Color32::from_rgb(0x00, 0x6d, 0x2c);
        let light = Color32::from_rgb(0xa1, 0xd9, 0x9b);
        Self {
            primary: Color32::from_rgb(0x3c, 0xa9, 0x6b),
            fixed: vec![
                ("Low", light),
                ("High", dark),
                ("Male", dark),
                ("Female", light),
                ("White", Color32::from_rgb(0x8d, 0xd3, 0xc7)),
                ("Black", Color32::from_rgb(0xff, 0xff, 0xb3)),
                ("Asian-Pac-Islander", Color32::from_rgb(0xbe, 0xba, 0xda)),
                ("Amer-Indian-Eskimo", Color32::from_rgb(0xfb, 0x80, 0x72)),
                ("Other", Color32::from_rgb(0x80, 0xb1, 0xd3)),
            ],
            scale: SequentialScale::GREENS,
            shades: [
                Color32::from_rgb(0x3c, 0xa9, 0x6b),
                Color32::from_rgb(0x5b, 0xc2, 0x7c),
                Color32::from_rgb(0x81, 0xd6, 0x8d),
                Color32::from_rgb(0xa8, 0xe6, 0xa1),
                Color32::from_rgb(0xd0, 0xf0, 0xc0),
            ],
        }
    }

    /// Colour map over `labels` honouring this theme's fixed entries.
    pub fn color_map<S: AsRef<str>>(&self, labels: &[S]) -> ColorMap {
        ColorMap::new(labels).with_fixed(&self.fixed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_has_requested_size() {
        assert!(generate_palette(0).is_empty());
        let p = generate_palette(4);
        assert_eq!(p.len(), 4);
        assert_ne!(p[0], p[1]);
    }

    #[test]
    fn fixed_entries_override_generated_ones() {
        let theme = ChartTheme::greens();
        let map = theme.color_map(&["Low", "High", "Unseen"]);
        assert_eq!(map.color_for("High"), Color32::from_rgb(0x00, 0x6d, 0x2c));
        assert_ne!(map.color_for("Unseen"), Color32::GRAY);
        assert_eq!(map.color_for("missing"), Color32::GRAY);
    }

    #[test]
    fn sequential_scale_hits_both_ends() {
        let s = SequentialScale::BLUES;
        assert_eq!(s.color_at(0.0, 0.0, 10.0), s.light);
        assert_eq!(s.color_at(10.0, 0.0, 10.0), s.dark);
        assert_eq!(s.color_at(3.0, 3.0, 3.0), s.dark);
    }

    #[test]
    fn blend_round_trips_through_linear_rgb() {
        let a = Color32::from_rgb(0x63, 0x6e, 0xfa);
        let b = Color32::from_rgb(0xef, 0x55, 0x3b);
        assert_eq!(blend(a, b, 0.0), a);
        assert_eq!(blend(a, b, 1.0), b);
        assert_eq!(blend(a, b, 7.0), b);
    }

    #[test]
    fn text_contrasts_with_background() {
        assert_eq!(text_on(Color32::WHITE), Color32::BLACK);
        assert_eq!(text_on(Color32::from_rgb(0x08, 0x30, 0x6b)), Color32::WHITE);
    }
}
