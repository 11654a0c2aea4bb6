use std::collections::{BTreeMap, BTreeSet};

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::model::CellValue;

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

// ---------------------------------------------------------------------------
// Color mapping: group value → Color32
// ---------------------------------------------------------------------------

/// Maps the distinct values of a grouping column (e.g. `Date`) to colours.
/// Values are ordered, so dates in ISO form get hues in calendar order.
#[derive(Debug, Clone)]
pub struct ColorMap {
    pub column: String,
    mapping: BTreeMap<CellValue, Color32>,
    default_color: Color32,
}

impl ColorMap {
    pub fn new<'a>(column: &str, values: impl IntoIterator<Item = &'a CellValue>) -> Self {
        let unique: BTreeSet<&CellValue> = values.into_iter().collect();
        let palette = generate_palette(unique.len());
        let mapping = unique
            .into_iter()
            .zip(palette)
            .map(|(v, c)| (v.clone(), c))
            .collect();

        ColorMap {
            column: column.to_string(),
            mapping,
            default_color: Color32::GRAY,
        }
    }

    /// Look up the colour for a given value.
    pub fn color_for(&self, value: &CellValue) -> Color32 {
        self.mapping
            .get(value)
            .copied()
            .unwrap_or(self.default_color)
    }

    pub fn len(&self) -> usize {
        self.mapping.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_has_requested_size_and_distinct_colours() {
        let p = generate_palette(6);
        assert_eq!(p.len(), 6);
        let unique: BTreeSet<[u8; 4]> = p.iter().map(|c| c.to_array()).collect();
        assert_eq!(unique.len(), 6);
        assert!(generate_palette(0).is_empty());
    }

    #[test]
    fn repeated_values_share_a_colour() {
        let dates: Vec<CellValue> = ["2025-01-02", "2025-01-01", "2025-01-02"]
            .iter()
            .map(|s| CellValue::Text(s.to_string()))
            .collect();
        let cm = ColorMap::new("Date", &dates);
        assert_eq!(cm.len(), 2);
        assert_eq!(cm.color_for(&dates[0]), cm.color_for(&dates[2]));
        assert_ne!(cm.color_for(&dates[0]), cm.color_for(&dates[1]));

        // Hues follow value order, so the earlier date takes the first hue.
        assert_eq!(cm.color_for(&dates[1]), generate_palette(2)[0]);
    }

    #[test]
    fn unknown_value_gets_default() {
        let cm = ColorMap::new("Date", std::iter::empty());
        assert_eq!(cm.color_for(&CellValue::Null), Color32::GRAY);
    }
}
