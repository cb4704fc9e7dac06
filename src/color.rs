use std::collections::BTreeMap;
use std::str::FromStr;

use eframe::egui::Color32;
use palette::{LinSrgb, Mix, Srgb};

use crate::config::ConfigError;

// ---------------------------------------------------------------------------
// Hex parsing
// ---------------------------------------------------------------------------

/// Parse `#rrggbb` (or `rrggbb`) into a colour.
pub fn parse_hex(value: &str) -> Option<Color32> {
    let rgb = Srgb::<u8>::from_str(value.trim()).ok()?;
    Some(Color32::from_rgb(rgb.red, rgb.green, rgb.blue))
}

/// Average of several colours, taken in linear RGB.
fn mix_all(colors: &[Color32]) -> Option<Color32> {
    let (first, rest) = colors.split_first()?;
    let to_linear = |c: &Color32| -> LinSrgb {
        Srgb::new(c.r(), c.g(), c.b()).into_format::<f32>().into_linear()
    };
    let mut acc = to_linear(first);
    for (i, c) in rest.iter().enumerate() {
        // Running average: the n-th colour gets weight 1/n.
        acc = acc.mix(to_linear(c), 1.0 / (i as f32 + 2.0));
    }
    let rgb: Srgb<u8> = Srgb::<f32>::from_linear(acc).into_format();
    Some(Color32::from_rgb(rgb.red, rgb.green, rgb.blue))
}

// ---------------------------------------------------------------------------
// Column label → background colour
// ---------------------------------------------------------------------------

/// Background colours for specialization column labels.
#[derive(Debug, Clone)]
pub struct ColumnPalette {
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl ColumnPalette {
    /// Build from the configured `label → #rrggbb` map.
    pub fn new(colors: &BTreeMap<String, String>) -> Result<Self, ConfigError> {
        let mapping = colors
            .iter()
            .map(|(column, value)| {
                parse_hex(value)
                    .map(|c| (column.clone(), c))
                    .ok_or_else(|| ConfigError::InvalidColor {
                        column: column.clone(),
                        value: value.clone(),
                    })
            })
            .collect::<Result<BTreeMap<_, _>, _>>()?;

        Ok(ColumnPalette {
            mapping,
            default_color: Color32::WHITE,
        })
    }

    /// Look up the colour for a column label. Composite labels such as
    /// `ボーカル&ダンス` blend their parts when not configured themselves.
    pub fn color_for(&self, label: &str) -> Color32 {
        if let Some(c) = self.mapping.get(label) {
            return *c;
        }
        let parts: Option<Vec<Color32>> = label
            .split('&')
            .map(|part| self.mapping.get(part.trim()).copied())
            .collect();
        match parts {
            Some(parts) if parts.len() > 1 => mix_all(&parts).unwrap_or(self.default_color),
            _ => self.default_color,
        }
    }
}
