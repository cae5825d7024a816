use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Fixed roles in the EF plot
// ---------------------------------------------------------------------------

/// Convert an HSL hue (degrees) at the given lightness to an egui colour.
pub fn hue_color(hue: f32, lightness: f32) -> Color32 {
    let rgb: Srgb = Hsl::new(hue, 0.7, lightness).into_color();
    let [r, g, b] =
        [rgb.red, rgb.green, rgb.blue].map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8);
    Color32::from_rgb(r, g, b)
}

/// Colours for the normal Raman trace, the SERS trace and the band marker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesColors {
    pub raman: Color32,
    pub sers: Color32,
    pub marker: Color32,
}

impl Default for SeriesColors {
    fn default() -> Self {
        SeriesColors {
            raman: hue_color(210.0, 0.6),
            sers: hue_color(15.0, 0.55),
            marker: hue_color(120.0, 0.45),
        }
    }
}
