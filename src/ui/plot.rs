use eframe::egui::{RichText, Ui};
use egui_plot::{Line, Plot, PlotPoint, PlotPoints, Text, VLine};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Spectral plot (central panel)
// ---------------------------------------------------------------------------

/// Scale `y` to [0, 1]; a flat trace maps to all zeros.
pub fn minmax_scale(y: &[f64]) -> Vec<f64> {
    let min = y.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = y.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;
    if range.abs() < f64::EPSILON {
        vec![0.0; y.len()]
    } else {
        y.iter().map(|&yi| (yi - min) / range).collect()
    }
}

/// Render both spectra, the located band and the EF annotation.
pub fn spectral_plot(ui: &mut Ui, state: &AppState) {
    let pair = match &state.pair {
        Some(p) => p,
        None => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading("Open a file to estimate EF  (File → Open…)");
            });
            return;
        }
    };

    let (raman, sers) = if state.minmax_scaling {
        (minmax_scale(pair.raman()), minmax_scale(pair.sers()))
    } else {
        (pair.raman().to_vec(), pair.sers().to_vec())
    };
    let top = raman
        .iter()
        .chain(sers.iter())
        .cloned()
        .fold(f64::NEG_INFINITY, f64::max);

    let colors = state.colors;

    Plot::new("ef_plot")
        .legend(egui_plot::Legend::default())
        .x_axis_label("Raman shift (cm⁻¹)")
        .y_axis_label("Intensity")
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for (name, y, color) in [
                ("Raman", &raman, colors.raman),
                ("SERS", &sers, colors.sers),
            ] {
                let points: PlotPoints = pair
                    .wavenumber()
                    .iter()
                    .zip(y.iter())
                    .map(|(&xi, &yi)| [xi, yi])
                    .collect();
                plot_ui.line(Line::new(points).name(name).color(color).width(1.5));
            }

            if let Some(result) = &state.result {
                plot_ui.vline(
                    VLine::new(result.closest_band)
                        .name("Band")
                        .color(colors.marker)
                        .width(1.0),
                );
                let label = format!(
                    "{:.1} cm⁻¹\nEF = {:.3e}",
                    result.closest_band, result.ef
                );
                plot_ui.text(Text::new(
                    PlotPoint::new(result.closest_band, top),
                    RichText::new(label).color(colors.marker),
                ));
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minmax_scale_spans_unit_interval() {
        assert_eq!(minmax_scale(&[2.0, 4.0, 3.0]), vec![0.0, 1.0, 0.5]);
    }

    #[test]
    fn minmax_scale_of_flat_trace_is_zero() {
        assert_eq!(minmax_scale(&[7.0; 3]), vec![0.0; 3]);
    }
}
