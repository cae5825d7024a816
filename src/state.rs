use sers_ef::{EfEstimator, EfOptions, EfResult, SpectralPair};

use crate::color::SeriesColors;

// ---------------------------------------------------------------------------
// Viewer state
// ---------------------------------------------------------------------------

/// The full viewer state, independent of rendering.
pub struct AppState {
    /// Loaded spectra (None until a file is opened).
    pub pair: Option<SpectralPair>,

    /// Parameters used for the last (and next) estimate.
    pub options: EfOptions,

    /// Snap the band to a detected SERS peak.
    pub peak_aware: bool,

    /// Result of the last successful estimate.
    pub result: Option<EfResult>,

    /// Line colours for the two spectra and the band marker.
    pub colors: SeriesColors,

    /// Scale each spectrum to [0, 1] before plotting.
    pub minmax_scaling: bool,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            pair: None,
            options: EfOptions::default(),
            peak_aware: true,
            result: None,
            colors: SeriesColors::default(),
            minmax_scaling: false,
            status_message: None,
        }
    }
}

impl AppState {
    /// State for a pair whose estimate was already computed by the caller.
    pub fn with_result(pair: SpectralPair, options: EfOptions, peak_aware: bool, result: EfResult) -> Self {
        Self {
            pair: Some(pair),
            options,
            peak_aware,
            result: Some(result),
            ..Default::default()
        }
    }

    /// Ingest a newly loaded pair and estimate with the current options.
    pub fn set_pair(&mut self, pair: SpectralPair) {
        self.pair = Some(pair);
        self.recompute();
    }

    /// Re-run the estimate after a parameter or mode change.
    pub fn recompute(&mut self) {
        let Some(pair) = &self.pair else {
            return;
        };
        let estimator = if self.peak_aware {
            EfEstimator::default()
        } else {
            EfEstimator::without_peaks()
        };
        match estimator.estimate(pair, &self.options) {
            Ok(result) => {
                log::info!("EF = {:.4e} at {:.2} cm-1", result.ef, result.closest_band);
                self.result = Some(result);
                self.status_message = None;
            }
            Err(e) => {
                log::error!("Estimate failed: {e}");
                self.result = None;
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_pair() -> SpectralPair {
        SpectralPair::new(
            vec![1000.0, 1100.0, 1200.0, 1300.0],
            vec![1.0, 1.0, 1.0, 1.0],
            vec![1.0, 2.0, 10.0, 2.0],
        )
        .unwrap()
    }

    #[test]
    fn set_pair_computes_result() {
        let mut state = AppState::default();
        state.set_pair(sample_pair());
        let r = state.result.as_ref().unwrap();
        assert_eq!(r.closest_index, 2);
        assert!(state.status_message.is_none());
    }

    #[test]
    fn invalid_options_surface_as_status() {
        let mut state = AppState::default();
        state.options.numerical_aperture = 0.0;
        state.set_pair(sample_pair());
        assert!(state.result.is_none());
        assert!(state.status_message.as_deref().unwrap().starts_with("Error"));
    }
}
