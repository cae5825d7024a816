use serde::Serialize;

use super::peaks::PeakFinder;
use crate::data::model::SpectralPair;
use crate::error::EfError;

/// Peaks must stand out by at least this fraction of the SERS maximum
/// (inclusive: a peak exactly at the bound qualifies).
pub const MIN_PROMINENCE_FRACTION: f64 = 0.1;

/// Which strategy produced a [`BandLocation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Localization {
    /// Snapped to a detected SERS peak.
    PeakAware,
    /// Nearest axis sample to the requested band.
    Fallback,
}

/// Result of band localization: where to read intensities from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BandLocation {
    /// Wavenumber at `index`.
    pub band: f64,
    pub index: usize,
    pub mode: Localization,
}

/// Index minimizing `|axis[i] - target|`; ties go to the lowest index.
///
/// `axis` must be non-empty.
pub fn nearest_index(axis: &[f64], target: f64) -> usize {
    let mut best = 0;
    let mut best_dist = (axis[0] - target).abs();
    for (i, &v) in axis.iter().enumerate().skip(1) {
        let d = (v - target).abs();
        if d < best_dist {
            best = i;
            best_dist = d;
        }
    }
    best
}

/// Detected peak index closest to `anchor` (in index space); ties go to the
/// lowest index. `peaks` must be non-empty.
fn nearest_peak(peaks: &[usize], anchor: usize) -> usize {
    let mut best = peaks[0];
    for &p in &peaks[1..] {
        if p.abs_diff(anchor) < best.abs_diff(anchor) {
            best = p;
        }
    }
    best
}

/// Locate the sample to use for intensity extraction.
///
/// Without a peak finder this is the axis sample nearest `target`. With one,
/// the nearest axis sample is only the anchor: the result is the qualifying
/// SERS peak whose index is nearest that anchor. When no peak qualifies
/// (flat or featureless spectra) the anchor itself is returned.
///
/// Fails with `InvalidInput` if the finder reports an index outside the
/// spectrum.
pub fn locate_band(
    pair: &SpectralPair,
    target: f64,
    finder: Option<&dyn PeakFinder>,
) -> Result<BandLocation, EfError> {
    let axis = pair.wavenumber();
    let anchor = nearest_index(axis, target);
    let fallback = BandLocation {
        band: axis[anchor],
        index: anchor,
        mode: Localization::Fallback,
    };

    let Some(finder) = finder else {
        log::debug!("No peak finder; using axis sample {anchor} for band {target}");
        return Ok(fallback);
    };

    let sers = pair.sers();
    let max = sers[pair.sers_argmax()];
    let peaks = finder.find_peaks(sers, MIN_PROMINENCE_FRACTION * max);
    if let Some(&bad) = peaks.iter().find(|&&p| p >= axis.len()) {
        return Err(EfError::invalid(format!(
            "peak finder returned index {bad} for a spectrum of {} samples",
            axis.len()
        )));
    }
    if peaks.is_empty() {
        log::warn!("No SERS peak above {MIN_PROMINENCE_FRACTION} of maximum; falling back to nearest sample");
        return Ok(fallback);
    }

    let index = nearest_peak(&peaks, anchor);
    log::debug!(
        "Band {target} anchored at sample {anchor}, snapped to peak {index} of {} candidates",
        peaks.len()
    );
    Ok(BandLocation {
        band: axis[index],
        index,
        mode: Localization::PeakAware,
    })
}
