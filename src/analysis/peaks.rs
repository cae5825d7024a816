//! Prominence-thresholded local-maximum detection.
//!
//! The estimator only needs peak *indices*; how they are found is behind the
//! [`PeakFinder`] trait so that band localization can run with or without a
//! detector and both paths stay testable.

/// Capability that reports local maxima of a spectrum.
pub trait PeakFinder {
    /// Indices of peaks whose prominence is at least `min_prominence`,
    /// in ascending index order.
    fn find_peaks(&self, y: &[f64], min_prominence: f64) -> Vec<usize>;
}

/// Default detector: walks every local maximum and measures its
/// topographic prominence.
///
/// A sample is a peak when it rises strictly above its left neighbour and
/// the next differing sample to its right is lower. Flat tops report their
/// leftmost sample. The first and last samples are never peaks.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProminencePeakFinder;

impl PeakFinder for ProminencePeakFinder {
    fn find_peaks(&self, y: &[f64], min_prominence: f64) -> Vec<usize> {
        local_maxima(y)
            .into_iter()
            .filter(|&i| prominence(y, i) >= min_prominence)
            .collect()
    }
}

/// Candidate peak indices before any prominence filter.
pub fn local_maxima(y: &[f64]) -> Vec<usize> {
    let n = y.len();
    let mut peaks = Vec::new();
    if n < 3 {
        return peaks;
    }
    let mut i = 1;
    while i < n - 1 {
        if y[i] > y[i - 1] {
            // skip over a plateau
            let mut j = i + 1;
            while j < n && y[j] == y[i] {
                j += 1;
            }
            if j < n && y[j] < y[i] {
                peaks.push(i);
            }
            i = j;
        } else {
            i += 1;
        }
    }
    peaks
}

/// Height of `y[peak]` above the higher of the two lowest points reached
/// before the signal climbs above the peak on either side.
pub fn prominence(y: &[f64], peak: usize) -> f64 {
    let height = y[peak];

    let mut left_min = height;
    for &v in y[..peak].iter().rev() {
        if v > height {
            break;
        }
        left_min = left_min.min(v);
    }

    let mut right_min = height;
    for &v in &y[peak + 1..] {
        if v > height {
            break;
        }
        right_min = right_min.min(v);
    }

    (height - left_min.max(right_min)).max(0.0)
}
