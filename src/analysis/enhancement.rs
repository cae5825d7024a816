//! Enhancement-factor pipeline.
//!
//! ```text
//!   SpectralPair + EfOptions
//!          │
//!          ▼
//!   locate_band ──► (band, index)
//!          │
//!          ▼
//!   I_normal, I_SERS at index
//!          │
//!          ▼
//!   focal radius r, depth of focus h, volume V = π r² h
//!          │
//!          ▼
//!   N_normal = V · ρ · N_A / M        N_SERS = π r² / σ
//!          │
//!          ▼
//!   EF = (I_SERS · N_normal) / (I_normal · N_SERS)
//! ```

use std::f64::consts::{PI, TAU};
use std::fmt;

use serde::Serialize;

use super::band::{locate_band, BandLocation, Localization};
use super::peaks::{PeakFinder, ProminencePeakFinder};
use crate::data::model::SpectralPair;
use crate::error::EfError;
use crate::options::EfOptions;

/// Avogadro constant, mol⁻¹.
pub const AVOGADRO: f64 = 6.022_140_857e23;

/// First positive zero of the Bessel function J₁.
pub const BESSEL_J1_FIRST_ZERO: f64 = 3.831_705_970_207_512_3;

/// Airy-disk radius factor: `j₁,₁ / 2π ≈ 0.61`.
pub const AIRY_FACTOR: f64 = BESSEL_J1_FIRST_ZERO / TAU;

const NM_TO_M: f64 = 1e-9;
const NM2_TO_M2: f64 = 1e-18;
// g/cm³ → g/m³ is applied as a division by this factor.
const CM3_TO_M3: f64 = 1e-6;

// ---------------------------------------------------------------------------
// Excitation geometry
// ---------------------------------------------------------------------------

/// Cylindrical approximation of the laser focal volume.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ExcitationVolume {
    /// Laser-spot radius, m.
    pub focal_radius_m: f64,
    /// Depth of focus, m.
    pub depth_of_focus_m: f64,
    /// `π r² h`, m³.
    pub volume_m3: f64,
}

impl ExcitationVolume {
    pub fn new(lambda_nm: f64, numerical_aperture: f64) -> Self {
        let lambda_m = lambda_nm * NM_TO_M;
        let depth_of_focus_m = 2.0 * lambda_m / numerical_aperture.powi(2);
        let focal_radius_m = AIRY_FACTOR * lambda_m / numerical_aperture;
        ExcitationVolume {
            focal_radius_m,
            depth_of_focus_m,
            volume_m3: PI * focal_radius_m.powi(2) * depth_of_focus_m,
        }
    }

    /// Focal-spot area `π r²`, m².
    pub fn spot_area_m2(&self) -> f64 {
        PI * self.focal_radius_m.powi(2)
    }
}

/// Molecules of bulk analyte inside the excitation volume.
pub fn molecules_in_volume(volume_m3: f64, density_g_cm3: f64, mol_weight: f64) -> f64 {
    volume_m3 * (density_g_cm3 / CM3_TO_M3) * AVOGADRO / mol_weight
}

/// Molecules in a monolayer covering the laser spot.
pub fn molecules_in_monolayer(spot_area_m2: f64, surf_area_nm2: f64) -> f64 {
    spot_area_m2 / (surf_area_nm2 * NM2_TO_M2)
}

// ---------------------------------------------------------------------------
// Result record
// ---------------------------------------------------------------------------

/// Everything one estimate used and derived. Built once, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EfResult {
    pub options: EfOptions,
    /// Band that was asked for (explicit or SERS argmax).
    pub requested_band: f64,
    /// Wavenumber actually used, cm⁻¹.
    pub closest_band: f64,
    pub closest_index: usize,
    pub localization: Localization,
    pub i_normal: f64,
    pub i_sers: f64,
    #[serde(flatten)]
    pub volume: ExcitationVolume,
    pub n_normal: f64,
    pub n_sers: f64,
    pub ef: f64,
}

impl fmt::Display for EfResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Enhancement factor   {:.4e}", self.ef)?;
        writeln!(
            f,
            "Band                 {:.2} cm-1 (requested {:.2}, index {}, {:?})",
            self.closest_band, self.requested_band, self.closest_index, self.localization
        )?;
        writeln!(f, "I_normal / I_SERS    {:.4} / {:.4}", self.i_normal, self.i_sers)?;
        writeln!(
            f,
            "Focal radius         {:.4e} m",
            self.volume.focal_radius_m
        )?;
        writeln!(
            f,
            "Depth of focus       {:.4e} m",
            self.volume.depth_of_focus_m
        )?;
        writeln!(f, "Excitation volume    {:.4e} m3", self.volume.volume_m3)?;
        writeln!(f, "N_normal / N_SERS    {:.4e} / {:.4e}", self.n_normal, self.n_sers)?;
        write!(
            f,
            "lambda={} nm  NA={}  rho={} g/cm3  M={} g/mol  sigma={} nm2",
            self.options.lambda_nm,
            self.options.numerical_aperture,
            self.options.density,
            self.options.mol_weight,
            self.options.surf_area
        )
    }
}

// ---------------------------------------------------------------------------
// Estimator
// ---------------------------------------------------------------------------

/// EF estimator with an optional peak-detection capability.
pub struct EfEstimator {
    peak_finder: Option<Box<dyn PeakFinder>>,
}

impl Default for EfEstimator {
    fn default() -> Self {
        Self {
            peak_finder: Some(Box::new(ProminencePeakFinder)),
        }
    }
}

impl EfEstimator {
    /// Estimator that always uses nearest-sample localization.
    pub fn without_peaks() -> Self {
        Self { peak_finder: None }
    }

    pub fn with_peak_finder(finder: impl PeakFinder + 'static) -> Self {
        Self {
            peak_finder: Some(Box::new(finder)),
        }
    }

    pub fn has_peak_finder(&self) -> bool {
        self.peak_finder.is_some()
    }

    /// Run the full pipeline on a validated pair.
    pub fn estimate(&self, pair: &SpectralPair, options: &EfOptions) -> Result<EfResult, EfError> {
        options.validate()?;

        let requested_band = options
            .band
            .unwrap_or_else(|| pair.wavenumber()[pair.sers_argmax()]);
        let BandLocation { band, index, mode } =
            locate_band(pair, requested_band, self.peak_finder.as_deref())?;

        let i_normal = pair.raman()[index];
        let i_sers = pair.sers()[index];

        let volume = ExcitationVolume::new(options.lambda_nm, options.numerical_aperture);
        let n_normal = molecules_in_volume(volume.volume_m3, options.density, options.mol_weight);
        let n_sers = molecules_in_monolayer(volume.spot_area_m2(), options.surf_area);

        if i_normal == 0.0 {
            return Err(EfError::DivisionByZero("normal Raman intensity"));
        }
        if n_sers == 0.0 {
            return Err(EfError::DivisionByZero("SERS molecule count"));
        }
        let ef = (i_sers * n_normal) / (i_normal * n_sers);

        log::debug!(
            "band={band} idx={index} I_normal={i_normal} I_SERS={i_sers} N_normal={n_normal:e} N_SERS={n_sers:e} EF={ef:e}"
        );

        Ok(EfResult {
            options: options.clone(),
            requested_band,
            closest_band: band,
            closest_index: index,
            localization: mode,
            i_normal,
            i_sers,
            volume,
            n_normal,
            n_sers,
            ef,
        })
    }
}

/// Validate raw series and estimate EF with the default peak-aware estimator.
pub fn compute_ef(
    wavenumber: &[f64],
    raman: &[f64],
    sers: &[f64],
    options: &EfOptions,
) -> Result<(f64, EfResult), EfError> {
    let pair = SpectralPair::from_slices(wavenumber, raman, sers)?;
    let result = EfEstimator::default().estimate(&pair, options)?;
    Ok((result.ef, result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn airy_factor_is_about_0_61() {
        assert_relative_eq!(AIRY_FACTOR, 0.609_834_945_633_252_2, epsilon = 1e-15);
    }

    #[test]
    fn default_geometry() {
        let v = ExcitationVolume::new(785.0, 0.25);
        assert_relative_eq!(v.depth_of_focus_m, 2.512e-5, max_relative = 1e-12);
        assert_relative_eq!(v.focal_radius_m, 1.914_881_729_288_412e-6, max_relative = 1e-12);
        assert_relative_eq!(v.volume_m3, 2.893_699_428_497_815e-16, max_relative = 1e-12);
    }

    #[test]
    fn molecule_counts_for_defaults() {
        let v = ExcitationVolume::new(785.0, 0.25);
        assert_relative_eq!(
            molecules_in_volume(v.volume_m3, 1.26, 479.02),
            458_375_320_463.7625,
            max_relative = 1e-10
        );
        assert_relative_eq!(
            molecules_in_monolayer(v.spot_area_m2(), 4.0),
            2_879_876.023_584_609,
            max_relative = 1e-10
        );
    }

    #[test]
    fn zero_normal_intensity_is_division_by_zero() {
        let pair = SpectralPair::new(vec![1.0, 2.0, 3.0], vec![0.0; 3], vec![1.0, 5.0, 1.0]).unwrap();
        let err = EfEstimator::default()
            .estimate(&pair, &EfOptions::default())
            .unwrap_err();
        assert_eq!(err, EfError::DivisionByZero("normal Raman intensity"));
    }

    #[test]
    fn invalid_options_fail_before_computation() {
        let pair = SpectralPair::new(vec![1.0], vec![1.0], vec![1.0]).unwrap();
        let options = EfOptions {
            numerical_aperture: -0.5,
            ..Default::default()
        };
        assert!(matches!(
            EfEstimator::default().estimate(&pair, &options),
            Err(EfError::InvalidInput(_))
        ));
    }

    #[test]
    fn default_band_is_sers_argmax() {
        let pair = SpectralPair::new(
            vec![500.0, 600.0, 700.0, 800.0],
            vec![1.0; 4],
            vec![0.0, 1.0, 9.0, 1.0],
        )
        .unwrap();
        let r = EfEstimator::without_peaks()
            .estimate(&pair, &EfOptions::default())
            .unwrap();
        assert_eq!(r.requested_band, 700.0);
        assert_eq!(r.closest_index, 2);
        assert_eq!(r.i_sers, 9.0);
    }

    #[test]
    fn summary_mentions_ef_and_band() {
        let (_, r) = compute_ef(&[1.0, 2.0, 3.0], &[1.0; 3], &[0.0, 2.0, 0.0], &EfOptions::default()).unwrap();
        let text = r.to_string();
        assert!(text.starts_with("Enhancement factor"));
        assert!(text.contains("2.00 cm-1"));
    }
}
