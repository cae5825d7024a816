//! Surface-enhanced Raman scattering (SERS) enhancement factor estimation.
//!
//! Given a normal Raman spectrum and a SERS spectrum on a shared Raman-shift
//! axis, [`compute_ef`] locates the band of interest, derives the excitation
//! volume and molecule counts, and returns the enhancement factor together
//! with an [`EfResult`] record of every intermediate quantity.

pub mod analysis;
pub mod data;
pub mod error;
pub mod options;

pub use analysis::band::{locate_band, nearest_index, BandLocation, Localization};
pub use analysis::enhancement::{compute_ef, EfEstimator, EfResult, ExcitationVolume};
pub use analysis::peaks::{PeakFinder, ProminencePeakFinder};
pub use data::model::SpectralPair;
pub use error::EfError;
pub use options::EfOptions;
