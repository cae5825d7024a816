/// Computational core: band localization and the EF formula.
///
/// ```text
///  SpectralPair ──► peaks ──► band ──► enhancement ──► EfResult
/// ```

pub mod band;
pub mod enhancement;
pub mod peaks;
