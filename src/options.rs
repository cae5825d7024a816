use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::error::EfError;

// ---------------------------------------------------------------------------
// EfOptions – the named physical parameters
// ---------------------------------------------------------------------------

/// Physical parameters of one EF estimate.
///
/// Every field has a default, so a partial JSON file such as
/// `{ "lambda_nm": 633.0 }` deserializes into a complete parameter set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EfOptions {
    /// Band of interest in cm⁻¹. `None` means "wherever the SERS spectrum peaks".
    pub band: Option<f64>,
    /// Excitation wavelength in nm.
    pub lambda_nm: f64,
    /// Numerical aperture of the objective (dimensionless).
    pub numerical_aperture: f64,
    /// Bulk density of the analyte in g/cm³.
    pub density: f64,
    /// Molecular weight in g/mol.
    pub mol_weight: f64,
    /// Surface area occupied by one adsorbed molecule in nm².
    pub surf_area: f64,
    /// Whether the driver should open the diagnostic viewer.
    pub show_plot: bool,
}

impl Default for EfOptions {
    fn default() -> Self {
        Self {
            band: None,
            lambda_nm: 785.0,
            numerical_aperture: 0.25,
            density: 1.26,
            mol_weight: 479.02,
            surf_area: 4.0,
            show_plot: true,
        }
    }
}

impl EfOptions {
    /// Read options from a JSON file; missing keys keep their defaults.
    pub fn from_json_file(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading options file {}", path.display()))?;
        let options: EfOptions = serde_json::from_str(&text).context("parsing options JSON")?;
        Ok(options)
    }

    pub fn with_band(mut self, band: f64) -> Self {
        self.band = Some(band);
        self
    }

    /// Check sign and finiteness constraints. Fails on the first violation.
    pub fn validate(&self) -> Result<(), EfError> {
        if let Some(band) = self.band {
            if !band.is_finite() {
                return Err(EfError::invalid(format!("band={band} is not finite")));
            }
        }
        require_positive("lambda_nm", self.lambda_nm)?;
        require_positive("numerical_aperture", self.numerical_aperture)?;
        require_positive("mol_weight", self.mol_weight)?;
        require_positive("surf_area", self.surf_area)?;
        if !self.density.is_finite() || self.density < 0.0 {
            return Err(EfError::invalid(format!(
                "density={} (must be >= 0 and finite)",
                self.density
            )));
        }
        Ok(())
    }
}

fn require_positive(name: &str, value: f64) -> Result<(), EfError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(EfError::invalid(format!(
            "{name}={value} (must be > 0 and finite)"
        )));
    }
    Ok(())
}
