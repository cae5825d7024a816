mod app;
mod color;
mod state;
mod ui;

use std::path::PathBuf;

use anyhow::{Context, Result};
use app::EfViewerApp;
use clap::Parser;
use eframe::egui;
use sers_ef::data::loader::load_file;
use sers_ef::{EfEstimator, EfOptions};
use state::AppState;

/// Estimate the SERS enhancement factor of a Raman / SERS spectrum pair.
#[derive(Debug, Parser)]
#[command(name = "sers-ef", version, about)]
struct Cli {
    /// Spectra file (.csv, .json or .parquet) with wavenumber, raman and sers series
    data: PathBuf,

    /// JSON file with default parameters; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Band of interest in cm⁻¹ (default: SERS maximum)
    #[arg(long)]
    band: Option<f64>,

    /// Excitation wavelength in nm
    #[arg(long)]
    lambda: Option<f64>,

    /// Numerical aperture of the objective
    #[arg(long)]
    na: Option<f64>,

    /// Analyte density in g/cm³
    #[arg(long)]
    rho: Option<f64>,

    /// Molecular weight in g/mol
    #[arg(long)]
    mol_weight: Option<f64>,

    /// Surface area per adsorbed molecule in nm²
    #[arg(long)]
    surf_area: Option<f64>,

    /// Do not open the diagnostic plot
    #[arg(long)]
    no_plot: bool,

    /// Use the nearest axis sample instead of snapping to SERS peaks
    #[arg(long)]
    no_peaks: bool,

    /// Print the result record as JSON
    #[arg(long)]
    json: bool,
}

impl Cli {
    /// Defaults, then config file, then command-line flags.
    fn options(&self) -> Result<EfOptions> {
        let mut o = match &self.config {
            Some(path) => EfOptions::from_json_file(path)?,
            None => EfOptions::default(),
        };
        if self.band.is_some() {
            o.band = self.band;
        }
        if let Some(v) = self.lambda {
            o.lambda_nm = v;
        }
        if let Some(v) = self.na {
            o.numerical_aperture = v;
        }
        if let Some(v) = self.rho {
            o.density = v;
        }
        if let Some(v) = self.mol_weight {
            o.mol_weight = v;
        }
        if let Some(v) = self.surf_area {
            o.surf_area = v;
        }
        if self.no_plot {
            o.show_plot = false;
        }
        Ok(o)
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let options = cli.options()?;
    let pair = load_file(&cli.data)
        .with_context(|| format!("loading {}", cli.data.display()))?;

    let estimator = if cli.no_peaks {
        EfEstimator::without_peaks()
    } else {
        EfEstimator::default()
    };
    let result = estimator.estimate(&pair, &options)?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("{result}");
    }

    if !options.show_plot {
        return Ok(());
    }

    let viewer_state = AppState::with_result(pair, options, estimator.has_peak_finder(), result);
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    // The estimate is already printed; a missing display only costs the plot.
    if let Err(e) = eframe::run_native(
        "SERS EF – Diagnostic Plot",
        native_options,
        Box::new(move |_cc| Ok(Box::new(EfViewerApp::new(viewer_state)))),
    ) {
        log::error!("Could not open diagnostic plot: {e}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_flags_means_defaults() {
        let cli = Cli::try_parse_from(["sers-ef", "spectra.csv"]).unwrap();
        assert_eq!(cli.options().unwrap(), EfOptions::default());
    }

    #[test]
    fn flags_override_config_which_overrides_defaults() {
        let mut config = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        config
            .write_all(br#"{ "lambda_nm": 633.0, "numerical_aperture": 0.9, "density": 2.0 }"#)
            .unwrap();
        let config_path = config.path().to_string_lossy().into_owned();

        let cli = Cli::try_parse_from([
            "sers-ef",
            "spectra.csv",
            "--config",
            config_path.as_str(),
            "--na",
            "0.5",
            "--band",
            "1363",
            "--no-plot",
        ])
        .unwrap();
        let o = cli.options().unwrap();

        assert_eq!(o.lambda_nm, 633.0);
        assert_eq!(o.density, 2.0);
        assert_eq!(o.numerical_aperture, 0.5);
        assert_eq!(o.band, Some(1363.0));
        assert_eq!(o.mol_weight, EfOptions::default().mol_weight);
        assert!(!o.show_plot);
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let cli = Cli::try_parse_from(["sers-ef", "spectra.csv", "--config", "/nonexistent/ef.json"])
            .unwrap();
        assert!(cli.options().is_err());
    }
}
