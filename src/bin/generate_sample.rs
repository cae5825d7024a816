use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::Float64Array;
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

/// Lorentzian line of full width `fwhm` and peak height `height` at `center`.
fn lorentzian(x: f64, center: f64, fwhm: f64, height: f64) -> f64 {
    let half = 0.5 * fwhm;
    height * half * half / ((x - center).powi(2) + half * half)
}

/// SplitMix64 stream; enough for reproducible detector noise.
struct NoiseSource(u64);

impl NoiseSource {
    fn uniform(&mut self) -> f64 {
        self.0 = self.0.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^= z >> 31;
        (z >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Approximately normal: Irwin–Hall sum of twelve uniforms.
    fn normal(&mut self, sigma: f64) -> f64 {
        let sum: f64 = (0..12).map(|_| self.uniform()).sum();
        (sum - 6.0) * sigma
    }
}

/// Baseline plus bands plus noise, sampled on `axis`.
fn synthesize(
    axis: &[f64],
    bands: &[(f64, f64, f64)],
    baseline: f64,
    noise_sigma: f64,
    noise: &mut NoiseSource,
) -> Vec<f64> {
    axis.iter()
        .map(|&wn| {
            let lines: f64 = bands
                .iter()
                .map(|&(center, fwhm, height)| lorentzian(wn, center, fwhm, height))
                .sum();
            baseline + lines + noise.normal(noise_sigma)
        })
        .collect()
}

/// Rhodamine 6G-like band positions (cm⁻¹) with FWHM and relative heights.
const BANDS: [(f64, f64, f64); 7] = [
    (612.0, 12.0, 0.55),
    (774.0, 12.0, 0.35),
    (1183.0, 14.0, 0.40),
    (1310.0, 14.0, 0.60),
    (1363.0, 16.0, 1.00),
    (1509.0, 16.0, 0.85),
    (1650.0, 16.0, 0.70),
];

fn main() -> Result<()> {
    let mut noise = NoiseSource(42);

    // Raman shift: 400 → 1800 cm⁻¹, step 1
    let wavenumbers: Vec<f64> = (0..=1400).map(|i| 400.0 + i as f64).collect();

    // SERS lines come out broader on the metal surface
    let raman_bands = BANDS.map(|(center, fwhm, rel)| (center, fwhm, 50.0 * rel));
    let sers_bands = BANDS.map(|(center, fwhm, rel)| (center, fwhm * 1.3, 8000.0 * rel));

    let raman = synthesize(&wavenumbers, &raman_bands, 20.0, 1.5, &mut noise);
    let sers = synthesize(&wavenumbers, &sers_bands, 300.0, 40.0, &mut noise);

    // CSV, one sample per line
    let csv_path = "sample_spectra.csv";
    let mut writer = csv::Writer::from_path(csv_path).context("creating CSV")?;
    writer.write_record(["wavenumber", "raman", "sers"])?;
    for ((wn, r), s) in wavenumbers.iter().zip(&raman).zip(&sers) {
        writer.write_record([wn.to_string(), r.to_string(), s.to_string()])?;
    }
    writer.flush()?;

    // Parquet, same columns
    let schema = Arc::new(Schema::new(vec![
        Field::new("wavenumber", DataType::Float64, false),
        Field::new("raman", DataType::Float64, false),
        Field::new("sers", DataType::Float64, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Float64Array::from(wavenumbers.clone())),
            Arc::new(Float64Array::from(raman)),
            Arc::new(Float64Array::from(sers)),
        ],
    )
    .context("building record batch")?;

    let parquet_path = "sample_spectra.parquet";
    let file = std::fs::File::create(parquet_path).context("creating parquet file")?;
    let mut pq_writer = ArrowWriter::try_new(file, schema, None).context("creating writer")?;
    pq_writer.write(&batch).context("writing batch")?;
    pq_writer.close().context("closing writer")?;

    println!(
        "Wrote {} samples to {csv_path} and {parquet_path}",
        wavenumbers.len()
    );
    Ok(())
}
