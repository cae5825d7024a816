use crate::error::EfError;

// ---------------------------------------------------------------------------
// Orientation of raw series as they come out of a file
// ---------------------------------------------------------------------------

/// How three series were laid out in their source table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// One series per column, one sample per row.
    Columns,
    /// One series per row, one sample per column.
    Rows,
}

/// A rectangular table of samples, either row- or column-oriented.
///
/// `normalize` flattens it into three per-series vectors so that index `i`
/// always means spectral sample `i`.
#[derive(Debug, Clone)]
pub struct SeriesTable {
    pub orientation: Orientation,
    /// Series names in the order they appear (`wavenumber`, `raman`, `sers`).
    pub names: Vec<String>,
    /// Raw cells. For `Columns` each inner vec is a table row; for `Rows`
    /// each inner vec is one series.
    pub cells: Vec<Vec<f64>>,
}

impl SeriesTable {
    /// Return the named series, transposing if the table is column-oriented.
    pub fn normalize(&self) -> Result<Vec<(String, Vec<f64>)>, EfError> {
        match self.orientation {
            Orientation::Rows => {
                if self.names.len() != self.cells.len() {
                    return Err(EfError::invalid(format!(
                        "{} series names but {} rows",
                        self.names.len(),
                        self.cells.len()
                    )));
                }
                Ok(self
                    .names
                    .iter()
                    .cloned()
                    .zip(self.cells.iter().cloned())
                    .collect())
            }
            Orientation::Columns => {
                let width = self.names.len();
                let mut series: Vec<Vec<f64>> = vec![Vec::with_capacity(self.cells.len()); width];
                for (row_no, row) in self.cells.iter().enumerate() {
                    if row.len() != width {
                        return Err(EfError::invalid(format!(
                            "row {row_no} has {} values, expected {width}",
                            row.len()
                        )));
                    }
                    for (col, &v) in row.iter().enumerate() {
                        series[col].push(v);
                    }
                }
                Ok(self.names.iter().cloned().zip(series).collect())
            }
        }
    }

    /// Normalize and pick out the three series the estimator needs.
    pub fn into_pair(self) -> Result<SpectralPair, EfError> {
        let mut named = self.normalize()?;
        let mut take = |name: &str| -> Result<Vec<f64>, EfError> {
            let pos = named
                .iter()
                .position(|(n, _)| n.eq_ignore_ascii_case(name))
                .ok_or_else(|| EfError::invalid(format!("missing '{name}' series")))?;
            Ok(named.swap_remove(pos).1)
        };
        let wavenumber = take("wavenumber")?;
        let raman = take("raman")?;
        let sers = take("sers")?;
        SpectralPair::new(wavenumber, raman, sers)
    }
}

// ---------------------------------------------------------------------------
// SpectralPair – the validated input of the estimator
// ---------------------------------------------------------------------------

/// Normal Raman and SERS spectra sharing one Raman-shift axis (cm⁻¹).
///
/// Sample order is kept exactly as supplied, ascending or descending.
#[derive(Debug, Clone, PartialEq)]
pub struct SpectralPair {
    wavenumber: Vec<f64>,
    raman: Vec<f64>,
    sers: Vec<f64>,
}

impl SpectralPair {
    /// Validate and wrap three index-aligned series.
    pub fn new(wavenumber: Vec<f64>, raman: Vec<f64>, sers: Vec<f64>) -> Result<Self, EfError> {
        validate_series(&wavenumber, &raman, &sers)?;
        Ok(SpectralPair {
            wavenumber,
            raman,
            sers,
        })
    }

    /// Borrowing constructor for callers that keep their own buffers.
    pub fn from_slices(wavenumber: &[f64], raman: &[f64], sers: &[f64]) -> Result<Self, EfError> {
        Self::new(wavenumber.to_vec(), raman.to_vec(), sers.to_vec())
    }

    pub fn wavenumber(&self) -> &[f64] {
        &self.wavenumber
    }

    pub fn raman(&self) -> &[f64] {
        &self.raman
    }

    pub fn sers(&self) -> &[f64] {
        &self.sers
    }

    /// Number of spectral samples.
    pub fn len(&self) -> usize {
        self.wavenumber.len()
    }

    /// Never true for a validated pair.
    pub fn is_empty(&self) -> bool {
        self.wavenumber.is_empty()
    }

    /// Index of the global SERS maximum (first one on ties).
    pub fn sers_argmax(&self) -> usize {
        let mut best = 0;
        for (i, &v) in self.sers.iter().enumerate() {
            if v > self.sers[best] {
                best = i;
            }
        }
        best
    }
}

fn validate_series(wavenumber: &[f64], raman: &[f64], sers: &[f64]) -> Result<(), EfError> {
    let n = wavenumber.len();
    if raman.len() != n || sers.len() != n {
        return Err(EfError::invalid(format!(
            "length mismatch: wavenumber has {n} samples, raman has {}, sers has {}",
            raman.len(),
            sers.len()
        )));
    }
    if n == 0 {
        return Err(EfError::invalid("spectra are empty"));
    }
    for (name, series) in [("wavenumber", wavenumber), ("raman", raman), ("sers", sers)] {
        if let Some(i) = series.iter().position(|v| !v.is_finite()) {
            return Err(EfError::invalid(format!(
                "{name}[{i}]={} is not finite",
                series[i]
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_length_mismatch() {
        let err = SpectralPair::new(vec![1.0, 2.0], vec![1.0], vec![1.0, 2.0]).unwrap_err();
        assert!(matches!(err, EfError::InvalidInput(_)));
    }

    #[test]
    fn rejects_empty_and_nan() {
        assert!(SpectralPair::new(vec![], vec![], vec![]).is_err());
        let err = SpectralPair::new(vec![1.0, 2.0], vec![1.0, f64::NAN], vec![1.0, 2.0]).unwrap_err();
        assert_eq!(
            err,
            EfError::InvalidInput("raman[1]=NaN is not finite".into())
        );
    }

    #[test]
    fn keeps_descending_axis_order() {
        let pair = SpectralPair::new(
            vec![1300.0, 1200.0, 1100.0],
            vec![1.0, 2.0, 3.0],
            vec![4.0, 5.0, 6.0],
        )
        .unwrap();
        assert_eq!(pair.wavenumber(), &[1300.0, 1200.0, 1100.0]);
        assert_eq!(pair.sers(), &[4.0, 5.0, 6.0]);
    }

    #[test]
    fn row_and_column_tables_normalize_identically() {
        let names = vec!["wavenumber".to_string(), "raman".to_string(), "sers".to_string()];
        let by_rows = SeriesTable {
            orientation: Orientation::Rows,
            names: names.clone(),
            cells: vec![vec![1000.0, 1100.0], vec![1.0, 2.0], vec![3.0, 4.0]],
        };
        let by_cols = SeriesTable {
            orientation: Orientation::Columns,
            names,
            cells: vec![vec![1000.0, 1.0, 3.0], vec![1100.0, 2.0, 4.0]],
        };
        assert_eq!(by_rows.into_pair().unwrap(), by_cols.into_pair().unwrap());
    }

    #[test]
    fn series_lookup_ignores_case_and_order() {
        let table = SeriesTable {
            orientation: Orientation::Rows,
            names: vec!["SERS".into(), "Wavenumber".into(), "Raman".into()],
            cells: vec![vec![5.0], vec![900.0], vec![1.0]],
        };
        let pair = table.into_pair().unwrap();
        assert_eq!(pair.wavenumber(), &[900.0]);
        assert_eq!(pair.raman(), &[1.0]);
        assert_eq!(pair.sers(), &[5.0]);
    }

    #[test]
    fn argmax_takes_first_maximum() {
        let pair = SpectralPair::new(
            vec![1.0, 2.0, 3.0, 4.0],
            vec![0.0; 4],
            vec![1.0, 7.0, 7.0, 2.0],
        )
        .unwrap();
        assert_eq!(pair.sers_argmax(), 1);
    }
}
