use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::{Array, Float32Array, Float64Array, LargeListArray, ListArray};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{Orientation, SeriesTable, SpectralPair};

/// Series every input file must provide, matched case-insensitively.
pub const SERIES_NAMES: [&str; 3] = ["wavenumber", "raman", "sers"];

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a Raman/SERS spectral pair from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.parquet` – `wavenumber`, `raman`, `sers` numeric columns
/// * `.json`    – `{ "wavenumber": [...], "raman": [...], "sers": [...] }`
/// * `.csv`     – the three series as columns, or as rows led by their name
pub fn load_file(path: &Path) -> Result<SpectralPair> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let table = match ext.as_str() {
        "parquet" | "pq" => load_parquet(path),
        "json" => load_json(path),
        "csv" => load_csv(path),
        other => bail!("Unsupported file extension: .{other}"),
    }?;

    let pair = table
        .into_pair()
        .with_context(|| format!("validating spectra in {}", path.display()))?;
    log::info!("Loaded {} samples from {}", pair.len(), path.display());
    Ok(pair)
}

fn is_series_name(name: &str) -> bool {
    SERIES_NAMES.iter().any(|s| s.eq_ignore_ascii_case(name.trim()))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema:
///
/// ```json
/// {
///   "wavenumber": [400.0, 401.0, ...],
///   "raman":      [0.12,  0.14,  ...],
///   "sers":       [15.2,  16.8,  ...]
/// }
/// ```
///
/// Unknown keys are ignored.
fn load_json(path: &Path) -> Result<SeriesTable> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let obj = root
        .as_object()
        .context("Expected top-level JSON object")?;

    let mut names = Vec::new();
    let mut cells = Vec::new();
    for (key, val) in obj {
        if !is_series_name(key) {
            log::debug!("Ignoring JSON key '{key}'");
            continue;
        }
        cells.push(json_array_to_f64(val, key)?);
        names.push(key.clone());
    }

    Ok(SeriesTable {
        orientation: Orientation::Rows,
        names,
        cells,
    })
}

fn json_array_to_f64(val: &JsonValue, key: &str) -> Result<Vec<f64>> {
    let arr = val
        .as_array()
        .with_context(|| format!("'{key}' is not an array"))?;

    arr.iter()
        .enumerate()
        .map(|(j, v)| {
            v.as_f64()
                .with_context(|| format!("{key}[{j}]: not a number"))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Two layouts are accepted, told apart by the first record:
///
/// * column-oriented – header `wavenumber,raman,sers`, one sample per line
/// * row-oriented – no header; each line is `name,v0,v1,...`
fn load_csv(path: &Path) -> Result<SeriesTable> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .context("opening CSV")?;

    let mut records = reader.records();
    let first = match records.next() {
        Some(rec) => rec.context("reading first CSV record")?,
        None => bail!("CSV file is empty"),
    };

    let header_like = first.len() > 1 && first.iter().all(is_series_name);
    if header_like {
        let names: Vec<String> = first.iter().map(|h| h.to_string()).collect();
        let mut cells = Vec::new();
        for (row_no, result) in records.enumerate() {
            let record = result.with_context(|| format!("CSV row {row_no}"))?;
            cells.push(parse_fields(record.iter(), row_no)?);
        }
        return Ok(SeriesTable {
            orientation: Orientation::Columns,
            names,
            cells,
        });
    }

    let mut names = Vec::new();
    let mut cells = Vec::new();
    for (row_no, result) in std::iter::once(Ok(first)).chain(records).enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        let name = record.get(0).unwrap_or("");
        if !is_series_name(name) {
            bail!("CSV row {row_no}: '{name}' is not one of {SERIES_NAMES:?}");
        }
        names.push(name.to_string());
        cells.push(parse_fields(record.iter().skip(1), row_no)?);
    }
    Ok(SeriesTable {
        orientation: Orientation::Rows,
        names,
        cells,
    })
}

fn parse_fields<'a>(fields: impl Iterator<Item = &'a str>, row: usize) -> Result<Vec<f64>> {
    fields
        .enumerate()
        .map(|(j, tok)| {
            tok.parse::<f64>()
                .with_context(|| format!("Row {row}, field {j}: '{tok}' is not a number"))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file containing a spectral pair.
///
/// Expected schema: `wavenumber`, `raman`, `sers` columns, each either
/// - Float64 / Float32 – one sample per row, or
/// - List<Float64> / LargeList<Float64> – whole series in the first row.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<SeriesTable> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut names: Vec<String> = Vec::new();
    let mut cells: Vec<Vec<f64>> = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();

        for (col_idx, field) in schema.fields().iter().enumerate() {
            if !is_series_name(field.name()) {
                continue;
            }
            let values = extract_f64_column(batch.column(col_idx))
                .with_context(|| format!("failed to read '{}'", field.name()))?;

            match names.iter().position(|n| n == field.name()) {
                Some(pos) => cells[pos].extend(values),
                None => {
                    names.push(field.name().clone());
                    cells.push(values);
                }
            }
        }
    }

    Ok(SeriesTable {
        orientation: Orientation::Rows,
        names,
        cells,
    })
}

// -- Parquet / Arrow helpers --

/// Flatten a numeric column of a record batch into `f64` samples.
fn extract_f64_column(col: &Arc<dyn Array>) -> Result<Vec<f64>> {
    match col.data_type() {
        DataType::Float64 | DataType::Float32 => float_values(col.as_ref()),
        DataType::List(_) => {
            let list_arr = col
                .as_any()
                .downcast_ref::<ListArray>()
                .context("expected ListArray")?;
            if list_arr.is_empty() || list_arr.is_null(0) {
                bail!("null or missing list in first row");
            }
            float_values(list_arr.value(0).as_ref())
        }
        DataType::LargeList(_) => {
            let list_arr = col
                .as_any()
                .downcast_ref::<LargeListArray>()
                .context("expected LargeListArray")?;
            if list_arr.is_empty() || list_arr.is_null(0) {
                bail!("null or missing list in first row");
            }
            float_values(list_arr.value(0).as_ref())
        }
        other => bail!("Expected Float or List column, got {other:?}"),
    }
}

/// Nulls become NaN and are rejected later by `SpectralPair` validation.
fn float_values(values: &dyn Array) -> Result<Vec<f64>> {
    if let Some(f64_arr) = values.as_any().downcast_ref::<Float64Array>() {
        Ok(f64_arr.iter().map(|v| v.unwrap_or(f64::NAN)).collect())
    } else if let Some(f32_arr) = values.as_any().downcast_ref::<Float32Array>() {
        Ok(f32_arr.iter().map(|v| v.unwrap_or(f32::NAN) as f64).collect())
    } else {
        bail!(
            "Inner type is {:?}, expected Float64 or Float32",
            values.data_type()
        )
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn write_temp(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_column_oriented_csv() {
        let f = write_temp(
            ".csv",
            "wavenumber,raman,sers\n1000,1,1\n1100,1,2\n1200,1,10\n1300,1,2\n",
        );
        let pair = load_file(f.path()).unwrap();
        assert_eq!(pair.wavenumber(), &[1000.0, 1100.0, 1200.0, 1300.0]);
        assert_eq!(pair.sers(), &[1.0, 2.0, 10.0, 2.0]);
    }

    #[test]
    fn loads_row_oriented_csv() {
        let f = write_temp(
            ".csv",
            "sers, 1, 2, 10, 2\nwavenumber, 1300, 1200, 1100, 1000\nraman, 1, 1, 1, 1\n",
        );
        let pair = load_file(f.path()).unwrap();
        assert_eq!(pair.wavenumber(), &[1300.0, 1200.0, 1100.0, 1000.0]);
        assert_eq!(pair.sers(), &[1.0, 2.0, 10.0, 2.0]);
    }

    #[test]
    fn csv_length_mismatch_is_rejected() {
        let f = write_temp(".csv", "wavenumber,1,2,3\nraman,1,1\nsers,1,2,3\n");
        let err = load_file(f.path()).unwrap_err();
        assert!(format!("{err:#}").contains("length mismatch"));
    }

    #[test]
    fn loads_json_object() {
        let f = write_temp(
            ".json",
            r#"{ "wavenumber": [1, 2, 3], "raman": [1, 1, 1], "sers": [0, 4, 0], "sample": "R6G" }"#,
        );
        let pair = load_file(f.path()).unwrap();
        assert_eq!(pair.len(), 3);
        assert_eq!(pair.sers(), &[0.0, 4.0, 0.0]);
    }

    #[test]
    fn json_missing_series_is_reported() {
        let f = write_temp(".json", r#"{ "wavenumber": [1], "raman": [1] }"#);
        let err = load_file(f.path()).unwrap_err();
        assert!(format!("{err:#}").contains("missing 'sers' series"));
    }

    fn write_parquet(batch: &arrow::record_batch::RecordBatch) -> tempfile::NamedTempFile {
        let file = tempfile::Builder::new().suffix(".parquet").tempfile().unwrap();
        let handle = file.as_file().try_clone().unwrap();
        let mut writer = parquet::arrow::ArrowWriter::try_new(handle, batch.schema(), None).unwrap();
        writer.write(batch).unwrap();
        writer.close().unwrap();
        file
    }

    #[test]
    fn loads_parquet_flat_columns() {
        use arrow::datatypes::{Field, Schema};
        use arrow::record_batch::RecordBatch;

        let schema = Arc::new(Schema::new(vec![
            Field::new("wavenumber", DataType::Float64, false),
            Field::new("raman", DataType::Float32, false),
            Field::new("sers", DataType::Float64, false),
            Field::new("operator", DataType::Utf8, false),
        ]));
        let batch = RecordBatch::try_new(
            schema,
            vec![
                Arc::new(Float64Array::from(vec![1300.0, 1200.0, 1100.0])),
                Arc::new(Float32Array::from(vec![1.5f32, 2.0, 2.5])),
                Arc::new(Float64Array::from(vec![4.0, 9.0, 3.0])),
                Arc::new(arrow::array::StringArray::from(vec!["a", "b", "c"])),
            ],
        )
        .unwrap();

        let f = write_parquet(&batch);
        let pair = load_file(f.path()).unwrap();
        assert_eq!(pair.wavenumber(), &[1300.0, 1200.0, 1100.0]);
        assert_eq!(pair.raman(), &[1.5, 2.0, 2.5]);
        assert_eq!(pair.sers(), &[4.0, 9.0, 3.0]);
    }

    #[test]
    fn loads_parquet_list_columns_from_first_row() {
        use arrow::array::{Float64Builder, ListBuilder};
        use arrow::datatypes::{Field, Schema};
        use arrow::record_batch::RecordBatch;

        let list = |values: &[f64]| {
            let mut builder = ListBuilder::new(Float64Builder::new());
            builder.values().append_slice(values);
            builder.append(true);
            builder.finish()
        };
        let item = Arc::new(Field::new("item", DataType::Float64, true));
        let schema = Arc::new(Schema::new(vec![
            Field::new("sers", DataType::List(item.clone()), false),
            Field::new("wavenumber", DataType::List(item.clone()), false),
            Field::new("raman", DataType::List(item), false),
        ]));
        let batch = RecordBatch::try_new(
            schema,
            vec![
                Arc::new(list(&[0.0, 7.0, 1.0, 0.5])),
                Arc::new(list(&[400.0, 401.0, 402.0, 403.0])),
                Arc::new(list(&[1.0, 1.0, 2.0, 1.0])),
            ],
        )
        .unwrap();

        let f = write_parquet(&batch);
        let pair = load_file(f.path()).unwrap();
        assert_eq!(pair.wavenumber(), &[400.0, 401.0, 402.0, 403.0]);
        assert_eq!(pair.raman(), &[1.0, 1.0, 2.0, 1.0]);
        assert_eq!(pair.sers(), &[0.0, 7.0, 1.0, 0.5]);
    }

    #[test]
    fn parquet_null_cell_is_rejected() {
        use arrow::datatypes::{Field, Schema};
        use arrow::record_batch::RecordBatch;

        let schema = Arc::new(Schema::new(vec![
            Field::new("wavenumber", DataType::Float64, false),
            Field::new("raman", DataType::Float64, true),
            Field::new("sers", DataType::Float64, false),
        ]));
        let batch = RecordBatch::try_new(
            schema,
            vec![
                Arc::new(Float64Array::from(vec![1.0, 2.0, 3.0])),
                Arc::new(Float64Array::from(vec![Some(1.0), None, Some(1.0)])),
                Arc::new(Float64Array::from(vec![0.0, 5.0, 0.0])),
            ],
        )
        .unwrap();

        let f = write_parquet(&batch);
        let err = load_file(f.path()).unwrap_err();
        assert!(format!("{err:#}").contains("raman[1]=NaN is not finite"));
    }

    #[test]
    fn unknown_extension_fails() {
        let f = write_temp(".txt", "");
        assert!(load_file(f.path()).is_err());
    }
}
