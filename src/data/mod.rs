/// Data layer: input types and loading.
///
/// Architecture:
/// ```text
///  .parquet / .json / .csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → SeriesTable (row- or column-oriented)
///   └──────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │ SpectralPair │  wavenumber, raman, sers – validated, index-aligned
///   └──────────────┘
/// ```

pub mod loader;
pub mod model;
