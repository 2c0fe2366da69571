use std::fs::File;
use std::io::Read;
use std::path::Path;

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Float64Type};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use super::error::LoadError;
use super::model::{NumericColumn, Record, Relation};

/// Required header names.
pub const COUNTRY_COLUMN: &str = "country";
pub const YEAR_COLUMN: &str = "year";

// ---------------------------------------------------------------------------
// LoadReport – what coercion did to the rows
// ---------------------------------------------------------------------------

/// Row and cell counts collected while normalising a file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub rows_read: usize,
    pub dropped_missing_country: usize,
    pub dropped_missing_year: usize,
    /// Numeric cells holding text that did not parse as a number.
    pub nulled_cells: usize,
}

impl LoadReport {
    pub fn rows_kept(&self) -> usize {
        self.rows_read - self.dropped_missing_country - self.dropped_missing_year
    }
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the panel from a file. Dispatch by extension.
///
/// Supported formats:
/// * `.parquet` / `.pq` – Parquet written by pandas or polars
/// * `.tsv`            – tab-separated
/// * anything else     – comma-separated with a header row
pub fn load(path: &Path) -> Result<Relation, LoadError> {
    load_with_report(path).map(|(relation, _)| relation)
}

/// Like [`load`], also returning the coercion counts.
pub fn load_with_report(path: &Path) -> Result<(Relation, LoadReport), LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let file = File::open(path).map_err(|source| LoadError::FileAccess {
        path: path.to_path_buf(),
        source,
    })?;

    let (relation, report) = match ext.as_str() {
        "parquet" | "pq" => load_parquet(file, path)?,
        "tsv" => load_delimited(file, b'\t', path)?,
        _ => load_delimited(file, b',', path)?,
    };

    log::info!(
        "Loaded {} rows from {} ({} read, {} without country, {} without year, {} cells nulled)",
        relation.len(),
        path.display(),
        report.rows_read,
        report.dropped_missing_country,
        report.dropped_missing_year,
        report.nulled_cells,
    );
    Ok((relation, report))
}

// ---------------------------------------------------------------------------
// Row normalisation shared by both formats
// ---------------------------------------------------------------------------

#[derive(Default)]
struct Normalizer {
    records: Vec<Record>,
    report: LoadReport,
}

impl Normalizer {
    fn push(
        &mut self,
        row_no: usize,
        country: Option<&str>,
        year: Option<i32>,
        values: [Option<f64>; 3],
    ) {
        self.report.rows_read += 1;

        let country = country.map(str::trim).unwrap_or("");
        if country.is_empty() {
            log::debug!("row {row_no}: dropped, missing country");
            self.report.dropped_missing_country += 1;
            return;
        }
        let Some(year) = year else {
            log::debug!("row {row_no}: dropped, missing or invalid year ({country})");
            self.report.dropped_missing_year += 1;
            return;
        };

        let [final_cons_ktoe, index_2012, growth_pct] = values;
        self.records.push(Record {
            country: country.to_string(),
            year,
            final_cons_ktoe,
            index_2012,
            growth_pct,
        });
    }

    fn finish(self) -> (Relation, LoadReport) {
        (Relation::new(self.records), self.report)
    }
}

/// Parse a year cell. Integral floats such as `2013.0` are accepted.
pub fn coerce_year(s: &str) -> Option<i32> {
    let s = s.trim();
    if let Ok(year) = s.parse::<i32>() {
        return Some(year);
    }
    s.parse::<f64>().ok().and_then(year_from_f64)
}

fn year_from_f64(v: f64) -> Option<i32> {
    if v.is_finite() && v.fract() == 0.0 && v >= i32::MIN as f64 && v <= i32::MAX as f64 {
        Some(v as i32)
    } else {
        None
    }
}

/// Parse a numeric cell; anything unparseable becomes null.
pub fn coerce_numeric(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().and_then(non_nan)
}

fn non_nan(v: f64) -> Option<f64> {
    (!v.is_nan()).then_some(v)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Parse a comma-separated panel from any reader. `origin` only labels
/// errors.
pub fn load_csv_reader<R: Read>(
    reader: R,
    origin: &Path,
) -> Result<(Relation, LoadReport), LoadError> {
    load_delimited(reader, b',', origin)
}

fn load_delimited<R: Read>(
    reader: R,
    delimiter: u8,
    origin: &Path,
) -> Result<(Relation, LoadReport), LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| LoadError::parse(origin, e))?
        .clone();

    let position = |name: &str| headers.iter().position(|h| h == name);
    let required = |name: &str| {
        position(name).ok_or_else(|| LoadError::MissingColumn {
            column: name.to_string(),
            path: origin.to_path_buf(),
        })
    };
    let country_idx = required(COUNTRY_COLUMN)?;
    let year_idx = required(YEAR_COLUMN)?;
    let numeric_idx = NumericColumn::ALL.map(|c| position(c.name()));

    let mut normalizer = Normalizer::default();

    for (row_no, result) in reader.records().enumerate() {
        let record = result.map_err(|e| LoadError::parse(origin, format!("row {row_no}: {e}")))?;

        let mut values = [None; 3];
        for (slot, idx) in values.iter_mut().zip(numeric_idx) {
            let raw = idx.and_then(|i| record.get(i)).unwrap_or("").trim();
            *slot = coerce_numeric(raw);
            if slot.is_none() && !raw.is_empty() && raw.parse::<f64>().is_err() {
                log::debug!("row {row_no}: non-numeric value '{raw}' nulled");
                normalizer.report.nulled_cells += 1;
            }
        }

        normalizer.push(
            row_no,
            record.get(country_idx),
            record.get(year_idx).and_then(coerce_year),
            values,
        );
    }

    Ok(normalizer.finish())
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet panel. Columns are cast in safe mode, so cells that do
/// not convert become null and then follow the CSV coercion rules.
fn load_parquet(file: File, path: &Path) -> Result<(Relation, LoadReport), LoadError> {
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).map_err(|e| LoadError::parse(path, e))?;

    let schema = builder.schema().clone();
    let position = |name: &str| {
        schema
            .fields()
            .iter()
            .position(|f| f.name().trim() == name)
    };
    let required = |name: &str| {
        position(name).ok_or_else(|| LoadError::MissingColumn {
            column: name.to_string(),
            path: path.to_path_buf(),
        })
    };
    let country_idx = required(COUNTRY_COLUMN)?;
    let year_idx = required(YEAR_COLUMN)?;
    let numeric_idx = NumericColumn::ALL.map(|c| position(c.name()));

    let reader = builder.build().map_err(|e| LoadError::parse(path, e))?;

    let mut normalizer = Normalizer::default();
    let mut row_offset = 0;

    for batch_result in reader {
        let batch = batch_result.map_err(|e| LoadError::parse(path, e))?;

        let countries = cast_column(batch.column(country_idx), &DataType::Utf8, path)?;
        let countries = countries
            .as_string_opt::<i32>()
            .ok_or_else(|| LoadError::parse(path, "country column is not text"))?;

        let years = batch_years(batch.column(year_idx), path)?;

        // (original column, Float64 cast) per numeric column present
        let mut numeric: Vec<Option<(&ArrayRef, ArrayRef)>> = Vec::with_capacity(3);
        for idx in numeric_idx {
            numeric.push(match idx {
                Some(i) => {
                    let original = batch.column(i);
                    Some((original, cast_column(original, &DataType::Float64, path)?))
                }
                None => None,
            });
        }

        for row in 0..batch.num_rows() {
            let row_no = row_offset + row;

            let mut values = [None; 3];
            for (slot, column) in values.iter_mut().zip(&numeric) {
                let Some((original, coerced)) = column else {
                    continue;
                };
                let coerced = coerced.as_primitive::<Float64Type>();
                if coerced.is_valid(row) {
                    *slot = non_nan(coerced.value(row));
                } else if original.is_valid(row) {
                    log::debug!("row {row_no}: non-numeric value nulled");
                    normalizer.report.nulled_cells += 1;
                }
            }

            let country = countries.is_valid(row).then(|| countries.value(row));
            normalizer.push(row_no, country, years[row], values);
        }
        row_offset += batch.num_rows();
    }

    Ok(normalizer.finish())
}

/// Years of one batch. Text columns go through `coerce_year`, so padded
/// values are trimmed the way CSV cells are; other types are cast to `Float64`.
fn batch_years(column: &ArrayRef, path: &Path) -> Result<Vec<Option<i32>>, LoadError> {
    if matches!(
        column.data_type(),
        DataType::Utf8 | DataType::LargeUtf8 | DataType::Utf8View
    ) {
        let text = cast_column(column, &DataType::Utf8, path)?;
        let text = text
            .as_string_opt::<i32>()
            .ok_or_else(|| LoadError::parse(path, "year column is not text"))?;
        return Ok(text.iter().map(|v| v.and_then(coerce_year)).collect());
    }

    let years = cast_column(column, &DataType::Float64, path)?;
    Ok(years
        .as_primitive::<Float64Type>()
        .iter()
        .map(|v| v.and_then(year_from_f64))
        .collect())
}

fn cast_column(column: &ArrayRef, to: &DataType, path: &Path) -> Result<ArrayRef, LoadError> {
    cast(column.as_ref(), to).map_err(|e| LoadError::parse(path, e))
}
