use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use serde::Serialize;

const AGGREGATE: &str = "European Union - 27 countries (from 2020)";
const FIRST_YEAR: i32 = 2012;
const LAST_YEAR: i32 = 2023;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

#[derive(Debug, Clone, Serialize)]
struct PanelRow {
    country: String,
    year: i32,
    final_cons_ktoe: Option<f64>,
    index_2012: Option<f64>,
    growth_pct: Option<f64>,
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Random-walk consumption per country, with index and growth derived from it.
fn generate_rows(rng: &mut SimpleRng) -> Vec<PanelRow> {
    // (country, 2012 consumption in ktoe, mean yearly drift in %)
    let countries: [(&str, f64, f64); 12] = [
        ("Ireland", 10_700.0, 0.6),
        ("France", 145_000.0, -0.9),
        ("Germany", 213_000.0, -0.7),
        ("Spain", 80_000.0, -0.4),
        ("Italy", 118_000.0, -0.8),
        ("Netherlands", 48_000.0, -0.6),
        ("Belgium", 35_000.0, -0.3),
        ("Portugal", 16_000.0, 0.2),
        ("Poland", 62_000.0, 1.1),
        ("Denmark", 14_000.0, -0.2),
        ("Austria", 27_000.0, 0.1),
        ("Malta", 450.0, 2.5),
    ];

    let mut rows = Vec::new();
    let mut totals = vec![0.0; (LAST_YEAR - FIRST_YEAR + 1) as usize];

    for &(country, base, drift) in &countries {
        let mut level = base;
        let mut previous: Option<f64> = None;
        for (i, year) in (FIRST_YEAR..=LAST_YEAR).enumerate() {
            if year > FIRST_YEAR {
                level *= 1.0 + rng.gauss(drift, 2.0) / 100.0;
            }
            totals[i] += level;
            rows.push(PanelRow {
                country: country.to_string(),
                year,
                final_cons_ktoe: Some(round2(level)),
                index_2012: Some(round2(level / base * 100.0)),
                growth_pct: previous.map(|p| round2((level / p - 1.0) * 100.0)),
            });
            previous = Some(level);
        }
    }

    let base_total = totals[0];
    for (i, year) in (FIRST_YEAR..=LAST_YEAR).enumerate() {
        rows.push(PanelRow {
            country: AGGREGATE.to_string(),
            year,
            final_cons_ktoe: Some(round2(totals[i])),
            index_2012: Some(round2(totals[i] / base_total * 100.0)),
            growth_pct: (i > 0).then(|| round2((totals[i] / totals[i - 1] - 1.0) * 100.0)),
        });
    }
    rows
}

fn write_csv(rows: &[PanelRow], path: &str) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating {path}"))?;
    for row in rows {
        writer.serialize(row).context("writing CSV row")?;
    }
    // Cells the loader has to coerce away: an unparseable year drops the
    // row, an unparseable number becomes null.
    writer.write_record(["Ireland", "not_a_year", "1.0", "1.0", "1.0"])?;
    writer.write_record(["  Denmark  ", "2024", "N/A", "", ""])?;
    writer.flush()?;
    Ok(())
}

fn write_parquet(rows: &[PanelRow], path: &str) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("country", DataType::Utf8, false),
        Field::new("year", DataType::Int64, false),
        Field::new("final_cons_ktoe", DataType::Float64, true),
        Field::new("index_2012", DataType::Float64, true),
        Field::new("growth_pct", DataType::Float64, true),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(StringArray::from(
                rows.iter().map(|r| r.country.as_str()).collect::<Vec<_>>(),
            )),
            Arc::new(Int64Array::from(
                rows.iter().map(|r| r.year as i64).collect::<Vec<_>>(),
            )),
            Arc::new(Float64Array::from(
                rows.iter().map(|r| r.final_cons_ktoe).collect::<Vec<_>>(),
            )),
            Arc::new(Float64Array::from(
                rows.iter().map(|r| r.index_2012).collect::<Vec<_>>(),
            )),
            Arc::new(Float64Array::from(
                rows.iter().map(|r| r.growth_pct).collect::<Vec<_>>(),
            )),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).with_context(|| format!("creating {path}"))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let rows = generate_rows(&mut rng);

    let csv_path = "sample_panel.csv";
    let parquet_path = "sample_panel.parquet";
    write_csv(&rows, csv_path)?;
    write_parquet(&rows, parquet_path)?;

    println!(
        "Wrote {} rows ({FIRST_YEAR}-{LAST_YEAR}) to {csv_path} and {parquet_path}",
        rows.len()
    );
    Ok(())
}
