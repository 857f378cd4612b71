//! Writes a synthetic census extract in the three layouts the dashboard reads.
//!
//! Usage: `generate_sample [OUTPUT_DIR]` (defaults to `data/`).

use std::fs::{self, File};
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use serde::Serialize;

const ROWS: usize = 3000;
const OUTLIERS: usize = 60;

const WORKCLASS: [(&str, f64); 7] = [
    ("Private", 0.70),
    ("Self-emp-not-inc", 0.08),
    ("Local-gov", 0.06),
    ("State-gov", 0.04),
    ("Self-emp-inc", 0.04),
    ("Federal-gov", 0.03),
    ("Without-pay", 0.05),
];

/// Name, education-num, weight.
const EDUCATION: [(&str, u32, f64); 10] = [
    ("HS-grad", 9, 0.32),
    ("Some-college", 10, 0.22),
    ("Bachelors", 13, 0.17),
    ("Masters", 14, 0.05),
    ("Assoc-voc", 11, 0.04),
    ("11th", 7, 0.04),
    ("Assoc-acdm", 12, 0.03),
    ("10th", 6, 0.03),
    ("Prof-school", 15, 0.02),
    ("Doctorate", 16, 0.08),
];

const MARITAL: [(&str, f64); 5] = [
    ("Married-civ-spouse", 0.46),
    ("Never-married", 0.33),
    ("Divorced", 0.14),
    ("Separated", 0.04),
    ("Widowed", 0.03),
];

const OCCUPATION: [(&str, f64); 10] = [
    ("Prof-specialty", 0.14),
    ("Craft-repair", 0.13),
    ("Exec-managerial", 0.13),
    ("Adm-clerical", 0.12),
    ("Sales", 0.12),
    ("Other-service", 0.10),
    ("Machine-op-inspct", 0.07),
    ("Transport-moving", 0.05),
    ("Handlers-cleaners", 0.04),
    ("Tech-support", 0.10),
];

const RACE: [(&str, f64); 5] = [
    ("White", 0.85),
    ("Black", 0.09),
    ("Asian-Pac-Islander", 0.03),
    ("Amer-Indian-Eskimo", 0.01),
    ("Other", 0.02),
];

const COUNTRY: [(&str, f64); 12] = [
    ("United-States", 0.90),
    ("Mexico", 0.02),
    ("Philippines", 0.01),
    ("Germany", 0.01),
    ("Canada", 0.01),
    ("India", 0.01),
    ("England", 0.01),
    ("Cuba", 0.005),
    ("Jamaica", 0.005),
    ("China", 0.005),
    ("Italy", 0.005),
    ("Japan", 0.01),
];

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

    /// Index drawn proportionally to `weights`.
    fn weighted(&mut self, weights: impl Iterator<Item = f64> + Clone) -> usize {
        let total: f64 = weights.clone().sum();
        let mut target = self.next_f64() * total;
        let mut last = 0;
        for (i, w) in weights.enumerate() {
            if target < w {
                return i;
            }
            target -= w;
            last = i;
        }
        last
    }

    fn pick<'a>(&mut self, table: &[(&'a str, f64)]) -> &'a str {
        table[self.weighted(table.iter().map(|(_, w)| *w))].0
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "kebab-case")]
struct SampleRow {
    age: u32,
    workclass: &'static str,
    fnlwgt: u32,
    education: &'static str,
    education_num: u32,
    marital_status: &'static str,
    occupation: &'static str,
    relationship: &'static str,
    race: &'static str,
    sex: &'static str,
    capital_gain: u32,
    capital_loss: u32,
    hours_per_week: u32,
    native_country: &'static str,
    #[serde(rename = "income_classification")]
    income: &'static str,
    #[serde(rename = "income_numeric")]
    income_numeric: u8,
}

fn sample_row(rng: &mut SimpleRng) -> SampleRow {
    let age = rng.gauss(39.0, 12.0).clamp(18.0, 75.0).round() as u32;
    let (education, education_num, _) = EDUCATION[rng.weighted(EDUCATION.iter().map(|e| e.2))];
    let marital_status = rng.pick(&MARITAL);
    let sex = if rng.next_f64() < 0.67 { "Male" } else { "Female" };
    let relationship = match (marital_status, sex) {
        ("Married-civ-spouse", "Male") => "Husband",
        ("Married-civ-spouse", _) => "Wife",
        ("Never-married", _) if age < 25 => "Own-child",
        _ if rng.next_f64() < 0.2 => "Unmarried",
        _ => "Not-in-family",
    };
    let hours_per_week = rng.gauss(40.0, 8.0).clamp(5.0, 70.0).round() as u32;

    let mut score = (education_num as f64 - 9.0) * 0.35
        + (hours_per_week as f64 - 40.0) * 0.04
        + (age as f64 - 30.0) * 0.03;
    if marital_status == "Married-civ-spouse" {
        score += 1.2;
    }
    if sex == "Male" {
        score += 0.4;
    }
    let high = rng.next_f64() < 1.0 / (1.0 + (-(score - 1.5)).exp());

    let capital_gain = if high && rng.next_f64() < 0.15 {
        rng.gauss(8000.0, 3000.0).max(1000.0).round() as u32
    } else {
        0
    };
    let capital_loss = if rng.next_f64() < 0.04 {
        rng.gauss(1900.0, 300.0).max(200.0).round() as u32
    } else {
        0
    };

    SampleRow {
        age,
        workclass: rng.pick(&WORKCLASS),
        fnlwgt: rng.gauss(190_000.0, 100_000.0).max(15_000.0).round() as u32,
        education,
        education_num,
        marital_status,
        occupation: rng.pick(&OCCUPATION),
        relationship,
        race: rng.pick(&RACE),
        sex,
        capital_gain,
        capital_loss,
        hours_per_week,
        native_country: rng.pick(&COUNTRY),
        income: if high { "High" } else { "Low" },
        income_numeric: u8::from(high),
    }
}

/// Same person, pushed to the extremes of age, hours and capital gain.
fn outlier(rng: &mut SimpleRng) -> SampleRow {
    let mut row = sample_row(rng);
    row.age = 78 + (rng.next_u64() % 13) as u32;
    row.hours_per_week = if rng.next_f64() < 0.5 { 99 } else { 1 + (rng.next_u64() % 4) as u32 };
    if rng.next_f64() < 0.5 {
        row.capital_gain = 99_999;
        row.income = "High";
        row.income_numeric = 1;
    }
    row
}

/// Tukey fences (1.5 × IQR) over `values`.
fn fences(mut values: Vec<f64>) -> (f64, f64) {
    values.sort_by(f64::total_cmp);
    let q = |p: f64| {
        let pos = p * (values.len() - 1) as f64;
        let (lo, hi) = (pos.floor() as usize, pos.ceil() as usize);
        values[lo] + (values[hi] - values[lo]) * (pos - lo as f64)
    };
    let (q1, q3) = (q(0.25), q(0.75));
    let iqr = q3 - q1;
    (q1 - 1.5 * iqr, q3 + 1.5 * iqr)
}

fn write_csv(path: &Path, rows: &[SampleRow]) -> Result<()> {
    let mut writer =
        csv::Writer::from_path(path).with_context(|| format!("creating {}", path.display()))?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    println!("Wrote {} rows to {}", rows.len(), path.display());
    Ok(())
}

fn write_parquet(path: &Path, rows: &[SampleRow]) -> Result<()> {
    let ints = |f: fn(&SampleRow) -> i64| -> ArrayRef {
        Arc::new(Int64Array::from(rows.iter().map(f).collect::<Vec<_>>()))
    };
    let strs = |f: fn(&SampleRow) -> &'static str| -> ArrayRef {
        Arc::new(StringArray::from(rows.iter().map(f).collect::<Vec<_>>()))
    };

    let columns: Vec<(&str, ArrayRef)> = vec![
        ("age", ints(|r| r.age as i64)),
        ("workclass", strs(|r| r.workclass)),
        (
            "fnlwgt",
            Arc::new(Float64Array::from(
                rows.iter().map(|r| r.fnlwgt as f64).collect::<Vec<_>>(),
            )) as ArrayRef,
        ),
        ("education", strs(|r| r.education)),
        ("education-num", ints(|r| r.education_num as i64)),
        ("marital-status", strs(|r| r.marital_status)),
        ("occupation", strs(|r| r.occupation)),
        ("relationship", strs(|r| r.relationship)),
        ("race", strs(|r| r.race)),
        ("sex", strs(|r| r.sex)),
        ("capital-gain", ints(|r| r.capital_gain as i64)),
        ("capital-loss", ints(|r| r.capital_loss as i64)),
        ("hours-per-week", ints(|r| r.hours_per_week as i64)),
        ("native-country", strs(|r| r.native_country)),
        ("income_classification", strs(|r| r.income)),
        ("income_numeric", ints(|r| r.income_numeric as i64)),
    ];

    let schema = Arc::new(Schema::new(
        columns
            .iter()
            .map(|(name, array)| Field::new(*name, array.data_type().clone(), false))
            .collect::<Vec<_>>(),
    ));
    let batch = RecordBatch::try_new(
        schema.clone(),
        columns.into_iter().map(|(_, array)| array).collect(),
    )
    .context("Failed to create RecordBatch")?;

    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = ArrowWriter::try_new(file, schema, None)?;
    writer.write(&batch)?;
    writer.close()?;
    println!("Wrote {} rows to {}", rows.len(), path.display());
    Ok(())
}

fn main() -> Result<()> {
    let out_dir = std::env::args().nth(1).unwrap_or_else(|| "data".to_string());
    let out_dir = Path::new(&out_dir);
    fs::create_dir_all(out_dir).with_context(|| format!("creating {}", out_dir.display()))?;

    let mut rng = SimpleRng::new(42);
    let baseline: Vec<SampleRow> = (0..ROWS).map(|_| sample_row(&mut rng)).collect();

    // Scatter the outliers through the file rather than appending them.
    let mut with_outliers = baseline.clone();
    for _ in 0..OUTLIERS {
        let at = (rng.next_u64() % with_outliers.len() as u64) as usize;
        with_outliers.insert(at, outlier(&mut rng));
    }

    let (age_lo, age_hi) = fences(with_outliers.iter().map(|r| r.age as f64).collect());
    let (hours_lo, hours_hi) =
        fences(with_outliers.iter().map(|r| r.hours_per_week as f64).collect());
    let without_outliers: Vec<SampleRow> = with_outliers
        .iter()
        .filter(|r| {
            (age_lo..=age_hi).contains(&(r.age as f64))
                && (hours_lo..=hours_hi).contains(&(r.hours_per_week as f64))
                && r.capital_gain < 99_999
        })
        .cloned()
        .collect();

    write_csv(&out_dir.join("dataset_v1.csv"), &baseline)?;
    write_csv(&out_dir.join("with_outliers_cleaned_adult_dataset.csv"), &with_outliers)?;
    write_csv(&out_dir.join("cleaned_without_outlierv2.csv"), &without_outliers)?;
    write_parquet(&out_dir.join("dataset_v1.parquet"), &baseline)?;
    Ok(())
}
