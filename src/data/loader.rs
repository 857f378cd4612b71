use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::Array;
use arrow::util::display::array_value_to_string;
use csv::StringRecord;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{Dataset, DatasetVariant, RawRecord, Record};
use crate::config::DashboardConfig;

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a census dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with the schema's column names (recommended)
/// * `.json`    – `[{ "age": 39, "sex": "Male", ... }, ...]`
/// * `.parquet` – one column per schema field
pub fn load_file(path: &Path) -> Result<Dataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
}

/// The three variants, loaded independently and never merged.
#[derive(Debug, Clone)]
pub struct Datasets {
    pub baseline: Dataset,
    pub with_outliers: Dataset,
    pub without_outliers: Dataset,
}

impl Datasets {
    pub fn get(&self, variant: DatasetVariant) -> &Dataset {
        match variant {
            DatasetVariant::Baseline => &self.baseline,
            DatasetVariant::WithOutliers => &self.with_outliers,
            DatasetVariant::WithoutOutliers => &self.without_outliers,
        }
    }
}

/// Load every variant named in the config from `data_dir`.
pub fn load_datasets(config: &DashboardConfig, data_dir: &Path) -> Result<Datasets> {
    let load = |variant: DatasetVariant| -> Result<Dataset> {
        let path = data_dir.join(config.file_for(variant));
        let dataset = load_file(&path)
            .with_context(|| format!("loading {} dataset from {}", variant.label(), path.display()))?;
        log::info!(
            "Loaded {} rows ({} dataset) with columns {:?}",
            dataset.len(),
            variant.label(),
            dataset.column_names
        );
        Ok(dataset)
    };

    Ok(Datasets {
        baseline: load(DatasetVariant::Baseline)?,
        with_outliers: load(DatasetVariant::WithOutliers)?,
        without_outliers: load(DatasetVariant::WithoutOutliers)?,
    })
}

fn validate(raw: RawRecord, row_no: usize) -> Result<Record> {
    Record::try_from(raw).with_context(|| format!("Row {row_no}: invalid record"))
}

/// pandas writes its index as an unnamed leading column (CSV) or as
/// `__index_level_N__` (Parquet with a non-default index).
fn is_index_column(name: &str) -> bool {
    name.is_empty()
        || name.starts_with("Unnamed:")
        || (name.starts_with("__index_level_") && name.ends_with("__"))
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one person per row.
/// Cells are trimmed; unknown columns are ignored.
fn load_csv(path: &Path) -> Result<Dataset> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .context("opening CSV")?;
    let headers = reader.headers().context("reading CSV headers")?.clone();

    let mut records = Vec::new();
    for (i, result) in reader.deserialize::<RawRecord>().enumerate() {
        let row_no = i + 1;
        let raw = result.with_context(|| format!("CSV row {row_no}"))?;
        records.push(validate(raw, row_no)?);
    }

    let column_names = headers
        .iter()
        .filter(|h| !is_index_column(h))
        .map(str::to_string)
        .collect();
    Ok(Dataset::from_records(records, column_names))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "age": 39, "workclass": "State-gov", ..., "income_classification": "Low" },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<Dataset> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let rows = root.as_array().context("Expected top-level JSON array")?;

    let column_names = match rows.first().and_then(JsonValue::as_object) {
        Some(obj) => obj.keys().filter(|k| !is_index_column(k)).cloned().collect(),
        None => Vec::new(),
    };

    let mut records = Vec::with_capacity(rows.len());
    for (i, row) in rows.iter().enumerate() {
        let row_no = i + 1;
        let raw: RawRecord = serde_json::from_value(row.clone())
            .with_context(|| format!("JSON row {row_no}"))?;
        records.push(validate(raw, row_no)?);
    }

    Ok(Dataset::from_records(records, column_names))
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one column per schema field.
///
/// Each row is rendered to text and fed through the same serde path as CSV,
/// so files written by pandas (`df.to_parquet()`) and Polars
/// (`df.write_parquet()`) both work regardless of their integer widths.
fn load_parquet(path: &Path) -> Result<Dataset> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut records = Vec::new();
    let mut column_names: Vec<String> = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();

        let headers: StringRecord = schema.fields().iter().map(|f| f.name().as_str()).collect();
        if column_names.is_empty() {
            column_names = headers
                .iter()
                .filter(|h| !is_index_column(h))
                .map(str::to_string)
                .collect();
        }

        for row in 0..batch.num_rows() {
            let row_no = records.len() + 1;
            let mut cells = StringRecord::new();
            for col in batch.columns() {
                cells.push_field(&cell_text(col, row).with_context(|| format!("Row {row_no}"))?);
            }
            let raw: RawRecord = cells
                .deserialize(Some(&headers))
                .with_context(|| format!("Parquet row {row_no}"))?;
            records.push(validate(raw, row_no)?);
        }
    }

    Ok(Dataset::from_records(records, column_names))
}

/// Text form of one Arrow cell; nulls become empty strings.
fn cell_text(col: &Arc<dyn Array>, row: usize) -> Result<String> {
    if col.is_null(row) {
        return Ok(String::new());
    }
    Ok(array_value_to_string(col.as_ref(), row)?)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use arrow::array::{Float64Array, Int64Array, StringArray};
    use arrow::datatypes::{DataType, Field, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;

    use super::*;
    use crate::data::model::{Column, Income};

    const HEADER: &str = ",age,workclass,education,education-num,marital-status,occupation,\
relationship,race,sex,capital-gain,capital-loss,hours-per-week,native-country,\
income_classification,income_numeric";

    fn write_file(dir: &Path, name: &str, body: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(body.as_bytes()).unwrap();
        path
    }

    #[test]
    fn loads_cleaned_csv() {
        let dir = tempfile::tempdir().unwrap();
        let body = format!(
            "{HEADER}\n\
0,39,State-gov,Bachelors,13,Never-married,Adm-clerical,Not-in-family,White,Male,2174,0,40,United-States,Low,0\n\
1,52.0,Self-emp-inc,HS-grad,9.0,Married-civ-spouse,Exec-managerial,Husband,White, Female ,15024,0,40,Cuba,High,1\n"
        );
        let path = write_file(dir.path(), "adults.csv", &body);

        let ds = load_file(&path).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.column_names.len(), 15);
        assert_eq!(ds.column_names[0], "age");
        assert_eq!(ds.records[1].age, 52);
        assert_eq!(ds.records[1].sex, "Female");
        assert_eq!(ds.records[1].income, Income::High);
        assert_eq!(ds.records[0].fnlwgt, None);
        assert_eq!(ds.options(Column::NativeCountry), ["United-States", "Cuba"]);
    }

    #[test]
    fn accepts_raw_income_labels_without_numeric_column() {
        let dir = tempfile::tempdir().unwrap();
        let body = "age,workclass,fnlwgt,education,education-num,marital-status,occupation,\
relationship,race,sex,capital-gain,capital-loss,hours-per-week,native-country,income\n\
39,State-gov,77516,Bachelors,13,Never-married,Adm-clerical,Not-in-family,White,Male,2174,0,40,United-States,<=50K\n\
50,Private,83311,Bachelors,13,Married-civ-spouse,Exec-managerial,Husband,White,Male,0,0,13,United-States,>50K.\n";
        let path = write_file(dir.path(), "raw.csv", body);

        let ds = load_file(&path).unwrap();
        assert_eq!(ds.records[0].income, Income::Low);
        assert_eq!(ds.records[1].income, Income::High);
        assert_eq!(ds.records[0].fnlwgt, Some(77516.0));
    }

    #[test]
    fn accepts_raw_and_derived_income_columns_together() {
        let dir = tempfile::tempdir().unwrap();
        let body = "age,workclass,fnlwgt,education,education-num,marital-status,occupation,\
relationship,race,sex,capital-gain,capital-loss,hours-per-week,native-country,income,\
income_classification,income_numeric\n\
39,State-gov,77516,Bachelors,13,Never-married,Adm-clerical,Not-in-family,White,Male,2174,0,40,United-States,<=50K,Low,0\n\
50,Private,83311,Bachelors,13,Married-civ-spouse,Exec-managerial,Husband,White,Male,0,0,13,United-States,>50K,High,1\n";
        let path = write_file(dir.path(), "both.csv", body);

        let ds = load_file(&path).unwrap();
        assert_eq!(ds.records[0].income, Income::Low);
        assert_eq!(ds.records[1].income, Income::High);
        assert_eq!(ds.column_names.len(), 17);
    }

    #[test]
    fn disagreeing_income_columns_name_the_row() {
        let dir = tempfile::tempdir().unwrap();
        let body = "age,workclass,education,education-num,marital-status,occupation,\
relationship,race,sex,capital-gain,capital-loss,hours-per-week,native-country,income,\
income_classification\n\
39,State-gov,Bachelors,13,Never-married,Adm-clerical,Not-in-family,White,Male,0,0,40,Cuba,>50K,Low\n";
        let path = write_file(dir.path(), "conflict.csv", body);

        let msg = format!("{:#}", load_file(&path).unwrap_err());
        assert!(msg.contains("Row 1"), "{msg}");
        assert!(msg.contains("income is High"), "{msg}");
    }

    #[test]
    fn invalid_row_names_its_position() {
        let dir = tempfile::tempdir().unwrap();
        let body = format!(
            "{HEADER}\n\
0,39,State-gov,Bachelors,13,Never-married,Adm-clerical,Not-in-family,White,Male,0,0,40,Cuba,Low,0\n\
1,39,State-gov,Bachelors,13,Never-married,Adm-clerical,Not-in-family,White,Male,0,0,40.5,Cuba,Low,0\n"
        );
        let path = write_file(dir.path(), "bad.csv", &body);

        let err = load_file(&path).unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("Row 2"), "{msg}");
        assert!(msg.contains("hours-per-week"), "{msg}");
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_file(&dir.path().join("absent.csv")).is_err());
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "data.xlsx", "");
        let err = load_file(&path).unwrap_err();
        assert!(err.to_string().contains(".xlsx"));
    }

    #[test]
    fn loads_records_oriented_json() {
        let dir = tempfile::tempdir().unwrap();
        let body = r#"[{"age": 28, "workclass": "Private", "education": "Masters",
            "education-num": 14, "marital-status": "Married-civ-spouse",
            "occupation": "Prof-specialty", "relationship": "Wife", "race": "Black",
            "sex": "Female", "capital-gain": 0, "capital-loss": 0,
            "hours-per-week": 40, "native-country": "Cuba",
            "income_classification": "High", "income_numeric": 1}]"#;
        let path = write_file(dir.path(), "adults.json", body);

        let ds = load_file(&path).unwrap();
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.records[0].education_num, 14);
        assert_eq!(ds.records[0].race, "Black");
        assert!(ds.column_names.contains(&"hours-per-week".to_string()));
        assert_eq!(ds.column_names[0..2], ["age", "workclass"]);
        assert_eq!(ds.column_names.last().map(String::as_str), Some("income_numeric"));
    }

    #[test]
    fn loads_parquet() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("adults.parquet");

        let text = |name: &str, v: &str| {
            (
                Field::new(name, DataType::Utf8, false),
                Arc::new(StringArray::from(vec![v, v])) as Arc<dyn Array>,
            )
        };
        let int = |name: &str, a: i64, b: i64| {
            (
                Field::new(name, DataType::Int64, false),
                Arc::new(Int64Array::from(vec![a, b])) as Arc<dyn Array>,
            )
        };
        let float = |name: &str, v: f64| {
            (
                Field::new(name, DataType::Float64, false),
                Arc::new(Float64Array::from(vec![v, v])) as Arc<dyn Array>,
            )
        };
        let columns = vec![
            int("__index_level_0__", 10, 11),
            int("age", 30, 45),
            text("workclass", "Private"),
            text("education", "Bachelors"),
            int("education-num", 13, 13),
            text("marital-status", "Divorced"),
            text("occupation", "Sales"),
            text("relationship", "Unmarried"),
            text("race", "White"),
            text("sex", "Female"),
            float("capital-gain", 0.0),
            float("capital-loss", 0.0),
            int("hours-per-week", 38, 50),
            text("native-country", "Canada"),
            text("income_classification", "Low"),
        ];
        let (fields, arrays): (Vec<Field>, Vec<Arc<dyn Array>>) = columns.into_iter().unzip();
        let schema = Arc::new(Schema::new(fields));
        let batch = RecordBatch::try_new(schema.clone(), arrays).unwrap();

        let file = std::fs::File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let ds = load_file(&path).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records[1].age, 45);
        assert_eq!(ds.records[1].hours_per_week, 50);
        assert_eq!(ds.records[0].native_country, "Canada");
        assert_eq!(ds.column_names.len(), 14);
        assert_eq!(ds.column_names[0], "age");
    }

    #[test]
    fn load_datasets_reads_all_three_files() {
        let dir = tempfile::tempdir().unwrap();
        let config = DashboardConfig::default();
        let row = "0,39,State-gov,Bachelors,13,Never-married,Adm-clerical,Not-in-family,White,Male,0,0,40,Cuba,Low,0";
        for variant in DatasetVariant::ALL {
            write_file(dir.path(), config.file_for(variant), &format!("{HEADER}\n{row}\n"));
        }

        let sets = load_datasets(&config, dir.path()).unwrap();
        assert_eq!(sets.get(DatasetVariant::WithoutOutliers).len(), 1);

        std::fs::remove_file(dir.path().join(config.file_for(DatasetVariant::WithOutliers)))
            .unwrap();
        let err = load_datasets(&config, dir.path()).unwrap_err();
        assert!(format!("{err:#}").contains("with outliers"));
    }
}
