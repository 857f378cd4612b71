use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Schema errors
// ---------------------------------------------------------------------------

/// A row that deserialized but does not fit the typed schema.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchemaError {
    #[error("'{field}' must be a non-negative whole number, got {value}")]
    NotWholeNumber { field: &'static str, value: f64 },

    #[error("unknown income label '{0}' (expected Low/High or <=50K/>50K)")]
    UnknownIncome(String),

    #[error("income_numeric is {numeric} but income_classification is {income}")]
    IncomeMismatch { numeric: f64, income: Income },

    #[error("income_classification is {classification} but income is {income}")]
    IncomeConflict { classification: Income, income: Income },

    #[error("row has neither an income_classification nor an income value")]
    MissingIncome,
}

// ---------------------------------------------------------------------------
// Income – the binary target label
// ---------------------------------------------------------------------------

/// Income classification around the $50K threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Income {
    Low,
    High,
}

impl Income {
    pub const ALL: [Income; 2] = [Income::Low, Income::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            Income::Low => "Low",
            Income::High => "High",
        }
    }

    /// The parallel 0/1 encoding.
    pub fn numeric(&self) -> u8 {
        match self {
            Income::Low => 0,
            Income::High => 1,
        }
    }
}

impl fmt::Display for Income {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Income {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // The raw UCI test split carries a trailing period on its labels.
        let label = s.trim().trim_end_matches('.');
        match label {
            "Low" | "<=50K" => Ok(Income::Low),
            "High" | ">50K" => Ok(Income::High),
            _ => Err(SchemaError::UnknownIncome(s.to_string())),
        }
    }
}

impl<'de> Deserialize<'de> for Income {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Column handles
// ---------------------------------------------------------------------------

/// Categorical columns of the schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Column {
    Workclass,
    Education,
    MaritalStatus,
    Occupation,
    Relationship,
    Race,
    Sex,
    NativeCountry,
    Income,
}

impl Column {
    /// Columns the user can filter on, in sidebar order.
    pub const FILTERABLE: [Column; 3] = [Column::Sex, Column::Race, Column::NativeCountry];

    pub const CATEGORICAL: [Column; 9] = [
        Column::Workclass,
        Column::Education,
        Column::MaritalStatus,
        Column::Occupation,
        Column::Relationship,
        Column::Race,
        Column::Sex,
        Column::NativeCountry,
        Column::Income,
    ];

    /// Column name as it appears in the source files.
    pub fn name(&self) -> &'static str {
        match self {
            Column::Workclass => "workclass",
            Column::Education => "education",
            Column::MaritalStatus => "marital-status",
            Column::Occupation => "occupation",
            Column::Relationship => "relationship",
            Column::Race => "race",
            Column::Sex => "sex",
            Column::NativeCountry => "native-country",
            Column::Income => "income_classification",
        }
    }

    /// Human-facing label used by the filter widgets.
    pub fn label(&self) -> &'static str {
        match self {
            Column::Sex => "Gender",
            Column::Race => "Race",
            Column::NativeCountry => "Country",
            Column::Workclass => "Workclass",
            Column::Education => "Education Level",
            Column::MaritalStatus => "Marital Status",
            Column::Occupation => "Occupation",
            Column::Relationship => "Relationship",
            Column::Income => "Income",
        }
    }

    pub fn value<'r>(&self, record: &'r Record) -> &'r str {
        match self {
            Column::Workclass => &record.workclass,
            Column::Education => &record.education,
            Column::MaritalStatus => &record.marital_status,
            Column::Occupation => &record.occupation,
            Column::Relationship => &record.relationship,
            Column::Race => &record.race,
            Column::Sex => &record.sex,
            Column::NativeCountry => &record.native_country,
            Column::Income => record.income.as_str(),
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Numeric columns of the schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NumericColumn {
    Age,
    Fnlwgt,
    EducationNum,
    CapitalGain,
    CapitalLoss,
    HoursPerWeek,
    IncomeNumeric,
}

impl NumericColumn {
    pub const ALL: [NumericColumn; 7] = [
        NumericColumn::Age,
        NumericColumn::Fnlwgt,
        NumericColumn::EducationNum,
        NumericColumn::CapitalGain,
        NumericColumn::CapitalLoss,
        NumericColumn::HoursPerWeek,
        NumericColumn::IncomeNumeric,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            NumericColumn::Age => "age",
            NumericColumn::Fnlwgt => "fnlwgt",
            NumericColumn::EducationNum => "education-num",
            NumericColumn::CapitalGain => "capital-gain",
            NumericColumn::CapitalLoss => "capital-loss",
            NumericColumn::HoursPerWeek => "hours-per-week",
            NumericColumn::IncomeNumeric => "income_numeric",
        }
    }

    /// `None` only for `fnlwgt`, which some variants drop.
    pub fn value(&self, record: &Record) -> Option<f64> {
        match self {
            NumericColumn::Age => Some(record.age as f64),
            NumericColumn::Fnlwgt => record.fnlwgt,
            NumericColumn::EducationNum => Some(record.education_num as f64),
            NumericColumn::CapitalGain => Some(record.capital_gain),
            NumericColumn::CapitalLoss => Some(record.capital_loss),
            NumericColumn::HoursPerWeek => Some(record.hours_per_week as f64),
            NumericColumn::IncomeNumeric => Some(record.income.numeric() as f64),
        }
    }
}

impl fmt::Display for NumericColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// RawRecord – one row exactly as serde sees it
// ---------------------------------------------------------------------------

/// Loosely typed row; converted into a [`Record`] once at load time.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RawRecord {
    pub age: f64,
    pub workclass: String,
    #[serde(default)]
    pub fnlwgt: Option<f64>,
    pub education: String,
    pub education_num: f64,
    pub marital_status: String,
    pub occupation: String,
    pub relationship: String,
    pub race: String,
    pub sex: String,
    pub capital_gain: f64,
    pub capital_loss: f64,
    pub hours_per_week: f64,
    pub native_country: String,
    #[serde(rename = "income_classification", default)]
    pub income_classification: Option<Income>,
    /// Raw census label; files may carry it next to the derived classification.
    #[serde(default)]
    pub income: Option<Income>,
    #[serde(rename = "income_numeric", default)]
    pub income_numeric: Option<f64>,
}

fn whole_number(field: &'static str, value: f64) -> Result<u32, SchemaError> {
    if value.fract() != 0.0 || value < 0.0 || value > u32::MAX as f64 {
        return Err(SchemaError::NotWholeNumber { field, value });
    }
    Ok(value as u32)
}

// ---------------------------------------------------------------------------
// Record – one validated row
// ---------------------------------------------------------------------------

/// One individual of the census extract.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub age: u32,
    pub workclass: String,
    pub fnlwgt: Option<f64>,
    pub education: String,
    pub education_num: u32,
    pub marital_status: String,
    pub occupation: String,
    pub relationship: String,
    pub race: String,
    pub sex: String,
    pub capital_gain: f64,
    pub capital_loss: f64,
    pub hours_per_week: u32,
    pub native_country: String,
    pub income: Income,
}

impl TryFrom<RawRecord> for Record {
    type Error = SchemaError;

    fn try_from(raw: RawRecord) -> Result<Self, Self::Error> {
        let income = match (raw.income_classification, raw.income) {
            (Some(classification), Some(income)) if classification != income => {
                return Err(SchemaError::IncomeConflict {
                    classification,
                    income,
                })
            }
            (Some(label), _) | (None, Some(label)) => label,
            (None, None) => return Err(SchemaError::MissingIncome),
        };
        if let Some(numeric) = raw.income_numeric {
            if numeric != income.numeric() as f64 {
                return Err(SchemaError::IncomeMismatch { numeric, income });
            }
        }
        Ok(Record {
            age: whole_number("age", raw.age)?,
            workclass: raw.workclass.trim().to_string(),
            fnlwgt: raw.fnlwgt,
            education: raw.education.trim().to_string(),
            education_num: whole_number("education-num", raw.education_num)?,
            marital_status: raw.marital_status.trim().to_string(),
            occupation: raw.occupation.trim().to_string(),
            relationship: raw.relationship.trim().to_string(),
            race: raw.race.trim().to_string(),
            sex: raw.sex.trim().to_string(),
            capital_gain: raw.capital_gain,
            capital_loss: raw.capital_loss,
            hours_per_week: whole_number("hours-per-week", raw.hours_per_week)?,
            native_country: raw.native_country.trim().to_string(),
            income,
        })
    }
}

impl Record {
    /// Render the cell under a source column name for table display.
    pub fn cell(&self, column_name: &str) -> String {
        if let Some(col) = Column::CATEGORICAL.iter().find(|c| c.name() == column_name) {
            return col.value(self).to_string();
        }
        if column_name == "income" {
            return self.income.to_string();
        }
        match NumericColumn::ALL.iter().find(|c| c.name() == column_name) {
            Some(col) => match col.value(self) {
                Some(v) if v.fract() == 0.0 => format!("{v:.0}"),
                Some(v) => format!("{v:.2}"),
                None => String::new(),
            },
            None => String::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Dataset – one loaded file
// ---------------------------------------------------------------------------

/// Which of the three files a dataset came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DatasetVariant {
    Baseline,
    WithOutliers,
    WithoutOutliers,
}

impl DatasetVariant {
    pub const ALL: [DatasetVariant; 3] = [
        DatasetVariant::Baseline,
        DatasetVariant::WithOutliers,
        DatasetVariant::WithoutOutliers,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            DatasetVariant::Baseline => "baseline",
            DatasetVariant::WithOutliers => "with outliers",
            DatasetVariant::WithoutOutliers => "without outliers",
        }
    }
}

/// The full parsed dataset with pre-computed filter options.
#[derive(Debug, Clone)]
pub struct Dataset {
    /// All rows, in file order.
    pub records: Vec<Record>,
    /// Column names in file order.
    pub column_names: Vec<String>,
    /// Distinct values of each filterable column, in first-appearance order.
    pub unique_values: BTreeMap<Column, Vec<String>>,
}

impl Dataset {
    pub fn from_records(records: Vec<Record>, column_names: Vec<String>) -> Self {
        let mut unique_values = BTreeMap::new();
        for col in Column::FILTERABLE {
            let mut seen = HashSet::new();
            let values: Vec<String> = records
                .iter()
                .map(|r| col.value(r))
                .filter(|v| seen.insert(*v))
                .map(str::to_string)
                .collect();
            unique_values.insert(col, values);
        }
        Dataset {
            records,
            column_names,
            unique_values,
        }
    }

    /// Distinct values offered for a filter column.
    pub fn options(&self, column: Column) -> &[String] {
        self.unique_values
            .get(&column)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// A plausible row; tests override the fields they care about.
    pub fn record(sex: &str, race: &str, country: &str, income: Income) -> Record {
        Record {
            age: 37,
            workclass: "Private".to_string(),
            fnlwgt: Some(215_646.0),
            education: "HS-grad".to_string(),
            education_num: 9,
            marital_status: "Never-married".to_string(),
            occupation: "Adm-clerical".to_string(),
            relationship: "Not-in-family".to_string(),
            race: race.to_string(),
            sex: sex.to_string(),
            capital_gain: 0.0,
            capital_loss: 0.0,
            hours_per_week: 40,
            native_country: country.to_string(),
            income,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::record;
    use super::*;

    #[test]
    fn income_accepts_both_label_styles() {
        assert_eq!("Low".parse::<Income>(), Ok(Income::Low));
        assert_eq!(" >50K.".parse::<Income>(), Ok(Income::High));
        assert_eq!("<=50K".parse::<Income>(), Ok(Income::Low));
        assert!(matches!(
            "maybe".parse::<Income>(),
            Err(SchemaError::UnknownIncome(_))
        ));
    }

    fn raw() -> RawRecord {
        RawRecord {
            age: 39.0,
            workclass: " State-gov".to_string(),
            fnlwgt: None,
            education: "Bachelors".to_string(),
            education_num: 13.0,
            marital_status: "Never-married".to_string(),
            occupation: "Adm-clerical".to_string(),
            relationship: "Not-in-family".to_string(),
            race: "White".to_string(),
            sex: "Male".to_string(),
            capital_gain: 2174.0,
            capital_loss: 0.0,
            hours_per_week: 40.0,
            native_country: "United-States".to_string(),
            income_classification: Some(Income::Low),
            income: None,
            income_numeric: Some(0.0),
        }
    }

    #[test]
    fn raw_record_converts_and_trims() {
        let rec = Record::try_from(raw()).unwrap();
        assert_eq!(rec.age, 39);
        assert_eq!(rec.workclass, "State-gov");
        assert_eq!(rec.income, Income::Low);
    }

    #[test]
    fn fractional_age_is_rejected() {
        let mut r = raw();
        r.age = 39.5;
        assert_eq!(
            Record::try_from(r),
            Err(SchemaError::NotWholeNumber {
                field: "age",
                value: 39.5
            })
        );
    }

    #[test]
    fn inconsistent_income_numeric_is_rejected() {
        let mut r = raw();
        r.income_numeric = Some(1.0);
        assert!(matches!(
            Record::try_from(r),
            Err(SchemaError::IncomeMismatch { .. })
        ));
    }

    #[test]
    fn classification_wins_and_must_agree_with_raw_income() {
        let mut r = raw();
        r.income = Some(Income::Low);
        assert_eq!(Record::try_from(r.clone()).unwrap().income, Income::Low);

        r.income = Some(Income::High);
        assert_eq!(
            Record::try_from(r.clone()),
            Err(SchemaError::IncomeConflict {
                classification: Income::Low,
                income: Income::High
            })
        );

        r.income_classification = None;
        r.income_numeric = Some(1.0);
        assert_eq!(Record::try_from(r.clone()).unwrap().income, Income::High);

        r.income = None;
        assert_eq!(Record::try_from(r), Err(SchemaError::MissingIncome));
    }

    #[test]
    fn unique_values_keep_first_appearance_order() {
        let ds = Dataset::from_records(
            vec![
                record("Male", "White", "Cuba", Income::Low),
                record("Female", "Black", "Cuba", Income::High),
                record("Male", "Asian-Pac-Islander", "India", Income::Low),
            ],
            Vec::new(),
        );
        assert_eq!(ds.options(Column::Sex), ["Male", "Female"]);
        assert_eq!(ds.options(Column::NativeCountry), ["Cuba", "India"]);
        assert!(ds.options(Column::Education).is_empty());
    }

    #[test]
    fn cell_renders_by_source_name() {
        let rec = record("Female", "White", "Cuba", Income::High);
        assert_eq!(rec.cell("sex"), "Female");
        assert_eq!(rec.cell("income"), "High");
        assert_eq!(rec.cell("hours-per-week"), "40");
        assert_eq!(rec.cell("income_numeric"), "1");
        assert_eq!(rec.cell("nope"), "");
    }
}
