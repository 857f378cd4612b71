use std::collections::{BTreeMap, BTreeSet};

use super::model::{Column, Record};

// ---------------------------------------------------------------------------
// Filter selection: which values are permitted per column
// ---------------------------------------------------------------------------

/// Per-column selection: maps column → set of permitted values.
/// A column that is absent or has an empty set imposes no constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSelection {
    selected: BTreeMap<Column, BTreeSet<String>>,
}

impl FilterSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style: permit exactly `values` for `column`.
    pub fn with_values<I, S>(mut self, column: Column, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selected
            .insert(column, values.into_iter().map(Into::into).collect());
        self
    }

    /// Add `value` to the column's set, or remove it if already present.
    pub fn toggle(&mut self, column: Column, value: &str) {
        let set = self.selected.entry(column).or_default();
        if !set.remove(value) {
            set.insert(value.to_string());
        }
    }

    pub fn clear(&mut self, column: Column) {
        self.selected.remove(&column);
    }

    pub fn clear_all(&mut self) {
        self.selected.clear();
    }

    pub fn selected(&self, column: Column) -> Option<&BTreeSet<String>> {
        self.selected.get(&column)
    }

    pub fn is_selected(&self, column: Column, value: &str) -> bool {
        self.selected
            .get(&column)
            .is_some_and(|set| set.contains(value))
    }

    /// Whether the column currently restricts anything.
    pub fn is_active(&self, column: Column) -> bool {
        self.selected.get(&column).is_some_and(|set| !set.is_empty())
    }

    /// True when no column restricts anything.
    pub fn is_empty(&self) -> bool {
        self.selected.values().all(BTreeSet::is_empty)
    }

    /// AND across columns, OR within a column's set.
    pub fn matches(&self, record: &Record) -> bool {
        self.selected
            .iter()
            .filter(|(_, set)| !set.is_empty())
            .all(|(col, set)| set.contains(col.value(record)))
    }
}

/// Return the rows that pass every active column filter, in input order.
pub fn apply_filters<'a, I>(rows: I, selection: &FilterSelection) -> Vec<&'a Record>
where
    I: IntoIterator<Item = &'a Record>,
{
    if selection.is_empty() {
        return rows.into_iter().collect();
    }
    rows.into_iter().filter(|r| selection.matches(r)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::fixtures::record;
    use crate::data::model::Income;

    fn table() -> Vec<Record> {
        vec![
            record("Male", "White", "United-States", Income::High),
            record("Male", "Black", "Mexico", Income::Low),
            record("Female", "White", "United-States", Income::Low),
            record("Female", "Asian-Pac-Islander", "India", Income::High),
            record("Female", "Black", "United-States", Income::Low),
        ]
    }

    #[test]
    fn empty_selection_is_identity() {
        let t = table();
        let out = apply_filters(&t, &FilterSelection::new());
        assert_eq!(out, t.iter().collect::<Vec<_>>());
    }

    #[test]
    fn empty_set_for_a_column_is_no_restriction() {
        let t = table();
        let sel = FilterSelection::new().with_values(Column::Race, Vec::<String>::new());
        assert!(sel.is_empty());
        assert_eq!(apply_filters(&t, &sel).len(), t.len());
    }

    #[test]
    fn selecting_female_keeps_three_rows_in_order() {
        let t = table();
        let sel = FilterSelection::new().with_values(Column::Sex, ["Female"]);
        let out = apply_filters(&t, &sel);
        assert_eq!(out, vec![&t[2], &t[3], &t[4]]);
    }

    #[test]
    fn and_across_columns_or_within_column() {
        let t = table();
        let sel = FilterSelection::new()
            .with_values(Column::Race, ["White", "Black"])
            .with_values(Column::NativeCountry, ["United-States"]);
        let out = apply_filters(&t, &sel);
        assert_eq!(out, vec![&t[0], &t[2], &t[4]]);
        for row in out {
            assert!(["White", "Black"].contains(&row.race.as_str()));
            assert_eq!(row.native_country, "United-States");
        }
    }

    #[test]
    fn filtering_is_idempotent() {
        let t = table();
        let sel = FilterSelection::new()
            .with_values(Column::Sex, ["Female"])
            .with_values(Column::Race, ["Black", "White"]);
        let once = apply_filters(&t, &sel);
        let twice = apply_filters(once.iter().copied(), &sel);
        assert_eq!(once, twice);
    }

    #[test]
    fn unknown_country_yields_empty_table() {
        let t = table();
        let sel = FilterSelection::new().with_values(Column::NativeCountry, ["Atlantis"]);
        assert!(apply_filters(&t, &sel).is_empty());
    }

    #[test]
    fn toggle_adds_then_removes() {
        let mut sel = FilterSelection::new();
        sel.toggle(Column::Sex, "Male");
        assert!(sel.is_selected(Column::Sex, "Male"));
        assert!(sel.is_active(Column::Sex));
        sel.toggle(Column::Sex, "Male");
        assert!(!sel.is_active(Column::Sex));
        assert!(sel.is_empty());
    }
}
