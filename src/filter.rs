use crate::types::Row;
use std::collections::BTreeSet;

/// The viewer's current pick of years and specialisations. Both sets are
/// subsets of the values observed in the data source; either may be empty,
/// which is a valid selection that matches nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSelection {
    pub years: BTreeSet<i32>,
    pub specialisations: BTreeSet<String>,
}

impl FilterSelection {
    /// The default selection: everything the data source contains.
    pub fn all_of(rows: &[Row]) -> Self {
        Self {
            years: rows.iter().map(|r| r.year).collect(),
            specialisations: rows.iter().map(|r| r.specialisation.clone()).collect(),
        }
    }

    /// Exactly one year picked. Decides the single-period presentation path
    /// (pie) against the multi-period one (stacked bar).
    pub fn is_single_year(&self) -> bool {
        self.years.len() == 1
    }
}

/// Distinct years in the data source, ascending.
pub fn distinct_years(rows: &[Row]) -> Vec<i32> {
    let set: BTreeSet<i32> = rows.iter().map(|r| r.year).collect();
    set.into_iter().collect()
}

/// Distinct specialisations in the data source, ascending by name.
pub fn distinct_specialisations(rows: &[Row]) -> Vec<String> {
    let set: BTreeSet<String> = rows.iter().map(|r| r.specialisation.clone()).collect();
    set.into_iter().collect()
}

/// Keep the rows whose year and specialisation are both selected,
/// in the original row order.
pub fn apply(rows: &[Row], selection: &FilterSelection) -> Vec<Row> {
    rows.iter()
        .filter(|r| {
            selection.years.contains(&r.year)
                && selection.specialisations.contains(&r.specialisation)
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Row> {
        vec![
            Row::new(2019, "Civil", 10, 30, 2, 42),
            Row::new(2019, "Software", 20, 60, 3, 83),
            Row::new(2020, "Civil", 12, 28, 3, 43),
            Row::new(2020, "Software", 25, 58, 4, 87),
        ]
    }

    #[test]
    fn keeps_exactly_the_matching_rows() {
        let rows = sample();
        let selection = FilterSelection {
            years: BTreeSet::from([2019]),
            specialisations: BTreeSet::from(["Civil".to_string()]),
        };
        let filtered = apply(&rows, &selection);
        assert_eq!(filtered, vec![Row::new(2019, "Civil", 10, 30, 2, 42)]);
    }

    #[test]
    fn both_dimensions_must_match() {
        let rows = sample();
        let selection = FilterSelection {
            years: BTreeSet::from([2019]),
            specialisations: BTreeSet::from(["Software".to_string()]),
        };
        let filtered = apply(&rows, &selection);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].specialisation, "Software");
        assert_eq!(filtered[0].year, 2019);
    }

    #[test]
    fn preserves_source_order() {
        let rows = sample();
        let filtered = apply(&rows, &FilterSelection::all_of(&rows));
        assert_eq!(filtered, rows);
    }

    #[test]
    fn empty_year_set_yields_empty_result() {
        let rows = sample();
        let selection = FilterSelection {
            years: BTreeSet::new(),
            specialisations: BTreeSet::from(["Civil".to_string()]),
        };
        assert!(apply(&rows, &selection).is_empty());
    }

    #[test]
    fn empty_specialisation_set_yields_empty_result() {
        let rows = sample();
        let selection = FilterSelection {
            years: BTreeSet::from([2019, 2020]),
            specialisations: BTreeSet::new(),
        };
        assert!(apply(&rows, &selection).is_empty());
    }

    #[test]
    fn apply_is_pure() {
        let rows = sample();
        let selection = FilterSelection::all_of(&rows);
        assert_eq!(apply(&rows, &selection), apply(&rows, &selection));
    }

    #[test]
    fn distinct_values_are_sorted() {
        let rows = vec![
            Row::new(2021, "Software", 1, 1, 0, 2),
            Row::new(2019, "Civil", 1, 1, 0, 2),
            Row::new(2020, "Civil", 1, 1, 0, 2),
        ];
        assert_eq!(distinct_years(&rows), vec![2019, 2020, 2021]);
        assert_eq!(distinct_specialisations(&rows), vec!["Civil", "Software"]);
    }

    #[test]
    fn single_year_detection() {
        let rows = sample();
        let mut selection = FilterSelection::all_of(&rows);
        assert!(!selection.is_single_year());
        selection.years = BTreeSet::from([2019]);
        assert!(selection.is_single_year());
        selection.years.clear();
        assert!(!selection.is_single_year());
    }
}
