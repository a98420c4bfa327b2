use crate::types::{DerivedRow, Row, SummaryTotals};

fn share_of(count: u64, total: u64) -> Option<f64> {
    if total == 0 {
        None
    } else {
        Some(count as f64 / total as f64)
    }
}

/// Attach the three per-gender share columns to every row:
/// `count / total_headcount`, or `None` when the row's headcount is 0 —
/// an undefined ratio is reported as absent, never as 0%.
pub fn derive_row_percentages(rows: &[Row]) -> Vec<DerivedRow> {
    rows.iter()
        .map(|r| DerivedRow {
            year: r.year,
            specialisation: r.specialisation.clone(),
            female: r.female,
            male: r.male,
            diverse: r.diverse,
            total_headcount: r.total_headcount,
            female_pct: share_of(r.female, r.total_headcount),
            male_pct: share_of(r.male, r.total_headcount),
            diverse_pct: share_of(r.diverse, r.total_headcount),
        })
        .collect()
}

/// Sum the four count columns over the filtered table. All zeros on empty
/// input; shares derived from the result follow the same zero-denominator
/// policy as the row-level derivation.
pub fn summary_totals(rows: &[Row]) -> SummaryTotals {
    let mut totals = SummaryTotals {
        total_headcount: 0,
        total_female: 0,
        total_male: 0,
        total_diverse: 0,
    };
    for r in rows {
        totals.total_headcount += r.total_headcount;
        totals.total_female += r.female;
        totals.total_male += r.male;
        totals.total_diverse += r.diverse;
    }
    totals
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Gender;

    fn civil_rows() -> Vec<Row> {
        vec![
            Row::new(2019, "Civil", 10, 30, 2, 42),
            Row::new(2020, "Civil", 12, 28, 3, 43),
        ]
    }

    #[test]
    fn row_shares_sum_to_one_when_headcount_is_consistent() {
        let derived = derive_row_percentages(&civil_rows());
        for row in &derived {
            let sum = row.female_pct.unwrap() + row.male_pct.unwrap() + row.diverse_pct.unwrap();
            assert!((sum - 1.0).abs() < 1e-9, "shares summed to {sum}");
        }
        assert!((derived[0].female_pct.unwrap() - 10.0 / 42.0).abs() < 1e-12);
    }

    #[test]
    fn zero_headcount_rows_have_undefined_shares() {
        let rows = vec![Row::new(2021, "Dormant", 0, 0, 0, 0)];
        let derived = derive_row_percentages(&rows);
        for gender in Gender::ALL {
            assert_eq!(derived[0].share(gender), None);
        }
    }

    #[test]
    fn summary_totals_match_the_worked_example() {
        let totals = summary_totals(&civil_rows());
        assert_eq!(totals.total_headcount, 85);
        assert_eq!(totals.total_female, 22);
        assert_eq!(totals.total_male, 58);
        assert_eq!(totals.total_diverse, 5);
        assert!((totals.female_share().unwrap() - 22.0 / 85.0).abs() < 1e-12);
    }

    #[test]
    fn summary_totals_are_zero_on_empty_input_without_raising() {
        let totals = summary_totals(&[]);
        assert_eq!(totals.total_headcount, 0);
        assert_eq!(totals.total_female, 0);
        assert_eq!(totals.total_male, 0);
        assert_eq!(totals.total_diverse, 0);
        assert_eq!(totals.female_share(), None);
        assert_eq!(totals.male_share(), None);
    }

    #[test]
    fn summary_totals_are_idempotent() {
        let rows = civil_rows();
        assert_eq!(summary_totals(&rows), summary_totals(&rows));
    }
}
