use crate::types::{
    Gender, Row, RowGenderCount, SpecGenderCount, SpecGenderShare, YearGenderCount,
};
use std::collections::{BTreeMap, HashMap};

/// Group the filtered table by year, sum the three gender columns, and melt
/// wide → long in the fixed gender order. Years ascend; each triple carries
/// the year's summed total.
pub fn counts_by_year(rows: &[Row]) -> Vec<YearGenderCount> {
    let mut groups: BTreeMap<i32, [u64; 3]> = BTreeMap::new();
    for r in rows {
        let sums = groups.entry(r.year).or_insert([0; 3]);
        for (i, gender) in Gender::ALL.iter().enumerate() {
            sums[i] += r.count(*gender);
        }
    }
    let mut out = Vec::with_capacity(groups.len() * 3);
    for (year, sums) in groups {
        let year_total: u64 = sums.iter().sum();
        for (i, gender) in Gender::ALL.iter().enumerate() {
            out.push(YearGenderCount {
                year,
                gender: *gender,
                count: sums[i],
                year_total,
            });
        }
    }
    out
}

/// Group by specialisation and melt, ranked by descending group total so the
/// chart layer can lay out its axis without recomputing; ties break by name.
pub fn counts_by_specialisation(rows: &[Row]) -> Vec<SpecGenderCount> {
    let mut out = Vec::new();
    for (name, sums) in grouped_by_specialisation(rows) {
        let group_total: u64 = sums.iter().sum();
        for (i, gender) in Gender::ALL.iter().enumerate() {
            out.push(SpecGenderCount {
                specialisation: name.clone(),
                gender: *gender,
                count: sums[i],
                group_total,
            });
        }
    }
    out
}

/// Percentage-normalized variant of [`counts_by_specialisation`]: each
/// gender sum divided by its group total. A zero-total group keeps its key
/// but reports every share as undefined.
pub fn shares_by_specialisation(rows: &[Row]) -> Vec<SpecGenderShare> {
    let mut out = Vec::new();
    for (name, sums) in grouped_by_specialisation(rows) {
        let group_total: u64 = sums.iter().sum();
        for (i, gender) in Gender::ALL.iter().enumerate() {
            let share = if group_total == 0 {
                None
            } else {
                Some(sums[i] as f64 / group_total as f64)
            };
            out.push(SpecGenderShare {
                specialisation: name.clone(),
                gender: *gender,
                share,
                group_total,
            });
        }
    }
    out
}

/// Melt every filtered row into (year, specialisation, gender, count)
/// records, preserving row order and the fixed gender order within a row.
pub fn melt_counts(rows: &[Row]) -> Vec<RowGenderCount> {
    let mut out = Vec::with_capacity(rows.len() * 3);
    for r in rows {
        for gender in Gender::ALL {
            out.push(RowGenderCount {
                year: r.year,
                specialisation: r.specialisation.clone(),
                gender,
                count: r.count(gender),
            });
        }
    }
    out
}

// Shared accumulation for the two specialisation-keyed aggregates:
// returns (name, [female, male, diverse]) ranked by descending summed total,
// ties by name.
fn grouped_by_specialisation(rows: &[Row]) -> Vec<(String, [u64; 3])> {
    let mut groups: HashMap<String, [u64; 3]> = HashMap::new();
    for r in rows {
        let sums = groups.entry(r.specialisation.clone()).or_insert([0; 3]);
        for (i, gender) in Gender::ALL.iter().enumerate() {
            sums[i] += r.count(*gender);
        }
    }
    let mut ranked: Vec<(String, [u64; 3])> = groups.into_iter().collect();
    ranked.sort_by(|a, b| {
        let total_a: u64 = a.1.iter().sum();
        let total_b: u64 = b.1.iter().sum();
        total_b.cmp(&total_a).then_with(|| a.0.cmp(&b.0))
    });
    ranked
}
