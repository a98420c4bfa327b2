// Chart specification builders.
//
// The renderer is an external black box that accepts a data table, encoding
// declarations and a color scale; these builders produce that input as
// Vega-Lite v5 documents with the data embedded inline. Everything here is a
// pure function of the aggregates and the active color mapping.
use serde_json::{json, Value};

use crate::filter::FilterSelection;
use crate::palette::ColorMapping;
use crate::types::{
    DerivedRow, Gender, RowGenderCount, SpecGenderCount, SpecGenderShare, SummaryTotals,
    ViewMode, YearGenderCount,
};

const VEGA_LITE_SCHEMA: &str = "https://vega.github.io/schema/vega-lite/v5.json";

/// Presentation path for the gender-distribution region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistributionKind {
    Pie,
    StackedBar,
}

/// Pie for a single selected year, stacked bar otherwise. A function of
/// `|selection.years|` and nothing else.
pub fn distribution_kind(selection: &FilterSelection) -> DistributionKind {
    if selection.is_single_year() {
        DistributionKind::Pie
    } else {
        DistributionKind::StackedBar
    }
}

fn gender_domain() -> Value {
    json!(Gender::ALL.map(|g| g.label()))
}

fn color_encoding(colors: &ColorMapping) -> Value {
    let scale = match colors.scheme {
        Some(scheme) => json!({ "domain": gender_domain(), "scheme": scheme }),
        None => json!({ "domain": gender_domain(), "range": colors.range() }),
    };
    json!({ "field": "Gender", "type": "nominal", "scale": scale })
}

/// The first chart region: gender distribution over the selection, as a pie
/// (one year) or a stacked bar over years (several).
pub fn gender_distribution(
    selection: &FilterSelection,
    totals: &SummaryTotals,
    by_year: &[YearGenderCount],
    colors: &ColorMapping,
) -> Value {
    match distribution_kind(selection) {
        DistributionKind::Pie => {
            let slices: Vec<Value> = Gender::ALL
                .iter()
                .map(|g| json!({ "Gender": g.label(), "Count": totals.count(*g) }))
                .collect();
            json!({
                "$schema": VEGA_LITE_SCHEMA,
                "title": "Gender distribution (Selected year)",
                "data": { "values": slices },
                "mark": { "type": "arc" },
                "encoding": {
                    "theta": { "field": "Count", "type": "quantitative" },
                    "color": color_encoding(colors),
                    "tooltip": [
                        { "field": "Gender", "type": "nominal" },
                        { "field": "Count", "type": "quantitative" }
                    ]
                },
                "height": 400
            })
        }
        DistributionKind::StackedBar => json!({
            "$schema": VEGA_LITE_SCHEMA,
            "title": "Stacked bar chart (All selected years)",
            "data": { "values": by_year },
            "mark": { "type": "bar" },
            "encoding": {
                "x": { "field": "Year", "type": "ordinal", "title": "Year" },
                "y": { "field": "Count", "type": "quantitative", "title": "Headcount" },
                "color": color_encoding(colors),
                "tooltip": [
                    { "field": "Year", "type": "ordinal" },
                    { "field": "Gender", "type": "nominal" },
                    { "field": "Count", "type": "quantitative" }
                ]
            },
            "height": 400,
            "width": 600
        }),
    }
}

/// Stacked headcounts per specialisation, axis ranked by descending total.
pub fn specialisation_counts(agg: &[SpecGenderCount], colors: &ColorMapping) -> Value {
    json!({
        "$schema": VEGA_LITE_SCHEMA,
        "title": "Stacked bar chart by specialisation (All years combined)",
        "data": { "values": agg },
        "mark": { "type": "bar" },
        "encoding": {
            "x": {
                "field": "Specialisation",
                "type": "nominal",
                "sort": "-y",
                "title": "Specialisation"
            },
            "y": { "field": "Count", "type": "quantitative", "title": "Headcount" },
            "color": color_encoding(colors),
            "tooltip": [
                { "field": "Specialisation", "type": "nominal" },
                { "field": "Gender", "type": "nominal" },
                { "field": "Count", "type": "quantitative" }
            ]
        },
        "height": 400
    })
}

/// Normalized gender shares per specialisation. Undefined shares arrive as
/// JSON `null` and the renderer drops those marks instead of drawing 0%.
pub fn specialisation_shares(agg: &[SpecGenderShare], colors: &ColorMapping) -> Value {
    json!({
        "$schema": VEGA_LITE_SCHEMA,
        "title": "Gender distribution by specialisation (All years combined)",
        "data": { "values": agg },
        "mark": { "type": "bar" },
        "encoding": {
            "x": {
                "field": "Specialisation",
                "type": "nominal",
                "sort": "-y",
                "title": "Specialisation"
            },
            "y": {
                "field": "Percentage",
                "type": "quantitative",
                "stack": "normalize",
                "title": "Percentage",
                "axis": { "format": "%" }
            },
            "color": color_encoding(colors),
            "tooltip": [
                { "field": "Specialisation", "type": "nominal" },
                { "field": "Gender", "type": "nominal" },
                { "field": "Percentage", "type": "quantitative", "format": ".1%" }
            ]
        },
        "height": 400
    })
}

/// The "Stacked gender counts" region: per-year faceted bars of the melted
/// rows, or a year-normalized summary, depending on the view mode.
pub fn stacked_gender_counts(
    mode: ViewMode,
    melted: &[RowGenderCount],
    by_year: &[YearGenderCount],
    colors: &ColorMapping,
) -> Value {
    match mode {
        ViewMode::BySpecialisation => json!({
            "$schema": VEGA_LITE_SCHEMA,
            "title": "Stacked gender counts",
            "data": { "values": melted },
            "mark": { "type": "bar" },
            "encoding": {
                "x": {
                    "field": "Specialisation",
                    "type": "nominal",
                    "sort": "-y",
                    "title": "Specialisation"
                },
                "y": {
                    "aggregate": "sum",
                    "field": "Count",
                    "type": "quantitative",
                    "title": "Headcount"
                },
                "color": color_encoding(colors),
                "column": { "field": "Year", "type": "ordinal", "title": "Year" },
                "tooltip": [
                    { "field": "Year", "type": "ordinal" },
                    { "field": "Specialisation", "type": "nominal" },
                    { "field": "Gender", "type": "nominal" },
                    { "field": "Count", "type": "quantitative" }
                ]
            },
            "width": 180
        }),
        ViewMode::YearSummary => json!({
            "$schema": VEGA_LITE_SCHEMA,
            "title": "Stacked gender counts",
            "data": { "values": by_year },
            "mark": { "type": "bar" },
            "encoding": {
                "x": { "field": "Year", "type": "ordinal" },
                "y": {
                    "field": "Count",
                    "type": "quantitative",
                    "stack": "normalize",
                    "title": "Share of headcount"
                },
                "color": color_encoding(colors),
                "tooltip": [
                    { "field": "Year", "type": "ordinal" },
                    { "field": "Gender", "type": "nominal" },
                    { "field": "Count", "type": "quantitative" }
                ]
            },
            "height": 400
        }),
    }
}

/// Female share over the years, one line per specialisation. Uses the
/// renderer's own categorical colors — the gender mapping does not apply to
/// a specialisation-keyed series.
pub fn female_share_trend(derived: &[DerivedRow]) -> Value {
    json!({
        "$schema": VEGA_LITE_SCHEMA,
        "title": "Female percentage by specialisation and year",
        "data": { "values": derived },
        "mark": { "type": "line", "point": true },
        "encoding": {
            "x": { "field": "Year", "type": "ordinal" },
            "y": {
                "field": "Female_pct",
                "type": "quantitative",
                "axis": { "format": "%" }
            },
            "color": { "field": "Specialisation", "type": "nominal" },
            "tooltip": [
                { "field": "Year", "type": "ordinal" },
                { "field": "Specialisation", "type": "nominal" },
                { "field": "Female_pct", "type": "quantitative", "format": ".1%" }
            ]
        },
        "height": 400
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate;
    use crate::derive;
    use crate::palette::{resolve, CustomColors, PaletteSource};
    use crate::types::Row;
    use std::collections::BTreeSet;

    fn rows() -> Vec<Row> {
        vec![
            Row::new(2019, "Civil", 10, 30, 2, 42),
            Row::new(2020, "Civil", 12, 28, 3, 43),
        ]
    }

    fn mapping() -> ColorMapping {
        resolve(PaletteSource::Default, false, &CustomColors::default())
    }

    fn selection_with_years(years: &[i32]) -> FilterSelection {
        FilterSelection {
            years: years.iter().copied().collect(),
            specialisations: BTreeSet::from(["Civil".to_string()]),
        }
    }

    #[test]
    fn single_year_selection_takes_the_pie_path() {
        let selection = selection_with_years(&[2019]);
        assert_eq!(distribution_kind(&selection), DistributionKind::Pie);
        let totals = derive::summary_totals(&rows()[..1]);
        let by_year = aggregate::counts_by_year(&rows()[..1]);
        let spec = gender_distribution(&selection, &totals, &by_year, &mapping());
        assert_eq!(spec["mark"]["type"], "arc");
        assert_eq!(spec["data"]["values"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn multi_year_selection_takes_the_bar_path() {
        let selection = selection_with_years(&[2019, 2020]);
        assert_eq!(distribution_kind(&selection), DistributionKind::StackedBar);
        let totals = derive::summary_totals(&rows());
        let by_year = aggregate::counts_by_year(&rows());
        let spec = gender_distribution(&selection, &totals, &by_year, &mapping());
        assert_eq!(spec["mark"]["type"], "bar");
        assert_eq!(spec["data"]["values"].as_array().unwrap().len(), 6);
    }

    #[test]
    fn path_choice_ignores_everything_but_the_year_count() {
        let mut a = selection_with_years(&[2019]);
        a.specialisations.clear();
        let b = selection_with_years(&[2019]);
        assert_eq!(distribution_kind(&a), distribution_kind(&b));
        let none = selection_with_years(&[]);
        assert_eq!(distribution_kind(&none), DistributionKind::StackedBar);
    }

    #[test]
    fn color_scale_carries_the_mapping_range() {
        let spec = specialisation_counts(&aggregate::counts_by_specialisation(&rows()), &mapping());
        let scale = &spec["encoding"]["color"]["scale"];
        assert_eq!(scale["domain"], json!(["Female", "Male", "Diverse"]));
        assert_eq!(scale["range"], json!(["#ff6b6b", "#4169e1", "#95b8d1"]));
    }

    #[test]
    fn paired_palette_uses_the_scheme_instead_of_a_range() {
        let colors = resolve(PaletteSource::ColorBrewerPaired, false, &CustomColors::default());
        let spec = specialisation_counts(&aggregate::counts_by_specialisation(&rows()), &colors);
        let scale = &spec["encoding"]["color"]["scale"];
        assert_eq!(scale["scheme"], "paired");
        assert!(scale.get("range").is_none());
    }

    #[test]
    fn undefined_shares_are_embedded_as_null() {
        let zero_rows = vec![Row::new(2019, "Dormant", 0, 0, 0, 0)];
        let spec = specialisation_shares(&aggregate::shares_by_specialisation(&zero_rows), &mapping());
        let values = spec["data"]["values"].as_array().unwrap();
        assert_eq!(values.len(), 3);
        assert!(values.iter().all(|v| v["Percentage"].is_null()));
    }

    #[test]
    fn view_mode_switches_between_facet_and_normalized_summary() {
        let melted = aggregate::melt_counts(&rows());
        let by_year = aggregate::counts_by_year(&rows());
        let faceted =
            stacked_gender_counts(ViewMode::BySpecialisation, &melted, &by_year, &mapping());
        assert_eq!(faceted["encoding"]["column"]["field"], "Year");
        assert_eq!(faceted["width"], 180);

        let summarized = stacked_gender_counts(ViewMode::YearSummary, &melted, &by_year, &mapping());
        assert!(summarized["encoding"].get("column").is_none());
        assert_eq!(summarized["encoding"]["y"]["stack"], "normalize");
        assert_eq!(summarized["encoding"]["y"]["title"], "Share of headcount");
    }

    #[test]
    fn trend_chart_plots_female_share_per_specialisation() {
        let derived = derive::derive_row_percentages(&rows());
        let spec = female_share_trend(&derived);
        assert_eq!(spec["mark"]["type"], "line");
        assert_eq!(spec["mark"]["point"], true);
        assert_eq!(spec["encoding"]["y"]["field"], "Female_pct");
        assert_eq!(spec["encoding"]["color"]["field"], "Specialisation");
        let first = &spec["data"]["values"][0];
        assert!((first["Female_pct"].as_f64().unwrap() - 10.0 / 42.0).abs() < 1e-9);
    }
}
