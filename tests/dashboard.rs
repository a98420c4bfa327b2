//! End-to-end test: a CSV on disk through load, filter and a full render pass.

use std::collections::BTreeSet;
use std::fs;

use tempfile::tempdir;

use gender_dashboard::filter::{self, FilterSelection};
use gender_dashboard::loader;
use gender_dashboard::output;
use gender_dashboard::palette::{resolve, CustomColors, PaletteSource};
use gender_dashboard::types::ViewMode;

const DATA: &str = "\
Year,Specialisation,Female,Male,Diverse,Total_headcount
2019,Civil,22,58,5,85
2019,Software,40,120,10,170
2020,Civil,25,60,5,90
2020,Software,45,125,10,180
";

fn write_dataset(dir: &std::path::Path) -> std::path::PathBuf {
    let path = dir.join("headcounts.csv");
    fs::write(&path, DATA).unwrap();
    path
}

fn read_json(path: &std::path::Path) -> serde_json::Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn full_render_pass_over_all_years() {
    let dir = tempdir().unwrap();
    let table = loader::load(&write_dataset(dir.path())).unwrap();
    assert_eq!(table.report.total_rows, 4);
    assert_eq!(table.report.distinct_years, 2);

    let selection = FilterSelection::all_of(&table.rows);
    let filtered = filter::apply(&table.rows, &selection);
    let colors = resolve(PaletteSource::Default, false, &CustomColors::default());
    let out_dir = dir.path().join("out");
    let report = output::render_dashboard(
        &filtered,
        &selection,
        ViewMode::BySpecialisation,
        &colors,
        &out_dir,
    )
    .unwrap();
    assert_eq!(report.failures, 0);

    for file in [
        "gender_distribution.vl.json",
        "counts_by_year.csv",
        "legend.html",
        "counts_by_specialisation.vl.json",
        "counts_by_specialisation.csv",
        "shares_by_specialisation.vl.json",
        "shares_by_specialisation.csv",
        "stacked_gender_counts.vl.json",
        "female_share_trend.vl.json",
        "filtered_rows.csv",
        "summary.json",
    ] {
        assert!(out_dir.join(file).exists(), "missing {file}");
    }

    // Two selected years, so the distribution region is a stacked bar.
    let distribution = read_json(&out_dir.join("gender_distribution.vl.json"));
    assert_eq!(distribution["mark"]["type"], "bar");
    assert_eq!(
        distribution["encoding"]["color"]["scale"]["range"],
        serde_json::json!(["#ff6b6b", "#4169e1", "#95b8d1"])
    );

    let summary = read_json(&out_dir.join("summary.json"));
    assert_eq!(summary["total_headcount"], 85 + 170 + 90 + 180);
    assert_eq!(summary["total_female"], 22 + 40 + 25 + 45);
    assert_eq!(summary["years"], serde_json::json!([2019, 2020]));
    assert!(summary["generated_at"].as_str().unwrap().starts_with("20"));

    // Specialisations rank by descending combined headcount.
    let by_spec = fs::read_to_string(out_dir.join("counts_by_specialisation.csv")).unwrap();
    let mut lines = by_spec.lines();
    assert_eq!(
        lines.next().unwrap(),
        "Specialisation,Gender,Count,GroupTotal"
    );
    assert_eq!(lines.next().unwrap(), "Software,Female,85,350");

    let filtered_csv = fs::read_to_string(out_dir.join("filtered_rows.csv")).unwrap();
    let mut lines = filtered_csv.lines();
    assert_eq!(
        lines.next().unwrap(),
        "Year,Specialisation,Female,Male,Diverse,Total_headcount,Female_pct,Male_pct,Diverse_pct"
    );
    assert!(lines.next().unwrap().starts_with("2019,Civil,22,58,5,85,"));

    let legend = fs::read_to_string(out_dir.join("legend.html")).unwrap();
    for needle in ["Female", "Male", "Diverse", "#ff6b6b"] {
        assert!(legend.contains(needle), "legend missing {needle}");
    }
}

#[test]
fn single_year_selection_switches_to_pie() {
    let dir = tempdir().unwrap();
    let table = loader::load(&write_dataset(dir.path())).unwrap();

    let selection = FilterSelection {
        years: BTreeSet::from([2019]),
        specialisations: BTreeSet::from(["Civil".to_string(), "Software".to_string()]),
    };
    let filtered = filter::apply(&table.rows, &selection);
    assert_eq!(filtered.len(), 2);

    let colors = resolve(PaletteSource::Default, false, &CustomColors::default());
    let out_dir = dir.path().join("out");
    output::render_dashboard(
        &filtered,
        &selection,
        ViewMode::YearSummary,
        &colors,
        &out_dir,
    )
    .unwrap();

    let distribution = read_json(&out_dir.join("gender_distribution.vl.json"));
    assert_eq!(distribution["mark"]["type"], "arc");
    let slices = distribution["data"]["values"].as_array().unwrap();
    assert_eq!(slices.len(), 3);
    assert_eq!(slices[0]["Gender"], "Female");
    assert_eq!(slices[0]["Count"], 22 + 40);

    let summary = read_json(&out_dir.join("summary.json"));
    assert_eq!(summary["total_headcount"], 85 + 170);
    assert_eq!(summary["view_mode"], "Year summary");
}

#[test]
fn colorblind_override_reaches_the_exported_scales() {
    let dir = tempdir().unwrap();
    let table = loader::load(&write_dataset(dir.path())).unwrap();

    let selection = FilterSelection::all_of(&table.rows);
    let filtered = filter::apply(&table.rows, &selection);
    // Paired would normally emit a scheme; the override forces Okabe-Ito.
    let colors = resolve(PaletteSource::ColorBrewerPaired, true, &CustomColors::default());
    let out_dir = dir.path().join("out");
    output::render_dashboard(
        &filtered,
        &selection,
        ViewMode::BySpecialisation,
        &colors,
        &out_dir,
    )
    .unwrap();

    let by_spec = read_json(&out_dir.join("counts_by_specialisation.vl.json"));
    let scale = &by_spec["encoding"]["color"]["scale"];
    assert!(scale.get("scheme").is_none());
    assert_eq!(
        scale["range"],
        serde_json::json!(["#e69f00", "#0072b2", "#009e73"])
    );
}
