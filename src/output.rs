// Presentation pass: terminal previews plus exported artifacts.
//
// `render_dashboard` recomputes every derived table and chart spec from the
// filtered rows and the active settings, prints the dashboard sections in
// their fixed order, and writes the chart/data/legend artifacts into the
// output directory. Individual write failures are reported per file and do
// not abort the pass; only an unusable output directory is fatal.
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tabled::{settings::Style, Table, Tabled};

use crate::aggregate;
use crate::charts::{self, DistributionKind};
use crate::derive;
use crate::error::DashboardError;
use crate::filter::FilterSelection;
use crate::palette::ColorMapping;
use crate::types::{
    DerivedRow, Gender, MeltedCountRow, RawTableRow, Row, RowGenderCount, SpecGenderCount,
    SpecGenderShare, SpecialisationBreakdownRow, SpecialisationShareRow, SummaryTotals,
    ViewMode, YearBreakdownRow, YearGenderCount,
};
use crate::util::{format_fraction, format_int, format_share};

pub const TITLE: &str = "Engineering Specialisation Gender Dashboard";
pub const CAPTION: &str =
    "Data for 2019 to 2023: Diverse indicates students counted in a diversity category.";

const PREVIEW_ROWS: usize = 6;
const RAW_PREVIEW_ROWS: usize = 10;

pub fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<(), DashboardError> {
    let export_err = |e: String| DashboardError::Export {
        path: path.to_path_buf(),
        message: e,
    };
    let mut wtr = csv::Writer::from_path(path).map_err(|e| export_err(e.to_string()))?;
    for r in rows {
        wtr.serialize(r).map_err(|e| export_err(e.to_string()))?;
    }
    wtr.flush().map_err(|e| export_err(e.to_string()))?;
    Ok(())
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), DashboardError> {
    let export_err = |e: String| DashboardError::Export {
        path: path.to_path_buf(),
        message: e,
    };
    let s = serde_json::to_string_pretty(value).map_err(|e| export_err(e.to_string()))?;
    fs::write(path, s).map_err(|e| export_err(e.to_string()))?;
    Ok(())
}

pub fn write_text(path: &Path, contents: &str) -> Result<(), DashboardError> {
    fs::write(path, contents).map_err(|e| DashboardError::Export {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

pub fn preview_table_rows<T>(rows: &[T], max_rows: usize)
where
    T: Tabled + Clone,
{
    let slice: Vec<T> = rows.iter().cloned().take(max_rows).collect();
    if slice.is_empty() {
        println!("(no rows)\n");
        return;
    }
    let table_str = Table::new(slice).with(Style::markdown()).to_string();
    println!("{}\n", table_str);
}

/// Derived rows in raw-table order: ascending (year, specialisation).
pub fn sorted_for_display(derived: &[DerivedRow]) -> Vec<DerivedRow> {
    let mut sorted = derived.to_vec();
    sorted.sort_by(|a, b| {
        a.year
            .cmp(&b.year)
            .then_with(|| a.specialisation.cmp(&b.specialisation))
    });
    sorted
}

/// One preview row per derived row, in the order given.
pub fn raw_table_rows(derived: &[DerivedRow]) -> Vec<RawTableRow> {
    derived
        .iter()
        .map(|r| RawTableRow {
            year: r.year,
            specialisation: r.specialisation.clone(),
            female: format_int(r.female),
            male: format_int(r.male),
            diverse: format_int(r.diverse),
            total_headcount: format_int(r.total_headcount),
            female_pct: format_fraction(r.female_pct, 4),
            male_pct: format_fraction(r.male_pct, 4),
            diverse_pct: format_fraction(r.diverse_pct, 4),
        })
        .collect()
}

pub fn year_breakdown_rows(agg: &[YearGenderCount]) -> Vec<YearBreakdownRow> {
    agg.iter()
        .map(|r| YearBreakdownRow {
            year: r.year,
            gender: r.gender.label().to_string(),
            count: format_int(r.count),
            year_total: format_int(r.year_total),
        })
        .collect()
}

pub fn specialisation_breakdown_rows(agg: &[SpecGenderCount]) -> Vec<SpecialisationBreakdownRow> {
    agg.iter()
        .map(|r| SpecialisationBreakdownRow {
            specialisation: r.specialisation.clone(),
            gender: r.gender.label().to_string(),
            count: format_int(r.count),
            group_total: format_int(r.group_total),
        })
        .collect()
}

pub fn melted_count_rows(agg: &[RowGenderCount]) -> Vec<MeltedCountRow> {
    agg.iter()
        .map(|r| MeltedCountRow {
            year: r.year,
            specialisation: r.specialisation.clone(),
            gender: r.gender.label().to_string(),
            count: format_int(r.count),
        })
        .collect()
}

pub fn specialisation_share_rows(agg: &[SpecGenderShare]) -> Vec<SpecialisationShareRow> {
    agg.iter()
        .map(|r| SpecialisationShareRow {
            specialisation: r.specialisation.clone(),
            gender: r.gender.label().to_string(),
            percentage: format_share(r.share),
            group_total: format_int(r.group_total),
        })
        .collect()
}

fn esc(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Self-contained HTML snippet documenting the current color mapping: one
/// 14px swatch per gender plus a usage hint. Deterministic for a given
/// mapping, so the file only changes when the mapping does.
pub fn render_legend_html(colors: &ColorMapping) -> String {
    let mut html = String::new();
    html.push_str("<div style='display:flex;gap:12px;align-items:center'>\n");
    html.push_str("  <div style='display:flex;flex-direction:column;gap:4px'>\n");
    for g in Gender::ALL {
        html.push_str(&format!(
            "    <div><span style='display:inline-block;width:14px;height:14px;background:{};border-radius:3px;margin-right:8px'></span>{}</div>\n",
            colors.color(g).hex(),
            esc(g.label())
        ));
    }
    html.push_str("  </div>\n");
    html.push_str("  <div style='padding-left:12px;color:#555'>\n");
    html.push_str(
        "    <small>Choose a palette or pick custom colours from the menu. Enable the colorblind-friendly option to force a colorblind-safe set.</small>\n",
    );
    html.push_str("  </div>\n");
    html.push_str("</div>\n");
    html
}

/// The four headline metrics. Shares of an empty selection print as `n/a`.
pub fn print_metrics(totals: &SummaryTotals) {
    println!("Total students: {}", format_int(totals.total_headcount));
    println!("Female share:   {}", format_share(totals.female_share()));
    println!("Male share:     {}", format_share(totals.male_share()));
    println!("Diverse count:  {}", format_int(totals.total_diverse));
}

/// Everything `summary.json` carries: the headline numbers plus the settings
/// that produced them, stamped with the generation time.
#[derive(Debug, Serialize)]
pub struct SummaryExport {
    pub generated_at: DateTime<Utc>,
    pub years: Vec<i32>,
    pub specialisations: Vec<String>,
    pub view_mode: String,
    pub colors: ColorMapping,
    pub total_headcount: u64,
    pub total_female: u64,
    pub total_male: u64,
    pub total_diverse: u64,
    pub female_share: Option<f64>,
    pub male_share: Option<f64>,
    pub diverse_share: Option<f64>,
}

/// What a render pass produced.
#[derive(Debug, Default)]
pub struct RenderReport {
    pub written: Vec<PathBuf>,
    pub failures: usize,
}

impl RenderReport {
    fn export(&mut self, path: PathBuf, outcome: Result<(), DashboardError>) {
        match outcome {
            Ok(()) => {
                tracing::debug!(path = %path.display(), "artifact written");
                self.written.push(path);
            }
            Err(e) => {
                eprintln!("Write error: {}", e);
                self.failures += 1;
            }
        }
    }
}

/// Run the full presentation pass over an already-filtered table.
///
/// Prints the dashboard sections in their fixed order and exports the chart
/// specs, data tables, legend and summary into `out_dir`.
pub fn render_dashboard(
    rows: &[Row],
    selection: &FilterSelection,
    view_mode: ViewMode,
    colors: &ColorMapping,
    out_dir: &Path,
) -> Result<RenderReport, DashboardError> {
    fs::create_dir_all(out_dir).map_err(|e| DashboardError::Export {
        path: out_dir.to_path_buf(),
        message: e.to_string(),
    })?;

    let derived = derive::derive_row_percentages(rows);
    let totals = derive::summary_totals(rows);
    let by_year = aggregate::counts_by_year(rows);
    let by_spec = aggregate::counts_by_specialisation(rows);
    let spec_shares = aggregate::shares_by_specialisation(rows);
    let melted = aggregate::melt_counts(rows);

    let mut report = RenderReport::default();

    println!("{}", TITLE);
    println!("{}\n", CAPTION);
    print_metrics(&totals);

    // Gender distribution: pie for a single selected year, stacked bar
    // across years otherwise.
    match charts::distribution_kind(selection) {
        DistributionKind::Pie => println!("\n### Gender distribution (Selected year)\n"),
        DistributionKind::StackedBar => println!("\n### Stacked bar chart (All selected years)\n"),
    }
    preview_table_rows(&year_breakdown_rows(&by_year), PREVIEW_ROWS);
    let path = out_dir.join("gender_distribution.vl.json");
    let outcome = write_json(
        &path,
        &charts::gender_distribution(selection, &totals, &by_year, colors),
    );
    report.export(path, outcome);
    let path = out_dir.join("counts_by_year.csv");
    let outcome = write_csv(&path, &by_year);
    report.export(path, outcome);

    println!("### Current colour mapping\n");
    for g in Gender::ALL {
        println!("{:<8} {}", g.label(), colors.color(g).hex());
    }
    println!();
    let path = out_dir.join("legend.html");
    let outcome = write_text(&path, &render_legend_html(colors));
    report.export(path, outcome);

    println!("\n### Stacked bar chart by specialisation (All years combined)\n");
    preview_table_rows(&specialisation_breakdown_rows(&by_spec), PREVIEW_ROWS);
    let path = out_dir.join("counts_by_specialisation.vl.json");
    let outcome = write_json(&path, &charts::specialisation_counts(&by_spec, colors));
    report.export(path, outcome);
    let path = out_dir.join("counts_by_specialisation.csv");
    let outcome = write_csv(&path, &by_spec);
    report.export(path, outcome);

    println!("### Gender distribution by specialisation (All years combined)\n");
    preview_table_rows(&specialisation_share_rows(&spec_shares), PREVIEW_ROWS);
    let path = out_dir.join("shares_by_specialisation.vl.json");
    let outcome = write_json(&path, &charts::specialisation_shares(&spec_shares, colors));
    report.export(path, outcome);
    let path = out_dir.join("shares_by_specialisation.csv");
    let outcome = write_csv(&path, &spec_shares);
    report.export(path, outcome);

    println!("### Stacked gender counts\n");
    println!("(View mode: {})\n", view_mode.label());
    match view_mode {
        ViewMode::BySpecialisation => {
            preview_table_rows(&melted_count_rows(&melted), PREVIEW_ROWS)
        }
        ViewMode::YearSummary => preview_table_rows(&year_breakdown_rows(&by_year), PREVIEW_ROWS),
    }
    let path = out_dir.join("stacked_gender_counts.vl.json");
    let outcome = write_json(
        &path,
        &charts::stacked_gender_counts(view_mode, &melted, &by_year, colors),
    );
    report.export(path, outcome);

    println!("### Female percentage by specialisation and year\n");
    let path = out_dir.join("female_share_trend.vl.json");
    let outcome = write_json(&path, &charts::female_share_trend(&derived));
    report.export(path, outcome);

    println!("### Raw table\n");
    let display = sorted_for_display(&derived);
    preview_table_rows(&raw_table_rows(&display), RAW_PREVIEW_ROWS);
    let path = out_dir.join("filtered_rows.csv");
    let outcome = write_csv(&path, &display);
    report.export(path, outcome);

    let summary = SummaryExport {
        generated_at: Utc::now(),
        years: selection.years.iter().copied().collect(),
        specialisations: selection.specialisations.iter().cloned().collect(),
        view_mode: view_mode.label().to_string(),
        colors: *colors,
        total_headcount: totals.total_headcount,
        total_female: totals.total_female,
        total_male: totals.total_male,
        total_diverse: totals.total_diverse,
        female_share: totals.female_share(),
        male_share: totals.male_share(),
        diverse_share: totals.diverse_share(),
    };
    let path = out_dir.join("summary.json");
    let outcome = write_json(&path, &summary);
    report.export(path, outcome);
    println!(
        "Summary (summary.json): {{\"total_headcount\": {}, \"female_share\": {}}}",
        totals.total_headcount,
        format_share(totals.female_share())
    );
    println!(
        "({} artifacts exported to {})\n",
        report.written.len(),
        out_dir.display()
    );

    Ok(report)
}
