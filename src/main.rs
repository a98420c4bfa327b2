// Entry point and interactive control surface.
//
// Settings arrive as CLI flags and can then be adjusted through a numbered
// menu; every render recomputes the whole dashboard from the cached table
// and the current settings. `--headless` renders once with the flag values
// and exits, for scripted runs.
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;

use gender_dashboard::filter::{self, FilterSelection};
use gender_dashboard::loader::{self, LoadedTable};
use gender_dashboard::output::{self, RenderReport};
use gender_dashboard::palette::{self, CustomColors, PaletteSource, RgbColor};
use gender_dashboard::types::ViewMode;
use gender_dashboard::util;
use gender_dashboard::DashboardError;

/// Command-line arguments for the dashboard.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the headcount CSV
    #[arg(long, default_value = "spec_gender_counts_2019_2023.csv")]
    data: PathBuf,

    /// Directory the chart specs, data tables and legend are exported into
    #[arg(long, default_value = "dashboard_out")]
    out_dir: PathBuf,

    /// Render once with the flag-provided settings and exit
    #[arg(long)]
    headless: bool,

    /// Years to include: 'all', 'none' or a comma-separated list
    #[arg(long, default_value = "all")]
    years: String,

    /// Specialisations to include: 'all', 'none' or a comma-separated list
    #[arg(long, default_value = "all")]
    specialisations: String,

    /// Palette source: default, paired, okabe-ito or custom
    #[arg(long, default_value = "default")]
    palette: String,

    /// Force the colorblind-friendly Okabe-Ito palette
    #[arg(long)]
    colorblind: bool,

    /// Custom color for Female, as #RRGGBB
    #[arg(long, default_value = "#FF6B6B")]
    female_color: String,

    /// Custom color for Male, as #RRGGBB
    #[arg(long, default_value = "#4169E1")]
    male_color: String,

    /// Custom color for Diverse, as #RRGGBB
    #[arg(long, default_value = "#95B8D1")]
    diverse_color: String,

    /// Initial view mode: by-specialisation or year-summary
    #[arg(long, default_value = "by-specialisation")]
    view_mode: String,
}

/// The mutable dashboard state: the loaded table plus the viewer's current
/// settings. Renders never mutate it, so any number of renders can follow
/// one another.
struct Session {
    table: Arc<LoadedTable>,
    out_dir: PathBuf,
    selection: FilterSelection,
    view_mode: ViewMode,
    palette: PaletteSource,
    colorblind: bool,
    custom: CustomColors,
}

impl Session {
    fn from_args(args: &Args, table: Arc<LoadedTable>) -> Result<Self, DashboardError> {
        let years = filter::distinct_years(&table.rows);
        let names = filter::distinct_specialisations(&table.rows);
        let selection = FilterSelection {
            years: util::parse_year_selection(&args.years, &years)?,
            specialisations: util::parse_specialisation_selection(&args.specialisations, &names)?,
        };
        Ok(Self {
            out_dir: args.out_dir.clone(),
            selection,
            view_mode: args.view_mode.parse()?,
            palette: args.palette.parse()?,
            colorblind: args.colorblind,
            custom: CustomColors {
                female: args.female_color.parse()?,
                male: args.male_color.parse()?,
                diverse: args.diverse_color.parse()?,
            },
            table,
        })
    }

    fn render(&self) -> Result<RenderReport, DashboardError> {
        let filtered = filter::apply(&self.table.rows, &self.selection);
        let mapping = palette::resolve(self.palette, self.colorblind, &self.custom);
        output::render_dashboard(
            &filtered,
            &self.selection,
            self.view_mode,
            &mapping,
            &self.out_dir,
        )
    }

    fn print_settings(&self) {
        let mapping = palette::resolve(self.palette, self.colorblind, &self.custom);
        let years: Vec<String> = self.selection.years.iter().map(i32::to_string).collect();
        println!("\nCurrent settings:");
        println!(
            "  Years: {}",
            if years.is_empty() {
                "none".to_string()
            } else {
                years.join(", ")
            }
        );
        println!(
            "  Specialisations: {} of {}",
            self.selection.specialisations.len(),
            self.table.report.distinct_specialisations
        );
        println!("  View mode: {}", self.view_mode.label());
        println!(
            "  Palette: {}{}",
            self.palette.label(),
            if self.colorblind {
                " [colorblind override]"
            } else {
                ""
            }
        );
        println!(
            "  Colours: Female {} / Male {} / Diverse {}\n",
            mapping.female.hex(),
            mapping.male.hex(),
            mapping.diverse.hex()
        );
    }

    fn prompt_years(&mut self) {
        let available = filter::distinct_years(&self.table.rows);
        let listed: Vec<String> = available.iter().map(i32::to_string).collect();
        println!("Available years: {}", listed.join(", "));
        loop {
            let input = read_line_with_prompt("Select years ('all', 'none' or comma-separated): ");
            match util::parse_year_selection(&input, &available) {
                Ok(years) => {
                    self.selection.years = years;
                    return;
                }
                Err(e) => println!("{}", e),
            }
        }
    }

    fn prompt_specialisations(&mut self) {
        let available = filter::distinct_specialisations(&self.table.rows);
        println!("Available specialisations: {}", available.join(", "));
        loop {
            let input =
                read_line_with_prompt("Select specialisations ('all', 'none' or comma-separated): ");
            match util::parse_specialisation_selection(&input, &available) {
                Ok(names) => {
                    self.selection.specialisations = names;
                    return;
                }
                Err(e) => println!("{}", e),
            }
        }
    }

    fn prompt_view_mode(&mut self) {
        for (i, mode) in ViewMode::ALL.iter().enumerate() {
            println!("[{}] {}", i + 1, mode.label());
        }
        match read_choice().parse::<usize>() {
            Ok(n) if (1..=ViewMode::ALL.len()).contains(&n) => {
                self.view_mode = ViewMode::ALL[n - 1];
            }
            _ => println!("Invalid choice. Keeping {}.", self.view_mode.label()),
        }
    }

    fn prompt_palette(&mut self) {
        for (i, source) in PaletteSource::ALL.iter().enumerate() {
            println!("[{}] {}", i + 1, source.label());
        }
        match read_choice().parse::<usize>() {
            Ok(n) if (1..=PaletteSource::ALL.len()).contains(&n) => {
                self.palette = PaletteSource::ALL[n - 1];
                if self.palette == PaletteSource::Custom {
                    self.prompt_custom_colors();
                }
            }
            _ => println!("Invalid choice. Keeping {}.", self.palette.label()),
        }
    }

    fn prompt_custom_colors(&mut self) {
        self.custom.female = prompt_color("Female", self.custom.female);
        self.custom.male = prompt_color("Male", self.custom.male);
        self.custom.diverse = prompt_color("Diverse", self.custom.diverse);
    }

    fn run_menu(&mut self) {
        loop {
            self.print_settings();
            println!("Dashboard Controls:");
            println!("[1] Select years");
            println!("[2] Select specialisations");
            println!("[3] Switch view mode");
            println!("[4] Choose palette source");
            println!("[5] Toggle colorblind-friendly palette");
            println!("[6] Edit custom colours");
            println!("[7] Render dashboard");
            println!("[8] Quit\n");
            match read_choice().as_str() {
                "1" => self.prompt_years(),
                "2" => self.prompt_specialisations(),
                "3" => self.prompt_view_mode(),
                "4" => self.prompt_palette(),
                "5" => {
                    self.colorblind = !self.colorblind;
                    println!(
                        "Colorblind-friendly palette {}.",
                        if self.colorblind { "enabled" } else { "disabled" }
                    );
                }
                "6" => self.prompt_custom_colors(),
                "7" => {
                    println!();
                    if let Err(e) = self.render() {
                        eprintln!("Render failed: {}", e);
                    }
                    if !prompt_back_to_menu() {
                        println!("Exiting the dashboard.");
                        break;
                    }
                }
                "8" => {
                    println!("Exiting the dashboard.");
                    break;
                }
                _ => println!("Invalid choice. Please enter a number from 1 to 8."),
            }
        }
    }
}

fn read_line_with_prompt(prompt: &str) -> String {
    print!("{}", prompt);
    let _ = io::stdout().flush();
    let mut buf = String::new();
    io::stdin().read_line(&mut buf).ok();
    buf.trim().to_string()
}

/// Read a single line of input after printing the common "Enter choice:" prompt.
fn read_choice() -> String {
    read_line_with_prompt("Enter choice: ")
}

/// Ask whether to go back to the controls menu after a render.
///
/// Returns `true` if the user chose `Y`, `false` if they chose `N`.
fn prompt_back_to_menu() -> bool {
    loop {
        let resp = read_line_with_prompt("Back to Dashboard Controls (Y/N): ").to_uppercase();
        match resp.as_str() {
            "Y" => return true,
            "N" => return false,
            _ => println!("Invalid choice. Please enter Y or N."),
        }
    }
}

fn prompt_color(label: &str, current: RgbColor) -> RgbColor {
    loop {
        let input = read_line_with_prompt(&format!("{} colour [{}]: ", label, current.hex()));
        if input.is_empty() {
            return current;
        }
        match input.parse::<RgbColor>() {
            Ok(color) => return color,
            Err(e) => println!("{}", e),
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt::init();

    let table = loader::load_cached(&args.data)
        .with_context(|| format!("loading dataset '{}'", args.data.display()))?;
    println!(
        "Loaded {} rows covering {} years and {} specialisations.",
        util::format_int(table.report.total_rows),
        table.report.distinct_years,
        table.report.distinct_specialisations
    );

    let mut session = Session::from_args(&args, table).context("invalid dashboard settings")?;

    if args.headless {
        println!();
        let report = session.render()?;
        if report.failures > 0 {
            bail!("{} artifact(s) failed to export", report.failures);
        }
        return Ok(());
    }

    session.run_menu();
    Ok(())
}
