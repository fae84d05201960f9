//! Orbit Planning Tool
//!
//! This binary plans the orbit animation and age labels for a body catalog
//! and prints the result as a table, as JSON, or as the list of calls a
//! scene host would receive.
//!
//! Usage:
//!   cargo run --bin orrery_plan -- [--catalog bodies.json] [--preset dramatized] [--age 30]

use clap::{ArgAction, Parser, ValueEnum};

use orrery::scene::{build_scene, RecordingHost};
use orrery::{plan_catalog, BodyCatalog, CatalogPlan, PeriodPreset, PlanConfig};

/// Type alias for the error type used throughout this module
type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Preset {
    Real,
    Dramatized,
}

impl From<Preset> for PeriodPreset {
    fn from(preset: Preset) -> Self {
        match preset {
            Preset::Real => PeriodPreset::Real,
            Preset::Dramatized => PeriodPreset::Dramatized,
        }
    }
}

/// Orbit Planning Tool
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Plans orbit keyframes and planetary ages for a solar-system scene",
    long_about = None
)]
struct Args {
    /// Body catalog (JSON); the built-in solar system is used when omitted
    #[arg(short, long)]
    catalog: Option<String>,

    /// Plan configuration (JSON); command-line values override it
    #[arg(long)]
    config: Option<String>,

    /// Period preset for the built-in solar system
    #[arg(short, long, value_enum, default_value = "real")]
    preset: Preset,

    /// Reference age on Earth in years
    #[arg(short, long)]
    age: Option<f64>,

    /// Animation frames per Earth day
    #[arg(long)]
    frames_per_day: Option<f64>,

    /// Frame of the first keyframe
    #[arg(long)]
    start_frame: Option<i64>,

    /// Also show each orbit's angle at this frame
    #[arg(short, long)]
    frame: Option<f64>,

    /// Print the plan as JSON
    #[arg(long, action = ArgAction::SetTrue)]
    json: bool,

    /// Print the calls a scene host would receive
    #[arg(long, action = ArgAction::SetTrue)]
    dry_run: bool,

    /// Display debug logging
    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,
}

/// Prints a section header with a title and separator line
fn print_section_header(title: &str) {
    println!("\n{}:", title);
    println!("-------------------------------------------------------");
}

fn load_config(args: &Args) -> Result<PlanConfig> {
    let mut config = match &args.config {
        Some(path) => PlanConfig::from_json_file(path)?,
        None => PlanConfig::default(),
    };
    if let Some(age) = args.age {
        config = config.with_reference_age(age);
    }
    if let Some(fpd) = args.frames_per_day {
        config = config.with_frames_per_day(fpd);
    }
    if let Some(start) = args.start_frame {
        config = config.with_start_frame(start);
    }
    Ok(config)
}

fn load_catalog(args: &Args) -> Result<BodyCatalog> {
    match &args.catalog {
        Some(path) => Ok(BodyCatalog::from_json_file(path)?),
        None => Ok(BodyCatalog::solar_system(args.preset.into())),
    }
}

/// Displays one row per planned body
fn display_plan(plan: &CatalogPlan, config: &PlanConfig, frame: Option<f64>) {
    print_section_header(&format!(
        "Bodies (reference age {} years, {} frames/day)",
        config.reference_age_years, config.frames_per_day
    ));

    print!(
        "{:<10} {:>10} {:>10} {:>10} {:>12} {:>10}",
        "Body", "Parent", "Start", "End", "Scale", "Age"
    );
    match frame {
        Some(f) => println!(" {:>12}", format!("deg@{}", f)),
        None => println!(),
    }

    for body in &plan.bodies {
        let parent = body.parent.as_deref().unwrap_or("-");
        let (start, end) = match &body.schedule {
            Some(s) => (s.start_frame.to_string(), s.end_frame.to_string()),
            None => ("-".to_string(), "-".to_string()),
        };
        print!(
            "{:<10} {:>10} {:>10} {:>10} {:>12.4} {:>10.2}",
            body.name, parent, start, end, body.age.scale_factor, body.age.equivalent_age_years
        );
        match (frame, &body.schedule) {
            (Some(f), Some(s)) => println!(" {:>12.2}", s.angle_at_frame(f).to_degrees()),
            (Some(_), None) => println!(" {:>12}", "-"),
            (None, _) => println!(),
        }
    }

    if !plan.rejected.is_empty() {
        print_section_header("Rejected bodies");
        for rejection in &plan.rejected {
            println!("{}: {}", rejection.body, rejection.error);
        }
    }

    match plan.frame_range() {
        Some((start, end)) => println!("\nScene frame range: {}..={}", start, end),
        None => println!("\nNo animated bodies."),
    }
}

/// Replays the plan into a recording host and prints its calls
fn display_dry_run(plan: &CatalogPlan, config: &PlanConfig) -> Result<()> {
    let mut host = RecordingHost::new();
    let report = build_scene(&mut host, plan, config)?;

    print_section_header("Scene host calls");
    for command in host.commands() {
        println!("{}", command);
    }

    if !report.skipped.is_empty() {
        println!("\nSkipped (parent missing): {}", report.skipped.join(", "));
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_filter = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let config = load_config(&args)?;
    let catalog = load_catalog(&args)?;
    let plan = plan_catalog(&catalog, &config);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
    } else {
        display_plan(&plan, &config, args.frame);
    }

    if args.dry_run {
        display_dry_run(&plan, &config)?;
    }

    Ok(())
}
