use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;

use pathfield::config::FileConfig;
use pathfield::domain::Point;
use pathfield::field::Field;
use pathfield::render::{RenderOptions, write_svg};

/// Plan a cost-weighted route across a map of polygon obstacles
///
/// Examples:
///   # Plan between the start and end stored in the map
///   pathfield level.xml
///
///   # Override the endpoints and save the map with the new route
///   pathfield level.xml --start 10,10 --end 700,420 -o planned.xml
///
///   # Finer mesh, SVG preview with the sampled grid
///   pathfield level.xml --cell-size 2 --svg preview.svg --grid
#[derive(Parser, Debug)]
#[command(name = "pathfield")]
#[command(version, about, long_about = None)]
struct Args {
    /// Map file to plan on
    map: PathBuf,

    /// Path to config file (optional, auto-searches pathfield.toml if not provided)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Start point as x,y (overrides the map)
    #[arg(long, value_parser = parse_point)]
    start: Option<Point>,

    /// End point as x,y (overrides the map)
    #[arg(long, value_parser = parse_point)]
    end: Option<Point>,

    /// Mesh stride in field units
    #[arg(long)]
    cell_size: Option<u32>,

    /// Spacing between resampled route points
    #[arg(long)]
    interval: Option<f64>,

    /// Save the map, including the planned route, to this file
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Write an SVG preview of the field
    #[arg(long)]
    svg: Option<PathBuf>,

    /// Shade mesh cells in the SVG preview
    #[arg(long, requires = "svg")]
    grid: bool,

    /// Print the result as JSON instead of a summary
    #[arg(long)]
    json: bool,

    /// Enable verbose logging
    #[arg(short = 'v', long)]
    verbose: bool,
}

#[derive(Debug, Serialize)]
struct Report {
    map: PathBuf,
    width: u32,
    height: u32,
    obstacles: usize,
    cell_size: u32,
    start: Option<(i32, i32)>,
    end: Option<(i32, i32)>,
    /// Route cost, or -1 for a missing endpoint and 0 when no route exists
    length: f64,
    error: Option<String>,
    route: Vec<(i32, i32)>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let total_start = Instant::now();

    let file_config = if let Some(ref config_path) = args.config {
        if !config_path.exists() {
            bail!("Config file not found: {:?}", config_path);
        }
        FileConfig::from_path(config_path)?
    } else {
        FileConfig::load().unwrap_or_default()
    };

    let verbose = args.verbose || file_config.verbose;
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if verbose { "debug" } else { "info" }),
    )
    .init();

    let mut planner = file_config.planner.clone();
    if let Some(cell_size) = args.cell_size {
        planner = planner.with_cell_size(cell_size);
    }
    if let Some(interval) = args.interval {
        if interval <= 0.0 {
            bail!("--interval must be positive, got {}", interval);
        }
        planner = planner.with_splice_interval(interval);
    }

    if verbose && !args.json {
        println!("Configuration:");
        println!("  Map: {}", args.map.display());
        println!("  Cell size: {}", planner.cell_size);
        println!("  Splice interval: {}", planner.splice_interval);
        println!("  Grab radius: {}", planner.grab_radius);
        println!();
    }

    let mut field = Field::new(file_config.width, file_config.height, planner);

    let spinner = create_spinner("Loading map...");
    let start = Instant::now();
    field.load_map(&args.map).map_err(|e| {
        anyhow!(
            "Failed to load map {} (code {}): {}",
            args.map.display(),
            e.code(),
            e
        )
    })?;
    spinner.finish_with_message(format!(
        "Loaded {}x{} field with {} obstacles [{:.1}s]",
        field.width(),
        field.height(),
        field.count(),
        start.elapsed().as_secs_f32()
    ));

    if let Some(p) = args.start {
        field.set_start(p);
    }
    if let Some(p) = args.end {
        field.set_end(p);
    }

    let spinner = create_spinner("Planning route...");
    let start = Instant::now();
    let outcome = field.find_path();
    let length = match outcome {
        Ok(cost) => {
            spinner.finish_with_message(format!(
                "Route cost {:.2} over {} points [{:.1}s]",
                cost,
                field.route().map(|r| r.len()).unwrap_or(0),
                start.elapsed().as_secs_f32()
            ));
            cost
        }
        Err(e) => {
            spinner.finish_with_message(format!("No route: {}", e));
            e.sentinel()
        }
    };

    if let Some(ref output) = args.output {
        let spinner = create_spinner("Saving map...");
        field.save_map(output).map_err(|e| {
            anyhow!(
                "Failed to save map {} (code {}): {}",
                output.display(),
                e.code(),
                e
            )
        })?;
        spinner.finish_with_message(format!("Saved map to {}", output.display()));
    }

    if let Some(ref svg) = args.svg {
        let options = RenderOptions::default().with_grid(args.grid);
        write_svg(svg, &field.scene(&options)).context("Failed to write SVG preview")?;
        if !args.json {
            println!("Wrote preview to {}", svg.display());
        }
    }

    let report = Report {
        map: args.map.clone(),
        width: field.width(),
        height: field.height(),
        obstacles: field.count(),
        cell_size: field.config().cell_size,
        start: field.start().map(|p| (p.x, p.y)),
        end: field.end().map(|p| (p.x, p.y)),
        length,
        error: outcome.err().map(|e| e.to_string()),
        route: field
            .route()
            .map(|r| r.points.iter().map(|p| (p.real.x, p.real.y)).collect())
            .unwrap_or_default(),
    };

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("Failed to encode report")?
        );
    } else {
        print_summary(&report);
        println!();
        println!(
            "Done! Total time: {:.1}s",
            total_start.elapsed().as_secs_f32()
        );
    }

    Ok(())
}

fn print_summary(report: &Report) {
    let fmt_point = |p: Option<(i32, i32)>| {
        p.map(|(x, y)| format!("({}, {})", x, y))
            .unwrap_or_else(|| "unset".to_string())
    };

    println!();
    println!("Field:      {}x{}", report.width, report.height);
    println!("Obstacles:  {}", report.obstacles);
    println!("Cell size:  {}", report.cell_size);
    println!("Start:      {}", fmt_point(report.start));
    println!("End:        {}", fmt_point(report.end));
    match &report.error {
        None => {
            println!("Length:     {:.2}", report.length);
            println!("Waypoints:  {}", report.route.len());
        }
        Some(e) => println!("Length:     {} ({})", report.length, e),
    }
}

fn parse_point(s: &str) -> Result<Point, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected x,y but got '{}'", s))?;
    let x = x
        .trim()
        .parse::<i32>()
        .map_err(|e| format!("bad x coordinate '{}': {}", x, e))?;
    let y = y
        .trim()
        .parse::<i32>()
        .map_err(|e| format!("bad y coordinate '{}': {}", y, e))?;
    Ok(Point::new(x, y))
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(80));
    pb
}
