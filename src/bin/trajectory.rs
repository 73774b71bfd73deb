//! Command-line front end for the projectile simulator

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use rk_projectile::config::{DEFAULT_DRAG_A, DEFAULT_DRAG_B, DEFAULT_DT, DEFAULT_MAX_STEPS};
use rk_projectile::{
    solve_batch, DisplayBounds, FlightSummary, Method, Projectile, ScenarioConfig,
    SimulationParameters, TrajectorySample, DEFAULT_PADDING, STANDARD_GRAVITY,
};

#[derive(Parser)]
#[command(name = "trajectory")]
#[command(version)]
#[command(about = "Projectile trajectories under gravity and quadratic drag", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the supported Runge-Kutta methods
    Methods,

    /// Solve a single projectile
    Solve {
        /// Time step (s)
        #[arg(long, default_value_t = DEFAULT_DT)]
        dt: f64,

        /// Drag coefficient A
        #[arg(long, default_value_t = DEFAULT_DRAG_A)]
        drag_a: f64,

        /// Reserved drag coefficient B
        #[arg(long, default_value_t = DEFAULT_DRAG_B)]
        drag_b: f64,

        /// Mass (kg)
        #[arg(short = 'm', long, default_value_t = 1.0)]
        mass: f64,

        /// Initial horizontal position (m)
        #[arg(long, default_value_t = 0.0)]
        x0: f64,

        /// Initial vertical position (m)
        #[arg(long, default_value_t = 0.0)]
        y0: f64,

        /// Initial speed (m/s)
        #[arg(short = 'v', long)]
        speed: f64,

        /// Launch angle (degrees)
        #[arg(short = 'a', long, default_value_t = 45.0)]
        angle: f64,

        /// Gravitational acceleration (m/s²)
        #[arg(short = 'g', long, default_value_t = STANDARD_GRAVITY)]
        gravity: f64,

        /// Integration method (name or alias, e.g. "Classic-4th" or "rk4")
        #[arg(long, default_value = "rk4")]
        method: Method,

        /// Step ceiling before giving up on landing
        #[arg(long, default_value_t = DEFAULT_MAX_STEPS)]
        max_steps: u64,

        /// Only print samples up to this time (s)
        #[arg(long)]
        until: Option<f64>,

        /// Output format
        #[arg(short = 'o', long, default_value = "table")]
        output: OutputFormat,
    },

    /// Solve every projectile in a JSON scenario file
    Scenario {
        /// Scenario file
        path: PathBuf,

        /// Worker threads (defaults to one per core)
        #[arg(long)]
        threads: Option<usize>,

        /// Output format
        #[arg(short = 'o', long, default_value = "table")]
        output: OutputFormat,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Csv,
    Json,
}

#[derive(Serialize)]
struct SolveReport<'a> {
    parameters: &'a SimulationParameters,
    summary: FlightSummary,
    samples: &'a [TrajectorySample],
}

#[derive(Serialize)]
struct ScenarioEntry {
    label: String,
    summary: Option<FlightSummary>,
    error: Option<String>,
}

#[derive(Serialize)]
struct ScenarioReport {
    projectiles: Vec<ScenarioEntry>,
    bounds: Option<BoundsReport>,
}

#[derive(Serialize)]
struct BoundsReport {
    x: (f64, f64),
    y: (f64, f64),
    max_time: f64,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Methods => {
            println!("{:<20} {:>5} {:>6}  {}", "METHOD", "ORDER", "STAGES", "ALIAS");
            for method in Method::ALL {
                println!(
                    "{:<20} {:>5} {:>6}  {}",
                    method.name(),
                    method.order(),
                    method.stages(),
                    method.alias()
                );
            }
        }

        Commands::Solve {
            dt,
            drag_a,
            drag_b,
            mass,
            x0,
            y0,
            speed,
            angle,
            gravity,
            method,
            max_steps,
            until,
            output,
        } => {
            let params = SimulationParameters {
                dt,
                drag_a,
                drag_b,
                mass,
                x0,
                y0,
                speed,
                angle,
                gravity,
                method,
                max_steps,
            };
            let mut projectile = Projectile::new(params)?;
            projectile.solve()?;

            let end = until.unwrap_or(projectile.max_time()?);
            let samples = projectile.results(0.0..=end)?;
            let summary = projectile.summary()?;
            display_solve(projectile.params(), summary, samples, output)?;
        }

        Commands::Scenario {
            path,
            threads,
            output,
        } => {
            let scenario = ScenarioConfig::from_path(&path)
                .with_context(|| format!("failed to load scenario {}", path.display()))?;
            let labels = scenario.labels();
            let results = solve_batch(scenario.parameters(), threads)?;

            let solved: Vec<&Projectile> = results.iter().filter_map(|r| r.as_ref().ok()).collect();
            let bounds = if solved.is_empty() {
                None
            } else {
                Some(DisplayBounds::from_projectiles(solved)?.padded(DEFAULT_PADDING))
            };

            let entries = labels
                .into_iter()
                .zip(&results)
                .map(|(label, result)| -> Result<ScenarioEntry> {
                    Ok(match result {
                        Ok(projectile) => ScenarioEntry {
                            label,
                            summary: Some(projectile.summary()?),
                            error: None,
                        },
                        Err(e) => ScenarioEntry {
                            label,
                            summary: None,
                            error: Some(e.to_string()),
                        },
                    })
                })
                .collect::<Result<Vec<_>>>()?;

            display_scenario(
                ScenarioReport {
                    projectiles: entries,
                    bounds: bounds.map(|b| BoundsReport {
                        x: b.x,
                        y: b.y,
                        max_time: b.max_time,
                    }),
                },
                output,
            )?;
        }
    }

    Ok(())
}

fn display_solve(
    parameters: &SimulationParameters,
    summary: FlightSummary,
    samples: &[TrajectorySample],
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let report = SolveReport {
                parameters,
                summary,
                samples,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Csv => {
            println!("t,x,y");
            for s in samples {
                println!("{},{},{}", s.t, s.x, s.y);
            }
        }
        OutputFormat::Table => {
            println!("{:>10} {:>14} {:>14}", "t (s)", "x (m)", "y (m)");
            for s in samples {
                println!("{:>10.3} {:>14.4} {:>14.4}", s.t, s.x, s.y);
            }
            println!();
            print_summary(&summary);
        }
    }
    Ok(())
}

fn print_summary(summary: &FlightSummary) {
    println!("  Time of flight: {:.3} s", summary.time_of_flight);
    println!("  Range:          {:.3} m", summary.range);
    println!(
        "  Apex:           {:.3} m at t = {:.3} s",
        summary.apex_height, summary.apex_time
    );
    println!("  Impact speed:   {:.3} m/s", summary.impact_speed);
    println!("  Impact energy:  {:.3} J", summary.impact_energy);
    println!(
        "  Steps:          {} ({} function evals)",
        summary.steps, summary.fn_evals
    );
}

fn display_scenario(report: ScenarioReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Csv => {
            println!("label,time_of_flight,range,apex_height,impact_speed,impact_energy,error");
            for entry in &report.projectiles {
                match (&entry.summary, &entry.error) {
                    (Some(s), _) => println!(
                        "{},{},{},{},{},{},",
                        entry.label,
                        s.time_of_flight,
                        s.range,
                        s.apex_height,
                        s.impact_speed,
                        s.impact_energy
                    ),
                    (None, error) => println!(
                        "{},,,,,,{}",
                        entry.label,
                        error.as_deref().unwrap_or_default()
                    ),
                }
            }
        }
        OutputFormat::Table => {
            for entry in &report.projectiles {
                println!("{}", entry.label);
                match (&entry.summary, &entry.error) {
                    (Some(s), _) => print_summary(s),
                    (None, error) => {
                        println!("  failed: {}", error.as_deref().unwrap_or("unknown error"))
                    }
                }
                println!();
            }
            if let Some(b) = &report.bounds {
                println!("Display bounds");
                println!("  x: [{:.3}, {:.3}]", b.x.0, b.x.1);
                println!("  y: [{:.3}, {:.3}]", b.y.0, b.y.1);
                println!("  t: [0, {:.3}]", b.max_time);
            }
        }
    }
    Ok(())
}
