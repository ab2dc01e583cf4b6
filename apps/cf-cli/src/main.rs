mod case;
mod error;

use cf_components::{Component, VariableKind};
use case::Plant;
use clap::{Parser, Subcommand};
use error::CliResult;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cf-cli")]
#[command(about = "CombustFlow CLI - combustion chamber network solver", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve a chamber case and print the converged state
    Solve {
        /// Path to the case YAML file
        case_path: PathBuf,
        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the equations of every component as LaTeX
    Equations {
        /// Path to the case YAML file
        case_path: PathBuf,
    },
}

fn main() -> CliResult<()> {
    // Logs go to stderr so JSON output stays parseable
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Solve { case_path, json } => cmd_solve(&case_path, json),
        Commands::Equations { case_path } => cmd_equations(&case_path),
    }
}

#[derive(Debug, Serialize)]
struct ConnectionOutput {
    label: String,
    m: f64,
    p: f64,
    h: f64,
    t: f64,
    fractions: BTreeMap<String, f64>,
}

#[derive(Debug, Serialize)]
struct DiagnosticOutput {
    component: String,
    kind: String,
    message: String,
}

#[derive(Debug, Serialize)]
struct SolveOutput {
    iterations: usize,
    residual_norm: f64,
    connections: Vec<ConnectionOutput>,
    chamber: BTreeMap<String, f64>,
    diagnostics: Vec<DiagnosticOutput>,
}

fn solve_case(plant: &mut Plant, case: &case::Case) -> CliResult<SolveOutput> {
    let report = cf_solver::solve(&mut plant.network, Some(case.solver.config()))?;

    let connections = plant
        .streams
        .iter()
        .map(|&id| -> CliResult<ConnectionOutput> {
            let c = plant.network.connection(id)?;
            Ok(ConnectionOutput {
                label: c.label().to_string(),
                m: c.m(),
                p: c.p(),
                h: c.h(),
                t: plant.network.temperature(id)?.value,
                fractions: c
                    .fluid()
                    .iter()
                    .map(|(s, x)| (s.key().to_string(), x))
                    .collect(),
            })
        })
        .collect::<CliResult<Vec<_>>>()?;

    let chamber = plant.network.component(plant.chamber)?;
    let chamber = VariableKind::ALL
        .iter()
        .filter_map(|&kind| chamber.variable(kind).map(|v| (kind.to_string(), v.value)))
        .collect();

    Ok(SolveOutput {
        iterations: report.iterations,
        residual_norm: report.residual_norm,
        connections,
        chamber,
        diagnostics: report
            .diagnostics
            .into_iter()
            .map(|d| DiagnosticOutput {
                component: d.component,
                kind: format!("{:?}", d.kind),
                message: d.message,
            })
            .collect(),
    })
}

fn cmd_solve(case_path: &Path, json: bool) -> CliResult<()> {
    let case = case::load(case_path)?;
    let mut plant = case.build()?;
    let output = solve_case(&mut plant, &case)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!(
        "✓ Converged in {} iterations (residual {:.3e})",
        output.iterations, output.residual_norm
    );
    println!();
    println!(
        "{:<12} {:>10} {:>12} {:>14} {:>10}",
        "connection", "m [kg/s]", "p [bar]", "h [J/kg]", "T [°C]"
    );
    for c in &output.connections {
        println!(
            "{:<12} {:>10.5} {:>12.5} {:>14.1} {:>10.2}",
            c.label,
            c.m,
            c.p / 1e5,
            c.h,
            c.t - 273.15
        );
    }
    println!();
    println!("{}:", case.chamber.label);
    for (name, value) in &output.chamber {
        println!("  {name:<8} {value:.6}");
    }
    if !output.diagnostics.is_empty() {
        println!();
        println!("Diagnostics:");
        for d in &output.diagnostics {
            println!("  [{}] {}", d.kind, d.message);
        }
    }
    Ok(())
}

fn cmd_equations(case_path: &Path) -> CliResult<()> {
    let case = case::load(case_path)?;
    let plant = case.build()?;
    for (_, comp) in plant.network.components() {
        for eq in comp.describe_equations() {
            println!("{}", eq.label);
            println!("  {}", eq.latex);
        }
    }
    Ok(())
}
