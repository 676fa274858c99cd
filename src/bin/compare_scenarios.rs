//! Compare several plan variants side by side
//!
//! Each file is one what-if scenario (more equity, later launch, lower
//! prices, ...). Scenarios are evaluated in parallel.

use anyhow::{Context, Result};
use clap::Parser;
use founder_finance::{evaluate_scenarios, PlanInput, SimulationConfig};
use std::fs;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "compare_scenarios")]
#[command(about = "Evaluate plan variants in parallel and compare liquidity", long_about = None)]
struct Cli {
    /// Plan inputs (JSON), one per scenario
    #[arg(required = true)]
    plans: Vec<PathBuf>,

    /// Months to simulate (12-36)
    #[arg(short, long, default_value_t = 36)]
    months: u32,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let start = Instant::now();
    let inputs = cli
        .plans
        .iter()
        .map(|path| {
            let text = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
            PlanInput::from_json(&text).with_context(|| format!("Failed to parse {}", path.display()))
        })
        .collect::<Result<Vec<_>>>()?;
    println!("Loaded {} scenarios in {:?}", inputs.len(), start.elapsed());

    let config = SimulationConfig::with_months(cli.months);
    let eval_start = Instant::now();
    let evaluations = evaluate_scenarios(&inputs, &config);
    println!("Evaluated in {:?}\n", eval_start.elapsed());

    println!(
        "{:<30} | {:>12} | {:>12} | {:>12} | {:>5} | {:>12} | {:>4} | {:>8} | {:>6}",
        "Scenario", "Capital", "Financing", "Min cash", "Month", "End cash", "SSM", "Blockers", "Ready"
    );
    for (path, evaluation) in cli.plans.iter().zip(&evaluations) {
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        println!(
            "{:<30} | {:>12} | {:>12} | {:>12} | {:>5} | {:>12} | {:>4} | {:>8} | {:>6}",
            name,
            evaluation.capital_requirement.to_string(),
            evaluation.financing.total_financing.to_string(),
            evaluation.liquidity.minimum_cash.to_string(),
            evaluation.liquidity.minimum_cash_month,
            evaluation.cash_flow.ending_cash().to_string(),
            evaluation
                .self_sufficiency_month
                .map(|m| m.to_string())
                .unwrap_or_else(|| "-".to_string()),
            evaluation.compliance.blockers.len(),
            if evaluation.is_export_ready() { "yes" } else { "no" },
        );
    }

    println!("\nTotal time: {:?}", start.elapsed());
    Ok(())
}
