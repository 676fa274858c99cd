//! Evaluate a business plan from a JSON file
//!
//! Prints the monthly cash flow and the compliance result. Optionally writes
//! the full evaluation as JSON and the cash flow as CSV.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use founder_finance::assumptions::ComplianceRules;
use founder_finance::{evaluate, PlanEvaluation, PlanInput, SimulationConfig};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "evaluate_plan")]
#[command(about = "Evaluate a founder business plan and check it for export", long_about = None)]
struct Cli {
    /// Plan input (JSON)
    plan: PathBuf,

    /// Months to simulate (12-36)
    #[arg(short, long, default_value_t = 12)]
    months: u32,

    /// Calendar start of month 1 (YYYY-MM-DD)
    #[arg(long)]
    start_date: Option<NaiveDate>,

    /// Compliance thresholds (JSON); missing fields use defaults
    #[arg(long)]
    rules: Option<PathBuf>,

    /// Write the full evaluation as JSON
    #[arg(long)]
    json_out: Option<PathBuf>,

    /// Write the monthly cash flow as CSV
    #[arg(long)]
    csv_out: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let start = Instant::now();

    let text = fs::read_to_string(&cli.plan)
        .with_context(|| format!("Failed to read plan {}", cli.plan.display()))?;
    let input = PlanInput::from_json(&text)
        .with_context(|| format!("Failed to parse plan {}", cli.plan.display()))?;

    let rules = match &cli.rules {
        Some(path) => load_rules(path)?,
        None => ComplianceRules::default(),
    };
    let config = SimulationConfig {
        months: cli.months,
        start_date: cli.start_date,
        rules,
    };

    let evaluation = evaluate(&input, &config);
    print_summary(&evaluation);

    if let Some(path) = &cli.json_out {
        let json = serde_json::to_string_pretty(&evaluation).context("Failed to serialize evaluation")?;
        fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
        println!("\nEvaluation written to {}", path.display());
    }

    if let Some(path) = &cli.csv_out {
        let file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
        evaluation
            .cash_flow
            .write_csv(file)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        println!("Cash flow written to {}", path.display());
    }

    println!("\nTotal time: {:?}", start.elapsed());
    Ok(())
}

fn load_rules(path: &Path) -> Result<ComplianceRules> {
    let text = fs::read_to_string(path).with_context(|| format!("Failed to read rules {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Failed to parse rules {}", path.display()))
}

fn print_summary(evaluation: &PlanEvaluation) {
    let financing = &evaluation.financing;
    println!("Capital requirement: {:>12} €", evaluation.capital_requirement.to_string());
    println!(
        "Financing:           {:>12} € (equity {}%, debt {}%)",
        financing.total_financing.to_string(),
        financing.equity_percent,
        financing.debt_percent
    );
    println!("Financing gap:       {:>12} €", financing.financing_gap.to_string());
    println!("Debt service:        {:>12} € / month", evaluation.monthly_debt_service.to_string());
    println!("Private withdrawal:  {:>12} € / month", evaluation.withdrawal.total.monthly.to_string());
    println!(
        "Revenue years 1-3:   {} / {} / {} €",
        evaluation.revenue.annual[0], evaluation.revenue.annual[1], evaluation.revenue.annual[2]
    );

    println!(
        "\n{:>5} | {:>12} | {:>12} | {:>12} | {:>12} | {:>12} | {:>12} | {:>12}",
        "Month", "Begin", "Revenue in", "Operating", "Investment", "Debt", "Withdrawal", "End"
    );
    for m in &evaluation.cash_flow.months {
        println!(
            "{:>5} | {:>12} | {:>12} | {:>12} | {:>12} | {:>12} | {:>12} | {:>12}",
            m.month,
            m.beginning_cash.to_string(),
            m.revenue_inflow.to_string(),
            m.operating_outflow.to_string(),
            m.investment_outflow.to_string(),
            m.debt_service_outflow.to_string(),
            m.private_withdrawal.to_string(),
            m.ending_cash.to_string(),
        );
    }

    let liquidity = &evaluation.liquidity;
    println!(
        "\nMinimum cash {} € in month {}, average {} €, reserve {} € of recommended {} €",
        liquidity.minimum_cash,
        liquidity.minimum_cash_month,
        liquidity.average_cash,
        liquidity.actual_reserve,
        liquidity.recommended_reserve
    );
    match evaluation.self_sufficiency_month {
        Some(month) => println!("Self-sufficient from month {}", month),
        None => println!("Not self-sufficient in year 1"),
    }
    if let Some(stated) = evaluation.stated_self_sufficiency_month {
        println!("Stated self-sufficiency month: {}", stated);
    }

    for issue in &evaluation.input_issues {
        println!("  INPUT    {}: {}", issue.field, issue.reason);
    }
    for issue in evaluation.compliance.blockers.iter().chain(&evaluation.compliance.warnings) {
        println!("  {:<8} {}: {}", format!("{:?}", issue.severity).to_uppercase(), issue.code, issue.message);
    }
    println!(
        "\nExport ready: {}",
        if evaluation.is_export_ready() { "yes" } else { "no" }
    );
}
