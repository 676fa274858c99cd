//! Print the amortization schedule of a single loan

use anyhow::{Context, Result};
use clap::Parser;
use founder_finance::finance::LoanTerms;
use founder_finance::plan::input::parse_decimal;
use founder_finance::Amount;

#[derive(Parser)]
#[command(name = "loan_schedule")]
#[command(about = "Annuity payment and amortization schedule of a loan", long_about = None)]
struct Cli {
    /// Principal in euros ("20000", "20.000,00")
    principal: String,

    /// Annual interest rate in percent ("5", "3,5")
    rate: String,

    /// Term in months
    term_months: u32,

    /// Interest-only months at the start
    #[arg(short, long, default_value_t = 0)]
    grace_months: u32,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let principal = parse_decimal("principal", &cli.principal).context("Invalid principal")?;
    let rate = parse_decimal("rate", &cli.rate).context("Invalid interest rate")?;

    let loan = LoanTerms::new(Amount::new(principal), rate, cli.term_months).with_grace_months(cli.grace_months);
    let payment = loan.payment();

    println!(
        "Loan {} € at {}% over {} months ({} grace)",
        loan.principal, rate, loan.term_months, loan.grace_months
    );
    println!("Monthly payment: {} €", payment.monthly_payment);
    println!("Total interest:  {} €", payment.total_interest);
    println!("Total payments:  {} €\n", payment.total_payments);

    println!("{:>5} | {:>12} | {:>12} | {:>12} | {:>12}", "Month", "Payment", "Interest", "Principal", "Balance");
    for row in loan.schedule(loan.term_months) {
        println!(
            "{:>5} | {:>12} | {:>12} | {:>12} | {:>12}",
            row.month,
            row.payment.to_string(),
            row.interest.to_string(),
            row.principal.to_string(),
            row.remaining_balance.to_string(),
        );
    }

    Ok(())
}
