//! Sweep monthly interest rates over one set of periods
//!
//! Usage: cargo run --bin rate_sweep -- --periods periods.csv --from 5 --to 25 --step 2.5

use anyhow::{ensure, Context};
use chrono::NaiveDate;
use clap::Parser;
use fund_projection::period::load_periods;
use fund_projection::settings::DEFAULT_UNIT_COST;
use fund_projection::{FundState, GlobalSettings, Money, ScenarioRunner};
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Debug, Parser)]
#[command(name = "rate_sweep", about = "Compare final account value across monthly interest rates")]
struct SweepArgs {
    #[arg(long)]
    periods: PathBuf,

    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    cash: Money,
    #[arg(long, default_value_t = 1)]
    units: u64,
    #[arg(long, default_value = "0")]
    savings: Money,
    #[arg(long, default_value = "0")]
    debt: Money,
    #[arg(long, default_value_t = DEFAULT_UNIT_COST)]
    unit_cost: Money,

    /// Lowest monthly interest percent
    #[arg(long, default_value_t = 0.0)]
    from: f64,
    /// Highest monthly interest percent
    #[arg(long, default_value_t = 25.0)]
    to: f64,
    #[arg(long, default_value_t = 2.5)]
    step: f64,

    #[arg(long, default_value = "2024-01-01")]
    start: NaiveDate,

    #[arg(long, default_value = "rate_sweep_output.csv")]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = SweepArgs::parse();
    ensure!(args.step > 0.0, "--step must be positive");
    ensure!(args.from <= args.to, "--from must not exceed --to");

    let start = Instant::now();
    let configs = load_periods(&args.periods)
        .with_context(|| format!("loading periods from {}", args.periods.display()))?;
    let funds = FundState::new(args.cash, args.units, args.savings, args.debt);
    println!("Loaded {} periods in {:?}", configs.len(), start.elapsed());

    let mut rates = Vec::new();
    let mut rate = args.from;
    while rate <= args.to + 1e-9 {
        rates.push(rate);
        rate += args.step;
    }
    let settings: Vec<GlobalSettings> = rates
        .iter()
        .map(|&r| GlobalSettings::new(args.unit_cost, r.min(100.0)))
        .collect();

    println!("Running {} scenarios...", settings.len());
    let proj_start = Instant::now();
    let runner = ScenarioRunner::new(configs, funds, args.start);
    let results = runner.run_scenarios(&settings);
    println!("Scenarios complete in {:?}", proj_start.elapsed());

    let mut file = File::create(&args.out)
        .with_context(|| format!("creating {}", args.out.display()))?;
    writeln!(file, "MonthlyInterestPercent,Months,FinalUnits,FinalCash,FinalSavings,FinalDebt,TotalValue")?;

    println!("\n{:>8} {:>10} {:>18}", "Rate %", "Units", "Total Value");
    for (s, result) in settings.iter().zip(results) {
        let summary = result
            .with_context(|| format!("projecting at {}%", s.monthly_interest_percent))?
            .summary();
        writeln!(
            file,
            "{},{},{},{},{},{},{}",
            s.monthly_interest_percent,
            summary.total_months,
            summary.final_units,
            summary.final_cash.to_plain_string(),
            summary.final_savings.to_plain_string(),
            summary.final_debt.to_plain_string(),
            summary.final_value.to_plain_string(),
        )?;
        println!(
            "{:>8.2} {:>10} {:>18}",
            s.monthly_interest_percent, summary.final_units, summary.final_value
        );
    }

    println!("\nOutput written to {}", args.out.display());
    println!("Total time: {:?}", start.elapsed());
    Ok(())
}
