//! Fund Projection CLI
//!
//! Command-line interface for running, saving and recalling account projections

use anyhow::{bail, Context};
use chrono::{Datelike, Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use fund_projection::archive::{JsonFileRunStore, RunArchive, DEFAULT_ARCHIVE_PATH};
use fund_projection::period::{load_periods, schedule};
use fund_projection::report::{render_table, write_results_csv};
use fund_projection::settings::{DEFAULT_MONTHLY_INTEREST_PERCENT, DEFAULT_UNIT_COST};
use fund_projection::target::DEFAULT_MAX_MONTHS;
use fund_projection::{FundState, GlobalSettings, Money, MonthResult, ProjectionEngine, TargetPlan};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use uuid::Uuid;

#[derive(Debug, Parser)]
#[command(name = "fund_projection", version, about = "Project an investment account month by month")]
struct Cli {
    /// JSON file holding saved runs
    #[arg(long, global = true, env = "FUND_PROJECTION_ARCHIVE", default_value = DEFAULT_ARCHIVE_PATH)]
    archive: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run a projection over the periods in a CSV file
    Run(RunArgs),
    /// Print the month span of each period
    Schedule {
        #[arg(long)]
        periods: PathBuf,
    },
    /// Count the months until held units reach a target value
    Target(TargetArgs),
    /// Manage saved runs
    #[command(subcommand)]
    Saved(SavedCommand),
}

#[derive(Debug, Args)]
struct RunArgs {
    /// Periods CSV (Position,SavingsPercent,DebtPercent,MonthlyContribution,InitialContribution,DurationMonths)
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
    /// Monthly interest in percent
    #[arg(long, default_value_t = DEFAULT_MONTHLY_INTEREST_PERCENT)]
    interest: f64,

    /// Date of month 1 (defaults to the first of the current month)
    #[arg(long)]
    start: Option<NaiveDate>,

    /// Write every month to this CSV file
    #[arg(long)]
    out: Option<PathBuf>,

    /// Rows to print
    #[arg(long, default_value_t = 24)]
    rows: usize,

    /// Save the run to the archive
    #[arg(long, conflicts_with = "update")]
    save: bool,

    /// Replace an existing saved run with this one
    #[arg(long)]
    update: Option<Uuid>,
}

#[derive(Debug, Args)]
struct TargetArgs {
    /// Cash kept in reserve; only the excess buys units
    #[arg(long, default_value = "0")]
    pool: Money,
    #[arg(long, default_value_t = DEFAULT_UNIT_COST)]
    unit_cost: Money,
    #[arg(long, default_value_t = DEFAULT_MONTHLY_INTEREST_PERCENT)]
    interest: f64,
    #[arg(long, default_value_t = 0.0)]
    savings: f64,
    #[arg(long)]
    target: Money,
    #[arg(long, default_value_t = 1)]
    units: u64,
    #[arg(long, default_value_t = DEFAULT_MAX_MONTHS)]
    max_months: u32,
    #[arg(long)]
    start: Option<NaiveDate>,
}

#[derive(Debug, Subcommand)]
enum SavedCommand {
    /// List saved runs
    List,
    /// Replay a saved run
    Show {
        id: Uuid,
        #[arg(long, default_value_t = 24)]
        rows: usize,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Delete a saved run
    Remove { id: Uuid },
    /// Replay saved runs and check their summaries still match
    Verify { id: Option<Uuid> },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let mut archive = RunArchive::new(JsonFileRunStore::new(&cli.archive));

    match cli.command {
        Command::Run(args) => run(args, &mut archive),
        Command::Schedule { periods } => {
            let configs = load_periods(&periods)
                .with_context(|| format!("loading periods from {}", periods.display()))?;
            if configs.is_empty() {
                println!("No investment periods added");
            }
            for span in schedule(&configs) {
                println!("{}", span.label());
            }
            Ok(())
        }
        Command::Target(args) => target(args),
        Command::Saved(command) => saved(command, &mut archive),
    }
}

fn run(args: RunArgs, archive: &mut RunArchive<JsonFileRunStore>) -> anyhow::Result<()> {
    let configs = load_periods(&args.periods)
        .with_context(|| format!("loading periods from {}", args.periods.display()))?;
    let funds = FundState::new(args.cash, args.units, args.savings, args.debt);
    let settings = GlobalSettings::new(args.unit_cost, args.interest);
    let start = match args.start {
        Some(date) => date,
        None => current_month_start()?,
    };

    let engine = ProjectionEngine::new(settings, start);
    let result = engine.project(&configs, &funds).context("running projection")?;

    println!(
        "Projection Results ({} months over {} periods):",
        result.len(),
        configs.len()
    );
    print!("{}", render_table(&result.results, args.rows));

    let summary = result.summary();
    println!("\nSummary:");
    println!("  Total Months: {}", summary.total_months);
    println!("  Total Contributions: {}", summary.total_contributions);
    println!("  Total Interest: {}", summary.total_income);
    println!("  Total Debt Paid: {}", summary.total_debt_paid);
    println!(
        "  Final Units: {} ({})",
        summary.final_units,
        settings.units_value(summary.final_units)
    );
    println!("  Final Cash: {}", summary.final_cash);
    println!("  Final Savings: {}", summary.final_savings);
    println!("  Final Debt: {}", summary.final_debt);
    println!("  Total Value: {}", summary.final_value);

    if let Some(path) = &args.out {
        export(path, &result.results)?;
    }

    if args.save {
        let saved = archive
            .save(&configs, &result.results, &funds, &settings, start)
            .context("saving run")?;
        println!("\nSaved run {}", saved.id);
    } else if let Some(id) = args.update {
        archive
            .update(id, &configs, &result.results, &funds, &settings, start)
            .with_context(|| format!("updating run {}", id))?;
        println!("\nUpdated run {}", id);
    }

    Ok(())
}

fn target(args: TargetArgs) -> anyhow::Result<()> {
    let plan = TargetPlan {
        cash_pool: args.pool,
        unit_cost: args.unit_cost,
        monthly_interest_percent: args.interest,
        savings_percent: args.savings,
        target_value: args.target,
        initial_units: args.units,
        max_months: args.max_months,
    };
    let start = match args.start {
        Some(date) => date,
        None => current_month_start()?,
    };

    let rows = plan.run(start)?;

    println!(
        "{:>5} {:>5} {:>14} {:>14} {:>14} {:>8} {:>16}",
        "Month", "Date", "Interest", "Pool", "Savings", "Units", "Units Value"
    );
    println!("{}", "-".repeat(86));
    for row in &rows {
        println!(
            "{:>5} {:>5} {:>14} {:>14} {:>14} {:>8} {:>16}",
            row.month,
            row.date.format("%m/%y").to_string(),
            row.payment,
            row.pool,
            row.savings,
            row.units,
            row.units_value,
        );
    }

    if let Some(last) = rows.last() {
        println!("\nTarget {} reached in {} months", plan.target_value, last.month);
    }
    Ok(())
}

fn saved(command: SavedCommand, archive: &mut RunArchive<JsonFileRunStore>) -> anyhow::Result<()> {
    match command {
        SavedCommand::List => {
            let runs = archive.list()?;
            if runs.is_empty() {
                println!("No saved runs in {}", archive.store().path().display());
                return Ok(());
            }
            println!(
                "{:<36} {:>7} {:>16} {:>14} {:>10}",
                "Id", "# Rows", "Total Value", "Savings", "# Units"
            );
            for run in runs {
                println!(
                    "{:<36} {:>7} {:>16} {:>14} {:>10}",
                    run.id, run.row_count, run.total_value, run.total_savings, run.total_units
                );
            }
        }
        SavedCommand::Show { id, rows, out } => {
            let run = archive.get(id)?;
            let results = archive.recall(id)?;
            println!(
                "Saved run {} from {} ({} periods)",
                run.id,
                run.start_date,
                run.configs.len()
            );
            for span in schedule(&run.configs) {
                println!("  {}", span.label());
            }
            print!("{}", render_table(&results, rows));
            println!("\nTotal Value: {}", run.total_value);
            if let Some(path) = &out {
                export(path, &results)?;
            }
        }
        SavedCommand::Remove { id } => {
            archive.remove(id)?;
            println!("Removed run {}", id);
        }
        SavedCommand::Verify { id: Some(id) } => {
            if !archive.verify(id)? {
                bail!("run {} no longer reproduces its saved summary", id);
            }
            println!("Run {} reproduces its saved summary", id);
        }
        SavedCommand::Verify { id: None } => {
            let checks = archive.verify_all()?;
            let mut failures = 0;
            for check in &checks {
                match (&check.error, check.consistent) {
                    (Some(error), _) => {
                        failures += 1;
                        println!("{}  ERROR {}", check.id, error);
                    }
                    (None, false) => {
                        failures += 1;
                        println!("{}  MISMATCH", check.id);
                    }
                    (None, true) => println!("{}  ok", check.id),
                }
            }
            if failures > 0 {
                bail!("{} of {} saved runs failed verification", failures, checks.len());
            }
        }
    }
    Ok(())
}

fn export(path: &Path, results: &[MonthResult]) -> anyhow::Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    write_results_csv(BufWriter::new(file), results)?;
    println!("\nFull results written to: {}", path.display());
    Ok(())
}

fn current_month_start() -> anyhow::Result<NaiveDate> {
    let today = Local::now().date_naive();
    NaiveDate::from_ymd_opt(today.year(), today.month(), 1)
        .context("computing the first day of the current month")
}
