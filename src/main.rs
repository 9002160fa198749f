//! Real Estate Finance CLI
//!
//! Command-line interface for running project scenarios, loan schedules and
//! closing fee estimates

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::{Path, PathBuf};

use realestate_finance::construction::{ConstructionSystem, IndirectCostRates, ProjectDraft};
use realestate_finance::financing::{
    calculate_amortization_table, calculate_taxes_and_fees, create_financing_scheme,
    summarize_amortization, FinancingType, PaymentFrequency,
};
use realestate_finance::kpi::{DiscountRate, DEFAULT_DISCOUNT_RATE};
use realestate_finance::market::{MarketData, MarketTable, NoJitter, SeededJitter, DEFAULT_MARKET_DATA_PATH};
use realestate_finance::projection::{calculate_optimal_sales_velocity, CostPattern, SalesProjectionConfig};
use realestate_finance::scenario::{
    compare_scenarios, generate_five_year_projection, FinancingRequest, Scenario, ScenarioBase,
    ScenarioPresets, ScenarioSimulator, ScenarioType,
};

#[derive(Parser)]
#[command(name = "realestate_finance", version, about = "Financial projections for real-estate developments")]
struct Cli {
    /// JSON project file; a built-in sample project is used when omitted
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run one scenario and print its budget, sales and KPIs
    Simulate {
        #[arg(long, default_value = "realistic")]
        scenario: ScenarioType,
        #[command(flatten)]
        market: MarketArgs,
        /// Print the full scenario as JSON
        #[arg(long)]
        json: bool,
        /// Write the monthly cash flow to a CSV file
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// Run the optimistic, realistic and pessimistic scenarios side by side
    Compare {
        #[command(flatten)]
        market: MarketArgs,
        #[arg(long)]
        json: bool,
    },
    /// Print a loan amortization schedule
    Amortize {
        #[arg(long)]
        amount: f64,
        /// Down payment percent
        #[arg(long, default_value_t = 20.0)]
        down_payment: f64,
        /// Annual interest rate percent
        #[arg(long)]
        rate: f64,
        #[arg(long, default_value_t = 20)]
        years: u32,
        #[arg(long, default_value = "monthly")]
        frequency: PaymentFrequency,
        #[arg(long, default_value = "bank-loan")]
        financing_type: FinancingType,
        /// Origination fee percent
        #[arg(long, default_value_t = 0.0)]
        fee: f64,
        #[arg(long)]
        json: bool,
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// Estimate closing taxes and fees for a purchase
    Fees {
        #[arg(long)]
        amount: f64,
        #[arg(long, default_value = "default")]
        region: String,
        #[arg(long)]
        json: bool,
    },
}

#[derive(clap::Args)]
struct MarketArgs {
    /// Region whose market data adjusts the project
    #[arg(long)]
    region: Option<String>,
    /// Directory containing market_data.csv
    #[arg(long, default_value = DEFAULT_MARKET_DATA_PATH)]
    market_data: PathBuf,
    /// Seed for market jitter; no jitter when omitted
    #[arg(long)]
    seed: Option<u64>,
    /// Relative spread of the jitter
    #[arg(long, default_value_t = 0.05)]
    spread: f64,
}

/// Project file layout
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ProjectFile {
    project: ProjectDraft,
    sales: SalesProjectionConfig,
    #[serde(default)]
    cost_pattern: CostPattern,
    #[serde(default)]
    financing: Option<FinancingRequest>,
    #[serde(default)]
    presets: ScenarioPresets,
    #[serde(default)]
    indirect_rates: IndirectCostRates,
    /// Annual percent
    #[serde(default)]
    discount_rate: Option<f64>,
    #[serde(default)]
    region: Option<String>,
}

impl ProjectFile {
    fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).with_context(|| format!("opening project file {}", path.display()))?;
        serde_json::from_reader(file).with_context(|| format!("parsing project file {}", path.display()))
    }

    /// Mid-size tower used when no project file is given
    fn sample() -> Self {
        Self {
            project: ProjectDraft {
                project_id: Some("sample-tower".to_string()),
                area_m2: Some(500.0),
                land_cost: Some(1_500_000.0),
                construction_system: Some(ConstructionSystem::default()),
                material_preset: Some("standard".to_string()),
                location_factor: None,
                inflation_factor: None,
            },
            sales: SalesProjectionConfig {
                total_units: 8,
                unit_price: 3_200_000.0,
                sales_start_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap_or_default(),
                sales_velocity: 1.0,
                price_increase_rate: 5.0,
                reservation_fee_percentage: 2.0,
                down_payment_percentage: 30.0,
                installment_months: 6,
                project_duration: 24,
            },
            cost_pattern: CostPattern::Bell,
            financing: None,
            presets: ScenarioPresets::default(),
            indirect_rates: IndirectCostRates::default(),
            discount_rate: None,
            region: None,
        }
    }
}

fn load_market(args: &MarketArgs, region: &str) -> Result<MarketData> {
    let table = match MarketTable::from_csv_path(&args.market_data) {
        Ok(table) => table,
        Err(e) => {
            log::warn!(
                "could not read market data from {} ({}), using built-in regions",
                args.market_data.display(),
                e
            );
            MarketTable::default_regions()
        }
    };

    let data = match args.seed {
        Some(seed) => table.load(region, args.spread, &mut SeededJitter::new(seed))?,
        None => table.load(region, args.spread, &mut NoJitter)?,
    };
    Ok(data)
}

/// Completed scenario base plus the simulator configured for it
fn prepare(cli_config: Option<&Path>, market_args: &MarketArgs) -> Result<(ScenarioBase, ScenarioSimulator)> {
    let mut file = match cli_config {
        Some(path) => ProjectFile::load(path)?,
        None => ProjectFile::sample(),
    };

    let region = market_args.region.clone().or_else(|| file.region.clone());
    let market = match &region {
        Some(region) => Some(load_market(market_args, region)?),
        None => None,
    };

    if let Some(market) = &market {
        log::info!("applying market data for {}", market.region);
        file.project.location_factor.get_or_insert(market.location_factor);
        file.project.inflation_factor.get_or_insert(market.inflation_factor());
        if file.discount_rate.is_none() {
            file.discount_rate = Some(market.discount_rate);
        }
    }

    let project = file.project.complete().map_err(|e| {
        if e.is_incomplete() {
            anyhow::anyhow!("project file is not complete yet: {}", e)
        } else {
            anyhow::Error::new(e).context("invalid project data")
        }
    })?;

    if let Some(market) = &market {
        let suggested = calculate_optimal_sales_velocity(
            file.sales.total_units,
            file.sales.project_duration,
            market.absorption_rate,
        )?;
        log::info!(
            "suggested sales velocity for {}: {:.2} units/month (configured {:.2})",
            market.region,
            suggested,
            file.sales.sales_velocity
        );
    }

    let discount = DiscountRate::annual(file.discount_rate.unwrap_or(DEFAULT_DISCOUNT_RATE));
    let simulator = ScenarioSimulator::new(Utc::now())
        .with_presets(file.presets)
        .with_indirect_rates(file.indirect_rates)
        .with_discount_rate(discount);

    let base = ScenarioBase {
        project,
        sales: file.sales,
        cost_pattern: file.cost_pattern,
        financing: file.financing,
    };
    Ok((base, simulator))
}

fn print_scenario(scenario: &Scenario) {
    let budget = &scenario.budget;
    let metrics = &scenario.sales_projection.metrics;
    let kpis = &scenario.kpis;

    println!("Scenario: {} ({})", scenario.name, scenario.id);
    println!("  {}", scenario.description);
    println!(
        "  Construction: {:.1} weeks ({} months), preset {}",
        scenario.construction_weeks, scenario.construction_months, scenario.material_preset
    );
    println!();

    println!("Budget:");
    for cost in budget.direct_costs.values() {
        println!("  {:<28} ${:>16.2}", cost.name, cost.amount);
    }
    for cost in budget.indirect_costs.values() {
        println!("  {:<22} {:>4.1}% ${:>16.2}", cost.name, cost.percentage, cost.amount);
    }
    println!("  {}", "-".repeat(47));
    println!("  {:<28} ${:>16.2}", "Total", budget.total_cost);
    println!("  {:<28} ${:>16.2}", "Cost per m2", budget.cost_per_m2);
    println!();

    println!("Sales:");
    println!("  Units sold:        {}", metrics.units_sold);
    println!("  Total revenue:     ${:.2}", metrics.total_revenue);
    println!("  Total collected:   ${:.2}", metrics.total_collected);
    println!("  Avg absorption:    {:.2}%/month", metrics.average_absorption_rate);
    match metrics.sales_duration {
        Some(m) => println!("  Sold out:          month {}", m),
        None => println!("  Sold out:          not within the horizon"),
    }
    match metrics.break_even_month {
        Some(m) => println!("  Break-even:        month {}", m),
        None => println!("  Break-even:        not reached"),
    }
    println!("  Max exposure:      ${:.2}", scenario.sales_projection.max_exposure());
    println!();

    if let Some(financing) = &scenario.financing {
        println!("Financing:");
        println!("  Loan amount:       ${:.2}", financing.scheme.loan_amount);
        println!("  Periodic payment:  ${:.2}", financing.summary.periodic_payment);
        println!("  Total interest:    ${:.2}", financing.summary.total_interest);
        println!("  Annual debt svc:   ${:.2}", financing.summary.annual_debt_service);
        println!();
    }

    println!("KPIs:");
    println!("  ROI:               {:.2}%", kpis.roi);
    println!("  IRR:               {:.2}% ({:?})", kpis.irr, kpis.irr_status);
    println!("  NPV:               ${:.2}", kpis.npv);
    match kpis.payback_period {
        Some(p) => println!("  Payback:           {:.1} months", p),
        None => println!("  Payback:           not recovered"),
    }
    println!("  Profit index:      {:.3}", kpis.profitability_index);
    println!("  Profit margin:     {:.2}%", kpis.profit_margin);
    println!("  Cap rate:          {:.2}%", kpis.cap_rate);
    println!("  DSCR:              {:.2}", kpis.debt_service_coverage_ratio);
    println!("  Break-even occ.:   {:.2}%", kpis.break_even_occupancy);
    println!(
        "  Per m2:            cost ${:.2}, revenue ${:.2}, profit ${:.2}",
        kpis.cost_per_m2, kpis.revenue_per_m2, kpis.profit_per_m2
    );
    println!();

    let five_year = generate_five_year_projection(scenario);
    println!("Five-year projection:");
    println!("{:>5} {:>16} {:>16} {:>16} {:>16} {:>8}", "Year", "Revenue", "Costs", "Profit", "Cash", "ROI%");
    for (year, summary) in &five_year.years {
        println!(
            "{:>5} {:>16.2} {:>16.2} {:>16.2} {:>16.2} {:>8.2}",
            year, summary.revenue, summary.costs, summary.profit, summary.cash_flow, summary.roi
        );
    }
}

fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating {}", path.display()))?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    println!("\nWritten to: {}", path.display());
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Simulate {
            scenario,
            market,
            json,
            csv,
        } => {
            let (base, simulator) = prepare(cli.config.as_deref(), &market)?;
            let config = simulator.presets().scenario(scenario, &base);
            let result = simulator.simulate_scenario(&config)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print_scenario(&result);
            }
            if let Some(path) = csv {
                write_csv(&path, &result.sales_projection.cash_flow)?;
            }
        }
        Command::Compare { market, json } => {
            let (base, simulator) = prepare(cli.config.as_deref(), &market)?;
            let scenarios = simulator.simulate_predefined(&base)?;
            let comparison = compare_scenarios(&scenarios);

            if json {
                println!("{}", serde_json::to_string_pretty(&comparison)?);
                return Ok(());
            }

            println!(
                "{:<28} {:>16} {:>16} {:>8} {:>8} {:>16} {:>8}",
                "Scenario", "Cost", "Revenue", "ROI%", "IRR%", "NPV", "Margin%"
            );
            println!("{}", "-".repeat(106));
            for scenario in &scenarios {
                let k = &scenario.kpis;
                println!(
                    "{:<28} {:>16.2} {:>16.2} {:>8.2} {:>8.2} {:>16.2} {:>8.2}",
                    scenario.id,
                    scenario.budget.total_cost,
                    scenario.sales_projection.metrics.total_revenue,
                    k.roi,
                    k.irr,
                    k.npv,
                    k.profit_margin
                );
            }
            let best = &comparison.best;
            println!();
            println!("Highest ROI:    {}", best.highest_roi.as_deref().unwrap_or("-"));
            println!("Highest IRR:    {}", best.highest_irr.as_deref().unwrap_or("-"));
            println!("Highest margin: {}", best.highest_margin.as_deref().unwrap_or("-"));
        }
        Command::Amortize {
            amount,
            down_payment,
            rate,
            years,
            frequency,
            financing_type,
            fee,
            json,
            csv,
        } => {
            let scheme =
                create_financing_scheme(financing_type, amount, down_payment, rate, years, frequency, fee)?;
            let table = calculate_amortization_table(&scheme);
            let summary = summarize_amortization(&scheme, &table);

            if json {
                let output = serde_json::json!({
                    "scheme": scheme,
                    "summary": summary,
                    "schedule": table,
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                println!("Loan: ${:.2} at {:.2}% over {} years ({})", scheme.loan_amount, rate, years, frequency);
                println!("{:>6} {:>14} {:>14} {:>14} {:>16}", "Period", "Payment", "Principal", "Interest", "Balance");
                println!("{}", "-".repeat(68));
                for entry in table.iter().take(24) {
                    println!(
                        "{:>6} {:>14.2} {:>14.2} {:>14.2} {:>16.2}",
                        entry.period, entry.payment, entry.principal, entry.interest, entry.balance
                    );
                }
                if table.len() > 24 {
                    println!("... ({} more periods)", table.len() - 24);
                }
                println!();
                println!("  Total paid:          ${:.2}", summary.total_paid);
                println!("  Total interest:      ${:.2}", summary.total_interest);
                println!("  Origination fee:     ${:.2}", summary.origination_fee);
                println!("  Total cost of credit: ${:.2}", summary.total_cost_of_credit);
            }
            if let Some(path) = csv {
                write_csv(&path, &table)?;
            }
        }
        Command::Fees { amount, region, json } => {
            let schedule = calculate_taxes_and_fees(amount, &region);
            if json {
                println!("{}", serde_json::to_string_pretty(&schedule)?);
            } else {
                if schedule.used_default {
                    println!("No fee table for '{}', using default rates", region);
                }
                for (name, value) in &schedule.fees {
                    println!("  {:<24} ${:>14.2}", name, value);
                }
                println!("  {:<24} ${:>14.2}", "Total", schedule.total());
            }
        }
    }

    Ok(())
}
