//! DriftLab CLI — simulate prices, run strategies, report on ledgers.
//!
//! Commands:
//! - `simulate` — generate a synthetic price table and write it to a file
//! - `run` — run a trading strategy over simulated or file-based prices
//! - `report` — replay a ledger and print portfolio history and profit

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use driftlab_core::data::load_table;
use driftlab_core::domain::PriceMatrix;
use driftlab_core::ledger::{parse_ledger, profit_curve, read_ledger};
use driftlab_core::rng::RngHierarchy;
use driftlab_core::sim::{generate, SimConfig, DEFAULT_NEWS_PROBABILITY};
use driftlab_core::strategy::{self, StrategySpec, DEFAULT_FEES};

#[derive(Parser)]
#[command(
    name = "driftlab",
    about = "DriftLab CLI — synthetic market simulation and strategy runs"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a synthetic price table and write it to a file.
    Simulate {
        /// Number of trading days to simulate.
        #[arg(long, default_value_t = 252)]
        days: usize,

        /// Initial price per stock (repeat for several stocks).
        #[arg(long = "initial-price", required = true)]
        initial_prices: Vec<f64>,

        /// Daily volatility per stock (one per --initial-price).
        #[arg(long = "volatility", required = true)]
        volatilities: Vec<f64>,

        /// Per-day probability of a news event per stock.
        #[arg(long, default_value_t = DEFAULT_NEWS_PROBABILITY)]
        news_probability: f64,

        /// Master seed for the run.
        #[arg(long, default_value_t = 0)]
        seed: u64,

        /// Output table file. The first row holds the volatilities.
        #[arg(long, default_value = "prices.txt")]
        output: PathBuf,
    },
    /// Run a trading strategy and write its ledger.
    Run {
        /// Path to a TOML strategy config.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Named strategy with defaults: random, crossing_averages, momentum.
        #[arg(long)]
        strategy: Option<String>,

        /// Price table file (first row volatilities). Simulates when absent.
        #[arg(long)]
        data: Option<PathBuf>,

        /// Days to simulate when --data is absent.
        #[arg(long, default_value_t = 252)]
        days: usize,

        /// Initial price per simulated stock.
        #[arg(long = "initial-price")]
        initial_prices: Vec<f64>,

        /// Daily volatility per simulated stock.
        #[arg(long = "volatility")]
        volatilities: Vec<f64>,

        /// Per-day news event probability for the simulation.
        #[arg(long, default_value_t = DEFAULT_NEWS_PROBABILITY)]
        news_probability: f64,

        /// Fixed fee charged per transaction.
        #[arg(long, default_value_t = DEFAULT_FEES)]
        fees: f64,

        /// Master seed for the run.
        #[arg(long, default_value_t = 0)]
        seed: u64,

        /// Ledger output file.
        #[arg(long, default_value = "ledger.txt")]
        ledger: PathBuf,
    },
    /// Replay a ledger and print portfolio history and profit.
    Report {
        /// Ledger file to replay.
        #[arg(long)]
        ledger: PathBuf,

        /// Also show buy/sell days and net cash for this stock.
        #[arg(long)]
        stock: Option<usize>,

        /// Emit the full report as JSON instead of text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Simulate {
            days,
            initial_prices,
            volatilities,
            news_probability,
            seed,
            output,
        } => run_simulate(
            days,
            initial_prices,
            volatilities,
            news_probability,
            seed,
            &output,
        ),
        Commands::Run {
            config,
            strategy,
            data,
            days,
            initial_prices,
            volatilities,
            news_probability,
            fees,
            seed,
            ledger,
        } => run_strategy_cmd(
            config,
            strategy,
            data,
            days,
            initial_prices,
            volatilities,
            news_probability,
            fees,
            seed,
            &ledger,
        ),
        Commands::Report {
            ledger,
            stock,
            json,
        } => run_report(&ledger, stock, json),
    }
}

fn run_simulate(
    days: usize,
    initial_prices: Vec<f64>,
    volatilities: Vec<f64>,
    news_probability: f64,
    seed: u64,
    output: &Path,
) -> Result<()> {
    let mut config = SimConfig::new(days, initial_prices, volatilities.clone());
    config.news_probability = news_probability;

    let hierarchy = RngHierarchy::new(seed);
    let mut rng = hierarchy.stream("sim");
    let prices = generate(&config, &mut rng).context("simulation failed")?;

    write_table(&prices, &volatilities, output)?;
    println!(
        "Wrote {} days x {} stocks to {}",
        prices.n_days(),
        prices.n_stocks(),
        output.display()
    );
    Ok(())
}

/// Table format: volatility header row, then one row per day. Failed
/// prices are written as 0 so the file round-trips through `load_table`.
fn write_table(prices: &PriceMatrix, volatilities: &[f64], output: &Path) -> Result<()> {
    let mut text = String::new();
    for (i, v) in volatilities.iter().enumerate() {
        if i > 0 {
            text.push(' ');
        }
        let _ = write!(text, "{v}");
    }
    text.push('\n');
    for day in 0..prices.n_days() {
        for stock in 0..prices.n_stocks() {
            if stock > 0 {
                text.push(' ');
            }
            let value = prices.get(day, stock);
            let _ = write!(text, "{:.4}", if value.is_nan() { 0.0 } else { value });
        }
        text.push('\n');
    }
    std::fs::write(output, text).with_context(|| format!("writing {}", output.display()))?;
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn run_strategy_cmd(
    config_path: Option<PathBuf>,
    strategy_name: Option<String>,
    data: Option<PathBuf>,
    days: usize,
    initial_prices: Vec<f64>,
    volatilities: Vec<f64>,
    news_probability: f64,
    fees: f64,
    seed: u64,
    ledger: &Path,
) -> Result<()> {
    if config_path.is_some() && strategy_name.is_some() {
        bail!("--config and --strategy are mutually exclusive");
    }

    let spec = if let Some(path) = config_path {
        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("reading {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("parsing {}", path.display()))?
    } else {
        match strategy_name.as_deref() {
            None | Some("random") => StrategySpec::random(),
            Some("crossing_averages") => StrategySpec::crossing_averages(),
            Some("momentum") => StrategySpec::momentum(),
            Some(other) => bail!(
                "unknown strategy {other:?}; expected random, crossing_averages, or momentum"
            ),
        }
    };

    let hierarchy = RngHierarchy::new(seed);
    let prices = if let Some(path) = data {
        let table = load_table(&path, true)
            .with_context(|| format!("loading table {}", path.display()))?;
        table.prices
    } else {
        if initial_prices.is_empty() {
            bail!("provide --data, or --initial-price/--volatility pairs to simulate");
        }
        let mut config = SimConfig::new(days, initial_prices, volatilities);
        config.news_probability = news_probability;
        let mut rng = hierarchy.stream("sim");
        generate(&config, &mut rng).context("simulation failed")?
    };

    if ledger.exists() {
        bail!(
            "{} already exists; the ledger is append-only, pick a fresh path",
            ledger.display()
        );
    }

    let mut rng = hierarchy.stream("strategy");
    strategy::run(&spec, &prices, fees, ledger, &mut rng)
        .with_context(|| format!("running {} strategy", spec.name()))?;

    println!("Ledger written to {}", ledger.display());
    run_report(ledger, None, false)
}

fn run_report(ledger: &Path, stock: Option<usize>, json: bool) -> Result<()> {
    let report = read_ledger(ledger, stock)
        .with_context(|| format!("replaying {}", ledger.display()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Initial portfolio: {:?}", report.initial_portfolio);
    println!("Final portfolio:   {:?}", report.final_portfolio);
    println!(
        "Trading days after creation: {}",
        report.summary.trading_days_after_creation
    );
    println!("Total spent:  {:.2}", report.summary.total_spent);
    println!("Total earned: {:.2}", report.summary.total_earned);
    println!("Net profit:   {:.2}", report.summary.net_profit);

    if let Some(detail) = &report.stock_detail {
        println!("Stock {}:", detail.stock);
        println!("  bought on days: {:?}", detail.bought_days);
        println!("  sold on days:   {:?}", detail.sold_days);
        println!("  net cash:       {:.2}", detail.net_cash);
    }

    let transactions = parse_ledger(ledger)?;
    if let Some((day, total)) = profit_curve(&transactions).last() {
        println!("Cumulative cash flow through day {day}: {total:.2}");
    }
    Ok(())
}
