use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use macross::prelude::*;
use prettytable::{Cell, Row, Table};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "macross")]
#[command(about = "A moving-average crossover backtesting engine", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    //run a single backtest
    Run {
        //json run file, flags below override its values
        #[arg(long)]
        config: Option<PathBuf>,

        //path to csv price file (timestamp,price)
        #[arg(long)]
        data: Option<PathBuf>,

        //only use rows for this symbol when the csv has a symbol column
        #[arg(long)]
        symbol: Option<String>,

        //short smoothing window
        #[arg(long)]
        short: Option<usize>,

        //long smoothing window
        #[arg(long)]
        long: Option<usize>,

        //smoothing kind (sma, ema)
        #[arg(long)]
        smoothing: Option<String>,

        //initial capital
        #[arg(long)]
        initial_capital: Option<f64>,

        //output path for the valuation curve csv
        #[arg(long)]
        output_equity_csv: Option<PathBuf>,

        //output path for trades csv
        #[arg(long)]
        output_trades_csv: Option<PathBuf>,

        //output path for the full result as json
        #[arg(long)]
        output_json: Option<PathBuf>,
    },

    //run a grid of window pairs over one series
    Sweep {
        //path to csv price file (timestamp,price)
        #[arg(long)]
        data: PathBuf,

        //only use rows for this symbol when the csv has a symbol column
        #[arg(long)]
        symbol: Option<String>,

        //comma separated short windows
        #[arg(long, value_delimiter = ',', default_value = "5,10,20")]
        shorts: Vec<usize>,

        //comma separated long windows
        #[arg(long, value_delimiter = ',', default_value = "50,100,200")]
        longs: Vec<usize>,

        //smoothing kind (sma, ema)
        #[arg(long, default_value = "sma")]
        smoothing: String,

        //initial capital
        #[arg(long, default_value = "10000")]
        initial_capital: f64,

        //number of ranked rows to print
        #[arg(long, default_value = "10")]
        top: usize,
    },
}

fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            data,
            symbol,
            short,
            long,
            smoothing,
            initial_capital,
            output_equity_csv,
            output_trades_csv,
            output_json,
        } => {
            let mut run = match config {
                Some(path) => BacktestConfiguration::from_json_file(&path)
                    .context(format!("Failed to load run file {:?}", path))?,
                None => BacktestConfiguration::default(),
            };

            //flags override the run file
            if let Some(data) = data {
                run.data_path = data;
            }
            if symbol.is_some() {
                run.symbol = symbol;
            }
            if let Some(short) = short {
                run.strategy.short_window = short;
            }
            if let Some(long) = long {
                run.strategy.long_window = long;
            }
            if let Some(name) = smoothing {
                run.strategy.smoothing = parse_smoothing(&name)?;
            }
            if let Some(capital) = initial_capital {
                run.initial_capital = capital;
            }
            run.output_equity_csv = output_equity_csv.or(run.output_equity_csv);
            run.output_trades_csv = output_trades_csv.or(run.output_trades_csv);
            run.output_json = output_json.or(run.output_json);

            run_single(&run)?;
        }
        Commands::Sweep {
            data,
            symbol,
            shorts,
            longs,
            smoothing,
            initial_capital,
            top,
        } => {
            let base = BacktestConfig {
                smoothing: parse_smoothing(&smoothing)?,
                initial_capital,
                ..BacktestConfig::default()
            };
            run_grid(&data, symbol.as_deref(), &base, &shorts, &longs, top)?;
        }
    }

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "macross=info".into()),
        )
        .init();
}

fn parse_smoothing(name: &str) -> Result<SmoothingKind> {
    SmoothingKind::parse(name).ok_or_else(|| anyhow::anyhow!("Unknown smoothing: {}", name))
}

fn load_series(path: &Path, symbol: Option<&str>) -> Result<Vec<PricePoint>> {
    let series = match symbol {
        Some(symbol) => load_csv_for_symbol(path, symbol),
        None => load_csv(path),
    }
    .context(format!("Failed to load data from {:?}", path))?;

    if let (Some(first), Some(last)) = (series.first(), series.last()) {
        tracing::info!(
            points = series.len(),
            from = %first.timestamp,
            to = %last.timestamp,
            "loaded price series"
        );
    }

    Ok(series)
}

fn run_single(run: &BacktestConfiguration) -> Result<()> {
    let series = load_series(&run.data_path, run.symbol.as_deref())?;
    let config = run.engine_config();

    println!("Moving-Average Crossover Backtest");
    println!("=================================\n");
    match &run.symbol {
        Some(symbol) => println!("Symbol: {}", symbol),
        None => println!("Data: {:?}", run.data_path),
    }
    println!(
        "Strategy: {} Crossover ({}/{})\n",
        config.smoothing, config.short_window, config.long_window
    );

    let result = run_backtest(&series, &config).context("Backtest failed")?;

    result.summary().pretty_print_table();

    if !result.trades.is_empty() {
        println!("\nRecent trades (last 5):");
        let skip = result.trades.len().saturating_sub(5);
        for trade in &result.trades[skip..] {
            println!(
                "  {:4} - {} at ${:.2}",
                trade.side.to_string(),
                trade.timestamp.format("%Y-%m-%d"),
                trade.price
            );
        }
    }

    //save outputs if requested
    if let Some(path) = &run.output_equity_csv {
        save_equity_csv(&result, path)?;
        println!("\nEquity curve saved to {:?}", path);
    }

    if let Some(path) = &run.output_trades_csv {
        save_trades_csv(&result.trades, path)?;
        println!("Trades saved to {:?}", path);
    }

    if let Some(path) = &run.output_json {
        let json = serde_json::to_string_pretty(&result)?;
        std::fs::write(path, json).context(format!("Failed to write {:?}", path))?;
        println!("Result saved to {:?}", path);
    }

    Ok(())
}

fn run_grid(
    data: &Path,
    symbol: Option<&str>,
    base: &BacktestConfig,
    shorts: &[usize],
    longs: &[usize],
    top: usize,
) -> Result<()> {
    let series = load_series(data, symbol)?;
    let results = run_sweep(&series, base, shorts, longs);

    for ((short, long), outcome) in &results {
        if let Err(err) = outcome {
            tracing::warn!(short, long, %err, "window pair failed");
        }
    }

    let mut table = Table::new();
    table.add_row(Row::new(vec![
        Cell::new("Short"),
        Cell::new("Long"),
        Cell::new("Return"),
        Cell::new("Buy & Hold"),
        Cell::new("Trades"),
        Cell::new("Win Rate"),
        Cell::new("Max DD"),
    ]));

    for entry in rank_by_return(&results).into_iter().take(top) {
        let s = &entry.summary;
        table.add_row(Row::new(vec![
            Cell::new(&entry.config.short_window.to_string()),
            Cell::new(&entry.config.long_window.to_string()),
            Cell::new(&format!("{:+.2}%", s.total_return_pct)),
            Cell::new(&format!("{:+.2}%", s.buy_and_hold_return_pct)),
            Cell::new(&s.num_trades.to_string()),
            Cell::new(&format!("{:.2}%", s.win_rate * 100.0)),
            Cell::new(&format!("{:.2}%", s.max_drawdown * 100.0)),
        ]));
    }

    table.printstd();
    Ok(())
}

#[derive(Serialize)]
struct EquityRow {
    timestamp: String,
    price: f64,
    short_signal: f64,
    long_signal: f64,
    portfolio_value: f64,
    buy_and_hold_value: f64,
    drawdown: f64,
    returns: f64,
}

fn save_equity_csv(result: &BacktestResult, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .context(format!("Failed to create {:?}", path))?;

    let curve = result.equity_curve();
    for (i, point) in curve.iter().enumerate() {
        writer.serialize(EquityRow {
            timestamp: point.timestamp.to_rfc3339(),
            price: result.prices[i],
            short_signal: result.short_signal[i],
            long_signal: result.long_signal[i],
            portfolio_value: point.equity,
            buy_and_hold_value: result.buy_and_hold_value[i],
            drawdown: point.drawdown,
            returns: point.returns,
        })?;
    }

    writer.flush()?;
    Ok(())
}

fn save_trades_csv(trades: &[Trade], path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .context(format!("Failed to create {:?}", path))?;

    writer.write_record(["side", "timestamp", "price", "index"])?;
    for trade in trades {
        writer.write_record([
            trade.side.to_string(),
            trade.timestamp.to_rfc3339(),
            trade.price.to_string(),
            trade.index.to_string(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}
