//a Rust-based moving-average crossover backtesting engine

pub mod config;
pub mod data;
pub mod engine;
pub mod error;
pub mod metrics;
pub mod portfolio;
pub mod strategy;

//prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{BacktestConfiguration, CrossoverParams, SmoothingKind};
    pub use crate::data::{load_csv, load_csv_for_symbol, PricePoint};
    pub use crate::engine::{
        rank_by_return, run_backtest, run_sweep, BacktestConfig, BacktestEngine, BacktestResult,
        SweepEntry, Trade, TradeSide,
    };
    pub use crate::error::BacktestError;
    pub use crate::metrics::{calculate_equity_curve, EquityPoint, SummaryMetrics};
    pub use crate::portfolio::{Ledger, LedgerState, Position};
    pub use crate::strategy::{smooth, CrossDirection, CrossoverEvent, Signal};
}
