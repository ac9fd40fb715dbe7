pub mod backtest;
pub mod execution;
pub mod sweep;

pub use backtest::{run_backtest, BacktestConfig, BacktestEngine, BacktestResult};
pub use execution::{round_trips, RoundTrip, Trade, TradeSide};
pub use sweep::{rank_by_return, run_sweep, SweepEntry};
