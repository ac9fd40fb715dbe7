pub mod summary;
pub mod valuation;

pub use summary::{count_wins_losses, SummaryMetrics};
pub use valuation::{
    calculate_equity_curve, calculate_returns, max_drawdown, EquityPoint, PortfolioValuator,
};
