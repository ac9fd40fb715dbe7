use crate::engine::backtest::BacktestResult;
use crate::engine::execution::{round_trips, Trade, TradeSide};
use crate::metrics::valuation::{calculate_returns, max_drawdown};
use prettytable::{Cell, Row, Table};
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

//summary metrics for a backtest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryMetrics {
    pub initial_capital: f64,
    pub final_value: f64,
    pub total_return: f64,
    pub total_return_pct: f64,
    pub buy_and_hold_final: f64,
    pub buy_and_hold_return_pct: f64,
    pub outperformance: f64,
    pub outperformance_pct: f64,
    pub num_trades: usize,
    pub num_winning_trades: usize,
    pub num_losing_trades: usize,
    pub win_rate: f64,
    pub max_drawdown: f64,
    pub sharpe_ratio: f64,
    pub exposure: f64,
}

impl SummaryMetrics {
    //calculate summary metrics from a finished backtest
    pub fn from_result(result: &BacktestResult) -> Self {
        let initial = result.initial_capital;

        let total_return = result.final_value - initial;
        let total_return_pct = return_pct(result.final_value, initial);
        let buy_and_hold_return_pct = return_pct(result.buy_and_hold_final, initial);

        let (wins, losses) = count_wins_losses(&result.trades);
        let completed = wins + losses;
        let win_rate = if completed > 0 {
            wins as f64 / completed as f64
        } else {
            0.0
        };

        let equity_curve = result.equity_curve();
        let returns = calculate_returns(&result.portfolio_value);

        SummaryMetrics {
            initial_capital: initial,
            final_value: result.final_value,
            total_return,
            total_return_pct,
            buy_and_hold_final: result.buy_and_hold_final,
            buy_and_hold_return_pct,
            outperformance: result.final_value - result.buy_and_hold_final,
            outperformance_pct: total_return_pct - buy_and_hold_return_pct,
            num_trades: result.trades.len(),
            num_winning_trades: wins,
            num_losing_trades: losses,
            win_rate,
            max_drawdown: max_drawdown(&equity_curve),
            sharpe_ratio: calculate_sharpe_ratio(&returns),
            exposure: calculate_exposure(
                &result.trades,
                result.first_valid_index,
                result.portfolio_value.len(),
            ),
        }
    }

    //prints metrics in a formatted table
    pub fn pretty_print_table(&self) {
        let mut table = Table::new();

        table.add_row(Row::new(vec![Cell::new("Metric"), Cell::new("Value")]));

        let rows = [
            ("Initial Capital", format!("${:.2}", self.initial_capital)),
            ("Number of Trades", format!("{}", self.num_trades)),
            ("Final Value", format!("${:.2}", self.final_value)),
            (
                "Total Return",
                format!("${:.2} ({:+.2}%)", self.total_return, self.total_return_pct),
            ),
            ("Winning Trades", format!("{}", self.num_winning_trades)),
            ("Losing Trades", format!("{}", self.num_losing_trades)),
            ("Win Rate", format!("{:.2}%", self.win_rate * 100.0)),
            ("Max Drawdown", format!("{:.2}%", self.max_drawdown * 100.0)),
            ("Sharpe Ratio", format!("{:.3}", self.sharpe_ratio)),
            ("Exposure", format!("{:.2}%", self.exposure * 100.0)),
            (
                "Final Value (Buy & Hold)",
                format!("${:.2}", self.buy_and_hold_final),
            ),
            (
                "Total Return (Buy & Hold)",
                format!("{:+.2}%", self.buy_and_hold_return_pct),
            ),
            (
                "Outperformance",
                format!("${:.2} ({:+.2}%)", self.outperformance, self.outperformance_pct),
            ),
        ];

        for (name, value) in rows {
            table.add_row(Row::new(vec![Cell::new(name), Cell::new(&value)]));
        }

        table.printstd();
    }
}

//percentage change from `initial` to `value`
fn return_pct(value: f64, initial: f64) -> f64 {
    (value - initial) / initial * 100.0
}

//counts completed (buy, sell) pairs by outcome
//an open position at the end is not an outcome
pub fn count_wins_losses(trades: &[Trade]) -> (usize, usize) {
    round_trips(trades)
        .iter()
        .fold((0, 0), |(wins, losses), trip| {
            if trip.is_win() {
                (wins + 1, losses)
            } else {
                (wins, losses + 1)
            }
        })
}

fn calculate_sharpe_ratio(returns: &[f64]) -> f64 {
    if returns.len() < 2 {
        return 0.0;
    }

    let mean = returns.mean();
    let std_dev = returns.std_dev();

    if std_dev == 0.0 || !std_dev.is_finite() {
        return 0.0;
    }

    //annualize assuming daily returns
    (mean / std_dev) * (252.0_f64).sqrt()
}

//fraction of valued steps that end in a long position
fn calculate_exposure(trades: &[Trade], first_valid: usize, steps: usize) -> f64 {
    if steps == 0 {
        return 0.0;
    }

    let end = first_valid + steps;
    let mut in_market = 0;
    let mut entry: Option<usize> = None;

    for trade in trades {
        match trade.side {
            TradeSide::Buy => entry = Some(trade.index),
            TradeSide::Sell => {
                if let Some(start) = entry.take() {
                    in_market += trade.index - start;
                }
            }
        }
    }

    //still long at the last step
    if let Some(start) = entry {
        in_market += end - start;
    }

    in_market as f64 / steps as f64
}
