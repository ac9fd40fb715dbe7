use crate::portfolio::LedgerState;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

//builds the strategy and buy-and-hold value series in lockstep
#[derive(Debug, Clone)]
pub struct PortfolioValuator {
    initial_capital: f64,
    base_price: f64,
    portfolio_value: Vec<f64>,
    buy_and_hold_value: Vec<f64>,
}

impl PortfolioValuator {
    //the baseline buys once at `base_price` and never trades again
    pub fn new(initial_capital: f64, base_price: f64, capacity: usize) -> Self {
        PortfolioValuator {
            initial_capital,
            base_price,
            portfolio_value: Vec::with_capacity(capacity),
            buy_and_hold_value: Vec::with_capacity(capacity),
        }
    }

    //records one step, after any trade at this step has been applied
    pub fn record(&mut self, state: &LedgerState, price: f64) {
        self.portfolio_value.push(state.mark_to_market(price));
        self.buy_and_hold_value.push(self.buy_and_hold_at(price));
    }

    //value of the baseline at the given price
    pub fn buy_and_hold_at(&self, price: f64) -> f64 {
        self.initial_capital * (price / self.base_price)
    }

    pub fn len(&self) -> usize {
        self.portfolio_value.len()
    }

    pub fn is_empty(&self) -> bool {
        self.portfolio_value.is_empty()
    }

    //returns (portfolio value, buy-and-hold value)
    pub fn finish(self) -> (Vec<f64>, Vec<f64>) {
        (self.portfolio_value, self.buy_and_hold_value)
    }
}

//a point in the equity curve
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EquityPoint {
    pub timestamp: DateTime<Utc>,
    pub equity: f64,
    pub drawdown: f64,
    pub returns: f64,
}

impl EquityPoint {
    pub fn new(timestamp: DateTime<Utc>, equity: f64, drawdown: f64, returns: f64) -> Self {
        EquityPoint {
            timestamp,
            equity,
            drawdown,
            returns,
        }
    }
}

//calculates the equity curve with drawdowns
pub fn calculate_equity_curve(
    timestamps: &[DateTime<Utc>],
    equity_values: &[f64],
    initial_capital: f64,
) -> Vec<EquityPoint> {
    let mut curve = Vec::with_capacity(timestamps.len());
    let mut peak = initial_capital;
    let mut prev_equity = initial_capital;

    for (i, (&timestamp, &equity)) in timestamps.iter().zip(equity_values.iter()).enumerate() {
        //update peak
        if equity > peak {
            peak = equity;
        }

        //calculate drawdown
        let drawdown = if peak > 0.0 {
            (peak - equity) / peak
        } else {
            0.0
        };

        //calculate returns
        let returns = if i == 0 {
            0.0
        } else {
            step_return(prev_equity, equity)
        };

        curve.push(EquityPoint::new(timestamp, equity, drawdown, returns));
        prev_equity = equity;
    }

    curve
}

//calculates maximum drawdown from equity curve
pub fn max_drawdown(equity_curve: &[EquityPoint]) -> f64 {
    equity_curve
        .iter()
        .map(|point| point.drawdown)
        .fold(0.0, f64::max)
}

//calculates step returns from a value series
pub fn calculate_returns(values: &[f64]) -> Vec<f64> {
    values
        .windows(2)
        .map(|pair| step_return(pair[0], pair[1]))
        .collect()
}

fn step_return(prev: f64, curr: f64) -> f64 {
    if prev != 0.0 {
        (curr - prev) / prev
    } else {
        0.0
    }
}
