use crate::engine::execution::Trade;
use crate::portfolio::position::{LedgerState, Position};
use crate::strategy::CrossDirection;
use chrono::{DateTime, Utc};
use tracing::debug;

//all-in / all-out trading account driven by crossover events
#[derive(Debug, Clone)]
pub struct Ledger {
    //initial account balance
    pub initial_capital: f64,

    //current cash, shares and position
    state: LedgerState,

    //complete trade log
    trade_log: Vec<Trade>,
}

impl Ledger {
    //creates a new flat ledger holding the initial capital in cash
    pub fn new(initial_capital: f64) -> Self {
        Ledger {
            initial_capital,
            state: LedgerState::new(initial_capital),
            trade_log: Vec::new(),
        }
    }

    //applies a crossover at the given index price
    //returns the trade if the event changed the position
    pub fn apply(
        &mut self,
        direction: CrossDirection,
        index: usize,
        timestamp: DateTime<Utc>,
        price: f64,
    ) -> Option<Trade> {
        let trade = match (self.state.position, direction) {
            (Position::Flat, CrossDirection::Up) => {
                self.state.shares = self.state.cash / price;
                self.state.cash = 0.0;
                self.state.position = Position::Long;
                Trade::buy(index, timestamp, price)
            }
            (Position::Long, CrossDirection::Down) => {
                self.state.cash = self.state.shares * price;
                self.state.shares = 0.0;
                self.state.position = Position::Flat;
                Trade::sell(index, timestamp, price)
            }
            //up while long, or down while flat
            _ => return None,
        };

        debug!(
            side = %trade.side,
            index,
            price,
            cash = self.state.cash,
            shares = self.state.shares,
            "trade executed"
        );

        self.trade_log.push(trade);
        Some(trade)
    }

    //current balances
    pub fn state(&self) -> LedgerState {
        self.state
    }

    pub fn position(&self) -> Position {
        self.state.position
    }

    //value of the account marked at the given price
    pub fn mark_to_market(&self, price: f64) -> f64 {
        self.state.mark_to_market(price)
    }

    //cash the account would hold after selling everything at `last_price`
    //the implicit sale is not logged as a trade
    pub fn liquidation_value(&self, last_price: f64) -> f64 {
        match self.state.position {
            Position::Flat => self.state.cash,
            Position::Long => self.state.shares * last_price,
        }
    }

    pub fn trades(&self) -> &[Trade] {
        &self.trade_log
    }

    //consumes the ledger and returns its trade log
    pub fn into_trades(self) -> Vec<Trade> {
        self.trade_log
    }
}
