use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

//trade side (buy or sell)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TradeSide {
    Buy,
    Sell,
}

impl fmt::Display for TradeSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeSide::Buy => write!(f, "BUY"),
            TradeSide::Sell => write!(f, "SELL"),
        }
    }
}

//represents an executed all-in or all-out trade
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub side: TradeSide,
    pub timestamp: DateTime<Utc>,
    pub price: f64,
    //series index of the crossover that triggered it
    pub index: usize,
}

impl Trade {
    pub fn buy(index: usize, timestamp: DateTime<Utc>, price: f64) -> Self {
        Trade {
            side: TradeSide::Buy,
            timestamp,
            price,
            index,
        }
    }

    pub fn sell(index: usize, timestamp: DateTime<Utc>, price: f64) -> Self {
        Trade {
            side: TradeSide::Sell,
            timestamp,
            price,
            index,
        }
    }
}

//a buy and the sell that closed it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoundTrip {
    pub entry: Trade,
    pub exit: Trade,
}

impl RoundTrip {
    pub fn is_win(&self) -> bool {
        self.exit.price > self.entry.price
    }

    //return of the round trip as a fraction of the entry price
    pub fn return_pct(&self) -> f64 {
        (self.exit.price - self.entry.price) / self.entry.price
    }
}

//groups an alternating trade list into closed (buy, sell) pairs
//a trailing unmatched buy is left out
pub fn round_trips(trades: &[Trade]) -> Vec<RoundTrip> {
    trades
        .chunks_exact(2)
        .filter_map(|pair| match (pair[0].side, pair[1].side) {
            (TradeSide::Buy, TradeSide::Sell) => Some(RoundTrip {
                entry: pair[0],
                exit: pair[1],
            }),
            _ => None,
        })
        .collect()
}
