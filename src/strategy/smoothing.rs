use crate::config::SmoothingKind;
use crate::error::{BacktestError, Result};
use serde::{Deserialize, Serialize};

//the rolling sma sum is rebuilt from scratch this often to stop drift
const RESEED_INTERVAL: usize = 1024;

//a smoothed series aligned index-for-index with the prices it came from
//entries before `first_valid` are warm-up and hold NaN
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub kind: SmoothingKind,
    pub window: usize,
    pub values: Vec<f64>,
    pub first_valid: usize,
}

impl Signal {
    //returns the value at index i, or none during warm-up
    pub fn get(&self, i: usize) -> Option<f64> {
        if i < self.first_valid {
            return None;
        }
        self.values.get(i).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

//first index at which a smoothed series of this kind is defined
pub fn warmup_len(kind: SmoothingKind, window: usize) -> usize {
    match kind {
        SmoothingKind::Sma => window.saturating_sub(1),
        SmoothingKind::Ema => 0,
    }
}

//smooths a raw price sequence with the given window
pub fn smooth(prices: &[f64], window: usize, kind: SmoothingKind) -> Result<Signal> {
    if window == 0 {
        return Err(BacktestError::InvalidWindow { window });
    }
    if prices.is_empty() {
        return Err(BacktestError::EmptyInput);
    }

    let values = match kind {
        SmoothingKind::Sma => {
            if window >= prices.len() {
                return Err(BacktestError::InsufficientData {
                    required: window,
                    got: prices.len(),
                });
            }
            sma(prices, window)
        }
        SmoothingKind::Ema => ema(prices, window),
    };

    Ok(Signal {
        kind,
        window,
        values,
        first_valid: warmup_len(kind, window),
    })
}

//rolling-sum simple moving average, NaN during warm-up
fn sma(prices: &[f64], window: usize) -> Vec<f64> {
    let mut result = vec![f64::NAN; window - 1];
    result.reserve(prices.len() + 1 - window);

    let period = window as f64;
    let mut sum: f64 = prices[..window].iter().sum();
    result.push(sum / period);

    for i in window..prices.len() {
        if (i - window + 1) % RESEED_INTERVAL == 0 {
            sum = prices[i + 1 - window..=i].iter().sum();
        } else {
            sum += prices[i] - prices[i - window];
        }
        result.push(sum / period);
    }

    result
}

//exponential moving average seeded from the first price
fn ema(prices: &[f64], window: usize) -> Vec<f64> {
    let alpha = 2.0 / (window as f64 + 1.0);
    let mut result = Vec::with_capacity(prices.len());

    let mut current = prices[0];
    result.push(current);

    for &price in &prices[1..] {
        current = alpha * price + (1.0 - alpha) * current;
        result.push(current);
    }

    result
}
