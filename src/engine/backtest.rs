use crate::config::SmoothingKind;
use crate::data::{prices_of, timestamps_of, PricePoint};
use crate::engine::execution::Trade;
use crate::error::{BacktestError, Result};
use crate::metrics::{calculate_equity_curve, EquityPoint, PortfolioValuator, SummaryMetrics};
use crate::portfolio::Ledger;
use crate::strategy::{detect, first_valid_index, smooth, CrossoverEvent};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

//configuration for a backtest
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BacktestConfig {
    pub short_window: usize,
    pub long_window: usize,
    pub smoothing: SmoothingKind,
    pub initial_capital: f64,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        BacktestConfig {
            short_window: 20,
            long_window: 50,
            smoothing: SmoothingKind::Sma,
            initial_capital: 10000.0,
        }
    }
}

impl BacktestConfig {
    //rejects configurations that can never produce a meaningful run
    pub fn validate(&self) -> Result<()> {
        if self.short_window == 0 || self.long_window == 0 {
            return Err(BacktestError::InvalidConfiguration(format!(
                "windows must be positive (short={}, long={})",
                self.short_window, self.long_window
            )));
        }
        if self.short_window >= self.long_window {
            return Err(BacktestError::InvalidConfiguration(format!(
                "short window ({}) must be less than long window ({})",
                self.short_window, self.long_window
            )));
        }
        if !self.initial_capital.is_finite() || self.initial_capital <= 0.0 {
            return Err(BacktestError::InvalidConfiguration(format!(
                "initial capital must be positive, got {}",
                self.initial_capital
            )));
        }
        Ok(())
    }
}

//result of a backtest
//every per-step vector starts at `first_valid_index` and has the same length
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestResult {
    pub config: BacktestConfig,
    pub initial_capital: f64,
    pub first_valid_index: usize,
    pub timestamps: Vec<DateTime<Utc>>,
    pub prices: Vec<f64>,
    pub short_signal: Vec<f64>,
    pub long_signal: Vec<f64>,
    pub portfolio_value: Vec<f64>,
    pub buy_and_hold_value: Vec<f64>,
    pub events: Vec<CrossoverEvent>,
    pub trades: Vec<Trade>,
    pub final_value: f64,
    pub buy_and_hold_final: f64,
}

impl BacktestResult {
    //equity curve of the strategy
    pub fn equity_curve(&self) -> Vec<EquityPoint> {
        calculate_equity_curve(&self.timestamps, &self.portfolio_value, self.initial_capital)
    }

    //equity curve of the buy-and-hold baseline
    pub fn buy_and_hold_curve(&self) -> Vec<EquityPoint> {
        calculate_equity_curve(
            &self.timestamps,
            &self.buy_and_hold_value,
            self.initial_capital,
        )
    }

    pub fn summary(&self) -> SummaryMetrics {
        SummaryMetrics::from_result(self)
    }
}

//main backtest engine
//holds only the validated configuration, so one engine may run many series
#[derive(Debug, Clone)]
pub struct BacktestEngine {
    config: BacktestConfig,
}

impl BacktestEngine {
    //creates a new backtest engine, failing fast on a bad configuration
    pub fn new(config: BacktestConfig) -> Result<Self> {
        config.validate()?;
        Ok(BacktestEngine { config })
    }

    pub fn config(&self) -> &BacktestConfig {
        &self.config
    }

    //runs the backtest over the given price series
    pub fn run(&self, series: &[PricePoint]) -> Result<BacktestResult> {
        let config = self.config;
        validate_series(series, config.long_window)?;

        info!(
            smoothing = %config.smoothing,
            short = config.short_window,
            long = config.long_window,
            points = series.len(),
            "starting backtest"
        );

        let prices = prices_of(series);
        let timestamps = timestamps_of(series);

        let short = smooth(&prices, config.short_window, config.smoothing)?;
        let long = smooth(&prices, config.long_window, config.smoothing)?;
        let first_valid = first_valid_index(&short, &long);

        let events = detect(&short, &long, first_valid, &timestamps);
        debug!(count = events.len(), first_valid, "crossovers detected");

        let mut ledger = Ledger::new(config.initial_capital);
        let mut valuator = PortfolioValuator::new(
            config.initial_capital,
            prices[first_valid],
            prices.len() - first_valid,
        );

        //main backtest loop
        let mut pending = events.iter().peekable();
        for (i, &price) in prices.iter().enumerate().skip(first_valid) {
            if let Some(event) = pending.next_if(|e| e.index == i) {
                ledger.apply(event.direction, i, event.timestamp, price);
            }

            valuator.record(&ledger.state(), price);
        }

        let last_price = prices[prices.len() - 1];
        let final_value = ledger.liquidation_value(last_price);
        let buy_and_hold_final = valuator.buy_and_hold_at(last_price);
        let (portfolio_value, buy_and_hold_value) = valuator.finish();
        let trades = ledger.into_trades();

        info!(
            trades = trades.len(),
            final_value, buy_and_hold_final, "backtest finished"
        );

        Ok(BacktestResult {
            config,
            initial_capital: config.initial_capital,
            first_valid_index: first_valid,
            timestamps: timestamps[first_valid..].to_vec(),
            prices: prices[first_valid..].to_vec(),
            short_signal: short.values[first_valid..].to_vec(),
            long_signal: long.values[first_valid..].to_vec(),
            portfolio_value,
            buy_and_hold_value,
            events,
            trades,
            final_value,
            buy_and_hold_final,
        })
    }
}

//convenience wrapper: validate config, then run once
pub fn run_backtest(series: &[PricePoint], config: &BacktestConfig) -> Result<BacktestResult> {
    BacktestEngine::new(*config)?.run(series)
}

//checks length, price and ordering preconditions before any computation
fn validate_series(series: &[PricePoint], long_window: usize) -> Result<()> {
    if series.is_empty() {
        return Err(BacktestError::EmptyInput);
    }
    if series.len() <= long_window {
        return Err(BacktestError::InsufficientData {
            required: long_window,
            got: series.len(),
        });
    }

    for (index, point) in series.iter().enumerate() {
        if point.validate().is_err() {
            return Err(BacktestError::InvalidPrice {
                index,
                price: point.price,
            });
        }
        if index > 0 && point.timestamp <= series[index - 1].timestamp {
            return Err(BacktestError::UnorderedTimestamps { index });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::execution::TradeSide;
    use chrono::TimeZone;

    fn series(prices: &[f64]) -> Vec<PricePoint> {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        prices
            .iter()
            .enumerate()
            .map(|(i, &p)| PricePoint::new_unchecked(start + chrono::Duration::days(i as i64), p))
            .collect()
    }

    fn sma_config(short: usize, long: usize) -> BacktestConfig {
        BacktestConfig {
            short_window: short,
            long_window: long,
            smoothing: SmoothingKind::Sma,
            initial_capital: 1000.0,
        }
    }

    #[test]
    fn rejects_bad_configuration() {
        let mut config = sma_config(5, 5);
        assert!(matches!(
            config.validate(),
            Err(BacktestError::InvalidConfiguration(_))
        ));

        config = sma_config(0, 5);
        assert!(matches!(
            config.validate(),
            Err(BacktestError::InvalidConfiguration(_))
        ));

        config = sma_config(2, 5);
        config.initial_capital = 0.0;
        assert!(BacktestEngine::new(config).is_err());

        config.initial_capital = f64::NAN;
        assert!(BacktestEngine::new(config).is_err());
    }

    #[test]
    fn rejects_empty_and_short_series() {
        let config = sma_config(2, 4);
        assert_eq!(run_backtest(&[], &config), Err(BacktestError::EmptyInput));
        assert_eq!(
            run_backtest(&series(&[1.0, 2.0, 3.0, 4.0]), &config),
            Err(BacktestError::InsufficientData {
                required: 4,
                got: 4
            })
        );
    }

    #[test]
    fn rejects_invalid_points() {
        let config = sma_config(2, 3);
        let mut points = series(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        points[2].price = -1.0;
        assert_eq!(
            run_backtest(&points, &config),
            Err(BacktestError::InvalidPrice {
                index: 2,
                price: -1.0
            })
        );

        let mut points = series(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        points[3].timestamp = points[2].timestamp;
        assert_eq!(
            run_backtest(&points, &config),
            Err(BacktestError::UnorderedTimestamps { index: 3 })
        );
    }

    #[test]
    fn series_are_aligned_from_first_valid_index() {
        let prices = [10.0, 11.0, 12.0, 9.0, 8.0, 13.0, 14.0, 15.0, 10.0, 9.0];
        let result = run_backtest(&series(&prices), &sma_config(3, 5)).unwrap();

        assert_eq!(result.first_valid_index, 4);
        let n = prices.len() - 4;
        assert_eq!(result.timestamps.len(), n);
        assert_eq!(result.prices.len(), n);
        assert_eq!(result.short_signal.len(), n);
        assert_eq!(result.long_signal.len(), n);
        assert_eq!(result.portfolio_value.len(), n);
        assert_eq!(result.buy_and_hold_value.len(), n);
        assert_eq!(result.prices[0], 8.0);
        assert_eq!(result.buy_and_hold_value[0], 1000.0);
        assert!(result.short_signal.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn ema_run_starts_at_index_zero() {
        let prices = [10.0, 10.0, 12.0, 14.0, 11.0, 8.0, 7.0, 9.0];
        let config = BacktestConfig {
            short_window: 2,
            long_window: 4,
            smoothing: SmoothingKind::Ema,
            initial_capital: 1000.0,
        };
        let result = run_backtest(&series(&prices), &config).unwrap();

        assert_eq!(result.first_valid_index, 0);
        assert_eq!(result.portfolio_value.len(), prices.len());
        assert_eq!(result.portfolio_value[0], 1000.0);
        assert_eq!(result.trades[0].side, TradeSide::Buy);
        assert_eq!(result.trades[0].index, 2);
    }

    #[test]
    fn result_serializes_with_stable_field_names() {
        let prices = [10.0, 11.0, 12.0, 9.0, 8.0, 13.0, 14.0, 15.0, 10.0, 9.0];
        let result = run_backtest(&series(&prices), &sma_config(3, 5)).unwrap();

        let json = serde_json::to_value(&result).unwrap();
        for key in [
            "portfolio_value",
            "buy_and_hold_value",
            "trades",
            "final_value",
            "buy_and_hold_final",
            "initial_capital",
        ] {
            assert!(json.get(key).is_some(), "missing {}", key);
        }
        assert_eq!(json["trades"][0]["side"], "BUY");
    }
}
