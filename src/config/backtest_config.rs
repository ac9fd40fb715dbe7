use crate::engine::BacktestConfig;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

//smoothing applied to the raw prices before crossover detection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SmoothingKind {
    Sma,
    Ema,
}

impl SmoothingKind {
    //parse smoothing kind from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "sma" | "simple" => Some(SmoothingKind::Sma),
            "ema" | "exponential" => Some(SmoothingKind::Ema),
            _ => None,
        }
    }
}

impl fmt::Display for SmoothingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SmoothingKind::Sma => write!(f, "SMA"),
            SmoothingKind::Ema => write!(f, "EMA"),
        }
    }
}

//crossover strategy parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossoverParams {
    pub short_window: usize,
    pub long_window: usize,
    pub smoothing: SmoothingKind,
}

impl Default for CrossoverParams {
    fn default() -> Self {
        CrossoverParams {
            short_window: 20,
            long_window: 50,
            smoothing: SmoothingKind::Sma,
        }
    }
}

//complete run configuration, as stored in a json run file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestConfiguration {
    //data
    pub data_path: PathBuf,
    #[serde(default)]
    pub symbol: Option<String>,

    //account settings
    pub initial_capital: f64,

    //strategy
    pub strategy: CrossoverParams,

    //optional output paths
    #[serde(default)]
    pub output_equity_csv: Option<PathBuf>,
    #[serde(default)]
    pub output_trades_csv: Option<PathBuf>,
    #[serde(default)]
    pub output_json: Option<PathBuf>,
}

impl Default for BacktestConfiguration {
    fn default() -> Self {
        BacktestConfiguration {
            data_path: PathBuf::from("prices.csv"),
            symbol: None,
            initial_capital: 10000.0,
            strategy: CrossoverParams::default(),
            output_equity_csv: None,
            output_trades_csv: None,
            output_json: None,
        }
    }
}

impl BacktestConfiguration {
    //the engine-facing part of the run file
    pub fn engine_config(&self) -> BacktestConfig {
        BacktestConfig {
            short_window: self.strategy.short_window,
            long_window: self.strategy.long_window,
            smoothing: self.strategy.smoothing,
            initial_capital: self.initial_capital,
        }
    }

    //load configuration from a JSON file
    pub fn from_json_file(path: &PathBuf) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: BacktestConfiguration = serde_json::from_str(&contents)?;
        Ok(config)
    }

    //save configuration to a JSON file
    pub fn to_json_file(&self, path: &PathBuf) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn parses_smoothing_kind() {
        assert_eq!(SmoothingKind::parse("SMA"), Some(SmoothingKind::Sma));
        assert_eq!(SmoothingKind::parse("exponential"), Some(SmoothingKind::Ema));
        assert_eq!(SmoothingKind::parse("wma"), None);
    }

    #[test]
    fn json_round_trip_through_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("run.json");

        let mut config = BacktestConfiguration::default();
        config.strategy.smoothing = SmoothingKind::Ema;
        config.symbol = Some("AAPL".to_string());
        config.to_json_file(&path).unwrap();

        let loaded = BacktestConfiguration::from_json_file(&path).unwrap();
        assert_eq!(loaded.strategy, config.strategy);
        assert_eq!(loaded.symbol.as_deref(), Some("AAPL"));
        assert_eq!(loaded.initial_capital, 10000.0);
    }

    #[test]
    fn optional_fields_may_be_omitted() {
        let json = r#"{
            "data_path": "spy.csv",
            "initial_capital": 5000.0,
            "strategy": { "short_window": 12, "long_window": 26, "smoothing": "ema" }
        }"#;

        let config: BacktestConfiguration = serde_json::from_str(json).unwrap();
        let engine = config.engine_config();
        assert_eq!(engine.short_window, 12);
        assert_eq!(engine.long_window, 26);
        assert_eq!(engine.smoothing, SmoothingKind::Ema);
        assert!(config.output_trades_csv.is_none());
    }
}
