use thiserror::Error;

//errors raised before or during a backtest
//all of these are detected up front, no partial result is ever produced
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BacktestError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("Invalid smoothing window: {window}")]
    InvalidWindow { window: usize },
    #[error("Insufficient data: need more than {required} prices, got {got}")]
    InsufficientData { required: usize, got: usize },
    #[error("Price series is empty")]
    EmptyInput,
    #[error("Invalid price {price} at index {index}")]
    InvalidPrice { index: usize, price: f64 },
    #[error("Timestamp at index {index} is not after the previous one")]
    UnorderedTimestamps { index: usize },
}

pub type Result<T> = std::result::Result<T, BacktestError>;
