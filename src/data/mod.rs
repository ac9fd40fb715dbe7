pub mod loader;
pub mod price;

pub use loader::{load_csv, load_csv_for_symbol, parse_timestamp};
pub use price::{prices_of, timestamps_of, PriceError, PricePoint};
