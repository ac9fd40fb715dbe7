pub mod crossover;
pub mod smoothing;

pub use crossover::{crossover_at, detect, first_valid_index, CrossDirection, CrossoverEvent};
pub use smoothing::{smooth, warmup_len, Signal};
