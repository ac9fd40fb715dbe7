pub mod ledger;
pub mod position;

pub use ledger::Ledger;
pub use position::{LedgerState, Position};
