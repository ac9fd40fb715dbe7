use serde::{Deserialize, Serialize};

//the account is either entirely in cash or entirely in the asset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Position {
    #[default]
    Flat,
    Long,
}

//balances carried through the simulation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LedgerState {
    pub position: Position,
    pub cash: f64,
    pub shares: f64,
}

impl LedgerState {
    //creates a new flat state holding all capital as cash
    pub fn new(initial_capital: f64) -> Self {
        LedgerState {
            position: Position::Flat,
            cash: initial_capital,
            shares: 0.0,
        }
    }

    //returns true if the state holds no shares
    pub fn is_flat(&self) -> bool {
        self.position == Position::Flat
    }

    //returns true if all capital is invested
    pub fn is_long(&self) -> bool {
        self.position == Position::Long
    }

    //value of the holdings marked at the given price
    pub fn mark_to_market(&self, price: f64) -> f64 {
        self.cash + self.shares * price
    }

    //checks the no-partial-allocation rule for the current position
    pub fn is_consistent(&self) -> bool {
        match self.position {
            Position::Flat => self.shares == 0.0 && self.cash >= 0.0,
            Position::Long => self.cash == 0.0 && self.shares >= 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_flat_with_all_cash() {
        let state = LedgerState::new(1000.0);
        assert!(state.is_flat());
        assert!(state.is_consistent());
        assert_eq!(state.mark_to_market(55.0), 1000.0);
    }

    #[test]
    fn long_state_marks_shares() {
        let state = LedgerState {
            position: Position::Long,
            cash: 0.0,
            shares: 4.0,
        };
        assert!(state.is_long());
        assert!(state.is_consistent());
        assert_eq!(state.mark_to_market(2.5), 10.0);
    }

    #[test]
    fn partial_allocation_is_inconsistent() {
        let state = LedgerState {
            position: Position::Long,
            cash: 1.0,
            shares: 4.0,
        };
        assert!(!state.is_consistent());
    }
}
