use rust_decimal::Decimal;
use serde::Serialize;

use crate::common::types::Side;

/// How the order size is determined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Sizing {
    /// Spend `amount` of quote currency at the live quote
    Notional { amount: Decimal },
    /// Trade exactly `quantity`, priced off the strategy's price
    FixedQuantity {
        quantity: Decimal,
        reference_price: Decimal,
    },
    /// Size from the risk budget, priced off the strategy's price
    RiskBudget { reference_price: Decimal },
}

/// A decoded trading instruction
///
/// Produced once per alert and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Instruction {
    pub action: Side,
    pub symbol: String,
    pub sizing: Sizing,
}

impl Instruction {
    /// Price the strategy asked for, if the alert carried one
    pub fn strategy_price(&self) -> Option<Decimal> {
        match self.sizing {
            Sizing::Notional { .. } => None,
            Sizing::FixedQuantity {
                reference_price, ..
            }
            | Sizing::RiskBudget { reference_price } => Some(reference_price),
        }
    }
}
