//! Risk sizing: instruction + market snapshot + policy -> priced order

use rust_decimal::Decimal;
use tracing::warn;

use crate::alert::{Instruction, Sizing};
use crate::common::errors::SizeError;
use crate::common::types::{MarketSnapshot, PricedOrder, Side};
use crate::config::types::{RiskPolicy, SymbolRules, UndersizePolicy};

/// Compute quantity and price for an instruction
///
/// Notional-sized instructions cross the spread (buy at ask, sell at bid);
/// price-anchored ones use the strategy price shifted by the slippage offset.
/// Results are rounded to the symbol's steps, and orders under the exchange's
/// minimum notional are refused unless the policy says to bump them.
pub fn size(
    instruction: &Instruction,
    snapshot: &MarketSnapshot,
    policy: &RiskPolicy,
) -> Result<PricedOrder, SizeError> {
    let side = instruction.action;
    let symbol = &instruction.symbol;
    let rules = policy.rules_for(symbol);

    let (raw_price, raw_quantity) = match instruction.sizing {
        Sizing::Notional { amount } => {
            if !snapshot.is_usable() {
                return Err(SizeError::NoMarketData(symbol.clone()));
            }
            let price = snapshot.crossing_price(side);
            (price, checked(amount.checked_div(price), symbol)?)
        }
        Sizing::FixedQuantity {
            quantity,
            reference_price,
        } => (
            checked(anchored_price(reference_price, side, policy.slippage), symbol)?,
            quantity,
        ),
        Sizing::RiskBudget { reference_price } => {
            let price = checked(anchored_price(reference_price, side, policy.slippage), symbol)?;
            if price <= Decimal::ZERO {
                return Err(SizeError::InvalidPrice(price));
            }
            let risk_amount = checked(policy.risk_amount(), symbol)?;
            let quantity = checked(risk_amount.checked_div(price), symbol)?;
            (price, quantity.max(policy.min_quantity))
        }
    };

    let price = checked(round_to_step(raw_price, rules.price_tick), symbol)?;
    if price <= Decimal::ZERO {
        return Err(SizeError::InvalidPrice(price));
    }

    let mut quantity = checked(floor_to_step(raw_quantity, rules.quantity_step), symbol)?;
    let mut notional = checked(quantity.checked_mul(price), symbol)?;

    if quantity <= Decimal::ZERO || notional < policy.min_notional {
        match policy.undersize_policy {
            UndersizePolicy::Reject => {
                return Err(SizeError::BelowMinimumNotional {
                    notional: notional.normalize(),
                    minimum: policy.min_notional,
                })
            }
            UndersizePolicy::Bump => {
                let bumped = checked(minimum_quantity(price, policy.min_notional, &rules), symbol)?;
                warn!(
                    "Raising {} quantity from {} to {} to clear minimum notional {}",
                    symbol, quantity, bumped, policy.min_notional
                );
                quantity = bumped;
                notional = checked(quantity.checked_mul(price), symbol)?;
            }
        }
    }

    Ok(PricedOrder {
        symbol: symbol.clone(),
        side,
        quantity: quantity.normalize(),
        price: price.normalize(),
        notional: notional.normalize(),
        strategy_price: instruction.strategy_price(),
    })
}

fn checked(value: Option<Decimal>, symbol: &str) -> Result<Decimal, SizeError> {
    value.ok_or_else(|| SizeError::OutOfRange(symbol.to_string()))
}

/// Strategy price shifted by the slippage offset: below for buys, above for sells
///
/// `None` on overflow.
pub fn anchored_price(reference: Decimal, side: Side, slippage: Decimal) -> Option<Decimal> {
    let factor = match side {
        Side::Buy => Decimal::ONE.checked_sub(slippage)?,
        Side::Sell => Decimal::ONE.checked_add(slippage)?,
    };
    reference.checked_mul(factor)
}

/// Round down to a multiple of `step`; `None` on overflow
pub fn floor_to_step(value: Decimal, step: Decimal) -> Option<Decimal> {
    if step <= Decimal::ZERO {
        return Some(value);
    }
    value.checked_div(step)?.floor().checked_mul(step)
}

/// Round up to a multiple of `step`; `None` on overflow
pub fn ceil_to_step(value: Decimal, step: Decimal) -> Option<Decimal> {
    if step <= Decimal::ZERO {
        return Some(value);
    }
    value.checked_div(step)?.ceil().checked_mul(step)
}

/// Round to the nearest multiple of `step` (ties to even); `None` on overflow
pub fn round_to_step(value: Decimal, step: Decimal) -> Option<Decimal> {
    if step <= Decimal::ZERO {
        return Some(value);
    }
    value.checked_div(step)?.round().checked_mul(step)
}

/// Smallest step-aligned quantity whose value reaches `min_notional`
fn minimum_quantity(price: Decimal, min_notional: Decimal, rules: &SymbolRules) -> Option<Decimal> {
    let quantity = ceil_to_step(min_notional.checked_div(price)?, rules.quantity_step)?;
    if quantity > Decimal::ZERO {
        Some(quantity)
    } else {
        Some(rules.quantity_step)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn snapshot(bid: Decimal, ask: Decimal) -> MarketSnapshot {
        MarketSnapshot {
            symbol: "XRPUSDT".to_string(),
            bid,
            ask,
            bid_qty: dec!(1000),
            ask_qty: dec!(1000),
            fetched_at: Utc::now(),
        }
    }

    fn instruction(action: Side, sizing: Sizing) -> Instruction {
        Instruction {
            action,
            symbol: "XRPUSDT".to_string(),
            sizing,
        }
    }

    #[test]
    fn test_risk_budget_raised_to_min_quantity() {
        // 50 * 0.01 / 50000 = 0.00001, below the 0.001 floor
        let order = size(
            &instruction(
                Side::Buy,
                Sizing::RiskBudget {
                    reference_price: dec!(50000),
                },
            ),
            &snapshot(dec!(49990), dec!(50010)),
            &RiskPolicy::default(),
        )
        .unwrap();

        assert_eq!(order.quantity, dec!(0.001));
        assert_eq!(order.price, dec!(50000));
        assert_eq!(order.notional, dec!(50));
        assert_eq!(order.strategy_price, Some(dec!(50000)));
    }

    #[test]
    fn test_risk_budget_above_floor() {
        // 0.5 / 0.25 = 2
        let order = size(
            &instruction(
                Side::Sell,
                Sizing::RiskBudget {
                    reference_price: dec!(0.25),
                },
            ),
            &snapshot(dec!(0.24), dec!(0.26)),
            &RiskPolicy {
                min_notional: dec!(0.1),
                ..RiskPolicy::default()
            },
        )
        .unwrap();
        assert_eq!(order.quantity, dec!(2));
    }

    #[test]
    fn test_fixed_quantity_uses_strategy_price() {
        let order = size(
            &instruction(
                Side::Buy,
                Sizing::FixedQuantity {
                    quantity: dec!(100),
                    reference_price: dec!(0.5),
                },
            ),
            &snapshot(dec!(0.49), dec!(0.50)),
            &RiskPolicy::default(),
        )
        .unwrap();

        assert_eq!(order.side, Side::Buy);
        assert_eq!(order.price, dec!(0.5));
        assert_eq!(order.quantity, dec!(100));
        assert_eq!(order.notional, dec!(50));
    }

    #[test]
    fn test_slippage_offsets_by_side() {
        let policy = RiskPolicy {
            slippage: dec!(0.002),
            ..RiskPolicy::default()
        };
        let snap = snapshot(dec!(99), dec!(101));

        let buy = size(
            &instruction(
                Side::Buy,
                Sizing::FixedQuantity {
                    quantity: dec!(1),
                    reference_price: dec!(100),
                },
            ),
            &snap,
            &policy,
        )
        .unwrap();
        assert_eq!(buy.price, dec!(99.8));

        let sell = size(
            &instruction(
                Side::Sell,
                Sizing::FixedQuantity {
                    quantity: dec!(1),
                    reference_price: dec!(100),
                },
            ),
            &snap,
            &policy,
        )
        .unwrap();
        assert_eq!(sell.price, dec!(100.2));
    }

    #[test]
    fn test_notional_crosses_the_spread() {
        let snap = snapshot(dec!(0.49), dec!(0.50));

        let buy = size(
            &instruction(Side::Buy, Sizing::Notional { amount: dec!(10) }),
            &snap,
            &RiskPolicy::default(),
        )
        .unwrap();
        assert_eq!(buy.price, dec!(0.5));
        assert_eq!(buy.quantity, dec!(20));
        assert_eq!(buy.strategy_price, None);

        let sell = size(
            &instruction(Side::Sell, Sizing::Notional { amount: dec!(10) }),
            &snap,
            &RiskPolicy::default(),
        )
        .unwrap();
        assert_eq!(sell.price, dec!(0.49));
        // 10 / 0.49 = 20.408163..., floored to the 0.000001 step
        assert_eq!(sell.quantity, dec!(20.408163));
    }

    #[test]
    fn test_notional_below_minimum_is_rejected() {
        let result = size(
            &instruction(Side::Buy, Sizing::Notional { amount: dec!(0.5) }),
            &snapshot(dec!(0.49), dec!(0.50)),
            &RiskPolicy::default(),
        );
        assert_eq!(
            result,
            Err(SizeError::BelowMinimumNotional {
                notional: dec!(0.5),
                minimum: dec!(1),
            })
        );
    }

    #[test]
    fn test_bump_policy_raises_quantity() {
        let policy = RiskPolicy {
            undersize_policy: UndersizePolicy::Bump,
            ..RiskPolicy::default()
        };
        let order = size(
            &instruction(Side::Buy, Sizing::Notional { amount: dec!(0.5) }),
            &snapshot(dec!(0.29), dec!(0.30)),
            &policy,
        )
        .unwrap();

        // 1 / 0.3 = 3.333333.. rounded up to the step
        assert_eq!(order.quantity, dec!(3.333334));
        assert!(order.notional >= dec!(1));
    }

    #[test]
    fn test_missing_market_data() {
        for (bid, ask) in [(dec!(0), dec!(0.5)), (dec!(0.49), dec!(0)), (dec!(-1), dec!(-1))] {
            let result = size(
                &instruction(Side::Buy, Sizing::Notional { amount: dec!(10) }),
                &snapshot(bid, ask),
                &RiskPolicy::default(),
            );
            assert_eq!(result, Err(SizeError::NoMarketData("XRPUSDT".to_string())));
        }
    }

    #[test]
    fn test_price_rounding_to_zero_is_rejected() {
        let policy = RiskPolicy {
            price_tick: dec!(0.01),
            ..RiskPolicy::default()
        };
        let result = size(
            &instruction(
                Side::Buy,
                Sizing::FixedQuantity {
                    quantity: dec!(1000000),
                    reference_price: dec!(0.001),
                },
            ),
            &snapshot(dec!(0.001), dec!(0.001)),
            &policy,
        );
        assert!(matches!(result, Err(SizeError::InvalidPrice(_))));
    }

    #[test]
    fn test_non_positive_prices_never_yield_an_order() {
        for reference_price in [dec!(0), dec!(-5)] {
            let result = size(
                &instruction(Side::Buy, Sizing::RiskBudget { reference_price }),
                &snapshot(dec!(1), dec!(1)),
                &RiskPolicy::default(),
            );
            assert!(matches!(result, Err(SizeError::InvalidPrice(_))));
        }
    }

    #[test]
    fn test_quantity_floored_to_zero_is_rejected() {
        let result = size(
            &instruction(
                Side::Sell,
                Sizing::FixedQuantity {
                    quantity: dec!(0.0000001),
                    reference_price: dec!(60000),
                },
            ),
            &snapshot(dec!(60000), dec!(60001)),
            &RiskPolicy::default(),
        );
        assert!(matches!(result, Err(SizeError::BelowMinimumNotional { .. })));
    }

    #[test]
    fn test_step_helpers() {
        assert_eq!(floor_to_step(dec!(1.23456789), dec!(0.001)), Some(dec!(1.234)));
        assert_eq!(ceil_to_step(dec!(1.2341), dec!(0.001)), Some(dec!(1.235)));
        assert_eq!(round_to_step(dec!(1.2345), dec!(0.01)), Some(dec!(1.23)));
        assert_eq!(round_to_step(dec!(1.2351), dec!(0.01)), Some(dec!(1.24)));
        assert_eq!(floor_to_step(dec!(5), Decimal::ZERO), Some(dec!(5)));
        assert_eq!(floor_to_step(Decimal::MAX, dec!(0.000001)), None);
    }

    #[test]
    fn test_slippage_on_max_price_is_out_of_range() {
        let policy = RiskPolicy {
            slippage: dec!(0.002),
            ..RiskPolicy::default()
        };
        let mut sell = instruction(
            Side::Sell,
            Sizing::RiskBudget {
                reference_price: Decimal::MAX,
            },
        );
        sell.symbol = "BTCUSDT".to_string();

        let result = size(&sell, &snapshot(dec!(1), dec!(1)), &policy);
        assert_eq!(result, Err(SizeError::OutOfRange("BTCUSDT".to_string())));

        let fixed = instruction(
            Side::Sell,
            Sizing::FixedQuantity {
                quantity: dec!(1),
                reference_price: Decimal::MAX,
            },
        );
        assert_eq!(
            size(&fixed, &snapshot(dec!(1), dec!(1)), &policy),
            Err(SizeError::OutOfRange("XRPUSDT".to_string()))
        );
    }

    #[test]
    fn test_oversized_risk_budget_is_out_of_range() {
        let policy = RiskPolicy {
            max_position_notional: Decimal::MAX,
            risk_fraction: dec!(2),
            ..RiskPolicy::default()
        };
        let result = size(
            &instruction(
                Side::Buy,
                Sizing::RiskBudget {
                    reference_price: dec!(1),
                },
            ),
            &snapshot(dec!(1), dec!(1)),
            &policy,
        );
        assert_eq!(result, Err(SizeError::OutOfRange("XRPUSDT".to_string())));
    }

    #[test]
    fn test_absurd_sizes_are_refused_not_panicking() {
        let result = size(
            &instruction(
                Side::Buy,
                Sizing::FixedQuantity {
                    quantity: dec!(10000000000000000000000000),
                    reference_price: dec!(1),
                },
            ),
            &snapshot(dec!(1), dec!(1)),
            &RiskPolicy::default(),
        );
        assert_eq!(result, Err(SizeError::OutOfRange("XRPUSDT".to_string())));
    }

    #[test]
    fn test_symbol_overrides_apply() {
        let mut policy = RiskPolicy::default();
        policy.symbols.insert(
            "XRPUSDT".to_string(),
            SymbolRules {
                quantity_step: dec!(1),
                price_tick: dec!(0.0001),
            },
        );
        let order = size(
            &instruction(Side::Buy, Sizing::Notional { amount: dec!(10) }),
            &snapshot(dec!(0.4999), dec!(0.3333)),
            &policy,
        )
        .unwrap();
        // 10 / 0.3333 = 30.003..., floored to whole units
        assert_eq!(order.quantity, dec!(30));
        assert_eq!(order.price, dec!(0.3333));
    }
}
