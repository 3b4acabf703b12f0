//! Inverse queries - how many tokens a payment buys, and buy/sell quotes
//!
//! The caller owns `already_sold` and threads it between calls; nothing here
//! remembers curve state.

use log::{debug, trace};
use serde::Serialize;

use crate::{CurveError, CurveParameters, U256};

/// Payment for a quantity of tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CostQuote {
    /// Payment asset base units
    pub total_cost: U256,
}

/// Result of spending a budget on the curve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PurchaseResult {
    /// Largest quantity the budget covers
    pub tokens_out: U256,

    /// Exact cost of `tokens_out`, never above the budget
    pub cost_paid: U256,
}

/// Maximum `t` with `cost(already_sold + t) - cost(already_sold) <= budget`
///
/// Binary search over `[0, sale_cap - already_sold]`. `cost` is
/// non-decreasing, so the predicate flips at most once and the result is the
/// exact maximum (not an approximation).
///
/// # Returns
/// * `0` for a zero budget or an exhausted sale
/// * `CurveError::SoldExceedsCap` if `already_sold > sale_cap`
pub fn tokens_for_payment(
    budget: U256,
    params: &CurveParameters,
    already_sold: U256,
) -> Result<U256, CurveError> {
    params.check_sold(already_sold)?;

    // Sale exhausted
    if already_sold == params.sale_cap() {
        return Ok(U256::ZERO);
    }
    if budget.is_zero() {
        return Ok(U256::ZERO);
    }

    let base = params.cost(already_sold)?;
    let mut lo = U256::ZERO;
    let mut hi = params.sale_cap() - already_sold;

    // Invariant: lo is affordable, everything above hi is not
    while lo < hi {
        let span = hi - lo;
        let mid = lo + span / U256::from(2u64) + span % U256::from(2u64);
        let spent = params.cost(already_sold + mid)? - base;
        trace!("search lo={} hi={} mid={} spent={}", lo, hi, mid, spent);

        if spent <= budget {
            lo = mid;
        } else {
            hi = mid - U256::from(1u64);
        }
    }

    debug!(
        "budget={} at sold={} buys {} tokens",
        budget, already_sold, lo
    );
    Ok(lo)
}

/// Spend `budget` and report both the quantity and what it actually costs
pub fn quote_purchase(
    budget: U256,
    params: &CurveParameters,
    already_sold: U256,
) -> Result<PurchaseResult, CurveError> {
    let tokens_out = tokens_for_payment(budget, params, already_sold)?;
    let cost_paid = params.cost(already_sold + tokens_out)? - params.cost(already_sold)?;
    Ok(PurchaseResult {
        tokens_out,
        cost_paid,
    })
}

/// Cost to buy exactly `amount` tokens after `already_sold`
pub fn quote_buy(
    amount: U256,
    params: &CurveParameters,
    already_sold: U256,
) -> Result<CostQuote, CurveError> {
    let available = params.remaining(already_sold)?;
    if amount > available {
        return Err(CurveError::AmountExceedsSupply {
            requested: amount,
            available,
        });
    }
    let total_cost = crate::math::cost_between(params, already_sold, already_sold + amount)?;
    Ok(CostQuote { total_cost })
}

/// Refund for selling `amount` tokens back down the curve
pub fn quote_sale(
    amount: U256,
    params: &CurveParameters,
    already_sold: U256,
) -> Result<CostQuote, CurveError> {
    params.check_sold(already_sold)?;
    if amount > already_sold {
        return Err(CurveError::AmountExceedsSupply {
            requested: amount,
            available: already_sold,
        });
    }
    let total_cost = crate::math::cost_between(params, already_sold - amount, already_sold)?;
    Ok(CostQuote { total_cost })
}
