//! Validated curve configuration for one sale

use serde::Serialize;

use crate::math;
use crate::{CurveError, U256, BPS_SCALE};

/// Immutable parameters of a zCurve sale
///
/// Invariants checked at construction:
/// - `0 < quad_cap <= sale_cap`
/// - `divisor > 0`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CurveParameters {
    sale_cap: U256,
    quad_cap: U256,
    divisor: U256,
}

impl CurveParameters {
    pub fn new(sale_cap: U256, quad_cap: U256, divisor: U256) -> Result<Self, CurveError> {
        if quad_cap.is_zero() || quad_cap > sale_cap {
            return Err(CurveError::InvalidQuadCap { quad_cap, sale_cap });
        }
        if divisor.is_zero() {
            return Err(CurveError::ZeroDivisor);
        }
        Ok(Self {
            sale_cap,
            quad_cap,
            divisor,
        })
    }

    /// Build parameters whose full sale raises approximately `target_raised`
    pub fn calibrated(
        sale_cap: U256,
        quad_cap: U256,
        target_raised: U256,
    ) -> Result<Self, CurveError> {
        let divisor = math::solve_divisor(sale_cap, quad_cap, target_raised)?;
        Self::new(sale_cap, quad_cap, divisor)
    }

    pub fn sale_cap(&self) -> U256 {
        self.sale_cap
    }

    pub fn quad_cap(&self) -> U256 {
        self.quad_cap
    }

    pub fn divisor(&self) -> U256 {
        self.divisor
    }

    /// Cumulative cost to buy `n` tokens from zero
    pub fn cost(&self, n: U256) -> Result<U256, CurveError> {
        math::cost(n, self.quad_cap, self.divisor)
    }

    /// Price of the tick following `n`
    pub fn marginal_price(&self, n: U256) -> Result<U256, CurveError> {
        math::marginal_price(n, self.quad_cap, self.divisor)
    }

    /// Constant per-tick price of the linear tail
    pub fn transition_price(&self) -> Result<U256, CurveError> {
        math::transition_price(self.quad_cap, self.divisor)
    }

    /// What the sale collects when every token is sold
    pub fn total_raise(&self) -> Result<U256, CurveError> {
        self.cost(self.sale_cap)
    }

    /// Ticks priced on the linear tail
    pub fn tail_ticks(&self) -> U256 {
        math::ticks(self.sale_cap).saturating_sub(math::ticks(self.quad_cap))
    }

    /// Tokens still available after `already_sold`
    pub fn remaining(&self, already_sold: U256) -> Result<U256, CurveError> {
        self.check_sold(already_sold)?;
        Ok(self.sale_cap - already_sold)
    }

    /// Progress through the sale in basis points (0..=10_000)
    pub fn percent_sold_bps(&self, already_sold: U256) -> Result<u64, CurveError> {
        self.check_sold(already_sold)?;
        let bps = already_sold
            .checked_mul(U256::from(BPS_SCALE))
            .ok_or(CurveError::Overflow)?
            / self.sale_cap;
        // Bounded by BPS_SCALE, fits one limb
        Ok(bps.as_limbs()[0])
    }

    pub(crate) fn check_sold(&self, already_sold: U256) -> Result<(), CurveError> {
        if already_sold > self.sale_cap {
            return Err(CurveError::SoldExceedsCap {
                sold: already_sold,
                sale_cap: self.sale_cap,
            });
        }
        Ok(())
    }
}
