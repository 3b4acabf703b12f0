//! Closed-form curve math - cost function and divisor calibration
//!
//! Tick counts, not base units, drive every summation:
//! - m = n / UNIT_SCALE, K = quad_cap / UNIT_SCALE
//! - sum_sq(m) = m·(m-1)·(2m-1) / 6
//! - m <= K: cost = sum_sq(m)·ONE_UNIT / (6·divisor)
//! - m > K:  cost = sum_sq(K)·ONE_UNIT / (6·divisor) + pK·(m - K)
//!   with pK = K²·ONE_UNIT / (6·divisor)
//!
//! The `/6` in `sum_sq` and the `6·divisor` denominator are separate floor
//! divisions in the settlement contract. Do not cancel them.

use log::debug;

use crate::{CurveError, CurveParameters, U256, FREE_TICKS, ONE_UNIT, UNIT_SCALE};

const TWO: U256 = U256::from_limbs([2u64, 0, 0, 0]);
const SIX: U256 = U256::from_limbs([6u64, 0, 0, 0]);

#[inline]
fn mul(a: U256, b: U256) -> Result<U256, CurveError> {
    a.checked_mul(b).ok_or(CurveError::Overflow)
}

#[inline]
fn add(a: U256, b: U256) -> Result<U256, CurveError> {
    a.checked_add(b).ok_or(CurveError::Overflow)
}

#[inline]
fn div(a: U256, b: U256) -> Result<U256, CurveError> {
    a.checked_div(b).ok_or(CurveError::DivisionByZero)
}

/// Convert a base-unit quantity to whole ticks (floor)
#[inline]
pub fn ticks(amount: U256) -> U256 {
    amount / UNIT_SCALE
}

/// Sum of squares of the first `m` ticks: 0² + 1² + ... + (m-1)²
///
/// Evaluated as `m·(m-1)·(2m-1) / 6`, one floor division at the end.
pub fn sum_sq(m: U256) -> Result<U256, CurveError> {
    if m.is_zero() {
        return Ok(U256::ZERO);
    }
    let m_minus_one = m - U256::from(1u64);
    let two_m_minus_one = mul(TWO, m)? - U256::from(1u64);
    let product = mul(mul(m, m_minus_one)?, two_m_minus_one)?;
    Ok(product / SIX)
}

/// Cumulative payment to buy `n` base units from a cold start
///
/// # Arguments
/// * `n` - Token quantity in base units
/// * `quad_cap` - Quantity where pricing turns linear (base units)
/// * `divisor` - Calibration constant, must be non-zero
///
/// # Returns
/// * Total cost in the payment asset's base units
/// * `CurveError::ZeroDivisor` if `divisor == 0`
/// * `CurveError::Overflow` if an intermediate exceeds 256 bits
pub fn cost(n: U256, quad_cap: U256, divisor: U256) -> Result<U256, CurveError> {
    if divisor.is_zero() {
        return Err(CurveError::ZeroDivisor);
    }

    let m = ticks(n);
    // First two ticks are free (contract bootstrap behavior)
    if m < FREE_TICKS {
        return Ok(U256::ZERO);
    }

    let k = ticks(quad_cap);
    let denom = mul(SIX, divisor)?;

    // Pure quadratic phase
    if m <= k {
        return div(mul(sum_sq(m)?, ONE_UNIT)?, denom);
    }

    // Mixed phase: full quadratic area up to K, then a flat tail at pK per tick
    let quad_area = div(mul(sum_sq(k)?, ONE_UNIT)?, denom)?;
    let pk = div(mul(mul(k, k)?, ONE_UNIT)?, denom)?;
    let tail = mul(pk, m - k)?;

    add(quad_area, tail)
}

/// Price of one tick in the linear tail, `K²·ONE_UNIT / (6·divisor)`
pub fn transition_price(quad_cap: U256, divisor: U256) -> Result<U256, CurveError> {
    if divisor.is_zero() {
        return Err(CurveError::ZeroDivisor);
    }
    let k = ticks(quad_cap);
    div(mul(mul(k, k)?, ONE_UNIT)?, mul(SIX, divisor)?)
}

/// Price of the next tick after `n`: `cost(n + UNIT_SCALE) - cost(n)`
///
/// This is the difference the contract actually charges, not a derivative.
pub fn marginal_price(n: U256, quad_cap: U256, divisor: U256) -> Result<U256, CurveError> {
    let next = add(n, UNIT_SCALE)?;
    let hi = cost(next, quad_cap, divisor)?;
    let lo = cost(n, quad_cap, divisor)?;
    Ok(hi - lo)
}

/// Incremental cost to move the curve from `from` to `to` tokens sold
pub fn cost_between(params: &CurveParameters, from: U256, to: U256) -> Result<U256, CurveError> {
    if to > params.sale_cap() {
        return Err(CurveError::SoldExceedsCap {
            sold: to,
            sale_cap: params.sale_cap(),
        });
    }
    if from > to {
        return Err(CurveError::AmountExceedsSupply {
            requested: from,
            available: to,
        });
    }
    let hi = params.cost(to)?;
    let lo = params.cost(from)?;
    Ok(hi - lo)
}

/// Solve for the divisor that makes `cost(sale_cap) == target_raised`
///
/// `cost` is linear in `1/divisor`, so this is a direct inversion:
/// - M <= K: divisor = sum_sq(M)·ONE_UNIT / (6·target)
/// - M > K:  divisor = (sum_sq(K) + K²·(M - K))·ONE_UNIT / (6·target)
///
/// Floor division leaves a residue; see [`calibration_tolerance`].
pub fn solve_divisor(
    sale_cap: U256,
    quad_cap: U256,
    target_raised: U256,
) -> Result<U256, CurveError> {
    if target_raised.is_zero() {
        return Err(CurveError::ZeroTarget);
    }
    if quad_cap.is_zero() || quad_cap > sale_cap {
        return Err(CurveError::InvalidQuadCap { quad_cap, sale_cap });
    }

    let m = ticks(sale_cap);
    let k = ticks(quad_cap);

    let weight = if m <= k {
        sum_sq(m)?
    } else {
        add(sum_sq(k)?, mul(mul(k, k)?, m - k)?)?
    };

    let divisor = div(mul(weight, ONE_UNIT)?, mul(SIX, target_raised)?)?;
    if divisor.is_zero() {
        return Err(CurveError::DegenerateCurve);
    }

    debug!(
        "calibrated divisor={} (sale_cap={}, quad_cap={}, target={})",
        divisor, sale_cap, quad_cap, target_raised
    );

    Ok(divisor)
}

/// Maximum |cost(sale_cap) - target| after calibrating with `divisor`
///
/// - Undershoot: each tail tick floors pK once, plus one floor for the
///   quadratic area: at most `(M - K) + 1`.
/// - Overshoot: flooring the divisor raises every price by a factor below
///   `1 + 1/divisor`: at most `target / divisor + 1`.
///
/// For realistic sales `target / divisor` is zero.
pub fn calibration_tolerance(
    sale_cap: U256,
    quad_cap: U256,
    target_raised: U256,
    divisor: U256,
) -> Result<U256, CurveError> {
    if divisor.is_zero() {
        return Err(CurveError::ZeroDivisor);
    }
    let tail_ticks = ticks(sale_cap).saturating_sub(ticks(quad_cap));
    let overshoot = target_raised / divisor;
    add(add(tail_ticks, overshoot)?, TWO)
}
