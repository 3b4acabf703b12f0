//! zCurve Model - Piecewise bonding-curve pricing (quadratic, then linear)
//!
//! This crate reproduces off-chain the fixed-point integer arithmetic of the
//! zCurve settlement contract:
//! - `cost`: cumulative payment to buy `n` tokens from a cold start
//! - `solve_divisor`: calibration so a full sale raises a target amount
//! - `tokens_for_payment`: exact inverse via binary search
//! - `sample_curve` / `analyze_scenarios`: chart and what-if helpers
//!
//! **Truncation order matters**: every floor division happens exactly where the
//! contract performs it. Quotes that differ by one rounding step from what the
//! contract charges are bugs.

#![forbid(unsafe_code)]

pub mod math;
pub mod params;
pub mod sampler;
pub mod search;

pub use alloy_primitives::U256;
pub use math::{
    calibration_tolerance, cost, cost_between, marginal_price, solve_divisor, sum_sq, ticks,
    transition_price,
};
pub use params::CurveParameters;
pub use sampler::{
    analyze_scenarios, average_price, sample_curve, CurveSample, ScenarioReport, MAX_SAMPLE_POINTS,
};
pub use search::{
    quote_buy, quote_purchase, quote_sale, tokens_for_payment, CostQuote, PurchaseResult,
};

/// Base units per tick (1e12)
pub const UNIT_SCALE: U256 = U256::from_limbs([1_000_000_000_000u64, 0, 0, 0]);

/// Base units per whole token (1e18)
pub const ONE_UNIT: U256 = U256::from_limbs([1_000_000_000_000_000_000u64, 0, 0, 0]);

/// Ticks below this count are free
pub const FREE_TICKS: U256 = U256::from_limbs([2u64, 0, 0, 0]);

/// Basis points scale (10,000 bps = 100%)
pub const BPS_SCALE: u64 = 10_000;

/// Error types for curve operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CurveError {
    /// Divisor of zero would price every tick at zero
    #[error("divisor must be non-zero")]
    ZeroDivisor,
    /// Calibration target of zero has no divisor
    #[error("target raised must be non-zero")]
    ZeroTarget,
    /// Quad cap outside (0, sale_cap]
    #[error("quad cap {quad_cap} must be in (0, {sale_cap}]")]
    InvalidQuadCap { quad_cap: U256, sale_cap: U256 },
    /// Caller-supplied sold amount is past the sale cap
    #[error("already sold {sold} exceeds sale cap {sale_cap}")]
    SoldExceedsCap { sold: U256, sale_cap: U256 },
    /// Requested quantity is larger than what is left on the curve
    #[error("requested {requested} but only {available} available")]
    AmountExceedsSupply { requested: U256, available: U256 },
    /// Sampler interval count outside `1..=MAX_SAMPLE_POINTS`
    #[error("number of sample points must be between 1 and {}", sampler::MAX_SAMPLE_POINTS)]
    InvalidSampleCount,
    /// Calibration produced a zero divisor (curve too small for the target)
    #[error("curve is too small to calibrate against this target")]
    DegenerateCurve,
    /// Zero denominator reached inside the arithmetic
    #[error("division by zero")]
    DivisionByZero,
    /// Intermediate value does not fit in 256 bits
    #[error("arithmetic overflow")]
    Overflow,
}
