//! Curve sampling and scenario comparison for charts and what-if tables
//!
//! Pure consumers of `cost`; no pricing rules of their own.

use serde::Serialize;

use crate::search::tokens_for_payment;
use crate::{CurveError, CurveParameters, U256, ONE_UNIT};

/// One point on a rendered curve
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurveSample {
    pub tokens_sold: U256,
    pub total_cost: U256,
    pub marginal_price: U256,
    /// Display only
    pub percent_sold: f64,
}

/// Calibrated outcome of one candidate fundraising target
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScenarioReport {
    pub target_raised: U256,
    pub divisor: U256,
    /// What the calibrated curve actually collects at sale_cap
    pub total_raised: U256,
    /// Payment per whole token over the full sale
    pub average_price: U256,
    pub transition_price: U256,
    /// Marginal price at 25%, 50%, 75% and 100% sold
    pub marginal_prices: [U256; 4],
    pub reference_payment: U256,
    /// Tokens the reference payment buys from a cold start
    pub tokens_for_reference: U256,
}

/// Largest interval count `sample_curve` accepts
pub const MAX_SAMPLE_POINTS: usize = 1_000_000;

/// `num_points + 1` evenly spaced samples from 0 to sale_cap inclusive
///
/// `num_points` must be in `1..=MAX_SAMPLE_POINTS`. The last sample's marginal
/// price is the price a tick past the cap would have, which is what a chart's
/// final segment shows.
pub fn sample_curve(
    params: &CurveParameters,
    num_points: usize,
) -> Result<Vec<CurveSample>, CurveError> {
    if num_points == 0 || num_points > MAX_SAMPLE_POINTS {
        return Err(CurveError::InvalidSampleCount);
    }
    let len = num_points
        .checked_add(1)
        .ok_or(CurveError::InvalidSampleCount)?;

    let steps = U256::from(num_points as u64);
    let mut samples = Vec::with_capacity(len);

    for i in 0..=num_points {
        let tokens_sold = params
            .sale_cap()
            .checked_mul(U256::from(i as u64))
            .ok_or(CurveError::Overflow)?
            / steps;

        samples.push(CurveSample {
            tokens_sold,
            total_cost: params.cost(tokens_sold)?,
            marginal_price: params.marginal_price(tokens_sold)?,
            // Exact share of the interval count, not the floored token amount
            percent_sold: i as f64 * 100.0 / num_points as f64,
        });
    }

    Ok(samples)
}

/// Full-sale payment per whole token: `cost(sale_cap)·ONE_UNIT / sale_cap`
pub fn average_price(params: &CurveParameters) -> Result<U256, CurveError> {
    params
        .total_raise()?
        .checked_mul(ONE_UNIT)
        .ok_or(CurveError::Overflow)?
        .checked_div(params.sale_cap())
        .ok_or(CurveError::DivisionByZero)
}

/// Calibrate a curve per target and report its pricing profile
pub fn analyze_scenarios(
    sale_cap: U256,
    quad_cap: U256,
    targets: &[U256],
    reference_payment: U256,
) -> Result<Vec<ScenarioReport>, CurveError> {
    targets
        .iter()
        .map(|&target| analyze_one(sale_cap, quad_cap, target, reference_payment))
        .collect()
}

fn analyze_one(
    sale_cap: U256,
    quad_cap: U256,
    target_raised: U256,
    reference_payment: U256,
) -> Result<ScenarioReport, CurveError> {
    let params = CurveParameters::calibrated(sale_cap, quad_cap, target_raised)?;

    let mut marginal_prices = [U256::ZERO; 4];
    for (i, slot) in marginal_prices.iter_mut().enumerate() {
        let quarter = U256::from(i as u64 + 1);
        let at = sale_cap.checked_mul(quarter).ok_or(CurveError::Overflow)? / U256::from(4u64);
        *slot = params.marginal_price(at)?;
    }

    Ok(ScenarioReport {
        target_raised,
        divisor: params.divisor(),
        total_raised: params.total_raise()?,
        average_price: average_price(&params)?,
        transition_price: params.transition_price()?,
        marginal_prices,
        reference_payment,
        tokens_for_reference: tokens_for_payment(reference_payment, &params, U256::ZERO)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::UNIT_SCALE;

    fn tokens(whole: u64) -> U256 {
        U256::from(whole) * ONE_UNIT
    }

    fn reference_params() -> CurveParameters {
        CurveParameters::calibrated(tokens(800_000_000), tokens(200_000_000), tokens(2)).unwrap()
    }

    #[test]
    fn test_sample_endpoints() {
        let params = reference_params();
        let samples = sample_curve(&params, 4).unwrap();

        assert_eq!(samples.len(), 5);
        assert_eq!(samples[0].tokens_sold, U256::ZERO);
        assert_eq!(samples[0].total_cost, U256::ZERO);
        assert_eq!(samples[4].tokens_sold, params.sale_cap());
        assert_eq!(samples[4].total_cost, params.total_raise().unwrap());
        assert_eq!(samples[2].percent_sold, 50.0);
        assert_eq!(samples[4].percent_sold, 100.0);
    }

    #[test]
    fn test_samples_non_decreasing() {
        let params = reference_params();
        let samples = sample_curve(&params, 50).unwrap();
        for pair in samples.windows(2) {
            assert!(pair[0].total_cost <= pair[1].total_cost);
            assert!(pair[0].marginal_price <= pair[1].marginal_price);
        }
    }

    #[test]
    fn test_zero_points_rejected() {
        let params = reference_params();
        assert_eq!(sample_curve(&params, 0), Err(CurveError::InvalidSampleCount));
    }

    #[test]
    fn test_too_many_points_rejected() {
        let params = reference_params();
        assert_eq!(
            sample_curve(&params, usize::MAX),
            Err(CurveError::InvalidSampleCount)
        );
        assert_eq!(
            sample_curve(&params, MAX_SAMPLE_POINTS + 1),
            Err(CurveError::InvalidSampleCount)
        );
    }

    #[test]
    fn test_percent_sold_is_not_rounded() {
        let params = reference_params();
        let samples = sample_curve(&params, 3).unwrap();

        assert_eq!(samples[1].percent_sold, 100.0 / 3.0);
        assert!((samples[2].percent_sold - 66.666_666).abs() < 1e-5);
        assert_eq!(samples[3].percent_sold, 100.0);
    }

    #[test]
    fn test_huge_sale_cap_samples() {
        // Every cost floors to zero on this curve
        let sale_cap = U256::MAX / U256::from(1_000u64);
        let quad_cap = UNIT_SCALE * U256::from(4u64);
        let divisor = U256::MAX / U256::from(7u64);
        let params = CurveParameters::new(sale_cap, quad_cap, divisor).unwrap();

        let samples = sample_curve(&params, 2).unwrap();
        assert_eq!(samples.len(), 3);
        assert_eq!(samples[2].tokens_sold, sale_cap);
        assert_eq!(samples[2].total_cost, U256::ZERO);
        assert_eq!(samples[1].percent_sold, 50.0);
    }

    #[test]
    fn test_reference_scenario_report() {
        let reports = analyze_scenarios(
            tokens(800_000_000),
            tokens(200_000_000),
            &[tokens(2)],
            U256::from(10_000_000_000_000_000u64),
        )
        .unwrap();

        let report = &reports[0];
        assert_eq!(report.total_raised, U256::from(1_999_999_999_999_998_650u64));
        assert_eq!(report.average_price, U256::from(2_499_999_999u64));
        assert_eq!(report.transition_price, U256::from(3_000u64));
        // 25% sold is exactly the quad cap: every quartile is on the flat tail
        assert_eq!(report.marginal_prices, [U256::from(3_000u64); 4]);
        assert_eq!(
            report.tokens_for_reference,
            "73680629972808999999999999".parse::<U256>().unwrap()
        );
    }

    #[test]
    fn test_larger_target_is_steeper() {
        let reports = analyze_scenarios(
            tokens(800_000_000),
            tokens(200_000_000),
            &[tokens(2), tokens(20)],
            U256::from(10_000_000_000_000_000u64),
        )
        .unwrap();

        assert!(reports[1].divisor < reports[0].divisor);
        assert!(reports[1].average_price > reports[0].average_price);
        assert!(reports[1].tokens_for_reference < reports[0].tokens_for_reference);
    }

    #[test]
    fn test_scenario_errors_propagate() {
        let result = analyze_scenarios(
            tokens(800_000_000),
            tokens(200_000_000),
            &[tokens(2), U256::ZERO],
            U256::from(1u64),
        );
        assert_eq!(result, Err(CurveError::ZeroTarget));
    }
}
