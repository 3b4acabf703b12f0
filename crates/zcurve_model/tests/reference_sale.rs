//! Reference sale: 800M tokens, quadratic up to 200M, calibrated to raise 2
//! Run with: cargo test -p zcurve_model --test reference_sale

use zcurve_model::*;

fn tokens(whole: u64) -> U256 {
    U256::from(whole) * ONE_UNIT
}

fn reference_params() -> CurveParameters {
    CurveParameters::calibrated(tokens(800_000_000), tokens(200_000_000), tokens(2)).unwrap()
}

#[test]
fn test_full_sale_raises_target() {
    let params = reference_params();
    let raised = params.total_raise().unwrap();
    let target = tokens(2);

    // Never above the target, and within the documented residue
    assert!(raised <= target);
    let tolerance =
        calibration_tolerance(params.sale_cap(), params.quad_cap(), target, params.divisor())
            .unwrap();
    assert!(target - raised <= tolerance);
    // 1350 wei short of 2e18
    assert_eq!(target - raised, U256::from(1_350u64));
}

#[test]
fn test_tail_price_is_flat() {
    let params = reference_params();
    let pk = params.transition_price().unwrap();

    assert_eq!(params.marginal_price(params.quad_cap()).unwrap(), pk);
    assert_eq!(params.marginal_price(tokens(500_000_000)).unwrap(), pk);
    assert_eq!(
        params.marginal_price(params.sale_cap() - UNIT_SCALE).unwrap(),
        pk
    );

    // Halfway up the quadratic piece the price is a quarter of pK
    assert_eq!(params.marginal_price(tokens(100_000_000)).unwrap(), U256::from(750u64));
}

#[test]
fn test_last_quadratic_tick_meets_tail_price() {
    let params = reference_params();
    let pk = params.transition_price().unwrap();
    let last_quadratic = params.marginal_price(params.quad_cap() - UNIT_SCALE).unwrap();

    assert_eq!(pk, U256::from(3_000u64));
    assert_eq!(last_quadratic, pk);
}

#[test]
fn test_small_payment_buys_something() {
    let params = reference_params();
    let t = tokens_for_payment(U256::from(10_000_000_000_000_000u64), &params, U256::ZERO).unwrap();
    assert!(t > U256::ZERO);
    assert!(t > UNIT_SCALE * FREE_TICKS);
}

#[test]
fn test_zero_target_rejected() {
    assert_eq!(
        solve_divisor(tokens(800_000_000), tokens(200_000_000), U256::ZERO),
        Err(CurveError::ZeroTarget)
    );
}

#[test]
fn test_exhausted_sale() {
    let params = reference_params();
    for budget in [1u64, 1_000, u64::MAX] {
        assert_eq!(
            tokens_for_payment(U256::from(budget), &params, params.sale_cap()).unwrap(),
            U256::ZERO
        );
    }
}

#[test]
fn test_sample_serializes_for_charts() {
    let params = reference_params();
    let samples = sample_curve(&params, 2).unwrap();
    let json = serde_json::to_value(&samples).unwrap();

    assert_eq!(json.as_array().unwrap().len(), 3);
    assert_eq!(json[1]["percent_sold"], 50.0);
}
