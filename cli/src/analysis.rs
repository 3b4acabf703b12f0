//! Curve sampling and scenario comparison output

use anyhow::{Context, Result};
use colored::Colorize;
use serde_json::json;
use zcurve_model::{analyze_scenarios, sample_curve, U256};

use crate::config::SaleConfig;
use crate::units::{format_amount, parse_amount};

/// Print `points + 1` samples from zero to the sale cap
pub fn show_sample(config: &SaleConfig, points: usize, as_json: bool) -> Result<()> {
    let samples = sample_curve(&config.params, points)?;

    if as_json {
        let rows: Vec<_> = samples
            .iter()
            .map(|s| {
                json!({
                    "tokens_sold": format_amount(s.tokens_sold),
                    "total_cost": format_amount(s.total_cost),
                    "marginal_price": s.marginal_price.to_string(),
                    "percent_sold": s.percent_sold,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    println!("{}", "=== Curve Sample ===".bright_green().bold());
    println!(
        "{:>8}  {:>28}  {:>28}  {:>16}",
        "% sold".bright_cyan(),
        "tokens sold".bright_cyan(),
        "total cost".bright_cyan(),
        "wei/tick".bright_cyan()
    );
    for s in &samples {
        println!(
            "{:>7.2}%  {:>28}  {:>28}  {:>16}",
            s.percent_sold,
            format_amount(s.tokens_sold),
            format_amount(s.total_cost),
            s.marginal_price.to_string()
        );
    }

    Ok(())
}

/// Calibrate one curve per target on the configured caps and compare them
pub fn show_scenarios(
    config: &SaleConfig,
    targets: &[String],
    reference_payment: &str,
    as_json: bool,
) -> Result<()> {
    if targets.is_empty() {
        anyhow::bail!("At least one target is required");
    }

    let targets = targets
        .iter()
        .map(|t| parse_amount(t).with_context(|| format!("Invalid target: {}", t)))
        .collect::<Result<Vec<U256>>>()?;
    let reference = parse_amount(reference_payment).context("Invalid reference payment")?;

    let reports = analyze_scenarios(
        config.params.sale_cap(),
        config.params.quad_cap(),
        &targets,
        reference,
    )?;

    if as_json {
        let rows: Vec<_> = reports
            .iter()
            .map(|r| {
                json!({
                    "target_raised": format_amount(r.target_raised),
                    "divisor": r.divisor.to_string(),
                    "total_raised": format_amount(r.total_raised),
                    "average_price": format_amount(r.average_price),
                    "transition_price": r.transition_price.to_string(),
                    "marginal_prices": r.marginal_prices.iter().map(|p| p.to_string()).collect::<Vec<_>>(),
                    "reference_payment": format_amount(r.reference_payment),
                    "tokens_for_reference": format_amount(r.tokens_for_reference),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    println!("{}", "=== Scenario Analysis ===".bright_green().bold());
    println!("{} {}", "Sale cap:".bright_cyan(), format_amount(config.params.sale_cap()));
    println!("{} {}", "Quad cap:".bright_cyan(), format_amount(config.params.quad_cap()));
    println!("{} {}", "Reference payment:".bright_cyan(), format_amount(reference));

    for report in &reports {
        println!(
            "\n{} {}",
            "Target:".bright_yellow(),
            format_amount(report.target_raised).bold()
        );
        println!("  {} {}", "Divisor:".bright_cyan(), report.divisor);
        println!("  {} {}", "Raises:".bright_cyan(), format_amount(report.total_raised));
        println!("  {} {}", "Average price:".bright_cyan(), format_amount(report.average_price));
        let [p25, p50, p75, p100] = report.marginal_prices;
        println!(
            "  {} 25%={} 50%={} 75%={} 100%={} wei/tick",
            "Marginal:".bright_cyan(),
            p25,
            p50,
            p75,
            p100
        );
        println!(
            "  {} {}",
            "Reference buys:".bright_cyan(),
            format_amount(report.tokens_for_reference)
        );
    }

    Ok(())
}
