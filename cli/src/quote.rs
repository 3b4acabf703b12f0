//! Price quotes against a configured sale

use anyhow::{Context, Result};
use colored::Colorize;
use serde_json::json;
use zcurve_model::{average_price, quote_buy, quote_purchase, quote_sale, U256};

use crate::config::SaleConfig;
use crate::units::{format_amount, parse_amount};

/// Print the resolved curve parameters
pub fn show_params(config: &SaleConfig, as_json: bool) -> Result<()> {
    let params = &config.params;
    let total_raise = params.total_raise()?;
    let transition = params.transition_price()?;
    let average = average_price(params)?;

    if as_json {
        let value = json!({
            "preset": config.preset,
            "sale_cap": format_amount(params.sale_cap()),
            "quad_cap": format_amount(params.quad_cap()),
            "divisor": params.divisor().to_string(),
            "target_raised": config.target_raised.map(format_amount),
            "total_raise": format_amount(total_raise),
            "transition_price_per_tick": transition.to_string(),
            "average_price": format_amount(average),
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("{}", "=== Sale Parameters ===".bright_green().bold());
    println!("{} {}", "Preset:".bright_cyan(), config.preset);
    if let Some(path) = &config.config_path {
        println!("{} {}", "Config:".bright_cyan(), path.display());
    }
    println!("{} {}", "Sale cap:".bright_cyan(), format_amount(params.sale_cap()));
    println!("{} {}", "Quad cap:".bright_cyan(), format_amount(params.quad_cap()));
    println!("{} {}", "Divisor:".bright_cyan(), params.divisor());
    if let Some(target) = config.target_raised {
        println!("{} {}", "Target raised:".bright_cyan(), format_amount(target));
    }

    println!("\n{}", "Curve:".bright_yellow());
    println!("  {} {}", "Full sale raises:".bright_cyan(), format_amount(total_raise));
    println!("  {} {} wei/tick", "Tail price:".bright_cyan(), transition);
    println!("  {} {}", "Average price:".bright_cyan(), format_amount(average));
    println!("  {} {} ticks", "Linear tail:".bright_cyan(), params.tail_ticks());

    if let Some(target) = config.target_raised {
        if total_raise < target {
            println!(
                "\n  {} {} wei below target (floor rounding)",
                "ℹ".dimmed(),
                target - total_raise
            );
        }
    }

    Ok(())
}

/// Cost to buy `amount` tokens after `sold`
pub fn quote_cost(config: &SaleConfig, amount: &str, sold: &str, as_json: bool) -> Result<()> {
    let params = &config.params;
    let amount = parse_amount(amount).context("Invalid token amount")?;
    let sold = parse_amount(sold).context("Invalid sold amount")?;

    let quote = quote_buy(amount, params, sold)?;
    let marginal = params.marginal_price(sold + amount)?;

    if as_json {
        let value = json!({
            "tokens": format_amount(amount),
            "already_sold": format_amount(sold),
            "total_cost": format_amount(quote.total_cost),
            "next_tick_price": marginal.to_string(),
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("{}", "=== Buy Quote ===".bright_green().bold());
    println!("{} {}", "Tokens:".bright_cyan(), format_amount(amount));
    println!("{} {}", "Already sold:".bright_cyan(), format_amount(sold));
    println!("{} {}", "Total cost:".bright_cyan(), format_amount(quote.total_cost).bright_white().bold());
    println!("{} {} wei", "Next tick price:".bright_cyan(), marginal);
    print_progress(config, sold + amount)?;

    Ok(())
}

/// Tokens obtainable for `payment` after `sold`
pub fn quote_tokens(config: &SaleConfig, payment: &str, sold: &str, as_json: bool) -> Result<()> {
    let params = &config.params;
    let payment = parse_amount(payment).context("Invalid payment amount")?;
    let sold = parse_amount(sold).context("Invalid sold amount")?;

    let result = quote_purchase(payment, params, sold)?;
    let unspent = payment - result.cost_paid;

    if as_json {
        let value = json!({
            "payment": format_amount(payment),
            "already_sold": format_amount(sold),
            "tokens_out": format_amount(result.tokens_out),
            "cost_paid": format_amount(result.cost_paid),
            "unspent": format_amount(unspent),
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("{}", "=== Purchase Quote ===".bright_green().bold());
    println!("{} {}", "Payment:".bright_cyan(), format_amount(payment));
    println!("{} {}", "Already sold:".bright_cyan(), format_amount(sold));
    println!("{} {}", "Tokens out:".bright_cyan(), format_amount(result.tokens_out).bright_white().bold());
    println!("{} {}", "Cost paid:".bright_cyan(), format_amount(result.cost_paid));
    println!("{} {}", "Unspent:".bright_cyan(), format_amount(unspent));

    if result.tokens_out == U256::ZERO && sold == params.sale_cap() {
        println!("\n  {} Sale exhausted", "⚠️".yellow());
    }
    print_progress(config, sold + result.tokens_out)?;

    Ok(())
}

/// Refund for selling `amount` tokens when `sold` are outstanding
pub fn quote_refund(config: &SaleConfig, amount: &str, sold: &str, as_json: bool) -> Result<()> {
    let params = &config.params;
    let amount = parse_amount(amount).context("Invalid token amount")?;
    let sold = parse_amount(sold).context("Invalid sold amount")?;

    let quote = quote_sale(amount, params, sold)?;

    if as_json {
        let value = json!({
            "tokens": format_amount(amount),
            "already_sold": format_amount(sold),
            "refund": format_amount(quote.total_cost),
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("{}", "=== Sell Quote ===".bright_green().bold());
    println!("{} {}", "Tokens:".bright_cyan(), format_amount(amount));
    println!("{} {}", "Already sold:".bright_cyan(), format_amount(sold));
    println!("{} {}", "Refund:".bright_cyan(), format_amount(quote.total_cost).bright_white().bold());
    print_progress(config, sold - amount)?;

    Ok(())
}

fn print_progress(config: &SaleConfig, sold_after: U256) -> Result<()> {
    let bps = config.params.percent_sold_bps(sold_after)?;
    println!(
        "{} {:.2}%",
        "Sold after trade:".bright_cyan(),
        bps as f64 / 100.0
    );
    Ok(())
}
