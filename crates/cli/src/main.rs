//! Deployment walkthrough: construct the ledger, arm the sale engine with
//! the full allocation, run a sample purchase, finalize, and print the event
//! log as JSON lines.
//!
//! Decimal notation is converted to base units here, at the presentation
//! boundary; the engine itself only ever sees unsigned integers.

use anyhow::{Context, bail};
use chrono::Utc;

use crowdgate_core::{HolderId, LedgerId};
use crowdgate_ledger::{Ledger, TokenInfo};
use crowdgate_sale::{SaleConfig, SaleEngine};

/// Payment coin decimals used for display/parse at this boundary.
const PAYMENT_DECIMALS: u32 = 9;

const TOKEN_NAME: &str = "Crowdgate Token";
const TOKEN_SYMBOL: &str = "CGT";
const MAX_SUPPLY: u128 = 1_000_000;
const PRICE_DECIMAL: &str = "0.05";

/// Parse a non-negative decimal string into base units with `decimals`
/// fractional digits. Rejects too many fractional digits rather than
/// rounding; the engine never sees a rounded amount.
fn parse_units(s: &str, decimals: u32) -> anyhow::Result<u128> {
    let (whole, frac) = match s.split_once('.') {
        Some((w, f)) => (w, f),
        None => (s, ""),
    };
    if whole.is_empty() && frac.is_empty() {
        bail!("empty amount");
    }
    if frac.len() as u32 > decimals {
        bail!("too many fractional digits in '{s}' (max {decimals})");
    }

    let whole: u128 = if whole.is_empty() {
        0
    } else {
        whole.parse().with_context(|| format!("bad amount '{s}'"))?
    };
    let frac_units: u128 = if frac.is_empty() {
        0
    } else {
        frac.parse().with_context(|| format!("bad amount '{s}'"))?
    };

    let scale = 10u128.pow(decimals);
    let frac_scale = 10u128.pow(decimals - frac.len() as u32);
    whole
        .checked_mul(scale)
        .and_then(|w| w.checked_add(frac_units * frac_scale))
        .context("amount out of range")
}

fn main() -> anyhow::Result<()> {
    crowdgate_observability::init();

    let deployer = HolderId::new();
    let price = parse_units(PRICE_DECIMAL, PAYMENT_DECIMALS)?;

    // 1. Deploy the token ledger with the full supply on the deployer.
    let ledger = Ledger::new(
        LedgerId::new(),
        TokenInfo {
            name: TOKEN_NAME.to_string(),
            symbol: TOKEN_SYMBOL.to_string(),
            decimals: 18,
        },
        MAX_SUPPLY,
        deployer,
    );
    tracing::info!(ledger = %ledger.id_typed(), supply = MAX_SUPPLY, "ledger deployed");

    // 2. Deploy the sale engine, no time window.
    let mut engine = SaleEngine::new(
        ledger,
        deployer,
        SaleConfig {
            price,
            max_tokens: MAX_SUPPLY,
            window: None,
        },
    )
    .context("engine construction failed")?;
    tracing::info!(token = %engine.token(), price, "sale engine deployed");

    // 3. Move the sellable allocation into the engine's custody.
    engine
        .fund(deployer, MAX_SUPPLY)
        .context("funding failed")?;
    tracing::info!(custody = %engine.custody(), "allocation transferred to engine");

    // 4. Sample purchase: 10 tokens at the configured price.
    let buyer = HolderId::new();
    let now = Utc::now();
    engine
        .buy_tokens(buyer, 10, 10 * price, now)
        .context("purchase failed")?;
    tracing::info!(
        buyer = %buyer,
        tokens_sold = engine.tokens_sold(),
        payment_balance = engine.payment_balance(),
        "purchase executed"
    );

    // 5. Finalize and report the settlement.
    let settlement = engine
        .finalize(deployer, Utc::now())
        .context("finalize failed")?;
    tracing::info!(
        tokens_returned = settlement.tokens_returned,
        payment_swept = settlement.payment_swept,
        "sale finalized"
    );

    // 6. Emit the full event log for downstream consumers.
    for envelope in engine.events() {
        println!("{}", serde_json::to_string(envelope)?);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::parse_units;

    #[test]
    fn parses_whole_and_fractional_amounts() {
        assert_eq!(parse_units("0.05", 9).unwrap(), 50_000_000);
        assert_eq!(parse_units("2", 9).unwrap(), 2_000_000_000);
        assert_eq!(parse_units("1.5", 2).unwrap(), 150);
        assert_eq!(parse_units(".5", 1).unwrap(), 5);
    }

    #[test]
    fn rejects_excess_precision_instead_of_rounding() {
        assert!(parse_units("0.123", 2).is_err());
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_units("", 2).is_err());
        assert!(parse_units("1.2.3", 2).is_err());
        assert!(parse_units("-1", 2).is_err());
    }
}
