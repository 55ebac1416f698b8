//! Miscellaneous helper utilities: logging setup and wei-level
//! decimal arithmetic.

use bigdecimal::{BigDecimal, RoundingMode};
use ethers::types::U256;
use tracing_subscriber::{EnvFilter, fmt};

use crate::errors::{AppError, Result};

/// Initialize `tracing` subscriber with env-based filter.
///
/// If `RUST_LOG` is not set, defaults to `info` level.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();
}

fn wei_per_eth() -> BigDecimal {
    BigDecimal::from(1_000_000_000_000_000_000u64)
}

/// Convert an integer wei amount into ETH with full precision.
pub fn wei_to_eth(wei: U256) -> BigDecimal {
    let raw: BigDecimal = wei.to_string().parse().unwrap_or_else(|_| BigDecimal::from(0));
    raw / wei_per_eth()
}

/// Convert an ETH amount into integer wei, flooring any sub-wei remainder.
pub fn eth_to_wei(eth: &BigDecimal) -> Result<U256> {
    if *eth < BigDecimal::from(0) {
        return Err(AppError::Other(format!("negative ETH amount: {eth}")));
    }
    to_u256_floor(eth * wei_per_eth())
}

/// Apply a slippage tolerance (a fraction, e.g. 0.005 for 0.5%) to a quoted
/// amount, flooring the result. A tolerance of 1 or more zeroes the amount.
pub fn apply_slippage(amount: U256, tolerance: &BigDecimal) -> U256 {
    let one = BigDecimal::from(1);
    if *tolerance >= one {
        return U256::zero();
    }
    if *tolerance <= BigDecimal::from(0) {
        return amount;
    }
    let raw: BigDecimal = amount.to_string().parse().unwrap_or_else(|_| BigDecimal::from(0));
    to_u256_floor(raw * (one - tolerance)).unwrap_or_default()
}

fn to_u256_floor(value: BigDecimal) -> Result<U256> {
    let floored = value.with_scale_round(0, RoundingMode::Floor);
    U256::from_dec_str(&floored.to_string())
        .map_err(|e| AppError::Other(format!("wei conversion failed for {floored}: {e}")))
}
